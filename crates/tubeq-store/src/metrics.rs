//! Store metrics collection.
//!
//! Provides standardized metrics for monitoring store requests:
//! - Request counters by operation and status
//! - Latency histograms

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total store requests by operation and status.
    pub const REQUESTS_TOTAL: &str = "store_requests_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "store_latency_seconds";

    /// Rows returned by select queries, by table.
    pub const ROWS_RETURNED_TOTAL: &str = "store_rows_returned_total";
}

/// Record metrics for a completed store request.
pub fn record_request(operation: &str, status: u16, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_ms / 1000.0);
}

/// Record how many rows a select returned.
pub fn record_rows(table: &str, rows: usize) {
    counter!(
        names::ROWS_RETURNED_TOTAL,
        "table" => table.to_string()
    )
    .increment(rows as u64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
    use std::sync::Mutex;

    /// Captures every registered key as `name{label=value,...}`.
    #[derive(Default)]
    struct KeyRecorder {
        keys: Mutex<Vec<String>>,
    }

    impl KeyRecorder {
        fn push(&self, key: &Key) {
            let labels: Vec<String> = key
                .labels()
                .map(|label| format!("{}={}", label.key(), label.value()))
                .collect();
            self.keys
                .lock()
                .unwrap()
                .push(format!("{}{{{}}}", key.name(), labels.join(",")));
        }
    }

    impl Recorder for KeyRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            self.push(key);
            Counter::noop()
        }

        fn register_gauge(&self, key: &Key, _: &Metadata<'_>) -> Gauge {
            self.push(key);
            Gauge::noop()
        }

        fn register_histogram(&self, key: &Key, _: &Metadata<'_>) -> Histogram {
            self.push(key);
            Histogram::noop()
        }
    }

    #[test]
    fn test_record_request_keys() {
        let recorder = KeyRecorder::default();
        metrics::with_local_recorder(&recorder, || record_request("select", 404, 12.0));

        assert_eq!(
            *recorder.keys.lock().unwrap(),
            vec![
                "store_requests_total{operation=select,status=404}".to_string(),
                "store_latency_seconds{operation=select}".to_string(),
            ]
        );
    }

    #[test]
    fn test_record_rows_key() {
        let recorder = KeyRecorder::default();
        metrics::with_local_recorder(&recorder, || record_rows("video_queue", 3));

        assert_eq!(
            *recorder.keys.lock().unwrap(),
            vec!["store_rows_returned_total{table=video_queue}".to_string()]
        );
    }
}
