//! Structured entry logging and subscriber setup.

use tracing::{error, info, warn, Span};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tubeq_models::EntryId;
use tubeq_youtube::UploadProgress;

/// Initialize tracing: JSON when `LOG_FORMAT=json`, colored text otherwise.
pub fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tubeq=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

/// Entry logger for structured lifecycle logs.
///
/// Every line carries the entry id and operation.
#[derive(Debug, Clone)]
pub struct EntryLogger {
    entry_id: String,
    operation: String,
}

impl EntryLogger {
    pub fn new(entry_id: &EntryId, operation: &str) -> Self {
        Self {
            entry_id: entry_id.to_string(),
            operation: operation.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            entry_id = %self.entry_id,
            operation = %self.operation,
            "Entry started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            entry_id = %self.entry_id,
            operation = %self.operation,
            "Entry progress: {}", message
        );
    }

    /// Log upload progress as a whole percentage.
    pub fn log_upload_progress(&self, progress: UploadProgress) {
        info!(
            entry_id = %self.entry_id,
            operation = %self.operation,
            bytes_sent = progress.bytes_sent,
            total_bytes = progress.total_bytes,
            "Uploaded {}%", progress.percent()
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            entry_id = %self.entry_id,
            operation = %self.operation,
            "Entry warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            entry_id = %self.entry_id,
            operation = %self.operation,
            "Entry failed: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            entry_id = %self.entry_id,
            operation = %self.operation,
            "Entry completed: {}", message
        );
    }

    pub fn entry_id(&self) -> &str {
        &self.entry_id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Span wrapping all work on this entry.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "entry",
            entry_id = %self.entry_id,
            operation = %self.operation
        )
    }
}
