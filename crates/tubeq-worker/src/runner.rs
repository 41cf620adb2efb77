//! A single worker invocation.

use tracing::info;

use crate::config::WorkerConfig;
use crate::context::ProcessingContext;
use crate::error::WorkerResult;
use crate::processor::{ProcessOutcome, QueueProcessor};

/// Load config, build the context, and process at most one entry.
///
/// Configuration is validated before `build_context` runs, so a missing
/// variable ends the run without touching the queue or the network.
pub async fn run_once<L, B>(lookup: L, build_context: B) -> WorkerResult<ProcessOutcome>
where
    L: Fn(&str) -> Option<String>,
    B: FnOnce(&WorkerConfig) -> WorkerResult<ProcessingContext>,
{
    let config = WorkerConfig::from_lookup(lookup)?;
    info!(media_file = %config.media_file.display(), "Starting tubeq-worker");

    let ctx = build_context(&config)?;
    QueueProcessor::new(ctx).process_next().await
}
