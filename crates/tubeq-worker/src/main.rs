//! Queue worker binary: processes at most one pending entry and exits.

use tracing::{error, info};

use tubeq_worker::{init_tracing, run_once, EntryOutcome, ProcessOutcome, ProcessingContext};

fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    let _ = rustls::crypto::ring::default_provider().install_default();

    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run()) {
        error!("Worker error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> tubeq_worker::WorkerResult<()> {
    let outcome = run_once(|name| std::env::var(name).ok(), ProcessingContext::from_config).await?;

    match outcome {
        ProcessOutcome::Idle => {}
        ProcessOutcome::Processed { entry_id, outcome } => match outcome {
            EntryOutcome::Uploaded { video_id, platform_id } => {
                info!(entry_id = %entry_id, video_id = %video_id, youtube_id = %platform_id, "Entry done");
            }
            EntryOutcome::AlreadyProcessed { video_id } => {
                info!(entry_id = %entry_id, video_id = %video_id, "Entry skipped as duplicate");
            }
            EntryOutcome::Failed { error } => {
                info!(entry_id = %entry_id, error = %error, "Entry failed");
            }
        },
    }

    Ok(())
}
