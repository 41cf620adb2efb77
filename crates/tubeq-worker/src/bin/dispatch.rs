//! Trigger a remote worker run through GitHub `repository_dispatch`.

use tracing::error;

use tubeq_worker::{init_tracing, WorkflowDispatcher};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let _ = rustls::crypto::ring::default_provider().install_default();
    dotenvy::dotenv().ok();
    init_tracing();

    let result = match WorkflowDispatcher::from_env() {
        Ok(dispatcher) => dispatcher.trigger().await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
    println!("Worker triggered");
}
