//! Add YouTube URLs to the video queue, list recent entries, or remove one.

use clap::Parser;
use tracing::error;

use tubeq_models::EntryId;
use tubeq_store::{QueueRepository, StoreClient, StoreError};
use tubeq_worker::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "tubeq-enqueue", version, about = "Queue YouTube videos for upload")]
struct Args {
    /// Description published with every queued video
    #[arg(short, long)]
    description: Option<String>,

    /// List the most recent entries instead of enqueueing
    #[arg(long, value_name = "N", num_args = 0..=1, default_missing_value = "20", conflicts_with = "urls")]
    list: Option<usize>,

    /// Remove the entry with this id from the queue
    #[arg(long, value_name = "ID", conflicts_with_all = ["urls", "list"])]
    delete: Option<String>,

    /// Video URLs (watch, youtu.be, shorts or embed links)
    #[arg(required_unless_present_any = ["list", "delete"])]
    urls: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let _ = rustls::crypto::ring::default_provider().install_default();
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), StoreError> {
    let queue = QueueRepository::new(StoreClient::from_env()?);

    if let Some(id) = args.delete {
        queue.delete(&EntryId::from(id.as_str())).await?;
        println!("Deleted entry {}", id);
        return Ok(());
    }

    if let Some(limit) = args.list {
        for entry in queue.list_recent(Some(limit)).await? {
            let created = entry
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            let note = entry.error_message.as_deref().unwrap_or("");
            println!("{:<16} {:<10} {} {}", created, entry.status.as_str(), entry.youtube_url, note);
        }
        return Ok(());
    }

    let count = queue.enqueue(&args.urls, args.description.as_deref()).await?;
    println!("Queued {} video(s)", count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_are_exclusive() {
        let args = Args::try_parse_from(["tubeq-enqueue", "--delete", "42"]).unwrap();
        assert_eq!(args.delete.as_deref(), Some("42"));
        assert!(args.urls.is_empty());

        let args = Args::try_parse_from(["tubeq-enqueue", "--list"]).unwrap();
        assert_eq!(args.list, Some(20));

        assert!(Args::try_parse_from(["tubeq-enqueue", "--delete", "42", "https://youtu.be/dQw4w9WgXcQ"]).is_err());
        assert!(Args::try_parse_from(["tubeq-enqueue", "--delete", "42", "--list"]).is_err());
        assert!(Args::try_parse_from(["tubeq-enqueue"]).is_err());
    }
}
