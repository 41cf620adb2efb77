//! Queue worker: moves videos from the Supabase queue to YouTube.
//!
//! This crate provides:
//! - Environment configuration
//! - The processing context and single-entry queue processor
//! - Structured entry logging
//! - A remote trigger for worker runs

pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod processor;
pub mod runner;

pub use config::WorkerConfig;
pub use context::ProcessingContext;
pub use dispatch::WorkflowDispatcher;
pub use error::{EntryError, WorkerError, WorkerResult};
pub use logging::{init_tracing, EntryLogger};
pub use processor::{EntryOutcome, ProcessOutcome, QueueProcessor, ALREADY_PROCESSED};
pub use runner::run_once;
