//! Supabase REST client for the video queue.
//!
//! This crate provides:
//! - A PostgREST table client with API key authentication
//! - Typed repositories for the `video_queue` and `history` tables
//! - The [`QueueStore`] trait the worker processes entries through

pub mod client;
pub mod error;
pub mod metrics;
pub mod repos;
pub mod store;

#[cfg(test)]
mod client_tests;

pub use client::{Query, StoreClient, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use repos::{HistoryRepository, QueueRepository, HISTORY_TABLE, QUEUE_TABLE};
pub use store::{QueueStore, SupabaseStore};
