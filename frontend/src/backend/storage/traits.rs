//! # Storage Traits
//!
//! Abstractions over the two places records live: the remote sheets API, which
//! owns every record, and the local cache, which mirrors the last collection
//! fetched from it so the next start can paint before the network answers.

use anyhow::Result;
use async_trait::async_trait;
use shared::{ApiStatusResponse, Personnel, Saving, Sheet};

use crate::backend::domain::errors::ClientError;

/// Key-value mirror of the last fetched collections.
///
/// Keys are `Sheet::cache_key()` values; values are JSON arrays as text.
/// Entries are overwritten on every successful fetch and never expire.
pub trait RecordCache: Send + Sync {
    /// Stored value, or `None` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Remote spreadsheet-backed API.
///
/// Every read returns the full collection; every write appends one record.
#[async_trait]
pub trait SheetsApi: Send + Sync {
    /// Idempotent setup of a sheet's header row
    async fn initialize_sheet(&self, sheet: Sheet) -> Result<serde_json::Value, ClientError>;

    async fn fetch_personnel(&self) -> Result<Vec<Personnel>, ClientError>;

    async fn fetch_savings(&self) -> Result<Vec<Saving>, ClientError>;

    async fn create_personnel(&self, record: &Personnel) -> Result<ApiStatusResponse, ClientError>;

    async fn create_saving(&self, record: &Saving) -> Result<ApiStatusResponse, ClientError>;
}
