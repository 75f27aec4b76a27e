//! # Cache Storage Module
//!
//! Local mirror of the last fetched collections, plus decoding of mirrored
//! entries back into records.

pub mod json_file_cache;
pub mod memory_cache;

pub use json_file_cache::JsonFileCache;
pub use memory_cache::MemoryCache;

use log::warn;
use serde::de::DeserializeOwned;

/// Decode a cached collection.
///
/// A value that is valid JSON but not an array (including `null`) is reported
/// and read as an empty collection. Text that is not JSON at all yields `None`
/// so the caller can skip painting from the cache.
pub fn decode_collection<T: DeserializeOwned>(key: &str, raw: &str) -> Option<Vec<T>> {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("💾 CACHE: Entry {} is not valid JSON: {}", key, e);
            return None;
        }
    };

    if !value.is_array() {
        warn!("💾 CACHE: Entry {} is not an array, treating as empty", key);
        return Some(Vec::new());
    }

    match serde_json::from_value(value) {
        Ok(records) => Some(records),
        Err(e) => {
            warn!("💾 CACHE: Entry {} has unreadable records: {}", key, e);
            None
        }
    }
}
