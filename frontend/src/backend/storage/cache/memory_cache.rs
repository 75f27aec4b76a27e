use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::backend::storage::traits::RecordCache;

/// In-process cache, used by tests and by runs with caching turned off
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory cache lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory cache lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_cache_roundtrip() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("personnelData").unwrap(), None);

        cache.set("personnelData", "[]").unwrap();
        assert_eq!(cache.get("personnelData").unwrap().as_deref(), Some("[]"));
    }
}
