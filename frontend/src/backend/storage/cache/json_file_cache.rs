//! # JSON File Cache
//!
//! Stores each cache key as one file in the data directory.
//!
//! ```text
//! data/
//! ├── personnelData.json
//! └── savingsData.json
//! ```
//!
//! Writes go to a temp file that is then renamed over the target, so a crash
//! mid-write leaves the previous snapshot intact.

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::storage::traits::RecordCache;

#[derive(Debug, Clone)]
pub struct JsonFileCache {
    base_dir: PathBuf,
}

impl JsonFileCache {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", key))
    }
}

impl RecordCache for JsonFileCache {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key);
        if !path.exists() {
            debug!("💾 CACHE: No entry for {} at {:?}", key, path);
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache entry {:?}", path))?;
        debug!("💾 CACHE: Read {} bytes for {}", content.len(), key);
        Ok(Some(content))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir)
                .with_context(|| format!("Failed to create cache directory {:?}", self.base_dir))?;
            info!("💾 CACHE: Created cache directory {:?}", self.base_dir);
        }

        let path = self.entry_path(key);
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, value)
            .with_context(|| format!("Failed to write cache entry {:?}", temp_path))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to replace cache entry {:?}", path))?;

        debug!("💾 CACHE: Stored {} bytes for {}", value.len(), key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_key_returns_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cache = JsonFileCache::new(temp_dir.path());

        assert_eq!(cache.get("savingsData").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cache = JsonFileCache::new(temp_dir.path().join("nested"));

        cache.set("personnelData", r#"[{"no":"1"}]"#).unwrap();
        assert_eq!(
            cache.get("personnelData").unwrap().as_deref(),
            Some(r#"[{"no":"1"}]"#)
        );
        assert!(temp_dir.path().join("nested").join("personnelData.json").exists());
        assert!(!temp_dir.path().join("nested").join("personnelData.tmp").exists());
    }

    #[test]
    fn test_set_overwrites() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cache = JsonFileCache::new(temp_dir.path());

        cache.set("savingsData", "[1]").unwrap();
        cache.set("savingsData", "[]").unwrap();
        assert_eq!(cache.get("savingsData").unwrap().as_deref(), Some("[]"));
    }
}
