//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` that knows which collection files the
//! configured data directory is expected to hold.

use configs::StorageConfig;

use crate::resources::Resource;

/// Check the data directory and warn about missing collection files.
/// Returns the missing file names.
pub async fn ensure_env(storage: &StorageConfig) -> anyhow::Result<Vec<String>> {
    let files: Vec<&str> = Resource::ALL.iter().map(|r| r.file_name()).collect();
    common::env::ensure_env(&storage.data_dir, &files).await
}
