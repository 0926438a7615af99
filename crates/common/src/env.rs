//! Environment/runtime helpers
//!
//! Sanity checks run once at startup, before any collection is served.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the data directory exists and report collection files that are missing.
///
/// Collection files are provisioned externally; a missing one is only a warning
/// because requests against it fail individually with a read error.
/// Returns the names of the files that were not found.
pub async fn ensure_env(data_dir: &str, collection_files: &[&str]) -> anyhow::Result<Vec<String>> {
    let meta = tokio::fs::metadata(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("data directory {data_dir} is not accessible: {e}"))?;
    if !meta.is_dir() {
        return Err(anyhow::anyhow!("data directory {data_dir} is not a directory"));
    }

    let mut missing = Vec::new();
    for file in collection_files {
        let path = Path::new(data_dir).join(file);
        if tokio::fs::metadata(&path).await.is_err() {
            warn!(path = %path.display(), "collection file not found; requests for it will fail until it is created");
            missing.push((*file).to_string());
        }
    }
    info!(%data_dir, collections = collection_files.len(), missing = missing.len(), "data directory checked");
    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_missing_collection_files() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("ensure_env_{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join("alunos.json"), "[]").await?;

        let dir_str = dir.to_string_lossy().to_string();
        let missing = ensure_env(&dir_str, &["alunos.json", "eventos.json"]).await?;
        assert_eq!(missing, vec!["eventos.json".to_string()]);

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn missing_data_dir_is_an_error() {
        let dir = std::env::temp_dir().join(format!("ensure_env_absent_{}", uuid::Uuid::new_v4()));
        let res = ensure_env(&dir.to_string_lossy(), &["alunos.json"]).await;
        assert!(res.is_err());
    }
}
