// JSON export of the whole dataset for downstream dashboards
use crate::model::StorageError;
use crate::storage::sqlite::SqliteStorage;
use std::fs;
use std::path::Path;
use tracing::info;

/// Writes every stored job to `path` as a pretty-printed JSON array.
pub fn export_json(storage: &SqliteStorage, path: impl AsRef<Path>) -> Result<usize, StorageError> {
    let path = path.as_ref();
    let jobs = storage.all_jobs()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(&jobs)?;
    fs::write(path, body)?;
    info!("Exported {} jobs to {}", jobs.len(), path.display());
    Ok(jobs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategorizedListing, RawListing};
    use chrono::Utc;

    #[test]
    fn test_export_writes_array() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage
            .save_job(&CategorizedListing {
                listing: RawListing::new("Video Editor").with_link("https://a/1"),
                heuristic: None,
                details: None,
                category: "Design & Creative".into(),
                collected_at: Utc::now(),
            })
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("jobs.json");
        assert_eq!(export_json(&storage, &path).unwrap(), 1);

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let first = &value[0];
        assert_eq!(first["title"], "Video Editor");
        assert_eq!(first["link"], "https://a/1");
        assert_eq!(first["category"], "Design & Creative");
    }
}
