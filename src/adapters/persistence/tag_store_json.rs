//! Implements TagStorePort using a JSON record file.
//!
//! The file is a flat object of namespace keys; the tag map lives under [`TAGS_KEY`]
//! as `{ contactId: toneLabel }`. Other keys are preserved on save.

use crate::domain::{DomainError, TagMap};
use crate::ports::TagStorePort;
use serde_json::{Map, Value};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Namespace key of the contact tone map inside the record file.
pub const TAGS_KEY: &str = "contact_demographics";

/// JSON file-based tag storage.
pub struct JsonTagStore {
    path: std::path::PathBuf,
    /// Last records read or written; keeps foreign namespace keys across saves.
    cache: tokio::sync::RwLock<Map<String, Value>>,
}

impl JsonTagStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cache: tokio::sync::RwLock::new(Map::new()),
        }
    }

    /// Read the record file. Missing or unparseable files read as empty.
    async fn read_records(&self) -> Map<String, Value> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(_) => return Map::new(),
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(records)) => records,
            Ok(_) | Err(_) => {
                warn!(path = %self.path.display(), "tag store is not a JSON object; treating as empty");
                Map::new()
            }
        }
    }

    /// Atomic save using write-replace: temp file -> sync_all -> rename.
    async fn write_records(&self, records: &Map<String, Value>) -> Result<(), DomainError> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| DomainError::TagStore(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::TagStore(format!("create dir: {}", e)))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::TagStore(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::TagStore(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::TagStore(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::TagStore(format!("atomic rename failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl TagStorePort for JsonTagStore {
    async fn load(&self) -> Result<TagMap, DomainError> {
        let records = self.read_records().await;
        let tags = match records.get(TAGS_KEY) {
            None => TagMap::new(),
            Some(value) => serde_json::from_value::<TagMap>(value.clone()).unwrap_or_else(|e| {
                warn!(error = %e, "stored tag map is corrupt; treating as empty");
                TagMap::new()
            }),
        };
        *self.cache.write().await = records;
        debug!(count = tags.len(), "tags loaded");
        Ok(tags)
    }

    async fn save(&self, tags: &TagMap) -> Result<(), DomainError> {
        let persisted: TagMap = tags
            .iter()
            .filter(|(_, label)| !label.is_unset())
            .map(|(id, label)| (id.clone(), label.clone()))
            .collect();
        let value =
            serde_json::to_value(&persisted).map_err(|e| DomainError::TagStore(e.to_string()))?;

        let mut cache = self.cache.write().await;
        if cache.is_empty() {
            *cache = self.read_records().await;
        }
        cache.insert(TAGS_KEY.to_string(), value);
        self.write_records(&cache).await?;
        debug!(count = persisted.len(), "tags saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ToneLabel;

    fn tags(pairs: &[(&str, &str)]) -> TagMap {
        pairs
            .iter()
            .map(|(id, label)| (id.to_string(), ToneLabel::new(*label)))
            .collect()
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonTagStore::new(dir.path().join("store.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let saved = tags(&[("1", "Formal"), ("42", "Casual")]);

        JsonTagStore::new(&path).save(&saved).await.unwrap();
        let loaded = JsonTagStore::new(&path).load().await.unwrap();

        assert_eq!(loaded, saved);
    }

    #[tokio::test]
    async fn test_unset_labels_are_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = JsonTagStore::new(&path);

        store
            .save(&tags(&[("1", "Formal"), ("2", ToneLabel::UNSET)]))
            .await
            .unwrap();

        assert_eq!(store.load().await.unwrap(), tags(&[("1", "Formal")]));
    }

    #[tokio::test]
    async fn test_corrupt_payload_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        fs::write(&path, "{not json").await.unwrap();
        assert!(JsonTagStore::new(&path).load().await.unwrap().is_empty());

        fs::write(&path, r#"{"contact_demographics": ["Formal"]}"#)
            .await
            .unwrap();
        assert!(JsonTagStore::new(&path).load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_preserves_other_namespaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, r#"{"theme": "dark"}"#).await.unwrap();

        let store = JsonTagStore::new(&path);
        store.load().await.unwrap();
        store.save(&tags(&[("7", "Polite")])).await.unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).await.unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert_eq!(raw[TAGS_KEY]["7"], "Polite");
        assert!(!path.with_extension("json.tmp").exists());
    }
}
