//! Key-value object store persisted as one JSON document.

use super::{sort_newest_first, RecordId, ResultBackend, ResultRecord, StoreError};
use async_trait::async_trait;
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResultDocument {
    version: u32,
    next_id: RecordId,
    #[serde(default)]
    records: Vec<ResultRecord>,
}

impl ResultDocument {
    fn new() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            next_id: 1,
            records: Vec::new(),
        }
    }
}

/// Auto-increment object store kept in memory and mirrored to a JSON file.
///
/// Every append rewrites the file atomically, so a crash never leaves a
/// half-written document. The mutex makes this the single writer.
#[derive(Debug)]
pub struct DocumentBackend {
    path: Option<PathBuf>,
    document: Mutex<Option<ResultDocument>>,
}

impl DocumentBackend {
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            document: Mutex::new(None),
        }
    }

    /// Store that is never written to disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            document: Mutex::new(None),
        }
    }
}

/// Load the document, or a new empty one if the file doesn't exist.
/// A file with an unsupported version is an error.
fn load_document(path: &Path) -> Result<Option<ResultDocument>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)?;
    let mut document: ResultDocument = serde_json::from_reader(file)?;

    if document.version != DOCUMENT_VERSION {
        return Err(StoreError::UnsupportedVersion(document.version));
    }

    // Never hand out an id that is already taken, even if next_id was edited by hand
    let highest = document.records.iter().map(|r| r.id).max().unwrap_or(0);
    if document.next_id <= highest {
        warn!(
            "Result document next_id {} is behind highest id {}, advancing",
            document.next_id, highest
        );
        document.next_id = highest + 1;
    }

    Ok(Some(document))
}

fn save_document(path: &Path, document: &ResultDocument) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = AtomicWriteFile::open(path)?;
    serde_json::to_writer_pretty(&mut file, document)?;
    file.commit()?;
    Ok(())
}

#[async_trait]
impl ResultBackend for DocumentBackend {
    fn name(&self) -> &'static str {
        "document"
    }

    async fn initialize(&mut self) -> Result<(), StoreError> {
        let slot = self.document.get_mut();
        if slot.is_some() {
            return Ok(());
        }

        let document = match &self.path {
            Some(path) => match load_document(path)? {
                Some(document) => {
                    info!(
                        "Loaded {} results from {}",
                        document.records.len(),
                        path.display()
                    );
                    document
                }
                None => {
                    let document = ResultDocument::new();
                    save_document(path, &document)?;
                    info!("Created result document at {}", path.display());
                    document
                }
            },
            None => ResultDocument::new(),
        };

        *slot = Some(document);
        Ok(())
    }

    async fn append(&self, score: u32, date: DateTime<Utc>) -> Result<RecordId, StoreError> {
        let mut guard = self.document.lock().await;
        let document = guard
            .as_mut()
            .ok_or_else(|| StoreError::NotReady("document: not loaded".to_string()))?;

        let id = document.next_id;
        document.records.push(ResultRecord { id, score, date });
        document.next_id += 1;

        if let Some(path) = &self.path {
            if let Err(e) = save_document(path, document) {
                // Keep memory and disk in agreement
                document.records.pop();
                document.next_id -= 1;
                return Err(e);
            }
        }

        debug!("Stored result object {}", id);
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<ResultRecord>, StoreError> {
        let guard = self.document.lock().await;
        let document = guard
            .as_ref()
            .ok_or_else(|| StoreError::NotReady("document: not loaded".to_string()))?;

        let mut records = document.records.clone();
        sort_newest_first(&mut records);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::env;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir()
            .join(format!("sledai_test_{}_{}", name, std::process::id()))
            .join("results.json")
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 18, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_initialize_creates_file() {
        let path = temp_path("create");
        cleanup(&path);

        let mut backend = DocumentBackend::open(&path);
        backend.initialize().await.unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"version\": 1"));
        assert!(content.contains("\"next_id\": 1"));

        cleanup(&path);
    }

    #[tokio::test]
    async fn test_append_before_initialize_is_not_ready() {
        let backend = DocumentBackend::in_memory();
        assert!(matches!(
            backend.append(1, at(1)).await,
            Err(StoreError::NotReady(_))
        ));
        assert!(matches!(
            backend.list_all().await,
            Err(StoreError::NotReady(_))
        ));
    }

    #[tokio::test]
    async fn test_roundtrip_single_record() {
        let mut backend = DocumentBackend::in_memory();
        backend.initialize().await.unwrap();
        let id = backend.append(7, at(2)).await.unwrap();
        assert_eq!(
            backend.list_all().await.unwrap(),
            vec![ResultRecord { id, score: 7, date: at(2) }]
        );
    }

    #[tokio::test]
    async fn test_ids_increment_from_one() {
        let mut backend = DocumentBackend::in_memory();
        backend.initialize().await.unwrap();
        assert_eq!(backend.append(1, at(1)).await.unwrap(), 1);
        assert_eq!(backend.append(2, at(2)).await.unwrap(), 2);
        assert_eq!(backend.append(3, at(3)).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let path = temp_path("reopen");
        cleanup(&path);

        {
            let mut backend = DocumentBackend::open(&path);
            backend.initialize().await.unwrap();
            backend.append(10, at(1)).await.unwrap();
            backend.append(20, at(2)).await.unwrap();
        }

        let mut reopened = DocumentBackend::open(&path);
        reopened.initialize().await.unwrap();
        let records = reopened.list_all().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].score, 20);
        assert_eq!(records[0].date, at(2));

        // Ids continue after the stored maximum
        assert_eq!(reopened.append(30, at(3)).await.unwrap(), 3);

        cleanup(&path);
    }

    #[tokio::test]
    async fn test_file_uses_canonical_dates() {
        let path = temp_path("dates");
        cleanup(&path);

        let mut backend = DocumentBackend::open(&path);
        backend.initialize().await.unwrap();
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        backend.append(7, date).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"date\": \"2024-01-01T00:00:00.000Z\""));
        assert!(!content.contains("\"date\": \"2024-01-01T00:00:00Z\""));

        cleanup(&path);
    }

    #[tokio::test]
    async fn test_unsupported_version_fails_initialize() {
        let path = temp_path("version");
        cleanup(&path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"version": 2, "next_id": 1, "records": []}"#).unwrap();

        let mut backend = DocumentBackend::open(&path);
        assert!(matches!(
            backend.initialize().await,
            Err(StoreError::UnsupportedVersion(2))
        ));

        cleanup(&path);
    }

    #[tokio::test]
    async fn test_stale_next_id_is_advanced() {
        let path = temp_path("stale");
        cleanup(&path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r#"{"version": 1, "next_id": 1, "records": [
                {"id": 4, "score": 2, "date": "2024-06-01T18:00:00.000Z"}
            ]}"#,
        )
        .unwrap();

        let mut backend = DocumentBackend::open(&path);
        backend.initialize().await.unwrap();
        assert_eq!(backend.append(1, at(2)).await.unwrap(), 5);

        cleanup(&path);
    }

    #[tokio::test]
    async fn test_malformed_file_fails_initialize() {
        let path = temp_path("malformed");
        cleanup(&path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        let mut backend = DocumentBackend::open(&path);
        assert!(matches!(
            backend.initialize().await,
            Err(StoreError::Serialization(_))
        ));

        cleanup(&path);
    }
}
