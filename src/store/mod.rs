//! Result Store
//!
//! Append-only log of scored attempts. Two interchangeable backends sit
//! behind [`ResultBackend`]:
//!
//! - `sqlite`: embedded SQLite database via sqlx
//! - `document`: a JSON object store written atomically to a single file
//!
//! # Schema
//!
//! ## results
//! - id: store-assigned integer key, monotonic by insertion
//! - score: non-negative integer total
//! - date: ISO-8601 timestamp with millisecond precision (UTC, `Z` suffix)
//!
//! Records are never updated or deleted.

pub mod config;
pub mod document;
pub mod handle;
pub mod sqlite;

pub use config::{BackendKind, StoreConfig};
pub use document::DocumentBackend;
pub use handle::{chart_series, ResultStore};
pub use sqlite::SqliteBackend;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned record key
pub type RecordId = i64;

/// One persisted scoring attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: RecordId,
    pub score: u32,
    #[serde(with = "canonical_timestamp")]
    pub date: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Result store is not ready ({0})")]
    NotReady(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported result document version: {0}")]
    UnsupportedVersion(u32),

    #[error("Corrupt record {id}: {reason}")]
    CorruptRecord { id: RecordId, reason: String },
}

/// Storage contract shared by every backend.
///
/// `initialize` must succeed before `append` or `list_all` are called; the
/// [`ResultStore`] handle enforces that ordering.
#[async_trait]
pub trait ResultBackend: Send + Sync {
    /// Short backend name for logs and status lines
    fn name(&self) -> &'static str;

    /// Create the backing table or document if absent. Safe to call repeatedly.
    async fn initialize(&mut self) -> Result<(), StoreError>;

    /// Persist one record and return its assigned id
    async fn append(&self, score: u32, date: DateTime<Utc>) -> Result<RecordId, StoreError>;

    /// Every record, newest first
    async fn list_all(&self) -> Result<Vec<ResultRecord>, StoreError>;
}

/// Canonical text form of a record timestamp: RFC 3339, milliseconds, `Z`.
///
/// Fixed width, so lexical order matches chronological order.
pub fn format_timestamp(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|d| d.with_timezone(&Utc))
}

/// Serde adapter that writes dates in the `format_timestamp` form
mod canonical_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_timestamp(&text).map_err(serde::de::Error::custom)
    }
}

/// Newest first; equal timestamps fall back to insertion order, newest first
pub(crate) fn sort_newest_first(records: &mut [ResultRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_format() {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        assert_eq!(format_timestamp(&date), "2024-03-09T14:05:00.000Z");
    }

    #[test]
    fn test_timestamp_parse_accepts_offsets() {
        let parsed = parse_timestamp("2024-03-09T16:05:00.000+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap());
    }

    #[test]
    fn test_timestamp_parse_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_record_serializes_canonical_date() {
        let record = ResultRecord {
            id: 7,
            score: 7,
            date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":7,"score":7,"date":"2024-01-01T00:00:00.000Z"}"#);

        let back: ResultRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_record_rejects_bad_date() {
        let result: Result<ResultRecord, _> =
            serde_json::from_str(r#"{"id":1,"score":1,"date":"2024/01/05"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_sort_newest_first_with_ties() {
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let mut records = vec![
            ResultRecord { id: 1, score: 1, date: t1 },
            ResultRecord { id: 2, score: 2, date: t2 },
            ResultRecord { id: 3, score: 3, date: t1 },
        ];
        sort_newest_first(&mut records);
        let ids: Vec<RecordId> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
