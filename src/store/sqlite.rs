//! Embedded SQLite backend.

use super::{
    format_timestamp, parse_timestamp, RecordId, ResultBackend, ResultRecord, StoreError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
enum Location {
    Memory,
    File(PathBuf),
}

#[derive(Debug, sqlx::FromRow)]
struct ResultRow {
    id: i64,
    score: i64,
    date: String,
}

impl TryFrom<ResultRow> for ResultRecord {
    type Error = StoreError;

    fn try_from(row: ResultRow) -> Result<Self, Self::Error> {
        let score = u32::try_from(row.score).map_err(|_| StoreError::CorruptRecord {
            id: row.id,
            reason: format!("score {} out of range", row.score),
        })?;
        let date = parse_timestamp(&row.date).map_err(|e| StoreError::CorruptRecord {
            id: row.id,
            reason: format!("invalid date '{}': {}", row.date, e),
        })?;
        Ok(ResultRecord {
            id: row.id,
            score,
            date,
        })
    }
}

/// Results table in an SQLite database file (or an in-memory database).
///
/// The connection pool is created by `initialize`.
#[derive(Debug)]
pub struct SqliteBackend {
    location: Location,
    pool: Option<SqlitePool>,
}

impl SqliteBackend {
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            location: Location::File(path.as_ref().to_path_buf()),
            pool: None,
        }
    }

    /// Private database that lives as long as the backend
    pub fn in_memory() -> Self {
        Self {
            location: Location::Memory,
            pool: None,
        }
    }

    fn pool(&self) -> Result<&SqlitePool, StoreError> {
        self.pool
            .as_ref()
            .ok_or_else(|| StoreError::NotReady("sqlite: no connection".to_string()))
    }

    async fn connect(&self) -> Result<SqlitePool, StoreError> {
        match &self.location {
            Location::Memory => {
                // Every connection to :memory: is a separate database, so keep exactly one alive
                let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
                let pool = SqlitePoolOptions::new()
                    .min_connections(1)
                    .max_connections(1)
                    .idle_timeout(None::<Duration>)
                    .max_lifetime(None::<Duration>)
                    .connect_with(options)
                    .await?;
                Ok(pool)
            }
            Location::File(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal);
                let pool = SqlitePoolOptions::new()
                    .max_connections(4)
                    .connect_with(options)
                    .await?;
                Ok(pool)
            }
        }
    }
}

#[async_trait]
impl ResultBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn initialize(&mut self) -> Result<(), StoreError> {
        if self.pool.is_some() {
            return Ok(());
        }

        match &self.location {
            Location::Memory => info!("Opening in-memory results database"),
            Location::File(path) => info!("Opening results database at {}", path.display()),
        }

        let pool = self.connect().await?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                score INTEGER NOT NULL,
                date TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        self.pool = Some(pool);
        Ok(())
    }

    async fn append(&self, score: u32, date: DateTime<Utc>) -> Result<RecordId, StoreError> {
        let pool = self.pool()?;
        let id = sqlx::query("INSERT INTO results (score, date) VALUES (?1, ?2)")
            .bind(i64::from(score))
            .bind(format_timestamp(&date))
            .execute(pool)
            .await?
            .last_insert_rowid();

        debug!("Inserted result row {}", id);
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<ResultRecord>, StoreError> {
        let pool = self.pool()?;
        let rows = sqlx::query_as::<_, ResultRow>(
            "SELECT id, score, date FROM results ORDER BY date DESC, id DESC",
        )
        .fetch_all(pool)
        .await?;

        // A bad row is skipped so it can't hide the rest of the history
        let records = rows
            .into_iter()
            .filter_map(|row| match ResultRecord::try_from(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping result row: {}", e);
                    None
                }
            })
            .collect();
        Ok(records)
    }
}
