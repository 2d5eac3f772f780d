use super::{sort_newest_first, RecordId, ResultBackend, ResultRecord, StoreError};
use chrono::{DateTime, SubsecRound, Utc};
use std::fmt;
use tracing::{debug, error, info, warn};

enum StoreState {
    Uninitialized(Box<dyn ResultBackend>),
    /// Only observable if an `initialize` future is dropped before it finishes
    Initializing,
    Ready(Box<dyn ResultBackend>),
    Failed { backend: &'static str, reason: String },
}

/// State-tagged handle over one backend.
///
/// `Uninitialized -> Ready` or `Uninitialized -> Failed`; there is no way back.
/// Reads never fail: an unavailable store reads as empty. Writes report
/// `StoreError::NotReady` instead of being dropped silently.
pub struct ResultStore {
    state: StoreState,
}

impl fmt::Debug for ResultStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultStore")
            .field("state", &self.state_label())
            .finish()
    }
}

impl ResultStore {
    pub fn new(backend: Box<dyn ResultBackend>) -> Self {
        Self {
            state: StoreState::Uninitialized(backend),
        }
    }

    /// Create the handle and await initialization in one step
    pub async fn open(backend: Box<dyn ResultBackend>) -> Self {
        let mut store = Self::new(backend);
        store.initialize().await;
        store
    }

    /// Run backend initialization once. Returns whether the store is ready.
    ///
    /// Calling this again after success or failure does nothing.
    pub async fn initialize(&mut self) -> bool {
        match std::mem::replace(&mut self.state, StoreState::Initializing) {
            StoreState::Uninitialized(mut backend) => {
                let name = backend.name();
                debug!("Initializing {} result store", name);
                match backend.initialize().await {
                    Ok(()) => {
                        info!("{} result store ready", name);
                        self.state = StoreState::Ready(backend);
                    }
                    Err(e) => {
                        error!("{} result store failed to initialize: {}", name, e);
                        self.state = StoreState::Failed {
                            backend: name,
                            reason: e.to_string(),
                        };
                    }
                }
            }
            other => self.state = other,
        }
        self.is_ready()
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, StoreState::Ready(_))
    }

    /// Initialization error message, if initialization failed
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.state {
            StoreState::Failed { reason, .. } => Some(reason.as_str()),
            _ => None,
        }
    }

    pub fn state_label(&self) -> String {
        match &self.state {
            StoreState::Uninitialized(backend) => format!("{}: uninitialized", backend.name()),
            StoreState::Initializing => "initializing".to_string(),
            StoreState::Ready(backend) => format!("{}: ready", backend.name()),
            StoreState::Failed { backend, .. } => format!("{}: unavailable", backend),
        }
    }

    /// Persist a score. The timestamp is stored with millisecond precision.
    pub async fn append(&self, score: u32, date: DateTime<Utc>) -> Result<RecordId, StoreError> {
        match &self.state {
            StoreState::Ready(backend) => {
                let date = date.trunc_subsecs(3);
                match backend.append(score, date).await {
                    Ok(id) => {
                        debug!("Saved score {} as record {}", score, id);
                        Ok(id)
                    }
                    Err(e) => {
                        error!("Failed to save score {} to {}: {}", score, backend.name(), e);
                        Err(e)
                    }
                }
            }
            _ => {
                let label = self.state_label();
                warn!("Result store not ready ({}), score {} not saved", label, score);
                Err(StoreError::NotReady(label))
            }
        }
    }

    /// Every record, newest first. Empty when the store is unavailable.
    pub async fn list_all(&self) -> Vec<ResultRecord> {
        match &self.state {
            StoreState::Ready(backend) => match backend.list_all().await {
                Ok(mut records) => {
                    sort_newest_first(&mut records);
                    records
                }
                Err(e) => {
                    error!("Failed to read history from {}: {}", backend.name(), e);
                    Vec::new()
                }
            },
            _ => {
                warn!("Result store not ready ({}), history is empty", self.state_label());
                Vec::new()
            }
        }
    }
}

/// `(date, score)` points in chronological order for charting
pub fn chart_series(records: &[ResultRecord]) -> Vec<(DateTime<Utc>, u32)> {
    let mut points: Vec<(DateTime<Utc>, RecordId, u32)> = records
        .iter()
        .map(|record| (record.date, record.id, record.score))
        .collect();
    points.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
    points
        .into_iter()
        .map(|(date, _, score)| (date, score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DocumentBackend;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};

    /// Backend whose initialization always fails
    struct BrokenBackend;

    #[async_trait]
    impl ResultBackend for BrokenBackend {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn initialize(&mut self) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only volume",
            )))
        }

        async fn append(&self, _score: u32, _date: DateTime<Utc>) -> Result<RecordId, StoreError> {
            panic!("append must not reach a backend that never initialized");
        }

        async fn list_all(&self) -> Result<Vec<ResultRecord>, StoreError> {
            panic!("list_all must not reach a backend that never initialized");
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_uninitialized_reads_empty_and_rejects_writes() {
        let store = ResultStore::new(Box::new(DocumentBackend::in_memory()));
        assert!(!store.is_ready());
        assert!(store.list_all().await.is_empty());
        let result = store.append(7, at(1)).await;
        assert!(matches!(result, Err(StoreError::NotReady(_))));
    }

    #[tokio::test]
    async fn test_failed_initialization_degrades() {
        let mut store = ResultStore::new(Box::new(BrokenBackend));
        assert!(!store.initialize().await);
        assert_eq!(store.failure_reason(), Some("I/O error: read-only volume"));
        assert_eq!(store.state_label(), "broken: unavailable");

        assert!(store.list_all().await.is_empty());
        assert!(matches!(
            store.append(3, at(2)).await,
            Err(StoreError::NotReady(_))
        ));

        // No retry after failure
        assert!(!store.initialize().await);
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let mut store = ResultStore::new(Box::new(DocumentBackend::in_memory()));
        assert!(store.initialize().await);
        store.append(5, at(1)).await.unwrap();
        assert!(store.initialize().await);
        assert_eq!(store.list_all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_append_truncates_to_milliseconds() {
        let store = ResultStore::open(Box::new(DocumentBackend::in_memory())).await;
        let date = at(3) + Duration::nanoseconds(123_456_789);
        store.append(9, date).await.unwrap();
        let records = store.list_all().await;
        assert_eq!(records[0].date, at(3) + Duration::milliseconds(123));
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let store = ResultStore::open(Box::new(DocumentBackend::in_memory())).await;
        store.append(1, at(2)).await.unwrap();
        store.append(2, at(1)).await.unwrap();
        store.append(3, at(3)).await.unwrap();
        let scores: Vec<u32> = store.list_all().await.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![3, 1, 2]);
    }

    #[test]
    fn test_chart_series_ascending() {
        let records = vec![
            ResultRecord { id: 3, score: 30, date: at(3) },
            ResultRecord { id: 1, score: 10, date: at(1) },
            ResultRecord { id: 2, score: 20, date: at(2) },
        ];
        let series = chart_series(&records);
        assert_eq!(series, vec![(at(1), 10), (at(2), 20), (at(3), 30)]);
    }

    #[test]
    fn test_chart_series_empty() {
        assert!(chart_series(&[]).is_empty());
    }

    #[test]
    fn test_debug_shows_state() {
        let store = ResultStore::new(Box::new(DocumentBackend::in_memory()));
        assert_eq!(
            format!("{:?}", store),
            "ResultStore { state: \"document: uninitialized\" }"
        );
    }
}
