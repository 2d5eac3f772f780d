use super::engine::{compute_score, ScoreResult};
use super::selection::{SelectionError, SelectionState};
use crate::checklist::Checklist;
use crate::store::{RecordId, ResultStore, StoreError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

/// Outcome of a completed scoring action
#[derive(Debug)]
pub struct CommitOutcome {
    pub result: ScoreResult,
    pub saved: Result<RecordId, StoreError>,
}

/// The active scoring session: a selection bound to one checklist.
///
/// The selection is owned here and never persisted; only committed totals
/// reach the result store.
#[derive(Debug, Clone)]
pub struct ScoringSession {
    checklist: Arc<Checklist>,
    selection: SelectionState,
}

impl ScoringSession {
    pub fn new(checklist: Arc<Checklist>) -> Self {
        let selection = SelectionState::new(checklist.len());
        Self {
            checklist,
            selection,
        }
    }

    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn toggle(&mut self, index: usize) -> Result<bool, SelectionError> {
        self.selection.toggle(index)
    }

    pub fn reset(&mut self) {
        self.selection.reset();
    }

    /// Current score without persisting anything
    pub fn score(&self) -> ScoreResult {
        compute_score(&self.selection, &self.checklist)
    }

    /// Score the current selection and append the total to `store`
    pub async fn commit(&self, store: &ResultStore) -> CommitOutcome {
        self.commit_at(store, Utc::now()).await
    }

    pub async fn commit_at(&self, store: &ResultStore, date: DateTime<Utc>) -> CommitOutcome {
        let result = self.score();
        debug!(
            "Committing score {} ({}) from {} selected entries",
            result.total,
            result.activity,
            result.contributions.len()
        );
        let saved = store.append(result.total, date).await;
        CommitOutcome { result, saved }
    }
}
