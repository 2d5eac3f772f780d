pub mod activity;
pub mod engine;
pub mod selection;
pub mod session;

pub use activity::{Activity, HIGH_ACTIVITY_THRESHOLD};
pub use engine::{compute_score, Contribution, ScoreResult};
pub use selection::{SelectionError, SelectionState};
pub use session::{CommitOutcome, ScoringSession};
