use serde::{Deserialize, Serialize};
use std::fmt;

/// Totals at or above this value are classified as high disease activity
pub const HIGH_ACTIVITY_THRESHOLD: u32 = 20;

/// Disease-activity classification of a total score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Low,
    High,
}

impl Activity {
    pub const fn classify(total: u32) -> Self {
        if total >= HIGH_ACTIVITY_THRESHOLD {
            Self::High
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low activity",
            Self::High => "high activity",
        }
    }

    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
