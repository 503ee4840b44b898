// ── Per-slot request state ──

use serde::Serialize;
use strum::Display;

/// Independent request-state slots tracked by a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    /// List and stats fetches.
    Load,
    Scan,
    /// Delete and clear-all.
    Mutate,
}

/// `Idle -> Pending -> (Success | Failed)`. Starting a new operation moves
/// a slot back to `Pending` from any state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Success,
    Failed {
        reason: String,
    },
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Failure reason, if the last operation in this slot failed.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Failed { reason } => Some(reason),
            _ => None,
        }
    }

    pub(crate) fn failed(reason: impl ToString) -> Self {
        Self::Failed {
            reason: reason.to_string(),
        }
    }
}
