//! Project records shared by the store and the scheduling engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A candidate unit of work.
///
/// `deadline` counts days from today and `revenue` is a monetary amount.
/// Both are stored as entered; the engine drops rows where either is not
/// positive before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub deadline: i64,
    pub revenue: i64,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A past project used as scoring context. Always has `completed = true`.
pub type HistoryEntry = Project;

impl Project {
    /// Create an active project record.
    pub fn new(id: i64, title: impl Into<String>, deadline: i64, revenue: i64) -> Self {
        Self {
            id,
            title: title.into(),
            deadline,
            revenue,
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Whether the record may enter the scheduling engine.
    pub fn is_schedulable(&self) -> bool {
        self.deadline > 0 && self.revenue > 0
    }

    /// `min(deadline, horizon)`, never below zero.
    pub fn effective_deadline(&self, horizon: usize) -> usize {
        usize::try_from(self.deadline.max(0))
            .unwrap_or(usize::MAX)
            .min(horizon)
    }
}
