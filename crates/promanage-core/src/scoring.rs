//! Strategic scoring of candidate projects.
//!
//! The engine never hard-codes a value formula. It asks a [`StrategicScorer`]
//! for a number per project, given the completed-project history returned by a
//! [`HistoryProvider`]. Higher scores are more valuable to schedule.
//!
//! [`HistoricalScorer`] is the default formula:
//!
//! ```text
//! urgency  = 1 + urgency_weight / deadline
//! ratio    = revenue / mean(history revenue)        (1 when history is empty)
//! momentum = 1 + history_weight * clamp(ratio - 1, -1, 1)
//! score    = revenue * urgency * momentum
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::project::{HistoryEntry, Project};

/// Turns a project plus historical context into a strategic score.
///
/// Implementations must be pure with respect to their arguments for the
/// duration of one scheduling run.
pub trait StrategicScorer {
    fn score(&self, project: &Project, history: &[HistoryEntry]) -> f64;
}

impl<F> StrategicScorer for F
where
    F: Fn(&Project, &[HistoryEntry]) -> f64,
{
    fn score(&self, project: &Project, history: &[HistoryEntry]) -> f64 {
        self(project, history)
    }
}

/// Source of completed projects used as scoring context.
pub trait HistoryProvider {
    /// Past projects in completion order. May be empty and never contains
    /// active projects.
    fn history(&self) -> Result<Vec<HistoryEntry>>;
}

impl HistoryProvider for Vec<HistoryEntry> {
    fn history(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.clone())
    }
}

/// Weights for the default scoring formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Bonus for short deadlines; a deadline of one day multiplies the
    /// revenue by `1 + urgency_weight`.
    #[serde(default = "default_urgency_weight")]
    pub urgency_weight: f64,
    /// How strongly revenue above or below the historical mean shifts the score.
    #[serde(default = "default_history_weight")]
    pub history_weight: f64,
}

fn default_urgency_weight() -> f64 {
    0.5
}
fn default_history_weight() -> f64 {
    0.25
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            urgency_weight: default_urgency_weight(),
            history_weight: default_history_weight(),
        }
    }
}

impl ScoringWeights {
    /// Weights must be finite and non-negative.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("urgency_weight", self.urgency_weight),
            ("history_weight", self.history_weight),
        ] {
            if !value.is_finite() {
                return Err(format!("{name} must be finite, got {value}"));
            }
            if value < 0.0 {
                return Err(format!("{name} must be non-negative, got {value}"));
            }
        }
        Ok(())
    }
}

/// Default scorer: revenue scaled by deadline urgency and by how the project
/// compares with the revenue of past work.
#[derive(Debug, Clone, Default)]
pub struct HistoricalScorer {
    weights: ScoringWeights,
}

impl HistoricalScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    fn urgency(&self, project: &Project) -> f64 {
        let days = project.deadline.max(1) as f64;
        1.0 + self.weights.urgency_weight / days
    }

    fn momentum(&self, project: &Project, history: &[HistoryEntry]) -> f64 {
        let total: f64 = history.iter().map(|h| h.revenue as f64).sum();
        if history.is_empty() || total <= 0.0 {
            return 1.0;
        }
        let mean = total / history.len() as f64;
        let ratio = project.revenue as f64 / mean;
        1.0 + self.weights.history_weight * (ratio - 1.0).clamp(-1.0, 1.0)
    }
}

impl StrategicScorer for HistoricalScorer {
    fn score(&self, project: &Project, history: &[HistoryEntry]) -> f64 {
        project.revenue as f64 * self.urgency(project) * self.momentum(project, history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn done(id: i64, revenue: i64) -> HistoryEntry {
        let mut p = Project::new(id, format!("past {id}"), 3, revenue);
        p.completed = true;
        p
    }

    #[test]
    fn huge_history_revenue_keeps_score_finite() {
        let scorer = HistoricalScorer::new();
        let history = vec![done(1, i64::MAX), done(2, i64::MAX)];
        let p = Project::new(3, "big", 1, i64::MAX);
        assert!(scorer.score(&p, &history).is_finite());
    }

    #[test]
    fn empty_history_uses_urgency_only() {
        let scorer = HistoricalScorer::new();
        let p = Project::new(1, "a", 2, 1000);
        // 1000 * (1 + 0.5 / 2)
        assert!((scorer.score(&p, &[]) - 1250.0).abs() < 1e-9);
    }

    #[test]
    fn tighter_deadline_scores_higher() {
        let scorer = HistoricalScorer::new();
        let soon = Project::new(1, "soon", 1, 500);
        let later = Project::new(2, "later", 9, 500);
        assert!(scorer.score(&soon, &[]) > scorer.score(&later, &[]));
    }

    #[test]
    fn revenue_above_history_mean_gets_boost() {
        let scorer = HistoricalScorer::new();
        let history = vec![done(10, 100), done(11, 300)];
        let p = Project::new(1, "big", 5, 400);
        let without = scorer.score(&p, &[]);
        let with = scorer.score(&p, &history);
        // ratio = 2, clamped delta = 1 -> momentum 1.25
        assert!((with / without - 1.25).abs() < 1e-9);
    }

    #[test]
    fn revenue_below_history_mean_is_damped() {
        let scorer = HistoricalScorer::new();
        let history = vec![done(10, 1000)];
        let p = Project::new(1, "small", 5, 500);
        assert!(scorer.score(&p, &history) < scorer.score(&p, &[]));
    }

    #[test]
    fn scorer_is_deterministic() {
        let scorer = HistoricalScorer::new();
        let history = vec![done(10, 250), done(11, 750)];
        let p = Project::new(1, "x", 4, 640);
        assert_eq!(scorer.score(&p, &history), scorer.score(&p, &history));
    }

    #[test]
    fn closures_are_scorers() {
        let by_revenue = |p: &Project, _: &[HistoryEntry]| p.revenue as f64;
        let p = Project::new(1, "x", 4, 640);
        assert_eq!(by_revenue.score(&p, &[]), 640.0);
    }

    #[test]
    fn weights_validation() {
        assert!(ScoringWeights::default().validate().is_ok());
        let negative = ScoringWeights {
            urgency_weight: -1.0,
            ..ScoringWeights::default()
        };
        assert!(negative.validate().is_err());
        let nan = ScoringWeights {
            history_weight: f64::NAN,
            ..ScoringWeights::default()
        };
        assert!(nan.validate().is_err());
    }
}
