//! Predictive scheduling engine.
//!
//! This module turns the active project list into a day-by-day schedule:
//! - Drops candidates with a non-positive deadline or revenue
//! - Scores every remaining candidate once against the history snapshot
//! - Selects projects with one of two [`SelectionStrategy`] variants
//! - Builds a [`ScheduleReport`] from the resulting slot assignment
//!
//! The engine holds no state between runs. Scorer and history are passed in
//! at call time and treated as immutable for the duration of the run.

mod backward;
mod filter;
mod heap;
mod report;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, ScoringError};
use crate::project::{HistoryEntry, Project};
use crate::scoring::{HistoryProvider, StrategicScorer};

pub use backward::SlotBoard;
pub use filter::{filter_candidates, FilterOutcome};
pub use heap::{Admission, SelectionPool};
pub use report::{DayRecord, ScheduleReport, TrendComparison, TrendVerdict, UrgencyTag};

/// Days in the single-week horizon.
pub const WEEK_DAYS: usize = 5;

/// Days in the two-week horizon.
pub const TWO_WEEK_DAYS: usize = 10;

/// A candidate together with the score computed for it in this run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledProject {
    pub project: Project,
    pub score: f64,
}

/// How candidates are chosen and laid onto days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Single week. Keeps the best candidates in a min-ordered pool whose
    /// capacity is bounded by each candidate's deadline.
    #[default]
    HeapBounded,
    /// Two weeks. Places candidates in score order on the latest free day at
    /// or before their deadline.
    BackwardSlotting,
}

impl SelectionStrategy {
    pub const ALL: [SelectionStrategy; 2] = [
        SelectionStrategy::HeapBounded,
        SelectionStrategy::BackwardSlotting,
    ];

    /// Number of schedulable days.
    pub fn horizon(&self) -> usize {
        match self {
            SelectionStrategy::HeapBounded => WEEK_DAYS,
            SelectionStrategy::BackwardSlotting => TWO_WEEK_DAYS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionStrategy::HeapBounded => "heap_bounded",
            SelectionStrategy::BackwardSlotting => "backward_slotting",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SelectionStrategy::HeapBounded => "[OPTIMAL HEAP] PREDICTIVE WEEKLY SCHEDULE",
            SelectionStrategy::BackwardSlotting => {
                "[BACKWARD SLOTTING] PREDICTIVE TWO-WEEK SCHEDULE"
            }
        }
    }

    fn place(
        &self,
        candidates: Vec<ScheduledProject>,
    ) -> (Vec<Option<ScheduledProject>>, Vec<ScheduledProject>) {
        match self {
            SelectionStrategy::HeapBounded => heap::select(candidates, self.horizon()),
            SelectionStrategy::BackwardSlotting => backward::select(candidates, self.horizon()),
        }
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "heap_bounded" | "heap-bounded" | "heap" | "week" => Ok(SelectionStrategy::HeapBounded),
            "backward_slotting" | "backward-slotting" | "backward" | "two-week" | "two_week" => {
                Ok(SelectionStrategy::BackwardSlotting)
            }
            other => Err(format!("unknown selection strategy: {other}")),
        }
    }
}

/// Outcome of a selection run: the slot array plus diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub strategy: SelectionStrategy,
    /// `slots[0]` is day 1. Length equals the strategy horizon.
    pub slots: Vec<Option<ScheduledProject>>,
    /// Valid candidates that did not fit, in the order they were rejected.
    pub unscheduled: Vec<ScheduledProject>,
    /// Candidates removed by the filter before scoring.
    pub dropped_invalid: usize,
}

impl Selection {
    pub fn horizon(&self) -> usize {
        self.slots.len()
    }

    /// Filled slots as `(day_index, project)`, day indices starting at 1.
    pub fn assigned(&self) -> impl Iterator<Item = (usize, &ScheduledProject)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|p| (i + 1, p)))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_revenue(&self) -> i64 {
        sum_revenue(self.slots.iter().flatten().map(|p| p.project.revenue))
    }

    /// Day a project was placed on, if it was selected.
    pub fn day_of(&self, project_id: i64) -> Option<usize> {
        self.assigned()
            .find(|(_, p)| p.project.id == project_id)
            .map(|(day, _)| day)
    }
}

/// Stateless scheduling engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchedulingEngine {
    strategy: SelectionStrategy,
}

impl SchedulingEngine {
    /// Create an engine with the default strategy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a specific strategy
    pub fn with_strategy(strategy: SelectionStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> SelectionStrategy {
        self.strategy
    }

    /// Select projects from `projects` against a fixed history snapshot.
    ///
    /// # Errors
    /// Returns [`ScoringError::NonFinite`] if the scorer yields NaN or an
    /// infinity for any valid candidate.
    pub fn select(
        &self,
        projects: &[Project],
        scorer: &dyn StrategicScorer,
        history: &[HistoryEntry],
    ) -> Result<Selection, ScoringError> {
        let FilterOutcome { valid, dropped } = filter_candidates(projects);
        if dropped > 0 {
            debug!(dropped, "dropped candidates with non-positive deadline or revenue");
        }

        let scored = score_candidates(valid, scorer, history)?;
        let (slots, unscheduled) = self.strategy.place(scored);

        let selection = Selection {
            strategy: self.strategy,
            slots,
            unscheduled,
            dropped_invalid: dropped,
        };
        info!(
            strategy = %self.strategy,
            selected = selection.len(),
            unscheduled = selection.unscheduled.len(),
            revenue = selection.total_revenue(),
            "selection complete"
        );
        Ok(selection)
    }

    /// Fetch history once, select, and build the report.
    ///
    /// # Errors
    /// Propagates history provider failures and scorer contract violations.
    pub fn run(
        &self,
        projects: &[Project],
        scorer: &dyn StrategicScorer,
        history: &dyn HistoryProvider,
    ) -> Result<ScheduleReport> {
        let history = history.history()?;
        debug!(history = history.len(), candidates = projects.len(), "scheduling run started");
        let selection = self.select(projects, scorer, &history)?;
        Ok(ScheduleReport::build(&selection, &history))
    }
}

/// Revenue total that saturates at `i64::MAX` instead of overflowing.
pub(crate) fn sum_revenue(revenues: impl IntoIterator<Item = i64>) -> i64 {
    revenues.into_iter().fold(0, i64::saturating_add)
}

/// Score each candidate exactly once so every comparison in the run sees the
/// same value.
fn score_candidates(
    candidates: Vec<Project>,
    scorer: &dyn StrategicScorer,
    history: &[HistoryEntry],
) -> Result<Vec<ScheduledProject>, ScoringError> {
    candidates
        .into_iter()
        .map(|project| {
            let score = scorer.score(&project, history);
            if !score.is_finite() {
                return Err(ScoringError::NonFinite {
                    project_id: project.id,
                    title: project.title.clone(),
                    score,
                });
            }
            debug!(id = project.id, title = %project.title, score, "scored candidate");
            Ok(ScheduledProject { project, score })
        })
        .collect()
}
