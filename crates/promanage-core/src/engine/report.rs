//! Calendar report built from a finished selection.
//!
//! The report is a plain data structure (serializable for `--json` output) and
//! also renders itself as text through `Display`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{sum_revenue, ScheduledProject, Selection, SelectionStrategy, WEEK_DAYS};
use crate::project::HistoryEntry;

const WEEKDAYS: [&str; WEEK_DAYS] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// How pressing a scheduled project is relative to the day it landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyTag {
    /// Deadline equals the day index.
    ExpiresToday,
    /// Deadline lies beyond the first week.
    DeferredFlexible,
    Urgent,
}

impl UrgencyTag {
    pub fn classify(deadline: i64, day_index: usize) -> Self {
        if deadline == day_index as i64 {
            UrgencyTag::ExpiresToday
        } else if deadline > WEEK_DAYS as i64 {
            UrgencyTag::DeferredFlexible
        } else {
            UrgencyTag::Urgent
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyTag::ExpiresToday => "expires today",
            UrgencyTag::DeferredFlexible => "deferred/flexible",
            UrgencyTag::Urgent => "urgent",
        }
    }
}

/// One calendar day of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub day_index: usize,
    pub day_label: String,
    pub project: Option<ScheduledProject>,
    pub revenue: i64,
    pub score: Option<f64>,
    pub tag: Option<UrgencyTag>,
}

impl DayRecord {
    pub fn is_free(&self) -> bool {
        self.project.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendVerdict {
    Better,
    Worse,
    Equal,
}

/// This week's revenue against the historical weekly average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendComparison {
    NoHistory,
    Compared {
        past_week_average: f64,
        this_week_revenue: i64,
        verdict: TrendVerdict,
    },
}

impl TrendComparison {
    /// `past_week_average = total_revenue / max(1, ceil(count / 5))`.
    pub fn evaluate(this_week_revenue: i64, history: &[HistoryEntry]) -> Self {
        if history.is_empty() {
            return TrendComparison::NoHistory;
        }
        let total: f64 = history.iter().map(|h| h.revenue as f64).sum();
        let weeks = history.len().div_ceil(WEEK_DAYS).max(1);
        let past_week_average = total / weeks as f64;

        let current = this_week_revenue as f64;
        let verdict = if current > past_week_average {
            TrendVerdict::Better
        } else if current < past_week_average {
            TrendVerdict::Worse
        } else {
            TrendVerdict::Equal
        };
        TrendComparison::Compared {
            past_week_average,
            this_week_revenue,
            verdict,
        }
    }

    pub fn verdict(&self) -> Option<TrendVerdict> {
        match self {
            TrendComparison::NoHistory => None,
            TrendComparison::Compared { verdict, .. } => Some(*verdict),
        }
    }
}

/// Finished schedule, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub strategy: SelectionStrategy,
    pub days: Vec<DayRecord>,
    pub total_revenue: i64,
    /// Two-week mode only.
    pub comparison: Option<TrendComparison>,
    /// Projects placed in the second week. Two-week mode only.
    pub deferred_count: Option<usize>,
    pub unscheduled_count: usize,
    pub dropped_invalid: usize,
}

impl ScheduleReport {
    pub fn build(selection: &Selection, history: &[HistoryEntry]) -> Self {
        let horizon = selection.horizon();
        let days: Vec<DayRecord> = selection
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                let day_index = i + 1;
                DayRecord {
                    day_index,
                    day_label: day_label(day_index, horizon),
                    project: slot.clone(),
                    revenue: slot.as_ref().map_or(0, |p| p.project.revenue),
                    score: slot.as_ref().map(|p| p.score),
                    tag: slot
                        .as_ref()
                        .map(|p| UrgencyTag::classify(p.project.deadline, day_index)),
                }
            })
            .collect();

        let total_revenue = sum_revenue(days.iter().map(|d| d.revenue));

        let (comparison, deferred_count) = if horizon > WEEK_DAYS {
            let this_week = sum_revenue(days.iter().take(WEEK_DAYS).map(|d| d.revenue));
            let deferred = days.iter().skip(WEEK_DAYS).filter(|d| !d.is_free()).count();
            (Some(TrendComparison::evaluate(this_week, history)), Some(deferred))
        } else {
            (None, None)
        };

        Self {
            strategy: selection.strategy,
            days,
            total_revenue,
            comparison,
            deferred_count,
            unscheduled_count: selection.unscheduled.len(),
            dropped_invalid: selection.dropped_invalid,
        }
    }

    pub fn horizon(&self) -> usize {
        self.days.len()
    }

    pub fn filled_days(&self) -> usize {
        self.days.iter().filter(|d| !d.is_free()).count()
    }
}

/// "Monday".."Friday" for one week, "Week N Monday".. beyond that.
pub fn day_label(day_index: usize, horizon: usize) -> String {
    let i = day_index.saturating_sub(1);
    let name = WEEKDAYS[i % WEEK_DAYS];
    if horizon <= WEEK_DAYS {
        name.to_string()
    } else {
        format!("Week {} {}", i / WEEK_DAYS + 1, name)
    }
}

impl fmt::Display for ScheduleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.strategy.title())?;
        writeln!(f, "-------------------------------------------")?;

        for day in &self.days {
            match &day.project {
                Some(p) => writeln!(
                    f,
                    "{} \u{2192} {} (Deadline: {}, \u{20B9}{}) [Score: {:.2}] [{}]",
                    day.day_label,
                    p.project.title,
                    p.project.deadline,
                    p.project.revenue,
                    p.score,
                    day.tag.map_or("", |t| t.as_str()),
                )?,
                None => writeln!(f, "{} \u{2192} No Project (Optimal Slot Saved)", day.day_label)?,
            }
        }

        writeln!(f)?;
        writeln!(f, "Total Actual Revenue: \u{20B9}{}", self.total_revenue)?;

        match &self.comparison {
            Some(TrendComparison::NoHistory) => {
                writeln!(f, "No historical comparison available.")?;
            }
            Some(TrendComparison::Compared {
                past_week_average,
                this_week_revenue,
                verdict,
            }) => {
                let word = match verdict {
                    TrendVerdict::Better => "better than",
                    TrendVerdict::Worse => "worse than",
                    TrendVerdict::Equal => "equal to",
                };
                writeln!(
                    f,
                    "This week: \u{20B9}{this_week_revenue}, {word} the past weekly average of \u{20B9}{past_week_average:.2}."
                )?;
            }
            None => {}
        }

        match self.deferred_count {
            Some(0) => writeln!(f, "Next week has full open capacity.")?,
            Some(n) => writeln!(f, "{n} project(s) deferred into next week.")?,
            None => {}
        }

        if self.unscheduled_count > 0 {
            writeln!(
                f,
                "{} project(s) could not be scheduled before their deadline.",
                self.unscheduled_count
            )?;
        }
        if self.dropped_invalid > 0 {
            writeln!(
                f,
                "{} project(s) skipped: deadline and revenue must be positive.",
                self.dropped_invalid
            )?;
        }
        Ok(())
    }
}
