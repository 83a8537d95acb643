//! # ProManage Core Library
//!
//! This library provides the business logic behind the ProManage project
//! scheduler. Every operation is available through the `promanage` CLI, which
//! is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Project store**: SQLite-backed records for active and completed projects
//! - **Scheduling engine**: filters candidates, scores them against history and
//!   selects the most valuable set that fits the day slots before each deadline
//! - **Reports**: per-day calendar, revenue totals and week-over-week trend
//!
//! ## Key Components
//!
//! - [`SchedulingEngine`]: stateless engine value that runs one selection
//! - [`SelectionStrategy`]: heap-bounded single week or backward-slotted two weeks
//! - [`StrategicScorer`] / [`HistoryProvider`]: collaborators injected per run
//! - [`ProjectDb`]: project persistence
//! - [`Config`]: application configuration management

pub mod engine;
pub mod error;
pub mod logging;
pub mod project;
pub mod scoring;
pub mod storage;

pub use engine::{
    filter_candidates, FilterOutcome, ScheduleReport, ScheduledProject, SchedulingEngine,
    Selection, SelectionStrategy, TrendVerdict, UrgencyTag,
};
pub use error::{ConfigError, CoreError, DatabaseError, ScoringError, ValidationError};
pub use project::{HistoryEntry, Project};
pub use scoring::{HistoricalScorer, HistoryProvider, ScoringWeights, StrategicScorer};
pub use storage::{Config, ProjectDb};
