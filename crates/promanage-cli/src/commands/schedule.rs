//! Schedule generation commands for CLI.

use clap::Subcommand;
use promanage_core::{Config, ProjectDb, ScheduleReport, SchedulingEngine, SelectionStrategy};

use super::CmdResult;

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Select and lay out active projects over the planning horizon
    Generate {
        /// heap_bounded (one week) or backward_slotting (two weeks);
        /// defaults to `schedule.strategy` from config
        #[arg(long)]
        strategy: Option<SelectionStrategy>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Run one scheduling pass over the active projects in `db`.
pub fn generate(
    db: &ProjectDb,
    config: &Config,
    strategy: Option<SelectionStrategy>,
) -> Result<ScheduleReport, promanage_core::CoreError> {
    let engine = SchedulingEngine::with_strategy(strategy.unwrap_or(config.schedule.strategy));
    let projects = db.list_active_projects()?;
    engine.run(&projects, &config.scorer(), db)
}

pub fn run(action: ScheduleAction) -> CmdResult {
    match action {
        ScheduleAction::Generate { strategy, json } => {
            let config = Config::load()?;
            let db = ProjectDb::open()?;
            let report = generate(&db, &config, strategy)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }
    }
    Ok(())
}
