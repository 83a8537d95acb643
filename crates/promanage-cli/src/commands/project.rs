//! Project management commands for CLI.

use clap::Subcommand;
use promanage_core::{Project, ProjectDb, ValidationError};

use super::CmdResult;

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Add a new active project
    Add {
        /// Project title
        title: String,
        /// Days from today until the project is due
        #[arg(long, allow_negative_numbers = true)]
        deadline: i64,
        /// Expected revenue
        #[arg(long, allow_negative_numbers = true)]
        revenue: i64,
    },
    /// List active projects
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List completed projects
    History {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark an active project as completed
    Complete {
        /// Project ID
        id: i64,
    },
    /// Delete a project
    Delete {
        /// Project ID
        id: i64,
    },
    /// Delete all active projects (history is kept)
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

/// One line per project, as shown in listings and the menu.
pub fn format_project_line(p: &Project) -> String {
    format!(
        "{} | {} | Deadline: {} | Revenue: \u{20B9}{}",
        p.id, p.title, p.deadline, p.revenue
    )
}

fn print_projects(heading: &str, projects: &[Project], json: bool) -> CmdResult {
    if json {
        println!("{}", serde_json::to_string_pretty(projects)?);
        return Ok(());
    }
    println!("{heading}");
    if projects.is_empty() {
        println!("(none)");
    }
    for p in projects {
        println!("{}", format_project_line(p));
    }
    Ok(())
}

pub fn run(action: ProjectAction) -> CmdResult {
    let db = ProjectDb::open()?;

    match action {
        ProjectAction::Add {
            title,
            deadline,
            revenue,
        } => {
            let project = db.add_project(&title, deadline, revenue)?;
            println!("Project added: {}", project.id);
            println!("{}", format_project_line(&project));
        }
        ProjectAction::List { json } => {
            print_projects("PROJECT LIST", &db.list_active_projects()?, json)?;
        }
        ProjectAction::History { json } => {
            print_projects("COMPLETED PROJECTS", &db.list_history()?, json)?;
        }
        ProjectAction::Complete { id } => {
            if !db.complete_project(id)? {
                return Err(ValidationError::ProjectNotFound(id).into());
            }
            println!("Project {id} marked as completed");
        }
        ProjectAction::Delete { id } => {
            if !db.delete_project(id)? {
                return Err(ValidationError::ProjectNotFound(id).into());
            }
            println!("Project {id} deleted");
        }
        ProjectAction::Reset { yes } => {
            if !yes {
                return Err("refusing to delete all active projects without --yes".into());
            }
            let removed = db.reset_active_projects()?;
            println!("Deleted {removed} active project(s)");
        }
    }
    Ok(())
}
