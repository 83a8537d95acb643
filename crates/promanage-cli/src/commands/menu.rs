//! Interactive numbered menu over stdin/stdout.

use std::io::{self, BufRead, Write};

use promanage_core::{Config, ProjectDb};
use tracing::debug;

use super::project::format_project_line;
use super::schedule::generate;
use super::CmdResult;

const MENU: &str = "
 ProManage Solutions
1. Add Project
2. View Projects
3. Generate Weekly Schedule
4. Mark Project as Completed
5. Delete a Project
6. Reset (Delete All Projects)
7. Exit";

pub fn run() -> CmdResult {
    let db = ProjectDb::open()?;
    let config = Config::load()?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_with(&db, &config, &mut stdin.lock(), &mut stdout)
}

/// Drive the menu until option 7 or end of input.
pub fn run_with<R: BufRead, W: Write>(
    db: &ProjectDb,
    config: &Config,
    input: &mut R,
    out: &mut W,
) -> CmdResult {
    loop {
        writeln!(out, "{MENU}")?;
        let Some(choice) = prompt(input, out, "Choose option: ")? else {
            debug!("menu input closed");
            return Ok(());
        };

        match choice.parse::<u32>() {
            Ok(1) => add(db, input, out)?,
            Ok(2) => list(db, out, "PROJECT LIST")?,
            Ok(3) => match generate(db, config, None) {
                Ok(report) => write!(out, "\n{report}")?,
                Err(e) => writeln!(out, "Could not generate schedule: {e}")?,
            },
            Ok(4) => {
                list(db, out, "PROJECT LIST FOR COMPLETION")?;
                if let Some(id) = read_id(input, out, "Enter Project ID to complete: ")? {
                    if db.complete_project(id)? {
                        writeln!(out, "Project {id} marked as completed.")?;
                    } else {
                        writeln!(out, "No active project with ID {id}.")?;
                    }
                }
            }
            Ok(5) => {
                list(db, out, "PROJECT LIST FOR DELETION")?;
                if let Some(id) = read_id(input, out, "Enter Project ID to delete: ")? {
                    if db.delete_project(id)? {
                        writeln!(out, "Project {id} deleted.")?;
                    } else {
                        writeln!(out, "No project with ID {id}.")?;
                    }
                }
            }
            Ok(6) => {
                let answer = prompt(
                    input,
                    out,
                    "[WARNING] Are you sure you want to delete ALL active projects? (Type 'yes' to confirm): ",
                )?
                .unwrap_or_default();
                if answer.eq_ignore_ascii_case("yes") || answer.eq_ignore_ascii_case("y") {
                    let removed = db.reset_active_projects()?;
                    writeln!(out, "Deleted {removed} active project(s).")?;
                } else {
                    writeln!(out, "Reset cancelled.")?;
                }
            }
            Ok(7) => {
                writeln!(out, "Exiting system...")?;
                return Ok(());
            }
            _ => writeln!(out, " Invalid option!")?,
        }
    }
}

/// Print `label`, read one trimmed line. `None` on end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> io::Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn read_number<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> io::Result<Option<i64>> {
    let Some(raw) = prompt(input, out, label)? else {
        return Ok(None);
    };
    match raw.parse::<i64>() {
        Ok(n) => Ok(Some(n)),
        Err(_) => {
            writeln!(out, "Invalid number: {raw}")?;
            Ok(None)
        }
    }
}

fn read_id<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> io::Result<Option<i64>> {
    writeln!(out, "--------------------------------")?;
    read_number(input, out, label)
}

fn add<R: BufRead, W: Write>(db: &ProjectDb, input: &mut R, out: &mut W) -> CmdResult {
    let Some(title) = prompt(input, out, "Enter project title: ")? else {
        return Ok(());
    };
    let Some(deadline) = read_number(input, out, "Enter deadline  : ")? else {
        return Ok(());
    };
    let Some(revenue) = read_number(input, out, "Enter revenue: ")? else {
        return Ok(());
    };

    match db.add_project(&title, deadline, revenue) {
        Ok(project) => writeln!(out, "Project added with ID {}.", project.id)?,
        Err(e) => writeln!(out, "Could not add project: {e}")?,
    }
    Ok(())
}

fn list<W: Write>(db: &ProjectDb, out: &mut W, heading: &str) -> CmdResult {
    writeln!(out, "\n{heading}")?;
    for p in db.list_active_projects()? {
        writeln!(out, "{}", format_project_line(&p))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn drive(db: &ProjectDb, script: &str) -> String {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        run_with(db, &Config::default(), &mut input, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn add_then_view() {
        let db = ProjectDb::open_memory().unwrap();
        let out = drive(&db, "1\nLogo Design\n2\n500\n2\n7\n");
        assert!(out.contains("Project added with ID 1."));
        assert!(out.contains("1 | Logo Design | Deadline: 2 | Revenue: \u{20B9}500"));
        assert!(out.contains("Exiting system..."));
        assert_eq!(db.list_active_projects().unwrap().len(), 1);
    }

    #[test]
    fn invalid_option_loops_and_eof_exits() {
        let db = ProjectDb::open_memory().unwrap();
        let out = drive(&db, "9\nabc\n");
        assert_eq!(out.matches(" Invalid option!").count(), 2);
        assert!(!out.contains("Exiting system..."));
    }

    #[test]
    fn generate_prints_weekly_report() {
        let db = ProjectDb::open_memory().unwrap();
        db.add_project("A", 2, 100).unwrap();
        db.add_project("B", 1, 19).unwrap();
        let out = drive(&db, "3\n7\n");
        assert!(out.contains("[OPTIMAL HEAP] PREDICTIVE WEEKLY SCHEDULE"));
        assert!(out.contains("Total Actual Revenue: \u{20B9}119"));
    }

    #[test]
    fn complete_and_delete_by_id() {
        let db = ProjectDb::open_memory().unwrap();
        let a = db.add_project("A", 2, 100).unwrap();
        let b = db.add_project("B", 3, 200).unwrap();
        let script = format!("4\n{}\n5\n{}\n5\n999\n7\n", a.id, b.id);
        let out = drive(&db, &script);
        assert!(out.contains(&format!("Project {} marked as completed.", a.id)));
        assert!(out.contains(&format!("Project {} deleted.", b.id)));
        assert!(out.contains("No project with ID 999."));
        assert!(db.list_active_projects().unwrap().is_empty());
        assert_eq!(db.list_history().unwrap().len(), 1);
    }

    #[test]
    fn reset_requires_confirmation() {
        let db = ProjectDb::open_memory().unwrap();
        db.add_project("A", 2, 100).unwrap();

        let out = drive(&db, "6\nno\n7\n");
        assert!(out.contains("Reset cancelled."));
        assert_eq!(db.list_active_projects().unwrap().len(), 1);

        let out = drive(&db, "6\nY\n7\n");
        assert!(out.contains("Deleted 1 active project(s)."));
        assert!(db.list_active_projects().unwrap().is_empty());
    }

    #[test]
    fn bad_number_returns_to_menu() {
        let db = ProjectDb::open_memory().unwrap();
        let out = drive(&db, "1\nX\nsoon\n7\n");
        assert!(out.contains("Invalid number: soon"));
        assert!(db.list_active_projects().unwrap().is_empty());
    }
}
