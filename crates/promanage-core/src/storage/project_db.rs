//! SQLite-based storage for active and completed projects.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use super::data_dir;
use super::migrations;
use crate::error::{DatabaseError, Result, ValidationError};
use crate::project::{HistoryEntry, Project};
use crate::scoring::HistoryProvider;

const PROJECT_COLUMNS: &str = "id, title, deadline, revenue, completed, created_at, completed_at";

/// Fixed-width timestamps so that text ordering in SQL matches time ordering.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            warn!(value = dt_str, "unparseable timestamp in projects table, using now: {e}");
            Utc::now()
        })
}

/// Build a Project from a row selected with `PROJECT_COLUMNS`.
fn row_to_project(row: &rusqlite::Row) -> Result<Project, rusqlite::Error> {
    let created_at: String = row.get(5)?;
    let completed_at: Option<String> = row.get(6)?;
    Ok(Project {
        id: row.get(0)?,
        title: row.get(1)?,
        deadline: row.get(2)?,
        revenue: row.get(3)?,
        completed: row.get::<_, i32>(4)? != 0,
        created_at: parse_datetime_fallback(&created_at),
        completed_at: completed_at.as_deref().map(parse_datetime_fallback),
    })
}

/// SQLite project store.
pub struct ProjectDb {
    conn: Connection,
}

impl ProjectDb {
    /// Open the project database at `<data dir>/promanage.db`.
    ///
    /// Creates tables if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("promanage.db"))
    }

    /// Open (or create) the database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened project database");
        Self::from_connection(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if migration fails.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // === Project CRUD ===

    /// Insert a new active project and return it with its assigned id.
    ///
    /// Deadline and revenue are stored as given; the scheduling engine
    /// filters out rows where either is not positive.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidValue`] for an empty title, or a
    /// database error if the insert fails.
    pub fn add_project(&self, title: &str, deadline: i64, revenue: i64) -> Result<Project> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "title".to_string(),
                message: "must not be empty".to_string(),
            }
            .into());
        }

        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO projects (title, deadline, revenue, completed, created_at)
             VALUES (?1, ?2, ?3, 0, ?4)",
            params![title, deadline, revenue, format_datetime(&created_at)],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, title, deadline, revenue, "project added");

        Ok(Project {
            id,
            title: title.to_string(),
            deadline,
            revenue,
            completed: false,
            created_at,
            completed_at: None,
        })
    }

    /// Get a project by ID, active or completed.
    pub fn get_project(&self, id: i64) -> Result<Option<Project>> {
        let project = self
            .conn
            .query_row(
                &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
                params![id],
                row_to_project,
            )
            .optional()?;
        Ok(project)
    }

    /// Projects not yet completed, ordered by id.
    pub fn list_active_projects(&self) -> Result<Vec<Project>> {
        self.query_projects(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE completed = 0 ORDER BY id"
        ))
    }

    /// Completed projects, oldest completion first.
    pub fn list_history(&self) -> Result<Vec<HistoryEntry>> {
        self.query_projects(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE completed = 1
             ORDER BY completed_at, id"
        ))
    }

    fn query_projects(&self, sql: &str) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare(sql)?;
        let projects = stmt
            .query_map([], row_to_project)?
            .collect::<Result<Vec<Project>, _>>()?;
        Ok(projects)
    }

    /// Move an active project into history.
    ///
    /// Returns `false` if no active project has this id.
    pub fn complete_project(&self, id: i64) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE projects SET completed = 1, completed_at = ?1
             WHERE id = ?2 AND completed = 0",
            params![format_datetime(&Utc::now()), id],
        )?;
        if changed > 0 {
            info!(id, "project completed");
        }
        Ok(changed > 0)
    }

    /// Delete a project, active or completed.
    ///
    /// Returns `false` if no project has this id.
    pub fn delete_project(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        if changed > 0 {
            info!(id, "project deleted");
        }
        Ok(changed > 0)
    }

    /// Delete every active project. History is kept.
    pub fn reset_active_projects(&self) -> Result<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM projects WHERE completed = 0", [])?;
        info!(removed, "active projects reset");
        Ok(removed)
    }
}

impl HistoryProvider for ProjectDb {
    fn history(&self) -> Result<Vec<HistoryEntry>> {
        self.list_history()
    }
}
