//! Tracker repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide keyed insert/lookup/list APIs over `users`, `projects` and
//!   `work_entries`.
//! - Translate SQLite constraint failures into semantic errors.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate field limits before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Work entry reads always resolve their user and project.

use crate::db::DbError;
use crate::model::project::{Project, ProjectId};
use crate::model::user::{validate_username, User, UserId};
use crate::model::validation::ValidationError;
use crate::model::work_entry::{NewWorkEntry, WorkEntry, WorkEntryId};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{ffi, params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DATE_FORMAT: &str = "%Y-%m-%d";

const WORK_ENTRY_SELECT_SQL: &str = "SELECT
    e.id AS entry_id,
    e.date AS date,
    e.hours_worked AS hours_worked,
    e.description AS description,
    u.id AS user_id,
    u.username AS username,
    p.id AS project_id,
    p.name AS project_name
FROM work_entries e
INNER JOIN users u ON u.id = e.user_id
INNER JOIN projects p ON p.id = e.project_id";

pub type RepoResult<T> = Result<T, RepoError>;

/// Unique key that an insert collided with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateKey {
    Username(String),
    ProjectId(ProjectId),
    ProjectName(String),
}

impl Display for DuplicateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Username(name) => write!(f, "username `{name}` already exists"),
            Self::ProjectId(id) => write!(f, "project id `{id}` already exists"),
            Self::ProjectName(name) => write!(f, "project name `{name}` already exists"),
        }
    }
}

/// Repository error for tracker persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    Duplicate(DuplicateKey),
    UnknownUser(UserId),
    UnknownProject(ProjectId),
    MissingRequiredTable(&'static str),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Duplicate(key) => write!(f, "{key}"),
            Self::UnknownUser(id) => write!(f, "user not found: {id}"),
            Self::UnknownProject(id) => write!(f, "project not found: {id}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; run migrations first")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted tracker data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Both ends count. A reversed range contains nothing.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Filter options for listing work entries. Empty filter matches all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkEntryFilter {
    pub user_id: Option<UserId>,
    pub project_id: Option<ProjectId>,
    pub date_range: Option<DateRange>,
}

impl WorkEntryFilter {
    pub fn by_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    pub fn by_project(project_id: ProjectId) -> Self {
        Self {
            project_id: Some(project_id),
            ..Self::default()
        }
    }

    pub fn by_date_range(range: DateRange) -> Self {
        Self {
            date_range: Some(range),
            ..Self::default()
        }
    }

    /// Evaluates the filter against stored keys of one entry.
    pub fn matches(&self, user_id: UserId, project_id: &ProjectId, date: NaiveDate) -> bool {
        self.user_id.map_or(true, |expected| expected == user_id)
            && self
                .project_id
                .as_ref()
                .map_or(true, |expected| expected == project_id)
            && self.date_range.map_or(true, |range| range.contains(date))
    }
}

/// Persistence interface the tracker is built on.
///
/// Lists are returned in insertion order; work entries in
/// `date ASC, id ASC` order.
pub trait TrackerRepository {
    fn create_user(&self, username: &str) -> RepoResult<User>;
    fn find_user_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    fn list_users(&self) -> RepoResult<Vec<User>>;
    fn create_project(&self, project: &Project) -> RepoResult<()>;
    fn find_project(&self, id: &ProjectId) -> RepoResult<Option<Project>>;
    fn list_projects(&self) -> RepoResult<Vec<Project>>;
    fn create_work_entry(&self, entry: &NewWorkEntry) -> RepoResult<WorkEntryId>;
    fn list_work_entries(&self, filter: &WorkEntryFilter) -> RepoResult<Vec<WorkEntry>>;
}

/// SQLite-backed tracker repository.
pub struct SqliteTrackerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTrackerRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when the schema has not been applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        for table in ["users", "projects", "work_entries"] {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }

    fn exists(&self, sql: &str, key: &dyn rusqlite::ToSql) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(sql, [key], |row| row.get(0))?;
        Ok(exists == 1)
    }

    fn user_id_exists(&self, id: UserId) -> RepoResult<bool> {
        self.exists("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1);", &id.0)
    }

    fn project_id_exists(&self, id: &ProjectId) -> RepoResult<bool> {
        self.exists(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE id = ?1);",
            &id.as_str(),
        )
    }
}

impl TrackerRepository for SqliteTrackerRepository<'_> {
    fn create_user(&self, username: &str) -> RepoResult<User> {
        validate_username(username)?;

        match self
            .conn
            .execute("INSERT INTO users (username) VALUES (?1);", [username])
        {
            Ok(_) => Ok(User {
                id: UserId(self.conn.last_insert_rowid()),
                username: username.to_string(),
            }),
            Err(err) if is_unique_violation(&err) => Err(RepoError::Duplicate(
                DuplicateKey::Username(username.to_string()),
            )),
            Err(err) => Err(err.into()),
        }
    }

    fn find_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, username FROM users WHERE username = ?1;")?;
        let mut rows = stmt.query([username])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, username FROM users ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }

    fn create_project(&self, project: &Project) -> RepoResult<()> {
        project.validate()?;

        match self.conn.execute(
            "INSERT INTO projects (id, name) VALUES (?1, ?2);",
            params![project.id.as_str(), project.name.as_str()],
        ) {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                let key = if self.project_id_exists(&project.id)? {
                    DuplicateKey::ProjectId(project.id.clone())
                } else {
                    DuplicateKey::ProjectName(project.name.clone())
                };
                Err(RepoError::Duplicate(key))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn find_project(&self, id: &ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM projects WHERE id = ?1;")?;
        let mut rows = stmt.query([id.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }
        Ok(None)
    }

    fn list_projects(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM projects ORDER BY rowid ASC;")?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn create_work_entry(&self, entry: &NewWorkEntry) -> RepoResult<WorkEntryId> {
        entry.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO work_entries (
                user_id,
                date,
                project_id,
                hours_worked,
                description
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                entry.user_id.0,
                entry.date.format(DATE_FORMAT).to_string(),
                entry.project_id.as_str(),
                entry.hours_worked,
                entry.description.as_str(),
            ],
        );

        match inserted {
            Ok(_) => Ok(WorkEntryId(self.conn.last_insert_rowid())),
            Err(err) if is_foreign_key_violation(&err) => {
                if !self.user_id_exists(entry.user_id)? {
                    Err(RepoError::UnknownUser(entry.user_id))
                } else {
                    Err(RepoError::UnknownProject(entry.project_id.clone()))
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    fn list_work_entries(&self, filter: &WorkEntryFilter) -> RepoResult<Vec<WorkEntry>> {
        let mut sql = format!("{WORK_ENTRY_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(user_id) = filter.user_id {
            sql.push_str(" AND e.user_id = ?");
            bind_values.push(Value::Integer(user_id.0));
        }

        if let Some(project_id) = filter.project_id.as_ref() {
            sql.push_str(" AND e.project_id = ?");
            bind_values.push(Value::Text(project_id.as_str().to_string()));
        }

        if let Some(range) = filter.date_range {
            // ISO dates compare correctly as text.
            sql.push_str(" AND e.date >= ? AND e.date <= ?");
            bind_values.push(Value::Text(range.start.format(DATE_FORMAT).to_string()));
            bind_values.push(Value::Text(range.end.format(DATE_FORMAT).to_string()));
        }

        sql.push_str(" ORDER BY e.date ASC, e.id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_work_entry_row(row)?);
        }
        Ok(entries)
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    Ok(User {
        id: UserId(row.get("id")?),
        username: row.get("username")?,
    })
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    Ok(Project {
        id: ProjectId::new(row.get::<_, String>("id")?),
        name: row.get("name")?,
    })
}

fn parse_work_entry_row(row: &Row<'_>) -> RepoResult<WorkEntry> {
    let date_text: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date value `{date_text}` in work_entries.date"
        ))
    })?;

    let hours_worked: f64 = row.get("hours_worked")?;
    if !hours_worked.is_finite() {
        return Err(RepoError::InvalidData(format!(
            "invalid hours value `{hours_worked}` in work_entries.hours_worked"
        )));
    }

    Ok(WorkEntry {
        id: WorkEntryId(row.get("entry_id")?),
        user: User {
            id: UserId(row.get("user_id")?),
            username: row.get("username")?,
        },
        date,
        project: Project {
            id: ProjectId::new(row.get::<_, String>("project_id")?),
            name: row.get("project_name")?,
        },
        hours_worked,
        description: row.get("description")?,
    })
}

fn constraint_extended_code(err: &rusqlite::Error) -> Option<i32> {
    err.sqlite_error()
        .filter(|failure| failure.code == ffi::ErrorCode::ConstraintViolation)
        .map(|failure| failure.extended_code)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        constraint_extended_code(err),
        Some(ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
    )
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    constraint_extended_code(err) == Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

#[cfg(test)]
mod tests {
    use super::{DateRange, WorkEntryFilter};
    use crate::model::project::ProjectId;
    use crate::model::user::UserId;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let range = DateRange::new(day(8), day(14));
        assert!(range.contains(day(8)));
        assert!(range.contains(day(14)));
        assert!(!range.contains(day(7)));
        assert!(!range.contains(day(15)));
    }

    #[test]
    fn reversed_date_range_contains_nothing() {
        let range = DateRange::new(day(14), day(8));
        assert!(!range.contains(day(10)));
        assert!(!range.contains(day(8)));
    }

    #[test]
    fn filter_combines_all_set_conditions() {
        let filter = WorkEntryFilter {
            user_id: Some(UserId(1)),
            project_id: Some(ProjectId::new("P1")),
            date_range: Some(DateRange::new(day(1), day(31))),
        };
        assert!(filter.matches(UserId(1), &ProjectId::new("P1"), day(10)));
        assert!(!filter.matches(UserId(2), &ProjectId::new("P1"), day(10)));
        assert!(!filter.matches(UserId(1), &ProjectId::new("P2"), day(10)));
        assert!(WorkEntryFilter::default().matches(UserId(9), &ProjectId::new("X"), day(3)));
    }
}
