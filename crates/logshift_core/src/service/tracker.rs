//! Hour tracker use-case service.
//!
//! # Responsibility
//! - Single gateway to the tracker repository for CRUD operations.
//! - Aggregate logged hours by user, project and date range.
//! - Hand a user's entries to the CSV exporter.
//!
//! # Invariants
//! - Filtering is by stored key (`UserId`, `ProjectId`), never by value.
//! - No bounds validation of `hours_worked` happens here; callers parse
//!   input through `crate::input` first.
//! - Totals over an empty selection are `0.0`.

use crate::export::csv_export::{CsvExporter, ExportError, ExportSummary};
use crate::model::project::{Project, ProjectId};
use crate::model::user::User;
use crate::model::validation::ValidationError;
use crate::model::work_entry::{NewWorkEntry, WorkEntry};
use crate::repo::tracker_repo::{
    DateRange, DuplicateKey, RepoError, TrackerRepository, WorkEntryFilter,
};
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Service error for tracker use-cases.
#[derive(Debug)]
pub enum TrackerError {
    /// Insert collided with an existing unique key.
    Duplicate(DuplicateKey),
    /// Field limits rejected the input.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// CSV export failure.
    Export(ExportError),
}

impl TrackerError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }
}

impl Display for TrackerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duplicate(key) => write!(f, "{key}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TrackerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Duplicate(_) => None,
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Export(err) => Some(err),
        }
    }
}

impl From<RepoError> for TrackerError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Duplicate(key) => Self::Duplicate(key),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ExportError> for TrackerError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

/// Tracker facade over an injected repository implementation.
pub struct Tracker<R: TrackerRepository> {
    repo: R,
}

impl<R: TrackerRepository> Tracker<R> {
    /// Creates a tracker using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds a user with a unique username.
    ///
    /// # Errors
    /// - `Duplicate(DuplicateKey::Username)` when the username is taken.
    /// - `Validation` when the username is blank or too long.
    /// - `Repo` for storage failures.
    pub fn add_user(&self, username: &str) -> TrackerResult<User> {
        let result = self.repo.create_user(username).map_err(TrackerError::from);
        match &result {
            Ok(user) => info!(
                "event=user_add module=tracker status=ok user_id={}",
                user.id
            ),
            Err(err) => warn!(
                "event=user_add module=tracker status=error error_code={}",
                error_code(err)
            ),
        }
        result
    }

    /// Looks up a user by exact, case-sensitive username.
    pub fn get_user(&self, username: &str) -> TrackerResult<Option<User>> {
        Ok(self.repo.find_user_by_username(username)?)
    }

    /// Returns all users in insertion order.
    pub fn get_users(&self) -> TrackerResult<Vec<User>> {
        Ok(self.repo.list_users()?)
    }

    /// Adds a project; id and name are unique independently.
    ///
    /// When both collide the id is reported.
    pub fn add_project(&self, id: &str, name: &str) -> TrackerResult<Project> {
        let project = Project::new(id, name);
        let result = self
            .repo
            .create_project(&project)
            .map(|()| project)
            .map_err(TrackerError::from);
        match &result {
            Ok(project) => info!(
                "event=project_add module=tracker status=ok project_id={}",
                project.id
            ),
            Err(err) => warn!(
                "event=project_add module=tracker status=error error_code={}",
                error_code(err)
            ),
        }
        result
    }

    /// Looks up a project by exact, case-sensitive id.
    pub fn get_project(&self, id: &str) -> TrackerResult<Option<Project>> {
        Ok(self.repo.find_project(&ProjectId::new(id))?)
    }

    /// Returns all projects in insertion order.
    pub fn get_projects(&self) -> TrackerResult<Vec<Project>> {
        Ok(self.repo.list_projects()?)
    }

    /// Appends a work entry for an already resolved user and project.
    ///
    /// Referential integrity is left to the repository: unknown keys surface
    /// as `Repo(RepoError::UnknownUser | RepoError::UnknownProject)`.
    pub fn add_work_entry(
        &self,
        user: &User,
        date: NaiveDate,
        project: &Project,
        hours_worked: f64,
        description: &str,
    ) -> TrackerResult<WorkEntry> {
        let new_entry = NewWorkEntry {
            user_id: user.id,
            date,
            project_id: project.id.clone(),
            hours_worked,
            description: description.to_string(),
        };

        let id = match self.repo.create_work_entry(&new_entry) {
            Ok(id) => id,
            Err(err) => {
                let err = TrackerError::from(err);
                warn!(
                    "event=work_entry_add module=tracker status=error error_code={}",
                    error_code(&err)
                );
                return Err(err);
            }
        };
        info!(
            "event=work_entry_add module=tracker status=ok entry_id={} user_id={} project_id={}",
            id, user.id, project.id
        );

        Ok(WorkEntry {
            id,
            user: user.clone(),
            date,
            project: project.clone(),
            hours_worked,
            description: new_entry.description,
        })
    }

    /// Sum of hours logged by `user`.
    pub fn total_hours_by_user(&self, user: &User) -> TrackerResult<f64> {
        self.total_hours(&WorkEntryFilter::by_user(user.id))
    }

    /// Sum of hours logged against `project`.
    pub fn total_hours_by_project(&self, project: &Project) -> TrackerResult<f64> {
        self.total_hours(&WorkEntryFilter::by_project(project.id.clone()))
    }

    /// Sum of hours dated within `[start_date, end_date]`, both inclusive.
    pub fn total_hours_by_week(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> TrackerResult<f64> {
        self.total_hours(&WorkEntryFilter::by_date_range(DateRange::new(
            start_date, end_date,
        )))
    }

    /// Entries of `user` with their projects resolved.
    pub fn work_entries_by_user(&self, user: &User) -> TrackerResult<Vec<WorkEntry>> {
        Ok(self
            .repo
            .list_work_entries(&WorkEntryFilter::by_user(user.id))?)
    }

    /// Entries booked on `project` with their users resolved.
    pub fn work_entries_by_project(&self, project: &Project) -> TrackerResult<Vec<WorkEntry>> {
        Ok(self
            .repo
            .list_work_entries(&WorkEntryFilter::by_project(project.id.clone()))?)
    }

    /// Entries dated within `[start_date, end_date]`, both inclusive.
    pub fn work_entries_between(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> TrackerResult<Vec<WorkEntry>> {
        Ok(self
            .repo
            .list_work_entries(&WorkEntryFilter::by_date_range(DateRange::new(
                start_date, end_date,
            )))?)
    }

    /// Exports every entry of `user` through `exporter`, replacing the
    /// previous export file.
    pub fn save_work_entries_to_csv(
        &self,
        user: &User,
        exporter: &CsvExporter,
    ) -> TrackerResult<ExportSummary> {
        let entries = self.work_entries_by_user(user)?;
        Ok(exporter.save_work_entries(&entries)?)
    }

    fn total_hours(&self, filter: &WorkEntryFilter) -> TrackerResult<f64> {
        let entries = self.repo.list_work_entries(filter)?;
        Ok(entries.iter().map(|entry| entry.hours_worked).sum())
    }
}

fn error_code(err: &TrackerError) -> &'static str {
    match err {
        TrackerError::Duplicate(_) => "duplicate_key",
        TrackerError::Validation(_) => "validation_failed",
        TrackerError::Repo(RepoError::UnknownUser(_)) => "unknown_user",
        TrackerError::Repo(RepoError::UnknownProject(_)) => "unknown_project",
        TrackerError::Repo(_) => "storage_failed",
        TrackerError::Export(_) => "export_failed",
    }
}
