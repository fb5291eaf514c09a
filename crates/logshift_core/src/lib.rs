//! Core domain logic for LogShift.
//! This crate owns hour logging, aggregation and CSV export; callers only
//! parse input and render results.

pub mod config;
pub mod db;
pub mod export;
pub mod input;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigOverrides};
pub use export::csv_export::{CsvExporter, ExportError, ExportSummary};
pub use input::{parse_date, parse_hours, week_bounds, InputError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::project::{Project, ProjectId};
pub use model::user::{User, UserId};
pub use model::validation::ValidationError;
pub use model::work_entry::{NewWorkEntry, WorkEntry, WorkEntryId};
pub use repo::memory_repo::MemoryTrackerRepository;
pub use repo::tracker_repo::{
    DateRange, DuplicateKey, RepoError, RepoResult, SqliteTrackerRepository, TrackerRepository,
    WorkEntryFilter,
};
pub use service::tracker::{Tracker, TrackerError, TrackerResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
