//! CSV export of work entries.
//!
//! # Responsibility
//! - Serialize work entries to CSV with a fixed header.
//! - Write one user's export to a fixed file name in the export directory.
//!
//! # Invariants
//! - The header row is always written, also for zero entries.
//! - Existing export files are truncated, never appended to.
//! - Dates are `YYYY-MM-DD`; hours use `.` as decimal separator.

use crate::model::work_entry::WorkEntry;
use log::{error, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const EXPORT_FILE_NAME: &str = "logshift_work_entries.csv";
pub const CSV_HEADER: [&str; 5] = ["user", "date", "project", "hours_worked", "description"];

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug)]
pub enum ExportError {
    /// Export directory or file could not be created.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Csv(csv::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot write export `{}`: {source}", path.display())
            }
            Self::Csv(err) => write!(f, "csv serialization failed: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv(err) => Some(err),
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    /// Data rows written, header excluded.
    pub rows: usize,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    user: &'a str,
    date: String,
    project: &'a str,
    hours_worked: f64,
    description: &'a str,
}

impl<'a> From<&'a WorkEntry> for CsvRow<'a> {
    fn from(entry: &'a WorkEntry) -> Self {
        Self {
            user: entry.user.username.as_str(),
            date: entry.date.format("%Y-%m-%d").to_string(),
            project: entry.project.name.as_str(),
            hours_worked: entry.hours_worked,
            description: entry.description.as_str(),
        }
    }
}

/// Writes entries as CSV to an arbitrary sink and returns the data row count.
pub fn write_work_entries<W: Write>(sink: W, entries: &[WorkEntry]) -> Result<usize, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(sink);
    writer.write_record(CSV_HEADER)?;
    for entry in entries {
        writer.serialize(CsvRow::from(entry))?;
    }
    writer.flush()?;
    Ok(entries.len())
}

/// Writes work entry exports into a fixed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExporter {
    export_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    /// Full path of the export file.
    pub fn file_path(&self) -> PathBuf {
        self.export_dir.join(EXPORT_FILE_NAME)
    }

    /// Replaces the export file with the given entries.
    ///
    /// The directory is created when missing. The file handle is dropped on
    /// every exit path; on success it is flushed first.
    ///
    /// # Errors
    /// - `Io` when the directory or file cannot be created.
    /// - `Csv` when serialization or the final flush fails.
    pub fn save_work_entries(&self, entries: &[WorkEntry]) -> ExportResult<ExportSummary> {
        let path = self.file_path();
        let result = self.write_file(&path, entries);
        match &result {
            Ok(summary) => info!(
                "event=csv_export module=export status=ok rows={} path={}",
                summary.rows,
                summary.path.display()
            ),
            Err(err) => error!(
                "event=csv_export module=export status=error path={} error={}",
                path.display(),
                err
            ),
        }
        result
    }

    fn write_file(&self, path: &Path, entries: &[WorkEntry]) -> ExportResult<ExportSummary> {
        std::fs::create_dir_all(&self.export_dir).map_err(|source| ExportError::Io {
            path: self.export_dir.clone(),
            source,
        })?;
        let file = File::create(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let rows = write_work_entries(BufWriter::new(file), entries)?;
        Ok(ExportSummary {
            path: path.to_path_buf(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::write_work_entries;
    use crate::model::project::Project;
    use crate::model::user::{User, UserId};
    use crate::model::work_entry::{WorkEntry, WorkEntryId};
    use chrono::NaiveDate;

    fn entry(hours: f64, description: &str) -> WorkEntry {
        WorkEntry {
            id: WorkEntryId(1),
            user: User {
                id: UserId(1),
                username: "alice".to_string(),
            },
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            project: Project::new("P1", "Website"),
            hours_worked: hours,
            description: description.to_string(),
        }
    }

    #[test]
    fn empty_export_still_has_header() {
        let mut buffer = Vec::new();
        let rows = write_work_entries(&mut buffer, &[]).unwrap();
        assert_eq!(rows, 0);
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "user,date,project,hours_worked,description\n"
        );
    }

    #[test]
    fn rows_use_username_project_name_and_iso_date() {
        let mut buffer = Vec::new();
        write_work_entries(&mut buffer, &[entry(4.0, "design")]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "alice,2024-01-10,Website,4.0,design");
    }

    #[test]
    fn fields_with_separators_are_quoted() {
        let mut buffer = Vec::new();
        write_work_entries(&mut buffer, &[entry(2.5, "review, \"final\" pass")]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("2.5,\"review, \"\"final\"\" pass\""));
    }
}
