//! LogShift interactive CLI.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the tracker store.
//! - Hand stdin/stdout to the menu session.

mod session;

use chrono::Local;
use clap::Parser;
use log::{error, info};
use logshift_core::db::open_db;
use logshift_core::{
    core_version, init_logging, logging_status, AppConfig, ConfigOverrides, CsvExporter,
    MemoryTrackerRepository, SqliteTrackerRepository, Tracker,
};
use session::Session;
use std::io;
use std::path::PathBuf;

/// `logshift` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "logshift",
    about = "Log work hours per user and project, report totals and export CSV",
    version
)]
struct CliArgs {
    /// SQLite database file. Falls back to `LOGSHIFT_DB_PATH`.
    #[arg(long = "db-path", value_name = "path")]
    db_path: Option<PathBuf>,
    /// Directory receiving CSV exports. Falls back to `LOGSHIFT_EXPORT_DIR`.
    #[arg(long = "export-dir", value_name = "dir")]
    export_dir: Option<PathBuf>,
    /// Absolute directory for log files. Falls back to `LOGSHIFT_LOG_DIR`.
    #[arg(long = "log-dir", value_name = "dir")]
    log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error. Falls back to `LOGSHIFT_LOG_LEVEL`.
    #[arg(long = "log-level", value_name = "level")]
    log_level: Option<String>,
    /// Keep everything in memory; nothing is written to the database.
    #[arg(long = "in-memory")]
    in_memory: bool,
}

impl CliArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            db_path: self.db_path.clone(),
            export_dir: self.export_dir.clone(),
            log_dir: self.log_dir.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

fn main() -> io::Result<()> {
    let args = CliArgs::parse();
    let config = AppConfig::from_env(args.overrides());

    match init_logging(&config.log_level, &config.log_dir) {
        Ok(()) => {
            if let Some((level, dir)) = logging_status() {
                info!(
                    "event=logging_ready module=cli status=ok level={level} log_dir={}",
                    dir.display()
                );
            }
        }
        Err(err) => eprintln!("warning: file logging disabled: {err}"),
    }
    info!(
        "event=cli_start module=cli status=ok core_version={} in_memory={}",
        core_version(),
        args.in_memory
    );

    let exporter = CsvExporter::new(&config.export_dir);
    let today = Local::now().date_naive();
    let stdin = io::stdin();
    let stdout = io::stdout();

    if args.in_memory {
        let tracker = Tracker::new(MemoryTrackerRepository::new());
        return Session::new(&tracker, &exporter, stdin.lock(), stdout.lock(), today).run();
    }

    let conn = open_db(&config.db_path).map_err(|err| {
        error!("event=cli_start module=cli status=error error_code=db_open_failed");
        io::Error::other(format!(
            "open database `{}`: {err}",
            config.db_path.display()
        ))
    })?;
    let repo = SqliteTrackerRepository::try_new(&conn)
        .map_err(|err| io::Error::other(format!("prepare tracker store: {err}")))?;
    let tracker = Tracker::new(repo);

    Session::new(&tracker, &exporter, stdin.lock(), stdout.lock(), today).run()
}
