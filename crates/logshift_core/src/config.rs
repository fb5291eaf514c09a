//! Runtime configuration resolution.
//!
//! # Responsibility
//! - Decide where the database, CSV exports and log files live.
//!
//! # Invariants
//! - Priority is explicit override > environment variable > platform default.
//! - Blank environment values are treated as unset.
//! - Defaults fall back to the system temp directory when the platform
//!   directory is unknown.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const APP_DIR_NAME: &str = "logshift";
pub const DB_FILE_NAME: &str = "logshift.db";
pub const LOG_DIR_NAME: &str = "logs";

pub const ENV_DB_PATH: &str = "LOGSHIFT_DB_PATH";
pub const ENV_EXPORT_DIR: &str = "LOGSHIFT_EXPORT_DIR";
pub const ENV_LOG_DIR: &str = "LOGSHIFT_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "LOGSHIFT_LOG_LEVEL";

/// Values supplied explicitly by the caller, e.g. CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub db_path: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub export_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl AppConfig {
    /// Resolves configuration against the process environment.
    pub fn from_env(overrides: ConfigOverrides) -> Self {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Resolves configuration with an injectable environment lookup.
    pub fn resolve(overrides: ConfigOverrides, env: impl Fn(&str) -> Option<String>) -> Self {
        let env_value = |key: &str| {
            env(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: overrides
                .db_path
                .or_else(|| env_value(ENV_DB_PATH).map(PathBuf::from))
                .unwrap_or_else(|| app_data_dir().join(DB_FILE_NAME)),
            export_dir: overrides
                .export_dir
                .or_else(|| env_value(ENV_EXPORT_DIR).map(PathBuf::from))
                .unwrap_or_else(default_export_dir),
            log_dir: overrides
                .log_dir
                .or_else(|| env_value(ENV_LOG_DIR).map(PathBuf::from))
                .unwrap_or_else(|| app_data_dir().join(LOG_DIR_NAME)),
            log_level: overrides
                .log_level
                .or_else(|| env_value(ENV_LOG_LEVEL))
                .unwrap_or_else(|| default_log_level().to_string()),
        }
    }
}

/// Per-user application data directory, e.g. `~/.local/share/logshift`.
pub fn app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

fn default_export_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir)
}

#[cfg(test)]
mod tests {
    use super::{
        app_data_dir, AppConfig, ConfigOverrides, DB_FILE_NAME, ENV_DB_PATH, ENV_EXPORT_DIR,
        ENV_LOG_LEVEL,
    };
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_overrides_or_env() {
        let config = AppConfig::resolve(ConfigOverrides::default(), env_from(&[]));
        assert_eq!(config.db_path, app_data_dir().join(DB_FILE_NAME));
        assert!(config.log_dir.starts_with(app_data_dir()));
    }

    #[test]
    fn env_beats_default_and_override_beats_env() {
        let env = env_from(&[(ENV_DB_PATH, "/tmp/env.db"), (ENV_LOG_LEVEL, "warn")]);
        let from_env = AppConfig::resolve(ConfigOverrides::default(), &env);
        assert_eq!(from_env.db_path, PathBuf::from("/tmp/env.db"));
        assert_eq!(from_env.log_level, "warn");

        let overrides = ConfigOverrides {
            db_path: Some(PathBuf::from("/tmp/flag.db")),
            ..ConfigOverrides::default()
        };
        let from_flag = AppConfig::resolve(overrides, &env);
        assert_eq!(from_flag.db_path, PathBuf::from("/tmp/flag.db"));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let env = env_from(&[(ENV_EXPORT_DIR, "   ")]);
        let config = AppConfig::resolve(ConfigOverrides::default(), env);
        assert_ne!(config.export_dir, PathBuf::from("   "));
        assert!(!config.export_dir.as_os_str().is_empty());
    }
}
