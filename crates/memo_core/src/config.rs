//! Runtime configuration.
//!
//! # Responsibility
//! - Hold tunables shared by the session and its hosts.
//! - Overlay environment variables onto defaults.
//!
//! # Invariants
//! - Invalid environment values never abort startup; defaults are kept.

use crate::logging::default_log_level;
use crate::persistence::gateway::{NOTES_SLOT_KEY, THEME_SLOT_KEY};
use crate::scheduler::DEFAULT_SAVE_DELAY;
use log::warn;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_DB_PATH: &str = "MEMO_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "MEMO_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "MEMO_LOG_DIR";
pub const ENV_SAVE_DEBOUNCE_MS: &str = "MEMO_SAVE_DEBOUNCE_MS";

const DEFAULT_DB_FILE_NAME: &str = "memo.sqlite3";

/// Session and host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoConfig {
    pub notes_key: String,
    pub theme_key: String,
    /// Debounce window between the last edit and the coalesced save.
    pub save_delay: Duration,
    /// Slot database file used by hosts.
    pub db_path: PathBuf,
    pub log_level: String,
    /// Log directory; relative paths resolve against the host's working
    /// directory. File logging is skipped when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for MemoConfig {
    fn default() -> Self {
        Self {
            notes_key: NOTES_SLOT_KEY.to_string(),
            theme_key: THEME_SLOT_KEY.to_string(),
            save_delay: DEFAULT_SAVE_DELAY,
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl MemoConfig {
    /// Defaults overlaid with `MEMO_*` process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = read(ENV_SAVE_DEBOUNCE_MS) {
            match raw.parse::<u64>() {
                Ok(ms) => config.save_delay = Duration::from_millis(ms),
                Err(_) => warn!(
                    "event=config_load module=config status=recovered key={ENV_SAVE_DEBOUNCE_MS} reason=not_integer"
                ),
            }
        }
        config
    }

    /// Log directory made absolute against `base`.
    pub fn log_dir_under(&self, base: &Path) -> Option<PathBuf> {
        self.log_dir.as_ref().map(|dir| base.join(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_SAVE_DEBOUNCE_MS};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    fn config_from(pairs: &[(&str, &str)]) -> MemoConfig {
        let vars = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        MemoConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_use_400ms_debounce() {
        let config = MemoConfig::default();
        assert_eq!(config.save_delay, Duration::from_millis(400));
        assert_eq!(config.notes_key, "hp-memo-notes-v1");
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn env_overrides_apply() {
        let config = config_from(&[
            (ENV_DB_PATH, "/tmp/notes.db"),
            (ENV_LOG_DIR, "/tmp/logs"),
            (ENV_SAVE_DEBOUNCE_MS, "50"),
        ]);
        assert_eq!(config.db_path, PathBuf::from("/tmp/notes.db"));
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/logs")));
        assert_eq!(config.save_delay, Duration::from_millis(50));
    }

    #[test]
    fn invalid_debounce_keeps_default() {
        let config = config_from(&[(ENV_SAVE_DEBOUNCE_MS, "soon")]);
        assert_eq!(config.save_delay, Duration::from_millis(400));
    }

    #[test]
    fn relative_log_dir_resolves_against_base() {
        let config = config_from(&[(ENV_LOG_DIR, "logs")]);
        assert_eq!(
            config.log_dir_under(Path::new("/srv/memo")),
            Some(PathBuf::from("/srv/memo/logs"))
        );

        let absolute = config_from(&[(ENV_LOG_DIR, "/var/log/memo")]);
        assert_eq!(
            absolute.log_dir_under(Path::new("/srv/memo")),
            Some(PathBuf::from("/var/log/memo"))
        );
        assert_eq!(MemoConfig::default().log_dir_under(Path::new("/srv")), None);
    }
}
