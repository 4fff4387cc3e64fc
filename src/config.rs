//! Daemon settings.
//!
//! Loaded from `<config dir>/syncwatch/config.toml`. Every key is optional;
//! a missing file means all defaults.
//!
//! ```toml
//! tasks-file = "/home/deck/.config/syncwatch/tasks.json"
//! marker = "/tmp/manual_sync.trigger"
//! tick-interval-secs = 60
//! rclone = "rclone"
//! iwgetid = "iwgetid"
//! ```

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

/// Errors loading the settings file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine config directory; pass --config")]
    NoConfigDir,

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("tick-interval-secs must be positive in {}", path.display())]
    ZeroInterval { path: PathBuf },
}

/// Daemon settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Where the task editor saves the task list.
    pub tasks_file: PathBuf,

    /// Manual trigger marker.
    pub marker: PathBuf,

    /// Pause between the end of one tick and the start of the next.
    pub tick_interval_secs: u64,

    /// Synchronization tool executable.
    pub rclone: PathBuf,

    /// Network identity tool executable.
    pub iwgetid: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tasks_file: Self::dir().map_or_else(
                || PathBuf::from("tasks.json"),
                |dir| dir.join("tasks.json"),
            ),
            marker: env::temp_dir().join("manual_sync.trigger"),
            tick_interval_secs: 60,
            rclone: PathBuf::from("rclone"),
            iwgetid: PathBuf::from("iwgetid"),
        }
    }
}

impl Config {
    /// Load settings from `path`, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&Self::path().ok_or(ConfigError::NoConfigDir)?),
        }
    }

    /// Load settings from a specific file. Missing means defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if config.tick_interval_secs == 0 {
            return Err(ConfigError::ZeroInterval {
                path: path.to_path_buf(),
            });
        }

        Ok(config)
    }

    /// The settings directory: `<config dir>/syncwatch/`.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("syncwatch"))
    }

    /// The settings file path: `<config dir>/syncwatch/config.toml`.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn missing_file_is_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tick_interval(), Duration::from_secs(60));
        assert!(config.marker.ends_with("manual_sync.trigger"));
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "tasks-file = \"/srv/tasks.json\"\ntick-interval-secs = 5\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.tasks_file, PathBuf::from("/srv/tasks.json"));
        assert_eq!(config.tick_interval_secs, 5);
        assert_eq!(config.rclone, PathBuf::from("rclone"));
    }

    #[test]
    fn unknown_types_are_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "tick-interval-secs = \"soon\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "tick-interval-secs = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroInterval { .. }));
    }

    #[test]
    fn explicit_path_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "rclone = \"/opt/rclone/rclone\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.rclone, PathBuf::from("/opt/rclone/rclone"));
    }
}
