use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    cycle::{MAX_MINUTES, MIN_MINUTES},
    error::{Error, Result},
};

const APP_DIR: &str = "cycletimer";
const CONFIG_FILE: &str = "config.json";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub theme: String,
    pub notifications_enabled: bool,
    pub sound_enabled: bool,
    pub default_minutes: Option<u32>,
    pub refresh_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "default".into(),
            notifications_enabled: true,
            sound_enabled: true,
            default_minutes: None,
            refresh_rate_ms: 50,
        }
    }
}

impl Config {
    pub fn refresh_rate(&self) -> Duration {
        Duration::from_millis(self.refresh_rate_ms.max(1))
    }

    /// Drops a default duration the form would refuse anyway.
    pub fn sanitized(mut self) -> Self {
        if let Some(m) = self.default_minutes {
            if !(MIN_MINUTES..=MAX_MINUTES).contains(&m) {
                warn!(minutes = m, "default_minutes out of range, ignoring");
                self.default_minutes = None;
            }
        }
        self
    }
}

pub fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR)
}

pub fn default_config_path() -> PathBuf {
    app_dir(dirs::config_dir()).join(CONFIG_FILE)
}

/// Loads the config at `path`. A missing file yields the defaults.
pub fn load(path: &Path) -> Result<Config> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        Err(e) => return Err(e.into()),
    };

    let config: Config = serde_json::from_str(&raw).map_err(|source| Error::Config {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), "config loaded");
    Ok(config.sanitized())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_fills_remaining_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "theme": "nord", "default_minutes": 25 }"#).unwrap();

        let config = load(&path).unwrap();

        assert_eq!(config.theme, "nord");
        assert_eq!(config.default_minutes, Some(25));
        assert!(config.notifications_enabled);
        assert_eq!(config.refresh_rate(), Duration::from_millis(50));
    }

    #[test]
    fn out_of_range_default_minutes_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "default_minutes": 90 }"#).unwrap();

        assert_eq!(load(&path).unwrap().default_minutes, None);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ theme = nord }").unwrap();

        assert!(matches!(load(&path), Err(Error::Config { .. })));
    }
}
