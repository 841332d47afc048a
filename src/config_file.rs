//! Settings that decide where the projects file lives

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name of the projects store inside the projects location
pub const PROJECTS_FILE: &str = "terminal-projects.json";

/// Environment variable overriding `projects_location`
pub const LOCATION_ENV: &str = "TERMLAUNCH_PROJECTS_LOCATION";

const SETTINGS_DIR: &str = "termlaunch";
const SETTINGS_FILE: &str = "settings.json";

/// Errors that can occur while loading settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read settings file {path}: {source}")]
    Read {
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("Unable to parse JSON settings file {path}: {source}")]
    Json {
        source: serde_json::Error,
        path: PathBuf,
    },
}

/// User settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the projects file. Empty means the platform default.
    pub projects_location: Option<PathBuf>,
}

impl Settings {
    /// Loads settings from an explicit file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read, or
    /// `ConfigError::Json` if parsing fails.
    pub fn from_file(file: &Path) -> Result<Settings, ConfigError> {
        let contents = std::fs::read_to_string(file).map_err(|e| ConfigError::Read {
            source: e,
            path: file.to_path_buf(),
        })?;
        serde_json::from_str(&contents).map_err(|e| ConfigError::Json {
            source: e,
            path: file.to_path_buf(),
        })
    }

    /// Loads `file` if given, otherwise the settings file in the user config
    /// directory when one exists. Missing default settings are not an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a settings file exists but cannot be read or parsed.
    pub fn load(file: Option<&Path>) -> Result<Settings, ConfigError> {
        if let Some(file) = file {
            return Self::from_file(file);
        }
        match default_settings_file() {
            Some(path) if path.exists() => {
                debug!("Using settings file {}", path.display());
                Self::from_file(&path)
            }
            _ => Ok(Settings::default()),
        }
    }

    /// Apply the environment override, then the command-line override.
    #[must_use]
    pub fn with_overrides(mut self, env: Option<String>, flag: Option<PathBuf>) -> Self {
        if let Some(location) = env.filter(|l| !l.is_empty()) {
            self.projects_location = Some(PathBuf::from(location));
        }
        if let Some(location) = flag {
            self.projects_location = Some(location);
        }
        self
    }

    /// Full path of the projects file.
    #[must_use]
    pub fn projects_file(&self) -> PathBuf {
        match &self.projects_location {
            Some(location) if !location.as_os_str().is_empty() => location.join(PROJECTS_FILE),
            _ => default_projects_file(),
        }
    }
}

fn default_settings_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

/// Projects file used when no location is configured
#[must_use]
pub fn default_projects_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/var/local"))
        .join("Code")
        .join("User")
        .join(PROJECTS_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"projects_location": "/srv/launch"}"#).unwrap();
        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(
            settings.projects_file(),
            PathBuf::from("/srv/launch").join(PROJECTS_FILE)
        );
    }

    #[test]
    fn test_empty_object_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{}").unwrap();
        assert_eq!(Settings::from_file(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{projects_location").unwrap();
        match Settings::from_file(&path) {
            Err(ConfigError::Json { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected ConfigError::Json, got: {other:?}"),
        }
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::load(Some(dir.path().join("nope.json").as_path()));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_empty_location_uses_default() {
        let settings = Settings {
            projects_location: Some(PathBuf::new()),
        };
        assert_eq!(settings.projects_file(), default_projects_file());
        assert!(default_projects_file().ends_with("Code/User/terminal-projects.json"));
    }

    #[test]
    fn test_flag_beats_env() {
        let settings = Settings::default().with_overrides(
            Some("/from/env".to_string()),
            Some(PathBuf::from("/from/flag")),
        );
        assert_eq!(settings.projects_location, Some(PathBuf::from("/from/flag")));

        let settings = Settings::default().with_overrides(Some("/from/env".to_string()), None);
        assert_eq!(settings.projects_location, Some(PathBuf::from("/from/env")));

        let settings = Settings::default().with_overrides(Some(String::new()), None);
        assert_eq!(settings.projects_location, None);
    }
}
