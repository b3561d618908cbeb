// ===========================================================================
// config - Configuration Loading & Path Resolution
// ===========================================================================

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub type Result<T> = std::result::Result<T, Error>;

/// File looked up when no config path is given, or when the path is a directory
pub const CONFIG_FILE: &str = "firesave.json";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("error parsing config {}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("error parsing config {}: autoSaveFrequency must be a positive number of seconds within range, got {value}", .path.display())]
    InvalidFrequency { path: PathBuf, value: f64 },

    #[error("failed to determine working directory: {0}")]
    Cwd(#[source] std::io::Error),
}

// ---------------------------------------------------------------------------
// Config File (firesave.json)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(default)]
    pub auto_save_frequency: Option<f64>,

    #[serde(default = "default_save_location")]
    pub save_location: String,

    #[serde(default = "default_auto_save_name")]
    pub auto_save_name: String,

    #[serde(default)]
    pub export_on_exit: bool,

    #[serde(default = "default_loaded_save")]
    pub default_loaded_save: String,

    #[serde(default = "default_firebase_cmd")]
    pub firebase_cmd: String,
}

fn default_save_location() -> String {
    "firesave".into()
}

fn default_auto_save_name() -> String {
    "autosave".into()
}

fn default_loaded_save() -> String {
    "autosave".into()
}

fn default_firebase_cmd() -> String {
    "firebase".into()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            auto_save_frequency: None,
            save_location: default_save_location(),
            auto_save_name: default_auto_save_name(),
            export_on_exit: false,
            default_loaded_save: default_loaded_save(),
            firebase_cmd: default_firebase_cmd(),
        }
    }
}

impl ConfigFile {
    /// Validate parsed JSON against the schema.
    ///
    /// `null` values count as missing keys, unknown keys are ignored.
    fn from_value(mut value: serde_json::Value, path: &Path) -> Result<Self> {
        if let serde_json::Value::Object(map) = &mut value {
            map.retain(|_, v| !v.is_null());
        }

        let file: ConfigFile = serde_json::from_value(value).map_err(|source| Error::Invalid {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(value) = file.auto_save_frequency {
            if value <= 0.0 || Duration::try_from_secs_f64(value).is_err() {
                return Err(Error::InvalidFrequency {
                    path: path.to_path_buf(),
                    value,
                });
            }
        }

        Ok(file)
    }

    /// Autosave interval; out-of-range values were rejected by `from_value`
    fn auto_save_interval(&self) -> Option<Duration> {
        self.auto_save_frequency
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}

// ---------------------------------------------------------------------------
// Resolved Config (runtime)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub auto_save_frequency: Option<f64>,
    auto_save_interval: Option<Duration>,
    pub save_location: String,
    pub auto_save_name: String,
    pub export_on_exit: bool,
    pub default_loaded_save: String,
    pub firebase_cmd: String,

    /// Absolute path of the config file (whether or not it exists)
    pub config_path: PathBuf,

    /// Absolute save-storage root
    pub save_dir: PathBuf,
}

impl Config {
    /// Resolve config relative to the process working directory
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().map_err(Error::Cwd)?;
        Self::resolve(path, &cwd)
    }

    /// Read, validate and resolve the config file.
    ///
    /// A missing, unreadable or non-JSON file yields the defaults. A JSON
    /// document that does not match the schema is an error.
    pub fn resolve(path: Option<&Path>, cwd: &Path) -> Result<Self> {
        let config_path = config_path(path, cwd);

        let content = match std::fs::read_to_string(&config_path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %config_path.display(), error = %e, "config not readable, using defaults");
                return Ok(Self::from_file(ConfigFile::default(), config_path));
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                debug!(path = %config_path.display(), error = %e, "config is not JSON, using defaults");
                return Ok(Self::from_file(ConfigFile::default(), config_path));
            }
        };

        let file = ConfigFile::from_value(value, &config_path)?;
        debug!(path = %config_path.display(), "loaded config");
        Ok(Self::from_file(file, config_path))
    }

    fn from_file(file: ConfigFile, config_path: PathBuf) -> Self {
        let base = config_path.parent().unwrap_or(Path::new("/"));
        let save_dir = normalize(&base.join(&file.save_location));

        Self {
            auto_save_frequency: file.auto_save_frequency,
            auto_save_interval: file.auto_save_interval(),
            save_location: file.save_location,
            auto_save_name: file.auto_save_name,
            export_on_exit: file.export_on_exit,
            default_loaded_save: file.default_loaded_save,
            firebase_cmd: file.firebase_cmd,
            config_path,
            save_dir,
        }
    }

    /// Interval between autosaves, if enabled
    pub fn auto_save_interval(&self) -> Option<Duration> {
        self.auto_save_interval
    }

    /// Directory of the save with the given name (unvalidated)
    pub fn save_path(&self, name: &str) -> PathBuf {
        self.save_dir.join(name)
    }
}

fn config_path(path: Option<&Path>, cwd: &Path) -> PathBuf {
    let path = match path {
        Some(p) => normalize(&cwd.join(p)),
        None => cwd.join(CONFIG_FILE),
    };

    if path.is_dir() {
        path.join(CONFIG_FILE)
    } else {
        path
    }
}

/// Lexically collapse `.` and `..` without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILE);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_config_file_defaults() {
        let file = ConfigFile::default();
        assert!(file.auto_save_frequency.is_none());
        assert_eq!(file.save_location, "firesave");
        assert_eq!(file.auto_save_name, "autosave");
        assert!(!file.export_on_exit);
        assert_eq!(file.default_loaded_save, "autosave");
        assert_eq!(file.firebase_cmd, "firebase");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::resolve(None, dir.path()).unwrap();

        assert_eq!(config.config_path, dir.path().join(CONFIG_FILE));
        assert_eq!(config.save_dir, dir.path().join("firesave"));
        assert_eq!(config.firebase_cmd, "firebase");
        assert!(config.auto_save_interval().is_none());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let dir = tempdir().unwrap();
        write_config(dir.path(), "");

        let config = Config::resolve(None, dir.path()).unwrap();
        let defaults = Config::from_file(ConfigFile::default(), dir.path().join(CONFIG_FILE));
        assert_eq!(config, defaults);
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let dir = tempdir().unwrap();
        write_config(dir.path(), "{}");

        let config = Config::resolve(None, dir.path()).unwrap();
        let defaults = Config::from_file(ConfigFile::default(), dir.path().join(CONFIG_FILE));
        assert_eq!(config, defaults);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        write_config(
            dir.path(),
            r#"{ "saveLocation": "snapshots", "exportOnExit": true, "autoSaveFrequency": 300 }"#,
        );

        let config = Config::resolve(None, dir.path()).unwrap();
        assert_eq!(config.save_location, "snapshots");
        assert_eq!(config.save_dir, dir.path().join("snapshots"));
        assert!(config.export_on_exit);
        assert_eq!(config.auto_save_frequency, Some(300.0));
        assert_eq!(config.auto_save_interval(), Some(Duration::from_secs(300)));
        assert_eq!(config.auto_save_name, "autosave");
        assert_eq!(config.default_loaded_save, "autosave");
        assert_eq!(config.firebase_cmd, "firebase");
    }

    #[test]
    fn test_full_config() {
        let dir = tempdir().unwrap();
        write_config(
            dir.path(),
            r#"{
                "autoSaveFrequency": 60,
                "saveLocation": "data/saves",
                "autoSaveName": "auto",
                "exportOnExit": true,
                "defaultLoadedSave": "seed",
                "firebaseCmd": "npx firebase"
            }"#,
        );

        let config = Config::resolve(None, dir.path()).unwrap();
        assert_eq!(config.auto_save_name, "auto");
        assert_eq!(config.default_loaded_save, "seed");
        assert_eq!(config.firebase_cmd, "npx firebase");
        assert_eq!(config.save_dir, dir.path().join("data").join("saves"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let dir = tempdir().unwrap();
        write_config(dir.path(), r#"{ "theme": "dark", "autoSaveName": "auto" }"#);

        let config = Config::resolve(None, dir.path()).unwrap();
        assert_eq!(config.auto_save_name, "auto");
    }

    #[test]
    fn test_null_treated_as_missing() {
        let dir = tempdir().unwrap();
        write_config(dir.path(), r#"{ "saveLocation": null, "autoSaveFrequency": null }"#);

        let config = Config::resolve(None, dir.path()).unwrap();
        assert_eq!(config.save_location, "firesave");
        assert!(config.auto_save_frequency.is_none());
    }

    #[test]
    fn test_wrong_type_is_error() {
        let dir = tempdir().unwrap();
        write_config(dir.path(), r#"{ "exportOnExit": "yes" }"#);

        let err = Config::resolve(None, dir.path()).unwrap_err();
        assert!(matches!(err, Error::Invalid { .. }));
        assert!(err.to_string().starts_with("error parsing config"));
    }

    #[test]
    fn test_non_object_is_error() {
        let dir = tempdir().unwrap();
        write_config(dir.path(), "[1, 2, 3]");

        let err = Config::resolve(None, dir.path()).unwrap_err();
        assert!(matches!(err, Error::Invalid { .. }));
    }

    #[test]
    fn test_negative_frequency_is_error() {
        let dir = tempdir().unwrap();
        write_config(dir.path(), r#"{ "autoSaveFrequency": -5 }"#);

        let err = Config::resolve(None, dir.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidFrequency { value, .. } if value == -5.0));
    }

    #[test]
    fn test_out_of_range_frequency_is_error() {
        let dir = tempdir().unwrap();
        write_config(dir.path(), r#"{ "autoSaveFrequency": 1e20 }"#);

        let err = Config::resolve(None, dir.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidFrequency { value, .. } if value == 1e20));
    }

    #[test]
    fn test_large_frequency_in_range() {
        let dir = tempdir().unwrap();
        write_config(dir.path(), r#"{ "autoSaveFrequency": 1e18 }"#);

        let config = Config::resolve(None, dir.path()).unwrap();
        assert_eq!(
            config.auto_save_interval(),
            Some(Duration::from_secs(1_000_000_000_000_000_000))
        );
    }

    #[test]
    fn test_explicit_relative_path() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("conf");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("custom.json"), r#"{ "saveLocation": "../saves" }"#).unwrap();

        let config = Config::resolve(Some(Path::new("conf/custom.json")), dir.path()).unwrap();
        assert_eq!(config.config_path, nested.join("custom.json"));
        assert_eq!(config.save_dir, dir.path().join("saves"));
    }

    #[test]
    fn test_directory_path_uses_default_file() {
        let dir = tempdir().unwrap();
        write_config(dir.path(), r#"{ "autoSaveName": "auto" }"#);

        let config = Config::resolve(Some(Path::new(".")), dir.path()).unwrap();
        assert_eq!(config.config_path, dir.path().join(CONFIG_FILE));
        assert_eq!(config.auto_save_name, "auto");
    }

    #[test]
    fn test_absolute_save_location() {
        let dir = tempdir().unwrap();
        let saves = dir.path().join("elsewhere");
        write_config(
            dir.path(),
            &serde_json::json!({ "saveLocation": saves }).to_string(),
        );

        let config = Config::resolve(None, dir.path()).unwrap();
        assert_eq!(config.save_dir, saves);
    }

    #[test]
    fn test_save_path() {
        let dir = tempdir().unwrap();
        let config = Config::resolve(None, dir.path()).unwrap();
        assert_eq!(
            config.save_path("foo"),
            dir.path().join("firesave").join("foo")
        );
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/a/b/")), PathBuf::from("/a/b"));
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidFrequency {
            path: PathBuf::from("/tmp/firesave.json"),
            value: 0.0,
        };
        assert!(err.to_string().contains("autoSaveFrequency"));
    }
}
