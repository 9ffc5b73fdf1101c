//! TOML-based application settings.
//!
//! Supports a config file (metaprofile.toml) with environment variable
//! expansion.
//!
//! Example configuration:
//! ```toml
//! [store]
//! path = "${HOME}/.local/share/metaprofile/metadata.db"
//! updated_by = "etl_service"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Root settings structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Metadata store configuration.
    #[serde(default)]
    pub store: StoreSettings,
}

/// Metadata store settings as written in the TOML file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Path to the store database (supports ${ENV_VAR} expansion).
    pub path: Option<String>,

    /// Audit identity recorded on every snapshot. Defaults to the current
    /// OS user.
    pub updated_by: Option<String>,
}

/// Resolved, immutable store configuration handed to the persistence
/// exporter. Construction happens once, at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub updated_by: String,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>, updated_by: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            updated_by: updated_by.into(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `METAPROFILE_CONFIG`
    /// 2. `./metaprofile.toml`
    /// 3. `~/.config/metaprofile/config.toml`
    pub fn load() -> ConfigResult<Self> {
        if let Ok(path) = env::var("METAPROFILE_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("metaprofile.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("metaprofile").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Resolve the store configuration, expanding env vars in the path and
    /// filling in defaults for anything unset.
    pub fn store_config(&self) -> ConfigResult<StoreConfig> {
        let path = match &self.store.path {
            Some(raw) => PathBuf::from(expand_env_vars(raw)?),
            None => default_store_path(),
        };
        let updated_by = match &self.store.updated_by {
            Some(user) => user.clone(),
            None => current_user(),
        };
        Ok(StoreConfig { path, updated_by })
    }
}

/// Default store location: `<data dir>/metaprofile/metadata.db`, falling
/// back to the working directory when no data dir exists.
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("metaprofile")
        .join("metadata.db")
}

fn current_user() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> ConfigResult<String> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' {
            if chars.peek() == Some(&'{') {
                chars.next(); // consume '{'
                let mut var_name = String::new();
                while let Some(ch) = chars.next() {
                    if ch == '}' {
                        break;
                    }
                    var_name.push(ch);
                }
                let value = env::var(&var_name)
                    .map_err(|_| ConfigError::MissingEnvVar(var_name.clone()))?;
                result.push_str(&value);
            } else {
                // $VAR (ends at non-alphanumeric/underscore)
                let mut var_name = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_alphanumeric() || ch == '_' {
                        var_name.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if var_name.is_empty() {
                    // Just a lone $, keep it
                    result.push('$');
                } else {
                    let value = env::var(&var_name)
                        .map_err(|_| ConfigError::MissingEnvVar(var_name.clone()))?;
                    result.push_str(&value);
                }
            }
        } else {
            result.push(c);
        }
    }

    Ok(result)
}
