use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::prompt::ReplyFormat;
use crate::domain::reply::DuplicatePolicy;
use crate::error::{AppError, AppResult};

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_MODEL: &str = "DESKBOT_MODEL";
pub const ENV_BASE_URL: &str = "DESKBOT_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "DESKBOT_TIMEOUT_SECS";
pub const ENV_REPLY_FORMAT: &str = "DESKBOT_REPLY_FORMAT";
pub const ENV_DUPLICATES: &str = "DESKBOT_DUPLICATES";
pub const ENV_CONFIG_DIR: &str = "DESKBOT_CONFIG_DIR";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const APP_DIR_NAME: &str = "deskbot";
const CONFIG_FILE_NAME: &str = "config.json";

/// Settings persisted by `deskbot config init`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_issue: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!(
                    "invalid config file {}: {err}",
                    path.display()
                ))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

/// Effective settings: defaults, then the stored file, then the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub reply_format: ReplyFormat,
    pub duplicate_policy: DuplicatePolicy,
    pub require_issue: bool,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Self::resolve(stored, |key| env::var(key).ok())
    }

    pub fn resolve(
        stored: StoredConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> AppResult<Self> {
        let pick = |key: &str, stored: Option<String>| {
            lookup(key)
                .or(stored)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let reply_format = match pick(ENV_REPLY_FORMAT, stored.reply_format) {
            Some(value) => ReplyFormat::from_str(&value).ok_or_else(|| {
                AppError::Configuration(format!(
                    "unknown reply format '{value}' (use lines or json)"
                ))
            })?,
            None => ReplyFormat::default(),
        };

        let duplicate_policy = match pick(ENV_DUPLICATES, stored.duplicate_policy) {
            Some(value) => DuplicatePolicy::from_str(&value).ok_or_else(|| {
                AppError::Configuration(format!(
                    "unknown duplicate policy '{value}' (use first or last)"
                ))
            })?,
            None => DuplicatePolicy::default(),
        };

        let timeout_secs = match lookup(ENV_TIMEOUT_SECS).filter(|value| !value.trim().is_empty()) {
            Some(value) => value.trim().parse::<u64>().map_err(|_| {
                AppError::Configuration(format!("{ENV_TIMEOUT_SECS} must be a number of seconds"))
            })?,
            None => stored.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(AppError::Configuration(
                "request timeout must be at least one second".to_string(),
            ));
        }

        Ok(Self {
            openai_api_key: pick(ENV_API_KEY, stored.openai_api_key),
            model: pick(ENV_MODEL, stored.model).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: pick(ENV_BASE_URL, stored.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            reply_format,
            duplicate_policy,
            require_issue: stored.require_issue.unwrap_or(true),
        })
    }

    pub fn api_key(&self) -> AppResult<&str> {
        self.openai_api_key.as_deref().ok_or_else(|| {
            AppError::Configuration(format!(
                "OpenAI API key not configured; set {ENV_API_KEY} or run `deskbot config init`"
            ))
        })
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    resolve_config_directory(|key| env::var(key).ok()).ok_or_else(|| {
        AppError::Configuration(
            "unable to resolve a config directory; set DESKBOT_CONFIG_DIR".to_string(),
        )
    })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

fn resolve_config_directory(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(dir) = non_empty(ENV_CONFIG_DIR) {
        return Some(PathBuf::from(dir));
    }
    if cfg!(windows) {
        if let Some(app_data) = non_empty("APPDATA") {
            return Some(PathBuf::from(app_data).join(APP_DIR_NAME));
        }
    }
    if let Some(xdg) = non_empty("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg).join(APP_DIR_NAME));
    }
    non_empty("HOME")
        .or_else(|| non_empty("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(".config").join(APP_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = AppConfig::resolve(StoredConfig::default(), env_of(&[])).unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.reply_format, ReplyFormat::Lines);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::FirstWins);
        assert!(config.require_issue);
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn environment_overrides_stored_values() {
        let stored = StoredConfig {
            openai_api_key: Some("sk-file".to_string()),
            model: Some("gpt-file".to_string()),
            reply_format: Some("json".to_string()),
            timeout_secs: Some(5),
            ..StoredConfig::default()
        };
        let config = AppConfig::resolve(
            stored,
            env_of(&[(ENV_API_KEY, "sk-env"), (ENV_TIMEOUT_SECS, "9")]),
        )
        .unwrap();
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.model, "gpt-file");
        assert_eq!(config.reply_format, ReplyFormat::Json);
        assert_eq!(config.timeout, Duration::from_secs(9));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = AppConfig::resolve(StoredConfig::default(), env_of(&[(ENV_API_KEY, "  ")]))
            .unwrap();
        assert!(matches!(config.api_key(), Err(AppError::Configuration(_))));
    }

    #[test]
    fn rejects_unknown_reply_format() {
        let result = AppConfig::resolve(
            StoredConfig::default(),
            env_of(&[(ENV_REPLY_FORMAT, "yaml")]),
        );
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let from_env = AppConfig::resolve(
            StoredConfig::default(),
            env_of(&[(ENV_TIMEOUT_SECS, "0")]),
        );
        assert!(matches!(from_env, Err(AppError::Configuration(_))));

        let stored = StoredConfig {
            timeout_secs: Some(0),
            ..StoredConfig::default()
        };
        let from_file = AppConfig::resolve(stored, env_of(&[]));
        assert!(matches!(from_file, Err(AppError::Configuration(_))));
    }

    #[test]
    fn stored_config_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        assert_eq!(StoredConfig::load_from(&path).unwrap(), StoredConfig::default());

        let stored = StoredConfig {
            openai_api_key: Some("sk-test".to_string()),
            duplicate_policy: Some("last".to_string()),
            require_issue: Some(false),
            ..StoredConfig::default()
        };
        stored.save_to(&path).unwrap();
        assert_eq!(StoredConfig::load_from(&path).unwrap(), stored);
    }

    #[test]
    fn invalid_config_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            StoredConfig::load_from(&path),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn config_directory_prefers_explicit_override() {
        let dir = resolve_config_directory(env_of(&[
            (ENV_CONFIG_DIR, "/tmp/deskbot-test"),
            ("HOME", "/home/someone"),
        ]));
        assert_eq!(dir, Some(PathBuf::from("/tmp/deskbot-test")));
    }

    #[cfg(unix)]
    #[test]
    fn config_directory_falls_back_to_home() {
        let dir = resolve_config_directory(env_of(&[("HOME", "/home/someone")]));
        assert_eq!(
            dir,
            Some(PathBuf::from("/home/someone/.config").join(APP_DIR_NAME))
        );
        assert_eq!(resolve_config_directory(env_of(&[])), None);
    }
}
