//! Global configuration file support.
//!
//! Loads `~/.config/promptcraft/config.toml` and merges it with command-line
//! flags. Precedence: CLI flag > config file > built-in default.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use promptcraft_agent::{BackendType, DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL};
use promptcraft_db::Database;

/// The global config directory name
pub const GLOBAL_CONFIG_DIR: &str = "promptcraft";

/// The global config file name
pub const GLOBAL_CONFIG_FILE: &str = "config.toml";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// User configuration loaded from the global config file
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Chat backend (`openai` or `claude`)
    pub backend: Option<String>,
    /// Model passed to the backend
    pub model: Option<String>,
    /// Base URL of an OpenAI-compatible API
    pub base_url: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: Option<String>,
    /// Per-request timeout
    pub timeout_secs: Option<u64>,
    /// SQLite history database path
    pub history_path: Option<PathBuf>,
    /// Ask the model for questions instead of using the built-in lists
    pub generated_questions: Option<bool>,
}

impl GlobalConfig {
    /// Path of the global config file, if a config directory exists
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILE))
    }

    /// Load the global config.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load() -> Result<Option<Self>> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: GlobalConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(Some(config))
    }
}

/// Settings given on the command line; `None` means not given
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub backend: Option<BackendType>,
    pub model: Option<String>,
    pub db: Option<PathBuf>,
    pub generated_questions: bool,
}

/// Effective settings after merging flags, config file and defaults
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub backend: BackendType,
    pub model: Option<String>,
    pub base_url: String,
    pub api_key_env: String,
    pub timeout: Duration,
    pub history_path: PathBuf,
    pub generated_questions: bool,
}

impl Settings {
    pub fn resolve(cli: &CliOverrides, config: Option<&GlobalConfig>) -> Result<Self> {
        let config_backend = config
            .and_then(|c| c.backend.as_deref())
            .map(|b| {
                b.parse::<BackendType>()
                    .map_err(|e| anyhow::anyhow!("Invalid backend in config: {}", e))
            })
            .transpose()?;

        Ok(Self {
            backend: cli.backend.or(config_backend).unwrap_or_default(),
            model: cli
                .model
                .clone()
                .or_else(|| config.and_then(|c| c.model.clone())),
            base_url: config
                .and_then(|c| c.base_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key_env: config
                .and_then(|c| c.api_key_env.clone())
                .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string()),
            timeout: Duration::from_secs(
                config
                    .and_then(|c| c.timeout_secs)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            history_path: cli
                .db
                .clone()
                .or_else(|| config.and_then(|c| c.history_path.clone()))
                .unwrap_or_else(Database::default_path),
            generated_questions: cli.generated_questions
                || config.and_then(|c| c.generated_questions).unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(GLOBAL_CONFIG_FILE);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let result = GlobalConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
backend = "claude"
model = "sonnet"
base_url = "http://localhost:11434/v1"
api_key_env = "LOCAL_KEY"
timeout_secs = 30
history_path = "/tmp/history.db"
generated_questions = true
"#,
        );

        let config = GlobalConfig::load_from(&path).unwrap().unwrap();
        assert_eq!(config.backend.as_deref(), Some("claude"));
        assert_eq!(config.timeout_secs, Some(30));
        assert_eq!(config.generated_questions, Some(true));
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "temperature = 0.2\n");
        assert!(GlobalConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "backend = \n");
        assert!(GlobalConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_defaults_without_config() {
        let settings = Settings::resolve(&CliOverrides::default(), None).unwrap();
        assert_eq!(settings.backend, BackendType::OpenAi);
        assert_eq!(settings.model, None);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.api_key_env, "OPENAI_API_KEY");
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(settings.history_path, Database::default_path());
        assert!(!settings.generated_questions);
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = GlobalConfig {
            backend: Some("claude".to_string()),
            model: Some("sonnet".to_string()),
            history_path: Some(PathBuf::from("/config/history.db")),
            ..Default::default()
        };

        let from_config = Settings::resolve(&CliOverrides::default(), Some(&config)).unwrap();
        assert_eq!(from_config.backend, BackendType::ClaudeCode);
        assert_eq!(from_config.model.as_deref(), Some("sonnet"));
        assert_eq!(from_config.history_path, PathBuf::from("/config/history.db"));

        let cli = CliOverrides {
            backend: Some(BackendType::OpenAi),
            model: Some("gpt-4o".to_string()),
            db: Some(PathBuf::from("/cli/history.db")),
            generated_questions: true,
        };
        let from_cli = Settings::resolve(&cli, Some(&config)).unwrap();
        assert_eq!(from_cli.backend, BackendType::OpenAi);
        assert_eq!(from_cli.model.as_deref(), Some("gpt-4o"));
        assert_eq!(from_cli.history_path, PathBuf::from("/cli/history.db"));
        assert!(from_cli.generated_questions);
    }

    #[test]
    fn test_invalid_backend_in_config() {
        let config = GlobalConfig {
            backend: Some("gemini".to_string()),
            ..Default::default()
        };
        assert!(Settings::resolve(&CliOverrides::default(), Some(&config)).is_err());
    }
}
