use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::paths;

/// Endpoint used when the config file does not set one.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// Model used when the config file does not set one.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Environment variable consulted when `api_key_env` is not set.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Default settings in the `[banter]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BanterConfig {
    /// Default model name.
    pub model: Option<String>,
    /// Match the exit cue case-insensitively.
    #[serde(default)]
    pub exit_cue_ignores_case: bool,
    /// Maximum number of turns kept in the context window.
    pub history_limit: Option<usize>,
}

/// The `[api]` section: endpoint and credential settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// OpenAI-compatible API endpoint URL.
    pub endpoint: Option<String>,
    /// API key stored directly in config (not recommended).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
}

impl ApiConfig {
    /// Gets the API key, preferring the environment variable over the
    /// config file value. The key is never written back to disk alongside
    /// transcripts.
    pub fn get_api_key(&self) -> Option<String> {
        let env_var = self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV);
        if let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api_key.clone()
    }
}

/// A user-defined persona in a `[personas.<key>]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomPersona {
    /// Human-readable description for listings.
    #[serde(default)]
    pub description: String,
    /// System prompt sent with every completion request.
    pub system_prompt: String,
    /// Opening line of a new conversation.
    pub greeting: String,
    /// User input that ends the session (defaults to `EXIT`).
    #[serde(default)]
    pub exit_cue: Option<String>,
    /// Sign-off before the program terminates.
    #[serde(default)]
    pub goodbye: Option<String>,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/banter/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Default settings.
    #[serde(default)]
    pub banter: BanterConfig,
    /// API endpoint and credential settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Custom personas keyed by name.
    #[serde(default)]
    pub personas: HashMap<String, CustomPersona>,
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The API endpoint URL.
    pub endpoint: String,
    /// The model to use for completions.
    pub model: String,
    /// The API key for outbound requests.
    pub api_key: String,
    /// Match the exit cue case-insensitively.
    pub exit_cue_ignores_case: bool,
    /// Maximum number of turns kept in the context window.
    pub history_limit: Option<usize>,
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Model name override.
    pub model: Option<String>,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// Endpoint and model fall back to built-in defaults; a missing API key is a
/// startup-fatal error since the remote service rejects unauthenticated
/// requests anyway.
pub fn resolve_config(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig> {
    let endpoint = config_file
        .api
        .endpoint
        .clone()
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    let model = options
        .model
        .as_ref()
        .or(config_file.banter.model.as_ref())
        .cloned()
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let Some(api_key) = config_file.api.get_api_key() else {
        let env_var = config_file
            .api
            .api_key_env
            .as_deref()
            .unwrap_or(DEFAULT_API_KEY_ENV);
        bail!(
            "Missing required configuration: 'api_key'\n\n\
             Set the {env_var} environment variable:\n  \
             export {env_var}=\"your-api-key\"\n\n\
             Or run 'banter configure' to store it in \
             ~/.config/banter/config.toml"
        );
    };

    Ok(ResolvedConfig {
        endpoint,
        model,
        api_key,
        exit_cue_ignores_case: config_file.banter.exit_cue_ignores_case,
        history_limit: config_file.banter.history_limit,
    })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/banter/config.toml`
    /// or `~/.config/banter/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir().join("config.toml"),
        })
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }

    pub fn load_or_default(&self) -> ConfigFile {
        self.load().unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager {
            config_path: temp_dir.path().join("config.toml"),
        }
    }

    fn create_test_config() -> ConfigFile {
        let mut personas = HashMap::new();
        personas.insert(
            "marvin".to_string(),
            CustomPersona {
                description: "Gloomy android".to_string(),
                system_prompt: "You are a depressed robot.".to_string(),
                greeting: "Life. Don't talk to me about life.".to_string(),
                exit_cue: None,
                goodbye: None,
            },
        );

        ConfigFile {
            banter: BanterConfig {
                model: Some("gpt-3.5-turbo".to_string()),
                exit_cue_ignores_case: false,
                history_limit: Some(40),
            },
            api: ApiConfig {
                endpoint: Some("http://localhost:11434".to_string()),
                api_key: Some("test-key".to_string()),
                api_key_env: None,
            },
            personas,
        }
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        manager.save(&create_test_config()).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(loaded.banter.model, Some("gpt-3.5-turbo".to_string()));
        assert_eq!(loaded.banter.history_limit, Some(40));
        assert_eq!(loaded.api.endpoint, Some("http://localhost:11434".to_string()));
        assert!(loaded.personas.contains_key("marvin"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        assert!(manager.load().is_err());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: ConfigFile = toml::from_str(
            r#"
            [api]
            api_key = "sk-test"
            "#,
        )
        .unwrap();

        assert!(config.banter.model.is_none());
        assert!(!config.banter.exit_cue_ignores_case);
        assert_eq!(config.api.api_key, Some("sk-test".to_string()));
        assert!(config.personas.is_empty());
    }

    #[test]
    #[serial]
    fn test_get_api_key_from_named_env() {
        // SAFETY: serialized test, modifies only a test-specific env var
        unsafe {
            std::env::set_var("BANTER_TEST_API_KEY", "env-key-value");
        }

        let api = ApiConfig {
            endpoint: None,
            api_key: Some("fallback-key".to_string()),
            api_key_env: Some("BANTER_TEST_API_KEY".to_string()),
        };

        // Environment variable takes priority
        assert_eq!(api.get_api_key(), Some("env-key-value".to_string()));

        // SAFETY: cleanup test env var
        unsafe {
            std::env::remove_var("BANTER_TEST_API_KEY");
        }
    }

    #[test]
    #[serial]
    fn test_get_api_key_fallback_to_config_value() {
        // SAFETY: serialized test, modifies only a test-specific env var
        unsafe {
            std::env::remove_var("BANTER_TEST_NONEXISTENT_KEY");
        }

        let api = ApiConfig {
            endpoint: None,
            api_key: Some("fallback-key".to_string()),
            api_key_env: Some("BANTER_TEST_NONEXISTENT_KEY".to_string()),
        };

        assert_eq!(api.get_api_key(), Some("fallback-key".to_string()));
    }

    #[test]
    fn test_resolve_config_defaults() {
        let mut config = create_test_config();
        config.api.endpoint = None;
        config.banter.model = None;
        config.banter.history_limit = None;

        let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();

        assert_eq!(resolved.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(resolved.model, DEFAULT_MODEL);
        assert_eq!(resolved.api_key, "test-key");
        assert!(resolved.history_limit.is_none());
    }

    #[test]
    fn test_resolve_config_cli_model_overrides_file() {
        let options = ResolveOptions {
            model: Some("gpt-4o".to_string()),
        };

        let resolved = resolve_config(&options, &create_test_config()).unwrap();

        assert_eq!(resolved.model, "gpt-4o");
    }

    #[test]
    #[serial]
    fn test_resolve_config_missing_api_key() {
        let mut config = create_test_config();
        config.api.api_key = None;
        config.api.api_key_env = Some("BANTER_TEST_NONEXISTENT_KEY".to_string());

        let result = resolve_config(&ResolveOptions::default(), &config);

        assert!(result.is_err());
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("api_key"));
        assert!(msg.contains("BANTER_TEST_NONEXISTENT_KEY"));
    }
}
