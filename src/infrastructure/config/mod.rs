//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::errors::ConfigError;
use crate::application::logging::BanFallback;
use crate::application::messaging::Deployment;

/// Channel that belongs to the test deployment
pub const DEFAULT_TEST_CHANNEL_ID: &str = "872881918616686696";

/// Log channel written by `init-config`; only the console accepts it
const PLACEHOLDER_LOG_CHANNEL_ID: &str = "0";

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub deployment: DeploymentConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DeploymentConfig {
    pub mode: Deployment,
    pub test_channel_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Channel that receives audit-log entries
    pub channel_id: String,
    pub cache_capacity: usize,
    #[serde(default)]
    pub ban_fallback: BanFallback,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub discord: Option<DiscordConfig>,
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiscordConfig {
    pub enabled: bool,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "xorbot".to_string(),
                prefix: "!".to_string(),
            },
            deployment: DeploymentConfig {
                mode: Deployment::Production,
                test_channel_id: DEFAULT_TEST_CHANNEL_ID.to_string(),
            },
            logging: LoggingConfig {
                channel_id: PLACEHOLDER_LOG_CHANNEL_ID.to_string(),
                cache_capacity: 5,
                ban_fallback: BanFallback::Degraded,
            },
            database: DatabaseConfig {
                path: PathBuf::from("xorbot.db"),
            },
            adapters: AdaptersConfig {
                discord: Some(DiscordConfig {
                    enabled: false,
                    token: None,
                }),
                console: Some(ConsoleConfig { enabled: true }),
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    /// Load `path` when it exists, defaults otherwise. A file that exists
    /// but cannot be read or parsed is an error.
    pub fn load_or_default(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Override fields from environment variables
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var("BOT_TOKEN") {
            self.set_token(token);
        }

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }

        if let Ok(channel) = std::env::var("LOG_CHANNEL_ID") {
            self.logging.channel_id = channel;
        }

        if let Ok(path) = std::env::var("DATABASE_PATH") {
            self.database.path = PathBuf::from(path);
        }

        if let Ok(flag) = std::env::var("BOT_TEST_BUILD") {
            if matches!(flag.as_str(), "1" | "true" | "yes") {
                self.deployment.mode = Deployment::Test;
            }
        }
    }

    /// Enable the Discord adapter with `token`
    pub fn set_token(&mut self, token: String) {
        self.adapters.discord = Some(DiscordConfig {
            enabled: true,
            token: Some(token),
        });
    }

    /// The command prefix as a single character
    pub fn prefix(&self) -> Result<char, ConfigError> {
        let mut chars = self.bot.prefix.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_whitespace() => Ok(c),
            _ => Err(ConfigError::InvalidValue(format!(
                "bot.prefix must be a single character, got '{}'",
                self.bot.prefix
            ))),
        }
    }

    /// Token of the Discord adapter, if it is enabled
    pub fn discord_token(&self) -> Option<&str> {
        self.adapters
            .discord
            .as_ref()
            .filter(|d| d.enabled)
            .and_then(|d| d.token.as_deref())
    }

    pub fn console_enabled(&self) -> bool {
        self.adapters.console.as_ref().is_some_and(|c| c.enabled)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.prefix()?;

        if self.logging.cache_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "logging.cache-capacity must be at least 1".to_string(),
            ));
        }
        if self.logging.channel_id.trim().is_empty() {
            return Err(ConfigError::MissingField("logging.channel-id".to_string()));
        }
        if self.deployment.test_channel_id.trim().is_empty() {
            return Err(ConfigError::MissingField("deployment.test-channel-id".to_string()));
        }
        if let Some(discord) = &self.adapters.discord {
            if discord.enabled && discord.token.as_deref().map_or(true, str::is_empty) {
                return Err(ConfigError::MissingField("adapters.discord.token".to_string()));
            }
        }
        if self.discord_token().is_some() && self.logging.channel_id == PLACEHOLDER_LOG_CHANNEL_ID {
            return Err(ConfigError::InvalidValue(
                "logging.channel-id must be set when the Discord adapter is enabled".to_string(),
            ));
        }
        if self.discord_token().is_none() && !self.console_enabled() {
            return Err(ConfigError::InvalidValue("no adapter is enabled".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.prefix().unwrap(), '!');
        assert_eq!(config.logging.cache_capacity, 5);
        assert!(config.discord_token().is_none());
    }

    #[test]
    fn test_yaml_round_trip_uses_kebab_case() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        assert!(yaml.contains("cache-capacity: 5"));
        assert!(yaml.contains("test-channel-id"));

        let parsed = Config::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.deployment.mode, Deployment::Production);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
bot:
  name: xorbot
  prefix: "?"
deployment:
  mode: test
  test-channel-id: "123"
logging:
  channel-id: "456"
  cache-capacity: 10
  ban-fallback: drop
database:
  path: bot.db
adapters:
  discord:
    enabled: true
    token: abc
  console: null
"#;
        let config = Config::from_yaml(yaml).unwrap();

        assert_eq!(config.prefix().unwrap(), '?');
        assert_eq!(config.deployment.mode, Deployment::Test);
        assert_eq!(config.logging.ban_fallback, BanFallback::Drop);
        assert_eq!(config.discord_token(), Some("abc"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = Config::default();
        config.bot.prefix = "!!".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));

        let mut config = Config::default();
        config.logging.cache_capacity = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));

        let mut config = Config::default();
        config.adapters.discord = Some(DiscordConfig {
            enabled: true,
            token: None,
        });
        assert!(matches!(config.validate(), Err(ConfigError::MissingField(_))));
    }

    #[test]
    fn test_discord_needs_a_real_log_channel() {
        let mut config = Config::default();
        config.set_token("abc".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));

        config.logging.channel_id = "456".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_some_adapter_must_be_enabled() {
        let mut config = Config::default();
        config.adapters.console = Some(ConsoleConfig { enabled: false });
        assert!(!config.console_enabled());
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));

        config.adapters.console = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default() {
        let dir = std::env::temp_dir().join(format!("xorbot-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let missing = Config::load_or_default(dir.join("missing.yaml")).unwrap();
        assert_eq!(missing.logging.cache_capacity, 5);

        let broken = dir.join("broken.yaml");
        std::fs::write(&broken, "logging: [not, a, map").unwrap();
        assert!(matches!(Config::load_or_default(&broken), Err(ConfigError::Parse(_))));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
