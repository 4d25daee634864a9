//! Server configuration loaded from TOML.

use crate::bot::BotKind;
use crate::error::ConfigError;
use derive_getters::Getters;
use ludo_core::{Color, MAX_PLAYERS, PlayerSpec};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};

/// Settings for the HTTP server and new games.
///
/// Every field is optional in the file:
///
/// ```toml
/// host = "0.0.0.0"
/// port = 8080
/// seed = 42
/// bot_strategy = "greedy"
///
/// [[default_players]]
/// name = "Green"
/// color = "green"
///
/// [[default_players]]
/// name = "Robot"
/// color = "red"
/// is_bot = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,

    /// Base seed for game dice; games get consecutive seeds from it.
    #[serde(default)]
    seed: Option<u64>,

    /// Strategy used for bot seats.
    #[serde(default)]
    bot_strategy: BotKind,

    /// Seats filled when a game is created without a player list.
    #[serde(default = "default_players")]
    default_players: Vec<PlayerSpec>,
}

#[instrument]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[instrument]
fn default_port() -> u16 {
    8080
}

/// Green, Red, Blue and Yellow, all human.
#[instrument]
pub fn default_players() -> Vec<PlayerSpec> {
    Color::iter()
        .map(|color| PlayerSpec::human(color.to_string(), color))
        .collect()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            seed: None,
            bot_strategy: BotKind::default(),
            default_players: default_players(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Parses and validates configuration text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies command-line overrides on top of file values.
    #[instrument(skip(self))]
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        seed: Option<u64>,
        bot_strategy: Option<BotKind>,
    ) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if seed.is_some() {
            self.seed = seed;
        }
        if let Some(bot_strategy) = bot_strategy {
            self.bot_strategy = bot_strategy;
        }
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_players.len() > MAX_PLAYERS {
            return Err(ConfigError::new(format!(
                "default_players lists {} seats, at most {} allowed",
                self.default_players.len(),
                MAX_PLAYERS
            )));
        }
        Ok(())
    }
}
