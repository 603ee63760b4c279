//! Client configuration

use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use exeris_domain::CharacterId;

const DEFAULT_SERVER_URL: &str = "ws://localhost:5000/socket";
const DEFAULT_RECONNECT_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("EXERIS_SERVER_URL is not a valid URL: {0}")]
    InvalidServerUrl(String),
    #[error("EXERIS_SERVER_URL must use ws or wss, got {0}")]
    UnsupportedScheme(String),
    #[error("EXERIS_CHARACTER_ID is not a valid character id: {0}")]
    InvalidCharacterId(String),
    #[error("EXERIS_RECONNECT_DELAY_MS must be a number of milliseconds: {0}")]
    InvalidReconnectDelay(String),
}

/// Client configuration loaded from environment
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Socket endpoint of the game server
    pub server_url: Url,
    /// Character whose session is opened on start
    pub character_id: Option<CharacterId>,
    /// Pause between teardown and re-establish when the server asks to reconnect
    pub reconnect_delay: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables, after a best-effort `.env`
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup("EXERIS_SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let server_url =
            Url::parse(&raw_url).map_err(|e| ConfigError::InvalidServerUrl(e.to_string()))?;
        if !matches!(server_url.scheme(), "ws" | "wss") {
            return Err(ConfigError::UnsupportedScheme(server_url.scheme().to_string()));
        }

        let character_id = lookup("EXERIS_CHARACTER_ID")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(|s| CharacterId::parse(&s).map_err(|_| ConfigError::InvalidCharacterId(s)))
            .transpose()?;

        let reconnect_delay = match lookup("EXERIS_RECONNECT_DELAY_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidReconnectDelay(raw))?,
            None => Duration::from_millis(DEFAULT_RECONNECT_DELAY_MS),
        };

        Ok(Self {
            server_url,
            character_id,
            reconnect_delay,
        })
    }
}
