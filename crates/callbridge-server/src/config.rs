//! Server configuration loading from file and environment variables.

use callbridge_voice::{LiveKitConfig, TelephonyConfig};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level configuration shared by the HTTP gateway and the dial CLI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// LiveKit control plane connection.
    #[serde(default)]
    pub livekit: LiveKitConfig,

    /// Outbound dialing.
    #[serde(default)]
    pub telephony: TelephonyConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "callbridge_voice=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// No outbound SIP trunk configured.
    #[error("telephony.outbound_trunk_id is not set (LIVEKIT_OUTBOUND_TRUNK_ID)")]
    MissingTrunkId,

    /// A LiveKit credential is missing.
    #[error("livekit.{0} is not set")]
    MissingCredential(&'static str),
}

impl Config {
    /// Checks that everything needed to place a call is present, so a missing
    /// trunk or credential stops startup instead of failing the first call.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(field) = self.livekit.missing_field() {
            return Err(ConfigError::MissingCredential(field));
        }
        if self.telephony.trunk_id().is_none() {
            return Err(ConfigError::MissingTrunkId);
        }
        Ok(())
    }
}

/// Loads configuration from a TOML file, falling back to defaults, then
/// applies overrides from the process environment.
///
/// Environment variable overrides:
/// - `CALLBRIDGE_HOST` overrides `server.host`
/// - `CALLBRIDGE_PORT` overrides `server.port`
/// - `CALLBRIDGE_LOG_LEVEL` overrides `logging.level`
/// - `CALLBRIDGE_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `LIVEKIT_URL`, `LIVEKIT_API_KEY`, `LIVEKIT_API_SECRET` override `livekit.*`
/// - `LIVEKIT_OUTBOUND_TRUNK_ID` overrides `telephony.outbound_trunk_id`
/// - `CALLBRIDGE_AGENT_NAME` overrides `telephony.agent_name`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// [`load_config`] with an explicit environment lookup.
pub fn load_config_with(
    path: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    if let Some(host) = env("CALLBRIDGE_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Some(port) = env("CALLBRIDGE_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Some(level) = env("CALLBRIDGE_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = env("CALLBRIDGE_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Some(url) = env("LIVEKIT_URL") {
        config.livekit.url = url;
    }
    if let Some(key) = env("LIVEKIT_API_KEY") {
        config.livekit.api_key = key;
    }
    if let Some(secret) = env("LIVEKIT_API_SECRET") {
        config.livekit.api_secret = secret;
    }
    if let Some(trunk) = env("LIVEKIT_OUTBOUND_TRUNK_ID") {
        config.telephony.outbound_trunk_id = Some(trunk);
    }
    if let Some(agent_name) = env("CALLBRIDGE_AGENT_NAME") {
        config.telephony.agent_name = agent_name;
    }

    Ok(config)
}
