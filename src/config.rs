//! Runtime configuration read from the environment.

use std::path::PathBuf;

use thiserror::Error;

/// Default port for the webhook server
pub const DEFAULT_WEBHOOK_PORT: u16 = 9443;

/// Default path for the webhook TLS certificate
pub const DEFAULT_CERT_PATH: &str = "/etc/webhook/certs/tls.crt";

/// Default path for the webhook TLS private key
pub const DEFAULT_KEY_PATH: &str = "/etc/webhook/certs/tls.key";

/// Default port for the health and metrics server
pub const DEFAULT_HEALTH_PORT: u16 = 8080;

/// Errors raised while reading configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {var}: expected a port number between 1 and 65535")]
    InvalidPort { var: &'static str, value: String },
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub webhook_port: u16,
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
    pub health_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webhook_port: DEFAULT_WEBHOOK_PORT,
            cert_path: PathBuf::from(DEFAULT_CERT_PATH),
            key_path: PathBuf::from(DEFAULT_KEY_PATH),
            health_port: DEFAULT_HEALTH_PORT,
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            webhook_port: parse_port("WEBHOOK_PORT", lookup("WEBHOOK_PORT"))?
                .unwrap_or(defaults.webhook_port),
            cert_path: lookup("WEBHOOK_CERT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.cert_path),
            key_path: lookup("WEBHOOK_KEY_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.key_path),
            health_port: parse_port("HEALTH_PORT", lookup("HEALTH_PORT"))?
                .unwrap_or(defaults.health_port),
        })
    }

    /// Whether both TLS files exist on disk.
    pub fn certificates_present(&self) -> bool {
        self.cert_path.exists() && self.key_path.exists()
    }
}

fn parse_port(var: &'static str, value: Option<String>) -> Result<Option<u16>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(Some(port)),
        _ => Err(ConfigError::InvalidPort { var, value }),
    }
}
