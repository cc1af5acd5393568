//! Runtime configuration.
//!
//! Defaults match the development backend. Every field can be overridden by a
//! `STOREFRONT_*` environment variable; a `.env` file in the working directory
//! is loaded first and never overrides variables that are already set.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::notifications::ReconnectPolicy;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8888/api/v1";
pub const DEFAULT_IMAGE: &str = "default.jpg";
pub const DEFAULT_ADDRESS: &str = "Thôn 4, Quỳnh Giang";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontConfig {
    pub api_base_url: String,
    pub image_base_url: String,
    pub default_image: String,
    pub request_timeout: Duration,
    /// Capacity of the cart and notification service mailboxes.
    pub channel_buffer: usize,
    /// Directory holding the persisted local/session stores.
    pub data_dir: PathBuf,
    pub default_address: String,
    pub reconnect: ReconnectPolicy,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            image_base_url: format!("{}/product/uploads/", DEFAULT_API_BASE_URL),
            default_image: DEFAULT_IMAGE.to_string(),
            request_timeout: Duration::from_secs(30),
            channel_buffer: 32,
            data_dir: PathBuf::from(".storefront"),
            default_address: DEFAULT_ADDRESS.to_string(),
            reconnect: ReconnectPolicy::Never,
        }
    }
}

impl StorefrontConfig {
    /// Loads `.env` and overlays the process environment on the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("STOREFRONT_API_BASE_URL") {
            config.api_base_url = url.trim_end_matches('/').to_string();
            config.image_base_url = format!("{}/product/uploads/", config.api_base_url);
        }
        if let Some(url) = lookup("STOREFRONT_IMAGE_BASE_URL") {
            config.image_base_url = url;
        }
        if let Some(image) = lookup("STOREFRONT_DEFAULT_IMAGE") {
            config.default_image = image;
        }
        if let Some(secs) = lookup("STOREFRONT_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(parse("STOREFRONT_REQUEST_TIMEOUT_SECS", &secs)?);
        }
        if let Some(buffer) = lookup("STOREFRONT_CHANNEL_BUFFER") {
            let buffer: usize = parse("STOREFRONT_CHANNEL_BUFFER", &buffer)?;
            if buffer == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "STOREFRONT_CHANNEL_BUFFER".into(),
                    reason: "must be greater than zero".into(),
                });
            }
            config.channel_buffer = buffer;
        }
        if let Some(dir) = lookup("STOREFRONT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(address) = lookup("STOREFRONT_DEFAULT_ADDRESS") {
            config.default_address = address;
        }

        let delay = lookup("STOREFRONT_SSE_RECONNECT_DELAY_MS");
        let attempts = lookup("STOREFRONT_SSE_RECONNECT_ATTEMPTS");
        if let Some(delay) = delay {
            let delay_ms: u64 = parse("STOREFRONT_SSE_RECONNECT_DELAY_MS", &delay)?;
            let max_attempts = match attempts {
                Some(attempts) => parse("STOREFRONT_SSE_RECONNECT_ATTEMPTS", &attempts)?,
                None => 3,
            };
            config.reconnect = ReconnectPolicy::Fixed {
                delay: Duration::from_millis(delay_ms),
                max_attempts,
            };
        }

        debug!(api_base_url = %config.api_base_url, "Configuration loaded");
        Ok(config)
    }

    pub fn local_store_path(&self) -> PathBuf {
        self.data_dir.join("local.json")
    }

    pub fn session_store_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
