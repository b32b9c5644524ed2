//! Layered service configuration.
//!
//! Sources, lowest to highest priority:
//! - compiled defaults (`Config::default()`)
//! - `config.toml` in the working directory (optional)
//! - `PICTURA_*` environment variables, `__` separating sections
//!   (e.g. `PICTURA_DATABASE__POOL_SIZE=5`)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "PICTURA_";

/// Hosted BLIP base checkpoint behind an image-to-text inference endpoint.
pub const DEFAULT_CAPTION_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/Salesforce/blip-image-captioning-base";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub database: DatabaseConfig,
    pub caption: CaptionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub loglevel: String,
    /// Upper bound for an uploaded request body, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    /// Connections kept open in the pool.
    pub pool_size: u32,
    /// Extra connections allowed on top of `pool_size` under load.
    pub max_overflow: u32,
    pub acquire_timeout_secs: u64,
    pub init_schema: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:pictura.sqlite".to_string(),
            pool_size: 20,
            max_overflow: 10,
            acquire_timeout_secs: 30,
            init_schema: true,
        }
    }
}

impl DatabaseConfig {
    pub fn max_connections(&self) -> u32 {
        self.pool_size.saturating_add(self.max_overflow).max(1)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    pub endpoint: Url,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
    pub proxy: Option<Url>,
    /// When set, every image gets this caption and the endpoint is never called.
    pub fixed_text: Option<String>,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_CAPTION_ENDPOINT)
                .expect("default caption endpoint is a valid URL"),
            api_token: None,
            timeout_secs: 60,
            proxy: None,
            fixed_text: None,
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}
