use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::ApiToken;

const DEFAULT_BASE_URL: &str = "https://api.pagerduty.com";
const DEFAULT_PAGE_SIZE: u32 = 100;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ENV_PREFIX: &str = "PD_ONCALL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ApiConfig {
    #[serde(default = "default::base_url")]
    pub base_url: Url,

    #[serde(default = "default::timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default = "default::page_size")]
    pub page_size: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<ApiToken>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default::base_url(),
            timeout: default::timeout(),
            page_size: default::page_size(),
            token: None,
        }
    }
}

mod default {
    use super::*;

    pub fn base_url() -> Url {
        Url::parse(DEFAULT_BASE_URL).expect("default base url is valid")
    }

    pub fn timeout() -> Duration {
        DEFAULT_TIMEOUT
    }

    pub fn page_size() -> u32 {
        DEFAULT_PAGE_SIZE
    }
}

/// Layers the given TOML files (each must exist) and `PD_ONCALL_*`
/// environment variables over the defaults.
pub fn load_config<'a>(
    config_files: impl Iterator<Item = &'a Path>,
) -> eyre::Result<Config> {
    let mut settings = config::Config::builder();

    for config_file in config_files {
        settings = settings.add_source(config::File::from(config_file));
    }

    let settings = settings
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = settings.try_deserialize::<Config>()?;

    Ok(config)
}
