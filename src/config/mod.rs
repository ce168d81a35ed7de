use crate::error::ApiError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;

const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_MAX_COMPLETION_TOKENS: u32 = 300;

/// Settings shared by every deployment: the listen port, overridable through an
/// optional `configuration` file or `APP__*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct CommonConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3001
}

impl CommonConfig {
    pub fn load() -> Result<Self, ApiError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisionQaConfig {
    #[serde(flatten)]
    pub common: CommonConfig,
    pub storage: StorageConfig,
    pub static_assets: StaticAssetsConfig,
    pub openai: OpenAiSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding per-request temporary uploads.
    pub upload_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaticAssetsConfig {
    /// Directory served for any route the API does not claim.
    pub public_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub model: String,
    /// Cap on generated completion tokens per answer.
    pub max_tokens: u32,
}

impl VisionQaConfig {
    pub fn load() -> Result<Self, ApiError> {
        let common = CommonConfig::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(VisionQaConfig {
            common,
            storage: StorageConfig {
                upload_dir: get_env("UPLOAD_DIR", Some("uploads"), is_prod)?,
            },
            static_assets: StaticAssetsConfig {
                public_dir: get_env("PUBLIC_DIR", Some("public"), is_prod)?,
            },
            openai: OpenAiSettings {
                // A missing key is passed through as-is and fails at the provider
                // on first use, not at startup.
                api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
                model: get_env("OPENAI_MODEL", Some(DEFAULT_MODEL), is_prod)?,
                max_tokens: get_env(
                    "OPENAI_MAX_TOKENS",
                    Some(&DEFAULT_MAX_COMPLETION_TOKENS.to_string()),
                    is_prod,
                )?
                .parse()
                .unwrap_or(DEFAULT_MAX_COMPLETION_TOKENS),
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, ApiError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(ApiError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(ApiError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
