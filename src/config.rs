// src/config.rs
use std::{
    env,
    net::SocketAddr,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::Level;

use crate::services::openai::{DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("failed to read secrets file {path}: {source}")]
    Secrets {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse secrets file {path}: {source}")]
    SecretsFormat {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Which backend answers chat and image requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderMode {
    Live,
    Placeholder,
}

impl FromStr for ProviderMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" | "openai" => Ok(ProviderMode::Live),
            "placeholder" | "echo" => Ok(ProviderMode::Placeholder),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub mode: ProviderMode,
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub chat_model: String,
    pub chat_max_tokens: Option<u32>,
    pub session_ttl: Duration,
    pub purge_interval: Duration,
    pub admin_key: Option<String>,
    pub public_dir: PathBuf,
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            mode: ProviderMode::Placeholder,
            api_key: None,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            chat_max_tokens: None,
            session_ttl: Duration::from_secs(3600),
            purge_interval: Duration::from_secs(60),
            admin_key: None,
            public_dir: PathBuf::from("public"),
            log_level: Level::INFO,
        }
    }
}

/// Layout of the secrets file:
///
/// ```toml
/// [openai]
/// api_key = "sk-..."
/// ```
#[derive(Debug, Default, Deserialize)]
struct Secrets {
    openai: Option<OpenAiSecrets>,
}

#[derive(Debug, Deserialize)]
struct OpenAiSecrets {
    api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secrets_path = get("SECRETS_PATH").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("secrets.toml"));
        let api_key = match read_secret_api_key(&secrets_path)? {
            Some(key) => Some(key),
            None => get("OPENAI_API_KEY"),
        };

        let mode = match get("ASSISTANT_MODE") {
            Some(raw) => raw
                .parse::<ProviderMode>()
                .map_err(|_| ConfigError::Invalid { key: "ASSISTANT_MODE", value: raw.clone() })?,
            None if api_key.is_some() => ProviderMode::Live,
            None => ProviderMode::Placeholder,
        };

        Ok(Self {
            bind_addr: parse_or(get("BIND_ADDR"), "BIND_ADDR", defaults.bind_addr)?,
            mode,
            api_key,
            api_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.api_base_url),
            chat_model: get("CHAT_MODEL").unwrap_or(defaults.chat_model),
            chat_max_tokens: get("CHAT_MAX_TOKENS")
                .map(|raw| parse_value(raw, "CHAT_MAX_TOKENS"))
                .transpose()?,
            session_ttl: Duration::from_secs(parse_or(get("SESSION_TTL_SECS"), "SESSION_TTL_SECS", defaults.session_ttl.as_secs())?),
            purge_interval: Duration::from_secs(parse_or(
                get("SESSION_PURGE_SECS"),
                "SESSION_PURGE_SECS",
                defaults.purge_interval.as_secs(),
            )?),
            admin_key: get("ADMIN_KEY"),
            public_dir: get("PUBLIC_DIR").map(PathBuf::from).unwrap_or(defaults.public_dir),
            log_level: parse_or(get("LOG_LEVEL"), "LOG_LEVEL", defaults.log_level)?,
        })
    }
}

/// Reads `[openai] api_key` from the secrets file. A missing file is not an
/// error; an unreadable or malformed one is.
fn read_secret_api_key(path: &Path) -> Result<Option<String>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(ConfigError::Secrets { path: path.to_path_buf(), source }),
    };

    let secrets: Secrets = toml::from_str(&content)
        .map_err(|source| ConfigError::SecretsFormat { path: path.to_path_buf(), source })?;
    Ok(secrets
        .openai
        .and_then(|openai| openai.api_key)
        .filter(|key| !key.trim().is_empty()))
}

fn parse_value<T: FromStr>(raw: String, key: &'static str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw })
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => parse_value(raw, key),
        None => Ok(default),
    }
}
