//! Configuration management for the PDF parse gateway

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the LlamaParse API key (required)
pub const API_KEY_VAR: &str = "LLAMA_CLOUD_API_KEY";

/// Default LlamaParse cloud endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.cloud.llamaindex.ai";

/// Default scratch directory for uploaded PDFs
pub const DEFAULT_UPLOAD_DIR: &str = "uploaded_files";

/// Default request body limit: 100MB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub parser: ParserConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct ParserConfig {
    pub api_key: String,
    pub base_url: String,
    pub result_type: ResultType,
    pub language: String,
    /// Delay between job status polls
    pub check_interval: Duration,
    /// Upper bound on how long a single parse job may run
    pub max_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

/// Which rendering of each page the provider should return as chunk text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultType {
    #[default]
    Text,
    Markdown,
}

impl ResultType {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "markdown" | "md" => Some(Self::Markdown),
            _ => None,
        }
    }
}

/// Configuration errors are fatal at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("LLAMA_CLOUD_API_KEY is not set in environment variables")]
    MissingApiKey,

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        // A zero interval would poll the provider in a tight loop
        let check_interval = match parse_or(&lookup, "LLAMA_PARSE_CHECK_INTERVAL_SECS", 1)? {
            0 => {
                return Err(ConfigError::InvalidValue {
                    key: "LLAMA_PARSE_CHECK_INTERVAL_SECS",
                    value: "0".to_string(),
                })
            }
            secs => Duration::from_secs(secs),
        };

        let result_type = match lookup("LLAMA_PARSE_RESULT_TYPE") {
            Some(value) => ResultType::parse(&value).ok_or(ConfigError::InvalidValue {
                key: "LLAMA_PARSE_RESULT_TYPE",
                value,
            })?,
            None => ResultType::default(),
        };

        Ok(Config {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or(&lookup, "SERVER_PORT", 8000)?,
            },
            parser: ParserConfig {
                api_key,
                base_url: lookup("LLAMA_CLOUD_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                result_type,
                language: lookup("LLAMA_PARSE_LANGUAGE").unwrap_or_else(|| "en".to_string()),
                check_interval,
                max_timeout: Duration::from_secs(parse_or(
                    &lookup,
                    "LLAMA_PARSE_MAX_TIMEOUT_SECS",
                    2000,
                )?),
            },
            upload: UploadConfig {
                dir: lookup("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
                max_bytes: parse_or(&lookup, "UPLOAD_MAX_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}
