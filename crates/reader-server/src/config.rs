use std::net::SocketAddr;

use reader_common::openai::ChatClientConfig;
use reader_common::prompt::DEFAULT_ANALYSIS_MODEL;

use crate::error::AppError;

pub const DEFAULT_ZHIPU_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Server configuration loaded explicitly from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    /// Model identifier sent with every analysis request.
    pub model: String,
    /// Chat-completion provider used for book analysis.
    pub zhipu: ChatClientConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `ZHIPU_API_KEY`: bearer token for the chat-completion API
    ///
    /// Optional:
    /// - `ZHIPU_BASE_URL`, `ZHIPU_TIMEOUT_SECS`, `ZHIPU_MAX_ERROR_BODY_BYTES`
    /// - `ZHIPU_MODEL` (default `glm-4-flash`)
    /// - `READER_BIND_ADDR` (default `0.0.0.0:3000`)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let zhipu = ChatClientConfig::from_lookup("ZHIPU", DEFAULT_ZHIPU_BASE_URL, &lookup)?;

        let model = lookup("ZHIPU_MODEL")
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_ANALYSIS_MODEL.to_string());

        let raw_addr = lookup("READER_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.trim().parse::<SocketAddr>().map_err(|e| {
            AppError::Config(format!("READER_BIND_ADDR {raw_addr:?} is not a socket address: {e}"))
        })?;

        Ok(Self {
            bind_addr,
            model,
            zhipu,
        })
    }
}
