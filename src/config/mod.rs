//! Runtime configuration, resolved once at startup and handed to the client.

use url::Url;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/diagnostico";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported endpoint scheme {0:?}, expected http or https")]
    UnsupportedScheme(String),
    #[error("user agent cannot be empty")]
    EmptyUserAgent,
}

#[derive(Debug, Clone)]
pub struct Config {
    endpoint: Url,
    user_agent: String,
}

impl Config {
    pub fn new(endpoint: &str, user_agent: impl Into<String>) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(endpoint).map_err(|source| ConfigError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            source,
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(endpoint.scheme().to_string()));
        }

        let user_agent = user_agent.into();
        if user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyUserAgent);
        }

        Ok(Self {
            endpoint,
            user_agent,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

pub fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
