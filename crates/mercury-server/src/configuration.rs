use crate::error::{to_env_var, ConfigError, ENV_PREFIX};
use config::{Config, Environment};
use mercury::providers::configs::{INCEPTION_HOST, INCEPTION_MODEL};
use mercury::search::tavily::TAVILY_HOST;
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                env_var: to_env_var("server.host"),
                reason: e.to_string(),
            })
    }
}

/// Where the model and search APIs live
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSettings {
    #[serde(default = "default_inception_host")]
    pub inception_host: String,
    #[serde(default = "default_tavily_host")]
    pub tavily_host: String,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            inception_host: default_inception_host(),
            tavily_host: default_tavily_host(),
            model: default_model(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Comma separated list of origins allowed to call the relay
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl CorsSettings {
    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub upstream: UpstreamSettings,
    #[serde(default)]
    pub cors: CorsSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate()
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("upstream.inception_host", default_inception_host())?
            .set_default("upstream.tavily_host", default_tavily_host())?
            .set_default("upstream.model", default_model())?
            .set_default("cors.allowed_origins", default_allowed_origins())?
            // Layer on the environment variables
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = config.try_deserialize().map_err(|err| {
            tracing::debug!("Configuration error: {:?}", &err);
            ConfigError::Other(err)
        })?;

        if settings.cors.origins().is_empty() {
            return Err(ConfigError::InvalidValue {
                env_var: to_env_var("cors.allowed_origins"),
                reason: "no origin given".to_string(),
            });
        }
        Ok(settings)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_inception_host() -> String {
    INCEPTION_HOST.to_string()
}

fn default_tavily_host() -> String {
    TAVILY_HOST.to_string()
}

fn default_model() -> String {
    INCEPTION_MODEL.to_string()
}

fn default_allowed_origins() -> String {
    "http://localhost:3000,http://localhost:5173".to_string()
}
