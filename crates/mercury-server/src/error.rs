use thiserror::Error;

pub const ENV_PREFIX: &str = "MERCURY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {env_var}: {reason}")]
    InvalidValue { env_var: String, reason: String },

    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

/// Name of the environment variable that sets a dotted settings key
pub fn to_env_var(field: &str) -> String {
    format!("{}_{}", ENV_PREFIX, field.replace('.', "__").to_uppercase())
}
