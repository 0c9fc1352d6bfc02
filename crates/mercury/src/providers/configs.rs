use std::time::Duration;

pub const INCEPTION_HOST: &str = "https://api.inceptionlabs.ai";
pub const INCEPTION_MODEL: &str = "mercury-coder";
pub const DEFAULT_MAX_TOKENS: u32 = 800;
pub const VALIDATION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct InceptionProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub validation_timeout: Duration,
}

impl InceptionProviderConfig {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            host: INCEPTION_HOST.to_string(),
            api_key: api_key.into(),
            model: INCEPTION_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            validation_timeout: VALIDATION_TIMEOUT,
        }
    }

    pub fn with_host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.host.trim_end_matches('/'))
    }
}
