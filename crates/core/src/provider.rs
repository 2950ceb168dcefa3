pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

/// Connection settings for the Gemini backend, injected at construction.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub api_url: String,
    pub model: String,
    pub api_key: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
        }
    }
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Read the key from `GEMINI_API_KEY`.
    ///
    /// A missing key is not an error here: it is sent as-is and the provider
    /// rejects the call, which surfaces as a failed analysis.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ProviderConfig::from_env`] with a caller-supplied variable lookup.
    pub fn from_lookup(lookup: impl FnOnce(&str) -> Option<String>) -> Self {
        let api_key = lookup(API_KEY_ENV_VAR).unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!("{API_KEY_ENV_VAR} is not set; analysis requests will be rejected");
        }
        Self::new(api_key)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn generate_content_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }
}
