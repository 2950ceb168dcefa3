use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("title required")]
    TitleRequired,

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Provider returned HTTP {status}: {body}")]
    ProviderStatus { status: u16, body: String },

    #[error("Analysis abandoned before the provider responded")]
    Abandoned,

    #[error("Empty response from analysis engine")]
    EmptyResponse,

    #[error("Invalid API response: {reason}")]
    InvalidResponse { reason: String },

    #[error("Report does not match the response schema: {0}")]
    SchemaViolation(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
