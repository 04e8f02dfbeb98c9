use thiserror::Error;

/// Failures surfaced by the planning flow. Validation errors are produced
/// before any network call is made; orchestration errors are the only kind
/// an end user ever sees, and only as a generic message.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("model request failed: {0}")]
    Orchestration(String),
    #[error("model returned an empty response")]
    EmptyResponse,
}

impl PlanError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Weather provider failures. These never leave the weather tool: every
/// variant degrades to a fallback report instead of propagating.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("HTTP request failed: {0}")]
    HttpRequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("provider error: {0}")]
    ApiError(String),
    #[error("missing API key")]
    MissingApiKey,
}

impl WeatherError {
    pub fn kind(&self) -> &'static str {
        match self {
            WeatherError::HttpRequestFailed(_) => "HttpRequestFailed",
            WeatherError::InvalidResponse(_) => "InvalidResponse",
            WeatherError::ApiError(_) => "ApiError",
            WeatherError::MissingApiKey => "MissingApiKey",
        }
    }
}
