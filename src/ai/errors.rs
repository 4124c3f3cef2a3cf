use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("AI client misconfigured: {0}")]
    Config(String),

    #[error("request to completion API failed: {0}")]
    Transport(String),

    #[error("completion API timed out")]
    Timeout,

    #[error("completion API returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("completion API rate limited the request")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("completion API returned no choices")]
    EmptyResponse,

    #[error("could not decode completion response: {0}")]
    InvalidResponse(String),

    #[error("could not build prompt: {0}")]
    Prompt(String),
}

impl AiError {
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AiError::Timeout
        } else if err.is_decode() {
            AiError::InvalidResponse(err.to_string())
        } else {
            AiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AiError {
    fn from(err: serde_json::Error) -> Self {
        AiError::Prompt(err.to_string())
    }
}
