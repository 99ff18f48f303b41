use std::time::Duration;
use thiserror::Error;

/// Request-level failures. These reject the whole request before any provider is contacted.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Failures contained to a single provider's slot in the envelope.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Missing credential: set {env_var}")]
    MissingCredential { env_var: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("request timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    #[error("{0}")]
    Transport(String),

    #[error("internal error")]
    Internal,
}

impl ProviderError {
    /// Classify a client error, reporting a client-side timeout against the adapter's budget
    pub fn from_reqwest(err: reqwest::Error, budget: Duration) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(budget)
        } else {
            ProviderError::from(err)
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest includes the full URL in its Display, which carries the key for some providers
        ProviderError::Transport(err.without_url().to_string())
    }
}
