use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chorus::errors::DispatchError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: set {env_var}")]
    MissingEnvVar { env_var: String },

    #[error("Invalid value for {env_var}: {reason}")]
    InvalidValue { env_var: String, reason: String },

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

impl ConfigError {
    /// Classify a deserialization failure, naming the environment variable for a missing field
    pub fn from_deserialize(err: config::ConfigError) -> Self {
        if let config::ConfigError::NotFound(field) = &err {
            return ConfigError::MissingEnvVar {
                env_var: to_env_var(field),
            };
        }

        // "missing field `model`", optionally followed by " for key `providers.openai`"
        let message = err.to_string();
        if let Some(rest) = message.strip_prefix("missing field `") {
            let mut parts = rest.splitn(2, '`');
            let field = parts.next().unwrap_or_default();
            let path = match parts
                .next()
                .and_then(|tail| tail.trim_start().strip_prefix("for key `"))
                .and_then(|key| key.split('`').next())
            {
                Some(key) if !key.is_empty() => format!("{}.{}", key, field),
                _ => field.to_string(),
            };
            return ConfigError::MissingEnvVar {
                env_var: to_env_var(&path),
            };
        }

        ConfigError::Load(err)
    }
}

/// Map a configuration key like `providers.openai.model` to the environment variable that sets it
pub fn to_env_var(field_path: &str) -> String {
    format!(
        "CHORUS_{}",
        field_path.replace('.', "__").to_uppercase()
    )
}

/// Request-level failures returned to the caller with a `{ "error": ... }` body
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Dispatch(DispatchError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Dispatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(status = status.as_u16(), error = %self, "rejecting request");

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
