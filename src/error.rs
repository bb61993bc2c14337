use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

// Every variant answers with {"error": message}
#[derive(Debug, Error)]
pub enum GatewayError {
    // credential missing
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Generation(String),

    // upstream succeeded with nothing usable
    #[error("Failed to generate image")]
    EmptyOutput,

    #[error("{0}")]
    InvalidBody(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration(_) => StatusCode::BAD_REQUEST,
            Self::Generation(_) | Self::EmptyOutput | Self::InvalidBody(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            GatewayError::Configuration("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::Generation("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GatewayError::EmptyOutput.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GatewayError::InvalidBody("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_generation_message_is_passed_through() {
        let err = GatewayError::Generation("upstream exploded".into());
        assert_eq!(err.to_string(), "upstream exploded");
    }
}
