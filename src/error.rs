//! Error types for the game server.
//!
//! [`GameError`] is what a request can fail with; [`ServiceError`] covers
//! the two outbound collaborators (word source and similarity service).

use axum::http::{Method, StatusCode};
use thiserror::Error;

/// Failure talking to an external collaborator.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request never produced a response (DNS, connect, TLS, ...).
    #[error("{service} is unreachable: {source}")]
    Unreachable {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The request exceeded the configured timeout.
    #[error("{service} did not answer in time")]
    Timeout { service: &'static str },

    /// The collaborator answered with a non-2xx status.
    #[error("{service} returned status {status}")]
    Status {
        service: &'static str,
        status: StatusCode,
    },

    /// The body could not be decoded into the expected shape.
    #[error("{service} sent an unexpected response: {reason}")]
    Malformed {
        service: &'static str,
        reason: String,
    },
}

impl ServiceError {
    /// Classify a transport error from reqwest.
    pub fn from_reqwest(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { service }
        } else if err.is_decode() {
            Self::Malformed {
                service,
                reason: err.to_string(),
            }
        } else {
            Self::Unreachable {
                service,
                source: err,
            }
        }
    }
}

/// Everything a guess request can fail with.
#[derive(Error, Debug)]
pub enum GameError {
    /// Missing or blank guess.
    #[error("{0}")]
    InvalidInput(String),

    /// Method other than GET or POST.
    #[error("Method {0} is not allowed")]
    UnsupportedMethod(Method),

    /// POST body is neither JSON nor form-encoded.
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// POST body parsed but lacks a required field.
    #[error("Missing required field `{0}`")]
    MissingField(&'static str),

    /// Word source or similarity service failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Template rendering failed.
    #[error("Failed to render page: {0}")]
    Render(#[from] minijinja::Error),
}

impl GameError {
    /// HTTP status the error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::MissingField(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::UnsupportedContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Service(_) => StatusCode::BAD_GATEWAY,
            Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GameError::InvalidInput("empty".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GameError::UnsupportedMethod(Method::PUT).status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            GameError::UnsupportedContentType("text/plain".into()).status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            GameError::MissingField("text").status_code(),
            StatusCode::BAD_REQUEST
        );
        let service = ServiceError::Status {
            service: "similarity service",
            status: StatusCode::INTERNAL_SERVER_ERROR,
        };
        assert_eq!(
            GameError::from(service).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_service_error_message() {
        let err = GameError::from(ServiceError::Timeout {
            service: "word source",
        });
        assert_eq!(err.to_string(), "word source did not answer in time");
    }
}
