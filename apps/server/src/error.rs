//! Error types for the gateway
//!
//! Every failure a request can hit funnels into [`Error`], and its single
//! `IntoResponse` impl renders the uniform envelope:
//! `{"status":"error","code":<http status>,"error":"<message>"}`.

use crate::backend::BackendError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use catalog_query::{QueryError, ResponseStatus};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing or rejected credentials. Carries the realm for `WWW-Authenticate`.
    #[error("Unauthorized")]
    Unauthorized { realm: String },

    #[error(transparent)]
    Validation(#[from] QueryError),

    #[error("Search backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Backend(_) => StatusCode::BAD_GATEWAY,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the client. Backend and internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Error::Unauthorized { .. } => "Unauthorized".to_string(),
            Error::Validation(e) => e.to_string(),
            Error::Backend(_) => "Search backend unavailable".to_string(),
            Error::NotFound(_) => "Not Found".to_string(),
            Error::Internal(_) => "Internal Server Error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Error::Backend(_) | Error::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
            }
            _ => {
                tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
            }
        }

        let body = Json(json!({
            "status": ResponseStatus::Error,
            "code": status.as_u16(),
            "error": self.public_message(),
        }));

        let mut response = (status, body).into_response();
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        );

        if let Error::Unauthorized { realm } = &self {
            let challenge = format!("Basic realm=\"{}\", charset=\"UTF-8\"", realm);
            if let Ok(value) = HeaderValue::from_str(&challenge) {
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, value);
            }
        }

        response
    }
}
