//! Error taxonomy for the HTTP layer.
//!
//! Every error is local to the request or channel that produced it. HTTP
//! errors are answered with the raw error text as a plain-text body.

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::template::RenderError;

/// The upgrade handshake could not be completed.
#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("{0}")]
    Rejected(#[from] WebSocketUpgradeRejection),

    #[error("origin {0} may not open a channel")]
    OriginNotAllowed(String),
}

impl HandshakeError {
    pub fn status(&self) -> StatusCode {
        match self {
            HandshakeError::Rejected(rejection) => rejection.status(),
            HandshakeError::OriginNotAllowed(_) => StatusCode::FORBIDDEN,
        }
    }
}

/// Read or write failure on an established channel.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("receive failed: {0}")]
    Receive(#[source] axum::Error),

    #[error("send failed: {0}")]
    Send(#[source] axum::Error),
}

/// No file under an asset root matched the request path.
#[derive(Debug, Error)]
#[error("{path}: asset not found")]
pub struct AssetNotFound {
    pub path: String,
}

/// Errors that end a request with an HTTP error response.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Handshake(#[from] HandshakeError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    AssetNotFound(#[from] AssetNotFound),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Handshake(e) => e.status(),
            AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::AssetNotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}
