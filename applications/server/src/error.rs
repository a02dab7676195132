/// Server error type and the response normalizer
use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use openmusic_core::{ClientStatus, Fault};
use openmusic_storage::StorageError;
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Message sent to clients for every server fault
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Largest framework error body read back as a message
const MAX_FRAMEWORK_BODY: usize = 16 * 1024;

/// Error returned by handlers and middleware.
///
/// Wraps a [`Fault`]; each `From` impl below decides once whether the
/// underlying failure is the caller's or ours.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ServerError(#[from] Fault);

impl ServerError {
    pub fn fault(&self) -> &Fault {
        &self.0
    }

    pub fn into_fault(self) -> Fault {
        self.0
    }

    /// Startup configuration problem
    pub fn config(msg: impl Into<String>) -> Self {
        Self(Fault::server(format!("Configuration error: {}", msg.into())))
    }
}

impl From<StorageError> for ServerError {
    fn from(err: StorageError) -> Self {
        Self(err.into())
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        Self(Fault::server(format!("IO error: {err}")))
    }
}

/// Token *creation* failures; rejected tokens are classified where they are
/// verified.
impl From<jsonwebtoken::errors::Error> for ServerError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self(Fault::server(format!("JWT error: {err}")))
    }
}

impl From<bcrypt::BcryptError> for ServerError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self(Fault::server(format!("Bcrypt error: {err}")))
    }
}

impl From<multer::Error> for ServerError {
    fn from(err: multer::Error) -> Self {
        let fault = match err {
            multer::Error::FieldSizeExceeded { .. } | multer::Error::StreamSizeExceeded { .. } => {
                Fault::payload_too_large(format!(
                    "Payload content length greater than maximum allowed: {}",
                    crate::api::albums::MAX_COVER_BYTES
                ))
            }
            multer::Error::StreamReadFailed(e) => {
                Fault::server(format!("Failed to read multipart stream: {e}"))
            }
            other => Fault::client(other.to_string(), ClientStatus::BAD_REQUEST),
        };
        Self(fault)
    }
}

impl From<config::ConfigError> for ServerError {
    fn from(err: config::ConfigError) -> Self {
        Self::config(err.to_string())
    }
}

/// Only sets the status and attaches the fault; [`normalize_response`]
/// writes the body.
impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let mut response = status_of(&self.0).into_response();
        response.extensions_mut().insert(self.0);
        response
    }
}

/// `status` field of the error envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Fail,
    Error,
}

/// The JSON body of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    pub status: EnvelopeStatus,
    pub message: String,
}

fn status_of(fault: &Fault) -> StatusCode {
    StatusCode::from_u16(fault.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Render a fault as status code and envelope. Server fault messages never
/// leave this function.
pub fn normalize(fault: &Fault) -> (StatusCode, Envelope) {
    match fault {
        Fault::Client { message, .. } => (
            status_of(fault),
            Envelope {
                status: EnvelopeStatus::Fail,
                message: message.clone(),
            },
        ),
        Fault::Server { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Envelope {
                status: EnvelopeStatus::Error,
                message: INTERNAL_SERVER_ERROR.to_string(),
            },
        ),
    }
}

/// Router-wide middleware: the single place error responses get their body.
///
/// 1. Success responses pass through untouched.
/// 2. A response carrying a [`Fault`] is rendered from it.
/// 3. Other 4xx responses (extractor rejections, unknown routes, wrong
///    methods) become client faults with the framework's message.
/// 4. Anything else is a 500.
pub async fn normalize_response(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();

    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let fault = match response.extensions().get::<Fault>() {
        Some(fault) => fault.clone(),
        None => classify_framework_response(response).await,
    };

    if let Fault::Server { message } = &fault {
        tracing::error!("Server fault: {}", message);
    }

    let (status, envelope) = normalize(&fault);
    (status, Json(envelope)).into_response()
}

async fn classify_framework_response(response: Response) -> Fault {
    let status = response.status();
    let reason = status.canonical_reason().unwrap_or("Request failed");

    if !status.is_client_error() {
        return Fault::server(format!("Framework responded with {status}"));
    }

    let message = match axum::body::to_bytes(response.into_body(), MAX_FRAMEWORK_BODY).await {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes).trim().to_string();
            if text.is_empty() {
                reason.to_string()
            } else {
                text
            }
        }
        Err(_) => reason.to_string(),
    };

    Fault::from_status(status.as_u16(), message)
}
