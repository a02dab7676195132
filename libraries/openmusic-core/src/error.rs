/// Fault taxonomy shared by every OpenMusic layer
use std::fmt;
use thiserror::Error;

/// Result type alias using `Fault`
pub type Result<T> = std::result::Result<T, Fault>;

/// An HTTP status code in the client-error range (400..=499).
///
/// The constructor is the only way in, so a client fault can never carry a
/// 2xx, 3xx or 5xx status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientStatus(u16);

impl ClientStatus {
    pub const BAD_REQUEST: Self = Self(400);
    pub const UNAUTHORIZED: Self = Self(401);
    pub const FORBIDDEN: Self = Self(403);
    pub const NOT_FOUND: Self = Self(404);
    pub const METHOD_NOT_ALLOWED: Self = Self(405);
    pub const PAYLOAD_TOO_LARGE: Self = Self(413);
    pub const UNSUPPORTED_MEDIA_TYPE: Self = Self(415);
    pub const UNPROCESSABLE_ENTITY: Self = Self(422);

    /// Returns `None` for anything outside 400..=499
    pub fn new(code: u16) -> Option<Self> {
        (400..=499).contains(&code).then_some(Self(code))
    }

    pub fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Every failure in the catalog is one of these two kinds.
///
/// The kind is fixed where the fault is constructed and never re-derived
/// later: the response layer only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    /// Caused by the caller; surfaced verbatim with its own status
    #[error("{message}")]
    Client {
        message: String,
        status: ClientStatus,
    },

    /// Anything unanticipated; surfaced as a generic 500
    #[error("{message}")]
    Server { message: String },
}

impl Fault {
    /// Create a client fault with an explicit status
    pub fn client(message: impl Into<String>, status: ClientStatus) -> Self {
        Self::Client {
            message: message.into(),
            status,
        }
    }

    /// Create a server fault
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    /// 400
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::client(message, ClientStatus::BAD_REQUEST)
    }

    /// 401
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::client(message, ClientStatus::UNAUTHORIZED)
    }

    /// 403
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::client(message, ClientStatus::FORBIDDEN)
    }

    /// 404
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::client(message, ClientStatus::NOT_FOUND)
    }

    /// 413
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::client(message, ClientStatus::PAYLOAD_TOO_LARGE)
    }

    /// Classify a failure reported by the HTTP framework itself.
    ///
    /// 4xx statuses become client faults carrying the framework's message;
    /// everything else is a server fault.
    pub fn from_status(code: u16, message: impl Into<String>) -> Self {
        match ClientStatus::new(code) {
            Some(status) => Self::client(message, status),
            None => Self::server(message),
        }
    }

    pub fn is_client(&self) -> bool {
        matches!(self, Self::Client { .. })
    }

    /// The HTTP status this fault maps to
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Client { status, .. } => status.as_u16(),
            Self::Server { .. } => 500,
        }
    }

    /// The fault's own message (internal for server faults)
    pub fn message(&self) -> &str {
        match self {
            Self::Client { message, .. } | Self::Server { message } => message,
        }
    }
}
