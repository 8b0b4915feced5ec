//! Error taxonomy for HealthSync.
//!
//! [`AppError`] is the user-facing classification of a failed chat
//! submission. [`TransportError`] is what a chat transport reports before
//! classification. The remaining enums cover the storage, location, places
//! and responder ports.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long a dismissable error banner stays on screen.
pub const BANNER_DISMISS_AFTER: Duration = Duration::from_secs(5);

/// Classification of a failed chat submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Network,
    Auth,
    RateLimit,
    BadRequest,
    ServerError,
    Unknown,
}

impl ErrorKind {
    /// Map an HTTP status code to its error kind.
    ///
    /// Only meaningful for non-success statuses; anything not covered by a
    /// specific rule is `Unknown`.
    pub fn for_status(status: u16) -> Self {
        match status {
            401 | 403 => ErrorKind::Auth,
            429 => ErrorKind::RateLimit,
            400 => ErrorKind::BadRequest,
            s if s >= 500 => ErrorKind::ServerError,
            _ => ErrorKind::Unknown,
        }
    }

    /// Whether the same request may reasonably be retried automatically.
    pub fn is_retryable(self) -> bool {
        !matches!(self, ErrorKind::Auth | ErrorKind::BadRequest)
    }

    /// Text shown to the user for this kind of failure.
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::Network => {
                "I can't reach the health assistant right now. Please check your connection and try again."
            }
            ErrorKind::Auth => {
                "The health assistant is not authorized to answer right now. Please contact support if this continues."
            }
            ErrorKind::RateLimit => {
                "I'm receiving a lot of questions right now. Please wait a moment and try again."
            }
            ErrorKind::BadRequest => {
                "I couldn't process that message. Please try rephrasing your question."
            }
            ErrorKind::ServerError => {
                "The health assistant is temporarily unavailable. Please try again shortly."
            }
            ErrorKind::Unknown => {
                "I'm experiencing technical difficulties. Please try again in a moment."
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Network => write!(f, "network"),
            ErrorKind::Auth => write!(f, "auth"),
            ErrorKind::RateLimit => write!(f, "rate-limit"),
            ErrorKind::BadRequest => write!(f, "bad-request"),
            ErrorKind::ServerError => write!(f, "server-error"),
            ErrorKind::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for ErrorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "network" => Ok(ErrorKind::Network),
            "auth" => Ok(ErrorKind::Auth),
            "rate-limit" => Ok(ErrorKind::RateLimit),
            "bad-request" => Ok(ErrorKind::BadRequest),
            "server-error" => Ok(ErrorKind::ServerError),
            "unknown" => Ok(ErrorKind::Unknown),
            other => Err(format!("invalid error kind: '{other}'")),
        }
    }
}

/// A classified chat failure, ready to be shown to the user.
///
/// Constructed fresh per failure and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    pub kind: ErrorKind,
    /// User-facing text.
    pub message: String,
    pub retryable: bool,
    pub status_code: Option<u16>,
    /// Diagnostic detail (upstream error message, transport error text).
    pub details: Option<String>,
}

impl AppError {
    /// Build an error of the given kind with its default user-facing text.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: kind.user_message().to_string(),
            retryable: kind.is_retryable(),
            status_code: None,
            details: None,
        }
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, details: Option<String>) -> Self {
        Self {
            status_code: Some(status),
            details,
            ..Self::new(ErrorKind::for_status(status))
        }
    }

    /// A transport-level failure (connection refused, DNS, timeout, offline).
    pub fn network(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network).with_details(details)
    }

    /// Anything that does not fit another kind, including malformed replies.
    pub fn unknown(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown).with_details(details)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// How long the error banner stays up, or `None` if it persists until
    /// the user acts.
    pub fn dismiss_after(&self) -> Option<Duration> {
        match self.kind {
            ErrorKind::Auth => None,
            _ => Some(BANNER_DISMISS_AFTER),
        }
    }
}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Connection(_) | TransportError::Timeout(_) => {
                AppError::network(err.to_string())
            }
            TransportError::Status { status, message } => {
                AppError::from_status(status, Some(message))
            }
            TransportError::MalformedResponse(_) => AppError::unknown(err.to_string()),
        }
    }
}

/// Failure reported by a chat transport before classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors from key-value storage ports.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(String),
}

/// Errors from resolving the user's location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location permission denied. Please enable location access.")]
    PermissionDenied,

    #[error("Location information is unavailable: {0}")]
    Unavailable(String),

    #[error("Location request timed out. Please try again.")]
    Timeout,
}

/// Errors from the places search API.
#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("places request failed: {0}")]
    Request(String),

    #[error("places API returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("places API error: {0}")]
    Api(String),
}

/// Errors from a chat responder behind the proxy endpoint.
#[derive(Debug, Error)]
pub enum ResponderError {
    /// The upstream model API rejected the request; its status is passed through.
    #[error("upstream returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("responder failure: {0}")]
    Internal(String),
}
