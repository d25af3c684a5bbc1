//! Error types for the user API client.
//!
//! # Design
//! Two layers. `NormalizedError` is the single shape every transport failure
//! is coerced into: a connection that never produced a response, a non-2xx
//! status, or a body that did not decode. Presence of `status` tells a
//! caller whether the server answered. `UserError` is the per-operation
//! failure surfaced by `UserClient`; each variant keeps the
//! `NormalizedError` that caused it as its source.

use serde_json::Value;
use thiserror::Error;

/// Message used when a failure carries no description of its own.
pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred";

/// Which transport failure produced a `NormalizedError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No response was obtained (DNS, connection refused, reset).
    Network,
    /// The configured timeout elapsed before a response arrived.
    Timeout,
    /// A response arrived with a status outside 2xx.
    HttpStatus,
    /// A 2xx response body did not decode into the expected type.
    Decode,
    /// The request payload could not be serialized to JSON.
    Encode,
}

/// Uniform transport failure.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct NormalizedError {
    pub message: String,
    /// HTTP status, present only when a response with a non-2xx status was
    /// received.
    pub status: Option<u16>,
    /// The backend's error body, parsed as JSON, when there was one.
    pub data: Option<Value>,
    kind: FailureKind,
}

impl NormalizedError {
    fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            message,
            status: None,
            data: None,
            kind,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Timeout, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Decode, message)
    }

    pub fn encode(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Encode, message)
    }

    /// A response arrived with a non-2xx `status`.
    pub fn http_status(status: u16, data: Option<Value>, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            data,
            ..Self::new(FailureKind::HttpStatus, message)
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// True when the failure happened before any HTTP response existed.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self.kind, FailureKind::Network | FailureKind::Timeout)
    }
}

/// Errors returned by `UserClient` operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Listing users or fetching the random user failed.
    #[error("{message}")]
    FetchFailed {
        message: &'static str,
        #[source]
        source: NormalizedError,
    },

    #[error("Failed to create user")]
    CreateFailed(#[source] NormalizedError),

    #[error("Failed to update user")]
    UpdateFailed(#[source] NormalizedError),

    #[error("Failed to delete user")]
    DeleteFailed(#[source] NormalizedError),

    #[error("Failed to get ID")]
    FetchIdFailed(#[source] NormalizedError),

    /// Rejected before any request was sent.
    #[error("user id must not be empty")]
    EmptyId,
}

impl UserError {
    pub(crate) fn fetch_users(source: NormalizedError) -> Self {
        UserError::FetchFailed {
            message: "Failed to fetch users",
            source,
        }
    }

    pub(crate) fn fetch_user(source: NormalizedError) -> Self {
        UserError::FetchFailed {
            message: "Failed to fetch user",
            source,
        }
    }

    /// The transport failure behind this error, if the operation got as far
    /// as the transport.
    pub fn transport(&self) -> Option<&NormalizedError> {
        match self {
            UserError::FetchFailed { source, .. }
            | UserError::CreateFailed(source)
            | UserError::UpdateFailed(source)
            | UserError::DeleteFailed(source)
            | UserError::FetchIdFailed(source) => Some(source),
            UserError::EmptyId => None,
        }
    }

    /// Shorthand for `transport().and_then(|e| e.status)`.
    pub fn status(&self) -> Option<u16> {
        self.transport().and_then(|e| e.status)
    }
}
