//! Wire DTOs for the user API.
//!
//! # Design
//! These mirror the mock-server's schema but are defined independently so
//! integration tests catch drift between the two crates. Timestamps stay as
//! the strings the backend sent; the client never interprets them.

use serde::{Deserialize, Serialize};

/// A user as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub biography: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Complete form input for a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserFormData {
    pub name: String,
    pub biography: String,
}

/// Payload for creating or updating a user. Only the fields present are
/// sent; the backend decides what a missing field means.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
}

impl UserPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            biography: None,
        }
    }

    pub fn biography(biography: impl Into<String>) -> Self {
        Self {
            name: None,
            biography: Some(biography.into()),
        }
    }
}

impl From<UserFormData> for UserPatch {
    fn from(form: UserFormData) -> Self {
        Self {
            name: Some(form.name),
            biography: Some(form.biography),
        }
    }
}

impl From<&UserFormData> for UserPatch {
    fn from(form: &UserFormData) -> Self {
        form.clone().into()
    }
}

/// Body of `GET /id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserId {
    pub id: String,
}

/// Error body sent by the backend on failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}
