//! Async client for a user REST API.
//!
//! # Overview
//! `Config` resolves the base URL and timeout from the environment,
//! `Transport` wraps one reqwest client bound to them, and `UserClient`
//! exposes the user operations on top. Every failure surfaces as a
//! `UserError` carrying a `NormalizedError` with a stable shape: a message,
//! the HTTP status if a response arrived, and the parsed error body.
//!
//! # Design
//! - `UserClient` is stateless; it holds only a cloneable `Transport`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit and the
//!   halves are testable without a server.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//! - `generator` produces random form input for demos and test seeding.

pub mod client;
pub mod config;
pub mod error;
pub mod generator;
pub mod http;
pub mod transport;
pub mod types;

pub use client::UserClient;
pub use config::{AppInfo, Config};
pub use error::{FailureKind, NormalizedError, UserError, FALLBACK_MESSAGE};
pub use generator::generate;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::Transport;
pub use types::{ErrorResponse, User, UserFormData, UserId, UserPatch};
