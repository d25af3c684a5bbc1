//! Typed operations over the user resource.
//!
//! # Design
//! `UserClient` holds only a `Transport` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`; the async method of the same name runs one round trip
//! between the two. Every failure is reported as the operation's own
//! `UserError` variant with the normalized transport error attached.

use crate::config::Config;
use crate::error::{NormalizedError, UserError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{expect_json, intercept, Transport};
use crate::types::{User, UserId, UserPatch};

/// Async client for the user API.
#[derive(Debug, Clone)]
pub struct UserClient {
    transport: Transport,
}

impl UserClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// # Errors
    ///
    /// Fails only if the HTTP client cannot be constructed.
    pub fn from_config(config: &Config) -> Result<Self, NormalizedError> {
        Transport::new(config).map(Self::new)
    }

    /// Resolve configuration from the environment and build a client.
    ///
    /// # Errors
    ///
    /// Fails only if the HTTP client cannot be constructed.
    pub fn from_env() -> Result<Self, NormalizedError> {
        Self::from_config(&Config::resolve())
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn build_get_users(&self) -> HttpRequest {
        self.transport.build(HttpMethod::Get, "/users")
    }

    pub fn build_get_random_user(&self) -> HttpRequest {
        self.transport.build(HttpMethod::Get, "/user")
    }

    pub fn build_create_user(&self, input: &UserPatch) -> Result<HttpRequest, UserError> {
        self.transport
            .build_json(HttpMethod::Post, "/user", input)
            .map_err(UserError::CreateFailed)
    }

    pub fn build_update_user(&self, id: &str, input: &UserPatch) -> Result<HttpRequest, UserError> {
        check_id(id)?;
        self.transport
            .build_resource_json(HttpMethod::Put, USERS, id, input)
            .map_err(UserError::UpdateFailed)
    }

    pub fn build_delete_user(&self, id: &str) -> Result<HttpRequest, UserError> {
        check_id(id)?;
        self.transport
            .build_resource(HttpMethod::Delete, USERS, id)
            .map_err(UserError::DeleteFailed)
    }

    pub fn build_get_id(&self) -> HttpRequest {
        self.transport.build(HttpMethod::Get, "/id")
    }

    pub fn parse_get_users(&self, response: HttpResponse) -> Result<Vec<User>, UserError> {
        expect_json(response).map_err(UserError::fetch_users)
    }

    pub fn parse_get_random_user(&self, response: HttpResponse) -> Result<User, UserError> {
        expect_json(response).map_err(UserError::fetch_user)
    }

    pub fn parse_create_user(&self, response: HttpResponse) -> Result<User, UserError> {
        expect_json(response).map_err(UserError::CreateFailed)
    }

    pub fn parse_update_user(&self, response: HttpResponse) -> Result<User, UserError> {
        expect_json(response).map_err(UserError::UpdateFailed)
    }

    /// Any 2xx counts as deleted; the body is ignored.
    pub fn parse_delete_user(&self, response: HttpResponse) -> Result<(), UserError> {
        intercept(response).map(|_| ()).map_err(UserError::DeleteFailed)
    }

    pub fn parse_get_id(&self, response: HttpResponse) -> Result<UserId, UserError> {
        expect_json(response).map_err(UserError::FetchIdFailed)
    }

    /// `GET /users`
    pub async fn get_users(&self) -> Result<Vec<User>, UserError> {
        let response = self
            .transport
            .execute(self.build_get_users())
            .await
            .map_err(UserError::fetch_users)?;
        self.parse_get_users(response)
    }

    /// `GET /user`
    pub async fn get_random_user(&self) -> Result<User, UserError> {
        let response = self
            .transport
            .execute(self.build_get_random_user())
            .await
            .map_err(UserError::fetch_user)?;
        self.parse_get_random_user(response)
    }

    /// `POST /user`. Partial input is sent as-is; the backend validates it.
    pub async fn create_user(&self, input: &UserPatch) -> Result<User, UserError> {
        let request = self.build_create_user(input)?;
        let response = self
            .transport
            .execute(request)
            .await
            .map_err(UserError::CreateFailed)?;
        self.parse_create_user(response)
    }

    /// `PUT /users/{id}`
    pub async fn update_user(&self, id: &str, input: &UserPatch) -> Result<User, UserError> {
        let request = self.build_update_user(id, input)?;
        let response = self
            .transport
            .execute(request)
            .await
            .map_err(UserError::UpdateFailed)?;
        self.parse_update_user(response)
    }

    /// `DELETE /users/{id}`
    pub async fn delete_user(&self, id: &str) -> Result<(), UserError> {
        let request = self.build_delete_user(id)?;
        let response = self
            .transport
            .execute(request)
            .await
            .map_err(UserError::DeleteFailed)?;
        self.parse_delete_user(response)
    }

    /// `GET /id`
    pub async fn get_id(&self) -> Result<UserId, UserError> {
        let response = self
            .transport
            .execute(self.build_get_id())
            .await
            .map_err(UserError::FetchIdFailed)?;
        self.parse_get_id(response)
    }
}

const USERS: &str = "/users";

/// Blank ids are rejected; anything else is sent exactly as given.
fn check_id(id: &str) -> Result<(), UserError> {
    if id.trim().is_empty() {
        return Err(UserError::EmptyId);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::FailureKind;

    const USER_JSON: &str = r#"{"id":"u-1","name":"Alex Johnson","biography":"Bio","created_at":"2024-01-01T00:00:00Z","updated_at":"2024-01-01T00:00:00Z"}"#;

    fn client() -> UserClient {
        UserClient::from_config(&Config::default()).unwrap()
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_get_users_produces_correct_request() {
        let req = client().build_get_users();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/users");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_random_user_targets_singular_path() {
        let req = client().build_get_random_user();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/user");
    }

    #[test]
    fn build_create_user_produces_correct_request() {
        let input = UserPatch {
            name: Some("A".to_string()),
            biography: Some("B".to_string()),
        };
        let req = client().build_create_user(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/user");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"name": "A", "biography": "B"}));
    }

    #[test]
    fn build_update_user_sends_only_present_fields() {
        let req = client().build_update_user("u-1", &UserPatch::name("C")).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:3000/users/u-1");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"name": "C"}));
    }

    #[test]
    fn build_delete_user_produces_correct_request() {
        let req = client().build_delete_user("u-1").unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:3000/users/u-1");
        assert!(req.body.is_none());
    }

    #[test]
    fn empty_id_is_rejected_before_io() {
        let c = client();
        assert!(matches!(c.build_delete_user(""), Err(UserError::EmptyId)));
        assert!(matches!(
            c.build_update_user("  ", &UserPatch::default()),
            Err(UserError::EmptyId)
        ));
    }

    #[test]
    fn id_is_sent_as_one_escaped_segment() {
        let c = client();
        let req = c.build_delete_user("abc?force=1").unwrap();
        assert_eq!(req.url, "http://localhost:3000/users/abc%3Fforce=1");
        let req = c.build_update_user("team/7", &UserPatch::name("C")).unwrap();
        assert_eq!(req.url, "http://localhost:3000/users/team%2F7");
        let req = c.build_delete_user("a#b").unwrap();
        assert_eq!(req.url, "http://localhost:3000/users/a%23b");
    }

    #[test]
    fn non_blank_id_is_not_trimmed() {
        let req = client().build_delete_user(" u-1 ").unwrap();
        assert_eq!(req.url, "http://localhost:3000/users/%20u-1%20");
    }

    #[test]
    fn build_get_id_produces_correct_request() {
        let req = client().build_get_id();
        assert_eq!(req.url, "http://localhost:3000/id");
    }

    #[test]
    fn parse_get_users_success() {
        let users = client()
            .parse_get_users(response(200, &format!("[{USER_JSON}]")))
            .unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Alex Johnson");
    }

    #[test]
    fn parse_get_users_failure_keeps_transport_detail() {
        let err = client()
            .parse_get_users(response(503, r#"{"error":"maintenance"}"#))
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch users");
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.transport().unwrap().message, "maintenance");
    }

    #[test]
    fn parse_get_random_user_not_found() {
        let err = client().parse_get_random_user(response(404, "")).unwrap_err();
        assert!(matches!(err, UserError::FetchFailed { .. }));
        assert_eq!(err.to_string(), "Failed to fetch user");
    }

    #[test]
    fn parse_create_user_success() {
        let user = client().parse_create_user(response(201, USER_JSON)).unwrap();
        assert_eq!(user.id, "u-1");
    }

    #[test]
    fn parse_create_user_server_error() {
        let err = client()
            .parse_create_user(response(500, r#"{"error":"boom"}"#))
            .unwrap_err();
        assert!(matches!(err, UserError::CreateFailed(_)));
        let cause = err.transport().unwrap();
        assert_eq!(cause.status, Some(500));
        assert_eq!(cause.data, Some(json!({"error": "boom"})));
    }

    #[test]
    fn parse_update_user_bad_json() {
        let err = client().parse_update_user(response(200, "not json")).unwrap_err();
        assert!(matches!(err, UserError::UpdateFailed(_)));
        assert_eq!(err.transport().unwrap().kind(), FailureKind::Decode);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn parse_delete_user_ignores_body() {
        let c = client();
        assert!(c.parse_delete_user(response(204, "")).is_ok());
        assert!(c.parse_delete_user(response(200, r#"{"deleted":true}"#)).is_ok());
        let err = c.parse_delete_user(response(404, "")).unwrap_err();
        assert!(matches!(err, UserError::DeleteFailed(_)));
    }

    #[test]
    fn parse_get_id_success_and_failure() {
        let c = client();
        let id = c.parse_get_id(response(200, r#"{"id":"abc"}"#)).unwrap();
        assert_eq!(id.id, "abc");
        let err = c.parse_get_id(response(200, r#"{"uuid":"abc"}"#)).unwrap_err();
        assert!(matches!(err, UserError::FetchIdFailed(_)));
    }
}
