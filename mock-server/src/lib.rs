use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub biography: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Body of `POST /user` and `PUT /users/{id}`; every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct UserInput {
    pub name: Option<String>,
    pub biography: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IdBody {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub type Db = Arc<RwLock<HashMap<String, User>>>;

type ApiError = (StatusCode, Json<ErrorBody>);

fn error(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn app() -> Router {
    app_with(Db::default())
}

/// Router over an existing store, so tests can seed or inspect it.
pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/user", get(random_user).post(create_user))
        .route("/users/{id}", put(update_user).delete(delete_user))
        .route("/id", get(new_id))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_users(State(db): State<Db>) -> Json<Vec<User>> {
    let users = db.read().await;
    let mut list: Vec<User> = users.values().cloned().collect();
    list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    Json(list)
}

async fn random_user(State(db): State<Db>) -> Result<Json<User>, ApiError> {
    let users = db.read().await;
    users
        .values()
        .choose(&mut rand::thread_rng())
        .cloned()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "no users"))
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<UserInput>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let name = input
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "name is required"))?;
    let timestamp = now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        name,
        biography: input.biography.unwrap_or_default(),
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };
    db.write().await.insert(user.id.clone(), user.clone());
    tracing::debug!(id = %user.id, "created user");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<UserInput>,
) -> Result<Json<User>, ApiError> {
    let mut users = db.write().await;
    let user = users
        .get_mut(&id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "user not found"))?;
    if let Some(name) = input.name {
        if name.trim().is_empty() {
            return Err(error(StatusCode::BAD_REQUEST, "name must not be blank"));
        }
        user.name = name;
    }
    if let Some(biography) = input.biography {
        user.biography = biography;
    }
    user.updated_at = now();
    Ok(Json(user.clone()))
}

async fn delete_user(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut users = db.write().await;
    users
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "user not found"))
}

async fn new_id() -> Json<IdBody> {
    Json(IdBody {
        id: Uuid::new_v4().to_string(),
    })
}
