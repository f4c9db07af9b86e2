use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{error, info, instrument, warn};

use crate::{
    error::{body, required, ApiError},
    state::AppState,
    users::{
        dto::{CreateUserRequest, UpdateUserRequest, UserResponse, UsersResponse},
        password::hash_password,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/by-id/:id", get(get_user_by_id))
        .route(
            "/users/:email",
            get(get_user_by_email).put(update_user).delete(delete_user),
        )
        .route("/users/:email/:password", get(get_user))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, ApiError> {
    let users = state.users.list().await.map_err(|e| {
        error!(error = %e, "list users failed");
        ApiError::from_store(e, "user")
    })?;
    Ok(Json(UsersResponse { users }))
}

#[instrument(skip(state))]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let email = required(email, "email")?;
    let user = state
        .users
        .get_by_email(&email)
        .await
        .map_err(|e| ApiError::from_store(e, "user"))?;
    Ok(Json(UserResponse { user }))
}

#[instrument(skip(state))]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = required(id, "id")?;
    let user = state
        .users
        .get_by_id(&id)
        .await
        .map_err(|e| ApiError::from_store(e, "user"))?;
    Ok(Json(UserResponse { user }))
}

/// Login lookup: `GET /users/:email/:password`.
#[instrument(skip_all, fields(email = %email))]
pub async fn get_user(
    State(state): State<AppState>,
    Path((email, password)): Path<(String, String)>,
) -> Result<Json<UserResponse>, ApiError> {
    let email = required(email, "email")?;
    let password = required(password, "password")?;
    match state.users.get(&email, &password).await {
        Ok(user) => Ok(Json(UserResponse { user })),
        Err(e) => {
            warn!(error = %e, "login lookup failed");
            Err(ApiError::from_store(e, "user"))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let req = body(payload)?;

    let hash = hash_password(&req.password).map_err(|e| ApiError::Internal(e.to_string()))?;

    let user = match state.users.create(req.into_new_user(hash)).await {
        Ok(u) => u,
        Err(e) => {
            warn!(error = %e, "create user failed");
            return Err(ApiError::from_store(e, "user"));
        }
    };

    info!(user_id = %user.id, email = %user.email, "user created");
    Ok(Json(UserResponse { user }))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let email = required(email, "email")?;
    let req = body(payload)?;

    let password_hash = req
        .password
        .as_deref()
        .map(hash_password)
        .transpose()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let user = state
        .users
        .update(&email, req.into_patch(password_hash))
        .await
        .map_err(|e| ApiError::from_store(e, "user"))?;

    info!(user_id = %user.id, "user updated");
    Ok(Json(UserResponse { user }))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let email = required(email, "email")?;
    state
        .users
        .delete(&email)
        .await
        .map_err(|e| ApiError::from_store(e, "user"))?;
    info!(%email, "user deleted");
    Ok(Json(json!({})))
}
