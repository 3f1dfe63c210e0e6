//! 用户处理器

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::Value;

use super::{
    extract::{LoadedUser, PermittedUser},
    model::User,
    service::UserService,
};
use crate::core::error::CoreError;

/// `GET /our-custom-route` 的固定响应
pub const EASTER_EGG: &str = "this is a custom response";

#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
}

/// GET /users
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<User>>, CoreError> {
    let users = state.user_service.list_users().await?;
    Ok(Json(users))
}

/// GET /users/:id
pub async fn show(LoadedUser(user): LoadedUser) -> Json<User> {
    Json(user)
}

/// POST /users
pub async fn create(
    State(state): State<AppState>,
    PermittedUser(params): PermittedUser,
) -> Result<(StatusCode, Json<User>), CoreError> {
    let user = state.user_service.create_user(params).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT/PATCH /users/:id
pub async fn update(
    State(state): State<AppState>,
    LoadedUser(user): LoadedUser,
    PermittedUser(params): PermittedUser,
) -> Result<Json<User>, CoreError> {
    let user = state.user_service.update_user(user.id, params).await?;
    Ok(Json(user))
}

/// DELETE /users/:id
pub async fn destroy(
    State(state): State<AppState>,
    LoadedUser(user): LoadedUser,
) -> Result<StatusCode, CoreError> {
    state.user_service.delete_user(user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /our-custom-route
pub async fn easter_egg() -> Json<&'static str> {
    Json(EASTER_EGG)
}

/// GET /random-user
pub async fn friend_request(State(state): State<AppState>) -> Result<Json<User>, CoreError> {
    let user = state.user_service.random_user().await?;
    Ok(Json(user))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, CoreError> {
    let users_count = state.user_service.count_users().await?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "storage": {
            "type": state.user_service.backend(),
            "users_count": users_count
        }
    })))
}
