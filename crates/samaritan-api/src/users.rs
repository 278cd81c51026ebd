use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use samaritan_core::EngineError;
use samaritan_types::api::{LoginRequest, LoginResponse, UserActionRequest};
use samaritan_types::models::{User, UserProfile};

use crate::error::ApiError;
use crate::middleware::parse_body;
use crate::state::{AppState, blocking};

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = blocking(&state, |e| e.users.list_users()).await?;
    Ok(Json(users))
}

/// POST /users: Log in, registering on first sight of the email.
pub async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<LoginResponse>, ApiError> {
    let req: LoginRequest = parse_body(&body)?;
    let resp = blocking(&state, move |e| e.users.login(&req)).await?;
    Ok(Json(resp))
}

/// GET /users/{user_id}: The user plus the issues they created and helped on.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = blocking(&state, move |e| {
        e.user_profile(&user_id)?
            .ok_or_else(|| EngineError::not_found("user", &user_id))
    })
    .await?;
    Ok(Json(profile))
}

/// PUT /users/{user_id}: Add to or remove from one of the user's lists.
pub async fn apply_action(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Bytes,
) -> Result<Json<User>, ApiError> {
    let req: UserActionRequest = parse_body(&body)?;
    let user = blocking(&state, move |e| e.apply_user_action(&user_id, &req)).await?;
    Ok(Json(user))
}
