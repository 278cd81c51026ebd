use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use samaritan_types::api::CreatePostRequest;
use samaritan_types::models::Post;

use crate::error::ApiError;
use crate::middleware::parse_body;
use crate::state::{AppState, blocking};

/// GET /posts
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = blocking(&state, |e| e.posts.list_all()).await?;
    Ok(Json(posts))
}

/// POST /posts
pub async fn create_post(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let req: CreatePostRequest = parse_body(&body)?;
    let post = blocking(&state, move |e| e.posts.create_post(req)).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// POST /userPosts/{user_id}: The path names the author; any `userid` in the
/// body is ignored.
pub async fn create_post_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let mut req: CreatePostRequest = parse_body(&body)?;
    req.user_id = user_id;
    let post = blocking(&state, move |e| e.posts.create_post(req)).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /userPosts/{user_id}
pub async fn posts_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = blocking(&state, move |e| e.posts.posts_by_user(&user_id)).await?;
    Ok(Json(posts))
}
