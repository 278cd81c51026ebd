use std::time::Duration;

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    routing::{get, put},
};
use serde_json::{Value, json};
use tower_http::timeout::TimeoutLayer;

use crate::middleware::{cors_headers, require_json};
use crate::state::AppState;
use crate::{issues, posts, users};

pub fn router(state: AppState, request_timeout: Duration) -> Router {
    let app = Router::new()
        .route(
            "/issues",
            get(issues::list_issues)
                .post(issues::create_issue)
                .options(preflight),
        )
        .route("/issues/{issue_id}", get(issues::get_issue).options(preflight))
        .route(
            "/issues/{issue_id}/{field}",
            put(issues::update_issue).options(preflight),
        )
        .route(
            "/users",
            get(users::list_users).post(users::login).options(preflight),
        )
        .route(
            "/users/{user_id}",
            get(users::get_profile)
                .put(users::apply_action)
                .options(preflight),
        )
        .route(
            "/posts",
            get(posts::list_posts)
                .post(posts::create_post)
                .options(preflight),
        )
        .route(
            "/userPosts/{user_id}",
            get(posts::posts_by_user)
                .post(posts::create_post_for_user)
                .options(preflight),
        )
        .route("/health", get(health));

    edge_layers(app, request_timeout).with_state(state)
}

/// Content-type guard and request timeout, wrapped by the CORS headers so
/// that rejections and timeouts carry them too.
fn edge_layers<S>(app: Router<S>, request_timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let mut app = app
        .layer(middleware::from_fn(require_json))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ));

    for layer in cors_headers() {
        app = app.layer(layer);
    }
    app
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
