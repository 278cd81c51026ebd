use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use samaritan_core::EngineError;
use samaritan_types::api::{CreateIssueRequest, HelperRequest, StatusRequest};
use samaritan_types::models::{Comment, Issue};

use crate::error::ApiError;
use crate::middleware::parse_body;
use crate::state::{AppState, blocking};

/// GET /issues
pub async fn list_issues(State(state): State<AppState>) -> Result<Json<Vec<Issue>>, ApiError> {
    let issues = blocking(&state, |e| e.issues.list_all()).await?;
    Ok(Json(issues))
}

/// POST /issues: Returns the stored issue with its assigned id.
pub async fn create_issue(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let req: CreateIssueRequest = parse_body(&body)?;
    let issue = blocking(&state, move |e| e.issues.create_issue(req)).await?;
    Ok((StatusCode::CREATED, Json(issue)))
}

/// GET /issues/{issue_id}
pub async fn get_issue(
    State(state): State<AppState>,
    Path(issue_id): Path<String>,
) -> Result<Json<Issue>, ApiError> {
    let issue = blocking(&state, move |e| {
        e.issues
            .get_by_id(&issue_id)?
            .ok_or_else(|| EngineError::not_found("issue", &issue_id))
    })
    .await?;
    Ok(Json(issue))
}

/// PUT /issues/{issue_id}/{field}: `comment`, `help` or `status`.
pub async fn update_issue(
    State(state): State<AppState>,
    Path((issue_id, field)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<Issue>, ApiError> {
    let issue = match field.as_str() {
        "comment" => {
            let comment: Comment = parse_body(&body)?;
            blocking(&state, move |e| e.issues.append_comment(&issue_id, comment)).await?
        }
        "help" => {
            let helper: HelperRequest = parse_body(&body)?;
            blocking(&state, move |e| {
                e.record_help(&helper.user_id, &issue_id, &helper.user_name)
                    .map(|outcome| outcome.issue)
            })
            .await?
        }
        "status" => {
            let status: StatusRequest = parse_body(&body)?;
            blocking(&state, move |e| e.issues.set_status(&issue_id, &status.status_msg)).await?
        }
        _ => return Err(ApiError::UnknownField(field)),
    };
    Ok(Json(issue))
}
