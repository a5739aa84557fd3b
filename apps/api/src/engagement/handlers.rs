use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    Json,
};
use serde::Serialize;

use crate::dates;
use crate::engagement::{upvotes, views};
use crate::errors::AppError;
use crate::state::AppState;
use crate::store::project_target_key;

/// The acting visitor, taken from the `X-Visitor-Id` header.
///
/// Visitor identity is an explicit per-request context passed into every
/// engagement operation — there is no ambient current-user state.
pub struct Visitor {
    pub visitor_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let visitor_id = parts
            .headers
            .get("x-visitor-id")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Validation("Missing X-Visitor-Id header".to_string()))?;
        Ok(Visitor {
            visitor_id: visitor_id.to_string(),
        })
    }
}

#[derive(Serialize)]
pub struct UpvoteResponse {
    /// `false` means the visitor already voted for this target.
    pub accepted: bool,
}

/// POST /api/v1/profiles/:id/upvote
pub async fn handle_profile_upvote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    visitor: Visitor,
) -> Result<Json<UpvoteResponse>, AppError> {
    let accepted = upvotes::add_upvote(
        &*state.store,
        &state.locks,
        &id,
        &visitor.visitor_id,
        dates::now(),
    )
    .await?;
    if accepted {
        state.sessions.invalidate(&id);
    }
    Ok(Json(UpvoteResponse { accepted }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanUpvoteResponse {
    pub can_upvote: bool,
}

/// GET /api/v1/profiles/:id/can-upvote
pub async fn handle_can_upvote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    visitor: Visitor,
) -> Result<Json<CanUpvoteResponse>, AppError> {
    let can_upvote = upvotes::can_upvote(&*state.store, &id, &visitor.visitor_id).await?;
    Ok(Json(CanUpvoteResponse { can_upvote }))
}

/// POST /api/v1/profiles/:id/projects/:project_id/upvote
pub async fn handle_project_upvote(
    State(state): State<AppState>,
    Path((id, project_id)): Path<(String, String)>,
    visitor: Visitor,
) -> Result<Json<UpvoteResponse>, AppError> {
    let accepted = upvotes::add_project_upvote(
        &*state.store,
        &state.locks,
        &id,
        &project_id,
        &visitor.visitor_id,
    )
    .await?;
    if accepted {
        state.sessions.invalidate(&id);
    }
    Ok(Json(UpvoteResponse { accepted }))
}

/// GET /api/v1/profiles/:id/projects/:project_id/can-upvote
pub async fn handle_project_can_upvote(
    State(state): State<AppState>,
    Path((_id, project_id)): Path<(String, String)>,
    visitor: Visitor,
) -> Result<Json<CanUpvoteResponse>, AppError> {
    let can_upvote = upvotes::can_upvote(
        &*state.store,
        &project_target_key(&project_id),
        &visitor.visitor_id,
    )
    .await?;
    Ok(Json(CanUpvoteResponse { can_upvote }))
}

/// POST /api/v1/profiles/:id/view
pub async fn handle_profile_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let recorded =
        views::increment_view_count(&*state.store, &state.locks, &id, dates::now()).await?;
    if !recorded {
        return Err(AppError::NotFound(format!("Profile {id} not found")));
    }
    state.sessions.invalidate(&id);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/profiles/:id/projects/:project_id/view
pub async fn handle_project_view(
    State(state): State<AppState>,
    Path((id, project_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let recorded =
        views::increment_project_views(&*state.store, &state.locks, &id, &project_id).await?;
    if !recorded {
        return Err(AppError::NotFound(format!(
            "Project {project_id} not found on profile {id}"
        )));
    }
    state.sessions.invalidate(&id);
    Ok(StatusCode::NO_CONTENT)
}
