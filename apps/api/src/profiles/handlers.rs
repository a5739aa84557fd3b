use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::errors::AppError;
use crate::models::profile::{GeoLocation, Profile, Project};
use crate::profiles::analytics::{build_report, AnalyticsReport};
use crate::profiles::service::{self, NewProject, ProjectUpdate};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    pub username: String,
    pub display_name: String,
}

/// POST /api/v1/profiles
pub async fn handle_create_profile(
    State(state): State<AppState>,
    Json(req): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<Profile>), AppError> {
    if req.username.trim().is_empty() {
        return Err(AppError::Validation("Username must not be empty".to_string()));
    }
    let profile = service::create_profile(
        &*state.store,
        req.username.trim(),
        req.display_name.trim(),
        dates::now(),
    )
    .await?
    .ok_or_else(|| AppError::Validation(format!("Username '{}' is already taken", req.username)))?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /api/v1/profiles
pub async fn handle_list_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<Profile>>, AppError> {
    Ok(Json(state.store.list().await?))
}

/// GET /api/v1/profiles/:id
///
/// Read-through the session cache: fresh entries are served directly, stale
/// or missing ones hit the store and refill the cache.
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Profile>, AppError> {
    let now = dates::now();
    if let Some(cached) = state.sessions.get_fresh(&id, now) {
        return Ok(Json(cached));
    }
    let profile = state
        .store
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {id} not found")))?;
    state.sessions.insert(profile.clone(), now);
    Ok(Json(profile))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: String,
    pub banner_url: Option<String>,
    pub link: Option<String>,
}

/// POST /api/v1/profiles/:id/projects
pub async fn handle_add_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    let project = service::add_project(
        &*state.store,
        &state.locks,
        &id,
        NewProject {
            title: req.title,
            description: req.description,
            banner_url: req.banner_url,
            link: req.link,
        },
        dates::now(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Profile {id} not found")))?;
    state.sessions.invalidate(&id);
    Ok((StatusCode::CREATED, Json(project)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub banner_url: Option<String>,
    pub link: Option<String>,
}

/// PATCH /api/v1/profiles/:id/projects/:project_id
pub async fn handle_update_project(
    State(state): State<AppState>,
    Path((id, project_id)): Path<(String, String)>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<StatusCode, AppError> {
    let updated = service::update_project(
        &*state.store,
        &state.locks,
        &id,
        &project_id,
        ProjectUpdate {
            title: req.title,
            description: req.description,
            banner_url: req.banner_url,
            link: req.link,
        },
    )
    .await?;
    if !updated {
        return Err(AppError::NotFound(format!(
            "Project {project_id} not found on profile {id}"
        )));
    }
    state.sessions.invalidate(&id);
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/profiles/:id/projects/:project_id
pub async fn handle_delete_project(
    State(state): State<AppState>,
    Path((id, project_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let deleted = service::delete_project(&*state.store, &state.locks, &id, &project_id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!(
            "Project {project_id} not found on profile {id}"
        )));
    }
    state.sessions.invalidate(&id);
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub follower_id: String,
}

#[derive(Serialize)]
pub struct FollowResponse {
    pub followed: bool,
}

/// POST /api/v1/profiles/:id/follow
pub async fn handle_follow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<FollowRequest>,
) -> Result<Json<FollowResponse>, AppError> {
    let followed = service::follow(&*state.store, &state.locks, &id, &req.follower_id).await?;
    if followed {
        state.sessions.invalidate(&id);
        state.sessions.invalidate(&req.follower_id);
    }
    Ok(Json(FollowResponse { followed }))
}

#[derive(Serialize)]
pub struct UnfollowResponse {
    pub unfollowed: bool,
}

/// DELETE /api/v1/profiles/:id/follow
pub async fn handle_unfollow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<FollowRequest>,
) -> Result<Json<UnfollowResponse>, AppError> {
    let unfollowed = service::unfollow(&*state.store, &state.locks, &id, &req.follower_id).await?;
    if unfollowed {
        state.sessions.invalidate(&id);
        state.sessions.invalidate(&req.follower_id);
    }
    Ok(Json(UnfollowResponse { unfollowed }))
}

/// GET /api/v1/featured
pub async fn handle_featured(State(state): State<AppState>) -> Result<Json<Vec<Profile>>, AppError> {
    let profiles = state.store.list().await?;
    Ok(Json(service::featured_builders(&profiles, dates::today())))
}

/// GET /api/v1/profiles/:id/analytics
pub async fn handle_analytics(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnalyticsReport>, AppError> {
    let profile = state
        .store
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {id} not found")))?;
    Ok(Json(build_report(&profile, dates::today())))
}

/// PUT /api/v1/profiles/:id/location
pub async fn handle_update_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(location): Json<GeoLocation>,
) -> Result<StatusCode, AppError> {
    let updated = service::update_location(&*state.store, &state.locks, &id, location).await?;
    if !updated {
        return Err(AppError::NotFound(format!("Profile {id} not found")));
    }
    state.sessions.invalidate(&id);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/profiles/:id/map-click
pub async fn handle_map_click(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let recorded = service::record_map_click(&*state.store, &state.locks, &id).await?;
    if !recorded {
        return Err(AppError::NotFound(format!("Profile {id} not found")));
    }
    state.sessions.invalidate(&id);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/reset
///
/// Debug/administrative bulk reset: clears every profile and upvote fact.
pub async fn handle_admin_reset(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.wipe().await?;
    state.sessions.clear();
    tracing::warn!("All profile data wiped via admin reset");
    Ok(StatusCode::NO_CONTENT)
}
