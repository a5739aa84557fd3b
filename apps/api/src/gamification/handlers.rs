use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::errors::AppError;
use crate::gamification::badges::generate_badges;
use crate::gamification::challenges::{self, DailyChallenge};
use crate::gamification::leaderboard::build_leaderboard;
use crate::gamification::streaks;
use crate::gamification::xp::{self, Achievement, ACHIEVEMENTS};
use crate::models::leaderboard::{LeaderboardEntry, Window};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default)]
    pub window: Window,
}

/// GET /api/v1/leaderboard?window=today|yesterday|all-time|newcomers
///
/// Built on demand over the current profile set; no persisted rank cache.
pub async fn handle_get_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let profiles = state.store.list().await?;
    Ok(Json(build_leaderboard(&profiles, params.window, dates::now())))
}

/// POST /api/v1/streaks/run
///
/// The scheduled streak pass. Safe to trigger from a page load; each profile
/// is advanced under its own lock.
pub async fn handle_run_streaks(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    streaks::update_streaks(&*state.store, &state.locks, dates::today()).await?;
    state.sessions.clear();
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct XpGrant {
    pub amount: u64,
}

/// POST /api/v1/profiles/:id/xp
pub async fn handle_add_xp(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<XpGrant>,
) -> Result<StatusCode, AppError> {
    let granted = xp::add_xp(&*state.store, &state.locks, &id, req.amount, dates::today()).await?;
    if !granted {
        return Err(AppError::NotFound(format!("Profile {id} not found")));
    }
    state.sessions.invalidate(&id);
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct UnlockResponse {
    pub unlocked: bool,
}

/// POST /api/v1/profiles/:id/achievements/:achievement_id
///
/// `unlocked: false` covers both a repeat unlock and a missing profile —
/// append-once semantics, not an error.
pub async fn handle_unlock_achievement(
    State(state): State<AppState>,
    Path((id, achievement_id)): Path<(String, String)>,
) -> Result<Json<UnlockResponse>, AppError> {
    let unlocked =
        xp::unlock_achievement(&*state.store, &state.locks, &id, &achievement_id).await?;
    if unlocked {
        state.sessions.invalidate(&id);
    }
    Ok(Json(UnlockResponse { unlocked }))
}

/// GET /api/v1/achievements
pub async fn handle_list_achievements() -> Json<&'static [Achievement]> {
    Json(ACHIEVEMENTS)
}

/// GET /api/v1/challenge
pub async fn handle_get_challenge() -> Json<DailyChallenge> {
    Json(challenges::challenge_for(dates::today()))
}

#[derive(Serialize)]
pub struct ChallengeCompletion {
    pub completed: bool,
}

/// POST /api/v1/profiles/:id/challenge/complete
pub async fn handle_complete_challenge(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ChallengeCompletion>, AppError> {
    let completed =
        challenges::complete_daily_challenge(&*state.store, &state.locks, &id, dates::today())
            .await?;
    if completed {
        state.sessions.invalidate(&id);
    }
    Ok(Json(ChallengeCompletion { completed }))
}

/// GET /api/v1/profiles/:id/badges/preview
///
/// Pure preview: derives the badge set from the stored counters without
/// persisting anything.
pub async fn handle_badge_preview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let mut profile = state
        .store
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {id} not found")))?;
    Ok(Json(generate_badges(&mut profile)))
}

#[derive(Serialize)]
pub struct FreezeResponse {
    pub consumed: bool,
}

/// POST /api/v1/profiles/:id/streak-freeze/use
pub async fn handle_use_streak_freeze(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FreezeResponse>, AppError> {
    let consumed = streaks::use_streak_freeze(&*state.store, &state.locks, &id).await?;
    if consumed {
        state.sessions.invalidate(&id);
    }
    Ok(Json(FreezeResponse { consumed }))
}
