pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::engagement::handlers as engagement;
use crate::gamification::handlers as gamification;
use crate::profiles::handlers as profiles;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profiles
        .route(
            "/api/v1/profiles",
            post(profiles::handle_create_profile).get(profiles::handle_list_profiles),
        )
        .route("/api/v1/profiles/:id", get(profiles::handle_get_profile))
        .route(
            "/api/v1/profiles/:id/analytics",
            get(profiles::handle_analytics),
        )
        .route(
            "/api/v1/profiles/:id/location",
            put(profiles::handle_update_location),
        )
        .route(
            "/api/v1/profiles/:id/map-click",
            post(profiles::handle_map_click),
        )
        .route(
            "/api/v1/profiles/:id/follow",
            post(profiles::handle_follow).delete(profiles::handle_unfollow),
        )
        .route("/api/v1/featured", get(profiles::handle_featured))
        // Projects
        .route(
            "/api/v1/profiles/:id/projects",
            post(profiles::handle_add_project),
        )
        .route(
            "/api/v1/profiles/:id/projects/:project_id",
            patch(profiles::handle_update_project).delete(profiles::handle_delete_project),
        )
        // Engagement
        .route(
            "/api/v1/profiles/:id/upvote",
            post(engagement::handle_profile_upvote),
        )
        .route(
            "/api/v1/profiles/:id/can-upvote",
            get(engagement::handle_can_upvote),
        )
        .route(
            "/api/v1/profiles/:id/view",
            post(engagement::handle_profile_view),
        )
        .route(
            "/api/v1/profiles/:id/projects/:project_id/upvote",
            post(engagement::handle_project_upvote),
        )
        .route(
            "/api/v1/profiles/:id/projects/:project_id/can-upvote",
            get(engagement::handle_project_can_upvote),
        )
        .route(
            "/api/v1/profiles/:id/projects/:project_id/view",
            post(engagement::handle_project_view),
        )
        // Gamification
        .route(
            "/api/v1/leaderboard",
            get(gamification::handle_get_leaderboard),
        )
        .route("/api/v1/streaks/run", post(gamification::handle_run_streaks))
        .route("/api/v1/profiles/:id/xp", post(gamification::handle_add_xp))
        .route(
            "/api/v1/profiles/:id/achievements/:achievement_id",
            post(gamification::handle_unlock_achievement),
        )
        .route(
            "/api/v1/achievements",
            get(gamification::handle_list_achievements),
        )
        .route("/api/v1/challenge", get(gamification::handle_get_challenge))
        .route(
            "/api/v1/profiles/:id/challenge/complete",
            post(gamification::handle_complete_challenge),
        )
        .route(
            "/api/v1/profiles/:id/badges/preview",
            get(gamification::handle_badge_preview),
        )
        .route(
            "/api/v1/profiles/:id/streak-freeze/use",
            post(gamification::handle_use_streak_freeze),
        )
        // Admin / debug
        .route("/api/v1/admin/reset", post(profiles::handle_admin_reset))
        .with_state(state)
}
