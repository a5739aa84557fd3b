use chrono::{DateTime, Datelike, NaiveDate, Utc};
use tracing::info;

use crate::gamification::badges::generate_badges;
use crate::gamification::xp::apply_xp;
use crate::locks::ProfileLocks;
use crate::models::profile::{generate_profile_id, GeoLocation, Profile, Project};
use crate::store::{ProfileStore, StoreError};

/// XP granted for shipping a new project.
const PROJECT_XP_REWARD: u64 = 50;

/// Creates a profile at signup: counters zeroed, defaults populated, Early
/// Adopter flag set. Returns `None` when the username is already taken
/// (checked against the full profile list, case-insensitive).
pub async fn create_profile(
    store: &dyn ProfileStore,
    username: &str,
    display_name: &str,
    now: DateTime<Utc>,
) -> Result<Option<Profile>, StoreError> {
    let taken = store
        .list()
        .await?
        .iter()
        .any(|p| p.username.eq_ignore_ascii_case(username));
    if taken {
        return Ok(None);
    }

    let profile = Profile::new(
        generate_profile_id(),
        username.to_string(),
        display_name.to_string(),
        now,
    );
    store.upsert(&profile).await?;
    info!(profile_id = %profile.id, username, "profile created");
    Ok(Some(profile))
}

/// Fields accepted when creating a project.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub banner_url: Option<String>,
    pub link: Option<String>,
}

/// Adds a project to a profile. A bannered project unlocks the Creative
/// badge; shipping grants XP. Counter, flag, XP, and badge recompute land in
/// one persisted write. Returns the created project, or `None` when the
/// profile is absent.
pub async fn add_project(
    store: &dyn ProfileStore,
    locks: &ProfileLocks,
    profile_id: &str,
    new_project: NewProject,
    now: DateTime<Utc>,
) -> Result<Option<Project>, StoreError> {
    let _guard = locks.acquire(profile_id).await;
    let Some(mut profile) = store.get(profile_id).await? else {
        return Ok(None);
    };

    let project = Project::new(
        new_project.title,
        new_project.description,
        new_project.banner_url,
        new_project.link,
        now,
    );
    if project.banner_url.is_some() && !profile.creative_unlocked {
        profile.creative_unlocked = true;
    }
    profile.projects.push(project.clone());
    apply_xp(&mut profile, PROJECT_XP_REWARD, now.date_naive());
    profile.badges = generate_badges(&mut profile);
    store.upsert(&profile).await?;
    Ok(Some(project))
}

/// Partial project update; absent fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub banner_url: Option<String>,
    pub link: Option<String>,
}

pub async fn update_project(
    store: &dyn ProfileStore,
    locks: &ProfileLocks,
    profile_id: &str,
    project_id: &str,
    updates: ProjectUpdate,
) -> Result<bool, StoreError> {
    let _guard = locks.acquire(profile_id).await;
    let Some(mut profile) = store.get(profile_id).await? else {
        return Ok(false);
    };
    let Some(project) = profile.project_mut(project_id) else {
        return Ok(false);
    };

    if let Some(title) = updates.title {
        project.title = title;
    }
    if let Some(description) = updates.description {
        project.description = description;
    }
    if let Some(banner_url) = updates.banner_url {
        project.banner_url = Some(banner_url);
    }
    if let Some(link) = updates.link {
        project.link = Some(link);
    }
    store.upsert(&profile).await?;
    Ok(true)
}

pub async fn delete_project(
    store: &dyn ProfileStore,
    locks: &ProfileLocks,
    profile_id: &str,
    project_id: &str,
) -> Result<bool, StoreError> {
    let _guard = locks.acquire(profile_id).await;
    let Some(mut profile) = store.get(profile_id).await? else {
        return Ok(false);
    };
    let before = profile.projects.len();
    profile.projects.retain(|p| p.id != project_id);
    if profile.projects.len() == before {
        return Ok(false);
    }
    store.upsert(&profile).await?;
    Ok(true)
}

/// Adds `follower_id` to `target_id`'s followers and the reverse edge to the
/// follower's following list, once. Self-follows and duplicate follows
/// return `false`. Both profiles persist in the same operation, with their
/// locks taken in sorted order.
pub async fn follow(
    store: &dyn ProfileStore,
    locks: &ProfileLocks,
    target_id: &str,
    follower_id: &str,
) -> Result<bool, StoreError> {
    if target_id == follower_id {
        return Ok(false);
    }
    let (_gt, _gf) = locks.acquire_pair(target_id, follower_id).await;
    let (Some(mut target), Some(mut follower)) =
        (store.get(target_id).await?, store.get(follower_id).await?)
    else {
        return Ok(false);
    };
    if target.followers.iter().any(|id| id == follower_id) {
        return Ok(false);
    }

    target.followers.push(follower_id.to_string());
    follower.following.push(target_id.to_string());
    store.upsert(&target).await?;
    store.upsert(&follower).await?;
    Ok(true)
}

/// Removes the follow edge in both directions. Returns `false` only when a
/// profile is absent; removing an edge that does not exist is a no-op.
pub async fn unfollow(
    store: &dyn ProfileStore,
    locks: &ProfileLocks,
    target_id: &str,
    follower_id: &str,
) -> Result<bool, StoreError> {
    if target_id == follower_id {
        return Ok(false);
    }
    let (_gt, _gf) = locks.acquire_pair(target_id, follower_id).await;
    let (Some(mut target), Some(mut follower)) =
        (store.get(target_id).await?, store.get(follower_id).await?)
    else {
        return Ok(false);
    };

    target.followers.retain(|id| id != follower_id);
    follower.following.retain(|id| id != target_id);
    store.upsert(&target).await?;
    store.upsert(&follower).await?;
    Ok(true)
}

/// A rotating, date-seeded pick of up to three profiles for the showcase.
/// Same date, same set, same order — no randomness between requests.
pub fn featured_builders(profiles: &[Profile], today: NaiveDate) -> Vec<Profile> {
    let seed = today.year() as usize + today.month() as usize + today.day() as usize;
    let mut ranked: Vec<&Profile> = profiles.iter().collect();
    ranked.sort_by_key(|p| {
        let lead = p.id.chars().next().map(|c| c as usize).unwrap_or(0);
        std::cmp::Reverse((seed + lead) % 1000)
    });
    ranked.into_iter().take(3).cloned().collect()
}

pub async fn update_location(
    store: &dyn ProfileStore,
    locks: &ProfileLocks,
    profile_id: &str,
    location: GeoLocation,
) -> Result<bool, StoreError> {
    let _guard = locks.acquire(profile_id).await;
    let Some(mut profile) = store.get(profile_id).await? else {
        return Ok(false);
    };
    profile.location = location;
    store.upsert(&profile).await?;
    Ok(true)
}

pub async fn record_map_click(
    store: &dyn ProfileStore,
    locks: &ProfileLocks,
    profile_id: &str,
) -> Result<bool, StoreError> {
    let _guard = locks.acquire(profile_id).await;
    let Some(mut profile) = store.get(profile_id).await? else {
        return Ok(false);
    };
    profile.metrics.map_clicks += 1;
    store.upsert(&profile).await?;
    Ok(true)
}
