use chrono::{DateTime, Utc};

use crate::gamification::badges::generate_badges;
use crate::locks::ProfileLocks;
use crate::models::profile::DailyCount;
use crate::store::{ProfileStore, StoreError};

/// Records one profile view: cumulative counter, today's daily-series entry,
/// activity timestamp, and badge recompute, persisted as one write. Returns
/// `false` when the profile is absent.
pub async fn increment_view_count(
    store: &dyn ProfileStore,
    locks: &ProfileLocks,
    profile_id: &str,
    now: DateTime<Utc>,
) -> Result<bool, StoreError> {
    let _guard = locks.acquire(profile_id).await;
    let Some(mut profile) = store.get(profile_id).await? else {
        return Ok(false);
    };

    profile.views += 1;
    profile.last_active_date = now;
    DailyCount::bump(&mut profile.daily_views, now.date_naive(), 1);
    profile.badges = generate_badges(&mut profile);
    store.upsert(&profile).await?;
    Ok(true)
}

/// Records one project view. Project counters are theirs alone: no profile
/// counter, daily series, or badge update.
pub async fn increment_project_views(
    store: &dyn ProfileStore,
    locks: &ProfileLocks,
    profile_id: &str,
    project_id: &str,
) -> Result<bool, StoreError> {
    let _guard = locks.acquire(profile_id).await;
    let Some(mut profile) = store.get(profile_id).await? else {
        return Ok(false);
    };
    let Some(project) = profile.project_mut(project_id) else {
        return Ok(false);
    };

    project.views += 1;
    store.upsert(&profile).await?;
    Ok(true)
}
