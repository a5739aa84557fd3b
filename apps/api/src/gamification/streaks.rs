use chrono::NaiveDate;
use tracing::{debug, info};

use crate::dates::yesterday_of;
use crate::gamification::badges::generate_badges;
use crate::gamification::scoring::score;
use crate::locks::ProfileLocks;
use crate::models::leaderboard::Window;
use crate::models::profile::Profile;
use crate::store::{ProfileStore, StoreError};

/// Consecutive streak length that banks one freeze.
const FREEZE_MILESTONE: u32 = 7;

/// Advances one profile's streak state for `today`.
///
/// A profile active today continues its streak when it was also active
/// yesterday, or restarts at 1 after a gap (and on first-ever activity). A
/// profile that missed a full day consumes a banked freeze if it has one,
/// otherwise the streak breaks. A profile inactive today whose
/// `last_seen_date` is exactly yesterday is left untouched this tick —
/// neither frozen nor broken.
///
/// Hitting a multiple of the freeze milestone banks one freeze in the same
/// tick.
pub fn tick(profile: &mut Profile, today: NaiveDate) {
    let yesterday = yesterday_of(today);
    let today_score = score(profile, Window::Today, today);
    let yesterday_score = score(profile, Window::Yesterday, today);

    if today_score > 0 {
        if profile.last_seen_date == yesterday && yesterday_score > 0 {
            profile.streak += 1;
        } else if profile.last_seen_date != yesterday {
            profile.streak = 1;
        }
        profile.last_seen_date = today;
    } else if profile.last_seen_date != today && profile.last_seen_date != yesterday {
        if profile.streak_freezes > 0 {
            profile.streak_freezes -= 1;
            debug!(profile_id = %profile.id, "streak freeze consumed");
        } else {
            profile.streak = 0;
        }
    }

    if profile.streak > 0 && profile.streak % FREEZE_MILESTONE == 0 {
        profile.streak_freezes += 1;
        debug!(
            profile_id = %profile.id,
            streak = profile.streak,
            "streak freeze banked"
        );
    }
}

/// The scheduled pass: advances every profile's streak, recomputes badges,
/// and persists. Profiles are handled one at a time, each under its own
/// lock; a re-fetch under the lock keeps the pass from clobbering a
/// concurrent engagement write.
pub async fn update_streaks(
    store: &dyn ProfileStore,
    locks: &ProfileLocks,
    today: NaiveDate,
) -> Result<(), StoreError> {
    let profiles = store.list().await?;
    let total = profiles.len();

    for listed in profiles {
        let _guard = locks.acquire(&listed.id).await;
        let Some(mut profile) = store.get(&listed.id).await? else {
            continue;
        };
        tick(&mut profile, today);
        profile.badges = generate_badges(&mut profile);
        store.upsert(&profile).await?;
    }

    info!(total, %today, "streak pass complete");
    Ok(())
}

/// Spends one banked freeze on demand. Returns `false` when the profile is
/// absent or has none banked.
pub async fn use_streak_freeze(
    store: &dyn ProfileStore,
    locks: &ProfileLocks,
    profile_id: &str,
) -> Result<bool, StoreError> {
    let _guard = locks.acquire(profile_id).await;
    let Some(mut profile) = store.get(profile_id).await? else {
        return Ok(false);
    };
    if profile.streak_freezes == 0 {
        return Ok(false);
    }
    profile.streak_freezes -= 1;
    store.upsert(&profile).await?;
    Ok(true)
}
