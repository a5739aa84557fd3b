use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::locks::ProfileLocks;
use crate::models::profile::{DailyXp, Profile};
use crate::store::{ProfileStore, StoreError};

/// XP needed per level band.
pub const XP_PER_LEVEL: u64 = 500;

/// Level is a pure function of XP: fixed 500-XP bands, level 1 at zero.
pub fn level_for_xp(xp: u64) -> u32 {
    (xp / XP_PER_LEVEL) as u32 + 1
}

/// Adds XP to the profile in memory: bumps the total, recomputes the level,
/// and appends/increments today's entry in the daily XP series. XP never
/// decreases in-band.
pub fn apply_xp(profile: &mut Profile, amount: u64, today: NaiveDate) {
    profile.xp += amount;
    profile.level = level_for_xp(profile.xp);
    DailyXp::bump(&mut profile.daily_stats, today, amount);
}

/// Grants XP to a stored profile. Returns `false` when the profile is absent.
pub async fn add_xp(
    store: &dyn ProfileStore,
    locks: &ProfileLocks,
    profile_id: &str,
    amount: u64,
    today: NaiveDate,
) -> Result<bool, StoreError> {
    let _guard = locks.acquire(profile_id).await;
    let Some(mut profile) = store.get(profile_id).await? else {
        return Ok(false);
    };

    let old_level = profile.level;
    apply_xp(&mut profile, amount, today);
    if profile.level > old_level {
        info!(
            profile_id,
            level = profile.level,
            "profile leveled up"
        );
    }
    store.upsert(&profile).await?;
    Ok(true)
}

/// An unlockable achievement from the fixed catalog.
#[derive(Debug, Clone, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

/// The full achievement catalog. Unlocks reference these by id.
pub static ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "builder",
        name: "Builder",
        description: "Create your first project",
        icon: "🏗️",
    },
    Achievement {
        id: "consistent",
        name: "Consistent",
        description: "Maintain a 5-day streak",
        icon: "🔥",
    },
    Achievement {
        id: "top10",
        name: "Top 10",
        description: "Reach top 10 on the leaderboard",
        icon: "🏆",
    },
    Achievement {
        id: "popular",
        name: "Popular",
        description: "Get 100 views",
        icon: "👥",
    },
    Achievement {
        id: "influencer",
        name: "Influencer",
        description: "Get 10 followers",
        icon: "⭐",
    },
    Achievement {
        id: "level5",
        name: "Level 5",
        description: "Reach level 5",
        icon: "📈",
    },
    Achievement {
        id: "referrer",
        name: "Referrer",
        description: "Refer 5 friends",
        icon: "🎁",
    },
];

/// Appends an achievement id to the profile, once. Returns `false` when the
/// profile is absent or the achievement is already unlocked.
pub async fn unlock_achievement(
    store: &dyn ProfileStore,
    locks: &ProfileLocks,
    profile_id: &str,
    achievement_id: &str,
) -> Result<bool, StoreError> {
    let _guard = locks.acquire(profile_id).await;
    let Some(mut profile) = store.get(profile_id).await? else {
        return Ok(false);
    };
    if profile.achievements.iter().any(|a| a == achievement_id) {
        return Ok(false);
    }
    profile.achievements.push(achievement_id.to_string());
    store.upsert(&profile).await?;
    info!(profile_id, achievement_id, "achievement unlocked");
    Ok(true)
}
