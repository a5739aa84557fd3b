use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record schema version. Bump when a field is added; `store::migrate`
/// upgrades older records at the read boundary.
pub const SCHEMA_VERSION: u32 = 4;

/// One entry of a per-day counter series. At most one entry per calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

impl DailyCount {
    /// Append-or-increment the entry for `date` by `by`.
    pub fn bump(series: &mut Vec<DailyCount>, date: NaiveDate, by: u64) {
        match series.iter_mut().find(|d| d.date == date) {
            Some(entry) => entry.count += by,
            None => series.push(DailyCount { date, count: by }),
        }
    }

    /// Count recorded for `date`, 0 if the series has no entry for it.
    pub fn on(series: &[DailyCount], date: NaiveDate) -> u64 {
        series
            .iter()
            .find(|d| d.date == date)
            .map(|d| d.count)
            .unwrap_or(0)
    }
}

/// One entry of the per-day XP series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyXp {
    pub date: NaiveDate,
    pub xp: u64,
}

impl DailyXp {
    pub fn bump(series: &mut Vec<DailyXp>, date: NaiveDate, by: u64) {
        match series.iter_mut().find(|d| d.date == date) {
            Some(entry) => entry.xp += by,
            None => series.push(DailyXp { date, xp: by }),
        }
    }
}

/// External links shown on a profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkItem {
    pub title: String,
    pub url: String,
}

/// Social handles. Empty string means "not filled in" — the Connected badge
/// counts the non-empty ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
    pub x: String,
    pub github: String,
    pub website: String,
    pub linkedin: String,
}

impl Social {
    pub fn filled_count(&self) -> usize {
        [&self.x, &self.github, &self.website, &self.linkedin]
            .iter()
            .filter(|s| !s.is_empty())
            .count()
    }
}

/// A builder's current goal, shown on the profile page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub title: String,
    pub description: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,
    pub progress_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lng: f64,
    pub city: String,
    pub country: String,
}

impl Default for GeoLocation {
    fn default() -> Self {
        Self {
            lat: 0.0,
            lng: 0.0,
            city: String::new(),
            country: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileMetrics {
    pub map_clicks: u64,
}

/// Persisted completion state for the daily challenge. Absent until the
/// profile completes (or is shown) its first challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeState {
    pub date: NaiveDate,
    pub completed: bool,
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
    Gradient,
}

/// A project owned by exactly one profile. Independently viewable and
/// upvotable per visitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub banner_url: Option<String>,
    pub link: Option<String>,
    pub upvotes: u64,
    pub views: u64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(
        title: String,
        description: String,
        banner_url: Option<String>,
        link: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("project_{}", Uuid::new_v4().simple()),
            title,
            description,
            banner_url,
            link,
            upvotes: 0,
            views: 0,
            created_at: now,
        }
    }
}

/// The canonical profile record. Every field is mandatory with an explicit
/// zero value; `Option` is reserved for fields whose absence is a domain
/// state (no goal set yet, no challenge seen yet).
///
/// Invariants:
/// - `badges` is always the output of `gamification::badges::generate_badges`
///   for the current counters, never hand-edited.
/// - `level` is always `xp / 500 + 1`.
/// - `dailyViews` / `dailyUpvotes` / `dailyStats` hold at most one entry per
///   calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub quote: String,
    pub bio: String,
    pub avatar: String,
    pub social: Social,
    pub goal: Option<Goal>,
    pub projects: Vec<Project>,
    pub links: Vec<LinkItem>,
    pub interests: Vec<String>,
    pub views: u64,
    pub upvotes: u64,
    pub rank: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub badges: Vec<String>,
    pub streak: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_active_date: DateTime<Utc>,
    pub last_seen_date: NaiveDate,
    pub daily_views: Vec<DailyCount>,
    pub daily_upvotes: Vec<DailyCount>,
    pub schema_version: u32,
    pub location: GeoLocation,
    pub metrics: ProfileMetrics,
    pub daily_challenge: Option<ChallengeState>,
    pub followers: Vec<String>,
    pub following: Vec<String>,
    pub xp: u64,
    pub level: u32,
    pub referral_code: String,
    pub referral_count: u32,
    pub hide_location: bool,
    pub theme_preference: ThemePreference,
    pub daily_stats: Vec<DailyXp>,
    pub achievements: Vec<String>,
    pub streak_freezes: u32,
    pub featured_count: u32,
    pub first_upvote_received: bool,
    pub link_master_unlocked: bool,
    pub early_adopter: bool,
    pub hall_of_famer: bool,
    pub creative_unlocked: bool,
    pub connected_unlocked: bool,
    pub quick_rise_unlocked: bool,
    pub hot_streak_unlocked: bool,
    pub rare_badges: Vec<String>,
}

impl Profile {
    /// A freshly signed-up profile: all counters zeroed, defaults populated.
    /// New signups get the Early Adopter flag.
    pub fn new(id: String, username: String, display_name: String, now: DateTime<Utc>) -> Self {
        let avatar = format!("https://api.dicebear.com/7.x/identicon/svg?seed={id}");
        Self {
            id,
            username,
            display_name,
            quote: String::new(),
            bio: "New builder on Makerboard.".to_string(),
            avatar,
            social: Social::default(),
            goal: None,
            projects: Vec::new(),
            links: Vec::new(),
            interests: Vec::new(),
            views: 0,
            upvotes: 0,
            rank: 0,
            created_at: now,
            badges: Vec::new(),
            streak: 0,
            last_active_date: now,
            last_seen_date: now.date_naive(),
            daily_views: Vec::new(),
            daily_upvotes: Vec::new(),
            schema_version: SCHEMA_VERSION,
            location: GeoLocation::default(),
            metrics: ProfileMetrics::default(),
            daily_challenge: None,
            followers: Vec::new(),
            following: Vec::new(),
            xp: 0,
            level: 1,
            referral_code: generate_referral_code(),
            referral_count: 0,
            hide_location: false,
            theme_preference: ThemePreference::default(),
            daily_stats: Vec::new(),
            achievements: Vec::new(),
            streak_freezes: 0,
            featured_count: 0,
            first_upvote_received: false,
            link_master_unlocked: false,
            early_adopter: true,
            hall_of_famer: false,
            creative_unlocked: false,
            connected_unlocked: false,
            quick_rise_unlocked: false,
            hot_streak_unlocked: false,
            rare_badges: Vec::new(),
        }
    }

    pub fn views_on(&self, date: NaiveDate) -> u64 {
        DailyCount::on(&self.daily_views, date)
    }

    pub fn upvotes_on(&self, date: NaiveDate) -> u64 {
        DailyCount::on(&self.daily_upvotes, date)
    }

    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    pub fn project_mut(&mut self, project_id: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == project_id)
    }
}

/// Six uppercase characters from a fresh v4 uuid.
pub fn generate_referral_code() -> String {
    Uuid::new_v4().simple().to_string()[..6].to_uppercase()
}

/// Fresh profile id, unique per signup.
pub fn generate_profile_id() -> String {
    format!("user_{}", Uuid::new_v4().simple())
}
