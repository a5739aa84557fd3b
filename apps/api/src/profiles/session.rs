use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::models::profile::Profile;

/// Short-lived read cache for profile records.
///
/// Every entry carries its load time and is checked against the TTL on each
/// hit; stale entries are dropped, never served. Mutating handlers
/// invalidate the id they touched. The cache is an explicit collaborator
/// held in `AppState` — state, expiry, and invalidation are all visible at
/// the call sites.
pub struct SessionCache {
    ttl: Duration,
    inner: Mutex<HashMap<String, CachedProfile>>,
}

struct CachedProfile {
    profile: Profile,
    loaded_at: DateTime<Utc>,
}

impl SessionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Default TTL: thirty seconds. Long enough to absorb a page load's
    /// burst of requests, short enough that leaderboard-adjacent reads stay
    /// current.
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::seconds(30))
    }

    /// Returns the cached profile if present and fresh at `now`. A stale
    /// entry is removed and reported as a miss.
    pub fn get_fresh(&self, id: &str, now: DateTime<Utc>) -> Option<Profile> {
        let mut map = self.inner.lock().unwrap();
        match map.get(id) {
            Some(cached) if now - cached.loaded_at < self.ttl => Some(cached.profile.clone()),
            Some(_) => {
                map.remove(id);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, profile: Profile, now: DateTime<Utc>) {
        self.inner.lock().unwrap().insert(
            profile.id.clone(),
            CachedProfile {
                profile,
                loaded_at: now,
            },
        );
    }

    pub fn invalidate(&self, id: &str) {
        self.inner.lock().unwrap().remove(id);
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap().clear();
    }
}
