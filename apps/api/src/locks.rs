use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Per-profile write serialization.
///
/// Every mutating operation follows a fetch-mutate-persist pattern against
/// the record store; that pattern loses updates under concurrent writers to
/// the same profile. Holding the profile's lock across the whole
/// read-modify-write closes the window. Profiles lock independently, so the
/// streak batch pass and unrelated upvotes proceed in parallel.
#[derive(Clone, Default)]
pub struct ProfileLocks {
    inner: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl ProfileLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for one profile id, creating it on first use.
    pub async fn acquire(&self, id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap();
            map.entry(id.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Acquires two distinct profile locks in sorted key order, so that
    /// concurrent two-profile operations (follow/unfollow) cannot deadlock.
    /// Guards are returned in argument order. Panics if `a == b`; callers
    /// reject self-referential operations before locking.
    pub async fn acquire_pair(&self, a: &str, b: &str) -> (OwnedMutexGuard<()>, OwnedMutexGuard<()>) {
        assert_ne!(a, b, "acquire_pair requires distinct profile ids");
        if a < b {
            let ga = self.acquire(a).await;
            let gb = self.acquire(b).await;
            (ga, gb)
        } else {
            let gb = self.acquire(b).await;
            let ga = self.acquire(a).await;
            (ga, gb)
        }
    }
}
