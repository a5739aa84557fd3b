use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::dates::today;
use crate::models::profile::Profile;
use crate::store::{migrate, ProfileStore, StoreError};

/// In-memory record store for tests and local development.
///
/// Records are held as raw JSON and upgraded on read, the same shape the
/// Postgres store has, so migration runs in both backends. Profiles iterate
/// in id order, which keeps tie-breaking deterministic.
#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: Mutex<BTreeMap<String, Value>>,
    facts: Mutex<HashSet<(String, String)>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with already-built profiles (test convenience).
    pub fn with_profiles(profiles: Vec<Profile>) -> Self {
        let store = Self::new();
        {
            let mut map = store.profiles.lock().unwrap();
            for p in profiles {
                map.insert(p.id.clone(), serde_json::to_value(&p).unwrap());
            }
        }
        store
    }

    /// Inserts a raw record verbatim, bypassing serialization of a `Profile`.
    /// Lets tests exercise the read-boundary upgrade path.
    pub fn insert_raw(&self, id: &str, record: Value) {
        self.profiles.lock().unwrap().insert(id.to_string(), record);
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        let raw = self.profiles.lock().unwrap().get(id).cloned();
        match raw {
            Some(value) => Ok(Some(migrate::upgrade(value, today())?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Profile>, StoreError> {
        let raws: Vec<Value> = self.profiles.lock().unwrap().values().cloned().collect();
        raws.into_iter()
            .map(|v| migrate::upgrade(v, today()).map_err(StoreError::from))
            .collect()
    }

    async fn upsert(&self, profile: &Profile) -> Result<(), StoreError> {
        let value = serde_json::to_value(profile)?;
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.id.clone(), value);
        Ok(())
    }

    async fn record_fact(&self, target_key: &str, visitor_id: &str) -> Result<bool, StoreError> {
        Ok(self
            .facts
            .lock()
            .unwrap()
            .insert((target_key.to_string(), visitor_id.to_string())))
    }

    async fn has_fact(&self, target_key: &str, visitor_id: &str) -> Result<bool, StoreError> {
        Ok(self
            .facts
            .lock()
            .unwrap()
            .contains(&(target_key.to_string(), visitor_id.to_string())))
    }

    async fn wipe(&self) -> Result<(), StoreError> {
        self.profiles.lock().unwrap().clear();
        self.facts.lock().unwrap().clear();
        Ok(())
    }
}
