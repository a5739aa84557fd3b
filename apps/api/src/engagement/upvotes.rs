use chrono::{DateTime, Utc};
use tracing::debug;

use crate::gamification::badges::generate_badges;
use crate::locks::ProfileLocks;
use crate::models::profile::DailyCount;
use crate::store::{project_target_key, ProfileStore, StoreError};

/// Whether `visitor_id` can still upvote `target_key`. Read-only preview;
/// the authoritative check is the conditional insert in `record_fact`.
pub async fn can_upvote(
    store: &dyn ProfileStore,
    target_key: &str,
    visitor_id: &str,
) -> Result<bool, StoreError> {
    Ok(!store.has_fact(target_key, visitor_id).await?)
}

/// Upvotes a profile on behalf of a visitor, once.
///
/// Returns `false` when the profile is absent or the visitor already voted.
/// The ledger insert is atomic, and the counter bump, daily-series entry,
/// first-upvote flag, and badge recompute land in a single persisted write.
pub async fn add_upvote(
    store: &dyn ProfileStore,
    locks: &ProfileLocks,
    profile_id: &str,
    visitor_id: &str,
    now: DateTime<Utc>,
) -> Result<bool, StoreError> {
    let _guard = locks.acquire(profile_id).await;
    let Some(mut profile) = store.get(profile_id).await? else {
        return Ok(false);
    };
    if !store.record_fact(profile_id, visitor_id).await? {
        debug!(profile_id, visitor_id, "duplicate upvote ignored");
        return Ok(false);
    }

    profile.upvotes += 1;
    profile.last_active_date = now;
    if profile.upvotes == 1 {
        profile.first_upvote_received = true;
    }
    DailyCount::bump(&mut profile.daily_upvotes, now.date_naive(), 1);
    profile.badges = generate_badges(&mut profile);
    store.upsert(&profile).await?;
    Ok(true)
}

/// Upvotes one project of a profile, once per visitor. Project votes are
/// independent of profile votes and of each other: the ledger key is the
/// composite project key. Project counters do not feed profile badges.
pub async fn add_project_upvote(
    store: &dyn ProfileStore,
    locks: &ProfileLocks,
    profile_id: &str,
    project_id: &str,
    visitor_id: &str,
) -> Result<bool, StoreError> {
    let _guard = locks.acquire(profile_id).await;
    let Some(mut profile) = store.get(profile_id).await? else {
        return Ok(false);
    };
    if profile.project(project_id).is_none() {
        return Ok(false);
    }
    if !store
        .record_fact(&project_target_key(project_id), visitor_id)
        .await?
    {
        debug!(profile_id, project_id, visitor_id, "duplicate project upvote ignored");
        return Ok(false);
    }

    // The project was verified present above; the lock rules out removal
    // between the check and this mutation.
    if let Some(project) = profile.project_mut(project_id) {
        project.upvotes += 1;
    }
    store.upsert(&profile).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{Profile, Project};
    use crate::store::memory::MemoryProfileStore;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap()
    }

    fn make_profile(id: &str) -> Profile {
        Profile::new(id.to_string(), id.to_string(), id.to_string(), fixed_now())
    }

    fn make_profile_with_project(id: &str, project_id: &str) -> Profile {
        let mut p = make_profile(id);
        let mut project = Project::new("Demo".into(), String::new(), None, None, fixed_now());
        project.id = project_id.to_string();
        p.projects.push(project);
        p
    }

    #[tokio::test]
    async fn test_second_upvote_from_same_visitor_is_rejected() {
        let store = MemoryProfileStore::with_profiles(vec![make_profile("user_a")]);
        let locks = ProfileLocks::new();

        assert!(add_upvote(&store, &locks, "user_a", "visitor_1", fixed_now())
            .await
            .unwrap());
        assert!(!add_upvote(&store, &locks, "user_a", "visitor_1", fixed_now())
            .await
            .unwrap());

        let p = store.get("user_a").await.unwrap().unwrap();
        assert_eq!(p.upvotes, 1);
        assert_eq!(p.upvotes_on(fixed_now().date_naive()), 1);
    }

    #[tokio::test]
    async fn test_distinct_visitors_both_count() {
        let store = MemoryProfileStore::with_profiles(vec![make_profile("user_a")]);
        let locks = ProfileLocks::new();

        add_upvote(&store, &locks, "user_a", "visitor_1", fixed_now())
            .await
            .unwrap();
        add_upvote(&store, &locks, "user_a", "visitor_2", fixed_now())
            .await
            .unwrap();

        let p = store.get("user_a").await.unwrap().unwrap();
        assert_eq!(p.upvotes, 2);
    }

    #[tokio::test]
    async fn test_first_upvote_sets_first_blood() {
        let store = MemoryProfileStore::with_profiles(vec![make_profile("user_a")]);
        let locks = ProfileLocks::new();

        add_upvote(&store, &locks, "user_a", "visitor_1", fixed_now())
            .await
            .unwrap();

        let p = store.get("user_a").await.unwrap().unwrap();
        assert!(p.first_upvote_received);
        assert!(p.badges.contains(&"First Blood".to_string()));
    }

    #[tokio::test]
    async fn test_upvote_missing_profile_is_false() {
        let store = MemoryProfileStore::new();
        let locks = ProfileLocks::new();
        assert!(!add_upvote(&store, &locks, "user_ghost", "visitor_1", fixed_now())
            .await
            .unwrap());
        // Nothing recorded: the visitor can vote once the profile exists.
        assert!(can_upvote(&store, "user_ghost", "visitor_1").await.unwrap());
    }

    #[tokio::test]
    async fn test_profile_and_project_votes_are_independent() {
        let store = MemoryProfileStore::with_profiles(vec![make_profile_with_project(
            "user_a", "proj_1",
        )]);
        let locks = ProfileLocks::new();

        assert!(add_upvote(&store, &locks, "user_a", "visitor_1", fixed_now())
            .await
            .unwrap());
        assert!(
            add_project_upvote(&store, &locks, "user_a", "proj_1", "visitor_1")
                .await
                .unwrap()
        );
        assert!(
            !add_project_upvote(&store, &locks, "user_a", "proj_1", "visitor_1")
                .await
                .unwrap()
        );

        let p = store.get("user_a").await.unwrap().unwrap();
        assert_eq!(p.upvotes, 1);
        assert_eq!(p.project("proj_1").unwrap().upvotes, 1);
    }

    #[tokio::test]
    async fn test_project_upvote_unknown_project_is_false() {
        let store = MemoryProfileStore::with_profiles(vec![make_profile("user_a")]);
        let locks = ProfileLocks::new();
        assert!(
            !add_project_upvote(&store, &locks, "user_a", "proj_missing", "visitor_1")
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_concurrent_upvotes_count_each_visitor_once() {
        let store = std::sync::Arc::new(MemoryProfileStore::with_profiles(vec![make_profile(
            "user_a",
        )]));
        let locks = ProfileLocks::new();

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            let locks = locks.clone();
            // Two tasks per visitor race for the same fact.
            let visitor = format!("visitor_{}", i / 2);
            handles.push(tokio::spawn(async move {
                add_upvote(&*store, &locks, "user_a", &visitor, fixed_now())
                    .await
                    .unwrap()
            }));
        }
        let accepted = {
            let mut n = 0;
            for h in handles {
                if h.await.unwrap() {
                    n += 1;
                }
            }
            n
        };

        assert_eq!(accepted, 10);
        let p = store.get("user_a").await.unwrap().unwrap();
        assert_eq!(p.upvotes, 10);
    }
}
