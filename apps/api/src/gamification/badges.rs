use std::collections::HashSet;

use crate::models::profile::Profile;

/// Derives the full badge set from the profile's current counters.
///
/// Deterministic and idempotent: the result depends only on the counters and
/// unlock flags, and calling it again yields the same set. Crossing the Link
/// Master / Connected thresholds also sets the matching unlock flag on the
/// profile, so callers must persist the profile after calling this.
pub fn generate_badges(profile: &mut Profile) -> Vec<String> {
    let mut badges: Vec<&str> = Vec::new();

    // Upvote tiers
    if profile.upvotes >= 10 {
        badges.push("Bronze");
    }
    if profile.upvotes >= 50 {
        badges.push("Silver");
    }
    if profile.upvotes >= 200 {
        badges.push("Gold");
    }
    if profile.upvotes >= 10_000 {
        badges.push("Diamond");
    }

    // View tiers
    if profile.views >= 100 {
        badges.push("Popular");
    }
    if profile.views >= 500 {
        badges.push("Trending");
    }
    if profile.views >= 2_000 {
        badges.push("Viral");
    }

    // Streak tiers
    if profile.streak >= 3 {
        badges.push("Consistent");
    }
    if profile.streak >= 7 {
        badges.push("Dedicated");
    }
    if profile.streak >= 30 {
        badges.push("Unstoppable");
    }

    // Project tiers
    if profile.projects.len() >= 3 {
        badges.push("Builder");
    }
    if profile.projects.len() >= 10 {
        badges.push("Prolific");
    }

    if profile.first_upvote_received {
        badges.push("First Blood");
    }
    if profile.links.len() >= 5 {
        badges.push("Link Master");
        profile.link_master_unlocked = true;
    }
    if profile.early_adopter {
        badges.push("Early Adopter");
    }
    if profile.featured_count >= 3 {
        badges.push("Hall of Famer");
    }
    if profile.creative_unlocked {
        badges.push("Creative");
    }
    if profile.social.filled_count() >= 4 {
        badges.push("Connected");
        profile.connected_unlocked = true;
    }
    if profile.quick_rise_unlocked {
        badges.push("Quick Rise");
    }
    if profile.hot_streak_unlocked {
        badges.push("Hot Streak");
    }
    if !profile.rare_badges.is_empty() {
        badges.push("Rare");
    }

    // Set semantics, insertion order preserved.
    let mut seen = HashSet::new();
    badges
        .into_iter()
        .filter(|b| seen.insert(*b))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{LinkItem, Project};
    use chrono::{TimeZone, Utc};

    fn make_profile() -> Profile {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 0, 0, 0).unwrap();
        let mut p = Profile::new(
            "user_a".to_string(),
            "ada".to_string(),
            "Ada".to_string(),
            now,
        );
        // Signup flips this on; most threshold tests want a clean slate.
        p.early_adopter = false;
        p
    }

    #[test]
    fn test_upvote_tiers_are_cumulative() {
        let mut p = make_profile();
        p.upvotes = 200;
        let badges = generate_badges(&mut p);
        assert_eq!(badges, vec!["Bronze", "Silver", "Gold"]);
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let mut p = make_profile();
        p.upvotes = 10;
        p.views = 100;
        p.streak = 3;
        let badges = generate_badges(&mut p);
        assert!(badges.contains(&"Bronze".to_string()));
        assert!(badges.contains(&"Popular".to_string()));
        assert!(badges.contains(&"Consistent".to_string()));
    }

    #[test]
    fn test_below_threshold_earns_nothing() {
        let mut p = make_profile();
        p.upvotes = 9;
        p.views = 99;
        p.streak = 2;
        assert!(generate_badges(&mut p).is_empty());
    }

    #[test]
    fn test_link_master_sets_unlock_flag() {
        let mut p = make_profile();
        for i in 0..5 {
            p.links.push(LinkItem {
                title: format!("link {i}"),
                url: "https://example.com".to_string(),
            });
        }
        assert!(!p.link_master_unlocked);
        let badges = generate_badges(&mut p);
        assert!(badges.contains(&"Link Master".to_string()));
        assert!(p.link_master_unlocked);
    }

    #[test]
    fn test_connected_counts_filled_social_fields() {
        let mut p = make_profile();
        p.social.x = "a".into();
        p.social.github = "b".into();
        p.social.website = "c".into();
        assert!(!generate_badges(&mut p).contains(&"Connected".to_string()));
        p.social.linkedin = "d".into();
        assert!(generate_badges(&mut p).contains(&"Connected".to_string()));
        assert!(p.connected_unlocked);
    }

    #[test]
    fn test_flag_badges() {
        let mut p = make_profile();
        p.first_upvote_received = true;
        p.early_adopter = true;
        p.creative_unlocked = true;
        p.quick_rise_unlocked = true;
        p.hot_streak_unlocked = true;
        p.featured_count = 3;
        p.rare_badges.push("launch-week".to_string());
        let badges = generate_badges(&mut p);
        for expected in [
            "First Blood",
            "Early Adopter",
            "Hall of Famer",
            "Creative",
            "Quick Rise",
            "Hot Streak",
            "Rare",
        ] {
            assert!(badges.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn test_project_tiers() {
        let mut p = make_profile();
        let now = p.created_at;
        for i in 0..10 {
            p.projects.push(Project::new(
                format!("p{i}"),
                String::new(),
                None,
                None,
                now,
            ));
        }
        let badges = generate_badges(&mut p);
        assert!(badges.contains(&"Builder".to_string()));
        assert!(badges.contains(&"Prolific".to_string()));
    }

    #[test]
    fn test_idempotent_with_flags_already_set() {
        let mut p = make_profile();
        p.upvotes = 60;
        p.streak = 8;
        p.social.x = "a".into();
        p.social.github = "b".into();
        p.social.website = "c".into();
        p.social.linkedin = "d".into();
        let first = generate_badges(&mut p);
        let second = generate_badges(&mut p);
        assert_eq!(first, second);
    }

    #[test]
    fn test_output_is_deduplicated() {
        let mut p = make_profile();
        p.upvotes = 10_000;
        p.views = 2_000;
        let badges = generate_badges(&mut p);
        let mut unique = badges.clone();
        unique.dedup();
        assert_eq!(badges.len(), badges.iter().collect::<HashSet<_>>().len());
        assert_eq!(badges, unique);
    }
}
