use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};

use crate::dates::yesterday_of;
use crate::gamification::scoring::{normalize, score};
use crate::models::leaderboard::{LeaderboardEntry, Window};
use crate::models::profile::Profile;

/// Profiles created within this many hours qualify as newcomers.
const NEWCOMER_AGE_HOURS: i64 = 168;

/// Ranks a profile set for one window.
///
/// Candidates are filtered per window, scored, min-max normalized, then
/// stable-sorted descending so that ties keep their original relative order.
/// Ranks are dense and 1-based. Entries carry the raw score; the normalized
/// value exists only to order the set.
pub fn build_leaderboard(
    profiles: &[Profile],
    window: Window,
    now: DateTime<Utc>,
) -> Vec<LeaderboardEntry> {
    let today = now.date_naive();

    let filtered: Vec<&Profile> = match window {
        Window::Today => profiles
            .iter()
            .filter(|p| p.views_on(today) > 0 || p.upvotes_on(today) > 0)
            .collect(),
        Window::Yesterday => {
            let yesterday = yesterday_of(today);
            profiles
                .iter()
                .filter(|p| p.views_on(yesterday) > 0 || p.upvotes_on(yesterday) > 0)
                .collect()
        }
        Window::Newcomers => {
            let mut recent: Vec<&Profile> = profiles
                .iter()
                .filter(|p| now - p.created_at < Duration::hours(NEWCOMER_AGE_HOURS))
                .collect();
            recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            recent
        }
        Window::AllTime => profiles.iter().collect(),
    };

    if filtered.is_empty() {
        return Vec::new();
    }

    let raw: Vec<u64> = filtered.iter().map(|p| score(p, window, today)).collect();
    let normalized = normalize(&raw.iter().map(|s| *s as f64).collect::<Vec<_>>());

    let mut indexed: Vec<usize> = (0..filtered.len()).collect();
    indexed.sort_by(|a, b| {
        normalized[*b]
            .partial_cmp(&normalized[*a])
            .unwrap_or(Ordering::Equal)
    });

    indexed
        .into_iter()
        .enumerate()
        .map(|(i, idx)| {
            let p = filtered[idx];
            LeaderboardEntry {
                user_id: p.id.clone(),
                username: p.username.clone(),
                display_name: p.display_name.clone(),
                avatar: p.avatar.clone(),
                rank: i as u32 + 1,
                score: raw[idx],
                views: p.views,
                upvotes: p.upvotes,
                streak: p.streak,
                badges: p.badges.clone(),
                project_count: p.projects.len(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::DailyCount;
    use chrono::TimeZone;

    fn make_profile(id: &str, now: DateTime<Utc>) -> Profile {
        Profile::new(id.to_string(), id.to_string(), id.to_string(), now)
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_all_time_orders_by_raw_score() {
        let now = fixed_now();
        // A: 10 upvotes -> 400; B: 20 views -> 600. B must rank above A.
        let mut a = make_profile("user_a", now);
        a.upvotes = 10;
        let mut b = make_profile("user_b", now);
        b.views = 20;

        let board = build_leaderboard(&[a, b], Window::AllTime, now);
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].user_id, "user_b");
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].score, 600);
        assert_eq!(board[1].user_id, "user_a");
        assert_eq!(board[1].rank, 2);
        assert_eq!(board[1].score, 400);
    }

    #[test]
    fn test_today_filters_out_inactive_profiles() {
        let now = fixed_now();
        let mut active = make_profile("user_a", now);
        active.daily_views.push(DailyCount {
            date: now.date_naive(),
            count: 1,
        });
        let mut idle = make_profile("user_b", now);
        idle.views = 1000; // cumulative activity only

        let board = build_leaderboard(&[active, idle], Window::Today, now);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].user_id, "user_a");
    }

    #[test]
    fn test_today_with_no_daily_activity_is_empty() {
        let now = fixed_now();
        let mut p = make_profile("user_a", now);
        p.views = 50;
        p.upvotes = 50;
        assert!(build_leaderboard(&[p], Window::Today, now).is_empty());
    }

    #[test]
    fn test_yesterday_filter_uses_previous_date() {
        let now = fixed_now();
        let mut p = make_profile("user_a", now);
        p.daily_upvotes.push(DailyCount {
            date: "2026-08-06".parse().unwrap(),
            count: 2,
        });
        let board = build_leaderboard(std::slice::from_ref(&p), Window::Yesterday, now);
        assert_eq!(board.len(), 1);
        assert!(build_leaderboard(&[p], Window::Today, now).is_empty());
    }

    #[test]
    fn test_newcomers_excludes_old_profiles() {
        let now = fixed_now();
        let fresh = make_profile("user_new", now - Duration::days(2));
        let old = make_profile("user_old", now - Duration::days(10));
        let board = build_leaderboard(&[old, fresh], Window::Newcomers, now);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].user_id, "user_new");
    }

    #[test]
    fn test_newcomer_ties_break_by_recency() {
        let now = fixed_now();
        // Equal scores everywhere: normalization yields 0.5 for both, so the
        // stable sort keeps the recency-descending pre-order.
        let older = make_profile("user_older", now - Duration::days(3));
        let newer = make_profile("user_newer", now - Duration::days(1));
        let board = build_leaderboard(&[older, newer], Window::Newcomers, now);
        assert_eq!(board[0].user_id, "user_newer");
        assert_eq!(board[1].user_id, "user_older");
    }

    #[test]
    fn test_ranks_are_dense_and_one_based() {
        let now = fixed_now();
        let profiles: Vec<Profile> = (0..4)
            .map(|i| {
                let mut p = make_profile(&format!("user_{i}"), now);
                p.upvotes = 5; // all tie
                p
            })
            .collect();
        let board = build_leaderboard(&profiles, Window::AllTime, now);
        let ranks: Vec<u32> = board.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_input_is_empty_not_error() {
        assert!(build_leaderboard(&[], Window::AllTime, fixed_now()).is_empty());
    }

    #[test]
    fn test_entries_carry_display_fields() {
        let now = fixed_now();
        let mut p = make_profile("user_a", now);
        p.upvotes = 1;
        p.badges = vec!["Bronze".to_string()];
        let board = build_leaderboard(&[p], Window::AllTime, now);
        assert_eq!(board[0].username, "user_a");
        assert_eq!(board[0].badges, vec!["Bronze".to_string()]);
        assert_eq!(board[0].project_count, 0);
    }
}
