use chrono::NaiveDate;

use crate::dates::yesterday_of;
use crate::models::leaderboard::Window;
use crate::models::profile::Profile;

const UPVOTE_WEIGHT: u64 = 40;
const VIEW_WEIGHT: u64 = 30;
const STREAK_WEIGHT: u64 = 20;
const PROJECT_WEIGHT: u64 = 10;

/// Raw engagement score for one window.
///
/// `today`/`yesterday` read views/upvotes from the daily series for the
/// matching calendar date (0 when absent); `all-time`/`newcomers` use the
/// cumulative counters. Streak and project count are always the current
/// values — they describe ongoing standing, not a single day's activity.
pub fn score(profile: &Profile, window: Window, today: NaiveDate) -> u64 {
    let (views, upvotes) = match window {
        Window::Today => (profile.views_on(today), profile.upvotes_on(today)),
        Window::Yesterday => {
            let yesterday = yesterday_of(today);
            (profile.views_on(yesterday), profile.upvotes_on(yesterday))
        }
        Window::AllTime | Window::Newcomers => (profile.views, profile.upvotes),
    };

    upvotes * UPVOTE_WEIGHT
        + views * VIEW_WEIGHT
        + profile.streak as u64 * STREAK_WEIGHT
        + profile.projects.len() as u64 * PROJECT_WEIGHT
}

/// Min-max rescale into [0, 1]. An all-equal vector maps to 0.5 everywhere:
/// ties that differ only by floating noise must not produce a spurious order.
pub fn normalize(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range == 0.0 {
        return scores.iter().map(|_| 0.5).collect();
    }
    scores.iter().map(|s| (s - min) / range).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{DailyCount, Project};
    use chrono::{TimeZone, Utc};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn make_profile(id: &str) -> Profile {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 0, 0, 0).unwrap();
        Profile::new(id.to_string(), id.to_string(), id.to_string(), now)
    }

    #[test]
    fn test_all_time_score_uses_cumulative_counters() {
        let mut p = make_profile("user_a");
        p.upvotes = 10;
        p.views = 20;
        p.streak = 3;
        p.projects.push(Project::new(
            "x".into(),
            "y".into(),
            None,
            None,
            p.created_at,
        ));
        // 10*40 + 20*30 + 3*20 + 1*10
        assert_eq!(score(&p, Window::AllTime, date("2026-08-07")), 1070);
    }

    #[test]
    fn test_today_score_reads_daily_series() {
        let mut p = make_profile("user_a");
        p.views = 500; // cumulative must not leak into the windowed score
        p.daily_views.push(DailyCount {
            date: date("2026-08-07"),
            count: 2,
        });
        p.daily_upvotes.push(DailyCount {
            date: date("2026-08-06"),
            count: 1,
        });
        assert_eq!(score(&p, Window::Today, date("2026-08-07")), 60);
        assert_eq!(score(&p, Window::Yesterday, date("2026-08-07")), 40);
    }

    #[test]
    fn test_windowed_score_keeps_current_streak_and_projects() {
        let mut p = make_profile("user_a");
        p.streak = 5;
        assert_eq!(score(&p, Window::Today, date("2026-08-07")), 100);
    }

    #[test]
    fn test_score_zero_when_no_activity() {
        let p = make_profile("user_a");
        assert_eq!(score(&p, Window::Today, date("2026-08-07")), 0);
        assert_eq!(score(&p, Window::AllTime, date("2026-08-07")), 0);
    }

    #[test]
    fn test_normalize_spans_zero_to_one() {
        let out = normalize(&[400.0, 600.0, 500.0]);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[1], 1.0);
        assert_eq!(out[2], 0.5);
    }

    #[test]
    fn test_normalize_all_equal_is_half() {
        let out = normalize(&[7.0, 7.0, 7.0]);
        assert!(out.iter().all(|v| *v == 0.5));
        assert_eq!(normalize(&[0.0]), vec![0.5]);
    }

    #[test]
    fn test_normalize_empty_is_empty() {
        assert!(normalize(&[]).is_empty());
    }
}
