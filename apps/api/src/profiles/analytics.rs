use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::profile::Profile;

/// Days of history in the daily engagement series.
const DAILY_WINDOW: i64 = 14;

#[derive(Debug, Clone, Serialize)]
pub struct DailyEngagement {
    pub date: NaiveDate,
    pub views: u64,
    pub upvotes: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub project_id: String,
    pub title: String,
    pub views: u64,
    pub upvotes: u64,
    /// Upvotes per hundred views, two decimals.
    pub ctr: f64,
}

/// Per-profile engagement analytics, fully computed from the profile record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_views: u64,
    pub total_upvotes: u64,
    pub weekly_views: u64,
    pub weekly_upvotes: u64,
    pub streak: u32,
    pub badges: Vec<String>,
    pub daily_data: Vec<DailyEngagement>,
    pub project_stats: Vec<ProjectStats>,
    pub engagement_rate: f64,
    pub growth_rate: f64,
    pub best_performing_day: Option<NaiveDate>,
}

/// Builds the analytics report for one profile as of `today`.
pub fn build_report(profile: &Profile, today: NaiveDate) -> AnalyticsReport {
    let week_ago = today - Duration::days(7);
    let two_weeks_ago = today - Duration::days(14);

    let sum_range = |series: &[crate::models::profile::DailyCount],
                     from: NaiveDate,
                     to_exclusive: Option<NaiveDate>| {
        series
            .iter()
            .filter(|d| d.date >= from && to_exclusive.map_or(true, |to| d.date < to))
            .map(|d| d.count)
            .sum::<u64>()
    };

    let weekly_views = sum_range(&profile.daily_views, week_ago, None);
    let weekly_upvotes = sum_range(&profile.daily_upvotes, week_ago, None);
    let prev_week_views = sum_range(&profile.daily_views, two_weeks_ago, Some(week_ago));
    let prev_week_upvotes = sum_range(&profile.daily_upvotes, two_weeks_ago, Some(week_ago));

    let growth = |current: u64, previous: u64| {
        if previous > 0 {
            (current as f64 - previous as f64) / previous as f64 * 100.0
        } else {
            0.0
        }
    };
    let growth_rate = (growth(weekly_views, prev_week_views)
        + growth(weekly_upvotes, prev_week_upvotes))
        / 2.0;

    let daily_data: Vec<DailyEngagement> = (0..DAILY_WINDOW)
        .rev()
        .map(|i| {
            let date = today - Duration::days(i);
            DailyEngagement {
                date,
                views: profile.views_on(date),
                upvotes: profile.upvotes_on(date),
            }
        })
        .collect();

    let best_performing_day = daily_data
        .iter()
        .map(|d| (d.date, d.views + d.upvotes))
        .filter(|(_, total)| *total > 0)
        .max_by_key(|(_, total)| *total)
        .map(|(date, _)| date);

    let rate = |upvotes: u64, views: u64| {
        if views > 0 {
            round2(upvotes as f64 / views as f64 * 100.0)
        } else {
            0.0
        }
    };

    let project_stats = profile
        .projects
        .iter()
        .map(|p| ProjectStats {
            project_id: p.id.clone(),
            title: p.title.clone(),
            views: p.views,
            upvotes: p.upvotes,
            ctr: rate(p.upvotes, p.views),
        })
        .collect();

    AnalyticsReport {
        total_views: profile.views,
        total_upvotes: profile.upvotes,
        weekly_views,
        weekly_upvotes,
        streak: profile.streak,
        badges: profile.badges.clone(),
        daily_data,
        project_stats,
        engagement_rate: rate(profile.upvotes, profile.views),
        growth_rate,
        best_performing_day,
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{DailyCount, Project};
    use chrono::{TimeZone, Utc};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn make_profile() -> Profile {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 0, 0, 0).unwrap();
        Profile::new(
            "user_a".to_string(),
            "ada".to_string(),
            "Ada".to_string(),
            now,
        )
    }

    #[test]
    fn test_weekly_sums_split_at_week_boundary() {
        let mut p = make_profile();
        p.daily_views.push(DailyCount {
            date: date("2026-08-05"),
            count: 10,
        });
        p.daily_views.push(DailyCount {
            date: date("2026-07-28"),
            count: 4,
        });

        let report = build_report(&p, date("2026-08-07"));
        assert_eq!(report.weekly_views, 10);
        // Growth: this week 10 vs last week 4 -> +150% views, upvotes flat.
        assert_eq!(report.growth_rate, 75.0);
    }

    #[test]
    fn test_daily_data_covers_fourteen_days_in_order() {
        let p = make_profile();
        let report = build_report(&p, date("2026-08-07"));
        assert_eq!(report.daily_data.len(), 14);
        assert_eq!(report.daily_data[0].date, date("2026-07-25"));
        assert_eq!(report.daily_data[13].date, date("2026-08-07"));
    }

    #[test]
    fn test_engagement_rate_and_ctr() {
        let mut p = make_profile();
        p.views = 200;
        p.upvotes = 30;
        let mut project = Project::new("Demo".into(), String::new(), None, None, p.created_at);
        project.views = 50;
        project.upvotes = 7;
        p.projects.push(project);

        let report = build_report(&p, date("2026-08-07"));
        assert_eq!(report.engagement_rate, 15.0);
        assert_eq!(report.project_stats[0].ctr, 14.0);
    }

    #[test]
    fn test_zero_views_rates_are_zero() {
        let p = make_profile();
        let report = build_report(&p, date("2026-08-07"));
        assert_eq!(report.engagement_rate, 0.0);
        assert_eq!(report.growth_rate, 0.0);
        assert!(report.best_performing_day.is_none());
    }

    #[test]
    fn test_best_performing_day() {
        let mut p = make_profile();
        p.daily_views.push(DailyCount {
            date: date("2026-08-03"),
            count: 2,
        });
        p.daily_upvotes.push(DailyCount {
            date: date("2026-08-05"),
            count: 5,
        });
        let report = build_report(&p, date("2026-08-07"));
        assert_eq!(report.best_performing_day, Some(date("2026-08-05")));
    }
}
