use chrono::{DateTime, Duration, NaiveDate, Utc};

/// The server's calendar date. Dates are UTC everywhere so that daily series
/// keys, streak ticks, and challenge seeds agree across replicas.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn yesterday_of(day: NaiveDate) -> NaiveDate {
    day - Duration::days(1)
}

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yesterday_crosses_month_boundary() {
        let first: NaiveDate = "2026-08-01".parse().unwrap();
        assert_eq!(yesterday_of(first), "2026-07-31".parse().unwrap());
    }
}
