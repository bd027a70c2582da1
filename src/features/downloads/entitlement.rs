use chrono::{DateTime, Duration, Utc};

/// Whether a purchase still grants download access at `now`.
///
/// The window closes at exactly `purchased_at + limit_days`, inclusive. A
/// missing or zero limit means the purchase never expires.
pub fn within_download_window(
    purchased_at: DateTime<Utc>,
    limit_days: Option<i32>,
    now: DateTime<Utc>,
) -> bool {
    match limit_days {
        Some(days) if days > 0 => now <= purchased_at + Duration::days(days as i64),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn inside_window() {
        let purchased = at(2024, 1, 1, 0);
        assert!(within_download_window(purchased, Some(7), at(2024, 1, 5, 12)));
    }

    #[test]
    fn boundary_is_inclusive() {
        let purchased = at(2024, 1, 1, 0);
        // exactly 7 days later
        assert!(within_download_window(purchased, Some(7), at(2024, 1, 8, 0)));
    }

    #[test]
    fn one_second_past_boundary_is_expired() {
        let purchased = at(2024, 1, 1, 0);
        let just_past = at(2024, 1, 8, 0) + Duration::seconds(1);
        assert!(!within_download_window(purchased, Some(7), just_past));
    }

    #[test]
    fn no_limit_never_expires() {
        let purchased = at(2020, 1, 1, 0);
        assert!(within_download_window(purchased, None, at(2030, 1, 1, 0)));
    }

    #[test]
    fn zero_limit_means_unbounded() {
        let purchased = at(2020, 1, 1, 0);
        assert!(within_download_window(purchased, Some(0), at(2030, 1, 1, 0)));
    }

    #[test]
    fn negative_limit_treated_as_unbounded() {
        let purchased = at(2020, 1, 1, 0);
        assert!(within_download_window(purchased, Some(-3), at(2030, 1, 1, 0)));
    }
}
