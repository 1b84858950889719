//! Schedule calculator.
//!
//! Computes when the next session takes place from an injected "now" and
//! the configured weekday/time. Pure: no clock, no I/O.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use mentorship_core::config::SchedulePolicy;

#[derive(Debug, Clone)]
pub struct ScheduleCalculator {
    policy: SchedulePolicy,
}

impl ScheduleCalculator {
    pub fn new(policy: SchedulePolicy) -> Self {
        Self { policy }
    }

    /// Next occurrence of the target weekday strictly after `now`'s date, at
    /// the target time (UTC).
    ///
    /// When `now` already falls on the target weekday the slot is a week
    /// later, even if the target time has not passed yet.
    pub fn next_session_slot(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive();
        let current = i64::from(today.weekday().num_days_from_monday());
        let target = i64::from(self.policy.target_weekday.num_days_from_monday());

        let mut days_ahead = (target - current).rem_euclid(7);
        if days_ahead == 0 {
            days_ahead = 7;
        }

        let date = today + Duration::days(days_ahead);
        Utc.from_utc_datetime(&date.and_time(self.policy.target_time))
    }

    /// Scheduling-cycle token for registrations happening at `now`.
    ///
    /// Derived from the slot, so every registration that lands in the same
    /// upcoming session shares one allocation per mentor.
    pub fn session_key_for(&self, now: DateTime<Utc>) -> String {
        format!("session_{}", self.next_session_slot(now).format("%Y%m%d_%H%M"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Weekday};

    fn calculator() -> ScheduleCalculator {
        ScheduleCalculator::new(SchedulePolicy::default())
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_from_friday_goes_to_next_wednesday() {
        // 2024-12-06 is a Friday.
        let slot = calculator().next_session_slot(at(2024, 12, 6, 12, 34));
        assert_eq!(slot, at(2024, 12, 11, 14, 0));
        assert_eq!(slot.weekday(), Weekday::Wed);
    }

    #[test]
    fn test_from_monday_same_week() {
        let slot = calculator().next_session_slot(at(2024, 12, 9, 8, 0));
        assert_eq!(slot, at(2024, 12, 11, 14, 0));
    }

    #[test]
    fn test_on_target_weekday_is_seven_days_later() {
        // Before and after the target time on a Wednesday.
        let calc = calculator();
        assert_eq!(calc.next_session_slot(at(2024, 12, 11, 9, 0)), at(2024, 12, 18, 14, 0));
        assert_eq!(calc.next_session_slot(at(2024, 12, 11, 23, 59)), at(2024, 12, 18, 14, 0));
    }

    #[test]
    fn test_is_pure() {
        let calc = calculator();
        let now = at(2025, 2, 27, 17, 45);
        let first = calc.next_session_slot(now);
        for _ in 0..10 {
            assert_eq!(calc.next_session_slot(now), first);
        }
    }

    #[test]
    fn test_crosses_month_and_year() {
        // 2024-12-31 is a Tuesday.
        assert_eq!(
            calculator().next_session_slot(at(2024, 12, 31, 10, 0)),
            at(2025, 1, 1, 14, 0)
        );
    }

    #[test]
    fn test_custom_policy() {
        let calc = ScheduleCalculator::new(SchedulePolicy {
            target_weekday: Weekday::Mon,
            target_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            activation_lead_days: 0,
        });
        // Sunday -> next day.
        assert_eq!(calc.next_session_slot(at(2024, 12, 8, 22, 0)), at(2024, 12, 9, 9, 30));
    }

    #[test]
    fn test_session_key_shared_within_a_week() {
        let calc = calculator();
        let friday = calc.session_key_for(at(2024, 12, 6, 12, 34));
        let tuesday = calc.session_key_for(at(2024, 12, 10, 18, 0));
        assert_eq!(friday, "session_20241211_1400");
        assert_eq!(friday, tuesday);
        assert_ne!(friday, calc.session_key_for(at(2024, 12, 11, 1, 0)));
    }
}
