//! Automatic sign-out of stale visits.
//!
//! There is no background timer. The ledger applies the policy lazily at the
//! start of every operation, so a visit can look open past its deadline until
//! the next call touches the store.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::record::VisitRecord;

/// Hours a visit may stay open before it is closed automatically.
pub const DEFAULT_AUTO_CLOSE_HOURS: u32 = 8;

/// Largest accepted auto-close setting, one year.
pub const MAX_AUTO_CLOSE_HOURS: u32 = 24 * 365;

/// Closes open visits once they have been open for a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoClosePolicy {
    max_open: Duration,
}

impl Default for AutoClosePolicy {
    fn default() -> Self {
        Self::from_hours(DEFAULT_AUTO_CLOSE_HOURS)
    }
}

impl AutoClosePolicy {
    /// Create a policy with the given maximum open duration.
    #[must_use]
    pub fn new(max_open: Duration) -> Self {
        Self { max_open }
    }

    /// Create a policy from a whole number of hours.
    #[must_use]
    pub fn from_hours(hours: u32) -> Self {
        Self::new(Duration::hours(i64::from(hours)))
    }

    /// How long a visit may stay open.
    #[must_use]
    pub fn max_open(&self) -> Duration {
        self.max_open
    }

    /// When an open visit signed in at `sign_in_at` is closed.
    ///
    /// `None` when the deadline falls outside the representable date range;
    /// such a visit is never auto-closed.
    #[must_use]
    pub fn deadline(&self, sign_in_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        sign_in_at.checked_add_signed(self.max_open)
    }

    /// Close every open record whose deadline is at or before `now`.
    ///
    /// The recorded sign-out time is the deadline itself, not `now`, so the
    /// result depends only on the records and the policy. Returns whether any
    /// record changed.
    pub fn apply(&self, records: &mut [VisitRecord], now: DateTime<Utc>) -> bool {
        let mut changed = false;
        for record in records.iter_mut().filter(|r| r.is_open()) {
            let Some(deadline) = self.deadline(record.sign_in_at) else {
                continue;
            };
            if now >= deadline && record.close(deadline, true) {
                info!(
                    "Auto-closed visit {} for {} at {}",
                    record.id,
                    record.full_name(),
                    deadline.to_rfc3339()
                );
                changed = true;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{SignInRequest, VisitReason};
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
    }

    fn record_at(sign_in_at: DateTime<Utc>) -> VisitRecord {
        let request = SignInRequest {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            agency: "Acme".to_string(),
            reason: VisitReason::Meeting,
            other_details: String::new(),
        };
        VisitRecord::new(&request, sign_in_at)
    }

    #[test]
    fn test_default_is_eight_hours() {
        assert_eq!(AutoClosePolicy::default().max_open(), Duration::hours(8));
    }

    #[test]
    fn test_leaves_fresh_records_open() {
        let policy = AutoClosePolicy::default();
        let mut records = vec![record_at(t0())];

        let now = t0() + Duration::hours(8) - Duration::seconds(1);
        assert!(!policy.apply(&mut records, now));
        assert!(records[0].is_open());
    }

    #[test]
    fn test_closes_at_deadline_not_now() {
        let policy = AutoClosePolicy::default();
        let mut records = vec![record_at(t0())];

        let now = t0() + Duration::hours(8) + Duration::seconds(1);
        assert!(policy.apply(&mut records, now));
        assert_eq!(records[0].sign_out_at, Some(t0() + Duration::hours(8)));
        assert!(records[0].auto_signed_out);
    }

    #[test]
    fn test_closes_exactly_at_deadline() {
        let policy = AutoClosePolicy::default();
        let mut records = vec![record_at(t0())];

        assert!(policy.apply(&mut records, t0() + Duration::hours(8)));
        assert!(!records[0].is_open());
    }

    #[test]
    fn test_idempotent_for_same_now() {
        let policy = AutoClosePolicy::default();
        let mut records = vec![
            record_at(t0()),
            record_at(t0() + Duration::hours(3)),
            record_at(t0() + Duration::hours(9)),
        ];
        let now = t0() + Duration::hours(10);

        assert!(policy.apply(&mut records, now));
        let after_once = records.clone();
        assert!(!policy.apply(&mut records, now));
        assert_eq!(records, after_once);
    }

    #[test]
    fn test_does_not_touch_closed_records() {
        let policy = AutoClosePolicy::default();
        let mut record = record_at(t0());
        let explicit = t0() + Duration::hours(1);
        record.close(explicit, false);
        let mut records = vec![record];

        assert!(!policy.apply(&mut records, t0() + Duration::days(2)));
        assert_eq!(records[0].sign_out_at, Some(explicit));
        assert!(!records[0].auto_signed_out);
    }

    #[test]
    fn test_deadline_past_max_date_never_closes() {
        let policy = AutoClosePolicy::default();
        let late = DateTime::<Utc>::MAX_UTC - Duration::hours(1);
        let mut records = vec![record_at(late)];

        assert_eq!(policy.deadline(late), None);
        assert!(!policy.apply(&mut records, DateTime::<Utc>::MAX_UTC));
        assert!(records[0].is_open());
    }

    #[test]
    fn test_huge_duration_does_not_overflow() {
        let policy = AutoClosePolicy::from_hours(u32::MAX);
        let mut records = vec![record_at(t0())];

        assert!(!policy.apply(&mut records, t0() + Duration::days(365)));
        assert!(records[0].is_open());
    }

    #[test]
    fn test_custom_duration() {
        let policy = AutoClosePolicy::from_hours(1);
        let mut records = vec![record_at(t0())];

        assert!(policy.apply(&mut records, t0() + Duration::hours(2)));
        assert_eq!(records[0].sign_out_at, Some(t0() + Duration::hours(1)));
    }
}
