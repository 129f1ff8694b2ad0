//! Check request reference numbers.
//!
//! A reference looks like `CR-2026-483920`: prefix, the four-digit year of
//! generation, and the last six digits of the generation time in
//! milliseconds. A generator never hands out the same millisecond twice; if
//! two documents are generated within one millisecond the second one is
//! stamped one millisecond later.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Datelike, TimeZone, Utc};

/// Hands out reference numbers.
#[derive(Debug)]
pub struct ReferenceGenerator {
    prefix: String,
    last_millis: AtomicI64,
}

/// A reference number and the instant it encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub id: String,
    pub issued_at: DateTime<Utc>,
}

impl ReferenceGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            last_millis: AtomicI64::new(i64::MIN),
        }
    }

    /// Issue a reference for a document generated at `now`.
    pub fn next(&self, now: DateTime<Utc>) -> Reference {
        let wanted = now.timestamp_millis();
        let mut previous = self.last_millis.load(Ordering::Relaxed);
        let issued = loop {
            let candidate = if wanted > previous { wanted } else { previous + 1 };
            match self.last_millis.compare_exchange_weak(
                previous,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break candidate,
                Err(actual) => previous = actual,
            }
        };

        let issued_at = Utc.timestamp_millis_opt(issued).single().unwrap_or(now);
        Reference {
            id: format_reference(&self.prefix, issued_at),
            issued_at,
        }
    }
}

/// `<prefix>-<yyyy>-<last six digits of the epoch milliseconds>`.
pub fn format_reference(prefix: &str, at: DateTime<Utc>) -> String {
    let millis = at.timestamp_millis().rem_euclid(1_000_000);
    format!("{}-{:04}-{:06}", prefix, at.year(), millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).single().unwrap()
    }

    #[test]
    fn test_format() {
        // 2026-10-18T12:00:00.123Z
        let t = at(1_792_324_800_123);
        assert_eq!(format_reference("CR", t), "CR-2026-800123");
    }

    #[test]
    fn test_suffix_is_zero_padded() {
        let t = at(1_792_324_000_042);
        assert_eq!(format_reference("CR", t), "CR-2026-000042");
    }

    #[test]
    fn test_same_millisecond_is_bumped() {
        let gen = ReferenceGenerator::new("CR");
        let t = at(1_792_324_800_123);
        let a = gen.next(t);
        let b = gen.next(t);
        assert_eq!(a.id, "CR-2026-800123");
        assert_eq!(b.id, "CR-2026-800124");
        assert!(b.issued_at > a.issued_at);
    }

    #[test]
    fn test_clock_going_backwards_still_increases() {
        let gen = ReferenceGenerator::new("CR");
        let a = gen.next(at(1_792_324_800_500));
        let b = gen.next(at(1_792_324_800_100));
        assert!(b.issued_at > a.issued_at);
    }

    #[test]
    fn test_fresh_generators_agree() {
        let t = at(1_792_324_800_123);
        assert_eq!(
            ReferenceGenerator::new("CR").next(t),
            ReferenceGenerator::new("CR").next(t)
        );
    }
}
