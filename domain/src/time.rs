use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

pub const NANOS_PER_HOUR: u64 = 3_600 * 1_000_000_000;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    pub fn as_nanos(self) -> u64 {
        self.0
    }

    pub fn plus_hours(self, hours: u64) -> Self {
        Self(self.0.saturating_add(hours.saturating_mul(NANOS_PER_HOUR)))
    }

    pub fn plus_nanos(self, nanos: u64) -> Self {
        Self(self.0.saturating_add(nanos))
    }

    pub fn is_past(self, now: Timestamp) -> bool {
        self.0 <= now.0
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}ns", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_convert_to_nanoseconds() {
        let start = Timestamp::from_nanos(5);
        assert_eq!(start.plus_hours(24).as_nanos(), 5 + 24 * NANOS_PER_HOUR);
    }

    #[test]
    fn hour_addition_saturates() {
        assert_eq!(Timestamp(u64::MAX).plus_hours(1), Timestamp(u64::MAX));
    }

    #[test]
    fn expiry_is_inclusive() {
        let now = Timestamp::from_nanos(100);
        assert!(Timestamp::from_nanos(99).is_past(now));
        assert!(Timestamp::from_nanos(100).is_past(now));
        assert!(!Timestamp::from_nanos(101).is_past(now));
    }
}
