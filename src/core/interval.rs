use std::fmt::{Debug, Formatter};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Delivery period as published by the price source.
pub type Interval<Tz = FixedOffset> = RangeExclusive<DateTime<Tz>>;

#[must_use]
#[derive(Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RangeExclusive<T> {
    /// Inclusive.
    pub start: T,

    /// Exclusive.
    pub end: T,
}

impl<T: Debug> Debug for RangeExclusive<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl<T> RangeExclusive<T> {
    pub const fn new(start: T, end: T) -> Self {
        Self { start, end }
    }
}

impl<T: PartialOrd> RangeExclusive<T> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[must_use]
    pub fn contains(&self, other: &T) -> bool {
        (self.start <= *other) && (*other < self.end)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    #[test]
    fn test_contains() {
        let start = DateTime::parse_from_rfc3339("2025-10-20T07:00:00+02:00").unwrap();
        let interval = Interval::new(start, start + TimeDelta::hours(1));
        assert!(interval.contains(&start));
        assert!(interval.contains(&(start + TimeDelta::minutes(59))));
        assert!(!interval.contains(&(start + TimeDelta::hours(1))));
        assert!(!interval.contains(&(start - TimeDelta::seconds(1))));
    }

    #[test]
    fn test_is_empty() {
        let start = DateTime::parse_from_rfc3339("2025-10-20T07:00:00+02:00").unwrap();
        assert!(Interval::new(start, start).is_empty());
        assert!(!Interval::new(start, start + TimeDelta::minutes(15)).is_empty());
    }
}
