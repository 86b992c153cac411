use chrono::{DateTime, Datelike, TimeZone, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::{prelude::*, quantity::price::OrePerKilowattHour};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, derive_more::Display)]
pub enum Classification {
    #[display("cheap")]
    Cheap,

    #[display("caution")]
    Caution,

    #[display("expensive")]
    Expensive,
}

/// Total price boundaries.
///
/// Both boundaries belong to [`Classification::Caution`]: a price equal to `expensive_above`
/// is not yet expensive, and a price equal to `cheap_below` is no longer cheap.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Thresholds {
    pub cheap_below: OrePerKilowattHour,
    pub expensive_above: OrePerKilowattHour,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { cheap_below: OrePerKilowattHour(100.0), expensive_above: OrePerKilowattHour(200.0) }
    }
}

impl Thresholds {
    pub fn classify(self, total_price: OrePerKilowattHour) -> Classification {
        if total_price < self.cheap_below {
            Classification::Cheap
        } else if total_price > self.expensive_above {
            Classification::Expensive
        } else {
            Classification::Caution
        }
    }

    pub fn validate(self) -> Result {
        ensure!(
            self.cheap_below.is_finite() && self.expensive_above.is_finite(),
            "thresholds must be finite numbers",
        );
        ensure!(
            self.cheap_below <= self.expensive_above,
            "`cheap_below` ({}) must not exceed `expensive_above` ({})",
            self.cheap_below,
            self.expensive_above,
        );
        Ok(())
    }
}

/// Hours when the household risks setting a new monthly demand peak.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DangerWindow {
    #[serde(default = "DangerWindow::default_days")]
    pub days: Vec<Weekday>,

    /// Inclusive.
    pub start_hour: u32,

    /// Exclusive.
    pub end_hour: u32,
}

impl Default for DangerWindow {
    fn default() -> Self {
        Self { days: Self::default_days(), start_hour: 7, end_hour: 20 }
    }
}

impl DangerWindow {
    fn default_days() -> Vec<Weekday> {
        vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri]
    }

    /// Check the local weekday and clock hour of the timestamp.
    #[must_use]
    pub fn contains<Tz: TimeZone>(&self, timestamp: &DateTime<Tz>) -> bool {
        self.days.contains(&timestamp.weekday())
            && (self.start_hour..self.end_hour).contains(&timestamp.hour())
    }

    pub fn validate(&self) -> Result {
        ensure!(self.end_hour <= 24, "`end_hour` must be within 0..=24, got {}", self.end_hour);
        ensure!(
            self.start_hour < self.end_hour,
            "`start_hour` ({}) must be before `end_hour` ({})",
            self.start_hour,
            self.end_hour,
        );
        Ok(())
    }
}
