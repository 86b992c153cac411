use serde::{Deserialize, Serialize};

use crate::{
    prelude::*,
    quantity::{money::Kronor, power::Kilowatts, price::OrePerKilowattHour, time::Hours},
};

/// Electrical load that runs for a fixed time, like a sauna session or a dishwasher cycle.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Appliance {
    #[serde(rename = "power_kw")]
    pub power: Kilowatts,

    pub hours: Hours,
}

impl Appliance {
    pub const fn new(power: Kilowatts, hours: Hours) -> Self {
        Self { power, hours }
    }

    /// Cost of running `count` identical units at the price.
    pub fn cost(self, count: u32, total_price: OrePerKilowattHour) -> Kronor {
        self.power * self.hours * f64::from(count) * total_price
    }

    pub fn validate(self) -> Result {
        ensure!(
            self.power.is_finite() && self.power >= Kilowatts::ZERO,
            "power must be a non-negative number",
        );
        ensure!(
            self.hours.is_finite() && self.hours >= Hours::ZERO,
            "duration must be a non-negative number",
        );
        Ok(())
    }
}
