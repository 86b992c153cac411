use std::ops::Mul;

use crate::quantity::{energy::KilowattHours, money::Kronor};

quantity!(
    /// Price of one kilowatt-hour in [öre][1], one hundredth of a krona.
    ///
    /// [1]: https://en.wikipedia.org/wiki/%C3%96re
    OrePerKilowattHour, suffix: "öre/kWh", precision: 2
);

impl OrePerKilowattHour {
    pub fn from_kronor_per_kilowatt_hour(kronor: f64) -> Self {
        Self(kronor * 100.0)
    }
}

impl Mul<KilowattHours> for OrePerKilowattHour {
    type Output = Kronor;

    fn mul(self, energy: KilowattHours) -> Self::Output {
        Kronor(self.0 * energy.0 / 100.0)
    }
}

impl Mul<OrePerKilowattHour> for KilowattHours {
    type Output = Kronor;

    fn mul(self, price: OrePerKilowattHour) -> Self::Output {
        price * self
    }
}
