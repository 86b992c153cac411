use serde::{Deserialize, Serialize};

use crate::{
    core::tariff::Tariff,
    quantity::{
        energy::KilowattHours,
        money::{Kronor, KronorPerKilowatt},
        power::Kilowatts,
        price::OrePerKilowattHour,
    },
};

/// Monthly surcharge for the highest recorded demand.
pub fn estimate_peak_fee(peak: Kilowatts, fee_per_kilowatt: KronorPerKilowatt) -> Kronor {
    peak * fee_per_kilowatt
}

/// Expected monthly consumption of a household.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(deny_unknown_fields)]
pub struct Usage {
    #[serde(rename = "consumption_kwh")]
    pub consumption: KilowattHours,

    #[serde(rename = "peak_kw")]
    pub peak: Kilowatts,
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BillEstimate {
    /// Retailer side: consumed energy at the average electricity price.
    pub energy: Kronor,

    /// Transfer fee and energy tax on the consumed energy.
    pub grid: Kronor,

    /// Monthly subscription fees.
    pub fixed: Kronor,

    /// Peak-demand surcharge.
    pub peak: Kronor,
}

impl BillEstimate {
    pub fn total(self) -> Kronor {
        self.energy + self.grid + self.fixed + self.peak
    }
}

#[derive(bon::Builder)]
pub struct BillEstimator<'a> {
    tariff: &'a Tariff,
    usage: Usage,

    /// Average spot price over the month, without VAT.
    average_spot_price: OrePerKilowattHour,

    /// Names of the fixed fees to leave out, for example a cancellable retailer service.
    #[builder(default)]
    excluded_fees: &'a [String],
}

impl BillEstimator<'_> {
    pub fn estimate(&self) -> BillEstimate {
        BillEstimate {
            energy: self.usage.consumption * self.tariff.electricity_price(self.average_spot_price),
            grid: self.usage.consumption * self.tariff.grid_price(),
            fixed: self.tariff.fixed_fees_total(self.excluded_fees),
            peak: self
                .tariff
                .peak_fee
                .map_or(Kronor::ZERO, |fee| estimate_peak_fee(self.usage.peak, fee)),
        }
    }
}
