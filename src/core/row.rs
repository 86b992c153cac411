use chrono::DateTime;
use chrono_tz::Tz;

use crate::{
    core::{
        classification::Classification,
        interval::{Interval, RangeExclusive},
        spot::SpotPrice,
        tariff::Tariff,
    },
    quantity::price::OrePerKilowattHour,
};

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HourlyPrice {
    pub interval: Interval<Tz>,
    pub spot_price: OrePerKilowattHour,

    /// Rounded to hundredths of öre.
    pub total_price: OrePerKilowattHour,

    pub classification: Classification,

    /// The hour falls into the peak-demand danger window.
    pub is_peak_risk: bool,
}

impl HourlyPrice {
    pub fn new(spot_price: &SpotPrice, tariff: &Tariff, time_zone: &Tz) -> Self {
        let interval = RangeExclusive::new(
            spot_price.interval.start.with_timezone(time_zone),
            spot_price.interval.end.with_timezone(time_zone),
        );
        let total_price = tariff.total_price(spot_price.price).round_to(2);
        Self {
            is_peak_risk: tariff.danger_window.contains(&interval.start),
            classification: tariff.price_thresholds.classify(total_price),
            interval,
            spot_price: spot_price.price.round_to(2),
            total_price,
        }
    }

    #[must_use]
    pub fn contains(&self, timestamp: &DateTime<Tz>) -> bool {
        self.interval.contains(timestamp)
    }
}

/// Price each of the spot prices, which are expected to be already normalized.
pub fn build_rows(spot_prices: &[SpotPrice], tariff: &Tariff, time_zone: &Tz) -> Vec<HourlyPrice> {
    spot_prices
        .iter()
        .filter(|spot_price| spot_price.is_valid())
        .map(|spot_price| HourlyPrice::new(spot_price, tariff, time_zone))
        .collect()
}

/// Find the row for the timestamp.
pub fn find_current<'a>(rows: &'a [HourlyPrice], now: &DateTime<Tz>) -> Option<&'a HourlyPrice> {
    rows.iter().find(|row| row.contains(now))
}
