use chrono::{DurationRound, TimeDelta};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{core::interval::Interval, prelude::*, quantity::price::OrePerKilowattHour};

/// Day-ahead spot price of a single delivery period, excluding VAT.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotPrice {
    pub interval: Interval,
    pub price: OrePerKilowattHour,
}

impl SpotPrice {
    pub const fn new(interval: Interval, price: OrePerKilowattHour) -> Self {
        Self { interval, price }
    }

    /// Whether the record can be priced at all.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.interval.is_empty() && self.price.is_finite()
    }
}

/// Delivery period granularity of the rendered rows.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum Resolution {
    /// Keep the periods as published (15 minutes since the day-ahead market switched).
    Native,

    /// Average the published periods within each clock hour.
    #[default]
    Hourly,
}

/// Sort, drop unusable records and duplicates, and optionally resample to hourly means.
#[must_use]
pub fn normalize(spot_prices: impl IntoIterator<Item = SpotPrice>, resolution: Resolution) -> Vec<SpotPrice> {
    let spot_prices = spot_prices
        .into_iter()
        .filter(|spot_price| {
            let is_valid = spot_price.is_valid();
            if !is_valid {
                warn!(?spot_price, "skipping an unusable record");
            }
            is_valid
        })
        .sorted_by_key(|spot_price| spot_price.interval.start)
        .dedup_by(|lhs, rhs| lhs.interval.start == rhs.interval.start)
        .collect_vec();
    match resolution {
        Resolution::Native => spot_prices,
        Resolution::Hourly => resample_hourly(&spot_prices),
    }
}

fn resample_hourly(spot_prices: &[SpotPrice]) -> Vec<SpotPrice> {
    spot_prices
        .iter()
        .chunk_by(|spot_price| {
            spot_price.interval.start.duration_trunc(TimeDelta::hours(1)).unwrap_or(spot_price.interval.start)
        })
        .into_iter()
        .filter_map(|(hour, group)| {
            let group = group.copied().collect_vec();
            let end = group.iter().map(|spot_price| spot_price.interval.end).max()?;
            Some(SpotPrice::new(Interval::new(hour, end), mean_price(&group)?))
        })
        .collect()
}

/// Unweighted mean of the prices, or `None` when there are none.
#[must_use]
pub fn mean_price(spot_prices: &[SpotPrice]) -> Option<OrePerKilowattHour> {
    if spot_prices.is_empty() {
        return None;
    }
    #[expect(clippy::cast_precision_loss)]
    let len = spot_prices.len() as f64;
    Some(spot_prices.iter().map(|spot_price| spot_price.price).sum::<OrePerKilowattHour>() / len)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{DateTime, FixedOffset};

    use super::*;

    fn quarter(start: &str, price: f64) -> SpotPrice {
        let start: DateTime<FixedOffset> = DateTime::parse_from_rfc3339(start).unwrap();
        SpotPrice::new(Interval::new(start, start + TimeDelta::minutes(15)), OrePerKilowattHour(price))
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize(Vec::new(), Resolution::Hourly).is_empty());
    }

    #[test]
    fn test_normalize_sorts_and_dedups() {
        let spot_prices = vec![
            quarter("2025-10-20T00:15:00+02:00", 2.0),
            quarter("2025-10-20T00:00:00+02:00", 1.0),
            quarter("2025-10-20T00:15:00+02:00", 2.0),
        ];
        let normalized = normalize(spot_prices, Resolution::Native);
        assert_eq!(normalized.len(), 2);
        assert_abs_diff_eq!(normalized[0].price.0, 1.0);
        assert_abs_diff_eq!(normalized[1].price.0, 2.0);
    }

    #[test]
    fn test_normalize_skips_unusable() {
        let mut empty = quarter("2025-10-20T00:00:00+02:00", 1.0);
        empty.interval.end = empty.interval.start;
        let not_finite = quarter("2025-10-20T00:15:00+02:00", f64::NAN);
        let fine = quarter("2025-10-20T00:30:00+02:00", 3.0);
        let normalized = normalize(vec![empty, not_finite, fine], Resolution::Native);
        assert_eq!(normalized, vec![fine]);
    }

    #[test]
    fn test_resample_hourly() {
        let spot_prices = vec![
            quarter("2025-10-20T00:00:00+02:00", 10.0),
            quarter("2025-10-20T00:15:00+02:00", 20.0),
            quarter("2025-10-20T00:30:00+02:00", -10.0),
            quarter("2025-10-20T00:45:00+02:00", 40.0),
            quarter("2025-10-20T01:00:00+02:00", 5.0),
        ];
        let hourly = normalize(spot_prices, Resolution::Hourly);
        assert_eq!(hourly.len(), 2);
        assert_eq!(hourly[0].interval.start.to_rfc3339(), "2025-10-20T00:00:00+02:00");
        assert_eq!(hourly[0].interval.end.to_rfc3339(), "2025-10-20T01:00:00+02:00");
        assert_abs_diff_eq!(hourly[0].price.0, 15.0);
        assert_abs_diff_eq!(hourly[1].price.0, 5.0);
        assert_eq!(hourly[1].interval.end.to_rfc3339(), "2025-10-20T01:15:00+02:00");
    }

    #[test]
    fn test_mean_price() {
        assert!(mean_price(&[]).is_none());
        let spot_prices =
            [quarter("2025-10-20T00:00:00+02:00", 10.0), quarter("2025-10-20T00:15:00+02:00", -4.0)];
        assert_abs_diff_eq!(mean_price(&spot_prices).unwrap().0, 3.0);
    }
}
