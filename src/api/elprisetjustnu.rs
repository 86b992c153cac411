//! [Elpriset just nu](https://www.elprisetjustnu.se/elpris-api) day-ahead price client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_with::{VecSkipError, serde_as};

use crate::{
    api::{FetchError, PriceSource},
    config::Region,
    core::{interval::Interval, spot::SpotPrice},
    prelude::*,
    quantity::price::OrePerKilowattHour,
};

pub const DEFAULT_BASE_URL: &str = "https://www.elprisetjustnu.se/api/v1/prices";

pub struct Api {
    client: reqwest::Client,
    base_url: Url,
    region: Region,
}

impl Api {
    pub fn new(base_url: Url, region: Region) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(Duration::from_secs(5)).build()?;
        Ok(Self { client, base_url, region })
    }

    /// For example, `…/prices/2025/10-20_SE3.json`.
    fn url(&self, on: NaiveDate) -> String {
        format!(
            "{}/{}/{:02}-{:02}_{}.json",
            self.base_url.as_str().trim_end_matches('/'),
            on.year(),
            on.month(),
            on.day(),
            self.region,
        )
    }
}

#[async_trait]
impl PriceSource for Api {
    #[instrument(skip_all, fields(on = %on, region = %self.region))]
    async fn get_spot_prices(&self, on: NaiveDate) -> Result<Vec<SpotPrice>, FetchError> {
        let url = self.url(on);
        debug!(%url, "fetching…");
        let response = self.client.get(url).send().await.map_err(FetchError::Unreachable)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::NotPublished);
        }
        let body = response
            .error_for_status()
            .map_err(FetchError::Unreachable)?
            .text()
            .await
            .map_err(FetchError::Unreachable)?;
        parse_spot_prices(&body).map_err(FetchError::Malformed)
    }
}

/// Parse the response body, skipping the individual records that cannot be read.
fn parse_spot_prices(body: &str) -> Result<Vec<SpotPrice>, serde_json::Error> {
    let Records(records) = serde_json::from_str(body)?;
    Ok(records
        .into_iter()
        .map(|record| {
            SpotPrice::new(
                Interval::new(record.time_start, record.time_end),
                OrePerKilowattHour::from_kronor_per_kilowatt_hour(record.sek_per_kwh),
            )
        })
        .filter(|spot_price| {
            let is_valid = spot_price.is_valid();
            if !is_valid {
                warn!(?spot_price, "skipping an invalid record");
            }
            is_valid
        })
        .collect())
}

#[serde_as]
#[derive(Deserialize)]
#[serde(transparent)]
struct Records(#[serde_as(as = "VecSkipError<_>")] Vec<Record>);

#[derive(Deserialize)]
struct Record {
    #[serde(rename = "SEK_per_kWh")]
    sek_per_kwh: f64,

    time_start: DateTime<FixedOffset>,
    time_end: DateTime<FixedOffset>,
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{Local, Timelike};

    use super::*;

    #[test]
    fn test_url() -> Result {
        let api = Api::new(Url::parse(DEFAULT_BASE_URL)?, Region::Se3)?;
        assert_eq!(
            api.url(NaiveDate::from_ymd_opt(2025, 1, 7).unwrap()),
            "https://www.elprisetjustnu.se/api/v1/prices/2025/01-07_SE3.json",
        );
        Ok(())
    }

    #[test]
    fn test_parse_ok() -> Result {
        // language=json
        let body = r#"[
            {
                "SEK_per_kWh": 0.25678,
                "EUR_per_kWh": 0.02347,
                "EXR": 10.941,
                "time_start": "2025-10-20T00:00:00+02:00",
                "time_end": "2025-10-20T00:15:00+02:00"
            },
            {
                "SEK_per_kWh": -0.01234,
                "EUR_per_kWh": -0.00113,
                "EXR": 10.941,
                "time_start": "2025-10-20T00:15:00+02:00",
                "time_end": "2025-10-20T00:30:00+02:00"
            }
        ]"#;
        let spot_prices = parse_spot_prices(body)?;
        assert_eq!(spot_prices.len(), 2);
        assert_abs_diff_eq!(spot_prices[0].price.0, 25.678, epsilon = 1e-9);
        assert_abs_diff_eq!(spot_prices[1].price.0, -1.234, epsilon = 1e-9);
        assert_eq!(spot_prices[1].interval.start.to_rfc3339(), "2025-10-20T00:15:00+02:00");
        Ok(())
    }

    #[test]
    fn test_parse_skips_malformed_records() -> Result {
        // language=json
        let body = r#"[
            { "SEK_per_kWh": "n/a", "time_start": "2025-10-20T00:00:00+02:00", "time_end": "2025-10-20T01:00:00+02:00" },
            { "SEK_per_kWh": 1.0, "time_start": "yesterday", "time_end": "2025-10-20T02:00:00+02:00" },
            { "SEK_per_kWh": 1.0, "time_start": "2025-10-20T03:00:00+02:00", "time_end": "2025-10-20T03:00:00+02:00" },
            { "SEK_per_kWh": 1.5, "time_start": "2025-10-20T02:00:00+02:00", "time_end": "2025-10-20T03:00:00+02:00" }
        ]"#;
        let spot_prices = parse_spot_prices(body)?;
        assert_eq!(spot_prices.len(), 1);
        assert_abs_diff_eq!(spot_prices[0].price.0, 150.0);
        Ok(())
    }

    #[test]
    fn test_parse_empty() -> Result {
        assert!(parse_spot_prices("[]")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_not_an_array() {
        assert!(parse_spot_prices(r#"{"message": "Not found"}"#).is_err());
        assert!(parse_spot_prices("<html></html>").is_err());
    }

    #[tokio::test]
    #[ignore = "makes the API request"]
    async fn test_get_spot_prices_ok() -> Result {
        let api = Api::new(Url::parse(DEFAULT_BASE_URL)?, Region::Se3)?;
        let spot_prices = api.get_spot_prices(Local::now().date_naive()).await?;
        assert!(!spot_prices.is_empty());
        assert!(spot_prices.len() <= 25 * 4);
        assert_eq!(spot_prices[0].interval.start.hour(), 0);
        assert!(spot_prices.is_sorted_by_key(|spot_price| spot_price.interval.start));
        Ok(())
    }
}
