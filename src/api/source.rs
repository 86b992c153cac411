use async_trait::async_trait;
use chrono::{Days, NaiveDate};

use crate::{core::spot::SpotPrice, prelude::*};

/// Why the prices of a day are missing.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The day-ahead auction results are not published yet.
    #[error("prices are not published yet")]
    NotPublished,

    #[error("failed to reach the price source")]
    Unreachable(#[source] reqwest::Error),

    #[error("malformed price data")]
    Malformed(#[source] serde_json::Error),
}

/// Prices of today and tomorrow, along with the days that could not be fetched.
#[must_use]
#[derive(Debug, Default)]
pub struct Upcoming {
    pub spot_prices: Vec<SpotPrice>,
    pub failures: Vec<(NaiveDate, FetchError)>,
}

#[async_trait]
pub trait PriceSource: Sync {
    async fn get_spot_prices(&self, on: NaiveDate) -> Result<Vec<SpotPrice>, FetchError>;

    /// Fetch today and tomorrow and concatenate whatever is available.
    #[instrument(skip_all, fields(today = %today))]
    async fn get_upcoming_spot_prices(&self, today: NaiveDate) -> Upcoming {
        let mut upcoming = Upcoming::default();
        for on in [Some(today), today.checked_add_days(Days::new(1))].into_iter().flatten() {
            match self.get_spot_prices(on).await {
                Ok(spot_prices) => {
                    info!(%on, len = spot_prices.len(), "fetched spot prices");
                    upcoming.spot_prices.extend(spot_prices);
                }
                Err(FetchError::NotPublished) => {
                    info!(%on, "spot prices are not published yet");
                    upcoming.failures.push((on, FetchError::NotPublished));
                }
                Err(error) => {
                    warn!(%on, error = &error as &(dyn std::error::Error + 'static), "failed to fetch spot prices");
                    upcoming.failures.push((on, error));
                }
            }
        }
        upcoming
    }
}
