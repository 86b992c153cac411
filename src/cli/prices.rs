use std::path::Path;

use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;
use clap::Parser;

use crate::{
    api::{PriceSource, Upcoming, elprisetjustnu},
    cache::Cache,
    cli::GlobalArgs,
    config::{Config, Region},
    core::spot::{Resolution, normalize},
    prelude::*,
};

#[derive(Parser)]
pub struct PricesArgs {
    /// Bidding zone, overrides the configured one.
    #[clap(long, env = "ELPRIS_REGION")]
    pub region: Option<Region>,

    /// Fetch the prices even when the cached ones are still fresh.
    #[clap(long)]
    pub refresh: bool,

    #[clap(long, value_enum, default_value = "hourly", env = "ELPRIS_RESOLUTION")]
    pub resolution: Resolution,
}

impl PricesArgs {
    /// Normalized spot prices of today and tomorrow, from the cache or the API.
    ///
    /// Missing days are returned as failures next to the prices, so the prices may be empty.
    #[instrument(skip_all)]
    pub async fn load(
        &self,
        global: &GlobalArgs,
        config: &Config,
        now: DateTime<Tz>,
    ) -> Result<Upcoming> {
        let region = self.region.unwrap_or(config.region);
        let source = elprisetjustnu::Api::new(global.price_api_url.clone(), region)?;
        let mut upcoming = CachedSource::builder()
            .source(&source)
            .cache_path(&global.cache_path)
            .region(region)
            .ttl(config.cache_ttl())
            .refresh(self.refresh)
            .build()
            .load(now)
            .await;
        upcoming.spot_prices = normalize(upcoming.spot_prices, self.resolution);
        Ok(upcoming)
    }
}

/// Price source behind the file cache.
#[derive(bon::Builder)]
struct CachedSource<'a, S> {
    source: &'a S,
    cache_path: &'a Path,
    region: Region,
    ttl: TimeDelta,

    /// Ignore the cached prices even when they are fresh.
    #[builder(default)]
    refresh: bool,
}

impl<S: PriceSource> CachedSource<'_, S> {
    /// Reuse the cached prices while they are fresh, otherwise fetch and cache the non-empty result.
    async fn load(&self, now: DateTime<Tz>) -> Upcoming {
        if !self.refresh
            && let Some(cache) = Cache::read_from(self.cache_path)
            && cache.is_fresh(self.region, now.fixed_offset(), self.ttl)
        {
            info!(fetched_at = %cache.fetched_at, len = cache.spot_prices.len(), "using the cached prices");
            return Upcoming { spot_prices: cache.spot_prices, failures: Vec::new() };
        }

        let upcoming = self.source.get_upcoming_spot_prices(now.date_naive()).await;
        if upcoming.spot_prices.is_empty() {
            warn!(n_failures = upcoming.failures.len(), "no spot prices available");
        } else {
            let spot_prices = upcoming.spot_prices.clone();
            Cache { fetched_at: now.fixed_offset(), region: self.region, spot_prices }
                .write_to(self.cache_path);
        }
        upcoming
    }
}

/// One line per day that could not be fetched.
pub fn print_failures(upcoming: &Upcoming) {
    for (on, error) in &upcoming.failures {
        println!("No prices for {on}: {error}.");
    }
}
