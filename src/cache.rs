use std::{fs, path::Path};

use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::{config::Region, core::spot::SpotPrice, prelude::*};

/// Last successful fetch of the spot prices.
#[derive(Serialize, Deserialize)]
pub struct Cache {
    pub fetched_at: DateTime<FixedOffset>,
    pub region: Region,

    #[serde(default)]
    pub spot_prices: Vec<SpotPrice>,
}

impl Cache {
    /// Read the cache, treating any failure as a cache miss.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_from(path: &Path) -> Option<Self> {
        Self::read_fallibly_from(path).unwrap_or_else(|error| {
            warn!("failed to read the cache: {error:#}");
            None
        })
    }

    fn read_fallibly_from(path: &Path) -> Result<Option<Self>> {
        if path.is_file() { Ok(Some(toml::from_str(&fs::read_to_string(path)?)?)) } else { Ok(None) }
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn write_to(&self, path: &Path) {
        if let Err(error) = self.write_fallibly_to(path) {
            warn!("failed to write the cache: {error:#}");
        }
    }

    fn write_fallibly_to(&self, path: &Path) -> Result {
        fs::write(path, toml::to_string(self)?)?;
        debug!(len = self.spot_prices.len(), "written");
        Ok(())
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn clear(path: &Path) -> Result {
        if path.is_file() {
            fs::remove_file(path)
                .with_context(|| format!("failed to remove the cache at `{}`", path.display()))?;
            info!("cleared");
        } else {
            info!("nothing to clear");
        }
        Ok(())
    }

    /// Whether the cached prices may be used in place of a new fetch.
    #[must_use]
    pub fn is_fresh(&self, region: Region, now: DateTime<FixedOffset>, ttl: TimeDelta) -> bool {
        let age = now - self.fetched_at;
        self.region == region && age >= TimeDelta::zero() && age < ttl
    }
}
