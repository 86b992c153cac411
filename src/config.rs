use std::{collections::BTreeMap, fs, path::Path};

use chrono::TimeDelta;
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, de::Error as _};
use serde_with::{DisplayFromStr, serde_as};

use crate::{
    core::{appliance::Appliance, bill::Usage, tariff::Tariff},
    prelude::*,
};

/// Swedish bidding zone.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    clap::ValueEnum,
    serde::Serialize,
    serde::Deserialize,
    derive_more::Display,
)]
pub enum Region {
    /// Luleå.
    #[serde(rename = "SE1")]
    #[display("SE1")]
    #[value(name = "SE1")]
    Se1,

    /// Sundsvall.
    #[serde(rename = "SE2")]
    #[display("SE2")]
    #[value(name = "SE2")]
    Se2,

    /// Stockholm.
    #[serde(rename = "SE3")]
    #[display("SE3")]
    #[value(name = "SE3")]
    Se3,

    /// Malmö.
    #[serde(rename = "SE4")]
    #[display("SE4")]
    #[value(name = "SE4")]
    Se4,
}

#[serde_as]
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub region: Region,

    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "Config::default_timezone")]
    pub timezone: Tz,

    #[serde(default = "Config::default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u32,

    pub households: BTreeMap<String, Household>,

    #[serde(default)]
    pub appliances: BTreeMap<String, Appliance>,
}

/// Tariff keys and the optional `usage` share the household table.
pub struct Household {
    pub tariff: Tariff,

    /// Typical monthly usage for the invoice predictor.
    pub usage: Option<Usage>,
}

impl<'de> Deserialize<'de> for Household {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Split `usage` off so that the tariff still rejects unknown keys.
        let mut table = toml::Table::deserialize(deserializer)?;
        let usage = table
            .remove("usage")
            .map(toml::Value::try_into::<Usage>)
            .transpose()
            .map_err(|error| D::Error::custom(format!("`usage`: {error}")))?;
        let tariff = toml::Value::Table(table).try_into::<Tariff>().map_err(D::Error::custom)?;
        Ok(Self { tariff, usage })
    }
}

impl Config {
    const fn default_timezone() -> Tz {
        chrono_tz::Europe::Stockholm
    }

    const fn default_cache_ttl_minutes() -> u32 {
        60
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read the configuration from `{}`", path.display()))?;
        let config = Self::parse(&contents)
            .with_context(|| format!("invalid configuration in `{}`", path.display()))?;
        info!(region = %config.region, timezone = %config.timezone, n_households = config.households.len(), "loaded");
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result {
        ensure!(!self.households.is_empty(), "at least one household must be configured");
        for (name, household) in &self.households {
            household.tariff.validate().with_context(|| format!("household `{name}`"))?;
        }
        for (name, appliance) in &self.appliances {
            appliance.validate().with_context(|| format!("appliance `{name}`"))?;
        }
        Ok(())
    }

    #[must_use]
    pub fn cache_ttl(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.cache_ttl_minutes))
    }

    /// Select the household by name, or the only one when no name is given.
    pub fn household(&self, name: Option<&str>) -> Result<(&str, &Household)> {
        if let Some(name) = name {
            return self
                .households
                .get_key_value(name)
                .map(|(name, household)| (name.as_str(), household))
                .with_context(|| format!("unknown household `{name}`"));
        }
        match self.households.iter().next() {
            Some((name, household)) if self.households.len() == 1 => Ok((name.as_str(), household)),
            _ => bail!(
                "several households are configured, select one of: {}",
                self.households.keys().map(String::as_str).collect::<Vec<_>>().join(", "),
            ),
        }
    }

    pub fn appliance(&self, name: &str) -> Result<Appliance> {
        self.appliances.get(name).copied().with_context(|| format!("unknown appliance `{name}`"))
    }
}
