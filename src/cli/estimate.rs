use chrono::Utc;
use clap::Parser;
use itertools::Itertools;

use crate::{
    cli::{GlobalArgs, prices::PricesArgs},
    config::Config,
    core::{
        bill::{BillEstimate, BillEstimator, Usage},
        spot::mean_price,
    },
    prelude::*,
    quantity::{energy::KilowattHours, money::Kronor, power::Kilowatts, price::OrePerKilowattHour},
    tables::build_bill_table,
};

#[derive(Parser)]
pub struct EstimateArgs {
    /// Households to include, all configured ones by default.
    #[clap(long = "household")]
    households: Vec<String>,

    /// Monthly consumption, overrides the configured usage.
    #[clap(long = "consumption-kwh")]
    consumption: Option<KilowattHours>,

    /// Highest demand of the month, overrides the configured usage.
    #[clap(long = "peak-kw")]
    peak: Option<Kilowatts>,

    /// Average spot price of the month, excluding VAT. Defaults to the mean of the upcoming prices.
    #[clap(long = "average-spot-ore")]
    average_spot_price: Option<OrePerKilowattHour>,

    /// Leave out a fixed fee by name, to see what cancelling it would save.
    #[clap(long = "exclude-fee")]
    excluded_fees: Vec<String>,

    #[clap(flatten)]
    prices: PricesArgs,
}

impl EstimateArgs {
    async fn average_spot_price(
        &self,
        global: &GlobalArgs,
        config: &Config,
    ) -> Result<OrePerKilowattHour> {
        if let Some(average_spot_price) = self.average_spot_price {
            return Ok(average_spot_price);
        }
        let now = Utc::now().with_timezone(&config.timezone);
        let upcoming = self.prices.load(global, config, now).await?;
        mean_price(&upcoming.spot_prices).context("no spot prices available, pass `--average-spot-ore`")
    }

    fn usage(&self, name: &str, configured: Option<Usage>) -> Result<Usage> {
        let consumption = self
            .consumption
            .or_else(|| configured.map(|usage| usage.consumption))
            .with_context(|| format!("no consumption for `{name}`, pass `--consumption-kwh`"))?;
        let peak = self
            .peak
            .or_else(|| configured.map(|usage| usage.peak))
            .with_context(|| format!("no peak demand for `{name}`, pass `--peak-kw`"))?;
        Ok(Usage::builder().consumption(consumption).peak(peak).build())
    }

    /// Estimate the selected households, along with what the excluded fees save in total.
    fn estimate<'c>(
        &self,
        config: &'c Config,
        average_spot_price: OrePerKilowattHour,
    ) -> Result<(Vec<(&'c str, BillEstimate)>, Kronor)> {
        let households: Vec<_> = if self.households.is_empty() {
            config.households.iter().map(|(name, household)| (name.as_str(), household)).collect()
        } else {
            self.households
                .iter()
                .map(|name| config.household(Some(name.as_str())))
                .collect::<Result<_>>()?
        };

        for excluded_fee in &self.excluded_fees {
            ensure!(
                households.iter().any(|(_, household)| household
                    .tariff
                    .fixed_fees
                    .iter()
                    .any(|fee| fee.name == *excluded_fee)),
                "unknown fixed fee `{excluded_fee}`, select one of: {}",
                households
                    .iter()
                    .flat_map(|(_, household)| &household.tariff.fixed_fees)
                    .map(|fee| fee.name.as_str())
                    .unique()
                    .join(", "),
            );
        }

        let mut estimates = Vec::with_capacity(households.len());
        let mut savings = Kronor::ZERO;
        for (name, household) in households {
            let usage = self.usage(name, household.usage)?;
            let estimator = |excluded_fees: &[String]| -> BillEstimate {
                BillEstimator::builder()
                    .tariff(&household.tariff)
                    .usage(usage)
                    .average_spot_price(average_spot_price)
                    .excluded_fees(excluded_fees)
                    .build()
                    .estimate()
            };
            let estimate = estimator(&self.excluded_fees);
            savings += estimator(&Vec::<String>::new()).total() - estimate.total();
            estimates.push((name, estimate));
        }
        Ok((estimates, savings))
    }

    #[instrument(skip_all)]
    pub async fn run(self, global: &GlobalArgs, config: &Config) -> Result {
        let average_spot_price = self.average_spot_price(global, config).await?;
        info!(%average_spot_price, "estimating…");
        let (estimates, savings) = self.estimate(config, average_spot_price)?;

        println!("{}", build_bill_table(&estimates));
        if !self.excluded_fees.is_empty() {
            println!(
                "Leaving out {} saves {} per month.",
                self.excluded_fees.iter().join(", "),
                savings,
            );
        }
        Ok(())
    }
}
