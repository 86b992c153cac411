use chrono::{TimeDelta, Utc};
use clap::Parser;

use crate::{
    cli::{
        GlobalArgs,
        prices::{PricesArgs, print_failures},
    },
    config::Config,
    core::{
        interval::RangeExclusive,
        row::{build_rows, find_current},
    },
    prelude::*,
    tables::build_prices_table,
};

#[derive(Parser)]
pub struct ShowArgs {
    /// Household whose tariff to apply, required when several are configured.
    #[clap(long, env = "ELPRIS_HOUSEHOLD")]
    household: Option<String>,

    /// Number of hours to show after the current one.
    #[clap(long, default_value = "24")]
    hours: u16,

    /// Number of past hours to show before the current one.
    #[clap(long, default_value = "2")]
    history_hours: u16,

    #[clap(flatten)]
    prices: PricesArgs,
}

impl ShowArgs {
    #[instrument(skip_all)]
    pub async fn run(self, global: &GlobalArgs, config: &Config) -> Result {
        let (name, household) = config.household(self.household.as_deref())?;
        let now = Utc::now().with_timezone(&config.timezone);
        let upcoming = self.prices.load(global, config, now).await?;
        print_failures(&upcoming);
        let rows = build_rows(&upcoming.spot_prices, &household.tariff, &config.timezone);
        info!(household = name, len = rows.len(), "priced");

        if rows.is_empty() {
            println!("No prices available.");
        } else if let Some(current) = find_current(&rows, &now) {
            println!(
                "Now: {} ({}), spot {} excl. VAT, grid {}{}",
                current.total_price,
                current.classification,
                current.spot_price,
                household.tariff.grid_price().round_to(2),
                if current.is_peak_risk { ", peak-demand risk" } else { "" },
            );
        } else {
            warn!("no price for the current hour");
        }

        let view = RangeExclusive::new(
            now - TimeDelta::hours(i64::from(self.history_hours)),
            now + TimeDelta::hours(i64::from(self.hours)),
        );
        let visible: Vec<_> = rows
            .into_iter()
            .filter(|row| row.interval.end > view.start && row.interval.start < view.end)
            .collect();
        println!("{}", build_prices_table(&visible, &now));
        Ok(())
    }
}
