use chrono::Utc;
use clap::Parser;

use crate::{
    cli::{
        GlobalArgs,
        prices::{PricesArgs, print_failures},
    },
    config::Config,
    core::{
        appliance::Appliance,
        row::{build_rows, find_current},
    },
    prelude::*,
    quantity::{power::Kilowatts, time::Hours},
};

#[derive(Parser)]
pub struct CostArgs {
    /// Household whose tariff to apply, required when several are configured.
    #[clap(long, env = "ELPRIS_HOUSEHOLD")]
    household: Option<String>,

    /// Appliance preset from the configuration.
    #[clap(long, conflicts_with_all = ["power", "hours"])]
    appliance: Option<String>,

    /// Power draw in kilowatts, instead of a preset.
    #[clap(long = "power-kw", requires = "hours")]
    power: Option<Kilowatts>,

    /// Running time in hours, instead of a preset.
    #[clap(long, requires = "power")]
    hours: Option<Hours>,

    /// Number of identical units running at the same time, like panel heaters.
    #[clap(long, default_value = "1")]
    count: u32,

    #[clap(flatten)]
    prices: PricesArgs,
}

impl CostArgs {
    fn appliance(&self, config: &Config) -> Result<Appliance> {
        match (&self.appliance, self.power, self.hours) {
            (Some(name), _, _) => config.appliance(name),
            (None, Some(power), Some(hours)) => {
                let appliance = Appliance::new(power, hours);
                appliance.validate()?;
                Ok(appliance)
            }
            _ => bail!("pass either `--appliance` or both `--power-kw` and `--hours`"),
        }
    }

    #[instrument(skip_all)]
    pub async fn run(self, global: &GlobalArgs, config: &Config) -> Result {
        let appliance = self.appliance(config)?;
        let (_, household) = config.household(self.household.as_deref())?;
        let now = Utc::now().with_timezone(&config.timezone);
        let upcoming = self.prices.load(global, config, now).await?;
        let rows = build_rows(&upcoming.spot_prices, &household.tariff, &config.timezone);

        let Some(current) = find_current(&rows, &now) else {
            print_failures(&upcoming);
            println!("No price for the current hour.");
            return Ok(());
        };
        let cost = appliance.cost(self.count, current.total_price);
        info!(?appliance, count = self.count, price = %current.total_price, %cost, "estimated");
        println!(
            "Running now: {cost} ({} × {} for {} at {})",
            self.count, appliance.power, appliance.hours, current.total_price,
        );
        Ok(())
    }
}
