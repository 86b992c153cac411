mod cost;
mod estimate;
mod prices;
mod show;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::Url;

use crate::{
    api::elprisetjustnu,
    cache::Cache,
    cli::{cost::CostArgs, estimate::EstimateArgs, show::ShowArgs},
    config::Config,
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub async fn run(self) -> Result {
        match self.command {
            Command::Show(args) => args.run(&self.global, &self.global.read_config()?).await,
            Command::Cost(args) => args.run(&self.global, &self.global.read_config()?).await,
            Command::Estimate(args) => args.run(&self.global, &self.global.read_config()?).await,
            Command::ClearCache => Cache::clear(&self.global.cache_path),
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: fetch the prices and show the upcoming hours.
    #[clap(name = "show")]
    Show(Box<ShowArgs>),

    /// Cost of running an appliance right now.
    #[clap(name = "cost")]
    Cost(Box<CostArgs>),

    /// Predict the monthly invoice.
    #[clap(name = "estimate")]
    Estimate(Box<EstimateArgs>),

    /// Forget the cached prices.
    #[clap(name = "clear-cache")]
    ClearCache,
}

#[derive(Parser)]
pub struct GlobalArgs {
    /// Household tariffs and appliance presets.
    #[clap(long = "config", env = "ELPRIS_CONFIG", default_value = "elpris.toml", global = true)]
    pub config_path: PathBuf,

    /// Where the fetched prices are cached between runs.
    #[clap(long = "cache-path", env = "ELPRIS_CACHE", default_value = ".elpris-cache.toml", global = true)]
    pub cache_path: PathBuf,

    /// Day-ahead price API base URL.
    #[clap(
        long = "price-api-url",
        env = "ELPRIS_PRICE_API_URL",
        default_value = elprisetjustnu::DEFAULT_BASE_URL,
        global = true
    )]
    pub price_api_url: Url,
}

impl GlobalArgs {
    fn read_config(&self) -> Result<Config> {
        Config::read_from(&self.config_path)
    }
}
