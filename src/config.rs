use std::path::PathBuf;

use clap::Parser;

/// Where to buy a house? Explore US counties by price and climate.
#[derive(Debug, Clone, Parser)]
#[command(name = "county-explorer", version, about)]
pub struct Config {
    /// County table (.csv, .json or .parquet).
    #[arg(long, env = "COUNTY_RECORDS", default_value = "data/counties.parquet")]
    pub records: PathBuf,

    /// County outlines as a GeoJSON FeatureCollection.
    #[arg(long, env = "COUNTY_BOUNDARIES", default_value = "data/counties.geojson")]
    pub boundaries: PathBuf,

    /// Load the data, evaluate the default thresholds, print a summary and exit.
    #[arg(long)]
    pub headless: bool,
}

impl Config {
    /// Parse the command line, after pulling variables from `.env` if present.
    pub fn from_env_and_args() -> Self {
        dotenvy::dotenv().ok();
        Config::parse()
    }
}
