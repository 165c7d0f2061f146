use std::path::PathBuf;

use clap::Parser;

/// Startup configuration. Log verbosity comes from `RUST_LOG`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "patient-lens",
    version,
    about = "Explore one patient's PMS and GIS markers against the population"
)]
pub struct Config {
    /// Patient table (.csv, .json or .parquet)
    #[arg(value_name = "DATA", default_value = "JSONfinal_df.csv")]
    pub data: PathBuf,

    /// Patient selected on startup (defaults to the first row)
    #[arg(long)]
    pub patient: Option<String>,
}
