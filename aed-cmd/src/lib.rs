//! Command implementations for the AED CLI.
//!
//! Provides subcommands for fetching atmospheric gas and per-capita
//! energy series, with range filtering, smoothing and CSV export.

use clap::{Args, Subcommand};

pub mod query;

/// Filter and smoothing parameters shared by both queries.
#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Start of the date range (YYYY-MM-DD, inclusive)
    #[arg(long, default_value = "2000-01-01")]
    pub start: String,

    /// End of the date range (YYYY-MM-DD, inclusive).
    /// Defaults to today, capped at 2025-12-31.
    #[arg(long)]
    pub end: Option<String>,

    /// Trailing moving-average window in samples (0 disables smoothing)
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(0..=24))]
    pub window: u32,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch the atmospheric gas series (CO₂, O₂, CH₄, N₂O) and export CSV
    GasQuery {
        /// Output path for the combined gas series CSV
        #[arg(short = 'o', long)]
        output_csv: String,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Fetch the per-capita energy series (World, Korea) and export CSV
    EnergyQuery {
        /// Output path for the combined energy series CSV
        #[arg(short = 'o', long)]
        output_csv: String,

        #[command(flatten)]
        view: ViewArgs,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::GasQuery { output_csv, view } => {
            query::run_query(aed_sources::source::gas_sources(), &output_csv, &view).await
        }
        Command::EnergyQuery { output_csv, view } => {
            query::run_query(aed_sources::source::energy_sources(), &output_csv, &view).await
        }
    }
}
