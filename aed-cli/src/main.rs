//! AED CLI - Command line tool for fetching atmospheric gas and
//! per-capita energy consumption series.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "aed-cli",
    version,
    about = "Atmospheric gas & energy consumption data toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: aed_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    aed_cmd::run(cli.command).await
}
