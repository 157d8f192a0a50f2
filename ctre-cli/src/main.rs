//! CTRE CLI - Command line tool for Connecticut real-estate sales data.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "ctre-cli",
    version,
    about = "Connecticut real-estate sales toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: ctre_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    ctre_cmd::run(cli.command).await
}
