use anyhow::Result;
use clap::Parser;

use marquee::cli;
use marquee::logger::initialize_logger;

#[tokio::main]
async fn main() -> Result<()> {
    initialize_logger()?;

    let cli = cli::Cli::parse();
    cli::run_cli_command(cli).await?;

    Ok(())
}
