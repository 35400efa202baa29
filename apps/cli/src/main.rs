//! minutegen CLI — meeting-minutes site generator.
//!
//! Harvests a working group's published minutes and renders the meeting
//! index and resolutions digest pages from HTML templates.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
