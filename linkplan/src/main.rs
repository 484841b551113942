#[cfg(feature = "http")]
mod elevation;
mod features;
mod link;
mod options;
mod plan;

use anyhow::Result;
use clap::Parser;
use options::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::init();
    match cli {
        Cli::Link(link) => link.run(),
        Cli::Plan(plan) => plan.run(),
        #[cfg(feature = "http")]
        Cli::Elevation(elevation) => elevation.run(),
    }
}
