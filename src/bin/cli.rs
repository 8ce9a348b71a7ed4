// src/bin/cli.rs
use clap::Parser;

use trend_scrape::{cli, log};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = cli::Args::parse();
    let _guard = log::init(&log::LogConfig { verbose: args.verbose, ..Default::default() });
    cli::run(args)
}
