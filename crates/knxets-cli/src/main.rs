mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = cli::Args::parse();
    let config = config::CliConfig::from_args(&args);

    log::info!("Inspecting {}", args.command.archive().display());

    commands::run(&args.command, &config)
}
