//! Tessera - static pre-rendering for component-based sites.

#![allow(dead_code)]

mod cli;
mod config;
mod generator;
mod logger;
mod manifest;
mod page;
mod render;
mod route;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log!("error"; "{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config = SiteConfig::load(cli)?;

    match &cli.command {
        Commands::Build { .. } => cli::build::run(&config).await.map(|_| ()),
        Commands::Manifest { stdout, .. } => cli::manifest::run(&config, *stdout),
        Commands::Match { path } => cli::route::run(&config, path),
    }
}
