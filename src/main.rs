//! Collator - splices compiled assets into one bundle with a combined source map.

#![allow(dead_code)]

mod build;
mod cli;
mod config;
mod crawler;
mod logger;
mod minify;
mod splice;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::CollatorConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    if let Commands::Lookup { map, position } = &cli.command {
        return cli::lookup::run(map, position);
    }

    let config = CollatorConfig::load(&cli)?;
    match &cli.command {
        Commands::Splice { script, map, .. } => {
            cli::splice::run(&config, script.as_deref(), map.as_deref())
        }
        Commands::Build { .. } => cli::build::build_bundle(&config),
        Commands::Lookup { .. } => Ok(()),
    }
}
