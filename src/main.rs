// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! rvpaint - inspect, validate, convert and merge review annotations.
//!
//! Works with `openrv-web` JSON annotation exports and RV session files.

mod app;

use anyhow::Result;
use app::{App, ConvertArgs, ImportArgs};
use clap::{Parser, Subcommand};
use rvpaint::EngineConfig;
use std::path::PathBuf;

/// Review annotation tool
#[derive(Parser)]
#[command(name = "rvpaint")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Engine config file (TOML)
    #[arg(long, env = "RVPAINT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print annotation statistics for a JSON export or RV session
    Stats { file: PathBuf },

    /// Check that a JSON export can be imported
    Validate { file: PathBuf },

    /// Convert between JSON exports, YAML and RV sessions (by extension)
    Convert(ConvertArgs),

    /// Apply a JSON export onto an existing export or session
    Import(ImportArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = EngineConfig::load(cli.config.as_deref())?;
    let app = App::new(config);

    match cli.command {
        Commands::Stats { file } => app.stats(&file),
        Commands::Validate { file } => app.validate(&file),
        Commands::Convert(args) => app.convert(&args),
        Commands::Import(args) => app.import(&args),
    }
}
