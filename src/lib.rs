pub mod cli;
pub mod error;
pub mod export;
pub mod io_utils;
pub mod locate;
pub mod swap;
pub mod transform;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("crimes_prep", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let root = env::current_dir().context("Resolving working directory")?;
    match cli.command {
        Commands::Transform => transform::execute(&root),
        Commands::ExportSchema => export::execute(&root),
    }
}
