use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(version, about = "One-shot data preparation utilities for the crimes dataset", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Both utilities resolve their fixed file layout from the working
/// directory, so neither subcommand takes arguments.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Split the combined crime timestamp into separate date and time columns, in place
    Transform,
    /// Export the cached schema tables to TSV files in a fresh temporary directory
    ExportSchema,
}
