//! CLI argument definitions using clap
//!
//! Commands:
//! - recordcheck check --config <path> --type <Name>
//! - recordcheck schemas --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// recordcheck - validate JSON documents against declared record types
#[derive(Parser, Debug)]
#[command(name = "recordcheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate one JSON document per stdin line against a type
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./recordcheck.json")]
        config: PathBuf,

        /// Name of the type to resolve documents into
        #[arg(long = "type")]
        type_name: String,
    },

    /// List the loaded types and their fields
    Schemas {
        /// Path to configuration file
        #[arg(long, default_value = "./recordcheck.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
