//! CLI module for recordcheck
//!
//! Provides command-line interface for:
//! - check: Resolve stdin documents against a named type
//! - schemas: List the loaded types

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    check, check_document, check_stream, run, run_command, schemas, summarize, CheckSummary,
    TypeSummary,
};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_documents, write_error, write_response};
