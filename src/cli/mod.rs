//! Command line interface for pra.
//!
//! Parses arguments, builds the release configuration once and hands the
//! selected command to the dispatcher. Every failure becomes exit code 1.

mod args;
pub mod commands;
mod output;

pub use args::{Args, Command, RuntimeConfig, Settings};
pub use commands::execute_command;
pub use output::OutputManager;

use crate::error::Result;
use std::ffi::OsString;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    run_from(std::env::args_os()).await
}

/// Run with an explicit argument list (first item is the binary name)
pub async fn run_from<I, T>(args: I) -> Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match <Args as clap::Parser>::try_parse_from(args) {
        Ok(args) => args,
        Err(e) => {
            // Help and version requests exit cleanly; everything else is a usage error.
            let code = if e.exit_code() == 0 { 0 } else { 1 };
            let _ = e.print();
            return Ok(code);
        }
    };
    execute_command(args).await
}
