//! Command execution.
//!
//! Wires the parsed arguments to the system tool runner and the selected
//! confirmation source, runs the command and maps the outcome to an exit code.

mod helpers;
mod status;
mod step;

use crate::ReleaseConfig;
use crate::cli::{Args, Command, RuntimeConfig};
use crate::confirm::{AutoConfirm, TerminalConfirm};
use crate::error::Result;
use crate::process::SystemRunner;

use helpers::report_error;
use status::execute_status;
use step::execute_step;

/// Execute the main command based on parsed arguments
pub async fn execute_command(args: Args) -> Result<i32> {
    if let Err(validation_error) = args.validate() {
        let output = super::OutputManager::new(false, false);
        output.error(&format!("Invalid arguments: {}", validation_error));
        return Ok(1);
    }

    let config = RuntimeConfig::from(&args);
    let release_config = ReleaseConfig::from(&args);
    let runner = SystemRunner::new();

    let result = match &args.command {
        Command::Status { json } => execute_status(&release_config, &runner, &config, *json).await,
        command if args.yes => {
            execute_step(
                command,
                &release_config,
                &runner,
                &AutoConfirm::accept(),
                &config,
                args.dry_run,
            )
            .await
        }
        command => {
            execute_step(
                command,
                &release_config,
                &runner,
                &TerminalConfirm::new(),
                &config,
                args.dry_run,
            )
            .await
        }
    };

    match result {
        Ok(()) => Ok(0),
        Err(e) => {
            report_error(&config, args.command.name(), &e);
            Ok(e.exit_code())
        }
    }
}
