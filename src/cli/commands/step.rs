//! Release step commands: prep, upload, test and release.

use crate::ReleaseConfig;
use crate::cli::{Command, RuntimeConfig};
use crate::confirm::Confirm;
use crate::dispatcher::Dispatcher;
use crate::error::{CliError, Result};
use crate::process::ToolRunner;

/// Execute a release step command
pub(super) async fn execute_step<R: ToolRunner, C: Confirm>(
    command: &Command,
    release_config: &ReleaseConfig,
    runner: &R,
    confirm: &C,
    config: &RuntimeConfig,
    dry_run: bool,
) -> Result<()> {
    let Some(step) = command.step() else {
        return Err(CliError::InvalidArguments {
            reason: format!("'{}' is not a release step", command.name()),
        }
        .into());
    };

    config.verbose_println(&format!(
        "Project root: {}",
        release_config.project_root.display()
    ));

    let report = Dispatcher::new(release_config, runner, confirm, config)
        .dry_run(dry_run)
        .dispatch(step, &command.version_strategy())
        .await?;

    config.success_println(&format!(
        "{} {} finished ({} stage(s))",
        report.step,
        report.version,
        report.completed.len()
    ));
    Ok(())
}
