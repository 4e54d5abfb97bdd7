//! Tool runner backed by real processes.

use super::{ToolCommand, ToolOutput, ToolRunner};
use crate::error::{Result, ToolError};
use std::process::Stdio;
use std::time::Instant;

/// Runs commands as child processes, one at a time.
///
/// Output of non-capturing commands goes straight to the operator's terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a system runner
    pub fn new() -> Self {
        Self
    }
}

impl ToolRunner for SystemRunner {
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        let program = which::which(command.program()).map_err(|e| ToolError::NotFound {
            program: command.program().to_string(),
            reason: e.to_string(),
        })?;
        let args = command.resolve_args()?;

        let mut process = tokio::process::Command::new(&program);
        process.args(&args).stdin(Stdio::inherit());
        if let Some(dir) = command.cwd() {
            process.current_dir(dir);
        }

        log::debug!("Running {} ({})", command, program.display());
        let started = Instant::now();

        let spawn_failed = |e: std::io::Error| ToolError::SpawnFailed {
            command: command.to_string(),
            reason: e.to_string(),
        };

        let output = if command.captures_output() {
            let output = process.output().await.map_err(spawn_failed)?;
            ToolOutput {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                elapsed: started.elapsed(),
            }
        } else {
            let status = process.status().await.map_err(spawn_failed)?;
            ToolOutput {
                code: status.code(),
                elapsed: started.elapsed(),
                ..ToolOutput::default()
            }
        };

        if !output.stderr.is_empty() {
            log::debug!("{} stderr: {}", command.program(), output.stderr.trim_end());
        }
        log::debug!(
            "{} finished in {:.2?} with code {:?}",
            command.program(),
            output.elapsed,
            output.code
        );

        Ok(output)
    }
}
