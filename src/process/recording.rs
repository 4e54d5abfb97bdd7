//! Tool runner that records commands instead of running them.

use super::{ToolCommand, ToolOutput, ToolRunner};
use crate::error::Result;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

/// A command seen by [`RecordingRunner`], with artifacts expanded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Program name
    pub program: String,
    /// Resolved arguments
    pub args: Vec<String>,
    /// Working directory, if set
    pub cwd: Option<PathBuf>,
}

impl RecordedCall {
    /// Program and arguments joined by spaces
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Scripted response for commands starting with a prefix
#[derive(Debug, Clone)]
struct Response {
    prefix: String,
    code: i32,
    stdout: String,
}

/// Records every command and answers with scripted outcomes.
///
/// Commands without a matching response succeed with empty output.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<RecordedCall>>,
    responses: Vec<Response>,
}

impl RecordingRunner {
    /// Runner where every command succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands whose command line starts with `prefix`
    pub fn respond(mut self, prefix: &str, code: i32, stdout: &str) -> Self {
        self.responses.push(Response {
            prefix: prefix.to_string(),
            code,
            stdout: stdout.to_string(),
        });
        self
    }

    /// Commands recorded so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Command lines recorded so far
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(RecordedCall::command_line).collect()
    }
}

impl ToolRunner for RecordingRunner {
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        let call = RecordedCall {
            program: command.program().to_string(),
            args: command.resolve_args()?,
            cwd: command.cwd().map(PathBuf::from),
        };
        let line = call.command_line();
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);

        let output = match self.responses.iter().find(|r| line.starts_with(&r.prefix)) {
            Some(response) => ToolOutput {
                code: Some(response.code),
                stdout: response.stdout.clone(),
                stderr: String::new(),
                elapsed: Duration::ZERO,
            },
            None => ToolOutput {
                code: Some(0),
                ..ToolOutput::default()
            },
        };
        Ok(output)
    }
}
