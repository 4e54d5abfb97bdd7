//! External tool invocation.
//!
//! Every release step is a sequence of external commands. Commands are
//! described by [`ToolCommand`] and executed through the [`ToolRunner`] trait,
//! so the pipeline can run against the real system or a recording double.

mod command;
mod recording;
mod system;

pub use command::{ToolArg, ToolCommand, ToolOutput};
pub use recording::{RecordedCall, RecordingRunner};
pub use system::SystemRunner;

use crate::error::Result;
use std::future::Future;

/// Executes external tool commands
pub trait ToolRunner {
    /// Run a command to completion.
    ///
    /// A non-zero exit is reported through [`ToolOutput::code`], not as an
    /// error. Errors mean the command could not be run at all.
    fn run(&self, command: &ToolCommand) -> impl Future<Output = Result<ToolOutput>>;
}
