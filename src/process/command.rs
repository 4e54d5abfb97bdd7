//! Tool command descriptors and outcomes.

use crate::artifacts::ArtifactSelector;
use crate::error::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One argument of a tool command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolArg {
    /// Passed through unchanged
    Literal(String),
    /// Expanded to the matching build artifacts when the command runs
    Artifacts(ArtifactSelector),
}

impl fmt::Display for ToolArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolArg::Literal(arg) => f.write_str(arg),
            ToolArg::Artifacts(selector) => write!(f, "{}", selector),
        }
    }
}

/// Description of an external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<ToolArg>,
    cwd: Option<PathBuf>,
    capture: bool,
    read_only: bool,
}

impl ToolCommand {
    /// Command running `program`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            capture: false,
            read_only: false,
        }
    }

    /// Append a literal argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(ToolArg::Literal(arg.into()));
        self
    }

    /// Append literal arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args
            .extend(args.into_iter().map(|arg| ToolArg::Literal(arg.into())));
        self
    }

    /// Append the artifacts matched by `selector` at run time
    pub fn artifacts(mut self, selector: ArtifactSelector) -> Self {
        self.args.push(ToolArg::Artifacts(selector));
        self
    }

    /// Run inside `dir`
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Capture stdout instead of passing it to the terminal
    pub fn capture_output(mut self) -> Self {
        self.capture = true;
        self
    }

    /// Mark the command as free of side effects (still runs in dry-run mode)
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Program name
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Working directory, if set
    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Whether stdout is captured
    pub fn captures_output(&self) -> bool {
        self.capture
    }

    /// Whether the command is free of side effects
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Arguments with artifact selectors expanded to absolute file paths.
    ///
    /// The paths stay valid whatever working directory the tool runs in.
    pub fn resolve_args(&self) -> Result<Vec<String>> {
        let mut resolved = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            match arg {
                ToolArg::Literal(arg) => resolved.push(arg.clone()),
                ToolArg::Artifacts(selector) => {
                    for path in selector.list()? {
                        let path = std::path::absolute(&path)?;
                        resolved.push(path.to_string_lossy().into_owned());
                    }
                }
            }
        }
        Ok(resolved)
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Outcome of a finished tool command
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    /// Exit code, `None` if terminated by a signal
    pub code: Option<i32>,
    /// Captured stdout (empty unless the command captures output)
    pub stdout: String,
    /// Captured stderr (empty unless the command captures output)
    pub stderr: String,
    /// Wall-clock run time
    pub elapsed: Duration,
}

impl ToolOutput {
    /// Whether the tool exited with status 0
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_display_joins_program_and_args() {
        let command = ToolCommand::new("git").args(["commit", "-m", "release preparation for 1.0"]);
        assert_eq!(command.to_string(), "git commit -m release preparation for 1.0");
        assert!(!command.is_read_only());
    }

    #[test]
    fn test_artifacts_expand_at_resolve_time() {
        let temp_dir = TempDir::new().unwrap();
        let selector = ArtifactSelector::all(temp_dir.path());
        let command = ToolCommand::new("devpi").arg("upload").artifacts(selector);

        assert_eq!(command.resolve_args().unwrap(), vec!["upload".to_string()]);

        fs::write(temp_dir.path().join("tox-1.0.tar.gz"), b"sdist").unwrap();
        let args = command.resolve_args().unwrap();
        assert_eq!(args.len(), 2);
        assert!(args[1].ends_with("tox-1.0.tar.gz"));
    }

    #[test]
    fn test_artifact_paths_are_absolute() {
        let temp_dir = TempDir::new_in(".").unwrap();
        assert!(temp_dir.path().is_relative());
        fs::write(temp_dir.path().join("tox-1.0.tar.gz"), b"sdist").unwrap();

        let command = ToolCommand::new("twine")
            .arg("upload")
            .artifacts(ArtifactSelector::all(temp_dir.path()))
            .current_dir("/");
        let args = command.resolve_args().unwrap();

        let artifact = Path::new(&args[1]);
        assert!(artifact.is_absolute());
        assert!(Path::new("/").join(artifact).exists());
    }
}
