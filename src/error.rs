//! Error types for release pipeline operations.
//!
//! Every failure is fatal for the current invocation. The variants exist so the
//! CLI can tell the operator which kind of failure happened and what to try next.

use thiserror::Error;

/// Result type alias for release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Version resolution errors
    #[error("Version error: {0}")]
    Version(#[from] VersionError),

    /// External tool errors
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// A stage precondition did not hold
    #[error("Precondition failed for '{stage}': {reason}")]
    PreconditionFailed {
        /// Stage description
        stage: String,
        /// Reason for the error
        reason: String,
    },

    /// Operator answered "no" at a checkpoint
    #[error("Aborted by operator at '{stage}'")]
    Aborted {
        /// Stage description
        stage: String,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid artifact glob pattern
    #[error("Pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },
}

/// Version resolution errors
#[derive(Error, Debug)]
pub enum VersionError {
    /// Version string cannot be used as a release tag
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion {
        /// Version string
        version: String,
        /// Reason for the error
        reason: String,
    },

    /// No tag reachable from HEAD
    #[error("No release tag found: {reason}")]
    NoTags {
        /// Reason for the error
        reason: String,
    },
}

/// External tool errors
#[derive(Error, Debug)]
pub enum ToolError {
    /// Tool is not on PATH
    #[error("'{program}' not found on PATH: {reason}")]
    NotFound {
        /// Program name
        program: String,
        /// Reason for the error
        reason: String,
    },

    /// Tool could not be started
    #[error("Failed to start '{command}': {reason}")]
    SpawnFailed {
        /// Command line
        command: String,
        /// Reason for the error
        reason: String,
    },

    /// Tool exited unsuccessfully
    #[error("'{command}' exited with {}", exit_description(.code))]
    Failed {
        /// Command line
        command: String,
        /// Exit code, `None` if killed by a signal
        code: Option<i32>,
    },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Version(VersionError::NoTags { .. }) => vec![
                "Run `pra prep <version>` to create the release tag".to_string(),
                "Or pass the version explicitly with --release-version".to_string(),
            ],
            ReleaseError::Tool(ToolError::NotFound { program, .. }) => vec![
                format!("Install '{}' or add it to PATH", program),
                "Activate the virtualenv that holds the release tooling".to_string(),
            ],
            ReleaseError::Tool(ToolError::Failed { .. }) => vec![
                "Check the tool output above for details".to_string(),
                "Steps already applied (staged files, tags, uploads) are not undone".to_string(),
            ],
            ReleaseError::PreconditionFailed { .. } => {
                vec!["Satisfy the precondition and rerun the same command".to_string()]
            }
            ReleaseError::Aborted { .. } => Vec::new(),
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// True when the operator declined a checkpoint
    pub fn is_operator_abort(&self) -> bool {
        matches!(self, ReleaseError::Aborted { .. })
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_failure_message() {
        let err = ReleaseError::from(ToolError::Failed {
            command: "git tag 1.2.3".to_string(),
            code: Some(128),
        });
        assert_eq!(err.to_string(), "Tool error: 'git tag 1.2.3' exited with status 128");

        let killed = ToolError::Failed {
            command: "twine upload".to_string(),
            code: None,
        };
        assert!(killed.to_string().ends_with("exited with a signal"));
    }

    #[test]
    fn test_abort_has_no_suggestions() {
        let err = ReleaseError::Aborted {
            stage: "Build distributions".to_string(),
        };
        assert!(err.is_operator_abort());
        assert!(err.recovery_suggestions().is_empty());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_missing_tool_suggests_install() {
        let err = ReleaseError::from(ToolError::NotFound {
            program: "towncrier".to_string(),
            reason: "cannot find binary path".to_string(),
        });
        let suggestions = err.recovery_suggestions();
        assert!(suggestions[0].contains("towncrier"));
    }
}
