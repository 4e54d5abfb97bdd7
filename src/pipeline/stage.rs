//! Stage descriptors.

use crate::artifacts::ArtifactSelector;
use crate::error::Result;
use crate::process::ToolCommand;
use std::path::PathBuf;

/// One step of a release pipeline
#[derive(Debug, Clone)]
pub struct Stage {
    /// Short human-readable description
    pub description: String,
    /// Checked before anything else; a violation halts the pipeline
    pub precondition: Option<Precondition>,
    /// Operator confirmation asked before the action
    pub checkpoint: Option<Checkpoint>,
    /// What the stage does
    pub action: Action,
}

impl Stage {
    /// Stage performing `action`
    pub fn new(description: impl Into<String>, action: Action) -> Self {
        Self {
            description: description.into(),
            precondition: None,
            checkpoint: None,
            action,
        }
    }

    /// Stage running a single tool command
    pub fn run(description: impl Into<String>, command: ToolCommand) -> Self {
        Self::new(description, Action::Run(command))
    }

    /// Stage that only asks for confirmation
    pub fn checkpoint(description: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(description, Action::Nothing).confirm(message)
    }

    /// Require `precondition` before running
    pub fn require(mut self, precondition: Precondition) -> Self {
        self.precondition = Some(precondition);
        self
    }

    /// Ask for confirmation with `message` before running
    pub fn confirm(mut self, message: impl Into<String>) -> Self {
        self.checkpoint = Some(Checkpoint {
            message: message.into(),
            artifacts: None,
        });
        self
    }

    /// Ask for confirmation naming the files `selector` matches when asked
    pub fn confirm_artifacts(
        mut self,
        message: impl Into<String>,
        selector: ArtifactSelector,
    ) -> Self {
        self.checkpoint = Some(Checkpoint {
            message: message.into(),
            artifacts: Some(selector),
        });
        self
    }
}

/// Operator confirmation gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    /// Shown before the yes/no choice
    pub message: String,
    /// Files listed under the message
    pub artifacts: Option<ArtifactSelector>,
}

impl Checkpoint {
    /// Prompt text, with the artifact list read at call time
    pub fn render(&self) -> Result<String> {
        let Some(selector) = &self.artifacts else {
            return Ok(self.message.clone());
        };

        let mut text = self.message.clone();
        for file in selector.list()? {
            text.push_str(&format!("\n    {}", file.display()));
        }
        Ok(text)
    }
}

/// Work done by a stage
#[derive(Debug, Clone)]
pub enum Action {
    /// Run an external tool
    Run(ToolCommand),
    /// Show the matching artifacts to the operator
    ListArtifacts(ArtifactSelector),
    /// Delete the matching artifacts
    RemoveArtifacts(ArtifactSelector),
    /// Nothing beyond the checkpoint
    Nothing,
}

/// Condition that must hold before a stage runs
#[derive(Debug, Clone)]
pub enum Precondition {
    /// A directory must exist
    DirExists {
        /// Directory to check
        path: PathBuf,
        /// What the directory is, for the failure message
        what: String,
        /// How to get it
        hint: String,
    },
    /// At least one artifact must match
    HasArtifacts(ArtifactSelector),
}

impl Precondition {
    /// Why the precondition does not hold, or `None` when it does
    pub fn violation(&self) -> Result<Option<String>> {
        match self {
            Precondition::DirExists { path, what, hint } => {
                if path.is_dir() {
                    Ok(None)
                } else {
                    Ok(Some(format!(
                        "{} {} does not exist; {}",
                        what,
                        path.display(),
                        hint
                    )))
                }
            }
            Precondition::HasArtifacts(selector) => {
                if selector.list()?.is_empty() {
                    Ok(Some(format!("no artifacts match {}", selector)))
                } else {
                    Ok(None)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dir_exists_precondition() {
        let temp_dir = TempDir::new().unwrap();
        let present = Precondition::DirExists {
            path: temp_dir.path().to_path_buf(),
            what: "build-output directory".to_string(),
            hint: "run `pra prep <version>` first".to_string(),
        };
        assert_eq!(present.violation().unwrap(), None);

        let missing = Precondition::DirExists {
            path: temp_dir.path().join("dist"),
            what: "build-output directory".to_string(),
            hint: "run `pra prep <version>` first".to_string(),
        };
        let reason = missing.violation().unwrap().unwrap();
        assert!(reason.contains("does not exist"));
        assert!(reason.contains("pra prep"));
    }

    #[test]
    fn test_has_artifacts_precondition() {
        let temp_dir = TempDir::new().unwrap();
        let precondition = Precondition::HasArtifacts(ArtifactSelector::all(temp_dir.path()));
        assert!(precondition.violation().unwrap().is_some());

        std::fs::write(temp_dir.path().join("tox-1.0.tar.gz"), b"").unwrap();
        assert!(precondition.violation().unwrap().is_none());
    }

    #[test]
    fn test_checkpoint_builder() {
        let stage = Stage::checkpoint("Review", "Looks good?");
        assert!(matches!(stage.action, Action::Nothing));
        assert_eq!(
            stage.checkpoint,
            Some(Checkpoint {
                message: "Looks good?".to_string(),
                artifacts: None,
            })
        );
    }

    #[test]
    fn test_checkpoint_lists_artifacts_when_rendered() {
        let temp_dir = TempDir::new().unwrap();
        let stage = Stage::new("Upload", Action::Nothing)
            .confirm_artifacts("Upload these?", ArtifactSelector::all(temp_dir.path()));
        let checkpoint = stage.checkpoint.unwrap();
        assert_eq!(checkpoint.render().unwrap(), "Upload these?");

        std::fs::write(temp_dir.path().join("tox-1.0.tar.gz"), b"").unwrap();
        let text = checkpoint.render().unwrap();
        assert!(text.starts_with("Upload these?\n"));
        assert!(text.contains("tox-1.0.tar.gz"));
    }
}
