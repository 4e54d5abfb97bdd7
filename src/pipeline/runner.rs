//! Generic stage runner.
//!
//! Stages run strictly in order. Each one checks its precondition, asks its
//! checkpoint and only then performs its action. The first stage that does not
//! complete halts the run; nothing already done is undone.

use super::stage::{Action, Stage};
use crate::cli::RuntimeConfig;
use crate::confirm::Confirm;
use crate::error::{ReleaseError, Result, ToolError};
use crate::process::ToolRunner;

/// Result of a single stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The action ran and succeeded
    Completed,
    /// The precondition did not hold; the checkpoint was not asked
    PreconditionFailed {
        /// Why it did not hold
        reason: String,
    },
    /// The operator answered "no"
    Rejected,
    /// The external tool exited unsuccessfully
    ExternalFailure {
        /// Command line
        command: String,
        /// Exit code, `None` if killed by a signal
        code: Option<i32>,
    },
}

/// The stage that halted a pipeline and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    /// Stage description
    pub stage: String,
    /// How it ended
    pub outcome: StageOutcome,
}

/// Summary of a pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Descriptions of the completed stages, in order
    pub completed: Vec<String>,
    /// The stage that halted the run, if any
    pub failure: Option<StageFailure>,
}

impl PipelineReport {
    /// Whether every stage completed
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Completed stages, or the halting stage as an error
    pub fn into_result(self) -> Result<Vec<String>> {
        let Some(failure) = self.failure else {
            return Ok(self.completed);
        };

        let stage = failure.stage;
        Err(match failure.outcome {
            StageOutcome::PreconditionFailed { reason } => {
                ReleaseError::PreconditionFailed { stage, reason }
            }
            StageOutcome::Rejected => ReleaseError::Aborted { stage },
            StageOutcome::ExternalFailure { command, code } => {
                ReleaseError::Tool(ToolError::Failed { command, code })
            }
            StageOutcome::Completed => return Ok(self.completed),
        })
    }
}

/// Runs stages against a tool runner and a confirmation source
pub struct Pipeline<'a, R, C> {
    runner: &'a R,
    confirm: &'a C,
    config: &'a RuntimeConfig,
    dry_run: bool,
}

impl<'a, R: ToolRunner, C: Confirm> Pipeline<'a, R, C> {
    /// Create a pipeline runner
    pub fn new(runner: &'a R, confirm: &'a C, config: &'a RuntimeConfig) -> Self {
        Self {
            runner,
            confirm,
            config,
            dry_run: false,
        }
    }

    /// Only run read-only tools; report the rest
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run `stages` in order, stopping at the first one that does not complete
    pub async fn run(&self, stages: &[Stage]) -> Result<PipelineReport> {
        let mut report = PipelineReport::default();

        for stage in stages {
            let outcome = self.run_stage(stage).await?;
            if outcome != StageOutcome::Completed {
                log::info!("Stage '{}' halted the pipeline: {:?}", stage.description, outcome);
                report.failure = Some(StageFailure {
                    stage: stage.description.clone(),
                    outcome,
                });
                break;
            }
            report.completed.push(stage.description.clone());
        }

        Ok(report)
    }

    async fn run_stage(&self, stage: &Stage) -> Result<StageOutcome> {
        if let Some(precondition) = &stage.precondition
            && let Some(reason) = precondition.violation()?
        {
            return Ok(StageOutcome::PreconditionFailed { reason });
        }

        if let Some(checkpoint) = &stage.checkpoint {
            let message = checkpoint.render()?;
            if !self.confirm.confirm(Some(message.as_str()))? {
                return Ok(StageOutcome::Rejected);
            }
        }

        match &stage.action {
            Action::Run(command) => {
                if self.dry_run && !command.is_read_only() {
                    self.config
                        .println(&format!("  would run: {}", command));
                    return Ok(StageOutcome::Completed);
                }

                self.config.progress_println(&stage.description);
                let output = self.runner.run(command).await?;
                if output.success() {
                    Ok(StageOutcome::Completed)
                } else {
                    Ok(StageOutcome::ExternalFailure {
                        command: command.to_string(),
                        code: output.code,
                    })
                }
            }
            Action::ListArtifacts(selector) => {
                let files = selector.list()?;
                if files.is_empty() {
                    self.config
                        .warning_println(&format!("No artifacts match {}", selector));
                } else {
                    self.config.println(&format!("{}:", stage.description));
                    for file in &files {
                        self.config.indent(&file.display().to_string());
                    }
                }
                Ok(StageOutcome::Completed)
            }
            Action::RemoveArtifacts(selector) => {
                if self.dry_run {
                    for file in selector.list()? {
                        self.config
                            .println(&format!("  would remove: {}", file.display()));
                    }
                    return Ok(StageOutcome::Completed);
                }

                self.config.progress_println(&stage.description);
                let removed = selector.remove()?;
                if removed.is_empty() {
                    log::warn!("No prior artifacts matched {}", selector);
                } else {
                    self.config
                        .verbose_println(&format!("Removed {} artifact(s)", removed.len()));
                }
                Ok(StageOutcome::Completed)
            }
            Action::Nothing => Ok(StageOutcome::Completed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::ArtifactSelector;
    use crate::confirm::{AutoConfirm, ScriptedConfirm};
    use crate::pipeline::stage::Precondition;
    use crate::process::{RecordingRunner, ToolCommand};
    use tempfile::TempDir;

    fn quiet() -> RuntimeConfig {
        RuntimeConfig::new(false, true)
    }

    fn echo(word: &str) -> Stage {
        Stage::run(format!("echo {}", word), ToolCommand::new("echo").arg(word))
    }

    #[tokio::test]
    async fn test_runs_all_stages_in_order() {
        let runner = RecordingRunner::new();
        let config = quiet();
        let confirm = AutoConfirm::accept();
        let stages = vec![echo("a"), echo("b").confirm("b?"), echo("c")];

        let report = Pipeline::new(&runner, &confirm, &config)
            .run(&stages)
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.completed, vec!["echo a", "echo b", "echo c"]);
        assert_eq!(runner.command_lines(), vec!["echo a", "echo b", "echo c"]);
    }

    #[tokio::test]
    async fn test_rejection_stops_before_action() {
        let runner = RecordingRunner::new();
        let config = quiet();
        let confirm = ScriptedConfirm::new([true, false]);
        let stages = vec![
            echo("a").confirm("a?"),
            echo("b").confirm("b?"),
            echo("c").confirm("c?"),
        ];

        let report = Pipeline::new(&runner, &confirm, &config)
            .run(&stages)
            .await
            .unwrap();

        assert_eq!(runner.command_lines(), vec!["echo a"]);
        assert_eq!(confirm.asked().len(), 2);
        assert_eq!(
            report.failure,
            Some(StageFailure {
                stage: "echo b".to_string(),
                outcome: StageOutcome::Rejected,
            })
        );
        assert!(matches!(
            report.into_result(),
            Err(ReleaseError::Aborted { .. })
        ));
    }

    #[tokio::test]
    async fn test_failed_tool_halts_pipeline() {
        let runner = RecordingRunner::new().respond("echo b", 2, "");
        let config = quiet();
        let confirm = AutoConfirm::accept();
        let stages = vec![echo("a"), echo("b"), echo("c")];

        let report = Pipeline::new(&runner, &confirm, &config)
            .run(&stages)
            .await
            .unwrap();

        assert_eq!(runner.command_lines(), vec!["echo a", "echo b"]);
        assert_eq!(
            report.failure.as_ref().map(|f| f.outcome.clone()),
            Some(StageOutcome::ExternalFailure {
                command: "echo b".to_string(),
                code: Some(2),
            })
        );
        assert!(matches!(
            report.into_result(),
            Err(ReleaseError::Tool(ToolError::Failed { code: Some(2), .. }))
        ));
    }

    #[tokio::test]
    async fn test_precondition_checked_before_checkpoint() {
        let temp_dir = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let config = quiet();
        let confirm = ScriptedConfirm::new([true]);
        let stages = vec![echo("upload")
            .require(Precondition::DirExists {
                path: temp_dir.path().join("dist"),
                what: "build-output directory".to_string(),
                hint: "build first".to_string(),
            })
            .confirm("upload?")];

        let report = Pipeline::new(&runner, &confirm, &config)
            .run(&stages)
            .await
            .unwrap();

        assert!(runner.calls().is_empty());
        assert!(confirm.asked().is_empty());
        assert!(matches!(
            report.failure.map(|f| f.outcome),
            Some(StageOutcome::PreconditionFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_dry_run_skips_mutations() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = temp_dir.path().join("tox-1.0.tar.gz");
        std::fs::write(&artifact, b"").unwrap();

        let runner = RecordingRunner::new();
        let config = quiet();
        let confirm = AutoConfirm::accept();
        let stages = vec![
            Stage::run("status", ToolCommand::new("git").arg("status").read_only()),
            Stage::new(
                "clean",
                Action::RemoveArtifacts(ArtifactSelector::package(temp_dir.path(), "tox")),
            ),
            Stage::run("tag", ToolCommand::new("git").args(["tag", "1.0"])),
        ];

        let report = Pipeline::new(&runner, &confirm, &config)
            .dry_run(true)
            .run(&stages)
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(runner.command_lines(), vec!["git status"]);
        assert!(artifact.exists());
    }
}
