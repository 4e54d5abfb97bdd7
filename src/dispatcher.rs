//! Release dispatcher.
//!
//! Routes a release step to its stage plan after resolving the version with
//! the strategy chosen by the caller.

use crate::ReleaseConfig;
use crate::artifacts::ArtifactSelector;
use crate::cli::RuntimeConfig;
use crate::confirm::Confirm;
use crate::error::{CliError, ReleaseError, Result, VersionError};
use crate::pipeline::{Pipeline, Stage, steps};
use crate::process::ToolRunner;
use crate::version::{ReleaseVersion, VersionStrategy, most_recent_tag};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Named phases of the release workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseStep {
    /// Changelog, build, commit and tag
    Prepare,
    /// Upload to the staging index, then trigger cloud tests
    StageAndTest,
    /// Trigger cloud tests only
    CloudTest,
    /// Upload to the production index and push
    Publish,
}

impl ReleaseStep {
    /// Stage plan for `version`
    pub fn plan(&self, config: &ReleaseConfig, version: &ReleaseVersion) -> Vec<Stage> {
        match self {
            ReleaseStep::Prepare => steps::prepare(config, version),
            ReleaseStep::StageAndTest => steps::stage_and_test(config, version),
            ReleaseStep::CloudTest => steps::cloud_test(config, version),
            ReleaseStep::Publish => steps::publish(config, version),
        }
    }
}

impl fmt::Display for ReleaseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReleaseStep::Prepare => "Prepare",
            ReleaseStep::StageAndTest => "Stage and test",
            ReleaseStep::CloudTest => "Cloud test",
            ReleaseStep::Publish => "Publish",
        };
        f.write_str(name)
    }
}

/// Result of a successful release step
#[derive(Debug, Clone)]
pub struct DispatchReport {
    /// Step that ran
    pub step: ReleaseStep,
    /// Version it ran for
    pub version: ReleaseVersion,
    /// Descriptions of the completed stages
    pub completed: Vec<String>,
}

/// Resolves versions and runs release steps
pub struct Dispatcher<'a, R, C> {
    config: &'a ReleaseConfig,
    runner: &'a R,
    confirm: &'a C,
    output: &'a RuntimeConfig,
    dry_run: bool,
}

impl<'a, R: ToolRunner, C: Confirm> Dispatcher<'a, R, C> {
    /// Create a dispatcher
    pub fn new(
        config: &'a ReleaseConfig,
        runner: &'a R,
        confirm: &'a C,
        output: &'a RuntimeConfig,
    ) -> Self {
        Self {
            config,
            runner,
            confirm,
            output,
            dry_run: false,
        }
    }

    /// Report mutating commands instead of running them
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run `step` for the version chosen by `strategy`
    pub async fn dispatch(
        &self,
        step: ReleaseStep,
        strategy: &VersionStrategy,
    ) -> Result<DispatchReport> {
        if step == ReleaseStep::Prepare && !strategy.is_explicit() {
            return Err(CliError::MissingArgument {
                argument: "version".to_string(),
            }
            .into());
        }

        let version = strategy
            .resolve(self.runner, &self.config.project_root)
            .await?;
        log::info!("{} step for version {}", step, version);

        self.output.section(&format!("{} {}", step, version));
        if self.dry_run {
            self.output
                .warning_println("Dry run: mutating commands are only printed");
        }

        let stages = step.plan(self.config, &version);
        let report = Pipeline::new(self.runner, self.confirm, self.output)
            .dry_run(self.dry_run)
            .run(&stages)
            .await?;

        Ok(DispatchReport {
            step,
            version,
            completed: report.into_result()?,
        })
    }
}

/// Release state as seen from the checkout
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseStatus {
    /// Most recent tag, if any
    pub latest_tag: Option<String>,
    /// Build-output directory
    pub dist_dir: PathBuf,
    /// Files currently in the build-output directory
    pub artifacts: Vec<PathBuf>,
}

/// Inspect the tag list and build-output directory
pub async fn release_status<R: ToolRunner>(
    config: &ReleaseConfig,
    runner: &R,
) -> Result<ReleaseStatus> {
    let latest_tag = match most_recent_tag(runner, &config.project_root).await {
        Ok(version) => Some(version.to_string()),
        Err(ReleaseError::Version(VersionError::NoTags { .. })) => None,
        Err(e) => return Err(e),
    };

    let dist_dir = config.dist_path();
    let artifacts = ArtifactSelector::all(&dist_dir).list()?;

    Ok(ReleaseStatus {
        latest_tag,
        dist_dir,
        artifacts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::AutoConfirm;
    use crate::process::RecordingRunner;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_prepare_requires_explicit_version() {
        let config = ReleaseConfig::default();
        let runner = RecordingRunner::new();
        let confirm = AutoConfirm::accept();
        let output = RuntimeConfig::new(false, true);

        let result = Dispatcher::new(&config, &runner, &confirm, &output)
            .dispatch(ReleaseStep::Prepare, &VersionStrategy::MostRecentTag)
            .await;

        assert!(matches!(
            result,
            Err(ReleaseError::Cli(CliError::MissingArgument { .. }))
        ));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_status_without_tags() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("dist")).unwrap();
        std::fs::write(temp_dir.path().join("dist/tox-1.0.tar.gz"), b"").unwrap();

        let config = ReleaseConfig {
            project_root: temp_dir.path().to_path_buf(),
            ..ReleaseConfig::default()
        };
        let runner = RecordingRunner::new().respond("git describe", 128, "");

        let status = release_status(&config, &runner).await.unwrap();
        assert_eq!(status.latest_tag, None);
        assert_eq!(status.artifacts.len(), 1);

        let json = serde_json::to_value(&status).unwrap();
        assert!(json["latest_tag"].is_null());
    }

    #[test]
    fn test_step_display() {
        assert_eq!(ReleaseStep::StageAndTest.to_string(), "Stage and test");
        assert_eq!(ReleaseStep::Publish.to_string(), "Publish");
    }
}
