//! Version resolution strategies.

use super::ReleaseVersion;
use crate::error::{Result, VersionError};
use crate::process::{ToolCommand, ToolRunner};
use std::path::Path;

/// How a release step obtains its version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionStrategy {
    /// Version given by the operator
    Explicit(String),
    /// Most recent tag reachable from HEAD
    MostRecentTag,
}

impl VersionStrategy {
    /// Strategy from an optional operator-supplied version
    pub fn from_option(version: Option<&str>) -> Self {
        match version {
            Some(version) => Self::Explicit(version.to_string()),
            None => Self::MostRecentTag,
        }
    }

    /// Whether the operator supplied the version
    pub fn is_explicit(&self) -> bool {
        matches!(self, Self::Explicit(_))
    }

    /// Resolve the version for a checkout at `root`
    pub async fn resolve<R: ToolRunner>(&self, runner: &R, root: &Path) -> Result<ReleaseVersion> {
        match self {
            Self::Explicit(version) => ReleaseVersion::parse(version),
            Self::MostRecentTag => most_recent_tag(runner, root).await,
        }
    }
}

/// Read the most recent tag with `git describe --abbrev=0 --tags`
pub async fn most_recent_tag<R: ToolRunner>(runner: &R, root: &Path) -> Result<ReleaseVersion> {
    let command = ToolCommand::new("git")
        .args(["describe", "--abbrev=0", "--tags"])
        .current_dir(root)
        .capture_output()
        .read_only();

    let output = runner.run(&command).await?;
    if !output.success() {
        return Err(VersionError::NoTags {
            reason: format!("'{}' exited with {:?}", command, output.code),
        }
        .into());
    }

    let tag = output.stdout.trim();
    if tag.is_empty() {
        return Err(VersionError::NoTags {
            reason: "git printed no tag".to_string(),
        }
        .into());
    }

    log::debug!("Most recent tag: {}", tag);
    ReleaseVersion::parse(tag)
}
