//! # pra
//!
//! Checkpointed release pipeline for a Python package.
//!
//! `pra` sequences the external tools of a manual release (git, towncrier,
//! setuptools, devpi, twine and a cloud test trigger) and pauses for operator
//! confirmation before every destructive step.
//!
//! ## Usage
//!
//! ```bash
//! pra prep 3.20.0      # changelog, build, commit and tag
//! pra upload           # stage on devpi and trigger cloud tests
//! pra test             # trigger cloud tests only
//! pra release          # upload to PyPI and push
//! pra status --json    # latest tag and built artifacts
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod artifacts;
pub mod cli;
pub mod confirm;
pub mod dispatcher;
pub mod error;
pub mod pipeline;
pub mod process;
pub mod version;

pub use artifacts::ArtifactSelector;
pub use cli::Args;
pub use confirm::{AutoConfirm, Confirm, ScriptedConfirm, TerminalConfirm};
pub use dispatcher::{DispatchReport, Dispatcher, ReleaseStatus, ReleaseStep};
pub use error::{CliError, ReleaseError, Result, ToolError, VersionError};
pub use pipeline::{Pipeline, PipelineReport, Stage, StageOutcome};
pub use process::{RecordingRunner, SystemRunner, ToolCommand, ToolRunner};
pub use version::{ReleaseVersion, VersionStrategy};

use std::path::PathBuf;

/// Configuration for release operations.
///
/// Built once at startup and passed by reference to every release step.
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    /// Checkout of the package being released
    pub project_root: PathBuf,
    /// Distribution name used for artifact filenames
    pub package_name: String,
    /// Build-output directory, relative to the project root
    pub dist_dir: PathBuf,
    /// Operator identity on the staging index
    pub staging_identity: String,
    /// Operator identity on the production index
    pub production_identity: String,
    /// Git remote receiving the release commit and tag
    pub remote_name: String,
    /// Branch pushed with the release commit
    pub release_branch: String,
    /// Staging devpi server
    pub staging_url: String,
    /// Development index under the staging identity
    pub staging_index: String,
    /// Cloud test harness checkout, relative to the project root
    pub harness_dir: PathBuf,
    /// Page showing cloud test results
    pub results_url: String,
    /// Changelog pre-processing script, relative to the project root
    pub changelog_prep: PathBuf,
    /// Python interpreter used for setup.py and the changelog script
    pub python: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            package_name: "tox".to_string(),
            dist_dir: PathBuf::from("dist"),
            staging_identity: "obestwalter".to_string(),
            production_identity: "obestwalter".to_string(),
            remote_name: "upstream".to_string(),
            release_branch: "master".to_string(),
            staging_url: "https://m.devpi.net".to_string(),
            staging_index: "dev".to_string(),
            harness_dir: PathBuf::from("../devpi-cloud-test-tox"),
            results_url: "https://github.com/tox-dev/devpi-cloud-test-tox".to_string(),
            changelog_prep: PathBuf::from("tasks/towncrier_prep.py"),
            python: "python".to_string(),
        }
    }
}

impl ReleaseConfig {
    /// Absolute-or-relative path of the build-output directory
    pub fn dist_path(&self) -> PathBuf {
        self.project_root.join(&self.dist_dir)
    }

    /// Path of the cloud test harness checkout
    pub fn harness_path(&self) -> PathBuf {
        self.project_root.join(&self.harness_dir)
    }

    /// `<identity>/<index>` path of the development index on devpi
    pub fn staging_index_path(&self) -> String {
        format!("{}/{}", self.staging_identity, self.staging_index)
    }
}
