//! Command line argument parsing and validation.
//!
//! Every setting follows the same default-override pattern: a built-in
//! default, replaced by an environment variable, replaced by a flag.

use crate::ReleaseConfig;
use crate::dispatcher::ReleaseStep;
use crate::version::VersionStrategy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Checkpointed release pipeline for a Python package
#[derive(Parser, Debug)]
#[command(
    name = "pra",
    version,
    about = "Checkpointed release pipeline for a Python package",
    long_about = "Prepare, stage, test and publish a release by running the release tools in order,
asking for confirmation before every destructive step.

Usage:
  pra prep 3.20.0
  pra upload
  pra test
  pra release",
    arg_required_else_help = true
)]
pub struct Args {
    /// Release step to run
    #[command(subcommand)]
    pub command: Command,

    /// Release settings
    #[command(flatten)]
    pub settings: Settings,

    /// Answer "yes" at every checkpoint
    #[arg(long, global = true)]
    pub yes: bool,

    /// Print mutating commands instead of running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Show detailed progress
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Release commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Update the changelog, build distributions, commit and tag
    Prep {
        /// Version to release
        #[arg(value_name = "VERSION")]
        version: String,
    },

    /// Upload the built distributions to devpi and trigger cloud tests
    Upload {
        /// Devpi user (overrides --devpi-user)
        #[arg(id = "devpi_user_pos", value_name = "DEVPI_USER")]
        devpi_user: Option<String>,

        /// Use this version instead of the most recent tag
        #[arg(long, value_name = "VERSION")]
        release_version: Option<String>,
    },

    /// Trigger cloud tests for the staged release
    Test {
        /// Devpi user (overrides --devpi-user)
        #[arg(id = "devpi_user_pos", value_name = "DEVPI_USER")]
        devpi_user: Option<String>,

        /// Use this version instead of the most recent tag
        #[arg(long, value_name = "VERSION")]
        release_version: Option<String>,
    },

    /// Upload the release to PyPI and push the commit and tag
    #[command(alias = "rel")]
    Release {
        /// Use this version instead of the most recent tag
        #[arg(long, value_name = "VERSION")]
        release_version: Option<String>,
    },

    /// Show the most recent tag and the built distributions
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Command {
    /// Command name for messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Prep { .. } => "prep",
            Command::Upload { .. } => "upload",
            Command::Test { .. } => "test",
            Command::Release { .. } => "release",
            Command::Status { .. } => "status",
        }
    }

    /// Release step run by this command, `None` for read-only commands
    pub fn step(&self) -> Option<ReleaseStep> {
        match self {
            Command::Prep { .. } => Some(ReleaseStep::Prepare),
            Command::Upload { .. } => Some(ReleaseStep::StageAndTest),
            Command::Test { .. } => Some(ReleaseStep::CloudTest),
            Command::Release { .. } => Some(ReleaseStep::Publish),
            Command::Status { .. } => None,
        }
    }

    /// How this command obtains its version
    pub fn version_strategy(&self) -> VersionStrategy {
        match self {
            Command::Prep { version } => VersionStrategy::Explicit(version.clone()),
            Command::Upload {
                release_version, ..
            }
            | Command::Test {
                release_version, ..
            }
            | Command::Release { release_version } => {
                VersionStrategy::from_option(release_version.as_deref())
            }
            Command::Status { .. } => VersionStrategy::MostRecentTag,
        }
    }

    fn devpi_user(&self) -> Option<&str> {
        match self {
            Command::Upload { devpi_user, .. } | Command::Test { devpi_user, .. } => {
                devpi_user.as_deref()
            }
            _ => None,
        }
    }
}

/// Settings shared by all commands
#[derive(clap::Args, Debug, Clone)]
pub struct Settings {
    /// Checkout of the package being released
    #[arg(long, global = true, env = "PRA_PROJECT_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Distribution name
    #[arg(long, global = true, env = "PRA_PACKAGE", default_value = "tox")]
    pub package: String,

    /// Build-output directory, relative to the project root
    #[arg(long, global = true, env = "PRA_DIST_DIR", default_value = "dist")]
    pub dist_dir: PathBuf,

    /// Operator identity on the staging index
    #[arg(long, global = true, env = "DEVPI_USERNAME", default_value = "obestwalter")]
    pub devpi_user: String,

    /// Operator identity on the production index
    #[arg(long, global = true, env = "PYPI_USERNAME", default_value = "obestwalter")]
    pub pypi_user: String,

    /// Git remote receiving the release
    #[arg(long, global = true, env = "GIT_REMOTE", default_value = "upstream")]
    pub remote: String,

    /// Branch pushed with the release commit
    #[arg(long, global = true, env = "PRA_BRANCH", default_value = "master")]
    pub branch: String,

    /// Staging devpi server
    #[arg(long, global = true, env = "DEVPI_URL", default_value = "https://m.devpi.net")]
    pub devpi_url: String,

    /// Development index on the staging server
    #[arg(long, global = true, env = "DEVPI_INDEX", default_value = "dev")]
    pub devpi_index: String,

    /// Cloud test harness checkout, relative to the project root
    #[arg(
        long,
        global = true,
        env = "PRA_HARNESS_DIR",
        default_value = "../devpi-cloud-test-tox"
    )]
    pub harness_dir: PathBuf,

    /// Page opened after triggering cloud tests
    #[arg(
        long,
        global = true,
        env = "PRA_RESULTS_URL",
        default_value = "https://github.com/tox-dev/devpi-cloud-test-tox"
    )]
    pub results_url: String,

    /// Changelog pre-processing script, relative to the project root
    #[arg(
        long,
        global = true,
        env = "PRA_CHANGELOG_PREP",
        default_value = "tasks/towncrier_prep.py"
    )]
    pub changelog_prep: PathBuf,

    /// Python interpreter
    #[arg(long, global = true, env = "PRA_PYTHON", default_value = "python")]
    pub python: String,
}

impl Args {
    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("--package", self.settings.package.as_str()),
            ("--devpi-user", self.settings.devpi_user.as_str()),
            ("--pypi-user", self.settings.pypi_user.as_str()),
            ("--remote", self.settings.remote.as_str()),
            ("--branch", self.settings.branch.as_str()),
            ("--python", self.settings.python.as_str()),
        ];
        for (flag, value) in required {
            if value.trim().is_empty() {
                return Err(format!("{} must not be empty", flag));
            }
        }

        if let Some(user) = self.command.devpi_user()
            && user.trim().is_empty()
        {
            return Err("DEVPI_USER must not be empty".to_string());
        }

        Ok(())
    }
}

impl From<&Args> for ReleaseConfig {
    fn from(args: &Args) -> Self {
        let settings = &args.settings;
        let staging_identity = args
            .command
            .devpi_user()
            .unwrap_or(&settings.devpi_user)
            .to_string();

        // Tools run inside the project root but receive artifact paths built
        // from it, so a relative root must not be resolved twice.
        let project_root =
            std::path::absolute(&settings.root).unwrap_or_else(|_| settings.root.clone());

        Self {
            project_root,
            package_name: settings.package.clone(),
            dist_dir: settings.dist_dir.clone(),
            staging_identity,
            production_identity: settings.pypi_user.clone(),
            remote_name: settings.remote.clone(),
            release_branch: settings.branch.clone(),
            staging_url: settings.devpi_url.clone(),
            staging_index: settings.devpi_index.clone(),
            harness_dir: settings.harness_dir.clone(),
            results_url: settings.results_url.clone(),
            changelog_prep: settings.changelog_prep.clone(),
            python: settings.python.clone(),
        }
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            output: super::OutputManager::new(verbose, quiet),
        }
    }

    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print message only in verbose mode
    pub fn verbose_println(&self, message: &str) {
        let _ = self.output.verbose(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print the start of an action
    pub fn progress_println(&self, message: &str) {
        let _ = self.output.progress(message);
    }

    /// Print a section header
    pub fn section(&self, title: &str) {
        let _ = self.output.section(title);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }

    /// Check if output is suppressed
    pub fn is_quiet(&self) -> bool {
        self.output.is_quiet()
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(args.verbose, args.quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("pra").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_prep_is_explicit() {
        let args = parse(&["prep", "1.2.3"]);
        assert_eq!(args.command.step(), Some(ReleaseStep::Prepare));
        assert_eq!(
            args.command.version_strategy(),
            VersionStrategy::Explicit("1.2.3".to_string())
        );
    }

    #[test]
    fn test_release_defaults_to_most_recent_tag() {
        let args = parse(&["release"]);
        assert_eq!(args.command.version_strategy(), VersionStrategy::MostRecentTag);

        let args = parse(&["rel", "--release-version", "2.0.0"]);
        assert_eq!(args.command.name(), "release");
        assert!(args.command.version_strategy().is_explicit());
    }

    #[test]
    fn test_positional_devpi_user_overrides_setting() {
        let args = parse(&["upload", "alice", "--devpi-user", "bob"]);
        let config = ReleaseConfig::from(&args);
        assert_eq!(config.staging_identity, "alice");

        let args = parse(&["test", "--devpi-user", "bob"]);
        assert_eq!(ReleaseConfig::from(&args).staging_identity, "bob");
    }

    #[test]
    fn test_devpi_user_flag_after_subcommand() {
        let args = parse(&["upload", "--devpi-user", "bob"]);
        assert_eq!(ReleaseConfig::from(&args).staging_identity, "bob");

        let args = parse(&["--devpi-user", "bob", "test", "carol"]);
        assert_eq!(ReleaseConfig::from(&args).staging_identity, "carol");
    }

    #[test]
    fn test_relative_root_becomes_absolute() {
        let args = parse(&["release", "--root", "sub/proj"]);
        let config = ReleaseConfig::from(&args);
        assert!(config.project_root.is_absolute());
        assert!(config.project_root.ends_with("sub/proj"));
        assert!(config.dist_path().is_absolute());
    }

    #[test]
    fn test_missing_prep_version_is_rejected() {
        let result = Args::try_parse_from(["pra", "prep"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_no_command_shows_usage() {
        let err = Args::try_parse_from(["pra"]).unwrap_err();
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn test_validate_rejects_empty_remote() {
        let args = parse(&["release", "--remote", ""]);
        assert!(args.validate().unwrap_err().contains("--remote"));
    }
}
