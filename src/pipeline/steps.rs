//! Stage plans for each release step.

use super::stage::{Action, Precondition, Stage};
use crate::ReleaseConfig;
use crate::artifacts::ArtifactSelector;
use crate::process::ToolCommand;
use crate::version::ReleaseVersion;

/// Tool command running in the project root
fn tool(config: &ReleaseConfig, program: &str) -> ToolCommand {
    ToolCommand::new(program).current_dir(&config.project_root)
}

/// Command opening `url` in the default browser
fn url_opener(url: &str) -> ToolCommand {
    if cfg!(windows) {
        // The empty argument is the window title `start` expects first.
        ToolCommand::new("cmd").args(["/C", "start", "", url])
    } else if cfg!(target_os = "macos") {
        ToolCommand::new("open").arg(url)
    } else {
        ToolCommand::new("xdg-open").arg(url)
    }
}

/// Changelog, build, commit and tag
pub fn prepare(config: &ReleaseConfig, version: &ReleaseVersion) -> Vec<Stage> {
    let python = config.python.as_str();
    let prep_script = config.changelog_prep.to_string_lossy().into_owned();

    vec![
        Stage::run(
            "Pre-process changelog fragments",
            tool(config, python).arg(prep_script),
        ),
        Stage::run(
            "Draft changelog",
            tool(config, "towncrier")
                .args(["--draft", "--version", version.as_str()])
                .read_only(),
        ),
        Stage::run(
            "Show package version",
            tool(config, python).args(["setup.py", "--version"]).read_only(),
        )
        .confirm("Is the changelog draft above correct?"),
        Stage::run(
            "Write changelog",
            tool(config, "towncrier").args(["--yes", "--version", version.as_str()]),
        )
        .confirm(format!("Is {} the correct version to release?", version)),
        Stage::run("Stage changes", tool(config, "git").args(["add", "."])),
        Stage::run(
            "Show staged changes",
            tool(config, "git").arg("status").read_only(),
        ),
        Stage::checkpoint("Review staged changes", "Are the staged changes above correct?"),
        Stage::new(
            "Remove prior build artifacts",
            Action::RemoveArtifacts(ArtifactSelector::package(
                config.dist_path(),
                &config.package_name,
            )),
        )
        .confirm(format!(
            "Delete prior {} artifacts, rebuild and tag {}?",
            config.package_name, version
        )),
        Stage::run(
            "Build distributions",
            tool(config, python).args(["setup.py", "sdist", "bdist_wheel"]),
        ),
        Stage::run(
            "Commit release preparation",
            tool(config, "git").args([
                "commit".to_string(),
                "-m".to_string(),
                format!("release preparation for {}", version),
            ]),
        ),
        Stage::run("Tag release", tool(config, "git").args(["tag", version.as_str()])),
    ]
}

/// Upload every built artifact to the staging index
pub fn devpi_upload(config: &ReleaseConfig, version: &ReleaseVersion) -> Vec<Stage> {
    let dist = config.dist_path();
    let built = ArtifactSelector::all(&dist);

    vec![
        Stage::new("Locate build output", Action::Nothing).require(Precondition::DirExists {
            path: dist.clone(),
            what: "build-output directory".to_string(),
            hint: "run `pra prep <version>` first".to_string(),
        }),
        Stage::run(
            "Select staging server",
            tool(config, "devpi").args(["use", config.staging_url.as_str()]),
        )
        .require(Precondition::HasArtifacts(built.clone())),
        Stage::run(
            "Log in to staging index",
            tool(config, "devpi").args(["login", config.staging_identity.as_str()]),
        ),
        Stage::run(
            "Select development index",
            tool(config, "devpi").args(["use".to_string(), config.staging_index_path()]),
        ),
        Stage::new("Artifacts to upload", Action::ListArtifacts(built.clone())),
        Stage::run(
            "Upload to staging index",
            tool(config, "devpi").arg("upload").artifacts(built.clone()),
        )
        .confirm_artifacts(
            format!(
                "Upload these artifacts for {} to {}?",
                version,
                config.staging_index_path()
            ),
            built,
        ),
    ]
}

/// Trigger downstream test runs against the staged release
pub fn cloud_test(config: &ReleaseConfig, version: &ReleaseVersion) -> Vec<Stage> {
    let harness = config.harness_path();

    vec![
        Stage::run(
            "Trigger cloud tests",
            ToolCommand::new("dct")
                .args(["trig", version.as_str()])
                .current_dir(&harness),
        )
        .require(Precondition::DirExists {
            path: harness,
            what: "cloud test harness".to_string(),
            hint: "clone it next to this checkout or set --harness-dir".to_string(),
        })
        .confirm(format!("Trigger cloud tests for {}?", version)),
        Stage::run("Open test results", url_opener(&config.results_url)),
    ]
}

/// Devpi upload followed by the cloud test trigger
pub fn stage_and_test(config: &ReleaseConfig, version: &ReleaseVersion) -> Vec<Stage> {
    let mut stages = devpi_upload(config, version);
    stages.extend(cloud_test(config, version));
    stages
}

/// Upload to the production index and push
pub fn publish(config: &ReleaseConfig, version: &ReleaseVersion) -> Vec<Stage> {
    let release =
        ArtifactSelector::release(config.dist_path(), &config.package_name, version);

    vec![
        Stage::new(
            "Release artifacts",
            Action::ListArtifacts(release.clone()),
        )
        .require(Precondition::HasArtifacts(release.clone())),
        Stage::run(
            "Upload to production index",
            tool(config, "twine")
                .args(["upload", "--username", config.production_identity.as_str()])
                .artifacts(release.clone()),
        )
        .confirm_artifacts(
            format!("Publish these artifacts as {} to PyPI?", version),
            release,
        ),
        Stage::run(
            "Push release commit",
            tool(config, "git").args([
                "push",
                config.remote_name.as_str(),
                config.release_branch.as_str(),
            ]),
        ),
        Stage::run(
            "Push release tag",
            tool(config, "git").args(["push", config.remote_name.as_str(), version.as_str()]),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version() -> ReleaseVersion {
        ReleaseVersion::parse("1.2.3").unwrap()
    }

    fn checkpoints(stages: &[Stage]) -> usize {
        stages.iter().filter(|s| s.checkpoint.is_some()).count()
    }

    #[test]
    fn test_prepare_has_four_checkpoints_and_ends_with_tag() {
        let stages = prepare(&ReleaseConfig::default(), &version());
        assert_eq!(checkpoints(&stages), 4);

        let Some(Action::Run(last)) = stages.last().map(|s| &s.action) else {
            panic!("last stage should run a tool");
        };
        assert_eq!(last.to_string(), "git tag 1.2.3");
    }

    #[test]
    fn test_prepare_commit_message_embeds_version() {
        let stages = prepare(&ReleaseConfig::default(), &version());
        let commit = stages
            .iter()
            .find(|s| s.description == "Commit release preparation")
            .unwrap();
        let Action::Run(command) = &commit.action else {
            panic!("commit stage should run git");
        };
        assert_eq!(command.to_string(), "git commit -m release preparation for 1.2.3");
    }

    #[test]
    fn test_devpi_upload_checks_build_output_before_devpi() {
        let stages = devpi_upload(&ReleaseConfig::default(), &version());
        assert!(matches!(
            stages[0].precondition,
            Some(Precondition::DirExists { .. })
        ));
        assert!(matches!(
            stages[1].precondition,
            Some(Precondition::HasArtifacts(_))
        ));
        assert_eq!(checkpoints(&stages), 1);
    }

    #[test]
    fn test_results_page_opener() {
        let Action::Run(opener) = &cloud_test(&ReleaseConfig::default(), &version())[1].action
        else {
            panic!("results stage should run the opener");
        };
        let line = opener.to_string();
        assert!(line.ends_with("https://github.com/tox-dev/devpi-cloud-test-tox"));
        if cfg!(windows) {
            assert!(line.starts_with("cmd /C start"));
        }
    }

    #[test]
    fn test_cloud_test_runs_in_harness_dir() {
        let config = ReleaseConfig::default();
        let stages = cloud_test(&config, &version());
        let Action::Run(trigger) = &stages[0].action else {
            panic!("trigger stage should run dct");
        };
        assert_eq!(trigger.cwd(), Some(config.harness_path().as_path()));
        assert!(stages[0].checkpoint.is_some());
    }

    #[test]
    fn test_publish_pushes_branch_then_tag() {
        let stages = publish(&ReleaseConfig::default(), &version());
        let pushes: Vec<String> = stages
            .iter()
            .filter_map(|s| match &s.action {
                Action::Run(command) if command.program() == "git" => Some(command.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(
            pushes,
            vec!["git push upstream master", "git push upstream 1.2.3"]
        );
    }
}
