//! Status command implementation.
//!
//! Displays the most recent tag and the contents of the build-output directory.

use crate::ReleaseConfig;
use crate::cli::RuntimeConfig;
use crate::dispatcher::release_status;
use crate::error::{ReleaseError, Result};
use crate::process::ToolRunner;

/// Execute status command
pub(super) async fn execute_status<R: ToolRunner>(
    release_config: &ReleaseConfig,
    runner: &R,
    config: &RuntimeConfig,
    json: bool,
) -> Result<()> {
    config.verbose_println("Checking release status...");

    let status = release_status(release_config, runner).await?;

    if json {
        let json_output = serde_json::to_string_pretty(&status).map_err(ReleaseError::Json)?;
        println!("{}", json_output);
        return Ok(());
    }

    match &status.latest_tag {
        Some(tag) => config.println(&format!("🏷  Latest tag: {}", tag)),
        None => config.println("🏷  No release tag yet"),
    }

    if status.artifacts.is_empty() {
        config.println(&format!(
            "📦 No artifacts in {}",
            status.dist_dir.display()
        ));
    } else {
        config.println(&format!("📦 Artifacts in {}:", status.dist_dir.display()));
        for artifact in &status.artifacts {
            let name = artifact
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| artifact.display().to_string());
            config.indent(&name);
        }
    }

    Ok(())
}
