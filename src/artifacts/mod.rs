//! Build-output directory inspection.
//!
//! The build tool drops source and wheel distributions into a conventional
//! directory. Selectors describe which of those files a step works on; the
//! directory is read fresh every time a selector is listed.

use crate::error::Result;
use crate::version::ReleaseVersion;
use glob::Pattern;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// A set of glob patterns inside the build-output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSelector {
    dir: PathBuf,
    patterns: Vec<String>,
}

impl ArtifactSelector {
    /// Every file in `dir`
    pub fn all(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            patterns: vec!["*".to_string()],
        }
    }

    /// Files in `dir` whose name starts with `<package>-`
    pub fn package(dir: impl Into<PathBuf>, package: &str) -> Self {
        Self {
            dir: dir.into(),
            patterns: vec![format!("{}-*", Pattern::escape(package))],
        }
    }

    /// Source and wheel distributions of one release
    pub fn release(dir: impl Into<PathBuf>, package: &str, version: &ReleaseVersion) -> Self {
        let version = Pattern::escape(version.as_str());
        Self {
            dir: dir.into(),
            patterns: vec![
                format!("{}-{}.tar.gz", Pattern::escape(package), version),
                format!("{}-{}-*.whl", Pattern::escape(&wheel_name(package)), version),
            ],
        }
    }

    /// Matching files, sorted. A missing directory matches nothing.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let dir = Pattern::escape(&self.dir.to_string_lossy());
        let mut matches = BTreeSet::new();
        for pattern in &self.patterns {
            for entry in glob::glob(&format!("{}/{}", dir, pattern))? {
                match entry {
                    Ok(path) if path.is_file() => {
                        matches.insert(path);
                    }
                    Ok(_) => {}
                    Err(e) => log::warn!("Skipping unreadable artifact: {}", e),
                }
            }
        }
        Ok(matches.into_iter().collect())
    }

    /// Delete every matching file and return what was deleted
    pub fn remove(&self) -> Result<Vec<PathBuf>> {
        let files = self.list()?;
        for file in &files {
            std::fs::remove_file(file)?;
            log::debug!("Removed {}", file.display());
        }
        Ok(files)
    }
}

impl fmt::Display for ArtifactSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .patterns
            .iter()
            .map(|pattern| self.dir.join(pattern).display().to_string())
            .collect();
        f.write_str(&rendered.join(" "))
    }
}

/// Distribution name as it appears in wheel filenames
pub fn wheel_name(package: &str) -> String {
    package.replace(['-', '.'], "_")
}
