//! Release version identifier and its resolution.
//!
//! The version is a plain string. It becomes a git tag name and part of the
//! artifact filenames, so it is validated against git's ref-name rules rather
//! than any particular versioning scheme.

mod resolver;

pub use resolver::{VersionStrategy, most_recent_tag};

use crate::error::{Result, VersionError};
use std::fmt;

/// Characters git refuses in tag names
const FORBIDDEN_CHARS: &[char] = &['~', '^', ':', '?', '*', '[', '\\'];

/// A version string that is safe to use as a tag name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
    /// Validate and wrap a version string
    pub fn parse(version: &str) -> Result<Self> {
        let invalid = |reason: &str| VersionError::InvalidVersion {
            version: version.to_string(),
            reason: reason.to_string(),
        };

        if version.is_empty() {
            return Err(invalid("version must not be empty").into());
        }
        if version.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(invalid("whitespace is not allowed in a tag name").into());
        }
        if version.starts_with('-') {
            return Err(invalid("a tag name must not start with '-'").into());
        }
        if let Some(c) = version.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
            return Err(invalid(&format!("character '{}' is not allowed in a tag name", c)).into());
        }
        if version.contains("..") || version.contains("@{") {
            return Err(invalid("sequences '..' and '@{' are not allowed in a tag name").into());
        }
        if version.ends_with('.') || version.ends_with('/') || version.ends_with(".lock") {
            return Err(invalid("a tag name must not end with '.', '/' or '.lock'").into());
        }

        Ok(Self(version.to_string()))
    }

    /// Version as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ReleaseVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
