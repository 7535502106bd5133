//! Semantic version captures.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Named captures of a semver.org-compliant version string.
///
/// The numeric parts are kept as the digit strings that appeared in the
/// input; use [`SemVerMatch::to_version`] to get a comparable
/// [`semver::Version`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SemVerMatch {
    pub major: String,
    pub minor: String,
    pub patch: String,
    pub prerelease: Option<String>,
    pub build_metadata: Option<String>,
}

impl SemVerMatch {
    /// Looks up a capture by name.
    ///
    /// Accepts `major`, `minor`, `patch`, `prerelease` and either
    /// `buildmetadata` or `build_metadata`. Unknown names and absent
    /// optional captures return `None`.
    #[must_use]
    pub fn get(&self, capture: &str) -> Option<&str> {
        match capture {
            "major" => Some(&self.major),
            "minor" => Some(&self.minor),
            "patch" => Some(&self.patch),
            "prerelease" => self.prerelease.as_deref(),
            "buildmetadata" | "build_metadata" => self.build_metadata.as_deref(),
            _ => None,
        }
    }

    /// Converts the captures into a [`semver::Version`].
    ///
    /// Fails only when a numeric part does not fit in `u64`.
    pub fn to_version(&self) -> Result<semver::Version, semver::Error> {
        semver::Version::parse(&self.to_string())
    }
}

impl fmt::Display for SemVerMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            write!(f, "-{pre}")?;
        }
        if let Some(build) = &self.build_metadata {
            write!(f, "+{build}")?;
        }
        Ok(())
    }
}
