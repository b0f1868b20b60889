//! SDK version lookup from the tree's `VERSION` file.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

static MAJOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"VERSION_MAJOR\s*=\s*(\d+)").expect("static regex"));
static MINOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"VERSION_MINOR\s*=\s*(\d+)").expect("static regex"));
static PATCH: Lazy<Regex> = Lazy::new(|| Regex::new(r"PATCHLEVEL\s*=\s*(\d+)").expect("static regex"));

/// Short and full version strings of a manual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectVersion {
    /// `major.minor`
    pub version: String,
    /// `major.minor.patch`, or `version` when no patch level is set
    pub release: String,
}

impl ProjectVersion {
    pub fn new(version: impl Into<String>, release: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            release: release.into(),
        }
    }

    /// Parse `VERSION_MAJOR`, `VERSION_MINOR` and optional `PATCHLEVEL`.
    /// Both major and minor must be present.
    pub fn parse(content: &str) -> Option<Self> {
        let capture = |re: &Regex| re.captures(content).map(|c| c[1].to_string());
        let major = capture(&*MAJOR)?;
        let minor = capture(&*MINOR)?;
        let version = format!("{major}.{minor}");
        let release = match capture(&*PATCH) {
            Some(patch) => format!("{version}.{patch}"),
            None => version.clone(),
        };
        Some(Self { version, release })
    }

    /// Read `<sdk_root>/VERSION`, falling back to `fallback` when the file is
    /// missing, unreadable or incomplete.
    pub fn detect(sdk_root: &Path, fallback: ProjectVersion) -> Self {
        let path = sdk_root.join("VERSION");
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|| {
                tracing::warn!(path = %path.display(), "VERSION file lacks major/minor");
                fallback
            }),
            Err(_) => fallback,
        }
    }
}
