//! Post-build hook for the manuals.

use super::error::DocsError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Name of the static asset directory in both source and output trees.
pub const STATIC_DIR: &str = "_static";

/// Result of the documentation build handed to the hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Succeeded,
    Failed(String),
}

impl BuildOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, BuildOutcome::Succeeded)
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CopySummary {
    pub files: usize,
    pub dirs: usize,
    pub destination: PathBuf,
}

/// Copy `srcdir/_static` into `outdir/_static` after a successful build.
///
/// Existing output content is merged with, not replaced. Returns `None` when
/// the build failed or there is no static directory to copy.
pub fn on_build_finished(
    srcdir: &Path,
    outdir: &Path,
    outcome: &BuildOutcome,
) -> Result<Option<CopySummary>, DocsError> {
    if let BuildOutcome::Failed(reason) = outcome {
        info!(%reason, "build failed, static assets not copied");
        return Ok(None);
    }

    let source = srcdir.join(STATIC_DIR);
    if !source.is_dir() {
        debug!(path = %source.display(), "no static directory");
        return Ok(None);
    }

    let destination = outdir.join(STATIC_DIR);
    let summary = copy_tree(&source, &destination)?;
    info!(
        files = summary.files,
        dirs = summary.dirs,
        destination = %destination.display(),
        "static assets copied"
    );
    Ok(Some(summary))
}

/// Recursively copy `source` into `destination`, following symlinks and
/// overwriting files that already exist.
pub fn copy_tree(source: &Path, destination: &Path) -> Result<CopySummary, DocsError> {
    let mut summary = CopySummary {
        destination: destination.to_path_buf(),
        ..CopySummary::default()
    };

    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry.map_err(|source_err| DocsError::Walk {
            root: source.to_path_buf(),
            source: source_err,
        })?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| DocsError::StripPrefix {
                path: entry.path().to_path_buf(),
                root: source.to_path_buf(),
            })?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| DocsError::io(&target, e))?;
            if !relative.as_os_str().is_empty() {
                summary.dirs += 1;
            }
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| DocsError::io(parent, e))?;
            }
            fs::copy(entry.path(), &target).map_err(|e| DocsError::io(entry.path(), e))?;
            summary.files += 1;
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_build_is_skipped() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::create_dir(src.path().join(STATIC_DIR)).unwrap();

        let result =
            on_build_finished(src.path(), out.path(), &BuildOutcome::Failed("latex".into())).unwrap();
        assert!(result.is_none());
        assert!(!out.path().join(STATIC_DIR).exists());
    }

    #[test]
    fn test_missing_static_is_skipped() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let result = on_build_finished(src.path(), out.path(), &BuildOutcome::Succeeded).unwrap();
        assert!(result.is_none());
    }
}
