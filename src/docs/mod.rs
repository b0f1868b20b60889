//! Configuration of the SDK manuals and their post-build hook.
//!
//! Two manuals are described: the release notes and the application notes.
//! Each is a fixed [`ManualConfig`] except for the application notes version,
//! which is read from the SDK tree.

pub mod error;
pub mod hooks;
pub mod presets;
pub mod schema;
pub mod version;

pub use error::DocsError;
pub use hooks::{copy_tree, on_build_finished, BuildOutcome, CopySummary, STATIC_DIR};
pub use presets::{appnotes, by_name, release_notes};
pub use schema::{HtmlOptions, LatexDocument, LatexOptions, ManualConfig};
pub use version::ProjectVersion;

/// Command-line names of the known manuals.
pub const MANUAL_NAMES: [&str; 2] = ["release-notes", "appnotes"];
