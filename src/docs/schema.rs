//! Configuration record for one SDK manual.
//!
//! The record is handed to the documentation generator as JSON or TOML and
//! is not changed during the build.

use super::error::DocsError;
use super::version::ProjectVersion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualConfig {
    pub project: String,
    pub copyright: String,
    pub author: String,
    #[serde(flatten)]
    pub version: ProjectVersion,
    /// Prefix of the HTML title; the release is appended
    pub title_prefix: String,
    pub extensions: Vec<String>,
    pub templates_path: Vec<String>,
    pub exclude_patterns: Vec<String>,
    /// Files pulled into every page through the epilog
    pub epilog_includes: Vec<String>,
    /// Substitutions (`version`, `release`) defined in the epilog
    pub epilog_substitutions: Vec<String>,
    pub html: HtmlOptions,
    pub latex: LatexOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numfig: Option<NumfigOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autosectionlabel: Option<AutosectionLabelOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HtmlOptions {
    pub theme: String,
    pub static_path: Vec<String>,
    pub logo: String,
    pub favicon: String,
    pub theme_options: BTreeMap<String, serde_json::Value>,
    pub last_updated_fmt: String,
    pub show_sphinx: bool,
    pub css_files: Vec<String>,
    pub js_files: Vec<String>,
    pub additional_pages: BTreeMap<String, String>,
    /// `(label, url)` pairs for the version switcher
    pub context_versions: Vec<(String, String)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatexOptions {
    pub papersize: String,
    pub extraclassoptions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointsize: Option<String>,
    pub preamble: String,
    pub documents: Vec<LatexDocument>,
    pub logo: String,
    pub show_urls: String,
    pub domain_indices: bool,
    pub show_pagerefs: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub appendices: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatexDocument {
    pub start_doc: String,
    pub target_name: String,
    pub title: String,
    pub author: String,
    pub document_class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toctree_only: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumfigOptions {
    pub figure: String,
    pub table: String,
    pub code_block: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutosectionLabelOptions {
    pub prefix_document: bool,
    pub maxdepth: u32,
}

impl ManualConfig {
    pub fn html_title(&self) -> String {
        format!("{} - v{}", self.title_prefix, self.version.release)
    }

    /// reStructuredText appended to every source file.
    pub fn rst_epilog(&self) -> String {
        let mut epilog = String::from("\n");
        for include in &self.epilog_includes {
            epilog.push_str(&format!(".. include:: {include}\n"));
        }
        for name in &self.epilog_substitutions {
            let value = match name.as_str() {
                "version" => &self.version.version,
                "release" => &self.version.release,
                _ => continue,
            };
            epilog.push_str(&format!(".. |{name}| replace:: {value}\n"));
        }
        epilog
    }

    pub fn to_json(&self) -> Result<String, DocsError> {
        let mut value = serde_json::to_value(self).map_err(|e| DocsError::Render(e.to_string()))?;
        if let Some(map) = value.as_object_mut() {
            map.insert("html_title".into(), self.html_title().into());
            map.insert("rst_epilog".into(), self.rst_epilog().into());
        }
        serde_json::to_string_pretty(&value).map_err(|e| DocsError::Render(e.to_string()))
    }

    /// TOML rendering. TOML has no null, so null options such as
    /// `prev_next_buttons_location` only appear in [`ManualConfig::to_json`].
    pub fn to_toml(&self) -> Result<String, DocsError> {
        let mut value = serde_json::to_value(self).map_err(|e| DocsError::Render(e.to_string()))?;
        strip_nulls(&mut value);
        toml::to_string_pretty(&value).map_err(|e| DocsError::Render(e.to_string()))
    }
}

fn strip_nulls(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}
