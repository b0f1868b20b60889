//! The two SDK manuals.

use super::error::DocsError;
use super::schema::{
    AutosectionLabelOptions, HtmlOptions, LatexDocument, LatexOptions, ManualConfig, NumfigOptions,
};
use super::version::ProjectVersion;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::Path;

const COPYRIGHT: &str = "2024-2025, Alif Semiconductor";
const RELEASE_NOTES_RELEASE: &str = "2.1.0";

const APPNOTES_PREAMBLE: &str = r"
\usepackage{graphicx}
\usepackage{charter}
\usepackage[defaultsans]{lato}
\usepackage[T1]{fontenc}
\usepackage{inconsolata}
\usepackage{hyperref}
\usepackage{float}
\usepackage{titlesec}
\titlespacing*{\section}{0pt}{*0}{*0}
\titlespacing*{\subsection}{0pt}{*0}{*0}
\setlength{\parskip}{0pt}
\setlength{\parindent}{0pt}
\usepackage{multicol}
\usepackage{eso-pic}
\usepackage{tikz}
\usepackage{geometry}
\geometry{a4paper,left=20mm,top=20mm,right=20mm,bottom=20mm}
\usepackage{etoolbox}
\pretocmd{\tableofcontents}{\clearpage}{}{}
\AddToShipoutPictureFG*{\AtPageUpperLeft{\hspace*{0.1\textwidth}\vspace*{0.1\textheight}\includegraphics[width=2cm]{_static/logo.png}}}
\addto\captionsenglish{\renewcommand{\contentsname}{Table of Contents}}
\usepackage{textcomp}
\DeclareUnicodeCharacter{03BC}{\textmu}
\DeclareUnicodeCharacter{2212}{-}
\usepackage{url}
\usepackage{seqsplit}
\floatplacement{figure}{H}
\hyphenation{Unencrypted Encrypted}
\makeatletter
\def\FV@ObeyVerbFont{\ifx\FancyVerbFont\FV@Inconsolata\fontshape{n}\selectfont\else\FancyVerbFont\fi}
\makeatother
\usepackage{longtable}
\usepackage{needspace}
";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn theme_options(pairs: serde_json::Value) -> BTreeMap<String, serde_json::Value> {
    match pairs {
        serde_json::Value::Object(map) => map.into_iter().collect(),
        _ => BTreeMap::new(),
    }
}

/// Release notes manual.
pub fn release_notes() -> ManualConfig {
    let version = ProjectVersion::new(RELEASE_NOTES_RELEASE, RELEASE_NOTES_RELEASE);
    let project = "Release Notes of Zephyr Alif SDK".to_string();
    let author = "Alif Semiconductor".to_string();

    ManualConfig {
        copyright: COPYRIGHT.to_string(),
        title_prefix: "Zephyr Alif SDK Release Notes".to_string(),
        extensions: strings(&[
            "sphinx_copybutton",
            "sphinx.ext.todo",
            "sphinx.ext.autodoc",
            "sphinx.ext.viewcode",
            "sphinx_rtd_theme",
        ]),
        templates_path: strings(&["_templates"]),
        exclude_patterns: Vec::new(),
        epilog_includes: strings(&["/links.txt"]),
        epilog_substitutions: strings(&["release"]),
        html: HtmlOptions {
            theme: "sphinx_rtd_theme".to_string(),
            static_path: strings(&["_static"]),
            logo: "_static/logo.png".to_string(),
            favicon: "_static/favicon.png".to_string(),
            theme_options: theme_options(json!({
                "logo_only": true,
                "navigation_depth": 4,
                "collapse_navigation": false,
                "sticky_navigation": true,
            })),
            last_updated_fmt: "%b %d, %Y".to_string(),
            show_sphinx: false,
            css_files: strings(&["css/custom.css"]),
            js_files: Vec::new(),
            additional_pages: BTreeMap::new(),
            context_versions: Vec::new(),
        },
        latex: LatexOptions {
            papersize: "a4paper".to_string(),
            extraclassoptions: "openany,oneside".to_string(),
            pointsize: Some("11pt".to_string()),
            preamble: "\n\\usepackage{_static/latex/alif_semiconductor}\n".to_string(),
            documents: vec![LatexDocument {
                start_doc: "index".to_string(),
                target_name: "release_notes.tex".to_string(),
                title: project.clone(),
                author: author.clone(),
                document_class: "manual".to_string(),
                toctree_only: Some(false),
            }],
            logo: "_static/logo.png".to_string(),
            show_urls: "footnote".to_string(),
            domain_indices: false,
            show_pagerefs: false,
            theme: None,
            appendices: Vec::new(),
        },
        numfig: None,
        autosectionlabel: None,
        project,
        author,
        version,
    }
}

/// Application notes manual. The version comes from `<sdk_root>/VERSION`
/// when one is given and readable, otherwise 2.0.
pub fn appnotes(sdk_root: Option<&Path>) -> ManualConfig {
    let fallback = ProjectVersion::new("2.0", "2.0");
    let version = match sdk_root {
        Some(root) => ProjectVersion::detect(root, fallback),
        None => fallback,
    };
    let project = "Zephyr Alif SDK Application Notes".to_string();
    let author = " ".to_string();
    let release = version.release.clone();

    ManualConfig {
        copyright: COPYRIGHT.to_string(),
        title_prefix: "Zephyr Alif SDK Appnotes".to_string(),
        extensions: strings(&[
            "sphinx_copybutton",
            "sphinx.ext.todo",
            "sphinx.ext.extlinks",
            "sphinx.ext.autodoc",
            "sphinx.ext.graphviz",
            "sphinx_rtd_theme",
            "sphinx.ext.imgconverter",
            "sphinx_tabs.tabs",
            "sphinx.ext.autosectionlabel",
        ]),
        templates_path: strings(&["_templates"]),
        exclude_patterns: Vec::new(),
        epilog_includes: strings(&["/links.txt"]),
        epilog_substitutions: strings(&["version", "release"]),
        html: HtmlOptions {
            theme: "sphinx_rtd_theme".to_string(),
            static_path: strings(&["_static"]),
            logo: "_static/logo.png".to_string(),
            favicon: "_static/favicon.png".to_string(),
            theme_options: theme_options(json!({
                "logo_only": true,
                "collapse_navigation": true,
                "navigation_depth": 4,
                "titles_only": false,
                "prev_next_buttons_location": null,
                "style_nav_header_background": "#2980b9",
            })),
            last_updated_fmt: "%b %d, %Y".to_string(),
            show_sphinx: false,
            css_files: strings(&["css/custom.css"]),
            js_files: strings(&["js/custom.js"]),
            additional_pages: BTreeMap::from([("search".to_string(), "search.html".to_string())]),
            context_versions: vec![
                ("latest".to_string(), "/".to_string()),
                (release.clone(), format!("/{release}/")),
            ],
        },
        latex: LatexOptions {
            papersize: "a4paper".to_string(),
            extraclassoptions: "openany,oneside".to_string(),
            pointsize: None,
            preamble: APPNOTES_PREAMBLE.to_string(),
            documents: vec![LatexDocument {
                start_doc: "index".to_string(),
                target_name: "Alif_SDK_Appnotes.tex".to_string(),
                title: project.clone(),
                author: author.clone(),
                document_class: "manual".to_string(),
                toctree_only: None,
            }],
            logo: "_static/logo.png".to_string(),
            show_urls: "footnote".to_string(),
            domain_indices: false,
            show_pagerefs: true,
            theme: Some("manual".to_string()),
            appendices: Vec::new(),
        },
        numfig: Some(NumfigOptions {
            figure: "Figure %s".to_string(),
            table: "Table %s".to_string(),
            code_block: "Listing %s".to_string(),
        }),
        autosectionlabel: Some(AutosectionLabelOptions {
            prefix_document: true,
            maxdepth: 2,
        }),
        project,
        author,
        version,
    }
}

/// Look a manual up by its command-line name.
pub fn by_name(name: &str, sdk_root: Option<&Path>) -> Result<ManualConfig, DocsError> {
    match name {
        "release-notes" => Ok(release_notes()),
        "appnotes" => Ok(appnotes(sdk_root)),
        other => Err(DocsError::UnknownManual(other.to_string())),
    }
}
