//! Table-of-contents generation for directory overview documents.
//!
//! An overview document renders `<Overview childPageNodes={...} />` at
//! runtime. Here the component is replaced by a static `# Overview` list of
//! the directory's pages and sub-sections, read straight from the source
//! tree in directory-listing order.

use crate::filewalker::{SOURCE_EXTENSION, is_placeholder};
use crate::metadata::extract_title;
use crate::utils::read_source;
use anyhow::{Context, Result};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tokio::fs;

pub const TOC_HEADER: &str = "# Overview";

/// File name of a directory's landing document.
pub const INDEX_FILE_NAME: &str = "index.mdx";

static OVERVIEW_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<Overview\b[^>]*?\bchildPageNodes\b[^>]*?/?>").expect("valid regex")
});

static CHILD_NODES_BINDING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:(?:export\s+)?(?:const|let|var)\s+)?childPageNodes\s*=[^\n]*(?:\n|$)",
    )
    .expect("valid regex")
});

pub fn is_overview(text: &str) -> bool {
    OVERVIEW_TAG_RE.is_match(text)
}

/// Removes the overview component and any `childPageNodes` binding.
pub fn strip_overview_markup(content: &str) -> String {
    let result = OVERVIEW_TAG_RE.replace_all(content, "");
    let result = CHILD_NODES_BINDING_RE.replace_all(&result, "");
    result.trim().to_string()
}

/// One line of the generated table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    pub title: String,
    /// Link relative to the overview's output file.
    pub link: String,
}

impl ChildEntry {
    fn render(&self) -> String {
        format!("- [{}]({})", self.title, self.link)
    }
}

/// Lists the sections and pages next to `document`.
///
/// Sub-directories count only when they hold an index document. The overview
/// document itself and the directory's index are never listed.
pub async fn collect_children(document: &Path) -> Result<Vec<ChildEntry>> {
    let Some(dir) = document.parent() else {
        return Ok(Vec::new());
    };
    let own_name = document.file_name();

    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to list directory: {}", dir.display()))?;

    let mut children = Vec::new();

    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("Failed to read entry in: {}", dir.display()))?
    {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }

        let file_type = entry
            .file_type()
            .await
            .with_context(|| format!("Failed to stat: {}", path.display()))?;

        if file_type.is_dir() {
            if is_placeholder(&name) {
                continue;
            }
            let index = path.join(INDEX_FILE_NAME);
            let has_index = fs::try_exists(&index)
                .await
                .with_context(|| format!("Failed to check for index: {}", index.display()))?;
            if !has_index {
                continue;
            }
            let title = read_title(&index)?.unwrap_or_else(|| name.clone());
            children.push(ChildEntry {
                title,
                link: format!("./{name}/index.md"),
            });
        } else if file_type.is_file() {
            if name == INDEX_FILE_NAME || own_name.is_some_and(|own| own == name.as_str()) {
                continue;
            }
            let Some(stem) = name.strip_suffix(&format!(".{SOURCE_EXTENSION}")) else {
                continue;
            };
            let title = read_title(&path)?.unwrap_or_else(|| stem.to_string());
            children.push(ChildEntry {
                title,
                link: format!("./{stem}.md"),
            });
        }
    }

    debug!("Overview {} lists {} entries", document.display(), children.len());
    Ok(children)
}

/// Binary siblings are listed under their file name.
fn read_title(path: &Path) -> Result<Option<String>> {
    Ok(read_source(path)?.and_then(|text| extract_title(&text)))
}

/// Renders the `# Overview` section. The header is emitted even with no entries.
pub fn render_toc(children: &[ChildEntry]) -> String {
    let mut toc = String::from(TOC_HEADER);
    if !children.is_empty() {
        toc.push_str("\n\n");
        let lines: Vec<String> = children.iter().map(ChildEntry::render).collect();
        toc.push_str(&lines.join("\n"));
    }
    toc
}

/// Joins title heading, extracted content and table of contents, dropping
/// the first two when empty.
pub fn compose(title: Option<&str>, content: &str, toc: &str) -> String {
    let mut parts = Vec::new();
    if let Some(title) = title {
        parts.push(format!("# {title}"));
    }
    let content = strip_overview_markup(content);
    if !content.is_empty() {
        parts.push(content);
    }
    parts.push(toc.to_string());
    parts.join("\n\n")
}
