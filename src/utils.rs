use anyhow::{Context, Result};
use content_inspector::{ContentType, inspect};
use log::debug;
use memmap2::MmapOptions;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::path::Path;
use std::str;

static FIRST_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#[ \t][^\n]*(?:\n|$)").expect("valid regex"));

static SOURCE_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.mdx\b").expect("valid regex"));

/// Reads a source document as text.
///
/// Returns `None` for binary content.
pub fn read_source(path: &Path) -> Result<Option<String>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;

    let len = file
        .metadata()
        .with_context(|| format!("Failed to stat file: {}", path.display()))?
        .len();
    if len == 0 {
        // Zero-length files cannot be mapped on every platform
        return Ok(Some(String::new()));
    }

    let mmap = unsafe {
        MmapOptions::new()
            .map(&file)
            .with_context(|| format!("Failed to mmap file: {}", path.display()))?
    };

    let sample_size = std::cmp::min(8192, mmap.len());
    if inspect(&mmap[..sample_size]) == ContentType::BINARY {
        return Ok(None);
    }

    match str::from_utf8(&mmap) {
        Ok(text) => Ok(Some(text.to_string())),
        Err(_) => {
            debug!(
                "Invalid UTF-8 in {}, decoding lossily",
                path.display()
            );
            Ok(Some(String::from_utf8_lossy(&mmap).into_owned()))
        }
    }
}

/// Removes the first top-level heading line.
pub fn strip_first_heading(content: &str) -> String {
    FIRST_HEADING_RE.replace(content, "").into_owned()
}

/// Rewrites `.mdx` references to the `.md` files they become.
pub fn rewrite_source_links(content: &str) -> String {
    SOURCE_LINK_RE.replace_all(content, ".md").into_owned()
}
