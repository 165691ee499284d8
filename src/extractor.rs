//! Platform-specific content extraction from MDX sources.
//!
//! Extraction runs in four ordered stages:
//!
//! 1. scaffolding removal (metadata, functions, imports/exports, `return` lines)
//! 2. the README short-circuit
//! 3. `<InlineFilter>` resolution for the target platform
//! 4. cleanup of leftover markup, foreign code fences and blank lines
//!
//! Everything is regex driven. Conditional blocks do not nest: the first
//! closing tag after an opening tag ends the block.

use crate::metadata::{self, ALL_PLATFORMS};
use crate::platform::DocumentKind;
use anyhow::{Context, Result};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

pub const FILTER_CLOSE_TAG: &str = "</InlineFilter>";

/// Header placed above the README's directory tree.
pub const README_HEADER: &str = "**README**\n\n";

/// Top-level function definitions only. Indented ones belong to code samples.
static FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?ms)^(?:export\s+)?(?:default\s+)?",
        r"(?:(?:async\s+)?function\s*\*?\s*\w*\s*\([^)]*\)",
        r"|(?:const|let|var)\s+\w+\s*=\s*(?:async\s*)?\([^)]*\)\s*=>)",
        r"\s*\{.*?^\};?[ \t]*$\n?",
    ))
    .expect("valid regex")
});

/// Imports whose `{ ... }` specifier list wraps over several lines.
static MULTILINE_IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^import\s*(?:type\s+)?(?:[\w$]+\s*,\s*)?\{[^}]*\}",
        r#"\s*from\s*['"][^'"\n]*['"];?[ \t]*(?:\n|$)"#,
    ))
    .expect("valid regex")
});

static IMPORT_EXPORT_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(?:import|export)\b[^\n]*(?:\n|$)").expect("valid regex"));

static RETURN_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^return\b[^\n]*(?:\n|$)").expect("valid regex"));

static LEADING_ARTIFACT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A(?:\s*[};])+").expect("valid regex"));

static TREE_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?:Updated [^\n]*\n)?(?:src/pages/|pages/)[ \t]*$").expect("valid regex")
});

static FILTER_OPEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<InlineFilter\s+filters=\{\s*(\[[^\]]*\])\s*\}\s*>").expect("valid regex")
});

static UNRESOLVED_FILTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<InlineFilter\b[^>]*>.*?</InlineFilter>").expect("valid regex")
});

static SELF_CLOSING_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[A-Za-z][\w.]*(?:\s[^<>]*?)?/>").expect("valid regex"));

static BLANK_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t\r]*\n").expect("valid regex"));

/// Turns raw MDX into platform-specific Markdown.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    foreign_fence: Option<Regex>,
}

impl ContentExtractor {
    /// Creates an extractor that drops fenced code blocks tagged with any of
    /// `strip_langs`.
    pub fn new(strip_langs: &[String]) -> Result<Self> {
        let foreign_fence = if strip_langs.is_empty() {
            None
        } else {
            let langs = strip_langs
                .iter()
                .map(|lang| regex::escape(lang))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"(?ms)^[ \t]*```(?:{langs})\b[^\n]*\n.*?^[ \t]*```[ \t]*$\n?");
            Some(
                Regex::new(&pattern)
                    .with_context(|| format!("Invalid fence languages: {strip_langs:?}"))?,
            )
        };

        Ok(Self { foreign_fence })
    }

    pub fn extract(&self, text: &str, platform: &str, kind: DocumentKind) -> String {
        let stripped = strip_scaffolding(text);

        if kind == DocumentKind::Readme {
            return readme_body(&stripped);
        }

        let resolved = resolve_conditionals(&stripped, platform);
        self.cleanup(&resolved)
    }

    fn cleanup(&self, text: &str) -> String {
        let mut result = UNRESOLVED_FILTER_RE.replace_all(text, "").into_owned();
        result = SELF_CLOSING_TAG_RE.replace_all(&result, "").into_owned();
        result = result.trim().to_string();

        if let Some(fence) = &self.foreign_fence {
            result = fence.replace_all(&result, "").into_owned();
        }

        result = BLANK_LINE_RE.replace_all(&result, "").into_owned();
        result = LEADING_ARTIFACT_RE.replace(&result, "").into_owned();
        result.trim().to_string()
    }
}

/// Removes metadata, function definitions, module statements and the stray
/// braces they leave behind.
pub fn strip_scaffolding(text: &str) -> String {
    let mut result = metadata::strip_block(text);
    result = FUNCTION_RE.replace_all(&result, "").into_owned();
    result = MULTILINE_IMPORT_RE.replace_all(&result, "").into_owned();
    result = IMPORT_EXPORT_LINE_RE.replace_all(&result, "").into_owned();
    result = RETURN_LINE_RE.replace_all(&result, "").into_owned();
    LEADING_ARTIFACT_RE.replace(&result, "").into_owned()
}

/// The README keeps only its directory tree, starting at the root label
/// (and the `Updated` line directly above it, if any).
fn readme_body(text: &str) -> String {
    match TREE_MARKER_RE.find(text) {
        Some(marker) => format!("{README_HEADER}{}", &text[marker.start()..]),
        None => README_HEADER.to_string(),
    }
}

/// Replaces each `<InlineFilter>` block with its inner text when `platform`
/// is listed, or with nothing when it is not.
///
/// Opening tags without a closing tag are left in place.
pub fn resolve_conditionals(text: &str, platform: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut copied = 0;
    let mut search = 0;

    while let Some(caps) = FILTER_OPEN_RE.captures_at(text, search) {
        let Some(open) = caps.get(0) else { break };

        let Some(offset) = text[open.end()..].find(FILTER_CLOSE_TAG) else {
            debug!("Unmatched conditional block at byte {}", open.start());
            search = open.end();
            continue;
        };
        let inner_end = open.end() + offset;

        output.push_str(&text[copied..open.start()]);

        let filters = caps
            .get(1)
            .and_then(|m| metadata::parse_string_array(m.as_str()))
            .unwrap_or_default();
        if filters.iter().any(|f| f == platform || f == ALL_PLATFORMS) {
            output.push_str(&text[open.end()..inner_end]);
        }

        copied = inner_end + FILTER_CLOSE_TAG.len();
        search = copied;
    }

    output.push_str(&text[copied..]);
    output
}
