//! Reads the `meta = { title, platforms }` block embedded in MDX sources.
//!
//! The block is JavaScript, not JSON, so parsing is deliberately forgiving:
//! a platforms array that fails to parse strictly falls back to a token
//! search over the raw literal.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Wildcard platform identifier.
pub const ALL_PLATFORMS: &str = "all";

/// Platforms searched for when a platforms array cannot be parsed strictly.
pub const KNOWN_PLATFORMS: &[&str] = &[
    "android",
    "angular",
    "flutter",
    "javascript",
    "nextjs",
    "react",
    "react-native",
    "swift",
    "vue",
];

static META_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)(?:(?:export\s+)?(?:const|let|var)\s+)?\bmeta\s*=\s*\{.*?\}\s*;?")
        .expect("valid regex")
});

static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\btitle\s*:\s*(?:'([^']*)'|"([^"]*)"|`([^`]*)`)"#).expect("valid regex")
});

static PLATFORMS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\bplatforms\s*:\s*(\[.*?\])").expect("valid regex"));

static LINE_COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)//[^\n]*$").expect("valid regex"));

static TRAILING_COMMA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*\]").expect("valid regex"));

/// Title and platform declarations of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: Option<String>,
    /// `None` means the document applies to every platform.
    pub platforms: Option<BTreeSet<String>>,
}

impl Metadata {
    pub fn parse(text: &str, target: &str) -> Self {
        Self {
            title: extract_title(text),
            platforms: read_platforms(text, target),
        }
    }

    /// Whether the declared platforms cover `platform`.
    pub fn applies_to(&self, platform: &str) -> bool {
        self.platforms
            .as_ref()
            .is_none_or(|set| set.contains(platform) || set.contains(ALL_PLATFORMS))
    }
}

/// Returns the span of the first metadata-assignment block.
pub fn find_block(text: &str) -> Option<&str> {
    META_BLOCK_RE.find(text).map(|m| m.as_str())
}

/// Removes the first metadata-assignment block from `text`.
pub fn strip_block(text: &str) -> String {
    META_BLOCK_RE.replace(text, "").into_owned()
}

pub fn extract_title(text: &str) -> Option<String> {
    let block = find_block(text)?;
    let caps = TITLE_RE.captures(block)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().trim().to_string())
}

/// Reads the declared platform set, searching for `target` among the known
/// platforms if the array literal is malformed.
pub fn read_platforms(text: &str, target: &str) -> Option<BTreeSet<String>> {
    let block = find_block(text)?;
    let literal = PLATFORMS_RE.captures(block)?.get(1)?.as_str();

    match parse_string_array(literal) {
        Some(list) => Some(list.into_iter().collect()),
        None => {
            debug!("Malformed platforms array, falling back to token search: {literal}");
            Some(scan_platform_tokens(literal, target))
        }
    }
}

/// Parses a JavaScript array literal of strings.
///
/// Line comments and trailing commas are dropped and single quotes are
/// turned into double quotes before a strict JSON parse.
pub fn parse_string_array(literal: &str) -> Option<Vec<String>> {
    let normalized = LINE_COMMENT_RE.replace_all(literal, "");
    let normalized = TRAILING_COMMA_RE.replace_all(&normalized, "]");
    let normalized = normalized.replace('\'', "\"");
    serde_json::from_str(&normalized).ok()
}

fn scan_platform_tokens(literal: &str, target: &str) -> BTreeSet<String> {
    let haystack = literal.to_lowercase();

    let mut candidates: Vec<&str> = KNOWN_PLATFORMS.to_vec();
    candidates.extend([target, ALL_PLATFORMS]);

    candidates
        .into_iter()
        .filter(|token| {
            let token = token.to_lowercase();
            haystack.contains(&format!("'{token}'")) || haystack.contains(&format!("\"{token}\""))
        })
        .map(str::to_string)
        .collect()
}
