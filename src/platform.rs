use crate::metadata::Metadata;
use crate::overview;

/// Phrases that together identify the shared README-style document.
pub const README_MARKERS: [&str; 2] = ["# Platform Documentation", "## Directory Structure"];

/// How a document is treated by the rest of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// The shared README, emitted for every platform.
    Readme,
    /// A directory landing page that gets a generated table of contents.
    Overview,
    Page,
}

impl DocumentKind {
    pub fn detect(text: &str) -> Self {
        if is_readme(text) {
            DocumentKind::Readme
        } else if overview::is_overview(text) {
            DocumentKind::Overview
        } else {
            DocumentKind::Page
        }
    }
}

pub fn is_readme(text: &str) -> bool {
    README_MARKERS.iter().all(|marker| text.contains(marker))
}

/// Whether `text` belongs in the output for `platform`.
pub fn is_relevant(text: &str, platform: &str) -> bool {
    is_readme(text) || Metadata::parse(text, platform).applies_to(platform)
}
