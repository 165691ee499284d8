//! # docs2md Library
//!
//! Extracts platform-specific Markdown from a tree of platform-annotated MDX
//! documentation sources.
//!
//! For one target platform every `.mdx` source is checked against its
//! `meta.platforms` declaration, reduced to the content relevant to that
//! platform and written to a mirrored `.md` tree. Directory overview pages get
//! a generated table of contents.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use docs2md::{Config, run_extraction};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::new("src/pages", "out/vue").with_platform("vue");
//!     let summary = run_extraction(&config).await?;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod extractor;
pub mod filewalker;
pub mod metadata;
pub mod overview;
pub mod platform;
pub mod utils;
pub mod writer;

pub use cli::Config;
pub use extractor::ContentExtractor;
pub use filewalker::collect_documents;
pub use metadata::Metadata;
pub use platform::{DocumentKind, is_relevant};
pub use writer::OutputWriter;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fmt;

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub platform: String,
    /// Documents relevant to the platform.
    pub extracted: usize,
    /// Documents not relevant to the platform.
    pub skipped: usize,
    /// Documents whose extracted content was empty and got the fallback notice.
    pub empty: usize,
    /// Relevant documents that produced nothing worth writing.
    pub unwritten: usize,
    pub binary: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Extracted {} documents for {} ({} skipped for platform, {} with empty content)",
            self.extracted, self.platform, self.skipped, self.empty
        )
    }
}

/// Body used when a titled document has no content for the platform.
pub fn unavailable_notice(platform: &str) -> String {
    format!("This content is not available for the {platform} platform.")
}

/// Extracts every relevant document under the configured source root.
pub async fn run_extraction(config: &Config) -> Result<Summary> {
    let source_root = config.source_root.canonicalize().with_context(|| {
        format!(
            "Failed to resolve source root: {}",
            config.source_root.display()
        )
    })?;
    let platform = config.platform.as_str();

    let extractor = ContentExtractor::new(&config.strip_langs)?;
    let writer = OutputWriter::new(&source_root, &config.output_root);

    let documents = collect_documents(&source_root)?;
    info!(
        "Found {} documents under {}",
        documents.len(),
        source_root.display()
    );

    let mut summary = Summary {
        platform: platform.to_string(),
        ..Summary::default()
    };

    for path in documents {
        let Some(text) = utils::read_source(&path)? else {
            warn!("Skipping binary file: {}", path.display());
            summary.binary += 1;
            continue;
        };

        if !is_relevant(&text, platform) {
            debug!("Not relevant to {platform}: {}", path.display());
            summary.skipped += 1;
            continue;
        }

        let kind = DocumentKind::detect(&text);
        let content = extractor.extract(&text, platform, kind);
        let title = metadata::extract_title(&text);

        let output = match kind {
            DocumentKind::Readme => content,
            DocumentKind::Overview => {
                let children = overview::collect_children(&path).await?;
                let toc = overview::render_toc(&children);
                overview::compose(title.as_deref(), &content, &toc)
            }
            DocumentKind::Page => compose_page(title.as_deref(), content, platform, &mut summary),
        };

        summary.extracted += 1;
        if !writer.write(&path, &output, kind).await? {
            summary.unwritten += 1;
        }
    }

    writer.ensure_readme(platform).await?;

    Ok(summary)
}

fn compose_page(
    title: Option<&str>,
    content: String,
    platform: &str,
    summary: &mut Summary,
) -> String {
    let Some(title) = title else {
        return content;
    };

    let body = if content.is_empty() {
        summary.empty += 1;
        unavailable_notice(platform)
    } else {
        content
    };
    format!("# {title}\n\n{body}")
}
