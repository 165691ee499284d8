use crate::filewalker::{README_FILE_NAME, SOURCE_EXTENSION};
use crate::platform::DocumentKind;
use crate::utils::{rewrite_source_links, strip_first_heading};
use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info};
use std::path::{Path, PathBuf};
use tokio::fs;

pub const OUTPUT_EXTENSION: &str = "md";

/// Writes extracted documents into a tree mirroring the source tree.
pub struct OutputWriter {
    source_root: PathBuf,
    output_root: PathBuf,
}

impl OutputWriter {
    pub fn new(source_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            output_root: output_root.into(),
        }
    }

    /// Maps a source document onto its output path.
    pub fn destination(&self, source: &Path) -> PathBuf {
        let rel_path = source.strip_prefix(&self.source_root).unwrap_or(source);
        let dest = self.output_root.join(rel_path);

        if dest.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION) {
            dest.with_extension(OUTPUT_EXTENSION)
        } else {
            dest
        }
    }

    /// Writes `content` for `source`, returning `false` when the document is
    /// nothing but a heading and was skipped.
    pub async fn write(&self, source: &Path, content: &str, kind: DocumentKind) -> Result<bool> {
        let dest = self.destination(source);

        let content = if kind == DocumentKind::Readme {
            rewrite_source_links(content)
        } else {
            if strip_first_heading(content).trim().is_empty() {
                debug!("Nothing beyond a heading, not writing: {}", dest.display());
                return Ok(false);
            }
            content.to_string()
        };

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create dir: {}", parent.display()))?;
        }

        fs::write(&dest, content)
            .await
            .with_context(|| format!("Failed to write {}", dest.display()))?;
        debug!("Wrote: {}", dest.display());

        Ok(true)
    }

    /// Creates a minimal `README.md` at the output root unless one exists.
    pub async fn ensure_readme(&self, platform: &str) -> Result<bool> {
        let path = self.output_root.join(README_FILE_NAME);

        if fs::try_exists(&path)
            .await
            .with_context(|| format!("Failed to check {}", path.display()))?
        {
            return Ok(false);
        }

        fs::create_dir_all(&self.output_root).await.with_context(|| {
            format!("Failed to create output dir: {}", self.output_root.display())
        })?;
        fs::write(&path, readme_template(platform))
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote: {}", path.display());

        Ok(true)
    }
}

fn readme_template(platform: &str) -> String {
    let updated = Utc::now().format("%Y-%m-%d");
    format!(
        "**README**\n\n# {platform} documentation\n\nUpdated {updated}\n\nMarkdown documentation extracted for the {platform} platform.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_destination_rewrites_extension() {
        let writer = OutputWriter::new("/src/pages", "/out/vue");
        assert_eq!(
            writer.destination(Path::new("/src/pages/build/auth/index.mdx")),
            PathBuf::from("/out/vue/build/auth/index.md")
        );
        assert_eq!(
            writer.destination(Path::new("/src/pages/README.md")),
            PathBuf::from("/out/vue/README.md")
        );
    }

    #[tokio::test]
    async fn test_skips_heading_only_pages() -> Result<()> {
        let dir = tempdir()?;
        let writer = OutputWriter::new(dir.path().join("src"), dir.path().join("out"));
        let source = dir.path().join("src/page.mdx");

        assert!(!writer.write(&source, "# Title\n\n  \n", DocumentKind::Page).await?);
        assert!(!writer.destination(&source).exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_writes_pages_and_creates_dirs() -> Result<()> {
        let dir = tempdir()?;
        let writer = OutputWriter::new(dir.path().join("src"), dir.path().join("out"));
        let source = dir.path().join("src/a/b/page.mdx");

        assert!(writer.write(&source, "# Title\n\nBody", DocumentKind::Page).await?);
        let written = std::fs::read_to_string(dir.path().join("out/a/b/page.md"))?;
        assert_eq!(written, "# Title\n\nBody");

        // overwrites on a second run
        assert!(writer.write(&source, "# Title\n\nNew", DocumentKind::Page).await?);
        let written = std::fs::read_to_string(dir.path().join("out/a/b/page.md"))?;
        assert_eq!(written, "# Title\n\nNew");
        Ok(())
    }

    #[tokio::test]
    async fn test_readme_is_always_written_with_rewritten_links() -> Result<()> {
        let dir = tempdir()?;
        let writer = OutputWriter::new(dir.path().join("src"), dir.path().join("out"));
        let source = dir.path().join("src/README.md");

        assert!(writer.write(&source, "", DocumentKind::Readme).await?);
        assert!(
            writer
                .write(&source, "**README**\n\npages/\n  index.mdx", DocumentKind::Readme)
                .await?
        );
        let written = std::fs::read_to_string(dir.path().join("out/README.md"))?;
        assert_eq!(written, "**README**\n\npages/\n  index.md");
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_readme_never_overwrites() -> Result<()> {
        let dir = tempdir()?;
        let writer = OutputWriter::new(dir.path().join("src"), dir.path().join("out"));

        assert!(writer.ensure_readme("vue").await?);
        let first = std::fs::read_to_string(dir.path().join("out/README.md"))?;
        assert!(first.contains("vue documentation"));

        std::fs::write(dir.path().join("out/README.md"), "custom")?;
        assert!(!writer.ensure_readme("vue").await?);
        assert_eq!(std::fs::read_to_string(dir.path().join("out/README.md"))?, "custom");
        Ok(())
    }
}
