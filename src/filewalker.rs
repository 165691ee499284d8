use anyhow::{Context, Result, bail};
use ignore::{DirEntry, WalkBuilder};
use log::warn;
use std::path::{Component, Path, PathBuf};

/// Extension of documentation sources.
pub const SOURCE_EXTENSION: &str = "mdx";

/// The one non-MDX file carried into every platform's output.
pub const README_FILE_NAME: &str = "README.md";

/// Collects every eligible document under `root` in filesystem order.
///
/// Placeholder directories such as `[platform]` are never descended into, and
/// any file whose path relative to `root` still contains one is dropped.
pub fn collect_documents(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("Source root is not a directory: {}", root.display());
    }
    let root = root
        .canonicalize()
        .with_context(|| format!("Failed to resolve source root: {}", root.display()))?;

    let mut builder = WalkBuilder::new(&root);

    // Skip hidden entries, but walk the docs tree as-is otherwise
    builder
        .hidden(true)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false);
    builder.filter_entry(|e| !(is_dir(e) && is_placeholder_entry(e)));

    let mut documents = Vec::new();

    for result in builder.build() {
        match result {
            Ok(entry) => {
                let path = entry.path();

                if path.is_file() && is_eligible(path) && !has_placeholder_segment(&root, path) {
                    documents.push(path.to_path_buf());
                }
            }
            Err(err) => {
                warn!("Error walking path: {err}");
            }
        }
    }

    Ok(documents)
}

/// Whether a file name marks a document the extractor handles.
pub fn is_eligible(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
        return false;
    };
    name == README_FILE_NAME || name.ends_with(&format!(".{SOURCE_EXTENSION}"))
}

/// A name that is a bracketed template token, e.g. `[platform]`.
pub fn is_placeholder(name: &str) -> bool {
    name.len() > 2 && name.starts_with('[') && name.ends_with(']')
}

/// Checks every segment of `path` relative to `root` for a placeholder name.
pub fn has_placeholder_segment(root: &Path, path: &Path) -> bool {
    let rel_path = path.strip_prefix(root).unwrap_or(path);
    rel_path.components().any(|c| match c {
        Component::Normal(segment) => segment.to_str().is_some_and(is_placeholder),
        _ => false,
    })
}

fn is_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_some_and(|t| t.is_dir())
}

fn is_placeholder_entry(entry: &DirEntry) -> bool {
    entry
        .path()
        .file_name()
        .and_then(|s| s.to_str())
        .is_some_and(is_placeholder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn names(root: &Path, docs: &[PathBuf]) -> Vec<String> {
        let root = root.canonicalize().unwrap();
        let mut names: Vec<String> = docs
            .iter()
            .map(|p| {
                p.strip_prefix(&root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_placeholder_names() {
        assert!(is_placeholder("[platform]"));
        assert!(is_placeholder("[...slug]"));
        assert!(!is_placeholder("[]"));
        assert!(!is_placeholder("platform"));
        assert!(!is_placeholder("[platform"));
        assert!(!is_placeholder("a[b]"));
    }

    #[test]
    fn test_eligible_files() {
        assert!(is_eligible(Path::new("docs/index.mdx")));
        assert!(is_eligible(Path::new("README.md")));
        assert!(!is_eligible(Path::new("notes.md")));
        assert!(!is_eligible(Path::new("readme.md")));
        assert!(!is_eligible(Path::new("image.png")));
    }

    #[test]
    fn test_placeholder_segment_relative_to_root() {
        let root = Path::new("/docs/[site]");
        assert!(!has_placeholder_segment(root, Path::new("/docs/[site]/a/b.mdx")));
        assert!(has_placeholder_segment(root, Path::new("/docs/[site]/[platform]/b.mdx")));
        assert!(has_placeholder_segment(root, Path::new("/docs/[site]/a/[x]/c/b.mdx")));
    }

    #[test]
    fn test_collects_eligible_documents() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("build/auth")).unwrap();
        fs::create_dir_all(root.join("[platform]/nested")).unwrap();
        fs::create_dir_all(root.join(".hidden")).unwrap();
        fs::write(root.join("index.mdx"), "a").unwrap();
        fs::write(root.join("README.md"), "readme").unwrap();
        fs::write(root.join("notes.md"), "not eligible").unwrap();
        fs::write(root.join("build/auth/index.mdx"), "b").unwrap();
        fs::write(root.join("build/auth/setup.mdx"), "c").unwrap();
        fs::write(root.join("[platform]/index.mdx"), "skip").unwrap();
        fs::write(root.join("[platform]/nested/page.mdx"), "skip").unwrap();
        fs::write(root.join(".hidden/page.mdx"), "skip").unwrap();

        let docs = collect_documents(root).unwrap();

        assert_eq!(
            names(root, &docs),
            vec![
                "README.md",
                "build/auth/index.mdx",
                "build/auth/setup.mdx",
                "index.mdx"
            ]
        );
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(collect_documents(&dir.path().join("missing")).is_err());
    }
}
