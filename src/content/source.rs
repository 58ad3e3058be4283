//! Document sources - where raw post documents come from

use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{ContentError, Result};

/// An unparsed document and its location relative to the source root.
///
/// Contents stay as bytes; decoding is part of parsing so a badly encoded
/// file fails only itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub source: String,
    pub bytes: Vec<u8>,
}

impl RawDocument {
    pub fn new(source: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            source: source.into(),
            bytes: bytes.into(),
        }
    }
}

/// Anything that can hand the store a complete set of documents.
///
/// Implementations return either every document or an error; a partial
/// listing is never valid.
pub trait DocumentSource: Send + Sync {
    /// Read every document, ordered by `source`
    fn documents(&self) -> Result<Vec<RawDocument>>;

    /// Human-readable location for diagnostics
    fn location(&self) -> String;
}

/// Documents stored as files under a directory
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
    extensions: Vec<String>,
    exclude: Vec<Pattern>,
}

impl FsSource {
    /// Create a source reading `.md`, `.mdx` and `.markdown` files
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extensions: vec!["md".to_string(), "mdx".to_string(), "markdown".to_string()],
            exclude: Vec::new(),
        }
    }

    /// Replace the list of accepted extensions
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Skip relative paths matching any of the glob patterns
    pub fn with_exclude(mut self, patterns: &[String]) -> anyhow::Result<Self> {
        for p in patterns {
            let pattern = Pattern::new(p)
                .map_err(|e| anyhow::anyhow!("Invalid exclude pattern {:?}: {}", p, e))?;
            self.exclude.push(pattern);
        }
        Ok(self)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_content_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }

    fn is_excluded(&self, relative: &str) -> bool {
        self.exclude.iter().any(|p| p.matches(relative))
    }
}

impl DocumentSource for FsSource {
    fn documents(&self) -> Result<Vec<RawDocument>> {
        if !self.root.is_dir() {
            return Err(ContentError::unavailable(
                self.location(),
                "content directory does not exist",
            ));
        }

        let mut documents = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| ContentError::unavailable(self.location(), e))?;
            let path = entry.path();
            if !entry.file_type().is_file() || !self.is_content_file(path) {
                continue;
            }

            let relative = path
                .strip_prefix(&self.root)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");

            if self.is_excluded(&relative) {
                tracing::debug!("Skipping excluded document {}", relative);
                continue;
            }

            let bytes =
                fs::read(path).map_err(|e| ContentError::unavailable(path.display().to_string(), e))?;
            tracing::debug!("Discovered document {}", relative);
            documents.push(RawDocument::new(relative, bytes));
        }

        documents.sort_by(|a, b| a.source.cmp(&b.source));
        Ok(documents)
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}

/// An in-memory bundle of documents
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: Vec<RawDocument>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document, builder style
    pub fn with(mut self, source: &str, contents: impl AsRef<[u8]>) -> Self {
        self.documents
            .push(RawDocument::new(source, contents.as_ref().to_vec()));
        self
    }
}

impl FromIterator<RawDocument> for MemorySource {
    fn from_iter<T: IntoIterator<Item = RawDocument>>(iter: T) -> Self {
        Self {
            documents: iter.into_iter().collect(),
        }
    }
}

impl DocumentSource for MemorySource {
    fn documents(&self) -> Result<Vec<RawDocument>> {
        let mut documents = self.documents.clone();
        documents.sort_by(|a, b| a.source.cmp(&b.source));
        Ok(documents)
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, text: impl AsRef<[u8]>) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn test_fs_source_discovers_markdown() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "b.md", "b");
        write(tmp.path(), "a.mdx", "a");
        write(tmp.path(), "nested/c.markdown", "c");
        write(tmp.path(), "image.png", "png");

        let docs = FsSource::new(tmp.path()).documents().unwrap();
        let sources: Vec<_> = docs.iter().map(|d| d.source.as_str()).collect();
        assert_eq!(sources, vec!["a.mdx", "b.md", "nested/c.markdown"]);
        assert_eq!(docs[0].bytes, b"a");
    }

    #[test]
    fn test_fs_source_exclude_and_extensions() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "post.md", "p");
        write(tmp.path(), "_hidden.md", "h");
        write(tmp.path(), "_drafts/wip.md", "w");
        write(tmp.path(), "other.mdx", "o");

        let source = FsSource::new(tmp.path())
            .with_extensions(["md"])
            .with_exclude(&["_*".to_string(), "**/_*".to_string()])
            .unwrap();
        let docs = source.documents().unwrap();
        let sources: Vec<_> = docs.iter().map(|d| d.source.as_str()).collect();
        assert_eq!(sources, vec!["post.md"]);
    }

    #[test]
    fn test_fs_source_keeps_undecodable_bytes() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "latin1.md", b"caf\xe9");

        let docs = FsSource::new(tmp.path()).documents().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].bytes, b"caf\xe9");
    }

    #[test]
    fn test_fs_source_missing_root() {
        let tmp = TempDir::new().unwrap();
        let err = FsSource::new(tmp.path().join("missing"))
            .documents()
            .unwrap_err();
        assert!(matches!(err, ContentError::StoreUnavailable { .. }));
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        assert!(FsSource::new(".").with_exclude(&["[".to_string()]).is_err());
    }

    #[test]
    fn test_memory_source_sorted() {
        let source = MemorySource::new().with("z.md", "z").with("a.md", "a");
        let docs = source.documents().unwrap();
        assert_eq!(docs[0].source, "a.md");
        assert_eq!(source.location(), "<memory>");
    }
}
