//! Post model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::frontmatter::{self, FrontMatter, FRONTMATTER_FIELD};
use crate::error::{ContentError, Result};

const BODY_FIELD: &str = "body";
const SLUG_FIELD: &str = "slug";

/// A blog post, immutable once loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Unique key, derived from the source path unless overridden
    pub slug: String,

    /// Validated front-matter
    pub frontmatter: FrontMatter,

    /// Raw body, handed to the renderer unmodified
    pub body: String,

    /// Source location relative to the content root
    pub source: String,
}

impl Post {
    /// Create a post from already validated parts
    pub fn new(slug: &str, source: &str, frontmatter: FrontMatter, body: &str) -> Self {
        Self {
            slug: slug.to_string(),
            frontmatter,
            body: body.to_string(),
            source: source.to_string(),
        }
    }

    /// Decode raw document bytes as UTF-8, then parse them.
    ///
    /// A bad encoding is reported against the part of the document it
    /// falls in, so it rejects only this document.
    pub fn from_bytes(source: &str, bytes: &[u8]) -> Result<Self> {
        match std::str::from_utf8(bytes) {
            Ok(text) => Self::parse(source, text),
            Err(e) => {
                let valid = &bytes[..e.valid_up_to()];
                // valid_up_to always ends on a char boundary
                let prefix = std::str::from_utf8(valid).unwrap_or_default();
                let field = if frontmatter::split(prefix).is_ok() {
                    BODY_FIELD
                } else {
                    FRONTMATTER_FIELD
                };
                Err(ContentError::schema(
                    &label(source),
                    field,
                    format!("not valid UTF-8 at byte {}", e.valid_up_to()),
                ))
            }
        }
    }

    /// Parse and validate a document read from `source`
    pub fn parse(source: &str, text: &str) -> Result<Self> {
        let derived = label(source);

        let (yaml, body) = frontmatter::split(text)
            .map_err(|reason| ContentError::schema(&derived, FRONTMATTER_FIELD, reason))?;
        let map = frontmatter::parse_mapping(yaml, &derived)?;
        let slug = match frontmatter::slug_override(&map) {
            Some(slug) => slug,
            None => slug_from_source(source),
        };
        if slug.is_empty() {
            return Err(ContentError::schema(
                &derived,
                SLUG_FIELD,
                "source path does not produce a slug",
            ));
        }
        let frontmatter = FrontMatter::from_mapping(&map, &slug)?;

        Ok(Self {
            slug,
            frontmatter,
            body: body.to_string(),
            source: source.to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.frontmatter.title
    }

    pub fn publish_date(&self) -> NaiveDate {
        self.frontmatter.publish_date
    }

    pub fn is_draft(&self) -> bool {
        self.frontmatter.draft
    }

    /// Exact, case-sensitive tag membership
    pub fn has_tag(&self, tag: &str) -> bool {
        self.frontmatter.tags.iter().any(|t| t == tag)
    }
}

/// Slug used to label errors; falls back to the source path when the
/// path slugifies to nothing
fn label(source: &str) -> String {
    let slug = slug_from_source(source);
    if slug.is_empty() {
        source.to_string()
    } else {
        slug
    }
}

/// Derive a slug from a path relative to the content root.
///
/// The extension is dropped, every segment is slugified and a trailing
/// `index` segment collapses into its directory.
pub fn slug_from_source(source: &str) -> String {
    let normalized = source.replace('\\', "/");
    let without_ext = match normalized.rsplit_once('.') {
        Some((stem, ext)) if !ext.contains('/') && !stem.is_empty() && !stem.ends_with('/') => {
            stem
        }
        _ => normalized.as_str(),
    };

    let mut segments: Vec<String> = without_ext
        .split('/')
        .filter(|s| !s.is_empty())
        .map(slug::slugify)
        .filter(|s| !s.is_empty())
        .collect();

    if segments.len() > 1 && segments.last().map(String::as_str) == Some("index") {
        segments.pop();
    }

    segments.join("/")
}
