//! Error types for loading posts

use thiserror::Error;

/// Result type for post store operations
pub type Result<T> = std::result::Result<T, ContentError>;

/// Everything that can go wrong while building the post set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// A required frontmatter field is missing or has the wrong shape
    #[error("{slug}: invalid frontmatter field `{field}`: {reason}")]
    SchemaValidation {
        slug: String,
        field: String,
        reason: String,
    },

    /// A date field does not parse, or `updatedDate` precedes `publishDate`
    #[error("{slug}: invalid date in `{field}` ({value:?}): {reason}")]
    InvalidDate {
        slug: String,
        field: String,
        value: String,
        reason: String,
    },

    /// Two documents resolve to the same slug
    #[error("duplicate slug `{slug}`: {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },

    /// The document source could not be read at all
    #[error("content store unavailable at {location}: {reason}")]
    StoreUnavailable { location: String, reason: String },
}

impl ContentError {
    /// Slug of the offending document, when the error concerns one document
    pub fn slug(&self) -> Option<&str> {
        match self {
            ContentError::SchemaValidation { slug, .. }
            | ContentError::InvalidDate { slug, .. }
            | ContentError::DuplicateSlug { slug, .. } => Some(slug),
            ContentError::StoreUnavailable { .. } => None,
        }
    }

    /// Whether this error must abort the whole load regardless of mode
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ContentError::DuplicateSlug { .. } | ContentError::StoreUnavailable { .. }
        )
    }

    pub(crate) fn schema(slug: &str, field: &str, reason: impl Into<String>) -> Self {
        ContentError::SchemaValidation {
            slug: slug.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unavailable(location: impl Into<String>, reason: impl ToString) -> Self {
        ContentError::StoreUnavailable {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_slug_and_field() {
        let err = ContentError::schema("hello-world", "title", "missing required field");
        assert_eq!(
            err.to_string(),
            "hello-world: invalid frontmatter field `title`: missing required field"
        );
        assert_eq!(err.slug(), Some("hello-world"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_fatal_kinds() {
        let dup = ContentError::DuplicateSlug {
            slug: "ddd".to_string(),
            first: "ddd.md".to_string(),
            second: "DDD.mdx".to_string(),
        };
        assert!(dup.is_fatal());
        assert!(ContentError::unavailable("/nope", "not found").is_fatal());
        assert_eq!(ContentError::unavailable("/nope", "not found").slug(), None);
    }
}
