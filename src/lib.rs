//! postbook: content indexing and query layer for a Markdown blog
//!
//! The [`content`] module loads and validates post documents into an
//! immutable set of [`content::Post`] records; the [`query`] module answers
//! listing questions over that set. Rendering is left to the caller.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod query;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use error::ContentError;

/// The main application handle
#[derive(Debug, Clone)]
pub struct Postbook {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the post documents
    pub content_dir: PathBuf,
}

impl Postbook {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(config::CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {:?}, using default configuration", config_path);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        Self {
            config,
            base_dir,
            content_dir,
        }
    }

    /// Build a post store over the content directory
    pub fn store(&self) -> Result<content::PostStore> {
        let source = content::FsSource::new(&self.content_dir)
            .with_extensions(self.config.extensions.iter().cloned())
            .with_exclude(&self.config.exclude)?;
        Ok(content::PostStore::new(source).with_mode(self.config.load_mode))
    }

    /// Load every post visible under the configured draft policy, newest first
    pub async fn listing(&self) -> Result<Listing> {
        let report = self
            .store()?
            .load_async(self.config.load_timeout())
            .await?;
        let posts = query::visible(&report.posts, self.config.visibility());
        Ok(Listing {
            posts: query::sort_by_date(&posts, query::SortOrder::Descending),
            rejected: report.rejected,
        })
    }
}

/// Visible posts plus the documents a tolerant load left out
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub posts: Vec<content::Post>,
    pub rejected: Vec<ContentError>,
}

impl Listing {
    /// Footer warning that the listing is missing rejected documents
    pub fn incomplete_notice(&self) -> Option<String> {
        if self.rejected.is_empty() {
            return None;
        }
        let mut notice = format!(
            "Incomplete: {} document(s) rejected and not shown:\n",
            self.rejected.len()
        );
        for error in &self.rejected {
            notice.push_str(&format!("  {}\n", error));
        }
        Some(notice)
    }
}
