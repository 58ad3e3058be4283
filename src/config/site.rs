//! Site configuration (postbook.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::content::LoadMode;
use crate::query::Visibility;

/// Configuration file looked up in the base directory
pub const CONFIG_FILE: &str = "postbook.yml";

/// Main site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Content
    pub content_dir: String,
    pub extensions: Vec<String>,
    /// Glob patterns, relative to the content directory
    pub exclude: Vec<String>,
    pub load_mode: LoadMode,
    pub load_timeout_secs: u64,

    // Listing
    /// Show drafts (preview builds only)
    pub drafts: bool,
    pub home_recent: usize,
    pub per_page: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: "src/content/blog".to_string(),
            extensions: vec!["md".to_string(), "mdx".to_string(), "markdown".to_string()],
            exclude: vec!["_*".to_string(), "**/_*".to_string()],
            load_mode: LoadMode::Strict,
            load_timeout_secs: 10,

            drafts: false,
            home_recent: 5,
            per_page: 10,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    pub fn visibility(&self) -> Visibility {
        Visibility::from_drafts(self.drafts)
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }
}
