//! Post store - loads and validates every post from a document source

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::source::DocumentSource;
use super::Post;
use crate::error::{ContentError, Result};

/// What to do with a document that fails validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// The first bad document fails the whole load
    #[default]
    Strict,
    /// Bad documents are left out and reported
    Tolerant,
}

/// Outcome of a complete load
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Every valid post, in source order
    pub posts: Vec<Post>,
    /// One entry per rejected document; always empty in strict mode
    pub rejected: Vec<ContentError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Builds the authoritative post set from a document source
#[derive(Clone)]
pub struct PostStore {
    source: Arc<dyn DocumentSource>,
    mode: LoadMode,
}

impl PostStore {
    /// Create a strict store over `source`
    pub fn new<S: DocumentSource + 'static>(source: S) -> Self {
        Self {
            source: Arc::new(source),
            mode: LoadMode::Strict,
        }
    }

    pub fn with_mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    /// Load every post, failing on the first error
    pub fn load_all(&self) -> Result<Vec<Post>> {
        self.load().map(|report| report.posts)
    }

    /// Load every post, reporting rejected documents in tolerant mode
    pub fn load(&self) -> Result<LoadReport> {
        let start = Instant::now();
        let documents = self.source.documents()?;

        let mut report = LoadReport::default();
        // slug -> source of the document that claimed it first
        let mut seen: HashMap<String, String> = HashMap::new();

        for doc in &documents {
            let parsed = Post::from_bytes(&doc.source, &doc.bytes).and_then(|post| {
                match seen.get(&post.slug) {
                    Some(first) => Err(ContentError::DuplicateSlug {
                        slug: post.slug.clone(),
                        first: first.clone(),
                        second: post.source.clone(),
                    }),
                    None => Ok(post),
                }
            });

            match parsed {
                Ok(post) => {
                    seen.insert(post.slug.clone(), post.source.clone());
                    report.posts.push(post);
                }
                Err(e) if e.is_fatal() || self.mode == LoadMode::Strict => return Err(e),
                Err(e) => {
                    tracing::warn!("Rejected {}: {}", doc.source, e);
                    report.rejected.push(e);
                }
            }
        }

        tracing::info!(
            "Loaded {} posts from {} ({} rejected) in {:.2}ms",
            report.posts.len(),
            self.source.location(),
            report.rejected.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(report)
    }

    /// Load on the blocking pool, giving up after `timeout`
    pub async fn load_all_async(&self, timeout: Duration) -> Result<Vec<Post>> {
        self.load_async(timeout).await.map(|report| report.posts)
    }

    /// Like [`PostStore::load`], on the blocking pool with a timeout
    pub async fn load_async(&self, timeout: Duration) -> Result<LoadReport> {
        let store = self.clone();
        let location = self.source.location();
        let task = tokio::task::spawn_blocking(move || store.load());

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(ContentError::unavailable(location, join_error)),
            Err(_) => Err(ContentError::unavailable(
                location,
                format!("load timed out after {:?}", timeout),
            )),
        }
    }
}

/// The last complete post set, kept across failed reloads
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    posts: Option<Arc<Vec<Post>>>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reload from `store`; the held posts only change on full success
    pub fn refresh(&mut self, store: &PostStore) -> Result<Arc<Vec<Post>>> {
        let posts = Arc::new(store.load_all()?);
        self.posts = Some(Arc::clone(&posts));
        Ok(posts)
    }

    /// The last complete post set, if any load has succeeded
    pub fn current(&self) -> Option<Arc<Vec<Post>>> {
        self.posts.clone()
    }
}
