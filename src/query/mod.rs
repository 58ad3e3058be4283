//! Post queries - pure functions over a loaded post set
//!
//! Nothing here mutates its input or fails: given posts that came out of the
//! store, every operation is total.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::content::Post;

/// Whether drafts may be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Public listings: drafts are never shown
    #[default]
    Production,
    /// Staging or local preview: drafts are shown
    Preview,
}

impl Visibility {
    pub fn from_drafts(include_drafts: bool) -> Self {
        if include_drafts {
            Visibility::Preview
        } else {
            Visibility::Production
        }
    }
}

/// Direction of chronological ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    /// Newest first
    #[default]
    Descending,
}

/// One page of an ordered post sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSlice {
    /// 1-based page number
    pub current: usize,
    pub total: usize,
    pub posts: Vec<Post>,
}

impl PageSlice {
    pub fn prev(&self) -> Option<usize> {
        (self.current > 1).then(|| self.current - 1)
    }

    pub fn next(&self) -> Option<usize> {
        (self.current < self.total).then(|| self.current + 1)
    }
}

/// Remove every draft
pub fn filter_published(posts: &[Post]) -> Vec<Post> {
    posts.iter().filter(|p| !p.is_draft()).cloned().collect()
}

/// Apply the caller's draft visibility
pub fn visible(posts: &[Post], visibility: Visibility) -> Vec<Post> {
    match visibility {
        Visibility::Production => filter_published(posts),
        Visibility::Preview => posts.to_vec(),
    }
}

/// Order by publish date; equal dates fall back to ascending slug
pub fn sort_by_date(posts: &[Post], order: SortOrder) -> Vec<Post> {
    let mut sorted = posts.to_vec();
    sorted.sort_by(|a, b| {
        let by_date = a.publish_date().cmp(&b.publish_date());
        let by_date = match order {
            SortOrder::Ascending => by_date,
            SortOrder::Descending => by_date.reverse(),
        };
        by_date.then_with(|| a.slug.cmp(&b.slug))
    });
    sorted
}

/// First `n` posts; the whole sequence when it is shorter
pub fn take(posts: &[Post], n: usize) -> Vec<Post> {
    posts.iter().take(n).cloned().collect()
}

/// Posts carrying exactly `tag`, in input order
pub fn filter_by_tag(posts: &[Post], tag: &str) -> Vec<Post> {
    posts.iter().filter(|p| p.has_tag(tag)).cloned().collect()
}

/// Tag to visible posts, keyed in order of first appearance.
///
/// Posts hidden under `visibility` contribute neither keys nor members.
pub fn group_by_tag(posts: &[Post], visibility: Visibility) -> IndexMap<String, Vec<Post>> {
    let mut groups: IndexMap<String, Vec<Post>> = IndexMap::new();
    for post in posts
        .iter()
        .filter(|p| visibility == Visibility::Preview || !p.is_draft())
    {
        for tag in &post.frontmatter.tags {
            groups.entry(tag.clone()).or_default().push(post.clone());
        }
    }
    groups
}

/// Tag usage counts, most used first, ties by name
pub fn tag_counts(posts: &[Post]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for post in posts {
        for tag in &post.frontmatter.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut counts: Vec<_> = counts
        .into_iter()
        .map(|(tag, count)| (tag.to_string(), count))
        .collect();
    counts.sort_by(|a, b| match b.1.cmp(&a.1) {
        Ordering::Equal => a.0.cmp(&b.0),
        other => other,
    });
    counts
}

/// Split an ordered sequence into pages of `per_page` posts.
///
/// `per_page == 0` puts everything on one page.
pub fn paginate(posts: &[Post], per_page: usize) -> Vec<PageSlice> {
    if posts.is_empty() {
        return Vec::new();
    }
    let per_page = if per_page == 0 { posts.len() } else { per_page };
    let total = posts.len().div_ceil(per_page);

    posts
        .chunks(per_page)
        .enumerate()
        .map(|(i, chunk)| PageSlice {
            current: i + 1,
            total,
            posts: chunk.to_vec(),
        })
        .collect()
}

pub fn find_by_slug<'a>(posts: &'a [Post], slug: &str) -> Option<&'a Post> {
    posts.iter().find(|p| p.slug == slug)
}

/// Neighbours of `slug` in an ordered sequence: (previous, next)
pub fn adjacent<'a>(posts: &'a [Post], slug: &str) -> (Option<&'a Post>, Option<&'a Post>) {
    let Some(pos) = posts.iter().position(|p| p.slug == slug) else {
        return (None, None);
    };
    let prev = pos.checked_sub(1).and_then(|i| posts.get(i));
    (prev, posts.get(pos + 1))
}
