//! List posts

use anyhow::Result;

use crate::content::Post;
use crate::query;
use crate::{Listing, Postbook};

/// Options for the `list` command
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub tag: Option<String>,
    pub limit: Option<usize>,
    /// 1-based page, sized by `per_page`
    pub page: Option<usize>,
    pub json: bool,
}

/// List visible posts, newest first
pub async fn run(book: &Postbook, options: &ListOptions) -> Result<()> {
    let listing = book.listing().await?;
    let posts = select(&listing.posts, options, book.config.per_page)?;
    print(&posts, options.json)?;
    warn_incomplete(&listing);
    Ok(())
}

/// Show the home page preview
pub async fn home(book: &Postbook, json: bool) -> Result<()> {
    let listing = book.listing().await?;
    print(&query::take(&listing.posts, book.config.home_recent), json)?;
    warn_incomplete(&listing);
    Ok(())
}

/// Stderr keeps JSON on stdout parseable
pub(crate) fn warn_incomplete(listing: &Listing) {
    if let Some(notice) = listing.incomplete_notice() {
        eprint!("{}", notice);
    }
}

/// Apply tag, page and limit to an ordered listing
pub fn select(posts: &[Post], options: &ListOptions, per_page: usize) -> Result<Vec<Post>> {
    let mut posts = match &options.tag {
        Some(tag) => query::filter_by_tag(posts, tag),
        None => posts.to_vec(),
    };

    if let Some(page) = options.page {
        let pages = query::paginate(&posts, per_page);
        posts = match pages.into_iter().find(|p| p.current == page) {
            Some(slice) => slice.posts,
            None if page == 1 => Vec::new(),
            None => anyhow::bail!("Page {} does not exist", page),
        };
    }

    if let Some(limit) = options.limit {
        posts = query::take(&posts, limit);
    }

    Ok(posts)
}

fn print(posts: &[Post], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(posts)?);
    } else {
        print!("{}", render(posts));
    }
    Ok(())
}

/// Plain-text listing
pub fn render(posts: &[Post]) -> String {
    let mut out = format!("Posts ({}):\n", posts.len());
    for post in posts {
        let draft = if post.is_draft() { " (draft)" } else { "" };
        out.push_str(&format!(
            "  {} - {} [{}]{}\n",
            post.publish_date().format("%Y-%m-%d"),
            post.title(),
            post.slug,
            draft
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;
    use chrono::NaiveDate;

    fn post(slug: &str, day: u32, tags: &[&str]) -> Post {
        let date = NaiveDate::from_ymd_opt(2024, 4, day).unwrap();
        let mut fm = FrontMatter::new(&slug.to_uppercase(), "d", date);
        fm.tags = tags.iter().map(|t| t.to_string()).collect();
        Post::new(slug, &format!("{}.md", slug), fm, "")
    }

    fn listing() -> Vec<Post> {
        vec![
            post("c", 3, &["rust"]),
            post("b", 2, &[]),
            post("a", 1, &["rust"]),
        ]
    }

    #[test]
    fn test_select_by_tag_and_limit() {
        let options = ListOptions {
            tag: Some("rust".to_string()),
            limit: Some(1),
            ..Default::default()
        };
        let posts = select(&listing(), &options, 10).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "c");
    }

    #[test]
    fn test_select_page() {
        let options = ListOptions {
            page: Some(2),
            ..Default::default()
        };
        let posts = select(&listing(), &options, 2).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "a");

        let options = ListOptions {
            page: Some(3),
            ..Default::default()
        };
        assert!(select(&listing(), &options, 2).is_err());
        assert!(select(&[], &ListOptions { page: Some(1), ..Default::default() }, 2)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_render() {
        let out = render(&listing()[..1]);
        assert_eq!(out, "Posts (1):\n  2024-04-03 - C [c]\n");
    }
}
