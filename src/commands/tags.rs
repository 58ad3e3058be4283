//! List tags

use anyhow::Result;

use crate::query;
use crate::Postbook;

/// Print every tag on a visible post with its post count
pub async fn run(book: &Postbook) -> Result<()> {
    let listing = book.listing().await?;
    print!("{}", render(&query::tag_counts(&listing.posts)));
    super::list::warn_incomplete(&listing);
    Ok(())
}

pub fn render(counts: &[(String, usize)]) -> String {
    let mut out = format!("Tags ({}):\n", counts.len());
    for (tag, count) in counts {
        out.push_str(&format!("  {} ({})\n", tag, count));
    }
    out
}
