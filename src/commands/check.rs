//! Validate every post document

use anyhow::Result;

use crate::content::{LoadMode, LoadReport};
use crate::Postbook;

/// Load tolerantly and report every rejected document.
///
/// Fails when any document is rejected, so it can gate a build.
pub fn run(book: &Postbook) -> Result<()> {
    let report = book.store()?.with_mode(LoadMode::Tolerant).load()?;
    print!("{}", render(&report));

    if !report.is_clean() {
        anyhow::bail!("{} document(s) failed validation", report.rejected.len());
    }
    Ok(())
}

pub fn render(report: &LoadReport) -> String {
    let drafts = report.posts.iter().filter(|p| p.is_draft()).count();
    let mut out = format!(
        "{} valid posts ({} drafts), {} rejected\n",
        report.posts.len(),
        drafts,
        report.rejected.len()
    );
    for error in &report.rejected {
        out.push_str(&format!("  error: {}\n", error));
    }
    out
}
