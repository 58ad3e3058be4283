//! Content module - post documents, their sources and the post store

mod frontmatter;
pub mod loader;
mod post;
mod source;

pub use frontmatter::{parse_date_string, FrontMatter};
pub use loader::{LoadMode, LoadReport, PostStore, Snapshot};
pub use post::{slug_from_source, Post};
pub use source::{DocumentSource, FsSource, MemorySource, RawDocument};
