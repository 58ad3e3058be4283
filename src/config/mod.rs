//! Configuration module

mod site;

pub use site::{SiteConfig, CONFIG_FILE};
