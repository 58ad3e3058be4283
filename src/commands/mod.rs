//! CLI subcommands

pub mod check;
pub mod list;
pub mod tags;
pub mod watch;
