//! CLI entry point for postbook

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use postbook::commands::list::ListOptions;

#[derive(Parser)]
#[command(name = "postbook")]
#[command(version)]
#[command(about = "Inspect and validate the posts of a Markdown blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Include drafts (preview mode)
    #[arg(long, global = true)]
    drafts: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List visible posts, newest first
    #[command(alias = "ls")]
    List {
        /// Only posts carrying this exact tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Show at most this many posts
        #[arg(short, long)]
        limit: Option<usize>,

        /// Show one page of the listing
        #[arg(short, long)]
        page: Option<usize>,

        /// Print posts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the home page preview
    Home {
        /// Print posts as JSON
        #[arg(long)]
        json: bool,
    },

    /// List tags with post counts
    Tags,

    /// Validate every document and report failures
    Check,

    /// Reload posts whenever the content changes
    #[command(alias = "w")]
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "postbook=debug,info"
    } else {
        "postbook=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let mut book = postbook::Postbook::new(&base_dir)?;
    if cli.drafts {
        book.config.drafts = true;
    }

    match cli.command {
        Commands::List {
            tag,
            limit,
            page,
            json,
        } => {
            let options = ListOptions {
                tag,
                limit,
                page,
                json,
            };
            postbook::commands::list::run(&book, &options).await?;
        }

        Commands::Home { json } => {
            postbook::commands::list::home(&book, json).await?;
        }

        Commands::Tags => {
            postbook::commands::tags::run(&book).await?;
        }

        Commands::Check => {
            postbook::commands::check::run(&book)?;
            println!("All documents valid");
        }

        Commands::Watch => {
            postbook::commands::watch::run(&book).await?;
        }
    }

    Ok(())
}
