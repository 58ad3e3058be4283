//! Reload posts whenever the content changes

use anyhow::Result;
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::new_debouncer;
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::time::Duration;

use crate::config::CONFIG_FILE;
use crate::content::Snapshot;
use crate::{query, Postbook};

/// Watch the content directory, keeping the last complete post set
pub async fn run(book: &Postbook) -> Result<()> {
    let store = book.store()?;
    let mut snapshot = Snapshot::new();
    refresh(book, &store, &mut snapshot);

    let (tx, rx) = channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;
    debouncer
        .watcher()
        .watch(&book.content_dir, RecursiveMode::Recursive)?;

    let config_path = book.base_dir.join(CONFIG_FILE);
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::info!("Config changes require a restart to take effect");
    }

    tracing::info!(
        "Watching {:?} for changes. Press Ctrl+C to stop.",
        book.content_dir
    );

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(Ok(events)) => {
                tracing::debug!("{} change(s) detected", events.len());
                refresh(book, &store, &mut snapshot);
            }
            Ok(Err(e)) => tracing::error!("Watch error: {}", e),
            Err(RecvTimeoutError::Timeout) => tokio::task::yield_now().await,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}

fn refresh(book: &Postbook, store: &crate::content::PostStore, snapshot: &mut Snapshot) {
    match snapshot.refresh(store) {
        Ok(posts) => {
            let visible = query::visible(&posts, book.config.visibility());
            tracing::info!(
                "Reloaded {} posts ({} visible)",
                posts.len(),
                visible.len()
            );
        }
        Err(e) => {
            let kept = snapshot.current().map(|p| p.len()).unwrap_or(0);
            tracing::error!("Reload failed, keeping previous {} posts: {}", kept, e);
        }
    }
}
