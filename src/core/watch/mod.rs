//! Debounced file watching.
//!
//! ```text
//! notify watcher ──> unbounded channel ──> Debouncer ──> Stream<PathBuf>
//! ```
//!
//! Raw events are keyed by path. A path is yielded once it has been quiet for
//! the debounce window. Dropping the stream drops the watcher and any
//! pending keys.

mod debounce;

use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
    time::Duration,
};

use futures::{Stream, stream};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tokio::sync::mpsc;

pub use debounce::{Clock, DebounceState, Debouncer, SystemClock};

/// Quiet window before a changed path is reported.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to create file watcher")]
    Create(#[source] notify::Error),

    #[error("failed to watch {}", .path.display())]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

struct WatchState {
    // Kept alive for as long as the stream is.
    _watcher: RecommendedWatcher,
    events: mpsc::UnboundedReceiver<notify::Result<Event>>,
    debouncer: Debouncer<PathBuf>,
    ready: VecDeque<PathBuf>,
}

/// Watch `root` recursively and yield changed paths, debounced per path.
///
/// The stream ends only when the watcher stops delivering events.
pub fn watch_debounced(
    root: &Path,
    window: Duration,
) -> Result<impl Stream<Item = PathBuf> + use<>, WatchError> {
    let (tx, events) = mpsc::unbounded_channel();
    let mut watcher = notify::recommended_watcher(move |event: notify::Result<Event>| {
        // The receiver is gone once the stream is dropped.
        let _ = tx.send(event);
    })
    .map_err(WatchError::Create)?;
    watcher
        .watch(root, RecursiveMode::Recursive)
        .map_err(|source| WatchError::Watch {
            path: root.to_path_buf(),
            source,
        })?;

    let state = WatchState {
        _watcher: watcher,
        events,
        debouncer: Debouncer::new(window),
        ready: VecDeque::new(),
    };

    Ok(stream::unfold(state, |mut state| async move {
        loop {
            if let Some(path) = state.ready.pop_front() {
                return Some((path, state));
            }

            let deadline = state.debouncer.next_deadline();
            let sleep = tokio::time::sleep_until(
                deadline
                    .map(tokio::time::Instant::from_std)
                    .unwrap_or_else(tokio::time::Instant::now),
            );

            tokio::select! {
                event = state.events.recv() => match event {
                    Some(Ok(event)) if is_change(&event.kind) => {
                        for path in event.paths {
                            state.debouncer.push(path);
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => tracing::warn!("watch error: {}", e),
                    None => return None,
                },
                _ = sleep, if deadline.is_some() => {
                    state.ready.extend(state.debouncer.poll());
                    tracing::trace!(
                        "{} path(s) settled, {} still pending",
                        state.ready.len(),
                        state.debouncer.pending_count()
                    );
                }
            }
        }
    }))
}

fn is_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}
