//! In-memory navigator.
//!
//! # Responsibilities
//! - Keep a history stack of URLs with a cursor
//! - Emit popstate for same-document navigation and traversal
//! - Emit reload for cross-document navigation and explicit reloads
//!
//! # Design Decisions
//! - `assign` truncates forward history, like a browser
//! - Traversal past either end of history is ignored
//! - `go(0)` reloads

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use url::Url;

use crate::error::RouterError;
use crate::navigation::{NavigationEvent, Navigator};

#[derive(Debug)]
struct History {
    entries: Vec<Url>,
    index: usize,
}

impl History {
    fn current(&self) -> &Url {
        &self.entries[self.index]
    }
}

/// A navigator backed by an in-process history stack.
#[derive(Debug)]
pub struct MemoryNavigator {
    history: Mutex<History>,
    events: broadcast::Sender<NavigationEvent>,
    reloads: AtomicUsize,
}

impl MemoryNavigator {
    /// Create a navigator whose single history entry is `initial`.
    pub fn new(initial: &str) -> Result<Self, RouterError> {
        let url = Url::parse(initial)?;
        let (events, _) = broadcast::channel(64);
        Ok(Self {
            history: Mutex::new(History {
                entries: vec![url],
                index: 0,
            }),
            events,
            reloads: AtomicUsize::new(0),
        })
    }

    /// Number of history entries.
    pub fn len(&self) -> usize {
        self.history().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history().entries.is_empty()
    }

    /// Cursor position in history.
    pub fn position(&self) -> usize {
        self.history().index
    }

    /// Number of reloads performed.
    pub fn reload_count(&self) -> usize {
        self.reloads.load(Ordering::Relaxed)
    }

    fn history(&self) -> MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn navigate(&self, href: &str, replace: bool) -> Result<(), RouterError> {
        let event = {
            let mut history = self.history();
            let next = history.current().join(href)?;
            let event = if same_document(history.current(), &next) {
                NavigationEvent::PopState
            } else {
                NavigationEvent::Reload
            };

            if replace {
                let index = history.index;
                history.entries[index] = next;
            } else {
                let keep = history.index + 1;
                history.entries.truncate(keep);
                history.entries.push(next);
                history.index = keep;
            }
            event
        };

        if event == NavigationEvent::Reload {
            self.reloads.fetch_add(1, Ordering::Relaxed);
        }
        tracing::trace!(href = %href, replace, ?event, "Navigated");
        let _ = self.events.send(event);
        Ok(())
    }
}

fn same_document(a: &Url, b: &Url) -> bool {
    let mut a = a.clone();
    let mut b = b.clone();
    a.set_fragment(None);
    b.set_fragment(None);
    a == b
}

impl Navigator for MemoryNavigator {
    fn hash(&self) -> String {
        match self.history().current().fragment() {
            Some(fragment) if !fragment.is_empty() => format!("#{fragment}"),
            _ => String::new(),
        }
    }

    fn href(&self) -> String {
        self.history().current().to_string()
    }

    fn origin(&self) -> String {
        self.history().current().origin().ascii_serialization()
    }

    fn pathname(&self) -> String {
        self.history().current().path().to_string()
    }

    fn assign(&self, href: &str) -> Result<(), RouterError> {
        self.navigate(href, false)
    }

    fn replace(&self, href: &str) -> Result<(), RouterError> {
        self.navigate(href, true)
    }

    fn go(&self, delta: i32) {
        if delta == 0 {
            self.reload();
            return;
        }

        let moved = {
            let mut history = self.history();
            let target = history.index as i64 + i64::from(delta);
            if target < 0 || target >= history.entries.len() as i64 {
                false
            } else {
                history.index = target as usize;
                true
            }
        };

        if moved {
            let _ = self.events.send(NavigationEvent::PopState);
        } else {
            tracing::debug!(delta, "History traversal out of range, ignoring");
        }
    }

    fn reload(&self) {
        self.reloads.fetch_add(1, Ordering::Relaxed);
        let _ = self.events.send(NavigationEvent::Reload);
    }

    fn subscribe(&self) -> broadcast::Receiver<NavigationEvent> {
        self.events.subscribe()
    }
}
