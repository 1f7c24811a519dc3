use crate::content::ContentSnapshot;
use std::sync::{Arc, Mutex};
use std::time::Instant;

struct ContentState {
    snapshot: Arc<ContentSnapshot>,
    loaded_at: Option<Instant>,
}

/// Latest content snapshot shared between the widgets and the feed panel.
/// Readers get a cheap `Arc` clone; a new load replaces the whole snapshot.
pub struct ContentCache {
    state: Mutex<ContentState>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ContentState {
                snapshot: Arc::new(ContentSnapshot::default()),
                loaded_at: None,
            }),
        }
    }

    pub fn snapshot(&self) -> Arc<ContentSnapshot> {
        self.state
            .lock()
            .map(|state| Arc::clone(&state.snapshot))
            .unwrap_or_else(|_| Arc::new(ContentSnapshot::default()))
    }

    pub fn is_loaded(&self) -> bool {
        self.state
            .lock()
            .map(|state| state.loaded_at.is_some())
            .unwrap_or(false)
    }

    pub fn replace(&self, snapshot: ContentSnapshot) {
        if let Ok(mut state) = self.state.lock() {
            state.snapshot = Arc::new(snapshot);
            state.loaded_at = Some(Instant::now());
        }
    }
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new()
    }
}
