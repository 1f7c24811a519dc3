use super::{catalog, ContentSnapshot};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

/// Background catalog load with simulated latency.
///
/// The result is only delivered while the loader is alive and not cancelled;
/// dropping the loader cancels it, so a closed dashboard never receives a late
/// result.
pub struct ContentLoader {
    rx: Option<Receiver<ContentSnapshot>>,
    cancelled: Arc<AtomicBool>,
}

impl ContentLoader {
    pub fn spawn(seed: u64, latency: Duration) -> Self {
        let (tx, rx) = channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        std::thread::spawn(move || {
            if !latency.is_zero() {
                std::thread::sleep(latency);
            }
            if flag.load(Ordering::SeqCst) {
                tracing::debug!("content load cancelled before generation");
                return;
            }
            let snapshot = catalog::generate(seed, Utc::now());
            if flag.load(Ordering::SeqCst) {
                tracing::debug!("content load cancelled after generation");
                return;
            }
            let _ = tx.send(snapshot);
        });
        Self {
            rx: Some(rx),
            cancelled,
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.rx = None;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// `true` until the result has been taken or the load was cancelled.
    pub fn is_pending(&self) -> bool {
        self.rx.is_some()
    }

    /// Take the loaded snapshot if it has arrived. Returns it at most once.
    pub fn poll(&mut self) -> Option<ContentSnapshot> {
        if self.is_cancelled() {
            self.rx = None;
            return None;
        }
        let rx = self.rx.as_ref()?;
        match rx.try_recv() {
            Ok(snapshot) => {
                self.rx = None;
                tracing::info!(items = snapshot.trending.len(), "content catalog loaded");
                Some(snapshot)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::warn!("content loader stopped without a result");
                self.rx = None;
                None
            }
        }
    }

    /// Block until the snapshot arrives or `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> Option<ContentSnapshot> {
        if self.is_cancelled() {
            return None;
        }
        let rx = self.rx.take()?;
        match rx.recv_timeout(timeout) {
            Ok(snapshot) => Some(snapshot),
            Err(_) => {
                self.rx = Some(rx);
                None
            }
        }
    }
}

impl Drop for ContentLoader {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}
