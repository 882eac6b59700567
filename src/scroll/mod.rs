pub mod throttle;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::Receiver;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::trace;
use throttle::TrailingThrottle;

/// One viewport sample, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollPosition {
    pub viewport_height: f64,
    pub scroll_top: f64,
    pub content_height: f64,
}

impl ScrollPosition {
    /// Scroll APIs report fractional offsets, so the visible bottom is rounded
    /// up before comparing against the content height.
    pub fn is_near_bottom(&self) -> bool {
        (self.viewport_height + self.scroll_top).ceil() >= self.content_height
    }
}

/// Handle for a running observer. Dropping it also unregisters.
pub struct ScrollObserver {
    disposed: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ScrollObserver {
    pub fn dispose(mut self) {
        self.stop();
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }

    fn stop(&mut self) {
        self.disposed.store(true, Ordering::SeqCst);
        if let Some(h) = self.handle.take() {
            h.abort();
        }
    }
}

impl Drop for ScrollObserver {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Watch `events` and call `on_near_bottom` at most once per `window`,
/// judging only the latest sample of each window.
///
/// Must be called from within a tokio runtime.
pub fn observe<F>(mut events: Receiver<ScrollPosition>, window: Duration, mut on_near_bottom: F) -> ScrollObserver
where
    F: FnMut() + Send + 'static,
{
    let disposed = Arc::new(AtomicBool::new(false));
    let flag = disposed.clone();
    let handle = tokio::spawn(async move {
        let mut throttle = TrailingThrottle::new(window);
        loop {
            let sample = match throttle.deadline() {
                Some(deadline) => tokio::select! {
                    ev = events.recv() => Some(ev),
                    _ = sleep_until(deadline) => None,
                },
                None => Some(events.recv().await),
            };
            match sample {
                Some(Some(pos)) => throttle.offer(Instant::now(), pos),
                // every sender is gone
                Some(None) => break,
                None => {
                    let Some(pos) = throttle.poll(Instant::now()) else { continue };
                    trace!(?pos, "evaluating scroll sample");
                    if pos.is_near_bottom() && !flag.load(Ordering::SeqCst) {
                        on_near_bottom();
                    }
                }
            }
        }
    });
    ScrollObserver { disposed, handle: Some(handle) }
}
