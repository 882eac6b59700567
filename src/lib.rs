pub mod utils;
pub mod stats;
pub mod models;
pub mod provider;
pub mod scroll;
pub mod session;
pub mod api;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use provider::PhotoProvider;
use scroll::{ScrollObserver, ScrollPosition};
use session::PaginationController;

// Raw scroll samples are noisy; anything beyond this backlog is dropped.
const SCROLL_QUEUE: usize = 256;

#[derive(Clone)]
pub struct AppState {
    pub started_at: std::time::Instant,
    pub controller: Arc<PaginationController>,
    pub stats: Arc<stats::FetchStats>,
    pub scroll_tx: mpsc::Sender<ScrollPosition>,
}

impl AppState {
    /// Build the controller and wire a scroll observer to its near-bottom
    /// trigger. The observer stops when the returned handle is dropped.
    pub fn start(provider: Arc<dyn PhotoProvider>, throttle: Duration) -> (Arc<Self>, ScrollObserver) {
        let stats = Arc::new(stats::FetchStats::new());
        let controller = Arc::new(PaginationController::new(provider, stats.clone()));
        let (scroll_tx, scroll_rx) = mpsc::channel(SCROLL_QUEUE);
        let ctrl = controller.clone();
        let observer = scroll::observe(scroll_rx, throttle, move || {
            let _ = ctrl.spawn_next_page();
        });
        let state = Arc::new(Self {
            started_at: std::time::Instant::now(),
            controller,
            stats,
            scroll_tx,
        });
        (state, observer)
    }
}
