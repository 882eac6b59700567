use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Counters for page fetches, read by `/metrics`.
pub struct FetchStats {
    searches_started: AtomicU64,
    requests_issued: AtomicU64,
    pages_merged: AtomicU64,
    photos_merged: AtomicU64,
    failures: AtomicU64,
    stale_discarded: AtomicU64,
    skipped_busy: AtomicU64,
    started: Instant,
    last_failure: parking_lot::Mutex<Option<String>>,
}

impl Default for FetchStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchStats {
    pub fn new() -> Self {
        Self {
            searches_started: AtomicU64::new(0),
            requests_issued: AtomicU64::new(0),
            pages_merged: AtomicU64::new(0),
            photos_merged: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            stale_discarded: AtomicU64::new(0),
            skipped_busy: AtomicU64::new(0),
            started: Instant::now(),
            last_failure: parking_lot::Mutex::new(None),
        }
    }
    pub fn inc_searches(&self) { self.searches_started.fetch_add(1, Ordering::Relaxed); }
    pub fn inc_requests(&self) { self.requests_issued.fetch_add(1, Ordering::Relaxed); }
    pub fn inc_stale(&self) { self.stale_discarded.fetch_add(1, Ordering::Relaxed); }
    pub fn inc_skipped_busy(&self) { self.skipped_busy.fetch_add(1, Ordering::Relaxed); }
    pub fn record_merge(&self, photos: u64) {
        self.pages_merged.fetch_add(1, Ordering::Relaxed);
        self.photos_merged.fetch_add(photos, Ordering::Relaxed);
    }
    pub fn record_failure(&self, reason: String) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        *self.last_failure.lock() = Some(reason);
    }

    pub fn searches_started(&self) -> u64 { self.searches_started.load(Ordering::Relaxed) }
    pub fn requests_issued(&self) -> u64 { self.requests_issued.load(Ordering::Relaxed) }
    pub fn pages_merged(&self) -> u64 { self.pages_merged.load(Ordering::Relaxed) }
    pub fn photos_merged(&self) -> u64 { self.photos_merged.load(Ordering::Relaxed) }
    pub fn failures(&self) -> u64 { self.failures.load(Ordering::Relaxed) }
    pub fn stale_discarded(&self) -> u64 { self.stale_discarded.load(Ordering::Relaxed) }
    pub fn skipped_busy(&self) -> u64 { self.skipped_busy.load(Ordering::Relaxed) }
    pub fn last_failure(&self) -> Option<String> { self.last_failure.lock().clone() }
    pub fn uptime_secs(&self) -> u64 { self.started.elapsed().as_secs() }

    pub fn metrics_text(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("scroll_uptime_seconds {}\n", self.uptime_secs()));
        s.push_str(&format!("scroll_searches_started_total {}\n", self.searches_started()));
        s.push_str(&format!("scroll_page_requests_total {}\n", self.requests_issued()));
        s.push_str(&format!("scroll_pages_merged_total {}\n", self.pages_merged()));
        s.push_str(&format!("scroll_photos_merged_total {}\n", self.photos_merged()));
        s.push_str(&format!("scroll_page_failures_total {}\n", self.failures()));
        s.push_str(&format!("scroll_stale_responses_total {}\n", self.stale_discarded()));
        s.push_str(&format!("scroll_busy_skips_total {}\n", self.skipped_busy()));
        s
    }
}
