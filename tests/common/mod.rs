#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use photo_scroll::models::photo::{PageResponse, PhotoRecord};
use photo_scroll::provider::{FetchError, PhotoProvider};

pub fn photos(ids: &[&str]) -> Vec<PhotoRecord> {
    ids.iter().map(|id| PhotoRecord::with_id(*id)).collect()
}

pub fn ok_page(ids: &[&str]) -> Result<PageResponse, FetchError> {
    Ok(PageResponse::ok(photos(ids)))
}

pub fn ids(results: &[PhotoRecord]) -> Vec<String> {
    results.iter().map(|p| p.id.clone()).collect()
}

type Reply = Result<PageResponse, FetchError>;

/// Provider whose calls block until the test releases them, in any order.
#[derive(Default)]
pub struct GatedProvider {
    calls: Mutex<Vec<(String, u32)>>,
    gates: Mutex<Vec<Option<oneshot::Sender<Reply>>>>,
}

impl GatedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Answer call number `idx` (0-based, in call order).
    pub fn release(&self, idx: usize, reply: Reply) {
        let tx = self.gates.lock()[idx].take().expect("call already released");
        let _ = tx.send(reply);
    }
}

#[async_trait]
impl PhotoProvider for GatedProvider {
    async fn search_page(&self, query: &str, page: u32) -> Result<PageResponse, FetchError> {
        let (tx, rx) = oneshot::channel();
        {
            self.calls.lock().push((query.to_string(), page));
            self.gates.lock().push(Some(tx));
        }
        rx.await.unwrap_or_else(|_| Err(FetchError::Transport("gate dropped".to_string())))
    }
}

/// Provider answering immediately from a fixed table keyed by (query, page).
/// Unknown keys answer with an empty "ok" page.
#[derive(Default)]
pub struct TableProvider {
    pages: Mutex<HashMap<(String, u32), Reply>>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl TableProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set(&self, query: &str, page: u32, reply: Reply) {
        self.pages.lock().insert((query.to_string(), page), reply);
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl PhotoProvider for TableProvider {
    async fn search_page(&self, query: &str, page: u32) -> Result<PageResponse, FetchError> {
        self.calls.lock().push((query.to_string(), page));
        self.pages
            .lock()
            .get(&(query.to_string(), page))
            .cloned()
            .unwrap_or_else(|| Ok(PageResponse::ok(Vec::new())))
    }
}

/// Wait for a condition to become true
pub async fn wait_for_condition<F>(mut condition: F, max_attempts: usize, delay_ms: u64) -> bool
where
    F: FnMut() -> bool,
{
    use tokio::time::{sleep, Duration};
    for _ in 0..max_attempts {
        if condition() {
            return true;
        }
        sleep(Duration::from_millis(delay_ms)).await;
    }
    condition()
}

/// Serve `app` on an ephemeral local port.
pub async fn serve(app: axum::Router) -> u16 {
    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    let listener = TcpListener::bind(&addr).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    port
}
