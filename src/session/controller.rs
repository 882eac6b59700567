use std::sync::Arc;
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use crate::models::photo::{PageResponse, SessionSnapshot};
use crate::provider::{accept, FetchError, PhotoProvider};
use crate::session::state::{FetchOutcome, FetchTicket, SearchSession, Skip};
use crate::stats::FetchStats;

/// Drives a `SearchSession` against a provider.
///
/// The session lock is only taken for the synchronous steps on either side of
/// the provider call and is never held across an `.await`.
pub struct PaginationController {
    provider: Arc<dyn PhotoProvider>,
    session: Mutex<SearchSession>,
    stats: Arc<FetchStats>,
}

impl PaginationController {
    pub fn new(provider: Arc<dyn PhotoProvider>, stats: Arc<FetchStats>) -> Self {
        Self { provider, session: Mutex::new(SearchSession::new()), stats }
    }

    /// Reset the session for `query` and fetch its first page.
    /// Blank queries are ignored without touching the session.
    pub async fn start_search(&self, query: &str) -> FetchOutcome {
        match self.begin_search(query) {
            Ok(ticket) => self.fetch_first(ticket).await,
            Err(skip) => self.skipped(skip),
        }
    }

    /// Fetch the page after `current_page` for the active query, unless no
    /// query is active or a fetch is already outstanding.
    pub async fn on_near_bottom(&self) -> FetchOutcome {
        match self.begin_next_page() {
            Ok(ticket) => self.fetch_next(ticket).await,
            Err(skip) => self.skipped(skip),
        }
    }

    /// Like `start_search`, but only the session reset happens before this
    /// returns; the fetch runs on a spawned task. Returns the new generation.
    pub fn spawn_search(self: &Arc<Self>, query: &str) -> Result<u64, Skip> {
        let ticket = self.begin_search(query).map_err(|skip| {
            self.skipped(skip);
            skip
        })?;
        let generation = ticket.generation;
        let ctrl = self.clone();
        tokio::spawn(async move {
            ctrl.fetch_first(ticket).await;
        });
        Ok(generation)
    }

    /// Spawned form of `on_near_bottom`. The guards run synchronously, so a
    /// burst of calls issues at most one request.
    pub fn spawn_next_page(self: &Arc<Self>) -> Result<u32, Skip> {
        let ticket = self.begin_next_page().map_err(|skip| {
            self.skipped(skip);
            skip
        })?;
        let page = ticket.page;
        let ctrl = self.clone();
        tokio::spawn(async move {
            ctrl.fetch_next(ticket).await;
        });
        Ok(page)
    }

    fn begin_search(&self, query: &str) -> Result<FetchTicket, Skip> {
        let ticket = self.session.lock().begin_search(query)?;
        self.stats.inc_searches();
        info!(query = %ticket.query, generation = ticket.generation, "search started");
        Ok(ticket)
    }

    fn begin_next_page(&self) -> Result<FetchTicket, Skip> {
        let ticket = self.session.lock().begin_next_page()?;
        debug!(query = %ticket.query, page = ticket.page, "loading next page");
        Ok(ticket)
    }

    async fn fetch_first(&self, ticket: FetchTicket) -> FetchOutcome {
        self.stats.inc_requests();
        let result = self.provider.search(&ticket.query).await;
        self.finish(&ticket, result)
    }

    async fn fetch_next(&self, ticket: FetchTicket) -> FetchOutcome {
        self.stats.inc_requests();
        let result = self.provider.search_page(&ticket.query, ticket.page).await;
        self.finish(&ticket, result)
    }

    fn finish(&self, ticket: &FetchTicket, result: Result<PageResponse, FetchError>) -> FetchOutcome {
        let result = result.and_then(accept);
        let error = result.as_ref().err().map(|e| e.to_string());
        let outcome = self.session.lock().complete(ticket, result);
        match outcome {
            FetchOutcome::Merged { page, added } => {
                self.stats.record_merge(added as u64);
                debug!(query = %ticket.query, page, added, "page merged");
            }
            FetchOutcome::Failed { page } => {
                let reason = error.unwrap_or_default();
                warn!(query = %ticket.query, page, error = %reason, "page fetch failed");
                self.stats.record_failure(reason);
            }
            FetchOutcome::Stale { page } => {
                self.stats.inc_stale();
                debug!(query = %ticket.query, page, generation = ticket.generation, "discarding stale response");
            }
            FetchOutcome::Skipped(_) => {}
        }
        outcome
    }

    fn skipped(&self, skip: Skip) -> FetchOutcome {
        if skip == Skip::Busy {
            self.stats.inc_skipped_busy();
        }
        debug!(?skip, "fetch trigger ignored");
        FetchOutcome::Skipped(skip)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().snapshot()
    }

    /// True while a page fetch is outstanding.
    pub fn is_busy(&self) -> bool {
        self.session.lock().in_flight()
    }

    pub fn stats(&self) -> &Arc<FetchStats> {
        &self.stats
    }
}
