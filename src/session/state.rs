use crate::models::photo::{PageInfo, PageResponse, PhotoRecord, SessionSnapshot};
use crate::provider::FetchError;

/// Everything a fetch needs, captured when it is issued. The request never
/// reads live session fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: String,
    pub page: u32,
}

/// Why a trigger did not issue a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// Empty or whitespace query handed to `start_search`.
    BlankQuery,
    /// Near-bottom signal before any search.
    NoActiveQuery,
    /// A fetch is already outstanding.
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Merged { page: u32, added: usize },
    Failed { page: u32 },
    /// A newer search superseded the ticket; the response was dropped.
    Stale { page: u32 },
    Skipped(Skip),
}

/// The single piece of mutable search state.
///
/// All transitions are synchronous: `begin_*` runs right before the provider
/// call and `complete` right after it. `in_flight` and `generation` carry
/// the exclusion and staleness rules, so no transition depends on how the
/// caller schedules the await in between.
#[derive(Debug, Default, Clone)]
pub struct SearchSession {
    query: String,
    current_page: u32,
    results: Vec<PhotoRecord>,
    in_flight: bool,
    generation: u64,
    last_page: Option<PageInfo>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str { &self.query }
    pub fn current_page(&self) -> u32 { self.current_page }
    pub fn results(&self) -> &[PhotoRecord] { &self.results }
    pub fn in_flight(&self) -> bool { self.in_flight }
    pub fn generation(&self) -> u64 { self.generation }
    pub fn last_page(&self) -> Option<PageInfo> { self.last_page }

    /// Reset for a new query and hand out the ticket for page 1.
    pub fn begin_search(&mut self, query: &str) -> Result<FetchTicket, Skip> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Skip::BlankQuery);
        }
        self.results.clear();
        self.last_page = None;
        self.current_page = 0;
        self.generation += 1;
        self.in_flight = true;
        self.query = query.to_string();
        Ok(FetchTicket { generation: self.generation, query: self.query.clone(), page: 1 })
    }

    /// Claim the next page. The page counter moves before the request goes out
    /// so a second trigger sees it and is turned away by `in_flight`.
    pub fn begin_next_page(&mut self) -> Result<FetchTicket, Skip> {
        if self.query.is_empty() {
            return Err(Skip::NoActiveQuery);
        }
        if self.in_flight {
            return Err(Skip::Busy);
        }
        self.in_flight = true;
        self.current_page += 1;
        Ok(FetchTicket { generation: self.generation, query: self.query.clone(), page: self.current_page })
    }

    /// Apply the result of `ticket`'s fetch. Responses from an older generation
    /// leave the session untouched, including the newer fetch's `in_flight`.
    /// A response whose status is not "ok" counts as a failure.
    pub fn complete(&mut self, ticket: &FetchTicket, result: Result<PageResponse, FetchError>) -> FetchOutcome {
        if ticket.generation != self.generation {
            return FetchOutcome::Stale { page: ticket.page };
        }
        self.in_flight = false;
        match result {
            Ok(resp) if resp.is_ok() => {
                let added = resp.photos.len();
                self.results.extend(resp.photos);
                self.last_page = Some(resp.info);
                // page 1 comes from begin_search, which leaves the counter at 0
                self.current_page = self.current_page.max(ticket.page);
                FetchOutcome::Merged { page: ticket.page, added }
            }
            _ => FetchOutcome::Failed { page: ticket.page },
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            query: self.query.clone(),
            current_page: self.current_page,
            generation: self.generation,
            busy: self.in_flight,
            results: self.results.clone(),
            last_page: self.last_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photos(ids: &[&str]) -> Vec<PhotoRecord> {
        ids.iter().map(|id| PhotoRecord::with_id(*id)).collect()
    }

    fn ok(ids: &[&str]) -> Result<PageResponse, FetchError> {
        Ok(PageResponse::ok(photos(ids)))
    }

    fn transport() -> Result<PageResponse, FetchError> {
        Err(FetchError::Transport("connection reset".to_string()))
    }

    #[test]
    fn test_initial_state() {
        let s = SearchSession::new();
        assert_eq!(s.query(), "");
        assert_eq!(s.current_page(), 0);
        assert!(s.results().is_empty());
        assert!(!s.in_flight());
        assert_eq!(s.generation(), 0);
    }

    #[test]
    fn test_blank_query_is_noop() {
        let mut s = SearchSession::new();
        let t = s.begin_search("cat").unwrap();
        s.complete(&t, ok(&["1"]));
        for q in ["", "   ", "\t\n"] {
            assert_eq!(s.begin_search(q), Err(Skip::BlankQuery));
        }
        assert_eq!(s.query(), "cat");
        assert_eq!(s.current_page(), 1);
        assert_eq!(s.generation(), 1);
        assert_eq!(s.results(), photos(&["1"]).as_slice());
    }

    #[test]
    fn test_begin_search_resets() {
        let mut s = SearchSession::new();
        let t = s.begin_search("cat").unwrap();
        s.complete(&t, ok(&["1", "2"]));
        let t = s.begin_next_page().unwrap();
        s.complete(&t, ok(&["3"]));

        let t = s.begin_search("  dog ").unwrap();
        assert_eq!(t, FetchTicket { generation: 2, query: "dog".into(), page: 1 });
        assert!(s.results().is_empty());
        assert_eq!(s.current_page(), 0);
        assert!(s.in_flight());
        assert_eq!(s.last_page(), None);
    }

    #[test]
    fn test_first_page_merge() {
        let mut s = SearchSession::new();
        let t = s.begin_search("cat").unwrap();
        assert_eq!(s.complete(&t, ok(&["1"])), FetchOutcome::Merged { page: 1, added: 1 });
        assert_eq!(s.current_page(), 1);
        assert!(!s.in_flight());
    }

    #[test]
    fn test_next_page_guards_in_order() {
        let mut s = SearchSession::new();
        assert_eq!(s.begin_next_page(), Err(Skip::NoActiveQuery));
        let _t = s.begin_search("cat").unwrap();
        assert_eq!(s.begin_next_page(), Err(Skip::Busy));
    }

    #[test]
    fn test_page_advances_before_completion() {
        let mut s = SearchSession::new();
        let t = s.begin_search("cat").unwrap();
        s.complete(&t, ok(&["1"]));
        let t2 = s.begin_next_page().unwrap();
        assert_eq!(t2.page, 2);
        assert_eq!(s.current_page(), 2);
        assert_eq!(s.begin_next_page(), Err(Skip::Busy));
        assert_eq!(s.current_page(), 2);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut s = SearchSession::new();
        let a = s.begin_search("a").unwrap();
        let b = s.begin_search("b").unwrap();
        assert_eq!(s.complete(&a, ok(&["a1"])), FetchOutcome::Stale { page: 1 });
        assert!(s.results().is_empty());
        // b is still outstanding
        assert!(s.in_flight());
        s.complete(&b, ok(&["b1"]));
        assert_eq!(s.results(), photos(&["b1"]).as_slice());
    }

    #[test]
    fn test_stale_failure_keeps_newer_fetch_busy() {
        let mut s = SearchSession::new();
        let a = s.begin_search("a").unwrap();
        s.complete(&a, ok(&["a1"]));
        let a2 = s.begin_next_page().unwrap();
        let _b = s.begin_search("b").unwrap();
        assert_eq!(s.complete(&a2, transport()), FetchOutcome::Stale { page: 2 });
        assert!(s.in_flight());
        assert_eq!(s.query(), "b");
    }

    #[test]
    fn test_failure_keeps_page_advanced() {
        let mut s = SearchSession::new();
        let t = s.begin_search("cat").unwrap();
        s.complete(&t, ok(&["1"]));
        let t = s.begin_next_page().unwrap();
        assert_eq!(s.complete(&t, transport()), FetchOutcome::Failed { page: 2 });
        assert!(!s.in_flight());
        assert_eq!(s.current_page(), 2);
        assert_eq!(s.results().len(), 1);
        // the gap at page 2 is not retried
        assert_eq!(s.begin_next_page().unwrap().page, 3);
    }

    #[test]
    fn test_first_page_failure_then_scroll_requests_page_one() {
        let mut s = SearchSession::new();
        let t = s.begin_search("dog").unwrap();
        assert_eq!(s.complete(&t, Ok(PageResponse::failed("error", None))), FetchOutcome::Failed { page: 1 });
        assert_eq!(s.current_page(), 0);
        assert!(s.results().is_empty());
        assert_eq!(s.begin_next_page().unwrap().page, 1);
    }

    #[test]
    fn test_monotonic_page_advance() {
        let mut s = SearchSession::new();
        let t = s.begin_search("cat").unwrap();
        s.complete(&t, ok(&["p1"]));
        for n in 1..=5u32 {
            let t = s.begin_next_page().unwrap();
            s.complete(&t, ok(&[]));
            assert_eq!(s.current_page(), n + 1);
        }
    }

    #[test]
    fn test_last_page_info_is_recorded() {
        let mut s = SearchSession::new();
        let t = s.begin_search("cat").unwrap();
        let mut resp = PageResponse::ok(photos(&["1"]));
        resp.info = PageInfo { page: 1, total_pages: 7, per_page: 100, total: 650 };
        s.complete(&t, Ok(resp));
        assert_eq!(s.last_page().map(|p| p.total_pages), Some(7));
        // informational only: paging continues past the reported end
        for _ in 0..7 {
            let t = s.begin_next_page().unwrap();
            s.complete(&t, ok(&[]));
        }
        assert_eq!(s.current_page(), 8);
    }

    #[test]
    fn test_results_keep_fetch_and_provider_order() {
        let mut s = SearchSession::new();
        let t = s.begin_search("cat").unwrap();
        s.complete(&t, ok(&["3", "1"]));
        let t = s.begin_next_page().unwrap();
        s.complete(&t, ok(&["1", "2"]));
        let ids: Vec<&str> = s.results().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "1", "2"]);
    }
}
