use search_core::{DocId, Document, DocumentPredicate, DocumentStatus, Result, SearchServer};
use std::collections::VecDeque;

/// Minutes in a day; one request advances the clock by one minute.
pub const MIN_IN_DAY: u64 = 1440;

#[derive(Debug, Clone, Copy)]
struct QueryResult {
    time: u64,
    empty: bool,
}

/// Tracks how many of the most recent requests came back empty.
pub struct RequestQueue<'a> {
    server: &'a SearchServer,
    requests: VecDeque<QueryResult>,
    window: u64,
    current_time: u64,
    no_result_requests: usize,
}

impl<'a> RequestQueue<'a> {
    pub fn new(server: &'a SearchServer) -> Self { Self::with_window(server, MIN_IN_DAY) }

    pub fn with_window(server: &'a SearchServer, window: u64) -> Self {
        Self { server, requests: VecDeque::new(), window, current_time: 0, no_result_requests: 0 }
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        self.add_find_request_by_status(raw_query, DocumentStatus::Actual)
    }

    pub fn add_find_request_by_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.add_find_request_by(raw_query, move |_: DocId, s: DocumentStatus, _: i32| {
            s == status
        })
    }

    /// A failed query is returned as is and does not count as a request.
    pub fn add_find_request_by<P: DocumentPredicate>(
        &mut self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>> {
        let found = self.server.find_top_documents_by(raw_query, predicate)?;
        self.record(found.is_empty());
        Ok(found)
    }

    pub fn no_result_requests(&self) -> usize { self.no_result_requests }

    fn record(&mut self, empty: bool) {
        self.current_time += 1;
        while let Some(front) = self.requests.front() {
            if self.current_time - front.time < self.window {
                break;
            }
            if front.empty {
                self.no_result_requests -= 1;
            }
            self.requests.pop_front();
        }
        self.requests.push_back(QueryResult { time: self.current_time, empty });
        if empty {
            self.no_result_requests += 1;
        }
    }
}
