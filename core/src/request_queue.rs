use std::collections::VecDeque;

use crate::config::ExecutionMode;
use crate::document::{Document, DocumentStatus};
use crate::error::Result;
use crate::index::InvertedIndex;
use crate::DocId;

/// Requests remembered by the sliding window, one per minute of a day.
pub const REQUEST_WINDOW: usize = 1440;

/// Forwards queries to an index and tracks how many of the most recent
/// [`REQUEST_WINDOW`] requests came back empty.
pub struct RequestQueue<'a> {
    index: &'a InvertedIndex,
    requests: VecDeque<usize>,
    no_result_requests: usize,
}

impl<'a> RequestQueue<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self {
        Self {
            index,
            requests: VecDeque::with_capacity(REQUEST_WINDOW + 1),
            no_result_requests: 0,
        }
    }

    /// Run the query in `mode` and record how many documents came back.
    ///
    /// A query that fails to parse is not recorded.
    pub fn add_find_request_with<P>(
        &mut self,
        mode: ExecutionMode,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let result = self.index.find_top_documents_with(mode, raw_query, predicate)?;
        self.record(result.len());
        Ok(result)
    }

    pub fn add_find_request_by<P>(&mut self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        self.add_find_request_with(ExecutionMode::Sequential, raw_query, predicate)
    }

    pub fn add_find_request_by_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.add_find_request_by(raw_query, move |_, document_status, _| document_status == status)
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        self.add_find_request_by_status(raw_query, DocumentStatus::Actual)
    }

    pub fn add_par_find_request_by<P>(
        &mut self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        self.add_find_request_with(ExecutionMode::Parallel, raw_query, predicate)
    }

    pub fn add_par_find_request_by_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.add_par_find_request_by(raw_query, move |_, document_status, _| {
            document_status == status
        })
    }

    pub fn add_par_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        self.add_par_find_request_by_status(raw_query, DocumentStatus::Actual)
    }

    /// Requests in the current window that returned nothing.
    pub fn no_result_requests(&self) -> usize {
        self.no_result_requests
    }

    /// Requests currently held by the window.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    fn record(&mut self, results: usize) {
        self.requests.push_back(results);
        if results == 0 {
            self.no_result_requests += 1;
        }
        while self.requests.len() > REQUEST_WINDOW {
            if self.requests.pop_front() == Some(0) {
                self.no_result_requests -= 1;
            }
        }
    }
}
