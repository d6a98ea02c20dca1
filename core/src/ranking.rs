//! TF-IDF ranking and document matching.
//!
//! Sequential and parallel evaluation share one code path parameterised by
//! [`ExecutionMode`]. Plus-words are visited in lexical order and every
//! contribution is tagged with its word position; a document's relevance is
//! summed in that order, so both modes produce bit-identical scores.

use rayon::prelude::*;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::accumulator::ConcurrentAccumulator;
use crate::config::ExecutionMode;
use crate::document::{Document, DocumentStatus};
use crate::error::{Result, SearchError};
use crate::index::InvertedIndex;
use crate::query::{parse_query, Query};
use crate::DocId;

/// (plus-word position, tf * idf) pairs collected for one document.
type ScoreTerms = SmallVec<[(usize, f64); 4]>;

fn status_is(status: DocumentStatus) -> impl Fn(DocId, DocumentStatus, i32) -> bool + Sync {
    move |_, document_status, _| document_status == status
}

impl InvertedIndex {
    /// Top documents with status `Actual`.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_with(
            ExecutionMode::Sequential,
            raw_query,
            status_is(DocumentStatus::Actual),
        )
    }

    pub fn find_top_documents_by_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_with(ExecutionMode::Sequential, raw_query, status_is(status))
    }

    pub fn find_top_documents_by<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        self.find_top_documents_with(ExecutionMode::Sequential, raw_query, predicate)
    }

    pub fn par_find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_with(
            ExecutionMode::Parallel,
            raw_query,
            status_is(DocumentStatus::Actual),
        )
    }

    pub fn par_find_top_documents_by_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_with(ExecutionMode::Parallel, raw_query, status_is(status))
    }

    pub fn par_find_top_documents_by<P>(
        &self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        self.find_top_documents_with(ExecutionMode::Parallel, raw_query, predicate)
    }

    /// Parse `raw_query`, score every matching document that satisfies
    /// `predicate`, then sort and truncate.
    ///
    /// Results are ordered by relevance descending; documents whose relevance
    /// is within `relevance_epsilon` of a neighbour are ordered by rating
    /// descending instead. At most `max_results` documents are returned.
    pub fn find_top_documents_with<P>(
        &self,
        mode: ExecutionMode,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = parse_query(raw_query, &self.stop_words)?;
        let mut matched = self.find_all_documents(mode, &query, &predicate);
        let total = matched.len();
        sort_by_relevance(&mut matched, self.config.relevance_epsilon);
        matched.truncate(self.config.max_results);
        tracing::debug!(
            ?mode,
            plus_words = query.plus_words.len(),
            minus_words = query.minus_words.len(),
            total,
            returned = matched.len(),
            "query evaluated"
        );
        Ok(matched)
    }

    /// Every live document matching at least one plus-word, no minus-word and
    /// `predicate`, in ascending id order.
    pub fn find_all_documents<P>(
        &self,
        mode: ExecutionMode,
        query: &Query<'_>,
        predicate: &P,
    ) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let plus_words: Vec<&str> = query.plus_words.iter().copied().collect();
        let mut scores = self.accumulate_plus_words(mode, &plus_words, predicate);

        for word in &query.minus_words {
            if let Some(postings) = self.postings.get(*word) {
                for id in postings.keys() {
                    scores.remove(id);
                }
            }
        }

        scores
            .into_iter()
            .filter_map(|(id, mut terms)| {
                let rating = self.documents.get(&id)?.rating;
                terms.sort_unstable_by_key(|&(position, _)| position);
                let relevance = terms.iter().fold(0.0, |sum, &(_, score)| sum + score);
                Some(Document::new(id, relevance, rating))
            })
            .collect()
    }

    fn accumulate_plus_words<P>(
        &self,
        mode: ExecutionMode,
        plus_words: &[&str],
        predicate: &P,
    ) -> BTreeMap<DocId, ScoreTerms>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let accumulator: ConcurrentAccumulator<ScoreTerms> =
            ConcurrentAccumulator::new(mode.shard_count(&self.config));

        let score_word = |(position, word): (usize, &&str)| {
            let Some(postings) = self.postings.get(*word) else {
                return;
            };
            if postings.is_empty() {
                return;
            }
            let idf = self.inverse_document_freq(postings.len());
            for (&id, &tf) in postings.iter() {
                let Some(data) = self.documents.get(&id) else {
                    continue;
                };
                if predicate(id, data.status, data.rating) {
                    accumulator.slot(id).push((position, tf * idf));
                }
            }
        };

        match mode {
            ExecutionMode::Sequential => plus_words.iter().enumerate().for_each(score_word),
            ExecutionMode::Parallel => self
                .pool
                .install(|| plus_words.par_iter().enumerate().for_each(score_word)),
        }

        accumulator.drain_ordered()
    }

    /// Plus-words of `raw_query` present in document `id`, with its status.
    ///
    /// Returns an empty word list when any minus-word is present. Fails with
    /// `DocumentNotFound` when `id` is not live.
    pub fn match_document<'a>(
        &'a self,
        raw_query: &str,
        id: DocId,
    ) -> Result<(Vec<&'a str>, DocumentStatus)> {
        self.match_document_with(ExecutionMode::Sequential, raw_query, id)
    }

    pub fn par_match_document<'a>(
        &'a self,
        raw_query: &str,
        id: DocId,
    ) -> Result<(Vec<&'a str>, DocumentStatus)> {
        self.match_document_with(ExecutionMode::Parallel, raw_query, id)
    }

    pub fn match_document_with<'a>(
        &'a self,
        mode: ExecutionMode,
        raw_query: &str,
        id: DocId,
    ) -> Result<(Vec<&'a str>, DocumentStatus)> {
        let status = self
            .documents
            .get(&id)
            .map(|d| d.status)
            .ok_or(SearchError::DocumentNotFound(id))?;
        let words = self.word_frequencies(id);
        let query = parse_query(raw_query, &self.stop_words)?;

        let in_document = |word: &&str| words.contains_key(*word);
        let has_minus_word = match mode {
            ExecutionMode::Sequential => query.minus_words.iter().any(in_document),
            ExecutionMode::Parallel => self
                .pool
                .install(|| query.minus_words.par_iter().any(in_document)),
        };
        if has_minus_word {
            return Ok((Vec::new(), status));
        }

        let matched = query
            .plus_words
            .iter()
            .filter_map(|word| words.get_key_value(*word).map(|(key, _)| key.as_str()))
            .collect();
        Ok((matched, status))
    }
}

/// Order by relevance descending, then by rating within runs of near-equal
/// relevance.
///
/// A run is a maximal sequence of neighbours (in relevance order) closer than
/// `epsilon`. Sorting the runs separately keeps the comparison a total order.
pub(crate) fn sort_by_relevance(documents: &mut [Document], epsilon: f64) {
    documents.sort_by(|lhs, rhs| rhs.relevance.total_cmp(&lhs.relevance));

    let mut start = 0;
    while start < documents.len() {
        let mut end = start + 1;
        while end < documents.len()
            && (documents[end - 1].relevance - documents[end].relevance).abs() < epsilon
        {
            end += 1;
        }
        if end - start > 1 {
            documents[start..end].sort_by(|lhs, rhs| match rhs.rating.cmp(&lhs.rating) {
                Ordering::Equal => rhs.relevance.total_cmp(&lhs.relevance),
                other => other,
            });
        }
        start = end;
    }
}
