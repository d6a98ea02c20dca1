use dashmap::DashMap;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};
use std::iter::Copied;
use std::sync::Arc;

use crate::config::SearchConfig;
use crate::document::{compute_average_rating, DocumentData, DocumentStatus};
use crate::error::{Result, SearchError};
use crate::tokenizer::StopWords;
use crate::DocId;

/// Word -> term frequency for a single document.
pub type WordFrequencies = BTreeMap<String, f64>;

static EMPTY_FREQUENCIES: WordFrequencies = BTreeMap::new();

/// In-memory inverted index over a mutable corpus of short documents.
///
/// Holds document metadata, each document's own word frequencies and the
/// per-word posting lists (word -> doc id -> term frequency). Ranking and
/// removal live in their own modules as further `impl` blocks.
///
/// The index takes no lock spanning the whole structure: adding or removing
/// documents while a parallel query runs against the same instance is not
/// supported, which `&mut self` on the mutating operations enforces.
#[derive(Debug)]
pub struct InvertedIndex {
    pub(crate) stop_words: StopWords,
    pub(crate) config: SearchConfig,
    pub(crate) documents: BTreeMap<DocId, DocumentData>,
    pub(crate) document_words: BTreeMap<DocId, WordFrequencies>,
    /// Posting lists may be left empty after removals; they are not compacted.
    pub(crate) postings: DashMap<String, BTreeMap<DocId, f64>>,
    ordinals: Vec<DocId>,
    /// Ids of removed documents; ids are never handed out twice.
    pub(crate) retired: BTreeSet<DocId>,
    pub(crate) pool: Arc<ThreadPool>,
}

impl InvertedIndex {
    pub fn new(stop_words: StopWords) -> Result<Self> {
        Self::with_config(stop_words, SearchConfig::default())
    }

    /// Build with stop words taken from space-separated text.
    pub fn from_stop_words_text(text: &str) -> Result<Self> {
        Self::new(StopWords::from_text(text)?)
    }

    pub fn with_config(stop_words: StopWords, config: SearchConfig) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.parallel_workers.max(1))
            .thread_name(|i| format!("search-worker-{i}"))
            .build()?;
        Ok(Self {
            stop_words,
            config,
            documents: BTreeMap::new(),
            document_words: BTreeMap::new(),
            postings: DashMap::new(),
            ordinals: Vec::new(),
            retired: BTreeSet::new(),
            pool: Arc::new(pool),
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Index a new document.
    ///
    /// Fails with `InvalidArgument` for a negative id, an id that is live or
    /// was removed earlier, or when
    /// any word carries a control character. All checks run before anything
    /// is written, so a rejected document leaves the index untouched.
    pub fn add_document(
        &mut self,
        id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if id < 0 {
            return Err(SearchError::invalid_argument(format!(
                "document id {id} is negative"
            )));
        }
        if self.documents.contains_key(&id) {
            return Err(SearchError::invalid_argument(format!(
                "document id {id} is already indexed"
            )));
        }
        if self.retired.contains(&id) {
            return Err(SearchError::invalid_argument(format!(
                "document id {id} belonged to a removed document"
            )));
        }
        let words = self.stop_words.split_no_stop(text)?;

        let mut frequencies = WordFrequencies::new();
        let inv_word_count = 1.0 / words.len() as f64;
        for word in &words {
            *frequencies.entry((*word).to_string()).or_insert(0.0) += inv_word_count;
        }
        for (word, &tf) in &frequencies {
            self.postings.entry(word.clone()).or_default().insert(id, tf);
        }

        let rating = compute_average_rating(ratings);
        tracing::debug!(doc_id = id, words = frequencies.len(), rating, ?status, "document added");
        self.document_words.insert(id, frequencies);
        self.documents.insert(id, DocumentData { rating, status });
        self.ordinals.push(id);
        Ok(())
    }

    /// Number of live documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// The id first assigned to insertion position `ordinal`.
    ///
    /// Ordinals are permanent: removals never renumber them. The accepted
    /// range is `[0, document_count())`.
    pub fn document_id(&self, ordinal: usize) -> Result<DocId> {
        let count = self.document_count();
        if ordinal >= count {
            return Err(SearchError::OrdinalOutOfRange { ordinal, count });
        }
        self.ordinals
            .get(ordinal)
            .copied()
            .ok_or(SearchError::OrdinalOutOfRange { ordinal, count })
    }

    /// Word frequencies of `id`, or an empty map for an unknown id.
    pub fn word_frequencies(&self, id: DocId) -> &WordFrequencies {
        self.document_words.get(&id).unwrap_or(&EMPTY_FREQUENCIES)
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.documents.contains_key(&id)
    }

    pub fn document_status(&self, id: DocId) -> Option<DocumentStatus> {
        self.documents.get(&id).map(|d| d.status)
    }

    pub fn document_rating(&self, id: DocId) -> Option<i32> {
        self.documents.get(&id).map(|d| d.rating)
    }

    /// Live ids in ascending order.
    pub fn iter(&self) -> DocumentIds<'_> {
        DocumentIds {
            inner: self.documents.keys().copied(),
        }
    }

    /// Number of documents a posting list still references.
    pub fn posting_len(&self, word: &str) -> Option<usize> {
        self.postings.get(word).map(|p| p.len())
    }

    /// `ln(live documents / documents containing the word)`.
    pub(crate) fn inverse_document_freq(&self, docs_with_word: usize) -> f64 {
        (self.document_count() as f64 / docs_with_word as f64).ln()
    }
}

/// Ascending iterator over live document ids.
pub struct DocumentIds<'a> {
    inner: Copied<btree_map::Keys<'a, DocId, DocumentData>>,
}

impl Iterator for DocumentIds<'_> {
    type Item = DocId;

    fn next(&mut self) -> Option<DocId> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for DocumentIds<'_> {
    fn next_back(&mut self) -> Option<DocId> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for DocumentIds<'_> {}

impl<'a> IntoIterator for &'a InvertedIndex {
    type Item = DocId;
    type IntoIter = DocumentIds<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> InvertedIndex {
        InvertedIndex::from_stop_words_text("in the").unwrap()
    }

    #[test]
    fn add_document_records_postings_and_frequencies() {
        let mut idx = index();
        idx.add_document(42, "cat in the city cat", DocumentStatus::Actual, &[1, 2, 3])
            .unwrap();
        let freqs = idx.word_frequencies(42);
        assert_eq!(freqs.len(), 2);
        assert!((freqs["cat"] - 2.0 / 3.0).abs() < 1e-12);
        assert!((freqs["city"] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(idx.posting_len("cat"), Some(1));
        assert_eq!(idx.posting_len("in"), None);
        assert_eq!(idx.document_rating(42), Some(2));
    }

    #[test]
    fn rejected_document_leaves_index_unchanged() {
        let mut idx = index();
        let err = idx
            .add_document(1, "good words then ba\u{2}d", DocumentStatus::Actual, &[])
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidArgument(_)));
        assert_eq!(idx.document_count(), 0);
        assert_eq!(idx.posting_len("good"), None);
        assert!(idx.word_frequencies(1).is_empty());
        assert!(idx.document_id(0).is_err());
    }

    #[test]
    fn document_of_only_stop_words_is_counted() {
        let mut idx = index();
        idx.add_document(3, "in the", DocumentStatus::Banned, &[]).unwrap();
        assert_eq!(idx.document_count(), 1);
        assert!(idx.word_frequencies(3).is_empty());
        assert_eq!(idx.document_status(3), Some(DocumentStatus::Banned));
    }

    #[test]
    fn iteration_is_ascending_and_restartable() {
        let mut idx = index();
        for id in [5, 1, 3] {
            idx.add_document(id, "word", DocumentStatus::Actual, &[]).unwrap();
        }
        assert_eq!(idx.iter().collect::<Vec<_>>(), vec![1, 3, 5]);
        assert_eq!((&idx).into_iter().len(), 3);
        assert_eq!(idx.iter().rev().next(), Some(5));
    }
}
