use rayon::prelude::*;

use crate::config::ExecutionMode;
use crate::index::InvertedIndex;
use crate::DocId;

impl InvertedIndex {
    /// Remove a document and all of its postings. Unknown ids are ignored.
    ///
    /// Returns whether a document was removed.
    pub fn remove_document(&mut self, id: DocId) -> bool {
        self.remove_document_with(ExecutionMode::Sequential, id)
    }

    /// Like [`remove_document`](Self::remove_document), erasing the
    /// document's posting entries from the worker pool.
    pub fn par_remove_document(&mut self, id: DocId) -> bool {
        self.remove_document_with(ExecutionMode::Parallel, id)
    }

    pub fn remove_document_with(&mut self, mode: ExecutionMode, id: DocId) -> bool {
        if !self.documents.contains_key(&id) {
            return false;
        }
        let words = self.document_words.remove(&id).unwrap_or_default();

        // Each word owns a distinct posting list, so workers never touch the
        // same entry.
        let postings = &self.postings;
        let erase = |word: &String| {
            if let Some(mut list) = postings.get_mut(word) {
                list.remove(&id);
            }
        };
        match mode {
            ExecutionMode::Sequential => words.keys().for_each(erase),
            ExecutionMode::Parallel => self
                .pool
                .install(|| words.par_iter().for_each(|(word, _)| erase(word))),
        }

        self.documents.remove(&id);
        self.retired.insert(id);
        tracing::debug!(doc_id = id, words = words.len(), ?mode, "document removed");
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::{DocumentStatus, InvertedIndex};

    #[test]
    fn removal_erases_postings_but_keeps_lists() {
        let mut idx = InvertedIndex::from_stop_words_text("").unwrap();
        idx.add_document(1, "white cat", DocumentStatus::Actual, &[]).unwrap();
        idx.add_document(2, "black cat", DocumentStatus::Actual, &[]).unwrap();

        assert!(idx.remove_document(1));
        assert_eq!(idx.posting_len("cat"), Some(1));
        assert_eq!(idx.posting_len("white"), Some(0));
        assert!(idx.word_frequencies(1).is_empty());
        assert_eq!(idx.document_count(), 1);

        assert!(!idx.remove_document(1));
        assert_eq!(idx.document_count(), 1);
    }

    #[test]
    fn parallel_removal_matches_sequential() {
        let mut seq = InvertedIndex::from_stop_words_text("").unwrap();
        let mut par = InvertedIndex::from_stop_words_text("").unwrap();
        for idx in [&mut seq, &mut par] {
            idx.add_document(1, "a b c d e f g", DocumentStatus::Actual, &[]).unwrap();
            idx.add_document(2, "a c e g", DocumentStatus::Actual, &[]).unwrap();
        }
        seq.remove_document(1);
        par.par_remove_document(1);
        for word in ["a", "b", "c", "d", "e", "f", "g"] {
            assert_eq!(seq.posting_len(word), par.posting_len(word));
        }
        assert_eq!(seq.iter().collect::<Vec<_>>(), par.iter().collect::<Vec<_>>());
    }
}
