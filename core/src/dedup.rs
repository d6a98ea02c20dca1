use std::collections::HashSet;

use crate::index::InvertedIndex;
use crate::DocId;

/// Ids of documents whose word set equals that of a smaller live id.
pub fn find_duplicates(index: &InvertedIndex) -> Vec<DocId> {
    let mut seen: HashSet<Vec<&str>> = HashSet::new();
    let mut duplicates = Vec::new();
    for id in index {
        let words: Vec<&str> = index.word_frequencies(id).keys().map(String::as_str).collect();
        if !seen.insert(words) {
            duplicates.push(id);
        }
    }
    duplicates
}

/// Remove every document whose word set repeats one seen at a smaller id.
///
/// Term frequencies are ignored: only the set of words matters. Returns the
/// removed ids in ascending order.
pub fn remove_duplicates(index: &mut InvertedIndex) -> Vec<DocId> {
    let duplicates = find_duplicates(index);
    for &id in &duplicates {
        tracing::info!("Found duplicate document id {id}");
        index.remove_document(id);
    }
    duplicates
}
