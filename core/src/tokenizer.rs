use lazy_static::lazy_static;
use std::collections::HashSet;

use crate::error::{Result, SearchError};

lazy_static! {
    static ref ENGLISH_STOPWORDS: Vec<&'static str> = vec![
        "a","about","above","after","again","against","all","am","an","and","any","are","as","at",
        "be","because","been","before","being","below","between","both","but","by",
        "can","cannot","could",
        "did","do","does","doing","down","during",
        "each","few","for","from","further",
        "had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
        "i","if","in","into","is","it","its","itself",
        "me","more","most","my","myself",
        "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
        "same","she","should","so","some","such",
        "than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
        "under","until","up","very",
        "was","we","were","what","when","where","which","while","who","whom","why","with","would",
        "you","your","yours","yourself","yourselves"
    ];
}

/// Split text into words on the ASCII space character.
///
/// Runs of spaces never yield empty words. Other control bytes stay inside
/// the word they appear in, which makes that word invalid.
pub fn split_into_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(' ').filter(|w| !w.is_empty())
}

/// A word is valid when it carries no control byte (below 0x20).
pub fn is_valid_word(word: &str) -> bool {
    !word.bytes().any(|b| b < b' ')
}

pub(crate) fn ensure_valid_word(word: &str, what: &str) -> Result<()> {
    if is_valid_word(word) {
        Ok(())
    } else {
        Err(SearchError::invalid_argument(format!(
            "{what} {word:?} contains control characters"
        )))
    }
}

/// Immutable set of words that are neither indexed nor used as query terms.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Build from any collection of words. Empty strings are ignored.
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = HashSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            ensure_valid_word(word, "stop word")?;
            set.insert(word.to_string());
        }
        Ok(Self { words: set })
    }

    /// Build from free text split on spaces.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::new(split_into_words(text))
    }

    /// The built-in English list.
    pub fn english() -> Self {
        Self {
            words: ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Union of both sets.
    pub fn merge(mut self, other: StopWords) -> Self {
        self.words.extend(other.words);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Split `text`, validate every word and drop stop words.
    ///
    /// Validation covers the whole text before anything is returned, so a
    /// caller never sees a partial word list for invalid input.
    pub fn split_no_stop<'t>(&self, text: &'t str) -> Result<Vec<&'t str>> {
        let mut words = Vec::new();
        for word in split_into_words(text) {
            ensure_valid_word(word, "document word")?;
            if !self.contains(word) {
                words.push(word);
            }
        }
        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_spaces_only() {
        let words: Vec<&str> = split_into_words("  cat  in\tthe city ").collect();
        assert_eq!(words, vec!["cat", "in\tthe", "city"]);
    }

    #[test]
    fn control_bytes_are_invalid() {
        assert!(is_valid_word("furry"));
        assert!(is_valid_word("пёс"));
        assert!(!is_valid_word("cat\u{12}"));
        assert!(!is_valid_word("\n"));
    }

    #[test]
    fn english_list_is_populated() {
        let stop = StopWords::english();
        assert!(stop.contains("the"));
        assert!(!stop.contains("cat"));
    }

    #[test]
    fn merge_keeps_both_sets() {
        let stop = StopWords::from_text("foo").unwrap().merge(StopWords::english());
        assert!(stop.contains("foo"));
        assert!(stop.contains("the"));
        assert_eq!(stop.iter().count(), stop.len());
    }
}
