use std::collections::BTreeSet;

use crate::error::{Result, SearchError};
use crate::tokenizer::{ensure_valid_word, split_into_words, StopWords};

/// A parsed query. Words borrow from the raw query text.
///
/// Both sets are ordered so that evaluation visits words in a fixed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<'q> {
    pub plus_words: BTreeSet<&'q str>,
    pub minus_words: BTreeSet<&'q str>,
}

impl<'q> Query<'q> {
    pub fn is_empty(&self) -> bool {
        self.plus_words.is_empty() && self.minus_words.is_empty()
    }
}

struct QueryWord<'q> {
    data: &'q str,
    is_minus: bool,
}

fn parse_query_word(token: &str) -> Result<QueryWord<'_>> {
    ensure_valid_word(token, "query word")?;
    match token.strip_prefix('-') {
        None => Ok(QueryWord { data: token, is_minus: false }),
        Some("") => Err(SearchError::invalid_argument(
            "a minus sign must be followed by a word",
        )),
        Some(rest) if rest.starts_with('-') => Err(SearchError::invalid_argument(format!(
            "double minus in query word {token:?}"
        ))),
        Some(rest) => Ok(QueryWord { data: rest, is_minus: true }),
    }
}

/// Parse raw query text into plus and minus words.
///
/// Every token is validated before the query is returned; stop words are
/// dropped from both sets after classification.
pub fn parse_query<'q>(text: &'q str, stop_words: &StopWords) -> Result<Query<'q>> {
    let mut query = Query::default();
    for token in split_into_words(text) {
        let word = parse_query_word(token)?;
        if stop_words.contains(word.data) {
            continue;
        }
        if word.is_minus {
            query.minus_words.insert(word.data);
        } else {
            query.plus_words.insert(word.data);
        }
    }
    Ok(query)
}
