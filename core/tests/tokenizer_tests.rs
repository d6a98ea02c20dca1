use search_core::tokenizer::{is_valid_word, split_into_words};
use search_core::{SearchError, StopWords};

#[test]
fn it_splits_on_spaces() {
    let words: Vec<&str> = split_into_words("cat with  big furry tail").collect();
    assert_eq!(words, vec!["cat", "with", "big", "furry", "tail"]);
}

#[test]
fn it_filters_stopwords() {
    let stop = StopWords::from_text("the and").unwrap();
    let words = stop.split_no_stop("The quick brown fox and the lazy dog").unwrap();
    // Matching is case sensitive
    assert!(words.contains(&"The"));
    assert!(!words.contains(&"the"));
    assert!(!words.contains(&"and"));
}

#[test]
fn it_rejects_control_characters_anywhere_in_text() {
    let stop = StopWords::from_text("").unwrap();
    let err = stop.split_no_stop("fine words\tbut not this").unwrap_err();
    assert!(matches!(err, SearchError::InvalidArgument(_)));
    assert!(!is_valid_word("line\nbreak"));
}

#[test]
fn stop_words_are_validated_at_construction() {
    assert!(StopWords::new(["in", "o\u{7}n"]).is_err());
    assert!(StopWords::from_text("in \u{1b}the").is_err());
}

#[test]
fn empty_stop_words_are_ignored() {
    let stop = StopWords::new(["", "in", "", "in"]).unwrap();
    assert_eq!(stop.len(), 1);
    assert!(!stop.contains(""));
}
