use search_core::{Document, DocumentStatus, ExecutionMode, InvertedIndex, SearchError};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

fn pets_index() -> InvertedIndex {
    let mut idx = InvertedIndex::from_stop_words_text("and in on").unwrap();
    idx.add_document(0, "white cat and fashionable collar", DocumentStatus::Actual, &[8, -3])
        .unwrap();
    idx.add_document(1, "fluffy cat fluffy tail", DocumentStatus::Actual, &[7, 2, 7])
        .unwrap();
    idx.add_document(2, "groomed dog expressive eyes", DocumentStatus::Actual, &[5, -12, 2, 1])
        .unwrap();
    idx.add_document(3, "groomed starling eugene", DocumentStatus::Banned, &[9])
        .unwrap();
    idx
}

#[test]
fn identical_query_scores_ln_two() {
    let mut idx = InvertedIndex::from_stop_words_text("").unwrap();
    idx.add_document(1, "cat with big furry tail", DocumentStatus::Actual, &[1, 2, 3, 4, 5])
        .unwrap();
    idx.add_document(2, "little dog without collar", DocumentStatus::Actual, &[1, 2, 3, 4, 5])
        .unwrap();
    let found = idx.find_top_documents("cat with big furry tail").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 1);
    assert_eq!(found[0].rating, 3);
    assert_close(found[0].relevance, 2f64.ln());
}

#[test]
fn tf_idf_ranking_with_rating_tie_break() {
    let idx = pets_index();
    let found = idx.find_top_documents("fluffy groomed cat").unwrap();
    let ids: Vec<i32> = found.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![1, 0, 2]);
    assert_close(found[0].relevance, 0.866434);
    assert_close(found[1].relevance, 0.173287);
    assert_close(found[2].relevance, 0.173287);
    assert_eq!(found[0].rating, 5);
    assert_eq!(found[1].rating, 2);
    assert_eq!(found[2].rating, -1);
}

#[test]
fn status_filter() {
    let idx = pets_index();
    let banned = idx
        .find_top_documents_by_status("fluffy groomed cat", DocumentStatus::Banned)
        .unwrap();
    assert_eq!(banned.len(), 1);
    assert_eq!(banned[0].id, 3);
    assert_close(banned[0].relevance, 2f64.ln() / 3.0);
    assert!(idx
        .find_top_documents_by_status("fluffy", DocumentStatus::Removed)
        .unwrap()
        .is_empty());
}

#[test]
fn custom_predicate() {
    let idx = pets_index();
    let even = idx
        .find_top_documents_by("fluffy groomed cat", |id, _, _| id % 2 == 0)
        .unwrap();
    let ids: Vec<i32> = even.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![0, 2]);

    let rated = idx
        .find_top_documents_by("groomed", |_, _, rating| rating > 5)
        .unwrap();
    assert_eq!(rated.len(), 1);
    assert_eq!(rated[0].id, 3);
}

#[test]
fn absent_words_find_nothing() {
    let idx = pets_index();
    assert!(idx.find_top_documents("parrot hamster").unwrap().is_empty());
    assert!(idx.find_top_documents("").unwrap().is_empty());
}

#[test]
fn minus_words_exclude_documents() {
    let mut idx = InvertedIndex::from_stop_words_text("").unwrap();
    idx.add_document(0, "cat in the city now", DocumentStatus::Actual, &[1, 2, 3])
        .unwrap();
    idx.add_document(1, "cat in the kingdom", DocumentStatus::Actual, &[1, 2, 3])
        .unwrap();
    let found = idx.find_top_documents("cat in -city -now").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 1);

    let only_minus = idx.find_top_documents("-kingdom").unwrap();
    assert!(only_minus.is_empty());
}

#[test]
fn stop_words_are_excluded_from_queries() {
    let mut idx = InvertedIndex::from_stop_words_text("in the").unwrap();
    idx.add_document(42, "cat in the city", DocumentStatus::Actual, &[1, 2, 3])
        .unwrap();
    assert!(idx.find_top_documents("in").unwrap().is_empty());
    assert_eq!(idx.find_top_documents("in city").unwrap().len(), 1);
}

#[test]
fn results_are_truncated_to_five() {
    let mut idx = InvertedIndex::from_stop_words_text("").unwrap();
    for id in 0..8 {
        let text = format!("common word{id}");
        idx.add_document(id, &text, DocumentStatus::Actual, &[id]).unwrap();
    }
    idx.add_document(8, "other", DocumentStatus::Actual, &[]).unwrap();
    let found = idx.find_top_documents("common").unwrap();
    assert_eq!(found.len(), 5);
    // Equal relevance everywhere, so ratings decide.
    let ratings: Vec<i32> = found.iter().map(|d| d.rating).collect();
    assert_eq!(ratings, vec![7, 6, 5, 4, 3]);
}

#[test]
fn results_are_sorted_by_relevance() {
    let mut idx = InvertedIndex::from_stop_words_text("").unwrap();
    idx.add_document(0, "big fat cat", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
    idx.add_document(1, "git fat cat", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
    idx.add_document(2, "cat little mouse", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
    idx.add_document(3, "soba boba aboba", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
    let found = idx.find_top_documents("big fat cat").unwrap();
    assert_eq!(found.len(), 3);
    for pair in found.windows(2) {
        assert!(pair[0].relevance - pair[1].relevance >= 1e-6);
    }
}

#[test]
fn malformed_queries_are_rejected() {
    let idx = pets_index();
    for query in ["--foo", "-", "cat -", "ca\u{3}t", "cat --dog"] {
        assert!(
            matches!(idx.find_top_documents(query), Err(SearchError::InvalidArgument(_))),
            "query {query:?} should fail"
        );
        assert!(idx.par_find_top_documents(query).is_err());
    }
}

#[test]
fn match_document_returns_plus_words() {
    let idx = pets_index();
    let (words, status) = idx.match_document("fluffy cat collar", 1).unwrap();
    assert_eq!(words, vec!["cat", "fluffy"]);
    assert_eq!(status, DocumentStatus::Actual);

    let (words, status) = idx.match_document("groomed eugene", 3).unwrap();
    assert_eq!(words, vec!["eugene", "groomed"]);
    assert_eq!(status, DocumentStatus::Banned);
}

#[test]
fn match_document_minus_word_clears_result() {
    let idx = pets_index();
    let (words, status) = idx.match_document("fluffy cat -tail", 1).unwrap();
    assert!(words.is_empty());
    assert_eq!(status, DocumentStatus::Actual);

    let (words, _) = idx.par_match_document("fluffy cat -tail", 1).unwrap();
    assert!(words.is_empty());
}

#[test]
fn match_document_unknown_id() {
    let idx = pets_index();
    assert_eq!(
        idx.match_document("cat", 99),
        Err(SearchError::DocumentNotFound(99))
    );
    assert_eq!(
        idx.par_match_document("cat", 99),
        Err(SearchError::DocumentNotFound(99))
    );
}

#[test]
fn parallel_forms_match_sequential() {
    let idx = pets_index();
    for query in ["fluffy groomed cat", "cat -fluffy", "groomed eyes dog", "tail"] {
        assert_eq!(
            idx.find_top_documents(query).unwrap(),
            idx.par_find_top_documents(query).unwrap()
        );
        assert_eq!(
            idx.find_top_documents_by_status(query, DocumentStatus::Banned).unwrap(),
            idx.par_find_top_documents_by_status(query, DocumentStatus::Banned).unwrap()
        );
        assert_eq!(
            idx.find_top_documents_by(query, |id, _, _| id != 1).unwrap(),
            idx.par_find_top_documents_by(query, |id, _, _| id != 1).unwrap()
        );
        for id in idx.iter() {
            assert_eq!(
                idx.match_document(query, id).unwrap(),
                idx.par_match_document(query, id).unwrap()
            );
        }
    }
}

#[test]
fn removed_documents_never_reappear() {
    let mut idx = pets_index();
    idx.par_remove_document(1);
    let found: Vec<Document> = idx
        .find_top_documents_with(ExecutionMode::Parallel, "fluffy cat", |_, _, _| true)
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 0);
    // "fluffy" now has an empty posting list.
    assert_eq!(idx.posting_len("fluffy"), Some(0));
    assert!(idx.match_document("fluffy", 1).is_err());
}
