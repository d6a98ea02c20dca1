use rayon::prelude::*;

use crate::document::Document;
use crate::error::Result;
use crate::index::InvertedIndex;

/// Evaluate many queries concurrently on the index's worker pool.
///
/// Each query uses the default `Actual` filter. Results keep the input
/// order. When several queries fail, the error of the one earliest in
/// `queries` is returned.
pub fn process_queries<S>(index: &InvertedIndex, queries: &[S]) -> Result<Vec<Vec<Document>>>
where
    S: AsRef<str> + Sync,
{
    let results: Vec<Result<Vec<Document>>> = index.pool.install(|| {
        queries
            .par_iter()
            .map(|query| index.find_top_documents(query.as_ref()))
            .collect()
    });
    results.into_iter().collect()
}

/// Like [`process_queries`], flattened into one list in query order.
pub fn process_queries_joined<S>(index: &InvertedIndex, queries: &[S]) -> Result<Vec<Document>>
where
    S: AsRef<str> + Sync,
{
    Ok(process_queries(index, queries)?.into_iter().flatten().collect())
}
