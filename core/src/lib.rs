//! In-process TF-IDF search over a mutable corpus of short documents.
//!
//! Documents are split on spaces, stop words are dropped and the remaining
//! words feed an inverted index. Queries combine plus-words and `-minus`
//! words; results are ranked by TF-IDF and can be evaluated sequentially or
//! on a worker pool with identical answers.

pub mod accumulator;
pub mod batch;
pub mod config;
pub mod dedup;
pub mod document;
pub mod error;
pub mod index;
pub mod paginate;
pub mod query;
mod ranking;
mod remove;
pub mod request_queue;
pub mod tokenizer;

pub type DocId = i32;

pub use accumulator::ConcurrentAccumulator;
pub use batch::{process_queries, process_queries_joined};
pub use config::{ExecutionMode, SearchConfig};
pub use dedup::remove_duplicates;
pub use document::{Document, DocumentStatus};
pub use error::{Result, SearchError};
pub use index::{InvertedIndex, WordFrequencies};
pub use paginate::{paginate, Page, Paginator};
pub use query::{parse_query, Query};
pub use request_queue::RequestQueue;
pub use tokenizer::StopWords;
