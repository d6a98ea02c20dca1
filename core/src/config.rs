use serde::Deserialize;

pub const DEFAULT_PARALLEL_WORKERS: usize = 10;
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;
pub const RELEVANCE_EPSILON: f64 = 1e-6;

/// How an operation distributes its work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Everything runs on the calling thread.
    #[default]
    Sequential,
    /// Work fans out to the index's worker pool and joins before returning.
    Parallel,
}

impl ExecutionMode {
    /// Number of accumulator shards used when scoring in this mode.
    pub fn shard_count(self, config: &SearchConfig) -> usize {
        match self {
            ExecutionMode::Sequential => 1,
            ExecutionMode::Parallel => config.parallel_workers.max(1),
        }
    }
}

/// Tunables captured once when the index is built.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Worker threads in the parallel pool, also the shard count of the
    /// relevance accumulator in parallel mode.
    pub parallel_workers: usize,
    /// Upper bound on the length of a ranked result list.
    pub max_results: usize,
    /// Relevance values closer than this are ordered by rating instead.
    pub relevance_epsilon: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            parallel_workers: DEFAULT_PARALLEL_WORKERS,
            max_results: MAX_RESULT_DOCUMENT_COUNT,
            relevance_epsilon: RELEVANCE_EPSILON,
        }
    }
}

impl SearchConfig {
    pub fn with_parallel_workers(mut self, workers: usize) -> Self {
        self.parallel_workers = workers.max(1);
        self
    }
}
