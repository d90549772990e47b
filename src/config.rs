//! Search configuration.

/// Default k-d tree leaf capacity.
pub const DEFAULT_LEAF_SIZE: usize = 10;

/// Default minimum amount of work (queries or batches) before fanning out to threads.
pub const DEFAULT_MIN_PARALLEL_LEN: usize = 256;

/// Tunables shared by every entry point.
///
/// None of these settings change the result of a search, only how it is
/// computed.
///
/// # Examples
/// ```
/// use radius_neighbors::SearchConfig;
///
/// let config = SearchConfig::default().with_leaf_size(32).with_parallel(false);
/// assert_eq!(config.leaf_size, 32);
/// assert!(!config.parallel);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Maximum number of points stored in a k-d tree leaf
    pub leaf_size: usize,
    /// Run batches and queries on the rayon thread pool (needs the `parallel` feature)
    pub parallel: bool,
    /// Inputs shorter than this are processed sequentially
    pub min_parallel_len: usize,
}

impl SearchConfig {
    /// Creates the default configuration
    pub const fn new() -> Self {
        Self {
            leaf_size: DEFAULT_LEAF_SIZE,
            parallel: true,
            min_parallel_len: DEFAULT_MIN_PARALLEL_LEN,
        }
    }

    /// Sets the k-d tree leaf capacity (clamped to at least 1)
    #[must_use]
    pub fn with_leaf_size(mut self, leaf_size: usize) -> Self {
        self.leaf_size = leaf_size.max(1);
        self
    }

    /// Enables or disables multi-threaded execution
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the threshold below which work is never split across threads
    #[must_use]
    pub fn with_min_parallel_len(mut self, min_parallel_len: usize) -> Self {
        self.min_parallel_len = min_parallel_len;
        self
    }

    /// Whether `len` units of work should be spread across threads
    pub(crate) fn use_threads(&self, len: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && len >= self.min_parallel_len.max(2)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new()
    }
}
