//! Thresholds for parallel computation activation.
//!
//! Product manifolds compute their factors independently, so per-factor work
//! can be spread across threads. For small products the scheduling overhead
//! dominates; these thresholds decide when splitting pays off.
//!
//! The thresholds scale with the number of available threads: more threads
//! means more coordination overhead, so larger problems are required before
//! parallel execution is selected.

use std::sync::OnceLock;

/// Global configuration for parallel thresholds
static GLOBAL_CONFIG: OnceLock<ParallelThresholdsConfig> = OnceLock::new();

/// Configuration for parallel execution thresholds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelThresholdsConfig {
    /// Minimum number of product factors (columns) before going parallel
    pub column_threshold: usize,

    /// Minimum total number of scalars (rows × columns) before going parallel
    pub element_threshold: usize,

    /// Number of available threads (cached)
    pub num_threads: usize,

    /// Minimum number of columns handled by one task
    pub min_columns_per_task: usize,
}

impl Default for ParallelThresholdsConfig {
    fn default() -> Self {
        let num_threads = rayon::current_num_threads();

        let base_columns = 64;
        let base_elements = 8_192;

        let thread_scaling = (num_threads as f64).sqrt();

        Self {
            column_threshold: (base_columns as f64 * thread_scaling) as usize,
            element_threshold: (base_elements as f64 * thread_scaling) as usize,
            num_threads,
            min_columns_per_task: 16,
        }
    }
}

/// Builder for customizing parallel thresholds
#[derive(Debug, Default)]
pub struct ParallelThresholdsBuilder {
    config: ParallelThresholdsConfig,
}

impl ParallelThresholdsBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column-count threshold
    pub fn column_threshold(mut self, threshold: usize) -> Self {
        self.config.column_threshold = threshold;
        self
    }

    /// Set the total element-count threshold
    pub fn element_threshold(mut self, threshold: usize) -> Self {
        self.config.element_threshold = threshold;
        self
    }

    /// Set the minimum number of columns per task
    pub fn min_columns_per_task(mut self, columns: usize) -> Self {
        self.config.min_columns_per_task = columns.max(1);
        self
    }

    /// Build the configuration
    pub fn build(self) -> ParallelThresholdsConfig {
        self.config
    }
}

/// Get the global parallel thresholds configuration
pub fn get_parallel_config() -> &'static ParallelThresholdsConfig {
    GLOBAL_CONFIG.get_or_init(ParallelThresholdsConfig::default)
}

/// Set custom parallel thresholds configuration.
///
/// Succeeds only before the configuration is first read; afterwards the
/// rejected configuration is handed back.
pub fn set_parallel_config(
    config: ParallelThresholdsConfig,
) -> Result<(), ParallelThresholdsConfig> {
    let result = GLOBAL_CONFIG.set(config);
    if result.is_ok() {
        tracing::debug!(config = ?get_parallel_config(), "parallel thresholds configured");
    }
    result
}

/// Trait for determining if an operation should be parallelized
pub trait ShouldParallelize {
    /// Check if a column-wise operation over `ncols` columns of length `nrows`
    /// should run in parallel
    fn should_parallelize_columns(&self, nrows: usize, ncols: usize) -> bool;

    /// Number of columns each parallel task should process
    fn optimal_chunk_size(&self, ncols: usize) -> usize;
}

impl ShouldParallelize for ParallelThresholdsConfig {
    fn should_parallelize_columns(&self, nrows: usize, ncols: usize) -> bool {
        self.num_threads > 1
            && ncols >= self.column_threshold
            && nrows.saturating_mul(ncols) >= self.element_threshold
    }

    fn optimal_chunk_size(&self, ncols: usize) -> usize {
        // Some oversubscription for load balancing
        let ideal_chunks = self.num_threads * 4;
        let chunk_size = ncols.div_ceil(ideal_chunks);
        chunk_size.max(self.min_columns_per_task)
    }
}

/// Helper for the common decisions, backed by the global configuration
pub struct ParallelDecision;

impl ParallelDecision {
    /// Should a column-wise operation on a `nrows × ncols` array be parallel?
    pub fn columns(nrows: usize, ncols: usize) -> bool {
        get_parallel_config().should_parallelize_columns(nrows, ncols)
    }

    /// Columns per task for a parallel column-wise operation
    pub fn chunk_size(ncols: usize) -> usize {
        get_parallel_config().optimal_chunk_size(ncols)
    }
}
