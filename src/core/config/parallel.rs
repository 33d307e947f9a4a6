//! Parallel processing configuration for the per-language fan-out.

use serde::{Deserialize, Serialize};

/// Controls how the engines of one request are scheduled.
///
/// Engines for different languages are independent, so a request may run
/// them concurrently on the rayon pool. Results are always reduced back into
/// request order before they are arbitrated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallelPolicy {
    /// Maximum number of threads to use for parallel processing.
    /// If None, rayon will use the default thread pool size (typically number of CPU cores).
    /// Default: None (use rayon's default)
    #[serde(default)]
    pub max_threads: Option<usize>,

    /// Whether the engines of one request run concurrently.
    /// Default: true
    #[serde(default = "ParallelPolicy::default_parallel_languages")]
    pub parallel_languages: bool,
}

impl ParallelPolicy {
    /// Create a new ParallelPolicy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of threads.
    pub fn with_max_threads(mut self, max_threads: Option<usize>) -> Self {
        self.max_threads = max_threads;
        self
    }

    /// Enable or disable concurrent engine execution within a request.
    pub fn with_parallel_languages(mut self, enabled: bool) -> Self {
        self.parallel_languages = enabled;
        self
    }

    /// Policy that runs every engine of a request on the calling thread.
    pub fn sequential() -> Self {
        Self::default().with_parallel_languages(false)
    }

    /// Install the global rayon thread pool with the configured number of threads.
    ///
    /// This method should be called once at application startup before any parallel
    /// processing occurs. If `max_threads` is None, this method does nothing and
    /// rayon will use its default thread pool size.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the thread pool was successfully configured
    /// - `Ok(false)` if `max_threads` is None (no configuration needed)
    /// - `Err` if the thread pool has already been initialized
    pub fn install_global_thread_pool(&self) -> Result<bool, rayon::ThreadPoolBuildError> {
        if let Some(num_threads) = self.max_threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build_global()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn default_parallel_languages() -> bool {
        true
    }
}

impl Default for ParallelPolicy {
    fn default() -> Self {
        Self {
            max_threads: None,
            parallel_languages: Self::default_parallel_languages(),
        }
    }
}
