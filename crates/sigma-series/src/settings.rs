//! Process-wide tuning knobs and the shared multiplication thread pool.
//!
//! Readers take a [`snapshot`] so a multiplication sees one consistent set
//! of values even if another thread changes them mid-flight.

use std::sync::{Arc, OnceLock};

use parking_lot::{Mutex, RwLock};
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SeriesError};

/// Default minimum number of term products per worker thread.
pub const DEFAULT_MIN_WORK_PER_THREAD: u64 = 250_000;

/// Default number of terms printed by `Display`.
pub const DEFAULT_MAX_TERM_OUTPUT: usize = 20;

/// Global engine settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Maximum number of threads used by a multiplication.
    pub n_threads: usize,
    /// Pin worker threads to cores.
    pub thread_binding: bool,
    /// Minimum number of term products assigned to one thread.
    pub min_work_per_thread: u64,
    /// Maximum number of terms shown when printing a series.
    pub max_term_output: usize,
}

fn default_n_threads() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            n_threads: default_n_threads(),
            thread_binding: false,
            min_work_per_thread: DEFAULT_MIN_WORK_PER_THREAD,
            max_term_output: DEFAULT_MAX_TERM_OUTPUT,
        }
    }
}

impl Settings {
    /// Number of threads to use for `work` term products.
    #[must_use]
    pub fn threads_for(&self, work: u64) -> usize {
        let by_work = usize::try_from(work / self.min_work_per_thread.max(1)).unwrap_or(usize::MAX);
        self.n_threads.min(by_work.max(1)).max(1)
    }
}

fn global() -> &'static RwLock<Settings> {
    static SETTINGS: OnceLock<RwLock<Settings>> = OnceLock::new();
    SETTINGS.get_or_init(|| RwLock::new(Settings::default()))
}

/// A copy of the current settings.
#[must_use]
pub fn snapshot() -> Settings {
    global().read().clone()
}

/// Current thread count.
#[must_use]
pub fn n_threads() -> usize {
    global().read().n_threads
}

/// Sets the thread count.
///
/// # Errors
///
/// `InvalidArgument` if `n` is zero.
pub fn set_n_threads(n: usize) -> Result<()> {
    if n == 0 {
        return Err(SeriesError::invalid("the number of threads must be strictly positive"));
    }
    global().write().n_threads = n;
    Ok(())
}

/// Restores the default thread count.
pub fn reset_n_threads() {
    global().write().n_threads = default_n_threads();
}

/// Whether worker threads are pinned to cores.
#[must_use]
pub fn thread_binding() -> bool {
    global().read().thread_binding
}

/// Enables or disables thread pinning.
pub fn set_thread_binding(flag: bool) {
    global().write().thread_binding = flag;
}

/// Disables thread pinning.
pub fn reset_thread_binding() {
    global().write().thread_binding = false;
}

/// Current minimum work per thread.
#[must_use]
pub fn min_work_per_thread() -> u64 {
    global().read().min_work_per_thread
}

/// Sets the minimum work per thread.
///
/// # Errors
///
/// `InvalidArgument` if `n` is zero.
pub fn set_min_work_per_thread(n: u64) -> Result<()> {
    if n == 0 {
        return Err(SeriesError::invalid(
            "the minimum work per thread must be strictly positive",
        ));
    }
    global().write().min_work_per_thread = n;
    Ok(())
}

/// Restores the default minimum work per thread.
pub fn reset_min_work_per_thread() {
    global().write().min_work_per_thread = DEFAULT_MIN_WORK_PER_THREAD;
}

/// Maximum number of printed terms.
#[must_use]
pub fn max_term_output() -> usize {
    global().read().max_term_output
}

/// Sets the maximum number of printed terms.
pub fn set_max_term_output(n: usize) {
    global().write().max_term_output = n;
}

/// Restores the default number of printed terms.
pub fn reset_max_term_output() {
    global().write().max_term_output = DEFAULT_MAX_TERM_OUTPUT;
}

struct CachedPool {
    n_threads: usize,
    binding: bool,
    pool: Arc<ThreadPool>,
}

fn pin_current_thread(index: usize) {
    match core_affinity::get_core_ids() {
        Some(ids) if !ids.is_empty() => {
            let id = ids[index % ids.len()];
            if !core_affinity::set_for_current(id) {
                warn!(index, "failed to bind worker thread to core {}", id.id);
            }
        }
        _ => warn!(index, "core list unavailable, worker thread left unbound"),
    }
}

/// The shared pool for `n_threads` workers, rebuilt when the thread count
/// or binding changes.
///
/// # Errors
///
/// Fails if the pool cannot be built.
pub(crate) fn thread_pool(n_threads: usize, binding: bool) -> Result<Arc<ThreadPool>> {
    static POOL: OnceLock<Mutex<Option<CachedPool>>> = OnceLock::new();
    let mut guard = POOL.get_or_init(|| Mutex::new(None)).lock();
    if let Some(cached) = guard.as_ref() {
        if cached.n_threads == n_threads && cached.binding == binding {
            return Ok(Arc::clone(&cached.pool));
        }
    }
    debug!(n_threads, binding, "building multiplication thread pool");
    let pool = ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .thread_name(|i| format!("sigma-mul-{i}"))
        .start_handler(move |i| {
            if binding {
                pin_current_thread(i);
            }
        })
        .build()
        .map_err(|e| SeriesError::invalid(format!("unable to build the thread pool: {e}")))?;
    let pool = Arc::new(pool);
    *guard = Some(CachedPool {
        n_threads,
        binding,
        pool: Arc::clone(&pool),
    });
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threads_for() {
        let s = Settings {
            n_threads: 8,
            thread_binding: false,
            min_work_per_thread: 100,
            max_term_output: 20,
        };
        assert_eq!(s.threads_for(0), 1);
        assert_eq!(s.threads_for(99), 1);
        assert_eq!(s.threads_for(350), 3);
        assert_eq!(s.threads_for(1_000_000), 8);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = set_n_threads(0).unwrap_err();
        assert_eq!(err.message(), "the number of threads must be strictly positive");
        assert!(set_min_work_per_thread(0).is_err());
    }

    #[test]
    fn test_settings_serde() {
        let s = Settings::default();
        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
        assert_eq!(s.max_term_output, DEFAULT_MAX_TERM_OUTPUT);
    }

    #[test]
    fn test_pool_thread_count() {
        let a = thread_pool(2, false).unwrap();
        assert_eq!(a.current_num_threads(), 2);
        let b = thread_pool(3, false).unwrap();
        assert_eq!(b.current_num_threads(), 3);
    }
}
