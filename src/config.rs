//! Run configuration assembled from CLI args and the environment.

use std::path::PathBuf;
use std::time::Duration;

/// Default per-request timeout. Not currently CLI-configurable.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything a run of the test engine needs, independent of how it was
/// parsed from argv/the environment.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub paths: Vec<PathBuf>,
    pub thread_count: usize,
    pub request_timeout: Duration,
}

/// Reads `HTTP_THREAD_COUNT`: a positive integer, defaulting to `1`. A
/// present-but-unparsable or non-positive value is clamped to `1` with a
/// `tracing::warn!`, rather than aborting the run — this env var is an
/// ambient convenience knob, not a hard contract.
pub fn thread_count_from_env() -> usize {
    match std::env::var("HTTP_THREAD_COUNT") {
        Ok(raw) => match raw.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                tracing::warn!(value = %raw, "HTTP_THREAD_COUNT is not a positive integer; using 1");
                1
            }
        },
        Err(_) => 1,
    }
}

impl RunConfig {
    pub fn new(paths: Vec<PathBuf>, thread_count: usize) -> Self {
        Self {
            paths,
            thread_count: thread_count.max(1),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}
