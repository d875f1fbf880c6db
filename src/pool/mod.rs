//! The bounded worker pool and shared [`Tally`].
//!
//! A fixed-size pool of OS threads, each pulling file paths off a shared
//! queue and running them to completion with its own [`Executor`]. This is
//! a hand-rolled `std::thread` + `std::sync::mpsc` pool rather than an
//! async task scheduler, since these workers spend almost all of their
//! time blocked on network I/O rather than yielding to a scheduler.

use std::io::Write;
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::executor::Executor;
use crate::reporting::ErrorSink;
use crate::runner;

/// The four monotonically increasing counters for one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Counters {
    pub total: u64,
    pub pass: u64,
    pub fail: u64,
    pub invalid: u64,
}

/// Process-wide pass/fail/invalid counters, guarded by a single mutex.
///
/// Atomics are a legitimate alternative, but a single mutex around four
/// counters read exactly once, after every worker has joined, isn't worth
/// trading away for lock-free counters.
pub struct Tally {
    counters: Mutex<Counters>,
}

impl Tally {
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(Counters::default()),
        }
    }

    pub fn inc_total(&self) {
        self.counters.lock().expect("tally mutex poisoned").total += 1;
    }

    pub fn inc_pass(&self) {
        self.counters.lock().expect("tally mutex poisoned").pass += 1;
    }

    pub fn inc_fail(&self) {
        self.counters.lock().expect("tally mutex poisoned").fail += 1;
    }

    pub fn inc_invalid(&self) {
        self.counters.lock().expect("tally mutex poisoned").invalid += 1;
    }

    /// Reads all four counters at once. Intended to be called only after
    /// every worker has joined — the lock is still taken here for
    /// correctness under Rust's aliasing rules, but there is no contention
    /// left to wait on by the time callers reach this point.
    pub fn snapshot(&self) -> Counters {
        *self.counters.lock().expect("tally mutex poisoned")
    }
}

impl Default for Tally {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs every path in `files` across a fixed-size pool of `thread_count`
/// worker threads, returning the final [`Counters`] once all files have
/// been classified.
///
/// `N = max(1, thread_count)`.
pub fn run<W: Write + Send + 'static>(
    files: Vec<PathBuf>,
    thread_count: usize,
    timeout: Duration,
    sink: Arc<ErrorSink<W>>,
) -> Counters {
    let worker_count = thread_count.max(1);
    let tally = Arc::new(Tally::new());

    tracing::info!(workers = worker_count, files = files.len(), "starting worker pool");

    let (tx, rx) = mpsc::channel::<PathBuf>();
    let rx = Arc::new(Mutex::new(rx));

    let handles: Vec<_> = (0..worker_count)
        .map(|worker_id| {
            let rx = Arc::clone(&rx);
            let tally = Arc::clone(&tally);
            let sink = Arc::clone(&sink);
            thread::spawn(move || {
                let executor = match Executor::new(timeout) {
                    Ok(executor) => executor,
                    Err(error) => {
                        tracing::error!(worker_id, %error, "worker failed to build HTTP client");
                        return;
                    }
                };
                loop {
                    let next = rx.lock().expect("work queue mutex poisoned").recv();
                    match next {
                        Ok(path) => {
                            runner::run_file(&path, &executor, sink.as_ref(), &tally);
                        }
                        Err(_) => break,
                    }
                }
            })
        })
        .collect();

    for path in files {
        // The receiver is never dropped before every path is sent, so this
        // can only fail if a worker thread panicked — the pool still
        // drains the remaining workers below.
        let _ = tx.send(path);
    }
    drop(tx);

    for handle in handles {
        let _ = handle.join();
    }

    tracing::info!("worker pool drained");
    tally.snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_counts_are_independent() {
        let tally = Tally::new();
        tally.inc_total();
        tally.inc_total();
        tally.inc_pass();
        tally.inc_fail();
        tally.inc_invalid();
        let counters = tally.snapshot();
        assert_eq!(counters.total, 2);
        assert_eq!(counters.pass, 1);
        assert_eq!(counters.fail, 1);
        assert_eq!(counters.invalid, 1);
    }

    #[test]
    fn empty_file_list_yields_zero_tally() {
        let sink = Arc::new(ErrorSink::new(Vec::<u8>::new()));
        let counters = run(vec![], 4, Duration::from_secs(1), sink);
        assert_eq!(counters.total, 0);
    }
}
