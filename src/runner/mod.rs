//! The per-file test runner.
//!
//! `run_file` is the single policy point: it parses, then executes each
//! request in order, stopping at the first request whose [`Diagnostic`] is
//! non-empty or whose transport call fails, classifying the file exactly
//! once and updating the shared [`Tally`] exactly once.

use std::io::Write;
use std::path::Path;

use crate::evaluator;
use crate::executor::Executor;
use crate::parser;
use crate::pool::Tally;
use crate::reporting::ErrorSink;

/// The per-file verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
    Invalid,
}

/// Runs every request in `path` in order, reporting failures to `sink` and
/// updating `tally`. Returns the file's classified [`Outcome`].
pub fn run_file<W: Write>(
    path: &Path,
    executor: &Executor,
    sink: &ErrorSink<W>,
    tally: &Tally,
) -> Outcome {
    tally.inc_total();

    let requests = match parser::parse_file(path) {
        Ok(requests) => requests,
        Err(error) => {
            sink.report_file_error(path, &error.to_string());
            tally.inc_invalid();
            tracing::info!(path = %path.display(), %error, "file invalid: parse error");
            return Outcome::Invalid;
        }
    };

    for request in &requests {
        tracing::debug!(path = %path.display(), method = %request.method, url = %request.url, "running request");

        let response = match executor.execute(request) {
            Ok(response) => response,
            Err(error) => {
                sink.report_file_error(path, &error.to_string());
                tally.inc_invalid();
                tracing::info!(path = %path.display(), %error, "file invalid: transport error");
                return Outcome::Invalid;
            }
        };

        let diagnostic = evaluator::check(request, &response, path);
        if !diagnostic.is_empty() {
            sink.report_failures(&diagnostic.failures);
            tally.inc_fail();
            tracing::info!(path = %path.display(), failures = diagnostic.failures.len(), "file failed");
            return Outcome::Fail;
        }
    }

    tally.inc_pass();
    tracing::info!(path = %path.display(), "file passed");
    Outcome::Pass
}
