//! Failure-line and summary rendering.
//!
//! The error sink is shared across worker threads; writes must never
//! interleave mid-line, so every report for a single file (or a single
//! parse/transport error) is built into one `String` and flushed with a
//! single write call under the sink's mutex.

use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use crate::model::{Failure, FailureReason};
use crate::pool::Counters;

/// A shared, line-interleaving-safe sink for human-readable failure reports.
pub struct ErrorSink<W: Write> {
    writer: Mutex<W>,
}

impl<W: Write> ErrorSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Writes every failure for one request in a single locked write call.
    pub fn report_failures(&self, failures: &[Failure]) {
        if failures.is_empty() {
            return;
        }
        let mut block = String::new();
        for failure in failures {
            block.push_str(&format_failure_line(failure));
            block.push('\n');
        }
        let mut writer = self.writer.lock().expect("error sink mutex poisoned");
        let _ = writer.write_all(block.as_bytes());
        let _ = writer.flush();
    }

    /// Writes a single per-file error line (parse or transport failure).
    pub fn report_file_error(&self, path: &Path, message: &str) {
        let line = format!("[Invalid] {}: {}\n", path.display(), message);
        let mut writer = self.writer.lock().expect("error sink mutex poisoned");
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }
}

fn reason_message(failure: &Failure) -> String {
    let key = &failure.assertion.key;
    match failure.reason {
        FailureReason::StatusMismatch => format!(
            "Expected status {}, got {}",
            failure.expected,
            if failure.actual.is_empty() {
                "<no response>"
            } else {
                &failure.actual
            }
        ),
        FailureReason::HeaderMismatch => format!(
            "Expected {key} to equal {:?}, got {:?}",
            failure.expected, failure.actual
        ),
        FailureReason::HeaderMissing => format!("Expected {key} to equal {:?}, but it was absent", failure.expected),
        FailureReason::BodyMismatch => format!(
            "Expected body to equal {:?}, got {:?}",
            failure.expected, failure.actual
        ),
        FailureReason::ContainsFailed => format!(
            "Expected {key} to satisfy {:?} {:?}, got {:?}",
            failure.assertion.operator, failure.expected, failure.actual
        ),
        FailureReason::NotContainsFailed => format!(
            "Expected {key} to NOT satisfy {:?} {:?}, got {:?}",
            failure.assertion.operator, failure.expected, failure.actual
        ),
        FailureReason::InvalidAssertionKey => format!("Invalid assertion key {key:?}"),
        FailureReason::StatusFormatError => {
            format!("Could not parse {:?} as a numeric status", failure.expected)
        }
    }
}

/// Renders one `[Fail] in <path>:<index+1> <message>` line.
pub fn format_failure_line(failure: &Failure) -> String {
    format!(
        "[Fail] in {}:{} {}",
        failure.source_file.display(),
        failure.assertion_index + 1,
        reason_message(failure)
    )
}

/// Renders the end-of-run summary in its fixed, human-readable shape.
pub fn format_summary(counters: &Counters) -> String {
    format!(
        "All {} tests ran successfully!\n\nPass: {}\nFail: {}\nInvalid: {}\n",
        counters.total, counters.pass, counters.fail, counters.invalid
    )
}
