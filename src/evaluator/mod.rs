//! The assertion evaluator.
//!
//! `check` is a pure function from `(assertions, Response)` to a
//! [`Diagnostic`]: it never panics or returns an `Err` for an
//! assertion-level mismatch — every failure, including structural ones
//! (unparseable status literal, malformed `header[...]` key), becomes a
//! [`Failure`] in the returned diagnostic.

use std::path::Path;

use regex::Regex;

use crate::model::{Assertion, Diagnostic, Failure, FailureReason, Operator, Request, Response};

/// The projected `actual` value for an assertion, or a marker that the
/// projection target (a header) was absent.
enum Projection {
    Present(String),
    Missing,
    /// The assertion's `key` didn't match any recognized shape.
    InvalidKey,
    /// `key == "status"` but the response carries no status at all.
    NoStatus,
}

fn project<'a>(key: &str, response: &'a Response) -> Projection {
    let lower = key.to_ascii_lowercase();
    if lower == "status" {
        return match response.status {
            Some(status) => Projection::Present(status.to_string()),
            None => Projection::NoStatus,
        };
    }
    if lower == "body" {
        return Projection::Present(String::from_utf8_lossy(&response.body).into_owned());
    }
    if let Some(name) = header_name(key) {
        return match response.header(&name) {
            Some(value) => Projection::Present(value.to_string()),
            None => Projection::Missing,
        };
    }
    Projection::InvalidKey
}

/// Extracts `name` from a `header["name"]`-shaped key. The name is the
/// substring between the first and last ASCII double quote, per
/// This is intentionally lenient about everything
/// around the quotes (`header[ "name" ]` also matches).
fn header_name(key: &str) -> Option<String> {
    if !key.starts_with("header[") || !key.ends_with(']') {
        return None;
    }
    let first = key.find('"')?;
    let last = key.rfind('"')?;
    if last <= first {
        return None;
    }
    Some(key[first + 1..last].to_string())
}

fn regex_is_match(actual: &str, pattern: &str) -> bool {
    match Regex::new(pattern) {
        Ok(re) => re.is_match(actual),
        Err(_) => false,
    }
}

/// The `equal`/`not_equal` mismatch reason for `key`: `status` compares
/// numerically and reports `StatusMismatch`, `body` compares byte-exact and
/// reports `BodyMismatch`, anything else is a header and reports
/// `HeaderMismatch`.
fn equal_family_reason(key: &str) -> FailureReason {
    if key.eq_ignore_ascii_case("status") {
        FailureReason::StatusMismatch
    } else if key.eq_ignore_ascii_case("body") {
        FailureReason::BodyMismatch
    } else {
        FailureReason::HeaderMismatch
    }
}

/// Evaluates one assertion against `actual`, returning `Ok(())` on pass or
/// `Err((reason, expected, actual))` on failure. Callers attach the
/// surrounding `Failure` metadata (source file, request name, index).
fn evaluate_operator(
    key: &str,
    operator: Operator,
    expected: &str,
    actual: &str,
) -> Result<(), (FailureReason, String, String)> {
    let is_status = key.eq_ignore_ascii_case("status");
    let is_body = key.eq_ignore_ascii_case("body");
    match operator {
        Operator::Equal => {
            let matched = if is_status {
                let expected_num: u16 = expected
                    .parse()
                    .map_err(|_| (FailureReason::StatusFormatError, expected.to_string(), actual.to_string()))?;
                let actual_num: u16 = actual
                    .parse()
                    .map_err(|_| (FailureReason::StatusFormatError, expected.to_string(), actual.to_string()))?;
                expected_num == actual_num
            } else if is_body {
                expected == actual
            } else {
                expected.eq_ignore_ascii_case(actual)
            };
            if matched {
                Ok(())
            } else {
                Err((equal_family_reason(key), expected.to_string(), actual.to_string()))
            }
        }
        Operator::NotEqual => {
            match evaluate_operator(key, Operator::Equal, expected, actual) {
                Ok(()) => Err((equal_family_reason(key), expected.to_string(), actual.to_string())),
                Err((FailureReason::StatusFormatError, exp, act)) => {
                    Err((FailureReason::StatusFormatError, exp, act))
                }
                Err(_) => Ok(()),
            }
        }
        Operator::Contains => {
            if actual.contains(expected) {
                Ok(())
            } else {
                Err((FailureReason::ContainsFailed, expected.to_string(), actual.to_string()))
            }
        }
        Operator::NotContains => {
            if actual.contains(expected) {
                Err((FailureReason::NotContainsFailed, expected.to_string(), actual.to_string()))
            } else {
                Ok(())
            }
        }
        Operator::StartsWith => {
            if actual.starts_with(expected) {
                Ok(())
            } else {
                Err((FailureReason::ContainsFailed, expected.to_string(), actual.to_string()))
            }
        }
        Operator::EndsWith => {
            if actual.ends_with(expected) {
                Ok(())
            } else {
                Err((FailureReason::ContainsFailed, expected.to_string(), actual.to_string()))
            }
        }
        Operator::MatchesRegex => {
            if regex_is_match(actual, expected) {
                Ok(())
            } else {
                Err((FailureReason::ContainsFailed, expected.to_string(), actual.to_string()))
            }
        }
        Operator::NotMatchesRegex => {
            if regex_is_match(actual, expected) {
                Err((FailureReason::NotContainsFailed, expected.to_string(), actual.to_string()))
            } else {
                Ok(())
            }
        }
    }
}

/// `true` for operators where a missing header projects to a *pass*
/// (negated forms), `false` where it projects to a failure.
fn missing_header_passes(operator: Operator) -> bool {
    matches!(
        operator,
        Operator::NotEqual | Operator::NotContains | Operator::NotMatchesRegex
    )
}

/// Evaluates every assertion on `request` against `response`, in source
/// order, returning the accumulated [`Diagnostic`].
///
/// `source_file` is recorded on every [`Failure`] purely for reporting —
/// the evaluator itself has no notion of files.
pub fn check(request: &Request, response: &Response, source_file: &Path) -> Diagnostic {
    let mut diagnostic = Diagnostic::default();

    for (index, assertion) in request.assertions.iter().enumerate() {
        if let Some(failure) = check_one(assertion, response, source_file, &request.name, index) {
            diagnostic.push(failure);
        }
    }

    diagnostic
}

fn check_one(
    assertion: &Assertion,
    response: &Response,
    source_file: &Path,
    request_name: &Option<String>,
    index: usize,
) -> Option<Failure> {
    let make = |reason: FailureReason, expected: String, actual: String| {
        Some(Failure {
            assertion: assertion.clone(),
            source_file: source_file.to_path_buf(),
            request_name: request_name.clone(),
            assertion_index: index,
            reason,
            expected,
            actual,
        })
    };

    match project(&assertion.key, response) {
        Projection::InvalidKey => make(
            FailureReason::InvalidAssertionKey,
            assertion.expected.clone(),
            String::new(),
        ),
        Projection::NoStatus => make(
            FailureReason::StatusMismatch,
            assertion.expected.clone(),
            String::new(),
        ),
        Projection::Missing => {
            if missing_header_passes(assertion.operator) {
                None
            } else if assertion.operator == Operator::Equal {
                make(
                    FailureReason::HeaderMissing,
                    assertion.expected.clone(),
                    String::new(),
                )
            } else {
                make(
                    FailureReason::ContainsFailed,
                    assertion.expected.clone(),
                    String::new(),
                )
            }
        }
        Projection::Present(actual) => {
            match evaluate_operator(&assertion.key, assertion.operator, &assertion.expected, &actual) {
                Ok(()) => None,
                Err((reason, expected, actual)) => make(reason, expected, actual),
            }
        }
    }
}
