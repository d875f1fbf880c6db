//! Core data types shared by the parser, evaluator, executor, and runner.

use std::collections::HashMap;
use std::path::PathBuf;

/// An HTTP request method recognized by the parser.
///
/// Unlike a general-purpose HTTP library, HTTPSpec has no `Custom` variant:
/// an unrecognized verb token never becomes a `Method` at all (see
/// [`crate::parser`]), so every `Request` that reaches the runner carries a
/// method from this closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
    Connect,
    Trace,
}

impl Method {
    /// Returns the method as its canonical uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch => "PATCH",
            Self::Connect => "CONNECT",
            Self::Trace => "TRACE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "DELETE" => Self::Delete,
            "HEAD" => Self::Head,
            "OPTIONS" => Self::Options,
            "PATCH" => Self::Patch,
            "CONNECT" => Self::Connect,
            "TRACE" => Self::Trace,
            _ => return Err(()),
        })
    }
}

/// The HTTP protocol version named on a request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    Http10,
    Http11,
    Http2,
    Http3,
}

impl Default for Version {
    /// `HTTP/1.1` is the default when a request line omits the version token.
    fn default() -> Self {
        Self::Http11
    }
}

impl std::str::FromStr for Version {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "HTTP/1.0" => Self::Http10,
            "HTTP/1.1" => Self::Http11,
            "HTTP/2" => Self::Http2,
            "HTTP/3" => Self::Http3,
            _ => return Err(()),
        })
    }
}

/// One `(name, value)` header pair as written in the request block.
///
/// Headers are order-preserving and duplicates are kept — unlike the
/// response side, where [`Response`] collapses to one value per name.
pub type HeaderPair = (String, String);

/// The closed set of assertion comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    NotEqual,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    MatchesRegex,
    NotMatchesRegex,
}

impl Operator {
    /// Parses an operator token, case-insensitively, accepting both the
    /// symbolic and word forms (`==`/`equal`, `!=`/`not_equal`, etc.).
    pub fn parse(token: &str) -> Option<Self> {
        Some(match token.to_ascii_lowercase().as_str() {
            "==" | "equal" => Self::Equal,
            "!=" | "not_equal" => Self::NotEqual,
            "contains" => Self::Contains,
            "not_contains" => Self::NotContains,
            "starts_with" => Self::StartsWith,
            "ends_with" => Self::EndsWith,
            "matches_regex" => Self::MatchesRegex,
            "not_matches_regex" => Self::NotMatchesRegex,
            _ => return None,
        })
    }
}

/// A single `(key, operator, expected)` assertion attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assertion {
    pub key: String,
    pub operator: Operator,
    pub expected: String,
}

/// One parsed request block: method, URL, headers, optional body, and the
/// assertions that follow it in source order.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub version: Version,
    pub headers: Vec<HeaderPair>,
    pub body: Option<Vec<u8>>,
    pub assertions: Vec<Assertion>,
    pub name: Option<String>,
}

impl Request {
    /// Returns the first header value matching `name`, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A normalized HTTP response, as produced by [`crate::executor::execute`].
#[derive(Debug, Clone, Default)]
pub struct Response {
    /// Absent only when the transport could not produce a status at all —
    /// in practice the executor turns that case into an `ExecutorError`
    /// before a `Response` is ever constructed, but the field stays
    /// optional so the evaluator's "status missing" branch has something
    /// to test against independent of the executor.
    pub status: Option<u16>,
    /// Lowercased header name → value. Duplicates collapse, last write wins.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    /// Looks up a header by name, case-insensitively (the name is
    /// lowercased before lookup since the map is already stored lowercase).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// Why a single assertion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    StatusMismatch,
    HeaderMismatch,
    HeaderMissing,
    BodyMismatch,
    ContainsFailed,
    NotContainsFailed,
    InvalidAssertionKey,
    StatusFormatError,
}

/// One failed assertion, carrying everything a failure report needs to
/// render a `[Fail] in <path>:<index+1> ...` line.
#[derive(Debug, Clone)]
pub struct Failure {
    pub assertion: Assertion,
    pub source_file: PathBuf,
    pub request_name: Option<String>,
    pub assertion_index: usize,
    pub reason: FailureReason,
    pub expected: String,
    pub actual: String,
}

/// Ordered collection of assertion failures for a single request.
///
/// An empty `Diagnostic` means every assertion passed.
#[derive(Debug, Clone, Default)]
pub struct Diagnostic {
    pub failures: Vec<Failure>,
}

impl Diagnostic {
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn push(&mut self, failure: Failure) {
        self.failures.push(failure);
    }
}
