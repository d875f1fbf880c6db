//! The `.http`/`.httpspec` file-format parser.
//!
//! A line-oriented state machine: each trimmed line is classified into
//! exactly one shape (separator, assertion, comment, request line, header,
//! or body line) according to the current per-block state, and blocks are
//! flushed into [`Request`] records at each `###` separator and at
//! end-of-input.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::{Assertion, HeaderPair, Method, Operator, Request, Version};

/// Errors that abort parsing of an entire file.
///
/// Every variant here rejects the *whole* file — there is no partial
/// result. The line number is 1-based and refers to the original,
/// untrimmed input.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("request line at line {line} is missing a method")]
    MissingMethod { line: usize },

    #[error("request line at line {line} is missing a URL")]
    MissingUrl { line: usize },

    #[error("malformed header at line {line}: missing ':'")]
    BadHeader { line: usize },

    #[error("malformed assertion at line {line}: {reason}")]
    BadAssertion { line: usize, reason: &'static str },

    #[error("unrecognized HTTP version at line {line}: {found:?}")]
    BadVersion { line: usize, found: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    /// No request line has been parsed yet for the current block.
    Unset,
    Headers,
    Body,
}

struct BlockBuilder {
    state: BlockState,
    method: Option<Method>,
    /// Set when the request line's verb token failed to parse as a
    /// [`Method`] — kept only for the drop diagnostic, never surfaces in
    /// the output `Request`.
    unrecognized_method: Option<String>,
    url: Option<String>,
    version: Version,
    headers: Vec<HeaderPair>,
    body_buf: String,
    assertions: Vec<Assertion>,
    name: Option<String>,
}

impl BlockBuilder {
    fn new(name: Option<String>) -> Self {
        Self {
            state: BlockState::Unset,
            method: None,
            unrecognized_method: None,
            url: None,
            version: Version::default(),
            headers: Vec::new(),
            body_buf: String::new(),
            assertions: Vec::new(),
            name,
        }
    }

    /// Consumes the block, producing a [`Request`] if a method was
    /// recognized, or silently nothing otherwise — a block with no
    /// recognized request line is discarded without error.
    fn finish(self, line: usize) -> Option<Request> {
        let method = match self.method {
            Some(m) => m,
            None => {
                if let Some(token) = self.unrecognized_method {
                    tracing::debug!(
                        line,
                        token = %token,
                        "dropping block: unrecognized request method"
                    );
                }
                return None;
            }
        };
        let body = if self.body_buf.is_empty() {
            None
        } else {
            Some(self.body_buf.into_bytes())
        };
        Some(Request {
            method,
            url: self.url.expect("method is only set alongside url"),
            version: self.version,
            headers: self.headers,
            body,
            assertions: self.assertions,
            name: self.name,
        })
    }
}

/// Splits an assertion line's remainder (after stripping `//#`) into its
/// `key`, `op`, and `value` tokens. The value is everything after the
/// second whitespace run, trimmed — so it may itself contain spaces (e.g.
/// a regex pattern or a quoted literal).
fn split_assertion(rest: &str) -> Option<(&str, &str, &str)> {
    let rest = rest.trim();
    let (key, remainder) = rest.split_once(char::is_whitespace)?;
    let remainder = remainder.trim_start();
    let (op, value) = remainder.split_once(char::is_whitespace)?;
    let value = value.trim();
    if key.is_empty() || op.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, op, value))
}

/// Parses the full text of an `.http`/`.httpspec` file into an ordered list
/// of [`Request`] records.
///
/// Methodless blocks are dropped silently, body lines are trimmed and
/// rejoined with `\n`, and a `### name` line names the block that
/// follows it, not the one it closes.
pub fn parse_content(text: &str) -> Result<Vec<Request>, ParseError> {
    let mut output = Vec::new();
    let mut current = BlockBuilder::new(None);
    let mut line_no = 0usize;

    for raw_line in text.split('\n') {
        line_no += 1;
        let trimmed = raw_line.trim();

        if trimmed.is_empty() {
            if current.state == BlockState::Headers {
                current.state = BlockState::Body;
            }
            continue;
        }

        if let Some(name_part) = trimmed.strip_prefix("###") {
            if let Some(req) = current.finish(line_no) {
                output.push(req);
            }
            let name = name_part.trim();
            current = BlockBuilder::new(if name.is_empty() {
                None
            } else {
                Some(name.to_string())
            });
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("//#") {
            let (key, op, value) = split_assertion(rest).ok_or(ParseError::BadAssertion {
                line: line_no,
                reason: "expected `key operator value`",
            })?;
            let operator = Operator::parse(op).ok_or(ParseError::BadAssertion {
                line: line_no,
                reason: "unrecognized operator",
            })?;
            if current.url.is_none() {
                return Err(ParseError::BadAssertion {
                    line: line_no,
                    reason: "assertion precedes any request line",
                });
            }
            current.assertions.push(Assertion {
                key: key.to_string(),
                operator,
                expected: value.to_string(),
            });
            continue;
        }

        if trimmed.starts_with('#') || trimmed.starts_with("//") {
            continue;
        }

        match current.state {
            BlockState::Unset => {
                let mut tokens = trimmed.split_whitespace();
                let method_token = tokens.next().expect("trimmed line is non-empty");
                let url = tokens
                    .next()
                    .ok_or(ParseError::MissingUrl { line: line_no })?;
                current.url = Some(url.to_string());
                if let Some(version_token) = tokens.next() {
                    current.version =
                        version_token
                            .parse()
                            .map_err(|_| ParseError::BadVersion {
                                line: line_no,
                                found: version_token.to_string(),
                            })?;
                }
                match method_token.parse::<Method>() {
                    Ok(method) => current.method = Some(method),
                    Err(_) => current.unrecognized_method = Some(method_token.to_string()),
                }
                current.state = BlockState::Headers;
            }
            BlockState::Headers => {
                let (name, value) = trimmed
                    .split_once(':')
                    .ok_or(ParseError::BadHeader { line: line_no })?;
                current
                    .headers
                    .push((name.trim().to_string(), value.trim().to_string()));
            }
            BlockState::Body => {
                current.body_buf.push_str(trimmed);
                current.body_buf.push('\n');
            }
        }
    }

    if let Some(req) = current.finish(line_no) {
        output.push(req);
    }

    Ok(output)
}

/// Reads `path` and parses it via [`parse_content`]. I/O errors surface as
/// [`ParseError::Io`]; parse errors surface unchanged.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Request>, ParseError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_content(&text)
}
