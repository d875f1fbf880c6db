//! The HTTP executor adapter.
//!
//! Translates a parsed [`Request`] into a transport call and normalizes the
//! transport's result into the internal [`Response`] shape. Each worker
//! thread owns one [`Executor`] (and therefore one `reqwest::blocking`
//! client/connection pool) for its lifetime — see [`crate::pool`].

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Method as ReqwestMethod;
use thiserror::Error;

use crate::model::{Method, Request, Response};

/// Errors produced while executing a single request.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The parsed request had no method — never actually reachable today
    /// since [`crate::parser`] only emits requests that already have one,
    /// but kept as a distinct variant so the type doesn't silently assume
    /// the invariant holds forever.
    #[error("request has no method")]
    MissingMethod,

    /// DNS, connect, TLS, read, or timeout failure from the transport.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

fn to_reqwest_method(method: Method) -> ReqwestMethod {
    match method {
        Method::Get => ReqwestMethod::GET,
        Method::Post => ReqwestMethod::POST,
        Method::Put => ReqwestMethod::PUT,
        Method::Delete => ReqwestMethod::DELETE,
        Method::Head => ReqwestMethod::HEAD,
        Method::Options => ReqwestMethod::OPTIONS,
        Method::Patch => ReqwestMethod::PATCH,
        Method::Connect => ReqwestMethod::CONNECT,
        Method::Trace => ReqwestMethod::TRACE,
    }
}

/// Owns a single `reqwest::blocking::Client` and executes [`Request`]s
/// against it, normalizing responses into the internal [`Response`] shape.
pub struct Executor {
    client: Client,
}

impl Executor {
    /// Builds an executor with the given per-request timeout
    /// (see [`crate::config::RunConfig::request_timeout`]).
    pub fn new(timeout: Duration) -> Result<Self, ExecutorError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ExecutorError::Transport)?;
        Ok(Self { client })
    }

    /// Executes `request`, returning a normalized [`Response`] or an
    /// [`ExecutorError`]. HTTP error statuses (4xx/5xx) are *not* errors at
    /// this layer — they come back as ordinary responses for the evaluator
    /// to judge.
    pub fn execute(&self, request: &Request) -> Result<Response, ExecutorError> {
        tracing::debug!(method = %request.method, url = %request.url, "dispatching request");

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().map_err(|e| {
            tracing::warn!(url = %request.url, error = %e, "transport failure");
            ExecutorError::Transport(e)
        })?;

        let status = Some(response.status().as_u16());

        let mut headers = HashMap::with_capacity(response.headers().len());
        for (name, value) in response.headers().iter() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str().to_ascii_lowercase(), value.to_string());
            }
        }

        let body = response.bytes().map_err(ExecutorError::Transport)?.to_vec();

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}
