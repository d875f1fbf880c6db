//! # httpspec
//!
//! A parallel test-runner for extended `.http` files: each file declares a
//! sequence of HTTP requests annotated with inline assertions, and the
//! runner executes those requests, validates the responses, and reports
//! aggregate pass/fail/invalid counts across many files in parallel.
//!
//! The engineering substance of the crate is split across three tightly
//! coupled subsystems:
//!
//! - [`parser`] — a line-oriented state machine that turns `.http` source
//!   into an ordered list of [`model::Request`] records with attached
//!   assertions.
//! - [`evaluator`] — the typed assertion DSL, applied to a projection of an
//!   HTTP response, producing a structured [`model::Diagnostic`] rather
//!   than a thrown failure.
//! - [`pool`] and [`runner`] — the per-file execution pipeline driven by a
//!   bounded worker pool with a thread-safe [`pool::Tally`].
//!
//! See `DESIGN.md` at the repository root for design rationale.

pub mod config;
pub mod discovery;
pub mod error;
pub mod evaluator;
pub mod executor;
pub mod model;
pub mod parser;
pub mod pool;
pub mod reporting;
pub mod runner;

pub use model::{Assertion, Diagnostic, Failure, FailureReason, Method, Operator, Request, Response};
pub use runner::Outcome;
