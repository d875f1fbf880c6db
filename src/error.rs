//! Crate-wide error re-exports.
//!
//! Each subsystem defines its own `thiserror` enum next to the code that
//! raises it ([`crate::parser::ParseError`], [`crate::executor::ExecutorError`],
//! [`crate::discovery::CliError`]); this module just gathers them under one
//! path for consumers who want a single `use`.

pub use crate::discovery::CliError;
pub use crate::executor::ExecutorError;
pub use crate::parser::ParseError;
