//! # n-scratch: Scratch-pad model for n-invoke
//!
//! Everything the shell edits and how it edits it:
//!
//! - **[`document`]**: rope-backed text with a yank register
//! - **[`edit`]**: invoker commands over a `Document` (insert, delete,
//!   substitute, yank, open line)
//! - **[`cmdline`]**: one input line → one `ShellCommand`
//! - **[`options`]**: `:set` parsing and the session's option values
//! - **[`profiler`]**: stopwatch with named laps for `:set timing`
//! - **[`error`]**: parse and load errors

pub mod cmdline;
pub mod document;
pub mod edit;
pub mod error;
pub mod options;
pub mod profiler;

pub use cmdline::{ClearTarget, EditLine, ShellCommand, parse_line};
pub use document::Document;
pub use error::{ParseError, ScratchError};
pub use options::Options;
pub use profiler::Profiler;
