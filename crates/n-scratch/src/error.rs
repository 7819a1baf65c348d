//! Error types for the scratch-pad layer.
//!
//! The invoker itself never fails (commands report `bool`), so errors only
//! come from reading user input and loading files.

use thiserror::Error;

/// A shell line that could not be turned into a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("{command}: missing {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    #[error("{command}: not a number: {value}")]
    BadNumber { command: &'static str, value: String },
    #[error("invalid pattern: {0}")]
    BadPattern(String),
    #[error("'&' needs an editing command after it")]
    NotChainable,
    #[error("unknown option: {0}")]
    UnknownOption(String),
    #[error("invalid value for {name}: {value}")]
    BadOptionValue { name: String, value: String },
}

/// Errors surfaced by the scratch document.
#[derive(Error, Debug)]
pub enum ScratchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}
