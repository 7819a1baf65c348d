//! Delimiter: a named checkpoint in the undo history.
//!
//! Pushed by [`Invoker::push_delimiter`](crate::Invoker::push_delimiter) to
//! mark the start of a gesture (a slider drag, an insert session). It does two
//! jobs:
//!
//! - It separates combinable commands: the command after a delimiter sees the
//!   delimiter, not the previous edit, on top of the stack and so never merges
//!   across it.
//! - It is a target for [`Invoker::undo_to_delimiter`](crate::Invoker::undo_to_delimiter).
//!
//! A delimiter is never chained. The command pushed after it usually is.

use crate::command::{Capabilities, Command};

/// A no-op, always-successful undoable marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelimiterCommand {
    name: String,
}

impl DelimiterCommand {
    /// Create a delimiter with the given name. An empty name is the
    /// anonymous delimiter.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The delimiter's name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<Ctx> Command<Ctx> for DelimiterCommand {
    fn execute(&mut self, _ctx: &mut Ctx) -> bool {
        true
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::UNDO
    }

    fn undo(&mut self, _ctx: &mut Ctx) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_anonymous() {
        assert_eq!(DelimiterCommand::default().name(), "");
        assert_eq!(DelimiterCommand::new("").name(), "");
    }

    #[test]
    fn keeps_name() {
        assert_eq!(DelimiterCommand::new("drag").name(), "drag");
    }

    #[test]
    fn execute_and_undo_touch_nothing() {
        let mut model = String::from("untouched");
        let mut d = DelimiterCommand::new("x");

        assert!(Command::<String>::execute(&mut d, &mut model));
        assert!(Command::<String>::undo(&mut d, &mut model));
        assert_eq!(model, "untouched");
    }

    #[test]
    fn only_undo_capability() {
        let d = DelimiterCommand::new("x");
        assert_eq!(Command::<()>::capabilities(&d), Capabilities::UNDO);
    }
}
