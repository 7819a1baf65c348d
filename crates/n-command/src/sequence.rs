//! Sequence: several commands executed and undone as one.
//!
//! Execution runs the sub-commands in order and stops at the first failure.
//! It is not atomic: sub-commands that already ran are left applied. Callers
//! that need all-or-nothing behavior must order their sub-commands so that
//! the fallible ones come first, or check preconditions before building the
//! sequence.
//!
//! Undo walks the sub-commands backwards and skips the ones that are not
//! undoable.
//!
//! The sequence reports `DISPOSE` when any sub-command does, and forwards
//! `dispose` to exactly those sub-commands.

use crate::command::{Capabilities, Command, dispose_if_disposable};

/// A fixed, ordered list of commands behaving as one undoable command.
pub struct SequenceCommand<Ctx> {
    commands: Vec<Box<dyn Command<Ctx>>>,
}

impl<Ctx> SequenceCommand<Ctx> {
    /// Wrap `commands`, executed front to back.
    #[must_use]
    pub fn new(commands: Vec<Box<dyn Command<Ctx>>>) -> Self {
        Self { commands }
    }

    /// Number of sub-commands.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True if the sequence holds no sub-commands.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl<Ctx> FromIterator<Box<dyn Command<Ctx>>> for SequenceCommand<Ctx> {
    fn from_iter<I: IntoIterator<Item = Box<dyn Command<Ctx>>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<Ctx> std::fmt::Debug for SequenceCommand<Ctx> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceCommand")
            .field("len", &self.commands.len())
            .finish()
    }
}

impl<Ctx: 'static> Command<Ctx> for SequenceCommand<Ctx> {
    fn execute(&mut self, ctx: &mut Ctx) -> bool {
        self.commands.iter_mut().all(|command| command.execute(ctx))
    }

    fn capabilities(&self) -> Capabilities {
        if self
            .commands
            .iter()
            .any(|command| command.capabilities().disposable())
        {
            Capabilities::UNDO | Capabilities::DISPOSE
        } else {
            Capabilities::UNDO
        }
    }

    fn undo(&mut self, ctx: &mut Ctx) -> bool {
        self.commands
            .iter_mut()
            .rev()
            .filter(|command| command.capabilities().undoable())
            .all(|command| command.undo(ctx))
    }

    fn dispose(&mut self) {
        for command in &mut self.commands {
            dispose_if_disposable(command.as_mut());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use pretty_assertions::assert_eq;

    /// Appends its tag to the log on execute, and `-tag` on undo.
    struct Step {
        tag: &'static str,
        ok: bool,
        undoable: bool,
    }

    impl Step {
        fn boxed(tag: &'static str) -> Box<dyn Command<Vec<String>>> {
            Box::new(Self {
                tag,
                ok: true,
                undoable: true,
            })
        }

        fn failing(tag: &'static str) -> Box<dyn Command<Vec<String>>> {
            Box::new(Self {
                tag,
                ok: false,
                undoable: true,
            })
        }

        fn one_way(tag: &'static str) -> Box<dyn Command<Vec<String>>> {
            Box::new(Self {
                tag,
                ok: true,
                undoable: false,
            })
        }
    }

    /// Holds a resource; counts its disposals.
    struct Held(Rc<Cell<usize>>);

    impl Command<Vec<String>> for Held {
        fn execute(&mut self, _log: &mut Vec<String>) -> bool {
            true
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::UNDO | Capabilities::DISPOSE
        }

        fn undo(&mut self, _log: &mut Vec<String>) -> bool {
            true
        }

        fn dispose(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    impl Command<Vec<String>> for Step {
        fn execute(&mut self, log: &mut Vec<String>) -> bool {
            log.push(self.tag.to_string());
            self.ok
        }

        fn capabilities(&self) -> Capabilities {
            if self.undoable {
                Capabilities::UNDO
            } else {
                Capabilities::empty()
            }
        }

        fn undo(&mut self, log: &mut Vec<String>) -> bool {
            log.push(format!("-{}", self.tag));
            self.ok
        }
    }

    // -- Execute ------------------------------------------------------------

    #[test]
    fn executes_in_order() {
        let mut log = Vec::new();
        let mut seq = SequenceCommand::new(vec![Step::boxed("a"), Step::boxed("b"), Step::boxed("c")]);

        assert!(seq.execute(&mut log));
        assert_eq!(log, ["a", "b", "c"]);
    }

    #[test]
    fn stops_at_first_failure_without_rollback() {
        let mut log = Vec::new();
        let mut seq = SequenceCommand::new(vec![
            Step::boxed("1"),
            Step::boxed("2"),
            Step::failing("3"),
            Step::boxed("4"),
            Step::boxed("5"),
        ]);

        assert!(!seq.execute(&mut log));
        // 3 ran and failed; 4 and 5 never ran; nothing was undone.
        assert_eq!(log, ["1", "2", "3"]);
    }

    #[test]
    fn empty_sequence_succeeds() {
        let mut log = Vec::new();
        let mut seq: SequenceCommand<Vec<String>> = SequenceCommand::new(Vec::new());

        assert!(seq.is_empty());
        assert!(seq.execute(&mut log));
        assert!(seq.undo(&mut log));
        assert!(log.is_empty());
    }

    // -- Undo ---------------------------------------------------------------

    #[test]
    fn undoes_in_reverse_skipping_one_way_steps() {
        let mut log = Vec::new();
        let mut seq = SequenceCommand::new(vec![Step::boxed("a"), Step::one_way("b"), Step::boxed("c")]);

        assert!(seq.execute(&mut log));
        log.clear();

        assert!(seq.undo(&mut log));
        assert_eq!(log, ["-c", "-a"]);
    }

    #[test]
    fn undo_stops_at_first_failure() {
        let mut log = Vec::new();
        let mut seq = SequenceCommand::new(vec![Step::boxed("a"), Step::failing("b"), Step::boxed("c")]);

        assert!(!seq.undo(&mut log));
        assert_eq!(log, ["-c", "-b"]);
    }

    // -- Dispose ------------------------------------------------------------

    #[test]
    fn plain_sequence_is_not_disposable() {
        let seq = SequenceCommand::new(vec![Step::boxed("a"), Step::one_way("b")]);
        assert_eq!(seq.capabilities(), Capabilities::UNDO);
    }

    #[test]
    fn dispose_reaches_disposable_children() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let mut seq: SequenceCommand<Vec<String>> = SequenceCommand::new(vec![
            Box::new(Held(Rc::clone(&first))),
            Step::boxed("plain"),
            Box::new(Held(Rc::clone(&second))),
        ]);

        assert_eq!(seq.capabilities(), Capabilities::UNDO | Capabilities::DISPOSE);
        seq.dispose();
        assert_eq!((first.get(), second.get()), (1, 1));
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn collects_from_iterator() {
        let seq: SequenceCommand<Vec<String>> = ["x", "y"].into_iter().map(Step::boxed).collect();
        assert_eq!(seq.len(), 2);
        assert_eq!(Command::capabilities(&seq), Capabilities::UNDO);
    }
}
