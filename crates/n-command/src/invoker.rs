//! Invoker: command execution with undo/redo history.
//!
//! Every command the caller wants to be undoable goes through an [`Invoker`].
//! The invoker keeps two stacks of [`HistoryEntry`]s and moves entries
//! between them:
//!
//! ```text
//!   execute ──► undo stack ──undo──► redo stack
//!                   ▲                    │
//!                   └───────redo─────────┘
//! ```
//!
//! # Chain groups
//!
//! An entry pushed with `chained = true` belongs to the same user-visible
//! action as the entry below it. One [`undo`](Invoker::undo) unwinds the top
//! entry and keeps going while the entry it just consumed was chained, so the
//! whole group down to (and including) its unchained head is undone. One
//! [`redo`](Invoker::redo) replays entries while the *next* candidate on the
//! redo stack is chained.
//!
//! # Combining
//!
//! When a combinable command is submitted and the top history entry holds a
//! combinable command of the same concrete type, the top entry is offered the
//! new command first. A successful combine leaves history at the same depth;
//! the new command is dropped.
//!
//! # Disposal
//!
//! A command that leaves the invoker for good (failed execute, failed undo or
//! redo, cleared stacks, forward history invalidated by a new edit, or the
//! invoker itself being dropped) has `dispose()` called exactly once, if it
//! declares the capability.
//!
//! # Threading
//!
//! None. The invoker is owned by one caller and every call runs to completion
//! synchronously.

use std::any::Any;
use std::fmt;

use crate::command::{Command, dispose_if_disposable, kind_of};
use crate::delimiter::DelimiterCommand;

// ---------------------------------------------------------------------------
// HistoryEntry
// ---------------------------------------------------------------------------

/// A command in history, with the chain flag it was pushed with.
///
/// Only undoable commands become entries.
pub struct HistoryEntry<Ctx: 'static> {
    command: Box<dyn Command<Ctx>>,
    chained: bool,
}

impl<Ctx: 'static> HistoryEntry<Ctx> {
    /// Whether this entry continues the group below it.
    #[inline]
    #[must_use]
    pub const fn is_chained(&self) -> bool {
        self.chained
    }

    /// The stored command.
    #[inline]
    #[must_use]
    pub fn command(&self) -> &dyn Command<Ctx> {
        self.command.as_ref()
    }

    /// The delimiter name, if this entry is a delimiter.
    fn delimiter_name(&self) -> Option<&str> {
        let any: &dyn Any = self.command.as_ref();
        any.downcast_ref::<DelimiterCommand>()
            .map(DelimiterCommand::name)
    }

    fn dispose(&mut self) {
        dispose_if_disposable(self.command.as_mut());
    }
}

impl<Ctx: 'static> fmt::Debug for HistoryEntry<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryEntry")
            .field("chained", &self.chained)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Invoker
// ---------------------------------------------------------------------------

/// Executes commands and records the undoable ones.
///
/// New history clears the redo stack: branching history is not supported.
/// The one exception is a successful combine, which extends the top entry in
/// place and leaves the redo stack as it was.
pub struct Invoker<Ctx: 'static> {
    undo_stack: Vec<HistoryEntry<Ctx>>,
    redo_stack: Vec<HistoryEntry<Ctx>>,
}

impl<Ctx: 'static> Invoker<Ctx> {
    /// Create an invoker with empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    // -- Execute ------------------------------------------------------------

    /// Execute `command` as the head of a new group.
    ///
    /// Same as [`execute_chained`](Self::execute_chained) with
    /// `chained = false`.
    pub fn execute(&mut self, command: Box<dyn Command<Ctx>>, ctx: &mut Ctx) -> bool {
        self.execute_chained(command, false, ctx)
    }

    /// Execute `command`, recording it in history if it is undoable.
    ///
    /// `chained` joins the command to the group of the entry below it, so a
    /// single undo reverts both. The first command of a group must not be
    /// chained; the ones after it should be.
    ///
    /// Outcomes:
    ///
    /// - Combined into the top entry → `true`; history depth and the redo
    ///   stack are unchanged.
    /// - Executed, undoable → pushed; the redo stack is cleared and disposed.
    /// - Executed, not undoable → disposed right away (fire and forget).
    /// - Failed → disposed; returns `false`.
    pub fn execute_chained(
        &mut self,
        mut command: Box<dyn Command<Ctx>>,
        chained: bool,
        ctx: &mut Ctx,
    ) -> bool {
        if self.try_combine(command.as_mut(), ctx) {
            log::debug!("combined command into top of undo stack");
            return true;
        }

        if !command.execute(ctx) {
            log::debug!("command execution failed");
            dispose_if_disposable(command.as_mut());
            return false;
        }

        if command.capabilities().undoable() {
            self.undo_stack.push(HistoryEntry { command, chained });
            self.clear_redo();
            log::debug!(
                "pushed command (chained: {chained}), undo depth {}",
                self.undo_stack.len()
            );
        } else {
            dispose_if_disposable(command.as_mut());
        }
        true
    }

    /// Offer `command` to the top entry. True if the top entry absorbed it.
    fn try_combine(&mut self, command: &mut (dyn Command<Ctx> + 'static), ctx: &mut Ctx) -> bool {
        if !command.capabilities().combinable() {
            return false;
        }
        let Some(top) = self.undo_stack.last_mut() else {
            return false;
        };
        let receiver = top.command.as_mut();
        if !receiver.capabilities().combinable() || kind_of(receiver) != kind_of(command) {
            return false;
        }
        let incoming: &mut dyn Any = command;
        receiver.combine(incoming, ctx)
    }

    // -- Delimiters ---------------------------------------------------------

    /// Push an anonymous delimiter.
    pub fn push_delimiter(&mut self) {
        self.push_delimiter_named("");
    }

    /// Push a named delimiter directly onto the undo stack.
    ///
    /// The delimiter is not executed and is never chained. It does not clear
    /// the redo stack.
    pub fn push_delimiter_named(&mut self, name: impl Into<String>) {
        let delimiter = DelimiterCommand::new(name);
        log::debug!("pushed delimiter {:?}", delimiter.name());
        self.undo_stack.push(HistoryEntry {
            command: Box::new(delimiter),
            chained: false,
        });
    }

    /// Undo every entry down to and including the delimiter named `name`,
    /// ignoring chain flags.
    ///
    /// Stops early when the undo stack runs out. Undone entries go to the
    /// redo stack when `add_to_redo` is true and their undo succeeded;
    /// otherwise they are disposed.
    pub fn undo_to_delimiter(&mut self, name: &str, add_to_redo: bool, ctx: &mut Ctx) {
        let mut undone = 0_usize;
        while let Some(entry) = self.undo_stack.pop() {
            let found = entry.delimiter_name() == Some(name);
            self.undo_entry(entry, add_to_redo, ctx);
            undone += 1;
            if found {
                log::debug!("undid {undone} entries to delimiter {name:?}");
                return;
            }
        }
        log::debug!("delimiter {name:?} not found, undid {undone} entries");
    }

    // -- Undo / redo --------------------------------------------------------

    /// Undo one group, feeding it to the redo stack.
    pub fn undo(&mut self, ctx: &mut Ctx) {
        self.undo_with(true, ctx);
    }

    /// Undo one group.
    ///
    /// Pops and undoes the top entry, and keeps popping while the entry just
    /// consumed was chained. Entries whose undo fails are disposed and do not
    /// reach the redo stack, but the group keeps unwinding.
    pub fn undo_with(&mut self, add_to_redo: bool, ctx: &mut Ctx) {
        let mut undone = 0_usize;
        while let Some(entry) = self.undo_stack.pop() {
            let chained = entry.chained;
            self.undo_entry(entry, add_to_redo, ctx);
            undone += 1;
            if !chained {
                break;
            }
        }
        if undone > 0 {
            log::debug!("undid group of {undone}");
        }
    }

    /// Redo one group.
    ///
    /// Pops and re-executes the top redo entry, and keeps going while the
    /// *next* redo entry is chained. Entries that fail to re-execute are
    /// disposed and do not return to the undo stack.
    pub fn redo(&mut self, ctx: &mut Ctx) {
        let mut redone = 0_usize;
        while let Some(entry) = self.redo_stack.pop() {
            self.redo_entry(entry, ctx);
            redone += 1;
            if !self.redo_stack.last().is_some_and(|next| next.chained) {
                break;
            }
        }
        if redone > 0 {
            log::debug!("redid group of {redone}");
        }
    }

    fn undo_entry(&mut self, mut entry: HistoryEntry<Ctx>, add_to_redo: bool, ctx: &mut Ctx) {
        let ok = entry.command.undo(ctx);
        if ok && add_to_redo {
            self.redo_stack.push(entry);
        } else {
            if !ok {
                log::debug!("undo failed, dropping entry");
            }
            entry.dispose();
        }
    }

    fn redo_entry(&mut self, mut entry: HistoryEntry<Ctx>, ctx: &mut Ctx) {
        if entry.command.execute(ctx) {
            self.undo_stack.push(entry);
        } else {
            log::debug!("redo failed, dropping entry");
            entry.dispose();
        }
    }

    // -- Clearing -----------------------------------------------------------

    /// Clear both stacks.
    pub fn clear(&mut self) {
        self.clear_undo();
        self.clear_redo();
    }

    /// Dispose and drop every entry on the undo stack.
    pub fn clear_undo(&mut self) {
        Self::drain_disposing(&mut self.undo_stack);
    }

    /// Dispose and drop every entry on the redo stack.
    pub fn clear_redo(&mut self) {
        Self::drain_disposing(&mut self.redo_stack);
    }

    fn drain_disposing(stack: &mut Vec<HistoryEntry<Ctx>>) {
        for mut entry in stack.drain(..) {
            entry.dispose();
        }
    }

    // -- Queries ------------------------------------------------------------

    /// True if there is anything to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// True if there is anything to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of entries on the undo stack (delimiters included).
    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of entries on the redo stack.
    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// True if both stacks are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty() && self.redo_stack.is_empty()
    }

    /// The undo stack, bottom first.
    #[must_use]
    pub fn undo_entries(&self) -> &[HistoryEntry<Ctx>] {
        &self.undo_stack
    }

    /// The redo stack, bottom first.
    #[must_use]
    pub fn redo_entries(&self) -> &[HistoryEntry<Ctx>] {
        &self.redo_stack
    }
}

impl<Ctx: 'static> Default for Invoker<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx: 'static> fmt::Debug for Invoker<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoker")
            .field("undo", &self.undo_stack.len())
            .field("redo", &self.redo_stack.len())
            .finish()
    }
}

impl<Ctx: 'static> Drop for Invoker<Ctx> {
    fn drop(&mut self) {
        for mut entry in self.undo_stack.drain(..).chain(self.redo_stack.drain(..)) {
            dispose_if_disposable(entry.command.as_mut());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
