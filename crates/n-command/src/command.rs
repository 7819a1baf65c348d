// SPDX-License-Identifier: MIT
//
// Command: the executable unit the Invoker drives.
//
// A command always executes. Beyond that it may declare any subset of three
// extra capabilities:
//
//   UNDO     → `undo()` reverses a successful `execute()`
//   COMBINE  → `combine()` folds a later command of the same type into this one
//   DISPOSE  → `dispose()` releases resources once the command is discarded
//
// Capabilities are declared as data (a bitflags set), not discovered through
// downcasts. The Invoker reads the set and only calls the methods the set
// names. The default method bodies exist so implementors write exactly the
// capabilities they declare and nothing else.
//
// Every operation receives the caller-owned model as `&mut Ctx`. Commands
// never capture the model; the Invoker threads it through from the caller.

use std::any::{Any, TypeId};

// ─── Capabilities ────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Optional capabilities a command declares on top of `execute`.
    ///
    /// ```
    /// use n_command::Capabilities;
    ///
    /// let caps = Capabilities::UNDO | Capabilities::DISPOSE;
    /// assert!(caps.contains(Capabilities::UNDO));
    /// assert!(!caps.contains(Capabilities::COMBINE));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Capabilities: u8 {
        /// The command can be reversed and lives in history.
        const UNDO    = 1 << 0;
        /// The command can absorb a later command of the same type.
        const COMBINE = 1 << 1;
        /// The command holds resources released by `dispose`.
        const DISPOSE = 1 << 2;
    }
}

impl Capabilities {
    /// `UNDO` is set.
    #[inline]
    #[must_use]
    pub const fn undoable(self) -> bool {
        self.contains(Self::UNDO)
    }

    /// `COMBINE` is set.
    #[inline]
    #[must_use]
    pub const fn combinable(self) -> bool {
        self.contains(Self::COMBINE)
    }

    /// `DISPOSE` is set.
    #[inline]
    #[must_use]
    pub const fn disposable(self) -> bool {
        self.contains(Self::DISPOSE)
    }
}

// ─── Command ─────────────────────────────────────────────────────────────────

/// An executable operation over a caller-owned model `Ctx`.
///
/// Only [`execute`](Self::execute) is required. A command that overrides
/// `undo`, `combine`, or `dispose` must also report the matching flag from
/// [`capabilities`](Self::capabilities); the Invoker never calls a method whose
/// flag is absent.
///
/// Commands report failure through their boolean results and must not panic.
/// Any fallible work inside a command is converted to `false` before it
/// returns.
pub trait Command<Ctx>: Any {
    /// Apply the command to `ctx`. Returns `true` on success.
    ///
    /// Also called to redo a command that was previously undone.
    fn execute(&mut self, ctx: &mut Ctx) -> bool;

    /// The capabilities this command implements. Defaults to none.
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    /// Reverse a successful `execute`. Returns `true` on success.
    ///
    /// Only called when `capabilities()` contains [`Capabilities::UNDO`].
    fn undo(&mut self, _ctx: &mut Ctx) -> bool {
        false
    }

    /// Absorb `incoming`, a not-yet-executed command of the same concrete
    /// type as `self`, that was submitted right after `self`.
    ///
    /// On `true`, the effect of `incoming` has been applied to `ctx` and
    /// folded into `self`'s undo state; the Invoker then drops `incoming`
    /// without executing or disposing it.
    ///
    /// On `false`, neither `ctx` nor `incoming` may have been touched: the
    /// Invoker falls back to executing `incoming` directly, so any side effect
    /// left behind by a rejected combine would be applied twice.
    ///
    /// Use [`Any::downcast_mut`] to recover the concrete type:
    ///
    /// ```ignore
    /// let Some(next) = incoming.downcast_mut::<Self>() else { return false };
    /// ```
    ///
    /// Only called when both commands report [`Capabilities::COMBINE`].
    fn combine(&mut self, _incoming: &mut dyn Any, _ctx: &mut Ctx) -> bool {
        false
    }

    /// Release resources held by the command. Called at most once, after
    /// which the command is never executed, undone, or redone again.
    ///
    /// Only called when `capabilities()` contains [`Capabilities::DISPOSE`].
    fn dispose(&mut self) {}
}

/// Concrete type of a boxed command.
///
/// Goes through the trait object so the vtable reports the implementor's type,
/// not `Box`'s.
#[inline]
#[must_use]
pub fn kind_of<Ctx: 'static>(command: &(dyn Command<Ctx> + 'static)) -> TypeId {
    let any: &dyn Any = command;
    any.type_id()
}

/// Call `dispose` if the command declares it.
pub(crate) fn dispose_if_disposable<Ctx: 'static>(command: &mut dyn Command<Ctx>) {
    if command.capabilities().disposable() {
        log::trace!("disposing command");
        command.dispose();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
