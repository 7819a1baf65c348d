//! # n-command: Command invoker for n-invoke
//!
//! Runs commands against a caller-owned model and keeps the undo/redo
//! history for the ones that can be reversed:
//!
//! - **[`command`]**: the `Command` trait and its `Capabilities` set
//!   (undo, combine, dispose)
//! - **[`invoker`]**: `Invoker`, the two-stack history with chain groups,
//!   combining, named delimiters, and guaranteed disposal
//! - **[`sequence`]**: `SequenceCommand`, several commands as one
//! - **[`delimiter`]**: `DelimiterCommand`, the named checkpoint marker
//!
//! ```
//! use n_command::{Capabilities, Command, Invoker};
//!
//! struct Add(i32);
//!
//! impl Command<i32> for Add {
//!     fn execute(&mut self, total: &mut i32) -> bool {
//!         *total += self.0;
//!         true
//!     }
//!
//!     fn capabilities(&self) -> Capabilities {
//!         Capabilities::UNDO
//!     }
//!
//!     fn undo(&mut self, total: &mut i32) -> bool {
//!         *total -= self.0;
//!         true
//!     }
//! }
//!
//! let mut total = 0;
//! let mut invoker = Invoker::new();
//!
//! invoker.execute(Box::new(Add(2)), &mut total);
//! invoker.execute_chained(Box::new(Add(3)), true, &mut total);
//! assert_eq!(total, 5);
//!
//! invoker.undo(&mut total);
//! assert_eq!(total, 0);
//! ```

pub mod command;
pub mod delimiter;
pub mod invoker;
pub mod sequence;

pub use command::{Capabilities, Command};
pub use delimiter::DelimiterCommand;
pub use invoker::{HistoryEntry, Invoker};
pub use sequence::SequenceCommand;
