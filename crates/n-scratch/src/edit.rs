//! Edit commands over a [`Document`].
//!
//! | Command       | Undo | Combine | Dispose | Notes                                   |
//! |---------------|------|---------|---------|-----------------------------------------|
//! | `InsertText`  | yes  | yes     |         | Adjacent inserts merge (typing)         |
//! | `DeleteText`  | yes  |         |         | Captures the removed text on execute    |
//! | `ReplaceAll`  | yes  |         | yes     | Keeps a rope snapshot until disposed    |
//! | `Yank`        |      |         |         | Fire and forget: fills the register     |
//!
//! Every command fails (returns `false`) instead of doing a partial edit:
//! bad indices, empty ranges, and patterns with no match all leave the
//! document untouched.

use std::any::Any;
use std::ops::Range;

use n_command::{Capabilities, Command, SequenceCommand};
use regex::Regex;
use ropey::Rope;

use crate::document::Document;

// ---------------------------------------------------------------------------
// InsertText
// ---------------------------------------------------------------------------

/// Insert text at a char index.
///
/// Combines with a following `InsertText` that starts exactly where this
/// one's text ends, so a run of appends undoes as one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertText {
    at: usize,
    text: String,
}

impl InsertText {
    #[must_use]
    pub fn new(at: usize, text: impl Into<String>) -> Self {
        Self {
            at,
            text: text.into(),
        }
    }

    /// Char index one past the inserted text.
    fn end(&self) -> usize {
        self.at + self.text.chars().count()
    }
}

impl Command<Document> for InsertText {
    fn execute(&mut self, doc: &mut Document) -> bool {
        !self.text.is_empty() && doc.insert(self.at, &self.text)
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::UNDO | Capabilities::COMBINE
    }

    fn undo(&mut self, doc: &mut Document) -> bool {
        doc.remove(self.at..self.end()).is_some()
    }

    fn combine(&mut self, incoming: &mut dyn Any, doc: &mut Document) -> bool {
        let Some(next) = incoming.downcast_mut::<Self>() else {
            return false;
        };
        if next.text.is_empty() || next.at != self.end() {
            return false;
        }
        if !doc.insert(next.at, &next.text) {
            return false;
        }
        self.text.push_str(&next.text);
        true
    }
}

// ---------------------------------------------------------------------------
// DeleteText
// ---------------------------------------------------------------------------

/// Delete a char range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteText {
    range: Range<usize>,
    removed: Option<String>,
}

impl DeleteText {
    #[must_use]
    pub const fn new(range: Range<usize>) -> Self {
        Self {
            range,
            removed: None,
        }
    }
}

impl Command<Document> for DeleteText {
    fn execute(&mut self, doc: &mut Document) -> bool {
        if self.range.is_empty() {
            return false;
        }
        self.removed = doc.remove(self.range.clone());
        self.removed.is_some()
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::UNDO
    }

    fn undo(&mut self, doc: &mut Document) -> bool {
        self.removed
            .as_deref()
            .is_some_and(|text| doc.insert(self.range.start, text))
    }
}

// ---------------------------------------------------------------------------
// ReplaceAll
// ---------------------------------------------------------------------------

/// Regex substitution over the whole document.
///
/// Keeps the pre-substitution rope for undo. The snapshot is dropped on undo
/// (redo re-runs the substitution) and on dispose.
#[derive(Debug)]
pub struct ReplaceAll {
    pattern: Regex,
    replacement: String,
    snapshot: Option<Rope>,
}

impl ReplaceAll {
    #[must_use]
    pub fn new(pattern: Regex, replacement: impl Into<String>) -> Self {
        Self {
            pattern,
            replacement: replacement.into(),
            snapshot: None,
        }
    }

    /// True while the command holds a snapshot.
    #[must_use]
    pub const fn holds_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }
}

impl Command<Document> for ReplaceAll {
    fn execute(&mut self, doc: &mut Document) -> bool {
        let text = doc.contents();
        if !self.pattern.is_match(&text) {
            return false;
        }
        let replaced = self.pattern.replace_all(&text, self.replacement.as_str());
        self.snapshot = Some(doc.replace_rope(Rope::from_str(&replaced)));
        true
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::UNDO | Capabilities::DISPOSE
    }

    fn undo(&mut self, doc: &mut Document) -> bool {
        match self.snapshot.take() {
            Some(previous) => {
                doc.replace_rope(previous);
                true
            }
            None => false,
        }
    }

    fn dispose(&mut self) {
        if self.snapshot.take().is_some() {
            log::trace!("released snapshot for s/{}/", self.pattern.as_str());
        }
    }
}

// ---------------------------------------------------------------------------
// Yank
// ---------------------------------------------------------------------------

/// Copy a char range into the document's register. Leaves no history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Yank {
    range: Range<usize>,
}

impl Yank {
    #[must_use]
    pub const fn new(range: Range<usize>) -> Self {
        Self { range }
    }
}

impl Command<Document> for Yank {
    fn execute(&mut self, doc: &mut Document) -> bool {
        match doc.slice(self.range.clone()) {
            Some(text) if !text.is_empty() => {
                doc.set_register(text);
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Composites
// ---------------------------------------------------------------------------

/// Open a new line after the text ending at `end` and type `text` on it.
///
/// A sequence of two inserts: undone as one, never combined with typing
/// that follows.
#[must_use]
pub fn open_line(end: usize, text: &str) -> SequenceCommand<Document> {
    let newline = InsertText::new(end, "\n");
    let typed = InsertText::new(end + 1, text);
    SequenceCommand::new(vec![Box::new(newline), Box::new(typed)])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
