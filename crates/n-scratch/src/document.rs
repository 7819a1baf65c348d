//! Scratch document: the model every edit command mutates.
//!
//! A `Document` wraps a [`ropey::Rope`] and exposes a small char-indexed
//! editing API. Indices are char offsets (Unicode scalar values), never byte
//! offsets, so `"café"` has length 4 and index 3 is `'é'`.
//!
//! The document also owns a single yank register. It is the only state a
//! non-undoable command ([`Yank`](crate::edit::Yank)) writes to.
//!
//! No undo/redo here. History lives in the [`n_command::Invoker`] that
//! drives the edit commands.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use ropey::Rope;

use crate::error::ScratchError;

/// Rope-backed text with a yank register and a modified flag.
#[derive(Debug, Clone, Default)]
pub struct Document {
    rope: Rope,
    path: Option<PathBuf>,
    modified: bool,
    register: Option<String>,
}

impl Document {
    // -- Construction -------------------------------------------------------

    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document holding `text`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            ..Self::default()
        }
    }

    /// Load a document from a file.
    ///
    /// # Errors
    ///
    /// Returns [`ScratchError::Io`] if the file can't be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScratchError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        log::debug!("loaded {} ({} chars)", path.display(), text.chars().count());
        Ok(Self {
            rope: Rope::from_str(&text),
            path: Some(path.to_path_buf()),
            ..Self::default()
        })
    }

    // -- Queries ------------------------------------------------------------

    /// Length in chars.
    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// True if the document holds no text.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Number of lines. An empty document has one (empty) line, and a
    /// trailing newline starts a new empty line.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Lines without their line terminators.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.rope.lines().map(|line| {
            let mut s = line.to_string();
            while s.ends_with('\n') || s.ends_with('\r') {
                s.pop();
            }
            s
        })
    }

    /// The whole text.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    /// Text in `range`, or `None` if the range is reversed or out of bounds.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Option<String> {
        self.valid(&range).then(|| self.rope.slice(range).to_string())
    }

    /// The file this document was loaded from.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// True if the text changed since load.
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Contents of the yank register.
    #[must_use]
    pub fn register(&self) -> Option<&str> {
        self.register.as_deref()
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `text` at char index `at`. Returns `false` (and changes
    /// nothing) if `at` is past the end.
    pub fn insert(&mut self, at: usize, text: &str) -> bool {
        if at > self.rope.len_chars() {
            return false;
        }
        if !text.is_empty() {
            self.rope.insert(at, text);
            self.modified = true;
        }
        true
    }

    /// Remove `range` and return the removed text, or `None` if the range is
    /// reversed or out of bounds.
    pub fn remove(&mut self, range: Range<usize>) -> Option<String> {
        if !self.valid(&range) {
            return None;
        }
        let removed = self.rope.slice(range.clone()).to_string();
        if !range.is_empty() {
            self.rope.remove(range);
            self.modified = true;
        }
        Some(removed)
    }

    /// Replace the whole text. Returns the previous text.
    pub fn replace_rope(&mut self, rope: Rope) -> Rope {
        self.modified = true;
        std::mem::replace(&mut self.rope, rope)
    }

    /// The underlying rope. Cloning it is cheap (shared nodes).
    #[must_use]
    pub const fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Overwrite the yank register.
    pub fn set_register(&mut self, text: String) {
        self.register = Some(text);
    }

    fn valid(&self, range: &Range<usize>) -> bool {
        range.start <= range.end && range.end <= self.rope.len_chars()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.len_chars(), 0);
        assert_eq!(doc.line_count(), 1);
        assert!(!doc.is_modified());
    }

    #[test]
    fn char_indices_not_bytes() {
        let doc = Document::from_text("café");
        assert_eq!(doc.len_chars(), 4);
        assert_eq!(doc.slice(3..4).as_deref(), Some("é"));
    }

    #[test]
    fn insert_middle_and_end() {
        let mut doc = Document::from_text("hllo");
        assert!(doc.insert(1, "e"));
        assert!(doc.insert(5, "!"));
        assert_eq!(doc.contents(), "hello!");
        assert!(doc.is_modified());
    }

    #[test]
    fn insert_past_end_refused() {
        let mut doc = Document::from_text("abc");
        assert!(!doc.insert(4, "x"));
        assert_eq!(doc.contents(), "abc");
        assert!(!doc.is_modified());
    }

    #[test]
    fn remove_returns_text() {
        let mut doc = Document::from_text("hello world");
        assert_eq!(doc.remove(5..11).as_deref(), Some(" world"));
        assert_eq!(doc.contents(), "hello");
    }

    #[test]
    fn remove_invalid_ranges() {
        let mut doc = Document::from_text("abc");
        assert_eq!(doc.remove(2..9), None);
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = 2..1;
        assert_eq!(doc.remove(reversed), None);
        assert_eq!(doc.contents(), "abc");
    }

    #[test]
    fn lines_strip_terminators() {
        let doc = Document::from_text("one\r\ntwo\nthree");
        let lines: Vec<String> = doc.lines().collect();
        assert_eq!(lines, ["one", "two", "three"]);
        assert_eq!(doc.line_count(), 3);
    }

    #[test]
    fn replace_rope_swaps_text() {
        let mut doc = Document::from_text("old");
        let previous = doc.replace_rope(Rope::from_str("new"));
        assert_eq!(previous.to_string(), "old");
        assert_eq!(doc.contents(), "new");
    }

    #[test]
    fn register_starts_empty() {
        let mut doc = Document::new();
        assert_eq!(doc.register(), None);
        doc.set_register("x".into());
        assert_eq!(doc.register(), Some("x"));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = Document::load("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, ScratchError::Io(_)));
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join(format!("n-scratch-load-{}.txt", std::process::id()));
        fs::write(&path, "from disk\n").unwrap();

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.contents(), "from disk\n");
        assert_eq!(doc.path(), Some(path.as_path()));
        assert!(!doc.is_modified());

        fs::remove_file(&path).unwrap();
    }
}
