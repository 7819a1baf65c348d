//! Shell command line: one input line, one command.
//!
//! # Supported commands
//!
//! | Command               | Action                                          |
//! |-----------------------|-------------------------------------------------|
//! | `a TEXT`              | Append TEXT at the end (adjacent appends merge) |
//! | `i N TEXT`            | Insert TEXT at char index N                     |
//! | `o TEXT`              | Open a new line at the end holding TEXT         |
//! | `x N M`               | Delete chars `N..M`                             |
//! | `s/PAT/REP/`          | Regex substitute over the whole document        |
//! | `y N M`               | Yank chars `N..M` into the register             |
//! | `p`                   | Print the document                              |
//! | `u`                   | Undo one group                                  |
//! | `U`                   | Undo one group, discarding it                   |
//! | `r`                   | Redo one group                                  |
//! | `mark [NAME]`         | Push a delimiter                                |
//! | `undo-to NAME`        | Undo to and including the named delimiter       |
//! | `clear [undo\|redo]`  | Drop history                                    |
//! | `&CMD`                | Run an editing command chained to the last one  |
//! | `:set ARGS`           | Options                                         |
//! | `q`                   | Quit                                            |
//!
//! In TEXT, `\n`, `\t`, and `\\` are escapes. Blank lines and lines starting
//! with `#` do nothing.
//!
//! # Architecture
//!
//! Parsing is pure: a line becomes a [`ShellCommand`] without looking at the
//! document. Editing commands are turned into invoker commands later by
//! [`EditLine::build`], which needs the document for positions like "the
//! end".

use n_command::Command;
use regex::Regex;

use crate::document::Document;
use crate::edit::{DeleteText, InsertText, ReplaceAll, open_line};
use crate::error::ParseError;
use crate::options::{SetDirective, parse_set};

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// An editing command: something that goes through the invoker and can be
/// chained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditLine {
    /// `a TEXT`
    Append(String),

    /// `i N TEXT`
    Insert(usize, String),

    /// `o TEXT`
    Open(String),

    /// `x N M`
    Delete(usize, usize),

    /// `s/PAT/REP/`
    Substitute { pattern: String, replacement: String },
}

/// Which history stack `clear` drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearTarget {
    Both,
    Undo,
    Redo,
}

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Blank line or comment.
    Nop,

    /// An editing command, optionally chained to the previous history entry.
    Edit { edit: EditLine, chained: bool },

    /// `y N M`
    Yank(usize, usize),

    /// `p`
    Print,

    /// `u` (`discard = false`) or `U` (`discard = true`).
    Undo { discard: bool },

    /// `r`
    Redo,

    /// `mark [NAME]`
    Mark(String),

    /// `undo-to NAME`
    UndoTo(String),

    /// `clear [undo|redo]`
    Clear(ClearTarget),

    /// `:set ARGS`
    Set(Vec<SetDirective>),

    /// `q`
    Quit,
}

impl EditLine {
    /// Build the invoker command for this edit against `doc`.
    ///
    /// # Errors
    ///
    /// [`ParseError::BadPattern`] if a substitution pattern doesn't compile.
    pub fn build(&self, doc: &Document) -> Result<Box<dyn Command<Document>>, ParseError> {
        Ok(match self {
            Self::Append(text) => Box::new(InsertText::new(doc.len_chars(), text.clone())),
            Self::Insert(at, text) => Box::new(InsertText::new(*at, text.clone())),
            Self::Open(text) => Box::new(open_line(doc.len_chars(), text)),
            Self::Delete(from, to) => Box::new(DeleteText::new(*from..*to)),
            Self::Substitute {
                pattern,
                replacement,
            } => {
                let regex =
                    Regex::new(pattern).map_err(|e| ParseError::BadPattern(e.to_string()))?;
                Box::new(ReplaceAll::new(regex, replacement.clone()))
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse one input line.
///
/// # Errors
///
/// A [`ParseError`] describing the first problem found.
pub fn parse_line(input: &str) -> Result<ShellCommand, ParseError> {
    let trimmed = input.trim_end_matches(['\n', '\r']).trim_start();

    if trimmed.trim_end().is_empty() || trimmed.starts_with('#') {
        return Ok(ShellCommand::Nop);
    }

    if let Some(rest) = trimmed.strip_prefix('&') {
        return match parse_edit(rest.trim_start())? {
            Some(edit) => Ok(ShellCommand::Edit {
                edit,
                chained: true,
            }),
            None => Err(ParseError::NotChainable),
        };
    }

    if let Some(edit) = parse_edit(trimmed)? {
        return Ok(ShellCommand::Edit {
            edit,
            chained: false,
        });
    }

    let (cmd, arg) = split_command(trimmed);
    let arg = arg.trim_end();

    match cmd {
        "y" => {
            let (from, to) = parse_pair("y", arg)?;
            Ok(ShellCommand::Yank(from, to))
        }
        "p" => Ok(ShellCommand::Print),
        "u" => Ok(ShellCommand::Undo { discard: false }),
        "U" => Ok(ShellCommand::Undo { discard: true }),
        "r" => Ok(ShellCommand::Redo),
        "mark" => Ok(ShellCommand::Mark(arg.to_string())),
        "undo-to" => {
            if arg.is_empty() {
                return Err(ParseError::MissingArgument {
                    command: "undo-to",
                    what: "delimiter name",
                });
            }
            Ok(ShellCommand::UndoTo(arg.to_string()))
        }
        "clear" => match arg {
            "" => Ok(ShellCommand::Clear(ClearTarget::Both)),
            "undo" => Ok(ShellCommand::Clear(ClearTarget::Undo)),
            "redo" => Ok(ShellCommand::Clear(ClearTarget::Redo)),
            _ => Err(ParseError::UnknownCommand(trimmed.trim_end().to_string())),
        },
        ":set" => Ok(ShellCommand::Set(parse_set(arg))),
        "q" | ":q" => Ok(ShellCommand::Quit),
        _ => Err(ParseError::UnknownCommand(trimmed.trim_end().to_string())),
    }
}

/// Parse an editing command. `Ok(None)` if `input` isn't one.
fn parse_edit(input: &str) -> Result<Option<EditLine>, ParseError> {
    if let Some(body) = input.strip_prefix("s/") {
        return parse_substitute(body).map(Some);
    }

    let (cmd, arg) = split_command(input);
    let edit = match cmd {
        "a" => EditLine::Append(required_text("a", arg)?),
        "o" => EditLine::Open(unescape(arg)),
        "i" => {
            let (at, rest) = split_command(arg);
            let at = parse_index("i", at)?;
            EditLine::Insert(at, required_text("i", rest)?)
        }
        "x" => {
            let (from, to) = parse_pair("x", arg.trim_end())?;
            EditLine::Delete(from, to)
        }
        _ => return Ok(None),
    };
    Ok(Some(edit))
}

/// Parse the body of `s/PAT/REP/` (everything after `s/`).
///
/// `\/` is an escaped slash. The trailing `/` is optional.
fn parse_substitute(body: &str) -> Result<EditLine, ParseError> {
    let body = body.trim_end();
    let Some((pattern, rest)) = split_at_unescaped(body, '/') else {
        return Err(ParseError::MissingArgument {
            command: "s",
            what: "replacement",
        });
    };
    if pattern.is_empty() {
        return Err(ParseError::MissingArgument {
            command: "s",
            what: "pattern",
        });
    }
    let replacement = split_at_unescaped(rest, '/').map_or(rest, |(replacement, _)| replacement);

    Ok(EditLine::Substitute {
        pattern: unescape_delim(pattern, '/'),
        replacement: unescape_delim(replacement, '/'),
    })
}

/// Split into the first word and the rest (leading whitespace removed from
/// the rest, trailing whitespace kept).
fn split_command(input: &str) -> (&str, &str) {
    input
        .find(char::is_whitespace)
        .map_or((input, ""), |pos| (&input[..pos], input[pos..].trim_start()))
}

fn required_text(command: &'static str, arg: &str) -> Result<String, ParseError> {
    if arg.is_empty() {
        return Err(ParseError::MissingArgument {
            command,
            what: "text",
        });
    }
    Ok(unescape(arg))
}

fn parse_index(command: &'static str, value: &str) -> Result<usize, ParseError> {
    if value.is_empty() {
        return Err(ParseError::MissingArgument {
            command,
            what: "index",
        });
    }
    value.parse().map_err(|_| ParseError::BadNumber {
        command,
        value: value.to_string(),
    })
}

fn parse_pair(command: &'static str, arg: &str) -> Result<(usize, usize), ParseError> {
    let mut parts = arg.split_whitespace();
    let from = parse_index(command, parts.next().unwrap_or(""))?;
    let to = parse_index(command, parts.next().unwrap_or(""))?;
    Ok((from, to))
}

/// Split a string at the first unescaped occurrence of `delim`.
fn split_at_unescaped(s: &str, delim: char) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (byte_idx, ch) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if ch == delim {
            return Some((&s[..byte_idx], &s[byte_idx + ch.len_utf8()..]));
        }
    }
    None
}

/// `\<delim>` → `<delim>`. Other escapes pass through for the regex engine.
fn unescape_delim(s: &str, delim: char) -> String {
    s.replace(&format!("\\{delim}"), &delim.to_string())
}

/// Expand `\n`, `\t`, and `\\` in typed text. Unknown escapes stay as typed.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn edit(edit: EditLine) -> ShellCommand {
        ShellCommand::Edit {
            edit,
            chained: false,
        }
    }

    // -- Editing commands ---------------------------------------------------

    #[test]
    fn parse_append_keeps_inner_spaces() {
        assert_eq!(
            parse_line("a hello  world"),
            Ok(edit(EditLine::Append("hello  world".into())))
        );
    }

    #[test]
    fn parse_append_keeps_trailing_space() {
        assert_eq!(
            parse_line("a word \n"),
            Ok(edit(EditLine::Append("word ".into())))
        );
    }

    #[test]
    fn parse_append_escapes() {
        assert_eq!(
            parse_line(r"a one\ntwo\\three\q"),
            Ok(edit(EditLine::Append("one\ntwo\\three\\q".into())))
        );
    }

    #[test]
    fn parse_append_needs_text() {
        assert_eq!(
            parse_line("a"),
            Err(ParseError::MissingArgument {
                command: "a",
                what: "text"
            })
        );
    }

    #[test]
    fn parse_insert() {
        assert_eq!(
            parse_line("i 3 abc"),
            Ok(edit(EditLine::Insert(3, "abc".into())))
        );
    }

    #[test]
    fn parse_insert_bad_index() {
        assert_eq!(
            parse_line("i x abc"),
            Err(ParseError::BadNumber {
                command: "i",
                value: "x".into()
            })
        );
    }

    #[test]
    fn parse_open_allows_empty_line() {
        assert_eq!(parse_line("o"), Ok(edit(EditLine::Open(String::new()))));
        assert_eq!(parse_line("o text"), Ok(edit(EditLine::Open("text".into()))));
    }

    #[test]
    fn parse_delete() {
        assert_eq!(parse_line("x 2 5"), Ok(edit(EditLine::Delete(2, 5))));
        assert_eq!(
            parse_line("x 2"),
            Err(ParseError::MissingArgument {
                command: "x",
                what: "index"
            })
        );
    }

    #[test]
    fn parse_substitute_forms() {
        let expected = edit(EditLine::Substitute {
            pattern: "a+".into(),
            replacement: "b".into(),
        });
        assert_eq!(parse_line("s/a+/b/"), Ok(expected.clone()));
        assert_eq!(parse_line("s/a+/b"), Ok(expected));
    }

    #[test]
    fn parse_substitute_escaped_slash() {
        assert_eq!(
            parse_line(r"s/a\/b/c\/d/"),
            Ok(edit(EditLine::Substitute {
                pattern: "a/b".into(),
                replacement: "c/d".into(),
            }))
        );
    }

    #[test]
    fn parse_substitute_empty_replacement() {
        assert_eq!(
            parse_line("s/x//"),
            Ok(edit(EditLine::Substitute {
                pattern: "x".into(),
                replacement: String::new(),
            }))
        );
    }

    #[test]
    fn parse_substitute_missing_parts() {
        assert!(matches!(
            parse_line("s/abc"),
            Err(ParseError::MissingArgument { what: "replacement", .. })
        ));
        assert!(matches!(
            parse_line("s//x/"),
            Err(ParseError::MissingArgument { what: "pattern", .. })
        ));
    }

    // -- Chaining -----------------------------------------------------------

    #[test]
    fn parse_chained_edit() {
        assert_eq!(
            parse_line("& a more"),
            Ok(ShellCommand::Edit {
                edit: EditLine::Append("more".into()),
                chained: true,
            })
        );
        assert_eq!(
            parse_line("&x 0 1"),
            Ok(ShellCommand::Edit {
                edit: EditLine::Delete(0, 1),
                chained: true,
            })
        );
    }

    #[test]
    fn chaining_non_edit_is_an_error() {
        assert_eq!(parse_line("&u"), Err(ParseError::NotChainable));
        assert_eq!(parse_line("&"), Err(ParseError::NotChainable));
    }

    // -- History commands ---------------------------------------------------

    #[test]
    fn parse_undo_redo() {
        assert_eq!(parse_line("u"), Ok(ShellCommand::Undo { discard: false }));
        assert_eq!(parse_line("U"), Ok(ShellCommand::Undo { discard: true }));
        assert_eq!(parse_line("r"), Ok(ShellCommand::Redo));
    }

    #[test]
    fn parse_marks() {
        assert_eq!(parse_line("mark"), Ok(ShellCommand::Mark(String::new())));
        assert_eq!(parse_line("mark drag"), Ok(ShellCommand::Mark("drag".into())));
        assert_eq!(
            parse_line("undo-to drag"),
            Ok(ShellCommand::UndoTo("drag".into()))
        );
        assert!(parse_line("undo-to").is_err());
    }

    #[test]
    fn parse_clear() {
        assert_eq!(parse_line("clear"), Ok(ShellCommand::Clear(ClearTarget::Both)));
        assert_eq!(
            parse_line("clear undo"),
            Ok(ShellCommand::Clear(ClearTarget::Undo))
        );
        assert_eq!(
            parse_line("clear redo"),
            Ok(ShellCommand::Clear(ClearTarget::Redo))
        );
        assert!(parse_line("clear all").is_err());
    }

    // -- Misc ---------------------------------------------------------------

    #[test]
    fn parse_nop() {
        assert_eq!(parse_line(""), Ok(ShellCommand::Nop));
        assert_eq!(parse_line("   \n"), Ok(ShellCommand::Nop));
        assert_eq!(parse_line("# comment"), Ok(ShellCommand::Nop));
    }

    #[test]
    fn parse_set_and_quit() {
        assert_eq!(
            parse_line(":set nu noecho"),
            Ok(ShellCommand::Set(vec![
                SetDirective::On("nu".into()),
                SetDirective::Off("echo".into()),
            ]))
        );
        assert_eq!(
            parse_line(":set"),
            Ok(ShellCommand::Set(vec![SetDirective::ShowChanged]))
        );
        assert_eq!(parse_line("q"), Ok(ShellCommand::Quit));
        assert_eq!(parse_line(":q"), Ok(ShellCommand::Quit));
    }

    #[test]
    fn parse_unknown() {
        assert_eq!(
            parse_line("frobnicate now"),
            Err(ParseError::UnknownCommand("frobnicate now".into()))
        );
    }

    #[test]
    fn parse_yank() {
        assert_eq!(parse_line("y 0 4"), Ok(ShellCommand::Yank(0, 4)));
    }

    // -- build --------------------------------------------------------------

    #[test]
    fn build_append_targets_end() {
        let mut doc = Document::from_text("abc");
        let mut cmd = EditLine::Append("d".into()).build(&doc).unwrap();
        assert!(cmd.execute(&mut doc));
        assert_eq!(doc.contents(), "abcd");
    }

    #[test]
    fn build_open_line() {
        let mut doc = Document::from_text("one");
        let mut cmd = EditLine::Open("two".into()).build(&doc).unwrap();
        assert!(cmd.execute(&mut doc));
        assert_eq!(doc.contents(), "one\ntwo");
    }

    #[test]
    fn build_bad_pattern() {
        let doc = Document::new();
        let err = EditLine::Substitute {
            pattern: "(".into(),
            replacement: String::new(),
        }
        .build(&doc)
        .err()
        .unwrap();
        assert!(matches!(err, ParseError::BadPattern(_)));
    }
}
