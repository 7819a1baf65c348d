//! Shell options: the `:set` system.
//!
//! Parses `:set` arguments into [`SetDirective`]s and applies them to an
//! [`Options`] value.
//!
//! # Supported syntax
//!
//! | Syntax           | Effect                        |
//! |------------------|-------------------------------|
//! | `:set option`    | Enable boolean / show numeric |
//! | `:set nooption`  | Disable boolean               |
//! | `:set option!`   | Toggle boolean                |
//! | `:set option?`   | Query current value           |
//! | `:set option=N`  | Assign numeric value          |
//! | `:set`           | Show changed options          |
//! | `:set all`       | Show all options              |
//!
//! # Option names
//!
//! | Full name | Abbrev | Type    | Default |
//! |-----------|--------|---------|---------|
//! | `echo`    | `ec`   | bool    | true    |
//! | `number`  | `nu`   | bool    | false   |
//! | `timing`  | `ti`   | bool    | false   |
//! | `redo`    | `re`   | bool    | true    |
//! | `padding` | `pad`  | integer | 14      |
//!
//! `padding` accepts `0` through `256`.

use crate::error::ParseError;
use crate::profiler::{DEFAULT_PADDING, MAX_PADDING};

/// A parsed `:set` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `:set option`: enable a boolean option.
    On(String),

    /// `:set nooption`: disable a boolean option.
    Off(String),

    /// `:set option!`: toggle a boolean option.
    Toggle(String),

    /// `:set option?`: query the current value.
    Query(String),

    /// `:set option=value`: assign a value.
    Assign(String, String),

    /// `:set` with no arguments: show changed options.
    ShowChanged,

    /// `:set all`: show all options.
    ShowAll,
}

// ---------------------------------------------------------------------------
// Option names
// ---------------------------------------------------------------------------

/// Boolean options, as (full name, abbreviation).
const BOOL_OPTIONS: [(&str, &str); 4] = [
    ("echo", "ec"),
    ("number", "nu"),
    ("timing", "ti"),
    ("redo", "re"),
];

/// Numeric options, as (full name, abbreviation).
const NUMERIC_OPTIONS: [(&str, &str); 1] = [("padding", "pad")];

fn canonical(table: &[(&'static str, &'static str)], name: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(full, abbrev)| *full == name || *abbrev == name)
        .map(|(full, _)| *full)
}

/// Returns `true` if `name` is a known boolean option (full name or abbreviation).
#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    canonical(&BOOL_OPTIONS, name).is_some()
}

/// Returns `true` if `name` is a known numeric option (full name or abbreviation).
#[must_use]
pub fn is_numeric_option(name: &str) -> bool {
    canonical(&NUMERIC_OPTIONS, name).is_some()
}

/// Returns `true` if `name` is any known option.
#[must_use]
pub fn is_known_option(name: &str) -> bool {
    is_bool_option(name) || is_numeric_option(name)
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse the full `:set` arguments string into directives.
///
/// An empty argument string produces [`SetDirective::ShowChanged`].
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return vec![SetDirective::ShowChanged];
    }
    trimmed.split_whitespace().map(parse_set_arg).collect()
}

/// Parse a single `:set` argument into a directive.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if arg == "all" {
        return SetDirective::ShowAll;
    }

    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }

    if let Some(name) = arg.strip_suffix('?') {
        return SetDirective::Query(name.to_string());
    }

    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }

    // `noecho` → Off("echo"), but only for real boolean names, so a future
    // option starting with "no" still parses as itself.
    if let Some(name) = arg.strip_prefix("no") {
        if is_bool_option(name) {
            return SetDirective::Off(name.to_string());
        }
    }

    if is_numeric_option(arg) {
        return SetDirective::Query(arg.to_string());
    }

    SetDirective::On(arg.to_string())
}

/// `"name"` when true, `"noname"` when false.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_string()
    } else {
        format!("no{name}")
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Current option values for a shell session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Print the document after each editing command.
    pub echo: bool,
    /// Prefix printed lines with line numbers.
    pub number: bool,
    /// Profile each shell command and print the report.
    pub timing: bool,
    /// Whether `u` feeds undone commands to the redo stack.
    pub redo: bool,
    /// Width of the profiler's per-lap time column.
    pub padding: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            echo: true,
            number: false,
            timing: false,
            redo: true,
            padding: DEFAULT_PADDING,
        }
    }
}

impl Options {
    /// Apply one directive.
    ///
    /// Returns the text to show the user, if any.
    ///
    /// # Errors
    ///
    /// [`ParseError::UnknownOption`] for names that aren't options (or a
    /// boolean operation on a numeric option), and
    /// [`ParseError::BadOptionValue`] for unparseable or out-of-range
    /// assignments, and for assignments to boolean options.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>, ParseError> {
        match directive {
            SetDirective::On(name) => {
                *self.flag_mut(name)? = true;
                Ok(None)
            }
            SetDirective::Off(name) => {
                *self.flag_mut(name)? = false;
                Ok(None)
            }
            SetDirective::Toggle(name) => {
                let flag = self.flag_mut(name)?;
                *flag = !*flag;
                Ok(None)
            }
            SetDirective::Query(name) => self.show(name).map(Some),
            SetDirective::Assign(name, value) => {
                let bad_value = || ParseError::BadOptionValue {
                    name: name.clone(),
                    value: value.clone(),
                };
                if canonical(&NUMERIC_OPTIONS, name) != Some("padding") {
                    return Err(if is_known_option(name) {
                        bad_value()
                    } else {
                        ParseError::UnknownOption(name.clone())
                    });
                }
                self.padding = value
                    .parse::<usize>()
                    .ok()
                    .filter(|padding| *padding <= MAX_PADDING)
                    .ok_or_else(bad_value)?;
                Ok(None)
            }
            SetDirective::ShowChanged => {
                let defaults = Self::default();
                let changed: Vec<String> = self
                    .entries()
                    .into_iter()
                    .zip(defaults.entries())
                    .filter(|(now, default)| now != default)
                    .map(|(now, _)| now)
                    .collect();
                Ok(Some(changed.join("  ")))
            }
            SetDirective::ShowAll => Ok(Some(self.entries().join("  "))),
        }
    }

    fn flag_mut(&mut self, name: &str) -> Result<&mut bool, ParseError> {
        match canonical(&BOOL_OPTIONS, name) {
            Some("echo") => Ok(&mut self.echo),
            Some("number") => Ok(&mut self.number),
            Some("timing") => Ok(&mut self.timing),
            Some("redo") => Ok(&mut self.redo),
            _ => Err(ParseError::UnknownOption(name.to_string())),
        }
    }

    fn show(&self, name: &str) -> Result<String, ParseError> {
        match canonical(&BOOL_OPTIONS, name).or_else(|| canonical(&NUMERIC_OPTIONS, name)) {
            Some("echo") => Ok(format_bool("echo", self.echo)),
            Some("number") => Ok(format_bool("number", self.number)),
            Some("timing") => Ok(format_bool("timing", self.timing)),
            Some("redo") => Ok(format_bool("redo", self.redo)),
            Some("padding") => Ok(format!("padding={}", self.padding)),
            _ => Err(ParseError::UnknownOption(name.to_string())),
        }
    }

    fn entries(&self) -> Vec<String> {
        BOOL_OPTIONS
            .iter()
            .chain(NUMERIC_OPTIONS.iter())
            .filter_map(|(full, _)| self.show(full).ok())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
