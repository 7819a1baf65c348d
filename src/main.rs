// SPDX-License-Identifier: MIT
//
// n-invoke: a line-oriented scratch pad driven by an undo/redo invoker.
//
// This is the main binary that wires together the crates:
//
//   n-command → Command trait, Invoker (history, groups, delimiters)
//   n-scratch → Document, edit commands, command line, options, profiler
//
// Each input line flows through:
//
//   stdin → parse_line → ShellCommand → EditLine::build → Invoker → Document
//
// Editing commands go through the invoker and land in history. Everything
// else (print, undo, marks, :set) talks to the invoker or the options
// directly. Output for a line is collected into a String first so the shell
// can be driven from tests without a terminal.

use std::env;
use std::fmt::Write as _;
use std::io::{self, BufRead};
use std::process;

use n_command::Invoker;
use n_scratch::edit::Yank;
use n_scratch::{ClearTarget, Document, Options, ParseError, Profiler, ShellCommand, parse_line};

// ─── Shell ──────────────────────────────────────────────────────────────────

/// What the read loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// One editing session: the document, its history, and the options.
struct Shell {
    doc: Document,
    invoker: Invoker<Document>,
    options: Options,
    profiler: Profiler,
}

impl Shell {
    fn new(doc: Document) -> Self {
        let options = Options::default();
        let mut profiler = Profiler::new();
        profiler.set_padding(options.padding);
        Self {
            doc,
            invoker: Invoker::new(),
            options,
            profiler,
        }
    }

    /// Handle one input line, appending anything to show to `out`.
    ///
    /// With `:set timing`, a profiler report follows the command's output.
    fn handle(&mut self, line: &str, out: &mut String) -> Result<Flow, ParseError> {
        let timing = self.options.timing;
        if timing {
            self.profiler.start();
        }

        let command = parse_line(line)?;
        if timing {
            self.profiler.lap("parse");
        }

        let flow = self.run(command, line, out)?;
        if timing {
            self.profiler.lap("execute");
            self.profiler.stop();
            out.push_str(&self.profiler.report(Some(line.trim())));
        }
        Ok(flow)
    }

    fn run(
        &mut self,
        command: ShellCommand,
        line: &str,
        out: &mut String,
    ) -> Result<Flow, ParseError> {
        match command {
            ShellCommand::Nop => {}
            ShellCommand::Edit { edit, chained } => {
                let command = edit.build(&self.doc)?;
                if self.invoker.execute_chained(command, chained, &mut self.doc) {
                    self.echo(out);
                } else {
                    self.rejected(line, out);
                }
            }
            ShellCommand::Yank(from, to) => {
                if self
                    .invoker
                    .execute(Box::new(Yank::new(from..to)), &mut self.doc)
                {
                    let _ = writeln!(out, "yanked {} chars", to - from);
                } else {
                    self.rejected(line, out);
                }
            }
            ShellCommand::Print => self.print(out),
            ShellCommand::Undo { discard } => {
                if self.invoker.can_undo() {
                    let add_to_redo = self.options.redo && !discard;
                    self.invoker.undo_with(add_to_redo, &mut self.doc);
                    self.echo(out);
                } else {
                    out.push_str("Already at oldest change\n");
                }
            }
            ShellCommand::Redo => {
                if self.invoker.can_redo() {
                    self.invoker.redo(&mut self.doc);
                    self.echo(out);
                } else {
                    out.push_str("Already at newest change\n");
                }
            }
            ShellCommand::Mark(name) => self.invoker.push_delimiter_named(name),
            ShellCommand::UndoTo(name) => {
                self.invoker
                    .undo_to_delimiter(&name, self.options.redo, &mut self.doc);
                self.echo(out);
            }
            ShellCommand::Clear(target) => match target {
                ClearTarget::Both => self.invoker.clear(),
                ClearTarget::Undo => self.invoker.clear_undo(),
                ClearTarget::Redo => self.invoker.clear_redo(),
            },
            ShellCommand::Set(directives) => {
                for directive in &directives {
                    if let Some(message) = self.options.apply(directive)? {
                        out.push_str(&message);
                        out.push('\n');
                    }
                }
                self.profiler.set_padding(self.options.padding);
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    // ─── Output ─────────────────────────────────────────────────────────────

    fn echo(&self, out: &mut String) {
        if self.options.echo {
            self.print(out);
        }
    }

    fn print(&self, out: &mut String) {
        for (i, line) in self.doc.lines().enumerate() {
            if self.options.number {
                let _ = writeln!(out, "{:>3} {line}", i + 1);
            } else {
                let _ = writeln!(out, "{line}");
            }
        }
    }

    fn rejected(&self, line: &str, out: &mut String) {
        log::warn!("command rejected: {}", line.trim());
        let _ = writeln!(
            out,
            "no change (undo: {}, redo: {})",
            self.invoker.undo_count(),
            self.invoker.redo_count()
        );
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    env_logger::init();

    let doc = match env::args().nth(1) {
        Some(path) => Document::load(&path).unwrap_or_else(|e| {
            eprintln!("n-invoke: {path}: {e}");
            process::exit(1);
        }),
        None => Document::new(),
    };
    log::debug!("starting with {} chars", doc.len_chars());

    let mut shell = Shell::new(doc);
    for line in io::stdin().lock().lines() {
        let line = line.unwrap_or_else(|e| {
            eprintln!("n-invoke: {e}");
            process::exit(1);
        });

        let mut out = String::new();
        match shell.handle(&line, &mut out) {
            Ok(flow) => {
                print!("{out}");
                if flow == Flow::Quit {
                    break;
                }
            }
            Err(e) => eprintln!("n-invoke: {e}"),
        }
    }
    log::debug!("{:?}", shell.invoker);
}

// ─── Tests ──────────────────────────────────────────────────────────────────
