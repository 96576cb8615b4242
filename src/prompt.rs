//! Asking the user for parameter values.

use anyhow::{bail, Result};
use std::io::{self, BufRead, Write};

use crate::schema::Parameter;

/// Supplies a value for a parameter, or fails.
pub trait Prompter {
    fn prompt(&mut self, parameter: &Parameter) -> Result<String>;
}

/// Prompter for non-interactive runs. Always fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

impl Prompter for NoPrompt {
    fn prompt(&mut self, parameter: &Parameter) -> Result<String> {
        bail!("cannot prompt for {}: not running interactively", parameter.key)
    }
}

/// Line-oriented prompt on a terminal.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
    require_tty: bool,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on stdin/stdout.
    ///
    /// Each prompt fails when stdin is not a terminal; building one never
    /// does, so a pass that needs no answers runs anywhere.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout()).require_tty(true)
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            require_tty: false,
        }
    }

    /// Refuse to prompt unless stdin is a terminal.
    pub fn require_tty(mut self, require: bool) -> Self {
        self.require_tty = require;
        self
    }

    fn ask(&mut self, p: &Parameter) -> Result<Option<String>> {
        if p.has_default() {
            write!(self.output, "{} [{}]: ", p.title, p.default)?;
        } else if p.required {
            write!(self.output, "{} (required): ", p.title)?;
        } else {
            write!(self.output, "{}: ", p.title)?;
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn prompt(&mut self, p: &Parameter) -> Result<String> {
        if self.require_tty && !atty::is(atty::Stream::Stdin) {
            bail!("interactive mode needs a terminal on stdin");
        }
        if !p.description.is_empty() {
            writeln!(self.output, "{}", p.description)?;
        }

        loop {
            let Some(answer) = self.ask(p)? else {
                bail!("input aborted");
            };
            if !answer.is_empty() {
                return Ok(answer);
            }
            if p.has_default() {
                return Ok(p.default.clone());
            }
            if !p.required {
                return Ok(String::new());
            }
            writeln!(self.output, "A value is required.")?;
        }
    }
}
