//! The interactive read-parse-execute loop.

use crate::config::{BackupLog, ShellConfig};
use crate::executor::{self, Continuation};
use crate::lexer;
use crate::parser;
use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// The fixed prompt printed before every line.
pub const PROMPT: &str = "> ";

/// An interactive session: reads lines, transcribes them when backup mode is
/// on, and hands each one to the parser and executor.
pub struct Interpreter {
    config: ShellConfig,
    backup: Option<BackupLog>,
}

impl Interpreter {
    /// Creates a session from a configuration. When backup mode is
    /// configured the backup file is opened here, before the first prompt;
    /// failure to open it is a startup error.
    pub fn new(config: ShellConfig) -> Result<Self> {
        let backup = match config.backup_path() {
            Some(path) => Some(BackupLog::open(path)?),
            None => None,
        };
        Ok(Interpreter { config, backup })
    }

    /// Runs the loop until the terminate command or end of input.
    pub fn repl(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;
        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line.as_str())?;
                    if self.run_line(&line)? == Continuation::Exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    /// Transcribes, parses, and executes one entered line.
    ///
    /// Parse errors and per-line execution errors (a bad redirect, say) are
    /// reported and leave the session running; only a transcript write
    /// failure propagates.
    pub fn run_line(&mut self, line: &str) -> Result<Continuation> {
        if let Some(log) = self.backup.as_mut() {
            log.record(PROMPT, line)?;
        }

        let (stripped, background) = lexer::strip_background(line);
        let tokens = lexer::tokenize(stripped);
        let pipeline = match parser::build_pipeline(tokens, self.config.backup_path()) {
            Ok(pipeline) => pipeline,
            Err(err) => {
                eprintln!("psh: {err}");
                return Ok(Continuation::Continue);
            }
        };

        match executor::execute(&pipeline, background) {
            Ok(continuation) => Ok(continuation),
            Err(err) => {
                eprintln!("psh: {err:#}");
                Ok(Continuation::Continue)
            }
        }
    }
}
