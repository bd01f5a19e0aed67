//! Session configuration and the backup transcript.
//!
//! The backup feature is deliberately carried as an explicit value handed to
//! the interpreter (and from there to the parser) instead of process-wide
//! state, so two sessions in one process — the tests, mostly — cannot
//! interfere with each other.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;

/// Startup configuration for one shell session.
#[derive(Debug, Clone, Default)]
pub struct ShellConfig {
    /// Path of the backup file, when backup mode is enabled. Every entered
    /// line is transcribed to it and every pipeline gains a final `tee -a`
    /// stage duplicating its output there.
    pub backup: Option<String>,
}

impl ShellConfig {
    /// The backup file path, if backup mode is enabled.
    pub fn backup_path(&self) -> Option<&str> {
        self.backup.as_deref()
    }
}

/// Append-only transcript of entered lines, kept open for the whole session.
#[derive(Debug)]
pub struct BackupLog {
    file: File,
}

impl BackupLog {
    /// Opens the backup file in append mode, creating it if needed.
    pub fn open(path: &str) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open backup file {path}"))?;
        Ok(BackupLog { file })
    }

    /// Appends the prompt and the raw line, exactly as entered. Called
    /// before the line executes, so the transcript always precedes the
    /// pipeline output that `tee` appends.
    pub fn record(&mut self, prompt: &str, line: &str) -> Result<()> {
        writeln!(self.file, "{prompt}{line}").context("cannot write to backup file")?;
        Ok(())
    }
}
