//! Turns a parsed [`Pipeline`] into running child processes.
//!
//! Each stage becomes one `std::process::Command` child. Adjacent stages are
//! connected by handing the previous child's piped stdout to the next
//! child's stdin, so every pipe has exactly one writer and one reader and is
//! closed as soon as it has been moved into a spawned child. The calling
//! process's own stdin and stdout are never rewired; redirections only ever
//! apply to the children.

use crate::parser::{OutputMode, Pipeline};
use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::process::{Child, ChildStdout, Command, Stdio};

/// The terminate command: a pipeline starting with it ends the session.
pub const QUIT: &str = "quit";

/// Whether the interactive loop should keep going after a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Keep reading lines.
    Continue,
    /// The terminate command was entered; end the session.
    Exit,
}

/// Executes every stage of `pipeline` as a child process.
///
/// In the foreground case this blocks until the *last* stage exits — and
/// only the last; earlier stages of a multi-stage pipeline are left to
/// finish on their own, matching the single-wait behavior this shell has
/// always had. With `background` set, all stages are left running and the
/// call returns immediately.
///
/// A stage that fails to spawn (typically an unknown program) is reported
/// and skipped; the rest of the pipeline still runs, its reader seeing end
/// of input. Failure to open a redirection file is an error for the whole
/// line and nothing is spawned after it.
pub fn execute(pipeline: &Pipeline, background: bool) -> Result<Continuation> {
    let Some(first) = pipeline.commands.first() else {
        return Ok(Continuation::Continue);
    };
    if first.args.first().map(String::as_str) == Some(QUIT) {
        return Ok(Continuation::Exit);
    }

    let stage_count = pipeline.commands.len();
    let mut carried: Option<ChildStdout> = None;
    let mut last_child: Option<Child> = None;

    for (i, command) in pipeline.commands.iter().enumerate() {
        let last = i + 1 == stage_count;
        let stdin = stage_stdin(pipeline, i, carried.take())?;
        let stdout = stage_stdout(pipeline, last)?;

        match Command::new(&command.args[0])
            .args(&command.args[1..])
            .stdin(stdin)
            .stdout(stdout)
            .spawn()
        {
            Ok(mut child) => {
                if !last {
                    carried = child.stdout.take();
                }
                last_child = Some(child);
            }
            Err(err) => {
                eprintln!("psh: {}: {}", command.args[0], err);
                last_child = None;
            }
        }
    }

    if !background && let Some(mut child) = last_child {
        child
            .wait()
            .context("waiting for the last pipeline stage")?;
    }

    Ok(Continuation::Continue)
}

/// Input for stage `index`: the pipeline's input file or the caller's stdin
/// for the first stage, the previous stage's pipe for every later one.
fn stage_stdin(pipeline: &Pipeline, index: usize, carried: Option<ChildStdout>) -> Result<Stdio> {
    if index > 0 {
        // A missing carried handle means the previous stage never spawned;
        // null stdin gives this stage the same immediate end-of-input a
        // writerless pipe would.
        return Ok(carried.map_or_else(Stdio::null, Stdio::from));
    }
    match &pipeline.file_in {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("cannot open input file {path}"))?;
            Ok(Stdio::from(file))
        }
        None => Ok(Stdio::inherit()),
    }
}

/// Output for a stage: a fresh pipe for every stage but the last, and the
/// pipeline's output file (or the caller's stdout) for the last.
fn stage_stdout(pipeline: &Pipeline, last: bool) -> Result<Stdio> {
    if !last {
        return Ok(Stdio::piped());
    }
    match &pipeline.file_out {
        Some((path, mode)) => {
            let mut options = OpenOptions::new();
            options.write(true).create(true);
            match mode {
                OutputMode::Truncate => options.truncate(true),
                OutputMode::Append => options.append(true),
            };
            let file = options
                .open(path)
                .with_context(|| format!("cannot open output file {path}"))?;
            Ok(Stdio::from(file))
        }
        None => Ok(Stdio::inherit()),
    }
}
