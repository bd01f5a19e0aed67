//! A line-oriented pipeline shell.
//!
//! Each input line is tokenized ([`lexer`]), parsed into a [`Pipeline`] of
//! command stages with optional file redirections ([`parser`]), and executed
//! as a chain of child processes connected by pipes ([`executor`]). A
//! session-wide [`ShellConfig`] can enable backup mode, which transcribes
//! every entered line to a file and duplicates each pipeline's output into
//! the same file through an appended `tee` stage.
//!
//! The main entry point is [`Interpreter`], which owns the interactive loop.
//! The [`lexer`], [`parser`], and [`executor`] modules are usable on their
//! own for driving the shell non-interactively.

pub mod config;
pub mod executor;
pub mod lexer;
pub mod parser;

mod interpreter;

pub use config::ShellConfig;
pub use interpreter::Interpreter;
pub use parser::{Command, OutputMode, ParseError, Pipeline};
