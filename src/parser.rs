//! Assembles a [`Pipeline`] from the token stream of one input line.
//!
//! The parser is a small finite state machine: its state records what the
//! *next* word token will mean (a plain argument, or the file name owed to a
//! redirection operator that was just consumed). This makes the awkward
//! inputs — an operator at the start of the line, two operators in a row, an
//! operator with nothing after it — explicit error cases instead of
//! accidents of token order.

use crate::lexer::Token;
use thiserror::Error;

/// One pipeline stage: a program invocation with its argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Program name first, then its arguments.
    pub args: Vec<String>,
}

/// How the output file of a pipeline should be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// `>`: create the file, discarding any previous contents.
    Truncate,
    /// `>>`: create the file if needed, appending to previous contents.
    Append,
}

/// The parsed form of one input line: ordered command stages plus optional
/// file redirections.
///
/// Stage `i` pipes its output into stage `i + 1`. A captured input file
/// always feeds the first stage and a captured output file always receives
/// the last stage's output, regardless of where the operator appeared in the
/// line; a later `<` or `>`/`>>` overwrites an earlier capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    /// Stages in execution order, never empty.
    pub commands: Vec<Command>,
    /// Input file for the first stage, if `<` was present.
    pub file_in: Option<String>,
    /// Output file and open mode for the last stage, if `>` or `>>` was
    /// present.
    pub file_out: Option<(String, OutputMode)>,
}

/// Errors produced while assembling a [`Pipeline`] from tokens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The line contained no tokens at all.
    #[error("empty command line")]
    EmptyLine,
    /// A stage had no program name (`| foo`, `a | | b`, `a |`, `< f`).
    #[error("empty command in pipeline")]
    EmptyStage,
    /// A redirection operator was not followed by a file name.
    #[error("redirection operator is missing its file name")]
    RedirectTargetMissing,
}

/// What the next word token will mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// The next word is a program name or argument.
    Plain,
    /// `<` was just consumed; the next word names the input file.
    ExpectInfile,
    /// `>` was just consumed; the next word names the output file.
    ExpectOutfileTrunc,
    /// `>>` was just consumed; the next word names the output file.
    ExpectOutfileAppend,
}

struct PipelineBuilder {
    state: State,
    commands: Vec<Command>,
    current: Vec<String>,
    file_in: Option<String>,
    file_out: Option<(String, OutputMode)>,
}

impl PipelineBuilder {
    fn new() -> Self {
        PipelineBuilder {
            state: State::Plain,
            commands: Vec::new(),
            current: Vec::new(),
            file_in: None,
            file_out: None,
        }
    }

    fn feed(&mut self, token: Token) -> Result<(), ParseError> {
        match self.state {
            State::Plain => match token {
                Token::Word(word) => self.current.push(word),
                Token::Pipe => self.close_stage()?,
                Token::RedirectIn => self.state = State::ExpectInfile,
                Token::RedirectOut => self.state = State::ExpectOutfileTrunc,
                Token::RedirectAppend => self.state = State::ExpectOutfileAppend,
            },
            State::ExpectInfile => {
                self.file_in = Some(self.expect_target(token)?);
            }
            State::ExpectOutfileTrunc => {
                let target = self.expect_target(token)?;
                self.file_out = Some((target, OutputMode::Truncate));
            }
            State::ExpectOutfileAppend => {
                let target = self.expect_target(token)?;
                self.file_out = Some((target, OutputMode::Append));
            }
        }
        Ok(())
    }

    /// Consume the word owed to a redirection operator and return to
    /// [`State::Plain`]. Anything but a word means the operator was left
    /// dangling.
    fn expect_target(&mut self, token: Token) -> Result<String, ParseError> {
        match token {
            Token::Word(word) => {
                self.state = State::Plain;
                Ok(word)
            }
            _ => Err(ParseError::RedirectTargetMissing),
        }
    }

    fn close_stage(&mut self) -> Result<(), ParseError> {
        if self.current.is_empty() {
            return Err(ParseError::EmptyStage);
        }
        self.commands.push(Command {
            args: std::mem::take(&mut self.current),
        });
        Ok(())
    }

    fn finish(mut self, backup: Option<&str>) -> Result<Pipeline, ParseError> {
        if self.state != State::Plain {
            return Err(ParseError::RedirectTargetMissing);
        }
        self.close_stage()?;

        if let Some(path) = backup {
            self.commands.push(Command {
                args: vec!["tee".to_string(), "-a".to_string(), path.to_string()],
            });
        }

        Ok(Pipeline {
            commands: self.commands,
            file_in: self.file_in,
            file_out: self.file_out,
        })
    }
}

/// Builds a [`Pipeline`] from the tokens of one line.
///
/// `backup` is the backup file path when backup mode is enabled; the
/// resulting pipeline then carries an extra final `tee -a` stage that
/// duplicates the pipeline's output into that file.
pub fn build_pipeline(tokens: Vec<Token>, backup: Option<&str>) -> Result<Pipeline, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::EmptyLine);
    }
    let mut builder = PipelineBuilder::new();
    for token in tokens {
        builder.feed(token)?;
    }
    builder.finish(backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse(line: &str) -> Result<Pipeline, ParseError> {
        build_pipeline(tokenize(line), None)
    }

    fn args(pipeline: &Pipeline, stage: usize) -> Vec<&str> {
        pipeline.commands[stage]
            .args
            .iter()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn single_command() {
        let p = parse("echo hello world").unwrap();
        assert_eq!(p.commands.len(), 1);
        assert_eq!(args(&p, 0), ["echo", "hello", "world"]);
        assert_eq!(p.file_in, None);
        assert_eq!(p.file_out, None);
    }

    #[test]
    fn pipe_count_matches_stage_count() {
        let p = parse("a | b | c").unwrap();
        assert_eq!(p.commands.len(), 3);
        assert_eq!(args(&p, 0), ["a"]);
        assert_eq!(args(&p, 1), ["b"]);
        assert_eq!(args(&p, 2), ["c"]);
    }

    #[test]
    fn input_file_is_captured_not_an_argument() {
        let p = parse("sort < data.txt").unwrap();
        assert_eq!(p.file_in.as_deref(), Some("data.txt"));
        assert_eq!(args(&p, 0), ["sort"]);
    }

    #[test]
    fn output_file_truncate_vs_append() {
        let p = parse("echo hi > out.txt").unwrap();
        assert_eq!(
            p.file_out,
            Some(("out.txt".to_string(), OutputMode::Truncate))
        );
        assert_eq!(args(&p, 0), ["echo", "hi"]);

        let p = parse("echo hi >> out.txt").unwrap();
        assert_eq!(
            p.file_out,
            Some(("out.txt".to_string(), OutputMode::Append))
        );
    }

    #[test]
    fn arguments_may_follow_a_redirection() {
        // The original grammar allows this; the file name is pulled out and
        // the remaining words continue the same stage.
        let p = parse("echo > out.txt hi there").unwrap();
        assert_eq!(args(&p, 0), ["echo", "hi", "there"]);
        assert_eq!(
            p.file_out,
            Some(("out.txt".to_string(), OutputMode::Truncate))
        );
    }

    #[test]
    fn pipes_and_redirections_combined() {
        let p = parse("grep foo < in.txt | sort | uniq >> out.txt").unwrap();
        assert_eq!(p.commands.len(), 3);
        assert_eq!(p.file_in.as_deref(), Some("in.txt"));
        assert_eq!(
            p.file_out,
            Some(("out.txt".to_string(), OutputMode::Append))
        );
        assert_eq!(args(&p, 2), ["uniq"]);
    }

    #[test]
    fn later_redirection_overwrites_earlier() {
        let p = parse("echo hi > first > second").unwrap();
        assert_eq!(
            p.file_out,
            Some(("second".to_string(), OutputMode::Truncate))
        );
    }

    #[test]
    fn backup_mode_appends_tee_stage() {
        let p = build_pipeline(tokenize("echo hi"), Some("log.txt")).unwrap();
        assert_eq!(p.commands.len(), 2);
        assert_eq!(args(&p, 1), ["tee", "-a", "log.txt"]);
    }

    #[test]
    fn backup_stage_counts_on_top_of_pipes() {
        let p = build_pipeline(tokenize("a | b"), Some("log.txt")).unwrap();
        assert_eq!(p.commands.len(), 3);
    }

    #[test]
    fn empty_line_is_an_error() {
        assert_eq!(parse(""), Err(ParseError::EmptyLine));
        assert_eq!(parse("   "), Err(ParseError::EmptyLine));
    }

    #[test]
    fn stages_must_not_be_empty() {
        assert_eq!(parse("| foo"), Err(ParseError::EmptyStage));
        assert_eq!(parse("a |"), Err(ParseError::EmptyStage));
        assert_eq!(parse("a | | b"), Err(ParseError::EmptyStage));
        assert_eq!(parse("< infile"), Err(ParseError::EmptyStage));
    }

    #[test]
    fn dangling_redirection_is_an_error() {
        assert_eq!(parse("a >"), Err(ParseError::RedirectTargetMissing));
        assert_eq!(parse("a <"), Err(ParseError::RedirectTargetMissing));
        assert_eq!(parse("a > > b"), Err(ParseError::RedirectTargetMissing));
        assert_eq!(parse("a > | b"), Err(ParseError::RedirectTargetMissing));
    }
}
