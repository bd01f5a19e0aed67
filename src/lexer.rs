//! Lexical analysis for a single command line.
//!
//! The syntax is deliberately small: tokens are separated by whitespace and
//! there is no quoting or escaping, so lexing is a split followed by a
//! classification of the four operators.

/// A classified token from one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A plain word: a program name, an argument, or a redirection target.
    Word(String),
    /// The pipe separator, `|`.
    Pipe,
    /// Input redirection, `<`.
    RedirectIn,
    /// Output redirection with truncation, `>`.
    RedirectOut,
    /// Output redirection with append, `>>`.
    RedirectAppend,
}

/// Splits a line into whitespace-delimited tokens and classifies them.
///
/// Operators are recognized only when a token equals them exactly: `a>b` is
/// a single word, while `a > b` contains an output redirection.
pub fn tokenize(line: &str) -> Vec<Token> {
    line.split_whitespace()
        .map(|tok| match tok {
            "|" => Token::Pipe,
            "<" => Token::RedirectIn,
            ">" => Token::RedirectOut,
            ">>" => Token::RedirectAppend,
            word => Token::Word(word.to_string()),
        })
        .collect()
}

/// Strips a trailing `&` background marker from the line.
///
/// Returns the line without the marker and whether it was present. The
/// marker is a suffix check, so both `sleep 5 &` and `sleep 5&` count.
pub fn strip_background(line: &str) -> (&str, bool) {
    let trimmed = line.trim_end();
    match trimmed.strip_suffix('&') {
        Some(rest) => (rest.trim_end(), true),
        None => (trimmed, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    #[test]
    fn classifies_operators() {
        assert_eq!(
            tokenize("cat < in | sort > out"),
            vec![
                word("cat"),
                Token::RedirectIn,
                word("in"),
                Token::Pipe,
                word("sort"),
                Token::RedirectOut,
                word("out"),
            ]
        );
    }

    #[test]
    fn double_arrow_is_append() {
        assert_eq!(
            tokenize("echo hi >> log"),
            vec![word("echo"), word("hi"), Token::RedirectAppend, word("log")]
        );
    }

    #[test]
    fn operators_glued_to_words_stay_words() {
        assert_eq!(tokenize("a>b c|d"), vec![word("a>b"), word("c|d")]);
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(tokenize("  echo \t hi  "), vec![word("echo"), word("hi")]);
    }

    #[test]
    fn strips_background_marker() {
        assert_eq!(strip_background("sleep 5 &"), ("sleep 5", true));
        assert_eq!(strip_background("sleep 5&"), ("sleep 5", true));
        assert_eq!(strip_background("sleep 5"), ("sleep 5", false));
    }

    #[test]
    fn empty_line_has_no_tokens() {
        assert!(tokenize("   ").is_empty());
    }
}
