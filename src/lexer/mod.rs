use logos::Logos;

use crate::program::Word;

/// Tokens of a single G-code line
/// Words are a letter followed by a number ("G01", "X-0.300", "F300.0")
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\f]+")] // Skip whitespace
#[logos(error = LexerError)]
pub enum Token {
    #[regex(r"[A-Za-z][+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?", word)]
    Word(Word),

    // Comments
    #[regex(r";[^\n]*", |lex| lex.slice()[1..].trim().to_string())]
    #[regex(r"\([^)\n]*\)", |lex| { let s = lex.slice(); s[1..s.len() - 1].trim().to_string() })]
    Comment(String),

    #[token("\n")]
    Newline,
}

fn word(lex: &mut logos::Lexer<Token>) -> Option<Word> {
    Word::parse(lex.slice())
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LexerError;

impl std::fmt::Display for LexerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lexer error")
    }
}

impl std::error::Error for LexerError {}

/// Lex the input string into tokens, dropping anything that is not a word or comment
pub fn lex(input: &str) -> Vec<(Token, logos::Span)> {
    Token::lexer(input)
        .spanned()
        .filter_map(|(result, span)| match result {
            Ok(token) => Some((token, span)),
            Err(_) => {
                tracing::trace!(span = ?span, "skipping unrecognised token");
                None
            }
        })
        .collect()
}

/// Words of one line in order, comments stripped
pub fn words(line: &str) -> Vec<Word> {
    lex(line)
        .into_iter()
        .filter_map(|(token, _)| match token {
            Token::Word(w) => Some(w),
            _ => None,
        })
        .collect()
}
