//! Token-level motion program
//!
//! A program is three sections of blocks (one block per output line). Blocks
//! are kept as words so the post-processing transforms can rewrite single
//! coordinates without touching anything else on the line.

use std::fmt;

use crate::model::MotionCommand;

/// Decimal places for X/Y/Z/I/J values
pub const COORD_DECIMALS: usize = 3;
/// Decimal places for feed rates
pub const FEED_DECIMALS: usize = 1;

/// One address word, e.g. `X12.500`
///
/// The literal text is kept as written so untouched words serialize exactly
/// as they were produced (the footer's `X0 Y0` stays `X0 Y0`).
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    letter: char,
    value: f64,
    literal: String,
}

impl Word {
    fn with_literal(letter: char, value: f64, literal: String) -> Self {
        Self {
            letter: letter.to_ascii_uppercase(),
            value,
            literal,
        }
    }

    /// Word with a fixed number of decimals
    ///
    /// The stored value is the one the literal reads back as, so later
    /// rewrites start from what was actually written.
    pub fn new(letter: char, value: f64, decimals: usize) -> Self {
        let literal = fixed(value, decimals);
        let value = literal.parse().unwrap_or(value);
        Self::with_literal(letter, value, literal)
    }

    /// Coordinate word (X, Y, Z, I, J) at the program's coordinate precision
    pub fn coord(letter: char, value: f64) -> Self {
        Self::new(letter, value, COORD_DECIMALS)
    }

    pub fn feed(value: f64) -> Self {
        Self::new('F', value, FEED_DECIMALS)
    }

    /// Preparatory code, always two digits (`G00`, `G21`)
    pub fn g(code: u8) -> Self {
        Self::with_literal('G', code as f64, format!("{:02}", code))
    }

    /// Machine code as written (`M3`, `M5`)
    pub fn m(code: u8) -> Self {
        Self::with_literal('M', code as f64, code.to_string())
    }

    /// Parse a single word such as `X-1.25`; `None` if it is not letter + number
    pub fn parse(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        let letter = chars.next().filter(|c| c.is_ascii_alphabetic())?;
        let literal = chars.as_str();
        let value = literal.parse::<f64>().ok()?;
        Some(Self::with_literal(letter, value, literal.to_string()))
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Replace the value, re-rendering it at coordinate precision
    pub fn set_coord(&mut self, value: f64) {
        self.literal = fixed(value, COORD_DECIMALS);
        self.value = self.literal.parse().unwrap_or(value);
    }
}

/// Fixed-point text with no `-` on values that round to zero
fn fixed(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    match text.strip_prefix('-') {
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_string(),
        _ => text,
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.literal)
    }
}

/// One program line
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Words(Vec<Word>),
    Comment(String),
}

impl Block {
    pub fn words(words: impl IntoIterator<Item = Word>) -> Self {
        Block::Words(words.into_iter().collect())
    }

    /// Parse one line of program text; comment-only lines become `Block::Comment`
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(text) = trimmed.strip_prefix(';') {
            return Some(Block::Comment(text.trim().to_string()));
        }
        let words = crate::lexer::words(trimmed);
        if words.is_empty() {
            None
        } else {
            Some(Block::Words(words))
        }
    }

    pub fn get(&self, letter: char) -> Option<&Word> {
        match self {
            Block::Words(words) => words.iter().find(|w| w.letter == letter),
            Block::Comment(_) => None,
        }
    }

    pub fn has(&self, letter: char) -> bool {
        self.get(letter).is_some()
    }

    /// Mutable access to every word with the given letter
    pub fn words_mut(&mut self, letter: char) -> impl Iterator<Item = &mut Word> {
        let words: &mut [Word] = match self {
            Block::Words(words) => words.as_mut_slice(),
            Block::Comment(_) => Default::default(),
        };
        words.iter_mut().filter(move |w| w.letter == letter)
    }

    /// True for lines that position in the XY plane (carry both X and Y)
    pub fn is_xy_move(&self) -> bool {
        self.has('X') && self.has('Y')
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Block::Words(words) => {
                for (n, word) in words.iter().enumerate() {
                    if n > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", word)?;
                }
                Ok(())
            }
            Block::Comment(text) => write!(f, "; {}", text),
        }
    }
}

impl From<&MotionCommand> for Block {
    fn from(cmd: &MotionCommand) -> Self {
        match *cmd {
            MotionCommand::RapidXY { x, y } => {
                Block::words([Word::g(0), Word::coord('X', x), Word::coord('Y', y)])
            }
            MotionCommand::RapidZ { z } => Block::words([Word::g(0), Word::coord('Z', z)]),
            MotionCommand::LinearXY { x, y, feed } => Block::words([
                Word::g(1),
                Word::coord('X', x),
                Word::coord('Y', y),
                Word::feed(feed),
            ]),
            MotionCommand::LinearZ { z, feed } => {
                Block::words([Word::g(1), Word::coord('Z', z), Word::feed(feed)])
            }
            MotionCommand::ArcXY {
                x,
                y,
                i,
                j,
                feed,
                clockwise,
            } => Block::words([
                Word::g(if clockwise { 2 } else { 3 }),
                Word::coord('X', x),
                Word::coord('Y', y),
                Word::coord('I', i),
                Word::coord('J', j),
                Word::feed(feed),
            ]),
            MotionCommand::Comment { ref text } => Block::Comment(text.clone()),
        }
    }
}

/// Complete program: fixed header, one body block group per entity, fixed footer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MotionProgram {
    pub header: Vec<Block>,
    pub body: Vec<Block>,
    pub footer: Vec<Block>,
}

impl MotionProgram {
    pub fn push_body(&mut self, cmd: &MotionCommand) {
        self.body.push(Block::from(cmd));
    }

    /// Every block in output order
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.header.iter().chain(&self.body).chain(&self.footer)
    }

    pub fn blocks_mut(&mut self) -> impl Iterator<Item = &mut Block> {
        self.header
            .iter_mut()
            .chain(self.body.iter_mut())
            .chain(self.footer.iter_mut())
    }

    pub fn len(&self) -> usize {
        self.header.len() + self.body.len() + self.footer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One block per line, newline terminated
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MotionProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in self.blocks() {
            writeln!(f, "{}", block)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_formatting() {
        let cases = [
            (MotionCommand::RapidXY { x: 0.0, y: 0.0 }, "G00 X0.000 Y0.000"),
            (MotionCommand::LinearZ { z: -0.3, feed: 100.0 }, "G01 Z-0.300 F100.0"),
            (
                MotionCommand::LinearXY { x: 50.0, y: 50.0, feed: 300.0 },
                "G01 X50.000 Y50.000 F300.0",
            ),
            (MotionCommand::RapidZ { z: 5.0 }, "G00 Z5.000"),
            (
                MotionCommand::ArcXY {
                    x: 100.0,
                    y: 25.0,
                    i: 25.0,
                    j: 0.0,
                    feed: 300.0,
                    clockwise: true,
                },
                "G02 X100.000 Y25.000 I25.000 J0.000 F300.0",
            ),
            (MotionCommand::comment("hello"), "; hello"),
        ];

        for (cmd, expected) in cases {
            assert_eq!(Block::from(&cmd).to_string(), expected);
        }
    }

    #[test]
    fn test_parse_block() {
        let block = Block::parse("  G01 X1.5 Y-2 F300.0 ").expect("block");

        assert!(block.is_xy_move());
        assert_eq!(block.get('Y').map(Word::value), Some(-2.0));
        assert_eq!(block.to_string(), "G01 X1.5 Y-2 F300.0");

        assert_eq!(Block::parse("   "), None);
        assert_eq!(
            Block::parse("; WARNING: something"),
            Some(Block::Comment("WARNING: something".to_string()))
        );
    }

    #[test]
    fn test_set_coord_rerenders() {
        let mut block = Block::parse("G00 X0 Y0").expect("block");
        for w in block.words_mut('X') {
            w.set_coord(w.value() + 10.0);
        }

        assert_eq!(block.to_string(), "G00 X10.000 Y0");
    }

    #[test]
    fn test_value_matches_written_literal() {
        let mut w = Word::coord('X', 1.2345);
        assert_eq!(w.to_string(), "X1.234");
        assert_eq!(w.value(), 1.234);

        w.set_coord(w.value() + 10.0);
        assert_eq!(w.to_string(), "X11.234");
        assert_eq!(w.value(), 11.234);
    }

    #[test]
    fn test_no_negative_zero() {
        assert_eq!(Word::coord('J', -3.0e-15).to_string(), "J0.000");
        assert_eq!(Word::coord('Z', -0.0004).to_string(), "Z0.000");
        assert_eq!(Word::coord('Z', -0.3).to_string(), "Z-0.300");
    }

    #[test]
    fn test_program_text_newline_terminated() {
        let program = MotionProgram {
            header: vec![Block::words([Word::g(21)])],
            body: vec![Block::from(&MotionCommand::RapidZ { z: 5.0 })],
            footer: vec![Block::words([Word::m(2)])],
        };

        assert_eq!(program.to_text(), "G21\nG00 Z5.000\nM2\n");
        assert_eq!(program.len(), 3);
    }
}
