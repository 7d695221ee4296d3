//! Pull-based tokenizer.
//!
//! The lexer splits the source into whitespace-separated words and emits an
//! end-of-line sentinel for every line break (`\n`, `\r` or `\r\n`) plus one
//! final end-of-file sentinel. It is lazy: each call to [`Iterator::next`]
//! scans exactly far enough to produce the next token.

use std::iter::Peekable;
use std::str::CharIndices;

use nd_core::{Position, is_netdsl_whitespace};
use serde::Serialize;

const fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r')
}

/// A physical source line. Offsets are in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct Line {
    pub index: usize,
    pub start: usize,
    /// Characters before the line break. Only final once the line is closed.
    pub len: usize,
}

impl Line {
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::line_start(self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    Word,
    EndOfLine,
    EndOfFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Index of the owning line.
    pub line: usize,
    /// Character offset where the owning line starts.
    pub line_start: usize,
    /// Character offsets, end exclusive.
    pub start: usize,
    pub end: usize,
    /// Byte offsets into the source, end exclusive.
    pub byte_start: usize,
    pub byte_end: usize,
}

impl Token {
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.line, self.start - self.line_start)
    }

    /// Length in characters.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end == self.start
    }

    #[must_use]
    pub const fn is_word(&self) -> bool {
        matches!(self.kind, TokenKind::Word)
    }

    /// End-of-line or end-of-file.
    #[must_use]
    pub const fn is_boundary(&self) -> bool {
        !self.is_word()
    }

    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::EndOfFile)
    }

    /// The token's slice of `source`. Sentinels return the line break itself
    /// (or nothing at end of file).
    #[must_use]
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        source.get(self.byte_start..self.byte_end).unwrap_or_default()
    }
}

/// Lazy token stream over one source string. Not restartable.
pub struct Lexer<'src> {
    source: &'src str,
    chars: Peekable<CharIndices<'src>>,
    /// Character offset of the next unread character.
    offset: usize,
    /// Character and byte offset where the pending word began.
    word_start: Option<(usize, usize)>,
    line: Line,
    closed_lines: Vec<Line>,
    queued: Option<Token>,
    finished: bool,
}

impl<'src> Lexer<'src> {
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            offset: 0,
            word_start: None,
            line: Line::default(),
            closed_lines: Vec::new(),
            queued: None,
            finished: false,
        }
    }

    #[must_use]
    pub const fn source(&self) -> &'src str {
        self.source
    }

    /// The line with `index`. Lines still being scanned report the length
    /// seen so far.
    #[must_use]
    pub fn line(&self, index: usize) -> Line {
        self.closed_lines.get(index).copied().unwrap_or(self.line)
    }

    fn take_word(&mut self, end: usize, byte_end: usize) -> Option<Token> {
        let (start, byte_start) = self.word_start.take()?;
        Some(Token {
            kind: TokenKind::Word,
            line: self.line.index,
            line_start: self.line.start,
            start,
            end,
            byte_start,
            byte_end,
        })
    }

    /// Close the current line at `start` and open the next one at `end`.
    fn break_line(&mut self, start: usize, byte_start: usize, end: usize, byte_end: usize) -> Token {
        self.line.len = start - self.line.start;
        let closed = self.line;
        self.closed_lines.push(closed);
        self.line = Line {
            index: closed.index + 1,
            start: end,
            len: 0,
        };
        Token {
            kind: TokenKind::EndOfLine,
            line: closed.index,
            line_start: closed.start,
            start,
            end,
            byte_start,
            byte_end,
        }
    }

    fn skip_inline_whitespace(&mut self) {
        while let Some(&(_, ch)) = self.chars.peek() {
            if is_line_break(ch) || !is_netdsl_whitespace(ch) {
                break;
            }
            self.chars.next();
            self.offset += 1;
        }
    }

    fn end_of_input(&mut self) -> Token {
        self.finished = true;
        let end = self.offset;
        let byte_end = self.source.len();
        self.line.len = end - self.line.start;
        let eof = Token {
            kind: TokenKind::EndOfFile,
            line: self.line.index,
            line_start: self.line.start,
            start: end,
            end,
            byte_start: byte_end,
            byte_end,
        };
        match self.take_word(end, byte_end) {
            Some(word) => {
                self.queued = Some(eof);
                word
            }
            None => eof,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.queued.take() {
            return Some(token);
        }
        if self.finished {
            return None;
        }

        loop {
            let Some((byte, ch)) = self.chars.next() else {
                return Some(self.end_of_input());
            };
            let offset = self.offset;
            self.offset += 1;

            if !is_netdsl_whitespace(ch) {
                if self.word_start.is_none() {
                    self.word_start = Some((offset, byte));
                }
                continue;
            }

            let word = self.take_word(offset, byte);
            let boundary = match ch {
                '\n' => Some(self.break_line(offset, byte, offset + 1, byte + 1)),
                '\r' => {
                    let (mut end, mut byte_end) = (offset + 1, byte + 1);
                    if matches!(self.chars.peek(), Some(&(_, '\n'))) {
                        self.chars.next();
                        self.offset += 1;
                        end += 1;
                        byte_end += 1;
                    }
                    Some(self.break_line(offset, byte, end, byte_end))
                }
                _ => None,
            };
            self.skip_inline_whitespace();

            match (word, boundary) {
                (Some(word), Some(boundary)) => {
                    self.queued = Some(boundary);
                    return Some(word);
                }
                (Some(token), None) | (None, Some(token)) => return Some(token),
                (None, None) => {}
            }
        }
    }
}

/// Tokenize `source` lazily.
#[must_use]
pub fn tokenize(source: &str) -> Lexer<'_> {
    Lexer::new(source)
}
