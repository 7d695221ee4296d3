use nd_core::Position;

use crate::lexer::{Lexer, Line, Token};

/// Shared pull cursor over the token stream.
///
/// The driver and every directive parser advance the same cursor, so a
/// directive picks up exactly where the dispatching keyword left off.
pub struct TokenCursor<'src> {
    lexer: Lexer<'src>,
    current: Option<Token>,
    last_eof: Position,
}

impl<'src> TokenCursor<'src> {
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            lexer: Lexer::new(source),
            current: None,
            last_eof: Position::default(),
        }
    }

    /// Pull the next token, or `None` once the end-of-file sentinel has been
    /// handed out.
    pub fn advance(&mut self) -> Option<Token> {
        self.current = self.lexer.next();
        if let Some(token) = self.current {
            if token.is_eof() {
                self.last_eof = token.position();
            }
        }
        self.current
    }

    #[must_use]
    pub const fn current(&self) -> Option<Token> {
        self.current
    }

    #[must_use]
    pub fn text(&self, token: &Token) -> &'src str {
        token.text(self.lexer.source())
    }

    /// Case-insensitive comparison of a word token against `keyword`.
    #[must_use]
    pub fn is_keyword(&self, token: &Token, keyword: &str) -> bool {
        token.is_word() && self.text(token).eq_ignore_ascii_case(keyword)
    }

    /// Case-insensitive prefix test, used for comment markers.
    #[must_use]
    pub fn starts_with(&self, token: &Token, prefix: &str) -> bool {
        let text = self.text(token);
        token.is_word()
            && text
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    }

    #[must_use]
    pub fn line(&self, index: usize) -> Line {
        self.lexer.line(index)
    }

    /// Position of the most recent end-of-file sentinel pulled by anyone.
    #[must_use]
    pub const fn last_eof_position(&self) -> Position {
        self.last_eof
    }

    /// Drop the rest of the current line, returning the boundary that ended it.
    pub fn skip_line(&mut self) -> Option<Token> {
        if self.current.is_some_and(|token| token.is_boundary()) {
            return self.current;
        }
        while let Some(token) = self.advance() {
            if token.is_boundary() {
                return Some(token);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use nd_core::Position;

    use super::TokenCursor;

    #[test]
    fn skip_line_stops_at_boundary() {
        let mut cursor = TokenCursor::new("junk a b\nnode n1");
        let first = cursor.advance().expect("first token");
        assert_eq!(cursor.text(&first), "junk");
        let boundary = cursor.skip_line().expect("line break");
        assert!(boundary.is_boundary());
        let next = cursor.advance().expect("next line");
        assert!(cursor.is_keyword(&next, "NODE"));
    }

    #[test]
    fn skip_line_on_boundary_is_a_no_op() {
        let mut cursor = TokenCursor::new("\nx");
        let eol = cursor.advance().expect("line break");
        assert_eq!(cursor.skip_line(), Some(eol));
        let next = cursor.advance().expect("word");
        assert_eq!(cursor.text(&next), "x");
    }

    #[test]
    fn remembers_eof_position_even_when_skipped_over() {
        let mut cursor = TokenCursor::new("// trailing comment");
        assert_eq!(cursor.last_eof_position(), Position::new(0, 0));
        cursor.advance();
        cursor.skip_line();
        assert!(cursor.current().is_some_and(|token| token.is_eof()));
        assert_eq!(cursor.last_eof_position(), Position::new(0, 19));
        assert!(cursor.advance().is_none());
    }

    #[test]
    fn comment_prefix_match_is_case_insensitive() {
        let mut cursor = TokenCursor::new("REM:x rem");
        let first = cursor.advance().expect("word");
        let second = cursor.advance().expect("word");
        assert!(cursor.starts_with(&first, "rem:"));
        assert!(!cursor.starts_with(&second, "rem:"));
    }
}
