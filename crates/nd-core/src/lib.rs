#![forbid(unsafe_code)]

//! Core model shared by every NetDSL crate: the parsed [`Net`], the
//! [`Diagnostic`] report produced alongside it, and [`ParseConfig`].

mod config;
mod diagnostic;
mod net;

pub use config::{ConfigError, DEFAULT_COMMENT_PREFIX, ParseConfig};
pub use diagnostic::{
    Diagnostic, DiagnosticCode, DiagnosticCounts, Severity, StructuredDiagnostic,
};
pub use net::{Edge, EdgeDisplay, EdgeId, Group, GroupId, Net, Node, NodeDisplay, NodeId};

use serde::{Deserialize, Serialize};

/// Directive keyword introducing a node declaration.
pub const NODE_KEYWORD: &str = "node";
/// Directive keyword introducing an edge declaration.
pub const EDGE_KEYWORD: &str = "edge";
/// Directive keyword opening a group block.
pub const GROUP_KEYWORD: &str = "group";
/// Keyword closing a group block.
pub const END_GROUP_KEYWORD: &str = "endgroup";

/// Characters that terminate a word.
///
/// Space, the C0 controls `\t` through `\r`, NEL and NO-BREAK SPACE.
#[must_use]
pub const fn is_netdsl_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t'..='\r' | '\u{85}' | '\u{a0}')
}

/// Zero-based location in the source text.
///
/// `col` counts characters (Unicode scalar values) from the start of the line.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// First column of the given line.
    #[must_use]
    pub const fn line_start(line: usize) -> Self {
        Self { line, col: 0 }
    }

    /// One-based `(line, column)` pair for display.
    #[must_use]
    pub const fn display_coords(self) -> (usize, usize) {
        (self.line + 1, self.col + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::Position;

    #[test]
    fn display_coords_are_one_based() {
        assert_eq!(Position::new(0, 0).display_coords(), (1, 1));
        assert_eq!(Position::new(3, 7).display_coords(), (4, 8));
    }

    #[test]
    fn positions_order_by_line_then_column() {
        assert!(Position::new(0, 9) < Position::new(1, 0));
        assert!(Position::new(2, 1) < Position::new(2, 4));
        assert_eq!(Position::line_start(5), Position::new(5, 0));
    }
}
