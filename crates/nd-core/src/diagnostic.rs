use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Position;

/// Severity of a diagnostic.
///
/// `Success` only ever appears alone, on a parse that recorded nothing else.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable discriminator for every message kind the parser can emit.
///
/// The numeric values are part of the display format and must not change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    Success,
    /// A line started with something other than a directive or comment.
    InvalidLineStart,
    /// A node id collides with a group id or vice versa.
    IdConflict,
    /// An edge endpoint or group member names an undeclared node.
    NodeNotFound,
    /// A directive had fewer parameters than it requires.
    InsufficientParameter,
    /// An id was already used within the same collection.
    DuplicatedId,
    /// A node is already owned by a different group.
    AnotherGroup,
    /// A token beyond the directive's arity was ignored.
    TokenDiscarded,
    /// A group ended without members and was dropped.
    GroupDiscarded,
    /// Another edge already connects the same source and target.
    DuplicateSourceTarget,
    /// A node was listed twice in the same group.
    DuplicateGroupAssignment,
}

impl DiagnosticCode {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::InvalidLineStart => 1,
            Self::IdConflict => 2,
            Self::NodeNotFound => 3,
            Self::InsufficientParameter => 4,
            Self::DuplicatedId => 5,
            Self::AnotherGroup => 6,
            Self::TokenDiscarded => 7,
            Self::GroupDiscarded => 8,
            Self::DuplicateSourceTarget => 9,
            Self::DuplicateGroupAssignment => 10,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "netdsl/success",
            Self::InvalidLineStart => "netdsl/error/invalid-line-start",
            Self::IdConflict => "netdsl/error/id-conflict",
            Self::NodeNotFound => "netdsl/error/node-not-found",
            Self::InsufficientParameter => "netdsl/error/insufficient-parameter",
            Self::DuplicatedId => "netdsl/error/duplicated-id",
            Self::AnotherGroup => "netdsl/error/another-group",
            Self::TokenDiscarded => "netdsl/warn/token-discarded",
            Self::GroupDiscarded => "netdsl/warn/group-discarded",
            Self::DuplicateSourceTarget => "netdsl/warn/duplicate-source-target",
            Self::DuplicateGroupAssignment => "netdsl/warn/duplicate-group-assignment",
        }
    }

    /// Severity every diagnostic with this code carries.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::Success => Severity::Success,
            Self::InvalidLineStart
            | Self::IdConflict
            | Self::NodeNotFound
            | Self::InsufficientParameter
            | Self::DuplicatedId
            | Self::AnotherGroup => Severity::Error,
            Self::TokenDiscarded
            | Self::GroupDiscarded
            | Self::DuplicateSourceTarget
            | Self::DuplicateGroupAssignment => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// A position-anchored message produced while parsing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub position: Position,
    /// Span length in characters.
    pub length: usize,
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic whose severity follows from `code`.
    #[must_use]
    pub fn new(
        code: DiagnosticCode,
        position: Position,
        length: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: code.severity(),
            code,
            position,
            length,
            message: message.into(),
        }
    }

    /// The lone entry reported by a parse that recorded nothing else.
    #[must_use]
    pub fn success(position: Position) -> Self {
        Self::new(DiagnosticCode::Success, position, 0, "Success")
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(self.severity, Severity::Warning)
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.severity, Severity::Success)
    }
}

/// Renders `<Severity> | <Code> | (line,col) : <message>` with one-based
/// coordinates, or just `Success`.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_success() {
            return f.write_str("Success");
        }
        let (line, col) = self.position.display_coords();
        write!(
            f,
            "{} | {} | ({line},{col}) : {}",
            self.severity, self.code, self.message
        )
    }
}

/// Counts of diagnostics by severity level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticCounts {
    pub successes: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl DiagnosticCounts {
    #[must_use]
    pub fn tally<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) -> Self {
        let mut counts = Self::default();
        for diagnostic in diagnostics {
            match diagnostic.severity {
                Severity::Success => counts.successes += 1,
                Severity::Warning => counts.warnings += 1,
                Severity::Error => counts.errors += 1,
            }
        }
        counts
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.successes + self.warnings + self.errors
    }
}

/// Stable, machine-readable diagnostics payload for automation surfaces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StructuredDiagnostic {
    pub error_code: String,
    pub code: u8,
    pub severity: String,
    pub message: String,
    /// One-based line.
    pub line: usize,
    /// One-based column.
    pub column: usize,
    pub length: usize,
    pub display: String,
}

impl StructuredDiagnostic {
    #[must_use]
    pub fn from_diagnostic(diagnostic: &Diagnostic) -> Self {
        let (line, column) = diagnostic.position.display_coords();
        Self {
            error_code: diagnostic.code.as_str().to_string(),
            code: diagnostic.code.as_u8(),
            severity: diagnostic.severity.as_str().to_string(),
            message: diagnostic.message.clone(),
            line,
            column,
            length: diagnostic.length,
            display: diagnostic.to_string(),
        }
    }
}

impl From<&Diagnostic> for StructuredDiagnostic {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self::from_diagnostic(diagnostic)
    }
}
