#![forbid(unsafe_code)]

//! NetDSL front end: tokenizer, directive parsers and the diagnostics engine.
//!
//! ```text
//! // topology
//! node n1 Router
//! node n2 Switch
//! edge e1 n1 n2 uplink
//! group core Core
//!   n1 n2
//! endgroup
//! ```
//!
//! Parsing never fails. Every problem becomes a [`Diagnostic`] and the
//! returned [`Net`] holds whatever was declared correctly.

mod cursor;
mod directive;
mod lexer;
mod net_builder;

use nd_core::{
    DEFAULT_COMMENT_PREFIX, Diagnostic, DiagnosticCode, DiagnosticCounts, Net, ParseConfig,
    StructuredDiagnostic,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

pub use cursor::TokenCursor;
pub use directive::Directive;
pub use lexer::{Lexer, Line, Token, TokenKind, tokenize};
pub use nd_core::is_netdsl_whitespace;

use net_builder::NetBuilder;

/// Outcome of one parse: the model plus everything reported while building it.
///
/// `diagnostics` is never empty. It holds either a single success entry or
/// only warnings and errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub net: Net,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.diagnostics.iter().all(Diagnostic::is_success)
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_warning)
    }

    #[must_use]
    pub fn diagnostic_counts(&self) -> DiagnosticCounts {
        DiagnosticCounts::tally(&self.diagnostics)
    }

    /// Display lines, one per diagnostic.
    #[must_use]
    pub fn rendered_diagnostics(&self) -> Vec<String> {
        self.diagnostics.iter().map(ToString::to_string).collect()
    }

    #[must_use]
    pub fn structured_diagnostics(&self) -> Vec<StructuredDiagnostic> {
        self.diagnostics
            .iter()
            .map(StructuredDiagnostic::from_diagnostic)
            .collect()
    }
}

/// Parse with the default configuration.
#[must_use]
pub fn parse(input: &str) -> ParseResult {
    parse_with_config(input, &ParseConfig::default())
}

#[must_use]
pub fn parse_with_config(input: &str, config: &ParseConfig) -> ParseResult {
    let comment_prefix = match config.validate() {
        Ok(()) => config.comment_prefix.as_str(),
        Err(err) => {
            warn!(%err, "invalid parse config; using default comment prefix");
            DEFAULT_COMMENT_PREFIX
        }
    };

    let mut cursor = TokenCursor::new(input);
    let mut builder = NetBuilder::new();

    while let Some(token) = cursor.advance() {
        if token.is_boundary() {
            continue;
        }
        let text = cursor.text(&token);

        if let Some(directive) = Directive::classify(text) {
            run_directive(directive, &token, &mut cursor, &mut builder);
            continue;
        }

        if cursor.starts_with(&token, comment_prefix) {
            cursor.skip_line();
            continue;
        }

        cursor.skip_line();
        builder.issue_at_line(
            DiagnosticCode::InvalidLineStart,
            cursor.line(token.line),
            format!("unexpected {text}, expect node/edge/group..endgroup, discard whole line"),
        );
    }

    let diagnostic_count = builder.diagnostic_count();
    let result = builder.finish(cursor.last_eof_position());
    debug!(
        nodes = result.net.nodes.len(),
        edges = result.net.edges.len(),
        groups = result.net.groups.len(),
        diagnostics = diagnostic_count,
        "parsed netdsl input"
    );
    result
}

fn run_directive(
    kind: Directive,
    keyword: &Token,
    cursor: &mut TokenCursor<'_>,
    builder: &mut NetBuilder,
) {
    match kind {
        Directive::Node => {
            if let Some(node) = directive::parse_node(keyword, cursor, builder) {
                builder.commit_node(node);
            }
        }
        Directive::Edge => {
            if let Some(edge) = directive::parse_edge(keyword, cursor, builder) {
                if !builder.record_endpoint_pair(edge.source, edge.target) {
                    builder.issue_at_line(
                        DiagnosticCode::DuplicateSourceTarget,
                        cursor.line(keyword.line),
                        format!("edge with same source and target already exist {}", edge.id),
                    );
                }
                builder.commit_edge(edge);
            }
        }
        Directive::Group => {
            if let Some(group) = directive::parse_group(keyword, cursor, builder) {
                builder.commit_group(group);
            }
        }
    }
}

/// Compact JSON summary of a parse: entity counts plus rendered diagnostics.
#[must_use]
pub fn net_summary_json(parsed: &ParseResult) -> String {
    let counts = parsed.diagnostic_counts();
    json!({
        "node_count": parsed.net.nodes.len(),
        "edge_count": parsed.net.edges.len(),
        "group_count": parsed.net.groups.len(),
        "error_count": counts.errors,
        "warning_count": counts.warnings,
        "success": parsed.is_success(),
        "diagnostics": parsed.rendered_diagnostics(),
    })
    .to_string()
}
