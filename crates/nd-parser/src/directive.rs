//! One parser per directive keyword.
//!
//! Each parser starts right after its keyword, pulls tokens from the shared
//! cursor until its own boundary and reports problems into the session. They
//! return the entity to commit, or `None` when the declaration is rejected.

use nd_core::{
    DiagnosticCode, EDGE_KEYWORD, END_GROUP_KEYWORD, Edge, GROUP_KEYWORD, Group, NODE_KEYWORD,
    Node, NodeId,
};
use tracing::trace;

use crate::cursor::TokenCursor;
use crate::lexer::{Token, TokenKind};
use crate::net_builder::NetBuilder;

/// Leading keyword of a directive line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Node,
    Edge,
    Group,
}

impl Directive {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Node => NODE_KEYWORD,
            Self::Edge => EDGE_KEYWORD,
            Self::Group => GROUP_KEYWORD,
        }
    }

    /// Classify a line-leading word, ignoring ASCII case.
    #[must_use]
    pub fn classify(word: &str) -> Option<Self> {
        [Self::Node, Self::Edge, Self::Group]
            .into_iter()
            .find(|directive| word.eq_ignore_ascii_case(directive.keyword()))
    }
}

/// Id and label shared by node declarations and group headers.
struct Header {
    id: String,
    label: String,
}

/// Read `<id> [label] [extra...]` up to the line boundary. Shared by node
/// declarations and group headers.
///
/// Both namespace checks run independently so a single id may collect two
/// errors.
fn parse_header(
    directive: Directive,
    keyword: &Token,
    cursor: &mut TokenCursor<'_>,
    builder: &mut NetBuilder,
) -> Option<Header> {
    let mut id = None;
    let mut label = String::new();
    let mut valid = true;

    while let Some(token) = cursor.advance() {
        if token.is_boundary() {
            break;
        }
        let text = cursor.text(&token);
        if id.is_none() {
            let (duplicate, conflict) = if directive == Directive::Group {
                (builder.has_group(text), builder.has_node(text))
            } else {
                (builder.has_node(text), builder.has_group(text))
            };
            if duplicate {
                valid = false;
                builder.issue_duplicated(&token, directive.keyword(), text);
            }
            if conflict {
                valid = false;
                builder.issue_id_conflict(&token, text);
            }
            id = Some(text.to_string());
        } else if label.is_empty() {
            label = text.to_string();
        } else {
            builder.issue_discarded(&token, text);
        }
    }

    let Some(id) = id else {
        builder.issue_insufficient(cursor.line(keyword.line), directive.keyword());
        return None;
    };
    valid.then_some(Header { id, label })
}

/// `node <id> [label]`
pub(crate) fn parse_node(
    keyword: &Token,
    cursor: &mut TokenCursor<'_>,
    builder: &mut NetBuilder,
) -> Option<Node> {
    let header = parse_header(Directive::Node, keyword, cursor, builder)?;
    Some(Node::new(header.id, header.label))
}

/// `edge <id> <source> <target> [label]`
pub(crate) fn parse_edge(
    keyword: &Token,
    cursor: &mut TokenCursor<'_>,
    builder: &mut NetBuilder,
) -> Option<Edge> {
    let mut count = 0_usize;
    let mut valid = true;
    let mut id = String::new();
    let mut source = None;
    let mut target = None;
    let mut label = String::new();

    while let Some(token) = cursor.advance() {
        if token.is_boundary() {
            break;
        }
        count += 1;
        let text = cursor.text(&token);
        match count {
            1 => {
                if builder.has_edge(text) {
                    valid = false;
                    builder.issue_duplicated(&token, EDGE_KEYWORD, text);
                }
                id = text.to_string();
            }
            2 | 3 => {
                let resolved = builder.resolve_node(text);
                if resolved.is_none() {
                    valid = false;
                    let role = if count == 2 { "source" } else { "target" };
                    builder.issue_not_found(&token, role, text);
                }
                if count == 2 {
                    source = resolved;
                } else {
                    target = resolved;
                }
            }
            4 => label = text.to_string(),
            _ => builder.issue_discarded(&token, text),
        }
    }

    if count < 3 {
        builder.issue_insufficient(cursor.line(keyword.line), EDGE_KEYWORD);
        return None;
    }
    match (valid, source, target) {
        (true, Some(source), Some(target)) => Some(Edge {
            id,
            source,
            target,
            label,
        }),
        _ => None,
    }
}

/// `group <id> [label]` followed by member ids up to `endgroup`.
///
/// Members are linked to the group as they are read. If the input ends before
/// `endgroup` every link made here is undone.
pub(crate) fn parse_group(
    keyword: &Token,
    cursor: &mut TokenCursor<'_>,
    builder: &mut NetBuilder,
) -> Option<Group> {
    let header = parse_header(Directive::Group, keyword, cursor, builder)?;
    let group_id = builder.pending_group_id();
    let mut members: Vec<NodeId> = Vec::new();
    let mut closed = false;

    while let Some(token) = cursor.advance() {
        match token.kind {
            TokenKind::EndOfFile => break,
            TokenKind::EndOfLine => continue,
            TokenKind::Word => {}
        }
        if cursor.is_keyword(&token, END_GROUP_KEYWORD) {
            closed = true;
            discard_rest_of_line(cursor, builder);
            break;
        }

        let text = cursor.text(&token);
        let Some(node) = builder.resolve_node(text) else {
            builder.issue_not_found(&token, "group node", text);
            continue;
        };
        match builder.node_group(node) {
            None => {
                builder.assign_group(node, group_id);
                members.push(node);
            }
            Some(owner) if owner == group_id => {
                builder.issue_at_token(
                    DiagnosticCode::DuplicateGroupAssignment,
                    &token,
                    format!("node {text} already assigned to {}", header.id),
                );
            }
            Some(owner) => {
                let message = format!(
                    "node {text} already belongs to another group {}",
                    builder.group_name(owner, &header.id)
                );
                builder.issue_at_token(DiagnosticCode::AnotherGroup, &token, message);
            }
        }
    }

    if members.is_empty() {
        builder.issue_at_line(
            DiagnosticCode::GroupDiscarded,
            cursor.line(keyword.line),
            format!("group {} contains no nodes and is discarded", header.id),
        );
    }

    if !closed {
        trace!(id = %header.id, members = members.len(), "roll back unclosed group");
        for &node in &members {
            builder.clear_group(node);
        }
        return None;
    }
    if members.is_empty() {
        return None;
    }
    Some(Group {
        id: header.id,
        label: header.label,
        members,
    })
}

fn discard_rest_of_line(cursor: &mut TokenCursor<'_>, builder: &mut NetBuilder) {
    while let Some(token) = cursor.advance() {
        if token.is_boundary() {
            break;
        }
        builder.issue_discarded(&token, cursor.text(&token));
    }
}

#[cfg(test)]
mod tests {
    use nd_core::DiagnosticCode;

    use super::Directive;
    use crate::parse;

    #[test]
    fn headers_check_their_own_namespace_first() {
        let parsed = parse("node a\nnode b\ngroup g\na\nendgroup\nnode g\ngroup b\ngroup g\n");
        let found: Vec<(DiagnosticCode, &str)> = parsed
            .diagnostics
            .iter()
            .map(|diag| (diag.code, diag.message.as_str()))
            .collect();
        assert_eq!(
            found,
            [
                (DiagnosticCode::IdConflict, "group id conflicts with node id: g"),
                (DiagnosticCode::IdConflict, "group id conflicts with node id: b"),
                (DiagnosticCode::DuplicatedId, "duplicated group g"),
            ]
        );
        assert_eq!(parsed.net.nodes.len(), 2);
        assert_eq!(parsed.net.groups.len(), 1);
    }

    #[test]
    fn classify_ignores_ascii_case() {
        assert_eq!(Directive::classify("node"), Some(Directive::Node));
        assert_eq!(Directive::classify("EDGE"), Some(Directive::Edge));
        assert_eq!(Directive::classify("GrOuP"), Some(Directive::Group));
        assert_eq!(Directive::classify("endgroup"), None);
        assert_eq!(Directive::classify("nodes"), None);
    }
}
