use nd_core::{
    Diagnostic, DiagnosticCode, Edge, EdgeId, Group, GroupId, Net, Node, NodeId, Position,
};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::ParseResult;
use crate::lexer::{Line, Token};

/// Per-call parse session: the entity registry plus the diagnostics sink.
///
/// Created by [`crate::parse_with_config`] and consumed by [`NetBuilder::finish`];
/// directive parsers only ever borrow it.
pub(crate) struct NetBuilder {
    net: Net,
    node_index_by_id: FxHashMap<String, NodeId>,
    edge_index_by_id: FxHashMap<String, EdgeId>,
    group_index_by_id: FxHashMap<String, GroupId>,
    endpoint_pairs: FxHashSet<(NodeId, NodeId)>,
    diagnostics: Vec<Diagnostic>,
}

impl NetBuilder {
    pub(crate) fn new() -> Self {
        Self {
            net: Net::empty(),
            node_index_by_id: FxHashMap::default(),
            edge_index_by_id: FxHashMap::default(),
            group_index_by_id: FxHashMap::default(),
            endpoint_pairs: FxHashSet::default(),
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn has_node(&self, id: &str) -> bool {
        self.node_index_by_id.contains_key(id)
    }

    pub(crate) fn has_edge(&self, id: &str) -> bool {
        self.edge_index_by_id.contains_key(id)
    }

    pub(crate) fn has_group(&self, id: &str) -> bool {
        self.group_index_by_id.contains_key(id)
    }

    pub(crate) fn resolve_node(&self, id: &str) -> Option<NodeId> {
        self.node_index_by_id.get(id).copied()
    }

    pub(crate) fn node_group(&self, node: NodeId) -> Option<GroupId> {
        self.net.node_at(node).and_then(|node| node.group)
    }

    /// Id of a committed group, or `pending_label` for the group in progress.
    pub(crate) fn group_name<'a>(&'a self, group: GroupId, pending_label: &'a str) -> &'a str {
        self.net
            .group_at(group)
            .map_or(pending_label, |group| group.id.as_str())
    }

    /// The id the next committed group will receive.
    pub(crate) fn pending_group_id(&self) -> GroupId {
        GroupId(self.net.groups.len())
    }

    pub(crate) fn assign_group(&mut self, node: NodeId, group: GroupId) {
        if let Some(node) = self.net.nodes.get_mut(node.0) {
            node.group = Some(group);
        }
    }

    pub(crate) fn clear_group(&mut self, node: NodeId) {
        if let Some(node) = self.net.nodes.get_mut(node.0) {
            node.group = None;
        }
    }

    pub(crate) fn commit_node(&mut self, node: Node) -> NodeId {
        let node_id = NodeId(self.net.nodes.len());
        trace!(id = %node.id, "commit node");
        self.node_index_by_id.insert(node.id.clone(), node_id);
        self.net.nodes.push(node);
        node_id
    }

    pub(crate) fn commit_edge(&mut self, edge: Edge) -> EdgeId {
        let edge_id = EdgeId(self.net.edges.len());
        trace!(id = %edge.id, source = edge.source.0, target = edge.target.0, "commit edge");
        self.edge_index_by_id.insert(edge.id.clone(), edge_id);
        self.net.edges.push(edge);
        edge_id
    }

    pub(crate) fn commit_group(&mut self, group: Group) -> GroupId {
        let group_id = self.pending_group_id();
        trace!(id = %group.id, members = group.members.len(), "commit group");
        self.group_index_by_id.insert(group.id.clone(), group_id);
        self.net.groups.push(group);
        group_id
    }

    /// Remember an edge's endpoints. Returns `false` when the pair was
    /// already taken by an earlier edge.
    pub(crate) fn record_endpoint_pair(&mut self, source: NodeId, target: NodeId) -> bool {
        self.endpoint_pairs.insert((source, target))
    }

    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        trace!(code = diagnostic.code.as_str(), message = %diagnostic.message, "diagnostic");
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn issue_at_token(&mut self, code: DiagnosticCode, token: &Token, message: String) {
        self.push(Diagnostic::new(code, token.position(), token.len(), message));
    }

    pub(crate) fn issue_at_line(&mut self, code: DiagnosticCode, line: Line, message: String) {
        self.push(Diagnostic::new(code, line.position(), line.len, message));
    }

    pub(crate) fn issue_duplicated(&mut self, token: &Token, kind: &str, id: &str) {
        self.issue_at_token(DiagnosticCode::DuplicatedId, token, format!("duplicated {kind} {id}"));
    }

    pub(crate) fn issue_id_conflict(&mut self, token: &Token, id: &str) {
        self.issue_at_token(
            DiagnosticCode::IdConflict,
            token,
            format!("group id conflicts with node id: {id}"),
        );
    }

    pub(crate) fn issue_not_found(&mut self, token: &Token, role: &str, id: &str) {
        self.issue_at_token(DiagnosticCode::NodeNotFound, token, format!("{role} {id} not found"));
    }

    pub(crate) fn issue_discarded(&mut self, token: &Token, text: &str) {
        self.issue_at_token(DiagnosticCode::TokenDiscarded, token, format!("discard token {text}"));
    }

    pub(crate) fn issue_insufficient(&mut self, line: Line, kind: &str) {
        self.issue_at_line(
            DiagnosticCode::InsufficientParameter,
            line,
            format!("insufficient {kind} parameter"),
        );
    }

    pub(crate) fn diagnostic_count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Seal the session. A session that recorded nothing reports a single
    /// success entry at `eof`.
    pub(crate) fn finish(self, eof: Position) -> ParseResult {
        let mut diagnostics = self.diagnostics;
        if diagnostics.is_empty() {
            diagnostics.push(Diagnostic::success(eof));
        }
        ParseResult {
            net: self.net,
            diagnostics,
        }
    }
}
