use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a node inside [`Net::nodes`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// Index of an edge inside [`Net::edges`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub usize);

/// Index of a group inside [`Net::groups`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub usize);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Node {
    pub id: String,
    /// Empty when the declaration carried no label.
    pub label: String,
    /// Owning group, looked up through [`Net::group_of`].
    pub group: Option<GroupId>,
}

impl Node {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            group: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Group {
    pub id: String,
    pub label: String,
    /// Members in the order they were listed.
    pub members: Vec<NodeId>,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Group Id: {}, Label: {}", self.id, self.label)
    }
}

/// The finished graph model.
///
/// Ids are unique within each collection and entries keep declaration order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Net {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub groups: Vec<Group>,
}

impl Net {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty() && self.groups.is_empty()
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    #[must_use]
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    #[must_use]
    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.id == id)
    }

    #[must_use]
    pub fn node_at(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    #[must_use]
    pub fn group_at(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.0)
    }

    /// The group owning `node`, if any.
    #[must_use]
    pub fn group_of(&self, node: &Node) -> Option<&Group> {
        node.group.and_then(|group_id| self.group_at(group_id))
    }

    /// Member nodes of `group` in listing order.
    pub fn members<'a>(&'a self, group: &'a Group) -> impl Iterator<Item = &'a Node> + 'a {
        group
            .members
            .iter()
            .filter_map(move |member| self.node_at(*member))
    }

    /// Source and target nodes of `edge`.
    #[must_use]
    pub fn endpoints(&self, edge: &Edge) -> Option<(&Node, &Node)> {
        Some((self.node_at(edge.source)?, self.node_at(edge.target)?))
    }

    #[must_use]
    pub fn display_node<'a>(&'a self, node: &'a Node) -> NodeDisplay<'a> {
        NodeDisplay { net: self, node }
    }

    #[must_use]
    pub fn display_edge<'a>(&'a self, edge: &'a Edge) -> EdgeDisplay<'a> {
        EdgeDisplay { net: self, edge }
    }

    /// Describe every broken model invariant. Empty for a well-formed net.
    #[must_use]
    pub fn integrity_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        check_unique(self.nodes.iter().map(|node| node.id.as_str()), "node", &mut violations);
        check_unique(self.edges.iter().map(|edge| edge.id.as_str()), "edge", &mut violations);
        check_unique(
            self.groups.iter().map(|group| group.id.as_str()),
            "group",
            &mut violations,
        );

        for group in &self.groups {
            if self.node(&group.id).is_some() {
                violations.push(format!("group {} shares its id with a node", group.id));
            }
        }

        for edge in &self.edges {
            if self.node_at(edge.source).is_none() {
                violations.push(format!("edge {} has a dangling source", edge.id));
            }
            if self.node_at(edge.target).is_none() {
                violations.push(format!("edge {} has a dangling target", edge.id));
            }
        }

        for (index, node) in self.nodes.iter().enumerate() {
            let Some(group_id) = node.group else {
                continue;
            };
            match self.group_at(group_id) {
                None => violations.push(format!("node {} points at a missing group", node.id)),
                Some(group) => {
                    let listed = group
                        .members
                        .iter()
                        .filter(|member| member.0 == index)
                        .count();
                    if listed != 1 {
                        violations.push(format!(
                            "node {} is listed {listed} times in group {}",
                            node.id, group.id
                        ));
                    }
                }
            }
        }

        for (index, group) in self.groups.iter().enumerate() {
            for member in &group.members {
                let owner = self.node_at(*member).and_then(|node| node.group);
                if owner != Some(GroupId(index)) {
                    violations.push(format!(
                        "group {} lists a node it does not own",
                        group.id
                    ));
                }
            }
        }

        violations
    }
}

fn check_unique<'a>(ids: impl Iterator<Item = &'a str>, kind: &str, violations: &mut Vec<String>) {
    let mut seen = std::collections::BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            violations.push(format!("duplicate {kind} id {id}"));
        }
    }
}

/// `Node Id: .., Label: ..` followed by the owning group, when there is one.
pub struct NodeDisplay<'a> {
    net: &'a Net,
    node: &'a Node,
}

impl fmt::Display for NodeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node Id: {}, Label: {}", self.node.id, self.node.label)?;
        if let Some(group) = self.net.group_of(self.node) {
            write!(f, ", {group}")?;
        }
        Ok(())
    }
}

pub struct EdgeDisplay<'a> {
    net: &'a Net,
    edge: &'a Edge,
}

impl fmt::Display for EdgeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id_of = |node: NodeId| self.net.node_at(node).map_or("?", |node| node.id.as_str());
        write!(
            f,
            "Edge Id: {}, Source: {}, Target: {}, Label: {}",
            self.edge.id,
            id_of(self.edge.source),
            id_of(self.edge.target),
            self.edge.label
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Edge, Group, GroupId, Net, Node, NodeId};

    fn grouped_net() -> Net {
        let mut a = Node::new("a", "Alpha");
        a.group = Some(GroupId(0));
        Net {
            nodes: vec![a, Node::new("b", "")],
            edges: vec![Edge {
                id: "e1".to_string(),
                source: NodeId(0),
                target: NodeId(1),
                label: "link".to_string(),
            }],
            groups: vec![Group {
                id: "g".to_string(),
                label: "Gamma".to_string(),
                members: vec![NodeId(0)],
            }],
        }
    }

    #[test]
    fn lookups_resolve_by_id() {
        let net = grouped_net();
        assert_eq!(net.node("b").map(|node| node.label.as_str()), Some(""));
        assert!(net.node("missing").is_none());
        assert_eq!(net.edge("e1").map(|edge| edge.target), Some(NodeId(1)));
        let group = net.group("g").expect("group g");
        let member_ids: Vec<&str> = net.members(group).map(|node| node.id.as_str()).collect();
        assert_eq!(member_ids, ["a"]);
        let a = net.node("a").expect("node a");
        assert_eq!(net.group_of(a).map(|group| group.id.as_str()), Some("g"));
    }

    #[test]
    fn display_adapters_match_report_format() {
        let net = grouped_net();
        assert_eq!(
            net.display_node(&net.nodes[0]).to_string(),
            "Node Id: a, Label: Alpha, Group Id: g, Label: Gamma"
        );
        assert_eq!(net.display_node(&net.nodes[1]).to_string(), "Node Id: b, Label: ");
        assert_eq!(
            net.display_edge(&net.edges[0]).to_string(),
            "Edge Id: e1, Source: a, Target: b, Label: link"
        );
        assert_eq!(net.groups[0].to_string(), "Group Id: g, Label: Gamma");
    }

    #[test]
    fn well_formed_net_has_no_violations() {
        assert!(grouped_net().integrity_violations().is_empty());
        assert!(Net::empty().integrity_violations().is_empty());
        assert!(Net::empty().is_empty());
    }

    #[test]
    fn integrity_check_reports_dangling_back_reference() {
        let mut net = grouped_net();
        net.nodes[1].group = Some(GroupId(3));
        let violations = net.integrity_violations();
        assert_eq!(violations, ["node b points at a missing group"]);
    }

    #[test]
    fn integrity_check_reports_unowned_member_and_duplicates() {
        let mut net = grouped_net();
        net.groups[0].members.push(NodeId(1));
        net.nodes.push(Node::new("a", ""));
        let violations = net.integrity_violations();
        assert!(violations.contains(&"duplicate node id a".to_string()));
        assert!(violations.contains(&"group g lists a node it does not own".to_string()));
    }
}
