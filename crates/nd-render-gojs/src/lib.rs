#![forbid(unsafe_code)]

//! Projection of a parsed [`Net`] into the GoJS graph-links payload.

mod model;

pub use model::{GoJsModel, GroupRecord, LinkRecord, NodeDataRecord, NodeRecord, ProjectionError};

use nd_core::{Edge, Group, Net, Node};
use tracing::debug;

/// Project `net` into a GoJS model.
///
/// Emits one record per node (with its owning group's id when it has one),
/// then one container record per group, then one link per edge. Empty labels
/// produce no `text` field. The net is trusted to be well formed.
#[must_use]
pub fn project(net: &Net) -> GoJsModel {
    let mut node_data_array = Vec::with_capacity(net.nodes.len() + net.groups.len());
    node_data_array.extend(
        net.nodes
            .iter()
            .map(|node| NodeDataRecord::Node(node_record(net, node))),
    );
    node_data_array.extend(net.groups.iter().map(|group| NodeDataRecord::Group(group_record(group))));

    let link_data_array: Vec<LinkRecord> = net
        .edges
        .iter()
        .filter_map(|edge| link_record(net, edge))
        .collect();

    debug!(
        records = node_data_array.len(),
        links = link_data_array.len(),
        "projected net"
    );
    GoJsModel {
        node_data_array,
        link_data_array,
    }
}

fn text_of(label: &str) -> Option<String> {
    (!label.is_empty()).then(|| label.to_string())
}

fn node_record(net: &Net, node: &Node) -> NodeRecord {
    NodeRecord {
        key: node.id.clone(),
        group: net.group_of(node).map(|group| group.id.clone()),
        text: text_of(&node.label),
    }
}

fn group_record(group: &Group) -> GroupRecord {
    GroupRecord::new(group.id.clone(), text_of(&group.label))
}

fn link_record(net: &Net, edge: &Edge) -> Option<LinkRecord> {
    let (source, target) = net.endpoints(edge)?;
    Some(LinkRecord {
        from: source.id.clone(),
        to: target.id.clone(),
    })
}

/// Project `net` and encode the model as JSON.
pub fn project_to_json(net: &Net, pretty: bool) -> Result<String, ProjectionError> {
    let model = project(net);
    if pretty {
        model.to_json_pretty()
    } else {
        model.to_json()
    }
}

#[cfg(test)]
mod tests {
    use nd_core::Net;
    use nd_parser::parse;
    use proptest::prelude::*;

    use super::{NodeDataRecord, project, project_to_json};

    #[test]
    fn empty_net_projects_to_empty_arrays() {
        let model = project(&Net::empty());
        assert!(model.is_empty());
        assert_eq!(
            project_to_json(&Net::empty(), false).expect("encode"),
            r#"{"nodeDataArray":[],"linkDataArray":[]}"#
        );
    }

    #[test]
    fn nodes_precede_groups_and_carry_group_keys() {
        let parsed = parse("node a Alpha\nnode b\nnode c\ngroup g Gamma\na\nc\nendgroup\nedge e1 a b\n");
        let model = project(&parsed.net);

        let keys: Vec<&str> = model
            .node_data_array
            .iter()
            .map(NodeDataRecord::key)
            .collect();
        assert_eq!(keys, ["a", "b", "c", "g"]);

        let nodes: Vec<_> = model.nodes().collect();
        assert_eq!(nodes[0].group.as_deref(), Some("g"));
        assert_eq!(nodes[0].text.as_deref(), Some("Alpha"));
        assert_eq!(nodes[1].group, None);
        assert_eq!(nodes[1].text, None);
        assert_eq!(nodes[2].group.as_deref(), Some("g"));

        let group = model.groups().next().expect("group record");
        assert!(group.is_group);
        assert_eq!(group.text.as_deref(), Some("Gamma"));

        let link = model.links().next().expect("link record");
        assert_eq!((link.from.as_str(), link.to.as_str()), ("a", "b"));
    }

    #[test]
    fn pretty_and_compact_json_decode_to_same_value() {
        let parsed = parse("node a\nnode b\nedge e a b\nedge f b a\n");
        let compact = project_to_json(&parsed.net, false).expect("compact");
        let pretty = project_to_json(&parsed.net, true).expect("pretty");
        assert!(pretty.contains('\n'));
        let compact: serde_json::Value = serde_json::from_str(&compact).expect("decode compact");
        let pretty: serde_json::Value = serde_json::from_str(&pretty).expect("decode pretty");
        assert_eq!(compact, pretty);
        assert_eq!(compact["linkDataArray"][1]["from"], "b");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_projection_is_idempotent(input in "((node|edge|group|endgroup|a|b|c|g) ?\n?){0,48}") {
            let parsed = parse(&input);
            let first = project(&parsed.net).to_json().expect("encode first");
            let second = project(&parsed.net).to_json().expect("encode second");
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_projection_mirrors_net_sizes(input in "((node|edge|group|endgroup|a|b|c|g) ?\n?){0,48}") {
            let parsed = parse(&input);
            let model = project(&parsed.net);
            prop_assert_eq!(model.nodes().count(), parsed.net.nodes.len());
            prop_assert_eq!(model.groups().count(), parsed.net.groups.len());
            prop_assert_eq!(model.links().count(), parsed.net.edges.len());
        }
    }
}
