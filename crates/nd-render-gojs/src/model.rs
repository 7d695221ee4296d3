//! GoJS `GraphLinksModel` payload types.
//!
//! Field names follow the GoJS data conventions (`nodeDataArray`,
//! `linkDataArray`, `isGroup`) so the JSON can be handed to
//! `go.Model.fromJson` unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("failed to encode GoJS model: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A plain node. `group` names the owning group container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A group container. `is_group` is always `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub is_group: bool,
}

impl GroupRecord {
    #[must_use]
    pub fn new(key: impl Into<String>, text: Option<String>) -> Self {
        Self {
            key: key.into(),
            text,
            is_group: true,
        }
    }
}

/// One entry of `nodeDataArray`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeDataRecord {
    // Tried first when decoding: only group records carry `isGroup`.
    Group(GroupRecord),
    Node(NodeRecord),
}

impl NodeDataRecord {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Group(group) => &group.key,
            Self::Node(node) => &node.key,
        }
    }

    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub from: String,
    pub to: String,
}

/// Projection output: node records first, then group records, then links.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoJsModel {
    pub node_data_array: Vec<NodeDataRecord>,
    pub link_data_array: Vec<LinkRecord>,
}

impl GoJsModel {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_data_array.is_empty() && self.link_data_array.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeRecord> {
        self.node_data_array.iter().filter_map(|record| match record {
            NodeDataRecord::Node(node) => Some(node),
            NodeDataRecord::Group(_) => None,
        })
    }

    pub fn groups(&self) -> impl Iterator<Item = &GroupRecord> {
        self.node_data_array.iter().filter_map(|record| match record {
            NodeDataRecord::Group(group) => Some(group),
            NodeDataRecord::Node(_) => None,
        })
    }

    pub fn links(&self) -> impl Iterator<Item = &LinkRecord> {
        self.link_data_array.iter()
    }

    pub fn to_json(&self) -> Result<String, ProjectionError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ProjectionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{GoJsModel, GroupRecord, LinkRecord, NodeDataRecord, NodeRecord};

    fn sample() -> GoJsModel {
        GoJsModel {
            node_data_array: vec![
                NodeDataRecord::Node(NodeRecord {
                    key: "a".to_string(),
                    group: Some("g".to_string()),
                    text: Some("Alpha".to_string()),
                }),
                NodeDataRecord::Node(NodeRecord {
                    key: "b".to_string(),
                    group: None,
                    text: None,
                }),
                NodeDataRecord::Group(GroupRecord::new("g", None)),
            ],
            link_data_array: vec![LinkRecord {
                from: "a".to_string(),
                to: "b".to_string(),
            }],
        }
    }

    #[test]
    fn json_uses_gojs_field_names_and_omits_absent_fields() {
        let json = sample().to_json().expect("encode model");
        assert_eq!(
            json,
            concat!(
                r#"{"nodeDataArray":[{"key":"a","group":"g","text":"Alpha"},"#,
                r#"{"key":"b"},{"key":"g","isGroup":true}],"#,
                r#""linkDataArray":[{"from":"a","to":"b"}]}"#
            )
        );
    }

    #[test]
    fn decoding_tells_groups_from_nodes() {
        let model = sample();
        let json = model.to_json_pretty().expect("encode model");
        let decoded: GoJsModel = serde_json::from_str(&json).expect("decode model");
        assert_eq!(decoded, model);
        assert!(decoded.node_data_array[2].is_group());
        assert_eq!(decoded.node_data_array[2].key(), "g");
    }

    #[test]
    fn iterators_split_record_kinds() {
        let model = sample();
        let nodes: Vec<&str> = model.nodes().map(|node| node.key.as_str()).collect();
        let groups: Vec<&str> = model.groups().map(|group| group.key.as_str()).collect();
        assert_eq!(nodes, ["a", "b"]);
        assert_eq!(groups, ["g"]);
        assert_eq!(model.links().count(), 1);
        assert!(!model.is_empty());
        assert!(GoJsModel::default().is_empty());
    }
}
