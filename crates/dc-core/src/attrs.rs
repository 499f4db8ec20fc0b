//! Attribute dictionaries exchanged with the document controller.
//!
//! The controller describes every node and edge with a small payload: the
//! identity fields the canvas needs for placement (`id`, `x`, `y` or
//! `sourceId`/`destId`) plus the raw DOT attribute map (`dotAttrs`).
//! Payloads serialize with camelCase keys so a host can pass them as JSON.

use crate::id::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw DOT attributes of a node or edge, values kept verbatim (quotes included).
pub type DotAttrs = BTreeMap<String, String>;

/// Well-known DOT attribute keys.
pub mod keys {
    pub const LABEL: &str = "label";
    pub const POS: &str = "pos";
}

/// Payload describing one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeArgs {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub dot_attrs: DotAttrs,
}

impl NodeArgs {
    pub fn new(id: impl Into<NodeId>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            dot_attrs: DotAttrs::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.dot_attrs.insert(key.to_string(), value.to_string());
        self
    }
}

/// Payload describing one edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeArgs {
    pub id: EdgeId,
    pub source_id: NodeId,
    pub dest_id: NodeId,
    #[serde(default)]
    pub dot_attrs: DotAttrs,
}

impl EdgeArgs {
    pub fn new(id: impl Into<EdgeId>, source: impl Into<NodeId>, dest: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source_id: source.into(),
            dest_id: dest.into(),
            dot_attrs: DotAttrs::new(),
        }
    }

    #[must_use]
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.dot_attrs.insert(key.to_string(), value.to_string());
        self
    }
}
