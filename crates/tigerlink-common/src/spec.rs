//! Immutable request descriptors consumed by the GSQL synthesizer.
//!
//! A spec is built once per call, handed to the synthesizer, and discarded.
//! Type sets are `BTreeSet`s so the generated query text is deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Describes a node-selection request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Concrete node type to select. Ignored when `all_node_types` is set.
    pub node_type: Option<String>,
    pub all_node_types: bool,
    pub node_alias: String,
    pub filter_expression: Option<String>,
    /// Attributes to project, in order. `None` and an empty list both mean
    /// "all attributes" (inherited behavior, pinned by tests).
    pub return_attributes: Option<Vec<String>>,
    pub limit: Option<u64>,
}

impl NodeSpec {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: Some(node_type.into()),
            all_node_types: false,
            node_alias: "s".to_string(),
            filter_expression: None,
            return_attributes: None,
            limit: None,
        }
    }

    /// Select every node type.
    pub fn any() -> Self {
        Self {
            node_type: None,
            all_node_types: true,
            node_alias: "s".to_string(),
            filter_expression: None,
            return_attributes: None,
            limit: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.node_alias = alias.into();
        self
    }

    pub fn filter(mut self, expression: impl Into<String>) -> Self {
        self.filter_expression = Some(expression.into());
        self
    }

    pub fn return_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.return_attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Describes a one-hop neighbor-traversal request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborSpec {
    /// Identifiers of the nodes to expand from. Bound as a query parameter,
    /// never inlined into the query text.
    pub start_nodes: Vec<String>,
    pub start_node_type: String,
    pub start_node_alias: String,
    /// Edge types to traverse. `None` matches any edge type.
    pub edge_type_set: Option<BTreeSet<String>>,
    pub edge_alias: String,
    /// Target node types to accept. `None` matches any node type.
    pub target_node_type_set: Option<BTreeSet<String>>,
    pub target_node_alias: String,
    pub filter_expression: Option<String>,
    pub return_attributes: Option<Vec<String>>,
    pub limit: Option<u64>,
}

impl NeighborSpec {
    pub fn new<I, S>(start_nodes: I, start_node_type: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            start_nodes: start_nodes.into_iter().map(Into::into).collect(),
            start_node_type: start_node_type.into(),
            start_node_alias: "s".to_string(),
            edge_type_set: None,
            edge_alias: "e".to_string(),
            target_node_type_set: None,
            target_node_alias: "t".to_string(),
            filter_expression: None,
            return_attributes: None,
            limit: None,
        }
    }

    pub fn edge_types<I, S>(mut self, edge_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edge_type_set = Some(edge_types.into_iter().map(Into::into).collect());
        self
    }

    pub fn target_node_types<I, S>(mut self, target_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_node_type_set = Some(target_types.into_iter().map(Into::into).collect());
        self
    }

    pub fn filter(mut self, expression: impl Into<String>) -> Self {
        self.filter_expression = Some(expression.into());
        self
    }

    pub fn return_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.return_attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Describes a direct edge pattern-match request over
/// `(source) -[edge]- (target)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub source_node_type_set: Option<BTreeSet<String>>,
    pub source_node_alias: String,
    pub edge_type_set: Option<BTreeSet<String>>,
    pub edge_alias: String,
    pub target_node_type_set: Option<BTreeSet<String>>,
    pub target_node_alias: String,
    pub filter_expression: Option<String>,
    /// Edge attributes to project as `edgeAlias.attr` columns.
    pub return_attributes: Option<Vec<String>>,
    pub limit: Option<u64>,
}

impl EdgeSpec {
    pub fn new() -> Self {
        Self {
            source_node_type_set: None,
            source_node_alias: "s".to_string(),
            edge_type_set: None,
            edge_alias: "e".to_string(),
            target_node_type_set: None,
            target_node_alias: "t".to_string(),
            filter_expression: None,
            return_attributes: None,
            limit: None,
        }
    }

    pub fn source_node_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_node_type_set = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn edge_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edge_type_set = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn target_node_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_node_type_set = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn filter(mut self, expression: impl Into<String>) -> Self {
        self.filter_expression = Some(expression.into());
        self
    }

    pub fn return_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.return_attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl Default for EdgeSpec {
    fn default() -> Self {
        Self::new()
    }
}
