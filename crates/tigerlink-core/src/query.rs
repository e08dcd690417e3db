//! High-level retrieval operations: synthesize, dispatch, normalize.

use std::collections::BTreeSet;

use async_trait::async_trait;
use tigerlink_common::{EdgeSpec, NeighborSpec, NodeSpec};

use crate::api::{QueryParams, TigerGraphApi};
use crate::error::Result;
use crate::gsql::{self, edge_query, neighbor_query, node_query};
use crate::normalize::{shape, Table};
use crate::traverse::{self, NeighborSource};

const EDGE_BOOKKEEPING: [&str; 5] = ["e_type", "from_id", "from_type", "to_id", "to_type"];

/// Retrieve nodes matching `spec` as a flat table.
///
/// With a projection, `v_id` is dropped, and `v_type` too when the spec
/// names a concrete node type (it is redundant then). Without a projection
/// both are kept so the caller still has the identifier.
pub async fn get_nodes(api: &TigerGraphApi, graph: &str, spec: &NodeSpec) -> Result<Table> {
    let query = node_query(graph, spec);
    let results = api.run_interpreted_query(&query, &QueryParams::new()).await?;
    let mut drops = vec!["v_id"];
    if spec.node_type.is_some() {
        drops.push("v_type");
    }
    Ok(shape(
        &results,
        "Nodes",
        gsql::effective_projection(&spec.return_attributes),
        &drops,
    ))
}

/// Retrieve the one-hop neighborhood of the spec's start nodes.
pub async fn get_neighbors(api: &TigerGraphApi, graph: &str, spec: &NeighborSpec) -> Result<Table> {
    let (query, params) = neighbor_query(graph, spec);
    let results = api.run_interpreted_query(&query, &params).await?;
    Ok(shape(
        &results,
        "Neighbors",
        gsql::effective_projection(&spec.return_attributes),
        &["v_id", "v_type"],
    ))
}

/// Retrieve edges matching `spec`. Projected attributes are selected
/// server-side, so they arrive as top-level columns already.
pub async fn get_edges(api: &TigerGraphApi, graph: &str, spec: &EdgeSpec) -> Result<Table> {
    let query = edge_query(graph, spec);
    let results = api.run_interpreted_query(&query, &QueryParams::new()).await?;
    Ok(shape(
        &results,
        "T",
        gsql::effective_projection(&spec.return_attributes),
        &EDGE_BOOKKEEPING,
    ))
}

/// Live [`NeighborSource`] expanding a frontier within one node type,
/// suitable for [`traverse::bfs`].
pub struct FrontierExpander<'a> {
    api: &'a TigerGraphApi,
    graph: String,
    node_type: String,
    edge_type_set: Option<BTreeSet<String>>,
    limit: Option<u64>,
}

impl<'a> FrontierExpander<'a> {
    pub fn new(
        api: &'a TigerGraphApi,
        graph: impl Into<String>,
        node_type: impl Into<String>,
    ) -> Self {
        Self {
            api,
            graph: graph.into(),
            node_type: node_type.into(),
            edge_type_set: None,
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

    /// Cap the number of neighbors fetched per hop.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Run a breadth-first traversal from `start_nodes`, where
    /// `primary_key` is the attribute column carrying node identifiers.
    pub async fn bfs(
        &self,
        start_nodes: &BTreeSet<String>,
        primary_key: &str,
        max_hops: Option<usize>,
    ) -> Result<Table> {
        traverse::bfs(self, start_nodes, primary_key, max_hops).await
    }
}

#[async_trait]
impl NeighborSource for FrontierExpander<'_> {
    async fn neighbors(&self, frontier: &BTreeSet<String>) -> Result<Table> {
        let mut spec = NeighborSpec::new(frontier.iter().cloned(), &self.node_type)
            .target_node_types([self.node_type.clone()]);
        spec.edge_type_set = self.edge_type_set.clone();
        spec.limit = self.limit;
        get_neighbors(self.api, &self.graph, &spec).await
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod query_tests;
