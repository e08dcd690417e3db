use std::fmt::Write;

use tigerlink_common::NeighborSpec;

use crate::api::{ParamValue, QueryParams};

use super::{effective_projection, join_types, print_block};

/// Synthesize the parameterized interpreted query for a one-hop neighbor
/// traversal.
///
/// The start-node set is bound as a `SET<VERTEX<...>>` query parameter and
/// never inlined into the text, so the start set can be arbitrarily large.
/// A multi-element edge or target type set renders as a `(a|b)` alternation,
/// a singleton as the bare type name, and an absent set as an untyped
/// segment.
pub fn neighbor_query(graph: &str, spec: &NeighborSpec) -> (String, QueryParams) {
    let s_alias = &spec.start_node_alias;
    let e_alias = &spec.edge_alias;
    let t_alias = &spec.target_node_alias;

    let edge_segment = match &spec.edge_type_set {
        Some(set) if set.len() > 1 => format!("(({}):{e_alias})", join_types(set)),
        Some(set) => format!("({}:{e_alias})", join_types(set)),
        None => format!("(:{e_alias})"),
    };
    let target_segment = match &spec.target_node_type_set {
        Some(set) if set.len() > 1 => format!("(({}))", join_types(set)),
        Some(set) => join_types(set),
        None => String::new(),
    };

    let mut query = format!(
        "INTERPRET QUERY(\n  SET<VERTEX<{start_type}>> start_nodes\n) FOR GRAPH {graph} {{\n",
        start_type = spec.start_node_type,
    );
    query.push_str("  Nodes = {start_nodes};\n");
    let _ = write!(
        query,
        "  Neighbors =\n    SELECT {t_alias}\n    FROM Nodes:{s_alias} -{edge_segment}- {target_segment}:{t_alias}\n"
    );
    if let Some(filter) = &spec.filter_expression {
        let _ = writeln!(query, "    WHERE {filter}");
    }
    if let Some(limit) = spec.limit {
        let _ = writeln!(query, "    LIMIT {limit}");
    }
    query.push_str("  ;\n");
    query.push_str(&print_block(
        "Neighbors",
        effective_projection(&spec.return_attributes),
    ));
    query.push('}');

    let params = QueryParams::new().with(
        "start_nodes",
        ParamValue::List(
            spec.start_nodes
                .iter()
                .map(|id| ParamValue::Str(id.clone()))
                .collect(),
        ),
    );
    (query, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbor_query_basic() {
        let spec = NeighborSpec::new(["CYTOSORB"], "Entity");
        let expected = "\
INTERPRET QUERY(
  SET<VERTEX<Entity>> start_nodes
) FOR GRAPH MyGraph {
  Nodes = {start_nodes};
  Neighbors =
    SELECT t
    FROM Nodes:s -(:e)- :t
  ;
  PRINT Neighbors;
}";
        let (query, params) = neighbor_query("MyGraph", &spec);
        assert_eq!(query, expected);
        assert_eq!(
            params.encode().unwrap(),
            vec![("start_nodes".to_string(), "CYTOSORB".to_string())]
        );
    }

    #[test]
    fn test_neighbor_query_with_edge_and_target_types() {
        let spec = NeighborSpec::new(["CYTOSORB"], "Entity")
            .edge_types(["relationship", "reverse_relationship"])
            .target_node_types(["Entity"])
            .limit(10);
        let expected = "\
INTERPRET QUERY(
  SET<VERTEX<Entity>> start_nodes
) FOR GRAPH MyGraph {
  Nodes = {start_nodes};
  Neighbors =
    SELECT t
    FROM Nodes:s -((relationship|reverse_relationship):e)- Entity:t
    LIMIT 10
  ;
  PRINT Neighbors;
}";
        let (query, _) = neighbor_query("MyGraph", &spec);
        assert_eq!(query, expected);
    }

    #[test]
    fn test_neighbor_query_with_single_return_attribute() {
        let spec = NeighborSpec::new(["CYTOSORB"], "Entity")
            .edge_types(["relationship", "reverse_relationship"])
            .target_node_types(["Entity"])
            .return_attributes(["id"])
            .limit(10);
        let expected = "\
INTERPRET QUERY(
  SET<VERTEX<Entity>> start_nodes
) FOR GRAPH MyGraph {
  Nodes = {start_nodes};
  Neighbors =
    SELECT t
    FROM Nodes:s -((relationship|reverse_relationship):e)- Entity:t
    LIMIT 10
  ;
  PRINT Neighbors[
    Neighbors.id AS id
  ];
}";
        let (query, _) = neighbor_query("MyGraph", &spec);
        assert_eq!(query, expected);
    }

    #[test]
    fn test_neighbor_query_with_multiple_return_attributes() {
        let spec = NeighborSpec::new(["CYTOSORB"], "Entity")
            .edge_types(["relationship", "reverse_relationship"])
            .target_node_types(["Entity"])
            .return_attributes(["id", "entity_type"])
            .limit(10);
        let expected = "\
INTERPRET QUERY(
  SET<VERTEX<Entity>> start_nodes
) FOR GRAPH MyGraph {
  Nodes = {start_nodes};
  Neighbors =
    SELECT t
    FROM Nodes:s -((relationship|reverse_relationship):e)- Entity:t
    LIMIT 10
  ;
  PRINT Neighbors[
    Neighbors.id AS id,
    Neighbors.entity_type AS entity_type
  ];
}";
        let (query, _) = neighbor_query("MyGraph", &spec);
        assert_eq!(query, expected);
    }

    #[test]
    fn test_neighbor_query_with_filter_expression() {
        let spec = NeighborSpec::new(["CYTOSORB", "ITALY"], "Entity")
            .edge_types(["relationship", "reverse_relationship"])
            .target_node_types(["Entity"])
            .filter("s.id != t.id")
            .return_attributes(["id", "entity_type"])
            .limit(10);
        let expected = "\
INTERPRET QUERY(
  SET<VERTEX<Entity>> start_nodes
) FOR GRAPH MyGraph {
  Nodes = {start_nodes};
  Neighbors =
    SELECT t
    FROM Nodes:s -((relationship|reverse_relationship):e)- Entity:t
    WHERE s.id != t.id
    LIMIT 10
  ;
  PRINT Neighbors[
    Neighbors.id AS id,
    Neighbors.entity_type AS entity_type
  ];
}";
        let (query, params) = neighbor_query("MyGraph", &spec);
        assert_eq!(query, expected);
        assert_eq!(
            params.encode().unwrap(),
            vec![
                ("start_nodes".to_string(), "CYTOSORB".to_string()),
                ("start_nodes".to_string(), "ITALY".to_string()),
            ]
        );
    }

    #[test]
    fn test_neighbor_query_single_edge_type_renders_bare() {
        let spec = NeighborSpec::new(["a"], "Entity").edge_types(["relationship"]);
        let (query, _) = neighbor_query("MyGraph", &spec);
        assert!(query.contains("-(relationship:e)- :t"), "{query}");
    }

    #[test]
    fn test_neighbor_query_multi_target_types_render_alternation() {
        let spec = NeighborSpec::new(["a"], "Entity").target_node_types(["Community", "Entity"]);
        let (query, _) = neighbor_query("MyGraph", &spec);
        assert!(query.contains("-(:e)- ((Community|Entity)):t"), "{query}");
    }
}
