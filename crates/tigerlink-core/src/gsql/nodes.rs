use std::fmt::Write;

use tigerlink_common::NodeSpec;

use super::{effective_projection, print_block};

/// Synthesize the interpreted query for a node-selection spec.
///
/// The working set is seeded from the node type (or `ANY` when every type
/// is requested). A `SELECT` refinement stage is emitted only when a filter
/// or limit is present, with `WHERE` preceding `LIMIT`.
pub fn node_query(graph: &str, spec: &NodeSpec) -> String {
    let seed = match (&spec.node_type, spec.all_node_types) {
        (Some(node_type), false) => format!("{node_type}.*"),
        _ => "ANY".to_string(),
    };
    let alias = &spec.node_alias;

    let mut query = format!("INTERPRET QUERY() FOR GRAPH {graph} {{\n  Nodes = {{{seed}}};\n");
    if spec.filter_expression.is_some() || spec.limit.is_some() {
        let _ = write!(
            query,
            "  Nodes =\n    SELECT {alias}\n    FROM Nodes:{alias}\n"
        );
        if let Some(filter) = &spec.filter_expression {
            let _ = writeln!(query, "    WHERE {filter}");
        }
        if let Some(limit) = spec.limit {
            let _ = writeln!(query, "    LIMIT {limit}");
        }
        query.push_str("  ;\n");
    }
    query.push_str(&print_block("Nodes", effective_projection(&spec.return_attributes)));
    query.push('}');
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_query_simple() {
        let spec = NodeSpec::new("Community");
        let expected = "\
INTERPRET QUERY() FOR GRAPH MyGraph {
  Nodes = {Community.*};
  PRINT Nodes;
}";
        assert_eq!(node_query("MyGraph", &spec), expected);
    }

    #[test]
    fn test_node_query_with_limit() {
        let spec = NodeSpec::new("Community").limit(10);
        let expected = "\
INTERPRET QUERY() FOR GRAPH MyGraph {
  Nodes = {Community.*};
  Nodes =
    SELECT s
    FROM Nodes:s
    LIMIT 10
  ;
  PRINT Nodes;
}";
        assert_eq!(node_query("MyGraph", &spec), expected);
    }

    #[test]
    fn test_node_query_with_return_attributes() {
        let spec = NodeSpec::new("Community").return_attributes(["id", "rank"]);
        let expected = "\
INTERPRET QUERY() FOR GRAPH MyGraph {
  Nodes = {Community.*};
  PRINT Nodes[
    Nodes.id AS id,
    Nodes.rank AS rank
  ];
}";
        assert_eq!(node_query("MyGraph", &spec), expected);
    }

    #[test]
    fn test_node_query_with_filter_expression() {
        let spec = NodeSpec::new("Community").filter("s.rank > 0");
        let expected = "\
INTERPRET QUERY() FOR GRAPH MyGraph {
  Nodes = {Community.*};
  Nodes =
    SELECT s
    FROM Nodes:s
    WHERE s.rank > 0
  ;
  PRINT Nodes;
}";
        assert_eq!(node_query("MyGraph", &spec), expected);
    }

    #[test]
    fn test_node_query_any_type() {
        let spec = NodeSpec::any();
        let expected = "\
INTERPRET QUERY() FOR GRAPH MyGraph {
  Nodes = {ANY};
  PRINT Nodes;
}";
        assert_eq!(node_query("MyGraph", &spec), expected);
    }

    #[test]
    fn test_node_query_with_all_options() {
        let spec = NodeSpec::new("Community")
            .filter("s.rank > 0")
            .return_attributes(["id", "rank"])
            .limit(10);
        let expected = "\
INTERPRET QUERY() FOR GRAPH MyGraph {
  Nodes = {Community.*};
  Nodes =
    SELECT s
    FROM Nodes:s
    WHERE s.rank > 0
    LIMIT 10
  ;
  PRINT Nodes[
    Nodes.id AS id,
    Nodes.rank AS rank
  ];
}";
        assert_eq!(node_query("MyGraph", &spec), expected);
    }

    #[test]
    fn test_node_query_empty_projection_prints_bare() {
        let spec = NodeSpec::new("Community").return_attributes(Vec::<String>::new());
        assert!(node_query("MyGraph", &spec).contains("PRINT Nodes;"));
    }

    #[test]
    fn test_node_query_is_deterministic() {
        let spec = NodeSpec::new("Community").filter("s.rank > 0").limit(5);
        assert_eq!(node_query("MyGraph", &spec), node_query("MyGraph", &spec));
    }
}
