use std::fmt::Write;

use tigerlink_common::EdgeSpec;

use super::{effective_projection, join_types};

/// Synthesize a direct edge pattern-match query.
///
/// Unlike node and neighbor synthesis, the projection goes into the SELECT
/// clause as `sourceAlias, targetAlias, edgeAlias.attr AS attr` items; the
/// query selects a set of endpoint pairs, not a vertex frontier, so a
/// bracketed PRINT projection does not apply. The multi-column select list
/// also rules out the vertex-set assignment form (which takes a single
/// alias), so the result lands in a table via `INTO T` and is printed
/// under the `T` role key.
pub fn edge_query(graph: &str, spec: &EdgeSpec) -> String {
    let s_alias = &spec.source_node_alias;
    let e_alias = &spec.edge_alias;
    let t_alias = &spec.target_node_alias;

    let source_segment = match &spec.source_node_type_set {
        Some(set) if !set.is_empty() => format!("({s_alias}:{})", alternation(set)),
        _ => format!("({s_alias})"),
    };
    let edge_segment = match &spec.edge_type_set {
        Some(set) if !set.is_empty() => format!("-[{e_alias}:{}]-", alternation(set)),
        _ => format!("-[{e_alias}]-"),
    };
    let target_segment = match &spec.target_node_type_set {
        Some(set) if !set.is_empty() => format!("({t_alias}:{})", alternation(set)),
        _ => format!("({t_alias})"),
    };

    let select_list = match effective_projection(&spec.return_attributes) {
        Some(attributes) => {
            let projected = attributes
                .iter()
                .map(|attr| format!("{e_alias}.{attr} AS {attr}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{s_alias}, {t_alias}, {projected}")
        }
        None => format!("{s_alias}, {e_alias}, {t_alias}"),
    };

    let mut query = format!("INTERPRET QUERY() FOR GRAPH {graph} {{\n");
    let _ = write!(
        query,
        "  SELECT {select_list} INTO T\n    FROM {source_segment} {edge_segment} {target_segment}\n"
    );
    if let Some(filter) = &spec.filter_expression {
        let _ = writeln!(query, "    WHERE {filter}");
    }
    if let Some(limit) = spec.limit {
        let _ = writeln!(query, "    LIMIT {limit}");
    }
    query.push_str("  ;\n  PRINT T;\n}");
    query
}

fn alternation(set: &std::collections::BTreeSet<String>) -> String {
    if set.len() > 1 {
        format!("({})", join_types(set))
    } else {
        join_types(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_query_untyped() {
        let spec = EdgeSpec::new();
        let expected = "\
INTERPRET QUERY() FOR GRAPH MyGraph {
  SELECT s, e, t INTO T
    FROM (s) -[e]- (t)
  ;
  PRINT T;
}";
        assert_eq!(edge_query("MyGraph", &spec), expected);
    }

    #[test]
    fn test_edge_query_with_types() {
        let spec = EdgeSpec::new()
            .source_node_types(["Person"])
            .edge_types(["knows"])
            .target_node_types(["Person"]);
        let expected = "\
INTERPRET QUERY() FOR GRAPH MyGraph {
  SELECT s, e, t INTO T
    FROM (s:Person) -[e:knows]- (t:Person)
  ;
  PRINT T;
}";
        assert_eq!(edge_query("MyGraph", &spec), expected);
    }

    #[test]
    fn test_edge_query_with_alternations() {
        let spec = EdgeSpec::new()
            .source_node_types(["Community", "Person"])
            .edge_types(["follows", "knows"])
            .target_node_types(["Person"]);
        let expected = "\
INTERPRET QUERY() FOR GRAPH MyGraph {
  SELECT s, e, t INTO T
    FROM (s:(Community|Person)) -[e:(follows|knows)]- (t:Person)
  ;
  PRINT T;
}";
        assert_eq!(edge_query("MyGraph", &spec), expected);
    }

    #[test]
    fn test_edge_query_with_projection_filter_and_limit() {
        let spec = EdgeSpec::new()
            .source_node_types(["Person"])
            .edge_types(["knows"])
            .target_node_types(["Person"])
            .filter("s.id != t.id")
            .return_attributes(["weight", "since"])
            .limit(10);
        let expected = "\
INTERPRET QUERY() FOR GRAPH MyGraph {
  SELECT s, t, e.weight AS weight, e.since AS since INTO T
    FROM (s:Person) -[e:knows]- (t:Person)
    WHERE s.id != t.id
    LIMIT 10
  ;
  PRINT T;
}";
        assert_eq!(edge_query("MyGraph", &spec), expected);
    }

    #[test]
    fn test_edge_query_uses_select_into_table_form() {
        // The assignment form takes a single vertex alias, so the
        // multi-column select list must land in a table.
        let bare = edge_query("MyGraph", &EdgeSpec::new());
        assert!(bare.contains("SELECT s, e, t INTO T"), "{bare}");

        let projected = edge_query("MyGraph", &EdgeSpec::new().return_attributes(["weight"]));
        assert!(
            projected.contains("SELECT s, t, e.weight AS weight INTO T"),
            "{projected}"
        );
    }

    #[test]
    fn test_edge_query_empty_type_set_is_untyped() {
        let spec = EdgeSpec::new().edge_types(Vec::<String>::new());
        assert!(edge_query("MyGraph", &spec).contains("-[e]-"));
    }

    #[test]
    fn test_edge_query_is_deterministic() {
        let spec = EdgeSpec::new().edge_types(["b", "a"]).limit(5);
        assert_eq!(edge_query("MyGraph", &spec), edge_query("MyGraph", &spec));
    }
}
