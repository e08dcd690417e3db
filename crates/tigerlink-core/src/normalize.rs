//! Result normalization: flatten the server's nested vertex rows into a
//! single-level table.
//!
//! A query reply nests per-vertex attributes under an `attributes` object
//! and carries bookkeeping fields (`v_id`, `v_type`) alongside. Callers
//! want a flat table whose columns match their requested projection, so
//! this module renames, reorders, and drops columns according to the
//! originating spec.

use std::collections::BTreeMap;

use serde_json::Value;

const ATTR_PREFIX: &str = "attributes.";

/// A flat, ordered tabular result. Row cells align with `columns`; a cell
/// missing from the source row is `Value::Null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }

    /// A copy keeping only rows whose `column` cell satisfies `keep`.
    /// An unknown column yields an empty table.
    pub fn filter_rows(&self, column: &str, mut keep: impl FnMut(&Value) -> bool) -> Table {
        match self.column_index(column) {
            Some(index) => Table {
                columns: self.columns.clone(),
                rows: self
                    .rows
                    .iter()
                    .filter(|row| row.get(index).map_or(false, |cell| keep(cell)))
                    .cloned()
                    .collect(),
            },
            None => Table::default(),
        }
    }

    /// All values of one column rendered as strings. `None` when the
    /// column does not exist.
    pub fn string_column(&self, name: &str) -> Option<Vec<String>> {
        let index = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| match row.get(index) {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => String::new(),
                })
                .collect(),
        )
    }
}

/// Shape a raw `results` payload into a [`Table`].
///
/// `results` is expected to be a list whose first element maps `role` to a
/// list of vertex rows; anything else yields an empty table ("no matches"
/// and "missing key" are deliberately indistinguishable here). When a
/// projection is given, the projected attributes come first in the
/// requested order and the `drop_when_projected` bookkeeping columns are
/// removed; without a projection every flattened attribute column is kept
/// unprefixed, bookkeeping columns included.
pub fn shape(
    results: &Value,
    role: &str,
    projection: Option<&[String]>,
    drop_when_projected: &[&str],
) -> Table {
    let rows_json = match results
        .as_array()
        .and_then(|list| list.first())
        .and_then(|entry| entry.get(role))
        .and_then(Value::as_array)
    {
        Some(rows) if !rows.is_empty() => rows,
        _ => return Table::default(),
    };

    // Flatten, recording column order as first seen across rows.
    let mut columns: Vec<String> = Vec::new();
    let mut flat_rows: Vec<BTreeMap<String, Value>> = Vec::new();
    for row in rows_json {
        let Some(object) = row.as_object() else {
            continue;
        };
        let mut flat = BTreeMap::new();
        for (key, value) in object {
            match value.as_object() {
                Some(nested) if key == "attributes" => {
                    for (name, nested_value) in nested {
                        let column = format!("{ATTR_PREFIX}{name}");
                        if !columns.contains(&column) {
                            columns.push(column.clone());
                        }
                        flat.insert(column, nested_value.clone());
                    }
                }
                _ => {
                    if !columns.iter().any(|c| c == key) {
                        columns.push(key.clone());
                    }
                    flat.insert(key.clone(), value.clone());
                }
            }
        }
        flat_rows.push(flat);
    }

    let rename: Vec<(String, String)> = match projection {
        None => columns
            .iter()
            .filter_map(|column| {
                column
                    .strip_prefix(ATTR_PREFIX)
                    .map(|bare| (column.clone(), bare.to_string()))
            })
            .collect(),
        Some(attributes) => attributes
            .iter()
            .map(|attr| (format!("{ATTR_PREFIX}{attr}"), attr.clone()))
            .collect(),
    };
    let renamed = |column: &str| -> String {
        rename
            .iter()
            .find(|(from, _)| from == column)
            .map(|(_, to)| to.clone())
            .unwrap_or_else(|| column.to_string())
    };

    let mut final_columns: Vec<String> = columns.iter().map(|c| renamed(c)).collect();
    if projection.is_some() {
        final_columns.retain(|column| !drop_when_projected.contains(&column.as_str()));
    }
    if let Some(attributes) = projection {
        let requested: Vec<String> = attributes
            .iter()
            .filter(|attr| final_columns.iter().any(|c| c == *attr))
            .cloned()
            .collect();
        let remaining: Vec<String> = final_columns
            .iter()
            .filter(|column| !requested.contains(column))
            .cloned()
            .collect();
        final_columns = requested.into_iter().chain(remaining).collect();
    }

    // Invert the rename so cells can be pulled from the flattened rows.
    let source_of = |column: &str| -> String {
        rename
            .iter()
            .find(|(_, to)| to == column)
            .map(|(from, _)| from.clone())
            .unwrap_or_else(|| column.to_string())
    };
    let sources: Vec<String> = final_columns.iter().map(|c| source_of(c)).collect();

    let rows = flat_rows
        .into_iter()
        .map(|mut flat| {
            sources
                .iter()
                .map(|source| flat.remove(source).unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    Table {
        columns: final_columns,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node_results() -> Value {
        json!([
            {
                "Nodes": [
                    {
                        "v_id": "n1",
                        "v_type": "Entity",
                        "attributes": {"name": "alpha", "id": "n1", "rank": 3}
                    },
                    {
                        "v_id": "n2",
                        "v_type": "Entity",
                        "attributes": {"name": "beta", "id": "n2", "rank": 7}
                    }
                ]
            }
        ])
    }

    #[test]
    fn test_shape_without_projection_keeps_everything_unprefixed() {
        let table = shape(&node_results(), "Nodes", None, &["v_id", "v_type"]);
        assert_eq!(table.columns(), &["id", "name", "rank", "v_id", "v_type"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "name"), Some(&json!("alpha")));
        assert_eq!(table.get(1, "v_id"), Some(&json!("n2")));
    }

    #[test]
    fn test_shape_with_projection_reorders_and_drops_bookkeeping() {
        let projection = vec!["rank".to_string(), "id".to_string()];
        let table = shape(
            &node_results(),
            "Nodes",
            Some(&projection),
            &["v_id", "v_type"],
        );
        // Requested attributes first, in the requested order; the remaining
        // attribute column keeps its prefixed name.
        assert_eq!(table.columns(), &["rank", "id", "attributes.name"]);
        assert_eq!(table.get(0, "rank"), Some(&json!(3)));
        assert_eq!(table.get(1, "id"), Some(&json!("n2")));
    }

    #[test]
    fn test_shape_projection_ignores_unknown_attributes() {
        let projection = vec!["id".to_string(), "missing".to_string()];
        let table = shape(
            &node_results(),
            "Nodes",
            Some(&projection),
            &["v_id", "v_type"],
        );
        assert_eq!(table.columns()[0], "id");
        assert!(table.column_index("missing").is_none());
    }

    #[test]
    fn test_shape_missing_role_key_yields_empty() {
        let table = shape(&node_results(), "Neighbors", None, &[]);
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn test_shape_empty_rows_yield_empty() {
        let results = json!([{"Nodes": []}]);
        assert!(shape(&results, "Nodes", None, &[]).is_empty());
    }

    #[test]
    fn test_shape_non_list_results_yield_empty() {
        assert!(shape(&json!({"oops": true}), "Nodes", None, &[]).is_empty());
        assert!(shape(&Value::Null, "Nodes", None, &[]).is_empty());
    }

    #[test]
    fn test_shape_ragged_rows_fill_null() {
        let results = json!([
            {
                "Nodes": [
                    {"v_id": "n1", "attributes": {"id": "n1", "rank": 1}},
                    {"v_id": "n2", "attributes": {"id": "n2"}}
                ]
            }
        ]);
        let table = shape(&results, "Nodes", None, &[]);
        assert_eq!(table.get(1, "rank"), Some(&Value::Null));
    }

    #[test]
    fn test_string_column_stringifies_scalars() {
        let table = shape(&node_results(), "Nodes", None, &[]);
        assert_eq!(
            table.string_column("rank"),
            Some(vec!["3".to_string(), "7".to_string()])
        );
        assert!(table.string_column("absent").is_none());
    }
}
