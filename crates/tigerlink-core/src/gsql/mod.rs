//! GSQL query synthesis.
//!
//! Pure functions from a spec + graph name to interpreted-query text. The
//! exact whitespace of the generated text is a compatibility surface; tests
//! assert byte-for-byte equality, so edit the templates with care.

mod edges;
mod neighbors;
mod nodes;

pub use edges::edge_query;
pub use neighbors::neighbor_query;
pub use nodes::node_query;

use std::collections::BTreeSet;

/// An empty projection list behaves the same as no projection at all: the
/// whole attribute set is printed.
pub(crate) fn effective_projection(attributes: &Option<Vec<String>>) -> Option<&[String]> {
    match attributes.as_deref() {
        None | Some([]) => None,
        Some(attributes) => Some(attributes),
    }
}

pub(crate) fn join_types(set: &BTreeSet<String>) -> String {
    set.iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("|")
}

/// Render the trailing PRINT statement, either bare or with an aliased
/// per-attribute projection block.
pub(crate) fn print_block(role: &str, projection: Option<&[String]>) -> String {
    match projection {
        Some(attributes) => {
            let list = attributes
                .iter()
                .map(|attr| format!("{role}.{attr} AS {attr}"))
                .collect::<Vec<_>>()
                .join(",\n    ");
            format!("  PRINT {role}[\n    {list}\n  ];\n")
        }
        None => format!("  PRINT {role};\n"),
    }
}
