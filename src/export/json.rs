//! Hierarchical JSON encoder.
//!
//! Emits one JSON record per package as a newline-delimited stream (no
//! outer array), in the shape expected by hierarchical-size visualizations:
//! a name, a placeholder size, and the list of direct imports. Empty and
//! zero-valued fields are omitted.

use crate::graph::DependencyGraph;
use serde::Serialize;
use std::io::{self, Write};

/// Placeholder byte size emitted for every package.
///
/// Real sizes would need build information the import walk does not have;
/// visualization consumers only require the field to be present.
const PLACEHOLDER_SIZE: u64 = 1000;

/// Serializable record for a single package.
#[derive(Serialize)]
struct PackageRecord<'a> {
    #[serde(skip_serializing_if = "is_empty_str")]
    name: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    size: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    imports: Vec<&'a str>,
}

fn is_empty_str(s: &&str) -> bool {
    s.is_empty()
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

/// Writes the graph as a stream of newline-delimited JSON records, one per
/// package in index order.
///
/// # Example
///
/// ```rust
/// use pkggraph::export::json::write_json;
/// use pkggraph::graph::DependencyGraph;
///
/// let mut graph = DependencyGraph::new();
/// graph.add_import("app", "fmt");
///
/// let mut out = Vec::new();
/// write_json(&graph, &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
/// ```
pub fn write_json<W: Write>(graph: &DependencyGraph, writer: &mut W) -> io::Result<()> {
    for (_, name) in graph.packages() {
        let record = PackageRecord {
            name,
            size: PLACEHOLDER_SIZE,
            imports: graph.imports_of(name),
        };
        serde_json::to_writer(&mut *writer, &record)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}
