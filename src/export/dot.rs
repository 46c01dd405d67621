//! Graphviz dot encoder.
//!
//! Emits the graph-description text consumed by the external renderer:
//! a `digraph` header, one declaration line per indexed node carrying its
//! quoted identifier and a box shape, one line per edge referencing nodes
//! by index, and a closing brace. Output is byte-identical across runs for
//! the same graph.

use crate::graph::DependencyGraph;
use std::io::{self, Write};

/// Writes the graph in Graphviz dot format.
///
/// Nodes are declared in index order; edges follow, grouped by source node
/// in index order with targets in edge insertion order.
///
/// # Example
///
/// ```rust
/// use pkggraph::export::dot::write_dot;
/// use pkggraph::graph::DependencyGraph;
///
/// let mut graph = DependencyGraph::new();
/// graph.add_import("app", "fmt");
///
/// let mut out = Vec::new();
/// write_dot(&graph, &mut out).unwrap();
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.contains("N0 -> N1"));
/// ```
pub fn write_dot<W: Write>(graph: &DependencyGraph, writer: &mut W) -> io::Result<()> {
    writer.write_all(b"digraph {\n")?;

    for (idx, name) in graph.packages() {
        writeln!(writer, "\tN{} [label={},shape=box];", idx, quote(name))?;
    }

    for (src, name) in graph.packages() {
        for import in graph.imports_of(name) {
            // Every recorded import target is an interned node.
            if let Some(dst) = graph.node_index(import) {
                writeln!(writer, "\tN{} -> N{} [weight=1];", src, dst)?;
            }
        }
    }

    writer.write_all(b"}\n")
}

/// Quotes an identifier for use as a dot label, escaping backslashes,
/// double quotes, and control characters.
fn quote(label: &str) -> String {
    use std::fmt::Write as _;

    let mut quoted = String::with_capacity(label.len() + 2);
    quoted.push('"');
    for c in label.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            c if c.is_control() => {
                let _ = write!(quoted, "\\x{:02x}", c as u32);
            }
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        graph.add_import("app", "libA");
        graph.add_import("app", "libB");
        graph.add_import("libA", "libC");
        graph.add_import("libB", "libC");
        graph
    }

    #[test]
    fn test_write_dot_exact_output() {
        let mut out = Vec::new();
        write_dot(&diamond(), &mut out).unwrap();

        let expected = "digraph {\n\
            \tN0 [label=\"app\",shape=box];\n\
            \tN1 [label=\"libA\",shape=box];\n\
            \tN2 [label=\"libB\",shape=box];\n\
            \tN3 [label=\"libC\",shape=box];\n\
            \tN0 -> N1 [weight=1];\n\
            \tN0 -> N2 [weight=1];\n\
            \tN1 -> N3 [weight=1];\n\
            \tN2 -> N3 [weight=1];\n\
            }\n";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_write_dot_deterministic() {
        let graph = diamond();

        let mut first = Vec::new();
        let mut second = Vec::new();
        write_dot(&graph, &mut first).unwrap();
        write_dot(&graph, &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_write_dot_empty_graph() {
        let mut out = Vec::new();
        write_dot(&DependencyGraph::new(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "digraph {\n}\n");
    }

    #[test]
    fn test_quote_plain_identifier() {
        assert_eq!(quote("net/http"), "\"net/http\"");
    }

    #[test]
    fn test_quote_escapes_special_characters() {
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote("a\\b"), "\"a\\\\b\"");
        assert_eq!(quote("a\nb"), "\"a\\nb\"");
    }

    #[test]
    fn test_quote_escapes_remaining_control_characters() {
        assert_eq!(quote("a\x01b"), "\"a\\x01b\"");
        assert_eq!(quote("a\x1bb"), "\"a\\x1bb\"");
        assert_eq!(quote("a\u{7f}b"), "\"a\\x7fb\"");
    }
}
