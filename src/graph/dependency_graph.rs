//! Dependency graph implementation using petgraph.
//!
//! Provides a directed graph structure for modeling package import
//! relationships, with stable integer node indices for encoders.

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;

/// Marker payload for import edges.
///
/// Edges point from the importing package to the package it imports and
/// carry no further data; the relationship itself is the information.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DependencyEdge;

/// A directed graph of package import relationships.
///
/// The graph uses petgraph's `DiGraph` internally, with node weights holding
/// the package identifier and edges pointing from importer to imported
/// package. Every node receives a dense integer index in insertion order;
/// encoders use these indices as short stable tokens instead of repeating
/// (and escaping) full identifier strings.
///
/// The graph is populated monotonically: nodes and edges are only ever
/// added, and duplicate edges are rejected.
///
/// # Example
///
/// ```rust
/// use pkggraph::graph::DependencyGraph;
///
/// let mut graph = DependencyGraph::new();
/// graph.add_import("app", "libA");
/// graph.add_import("app", "libB");
/// graph.add_import("libA", "libB");
///
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 3);
/// assert_eq!(graph.imports_of("app"), vec!["libA", "libB"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// The underlying directed graph
    graph: DiGraph<String, DependencyEdge>,
    /// Maps package identifiers to their node indices for O(1) lookup
    node_indices: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Creates a new empty dependency graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new graph with pre-allocated capacity.
    ///
    /// Use this when you know approximately how many nodes and edges
    /// will be added to avoid reallocations.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
        }
    }

    /// Adds a package to the graph, returning its node index.
    ///
    /// If the package already exists, returns its existing index without
    /// modification, so indices are assigned exactly once per identifier.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pkggraph::graph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::new();
    /// let first = graph.add_package("fmt");
    /// let second = graph.add_package("fmt");
    /// assert_eq!(first, second);
    /// ```
    pub fn add_package(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(name) {
            return idx;
        }

        let idx = self.graph.add_node(name.to_string());
        self.node_indices.insert(name.to_string(), idx);
        idx
    }

    /// Adds an import edge from `from` to `to`.
    ///
    /// Both packages are added to the graph if not already present, so
    /// leaf packages referenced only as import targets still receive a
    /// node index.
    ///
    /// # Returns
    ///
    /// `true` if the edge was added, `false` if it already existed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pkggraph::graph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::new();
    /// assert!(graph.add_import("net/http", "fmt"));
    /// assert!(!graph.add_import("net/http", "fmt")); // duplicate
    /// ```
    pub fn add_import(&mut self, from: &str, to: &str) -> bool {
        let from_idx = self.add_package(from);
        let to_idx = self.add_package(to);

        if self.graph.find_edge(from_idx, to_idx).is_some() {
            return false;
        }

        self.graph
            .add_edge(from_idx, to_idx, DependencyEdge::default());
        true
    }

    /// Returns true if the package is present in the graph.
    pub fn contains(&self, name: &str) -> bool {
        self.node_indices.contains_key(name)
    }

    /// Returns the dense integer index assigned to a package, if present.
    pub fn node_index(&self, name: &str) -> Option<usize> {
        self.node_indices.get(name).map(|idx| idx.index())
    }

    /// Iterates over all packages as `(index, identifier)` pairs, in index
    /// order.
    ///
    /// Index order is insertion order, which for a built graph is traversal
    /// order. It is stable for the lifetime of the graph, so repeated
    /// encoding passes observe identical assignments.
    pub fn packages(&self) -> impl Iterator<Item = (usize, &str)> {
        self.graph
            .node_indices()
            .map(|idx| (idx.index(), self.graph[idx].as_str()))
    }

    /// Returns the packages imported by `name`, in the order the edges were
    /// added.
    ///
    /// Returns an empty vector for unknown packages and for packages with
    /// no recorded imports.
    pub fn imports_of(&self, name: &str) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(name) else {
            return Vec::new();
        };

        // petgraph yields successors in reverse insertion order.
        let mut imports: Vec<&str> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|n| self.graph[n].as_str())
            .collect();
        imports.reverse();
        imports
    }

    /// Returns the number of packages in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of import edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns true if the graph has no packages.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Returns true if the import relation contains a cycle.
    ///
    /// Import cycles are legal input (test-only imports commonly create
    /// them); this is informational only.
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_graph_is_empty() {
        let graph = DependencyGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_add_package_assigns_dense_indices() {
        let mut graph = DependencyGraph::new();
        graph.add_package("app");
        graph.add_package("libA");
        graph.add_package("libB");

        assert_eq!(graph.node_index("app"), Some(0));
        assert_eq!(graph.node_index("libA"), Some(1));
        assert_eq!(graph.node_index("libB"), Some(2));
        assert_eq!(graph.node_index("missing"), None);
    }

    #[test]
    fn test_add_package_idempotent() {
        let mut graph = DependencyGraph::new();
        let first = graph.add_package("fmt");
        let second = graph.add_package("fmt");

        assert_eq!(first, second);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_add_import_interns_both_endpoints() {
        let mut graph = DependencyGraph::new();
        graph.add_import("app", "libA");

        assert!(graph.contains("app"));
        assert!(graph.contains("libA"));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_add_import_rejects_duplicate() {
        let mut graph = DependencyGraph::new();
        assert!(graph.add_import("app", "libA"));
        assert!(!graph.add_import("app", "libA"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_imports_of_preserves_order() {
        let mut graph = DependencyGraph::new();
        graph.add_import("app", "libC");
        graph.add_import("app", "libA");
        graph.add_import("app", "libB");

        assert_eq!(graph.imports_of("app"), vec!["libC", "libA", "libB"]);
    }

    #[test]
    fn test_imports_of_unknown_package() {
        let graph = DependencyGraph::new();
        assert!(graph.imports_of("ghost").is_empty());
    }

    #[test]
    fn test_packages_in_index_order() {
        let mut graph = DependencyGraph::new();
        graph.add_import("app", "libA");
        graph.add_import("libA", "libB");

        let names: Vec<(usize, &str)> = graph.packages().collect();
        assert_eq!(names, vec![(0, "app"), (1, "libA"), (2, "libB")]);
    }

    #[test]
    fn test_has_cycles() {
        let mut graph = DependencyGraph::new();
        graph.add_import("a", "b");
        graph.add_import("b", "c");
        assert!(!graph.has_cycles());

        graph.add_import("c", "a");
        assert!(graph.has_cycles());
    }
}
