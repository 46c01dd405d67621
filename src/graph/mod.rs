//! Graph module for dependency relationship modeling.
//!
//! This module provides the [`DependencyGraph`] struct for recording
//! package import relationships using a directed graph structure.
//!
//! # Example
//!
//! ```rust
//! use pkggraph::graph::DependencyGraph;
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_import("net/http", "fmt");
//! graph.add_import("net/http", "io");
//!
//! assert_eq!(graph.node_count(), 3);
//! assert_eq!(graph.edge_count(), 2);
//! ```

mod dependency_graph;

pub use dependency_graph::{DependencyEdge, DependencyGraph};
