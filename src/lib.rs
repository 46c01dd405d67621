//! PkgGraph - dependency graph visualizer for package imports
//!
//! This crate discovers the transitive import graph of one or more packages
//! and encodes it as Graphviz dot text, a rendered image (via the external
//! `dot` binary), or a stream of hierarchical JSON records.

pub mod builder;
pub mod export;
pub mod graph;
pub mod resolver;
pub mod viewer;
