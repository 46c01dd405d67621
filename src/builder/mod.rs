//! Graph construction from recursive import discovery.
//!
//! This module provides the [`GraphBuilder`], which walks a [`Resolver`]
//! from one or more root packages and produces a [`DependencyGraph`]. The
//! traversal suppresses cycles and shared dependencies through a visited
//! set, applies an inclusion filter, and can aggregate packages by path
//! depth ("truncation").

use std::collections::HashSet;

use regex::Regex;
use tracing::debug;

use crate::graph::DependencyGraph;
use crate::resolver::{ResolveError, Resolver};

/// Marker identifier for foreign/native linkage.
///
/// Not a real package: it is recorded as a terminal node and never passed
/// to the resolver.
pub const FOREIGN_SENTINEL: &str = "C";

/// Errors that can occur while building a dependency graph.
///
/// Any failure aborts the whole build; no partial graph is returned,
/// because a graph that is known incomplete is worse than no graph.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The resolver failed on a visited package.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Result type alias for builder operations.
pub type BuildResult<T> = Result<T, BuildError>;

/// Builds dependency graphs by walking a resolver from root packages.
///
/// Traversal is depth-first over an explicit work stack, so pathological
/// import chains cannot overflow the call stack. A package already visited
/// is never resolved again; this is what makes the traversal terminate on
/// cyclic import relations and what keeps shared dependencies from being
/// resolved once per predecessor.
///
/// When `max_depth` is non-zero, every identifier is truncated to its first
/// `max_depth` path segments before being recorded, collapsing subtrees
/// into aggregate nodes. Visitation accounting always uses the original
/// identifier, so truncation never suppresses distinct underlying packages.
/// Edges that aggregation would turn into self-loops are dropped.
///
/// # Example
///
/// ```rust
/// use pkggraph::builder::GraphBuilder;
/// use pkggraph::resolver::TableResolver;
///
/// let mut resolver = TableResolver::new();
/// resolver.insert("app", ["libA"]);
/// resolver.insert_leaf("libA");
///
/// let graph = GraphBuilder::new()
///     .build(&resolver, &["app".to_string()])
///     .unwrap();
/// assert_eq!(graph.node_count(), 2);
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    filter: Option<Regex>,
    max_depth: usize,
    include_tests: bool,
}

impl GraphBuilder {
    /// Creates a builder with no filter, no truncation, and test imports
    /// excluded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the inclusion filter.
    ///
    /// Packages whose identifier does not match are skipped entirely: they
    /// are neither resolved nor recorded, as node or as edge target.
    pub fn filter(mut self, pattern: Regex) -> Self {
        self.filter = Some(pattern);
        self
    }

    /// Sets the aggregation depth. `0` disables truncation.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Whether test-only imports participate in the traversal.
    pub fn include_test_imports(mut self, include: bool) -> Self {
        self.include_tests = include;
        self
    }

    fn matches(&self, package: &str) -> bool {
        self.filter.as_ref().map_or(true, |f| f.is_match(package))
    }

    /// Discovers the transitive import graph of `roots`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Resolve`] if the resolver fails on any visited
    /// package. The error is not retried and no partial graph is returned.
    pub fn build<R: Resolver>(&self, resolver: &R, roots: &[String]) -> BuildResult<DependencyGraph> {
        let mut graph = DependencyGraph::new();
        let mut visited: HashSet<String> = HashSet::new();
        // Roots are pushed in reverse so they pop in argument order.
        let mut stack: Vec<String> = roots.iter().rev().cloned().collect();

        while let Some(package) = stack.pop() {
            if !self.matches(&package) {
                continue;
            }
            if package == FOREIGN_SENTINEL {
                // Terminal node, nothing to resolve.
                graph.add_package(FOREIGN_SENTINEL);
                continue;
            }
            // Visited accounting is keyed by the untruncated identifier.
            if !visited.insert(package.clone()) {
                continue;
            }

            let resolved = resolver.resolve(&package)?;
            let mut imports = resolved.imports;
            if self.include_tests {
                imports.extend(resolved.test_imports);
            }
            let imports: Vec<String> = imports
                .into_iter()
                .filter(|dep| self.matches(dep))
                .collect();

            let key = truncate(&package, self.max_depth);
            graph.add_package(key);
            for dep in &imports {
                let target = truncate(dep, self.max_depth);
                if target == key {
                    // Aggregation collapsed this edge into a self-loop.
                    continue;
                }
                graph.add_import(key, target);
            }

            debug!(package = %package, key = %key, imports = imports.len(), "resolved");

            // Descend into the untruncated imports, depth-first preorder.
            for dep in imports.into_iter().rev() {
                stack.push(dep);
            }
        }

        Ok(graph)
    }
}

/// Truncates an identifier to its first `max_depth` path segments.
///
/// `max_depth` of `0` disables truncation and returns the identifier
/// unchanged.
fn truncate(package: &str, max_depth: usize) -> &str {
    if max_depth == 0 {
        return package;
    }

    let mut segments = 0;
    for (pos, _) in package.match_indices('/') {
        segments += 1;
        if segments == max_depth {
            return &package[..pos];
        }
    }
    package
}
