//! Module resolution for dependency discovery.
//!
//! This module defines the [`Resolver`] trait the graph builder walks, a
//! filesystem-backed implementation for Go source trees, and an in-memory
//! [`TableResolver`] for tests and embedders.

use std::cell::RefCell;
use std::collections::HashMap;

mod source;

pub use source::GoSourceResolver;

/// Errors that can occur while resolving a package's imports.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The package directory was not found under any configured source root.
    #[error("cannot find package \"{0}\" in any source root")]
    NotFound(String),

    /// The package directory exists but contains no source files.
    #[error("no buildable source files in package \"{0}\"")]
    NoSources(String),

    /// A source file could not be read.
    #[error("failed to read package sources: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for resolver operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// The direct imports declared by a single package.
///
/// Both lists preserve declaration order and contain no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedImports {
    /// Imports declared by regular source files.
    pub imports: Vec<String>,
    /// Imports declared only by test files.
    pub test_imports: Vec<String>,
}

impl ResolvedImports {
    /// Creates a resolution result with no test imports.
    pub fn new<S: Into<String>>(imports: impl IntoIterator<Item = S>) -> Self {
        Self {
            imports: imports.into_iter().map(Into::into).collect(),
            test_imports: Vec::new(),
        }
    }

    /// Creates a resolution result with regular and test imports.
    pub fn with_tests<S: Into<String>>(
        imports: impl IntoIterator<Item = S>,
        test_imports: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            imports: imports.into_iter().map(Into::into).collect(),
            test_imports: test_imports.into_iter().map(Into::into).collect(),
        }
    }
}

/// Resolves a package identifier to its direct dependency identifiers.
///
/// Implementations act as an oracle for the graph builder: given an opaque
/// package identifier, return the ordered list of packages it imports.
/// Resolution failure is fatal to the whole build, so implementations
/// should only fail when the package genuinely cannot be resolved.
pub trait Resolver {
    /// Returns the direct imports of `package`.
    fn resolve(&self, package: &str) -> ResolveResult<ResolvedImports>;
}

/// An in-memory resolver backed by a fixed lookup table.
///
/// Useful for tests and for callers that have already computed the import
/// relation. Tracks how many times each package was resolved, so callers
/// can assert that shared dependencies are visited exactly once.
///
/// # Example
///
/// ```rust
/// use pkggraph::resolver::{Resolver, TableResolver};
///
/// let mut resolver = TableResolver::new();
/// resolver.insert("app", ["fmt", "io"]);
/// resolver.insert_leaf("fmt");
///
/// let resolved = resolver.resolve("app").unwrap();
/// assert_eq!(resolved.imports, vec!["fmt", "io"]);
/// assert!(resolver.resolve("missing").is_err());
/// ```
#[derive(Debug, Default)]
pub struct TableResolver {
    table: HashMap<String, ResolvedImports>,
    calls: RefCell<HashMap<String, usize>>,
}

impl TableResolver {
    /// Creates an empty table resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a package and its imports.
    pub fn insert<S: Into<String>>(&mut self, package: &str, imports: impl IntoIterator<Item = S>) {
        self.table
            .insert(package.to_string(), ResolvedImports::new(imports));
    }

    /// Registers a package with no imports.
    pub fn insert_leaf(&mut self, package: &str) {
        self.table
            .insert(package.to_string(), ResolvedImports::default());
    }

    /// Registers a package with regular and test-only imports.
    pub fn insert_with_tests<S: Into<String>>(
        &mut self,
        package: &str,
        imports: impl IntoIterator<Item = S>,
        test_imports: impl IntoIterator<Item = S>,
    ) {
        self.table.insert(
            package.to_string(),
            ResolvedImports::with_tests(imports, test_imports),
        );
    }

    /// Returns how many times `package` has been resolved.
    pub fn resolve_count(&self, package: &str) -> usize {
        self.calls.borrow().get(package).copied().unwrap_or(0)
    }
}

impl Resolver for TableResolver {
    fn resolve(&self, package: &str) -> ResolveResult<ResolvedImports> {
        *self
            .calls
            .borrow_mut()
            .entry(package.to_string())
            .or_insert(0) += 1;

        self.table
            .get(package)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(package.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_resolver_lookup() {
        let mut resolver = TableResolver::new();
        resolver.insert("app", ["libA", "libB"]);

        let resolved = resolver.resolve("app").unwrap();
        assert_eq!(resolved.imports, vec!["libA", "libB"]);
        assert!(resolved.test_imports.is_empty());
    }

    #[test]
    fn test_table_resolver_missing_package() {
        let resolver = TableResolver::new();
        let err = resolver.resolve("ghost").unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(_)));
    }

    #[test]
    fn test_table_resolver_counts_calls() {
        let mut resolver = TableResolver::new();
        resolver.insert("app", ["libA"]);

        assert_eq!(resolver.resolve_count("app"), 0);
        resolver.resolve("app").unwrap();
        resolver.resolve("app").unwrap();
        assert_eq!(resolver.resolve_count("app"), 2);
    }

    #[test]
    fn test_resolved_imports_with_tests() {
        let resolved = ResolvedImports::with_tests(["fmt"], ["testing"]);
        assert_eq!(resolved.imports, vec!["fmt"]);
        assert_eq!(resolved.test_imports, vec!["testing"]);
    }
}
