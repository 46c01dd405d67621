//! Filesystem resolver for Go source trees.
//!
//! Locates a package as a directory under one of a list of source roots and
//! extracts its import paths from the declaration clauses of its `.go`
//! files. Imports found only in `_test.go` files are reported separately.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::{ResolveError, ResolveResult, ResolvedImports, Resolver};

/// Reserved pseudo-namespace that the toolchain stores under `vendor/`.
const VENDORED_PREFIX: &str = "golang_org";

fn single_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*import\s+(?:[\w.]+\s+)?"([^"]+)""#).expect("valid import pattern")
    })
}

fn block_entry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^\s*(?:[\w.]+\s+)?"([^"]+)""#).expect("valid import pattern"))
}

fn block_open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*import\s*\(").expect("valid import pattern"))
}

/// A [`Resolver`] that scans Go package directories for import clauses.
///
/// Packages are located by joining the package identifier onto each source
/// root in turn; the first root containing a matching directory wins. The
/// reserved `golang_org` pseudo-namespace is rewritten onto the `vendor/`
/// path prefix during location, while the resolved identifier reported to
/// callers stays as requested.
///
/// # Example
///
/// ```no_run
/// use pkggraph::resolver::{GoSourceResolver, Resolver};
///
/// let resolver = GoSourceResolver::new(vec!["/go/src".into()]);
/// let resolved = resolver.resolve("net/http")?;
/// println!("{} imports", resolved.imports.len());
/// # Ok::<(), pkggraph::resolver::ResolveError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GoSourceResolver {
    roots: Vec<PathBuf>,
}

impl GoSourceResolver {
    /// Creates a resolver searching the given source roots, in order.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    fn locate(&self, package: &str) -> Option<PathBuf> {
        let relative = if package.starts_with(VENDORED_PREFIX) {
            Path::new("vendor").join(package)
        } else {
            PathBuf::from(package)
        };

        self.roots
            .iter()
            .map(|root| root.join(&relative))
            .find(|dir| dir.is_dir())
    }
}

/// Reads a package directory's `.go` files and collects their imports,
/// splitting test-file imports out.
fn scan_dir(dir: &Path, package: &str) -> ResolveResult<ResolvedImports> {
    let mut sources: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "go"))
        .collect();
    // Deterministic import order regardless of directory listing order.
    sources.sort();

    if sources.is_empty() {
        return Err(ResolveError::NoSources(package.to_string()));
    }

    let mut resolved = ResolvedImports::default();
    let mut seen = HashSet::new();
    let mut seen_test = HashSet::new();

    for path in &sources {
        let is_test = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with("_test.go"));
        let content = fs::read_to_string(path)?;

        for import in parse_imports(&content) {
            if is_test {
                if seen_test.insert(import.clone()) {
                    resolved.test_imports.push(import);
                }
            } else if seen.insert(import.clone()) {
                resolved.imports.push(import);
            }
        }
    }

    debug!(
        package = %package,
        imports = resolved.imports.len(),
        test_imports = resolved.test_imports.len(),
        "scanned package directory"
    );
    Ok(resolved)
}

impl Resolver for GoSourceResolver {
    fn resolve(&self, package: &str) -> ResolveResult<ResolvedImports> {
        let dir = self
            .locate(package)
            .ok_or_else(|| ResolveError::NotFound(package.to_string()))?;
        scan_dir(&dir, package)
    }
}

/// Extracts import paths from Go source text, in declaration order.
///
/// Handles single-form clauses (`import "fmt"`, `import f "fmt"`) and
/// grouped clauses (`import ( ... )`). Line comments are skipped.
fn parse_imports(content: &str) -> Vec<String> {
    let mut imports = Vec::new();
    let mut in_block = false;

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("//") {
            continue;
        }

        if in_block {
            if trimmed.starts_with(')') {
                in_block = false;
            } else if let Some(caps) = block_entry_re().captures(line) {
                imports.push(caps[1].to_string());
            }
            continue;
        }

        if block_open_re().is_match(line) {
            in_block = true;
        } else if let Some(caps) = single_import_re().captures(line) {
            imports.push(caps[1].to_string());
        }
    }

    imports
}
