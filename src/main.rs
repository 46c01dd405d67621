use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use regex::Regex;
use tracing::info;

use pkggraph::builder::GraphBuilder;
use pkggraph::export::{self, OutputFormat};
use pkggraph::resolver::GoSourceResolver;
use pkggraph::viewer;

#[derive(Parser)]
#[command(name = "pkggraph")]
#[command(version)]
#[command(about = "Renders a package's transitive import graph via Graphviz", long_about = None)]
struct Cli {
    /// Root packages to graph
    #[arg(required = true, value_name = "PACKAGE")]
    packages: Vec<String>,

    /// Only include packages matching this regular expression
    #[arg(long = "match", value_name = "REGEX", default_value = ".*")]
    match_pattern: String,

    /// Output format
    #[arg(short = 'T', long, value_name = "FORMAT", default_value = "svg")]
    format: OutputFormat,

    /// Collapse packages to their first N path segments (0 = disabled)
    #[arg(long, value_name = "N", default_value_t = 0)]
    max_depth: usize,

    /// Include test-only imports in the traversal
    #[arg(long)]
    include_tests: bool,

    /// Source root directory to search; may be repeated.
    /// Defaults to $GOPATH/src and $GOROOT/src when set.
    #[arg(long = "root", value_name = "DIR")]
    roots: Vec<PathBuf>,

    /// Print to standard output instead of opening a viewer
    #[arg(long)]
    stdout: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let pattern =
        Regex::new(&cli.match_pattern).context("invalid --match pattern")?;
    let roots = if cli.roots.is_empty() {
        default_roots()
    } else {
        cli.roots.clone()
    };

    let resolver = GoSourceResolver::new(roots);
    let graph = GraphBuilder::new()
        .filter(pattern)
        .max_depth(cli.max_depth)
        .include_test_imports(cli.include_tests)
        .build(&resolver, &cli.packages)
        .context("failed to build dependency graph")?;

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        cyclic = graph.has_cycles(),
        "dependency graph built"
    );

    // The text formats always go to stdout; only rendered SVG is handed to
    // the interactive viewer unless --stdout asks otherwise.
    if cli.stdout || cli.format != OutputFormat::Svg {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        export::export(cli.format, &graph, &mut lock).context("failed to encode graph")?;
        lock.flush()?;
    } else {
        let mut rendered = Vec::new();
        export::export(OutputFormat::Svg, &graph, &mut rendered)
            .context("failed to render graph")?;
        let path = viewer::open_svg(&rendered).context("failed to open viewer")?;
        info!(path = %path.display(), "opened rendered graph");
    }

    Ok(())
}

/// Source roots used when no --root flag is given: every `$GOPATH` entry's
/// `src` directory (or `~/go/src`), then `$GOROOT/src`, falling back to the
/// current directory.
fn default_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();

    if let Some(gopath) = env::var_os("GOPATH") {
        for entry in env::split_paths(&gopath) {
            roots.push(entry.join("src"));
        }
    } else if let Some(home) = env::var_os("HOME") {
        roots.push(PathBuf::from(home).join("go").join("src"));
    }
    if let Some(goroot) = env::var_os("GOROOT") {
        roots.push(PathBuf::from(goroot).join("src"));
    }

    if roots.is_empty() {
        roots.push(PathBuf::from("."));
    }
    roots
}
