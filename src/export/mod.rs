//! Output encodings for dependency graphs.
//!
//! This module provides the encoders that turn a [`DependencyGraph`] into
//! bytes: the Graphviz dot text format, a newline-delimited JSON stream,
//! and a rendered SVG produced by piping the dot text through the external
//! `dot` binary.

pub mod dot;
pub mod json;
pub mod render;

use crate::graph::DependencyGraph;
use std::io::{self, Write};

pub use render::RenderError;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Graphviz dot text - the graph-description format itself
    Dot,
    /// SVG image rendered by the external `dot` binary
    Svg,
    /// Newline-delimited JSON records, one per package
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dot" => Ok(OutputFormat::Dot),
            "svg" => Ok(OutputFormat::Svg),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Unknown output format: '{}'. Valid formats: dot, svg, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Dot => write!(f, "dot"),
            OutputFormat::Svg => write!(f, "svg"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Errors that can occur while encoding a graph.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Writing to the destination failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    /// The external renderer failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result type alias for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Encodes the graph in the requested format.
///
/// The graph is read-only during encoding; encoding the same graph twice
/// in the same format yields identical bytes.
pub fn export<W: Write>(
    format: OutputFormat,
    graph: &DependencyGraph,
    writer: &mut W,
) -> ExportResult<()> {
    match format {
        OutputFormat::Dot => dot::write_dot(graph, writer)?,
        OutputFormat::Json => json::write_json(graph, writer)?,
        OutputFormat::Svg => render::render_svg(graph, writer)?,
    }
    Ok(())
}

/// Encodes the graph to a string.
///
/// Intended for the text formats; an SVG payload is only valid UTF-8
/// because graphviz emits XML.
pub fn export_to_string(format: OutputFormat, graph: &DependencyGraph) -> ExportResult<String> {
    let mut buffer = Vec::new();
    export(format, graph, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| ExportError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("dot".parse::<OutputFormat>().unwrap(), OutputFormat::Dot);
        assert_eq!("SVG".parse::<OutputFormat>().unwrap(), OutputFormat::Svg);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("png".parse::<OutputFormat>().is_err());
        assert!("".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(format!("{}", OutputFormat::Dot), "dot");
        assert_eq!(format!("{}", OutputFormat::Svg), "svg");
        assert_eq!(format!("{}", OutputFormat::Json), "json");
    }

    #[test]
    fn test_export_to_string_dot() {
        let mut graph = DependencyGraph::new();
        graph.add_import("app", "libA");

        let out = export_to_string(OutputFormat::Dot, &graph).unwrap();
        assert!(out.starts_with("digraph {\n"));
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn test_built_graph_encodes_end_to_end() {
        use crate::builder::GraphBuilder;
        use crate::resolver::TableResolver;

        let mut resolver = TableResolver::new();
        resolver.insert("app", ["libA", "libB"]);
        resolver.insert("libA", ["libC"]);
        resolver.insert("libB", ["libC"]);
        resolver.insert_leaf("libC");

        let graph = GraphBuilder::new()
            .build(&resolver, &["app".to_string()])
            .unwrap();

        let dot_first = export_to_string(OutputFormat::Dot, &graph).unwrap();
        let dot_second = export_to_string(OutputFormat::Dot, &graph).unwrap();
        assert_eq!(dot_first, dot_second);
        assert_eq!(dot_first.matches("shape=box").count(), 4);
        assert_eq!(dot_first.matches("->").count(), 4);

        let json = export_to_string(OutputFormat::Json, &graph).unwrap();
        assert_eq!(json.lines().count(), 4);
    }
}
