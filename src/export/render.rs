//! Rendered-image encoder.
//!
//! Delegates to the external Graphviz `dot` binary: the graph-description
//! text is written into the renderer's stdin from a worker thread while the
//! calling thread drains the rendered bytes from its stdout. The two sides
//! must run concurrently - the renderer may start emitting output before it
//! has consumed all input, and its input pipe has bounded capacity, so a
//! sequential write-then-read would deadlock on large graphs.
//!
//! A hung renderer is not timed out; the wait blocks indefinitely. This is
//! a known limitation.

use std::io::{self, Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use crate::export::dot::write_dot;
use crate::graph::DependencyGraph;

/// Name of the external renderer binary.
const DOT_BINARY: &str = "dot";

/// Errors that can occur while rendering through the external renderer.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The renderer binary could not be launched.
    #[error("failed to launch the renderer (is graphviz installed?): {0}")]
    Spawn(io::Error),

    /// Writing the graph description into the renderer failed.
    #[error("failed to write graph into the renderer: {0}")]
    Stdin(io::Error),

    /// Reading the rendered output failed.
    #[error("failed to read renderer output: {0}")]
    Stdout(io::Error),

    /// The renderer exited with a non-zero status.
    #[error("renderer exited with {0}")]
    Exited(ExitStatus),

    /// Waiting on the renderer process failed.
    #[error("failed to wait for the renderer: {0}")]
    Wait(io::Error),
}

/// Result type alias for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Renders the graph to SVG via the external `dot` binary.
pub fn render_svg<W: Write>(graph: &DependencyGraph, writer: &mut W) -> RenderResult<()> {
    render(graph, "svg", writer)
}

/// Renders the graph to the given Graphviz target format (`-T<target>`).
///
/// The renderer's stderr is inherited so its diagnostics reach the user
/// unmodified.
pub fn render<W: Write>(graph: &DependencyGraph, target: &str, writer: &mut W) -> RenderResult<()> {
    let mut payload = Vec::new();
    write_dot(graph, &mut payload).map_err(RenderError::Stdin)?;
    pipe_through(DOT_BINARY, &[format!("-T{target}")], payload, writer)
}

/// Pipes `payload` through a subprocess, copying its stdout into `writer`.
///
/// The payload is written from a worker thread that owns the child's stdin
/// handle; dropping the handle when the thread returns closes the pipe on
/// every exit path, including write failure, so the child never blocks
/// waiting for more input.
fn pipe_through<W: Write>(
    binary: &str,
    args: &[String],
    payload: Vec<u8>,
    writer: &mut W,
) -> RenderResult<()> {
    let mut child = Command::new(binary)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(RenderError::Spawn)?;

    let mut stdin = child.stdin.take().ok_or_else(|| {
        RenderError::Stdin(io::Error::new(io::ErrorKind::BrokenPipe, "stdin not captured"))
    })?;
    let mut stdout = child.stdout.take().ok_or_else(|| {
        RenderError::Stdout(io::Error::new(io::ErrorKind::BrokenPipe, "stdout not captured"))
    })?;

    let feeder = thread::spawn(move || -> io::Result<()> {
        stdin.write_all(&payload)?;
        stdin.flush()
    });

    let drained = copy_output(&mut stdout, writer);
    if drained.is_err() {
        // The sink is gone but the child may be blocked writing into a
        // full stdout pipe nobody reads anymore. Close our end and kill
        // it so the wait below cannot block forever.
        drop(stdout);
        let _ = child.kill();
    }
    let fed = feeder.join().unwrap_or_else(|_| {
        Err(io::Error::new(io::ErrorKind::Other, "writer thread panicked"))
    });
    let status = child.wait().map_err(RenderError::Wait)?;

    // A failed drain is the sink's error and forced the kill above, so it
    // is reported first; otherwise the renderer's own failure takes
    // precedence, since a broken stdin pipe is usually a consequence of
    // it dying.
    drained.map_err(RenderError::Stdout)?;
    if !status.success() {
        return Err(RenderError::Exited(status));
    }
    fed.map_err(RenderError::Stdin)?;
    Ok(())
}

fn copy_output<R: Read, W: Write>(from: &mut R, to: &mut W) -> io::Result<()> {
    io::copy(from, to)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipe_through_passes_payload() {
        let payload = b"digraph {\n}\n".to_vec();
        let mut out = Vec::new();
        pipe_through("cat", &[], payload.clone(), &mut out).unwrap();
        assert_eq!(out, payload);
    }

    #[test]
    fn test_pipe_through_large_payload_does_not_deadlock() {
        // Well past the OS pipe buffer; fails by hanging if the write and
        // the drain are not concurrent.
        let payload = vec![b'x'; 4 * 1024 * 1024];
        let mut out = Vec::new();
        pipe_through("cat", &[], payload.clone(), &mut out).unwrap();
        assert_eq!(out.len(), payload.len());
    }

    #[test]
    fn test_pipe_through_missing_binary() {
        let mut out = Vec::new();
        let err = pipe_through(
            "pkggraph-no-such-renderer",
            &[],
            b"digraph {\n}\n".to_vec(),
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::Spawn(_)));
    }

    #[test]
    fn test_pipe_through_nonzero_exit() {
        let mut out = Vec::new();
        let err = pipe_through("false", &[], Vec::new(), &mut out).unwrap_err();
        assert!(matches!(err, RenderError::Exited(_)));
    }

    /// A sink that refuses every write, like a downstream pipe closing.
    struct ClosedSink;

    impl Write for ClosedSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_pipe_through_sink_error_terminates() {
        // `yes` emits output forever; if the child is not killed and
        // reaped after the sink error, this test hangs instead of
        // returning the error.
        let mut sink = ClosedSink;
        let err = pipe_through("yes", &[], Vec::new(), &mut sink).unwrap_err();
        assert!(matches!(err, RenderError::Stdout(_)));
    }
}
