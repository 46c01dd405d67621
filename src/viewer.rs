//! Interactive viewer sink.
//!
//! Writes rendered bytes to a temporary file and hands the file to the
//! platform's default opener, so the browser can display the graph.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Errors that can occur while opening the viewer.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// The temporary file could not be created or written.
    #[error("failed to write viewer file: {0}")]
    TempFile(#[from] std::io::Error),

    /// The platform opener could not be launched.
    #[error("unable to open viewer: {0}")]
    Launch(std::io::Error),
}

/// Result type alias for viewer operations.
pub type ViewerResult<T> = Result<T, ViewerError>;

/// Writes `bytes` to a persisted temporary `.svg` file and opens it with
/// the platform viewer.
///
/// The file is deliberately not deleted on exit: the viewer is launched
/// asynchronously and reads the file after this process may have finished.
///
/// Returns the path of the written file.
pub fn open_svg(bytes: &[u8]) -> ViewerResult<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix("pkggraph-")
        .suffix(".svg")
        .tempfile()?;
    file.write_all(bytes)?;
    let (_, path) = file.keep().map_err(|e| ViewerError::TempFile(e.error))?;

    open_path(&path)?;
    Ok(path)
}

/// Opens a file with the platform's default opener.
///
/// Uses platform-specific commands:
/// - macOS: `open`
/// - Windows: `start`
/// - Linux: `xdg-open`
fn open_path(path: &Path) -> ViewerResult<()> {
    let result = if cfg!(target_os = "macos") {
        Command::new("open").arg(path).spawn()
    } else if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start"]).arg(path).spawn()
    } else {
        Command::new("xdg-open").arg(path).spawn()
    };

    result.map(|_| ()).map_err(ViewerError::Launch)
}
