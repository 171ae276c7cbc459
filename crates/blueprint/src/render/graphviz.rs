//! Graphviz-backed renderers
//!
//! [`GraphvizRenderer`] pipes the DOT document into the `dot` executable.
//! [`DotSourceRenderer`] writes the DOT document itself.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info, span, warn, Level};

use super::{to_dot, OutputFormat, Renderer};
use crate::core::{Diagram, DiagramError};

/// Environment variable overriding the Graphviz executable
pub const DOT_PROGRAM_ENV: &str = "BLUEPRINT_DOT";

/// Renderer that shells out to Graphviz `dot`
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    program: PathBuf,
    format: OutputFormat,
}

impl GraphvizRenderer {
    /// PNG output via `dot` (or `$BLUEPRINT_DOT`)
    pub fn new() -> Self {
        Self::with_format(OutputFormat::Png)
    }

    pub fn with_format(format: OutputFormat) -> Self {
        let program = std::env::var_os(DOT_PROGRAM_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("dot"));
        Self { program, format }
    }

    /// Use a specific executable
    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn program_path(&self) -> &Path {
        &self.program
    }

    fn spawn_error(&self, source: io::Error) -> DiagramError {
        match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                DiagramError::MissingRenderer {
                    program: self.program.clone(),
                    source,
                }
            }
            _ => DiagramError::IoError { source },
        }
    }

    /// Ask the engine for its version string
    ///
    /// Fails with [`DiagramError::MissingRenderer`] if it cannot be started.
    pub fn probe(&self) -> Result<String, DiagramError> {
        let output = Command::new(&self.program)
            .arg("-V")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))?;
        // `dot -V` reports on stderr.
        let text = if output.stderr.is_empty() {
            String::from_utf8_lossy(&output.stdout)
        } else {
            String::from_utf8_lossy(&output.stderr)
        };
        Ok(text.trim().to_string())
    }
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for GraphvizRenderer {
    fn format(&self) -> OutputFormat {
        self.format
    }

    fn render(&self, diagram: &Diagram, out_dir: &Path) -> Result<PathBuf, DiagramError> {
        let render_span = span!(Level::INFO, "render_graphviz", stem = diagram.stem());
        let _enter = render_span.enter();

        let source = to_dot(diagram);
        let path = self.output_path(diagram, out_dir);
        debug!(
            program = %self.program.display(),
            format = %self.format,
            dot_len = source.len(),
            "Spawning layout engine"
        );

        let mut child = Command::new(&self.program)
            .arg(format!("-T{}", self.format.extension()))
            .arg("-o")
            .arg(&path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(source.as_bytes()),
            None => Ok(()),
        };

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let status = output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %status, "Layout engine failed");
            return Err(DiagramError::render_failed(diagram.title(), status, &stderr));
        }
        write_result?;

        info!(path = %path.display(), "Rendered diagram");
        Ok(path)
    }
}

/// Renderer that writes the DOT source without invoking a layout engine
#[derive(Debug, Clone, Default)]
pub struct DotSourceRenderer;

impl DotSourceRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DotSourceRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Dot
    }

    fn render(&self, diagram: &Diagram, out_dir: &Path) -> Result<PathBuf, DiagramError> {
        let path = self.output_path(diagram, out_dir);
        fs::write(&path, to_dot(diagram))?;
        info!(path = %path.display(), "Wrote DOT source");
        Ok(path)
    }
}

/// Pick the renderer for a format
pub fn renderer_for(format: OutputFormat, program: Option<PathBuf>) -> Box<dyn Renderer> {
    match (format, program) {
        (OutputFormat::Dot, _) => Box::new(DotSourceRenderer::new()),
        (format, Some(program)) => Box::new(GraphvizRenderer::with_format(format).program(program)),
        (format, None) => Box::new(GraphvizRenderer::with_format(format)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DiagramBuilder, NodeKind};
    use tempfile::tempdir;

    fn tiny() -> Diagram {
        let mut b = DiagramBuilder::new("Tiny").filename("tiny");
        let a = b.node(NodeKind::Compute, "A");
        let c = b.node(NodeKind::Cache, "C");
        b.link(a, c).unwrap();
        b.finish().unwrap()
    }

    #[test]
    fn test_missing_program_is_a_missing_dependency() {
        let dir = tempdir().unwrap();
        let renderer = GraphvizRenderer::new().program(dir.path().join("no-such-dot"));
        let err = renderer.render(&tiny(), dir.path()).unwrap_err();
        assert!(err.is_missing_dependency(), "got {err:?}");
        assert!(!dir.path().join("tiny.png").exists());
    }

    #[test]
    fn test_probe_reports_missing_program() {
        let renderer = GraphvizRenderer::new().program("/nonexistent/bin/dot");
        assert!(renderer.probe().unwrap_err().is_missing_dependency());
    }

    #[test]
    fn test_dot_source_renderer_writes_file() {
        let dir = tempdir().unwrap();
        let path = DotSourceRenderer::new().render(&tiny(), dir.path()).unwrap();
        assert_eq!(path, dir.path().join("tiny.dot"));
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, to_dot(&tiny()));
    }

    #[test]
    fn test_dot_source_renderer_overwrites() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("tiny.dot");
        fs::write(&target, "stale").unwrap();
        DotSourceRenderer::new().render(&tiny(), dir.path()).unwrap();
        assert_ne!(fs::read_to_string(&target).unwrap(), "stale");
    }

    #[test]
    fn test_dot_source_renderer_missing_directory_is_unclassified() {
        let dir = tempdir().unwrap();
        let err = DotSourceRenderer::new()
            .render(&tiny(), &dir.path().join("absent"))
            .unwrap_err();
        assert!(matches!(err, DiagramError::IoError { .. }));
        assert!(!err.is_missing_dependency());
    }

    #[test]
    fn test_renderer_for_format() {
        assert_eq!(renderer_for(OutputFormat::Dot, None).format(), OutputFormat::Dot);
        assert_eq!(renderer_for(OutputFormat::Svg, None).format(), OutputFormat::Svg);
        assert_eq!(
            renderer_for(OutputFormat::Pdf, Some(PathBuf::from("/opt/dot"))).format(),
            OutputFormat::Pdf
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_engine_is_a_render_error() {
        let renderer = GraphvizRenderer::new().program("false");
        let dir = tempdir().unwrap();
        let err = renderer.render(&tiny(), dir.path()).unwrap_err();
        assert!(matches!(err, DiagramError::RenderFailed { .. }), "got {err:?}");
        assert!(!err.is_missing_dependency());
    }
}
