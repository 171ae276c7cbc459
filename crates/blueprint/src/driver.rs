//! Composition driver
//!
//! Runs every catalog entry in order: declare, check, render. Progress goes to
//! a caller-supplied writer. The run stops at the first failure; files that
//! were already written stay on disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use crossterm::style::{Color, Stylize};
use tracing::{error, info, span, warn, Level};

use crate::catalog::{self, CatalogEntry};
use crate::core::{check, check_unique_outputs, DiagramError};
use crate::render::{renderer_for, OutputFormat, Renderer};

/// Installation hints printed when the layout engine is missing
pub const INSTALL_GUIDANCE: [(&str, &str); 3] = [
    ("macOS", "brew install graphviz"),
    ("Ubuntu", "apt-get install graphviz"),
    ("Windows", "choco install graphviz"),
];

/// How a run ended, when it did not fail outright
#[derive(Debug)]
pub enum RunOutcome {
    /// Every diagram was written; paths in generation order
    Completed(Vec<PathBuf>),
    /// The layout engine could not be started; guidance was printed
    MissingDependency(DiagramError),
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }
}

/// Settings for a generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Directory the files are written into
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    /// Layout engine executable; `None` means `$BLUEPRINT_DOT` or `dot`
    pub program: Option<PathBuf>,
    /// Colour the banners
    pub color: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            format: OutputFormat::default(),
            program: None,
            color: false,
        }
    }
}

impl DriverConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = Some(program.into());
        self
    }

    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Driver over the full catalog with these settings
    pub fn into_driver(self) -> Driver {
        self.into_driver_for(catalog::entries())
    }

    /// Driver over `entries` with these settings
    pub fn into_driver_for(self, entries: Vec<CatalogEntry>) -> Driver {
        let renderer = renderer_for(self.format, self.program);
        Driver::with_entries(renderer, self.output_dir, entries).color(self.color)
    }
}

/// Drives the full generation run
pub struct Driver {
    renderer: Box<dyn Renderer>,
    output_dir: PathBuf,
    entries: Vec<CatalogEntry>,
    color: bool,
}

impl Driver {
    /// Driver over the full catalog, writing into `output_dir`
    pub fn new(renderer: Box<dyn Renderer>, output_dir: impl Into<PathBuf>) -> Self {
        Self::with_entries(renderer, output_dir, catalog::entries())
    }

    /// Driver over a custom list of entries
    pub fn with_entries(
        renderer: Box<dyn Renderer>,
        output_dir: impl Into<PathBuf>,
        entries: Vec<CatalogEntry>,
    ) -> Self {
        Self {
            renderer,
            output_dir: output_dir.into(),
            entries,
            color: false,
        }
    }

    /// Colour the banners with ANSI escapes
    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }

    /// Run every entry, classifying failures
    ///
    /// A missing layout engine is reported with installation guidance and
    /// returned as [`RunOutcome::MissingDependency`]. Any other failure is
    /// reported and then returned as `Err`.
    pub fn run(&self, out: &mut dyn Write) -> Result<RunOutcome, DiagramError> {
        let run_span = span!(
            Level::INFO,
            "generate_all",
            count = self.entries.len(),
            format = %self.renderer.format()
        );
        let _enter = run_span.enter();

        match self.generate(out) {
            Ok(paths) => Ok(RunOutcome::Completed(paths)),
            Err(e) if e.is_missing_dependency() => {
                warn!(error = %e, "Layout engine unavailable");
                if let Err(write_error) = self.report_missing_dependency(out, &e) {
                    warn!(error = %write_error, "Could not print installation guidance");
                }
                Ok(RunOutcome::MissingDependency(e))
            }
            Err(e) => {
                error!(error = %e, "Diagram generation failed");
                let banner =
                    self.paint(&format!("❌ Error generating diagrams: {}", e), Color::Red);
                if let Err(write_error) = writeln!(out, "{}", banner) {
                    warn!(error = %write_error, "Could not print the failure banner");
                }
                Err(e)
            }
        }
    }

    fn generate(&self, out: &mut dyn Write) -> Result<Vec<PathBuf>, DiagramError> {
        let headers: Vec<_> = self.entries.iter().map(CatalogEntry::header).collect();
        let stems: Vec<String> = headers.iter().map(|h| h.stem()).collect();
        check_unique_outputs(
            headers
                .iter()
                .map(|h| h.title())
                .zip(stems.iter().map(String::as_str)),
        )?;

        writeln!(out, "Generating diagrams...")?;
        writeln!(out, "This may take a minute...")?;

        let mut paths = Vec::with_capacity(self.entries.len());
        for (index, entry) in self.entries.iter().enumerate() {
            writeln!(out)?;
            writeln!(out, "{}. Generating {}...", index + 1, entry.description)?;

            let diagram = entry.build()?;
            check(&diagram)?;
            let path = self.renderer.render(&diagram, &self.output_dir)?;

            info!(step = index + 1, path = %path.display(), "Diagram generated");
            writeln!(out, "   ✓ {}", display_name(&path))?;
            paths.push(path);
        }

        writeln!(out)?;
        writeln!(
            out,
            "{}",
            self.paint("✅ All diagrams generated successfully!", Color::Green)
        )?;
        writeln!(out)?;
        writeln!(out, "Generated files:")?;
        for path in &paths {
            writeln!(out, "  - {}", display_name(path))?;
        }
        writeln!(out)?;
        writeln!(out, "You can now use these in your documentation!")?;

        Ok(paths)
    }

    fn report_missing_dependency(
        &self,
        out: &mut dyn Write,
        error: &DiagramError,
    ) -> std::io::Result<()> {
        writeln!(out)?;
        writeln!(
            out,
            "{}",
            self.paint("❌ Error: Graphviz is not installed or not usable", Color::Red)
        )?;
        writeln!(out, "   {}", error)?;
        writeln!(out)?;
        writeln!(out, "Please install Graphviz:")?;
        for (platform, command) in INSTALL_GUIDANCE {
            writeln!(out, "  {}: {}", platform, command)?;
        }
        writeln!(out)?;
        writeln!(
            out,
            "Or point {} at an existing 'dot' executable.",
            crate::render::DOT_PROGRAM_ENV
        )?;
        Ok(())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
