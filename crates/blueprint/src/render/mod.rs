//! Rendering backends
//!
//! The rendering engine is an external collaborator: it receives a finished
//! [`Diagram`] and writes one file. Nothing comes back except the output path
//! or an error.

mod dot;
mod graphviz;

pub use dot::{escape, graph_attributes, to_dot};
pub use graphviz::*;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::{Diagram, DiagramError};

/// Output file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpg,
    Svg,
    Pdf,
    /// The DOT source itself, no layout engine involved
    Dot,
}

impl OutputFormat {
    /// File extension, also the Graphviz `-T` argument
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Svg => "svg",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Dot => "dot",
        }
    }

    /// Returns true if producing this format needs the layout engine
    pub fn needs_layout_engine(&self) -> bool {
        !matches!(self, OutputFormat::Dot)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Core trait for rendering backends
pub trait Renderer {
    /// Format of the files this renderer writes
    fn format(&self) -> OutputFormat;

    /// Write `diagram` into `out_dir`, returning the path of the new file
    ///
    /// An existing file of the same name is overwritten.
    fn render(&self, diagram: &Diagram, out_dir: &Path) -> Result<PathBuf, DiagramError>;

    /// Path the diagram will be written to
    fn output_path(&self, diagram: &Diagram, out_dir: &Path) -> PathBuf {
        out_dir.join(diagram.file_name(self.format().extension()))
    }
}
