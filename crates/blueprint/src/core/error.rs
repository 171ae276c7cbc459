//! Core error types for diagram declaration and rendering
//!
//! Errors fall into three groups: construction errors raised while a diagram
//! is being declared, the missing-renderer error raised when the layout engine
//! cannot be started, and everything else.

use std::path::PathBuf;
use thiserror::Error;

/// Core error types for diagram declaration and rendering
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Reference error in '{diagram}': '{name}' is not declared")]
    UnresolvedReference { diagram: String, name: String },

    #[error("Reference error in '{diagram}': '{name}' matches {count} declared nodes")]
    AmbiguousReference {
        diagram: String,
        name: String,
        count: usize,
    },

    #[error("Reference error in '{diagram}': handle belongs to a different diagram")]
    ForeignHandle { diagram: String },

    #[error("Scope error in '{diagram}': {message}")]
    UnbalancedScope { diagram: String, message: String },

    #[error("Edge in '{diagram}' targets cluster '{cluster}', which contains no nodes")]
    EmptyCluster { diagram: String, cluster: String },

    #[error("Output '{stem}' is declared by more than one diagram")]
    DuplicateOutput { stem: String },

    #[error("Title '{title}' is used by more than one diagram")]
    DuplicateTitle { title: String },

    #[error("Structural check failed for '{diagram}': {}", .issues.join("; "))]
    Lint {
        diagram: String,
        issues: Vec<String>,
    },

    #[error("Rendering engine '{}' is not available: {source}", .program.display())]
    MissingRenderer {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Render error for '{diagram}': exit status {status}: {stderr}")]
    RenderFailed {
        diagram: String,
        status: String,
        stderr: String,
    },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl DiagramError {
    /// Create a new unresolved reference error
    pub fn unresolved(diagram: &str, name: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            diagram: diagram.to_string(),
            name: name.into(),
        }
    }

    /// Create a new scope error
    pub fn unbalanced_scope(diagram: &str, message: impl Into<String>) -> Self {
        Self::UnbalancedScope {
            diagram: diagram.to_string(),
            message: message.into(),
        }
    }

    /// Create a new render error
    pub fn render_failed(diagram: &str, status: impl Into<String>, stderr: &str) -> Self {
        Self::RenderFailed {
            diagram: diagram.to_string(),
            status: status.into(),
            stderr: stderr.trim().to_string(),
        }
    }

    /// Returns true if the rendering capability itself is absent
    ///
    /// The driver reports these with installation guidance and stops cleanly;
    /// every other error is surfaced and propagated.
    pub fn is_missing_dependency(&self) -> bool {
        matches!(self, DiagramError::MissingRenderer { .. })
    }

    /// Returns true if the error was raised while declaring a diagram
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            DiagramError::UnresolvedReference { .. }
                | DiagramError::AmbiguousReference { .. }
                | DiagramError::ForeignHandle { .. }
                | DiagramError::UnbalancedScope { .. }
                | DiagramError::EmptyCluster { .. }
                | DiagramError::DuplicateOutput { .. }
                | DiagramError::DuplicateTitle { .. }
                | DiagramError::Lint { .. }
        )
    }
}
