//! Blueprint - Architecture diagrams declared as code
//!
//! A library for declaring infrastructure diagrams as a tree of nodes, nested
//! clusters and edges, and rendering them through Graphviz.
//!
//! # Quick Start
//!
//! ```rust
//! use blueprint::prelude::*;
//!
//! let mut b = DiagramBuilder::new("Storage").direction(Direction::LeftRight);
//! let writer = b.node(NodeKind::Compute, "Writer");
//! let table = b.cluster("Storage Layer", |b| Ok(b.node(NodeKind::Database, "DynamoDB")))?;
//! b.connect(writer, table, EdgeSpec::labeled("PutItem"))?;
//!
//! let diagram = b.finish()?;
//! assert_eq!(diagram.stem(), "storage");
//!
//! let dot = blueprint::to_dot(&diagram);
//! assert!(dot.contains("subgraph cluster_0"));
//! # Ok::<(), blueprint::DiagramError>(())
//! ```
//!
//! # Generating the documentation set
//!
//! ```rust,no_run
//! use blueprint::{DriverConfig, OutputFormat};
//!
//! let driver = DriverConfig::new("docs/img").format(OutputFormat::Svg).into_driver();
//! let outcome = driver.run(&mut std::io::stdout())?;
//! # Ok::<(), blueprint::DiagramError>(())
//! ```

pub mod catalog;
pub mod core;
pub mod driver;
pub mod render;

pub use crate::core::*;
pub use driver::{Driver, DriverConfig, RunOutcome};
pub use render::{
    renderer_for, to_dot, DotSourceRenderer, GraphvizRenderer, OutputFormat, Renderer,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        ClusterId, Diagram, DiagramBuilder, DiagramError, Direction, EdgeDirection, EdgeSpec,
        EdgeStyle, GraphStyle, NodeId, NodeKind,
    };
    pub use crate::driver::{Driver, DriverConfig, RunOutcome};
    pub use crate::render::{OutputFormat, Renderer};
}

/// Declare every catalog diagram without rendering
///
/// # Example
/// ```rust
/// let diagrams = blueprint::build_all().unwrap();
/// assert_eq!(diagrams.len(), 5);
/// assert_eq!(diagrams[0].title(), "High-Level Architecture");
/// ```
pub fn build_all() -> Result<Vec<Diagram>, DiagramError> {
    catalog::build_all()
}

/// Render one catalog diagram, looked up by output stem, to DOT source
///
/// Returns `Ok(None)` if no diagram has that stem.
///
/// # Example
/// ```rust
/// let dot = blueprint::dot_for("data_flow").unwrap().unwrap();
/// assert!(dot.contains("1. MQTT"));
/// assert!(blueprint::dot_for("nope").unwrap().is_none());
/// ```
pub fn dot_for(stem: &str) -> Result<Option<String>, DiagramError> {
    for entry in catalog::entries() {
        if entry.header().stem() == stem {
            return entry.build().map(|d| Some(to_dot(&d)));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_all_in_order() {
        let titles: Vec<String> = build_all()
            .unwrap()
            .iter()
            .map(|d| d.title().to_string())
            .collect();
        assert_eq!(
            titles,
            [
                "High-Level Architecture",
                "Multi-Region Deployment",
                "Data Flow - Location Update",
                "Consistency Check & Self-Healing",
                "Component Interaction Map"
            ]
        );
    }

    #[test]
    fn test_dot_for_known_stem() {
        let dot = dot_for("consistency_workflow").unwrap().unwrap();
        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("4. If drift > 100m"));
    }

    #[test]
    fn test_dot_for_unknown_stem() {
        assert!(dot_for("missing").unwrap().is_none());
    }

    #[test]
    fn test_prelude_covers_declaration() {
        use crate::prelude::*;

        let mut b = DiagramBuilder::new("Prelude");
        let a = b.node(NodeKind::Actor, "User");
        let c = b.node(NodeKind::Compute, "API");
        b.connect(a, c, EdgeSpec::new().bidirectional()).unwrap();
        let d = b.finish().unwrap();
        assert_eq!(d.edges()[0].direction, EdgeDirection::Both);
    }
}
