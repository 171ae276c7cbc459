//! The five documentation diagrams
//!
//! Each module exposes `builder()`, which fixes the diagram's title, output
//! stem, direction and graph style, and `declare()`, which populates a
//! builder with the literal topology.

pub mod architecture;
pub mod consistency;
pub mod data_flow;
pub mod interaction;
pub mod multi_region;

use tracing::{debug, span, Level};

use crate::core::{Diagram, DiagramBuilder, DiagramError};

/// One named diagram of the generation run
#[derive(Clone, Copy)]
pub struct CatalogEntry {
    /// Human-readable name used in progress messages
    pub description: &'static str,
    builder: fn() -> DiagramBuilder,
    declare: fn(&mut DiagramBuilder) -> Result<(), DiagramError>,
}

impl CatalogEntry {
    pub const fn new(
        description: &'static str,
        builder: fn() -> DiagramBuilder,
        declare: fn(&mut DiagramBuilder) -> Result<(), DiagramError>,
    ) -> Self {
        Self {
            description,
            builder,
            declare,
        }
    }

    /// A builder with this entry's header but no declarations yet
    pub fn header(&self) -> DiagramBuilder {
        (self.builder)()
    }

    /// Declare the full diagram
    pub fn build(&self) -> Result<Diagram, DiagramError> {
        let mut builder = self.header();
        let build_span = span!(Level::DEBUG, "declare_diagram", title = builder.title());
        let _enter = build_span.enter();

        (self.declare)(&mut builder)?;
        debug!(description = self.description, "Declaration complete");
        builder.finish()
    }
}

impl std::fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// All diagrams, in generation order
pub fn entries() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new(
            "high-level architecture",
            architecture::builder,
            architecture::declare,
        ),
        CatalogEntry::new(
            "multi-region architecture",
            multi_region::builder,
            multi_region::declare,
        ),
        CatalogEntry::new("data flow diagram", data_flow::builder, data_flow::declare),
        CatalogEntry::new(
            "consistency workflow",
            consistency::builder,
            consistency::declare,
        ),
        CatalogEntry::new(
            "component interaction",
            interaction::builder,
            interaction::declare,
        ),
    ]
}

/// Declare every diagram in the catalog
pub fn build_all() -> Result<Vec<Diagram>, DiagramError> {
    entries().iter().map(CatalogEntry::build).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{check, check_unique_outputs, Direction, EdgeStyle};

    #[test]
    fn test_every_diagram_builds_and_lints_clean() {
        for diagram in build_all().unwrap() {
            check(&diagram).unwrap();
            assert!(diagram.node_count() > 0, "{} has no nodes", diagram.title());
            assert!(diagram.edge_count() > 0, "{} has no edges", diagram.title());
        }
    }

    #[test]
    fn test_stems_and_titles_are_unique() {
        let headers: Vec<_> = entries().iter().map(|e| e.header()).collect();
        let stems: Vec<String> = headers.iter().map(|h| h.stem()).collect();
        check_unique_outputs(headers.iter().map(|h| h.title()).zip(stems.iter().map(String::as_str)))
            .unwrap();
    }

    #[test]
    fn test_generation_order() {
        let stems: Vec<String> = entries().iter().map(|e| e.header().stem()).collect();
        assert_eq!(
            stems,
            [
                "architecture",
                "multi_region",
                "data_flow",
                "consistency_workflow",
                "component_interaction"
            ]
        );
    }

    #[test]
    fn test_architecture_shape() {
        let d = entries()[0].build().unwrap();
        assert_eq!(d.direction(), Direction::TopBottom);
        assert_eq!(d.node_count(), 21);
        assert_eq!(d.cluster_count(), 9);
        assert_eq!(d.edge_count(), 23);

        let regional = d.find_cluster("Regional Caches").unwrap();
        let storage = d.find_cluster("Storage Layer - Multi-Region").unwrap();
        assert_eq!(d.cluster(regional).unwrap().parent, Some(storage));
        assert_eq!(d.nodes_labeled("Cache Updater").len(), 2);

        let cloudwatch = d.nodes_labeled("CloudWatch\nMetrics & Alarms")[0];
        assert_eq!(d.edges_to(cloudwatch).count(), 3);
    }

    #[test]
    fn test_multi_region_replication_is_dotted() {
        let d = entries()[1].build().unwrap();
        assert_eq!(d.direction(), Direction::LeftRight);
        assert_eq!(d.node_count(), 18);
        let dotted: Vec<_> = d
            .edges()
            .iter()
            .filter(|e| e.style == EdgeStyle::Dotted)
            .collect();
        assert_eq!(dotted.len(), 2);
        assert!(dotted
            .iter()
            .all(|e| e.label.as_deref() == Some("replicate\n< 1 sec")));
        assert_eq!(d.edge_count(), 22);
    }

    #[test]
    fn test_data_flow_labels_are_numbered() {
        let d = entries()[2].build().unwrap();
        let labels: Vec<&str> = d.edges().iter().filter_map(|e| e.label.as_deref()).collect();
        assert_eq!(labels.len(), 9);
        assert!(labels[0].starts_with("1. MQTT"));
        assert!(labels[8].starts_with("8. Gremlin"));
        assert_eq!(d.cluster_count(), 6);
        assert!(d.clusters().iter().all(|c| c.name.starts_with(char::is_numeric)));
    }

    #[test]
    fn test_consistency_has_threshold_edge() {
        let d = entries()[3].build().unwrap();
        assert!(d
            .edges()
            .iter()
            .any(|e| e.label.as_deref() == Some("4. If drift > 100m")));
        let detector = d.nodes_labeled("Drift Detector\nGeofence Algorithm")[0];
        // four caches, the corrector, and monitoring
        assert_eq!(d.edges_from(detector).count(), 6);
    }

    #[test]
    fn test_interaction_overrides_font_size() {
        let d = entries()[4].build().unwrap();
        assert_eq!(d.style().font_size, Some(14));
        assert_eq!(d.direction(), Direction::LeftRight);
        assert_eq!(d.cluster_count(), 7);
        assert_eq!(d.edge_count(), 15);
    }

    #[test]
    fn test_rebuilding_is_structurally_identical() {
        assert_eq!(build_all().unwrap(), build_all().unwrap());
    }
}
