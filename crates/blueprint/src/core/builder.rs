//! Scope-stack builder for declaring diagrams
//!
//! A [`DiagramBuilder`] keeps a stack of open containers. Nodes and clusters
//! attach to whatever container is on top of the stack; entering a cluster
//! pushes it, leaving pops back to the parent. Edges connect handles returned
//! by earlier declarations, so an edge can never name something that does not
//! exist yet.

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

use super::{
    Cluster, Diagram, DiagramError, Direction, Edge, EdgeDirection, EdgeStyle, Endpoint,
    GraphStyle, Node, NodeKind,
};

static NEXT_BUILDER: AtomicU64 = AtomicU64::new(0);

/// Handle to a declared node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    owner: u64,
    index: usize,
}

impl NodeId {
    /// Position of the node in the finished diagram
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Handle to a declared cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClusterId {
    owner: u64,
    index: usize,
}

impl ClusterId {
    /// Position of the cluster in the finished diagram
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Anything an edge may start or end on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Node(NodeId),
    Cluster(ClusterId),
}

impl From<NodeId> for EntityRef {
    fn from(id: NodeId) -> Self {
        EntityRef::Node(id)
    }
}

impl From<ClusterId> for EntityRef {
    fn from(id: ClusterId) -> Self {
        EntityRef::Cluster(id)
    }
}

/// Label and style applied to one or more edges
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeSpec {
    pub label: Option<String>,
    pub style: EdgeStyle,
    pub direction: EdgeDirection,
}

impl EdgeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Solid edge with a label
    pub fn labeled(label: impl Into<String>) -> Self {
        Self::new().label(label)
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn style(mut self, style: EdgeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn dotted(self) -> Self {
        self.style(EdgeStyle::Dotted)
    }

    pub fn direction(mut self, direction: EdgeDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn bidirectional(self) -> Self {
        self.direction(EdgeDirection::Both)
    }
}

/// Builder for a single diagram
///
/// Header settings (`filename`, `direction`, `style`) are chained before any
/// declaration; declarations then go through `&mut self`.
#[derive(Debug)]
pub struct DiagramBuilder {
    owner: u64,
    title: String,
    stem: Option<String>,
    direction: Direction,
    style: GraphStyle,
    nodes: Vec<Node>,
    clusters: Vec<Cluster>,
    edges: Vec<Edge>,
    scope: Vec<usize>,
    seq: usize,
}

impl DiagramBuilder {
    /// Start a diagram with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            owner: NEXT_BUILDER.fetch_add(1, Ordering::Relaxed),
            title: title.into(),
            stem: None,
            direction: Direction::default(),
            style: GraphStyle::default(),
            nodes: Vec::new(),
            clusters: Vec::new(),
            edges: Vec::new(),
            scope: Vec::new(),
            seq: 0,
        }
    }

    /// Set the output filename stem
    pub fn filename(mut self, stem: impl Into<String>) -> Self {
        self.stem = Some(stem.into());
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn style(mut self, style: GraphStyle) -> Self {
        self.style = style;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Output filename stem; derived from the title when not set
    pub fn stem(&self) -> String {
        self.stem
            .clone()
            .unwrap_or_else(|| self.title.to_lowercase().replace(' ', "_"))
    }

    /// Number of clusters currently open
    pub fn depth(&self) -> usize {
        self.scope.len()
    }

    fn next_seq(&mut self) -> usize {
        let seq = self.seq;
        self.seq += 1;
        seq
    }

    /// Declare a node in the current scope
    pub fn node(&mut self, kind: NodeKind, label: impl Into<String>) -> NodeId {
        let label = label.into();
        let parent = self.scope.last().copied();
        let seq = self.next_seq();
        trace!(node_label = %label, node_kind = %kind, ?parent, "Declaring node");
        self.nodes.push(Node {
            kind,
            label,
            parent,
            seq,
        });
        NodeId {
            owner: self.owner,
            index: self.nodes.len() - 1,
        }
    }

    /// Open a cluster inside the current scope and make it current
    pub fn enter_cluster(&mut self, name: impl Into<String>) -> ClusterId {
        let name = name.into();
        let parent = self.scope.last().copied();
        let seq = self.next_seq();
        trace!(cluster_name = %name, depth = self.scope.len(), "Entering cluster");
        self.clusters.push(Cluster { name, parent, seq });
        let index = self.clusters.len() - 1;
        self.scope.push(index);
        ClusterId {
            owner: self.owner,
            index,
        }
    }

    /// Close the current cluster, returning to its parent scope
    pub fn leave_cluster(&mut self) -> Result<ClusterId, DiagramError> {
        let index = self.scope.pop().ok_or_else(|| {
            DiagramError::unbalanced_scope(&self.title, "no open cluster to leave")
        })?;
        trace!(cluster_name = %self.clusters[index].name, "Leaving cluster");
        Ok(ClusterId {
            owner: self.owner,
            index,
        })
    }

    /// Declare a cluster and populate it inside `f`
    ///
    /// Whatever `f` returns is passed back, so handles declared inside the
    /// cluster can be used for edges afterwards.
    pub fn cluster<T>(
        &mut self,
        name: impl Into<String>,
        f: impl FnOnce(&mut Self) -> Result<T, DiagramError>,
    ) -> Result<T, DiagramError> {
        let id = self.enter_cluster(name);
        let value = f(self)?;
        let left = self.leave_cluster()?;
        if left != id {
            return Err(DiagramError::unbalanced_scope(
                &self.title,
                format!(
                    "cluster '{}' left while '{}' was still open",
                    self.clusters[id.index].name, self.clusters[left.index].name
                ),
            ));
        }
        Ok(value)
    }

    /// Find the node declared with exactly this label
    pub fn lookup(&self, label: &str) -> Result<NodeId, DiagramError> {
        let matches: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.label == label)
            .map(|(i, _)| i)
            .collect();
        match matches.as_slice() {
            [] => Err(DiagramError::unresolved(&self.title, label)),
            [index] => Ok(NodeId {
                owner: self.owner,
                index: *index,
            }),
            _ => Err(DiagramError::AmbiguousReference {
                diagram: self.title.clone(),
                name: label.to_string(),
                count: matches.len(),
            }),
        }
    }

    fn resolve(&self, entity: EntityRef) -> Result<Endpoint, DiagramError> {
        let (owner, endpoint) = match entity {
            EntityRef::Node(id) => (id.owner, Endpoint::Node(id.index)),
            EntityRef::Cluster(id) => (id.owner, Endpoint::Cluster(id.index)),
        };
        if owner != self.owner {
            return Err(DiagramError::ForeignHandle {
                diagram: self.title.clone(),
            });
        }
        if let Endpoint::Cluster(index) = endpoint {
            let anchored = self
                .nodes
                .iter()
                .any(|n| self.node_within(n.parent, index));
            if !anchored {
                return Err(DiagramError::EmptyCluster {
                    diagram: self.title.clone(),
                    cluster: self.clusters[index].name.clone(),
                });
            }
        }
        Ok(endpoint)
    }

    fn node_within(&self, mut parent: Option<usize>, cluster: usize) -> bool {
        while let Some(p) = parent {
            if p == cluster {
                return true;
            }
            parent = self.clusters[p].parent;
        }
        false
    }

    /// Record an edge `from -> to`
    pub fn connect(
        &mut self,
        from: impl Into<EntityRef>,
        to: impl Into<EntityRef>,
        spec: EdgeSpec,
    ) -> Result<(), DiagramError> {
        let from = self.resolve(from.into())?;
        let to = self.resolve(to.into())?;
        let seq = self.next_seq();
        trace!(?from, ?to, edge_label = ?spec.label, edge_style = %spec.style, "Declaring edge");
        self.edges.push(Edge {
            from,
            to,
            label: spec.label,
            style: spec.style,
            direction: spec.direction,
            seq,
        });
        Ok(())
    }

    /// Record an unlabeled solid edge
    pub fn link(
        &mut self,
        from: impl Into<EntityRef>,
        to: impl Into<EntityRef>,
    ) -> Result<(), DiagramError> {
        self.connect(from, to, EdgeSpec::default())
    }

    /// Record an edge between two nodes named by label
    pub fn connect_labels(
        &mut self,
        from: &str,
        to: &str,
        spec: EdgeSpec,
    ) -> Result<(), DiagramError> {
        let from = self.lookup(from)?;
        let to = self.lookup(to)?;
        self.connect(from, to, spec)
    }

    /// One edge from `from` to each target, all sharing `spec`
    pub fn fan_out<I, T>(
        &mut self,
        from: impl Into<EntityRef>,
        targets: I,
        spec: EdgeSpec,
    ) -> Result<(), DiagramError>
    where
        I: IntoIterator<Item = T>,
        T: Into<EntityRef>,
    {
        let from = from.into();
        for target in targets {
            self.connect(from, target, spec.clone())?;
        }
        Ok(())
    }

    /// One edge from each source to `to`, all sharing `spec`
    pub fn fan_in<I, T>(
        &mut self,
        sources: I,
        to: impl Into<EntityRef>,
        spec: EdgeSpec,
    ) -> Result<(), DiagramError>
    where
        I: IntoIterator<Item = T>,
        T: Into<EntityRef>,
    {
        let to = to.into();
        for source in sources {
            self.connect(source, to, spec.clone())?;
        }
        Ok(())
    }

    /// Unlabeled edges between consecutive entities: `a -> b -> c`
    pub fn chain<I, T>(&mut self, entities: I) -> Result<(), DiagramError>
    where
        I: IntoIterator<Item = T>,
        T: Into<EntityRef>,
    {
        let mut previous: Option<EntityRef> = None;
        for entity in entities {
            let entity = entity.into();
            if let Some(prev) = previous {
                self.link(prev, entity)?;
            }
            previous = Some(entity);
        }
        Ok(())
    }

    /// Close the declaration and produce the finished diagram
    pub fn finish(self) -> Result<Diagram, DiagramError> {
        if let Some(&open) = self.scope.last() {
            return Err(DiagramError::unbalanced_scope(
                &self.title,
                format!("cluster '{}' was never left", self.clusters[open].name),
            ));
        }
        let stem = self.stem();
        debug!(
            title = %self.title,
            stem = %stem,
            node_count = self.nodes.len(),
            cluster_count = self.clusters.len(),
            edge_count = self.edges.len(),
            "Diagram declared"
        );
        Ok(Diagram {
            title: self.title,
            stem,
            direction: self.direction,
            style: self.style,
            nodes: self.nodes,
            clusters: self.clusters,
            edges: self.edges,
        })
    }
}
