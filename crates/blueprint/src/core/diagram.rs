//! The declared node/cluster/edge tree
//!
//! A [`Diagram`] is the finished, immutable result of a declaration. Entities
//! are stored in declaration order and refer to each other by index; the
//! `seq` field on every entity records its position in the overall
//! declaration sequence so structural checks can tell what was declared
//! before what.

use super::{Direction, EdgeDirection, EdgeStyle, GraphStyle, NodeKind};

/// A single infrastructure component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// Display label, may span several lines
    pub label: String,
    /// Index of the enclosing cluster, `None` at the diagram root
    pub parent: Option<usize>,
    /// Position in the declaration sequence
    pub seq: usize,
}

/// A titled grouping of nodes and sub-clusters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub name: String,
    /// Index of the enclosing cluster, `None` at the diagram root
    pub parent: Option<usize>,
    pub seq: usize,
}

/// One end of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Node(usize),
    /// The boundary of a cluster
    Cluster(usize),
}

/// A relation between two declared entities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: Endpoint,
    pub to: Endpoint,
    pub label: Option<String>,
    pub style: EdgeStyle,
    pub direction: EdgeDirection,
    pub seq: usize,
}

/// A member of a scope, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member {
    Node(usize),
    Cluster(usize),
}

/// A complete diagram: header plus the full entity tree
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    pub(crate) title: String,
    pub(crate) stem: String,
    pub(crate) direction: Direction,
    pub(crate) style: GraphStyle,
    pub(crate) nodes: Vec<Node>,
    pub(crate) clusters: Vec<Cluster>,
    pub(crate) edges: Vec<Edge>,
}

impl Diagram {
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Output filename stem (no extension)
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Output file name for the given extension
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.stem, extension)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn style(&self) -> &GraphStyle {
        &self.style
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn cluster(&self, index: usize) -> Option<&Cluster> {
        self.clusters.get(index)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Indices of nodes carrying exactly this label
    pub fn nodes_labeled(&self, label: &str) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.label == label)
            .map(|(i, _)| i)
            .collect()
    }

    /// Index of the first cluster with this name
    pub fn find_cluster(&self, name: &str) -> Option<usize> {
        self.clusters.iter().position(|c| c.name == name)
    }

    /// Direct members of a scope (`None` is the root), in declaration order
    pub fn members(&self, scope: Option<usize>) -> Vec<Member> {
        let mut members: Vec<(usize, Member)> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent == scope)
            .map(|(i, n)| (n.seq, Member::Node(i)))
            .chain(
                self.clusters
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.parent == scope)
                    .map(|(i, c)| (c.seq, Member::Cluster(i))),
            )
            .collect();
        members.sort_by_key(|(seq, _)| *seq);
        members.into_iter().map(|(_, m)| m).collect()
    }

    /// Nesting depth of a cluster; top-level clusters have depth 0
    pub fn cluster_depth(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut current = self.clusters.get(index).and_then(|c| c.parent);
        while let Some(parent) = current {
            depth += 1;
            current = self.clusters.get(parent).and_then(|c| c.parent);
        }
        depth
    }

    /// Returns true if `node` sits somewhere inside `cluster`
    pub fn contains_node(&self, cluster: usize, node: usize) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(parent) = current {
            if parent == cluster {
                return true;
            }
            current = self.clusters.get(parent).and_then(|c| c.parent);
        }
        false
    }

    /// First node (in declaration order) anywhere inside a cluster
    pub fn first_node_in(&self, cluster: usize) -> Option<usize> {
        (0..self.nodes.len()).find(|&n| self.contains_node(cluster, n))
    }

    /// Edges leaving a node, in declaration order
    pub fn edges_from(&self, node: usize) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .filter(move |e| e.from == Endpoint::Node(node))
    }

    /// Edges arriving at a node, in declaration order
    pub fn edges_to(&self, node: usize) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.to == Endpoint::Node(node))
    }

    /// Returns true if any edge ends on a cluster boundary
    pub fn has_cluster_endpoints(&self) -> bool {
        self.edges.iter().any(|e| {
            matches!(e.from, Endpoint::Cluster(_)) || matches!(e.to, Endpoint::Cluster(_))
        })
    }

    /// Display name of an endpoint, for messages
    pub fn endpoint_name(&self, endpoint: Endpoint) -> String {
        match endpoint {
            Endpoint::Node(i) => self
                .nodes
                .get(i)
                .map(|n| n.label.replace('\n', " "))
                .unwrap_or_else(|| format!("<node {}>", i)),
            Endpoint::Cluster(i) => self
                .clusters
                .get(i)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("<cluster {}>", i)),
        }
    }
}
