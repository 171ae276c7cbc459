//! Structural checks over a declared diagram
//!
//! Verifies, before anything is rendered, that every edge endpoint resolves
//! to an entity declared earlier in the same diagram, that containment is a
//! strict hierarchy, and that output names do not collide across a run.

use std::collections::HashSet;
use std::fmt;
use tracing::warn;

use super::{Diagram, DiagramError, Endpoint};

/// A single finding from [`lint`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintIssue {
    /// Edge endpoint index is outside the diagram
    DanglingEndpoint { edge: usize, endpoint: Endpoint },
    /// Edge references an entity declared after the edge itself
    ForwardReference { edge: usize, entity: String },
    /// Parent cluster index is outside the diagram or declared later
    InvalidParent { entity: String },
    /// Edge ends on a cluster with no nodes inside
    EmptyClusterEndpoint { edge: usize, cluster: String },
    /// Same endpoints, label, style and direction as an earlier edge
    DuplicateEdge { first: usize, second: usize },
}

impl LintIssue {
    /// Duplicates render as overlapping lines; everything else is fatal
    pub fn is_error(&self) -> bool {
        !matches!(self, LintIssue::DuplicateEdge { .. })
    }
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintIssue::DanglingEndpoint { edge, endpoint } => {
                write!(f, "edge #{} points at undeclared {:?}", edge, endpoint)
            }
            LintIssue::ForwardReference { edge, entity } => {
                write!(f, "edge #{} references '{}' before it is declared", edge, entity)
            }
            LintIssue::InvalidParent { entity } => {
                write!(f, "'{}' has an invalid parent cluster", entity)
            }
            LintIssue::EmptyClusterEndpoint { edge, cluster } => {
                write!(f, "edge #{} ends on empty cluster '{}'", edge, cluster)
            }
            LintIssue::DuplicateEdge { first, second } => {
                write!(f, "edge #{} duplicates edge #{}", second, first)
            }
        }
    }
}

fn endpoint_seq(diagram: &Diagram, endpoint: Endpoint) -> Option<usize> {
    match endpoint {
        Endpoint::Node(i) => diagram.node(i).map(|n| n.seq),
        Endpoint::Cluster(i) => diagram.cluster(i).map(|c| c.seq),
    }
}

fn parent_valid(diagram: &Diagram, parent: Option<usize>, seq: usize) -> bool {
    match parent {
        None => true,
        Some(p) => diagram.cluster(p).is_some_and(|c| c.seq < seq),
    }
}

/// Run every structural check and collect the findings
pub fn lint(diagram: &Diagram) -> Vec<LintIssue> {
    let mut issues = Vec::new();

    for node in diagram.nodes() {
        if !parent_valid(diagram, node.parent, node.seq) {
            issues.push(LintIssue::InvalidParent {
                entity: node.label.replace('\n', " "),
            });
        }
    }
    for cluster in diagram.clusters() {
        if !parent_valid(diagram, cluster.parent, cluster.seq) {
            issues.push(LintIssue::InvalidParent {
                entity: cluster.name.clone(),
            });
        }
    }

    for (index, edge) in diagram.edges().iter().enumerate() {
        for endpoint in [edge.from, edge.to] {
            match endpoint_seq(diagram, endpoint) {
                None => issues.push(LintIssue::DanglingEndpoint {
                    edge: index,
                    endpoint,
                }),
                Some(seq) if seq > edge.seq => issues.push(LintIssue::ForwardReference {
                    edge: index,
                    entity: diagram.endpoint_name(endpoint),
                }),
                Some(_) => {
                    if let Endpoint::Cluster(c) = endpoint {
                        if diagram.first_node_in(c).is_none() {
                            issues.push(LintIssue::EmptyClusterEndpoint {
                                edge: index,
                                cluster: diagram.endpoint_name(endpoint),
                            });
                        }
                    }
                }
            }
        }

        if let Some(first) = diagram.edges()[..index].iter().position(|earlier| {
            earlier.from == edge.from
                && earlier.to == edge.to
                && earlier.label == edge.label
                && earlier.style == edge.style
                && earlier.direction == edge.direction
        }) {
            issues.push(LintIssue::DuplicateEdge {
                first,
                second: index,
            });
        }
    }

    issues
}

/// Fail on any fatal finding; warnings are logged
pub fn check(diagram: &Diagram) -> Result<(), DiagramError> {
    let (errors, warnings): (Vec<_>, Vec<_>) =
        lint(diagram).into_iter().partition(LintIssue::is_error);

    for issue in &warnings {
        warn!(diagram = %diagram.title(), %issue, "Structural warning");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(DiagramError::Lint {
            diagram: diagram.title().to_string(),
            issues: errors.iter().map(ToString::to_string).collect(),
        })
    }
}

/// Ensure no two diagrams share a title or an output stem
pub fn check_unique_outputs<'a, I>(headers: I) -> Result<(), DiagramError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut titles = HashSet::new();
    let mut stems = HashSet::new();
    for (title, stem) in headers {
        if !stems.insert(stem) {
            return Err(DiagramError::DuplicateOutput {
                stem: stem.to_string(),
            });
        }
        if !titles.insert(title) {
            return Err(DiagramError::DuplicateTitle {
                title: title.to_string(),
            });
        }
    }
    Ok(())
}
