//! Graphviz DOT emission
//!
//! Turns a declared [`Diagram`] into a DOT document. Output is deterministic:
//! nodes and clusters are emitted in declaration order with index-based ids,
//! and attribute lists are sorted by key.

use std::collections::BTreeMap;

use crate::core::{Diagram, EdgeDirection, Endpoint, Member};

const FONT: &str = "Sans-Serif";
const FONT_COLOR: &str = "#2D3436";
const EDGE_COLOR: &str = "#7B8894";
const CLUSTER_PEN: &str = "#AEB6BE";
const CLUSTER_BACKGROUNDS: [&str; 4] = ["#E5F5FD", "#EBF3E7", "#ECE8F6", "#FDF7E3"];

/// Escape text for use inside a double-quoted DOT string
///
/// Newlines become centred line breaks (`\n`).
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

fn attr_list<'a, I>(attrs: I) -> String
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    attrs
        .into_iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape(&v)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn node_id(index: usize) -> String {
    format!("n{}", index)
}

fn cluster_id(index: usize) -> String {
    format!("cluster_{}", index)
}

/// Graph attributes: renderer defaults, then the diagram's own style
pub fn graph_attributes(diagram: &Diagram) -> BTreeMap<String, String> {
    let mut attrs: BTreeMap<String, String> = [
        ("pad", "2.0"),
        ("splines", "ortho"),
        ("nodesep", "0.60"),
        ("ranksep", "0.75"),
        ("fontname", FONT),
        ("fontsize", "15"),
        ("fontcolor", FONT_COLOR),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    attrs.insert("label".to_string(), diagram.title().to_string());
    attrs.insert("rankdir".to_string(), diagram.direction().to_string());
    if diagram.has_cluster_endpoints() {
        // The orthogonal router ignores lhead/ltail clipping.
        attrs.insert("compound".to_string(), "true".to_string());
        attrs.insert("splines".to_string(), "spline".to_string());
    }
    attrs.extend(diagram.style().attributes());
    attrs
}

/// Render the diagram as a DOT document
pub fn to_dot(diagram: &Diagram) -> String {
    let mut out = String::new();
    let graph = graph_attributes(diagram);

    out.push_str(&format!("digraph \"{}\" {{\n", escape(diagram.title())));
    out.push_str(&format!(
        "\tgraph [{}]\n",
        attr_list(graph.iter().map(|(k, v)| (k.as_str(), v.clone())))
    ));
    out.push_str(&format!(
        "\tnode [{}]\n",
        attr_list([
            ("shape", "box".to_string()),
            ("style", "rounded,filled".to_string()),
            ("width", "1.4".to_string()),
            ("height", "1.0".to_string()),
            ("fontname", FONT.to_string()),
            ("fontsize", "13".to_string()),
            ("fontcolor", FONT_COLOR.to_string()),
        ])
    ));
    out.push_str(&format!("\tedge [color=\"{}\"]\n", EDGE_COLOR));

    write_scope(&mut out, diagram, None, 1);

    for edge in diagram.edges() {
        let (from, ltail) = anchor(diagram, edge.from);
        let (to, lhead) = anchor(diagram, edge.to);
        let mut attrs: Vec<(&str, String)> = Vec::new();
        if let Some(ref label) = edge.label {
            attrs.push(("label", label.clone()));
        }
        if !edge.style.is_default() {
            attrs.push(("style", edge.style.to_string()));
        }
        if edge.direction != EdgeDirection::Forward {
            attrs.push(("dir", edge.direction.to_string()));
        }
        if let Some(tail) = ltail {
            attrs.push(("ltail", tail));
        }
        if let Some(head) = lhead {
            attrs.push(("lhead", head));
        }
        if attrs.is_empty() {
            out.push_str(&format!("\t{} -> {}\n", from, to));
        } else {
            out.push_str(&format!("\t{} -> {} [{}]\n", from, to, attr_list(attrs)));
        }
    }

    out.push_str("}\n");
    out
}

/// Node id an edge attaches to, plus the cluster to clip at, if any
fn anchor(diagram: &Diagram, endpoint: Endpoint) -> (String, Option<String>) {
    match endpoint {
        Endpoint::Node(i) => (node_id(i), None),
        Endpoint::Cluster(c) => {
            // The builder refuses edges to empty clusters.
            let first = diagram.first_node_in(c).unwrap_or_default();
            (node_id(first), Some(cluster_id(c)))
        }
    }
}

fn write_scope(out: &mut String, diagram: &Diagram, scope: Option<usize>, depth: usize) {
    let indent = "\t".repeat(depth);
    for member in diagram.members(scope) {
        match member {
            Member::Node(i) => {
                let node = &diagram.nodes()[i];
                let icon = node.kind.icon();
                out.push_str(&format!(
                    "{}{} [{}]\n",
                    indent,
                    node_id(i),
                    attr_list([
                        ("label", node.label.clone()),
                        ("shape", icon.shape.to_string()),
                        ("fillcolor", icon.fill.to_string()),
                        ("tooltip", format!("{}/{}", icon.provider, icon.service)),
                    ])
                ));
            }
            Member::Cluster(c) => {
                let cluster = &diagram.clusters()[c];
                let background =
                    CLUSTER_BACKGROUNDS[diagram.cluster_depth(c) % CLUSTER_BACKGROUNDS.len()];
                out.push_str(&format!("{}subgraph {} {{\n", indent, cluster_id(c)));
                out.push_str(&format!(
                    "{}\tgraph [{}]\n",
                    indent,
                    attr_list([
                        ("label", cluster.name.clone()),
                        ("style", "rounded".to_string()),
                        ("labeljust", "l".to_string()),
                        ("pencolor", CLUSTER_PEN.to_string()),
                        ("bgcolor", background.to_string()),
                        ("fontname", FONT.to_string()),
                        ("fontsize", "12".to_string()),
                    ])
                ));
                write_scope(out, diagram, Some(c), depth + 1);
                out.push_str(&format!("{}}}\n", indent));
            }
        }
    }
}
