//! Core type definitions for diagram declaration
//!
//! This module contains the fundamental vocabulary used throughout Blueprint:
//! component kinds and their glyphs, edge styles, layout direction, and the
//! graph-level style block.

use std::collections::BTreeMap;
use std::fmt;

/// Visual glyph for a component kind
///
/// Describes how the rendering engine draws a node of a given kind: which
/// provider/service pictogram it stands for, and the Graphviz shape and
/// fill colour used in its place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Icon {
    /// Icon family (e.g. `aws`, `onprem`)
    pub provider: &'static str,
    /// Service the pictogram depicts (e.g. `lambda`)
    pub service: &'static str,
    /// Graphviz node shape
    pub shape: &'static str,
    /// Graphviz fill colour
    pub fill: &'static str,
}

/// Component categories a node can represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A person or population outside the system (drivers, operators)
    Actor,
    /// Serverless function or other compute unit
    Compute,
    /// Key-value or document database
    Database,
    /// In-memory cache
    Cache,
    /// Graph database
    GraphDatabase,
    /// Ordered data stream
    Stream,
    /// Object storage
    Storage,
    /// Time-based trigger
    Scheduler,
    /// Message broker or event bus
    EventBus,
    /// Workflow state machine
    Orchestrator,
    /// CDN or DNS routing
    Dns,
    /// Metrics, alarms and logs
    Monitoring,
}

impl NodeKind {
    /// All kinds, in catalog order
    pub const ALL: [NodeKind; 12] = [
        NodeKind::Actor,
        NodeKind::Compute,
        NodeKind::Database,
        NodeKind::Cache,
        NodeKind::GraphDatabase,
        NodeKind::Stream,
        NodeKind::Storage,
        NodeKind::Scheduler,
        NodeKind::EventBus,
        NodeKind::Orchestrator,
        NodeKind::Dns,
        NodeKind::Monitoring,
    ];

    /// Look up the glyph for this kind
    pub fn icon(&self) -> Icon {
        let (provider, service, shape, fill) = match self {
            NodeKind::Actor => ("onprem", "users", "egg", "#F2F4F4"),
            NodeKind::Compute => ("aws", "lambda", "box", "#FBD8B5"),
            NodeKind::Database => ("aws", "dynamodb", "cylinder", "#D6E4F5"),
            NodeKind::Cache => ("aws", "elasticache", "cylinder", "#F5D0D6"),
            NodeKind::GraphDatabase => ("aws", "neptune", "hexagon", "#D6E4F5"),
            NodeKind::Stream => ("aws", "kinesis-data-streams", "cds", "#E3D5FF"),
            NodeKind::Storage => ("aws", "s3", "folder", "#D8EFC4"),
            NodeKind::Scheduler => ("aws", "eventbridge", "invhouse", "#F8D1E5"),
            NodeKind::EventBus => ("aws", "iot-core", "box3d", "#D8EFC4"),
            NodeKind::Orchestrator => ("aws", "step-functions", "component", "#F8D1E5"),
            NodeKind::Dns => ("aws", "route-53", "tab", "#E3D5FF"),
            NodeKind::Monitoring => ("aws", "cloudwatch", "note", "#F8D1E5"),
        };
        Icon {
            provider,
            service,
            shape,
            fill,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Actor => write!(f, "actor"),
            NodeKind::Compute => write!(f, "compute"),
            NodeKind::Database => write!(f, "database"),
            NodeKind::Cache => write!(f, "cache"),
            NodeKind::GraphDatabase => write!(f, "graph-database"),
            NodeKind::Stream => write!(f, "stream"),
            NodeKind::Storage => write!(f, "storage"),
            NodeKind::Scheduler => write!(f, "scheduler"),
            NodeKind::EventBus => write!(f, "event-bus"),
            NodeKind::Orchestrator => write!(f, "orchestrator"),
            NodeKind::Dns => write!(f, "dns"),
            NodeKind::Monitoring => write!(f, "monitoring"),
        }
    }
}

/// Line style of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum EdgeStyle {
    /// Synchronous or direct call
    #[default]
    Solid,
    /// Asynchronous or replicated relation
    Dotted,
    Dashed,
    Bold,
}

impl EdgeStyle {
    /// Returns true if this style is the renderer default
    pub fn is_default(&self) -> bool {
        matches!(self, EdgeStyle::Solid)
    }
}

impl fmt::Display for EdgeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeStyle::Solid => write!(f, "solid"),
            EdgeStyle::Dotted => write!(f, "dotted"),
            EdgeStyle::Dashed => write!(f, "dashed"),
            EdgeStyle::Bold => write!(f, "bold"),
        }
    }
}

/// Arrowhead placement of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum EdgeDirection {
    /// Arrow at the target: `a -> b`
    #[default]
    Forward,
    /// Arrows at both ends
    Both,
    /// Plain line
    None,
}

impl fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeDirection::Forward => write!(f, "forward"),
            EdgeDirection::Both => write!(f, "both"),
            EdgeDirection::None => write!(f, "none"),
        }
    }
}

/// Layout direction for the diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Direction {
    /// Top to bottom (TB)
    #[default]
    TopBottom,
    /// Left to right (LR)
    LeftRight,
    /// Right to left (RL)
    RightLeft,
    /// Bottom to top (BT)
    BottomTop,
}

impl Direction {
    /// Parse a Graphviz rankdir value (TB, TD, LR, RL, BT)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "TB" | "TD" => Some(Direction::TopBottom),
            "LR" => Some(Direction::LeftRight),
            "RL" => Some(Direction::RightLeft),
            "BT" => Some(Direction::BottomTop),
            _ => None,
        }
    }

    /// Returns true if ranks run horizontally
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::LeftRight | Direction::RightLeft)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::TopBottom => write!(f, "TB"),
            Direction::LeftRight => write!(f, "LR"),
            Direction::RightLeft => write!(f, "RL"),
            Direction::BottomTop => write!(f, "BT"),
        }
    }
}

/// Graph-level style configuration
///
/// Unset fields fall back to the renderer defaults. `extra` carries raw
/// Graphviz graph attributes and is applied last.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphStyle {
    pub font_size: Option<u32>,
    pub background: Option<String>,
    pub padding: Option<f32>,
    pub extra: BTreeMap<String, String>,
}

impl GraphStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Style shared by the documentation diagrams: 16pt, white, 0.5in pad
    pub fn documentation() -> Self {
        Self::new().font_size(16).background("white").padding(0.5)
    }

    pub fn font_size(mut self, size: u32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    pub fn padding(mut self, inches: f32) -> Self {
        self.padding = Some(inches);
        self
    }

    /// Set a raw Graphviz graph attribute
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Flatten into Graphviz attribute pairs, typed fields first
    pub fn attributes(&self) -> BTreeMap<String, String> {
        let mut attrs = BTreeMap::new();
        if let Some(size) = self.font_size {
            attrs.insert("fontsize".to_string(), size.to_string());
        }
        if let Some(ref color) = self.background {
            attrs.insert("bgcolor".to_string(), color.clone());
        }
        if let Some(pad) = self.padding {
            attrs.insert("pad".to_string(), pad.to_string());
        }
        for (key, value) in &self.extra {
            attrs.insert(key.clone(), value.clone());
        }
        attrs
    }
}
