//! Multi-region deployment: three replicas of the regional stack
//!
//! The global table replicates between regions (dotted edges); the shared
//! consistency resources in us-east-1 check every regional cache.

use crate::core::{
    DiagramBuilder, DiagramError, Direction, EdgeSpec, GraphStyle, NodeId, NodeKind,
};

/// Regions in replication order, with the label of their table
const REGIONS: [(&str, &str); 3] = [
    ("Region 1: us-east-1", "DynamoDB\nGlobal Table"),
    ("Region 2: us-west-2", "DynamoDB\nReplica"),
    ("Region 3: eu-west-1", "DynamoDB\nReplica"),
];

struct RegionalStack {
    table: NodeId,
    cache: NodeId,
    graph: NodeId,
    stream: NodeId,
    functions: NodeId,
}

pub fn builder() -> DiagramBuilder {
    DiagramBuilder::new("Multi-Region Deployment")
        .filename("multi_region")
        .direction(Direction::LeftRight)
        .style(GraphStyle::documentation())
}

pub fn declare(b: &mut DiagramBuilder) -> Result<(), DiagramError> {
    let (iot_global, s3_global, sf_global) = b.cluster("Global Resources (us-east-1)", |b| {
        Ok((
            b.node(NodeKind::EventBus, "IoT Core"),
            b.node(NodeKind::Storage, "S3 Snapshots"),
            b.node(NodeKind::Orchestrator, "Step Functions"),
        ))
    })?;

    let mut stacks = Vec::with_capacity(REGIONS.len());
    for (region, table_label) in REGIONS {
        stacks.push(b.cluster(region, |b| {
            Ok(RegionalStack {
                table: b.node(NodeKind::Database, table_label),
                cache: b.node(NodeKind::Cache, "ElastiCache"),
                graph: b.node(NodeKind::GraphDatabase, "Neptune"),
                stream: b.node(NodeKind::Stream, "Kinesis"),
                functions: b.node(NodeKind::Compute, "Lambda Functions"),
            })
        })?);
    }

    b.fan_out(
        iot_global,
        stacks.iter().map(|s| s.table),
        EdgeSpec::labeled("route"),
    )?;

    for pair in stacks.windows(2) {
        b.connect(
            pair[0].table,
            pair[1].table,
            EdgeSpec::labeled("replicate\n< 1 sec").dotted(),
        )?;
    }

    for stack in &stacks {
        b.connect(stack.table, stack.functions, EdgeSpec::labeled("stream"))?;
    }

    for stack in &stacks {
        b.link(stack.functions, stack.cache)?;
        b.link(stack.functions, stack.stream)?;
    }

    for stack in &stacks {
        b.link(stack.stream, stack.graph)?;
    }

    b.fan_out(
        sf_global,
        stacks.iter().map(|s| s.cache),
        EdgeSpec::labeled("check"),
    )?;
    b.connect(sf_global, s3_global, EdgeSpec::labeled("correct"))?;
    b.connect(s3_global, stacks[0].table, EdgeSpec::labeled("restore"))?;

    Ok(())
}
