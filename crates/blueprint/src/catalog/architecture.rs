//! High-level architecture: the full location-update lifecycle
//!
//! Drivers publish over MQTT into the ingestion layer, writes land in the
//! global table, two regional stream pipelines fan out to caches and the
//! graph layer, and a scheduled consistency loop repairs drift.

use crate::core::{DiagramBuilder, DiagramError, Direction, EdgeSpec, GraphStyle, NodeKind};

pub fn builder() -> DiagramBuilder {
    DiagramBuilder::new("High-Level Architecture")
        .filename("architecture")
        .direction(Direction::TopBottom)
        .style(GraphStyle::documentation())
}

pub fn declare(b: &mut DiagramBuilder) -> Result<(), DiagramError> {
    let drivers = b.node(NodeKind::Actor, "156,000 Drivers");

    let (iot, writer) = b.cluster("Ingestion Layer", |b| {
        Ok((
            b.node(NodeKind::EventBus, "IoT Core\n5,200 msg/sec"),
            b.node(NodeKind::Compute, "Location Writer\n< 50ms"),
        ))
    })?;

    let (dynamodb, [cache1, cache2, _cache_n]) =
        b.cluster("Storage Layer - Multi-Region", |b| {
            let dynamodb = b.node(NodeKind::Database, "DynamoDB\nGlobal Table");
            let caches = b.cluster("Regional Caches", |b| {
                Ok([
                    b.node(NodeKind::Cache, "ElastiCache\nRegion 1"),
                    b.node(NodeKind::Cache, "ElastiCache\nRegion 2"),
                    b.node(NodeKind::Cache, "ElastiCache\nRegion N"),
                ])
            })?;
            Ok((dynamodb, caches))
        })?;

    let regions = b.cluster("Stream Processing", |b| {
        let mut regions = Vec::new();
        for name in ["Region 1", "Region 2"] {
            regions.push(b.cluster(name, |b| {
                Ok((
                    b.node(NodeKind::Compute, "Cache Updater"),
                    b.node(NodeKind::Stream, "Kinesis Stream"),
                    b.node(NodeKind::Compute, "Graph Updater"),
                ))
            })?);
        }
        Ok(regions)
    })?;
    let (cache_updater1, kinesis1, graph_updater1) = regions[0];
    let (cache_updater2, kinesis2, graph_updater2) = regions[1];

    let (neptune1, neptune2) = b.cluster("Graph Layer", |b| {
        Ok((
            b.node(NodeKind::GraphDatabase, "Neptune\nRegion 1"),
            b.node(NodeKind::GraphDatabase, "Neptune\nRegion 2"),
        ))
    })?;

    let (eventbridge, stepfunctions, drift_detector, snapshots, corrector) =
        b.cluster("Consistency & Self-Healing", |b| {
            Ok((
                b.node(NodeKind::Scheduler, "EventBridge\nEvery 10s"),
                b.node(NodeKind::Orchestrator, "Step Functions\nOrchestrator"),
                b.node(NodeKind::Compute, "Drift Detector"),
                b.node(NodeKind::Storage, "S3 Snapshots"),
                b.node(NodeKind::Compute, "Corrector"),
            ))
        })?;

    let cloudwatch = b.cluster("Monitoring", |b| {
        Ok(b.node(NodeKind::Monitoring, "CloudWatch\nMetrics & Alarms"))
    })?;

    // Data flow
    b.connect(drivers, iot, EdgeSpec::labeled("MQTT"))?;
    b.connect(iot, writer, EdgeSpec::labeled("trigger"))?;
    b.connect(writer, dynamodb, EdgeSpec::labeled("write"))?;

    b.fan_out(
        dynamodb,
        [cache_updater1, cache_updater2],
        EdgeSpec::labeled("stream"),
    )?;

    b.connect(cache_updater1, cache1, EdgeSpec::labeled("GEOADD"))?;
    b.connect(cache_updater2, cache2, EdgeSpec::labeled("GEOADD"))?;

    b.connect(cache_updater1, kinesis1, EdgeSpec::labeled("publish"))?;
    b.connect(cache_updater2, kinesis2, EdgeSpec::labeled("publish"))?;

    b.connect(kinesis1, graph_updater1, EdgeSpec::labeled("trigger"))?;
    b.connect(kinesis2, graph_updater2, EdgeSpec::labeled("trigger"))?;

    b.connect(graph_updater1, neptune1, EdgeSpec::labeled("update"))?;
    b.connect(graph_updater2, neptune2, EdgeSpec::labeled("update"))?;

    // Self-healing loop
    b.connect(eventbridge, stepfunctions, EdgeSpec::labeled("schedule"))?;
    b.connect(stepfunctions, drift_detector, EdgeSpec::labeled("invoke"))?;
    b.fan_out(drift_detector, [cache1, cache2], EdgeSpec::labeled("check"))?;
    b.connect(drift_detector, corrector, EdgeSpec::labeled("drift found"))?;
    b.connect(corrector, snapshots, EdgeSpec::labeled("read"))?;
    b.connect(corrector, dynamodb, EdgeSpec::labeled("republish"))?;

    b.fan_in(
        [writer, cache_updater1, drift_detector],
        cloudwatch,
        EdgeSpec::default(),
    )?;

    Ok(())
}
