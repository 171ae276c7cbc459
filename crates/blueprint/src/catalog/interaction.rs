//! Component interaction map
//!
//! The same components regrouped by logical subsystem rather than by
//! physical stage.

use crate::core::{DiagramBuilder, DiagramError, Direction, EdgeSpec, GraphStyle, NodeKind};

pub fn builder() -> DiagramBuilder {
    DiagramBuilder::new("Component Interaction Map")
        .filename("component_interaction")
        .direction(Direction::LeftRight)
        .style(GraphStyle::documentation().font_size(14).attr("rankdir", "LR"))
}

pub fn declare(b: &mut DiagramBuilder) -> Result<(), DiagramError> {
    let drivers = b.node(NodeKind::Actor, "156K Drivers");

    let (iot, writer) = b.cluster("LocationIngestion", |b| {
        Ok((
            b.node(NodeKind::EventBus, "IoT Core"),
            b.node(NodeKind::Compute, "Writer Lambda"),
        ))
    })?;

    let (ddb, cache) = b.cluster("StorageLayer", |b| {
        Ok((
            b.node(NodeKind::Database, "DynamoDB"),
            b.node(NodeKind::Cache, "ElastiCache"),
        ))
    })?;

    let (kinesis, stream_lambda) = b.cluster("StreamProcessing", |b| {
        Ok((
            b.node(NodeKind::Stream, "Kinesis"),
            b.node(NodeKind::Compute, "Stream Lambda"),
        ))
    })?;

    let neptune = b.cluster("GraphLayer", |b| Ok(b.node(NodeKind::GraphDatabase, "Neptune")))?;

    let (eventbridge, stepfunctions) = b.cluster("ConsistencyChecker", |b| {
        Ok((
            b.node(NodeKind::Scheduler, "EventBridge"),
            b.node(NodeKind::Orchestrator, "Step Functions"),
        ))
    })?;

    let (s3, corrector) = b.cluster("CorrectionSystem", |b| {
        Ok((
            b.node(NodeKind::Storage, "S3 Snapshots"),
            b.node(NodeKind::Compute, "Corrector"),
        ))
    })?;

    let cloudwatch = b.cluster("Monitoring", |b| Ok(b.node(NodeKind::Monitoring, "CloudWatch")))?;

    b.chain([drivers, iot, writer, ddb])?;
    b.chain([ddb, stream_lambda, cache])?;
    b.chain([stream_lambda, kinesis, neptune])?;

    b.link(eventbridge, stepfunctions)?;
    b.connect(stepfunctions, cache, EdgeSpec::labeled("check"))?;
    b.connect(stepfunctions, corrector, EdgeSpec::labeled("correct"))?;
    b.link(corrector, s3)?;
    b.link(corrector, ddb)?;

    b.fan_in(
        [writer, stream_lambda, corrector],
        cloudwatch,
        EdgeSpec::default(),
    )?;

    Ok(())
}
