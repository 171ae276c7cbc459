//! Consistency check and self-healing workflow
//!
//! The scheduled drift-detection sub-flow on its own. Steps are numbered on
//! the edges; the corrector only runs past the drift threshold.

use crate::core::{DiagramBuilder, DiagramError, Direction, EdgeSpec, GraphStyle, NodeKind};

/// Drift beyond this distance triggers a correction
pub const DRIFT_THRESHOLD: &str = "100m";

pub fn builder() -> DiagramBuilder {
    DiagramBuilder::new("Consistency Check & Self-Healing")
        .filename("consistency_workflow")
        .direction(Direction::TopBottom)
        .style(GraphStyle::documentation())
}

pub fn declare(b: &mut DiagramBuilder) -> Result<(), DiagramError> {
    let eventbridge = b.cluster("Scheduled Trigger", |b| {
        Ok(b.node(NodeKind::Scheduler, "EventBridge\nEvery 10 seconds"))
    })?;

    let stepfunctions = b.cluster("Orchestration", |b| {
        Ok(b.node(NodeKind::Orchestrator, "Step Functions\nState Machine"))
    })?;

    let detector = b.cluster("Drift Detection", |b| {
        Ok(b.node(NodeKind::Compute, "Drift Detector\nGeofence Algorithm"))
    })?;

    let caches = b.cluster("Regional Caches - Checked", |b| {
        Ok(["Region 1", "Region 2", "Region 3", "Region N"].map(|r| b.node(NodeKind::Cache, r)))
    })?;

    let (snapshots, corrector) = b.cluster("Correction System", |b| {
        Ok((
            b.node(NodeKind::Storage, "S3 Snapshots\nCanonical State"),
            b.node(NodeKind::Compute, "Corrector\nRepublish Data"),
        ))
    })?;

    let ddb = b.cluster("Target - Corrected", |b| {
        Ok(b.node(NodeKind::Database, "DynamoDB\nGlobal Table"))
    })?;

    let monitoring = b.node(NodeKind::Monitoring, "CloudWatch\nAlerts");

    b.connect(eventbridge, stepfunctions, EdgeSpec::labeled("1. Trigger"))?;
    b.connect(stepfunctions, detector, EdgeSpec::labeled("2. Invoke"))?;

    // Only the first fan-out edge carries the step label.
    let [first, rest @ ..] = caches;
    b.connect(detector, first, EdgeSpec::labeled("3. GEORADIUS\nparallel"))?;
    b.fan_out(detector, rest, EdgeSpec::default())?;

    b.connect(
        detector,
        corrector,
        EdgeSpec::labeled(format!("4. If drift > {}", DRIFT_THRESHOLD)),
    )?;
    b.connect(corrector, snapshots, EdgeSpec::labeled("5. GetObject"))?;
    b.connect(corrector, ddb, EdgeSpec::labeled("6. PutItem\ncorrect data"))?;

    b.connect(ddb, first, EdgeSpec::labeled("7. Stream\npropagate"))?;
    b.fan_out(ddb, rest, EdgeSpec::default())?;

    b.connect(corrector, monitoring, EdgeSpec::labeled("8. Log metrics"))?;
    b.link(detector, monitoring)?;

    Ok(())
}
