//! Data flow for a single location update, stage by stage
//!
//! Each stage is a numbered cluster carrying its latency budget; edge labels
//! carry the step number and payload.

use crate::core::{DiagramBuilder, DiagramError, Direction, EdgeSpec, GraphStyle, NodeKind};

pub fn builder() -> DiagramBuilder {
    DiagramBuilder::new("Data Flow - Location Update")
        .filename("data_flow")
        .direction(Direction::TopBottom)
        .style(GraphStyle::documentation())
}

pub fn declare(b: &mut DiagramBuilder) -> Result<(), DiagramError> {
    let driver = b.node(NodeKind::Actor, "Driver App");

    let (iot, writer) = b.cluster("1. Ingestion (< 50ms)", |b| {
        Ok((
            b.node(NodeKind::EventBus, "IoT Core"),
            b.node(NodeKind::Compute, "Location Writer"),
        ))
    })?;

    let ddb = b.cluster("2. Storage (< 1s)", |b| {
        Ok(b.node(NodeKind::Database, "DynamoDB\nGlobal Table"))
    })?;

    let (streams, cache_updater) = b.cluster("3. Stream Processing", |b| {
        Ok((
            b.node(NodeKind::Database, "DynamoDB\nStreams"),
            b.node(NodeKind::Compute, "Cache Updater"),
        ))
    })?;

    let redis = b.cluster("4. Geospatial Indexing (< 2s)", |b| {
        Ok(b.node(NodeKind::Cache, "ElastiCache\nGEOADD"))
    })?;

    let (kinesis, graph_updater) = b.cluster("5. Event Publishing", |b| {
        Ok((
            b.node(NodeKind::Stream, "Kinesis Stream"),
            b.node(NodeKind::Compute, "Graph Updater"),
        ))
    })?;

    let neptune = b.cluster("6. Graph Update (< 3s)", |b| {
        Ok(b.node(NodeKind::GraphDatabase, "Neptune\nProximity Map"))
    })?;

    let monitoring = b.node(NodeKind::Monitoring, "CloudWatch");

    let flow = [
        (driver, iot, "1. MQTT\n{lat, lon, timestamp}"),
        (iot, writer, "2. Trigger"),
        (writer, ddb, "3. PutItem\n(conditional)"),
        (ddb, streams, "4. Stream\nchange data"),
        (streams, cache_updater, "5. Batch\ntrigger"),
        (cache_updater, redis, "6a. GEOADD\ndriver:<id>"),
        (cache_updater, kinesis, "6b. PutRecords"),
        (kinesis, graph_updater, "7. Trigger"),
        (graph_updater, neptune, "8. Gremlin\nupdate edges"),
    ];
    for (from, to, label) in flow {
        b.connect(from, to, EdgeSpec::labeled(label))?;
    }

    b.fan_in(
        [writer, cache_updater, graph_updater],
        monitoring,
        EdgeSpec::default(),
    )?;

    Ok(())
}
