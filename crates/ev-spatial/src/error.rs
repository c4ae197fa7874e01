use ev_core::{BuildingId, NodeId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("road network has no nodes")]
    EmptyNetwork,

    #[error("node {0} is not part of this network")]
    UnknownNode(NodeId),

    #[error("building {0} has an empty footprint")]
    DegenerateFootprint(BuildingId),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
