use scenejson_common::{BodyId, JointId};

/// Errors from building or editing a world.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("body {0:?} not found")]
    BodyNotFound(BodyId),
    #[error("joint {0:?} not found")]
    JointNotFound(JointId),
    #[error("unknown body type {0}")]
    UnknownBodyType(i64),
    #[error("polygon has {0} vertices, at most 8 are allowed")]
    TooManyPolygonVertices(usize),
    #[error("polygon has {0} vertices, at least 3 are needed")]
    TooFewPolygonVertices(usize),
}
