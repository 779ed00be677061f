use std::path::PathBuf;

/// Errors that abort an encode or decode.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid document: {0}")]
    InvalidDocument(String),
    #[error("empty file path")]
    EmptyPath,
}

/// A non-fatal inconsistency found while decoding. The offending entity or
/// reference is skipped and decoding continues.
///
/// Indices are positions in the document's arrays.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Diagnostic {
    #[error("document is null, decoded an empty scene")]
    NullDocument,
    #[error("{section}[{index}] is not an object, decoded with defaults")]
    MalformedEntry { section: &'static str, index: usize },
    #[error("body[{body}]: unknown body type {value}, decoded as static")]
    UnknownBodyType { body: usize, value: i64 },
    #[error("body[{body}].fixture[{fixture}]: no shape key, fixture dropped")]
    MissingShape { body: usize, fixture: usize },
    #[error("body[{body}].fixture[{fixture}]: polygon with {vertices} vertices, fixture dropped")]
    DegeneratePolygon {
        body: usize,
        fixture: usize,
        vertices: usize,
    },
    #[error("body[{body}].fixture[{fixture}]: polygon with {vertices} vertices exceeds 8, fixture dropped")]
    OversizedPolygon {
        body: usize,
        fixture: usize,
        vertices: usize,
    },
    #[error("body[{body}].fixture[{fixture}]: chain with {vertices} vertices, fixture dropped")]
    DegenerateChain {
        body: usize,
        fixture: usize,
        vertices: usize,
    },
    #[error("body[{body}].fixture[{fixture}]: {field} = {value} is out of range, default used")]
    FilterOutOfRange {
        body: usize,
        fixture: usize,
        field: &'static str,
        value: i64,
    },
    #[error("joint[{joint}]: no type, joint skipped")]
    MissingJointType { joint: usize },
    #[error("joint[{joint}]: unknown joint type {name:?}, joint skipped")]
    UnknownJointType { joint: usize, name: String },
    #[error("joint[{joint}]: {field} = {index} but there are {count} bodies, joint skipped")]
    BodyIndexOutOfRange {
        joint: usize,
        field: &'static str,
        index: i64,
        count: usize,
    },
    #[error("joint[{joint}]: {field} = {index} but {count} joints were decoded, joint skipped")]
    JointIndexOutOfRange {
        joint: usize,
        field: &'static str,
        index: i64,
        count: usize,
    },
    #[error("image[{image}]: body = {index} but there are {count} bodies, image left unbound")]
    ImageBodyOutOfRange {
        image: usize,
        index: i64,
        count: usize,
    },
}
