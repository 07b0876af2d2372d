use thiserror::Error;

use avro_bridge_wire::{DecodeError, EnvelopeError, SchemaError};

use crate::project::ProjectionError;

/// Why one message failed.
///
/// Scoped to a single message: none of these corrupts state for the rest of
/// the batch, and nothing is retried here.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(#[from] EnvelopeError),
    #[error("unknown schema id {id}")]
    UnknownSchemaId { id: i64 },
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("projection failed: {0}")]
    Projection(#[from] ProjectionError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Rejection reported by a document sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("sink rejected document: {0}")]
pub struct SinkError(pub String);

/// Failure while constructing a schema registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("cannot read schema directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("schema file {file}: {source}")]
    BadSchemaFile { file: String, source: SchemaError },
    #[error("schema id {id} is defined by both {first} and {second}")]
    DuplicateId {
        id: i64,
        first: String,
        second: String,
    },
}
