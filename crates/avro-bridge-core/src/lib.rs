//! Schema-tagged event processing for avro-bridge.
//!
//! Takes raw enveloped messages, resolves each one's schema through an
//! injected [`SchemaRegistry`], decodes the binary body with
//! `avro-bridge-wire`, projects the decoded tree to a JSON document, and
//! hands the document to a [`DocumentSink`] — collecting per-message
//! failures across a batch instead of aborting it.

pub mod batch;
pub mod error;
pub mod project;
pub mod registry;

pub use batch::{
    process_message, run_batch, BatchFailure, BatchOutcome, BatchReport, DocumentSink, VecSink,
};
pub use error::{BridgeError, RegistryError, SinkError};
pub use project::{project, ProjectOptions, ProjectionError};
pub use registry::{DirRegistry, InMemoryRegistry, SchemaRegistry};
