//! Per-message pipeline and batch runner.
//!
//! One message flows envelope → registry → decode → project → sink with no
//! internal suspension. The batch runner attempts every message, collects
//! per-message failures instead of unwinding, and reduces them to a single
//! outcome once the whole batch has been attempted.

use serde_json::Value as JsonValue;

use avro_bridge_wire::{decode, parse_envelope};

use crate::error::{BridgeError, SinkError};
use crate::project::{project, ProjectOptions};
use crate::registry::SchemaRegistry;

/// Decodes and projects one raw message to a JSON document.
pub fn process_message(
    raw: &[u8],
    registry: &dyn SchemaRegistry,
    options: &ProjectOptions,
) -> Result<JsonValue, BridgeError> {
    let mut envelope = parse_envelope(raw)?;
    let schema = registry
        .resolve(envelope.schema_id)
        .ok_or(BridgeError::UnknownSchemaId {
            id: envelope.schema_id,
        })?;
    let value = decode(&mut envelope.body, &schema)?;
    Ok(project(&value, &schema, options)?)
}

/// Downstream consumer of projected documents. Accepting a document
/// transfers ownership; a rejection fails that message only.
pub trait DocumentSink {
    fn accept(&mut self, document: JsonValue) -> Result<(), SinkError>;
}

/// Sink that collects documents in memory.
#[derive(Debug, Default)]
pub struct VecSink {
    pub documents: Vec<JsonValue>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentSink for VecSink {
    fn accept(&mut self, document: JsonValue) -> Result<(), SinkError> {
        self.documents.push(document);
        Ok(())
    }
}

/// One failed message, by its position in the batch.
#[derive(Debug)]
pub struct BatchFailure {
    pub index: usize,
    pub error: BridgeError,
}

/// What happened to a whole batch.
#[derive(Debug)]
pub struct BatchReport {
    /// Documents accepted by the sink.
    pub delivered: usize,
    pub failures: Vec<BatchFailure>,
}

/// The externally visible failure signal for a batch.
#[derive(Debug)]
pub enum BatchOutcome {
    Clean,
    Failed(BatchFailure),
    FailedMany(Vec<BatchFailure>),
}

impl BatchReport {
    /// Reduces the failure list: none, the single failure, or all of them.
    pub fn outcome(self) -> BatchOutcome {
        let mut failures = self.failures;
        match failures.len() {
            0 => BatchOutcome::Clean,
            1 => BatchOutcome::Failed(failures.swap_remove(0)),
            _ => BatchOutcome::FailedMany(failures),
        }
    }
}

/// Runs every message through [`process_message`] and the sink.
///
/// Failures never abort the batch; successes are delivered in input order.
pub fn run_batch<'a>(
    messages: impl IntoIterator<Item = &'a [u8]>,
    registry: &dyn SchemaRegistry,
    sink: &mut dyn DocumentSink,
    options: &ProjectOptions,
) -> BatchReport {
    let mut delivered = 0usize;
    let mut failures = Vec::new();
    for (index, raw) in messages.into_iter().enumerate() {
        let result = process_message(raw, registry, options)
            .and_then(|document| sink.accept(document).map_err(BridgeError::from));
        match result {
            Ok(()) => {
                delivered += 1;
                tracing::debug!(index, "document delivered");
            }
            Err(error) => {
                tracing::warn!(index, %error, "message failed");
                failures.push(BatchFailure { index, error });
            }
        }
    }
    tracing::info!(delivered, failed = failures.len(), "batch complete");
    BatchReport {
        delivered,
        failures,
    }
}
