//! Schema id → schema lookup.
//!
//! The registry is an explicit, injected collaborator: built once at
//! startup, read-only afterwards, passed by reference into every decode.
//! `resolve` takes `&self` and the stores are `Send + Sync`, so a batch
//! runner may fan messages out across threads without synchronization.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use avro_bridge_wire::{zig_zag_decode, Schema};

use crate::error::RegistryError;

/// Read-only mapping from a wire schema id to its parsed schema.
///
/// A miss is a per-message failure, never a process failure; the table is
/// not refreshed during steady-state processing.
pub trait SchemaRegistry: Send + Sync {
    fn resolve(&self, id: i64) -> Option<Arc<Schema>>;
}

/// Registry built directly by the caller. Intended for tests and for
/// embedders that fetch schema text through some other channel.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    schemas: HashMap<i64, Arc<Schema>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: i64, schema: Schema) {
        self.schemas.insert(id, Arc::new(schema));
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl SchemaRegistry for InMemoryRegistry {
    fn resolve(&self, id: i64) -> Option<Arc<Schema>> {
        self.schemas.get(&id).cloned()
    }
}

/// Registry backed by a directory of `SerializationID-<n>-<NAME>.avsc` files.
///
/// `<n>` is the unsigned zig-zag form of the signed schema id as it appears
/// on the wire: `SerializationID-46-CUSTOMER.avsc` serves id 23 and
/// `SerializationID-41-DE_ADDRESS.avsc` serves id −21. Every schema is
/// parsed once at construction; files that do not match the naming
/// convention are skipped, a file that matches but fails to parse is a
/// construction error.
#[derive(Debug)]
pub struct DirRegistry {
    schemas: HashMap<i64, (String, Arc<Schema>)>,
}

impl DirRegistry {
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let mut schemas: HashMap<i64, (String, Arc<Schema>)> = HashMap::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let Some(file) = path.file_name().and_then(|n| n.to_str()).map(str::to_owned)
            else {
                continue;
            };
            let Some(id) = schema_id_from_file_name(&file) else {
                tracing::debug!(%file, "skipping non-schema file");
                continue;
            };
            let text = fs::read_to_string(&path)?;
            let schema = Schema::parse(&text).map_err(|source| RegistryError::BadSchemaFile {
                file: file.clone(),
                source,
            })?;
            if let Some((first, _)) = schemas.get(&id) {
                return Err(RegistryError::DuplicateId {
                    id,
                    first: first.clone(),
                    second: file,
                });
            }
            tracing::info!(%file, id, "loaded schema");
            schemas.insert(id, (file, Arc::new(schema)));
        }
        Ok(Self { schemas })
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl SchemaRegistry for DirRegistry {
    fn resolve(&self, id: i64) -> Option<Arc<Schema>> {
        self.schemas.get(&id).map(|(_, schema)| schema.clone())
    }
}

/// Extracts the signed schema id from `SerializationID-<n>-<NAME>.avsc`.
fn schema_id_from_file_name(file: &str) -> Option<i64> {
    let rest = file.strip_prefix("SerializationID-")?;
    let rest = rest.strip_suffix(".avsc")?;
    let (wire, name) = rest.split_once('-')?;
    if name.is_empty() {
        return None;
    }
    let wire: u64 = wire.parse().ok()?;
    Some(zig_zag_decode(wire))
}
