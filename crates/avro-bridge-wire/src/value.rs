//! Decoded runtime value tree.

use indexmap::IndexMap;

/// A schema-agnostic, self-describing decoded value.
///
/// One tree is produced per message, owned by the decode call, and discarded
/// after projection. Both Avro integer widths decode to `Int` and both float
/// widths to `Float`; enum symbols land as `Str`, fixed data as `Bytes`, and
/// union values transparently as the selected branch's value.
#[derive(Debug, Clone, PartialEq)]
pub enum GenericValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Bytes(Vec<u8>),
    Str(String),
    /// Field insertion order equals the record schema's declared field order;
    /// keys are unique.
    Record {
        name: String,
        fields: IndexMap<String, GenericValue>,
    },
    Array(Vec<GenericValue>),
    Map(IndexMap<String, GenericValue>),
}

impl GenericValue {
    /// Lowercase name of this value's shape, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            GenericValue::Null => "null",
            GenericValue::Bool(_) => "boolean",
            GenericValue::Int(_) => "integer",
            GenericValue::Float(_) => "float",
            GenericValue::Bytes(_) => "bytes",
            GenericValue::Str(_) => "string",
            GenericValue::Record { .. } => "record",
            GenericValue::Array(_) => "array",
            GenericValue::Map(_) => "map",
        }
    }
}
