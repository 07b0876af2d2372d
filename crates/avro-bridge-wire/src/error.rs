use thiserror::Error;

/// Failure while decoding a binary value against a schema.
///
/// Any of these fails the whole message; partial values are never returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unexpected end of input")]
    EndOfInput,
    #[error("variable-length integer is unterminated or too long")]
    VarIntTooLong,
    #[error("invalid UTF-8 in string value")]
    InvalidUtf8,
    #[error("negative length prefix {0}")]
    NegativeLength(i64),
    #[error("negative array/map block count {0}")]
    NegativeBlockCount(i64),
    #[error("union branch index {index} out of range for {arms} branches")]
    UnionIndexOutOfRange { index: i64, arms: usize },
    #[error("enum symbol index {index} out of range for {symbols} symbols")]
    EnumIndexOutOfRange { index: i64, symbols: usize },
}

/// Failure while stripping the message envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("message of {0} bytes is shorter than the minimum envelope")]
    TooShort(usize),
    #[error("schema id varint is unterminated or overlong")]
    MalformedId,
}

/// Failure while parsing Avro schema-definition text.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema text is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown schema type {0:?}")]
    UnknownType(String),
    #[error("schema node is not a string, object, or union array")]
    InvalidNode,
    #[error("{kind} schema is missing required attribute {attribute:?}")]
    MissingAttribute {
        kind: &'static str,
        attribute: &'static str,
    },
    #[error("{kind} schema attribute {attribute:?} is malformed")]
    MalformedAttribute {
        kind: &'static str,
        attribute: &'static str,
    },
    #[error("record {record:?} declares field {field:?} more than once")]
    DuplicateField { record: String, field: String },
}

/// Failure while encoding a value against a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("{schema} schema cannot encode {value} value")]
    ShapeMismatch {
        schema: &'static str,
        value: &'static str,
    },
    #[error("enum symbol {0:?} is not declared by the schema")]
    UnknownEnumSymbol(String),
    #[error("no union branch matches {0} value")]
    NoUnionBranch(&'static str),
    #[error("fixed schema expects {expected} bytes, value has {actual}")]
    FixedLengthMismatch { expected: usize, actual: usize },
    #[error("record value is missing field {0:?}")]
    MissingField(String),
}
