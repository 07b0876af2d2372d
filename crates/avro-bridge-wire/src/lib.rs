//! Wire-format layer for avro-bridge.
//!
//! Everything that touches raw bytes lives here: the message envelope
//! (`[marker][flag][zig-zag schema id][body]`), the Avro schema model with
//! `.avsc` parsing, the bounds-checked byte cursor, and the schema-tagged
//! decoder/encoder pair producing and consuming [`GenericValue`] trees.
//! Resolving schema ids and projecting decoded values to JSON documents is
//! the processing crate's job.

pub mod cursor;
pub mod decoder;
pub mod encoder;
pub mod envelope;
pub mod error;
pub mod schema;
pub mod value;

pub use cursor::{zig_zag_decode, zig_zag_encode, ByteCursor};
pub use decoder::decode;
pub use encoder::{encode, Encoder};
pub use envelope::{parse_envelope, seal_envelope, Envelope, FORMAT_MARKER, MIN_ENVELOPE_LEN};
pub use error::{DecodeError, EncodeError, EnvelopeError, SchemaError};
pub use schema::{Field, Schema};
pub use value::GenericValue;
