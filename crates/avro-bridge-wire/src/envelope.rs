//! Message envelope: `[marker][flag][zig-zag schema id][binary body]`.
//!
//! The layout is a fixed wire contract — one format-marker byte that is
//! skipped and never reinterpreted, one boolean flag byte kept for
//! diagnostics only, then the schema id as a zig-zag varint, then the
//! schema-encoded body. Tests pin the exact byte offsets.

use crate::cursor::ByteCursor;
use crate::encoder::Encoder;
use crate::error::EnvelopeError;

/// Value written to byte 0 by [`seal_envelope`]. Inbound parsing skips the
/// marker without validating it.
pub const FORMAT_MARKER: u8 = 0x00;

/// Minimum envelope: marker, flag, and at least one schema-id byte.
pub const MIN_ENVELOPE_LEN: usize = 3;

/// A stripped envelope: the schema id and a cursor positioned at the first
/// byte of the schema-encoded body.
#[derive(Debug)]
pub struct Envelope<'a> {
    pub schema_id: i64,
    /// Boolean flag from byte 1. Diagnostic only; nothing consults it.
    pub flag: bool,
    pub body: ByteCursor<'a>,
}

/// Strips the envelope from a raw message buffer.
pub fn parse_envelope(buf: &[u8]) -> Result<Envelope<'_>, EnvelopeError> {
    if buf.len() < MIN_ENVELOPE_LEN {
        return Err(EnvelopeError::TooShort(buf.len()));
    }
    let flag = buf[1] != 0;
    let mut body = ByteCursor::new(&buf[2..]);
    let schema_id = body.read_long().map_err(|_| EnvelopeError::MalformedId)?;
    Ok(Envelope {
        schema_id,
        flag,
        body,
    })
}

/// Builds an envelope around an already-encoded body — the inverse of
/// [`parse_envelope`], for producers and tests.
pub fn seal_envelope(schema_id: i64, body: &[u8]) -> Vec<u8> {
    let mut enc = Encoder::new();
    enc.write_raw(&[FORMAT_MARKER]);
    enc.write_bool(false);
    enc.write_long(schema_id);
    enc.write_raw(body);
    enc.into_bytes()
}
