//! Schema-tagged binary encoder.
//!
//! The producer-side counterpart of [`decode`](crate::decode): fixtures,
//! round-trip tests, and tooling all derive their wire bytes from here
//! rather than hand-assembling buffers.

use crate::cursor::zig_zag_encode;
use crate::error::EncodeError;
use crate::schema::Schema;
use crate::value::GenericValue;

/// Binary writer for the wire format's primitive encodings.
#[derive(Debug, Default)]
pub struct Encoder {
    out: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the encoder and returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }

    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    pub fn write_bool(&mut self, b: bool) {
        self.out.push(u8::from(b));
    }

    /// Writes a variable-length unsigned integer (no zig-zag).
    pub fn write_varint(&mut self, mut n: u64) {
        loop {
            let low = (n & 0x7f) as u8;
            n >>= 7;
            if n == 0 {
                self.out.push(low);
                return;
            }
            self.out.push(low | 0x80);
        }
    }

    /// Writes a zig-zag-encoded signed integer as a varint.
    pub fn write_long(&mut self, n: i64) {
        self.write_varint(zig_zag_encode(n));
    }

    pub fn write_float(&mut self, f: f32) {
        self.out.extend_from_slice(&f.to_le_bytes());
    }

    pub fn write_double(&mut self, f: f64) {
        self.out.extend_from_slice(&f.to_le_bytes());
    }

    pub fn write_bytes(&mut self, data: &[u8]) {
        self.write_long(data.len() as i64);
        self.out.extend_from_slice(data);
    }

    pub fn write_str(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    /// Writes `value` in the binary form `schema` prescribes.
    ///
    /// Non-empty arrays and maps are written as a single block followed by
    /// the zero-count terminator. Union encoding selects the first branch
    /// that admits the value's shape.
    pub fn write_value(
        &mut self,
        value: &GenericValue,
        schema: &Schema,
    ) -> Result<(), EncodeError> {
        match (schema, value) {
            (Schema::Null, GenericValue::Null) => Ok(()),
            (Schema::Boolean, GenericValue::Bool(b)) => {
                self.write_bool(*b);
                Ok(())
            }
            (Schema::Int | Schema::Long, GenericValue::Int(n)) => {
                self.write_long(*n);
                Ok(())
            }
            (Schema::Float, GenericValue::Float(f)) => {
                self.write_float(*f as f32);
                Ok(())
            }
            (Schema::Double, GenericValue::Float(f)) => {
                self.write_double(*f);
                Ok(())
            }
            (Schema::Bytes, GenericValue::Bytes(data)) => {
                self.write_bytes(data);
                Ok(())
            }
            (Schema::String, GenericValue::Str(s)) => {
                self.write_str(s);
                Ok(())
            }
            (Schema::Record { fields, .. }, GenericValue::Record { fields: values, .. }) => {
                for field in fields {
                    let value = values
                        .get(&field.name)
                        .ok_or_else(|| EncodeError::MissingField(field.name.clone()))?;
                    self.write_value(value, &field.schema)?;
                }
                Ok(())
            }
            (Schema::Enum { symbols, .. }, GenericValue::Str(symbol)) => {
                let index = symbols
                    .iter()
                    .position(|s| s == symbol)
                    .ok_or_else(|| EncodeError::UnknownEnumSymbol(symbol.clone()))?;
                self.write_long(index as i64);
                Ok(())
            }
            (Schema::Array { items }, GenericValue::Array(elements)) => {
                if !elements.is_empty() {
                    self.write_long(elements.len() as i64);
                    for element in elements {
                        self.write_value(element, items)?;
                    }
                }
                self.write_long(0);
                Ok(())
            }
            (Schema::Map { values }, GenericValue::Map(entries)) => {
                if !entries.is_empty() {
                    self.write_long(entries.len() as i64);
                    for (key, value) in entries {
                        self.write_str(key);
                        self.write_value(value, values)?;
                    }
                }
                self.write_long(0);
                Ok(())
            }
            (Schema::Union(arms), value) => {
                let (index, arm) = arms
                    .iter()
                    .enumerate()
                    .find(|(_, arm)| arm.admits(value))
                    .ok_or(EncodeError::NoUnionBranch(value.kind()))?;
                self.write_long(index as i64);
                self.write_value(value, arm)
            }
            (Schema::Fixed { size, .. }, GenericValue::Bytes(data)) => {
                if data.len() != *size {
                    return Err(EncodeError::FixedLengthMismatch {
                        expected: *size,
                        actual: data.len(),
                    });
                }
                self.write_raw(data);
                Ok(())
            }
            (schema, value) => Err(EncodeError::ShapeMismatch {
                schema: schema.kind(),
                value: value.kind(),
            }),
        }
    }
}

/// Encodes one value against `schema` into a fresh buffer.
pub fn encode(value: &GenericValue, schema: &Schema) -> Result<Vec<u8>, EncodeError> {
    let mut enc = Encoder::new();
    enc.write_value(value, schema)?;
    Ok(enc.into_bytes())
}
