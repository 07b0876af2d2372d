//! Schema-tagged binary decoder.

use indexmap::IndexMap;

use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::schema::Schema;
use crate::value::GenericValue;

/// Decodes one value against `schema`, consuming exactly the bytes that
/// schema's binary encoding occupies and advancing the cursor past them.
///
/// Record fields decode in declared order. Array and map bodies are block
/// runs terminated by a zero count; negative counts (the count-then-size
/// skip form) are not produced by the writers this system consumes and are
/// rejected. Any failure discards the whole value.
pub fn decode(cur: &mut ByteCursor<'_>, schema: &Schema) -> Result<GenericValue, DecodeError> {
    match schema {
        Schema::Null => Ok(GenericValue::Null),
        Schema::Boolean => Ok(GenericValue::Bool(cur.read_bool()?)),
        Schema::Int | Schema::Long => Ok(GenericValue::Int(cur.read_long()?)),
        Schema::Float => Ok(GenericValue::Float(cur.read_f32_le()? as f64)),
        Schema::Double => Ok(GenericValue::Float(cur.read_f64_le()?)),
        Schema::Bytes => Ok(GenericValue::Bytes(cur.read_len_prefixed()?.to_vec())),
        Schema::String => Ok(GenericValue::Str(cur.read_str()?.to_owned())),
        Schema::Record { name, fields } => {
            let mut decoded = IndexMap::with_capacity(fields.len());
            for field in fields {
                let value = decode(cur, &field.schema)?;
                decoded.insert(field.name.clone(), value);
            }
            Ok(GenericValue::Record {
                name: name.clone(),
                fields: decoded,
            })
        }
        Schema::Enum { symbols, .. } => {
            let index = cur.read_long()?;
            let symbol = usize::try_from(index)
                .ok()
                .and_then(|i| symbols.get(i))
                .ok_or(DecodeError::EnumIndexOutOfRange {
                    index,
                    symbols: symbols.len(),
                })?;
            Ok(GenericValue::Str(symbol.clone()))
        }
        Schema::Array { items } => {
            let mut elements = Vec::new();
            read_blocks(cur, |cur| {
                elements.push(decode(cur, items)?);
                Ok(())
            })?;
            Ok(GenericValue::Array(elements))
        }
        Schema::Map { values } => {
            let mut entries = IndexMap::new();
            read_blocks(cur, |cur| {
                let key = cur.read_str()?.to_owned();
                let value = decode(cur, values)?;
                entries.insert(key, value);
                Ok(())
            })?;
            Ok(GenericValue::Map(entries))
        }
        Schema::Union(arms) => {
            let index = cur.read_long()?;
            let arm = usize::try_from(index)
                .ok()
                .and_then(|i| arms.get(i))
                .ok_or(DecodeError::UnionIndexOutOfRange {
                    index,
                    arms: arms.len(),
                })?;
            decode(cur, arm)
        }
        Schema::Fixed { size, .. } => Ok(GenericValue::Bytes(cur.read_exact(*size)?.to_vec())),
    }
}

/// Runs `entry` once per element across a block run, until the terminating
/// zero-count block.
fn read_blocks(
    cur: &mut ByteCursor<'_>,
    mut entry: impl FnMut(&mut ByteCursor<'_>) -> Result<(), DecodeError>,
) -> Result<(), DecodeError> {
    loop {
        let count = cur.read_long()?;
        if count == 0 {
            return Ok(());
        }
        if count < 0 {
            return Err(DecodeError::NegativeBlockCount(count));
        }
        for _ in 0..count {
            entry(cur)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;

    fn long_schema_record() -> Schema {
        Schema::Record {
            name: "pair".into(),
            fields: vec![
                Field {
                    name: "first".into(),
                    schema: Schema::Long,
                },
                Field {
                    name: "second".into(),
                    schema: Schema::String,
                },
            ],
        }
    }

    #[test]
    fn null_consumes_no_bytes() {
        let mut cur = ByteCursor::new(&[0xaa]);
        assert_eq!(decode(&mut cur, &Schema::Null), Ok(GenericValue::Null));
        assert_eq!(cur.pos(), 0);
    }

    #[test]
    fn record_fields_keep_declared_order() {
        // first = 3 (zig-zag 6), second = "ab" (len 2 → zig-zag 4).
        let mut cur = ByteCursor::new(&[0x06, 0x04, b'a', b'b']);
        let value = decode(&mut cur, &long_schema_record()).unwrap();
        let GenericValue::Record { name, fields } = value else {
            panic!("expected record");
        };
        assert_eq!(name, "pair");
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys, ["first", "second"]);
        assert_eq!(fields["first"], GenericValue::Int(3));
        assert_eq!(fields["second"], GenericValue::Str("ab".into()));
        assert_eq!(cur.remaining(), 0);
    }

    #[test]
    fn float_widens_to_double() {
        let bytes = 1.5f32.to_le_bytes();
        let mut cur = ByteCursor::new(&bytes);
        assert_eq!(decode(&mut cur, &Schema::Float), Ok(GenericValue::Float(1.5)));
    }

    #[test]
    fn array_blocks_terminate_on_zero_count() {
        // Two blocks: [1, 2] then [3], then the terminator.
        let schema = Schema::Array {
            items: Box::new(Schema::Long),
        };
        let mut cur = ByteCursor::new(&[0x04, 0x02, 0x04, 0x02, 0x06, 0x00]);
        let value = decode(&mut cur, &schema).unwrap();
        assert_eq!(
            value,
            GenericValue::Array(vec![
                GenericValue::Int(1),
                GenericValue::Int(2),
                GenericValue::Int(3),
            ])
        );
    }

    #[test]
    fn negative_block_count_is_rejected() {
        let schema = Schema::Array {
            items: Box::new(Schema::Long),
        };
        // zig-zag(-2) = 3
        let mut cur = ByteCursor::new(&[0x03]);
        assert_eq!(
            decode(&mut cur, &schema),
            Err(DecodeError::NegativeBlockCount(-2))
        );
    }

    #[test]
    fn map_entries_decode_as_string_keyed_pairs() {
        let schema = Schema::Map {
            values: Box::new(Schema::Long),
        };
        // One block with one entry: "k" → 7, then terminator.
        let mut cur = ByteCursor::new(&[0x02, 0x02, b'k', 0x0e, 0x00]);
        let GenericValue::Map(entries) = decode(&mut cur, &schema).unwrap() else {
            panic!("expected map");
        };
        assert_eq!(entries["k"], GenericValue::Int(7));
    }

    #[test]
    fn union_selects_branch_by_index() {
        let schema = Schema::Union(vec![Schema::Null, Schema::String]);
        // Branch 1, "hi".
        let mut cur = ByteCursor::new(&[0x02, 0x04, b'h', b'i']);
        assert_eq!(
            decode(&mut cur, &schema),
            Ok(GenericValue::Str("hi".into()))
        );
        // Branch 0 is null and consumes nothing further.
        let mut cur = ByteCursor::new(&[0x00]);
        assert_eq!(decode(&mut cur, &schema), Ok(GenericValue::Null));
    }

    #[test]
    fn union_index_past_last_branch_is_fatal() {
        let schema = Schema::Union(vec![Schema::Null, Schema::String]);
        // zig-zag(2) = 4 — two branches, valid indices are 0 and 1.
        let mut cur = ByteCursor::new(&[0x04]);
        assert_eq!(
            decode(&mut cur, &schema),
            Err(DecodeError::UnionIndexOutOfRange { index: 2, arms: 2 })
        );
    }

    #[test]
    fn enum_index_out_of_range_is_fatal() {
        let schema = Schema::Enum {
            name: "side".into(),
            symbols: vec!["LEFT".into(), "RIGHT".into()],
        };
        let mut cur = ByteCursor::new(&[0x02]);
        assert_eq!(
            decode(&mut cur, &schema),
            Ok(GenericValue::Str("RIGHT".into()))
        );
        let mut cur = ByteCursor::new(&[0x04]);
        assert_eq!(
            decode(&mut cur, &schema),
            Err(DecodeError::EnumIndexOutOfRange { index: 2, symbols: 2 })
        );
        // A negative index can never name a symbol.
        let mut cur = ByteCursor::new(&[0x01]);
        assert_eq!(
            decode(&mut cur, &schema),
            Err(DecodeError::EnumIndexOutOfRange {
                index: -1,
                symbols: 2
            })
        );
    }

    #[test]
    fn fixed_reads_exactly_declared_size() {
        let schema = Schema::Fixed {
            name: "md5ish".into(),
            size: 4,
        };
        let mut cur = ByteCursor::new(&[1, 2, 3, 4, 5]);
        assert_eq!(
            decode(&mut cur, &schema),
            Ok(GenericValue::Bytes(vec![1, 2, 3, 4]))
        );
        assert_eq!(cur.remaining(), 1);
    }
}
