//! Projection of decoded value trees into JSON documents.
//!
//! The walk is lock-step over the value and its schema. Dispatch is
//! two-tier: the decoded value's runtime shape decides first (null wins
//! outright, strings stay strings whatever the schema tag, record- and
//! map-shaped values recurse structurally), and the schema tag resolves the
//! remaining primitive cases — that is what keeps `long` fields numeric and
//! `double` fields floating in the output instead of everything collapsing
//! to text.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use indexmap::IndexMap;
use serde_json::{Map, Number, Value as JsonValue};
use thiserror::Error;

use avro_bridge_wire::{GenericValue, Schema};

/// Failure while projecting a decoded value to JSON.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("{schema} schema cannot describe decoded {value} value")]
    ShapeMismatch {
        schema: &'static str,
        value: &'static str,
    },
    #[error("no union branch matches decoded {value} value")]
    NoUnionBranch { value: &'static str },
    #[error("non-finite number {0} has no JSON representation")]
    NonFiniteNumber(f64),
    #[error("legacy map projection produced an unparseable object literal: {0}")]
    LegacyMapLiteral(String),
}

/// Projection switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectOptions {
    /// Compatibility mode for map values: re-serialize every entry as a
    /// quoted `"key": "value"` text pair and re-parse the concatenation as a
    /// JSON object literal. All map values become strings and nothing is
    /// escaped, so keys or values containing `"` or `,` fail the re-parse.
    /// Off by default; the typed projection keeps the value schema's types.
    pub legacy_string_maps: bool,
}

/// Projects one decoded value against its schema.
///
/// Record projection walks the schema's fields in declared order and simply
/// omits any field name the decoded record does not carry.
pub fn project(
    value: &GenericValue,
    schema: &Schema,
    options: &ProjectOptions,
) -> Result<JsonValue, ProjectionError> {
    if let GenericValue::Null = value {
        return Ok(JsonValue::Null);
    }
    let schema = resolve_union(schema, value)?;
    match value {
        GenericValue::Null => Ok(JsonValue::Null),
        GenericValue::Str(s) => Ok(JsonValue::String(s.clone())),
        GenericValue::Record { fields, .. } => {
            let Schema::Record {
                fields: schema_fields,
                ..
            } = schema
            else {
                return Err(ProjectionError::ShapeMismatch {
                    schema: schema.kind(),
                    value: value.kind(),
                });
            };
            let mut out = Map::with_capacity(schema_fields.len());
            for field in schema_fields {
                let Some(field_value) = fields.get(&field.name) else {
                    continue;
                };
                out.insert(
                    field.name.clone(),
                    project(field_value, &field.schema, options)?,
                );
            }
            Ok(JsonValue::Object(out))
        }
        GenericValue::Map(entries) => {
            if options.legacy_string_maps {
                project_map_legacy(entries)
            } else {
                let Schema::Map { values } = schema else {
                    return Err(ProjectionError::ShapeMismatch {
                        schema: schema.kind(),
                        value: value.kind(),
                    });
                };
                let mut out = Map::with_capacity(entries.len());
                for (key, entry) in entries {
                    out.insert(key.clone(), project(entry, values, options)?);
                }
                Ok(JsonValue::Object(out))
            }
        }
        value => match schema {
            Schema::Boolean => match value {
                GenericValue::Bool(b) => Ok(JsonValue::Bool(*b)),
                other => Err(mismatch(schema, other)),
            },
            Schema::Int | Schema::Long => match value {
                GenericValue::Int(n) => Ok(JsonValue::Number(Number::from(*n))),
                other => Err(mismatch(schema, other)),
            },
            Schema::Float | Schema::Double => match value {
                GenericValue::Float(f) => Number::from_f64(*f)
                    .map(JsonValue::Number)
                    .ok_or(ProjectionError::NonFiniteNumber(*f)),
                GenericValue::Int(n) => Ok(JsonValue::Number(Number::from(*n))),
                other => Err(mismatch(schema, other)),
            },
            Schema::Array { items } => match value {
                GenericValue::Array(elements) => Ok(JsonValue::Array(
                    elements
                        .iter()
                        .map(|element| project(element, items, options))
                        .collect::<Result<Vec<_>, _>>()?,
                )),
                other => Err(mismatch(schema, other)),
            },
            Schema::Record { .. } | Schema::Map { .. } => Err(mismatch(schema, value)),
            // Everything else renders as text.
            _ => match value {
                GenericValue::Bytes(data) => Ok(JsonValue::String(BASE64.encode(data))),
                GenericValue::Bool(b) => Ok(JsonValue::String(b.to_string())),
                GenericValue::Int(n) => Ok(JsonValue::String(n.to_string())),
                GenericValue::Float(f) => Ok(JsonValue::String(f.to_string())),
                other => Err(mismatch(schema, other)),
            },
        },
    }
}

fn mismatch(schema: &Schema, value: &GenericValue) -> ProjectionError {
    ProjectionError::ShapeMismatch {
        schema: schema.kind(),
        value: value.kind(),
    }
}

/// Picks the union branch matching the value's shape; non-union schemas pass
/// through unchanged.
fn resolve_union<'s>(
    schema: &'s Schema,
    value: &GenericValue,
) -> Result<&'s Schema, ProjectionError> {
    let Schema::Union(arms) = schema else {
        return Ok(schema);
    };
    arms.iter()
        .find(|arm| arm.admits(value))
        .ok_or(ProjectionError::NoUnionBranch {
            value: value.kind(),
        })
}

/// The inherited stringly map projection: values lose their types and the
/// object literal is assembled by concatenation without escaping.
fn project_map_legacy(
    entries: &IndexMap<String, GenericValue>,
) -> Result<JsonValue, ProjectionError> {
    let body = entries
        .iter()
        .map(|(key, value)| format!("\"{}\": \"{}\"", key, legacy_text(value)))
        .collect::<Vec<_>>()
        .join(",");
    let literal = format!("{{{body}}}");
    serde_json::from_str(&literal).map_err(|_| ProjectionError::LegacyMapLiteral(literal))
}

fn legacy_text(value: &GenericValue) -> String {
    match value {
        GenericValue::Null => String::new(),
        GenericValue::Bool(b) => b.to_string(),
        GenericValue::Int(n) => n.to_string(),
        GenericValue::Float(f) => f.to_string(),
        GenericValue::Bytes(data) => BASE64.encode(data),
        GenericValue::Str(s) => s.clone(),
        // Structured map values degrade to their shape name, matching the
        // to-string degradation this mode inherited.
        other => other.kind().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn opts() -> ProjectOptions {
        ProjectOptions::default()
    }

    #[test]
    fn null_wins_over_any_schema_tag() {
        for schema in [Schema::Long, Schema::String, Schema::Boolean] {
            assert_eq!(
                project(&GenericValue::Null, &schema, &opts()).unwrap(),
                JsonValue::Null
            );
        }
    }

    #[test]
    fn string_value_stays_a_string_regardless_of_schema() {
        let value = GenericValue::Str("207".into());
        assert_eq!(
            project(&value, &Schema::Long, &opts()).unwrap(),
            json!("207")
        );
    }

    #[test]
    fn integer_fields_become_json_integers() {
        let projected = project(&GenericValue::Int(42), &Schema::Long, &opts()).unwrap();
        assert_eq!(projected, json!(42));
        assert!(projected.is_i64());
    }

    #[test]
    fn float_fields_become_json_floats() {
        let projected = project(&GenericValue::Float(10.5), &Schema::Double, &opts()).unwrap();
        assert_eq!(projected, json!(10.5));
        assert!(projected.is_f64());
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        assert!(matches!(
            project(&GenericValue::Float(f64::NAN), &Schema::Double, &opts()),
            Err(ProjectionError::NonFiniteNumber(f)) if f.is_nan()
        ));
    }

    #[test]
    fn bytes_fall_back_to_base64_text() {
        let projected =
            project(&GenericValue::Bytes(vec![0xde, 0xad]), &Schema::Bytes, &opts()).unwrap();
        assert_eq!(projected, json!("3q0="));
    }

    #[test]
    fn union_null_and_branch_projection() {
        let schema = Schema::Union(vec![Schema::Null, Schema::Long]);
        assert_eq!(
            project(&GenericValue::Null, &schema, &opts()).unwrap(),
            JsonValue::Null
        );
        assert_eq!(
            project(&GenericValue::Int(5), &schema, &opts()).unwrap(),
            json!(5)
        );
        assert_eq!(
            project(&GenericValue::Str("x".into()), &schema, &opts()),
            Err(ProjectionError::NoUnionBranch { value: "string" })
        );
    }

    #[test]
    fn record_fields_absent_from_the_value_are_omitted() {
        use avro_bridge_wire::Field;
        let schema = Schema::Record {
            name: "R".into(),
            fields: vec![
                Field {
                    name: "present".into(),
                    schema: Schema::Long,
                },
                Field {
                    name: "gone".into(),
                    schema: Schema::String,
                },
            ],
        };
        let mut fields = indexmap::IndexMap::new();
        fields.insert("present".to_string(), GenericValue::Int(1));
        let value = GenericValue::Record {
            name: "R".into(),
            fields,
        };
        assert_eq!(
            project(&value, &schema, &opts()).unwrap(),
            json!({"present": 1})
        );
    }

    #[test]
    fn nested_records_recurse_structurally() {
        use avro_bridge_wire::Field;
        let inner_schema = Schema::Record {
            name: "Inner".into(),
            fields: vec![Field {
                name: "n".into(),
                schema: Schema::Int,
            }],
        };
        let schema = Schema::Record {
            name: "Outer".into(),
            fields: vec![Field {
                name: "inner".into(),
                schema: inner_schema,
            }],
        };
        let mut inner = indexmap::IndexMap::new();
        inner.insert("n".to_string(), GenericValue::Int(9));
        let mut outer = indexmap::IndexMap::new();
        outer.insert(
            "inner".to_string(),
            GenericValue::Record {
                name: "Inner".into(),
                fields: inner,
            },
        );
        let value = GenericValue::Record {
            name: "Outer".into(),
            fields: outer,
        };
        assert_eq!(
            project(&value, &schema, &opts()).unwrap(),
            json!({"inner": {"n": 9}})
        );
    }

    #[test]
    fn typed_map_projection_keeps_value_types() {
        let schema = Schema::Map {
            values: Box::new(Schema::Long),
        };
        let mut entries = indexmap::IndexMap::new();
        entries.insert("a".to_string(), GenericValue::Int(1));
        entries.insert("b".to_string(), GenericValue::Int(2));
        let projected = project(&GenericValue::Map(entries), &schema, &opts()).unwrap();
        assert_eq!(projected, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn legacy_map_projection_quotes_every_value() {
        let schema = Schema::Map {
            values: Box::new(Schema::Long),
        };
        let mut entries = indexmap::IndexMap::new();
        entries.insert("a".to_string(), GenericValue::Int(1));
        let options = ProjectOptions {
            legacy_string_maps: true,
        };
        let projected = project(&GenericValue::Map(entries), &schema, &options).unwrap();
        assert_eq!(projected, json!({"a": "1"}));
    }

    #[test]
    fn legacy_map_projection_breaks_on_embedded_quotes() {
        let schema = Schema::Map {
            values: Box::new(Schema::String),
        };
        let mut entries = indexmap::IndexMap::new();
        entries.insert("note".to_string(), GenericValue::Str("say \"hi\"".into()));
        let options = ProjectOptions {
            legacy_string_maps: true,
        };
        assert!(matches!(
            project(&GenericValue::Map(entries), &schema, &options),
            Err(ProjectionError::LegacyMapLiteral(_))
        ));
    }
}
