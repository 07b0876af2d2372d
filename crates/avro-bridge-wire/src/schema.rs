//! Avro schema model and schema-definition parsing.
//!
//! A [`Schema`] is immutable once parsed; the registry shares parsed schemas
//! behind `Arc` across concurrent decodes. A record's declared field order is
//! its on-wire decode order.

use serde_json::Value as JsonValue;

use crate::error::SchemaError;
use crate::value::GenericValue;

/// Avro schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Record { name: String, fields: Vec<Field> },
    Enum { name: String, symbols: Vec<String> },
    Array { items: Box<Schema> },
    Map { values: Box<Schema> },
    Union(Vec<Schema>),
    Fixed { name: String, size: usize },
}

/// A field in a record schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub schema: Schema,
}

impl Schema {
    /// Parses Avro schema-definition text (`.avsc` contents).
    ///
    /// Supported: the primitive types, `record`, `enum`, `array`, `map`,
    /// `fixed`, and union arrays. Named-type references are rejected — every
    /// schema served by the registry is self-contained. A `logicalType`
    /// annotation is ignored; the underlying type governs decoding.
    pub fn parse(text: &str) -> Result<Schema, SchemaError> {
        let json: JsonValue = serde_json::from_str(text)?;
        Self::from_json(&json)
    }

    /// Parses a schema from an already-deserialized JSON node.
    pub fn from_json(node: &JsonValue) -> Result<Schema, SchemaError> {
        match node {
            JsonValue::String(name) => {
                primitive(name).ok_or_else(|| SchemaError::UnknownType(name.clone()))
            }
            JsonValue::Array(members) => {
                let members = members
                    .iter()
                    .map(Self::from_json)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Schema::Union(members))
            }
            JsonValue::Object(attrs) => {
                let type_node = attrs
                    .get("type")
                    .ok_or(SchemaError::MissingAttribute {
                        kind: "object",
                        attribute: "type",
                    })?;
                match type_node {
                    JsonValue::String(kind) => from_object(kind, node),
                    // `{"type": [...]}` and `{"type": {...}}` wrap a nested
                    // schema node, as in field declarations.
                    other => Self::from_json(other),
                }
            }
            _ => Err(SchemaError::InvalidNode),
        }
    }

    /// Lowercase name of this schema variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Schema::Null => "null",
            Schema::Boolean => "boolean",
            Schema::Int => "int",
            Schema::Long => "long",
            Schema::Float => "float",
            Schema::Double => "double",
            Schema::Bytes => "bytes",
            Schema::String => "string",
            Schema::Record { .. } => "record",
            Schema::Enum { .. } => "enum",
            Schema::Array { .. } => "array",
            Schema::Map { .. } => "map",
            Schema::Union(_) => "union",
            Schema::Fixed { .. } => "fixed",
        }
    }

    /// Whether this schema can describe a decoded value of the given shape.
    ///
    /// A shallow check used to pick union branches: the value's variant is
    /// matched against the schema tag without descending into children.
    /// Unions never admit directly — a branch must be selected first.
    pub fn admits(&self, value: &GenericValue) -> bool {
        matches!(
            (self, value),
            (Schema::Null, GenericValue::Null)
                | (Schema::Boolean, GenericValue::Bool(_))
                | (Schema::Int | Schema::Long, GenericValue::Int(_))
                | (Schema::Float | Schema::Double, GenericValue::Float(_))
                | (Schema::Bytes | Schema::Fixed { .. }, GenericValue::Bytes(_))
                | (Schema::String | Schema::Enum { .. }, GenericValue::Str(_))
                | (Schema::Record { .. }, GenericValue::Record { .. })
                | (Schema::Array { .. }, GenericValue::Array(_))
                | (Schema::Map { .. }, GenericValue::Map(_))
        )
    }
}

fn primitive(name: &str) -> Option<Schema> {
    Some(match name {
        "null" => Schema::Null,
        "boolean" => Schema::Boolean,
        "int" => Schema::Int,
        "long" => Schema::Long,
        "float" => Schema::Float,
        "double" => Schema::Double,
        "bytes" => Schema::Bytes,
        "string" => Schema::String,
        _ => return None,
    })
}

fn from_object(kind: &str, node: &JsonValue) -> Result<Schema, SchemaError> {
    match kind {
        "record" => {
            let name = required_str(node, "record", "name")?;
            let fields = node
                .get("fields")
                .and_then(JsonValue::as_array)
                .ok_or(SchemaError::MissingAttribute {
                    kind: "record",
                    attribute: "fields",
                })?;
            let mut parsed: Vec<Field> = Vec::with_capacity(fields.len());
            for field in fields {
                let field_name = required_str(field, "field", "name")?;
                let field_type = field.get("type").ok_or(SchemaError::MissingAttribute {
                    kind: "field",
                    attribute: "type",
                })?;
                if parsed.iter().any(|f| f.name == field_name) {
                    return Err(SchemaError::DuplicateField {
                        record: name,
                        field: field_name,
                    });
                }
                parsed.push(Field {
                    name: field_name,
                    schema: Schema::from_json(field_type)?,
                });
            }
            Ok(Schema::Record {
                name,
                fields: parsed,
            })
        }
        "enum" => {
            let name = required_str(node, "enum", "name")?;
            let symbols = node
                .get("symbols")
                .and_then(JsonValue::as_array)
                .ok_or(SchemaError::MissingAttribute {
                    kind: "enum",
                    attribute: "symbols",
                })?
                .iter()
                .map(|s| {
                    s.as_str()
                        .map(str::to_owned)
                        .ok_or(SchemaError::MalformedAttribute {
                            kind: "enum",
                            attribute: "symbols",
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Schema::Enum { name, symbols })
        }
        "array" => {
            let items = node.get("items").ok_or(SchemaError::MissingAttribute {
                kind: "array",
                attribute: "items",
            })?;
            Ok(Schema::Array {
                items: Box::new(Schema::from_json(items)?),
            })
        }
        "map" => {
            let values = node.get("values").ok_or(SchemaError::MissingAttribute {
                kind: "map",
                attribute: "values",
            })?;
            Ok(Schema::Map {
                values: Box::new(Schema::from_json(values)?),
            })
        }
        "fixed" => {
            let name = required_str(node, "fixed", "name")?;
            let size = node
                .get("size")
                .and_then(JsonValue::as_u64)
                .ok_or(SchemaError::MissingAttribute {
                    kind: "fixed",
                    attribute: "size",
                })?;
            Ok(Schema::Fixed {
                name,
                size: size as usize,
            })
        }
        other => primitive(other).ok_or_else(|| SchemaError::UnknownType(other.to_owned())),
    }
}

fn required_str(
    node: &JsonValue,
    kind: &'static str,
    attribute: &'static str,
) -> Result<String, SchemaError> {
    node.get(attribute)
        .and_then(JsonValue::as_str)
        .map(str::to_owned)
        .ok_or(SchemaError::MissingAttribute { kind, attribute })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_primitive_names() {
        assert_eq!(Schema::parse("\"long\"").unwrap(), Schema::Long);
        assert_eq!(Schema::parse("{\"type\": \"string\"}").unwrap(), Schema::String);
    }

    #[test]
    fn parses_record_with_union_field() {
        let schema = Schema::parse(
            r#"{
                "type": "record",
                "name": "CUSTOMER",
                "fields": [
                    {"name": "id", "type": "long"},
                    {"name": "name", "type": ["null", "string"]}
                ]
            }"#,
        )
        .unwrap();
        let Schema::Record { name, fields } = schema else {
            panic!("expected record");
        };
        assert_eq!(name, "CUSTOMER");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "id");
        assert_eq!(fields[0].schema, Schema::Long);
        assert_eq!(
            fields[1].schema,
            Schema::Union(vec![Schema::Null, Schema::String])
        );
    }

    #[test]
    fn parses_nested_array_and_map() {
        let schema = Schema::parse(
            r#"{"type": "array", "items": {"type": "map", "values": "int"}}"#,
        )
        .unwrap();
        assert_eq!(
            schema,
            Schema::Array {
                items: Box::new(Schema::Map {
                    values: Box::new(Schema::Int)
                })
            }
        );
    }

    #[test]
    fn named_reference_is_rejected() {
        let err = Schema::parse(
            r#"{
                "type": "record",
                "name": "Wrapper",
                "fields": [{"name": "again", "type": "Wrapper"}]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType(name) if name == "Wrapper"));
    }

    #[test]
    fn duplicate_field_is_rejected() {
        let err = Schema::parse(
            r#"{
                "type": "record",
                "name": "R",
                "fields": [
                    {"name": "x", "type": "int"},
                    {"name": "x", "type": "long"}
                ]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { field, .. } if field == "x"));
    }

    #[test]
    fn logical_type_annotation_is_ignored() {
        let schema = Schema::parse(
            r#"{"type": "long", "logicalType": "timestamp-millis"}"#,
        )
        .unwrap();
        assert_eq!(schema, Schema::Long);
    }
}
