//! The schema document type and its shape validation.
//!
//! A [`Schema`] is parsed from a plain JSON document with
//! [`Schema::from_value`], which doubles as the shape validator: any node
//! with an unrecognized `type` tag, or a composite node missing its
//! children, is rejected before a generation request is ever dispatched.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::error::SchemaError;

/// A closed subset of JSON Schema accepted by the structured generation
/// pipeline.
///
/// Exactly five kinds are understood: `string`, `number`, `boolean`,
/// `array`, and `object`. Composite kinds recurse, so a schema is only
/// well-formed when every nested node is well-formed too.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    String(StringSchema),
    Number(NumberSchema),
    Boolean,
    Array(ArraySchema),
    Object(ObjectSchema),
}

/// Constraints for `string` schema nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringSchema {
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    /// Closed set of allowed values (the JSON Schema `enum` keyword).
    pub allowed: Option<Vec<String>>,
}

/// Constraints for `number` schema nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberSchema {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

/// Constraints for `array` schema nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    pub items: Box<Schema>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

/// Constraints for `object` schema nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    /// Declared properties by name. Keys absent from this map are ignored
    /// during value validation; the schema is not closed.
    pub properties: BTreeMap<String, Schema>,
    /// Property names that must be present on a conforming value.
    pub required: Vec<String>,
}

impl Schema {
    /// Parse and shape-check a schema document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when any node, at any depth, is not a JSON
    /// object, carries a missing or unrecognized `type` tag, or declares a
    /// malformed constraint. The error names the offending path.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        parse_node(value, "$")
    }

    /// Serialize back into the plain JSON document form understood by
    /// guided-generation backends.
    pub fn to_value(&self) -> Value {
        match self {
            Schema::String(s) => {
                let mut map = Map::new();
                map.insert("type".into(), json!("string"));
                if let Some(n) = s.min_length {
                    map.insert("minLength".into(), json!(n));
                }
                if let Some(n) = s.max_length {
                    map.insert("maxLength".into(), json!(n));
                }
                if let Some(values) = &s.allowed {
                    map.insert("enum".into(), json!(values));
                }
                Value::Object(map)
            }
            Schema::Number(s) => {
                let mut map = Map::new();
                map.insert("type".into(), json!("number"));
                if let Some(n) = s.minimum {
                    map.insert("minimum".into(), json!(n));
                }
                if let Some(n) = s.maximum {
                    map.insert("maximum".into(), json!(n));
                }
                Value::Object(map)
            }
            Schema::Boolean => json!({"type": "boolean"}),
            Schema::Array(s) => {
                let mut map = Map::new();
                map.insert("type".into(), json!("array"));
                map.insert("items".into(), s.items.to_value());
                if let Some(n) = s.min_items {
                    map.insert("minItems".into(), json!(n));
                }
                if let Some(n) = s.max_items {
                    map.insert("maxItems".into(), json!(n));
                }
                Value::Object(map)
            }
            Schema::Object(s) => {
                let properties: Map<String, Value> = s
                    .properties
                    .iter()
                    .map(|(name, schema)| (name.clone(), schema.to_value()))
                    .collect();
                let mut map = Map::new();
                map.insert("type".into(), json!("object"));
                map.insert("properties".into(), Value::Object(properties));
                if !s.required.is_empty() {
                    map.insert("required".into(), json!(s.required));
                }
                Value::Object(map)
            }
        }
    }
}

fn parse_node(value: &Value, path: &str) -> Result<Schema, SchemaError> {
    let map = value.as_object().ok_or_else(|| SchemaError::NotAnObject {
        path: path.to_owned(),
    })?;

    let tag = match map.get("type") {
        Some(Value::String(tag)) => tag.as_str(),
        Some(other) => {
            return Err(SchemaError::UnknownType {
                path: path.to_owned(),
                found: other.to_string(),
            });
        }
        None => {
            return Err(SchemaError::MissingType {
                path: path.to_owned(),
            });
        }
    };

    match tag {
        "string" => Ok(Schema::String(StringSchema {
            min_length: opt_u64(map, "minLength", path)?,
            max_length: opt_u64(map, "maxLength", path)?,
            allowed: opt_string_list(map, "enum", path)?,
        })),
        "number" => Ok(Schema::Number(NumberSchema {
            minimum: opt_f64(map, "minimum", path)?,
            maximum: opt_f64(map, "maximum", path)?,
        })),
        "boolean" => Ok(Schema::Boolean),
        "array" => {
            let items = map.get("items").ok_or_else(|| SchemaError::MissingField {
                path: path.to_owned(),
                kind: "array",
                field: "items",
            })?;
            let items = parse_node(items, &child_path(path, "items"))?;
            Ok(Schema::Array(ArraySchema {
                items: Box::new(items),
                min_items: opt_u64(map, "minItems", path)?,
                max_items: opt_u64(map, "maxItems", path)?,
            }))
        }
        "object" => {
            let properties = map
                .get("properties")
                .ok_or_else(|| SchemaError::MissingField {
                    path: path.to_owned(),
                    kind: "object",
                    field: "properties",
                })?;
            let properties = properties
                .as_object()
                .ok_or_else(|| SchemaError::InvalidConstraint {
                    path: path.to_owned(),
                    message: "`properties` must be an object".to_owned(),
                })?;

            let mut parsed = BTreeMap::new();
            for (name, node) in properties {
                let nested = child_path(path, &format!("properties.{name}"));
                parsed.insert(name.clone(), parse_node(node, &nested)?);
            }

            Ok(Schema::Object(ObjectSchema {
                properties: parsed,
                required: opt_string_list(map, "required", path)?.unwrap_or_default(),
            }))
        }
        other => Err(SchemaError::UnknownType {
            path: path.to_owned(),
            found: other.to_owned(),
        }),
    }
}

fn child_path(path: &str, segment: &str) -> String {
    format!("{path}.{segment}")
}

fn opt_u64(map: &Map<String, Value>, key: &str, path: &str) -> Result<Option<u64>, SchemaError> {
    match map.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_u64()
            .map(Some)
            .ok_or_else(|| SchemaError::InvalidConstraint {
                path: path.to_owned(),
                message: format!("`{key}` must be a non-negative integer"),
            }),
    }
}

fn opt_f64(map: &Map<String, Value>, key: &str, path: &str) -> Result<Option<f64>, SchemaError> {
    match map.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| SchemaError::InvalidConstraint {
                path: path.to_owned(),
                message: format!("`{key}` must be a number"),
            }),
    }
}

fn opt_string_list(
    map: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<Vec<String>>, SchemaError> {
    let Some(value) = map.get(key) else {
        return Ok(None);
    };
    let entries = value
        .as_array()
        .ok_or_else(|| SchemaError::InvalidConstraint {
            path: path.to_owned(),
            message: format!("`{key}` must be an array of strings"),
        })?;

    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        let text = entry
            .as_str()
            .ok_or_else(|| SchemaError::InvalidConstraint {
                path: path.to_owned(),
                message: format!("`{key}` must contain only strings"),
            })?;
        out.push(text.to_owned());
    }
    Ok(Some(out))
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Schema::from_value(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parse_all_five_kinds() {
        let doc = json!({
            "type": "object",
            "required": ["name", "qty"],
            "properties": {
                "name": {"type": "string", "minLength": 1, "maxLength": 64},
                "qty": {"type": "number", "minimum": 0},
                "urgent": {"type": "boolean"},
                "tags": {"type": "array", "items": {"type": "string", "enum": ["a", "b"]}}
            }
        });

        let schema = Schema::from_value(&doc).expect("schema should parse");
        let Schema::Object(object) = &schema else {
            panic!("expected object schema");
        };
        assert_eq!(object.required, vec!["name", "qty"]);
        assert_eq!(object.properties.len(), 4);
        assert!(matches!(object.properties["urgent"], Schema::Boolean));
    }

    #[test]
    fn test_should_reject_unknown_type_tag() {
        let err = Schema::from_value(&json!({"type": "tuple"})).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownType {
                path: "$".to_owned(),
                found: "tuple".to_owned(),
            }
        );
    }

    #[test]
    fn test_should_reject_missing_type_tag() {
        let err = Schema::from_value(&json!({"minimum": 3})).unwrap_err();
        assert!(matches!(err, SchemaError::MissingType { .. }));
    }

    #[test]
    fn test_should_reject_non_object_node() {
        let err = Schema::from_value(&json!("string")).unwrap_err();
        assert!(matches!(err, SchemaError::NotAnObject { .. }));
    }

    #[test]
    fn test_should_reject_object_without_properties() {
        let err = Schema::from_value(&json!({"type": "object"})).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingField {
                path: "$".to_owned(),
                kind: "object",
                field: "properties",
            }
        );
    }

    #[test]
    fn test_should_reject_array_without_items() {
        let err = Schema::from_value(&json!({"type": "array"})).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::MissingField { field: "items", .. }
        ));
    }

    #[test]
    fn test_should_reject_invalid_nested_schema_with_path() {
        let doc = json!({
            "type": "object",
            "properties": {
                "entries": {
                    "type": "array",
                    "items": {"type": "tuple"}
                }
            }
        });

        let err = Schema::from_value(&doc).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownType {
                path: "$.properties.entries.items".to_owned(),
                found: "tuple".to_owned(),
            }
        );
    }

    #[test]
    fn test_should_reject_non_string_enum_values() {
        let err = Schema::from_value(&json!({"type": "string", "enum": ["a", 2]})).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidConstraint { .. }));
    }

    #[test]
    fn test_should_round_trip_through_document_form() {
        let doc = json!({
            "type": "array",
            "items": {
                "type": "object",
                "required": ["name"],
                "properties": {"name": {"type": "string"}}
            },
            "minItems": 1,
            "maxItems": 10
        });

        let schema = Schema::from_value(&doc).expect("schema should parse");
        assert_eq!(schema.to_value(), doc);

        let reparsed = Schema::from_value(&schema.to_value()).expect("round trip should parse");
        assert_eq!(reparsed, schema);
    }

    #[test]
    fn test_should_deserialize_via_serde() {
        let schema: Schema =
            serde_json::from_str(r#"{"type": "number", "minimum": 1.5}"#).expect("should parse");
        assert!(matches!(schema, Schema::Number(_)));

        let bad = serde_json::from_str::<Schema>(r#"{"type": "tuple"}"#);
        assert!(bad.is_err());
    }
}
