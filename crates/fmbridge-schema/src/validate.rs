//! Structural conformance checking of decoded values against a [`Schema`].

use serde_json::Value;

use crate::schema::Schema;

impl Schema {
    /// Check whether `value` structurally conforms to this schema.
    ///
    /// The check is strict about declared constraints and lenient about
    /// everything else: object keys not declared in the schema are ignored,
    /// and optional properties may be absent. The first violated constraint
    /// fails the whole value; there is no partial success.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Schema::String(schema) => {
                let Some(text) = value.as_str() else {
                    return false;
                };
                let length = text.chars().count() as u64;
                if schema.min_length.is_some_and(|min| length < min) {
                    return false;
                }
                if schema.max_length.is_some_and(|max| length > max) {
                    return false;
                }
                if let Some(allowed) = &schema.allowed {
                    return allowed.iter().any(|candidate| candidate == text);
                }
                true
            }
            Schema::Number(schema) => {
                // serde_json numbers are never NaN, so as_f64 is the whole
                // type check.
                let Some(number) = value.as_f64() else {
                    return false;
                };
                if schema.minimum.is_some_and(|min| number < min) {
                    return false;
                }
                if schema.maximum.is_some_and(|max| number > max) {
                    return false;
                }
                true
            }
            Schema::Boolean => value.is_boolean(),
            Schema::Array(schema) => {
                let Some(elements) = value.as_array() else {
                    return false;
                };
                let count = elements.len() as u64;
                if schema.min_items.is_some_and(|min| count < min) {
                    return false;
                }
                if schema.max_items.is_some_and(|max| count > max) {
                    return false;
                }
                elements.iter().all(|element| schema.items.accepts(element))
            }
            Schema::Object(schema) => {
                let Some(map) = value.as_object() else {
                    return false;
                };
                if schema.required.iter().any(|name| !map.contains_key(name)) {
                    return false;
                }
                schema.properties.iter().all(|(name, property)| {
                    map.get(name).is_none_or(|nested| property.accepts(nested))
                })
            }
        }
    }
}
