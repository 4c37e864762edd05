#![deny(missing_docs)]

//! # Legacy Schema Normalization
//!
//! Rewrites the schema dialects emitted by the platform into JSON Schema
//! 2020-12. These rewrites are intentionally conservative: only shapes that
//! are known compatibility gaps are touched, everything else is copied.
//!
//! - field lists (`[{name, type, required}]`) become object schemas,
//! - numeric `required` indices become property names,
//! - `nullable: true` becomes a `[type, "null"]` union,
//! - string `minItems` / `maxItems` become numbers,
//! - `values` becomes `enum`.

use serde_json::{json, Map, Value};

/// The recognized shapes of an incoming schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegacySchema<'a> {
    /// An array of named field descriptors.
    FieldList(&'a [Value]),
    /// A schema object (possibly carrying legacy keywords).
    Object(&'a Map<String, Value>),
    /// Anything else; returned unchanged.
    Passthrough(&'a Value),
}

impl<'a> LegacySchema<'a> {
    /// Classifies a raw value.
    pub fn classify(value: &'a Value) -> LegacySchema<'a> {
        match value {
            Value::Object(map) => LegacySchema::Object(map),
            Value::Array(items) if items.iter().any(|i| field_name(i).is_some()) => {
                LegacySchema::FieldList(items)
            }
            other => LegacySchema::Passthrough(other),
        }
    }
}

/// Normalizes a schema. Total and pure: unrecognized input is returned as-is.
pub fn normalize(schema: &Value) -> Value {
    match LegacySchema::classify(schema) {
        LegacySchema::FieldList(fields) => normalize_field_list(fields),
        LegacySchema::Object(map) => normalize_object(map),
        LegacySchema::Passthrough(value) => value.clone(),
    }
}

fn field_name(value: &Value) -> Option<&str> {
    value.get("name").and_then(Value::as_str)
}

fn normalize_field_list(fields: &[Value]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in fields {
        let (Some(name), Some(map)) = (field_name(field), field.as_object()) else {
            continue;
        };

        if map.get("required").and_then(Value::as_bool) == Some(true) {
            required.push(json!(name));
        }

        let descriptor: Map<String, Value> = map
            .iter()
            .filter(|(k, v)| !(k.as_str() == "name" || (k.as_str() == "required" && v.is_boolean())))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        properties.insert(name.to_string(), normalize_object(&descriptor));
    }

    let mut out = Map::new();
    out.insert("type".into(), json!("object"));
    out.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        out.insert("required".into(), Value::Array(required));
    }
    Value::Object(out)
}

fn normalize_object(map: &Map<String, Value>) -> Value {
    let has_enum = map.contains_key("enum");
    let nullable_type = match (map.get("nullable"), map.get("type")) {
        (Some(Value::Bool(true)), Some(Value::String(t))) => Some(t.as_str()),
        _ => None,
    };
    let property_names: Vec<&String> = map
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| props.keys().collect())
        .unwrap_or_default();

    let mut out = Map::new();
    for (key, value) in map {
        match key.as_str() {
            "nullable" if nullable_type.is_some() => {}
            "type" if nullable_type.is_some() => {
                let union = match nullable_type {
                    Some("null") | None => json!("null"),
                    Some(t) => json!([t, "null"]),
                };
                out.insert(key.clone(), union);
            }
            "values" if !has_enum => {
                out.insert("enum".into(), value.clone());
            }
            "minItems" | "maxItems" => {
                out.insert(key.clone(), coerce_count(value));
            }
            "required" => {
                if let Some(required) = remap_required(value, &property_names) {
                    out.insert(key.clone(), required);
                }
            }
            "properties" => {
                let normalized = match value {
                    Value::Object(props) => Value::Object(
                        props
                            .iter()
                            .map(|(name, schema)| (name.clone(), normalize(schema)))
                            .collect(),
                    ),
                    other => other.clone(),
                };
                out.insert(key.clone(), normalized);
            }
            "items" => {
                out.insert(key.clone(), normalize(value));
            }
            "additionalProperties" if value.is_object() => {
                out.insert(key.clone(), normalize(value));
            }
            "allOf" | "oneOf" | "anyOf" => {
                let normalized = match value {
                    Value::Array(members) => Value::Array(members.iter().map(normalize).collect()),
                    other => other.clone(),
                };
                out.insert(key.clone(), normalized);
            }
            _ => {
                out.insert(key.clone(), value.clone());
            }
        }
    }
    Value::Object(out)
}

/// Returns the rewritten `required` value, or `None` when it should be omitted.
fn remap_required(value: &Value, property_names: &[&String]) -> Option<Value> {
    let Value::Array(entries) = value else {
        return Some(value.clone());
    };
    if !entries.iter().any(Value::is_number) {
        return Some(value.clone());
    }

    let names: Vec<Value> = entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(s) => Some(json!(s)),
            Value::Number(n) => n
                .as_u64()
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| property_names.get(i))
                .map(|name| json!(name)),
            _ => None,
        })
        .collect();

    (!names.is_empty()).then_some(Value::Array(names))
}

fn coerce_count(value: &Value) -> Value {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<u64>()
                .map(Value::from)
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(Value::from))
                .unwrap_or_else(|| value.clone())
        }
        other => other.clone(),
    }
}
