#![deny(missing_docs)]

//! # Table Schema Conversion
//!
//! Converts the platform's table field descriptors into JSON Schema objects
//! suitable for `components.schemas`.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};
use std::sync::OnceLock;

/// A table column (or nested object member) as described by the platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XanoField {
    /// Column name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Platform type: `int`, `text`, `enum`, `vector`, ...
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub field_type: String,
    /// `single` or `list`.
    pub style: Option<String>,
    /// Allowed values of an `enum` field.
    pub values: Option<Vec<Value>>,
    /// Default value; numeric-looking strings become numbers.
    pub default: Option<Value>,
    /// Whether `null` is accepted.
    #[serde(default, deserialize_with = "null_as_default")]
    pub nullable: bool,
    /// Column documentation.
    pub description: Option<String>,
    /// Members of an `object` field.
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<XanoField>,
    /// `public`, `private` or `internal`.
    pub access: Option<String>,
    /// Whether the column must be supplied.
    #[serde(default, deserialize_with = "null_as_default")]
    pub required: bool,
}

impl XanoField {
    /// True for fields hidden from API consumers.
    pub fn is_internal(&self) -> bool {
        self.access.as_deref() == Some("internal")
    }

    /// True for `style: list` fields.
    pub fn is_list(&self) -> bool {
        self.style.as_deref() == Some("list")
    }
}

/// Reads a field list element by element, skipping descriptors that do not
/// deserialize.
pub fn fields_from_values(items: &[Value]) -> Vec<XanoField> {
    items
        .iter()
        .filter_map(|item| match XanoField::deserialize(item) {
            Ok(field) => Some(field),
            Err(e) => {
                log::warn!("skipping malformed field descriptor: {}", e);
                None
            }
        })
        .collect()
}

/// `null` reads as the type's default, like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Conversion switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Keep `access: internal` columns.
    pub include_internal: bool,
}

/// Maps a platform type onto a JSON Schema type name.
pub fn json_type_for(field_type: &str) -> &'static str {
    match field_type {
        "int" => "integer",
        "decimal" => "number",
        "text" => "string",
        "enum" => "string",
        "timestamp" => "integer",
        "object" => "object",
        "json" => "object",
        "vector" => "number",
        "bool" => "boolean",
        _ => "string",
    }
}

/// Converts a table's fields into an object schema.
///
/// Internal fields are dropped at the top level unless
/// [`ConvertOptions::include_internal`] is set.
pub fn convert(fields: &[XanoField], options: ConvertOptions) -> Value {
    let visible: Vec<&XanoField> = fields
        .iter()
        .filter(|f| options.include_internal || !f.is_internal())
        .collect();
    object_schema(&visible)
}

/// Converts one field.
pub fn convert_field(field: &XanoField) -> Value {
    if field.field_type == "vector" {
        return json!({ "type": "array", "items": { "type": "number" } });
    }

    if field.is_list() {
        let single = XanoField {
            style: None,
            description: None,
            ..field.clone()
        };
        let mut schema = Map::new();
        schema.insert("type".into(), json!("array"));
        schema.insert("items".into(), convert_field(&single));
        if let Some(description) = &field.description {
            schema.insert("description".into(), json!(description));
        }
        return Value::Object(schema);
    }

    let base = json_type_for(&field.field_type);
    let mut schema = Map::new();
    schema.insert(
        "type".into(),
        if field.nullable {
            json!([base, "null"])
        } else {
            json!(base)
        },
    );

    if let Some(description) = field.description.as_ref().filter(|d| !d.is_empty()) {
        schema.insert("description".into(), json!(description));
    }

    if field.field_type == "enum" {
        if let Some(values) = &field.values {
            let mut values = values.clone();
            if field.nullable && !values.contains(&Value::Null) {
                values.push(Value::Null);
            }
            schema.insert("enum".into(), Value::Array(values));
        }
    }

    if let Some(default) = field.default.as_ref().and_then(coerce_default) {
        schema.insert("default".into(), default);
    }

    if !field.children.is_empty() {
        let children: Vec<&XanoField> = field.children.iter().collect();
        if let Value::Object(nested) = object_schema(&children) {
            for key in ["properties", "required"] {
                if let Some(v) = nested.get(key) {
                    schema.insert(key.into(), v.clone());
                }
            }
        }
    }

    Value::Object(schema)
}

fn object_schema(fields: &[&XanoField]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in fields {
        properties.insert(field.name.clone(), convert_field(field));
        if field.required {
            required.push(json!(field.name));
        }
    }

    let mut schema = Map::new();
    schema.insert("type".into(), json!("object"));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".into(), Value::Array(required));
    }
    Value::Object(schema)
}

fn coerce_default(value: &Value) -> Option<Value> {
    static NUMERIC_RE: OnceLock<Regex> = OnceLock::new();
    let numeric_re =
        NUMERIC_RE.get_or_init(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("Invalid regex"));

    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) if numeric_re.is_match(s.trim()) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .map(Value::from)
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(Value::from))
                .or_else(|| Some(value.clone()))
        }
        other => Some(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(name: &str, field_type: &str) -> XanoField {
        XanoField {
            name: name.into(),
            field_type: field_type.into(),
            ..XanoField::default()
        }
    }

    #[test]
    fn test_vector_ignores_other_flags() {
        let mut vector = field("embedding", "vector");
        vector.nullable = true;
        vector.style = Some("list".into());
        vector.default = Some(json!("1"));
        assert_eq!(
            convert_field(&vector),
            json!({ "type": "array", "items": { "type": "number" } })
        );
    }

    #[test]
    fn test_type_map_and_unknown() {
        assert_eq!(json_type_for("int"), "integer");
        assert_eq!(json_type_for("timestamp"), "integer");
        assert_eq!(json_type_for("json"), "object");
        assert_eq!(json_type_for("geo_point"), "string");
    }

    #[test]
    fn test_list_enum_nullable_default() {
        let mut tags = field("tags", "enum");
        tags.style = Some("list".into());
        tags.values = Some(vec![json!("a"), json!("b")]);

        let mut score = field("score", "decimal");
        score.nullable = true;
        score.default = Some(json!("2.5"));
        score.required = true;

        let mut count = field("count", "int");
        count.default = Some(json!("10"));

        let mut title = field("title", "text");
        title.default = Some(json!(""));

        let schema = convert(&[tags, score, count, title], ConvertOptions::default());
        assert_eq!(
            schema,
            json!({
                "type": "object",
                "properties": {
                    "tags": { "type": "array", "items": { "type": "string", "enum": ["a", "b"] } },
                    "score": { "type": ["number", "null"], "default": 2.5 },
                    "count": { "type": "integer", "default": 10 },
                    "title": { "type": "string" }
                },
                "required": ["score"]
            })
        );
    }

    #[test]
    fn test_children_and_internal_fields() {
        let mut address = field("address", "object");
        let mut city = field("city", "text");
        city.required = true;
        address.children = vec![city, field("zip", "text")];

        let mut secret = field("password_hash", "text");
        secret.access = Some("internal".into());

        let fields = vec![address, secret];
        let public = convert(&fields, ConvertOptions::default());
        assert!(public["properties"].get("password_hash").is_none());
        assert!(public.get("required").is_none());
        assert_eq!(
            public["properties"]["address"],
            json!({
                "type": "object",
                "properties": {
                    "city": { "type": "string" },
                    "zip": { "type": "string" }
                },
                "required": ["city"]
            })
        );

        let all = convert(&fields, ConvertOptions { include_internal: true });
        assert!(all["properties"].get("password_hash").is_some());
    }

    #[test]
    fn test_nullable_enum_accepts_null() {
        let mut status = field("status", "enum");
        status.nullable = true;
        status.values = Some(vec![json!("open"), json!("closed")]);
        assert_eq!(
            convert_field(&status),
            json!({ "type": ["string", "null"], "enum": ["open", "closed", null] })
        );
    }

    #[test]
    fn test_null_flags_read_as_defaults() {
        let f: XanoField = serde_json::from_value(json!({
            "name": "email", "type": "text", "nullable": null, "required": null, "children": null
        }))
        .unwrap();
        assert_eq!(f.name, "email");
        assert!(!f.nullable);
        assert!(!f.required);
        assert!(f.children.is_empty());
    }

    #[test]
    fn test_fields_from_values_skips_only_bad_entries() {
        let fields = fields_from_values(&[
            json!({ "name": "id", "type": "int" }),
            json!({ "name": "email", "type": "text", "children": null }),
            json!({ "name": "broken", "required": "yes" }),
            json!("stray"),
        ]);
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "email"]);
    }

    #[test]
    fn test_deserialize_lenient_field() {
        let f: XanoField = serde_json::from_value(json!({
            "name": "id", "type": "int", "extra": 1
        }))
        .unwrap();
        assert_eq!(f.field_type, "int");
        assert!(!f.nullable);
        assert!(f.children.is_empty());
    }
}
