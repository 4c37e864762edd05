#![deny(missing_docs)]

//! # OpenAPI Enrichment
//!
//! Turns the platform's raw OpenAPI output into a 3.1 document with global
//! tags, shared error responses, a default bearer scheme, table-derived
//! component schemas and normalized operation schemas.
//!
//! Enrichment works on a copy; the input document is never modified.

use crate::oas::errors::{StandardError, STANDARD_ERRORS};
use crate::oas::normalization::normalize;
use indexmap::{IndexMap, IndexSet};
use serde_json::{json, Map, Value};

/// Version written to `openapi`.
pub const OPENAPI_VERSION: &str = "3.1.1";

/// Name of the security scheme added when none is configured.
pub const DEFAULT_SECURITY_SCHEME: &str = "bearerAuth";

/// HTTP methods that may appear as keys of a path item.
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Request-body media types whose schemas are normalized.
const BODY_MEDIA_TYPES: [&str; 2] = ["application/json", "multipart/form-data"];

/// Precomputed inputs merged into the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichInput {
    /// Component name -> schema, already converted from table fields.
    pub table_schemas: IndexMap<String, Value>,
    /// `<METHOD>:<path>` -> schema of the 200 response.
    pub response_schemas: IndexMap<String, Value>,
}

/// Produces the enriched copy of `oas`.
pub fn enrich(oas: &Value, input: &EnrichInput) -> Value {
    let mut doc = match oas {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    doc.insert("openapi".into(), json!(OPENAPI_VERSION));

    if let Some(paths) = doc.get_mut("paths").and_then(Value::as_object_mut) {
        for (path, item) in paths.iter_mut() {
            let Some(item) = item.as_object_mut() else {
                continue;
            };
            for method in HTTP_METHODS {
                if let Some(operation) = item.get_mut(method).and_then(Value::as_object_mut) {
                    enrich_operation(operation, method, path, input);
                }
            }
        }
    }

    let tags = collect_tags(&doc);
    doc.insert("tags".into(), Value::Array(tags));

    let components = object_entry(&mut doc, "components");
    merge_error_components(components);
    let schemas = object_entry(components, "schemas");
    for (name, schema) in &input.table_schemas {
        schemas.insert(name.clone(), schema.clone());
    }
    let scheme_name = ensure_security_scheme(components);

    if !doc.contains_key("security") {
        doc.insert("security".into(), json!([{ scheme_name: [] }]));
    }

    Value::Object(doc)
}

/// `<METHOD>:<path>`, the key of precomputed response schemas and the summary.
pub fn operation_key(method: &str, path: &str) -> String {
    format!("{}:{}", method.to_uppercase(), path)
}

fn enrich_operation(
    operation: &mut Map<String, Value>,
    method: &str,
    path: &str,
    input: &EnrichInput,
) {
    let key = operation_key(method, path);

    if let Some(content) = operation
        .get_mut("requestBody")
        .and_then(|body| body.get_mut("content"))
        .and_then(Value::as_object_mut)
    {
        for media in BODY_MEDIA_TYPES {
            if let Some(schema) = content.get_mut(media).and_then(|m| m.get_mut("schema")) {
                *schema = normalize(schema);
            }
        }
    }

    let responses = object_entry(operation, "responses");
    for (status, response) in responses.iter_mut() {
        if StandardError::for_status(status).is_some() {
            continue;
        }
        if status == "200" {
            if let Some(schema) = input.response_schemas.get(&key) {
                set_json_schema(response, schema.clone());
                continue;
            }
        }
        if let Some(schema) = response
            .get_mut("content")
            .and_then(|c| c.get_mut("application/json"))
            .and_then(|m| m.get_mut("schema"))
        {
            *schema = normalize(schema);
        }
    }
    if !responses.contains_key("200") {
        if let Some(schema) = input.response_schemas.get(&key) {
            let mut response = json!({ "description": "Success" });
            set_json_schema(&mut response, schema.clone());
            responses.insert("200".into(), response);
        }
    }
    for error in &STANDARD_ERRORS {
        responses.insert(error.status.into(), error.response_ref());
    }

    operation.insert("summary".into(), json!(key));
}

/// Points the response's `application/json` schema at `schema`, keeping the
/// rest of the envelope.
fn set_json_schema(response: &mut Value, schema: Value) {
    if !response.is_object() {
        *response = json!({ "description": "Success" });
    }
    if let Some(map) = response.as_object_mut() {
        map.entry("description").or_insert_with(|| json!("Success"));
        let content = object_entry(map, "content");
        let media = object_entry(content, "application/json");
        media.insert("schema".into(), schema);
    }
}

fn collect_tags(doc: &Map<String, Value>) -> Vec<Value> {
    let mut seen: IndexSet<String> = IndexSet::new();
    let path_items = doc
        .get("paths")
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|paths| paths.values());

    for item in path_items {
        for method in HTTP_METHODS {
            let tags = item
                .get(method)
                .and_then(|op| op.get("tags"))
                .and_then(Value::as_array);
            for tag in tags.into_iter().flatten().filter_map(Value::as_str) {
                seen.insert(tag.to_string());
            }
        }
    }

    seen.into_iter()
        .map(|name| {
            json!({
                "name": name,
                "description": format!("Auto-generated tag for {}", name)
            })
        })
        .collect()
}

fn merge_error_components(components: &mut Map<String, Value>) {
    let responses = object_entry(components, "responses");
    for error in &STANDARD_ERRORS {
        responses.insert(error.name.into(), error.response());
    }
    let schemas = object_entry(components, "schemas");
    for error in &STANDARD_ERRORS {
        schemas.insert(error.name.into(), error.schema());
    }
}

/// Adds the default bearer scheme when none is configured and returns the
/// name of the scheme the document should require by default.
fn ensure_security_scheme(components: &mut Map<String, Value>) -> String {
    let schemes = object_entry(components, "securitySchemes");
    if let Some(existing) = schemes.keys().next() {
        return existing.clone();
    }
    schemes.insert(
        DEFAULT_SECURITY_SCHEME.into(),
        json!({ "type": "http", "scheme": "bearer", "bearerFormat": "JWT" }),
    );
    DEFAULT_SECURITY_SCHEME.to_string()
}

/// Returns `map[key]` as an object, replacing any non-object value.
fn object_entry<'a>(map: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let entry = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    match entry {
        Value::Object(inner) => inner,
        _ => unreachable!("entry was just replaced with an object"),
    }
}
