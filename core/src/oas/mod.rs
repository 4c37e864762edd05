#![deny(missing_docs)]

//! # OpenAPI Module
//!
//! - **normalization**: Legacy schema dialects -> JSON Schema 2020-12.
//! - **table_schema**: Table field descriptors -> JSON Schema.
//! - **fetch**: Table metadata seam and per-run cache.
//! - **errors**: The shared error responses.
//! - **enrich**: Raw OpenAPI -> enriched OpenAPI 3.1.

pub mod enrich;
pub mod errors;
pub mod fetch;
pub mod normalization;
pub mod table_schema;

pub use enrich::{enrich, operation_key, EnrichInput};
pub use errors::{StandardError, STANDARD_ERRORS};
pub use fetch::{collect_table_schemas, FetchContext, TableSchemaFetcher, TableSummary};
pub use normalization::{normalize, LegacySchema};
pub use table_schema::{convert, convert_field, fields_from_values, ConvertOptions, XanoField};

use crate::error::{AppError, AppResult};
use serde_json::Value;

/// Parses an OpenAPI document given as JSON or YAML text.
///
/// JSON is tried first; YAML is the fallback since every JSON document is
/// also YAML but with worse error messages.
pub fn parse_openapi_text(text: &str) -> AppResult<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(json_err) => serde_yaml::from_str::<Value>(text).map_err(|yaml_err| {
            AppError::General(format!(
                "Failed to parse OpenAPI document as JSON ({}) or YAML ({})",
                json_err, yaml_err
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_and_yaml() {
        let json_doc = parse_openapi_text(r#"{"openapi":"3.0.0","paths":{}}"#).unwrap();
        assert_eq!(json_doc["openapi"], "3.0.0");

        let yaml_doc = parse_openapi_text("openapi: 3.0.3\npaths:\n  /a: {}\n").unwrap();
        assert_eq!(yaml_doc["openapi"], "3.0.3");
        assert!(yaml_doc["paths"]["/a"].is_object());
    }

    #[test]
    fn test_parse_garbage() {
        let err = parse_openapi_text("{ unbalanced: [").unwrap_err();
        assert!(err.to_string().contains("Failed to parse OpenAPI document"));
    }
}
