#![deny(missing_docs)]

//! # Metadata API Fetcher
//!
//! `TableSchemaFetcher` backed by the platform's metadata API over `ureq`.
//!
//! - `GET {base}/api:meta/workspace/{ws}/table?page=N&per_page=M` lists tables
//!   (`{items, nextPage}` envelope).
//! - `GET {base}/api:meta/workspace/{ws}/table/{id}/schema` returns the field
//!   descriptors of one table.

use crate::config::ResolvedApiConfig;
use serde_json::Value;
use xano_docs_core::oas::{fields_from_values, TableSchemaFetcher, TableSummary, XanoField};
use xano_docs_core::{AppError, AppResult};

/// Page size requested when listing tables.
pub const PAGE_SIZE: u32 = 100;

/// Upper bound on listing pages, in case `nextPage` never ends.
const MAX_PAGES: u32 = 1000;

/// Fetches table metadata over HTTP.
#[derive(Debug, Clone)]
pub struct MetaApiFetcher {
    config: ResolvedApiConfig,
}

impl MetaApiFetcher {
    /// Creates a fetcher for one workspace.
    pub fn new(config: ResolvedApiConfig) -> Self {
        Self { config }
    }

    fn workspace_url(&self, suffix: &str) -> String {
        format!(
            "{}/api:meta/workspace/{}/{}",
            self.config.base_url, self.config.workspace, suffix
        )
    }

    fn get_json(&self, url: &str) -> AppResult<Value> {
        log::debug!("GET {}", url);
        let mut response = ureq::get(url)
            .header("Authorization", format!("Bearer {}", self.config.token))
            .header("Accept", "application/json")
            .call()
            .map_err(|e| AppError::Fetch(format!("GET {}: {}", url, e)))?;
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| AppError::Fetch(format!("reading {}: {}", url, e)))?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl TableSchemaFetcher for MetaApiFetcher {
    fn list_tables(&self) -> AppResult<Vec<TableSummary>> {
        let mut tables = Vec::new();
        let mut page = 1;

        while page <= MAX_PAGES {
            let url = self.workspace_url(&format!("table?page={}&per_page={}", page, PAGE_SIZE));
            let body = self.get_json(&url)?;
            let (items, next) = parse_table_page(&body);
            tables.extend(items);
            match next {
                Some(next) if next > page => page = next,
                _ => break,
            }
        }

        Ok(tables)
    }

    fn table_fields(&self, table: &TableSummary) -> AppResult<Vec<XanoField>> {
        let url = self.workspace_url(&format!("table/{}/schema", table.id));
        let body = self.get_json(&url)?;
        parse_table_fields(body)
    }
}

/// Reads one listing page: the tables and the next page number, if any.
///
/// Accepts both the paged envelope and a bare array.
pub fn parse_table_page(body: &Value) -> (Vec<TableSummary>, Option<u32>) {
    let items = body
        .get("items")
        .and_then(Value::as_array)
        .or_else(|| body.as_array())
        .map(|items| items.iter().filter_map(TableSummary::from_value).collect())
        .unwrap_or_default();
    let next = body
        .get("nextPage")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok());
    (items, next)
}

/// Reads a table's field list, bare or wrapped in `{schema: [...]}`.
///
/// Malformed descriptors are skipped; a body that is not a list is an error.
pub fn parse_table_fields(body: Value) -> AppResult<Vec<XanoField>> {
    let list = match body {
        Value::Object(mut map) => map.remove("schema").unwrap_or(Value::Array(Vec::new())),
        other => other,
    };
    match list {
        Value::Array(items) => Ok(fields_from_values(&items)),
        other => Err(AppError::Fetch(format!(
            "expected a field list, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_table_page_envelope() {
        let body = json!({
            "items": [{ "id": 1, "name": "user", "auth": true }, { "name": "no-id" }],
            "curPage": 1,
            "nextPage": 2
        });
        let (items, next) = parse_table_page(&body);
        assert_eq!(items.len(), 1);
        assert!(items[0].auth);
        assert_eq!(next, Some(2));

        let (bare, none) = parse_table_page(&json!([{ "id": "7", "name": "t" }]));
        assert_eq!(bare[0].id, "7");
        assert_eq!(none, None);
    }

    #[test]
    fn test_parse_table_fields_shapes() {
        let wrapped = parse_table_fields(json!({ "schema": [{ "name": "id", "type": "int" }] })).unwrap();
        assert_eq!(wrapped[0].field_type, "int");

        let bare = parse_table_fields(json!([{ "name": "title", "type": "text" }])).unwrap();
        assert_eq!(bare[0].name, "title");

        assert!(parse_table_fields(json!({})).unwrap().is_empty());
        assert!(parse_table_fields(json!("nope")).is_err());

        let partial = parse_table_fields(json!([
            { "name": "id", "type": "int", "nullable": null },
            { "name": "bad", "nullable": "sometimes" }
        ]))
        .unwrap();
        assert_eq!(partial.len(), 1);
        assert_eq!(partial[0].name, "id");
    }
}
