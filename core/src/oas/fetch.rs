#![deny(missing_docs)]

//! # Table Schema Collection
//!
//! The seam between the enricher and whatever can list tables and their
//! fields (usually the platform's metadata API).
//!
//! Fetched field lists are kept in a [`FetchContext`] owned by the caller, so
//! two runs in one process never share a cache.

use crate::error::{AppError, AppResult};
use crate::export::id_string;
use crate::oas::table_schema::{convert, ConvertOptions, XanoField};
use heck::ToUpperCamelCase;
use indexmap::IndexMap;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::thread;

/// Upper bound on concurrent field fetches.
pub const MAX_PARALLEL_FETCHES: usize = 8;

/// A table as listed by the fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    /// Platform id, as a string.
    pub id: String,
    /// Table name.
    pub name: String,
    /// Whether the table backs authentication.
    pub auth: bool,
}

impl TableSummary {
    /// Reads `{id, name, auth?}`. Entries without an id are rejected.
    pub fn from_value(value: &Value) -> Option<TableSummary> {
        Some(TableSummary {
            id: value.get("id").and_then(id_string)?,
            name: value
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            auth: value.get("auth").and_then(Value::as_bool).unwrap_or(false),
        })
    }

    /// Name of the schema under `components.schemas`.
    pub fn component_name(&self) -> String {
        let name = self.name.to_upper_camel_case();
        if name.is_empty() {
            format!("Table{}", self.id)
        } else {
            name
        }
    }
}

/// Source of table metadata.
pub trait TableSchemaFetcher {
    /// Lists every table of the workspace.
    fn list_tables(&self) -> AppResult<Vec<TableSummary>>;

    /// Fetches the field descriptors of one table.
    fn table_fields(&self, table: &TableSummary) -> AppResult<Vec<XanoField>>;
}

/// Per-run cache of fetched field lists, keyed by table id.
#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    fields: HashMap<String, Vec<XanoField>>,
}

impl FetchContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached fields of a table.
    pub fn get(&self, table_id: &str) -> Option<&[XanoField]> {
        self.fields.get(table_id).map(Vec::as_slice)
    }

    /// Stores the fields of a table.
    pub fn insert(&mut self, table_id: impl Into<String>, fields: Vec<XanoField>) {
        self.fields.insert(table_id.into(), fields);
    }

    /// Whether the table was already fetched.
    pub fn contains(&self, table_id: &str) -> bool {
        self.fields.contains_key(table_id)
    }

    /// Number of cached tables.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Lists tables, fetches the uncached ones in parallel and converts every
/// table to a component schema, in listing order.
///
/// A failure to list tables is an error. A failure on a single table is
/// logged and that table is left out.
pub fn collect_table_schemas<F>(
    fetcher: &F,
    context: &mut FetchContext,
    options: ConvertOptions,
) -> AppResult<IndexMap<String, Value>>
where
    F: TableSchemaFetcher + Sync,
{
    let tables = fetcher.list_tables()?;
    let missing: Vec<&TableSummary> = tables.iter().filter(|t| !context.contains(&t.id)).collect();
    log::info!(
        "{} tables listed, {} to fetch",
        tables.len(),
        missing.len()
    );

    for chunk in missing.chunks(MAX_PARALLEL_FETCHES) {
        let results: Vec<(&TableSummary, AppResult<Vec<XanoField>>)> = thread::scope(|scope| {
            let handles: Vec<_> = chunk
                .iter()
                .map(|table| {
                    let table: &TableSummary = table;
                    (table, scope.spawn(move || fetcher.table_fields(table)))
                })
                .collect();
            handles
                .into_iter()
                .map(|(table, handle)| {
                    let result = handle.join().unwrap_or_else(|_| {
                        Err(AppError::Fetch(format!("fetch thread for table {} panicked", table.id)))
                    });
                    (table, result)
                })
                .collect()
        });

        for (table, result) in results {
            match result {
                Ok(fields) => context.insert(table.id.clone(), fields),
                Err(e) => log::warn!("skipping table '{}' ({}): {}", table.name, table.id, e),
            }
        }
    }

    let mut schemas = IndexMap::with_capacity(tables.len());
    for table in &tables {
        if let Some(fields) = context.get(&table.id) {
            schemas.insert(table.component_name(), table_schema(table, fields, options));
        }
    }
    Ok(schemas)
}

/// Converts one table, titling the schema with the table name.
pub fn table_schema(table: &TableSummary, fields: &[XanoField], options: ConvertOptions) -> Value {
    let mut schema = convert(fields, options);
    if let Some(map) = schema.as_object_mut() {
        map.insert("title".into(), json!(table.name));
        if table.auth {
            map.insert(
                "description".into(),
                json!(format!("Authentication table {}", table.name)),
            );
        }
    }
    schema
}
