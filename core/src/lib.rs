#![deny(missing_docs)]

//! # Xano Docs Core
//!
//! Core library turning a Xano workspace export into a documentation tree
//! and a raw OpenAPI document into an enriched OpenAPI 3.1 document.

/// Shared error types.
pub mod error;

/// Typed view over the workspace export.
pub mod export;

/// Filesystem-safe name sanitization.
pub mod sanitize;

/// Function/table cross-reference tables.
pub mod entity_map;

/// Filter expression -> SQL-like text.
pub mod query_expr;

/// Run list -> Markdown narration.
pub mod narrator;

/// Table README rendering.
pub mod table_doc;

/// Export -> file tree.
pub mod repository;

/// OpenAPI normalization and enrichment.
pub mod oas;

pub use entity_map::{EntityMap, EntityMaps, EntityRef};
pub use error::{AppError, AppResult};
pub use export::{Entity, EntityKind, Step, WorkspaceExport};
pub use narrator::narrate;
pub use oas::{
    collect_table_schemas, convert, enrich, normalize, parse_openapi_text, ConvertOptions,
    EnrichInput, FetchContext, TableSchemaFetcher, TableSummary, XanoField,
};
pub use query_expr::compile;
pub use repository::{build, build_with, collapse_writes, RepoFile};
pub use table_doc::{FieldTableDescriber, TableDescriber};
