#![deny(missing_docs)]

//! # OAS Command
//!
//! Raw OpenAPI document -> enriched OpenAPI 3.1 document plus an HTML
//! reference page.
//!
//! Table schemas come from a local JSON file (`{"Component": [fields...]}`)
//! and/or from the metadata API (`--fetch-tables`).

use crate::config::ApiConfig;
use crate::error::{CliError, CliResult};
use crate::html::render_html_shell;
use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use xano_docs_core::oas::{
    convert, enrich, fields_from_values, parse_openapi_text, ConvertOptions, EnrichInput,
};

/// File name of the enriched document.
pub const SPEC_FILE_NAME: &str = "openapi.json";

/// File name of the HTML shell.
pub const HTML_FILE_NAME: &str = "index.html";

/// Arguments for the oas command.
#[derive(clap::Args, Debug, Clone)]
pub struct OasArgs {
    /// Raw OpenAPI document (JSON or YAML).
    #[clap(long)]
    pub input: PathBuf,

    /// Output directory for `openapi.json` and `index.html`.
    #[clap(long, default_value = "openapi")]
    pub out: PathBuf,

    /// JSON file mapping component names to table field lists.
    #[clap(long)]
    pub tables: Option<PathBuf>,

    /// JSON file mapping `<METHOD>:<path>` to 200 response schemas.
    #[clap(long)]
    pub responses: Option<PathBuf>,

    /// Fetch table schemas from the metadata API.
    #[clap(long)]
    pub fetch_tables: bool,

    /// Keep `access: internal` table fields.
    #[clap(long)]
    pub include_internal: bool,

    /// Title of the HTML reference page. Defaults to `info.title`.
    #[clap(long)]
    pub title: Option<String>,

    /// Metadata API connection.
    #[clap(flatten)]
    pub api: ApiConfig,
}

/// Executes the oas command.
pub fn execute(args: &OasArgs) -> CliResult<()> {
    let raw_text = read_text(&args.input, "OpenAPI document")?;
    let raw = parse_openapi_text(&raw_text)?;
    let options = ConvertOptions {
        include_internal: args.include_internal,
    };

    let mut input = EnrichInput::default();
    if let Some(path) = &args.tables {
        input.table_schemas = load_table_file(path, options)?;
    }
    if args.fetch_tables {
        input.table_schemas.extend(fetch_tables(&args.api, options)?);
    }
    if let Some(path) = &args.responses {
        input.response_schemas = load_object_file(path, "response schemas")?;
    }
    log::info!(
        "enriching with {} table schemas and {} response schemas",
        input.table_schemas.len(),
        input.response_schemas.len()
    );

    let enriched = enrich(&raw, &input);
    let title = args
        .title
        .clone()
        .or_else(|| {
            enriched
                .pointer("/info/title")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| "API Reference".to_string());

    fs::create_dir_all(&args.out)?;
    let spec_text = serde_json::to_string_pretty(&enriched)
        .map_err(|e| CliError::General(format!("JSON serialization failed: {}", e)))?;
    fs::write(args.out.join(SPEC_FILE_NAME), spec_text)?;
    fs::write(
        args.out.join(HTML_FILE_NAME),
        render_html_shell(&title, &format!("./{}", SPEC_FILE_NAME)),
    )?;

    println!("Enriched OpenAPI written to {:?}", args.out.join(SPEC_FILE_NAME));
    Ok(())
}

fn read_text(path: &Path, what: &str) -> CliResult<String> {
    fs::read_to_string(path)
        .map_err(|e| CliError::General(format!("Failed to read {} {:?}: {}", what, path, e)))
}

fn load_object_file(path: &Path, what: &str) -> CliResult<IndexMap<String, Value>> {
    let text = read_text(path, what)?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::General(format!("Invalid {} file {:?}: {}", what, path, e)))
}

/// Loads `{"Component": [fields...]}` and converts every table.
pub fn load_table_file(
    path: &Path,
    options: ConvertOptions,
) -> CliResult<IndexMap<String, Value>> {
    let text = read_text(path, "table schemas")?;
    let tables: IndexMap<String, Vec<Value>> = serde_json::from_str(&text)
        .map_err(|e| CliError::General(format!("Invalid table schemas file {:?}: {}", path, e)))?;
    Ok(tables
        .into_iter()
        .map(|(name, items)| (name, convert(&fields_from_values(&items), options)))
        .collect())
}

#[cfg(feature = "client")]
fn fetch_tables(api: &ApiConfig, options: ConvertOptions) -> CliResult<IndexMap<String, Value>> {
    use crate::fetcher::MetaApiFetcher;
    use xano_docs_core::oas::{collect_table_schemas, FetchContext};

    let fetcher = MetaApiFetcher::new(api.resolve()?);
    let mut context = FetchContext::new();
    Ok(collect_table_schemas(&fetcher, &mut context, options)?)
}

#[cfg(not(feature = "client"))]
fn fetch_tables(_api: &ApiConfig, _options: ConvertOptions) -> CliResult<IndexMap<String, Value>> {
    Err(CliError::General(
        "--fetch-tables requires the `client` feature".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(dir: &Path) -> OasArgs {
        OasArgs {
            input: dir.join("raw.yaml"),
            out: dir.join("out"),
            tables: None,
            responses: None,
            fetch_tables: false,
            include_internal: false,
            title: None,
            api: ApiConfig::default(),
        }
    }

    #[test]
    fn test_oas_end_to_end_from_yaml() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("raw.yaml"),
            "openapi: 3.0.0\ninfo:\n  title: Shop\n  version: '1'\npaths:\n  /items:\n    get:\n      tags: [items]\n      responses:\n        '200':\n          description: ok\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("tables.json"),
            r#"{ "Item": [{ "name": "id", "type": "int", "required": true }, { "name": "hash", "type": "text", "access": "internal" }, { "name": "note", "type": "text", "nullable": null }, { "name": "bad", "required": "maybe" }] }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("responses.json"),
            r##"{ "GET:/items": { "type": "array", "items": { "$ref": "#/components/schemas/Item" } } }"##,
        )
        .unwrap();

        let mut args = args(dir.path());
        args.tables = Some(dir.path().join("tables.json"));
        args.responses = Some(dir.path().join("responses.json"));
        execute(&args).unwrap();

        let spec: Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("out/openapi.json")).unwrap())
                .unwrap();
        assert_eq!(spec["openapi"], "3.1.1");
        assert_eq!(spec["components"]["schemas"]["Item"]["required"], serde_json::json!(["id"]));
        let item_props = &spec["components"]["schemas"]["Item"]["properties"];
        assert!(item_props.get("hash").is_none());
        assert_eq!(item_props["note"], serde_json::json!({ "type": "string" }));
        assert!(item_props.get("bad").is_none());
        assert_eq!(
            spec["paths"]["/items"]["get"]["responses"]["200"]["content"]["application/json"]["schema"]["type"],
            "array"
        );

        let html = fs::read_to_string(dir.path().join("out/index.html")).unwrap();
        assert!(html.contains("<title>Shop</title>"));
    }

    #[test]
    fn test_invalid_table_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("raw.yaml"), "openapi: 3.0.0\npaths: {}\n").unwrap();
        fs::write(dir.path().join("tables.json"), "[1, 2]").unwrap();
        let mut args = args(dir.path());
        args.tables = Some(dir.path().join("tables.json"));

        match execute(&args).unwrap_err() {
            CliError::General(msg) => assert!(msg.contains("Invalid table schemas file")),
            other => panic!("Wrong error type: {}", other),
        }
    }
}
