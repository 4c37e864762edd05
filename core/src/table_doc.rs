#![deny(missing_docs)]

//! # Table Documentation
//!
//! The adapter that renders a database table's column list into Markdown for
//! the table's README. The repository builder only depends on the
//! [`TableDescriber`] trait.

use crate::export::Entity;
use crate::oas::table_schema::{fields_from_values, XanoField};
use serde_json::Value;

/// Renders the body of a table README.
pub trait TableDescriber {
    /// Markdown describing the table's structure.
    fn describe(&self, table: &Entity) -> String;
}

/// Renders the `schema` column list of a table entity as a Markdown table.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldTableDescriber;

impl TableDescriber for FieldTableDescriber {
    fn describe(&self, table: &Entity) -> String {
        let fields = table_fields(table);
        if fields.is_empty() {
            return "_No columns described._\n".to_string();
        }

        let mut out = String::from("| Column | Type | Required | Description |\n");
        out.push_str("| --- | --- | --- | --- |\n");
        for field in &fields {
            push_rows(&mut out, field, "");
        }
        out
    }
}

/// Reads the column descriptors of a table entity. Malformed descriptors are
/// skipped; a missing or non-list `schema` is empty.
pub fn table_fields(table: &Entity) -> Vec<XanoField> {
    table
        .raw
        .get("schema")
        .and_then(Value::as_array)
        .map(|items| fields_from_values(items))
        .unwrap_or_default()
}

fn push_rows(out: &mut String, field: &XanoField, prefix: &str) {
    let name = format!("{}{}", prefix, field.name);
    let mut ty = field.field_type.clone();
    if field.is_list() {
        ty.push_str("[]");
    }
    if field.nullable {
        ty.push('?');
    }
    if let Some(values) = field.values.as_ref().filter(|v| !v.is_empty()) {
        let rendered: Vec<String> = values.iter().map(cell_value).collect();
        ty = format!("{} ({})", ty, rendered.join(", "));
    }

    out.push_str(&format!(
        "| `{}` | {} | {} | {} |\n",
        name,
        escape_cell(&ty),
        if field.required { "yes" } else { "no" },
        escape_cell(field.description.as_deref().unwrap_or_default())
    ));

    let nested_prefix = format!("{}.", name);
    for child in &field.children {
        push_rows(out, child, &nested_prefix);
    }
}

fn cell_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
