#![deny(missing_docs)]

//! # Run List Steps
//!
//! A step's nested run lists may sit at `context.run`, at
//! `context.<key>.run` (conditional branches, loop bodies, try/catch arms) or
//! at `step.run`. Ingestion folds all three into [`Step::children`], so
//! consumers walk a single shape.

use crate::export::{id_string, str_field};
use serde_json::Value;

/// One operation of a run list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Step {
    /// Operation name, e.g. `mvp:dbo_view`.
    pub name: String,
    /// Disabled steps are ignored by the narrator, children included.
    pub disabled: bool,
    /// Variable the step's result is bound to.
    pub as_var: Option<String>,
    /// Author-supplied description.
    pub description: Option<String>,
    /// Referenced function (`context.function.id`).
    pub function_id: Option<String>,
    /// Referenced table (`context.dbo.id`).
    pub dbo_id: Option<String>,
    /// Filter expression (`context.search.expression`), untyped.
    pub search: Option<Value>,
    /// Declared return kind (`context.return.type`), e.g. `list`.
    pub return_kind: Option<String>,
    /// Nested steps from every nesting location, in discovery order.
    pub children: Vec<Step>,
}

impl Step {
    /// Reads a step out of its JSON value.
    pub fn from_value(value: &Value) -> Step {
        let context = value.get("context");
        let context_ref = |key: &str| {
            context
                .and_then(|c| c.get(key))
                .and_then(|r| r.get("id"))
                .and_then(id_string)
        };

        Step {
            name: str_field(value, "name").unwrap_or_default(),
            disabled: value
                .get("disabled")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            as_var: str_field(value, "as").filter(|s| !s.is_empty()),
            description: str_field(value, "description").filter(|s| !s.trim().is_empty()),
            function_id: context_ref("function"),
            dbo_id: context_ref("dbo"),
            search: context
                .and_then(|c| c.get("search"))
                .and_then(|s| s.get("expression"))
                .cloned(),
            return_kind: context
                .and_then(|c| c.get("return"))
                .and_then(|r| r.get("type"))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            children: collect_children(value),
        }
    }

    /// Reads a run list. Anything but an array yields an empty list.
    pub fn list_from_value(value: Option<&Value>) -> Vec<Step> {
        value
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Step::from_value).collect())
            .unwrap_or_default()
    }

    /// True when the search expression has at least one node.
    pub fn has_search(&self) -> bool {
        self.search
            .as_ref()
            .and_then(Value::as_array)
            .is_some_and(|nodes| !nodes.is_empty())
    }
}

fn collect_children(value: &Value) -> Vec<Step> {
    let mut children = Vec::new();

    if let Some(context) = value.get("context").and_then(Value::as_object) {
        children.extend(Step::list_from_value(context.get("run")));
        for (key, nested) in context {
            if key == "run" {
                continue;
            }
            children.extend(Step::list_from_value(nested.get("run")));
        }
    }

    children.extend(Step::list_from_value(value.get("run")));
    children
}
