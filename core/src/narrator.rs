#![deny(missing_docs)]

//! # Run List Narration
//!
//! Renders a run list as a nested Markdown bullet list: one bullet per
//! enabled step, with links to the functions and tables it touches and the
//! SQL-like filter of table searches. Every line of a step at depth `n` is
//! indented by `2n` spaces.

use crate::entity_map::{EntityMap, EntityMaps};
use crate::export::Step;
use crate::query_expr::compile;

/// Description shown for steps the author left undocumented.
pub const DEFAULT_DESCRIPTION: &str = "//...";

/// Human label of a platform operation.
pub fn operation_label(name: &str) -> Option<&'static str> {
    let label = match name {
        "mvp:dbo_view" => "Query all records",
        "mvp:dbo_get" => "Get record",
        "mvp:dbo_add" => "Add record",
        "mvp:dbo_edit" => "Edit record",
        "mvp:dbo_patch" => "Patch record",
        "mvp:dbo_addoredit" => "Add or edit record",
        "mvp:dbo_delete" => "Delete record",
        "mvp:dbo_bulk_add" => "Bulk add records",
        "mvp:dbo_bulk_delete" => "Bulk delete records",
        "mvp:dbo_has" => "Has record",
        "mvp:dbo_direct_query" => "Direct database query",
        "mvp:function" => "Run function",
        "mvp:lambda" => "Lambda",
        "mvp:set_var" => "Create variable",
        "mvp:update_var" => "Update variable",
        "mvp:conditional" => "Conditional",
        "mvp:switch" => "Switch",
        "mvp:foreach" => "For each loop",
        "mvp:for" => "For loop",
        "mvp:while" => "While loop",
        "mvp:break" => "Break out of loop",
        "mvp:continue" => "Continue to next iteration",
        "mvp:try_catch" => "Try / catch",
        "mvp:throw_error" => "Throw error",
        "mvp:precondition" => "Precondition",
        "mvp:return" => "Return",
        "mvp:stop_and_debug" => "Stop & debug",
        "mvp:api_request" => "External API request",
        "mvp:group" => "Group",
        "mvp:async_function" => "Run function asynchronously",
        "mvp:create_auth_token" => "Create authentication token",
        "mvp:send_email" => "Send email",
        _ => return None,
    };
    Some(label)
}

/// Renders `steps` at `depth`, skipping disabled steps and their subtrees.
pub fn narrate(steps: &[Step], depth: usize, maps: &EntityMaps) -> String {
    let mut out = String::new();
    for step in steps.iter().filter(|s| !s.disabled) {
        narrate_step(&mut out, step, depth, maps);
    }
    out
}

fn narrate_step(out: &mut String, step: &Step, depth: usize, maps: &EntityMaps) {
    let indent = "  ".repeat(depth);
    let body_indent = format!("{}  ", indent);
    let label = operation_label(&step.name).unwrap_or(&step.name);

    let mut headline = format!("- **{}**", label);
    if let Some(link) = link_to(step.function_id.as_deref(), &maps.functions) {
        headline.push_str(&format!(" {}", link));
    }
    let table_link = link_to(step.dbo_id.as_deref(), &maps.tables);
    if let Some(link) = &table_link {
        headline.push_str(&format!(" on {}", link));
    }
    push_lines(out, &indent, &headline);

    let description = step.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION);
    push_lines(out, &body_indent, description);

    let targets_table = step.dbo_id.is_some();
    if let Some(var) = &step.as_var {
        let mut binding = format!("Output: `{}`", var);
        if targets_table && step.name.contains("dbo_view") {
            if let Some(kind) = &step.return_kind {
                binding.push_str(&format!(" ({})", kind.to_uppercase()));
            }
        }
        push_lines(out, &body_indent, &binding);
    }

    if targets_table && step.has_search() {
        if let Some(search) = &step.search {
            push_lines(out, &body_indent, "```sql");
            push_lines(out, &body_indent, &format!("WHERE {}", compile(search)));
            push_lines(out, &body_indent, "```");
        }
    }

    out.push_str(&narrate(&step.children, depth + 1, maps));
}

fn link_to(id: Option<&str>, map: &EntityMap) -> Option<String> {
    let entry = map.get(id?)?;
    Some(format!("[{}](/{})", entry.name, entry.path))
}

/// Appends `text` line by line, each line prefixed with `indent`.
fn push_lines(out: &mut String, indent: &str, text: &str) {
    for line in text.split('\n') {
        out.push_str(indent);
        out.push_str(line.trim_end_matches('\r'));
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::WorkspaceExport;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn maps() -> EntityMaps {
        EntityMaps::from_export(&WorkspaceExport::from_value(&json!({
            "function": [{ "guid": "f1", "name": "Send Email" }],
            "dbo": [{ "guid": "t1", "name": "items" }]
        })))
    }

    #[test]
    fn test_table_query_with_filter() {
        let steps = Step::list_from_value(Some(&json!([{
            "name": "mvp:dbo_view",
            "as": "items",
            "context": {
                "dbo": { "id": "t1" },
                "return": { "type": "list" },
                "search": { "expression": [{
                    "type": "statement",
                    "statement": {
                        "op": "=",
                        "left": { "tag": "col", "operand": "id" },
                        "right": { "tag": "input", "operand": "id" }
                    }
                }]}
            }
        }])));

        let md = narrate(&steps, 0, &maps());
        assert_eq!(
            md,
            "- **Query all records** on [items](/dbo/items)\n  //...\n  Output: `items` (LIST)\n  ```sql\n  WHERE id = :id\n  ```\n"
        );
    }

    #[test]
    fn test_nested_indentation_and_function_link() {
        let steps = Step::list_from_value(Some(&json!([{
            "name": "mvp:conditional",
            "description": "Only for admins",
            "context": {
                "if": { "run": [{
                    "name": "mvp:function",
                    "context": { "function": { "id": "f1" } }
                }]}
            }
        }])));

        let md = narrate(&steps, 1, &maps());
        assert_eq!(
            md,
            "  - **Conditional**\n    Only for admins\n    - **Run function** [Send Email](/function/send_email)\n      //...\n"
        );
    }

    #[test]
    fn test_disabled_steps_are_silent_at_any_depth() {
        let steps = Step::list_from_value(Some(&json!([
            { "name": "mvp:return", "disabled": true, "run": [{ "name": "hidden-child" }] },
            { "name": "mvp:foreach", "context": { "run": [
                { "name": "hidden-nested", "disabled": true },
                { "name": "custom:thing" }
            ]}}
        ])));

        let md = narrate(&steps, 0, &maps());
        assert!(!md.contains("Return"));
        assert!(!md.contains("hidden"));
        assert!(md.contains("- **For each loop**"));
        assert!(md.contains("  - **custom:thing**"));
    }

    #[test]
    fn test_unresolved_references_and_non_view_binding() {
        let steps = Step::list_from_value(Some(&json!([{
            "name": "mvp:dbo_get",
            "as": "row",
            "context": { "dbo": { "id": "missing" }, "return": { "type": "single" } }
        }])));

        let md = narrate(&steps, 0, &maps());
        assert_eq!(md, "- **Get record**\n  //...\n  Output: `row`\n");
    }

    #[test]
    fn test_multi_line_text_keeps_indentation() {
        let steps = Step::list_from_value(Some(&json!([{
            "name": "mvp:foreach",
            "context": { "run": [{
                "name": "mvp:return",
                "description": "first line\nsecond line"
            }]}
        }])));

        let md = narrate(&steps, 0, &maps());
        assert_eq!(
            md,
            "- **For each loop**\n  //...\n  - **Return**\n    first line\n    second line\n"
        );
        for line in md.lines().skip(2) {
            assert!(line.starts_with("  "), "unindented line: {:?}", line);
        }
    }

    #[test]
    fn test_empty_run_list() {
        assert_eq!(narrate(&[], 0, &EntityMaps::default()), "");
    }
}
