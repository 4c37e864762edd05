#![deny(missing_docs)]

//! # Filter Expression Rendering
//!
//! Renders a database search expression as a SQL-like `WHERE` clause body.
//!
//! The output documents what a query filters on. It is not executable:
//! literals are not quoted and unknown operators are copied through.

use serde_json::Value;

/// A filter operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// `col` - a column name, rendered as-is.
    Column(String),
    /// `input` - a request input, rendered as `:name`.
    Input(String),
    /// `const:epochms` - the current time.
    EpochMs,
    /// Any other tag - a literal value, rendered unquoted.
    Literal(Value),
}

impl Operand {
    /// Reads an operand. A missing operand becomes an empty literal.
    pub fn from_value(value: Option<&Value>) -> Operand {
        let tag = value
            .and_then(|v| v.get("tag"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        let operand = value
            .and_then(|v| v.get("operand"))
            .cloned()
            .unwrap_or(Value::Null);

        match tag {
            "col" => Operand::Column(literal_text(&operand)),
            "input" => Operand::Input(literal_text(&operand)),
            "const:epochms" => Operand::EpochMs,
            _ => Operand::Literal(operand),
        }
    }

    /// Renders the operand.
    pub fn render(&self) -> String {
        match self {
            Operand::Column(name) => name.clone(),
            Operand::Input(name) => format!(":{}", name),
            Operand::EpochMs => "CURRENT_TIMESTAMP".to_string(),
            Operand::Literal(value) => literal_text(value),
        }
    }
}

/// One node of a filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprNode {
    /// `left op right`.
    Statement {
        /// Comparison operator, copied verbatim.
        op: String,
        /// Left side.
        left: Operand,
        /// Right side.
        right: Operand,
        /// OR-joined with the previous node.
        or: bool,
    },
    /// A parenthesized sub-expression.
    Group {
        /// Nested nodes.
        expression: Vec<ExprNode>,
        /// OR-joined with the previous node.
        or: bool,
    },
}

impl ExprNode {
    /// Reads a node; unrecognized node types yield `None`.
    pub fn from_value(value: &Value) -> Option<ExprNode> {
        let or = value.get("or").and_then(Value::as_bool).unwrap_or(false);
        match value.get("type").and_then(Value::as_str)? {
            "statement" => {
                let statement = value.get("statement");
                Some(ExprNode::Statement {
                    op: statement
                        .and_then(|s| s.get("op"))
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    left: Operand::from_value(statement.and_then(|s| s.get("left"))),
                    right: Operand::from_value(statement.and_then(|s| s.get("right"))),
                    or,
                })
            }
            "group" => Some(ExprNode::Group {
                expression: parse_expression(
                    value.get("group").and_then(|g| g.get("expression")),
                ),
                or,
            }),
            _ => None,
        }
    }

    fn is_or(&self) -> bool {
        match self {
            ExprNode::Statement { or, .. } | ExprNode::Group { or, .. } => *or,
        }
    }

    fn render(&self) -> String {
        match self {
            ExprNode::Statement {
                op, left, right, ..
            } => format!("{} {} {}", left.render(), op, right.render()),
            ExprNode::Group { expression, .. } => format!("({})", render_nodes(expression)),
        }
    }
}

/// Reads an expression array. Anything else is an empty expression.
pub fn parse_expression(value: Option<&Value>) -> Vec<ExprNode> {
    value
        .and_then(Value::as_array)
        .map(|nodes| nodes.iter().filter_map(ExprNode::from_value).collect())
        .unwrap_or_default()
}

/// Compiles a raw expression value to its SQL-like text.
///
/// `compile(&json!([]))` is `""`.
pub fn compile(expression: &Value) -> String {
    render_nodes(&parse_expression(Some(expression)))
}

/// Renders parsed nodes, joining them with `AND`/`OR`.
pub fn render_nodes(nodes: &[ExprNode]) -> String {
    let joined = nodes
        .iter()
        .map(|node| {
            let joiner = if node.is_or() { "OR" } else { "AND" };
            format!("{} {}", joiner, node.render())
        })
        .collect::<Vec<_>>()
        .join(" ");

    joined
        .strip_prefix("AND ")
        .or_else(|| joined.strip_prefix("OR "))
        .unwrap_or(&joined)
        .to_string()
}

fn literal_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn statement(left: Value, op: &str, right: Value) -> Value {
        json!({ "type": "statement", "statement": { "op": op, "left": left, "right": right } })
    }

    #[test]
    fn test_empty_and_non_array() {
        assert_eq!(compile(&json!([])), "");
        assert_eq!(compile(&json!({ "type": "statement" })), "");
        assert_eq!(compile(&Value::Null), "");
    }

    #[test]
    fn test_single_statement() {
        let expr = json!([statement(
            json!({ "tag": "col", "operand": "id" }),
            "=",
            json!({ "tag": "input", "operand": "id" })
        )]);
        assert_eq!(compile(&expr), "id = :id");
    }

    #[test]
    fn test_or_join_has_no_leading_joiner() {
        let mut second = statement(
            json!({ "tag": "col", "operand": "status" }),
            "!=",
            json!({ "tag": "const", "operand": "archived" }),
        );
        second["or"] = json!(true);
        let expr = json!([
            statement(
                json!({ "tag": "col", "operand": "created_at" }),
                "<",
                json!({ "tag": "const:epochms", "operand": 0 })
            ),
            second
        ]);
        assert_eq!(
            compile(&expr),
            "created_at < CURRENT_TIMESTAMP OR status != archived"
        );
    }

    #[test]
    fn test_leading_or_is_stripped() {
        let mut only = statement(
            json!({ "tag": "col", "operand": "a" }),
            "=",
            json!({ "tag": "const", "operand": 1 }),
        );
        only["or"] = json!(true);
        assert_eq!(compile(&json!([only])), "a = 1");
    }

    #[test]
    fn test_groups_and_unknown_operators() {
        let mut group = json!({
            "type": "group",
            "group": { "expression": [
                statement(json!({ "tag": "col", "operand": "a" }), "=", json!({ "tag": "const", "operand": true })),
                { "type": "statement", "or": true, "statement": {
                    "op": "ilike",
                    "left": { "tag": "col", "operand": "name" },
                    "right": { "tag": "input", "operand": "q" }
                }}
            ]}
        });
        group["or"] = json!(false);
        let expr = json!([
            statement(json!({ "tag": "col", "operand": "owner" }), ">=", json!({ "tag": "input", "operand": "uid" })),
            group,
            { "type": "mystery" }
        ]);
        assert_eq!(
            compile(&expr),
            "owner >= :uid AND (a = true OR name ilike :q)"
        );
    }
}
