#![deny(missing_docs)]

//! # Standard Error Components
//!
//! The six error envelopes every operation shares. Each is registered once
//! under `components.responses` and `components.schemas`, and operations
//! point at them with `$ref`.

use serde_json::{json, Value};

/// A shared error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardError {
    /// HTTP status code.
    pub status: &'static str,
    /// Component name.
    pub name: &'static str,
    /// Platform error code carried in `code`.
    pub code: &'static str,
    /// Response description.
    pub description: &'static str,
}

/// The fixed error set, ordered by status code.
pub const STANDARD_ERRORS: [StandardError; 6] = [
    StandardError {
        status: "400",
        name: "BadRequest",
        code: "ERROR_CODE_BAD_REQUEST",
        description: "The request is malformed or failed input validation.",
    },
    StandardError {
        status: "401",
        name: "Unauthorized",
        code: "ERROR_CODE_UNAUTHORIZED",
        description: "Authentication is missing or invalid.",
    },
    StandardError {
        status: "403",
        name: "AccessDenied",
        code: "ERROR_CODE_ACCESS_DENIED",
        description: "The caller is not allowed to perform this operation.",
    },
    StandardError {
        status: "404",
        name: "NotFound",
        code: "ERROR_CODE_NOT_FOUND",
        description: "The requested resource does not exist.",
    },
    StandardError {
        status: "429",
        name: "TooManyRequests",
        code: "ERROR_CODE_TOO_MANY_REQUESTS",
        description: "Rate limit exceeded.",
    },
    StandardError {
        status: "500",
        name: "InternalServerError",
        code: "ERROR_FATAL",
        description: "An unexpected server error occurred.",
    },
];

/// Maximum length of a string `payload`.
pub const PAYLOAD_MAX_LENGTH: u64 = 255;

impl StandardError {
    /// Looks up the error for a status code.
    pub fn for_status(status: &str) -> Option<&'static StandardError> {
        STANDARD_ERRORS.iter().find(|e| e.status == status)
    }

    /// `$ref` to the shared response.
    pub fn response_ref(&self) -> Value {
        json!({ "$ref": format!("#/components/responses/{}", self.name) })
    }

    /// The `components.responses` entry.
    pub fn response(&self) -> Value {
        json!({
            "description": self.description,
            "content": {
                "application/json": {
                    "schema": { "$ref": format!("#/components/schemas/{}", self.name) }
                }
            }
        })
    }

    /// The `components.schemas` entry: `{code, message, payload}`.
    pub fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "code": { "type": "string", "example": self.code },
                "message": { "type": "string" },
                "payload": {
                    "anyOf": [
                        { "type": "string", "maxLength": PAYLOAD_MAX_LENGTH },
                        { "type": "null" },
                        { "type": "object", "additionalProperties": true }
                    ]
                }
            },
            "required": ["code", "message"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_status() {
        assert_eq!(StandardError::for_status("403").unwrap().name, "AccessDenied");
        assert!(StandardError::for_status("418").is_none());
    }

    #[test]
    fn test_schema_shape() {
        let schema = STANDARD_ERRORS[0].schema();
        assert_eq!(schema["properties"]["code"]["example"], "ERROR_CODE_BAD_REQUEST");
        assert_eq!(schema["properties"]["payload"]["anyOf"].as_array().unwrap().len(), 3);
        assert_eq!(
            STANDARD_ERRORS[5].response_ref(),
            json!({ "$ref": "#/components/responses/InternalServerError" })
        );
    }
}
