#![deny(missing_docs)]

//! # Workspace Export Model
//!
//! Lenient, typed view over the workspace export document.
//!
//! Ingestion never fails: missing kinds are empty, entities without a usable
//! `guid` are kept with an empty one, and the raw JSON of every entity is kept
//! alongside so it can be dumped verbatim.

pub mod step;

pub use step::Step;

use crate::error::AppResult;
use serde_json::Value;
use std::fmt;

/// The object kinds carried by an export, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Database table.
    Dbo,
    /// API group.
    App,
    /// API endpoint.
    Query,
    /// Stored function.
    Function,
    /// Addon query.
    Addon,
    /// Database trigger.
    Trigger,
    /// Scheduled task.
    Task,
    /// Request middleware.
    Middleware,
}

impl EntityKind {
    /// Every kind, in the order the repository builder walks them.
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Dbo,
        EntityKind::App,
        EntityKind::Query,
        EntityKind::Function,
        EntityKind::Addon,
        EntityKind::Trigger,
        EntityKind::Task,
        EntityKind::Middleware,
    ];

    /// Key of the kind in the export document, also its top-level directory.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Dbo => "dbo",
            EntityKind::App => "app",
            EntityKind::Query => "query",
            EntityKind::Function => "function",
            EntityKind::Addon => "addon",
            EntityKind::Trigger => "trigger",
            EntityKind::Task => "task",
            EntityKind::Middleware => "middleware",
        }
    }

    /// Kinds whose entities carry a run list worth narrating.
    pub fn has_run_list(&self) -> bool {
        matches!(
            self,
            EntityKind::Query
                | EntityKind::Function
                | EntityKind::Trigger
                | EntityKind::Task
                | EntityKind::Middleware
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named, guid-identified platform object.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Stable unique identity.
    pub guid: String,
    /// Platform id, when present. Used as a secondary lookup key.
    pub id: Option<String>,
    /// Display name. May collide with other entities.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Whether the entity is switched off on the platform.
    pub disabled: bool,
    /// Owning app reference (`app.id`), for queries.
    pub app_id: Option<String>,
    /// HTTP verb, for queries.
    pub verb: Option<String>,
    /// Top-level run list, children already normalized.
    pub run: Vec<Step>,
    /// The untouched JSON of the entity.
    pub raw: Value,
}

impl Entity {
    /// Reads an entity out of its JSON value.
    pub fn from_value(value: &Value) -> Entity {
        Entity {
            guid: value.get("guid").and_then(id_string).unwrap_or_default(),
            id: value.get("id").and_then(id_string),
            name: str_field(value, "name").unwrap_or_default(),
            description: str_field(value, "description").filter(|d| !d.is_empty()),
            disabled: value
                .get("disabled")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            app_id: value
                .get("app")
                .and_then(|app| app.get("id"))
                .and_then(id_string),
            verb: str_field(value, "verb").filter(|v| !v.is_empty()),
            run: Step::list_from_value(value.get("run")),
            raw: value.clone(),
        }
    }

    /// Returns true when `key` matches the guid or the platform id.
    pub fn is_identified_by(&self, key: &str) -> bool {
        self.guid == key || self.id.as_deref() == Some(key)
    }
}

/// The root export document, bucketed by kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkspaceExport {
    /// Database tables.
    pub dbo: Vec<Entity>,
    /// API groups.
    pub app: Vec<Entity>,
    /// API endpoints.
    pub query: Vec<Entity>,
    /// Stored functions.
    pub function: Vec<Entity>,
    /// Addons.
    pub addon: Vec<Entity>,
    /// Triggers.
    pub trigger: Vec<Entity>,
    /// Scheduled tasks.
    pub task: Vec<Entity>,
    /// Middleware.
    pub middleware: Vec<Entity>,
}

impl WorkspaceExport {
    /// Builds the typed export from an already-parsed JSON document.
    pub fn from_value(value: &Value) -> WorkspaceExport {
        let read = |kind: EntityKind| -> Vec<Entity> {
            value
                .get(kind.as_str())
                .and_then(Value::as_array)
                .map(|items| items.iter().map(Entity::from_value).collect())
                .unwrap_or_default()
        };

        WorkspaceExport {
            dbo: read(EntityKind::Dbo),
            app: read(EntityKind::App),
            query: read(EntityKind::Query),
            function: read(EntityKind::Function),
            addon: read(EntityKind::Addon),
            trigger: read(EntityKind::Trigger),
            task: read(EntityKind::Task),
            middleware: read(EntityKind::Middleware),
        }
    }

    /// Parses export JSON text.
    pub fn from_json_str(text: &str) -> AppResult<WorkspaceExport> {
        let value: Value = serde_json::from_str(text)?;
        Ok(WorkspaceExport::from_value(&value))
    }

    /// Entities of one kind.
    pub fn entities(&self, kind: EntityKind) -> &[Entity] {
        match kind {
            EntityKind::Dbo => &self.dbo,
            EntityKind::App => &self.app,
            EntityKind::Query => &self.query,
            EntityKind::Function => &self.function,
            EntityKind::Addon => &self.addon,
            EntityKind::Trigger => &self.trigger,
            EntityKind::Task => &self.task,
            EntityKind::Middleware => &self.middleware,
        }
    }

    /// Looks an app up by guid, then by platform id.
    pub fn find_app(&self, key: &str) -> Option<&Entity> {
        self.app
            .iter()
            .find(|app| app.guid == key)
            .or_else(|| self.app.iter().find(|app| app.is_identified_by(key)))
    }
}

/// Reads an identifier that may be encoded as a string or a number.
pub(crate) fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_kinds_are_empty() {
        let export = WorkspaceExport::from_value(&json!({ "query": "not-an-array" }));
        assert!(export.query.is_empty());
        assert!(export.dbo.is_empty());
    }

    #[test]
    fn test_entity_fields() {
        let value = json!({
            "guid": "q1",
            "id": 42,
            "name": "list-items",
            "description": "",
            "verb": "GET",
            "app": { "id": 7 },
            "run": [{ "name": "mvp:return" }]
        });
        let entity = Entity::from_value(&value);
        assert_eq!(entity.guid, "q1");
        assert_eq!(entity.id.as_deref(), Some("42"));
        assert_eq!(entity.app_id.as_deref(), Some("7"));
        assert_eq!(entity.description, None);
        assert_eq!(entity.run.len(), 1);
        assert_eq!(entity.raw, value);
        assert!(entity.is_identified_by("42"));
    }

    #[test]
    fn test_find_app_prefers_guid() {
        let export = WorkspaceExport::from_value(&json!({
            "app": [
                { "guid": "x", "id": "a1", "name": "ById" },
                { "guid": "a1", "name": "ByGuid" }
            ]
        }));
        assert_eq!(export.find_app("a1").map(|a| a.name.as_str()), Some("ByGuid"));
        assert_eq!(export.find_app("x").map(|a| a.name.as_str()), Some("ById"));
        assert!(export.find_app("missing").is_none());
    }

    #[test]
    fn test_from_json_str_rejects_garbage() {
        assert!(WorkspaceExport::from_json_str("{").is_err());
    }
}
