#![deny(missing_docs)]

//! # Entity Cross-Reference Tables
//!
//! Lookup tables from function/table identifiers to their display name and
//! repository path. Built once per export and only read afterwards.

use crate::export::{Entity, EntityKind, WorkspaceExport};
use crate::sanitize::{sanitize_path, SanitizeOptions};
use std::collections::HashMap;

/// What a step needs to know about a referenced entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    /// Display name.
    pub name: String,
    /// Repository-relative directory, e.g. `function/send_email`.
    pub path: String,
    /// Description, if any.
    pub description: Option<String>,
}

/// Identifier -> [`EntityRef`] table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityMap {
    entries: HashMap<String, EntityRef>,
}

impl EntityMap {
    /// Builds the table for entities of one kind in a single pass.
    ///
    /// Entries are keyed by guid; entities carrying a platform `id` are also
    /// reachable through it. A later duplicate guid replaces the earlier one.
    pub fn build(kind: EntityKind, entities: &[Entity]) -> EntityMap {
        let mut entries = HashMap::with_capacity(entities.len());

        for entity in entities {
            let entry = EntityRef {
                name: entity.name.clone(),
                path: entity_dir(kind, &entity.name),
                description: entity.description.clone(),
            };
            if let Some(id) = entity.id.as_ref().filter(|id| **id != entity.guid) {
                entries.entry(id.clone()).or_insert_with(|| entry.clone());
            }
            entries.insert(entity.guid.clone(), entry);
        }

        EntityMap { entries }
    }

    /// Resolves an identifier.
    pub fn get(&self, key: &str) -> Option<&EntityRef> {
        self.entries.get(key)
    }

    /// Number of lookup keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The function and table tables a narrator needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityMaps {
    /// Stored functions.
    pub functions: EntityMap,
    /// Database tables.
    pub tables: EntityMap,
}

impl EntityMaps {
    /// Builds both tables from an export.
    pub fn from_export(export: &WorkspaceExport) -> EntityMaps {
        EntityMaps {
            functions: EntityMap::build(EntityKind::Function, &export.function),
            tables: EntityMap::build(EntityKind::Dbo, &export.dbo),
        }
    }
}

/// `<kind>/<sanitized name>`, the directory of a non-query entity.
pub fn entity_dir(kind: EntityKind, name: &str) -> String {
    format!(
        "{}/{}",
        kind.as_str(),
        sanitize_path(name, &SanitizeOptions::IDENTIFIER)
    )
}
