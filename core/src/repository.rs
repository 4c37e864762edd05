#![deny(missing_docs)]

//! # Repository Builder
//!
//! Lays a workspace export out as a file tree:
//!
//! - `app/<app>/<query path>/<VERB>/` for endpoints that belong to an app,
//! - `<kind>/<name>/` for everything else,
//!
//! with a `<guid>.json` dump in every entity directory, a README narrating
//! run lists or describing tables, and one overview README per app.
//!
//! The builder only computes `(path, content)` pairs. Clearing the
//! destination and writing files is left to the caller.

use crate::entity_map::{entity_dir, EntityMaps};
use crate::export::{Entity, EntityKind, WorkspaceExport};
use crate::narrator::narrate;
use crate::sanitize::{sanitize, sanitize_path, SanitizeOptions};
use crate::table_doc::{FieldTableDescriber, TableDescriber};
use indexmap::IndexMap;

/// Verb used for endpoints exported without one.
pub const DEFAULT_VERB: &str = "GET";

/// A file to be written, relative to the repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoFile {
    /// Relative path using `/` separators.
    pub path: String,
    /// UTF-8 content.
    pub content: String,
}

impl RepoFile {
    fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// An endpoint as listed on its app's overview page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySummary {
    /// Raw endpoint name, e.g. `auth/login`.
    pub name: String,
    /// HTTP verb.
    pub verb: String,
    /// Endpoint description.
    pub description: Option<String>,
    /// Directory relative to the app directory.
    pub dir: String,
}

#[derive(Debug, Default)]
struct AppSection {
    name: String,
    dir: String,
    description: Option<String>,
    queries: Vec<QuerySummary>,
}

/// Builds the repository with the default table describer.
pub fn build(export: &WorkspaceExport) -> Vec<RepoFile> {
    build_with(export, &FieldTableDescriber)
}

/// Builds the repository, rendering table READMEs with `describer`.
pub fn build_with(export: &WorkspaceExport, describer: &dyn TableDescriber) -> Vec<RepoFile> {
    let maps = EntityMaps::from_export(export);
    let mut files = Vec::new();
    let mut apps: IndexMap<String, AppSection> = export
        .app
        .iter()
        .map(|app| {
            (
                app.guid.clone(),
                AppSection {
                    name: app.name.clone(),
                    dir: app_dir(app),
                    description: app.description.clone(),
                    queries: Vec::new(),
                },
            )
        })
        .collect();

    for kind in EntityKind::ALL {
        for entity in export.entities(kind) {
            let owner = (kind == EntityKind::Query)
                .then(|| entity.app_id.as_deref())
                .flatten()
                .and_then(|id| export.find_app(id));

            let dir = match owner {
                Some(app) => {
                    let verb = query_verb(entity);
                    let within_app = format!(
                        "{}/{}",
                        sanitize_path(&entity.name, &SanitizeOptions::IDENTIFIER),
                        verb
                    );
                    if let Some(section) = apps.get_mut(&app.guid) {
                        section.queries.push(QuerySummary {
                            name: entity.name.clone(),
                            verb,
                            description: entity.description.clone(),
                            dir: within_app.clone(),
                        });
                    }
                    format!("{}/{}", app_dir(app), within_app)
                }
                None => entity_dir(kind, &entity.name),
            };

            log::debug!("{} '{}' -> {}", kind, entity.name, dir);
            files.push(RepoFile::new(
                format!("{}/{}.json", dir, guid_file_stem(entity)),
                serde_json::to_string_pretty(&entity.raw).unwrap_or_default(),
            ));

            if kind == EntityKind::Dbo {
                files.push(RepoFile::new(
                    format!("{}/README.md", dir),
                    table_readme(entity, describer),
                ));
            } else if kind.has_run_list() {
                files.push(RepoFile::new(
                    format!("{}/README.md", dir),
                    run_list_readme(entity, &maps),
                ));
            }
        }
    }

    for section in apps.values() {
        files.push(RepoFile::new(
            format!("{}/README.md", section.dir),
            app_readme(section),
        ));
    }

    files
}

/// Applies the last-write-wins collision policy.
///
/// Entities sharing a guid map to the same `<guid>.json` path. The builder
/// keeps both writes; applying them in order leaves the later one on disk.
/// This function performs the same collapse in memory and logs each collided
/// path. Surviving files keep the position of their first occurrence.
pub fn collapse_writes(files: Vec<RepoFile>) -> Vec<RepoFile> {
    let mut by_path: IndexMap<String, String> = IndexMap::with_capacity(files.len());
    for file in files {
        if by_path.insert(file.path.clone(), file.content).is_some() {
            log::warn!("path written more than once, keeping last: {}", file.path);
        }
    }
    by_path
        .into_iter()
        .map(|(path, content)| RepoFile { path, content })
        .collect()
}

fn app_dir(app: &Entity) -> String {
    format!(
        "{}/{}",
        EntityKind::App.as_str(),
        sanitize(&app.name, &SanitizeOptions::IDENTIFIER)
    )
}

fn query_verb(entity: &Entity) -> String {
    sanitize(
        entity.verb.as_deref().unwrap_or(DEFAULT_VERB),
        &SanitizeOptions::FILENAME,
    )
}

fn guid_file_stem(entity: &Entity) -> String {
    sanitize(&entity.guid, &SanitizeOptions::FILENAME)
}

fn readme_header(entity: &Entity) -> String {
    let mut out = format!("# {}\n\n", entity.name);
    if let Some(description) = &entity.description {
        out.push_str(&format!("{}\n\n", description));
    }
    out
}

fn run_list_readme(entity: &Entity, maps: &EntityMaps) -> String {
    let mut out = readme_header(entity);
    out.push_str("## Steps\n\n");
    let steps = narrate(&entity.run, 0, maps);
    if steps.is_empty() {
        out.push_str("_No steps._\n");
    } else {
        out.push_str(&steps);
    }
    out
}

fn table_readme(entity: &Entity, describer: &dyn TableDescriber) -> String {
    let mut out = readme_header(entity);
    out.push_str("## Columns\n\n");
    out.push_str(&describer.describe(entity));
    out
}

/// Group key of an endpoint: every path segment but the last.
fn group_prefix(name: &str) -> String {
    let segments: Vec<&str> = name.split('/').filter(|s| !s.is_empty()).collect();
    match segments.split_last() {
        Some((_, head)) if !head.is_empty() => format!("/{}", head.join("/")),
        _ => "/".to_string(),
    }
}

fn app_readme(section: &AppSection) -> String {
    let mut out = format!("# {}\n\n", section.name);
    if let Some(description) = &section.description {
        out.push_str(&format!("{}\n\n", description));
    }

    out.push_str("## Endpoints\n\n");
    if section.queries.is_empty() {
        out.push_str("_No endpoints._\n");
        return out;
    }

    let mut groups: IndexMap<String, Vec<&QuerySummary>> = IndexMap::new();
    for query in &section.queries {
        groups.entry(group_prefix(&query.name)).or_default().push(query);
    }

    for (prefix, queries) in &groups {
        out.push_str(&format!("- `{}`\n", prefix));
        for query in queries {
            out.push_str(&format!("  - [{} {}](./{}/)", query.verb, query.name, query.dir));
            if let Some(description) = &query.description {
                out.push_str(&format!(" - {}", description.lines().next().unwrap_or_default()));
            }
            out.push('\n');
        }
    }

    out.push_str("\n## Structure\n\n```mermaid\nflowchart LR\n");
    out.push_str(&format!("  app[\"{}\"]\n", mermaid_label(&section.name)));
    for (g, (prefix, queries)) in groups.iter().enumerate() {
        out.push_str(&format!("  app --> g{}[\"{}\"]\n", g, mermaid_label(prefix)));
        for (q, query) in queries.iter().enumerate() {
            out.push_str(&format!(
                "  g{} --> g{}q{}[\"{} {}\"]\n",
                g,
                g,
                q,
                query.verb,
                mermaid_label(&query.name)
            ));
        }
    }
    out.push_str("```\n");
    out
}

fn mermaid_label(text: &str) -> String {
    text.replace('"', "#quot;")
}
