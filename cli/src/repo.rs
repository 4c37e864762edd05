#![deny(missing_docs)]

//! # Repo Command
//!
//! Export file -> documentation tree on disk.
//!
//! 1. **Parse**: read the workspace export JSON.
//! 2. **Build**: compute every `(path, content)` pair in memory.
//! 3. **Clear**: empty the destination (dot-entries such as `.git` survive).
//! 4. **Write**: apply the writes, last write winning on shared paths.

use crate::error::{CliError, CliResult};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use xano_docs_core::{build, collapse_writes, RepoFile, WorkspaceExport};

/// Arguments for the repo command.
#[derive(clap::Args, Debug, Clone)]
pub struct RepoArgs {
    /// Path to the workspace export JSON.
    #[clap(long)]
    pub export: PathBuf,

    /// Destination directory of the generated tree.
    #[clap(long, default_value = "xano-repo")]
    pub out: PathBuf,

    /// Leave existing files in the destination untouched.
    #[clap(long)]
    pub keep_existing: bool,
}

/// Executes the repo command.
pub fn execute(args: &RepoArgs) -> CliResult<()> {
    let text = fs::read_to_string(&args.export).map_err(|e| {
        CliError::General(format!("Failed to read export {:?}: {}", args.export, e))
    })?;
    let export = WorkspaceExport::from_json_str(&text)?;

    let planned = build(&export);
    let planned_count = planned.len();
    let files = collapse_writes(planned);
    if files.len() != planned_count {
        log::warn!(
            "{} writes collapsed onto shared paths (duplicate guids)",
            planned_count - files.len()
        );
    }

    if !args.keep_existing {
        clear_destination(&args.out)?;
    }
    write_files(&args.out, &files)?;

    println!("Wrote {} files to {:?}", files.len(), args.out);
    Ok(())
}

/// Removes every top-level entry of `dir` except dot-entries.
pub fn clear_destination(dir: &Path) -> CliResult<()> {
    if !dir.exists() {
        return Ok(());
    }

    let entries = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CliError::General(format!("Failed to scan {:?}: {}", dir, e)))?;

    for entry in entries {
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        log::debug!("removing {:?}", entry.path());
        if entry.file_type().is_dir() {
            fs::remove_dir_all(entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

/// Writes each file below `root`, creating directories as needed.
pub fn write_files(root: &Path, files: &[RepoFile]) -> CliResult<()> {
    for file in files {
        let target = root.join(&file.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, &file.content)?;
    }
    Ok(())
}
