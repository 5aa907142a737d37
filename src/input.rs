//! Input resolver: turns command-line positional arguments into input
//! work items, consulting the source-path search list.

use crate::error::{DriverError, Result};
use crate::module_id::ModuleId;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Either a resolved path to a source file that must be parsed, or a module
/// known by name only, to be rebuilt if required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkItem {
    FilePath(PathBuf),
    ModuleName(ModuleId, PathBuf),
}

/// Resolves each raw argument in order, preserving order and deduplicating
/// nothing at this stage. Errors are recorded by the caller via the
/// returned diagnostics; any of them means the caller must bail before any
/// compilation starts.
pub fn resolve_inputs(
    args: &[String],
    source_path: &[PathBuf],
    extension: &str,
) -> (Vec<WorkItem>, Vec<String>) {
    let mut items = Vec::new();
    let mut errors = Vec::new();

    for arg in args {
        resolve_one(arg, source_path, extension, &mut items, &mut errors);
    }

    (items, errors)
}

fn resolve_one(
    arg: &str,
    source_path: &[PathBuf],
    extension: &str,
    items: &mut Vec<WorkItem>,
    errors: &mut Vec<String>,
) {
    let as_path = Path::new(arg);

    if as_path.is_file() {
        items.push(WorkItem::FilePath(as_path.to_path_buf()));
        return;
    }

    if as_path.is_dir() {
        for entry in WalkDir::new(as_path).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.is_file() && path.extension().map(|e| e == extension).unwrap_or(false) {
                items.push(WorkItem::FilePath(path.to_path_buf()));
            }
        }
        return;
    }

    let looks_like_source_path = arg.ends_with(&format!(".{extension}"));
    if looks_like_source_path {
        if as_path.is_absolute() {
            errors.push(format!("could not read `{arg}`"));
            return;
        }
        for dir in source_path {
            let candidate = dir.join(arg);
            if candidate.is_file() {
                items.push(WorkItem::FilePath(candidate));
                return;
            }
        }
        errors.push(format!("could not find `{arg}` in source path"));
        return;
    }

    // Otherwise treat `arg` as a module name.
    let module = ModuleId::canonicalize(arg);
    let relative = module.to_relative_path(extension);
    for dir in source_path {
        let candidate = dir.join(&relative);
        if candidate.is_file() {
            items.push(WorkItem::ModuleName(module, candidate));
            return;
        }
    }
    errors.push(format!("could not find `{arg}` in source path"));
}

/// Convenience wrapper returning a [`DriverError`] for the first recorded
/// error, for callers that just want pass/fail instead of the full list.
pub fn resolve_inputs_strict(
    args: &[String],
    source_path: &[PathBuf],
    extension: &str,
) -> Result<Vec<WorkItem>> {
    let (items, errors) = resolve_inputs(args, source_path, extension);
    if let Some(first) = errors.into_iter().next() {
        return Err(DriverError::Message(first));
    }
    if items.is_empty() {
        return Err(DriverError::NoInputFiles);
    }
    Ok(items)
}
