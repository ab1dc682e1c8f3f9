//! Consolidation of resolution slices into one module per file.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use super::module::Module;
use crate::base::FilePath;

/// Group slices by file in first-seen order and deduplicate each group.
///
/// Declarations are unique by name, imports by local name and re-exports by
/// `(name, path)`. The first occurrence wins, so merging is idempotent.
pub fn merge_modules(slices: impl IntoIterator<Item = Module>) -> Vec<Module> {
    let mut grouped: IndexMap<FilePath, Module> = IndexMap::new();

    for slice in slices {
        let merged = grouped
            .entry(slice.file_path.clone())
            .or_insert_with(|| Module::empty(slice.file_path.clone()));
        merged.declarations.extend(slice.declarations);
        merged.imports.extend(slice.imports);
        merged.reexports.extend(slice.reexports);
    }

    grouped
        .into_values()
        .map(|mut module| {
            let mut seen = FxHashSet::default();
            module.declarations.retain(|d| seen.insert(d.name.clone()));

            let mut seen = FxHashSet::default();
            module.imports.retain(|b| seen.insert(b.name.clone()));

            let mut seen = FxHashSet::default();
            module
                .reexports
                .retain(|b| seen.insert((b.name.clone(), b.path.clone())));
            module
        })
        .collect()
}
