//! Assertions over consolidated modules.

use std::path::Path;

use zodify::Module;

/// The module for `path`, panicking with the available paths otherwise.
pub fn module_for<'a>(modules: &'a [Module], path: &Path) -> &'a Module {
    modules
        .iter()
        .find(|m| &*m.file_path == path)
        .unwrap_or_else(|| {
            let paths: Vec<_> = modules.iter().map(|m| m.file_path.display().to_string()).collect();
            panic!("No module for {} in {:?}", path.display(), paths)
        })
}

/// `(origin, name, from_source)` of every import binding.
pub fn import_summary(module: &Module) -> Vec<(String, String, bool)> {
    module
        .imports
        .iter()
        .map(|b| (b.origin.to_string(), b.name.to_string(), b.import_from_source))
        .collect()
}

/// Asserts that `before` and `after` are declared in the same module, in
/// that order.
pub fn assert_declared_before(modules: &[Module], before: &str, after: &str) {
    let position = |name: &str| {
        modules
            .iter()
            .enumerate()
            .find_map(|(i, m)| {
                m.declarations
                    .iter()
                    .position(|d| d.name == name)
                    .map(|j| (i, j))
            })
            .unwrap_or_else(|| panic!("`{name}` missing from output"))
    };
    let (before_module, before_index) = position(before);
    let (after_module, after_index) = position(after);
    assert_eq!(before_module, after_module, "`{before}` and `{after}` are in different files");
    assert!(before_index < after_index, "`{before}` should precede `{after}`");
}
