//! Foundation types for the zodify toolchain.
//!
//! This module provides the small vocabulary shared by every layer:
//! - [`Name`] - cheap-to-clone identifier text
//! - [`FilePath`] - shared absolute file path used as a module key
//! - [`Position`], [`LineIndex`] - line/column conversion for messages
//! - Domain constants (tag name, extensions, export sentinels)
//!
//! This module has NO dependencies on other zodify modules.

pub mod constants;
mod position;

use std::path::{Component, Path, PathBuf};
use std::rc::Rc;

pub use position::{LineIndex, Position};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};

/// Identifier text (declaration names, import origins, aliases).
pub type Name = smol_str::SmolStr;

/// Absolute path of a source file, shared between modules and slices.
pub type FilePath = Rc<Path>;

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component. The file system is not consulted.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Path of `target` relative to the directory `from_dir`, using `/`
/// separators. Both paths are expected to be absolute and normalized.
pub fn relative_path(from_dir: &Path, target: &Path) -> String {
    let from: Vec<_> = from_dir.components().collect();
    let to: Vec<_> = target.components().collect();
    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from.len() {
        parts.push("..".to_string());
    }
    for component in &to[common..] {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}
