//! Import specifier resolution.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::base::constants::DECLARATION_EXTENSION;
use crate::base::normalize_path;

use super::alias::AliasMatcher;

/// Maps an import specifier seen in a file to the file it names.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    aliases: Option<AliasMatcher>,
}

impl PathResolver {
    pub fn new(aliases: Option<AliasMatcher>) -> Self {
        Self { aliases }
    }

    /// Resolve `specifier` imported from `from_file`.
    ///
    /// Alias candidates come first; without any, the specifier is taken as
    /// absolute or relative to the importing file. Every candidate has its
    /// last extension replaced by `.ts` and the first existing file wins.
    pub fn resolve(&self, specifier: &str, from_file: &Path) -> Option<PathBuf> {
        let mut candidates = self
            .aliases
            .as_ref()
            .map(|aliases| aliases.candidates(specifier))
            .unwrap_or_default();

        if candidates.is_empty() {
            let path = Path::new(specifier);
            candidates.push(if path.is_absolute() {
                normalize_path(path)
            } else {
                let dir = from_file.parent().unwrap_or_else(|| Path::new(""));
                normalize_path(&dir.join(path))
            });
        }

        let resolved = candidates
            .into_iter()
            .map(|candidate| candidate.with_extension(DECLARATION_EXTENSION))
            .find(|candidate| candidate.is_file());

        if resolved.is_none() {
            trace!(specifier, from = %from_file.display(), "specifier does not resolve");
        }
        resolved
    }
}
