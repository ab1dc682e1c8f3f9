//! Alias redirection from `compilerOptions.baseUrl` / `paths`.
//!
//! Matching rules, in order:
//! - relative specifiers (`./x`, `../x`, `.`, `..`) never match
//! - a pattern without `*` equal to the specifier returns its substitutions
//! - the wildcard pattern (`prefix*suffix`) with the longest matching prefix
//!   wins; `*` in each substitution is replaced by the captured text
//! - with no pattern match, a configured `baseUrl` yields `baseUrl/specifier`

use std::path::{Path, PathBuf};

use crate::base::normalize_path;

use super::tsconfig::TsConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
struct PathPattern {
    prefix: String,
    /// `None` for exact patterns.
    suffix: Option<String>,
    /// Substitutions resolved against the base directory; may contain `*`.
    substitutions: Vec<String>,
}

impl PathPattern {
    fn new(pattern: &str, substitutions: &[String], base: &Path) -> Self {
        let substitutions = substitutions
            .iter()
            .map(|sub| base.join(sub).to_string_lossy().into_owned())
            .collect();
        match pattern.split_once('*') {
            Some((prefix, suffix)) => Self {
                prefix: prefix.to_string(),
                suffix: Some(suffix.to_string()),
                substitutions,
            },
            None => Self {
                prefix: pattern.to_string(),
                suffix: None,
                substitutions,
            },
        }
    }

    /// The text captured by `*`, if the wildcard pattern matches.
    fn capture<'s>(&self, specifier: &'s str) -> Option<&'s str> {
        let suffix = self.suffix.as_deref()?;
        if specifier.len() < self.prefix.len() + suffix.len() {
            return None;
        }
        specifier
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(suffix)
    }
}

/// Matcher built from a tsconfig's alias configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasMatcher {
    base_url: Option<PathBuf>,
    patterns: Vec<PathPattern>,
}

impl AliasMatcher {
    /// `None` when the config has neither `baseUrl` nor `paths`.
    pub fn from_config(config: &TsConfig) -> Option<Self> {
        if !config.has_aliases() {
            return None;
        }
        let base = config.base_url.as_deref().unwrap_or(&config.root_dir);
        let patterns = config
            .paths
            .iter()
            .map(|(pattern, subs)| PathPattern::new(pattern, subs, base))
            .collect();
        Some(Self {
            base_url: config.base_url.clone(),
            patterns,
        })
    }

    /// Candidate paths for `specifier`, in priority order. Empty when
    /// nothing matches.
    pub fn candidates(&self, specifier: &str) -> Vec<PathBuf> {
        if is_relative_specifier(specifier) {
            return Vec::new();
        }

        if let Some(exact) = self
            .patterns
            .iter()
            .find(|p| p.suffix.is_none() && p.prefix == specifier)
        {
            return exact
                .substitutions
                .iter()
                .map(|sub| normalize_path(Path::new(sub)))
                .collect();
        }

        let best = self
            .patterns
            .iter()
            .filter_map(|p| p.capture(specifier).map(|captured| (p, captured)))
            .fold(None, |best: Option<(&PathPattern, &str)>, candidate| match best {
                Some(current) if current.0.prefix.len() >= candidate.0.prefix.len() => Some(current),
                _ => Some(candidate),
            });

        match best {
            Some((pattern, captured)) => pattern
                .substitutions
                .iter()
                .map(|sub| normalize_path(Path::new(&sub.replacen('*', captured, 1))))
                .collect(),
            None => self
                .base_url
                .iter()
                .map(|base| normalize_path(&base.join(specifier)))
                .collect(),
        }
    }
}

fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}
