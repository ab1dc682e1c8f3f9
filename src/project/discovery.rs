//! Source file discovery for a project.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::base::constants::{IGNORED_DIRECTORIES, SOURCE_EXTENSIONS};
use crate::base::{normalize_path, relative_path};
use crate::error::{ExtractError, Result};

use super::tsconfig::TsConfig;

const DEFAULT_INCLUDE: &str = "**/*";
const DEFAULT_EXCLUDE: &[&str] = &["node_modules", "bower_components", "jspm_packages"];

/// Options narrowing the set of discovered files.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions<'a> {
    /// Generated output lives here and is never read back.
    pub out_dir: Option<&'a Path>,
    /// Tested against each path relative to `cwd`.
    pub pattern: Option<&'a Regex>,
    pub cwd: Option<&'a Path>,
}

/// All source files the project includes, sorted.
///
/// With a `files` list only those files are taken; otherwise `include`
/// minus `exclude` is matched against paths relative to the tsconfig
/// directory.
pub fn collect_source_files(config: &TsConfig, options: &DiscoveryOptions<'_>) -> Result<Vec<PathBuf>> {
    let root = &config.root_dir;
    let out_dir = options.out_dir.map(normalize_path);

    let mut files = match &config.files {
        Some(listed) => listed
            .iter()
            .map(|file| normalize_path(&root.join(file)))
            .filter(|path| {
                let exists = path.is_file();
                if !exists {
                    warn!(file = %path.display(), "file listed in tsconfig does not exist");
                }
                exists
            })
            .collect(),
        None => walk_project(config, out_dir.as_deref())?,
    };

    if let Some(pattern) = options.pattern {
        let cwd = options.cwd.unwrap_or(root);
        files.retain(|file| pattern.is_match(&relative_path(cwd, file)));
    }

    files.sort();
    files.dedup();
    debug!(count = files.len(), root = %root.display(), "discovered source files");

    if files.is_empty() {
        return Err(ExtractError::NoInputFiles {
            tsconfig: config.path.clone(),
        });
    }
    Ok(files)
}

fn walk_project(config: &TsConfig, out_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
    let root = &config.root_dir;
    let include = match &config.include {
        Some(patterns) => build_globset(patterns)?,
        None => build_globset(&[DEFAULT_INCLUDE])?,
    };
    let exclude = match &config.exclude {
        Some(patterns) => build_globset(patterns)?,
        None => build_globset(DEFAULT_EXCLUDE)?,
    };

    let skip = |entry: &DirEntry| {
        entry.file_type().is_dir()
            && (entry
                .file_name()
                .to_str()
                .is_some_and(|name| IGNORED_DIRECTORIES.contains(&name))
                || out_dir.is_some_and(|out| entry.path() == out))
    };

    let files = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !skip(entry))
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_source_file(entry.path()))
        .filter(|entry| {
            entry.path().strip_prefix(root).is_ok_and(|rel| {
                include.is_match(rel) && !exclude.is_match(rel)
            })
        })
        .map(|entry| entry.into_path())
        .collect();
    Ok(files)
}

fn build_globset<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.as_ref().trim();
        if pattern.is_empty() {
            continue;
        }
        let expanded = expand_directory_pattern(pattern);
        let glob = Glob::new(&expanded).map_err(|err| ExtractError::invalid_glob(pattern, err))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|err| ExtractError::invalid_glob(patterns_display(patterns), err))
}

fn patterns_display<S: AsRef<str>>(patterns: &[S]) -> String {
    patterns
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A plain directory name (`src`, `lib/`) stands for everything below it.
fn expand_directory_pattern(pattern: &str) -> String {
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    if pattern.chars().any(|ch| matches!(ch, '*' | '?' | '[' | ']')) {
        return pattern.to_string();
    }
    let trimmed = pattern.trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_INCLUDE.to_string();
    }
    match Path::new(trimmed).extension() {
        Some(_) => trimmed.to_string(),
        None => format!("{trimmed}/**/*"),
    }
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}
