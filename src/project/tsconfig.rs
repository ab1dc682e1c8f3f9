//! tsconfig.json loading.
//!
//! Files are parsed with `json5` so comments and trailing commas are
//! accepted. `extends` chains are followed (relative paths or packages under
//! `node_modules`) and merged field by field, the extending config winning.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::Deserialize;
use tracing::debug;

use crate::base::constants::TSCONFIG_FILE;
use crate::base::normalize_path;
use crate::error::{ExtractError, Result};

/// The merged project configuration relevant to extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsConfig {
    /// Absolute path of the tsconfig file.
    pub path: PathBuf,
    /// Directory containing the tsconfig file.
    pub root_dir: PathBuf,
    /// `compilerOptions.baseUrl`, resolved against the config that set it.
    pub base_url: Option<PathBuf>,
    /// `compilerOptions.paths` in declaration order.
    pub paths: IndexMap<String, Vec<String>>,
    pub files: Option<Vec<String>>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTsConfig {
    #[serde(default)]
    extends: Option<String>,
    #[serde(default)]
    compiler_options: RawCompilerOptions,
    #[serde(default)]
    files: Option<Vec<String>>,
    #[serde(default)]
    include: Option<Vec<String>>,
    #[serde(default)]
    exclude: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCompilerOptions {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    paths: Option<IndexMap<String, Vec<String>>>,
    /// Absolute form of `base_url`, filled in after reading.
    #[serde(skip)]
    resolved_base_url: Option<PathBuf>,
}

impl TsConfig {
    /// Load a tsconfig from a file, or from `tsconfig.json` in a directory.
    pub fn load(project: &Path) -> Result<Self> {
        let path = resolve_tsconfig_path(project)?;
        let root_dir = path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| ExtractError::config(&path, "tsconfig has no parent directory"))?;

        let mut visited = FxHashSet::default();
        let raw = load_raw_config(&path, &mut visited)?;
        debug!(tsconfig = %path.display(), extends = visited.len() - 1, "loaded tsconfig");

        Ok(Self {
            base_url: raw.compiler_options.resolved_base_url,
            paths: raw.compiler_options.paths.unwrap_or_default(),
            files: raw.files,
            include: raw.include,
            exclude: raw.exclude,
            path,
            root_dir,
        })
    }

    /// Find the nearest `tsconfig.json` in `start` or its ancestors.
    pub fn find(start: &Path) -> Result<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(TSCONFIG_FILE))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| ExtractError::TsconfigNotFound {
                start: start.to_path_buf(),
            })
    }

    /// Whether alias redirection is configured at all.
    pub fn has_aliases(&self) -> bool {
        self.base_url.is_some() || !self.paths.is_empty()
    }
}

fn resolve_tsconfig_path(project: &Path) -> Result<PathBuf> {
    let candidate = if project.is_dir() {
        project.join(TSCONFIG_FILE)
    } else {
        project.to_path_buf()
    };
    candidate
        .canonicalize()
        .map_err(|err| ExtractError::io(&candidate, err))
}

fn load_raw_config(path: &Path, visited: &mut FxHashSet<PathBuf>) -> Result<RawTsConfig> {
    let canonical = path
        .canonicalize()
        .map_err(|err| ExtractError::io(path, err))?;
    if !visited.insert(canonical.clone()) {
        return Err(ExtractError::config(
            &canonical,
            "cycle detected while resolving tsconfig extends",
        ));
    }

    let text = fs::read_to_string(&canonical).map_err(|err| ExtractError::io(&canonical, err))?;
    let mut current: RawTsConfig =
        json5::from_str(&text).map_err(|err| ExtractError::config(&canonical, err.to_string()))?;

    let config_dir = canonical
        .parent()
        .ok_or_else(|| ExtractError::config(&canonical, "tsconfig has no parent directory"))?;
    current.compiler_options.resolved_base_url = current
        .compiler_options
        .base_url
        .as_deref()
        .map(|raw| normalize_path(&config_dir.join(raw)));

    let Some(extends) = current.extends.take() else {
        return Ok(current);
    };

    let extends_path = resolve_extends_path(config_dir, &extends)?;
    let base = load_raw_config(&extends_path, visited)?;
    Ok(merge_raw_configs(base, current))
}

fn resolve_extends_path(config_dir: &Path, extends: &str) -> Result<PathBuf> {
    if extends.starts_with('.') || Path::new(extends).is_absolute() {
        return resolve_extends_file(&config_dir.join(extends)).ok_or_else(|| {
            ExtractError::config(
                config_dir.join(extends),
                "extended tsconfig does not exist",
            )
        });
    }

    config_dir
        .ancestors()
        .find_map(|ancestor| resolve_extends_file(&ancestor.join("node_modules").join(extends)))
        .ok_or_else(|| {
            ExtractError::config(
                config_dir,
                format!("failed to resolve tsconfig extends '{extends}'"),
            )
        })
}

fn resolve_extends_file(candidate: &Path) -> Option<PathBuf> {
    let mut attempts = vec![candidate.to_path_buf()];
    if candidate.extension().is_none() {
        attempts.push(candidate.with_extension("json"));
    }
    if candidate.is_dir() {
        attempts.push(candidate.join(TSCONFIG_FILE));
    }
    attempts.into_iter().find(|attempt| attempt.is_file())
}

fn merge_raw_configs(base: RawTsConfig, overlay: RawTsConfig) -> RawTsConfig {
    RawTsConfig {
        extends: None,
        compiler_options: RawCompilerOptions {
            base_url: overlay
                .compiler_options
                .base_url
                .or(base.compiler_options.base_url),
            paths: overlay.compiler_options.paths.or(base.compiler_options.paths),
            resolved_base_url: overlay
                .compiler_options
                .resolved_base_url
                .or(base.compiler_options.resolved_base_url),
        },
        files: overlay.files.or(base.files),
        include: overlay.include.or(base.include),
        exclude: overlay.exclude.or(base.exclude),
    }
}
