//! Extraction session: entry discovery, graph resolution and consolidation.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use regex::Regex;
use tracing::{debug, trace};

use crate::base::constants::DEFAULT_TAG;
use crate::base::{FilePath, normalize_path};
use crate::emit::{Generator, NameStyle, Warnings};
use crate::error::{ExtractError, Result};
use crate::hir::{DeclResolver, Module, merge_modules};
use crate::project::{
    AliasMatcher, DiscoveryOptions, PathResolver, SourceLoader, TsConfig, collect_source_files,
};

/// Options of a full extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Directory generated schema files are written to.
    pub out_dir: PathBuf,
    /// Documentation tag marking entry declarations.
    pub tag: String,
    /// Regex narrowing the input files, matched against paths relative to `cwd`.
    pub pattern: Option<String>,
    /// Explicit tsconfig file or directory; otherwise searched upward from `cwd`.
    pub tsconfig: Option<PathBuf>,
    pub name_style: NameStyle,
    pub cwd: PathBuf,
}

impl ExtractOptions {
    pub fn new(out_dir: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            tag: DEFAULT_TAG.to_string(),
            pattern: None,
            tsconfig: None,
            name_style: NameStyle::default(),
            cwd: cwd.into(),
        }
    }
}

/// Run a whole extraction: configuration, discovery, resolution and
/// emission. Output is only written once every entry resolved.
pub fn extract(options: &ExtractOptions) -> Result<Warnings> {
    let cwd = normalize_path(&options.cwd);
    let config_path = match &options.tsconfig {
        Some(path) => normalize_path(&cwd.join(path)),
        None => TsConfig::find(&cwd)?,
    };
    let config = TsConfig::load(&config_path)?;
    let out_dir = normalize_path(&cwd.join(&options.out_dir));
    let pattern = options.pattern.as_deref().map(Regex::new).transpose()?;

    let files = collect_source_files(
        &config,
        &DiscoveryOptions {
            out_dir: Some(&out_dir),
            pattern: pattern.as_ref(),
            cwd: Some(&cwd),
        },
    )?;

    let resolver = PathResolver::new(AliasMatcher::from_config(&config));
    let mut session = ExtractionSession::new(resolver, options.tag.clone());
    let extraction = session.extract(&files)?;

    Generator::new(&config.root_dir, &out_dir)
        .with_name_style(options.name_style)
        .generate(&extraction.modules)
}

/// Consolidated modules produced from a set of input files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub modules: Vec<Module>,
    /// Number of tagged entry declarations found.
    pub entry_count: usize,
}

/// One extraction run.
///
/// The loader cache and the resolution memo live as long as the session,
/// so each file is parsed once and each `(file, name)` pair is resolved
/// once no matter how many entries reach it.
#[derive(Debug)]
pub struct ExtractionSession {
    loader: SourceLoader,
    resolver: DeclResolver,
}

impl ExtractionSession {
    pub fn new(path_resolver: PathResolver, tag: impl Into<String>) -> Self {
        Self {
            loader: SourceLoader::new(path_resolver, tag),
            resolver: DeclResolver::new(),
        }
    }

    pub fn loader(&self) -> &SourceLoader {
        &self.loader
    }

    /// Extract every entry reachable from `files`.
    ///
    /// Entries are visited in file order, then declaration order; the
    /// slices of each entry are concatenated and merged per file.
    pub fn extract(&mut self, files: &[PathBuf]) -> Result<Extraction> {
        let mut slices = Vec::new();
        let mut entry_count = 0;

        for file in files {
            let path: FilePath = Rc::from(normalize_path(file));
            let module = self.loader.load(&path)?;

            for entry in module.entries() {
                entry_count += 1;
                trace!(name = %entry.name, file = %file.display(), "resolving entry");
                match self.resolver.resolve(&mut self.loader, &entry.name, &module)? {
                    Some(resolution) => slices.extend(resolution.slices.iter().cloned()),
                    None => trace!(name = %entry.name, "entry did not resolve"),
                }
            }
        }

        if entry_count == 0 {
            return Err(ExtractError::NoEntries {
                tag: self.loader.tag().to_string(),
            });
        }

        let modules = merge_modules(slices);
        debug!(
            entries = entry_count,
            modules = modules.len(),
            loaded = self.loader.loaded_count(),
            "extraction finished"
        );
        Ok(Extraction {
            modules,
            entry_count,
        })
    }

    /// Whether `path` was parsed during this session.
    pub fn was_loaded(&self, path: &Path) -> bool {
        self.loader.is_loaded(path)
    }
}
