//! Error types for extraction runs.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::base::{Name, Position};

/// Fatal errors. Any of these aborts the run before output is written.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A declaration depends on itself, directly or through other files.
    #[error("circular reference: {}", format_stack(.stack))]
    CircularReference { stack: Vec<(PathBuf, Name)> },

    /// Reference chain exceeded the recursion bound.
    #[error("reference chain too deep while resolving `{name}` in {}", .path.display())]
    ResolutionTooDeep { path: PathBuf, name: Name },

    /// Entry tag on a declaration inside a namespace, module or block.
    #[error("can not mark a non-top-level type as an entry: `{name}` at {}:{position}", .path.display())]
    NestedEntry {
        path: PathBuf,
        name: Name,
        position: Position,
    },

    /// Entry tag on a declaration that is not exported.
    #[error("can not mark a not-exported type as an entry: `{name}` at {}:{position}", .path.display())]
    UnexportedEntry {
        path: PathBuf,
        name: Name,
        position: Position,
    },

    /// `export v from "..."` in a re-export list.
    #[error("unexpected export specifier at {}:{position}", .path.display())]
    UnexpectedExportSpecifier { path: PathBuf, position: Position },

    #[error("no input files found for {}", .tsconfig.display())]
    NoInputFiles { tsconfig: PathBuf },

    #[error("no declarations tagged with @{tag} were found")]
    NoEntries { tag: String },

    #[error("tsconfig.json not found in {} or any parent directory", .start.display())]
    TsconfigNotFound { start: PathBuf },

    /// Invalid or unreadable project configuration.
    #[error("invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("invalid glob `{glob}`: {source}")]
    InvalidGlob {
        glob: String,
        #[source]
        source: globset::Error,
    },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ExtractError>;

impl ExtractError {
    /// Create an IO error for `path`.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn config(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    pub fn invalid_glob(glob: impl Into<String>, source: globset::Error) -> Self {
        Self::InvalidGlob {
            glob: glob.into(),
            source,
        }
    }
}

fn format_stack(stack: &[(PathBuf, Name)]) -> String {
    stack
        .iter()
        .map(|(path, name)| format!("{name} ({})", path.display()))
        .collect::<Vec<_>>()
        .join(" -> ")
}
