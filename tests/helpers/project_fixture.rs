//! Temporary on-disk projects for end-to-end tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zodify::base::constants::DEFAULT_TAG;
use zodify::project::PathResolver;
use zodify::{ExtractOptions, Extraction, ExtractionSession, Result};

/// A project directory that lives as long as the fixture.
pub struct TestProject {
    _dir: TempDir,
    root: PathBuf,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let root = dir.path().canonicalize().expect("Failed to canonicalize temp dir");
        Self { _dir: dir, root }
    }

    /// Creates a project with the given `(path, source)` files.
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let project = Self::new();
        for (file, source) in files {
            project.write(file, source);
        }
        project
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    pub fn write(&self, file: &str, source: &str) -> PathBuf {
        let path = self.path(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, source).unwrap();
        path
    }

    pub fn read(&self, file: &str) -> String {
        fs::read_to_string(self.path(file))
            .unwrap_or_else(|err| panic!("Failed to read {file}: {err}"))
    }

    /// Session with plain relative resolution and the default tag.
    pub fn session(&self) -> ExtractionSession {
        ExtractionSession::new(PathResolver::default(), DEFAULT_TAG)
    }

    /// Extracts the entries of `files`, returning the session for inspection.
    pub fn extract(&self, files: &[&str]) -> (ExtractionSession, Result<Extraction>) {
        let mut session = self.session();
        let paths: Vec<PathBuf> = files.iter().map(|f| self.path(f)).collect();
        let result = session.extract(&paths);
        (session, result)
    }

    /// Options for a full run writing to `out/` with the project as cwd.
    pub fn options(&self) -> ExtractOptions {
        ExtractOptions::new("out", &self.root)
    }
}
