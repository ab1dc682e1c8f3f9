//! Source unit loading: one [`Module`] per file, cached for the run.
//!
//! A file is read and parsed once. Eligible declarations are the top-level
//! interfaces, type aliases and enums; the entry tag is read from the
//! comment directly before a declaration (or before its `export`).

use std::fs;
use std::path::Path;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::base::constants::{DEFAULT_EXPORT, NAMESPACE_EXPORT};
use crate::base::{FilePath, LineIndex, Name};
use crate::error::{ExtractError, Result};
use crate::hir::{Declaration, DeclarationKind, ImportBinding, Module, ModuleLoader};
use crate::parser::ast::{self, AstNode, SourceFile};
use crate::parser::parse;

use super::path_resolver::PathResolver;

#[derive(Debug)]
pub struct SourceLoader {
    resolver: PathResolver,
    tag: String,
    cache: FxHashMap<FilePath, Rc<Module>>,
}

impl SourceLoader {
    pub fn new(resolver: PathResolver, tag: impl Into<String>) -> Self {
        Self {
            resolver,
            tag: tag.into(),
            cache: FxHashMap::default(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Number of distinct files loaded so far.
    pub fn loaded_count(&self) -> usize {
        self.cache.len()
    }

    pub fn is_loaded(&self, path: &Path) -> bool {
        self.cache.contains_key(path)
    }

    /// Load `path`, reading it on first use.
    pub fn load(&mut self, path: &FilePath) -> Result<Rc<Module>> {
        if let Some(module) = self.cache.get(path) {
            return Ok(module.clone());
        }
        let module = Rc::new(self.read_module(path)?);
        self.cache.insert(path.clone(), module.clone());
        Ok(module)
    }

    fn read_module(&self, path: &FilePath) -> Result<Module> {
        let text = fs::read_to_string(path).map_err(|err| ExtractError::io(path, err))?;
        let parse = parse(&text);
        if !parse.ok() {
            debug!(
                file = %path.display(),
                errors = parse.errors.len(),
                first = %parse.errors[0].message,
                "file does not parse, contributing no declarations"
            );
            return Ok(Module::empty(path.clone()));
        }

        let line_index = LineIndex::new(&text);
        let file = parse.source_file();
        let collector = Collector {
            loader: self,
            path,
            line_index: &line_index,
        };

        Ok(Module {
            file_path: path.clone(),
            declarations: collector.declarations(&file)?,
            imports: collector.imports(&file),
            reexports: collector.reexports(&file)?,
        })
    }
}

impl ModuleLoader for SourceLoader {
    fn load(&mut self, path: &FilePath) -> Result<Rc<Module>> {
        SourceLoader::load(self, path)
    }
}

/// Per-file extraction of declarations and edges.
struct Collector<'a> {
    loader: &'a SourceLoader,
    path: &'a FilePath,
    line_index: &'a LineIndex,
}

impl Collector<'_> {
    fn declarations(&self, file: &SourceFile) -> Result<Vec<Rc<Declaration>>> {
        let mut declarations: Vec<Rc<Declaration>> = Vec::new();

        for decl in file.declarations() {
            let Some(name) = decl.name().and_then(|n| n.text()) else {
                continue;
            };
            let position = self
                .line_index
                .position(decl.syntax().text_range().start());
            let is_entry = decl
                .leading_comment()
                .is_some_and(|comment| ast::doc_tags(comment.text()).contains(&self.loader.tag.as_str()));

            if !decl.is_top_level() {
                if is_entry {
                    return Err(ExtractError::NestedEntry {
                        path: self.path.to_path_buf(),
                        name,
                        position,
                    });
                }
                continue;
            }

            let exported = decl.is_exported();
            if !exported && is_entry {
                return Err(ExtractError::UnexportedEntry {
                    path: self.path.to_path_buf(),
                    name,
                    position,
                });
            }

            if declarations.iter().any(|d| d.name == name) {
                trace!(name = %name, file = %self.path.display(), "duplicate declaration ignored");
                continue;
            }

            let kind = DeclarationKind::from(decl.clone());
            trace!(name = %name, kind = kind.display_name(), is_entry, "declaration");
            declarations.push(Rc::new(Declaration {
                exported_as_default: decl.is_exported_as_default(),
                kind,
                name,
                is_entry,
                exported,
                position,
            }));
        }

        Ok(declarations)
    }

    fn imports(&self, file: &SourceFile) -> Vec<ImportBinding> {
        let mut imports = Vec::new();

        for import in file.imports() {
            let Some((target, ext)) = import.source().and_then(|s| self.resolve(&s)) else {
                continue;
            };

            if let Some(local) = import.default_import().and_then(|d| d.name()).and_then(|n| n.text()) {
                imports.push(ImportBinding::new(DEFAULT_EXPORT, local, target.clone()).with_ext(ext.clone()));
            }
            if let Some(local) = import
                .namespace_import()
                .and_then(|ns| ns.name())
                .and_then(|n| n.text())
            {
                imports.push(ImportBinding::new(NAMESPACE_EXPORT, local, target.clone()).with_ext(ext.clone()));
            }
            let named = import.named_imports();
            for specifier in named.iter().flat_map(|n| n.specifiers()) {
                let (Some(origin), Some(local)) = (
                    specifier.imported().and_then(|n| n.text()),
                    specifier.local().and_then(|n| n.text()),
                ) else {
                    continue;
                };
                imports.push(ImportBinding::new(origin, local, target.clone()).with_ext(ext.clone()));
            }
        }

        imports
    }

    fn reexports(&self, file: &SourceFile) -> Result<Vec<ImportBinding>> {
        let mut reexports = Vec::new();

        // Re-exports keep their source order across both statement forms.
        for node in file.syntax().children() {
            if let Some(all) = ast::ExportAll::cast(node.clone()) {
                if let Some((target, ext)) = all.source().and_then(|s| self.resolve(&s)) {
                    reexports.push(ImportBinding::new(NAMESPACE_EXPORT, NAMESPACE_EXPORT, target).with_ext(ext));
                }
                continue;
            }

            let Some(list) = ast::ExportNamed::cast(node) else {
                continue;
            };
            let Some(source) = list.source() else {
                continue;
            };
            if let Some(default) = list.default_specifier() {
                return Err(ExtractError::UnexpectedExportSpecifier {
                    path: self.path.to_path_buf(),
                    position: self.line_index.position(default.syntax().text_range().start()),
                });
            }
            let Some((target, ext)) = self.resolve(&source) else {
                continue;
            };

            if let Some(name) = list
                .namespace_specifier()
                .and_then(|ns| ns.name())
                .and_then(|n| n.text())
            {
                reexports.push(ImportBinding::new(NAMESPACE_EXPORT, name, target.clone()).with_ext(ext.clone()));
            }
            for specifier in list.specifiers() {
                let (Some(origin), Some(name)) = (
                    specifier.local().and_then(|n| n.text()),
                    specifier.exported().and_then(|n| n.text()),
                ) else {
                    continue;
                };
                reexports.push(ImportBinding::new(origin, name, target.clone()).with_ext(ext.clone()));
            }
        }

        Ok(reexports)
    }

    /// Resolved target and the specifier's extension (with the dot).
    fn resolve(&self, source: &ast::ModuleSource) -> Option<(FilePath, Option<SmolStr>)> {
        let specifier = source.value()?;
        let target = self.loader.resolver.resolve(&specifier, self.path)?;
        let ext = Path::new(&specifier)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| SmolStr::new(format!(".{e}")));
        Some((Rc::from(target), ext))
    }
}

/// Names of the entry declarations of `module`.
pub fn entry_names(module: &Module) -> Vec<Name> {
    module.entries().map(|d| d.name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        root: PathBuf,
    }

    impl Fixture {
        fn new(files: &[(&str, &str)]) -> Self {
            let dir = TempDir::new().unwrap();
            let root = dir.path().canonicalize().unwrap();
            for (rel, text) in files {
                let path = root.join(rel);
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(path, text).unwrap();
            }
            Self { _dir: dir, root }
        }

        fn path(&self, rel: &str) -> FilePath {
            Rc::from(self.root.join(rel))
        }

        fn loader(&self) -> SourceLoader {
            SourceLoader::new(PathResolver::default(), "schema")
        }
    }

    #[test]
    fn test_entries_and_flags() {
        let fixture = Fixture::new(&[(
            "a.ts",
            "/** @schema */\nexport interface A { b: B }\ntype B = string;\n/**\n * @schema\n */\nexport default interface C {}\n",
        )]);
        let module = fixture.loader().load(&fixture.path("a.ts")).unwrap();
        assert_eq!(module.declaration_names(), vec!["A", "B", "C"]);
        assert_eq!(entry_names(&module), vec!["A", "C"]);
        assert!(!module.declarations[1].exported);
        assert!(module.declarations[2].exported_as_default);
    }

    #[test]
    fn test_custom_tag() {
        let fixture = Fixture::new(&[("a.ts", "/** @zod */\nexport type A = string;\n")]);
        let mut loader = SourceLoader::new(PathResolver::default(), "zod");
        let module = loader.load(&fixture.path("a.ts")).unwrap();
        assert_eq!(entry_names(&module), vec!["A"]);
    }

    #[test]
    fn test_nested_entry_is_fatal() {
        let fixture = Fixture::new(&[(
            "a.ts",
            "export namespace N {\n  /** @schema */\n  export interface Inner {}\n}\n",
        )]);
        let err = fixture.loader().load(&fixture.path("a.ts")).unwrap_err();
        let ExtractError::NestedEntry { name, position, .. } = err else {
            panic!("expected nested entry error, got {err:?}");
        };
        assert_eq!(name, "Inner");
        assert_eq!(position.line, 2);
    }

    #[test]
    fn test_nested_untagged_declarations_are_ignored() {
        let fixture = Fixture::new(&[(
            "a.ts",
            "function f() {\n  interface Local {}\n}\nexport type A = string;\n",
        )]);
        let module = fixture.loader().load(&fixture.path("a.ts")).unwrap();
        assert_eq!(module.declaration_names(), vec!["A"]);
    }

    #[test]
    fn test_unexported_entry_is_fatal() {
        let fixture = Fixture::new(&[("a.ts", "/** @schema */\ninterface A {}\n")]);
        let err = fixture.loader().load(&fixture.path("a.ts")).unwrap_err();
        assert!(matches!(err, ExtractError::UnexportedEntry { .. }));
    }

    #[test]
    fn test_parse_error_gives_empty_module() {
        let fixture = Fixture::new(&[("a.ts", "/** @schema */\nexport interface A {\n")]);
        let module = fixture.loader().load(&fixture.path("a.ts")).unwrap();
        assert!(module.is_empty());
    }

    #[test]
    fn test_imports_resolve_and_drop_unresolved() {
        let fixture = Fixture::new(&[
            (
                "a.ts",
                "import D, { b as B, c } from './b.js';\nimport * as ns from './b';\nimport { z } from 'zod';\n",
            ),
            ("b.ts", "export type b = string;"),
        ]);
        let module = fixture.loader().load(&fixture.path("a.ts")).unwrap();
        let summary: Vec<_> = module
            .imports
            .iter()
            .map(|b| (b.origin.as_str(), b.name.as_str(), b.ext.as_deref()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("default", "D", Some(".js")),
                ("b", "B", Some(".js")),
                ("c", "c", Some(".js")),
                ("*", "ns", None),
            ]
        );
        assert!(module.imports.iter().all(|b| b.path == fixture.path("b.ts")));
    }

    #[test]
    fn test_reexports_in_source_order() {
        let fixture = Fixture::new(&[
            (
                "index.ts",
                "export * from './x';\nexport { a as b } from './y';\nexport * as ns from './x';\nexport { local };\n",
            ),
            ("x.ts", ""),
            ("y.ts", ""),
        ]);
        let module = fixture.loader().load(&fixture.path("index.ts")).unwrap();
        let summary: Vec<_> = module
            .reexports
            .iter()
            .map(|b| (b.origin.as_str(), b.name.as_str()))
            .collect();
        assert_eq!(summary, vec![("*", "*"), ("a", "b"), ("*", "ns")]);
    }

    #[test]
    fn test_export_default_specifier_is_fatal() {
        let fixture = Fixture::new(&[("a.ts", "export v from './b';\n"), ("b.ts", "")]);
        let err = fixture.loader().load(&fixture.path("a.ts")).unwrap_err();
        assert!(matches!(err, ExtractError::UnexpectedExportSpecifier { .. }));
    }

    #[test]
    fn test_load_is_cached() {
        let fixture = Fixture::new(&[("a.ts", "export type A = string;")]);
        let mut loader = fixture.loader();
        let first = loader.load(&fixture.path("a.ts")).unwrap();
        let second = loader.load(&fixture.path("a.ts")).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(loader.loaded_count(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let fixture = Fixture::new(&[]);
        let err = fixture.loader().load(&fixture.path("a.ts")).unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
    }
}
