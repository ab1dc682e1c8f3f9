//! Schema emission: consolidated modules → zod source files.
//!
//! Every consolidated module becomes one file under the output directory,
//! at the same path relative to the project root as its source:
//!
//! ```text
//! import { z } from "zod";
//! import { Code } from "../../src/models/code";        // enum values
//! import { IdSchema as UserIdSchema } from "./id.js";   // import bindings
//! export * from "./common";                             // re-exports
//! export const CodeSchema = z.nativeEnum(Code);
//! export const UserSchema = z.object({ id: UserIdSchema, code: CodeSchema });
//! ```
//!
//! Rendering never fails; every file is rendered before the first write.

mod zod;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::base::constants::{DEFAULT_EXPORT, NAMESPACE_EXPORT};
use crate::base::{Name, relative_path};
use crate::error::{ExtractError, Result};
use crate::hir::{ImportBinding, Module};

pub use zod::{NameStyle, Translator, object_key, schema_name};

/// A declaration named in a warning.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WarningEntry {
    pub name: Name,
    pub path: PathBuf,
}

impl fmt::Display for WarningEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.name, self.path.display())
    }
}

/// Non-fatal findings of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warnings {
    /// Declarations with parts emitted as `z.unknown()`.
    pub unknown: Vec<WarningEntry>,
    /// Enums the generated code imports but the source does not export.
    pub should_export: Vec<WarningEntry>,
}

impl Warnings {
    pub fn is_empty(&self) -> bool {
        self.unknown.is_empty() && self.should_export.is_empty()
    }
}

impl fmt::Display for Warnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.unknown.is_empty() {
            writeln!(f, "Some types can not be transformed to zod schemas. Check them in:")?;
            for entry in &self.unknown {
                writeln!(f, "  {entry}")?;
            }
        }
        if !self.should_export.is_empty() {
            writeln!(f, "Some enum types should be exported in your source files:")?;
            for entry in &self.should_export {
                writeln!(f, "  {entry}")?;
            }
        }
        Ok(())
    }
}

/// A rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Writes zod schema files for consolidated modules.
#[derive(Debug, Clone)]
pub struct Generator {
    root_dir: PathBuf,
    out_dir: PathBuf,
    style: NameStyle,
}

impl Generator {
    /// `root_dir` is the project root source paths are made relative to.
    pub fn new(root_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            out_dir: out_dir.into(),
            style: NameStyle::default(),
        }
    }

    pub fn with_name_style(mut self, style: NameStyle) -> Self {
        self.style = style;
        self
    }

    /// Where the schema file for `source` is written.
    pub fn output_path(&self, source: &Path) -> PathBuf {
        self.out_dir.join(relative_path(&self.root_dir, source))
    }

    /// Render every module, then write the files.
    pub fn generate(&self, modules: &[Module]) -> Result<Warnings> {
        let (files, warnings) = self.render_all(modules);
        for file in &files {
            if let Some(parent) = file.path.parent() {
                fs::create_dir_all(parent).map_err(|err| ExtractError::io(parent, err))?;
            }
            fs::write(&file.path, &file.contents).map_err(|err| ExtractError::io(&file.path, err))?;
            debug!(path = %file.path.display(), "wrote schema file");
        }
        Ok(warnings)
    }

    /// Render every module without touching the file system.
    pub fn render_all(&self, modules: &[Module]) -> (Vec<RenderedFile>, Warnings) {
        let mut warnings = Warnings::default();
        let files = modules
            .iter()
            .map(|module| RenderedFile {
                path: self.output_path(&module.file_path),
                contents: self.render(module, &mut warnings),
            })
            .collect();
        (files, warnings)
    }

    /// Render one module, recording its warnings.
    pub fn render(&self, module: &Module, warnings: &mut Warnings) -> String {
        let output = self.output_path(&module.file_path);
        let mut lines = vec!["import { z } from \"zod\";".to_string()];

        for declaration in module.declarations.iter().filter(|d| d.is_enum()) {
            let source = specifier(&output, &module.file_path, None);
            lines.push(format!("import {{ {} }} from \"{source}\";", declaration.name));
            if !declaration.exported {
                warnings.should_export.push(WarningEntry {
                    name: declaration.name.clone(),
                    path: module.file_path.to_path_buf(),
                });
            }
        }

        for binding in &module.imports {
            if binding.is_self_reference(&module.file_path) {
                continue;
            }
            let from = self.binding_specifier(&output, binding);
            let local = self.style.schema_name(&binding.name);
            lines.push(match binding.origin.as_str() {
                DEFAULT_EXPORT => format!("import {local} from \"{from}\";"),
                NAMESPACE_EXPORT => format!("import * as {local} from \"{from}\";"),
                origin => format!("import {{ {} as {local} }} from \"{from}\";", self.style.schema_name(origin)),
            });
        }

        for binding in &module.reexports {
            let from = self.binding_specifier(&output, binding);
            let exported = match binding.name.as_str() {
                DEFAULT_EXPORT => DEFAULT_EXPORT.to_string(),
                name => self.style.schema_name(name),
            };
            lines.push(match (binding.origin.as_str(), binding.name.as_str()) {
                (NAMESPACE_EXPORT, NAMESPACE_EXPORT) => format!("export * from \"{from}\";"),
                (NAMESPACE_EXPORT, name) => format!("export * as {name} from \"{from}\";"),
                (DEFAULT_EXPORT, _) => format!("export {{ default as {exported} }} from \"{from}\";"),
                (origin, _) => format!("export {{ {} as {exported} }} from \"{from}\";", self.style.schema_name(origin)),
            });
        }

        let mut translator = Translator::with_style(module, self.style);
        for declaration in &module.declarations {
            let (expr, lossy) = translator.declaration(declaration);
            let name = self.style.schema_name(&declaration.name);
            lines.push(format!("export const {name} = {expr};"));
            if declaration.exported_as_default {
                lines.push(format!("export default {name};"));
            }
            if lossy {
                warnings.unknown.push(WarningEntry {
                    name: declaration.name.clone(),
                    path: module.file_path.to_path_buf(),
                });
            }
        }

        let mut contents = lines.join("\n");
        contents.push('\n');
        contents
    }

    fn binding_specifier(&self, output: &Path, binding: &ImportBinding) -> String {
        specifier(output, &self.output_path(&binding.path), binding.ext.as_deref())
    }
}

/// Relative module specifier from the file `from` to `to`, with `to`'s
/// extension replaced by `ext` (dropped when `None`).
fn specifier(from: &Path, to: &Path, ext: Option<&str>) -> String {
    let dir = from.parent().unwrap_or_else(|| Path::new("/"));
    let mut rel = relative_path(dir, &to.with_extension(""));
    if !rel.starts_with("../") {
        rel = format!("./{rel}");
    }
    if let Some(ext) = ext {
        rel.push_str(ext);
    }
    rel
}

#[cfg(test)]
mod tests;
