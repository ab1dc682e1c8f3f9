//! Per-file data model: declarations, import bindings, modules.
//!
//! A [`Module`] is either the full view of a source file (built by the
//! loader) or a slice of one (built by the resolver). Slices share their
//! declarations with the full module through `Rc`.

use std::rc::Rc;

use smol_str::SmolStr;

use crate::base::constants::DEFAULT_EXPORT;
use crate::base::{FilePath, Name, Position};
use crate::parser::ast::{self, AstNode, EnumDecl, InterfaceDecl, TypeAliasDecl};
use crate::parser::SyntaxNode;

/// The closed set of declaration kinds, each with its typed syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Interface(InterfaceDecl),
    TypeAlias(TypeAliasDecl),
    /// The only kind with a runtime value. Re-imported, never re-derived.
    Enum(EnumDecl),
}

impl DeclarationKind {
    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Interface(it) => it.syntax(),
            Self::TypeAlias(it) => it.syntax(),
            Self::Enum(it) => it.syntax(),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Interface(_) => "interface",
            Self::TypeAlias(_) => "type alias",
            Self::Enum(_) => "enum",
        }
    }
}

impl From<ast::Decl> for DeclarationKind {
    fn from(decl: ast::Decl) -> Self {
        match decl {
            ast::Decl::Interface(it) => Self::Interface(it),
            ast::Decl::TypeAlias(it) => Self::TypeAlias(it),
            ast::Decl::Enum(it) => Self::Enum(it),
        }
    }
}

/// A named top-level type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: Name,
    pub kind: DeclarationKind,
    /// Carries the entry tag. Implies top-level and exported.
    pub is_entry: bool,
    pub exported: bool,
    pub exported_as_default: bool,
    pub position: Position,
}

impl Declaration {
    pub fn is_enum(&self) -> bool {
        matches!(self.kind, DeclarationKind::Enum(_))
    }

    /// First identifiers of every type-position reference, in document order.
    pub fn references(&self) -> Vec<Name> {
        match &self.kind {
            DeclarationKind::Enum(_) => Vec::new(),
            kind => ast::type_references(kind.syntax()),
        }
    }

    /// Whether this declaration answers to `name` (its own name, or
    /// `default` when it is the default export).
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || (name == DEFAULT_EXPORT && self.exported_as_default)
    }
}

/// One imported or re-exported name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportBinding {
    /// Name in the source module (`default` and `*` are sentinels).
    pub origin: Name,
    /// Local alias; for re-exports the externally visible name.
    pub name: Name,
    /// Resolved file the binding points to.
    pub path: FilePath,
    /// Set only for enum dependencies, which are imported from the source file.
    pub import_from_source: bool,
    /// Extension of the specifier as written (`.js` in `"./a.js"`).
    pub ext: Option<SmolStr>,
}

impl ImportBinding {
    pub fn new(origin: impl Into<Name>, name: impl Into<Name>, path: FilePath) -> Self {
        Self {
            origin: origin.into(),
            name: name.into(),
            path,
            import_from_source: false,
            ext: None,
        }
    }

    pub fn with_ext(mut self, ext: Option<SmolStr>) -> Self {
        self.ext = ext;
        self
    }

    pub fn from_source(mut self) -> Self {
        self.import_from_source = true;
        self
    }

    /// A binding to a declaration of the same file.
    pub fn is_self_reference(&self, module_path: &FilePath) -> bool {
        self.path == *module_path
    }
}

/// A file's eligible declarations and its import/re-export edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub file_path: FilePath,
    pub declarations: Vec<Rc<Declaration>>,
    pub imports: Vec<ImportBinding>,
    pub reexports: Vec<ImportBinding>,
}

impl Module {
    pub fn empty(file_path: FilePath) -> Self {
        Self {
            file_path,
            declarations: Vec::new(),
            imports: Vec::new(),
            reexports: Vec::new(),
        }
    }

    /// A slice with one declaration and the imports it needs.
    pub fn declaration_slice(
        file_path: FilePath,
        declaration: Rc<Declaration>,
        imports: Vec<ImportBinding>,
    ) -> Self {
        Self {
            file_path,
            declarations: vec![declaration],
            imports,
            reexports: Vec::new(),
        }
    }

    /// A slice holding a single re-export edge.
    pub fn reexport_slice(file_path: FilePath, reexport: ImportBinding) -> Self {
        Self {
            file_path,
            declarations: Vec::new(),
            imports: Vec::new(),
            reexports: vec![reexport],
        }
    }

    /// The declaration answering to `name`, including `default`.
    pub fn find_declaration(&self, name: &str) -> Option<&Rc<Declaration>> {
        self.declarations.iter().find(|d| d.answers_to(name))
    }

    /// A same-file declaration referenced by plain name.
    pub fn local_declaration(&self, name: &str) -> Option<&Rc<Declaration>> {
        self.declarations.iter().find(|d| d.name == name)
    }

    /// The import binding with local name `name`.
    pub fn import(&self, name: &str) -> Option<&ImportBinding> {
        self.imports.iter().find(|b| b.name == name)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Rc<Declaration>> + '_ {
        self.declarations.iter().filter(|d| d.is_entry)
    }

    pub fn declaration_names(&self) -> Vec<&str> {
        self.declarations.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.imports.is_empty() && self.reexports.is_empty()
    }
}
