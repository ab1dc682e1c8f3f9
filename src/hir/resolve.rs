//! Declaration graph resolution.
//!
//! Resolving a declaration yields the ordered slices needed to regenerate
//! it: the slices of everything it references (transitively) followed by its
//! own slice. References follow same-file declarations, import bindings and
//! re-exports, crossing files through a [`ModuleLoader`].
//!
//! ## Key Data Structures
//!
//! - [`Resolution`] - slices plus whether the target is an enum
//! - [`DeclResolver`] - memo table, resolution stack and in-progress set
//!
//! Results are memoized per `(file, name)`, absent results included. The
//! in-progress set is checked before the memo so a cycle is always reported,
//! and the stack depth is capped at [`MAX_RESOLUTION_DEPTH`].

use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use super::module::{Declaration, ImportBinding, Module};
use crate::base::constants::NAMESPACE_EXPORT;
use crate::base::{FilePath, Name};
use crate::error::{ExtractError, Result};

/// Deepest reference chain followed before giving up.
pub const MAX_RESOLUTION_DEPTH: usize = 512;

/// Source of modules for cross-file resolution.
pub trait ModuleLoader {
    fn load(&mut self, path: &FilePath) -> Result<Rc<Module>>;
}

/// Slices needed to regenerate one declaration, dependencies first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub slices: Vec<Module>,
    /// The resolved declaration is an enum.
    pub is_enum: bool,
}

/// A frame of the resolution stack: a declaration name in a file.
type Frame = (FilePath, Name);

/// Type alias for the memo: (file, name) -> resolution or absent
type ResolutionCache = FxHashMap<Frame, Option<Rc<Resolution>>>;

#[derive(Debug, Default)]
pub struct DeclResolver {
    memo: ResolutionCache,
    stack: Vec<Frame>,
    in_progress: FxHashSet<Frame>,
}

impl DeclResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `name` as seen from `module`.
    ///
    /// Returns `Ok(None)` when nothing answers to the name. Cycles and
    /// overly deep chains are fatal.
    pub fn resolve(
        &mut self,
        loader: &mut dyn ModuleLoader,
        name: &Name,
        module: &Rc<Module>,
    ) -> Result<Option<Rc<Resolution>>> {
        let frame: Frame = (module.file_path.clone(), name.clone());

        if self.in_progress.contains(&frame) {
            let mut stack: Vec<_> = self
                .stack
                .iter()
                .map(|(path, name)| (path.to_path_buf(), name.clone()))
                .collect();
            stack.push((frame.0.to_path_buf(), frame.1));
            return Err(ExtractError::CircularReference { stack });
        }

        if let Some(cached) = self.memo.get(&frame) {
            return Ok(cached.clone());
        }

        if self.stack.len() >= MAX_RESOLUTION_DEPTH {
            return Err(ExtractError::ResolutionTooDeep {
                path: frame.0.to_path_buf(),
                name: frame.1,
            });
        }

        self.stack.push(frame.clone());
        self.in_progress.insert(frame.clone());
        let result = self.resolve_uncached(loader, name, module);
        self.stack.pop();
        self.in_progress.remove(&frame);

        let result = result?.map(Rc::new);
        self.memo.insert(frame, result.clone());
        Ok(result)
    }

    /// Number of memoized `(file, name)` pairs.
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    fn resolve_uncached(
        &mut self,
        loader: &mut dyn ModuleLoader,
        name: &Name,
        module: &Rc<Module>,
    ) -> Result<Option<Resolution>> {
        if let Some(declaration) = module.find_declaration(name) {
            return self.resolve_local(loader, declaration.clone(), module).map(Some);
        }
        self.resolve_reexport(loader, name, module)
    }

    fn resolve_local(
        &mut self,
        loader: &mut dyn ModuleLoader,
        declaration: Rc<Declaration>,
        module: &Rc<Module>,
    ) -> Result<Resolution> {
        if declaration.is_enum() {
            return Ok(Resolution {
                slices: vec![Module::declaration_slice(
                    module.file_path.clone(),
                    declaration,
                    Vec::new(),
                )],
                is_enum: true,
            });
        }

        let mut slices: Vec<Module> = Vec::new();
        let mut imports: Vec<ImportBinding> = Vec::new();

        for reference in declaration.references() {
            if module.local_declaration(&reference).is_some() {
                let Some(resolved) = self.resolve(loader, &reference, module)? else {
                    continue;
                };
                prepend(&mut slices, &resolved.slices);
                if resolved.is_enum {
                    imports.push(
                        ImportBinding::new(reference.clone(), reference, module.file_path.clone())
                            .from_source(),
                    );
                }
            } else if let Some(binding) = module.import(&reference) {
                let target = loader.load(&binding.path)?;
                let Some(resolved) = self.resolve(loader, &binding.origin, &target)? else {
                    trace!(
                        reference = %reference,
                        target = %binding.path.display(),
                        "imported name does not resolve to a declaration"
                    );
                    continue;
                };
                prepend(&mut slices, &resolved.slices);
                let mut binding = binding.clone();
                binding.import_from_source = resolved.is_enum;
                imports.push(binding);
            } else {
                trace!(
                    reference = %reference,
                    declaration = %declaration.name,
                    file = %module.file_path.display(),
                    "unresolved type reference"
                );
            }
        }

        slices.push(Module::declaration_slice(
            module.file_path.clone(),
            declaration,
            imports,
        ));
        Ok(Resolution {
            slices,
            is_enum: false,
        })
    }

    /// Follow the named re-export, else every wildcard re-export, latest first.
    fn resolve_reexport(
        &mut self,
        loader: &mut dyn ModuleLoader,
        name: &Name,
        module: &Rc<Module>,
    ) -> Result<Option<Resolution>> {
        let candidates: Vec<&ImportBinding> = match module.reexports.iter().find(|r| r.name == *name) {
            Some(named) => vec![named],
            None => module
                .reexports
                .iter()
                .filter(|r| r.name == NAMESPACE_EXPORT)
                .rev()
                .collect(),
        };

        for reexport in candidates {
            let target = loader.load(&reexport.path)?;
            let target_name = if reexport.origin == NAMESPACE_EXPORT {
                name
            } else {
                &reexport.origin
            };
            if let Some(resolved) = self.resolve(loader, target_name, &target)? {
                let mut slices = resolved.slices.clone();
                slices.push(Module::reexport_slice(
                    module.file_path.clone(),
                    reexport.clone(),
                ));
                return Ok(Some(Resolution {
                    slices,
                    is_enum: resolved.is_enum,
                }));
            }
        }

        Ok(None)
    }
}

/// Insert `items` at the front of `slices`, keeping their order.
fn prepend(slices: &mut Vec<Module>, items: &[Module]) {
    slices.splice(0..0, items.iter().cloned());
}
