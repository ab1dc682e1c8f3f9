//! Declaration graph: data model, resolution and merging.
//!
//! ```text
//! Module (loader, one per file)
//!     │
//!     ▼
//! DeclResolver::resolve(name, module)  ← recursive, memoized, cycle checked
//!     │
//!     ▼
//! Vec<Module> slices (dependencies first)
//!     │
//!     ▼
//! merge_modules                        ← one Module per file, deduplicated
//! ```

mod merge;
mod module;
mod resolve;

pub use merge::merge_modules;
pub use module::{Declaration, DeclarationKind, ImportBinding, Module};
pub use resolve::{DeclResolver, MAX_RESOLUTION_DEPTH, ModuleLoader, Resolution};
