//! # zodify
//!
//! Extracts tagged TypeScript type declarations, together with every
//! declaration they depend on across files, and generates zod schemas.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! session   → Extraction runs: discovery → resolution → emission
//!   ↓
//! emit      → zod schema rendering and file output
//!   ↓
//! hir       → Declaration graph: Module, resolution, merging
//!   ↓
//! project   → tsconfig, path aliases, file discovery, module loading
//!   ↓
//! parser    → Logos lexer, recursive-descent parser, typed AST
//!   ↓
//! base      → Primitives (Name, FilePath, Position, constants)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → project → hir → emit → session)
// ============================================================================

/// Foundation types: Name, FilePath, Position, constants
pub mod base;

/// Parser: Logos lexer, rowan CST, typed AST
pub mod parser;

/// Project management: tsconfig, aliases, discovery, loading
pub mod project;

/// Declaration graph: Module, DeclResolver, merge
pub mod hir;

/// Schema emission
pub mod emit;

/// Extraction runs
pub mod session;

/// Error types
pub mod error;

// Re-export commonly needed items
pub use emit::{Generator, NameStyle, Warnings};
pub use error::{ExtractError, Result};
pub use hir::{DeclResolver, Declaration, ImportBinding, Module, merge_modules};
pub use session::{ExtractOptions, Extraction, ExtractionSession, extract};

// Re-export foundation types
pub use base::{FilePath, LineIndex, Name, Position};
