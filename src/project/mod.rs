//! Project layer: configuration, file discovery, path resolution and loading.
//!
//! ```text
//! TsConfig::load / TsConfig::find   ← tsconfig.json (+ extends)
//!     │
//!     ├── AliasMatcher              ← baseUrl / paths
//!     │       ▼
//!     │   PathResolver              ← specifier → file
//!     │       ▼
//!     │   SourceLoader              ← file → Module (cached)
//!     │
//!     └── collect_source_files      ← include / exclude / pattern
//! ```

mod alias;
mod discovery;
mod loader;
mod path_resolver;
mod tsconfig;

pub use alias::AliasMatcher;
pub use discovery::{DiscoveryOptions, collect_source_files};
pub use loader::{SourceLoader, entry_names};
pub use path_resolver::PathResolver;
pub use tsconfig::TsConfig;
