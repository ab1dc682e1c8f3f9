//! Declaration graph tests
//!
//! End-to-end resolution over files on disk:
//! - Dependency ordering and enum preservation
//! - Re-export precedence
//! - Cycle rejection
//! - Determinism and merge stability

pub mod tests_cycles;
pub mod tests_dependencies;
pub mod tests_reexports;
