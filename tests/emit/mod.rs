//! Schema generation tests
//!
//! Full runs from tsconfig to generated files, including the binary.

pub mod tests_cli;
pub mod tests_generation;
