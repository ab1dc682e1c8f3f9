//! Project layer tests
//!
//! - Module loading and entry validation
//! - tsconfig path aliases
//! - File discovery through a full run

pub mod tests_aliases;
pub mod tests_loading;
