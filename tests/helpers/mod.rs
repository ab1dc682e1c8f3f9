//! Shared test helpers.

pub mod module_assertions;
pub mod project_fixture;
pub mod source_fixtures;
