//! Domain constants shared across layers.

/// Tag looked up in documentation comments when none is configured.
pub const DEFAULT_TAG: &str = "schema";

/// Extension every resolved import candidate is rewritten to.
pub const DECLARATION_EXTENSION: &str = "ts";

/// Source file extensions picked up by project discovery.
pub const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts"];

/// Import origin of a default import (`import X from "..."`).
pub const DEFAULT_EXPORT: &str = "default";

/// Import origin of a namespace import or wildcard re-export.
pub const NAMESPACE_EXPORT: &str = "*";

/// Directories never descended into during discovery.
pub const IGNORED_DIRECTORIES: &[&str] = &["node_modules"];

/// Name of the project configuration file.
pub const TSCONFIG_FILE: &str = "tsconfig.json";

/// Suffix appended to a declaration name to form its schema name.
pub const SCHEMA_SUFFIX: &str = "Schema";
