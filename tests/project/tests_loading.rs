//! Loading source files into modules.

use std::rc::Rc;

use crate::helpers::project_fixture::TestProject;
use zodify::ExtractError;
use zodify::base::FilePath;
use zodify::project::{PathResolver, SourceLoader, entry_names};

fn load(project: &TestProject, file: &str) -> zodify::Result<Rc<zodify::Module>> {
    let mut loader = SourceLoader::new(PathResolver::default(), "schema");
    let path: FilePath = Rc::from(project.path(file));
    loader.load(&path)
}

#[test]
fn test_entries_follow_tag() {
    let project = TestProject::with_files(&[(
        "a.ts",
        r#"
/** @schema */
export type A = string;

/**
 * Not an entry: the tag must be a whole word.
 * @schemaless
 */
export type B = string;

// @schema
export interface C {}

/**
 * @internal
 * @schema
 */
export default interface D {}
"#,
    )]);
    let module = load(&project, "a.ts").unwrap();
    assert_eq!(entry_names(&module), vec!["A", "C", "D"]);
    assert!(module.find_declaration("default").is_some_and(|d| d.name == "D"));
}

#[test]
fn test_nested_entry_is_fatal() {
    let project = TestProject::with_files(&[(
        "a.ts",
        "export namespace Api {\n  /** @schema */\n  export type A = string;\n}",
    )]);
    match load(&project, "a.ts") {
        Err(ExtractError::NestedEntry { name, position, .. }) => {
            assert_eq!(name, "A");
            assert_eq!(position.line, 2);
        }
        other => panic!("expected a nested entry error, got {other:?}"),
    }
}

#[test]
fn test_unexported_entry_is_fatal() {
    let project = TestProject::with_files(&[("a.ts", "/** @schema */\ntype Hidden = string;")]);
    let err = load(&project, "a.ts").unwrap_err();
    assert!(matches!(err, ExtractError::UnexportedEntry { ref name, .. } if name == "Hidden"));
}

#[test]
fn test_default_specifier_in_reexport_list_is_fatal() {
    let project = TestProject::with_files(&[
        ("a.ts", "export v from \"./b\";"),
        ("b.ts", "export type V = string;"),
    ]);
    let err = load(&project, "a.ts").unwrap_err();
    assert!(matches!(err, ExtractError::UnexpectedExportSpecifier { .. }));
}

#[test]
fn test_unparsable_file_is_an_empty_module() {
    let project = TestProject::with_files(&[
        (
            "a.ts",
            r#"
import { Broken } from "./broken";
/** @schema */
export type A = { b: Broken };
"#,
        ),
        ("broken.ts", "export interface Broken { a: string ;; }}} ((("),
    ]);
    let broken = load(&project, "broken.ts").unwrap();
    assert!(broken.is_empty());

    let (_, result) = project.extract(&["a.ts"]);
    let modules = result.unwrap().modules;
    assert_eq!(modules.len(), 1);
    assert!(modules[0].imports.is_empty());
}

#[test]
fn test_import_forms_become_bindings() {
    let project = TestProject::with_files(&[
        (
            "a.ts",
            r#"
import Def, { type A, B as Bee } from "./b.js";
import * as ns from "./b";
import { C } from "./missing";
import "./b";
export type X = Def | A | Bee;
"#,
        ),
        ("b.ts", "export type A = string;"),
    ]);
    let module = load(&project, "a.ts").unwrap();
    let bindings: Vec<(&str, &str, Option<&str>)> = module
        .imports
        .iter()
        .map(|b| (b.origin.as_str(), b.name.as_str(), b.ext.as_deref()))
        .collect();
    assert_eq!(
        bindings,
        vec![
            ("default", "Def", Some(".js")),
            ("A", "A", Some(".js")),
            ("B", "Bee", Some(".js")),
            ("*", "ns", None),
        ]
    );
}
