//! Resolution through re-export edges.

use crate::helpers::module_assertions::*;
use crate::helpers::project_fixture::TestProject;
use crate::helpers::source_fixtures::*;

#[test]
fn test_later_wildcard_wins_without_probing_earlier() {
    let project = TestProject::with_files(&[
        ("entry.ts", WILDCARD_CONSUMER),
        ("index.ts", WILDCARD_INDEX),
        ("first.ts", "export type Foo = string;"),
        ("second.ts", "export type Foo = number;"),
    ]);
    let (session, result) = project.extract(&["entry.ts"]);
    let modules = result.unwrap().modules;

    assert!(session.was_loaded(&project.path("second.ts")));
    assert!(!session.was_loaded(&project.path("first.ts")));

    let index = module_for(&modules, &project.path("index.ts"));
    assert!(index.declarations.is_empty());
    assert_eq!(index.reexports.len(), 1);
    assert_eq!(&*index.reexports[0].path, project.path("second.ts"));
}

#[test]
fn test_falls_back_to_earlier_wildcard() {
    let project = TestProject::with_files(&[
        ("entry.ts", WILDCARD_CONSUMER),
        ("index.ts", WILDCARD_INDEX),
        ("first.ts", "export type Foo = string;"),
        ("second.ts", "export type Bar = number;"),
    ]);
    let (session, result) = project.extract(&["entry.ts"]);
    let modules = result.unwrap().modules;

    assert!(session.was_loaded(&project.path("first.ts")));
    let first = module_for(&modules, &project.path("first.ts"));
    assert_eq!(first.declaration_names(), vec!["Foo"]);
}

#[test]
fn test_named_reexport_follows_origin() {
    let project = TestProject::with_files(&[
        (
            "entry.ts",
            r#"
import { Account } from "./index";
/** @schema */
export type Entry = { account: Account };
"#,
        ),
        (
            "index.ts",
            r#"
export * from "./other";
export { User as Account } from "./user";
"#,
        ),
        ("user.ts", "export interface User { name: string }"),
        ("other.ts", "export type Account = boolean;"),
    ]);
    let (session, result) = project.extract(&["entry.ts"]);
    let modules = result.unwrap().modules;

    assert!(!session.was_loaded(&project.path("other.ts")));
    let user = module_for(&modules, &project.path("user.ts"));
    assert_eq!(user.declaration_names(), vec!["User"]);

    let index = module_for(&modules, &project.path("index.ts"));
    let edge = &index.reexports[0];
    assert_eq!((edge.origin.as_str(), edge.name.as_str()), ("User", "Account"));
}

#[test]
fn test_chained_wildcards() {
    let project = TestProject::with_files(&[
        ("entry.ts", WILDCARD_CONSUMER),
        ("index.ts", "export * from \"./nested/index\";"),
        ("nested/index.ts", "export * from \"./foo\";"),
        ("nested/foo.ts", "export type Foo = { deep: true };"),
    ]);
    let (_, result) = project.extract(&["entry.ts"]);
    let modules = result.unwrap().modules;

    assert_eq!(modules.len(), 4);
    let foo = module_for(&modules, &project.path("nested/foo.ts"));
    assert_eq!(foo.declaration_names(), vec!["Foo"]);
}
