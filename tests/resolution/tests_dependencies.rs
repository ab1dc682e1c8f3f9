//! Dependency closure and ordering of extracted declarations.

use crate::helpers::module_assertions::*;
use crate::helpers::project_fixture::TestProject;
use crate::helpers::source_fixtures::*;
use zodify::{Generator, merge_modules};

#[test]
fn test_order_status_code_example() {
    let project = TestProject::with_files(&[("a.ts", ORDER_A), ("b.ts", CODE_B)]);
    let (_, result) = project.extract(&["a.ts"]);
    let extraction = result.unwrap();

    assert_eq!(extraction.modules.len(), 2);

    let b = module_for(&extraction.modules, &project.path("b.ts"));
    assert_eq!(b.declaration_names(), vec!["Code"]);
    assert!(b.imports.is_empty());

    let a = module_for(&extraction.modules, &project.path("a.ts"));
    assert_eq!(a.declaration_names(), vec!["Status", "Order"]);
    assert_eq!(
        import_summary(a),
        vec![("Code".to_string(), "Code".to_string(), true)]
    );
}

#[test]
fn test_dependencies_precede_dependents() {
    let project = TestProject::with_files(&[
        (
            "models/user.ts",
            r#"
import { Address } from "../shared/address";
import type { Id } from "../shared/id";

/** @schema */
export interface User extends Base {
    id: Id;
    address: Address;
    tags: Array<Tag>;
}
interface Base { createdAt: Date }
type Tag = string;
"#,
        ),
        (
            "shared/address.ts",
            r#"
import { Id } from "./id";
export type Address = { street: string; owner: Id };
"#,
        ),
        ("shared/id.ts", "export type Id = string;"),
    ]);
    let (_, result) = project.extract(&["models/user.ts"]);
    let modules = result.unwrap().modules;

    assert_declared_before(&modules, "Base", "User");
    assert_declared_before(&modules, "Tag", "User");
    assert_eq!(
        module_for(&modules, &project.path("shared/address.ts")).declaration_names(),
        vec!["Address"]
    );
    assert_eq!(
        module_for(&modules, &project.path("shared/id.ts")).declaration_names(),
        vec!["Id"]
    );

    let user = module_for(&modules, &project.path("models/user.ts"));
    let names: Vec<String> = user.imports.iter().map(|b| b.name.to_string()).collect();
    assert_eq!(names, vec!["Id", "Address"]);
}

#[test]
fn test_non_type_imports_are_skipped() {
    let project = TestProject::with_files(&[
        (
            "a.ts",
            r#"
import { Service } from "./service";
import { Missing } from "./nowhere";
/** @schema */
export type A = { service: Service; missing: Missing };
"#,
        ),
        ("service.ts", "export class Service {}"),
    ]);
    let (_, result) = project.extract(&["a.ts"]);
    let modules = result.unwrap().modules;

    assert_eq!(modules.len(), 1);
    assert!(modules[0].imports.is_empty());
    assert_eq!(modules[0].declaration_names(), vec!["A"]);
}

#[test]
fn test_enum_is_imported_never_inlined() {
    let project = TestProject::with_files(&[(
        "a.ts",
        r#"
export enum Kind { A, B }
/** @schema */
export type Item = { kind: Kind };
"#,
    )]);
    let (_, result) = project.extract(&["a.ts"]);
    let modules = result.unwrap().modules;

    let a = module_for(&modules, &project.path("a.ts"));
    assert_eq!(a.declaration_names(), vec!["Kind", "Item"]);
    let binding = a.import("Kind").expect("enum binding");
    assert!(binding.import_from_source);
    assert!(binding.is_self_reference(&a.file_path));
}

#[test]
fn test_default_export_resolves_by_default_name() {
    let project = TestProject::with_files(&[
        (
            "a.ts",
            r#"
import Profile from "./profile";
/** @schema */
export type Account = { profile: Profile };
"#,
        ),
        ("profile.ts", "export default interface UserProfile { name: string }"),
    ]);
    let (_, result) = project.extract(&["a.ts"]);
    let modules = result.unwrap().modules;

    let profile = module_for(&modules, &project.path("profile.ts"));
    assert_eq!(profile.declaration_names(), vec!["UserProfile"]);
    let a = module_for(&modules, &project.path("a.ts"));
    assert_eq!(
        import_summary(a),
        vec![("default".to_string(), "Profile".to_string(), false)]
    );
}

#[test]
fn test_each_file_is_loaded_once_and_shared_dependencies_once() {
    let project = TestProject::with_files(&[
        (
            "a.ts",
            r#"
import { Shared } from "./shared";
/** @schema */
export type A = { s: Shared };
/** @schema */
export type B = { s: Shared; a: A };
"#,
        ),
        ("shared.ts", "export type Shared = number;"),
    ]);
    let (session, result) = project.extract(&["a.ts", "shared.ts"]);
    let modules = result.unwrap().modules;

    assert_eq!(session.loader().loaded_count(), 2);
    let shared = module_for(&modules, &project.path("shared.ts"));
    assert_eq!(shared.declaration_names(), vec!["Shared"]);
    let a = module_for(&modules, &project.path("a.ts"));
    assert_eq!(a.declaration_names(), vec!["A", "B"]);
    assert_eq!(a.imports.len(), 1);
}

#[test]
fn test_extraction_is_deterministic() {
    let project = TestProject::with_files(&[("a.ts", ORDER_A), ("b.ts", CODE_B)]);
    let generator = Generator::new(project.root(), project.path("out"));

    let render = || {
        let (_, result) = project.extract(&["a.ts", "b.ts"]);
        generator.render_all(&result.unwrap().modules).0
    };
    assert_eq!(render(), render());
}

#[test]
fn test_merge_is_idempotent() {
    let project = TestProject::with_files(&[("a.ts", ORDER_A), ("b.ts", CODE_B)]);
    let (_, result) = project.extract(&["a.ts"]);
    let merged = result.unwrap().modules;

    let doubled: Vec<_> = merged.iter().cloned().chain(merged.iter().cloned()).collect();
    assert_eq!(merge_modules(doubled), merged);
}

#[test]
fn test_dependency_in_file_with_regex_literals() {
    let project = TestProject::with_files(&[
        (
            "a.ts",
            r#"
import { Email } from "./b";

/** @schema */
export interface User { email: Email }
"#,
        ),
        (
            "b.ts",
            r#"export const EMAIL_RE = /^[^@]+@[^)]+$/;
const CLOSE = /}/g;
export const isEmail = (s: string) => EMAIL_RE.test(s) && !/'/.test(s);
export type Email = string;
"#,
        ),
    ]);
    let (_, result) = project.extract(&["a.ts"]);
    let modules = result.unwrap().modules;

    let b = module_for(&modules, &project.path("b.ts"));
    assert_eq!(b.declaration_names(), vec!["Email"]);
    let a = module_for(&modules, &project.path("a.ts"));
    assert_eq!(
        import_summary(a),
        vec![("Email".to_string(), "Email".to_string(), false)]
    );
}
