//! Path aliases from tsconfig.json driving a full extraction.

use crate::helpers::project_fixture::TestProject;
use zodify::{ExtractError, extract};

const TSCONFIG: &str = r#"{
  // comments and trailing commas are allowed
  "compilerOptions": {
    "baseUrl": ".",
    "paths": {
      "@models/*": ["src/models/*"],
      "@shared": ["src/shared/index.ts"],
    },
  },
  "include": ["src"],
}"#;

#[test]
fn test_alias_imports_resolve() {
    let project = TestProject::with_files(&[
        ("tsconfig.json", TSCONFIG),
        (
            "src/api.ts",
            r#"
import { User } from "@models/user";
import { Meta } from "@shared";
/** @schema */
export type Response = { user: User; meta: Meta };
"#,
        ),
        ("src/models/user.ts", "export interface User { name: string }"),
        ("src/shared/index.ts", "export type Meta = { page: number };"),
    ]);

    let warnings = extract(&project.options()).unwrap();
    assert!(warnings.is_empty());

    let api = project.read("out/src/api.ts");
    assert!(api.contains("import { UserSchema as UserSchema } from \"./models/user\";"), "{api}");
    assert!(api.contains("import { MetaSchema as MetaSchema } from \"./shared/index\";"), "{api}");
    assert!(project.path("out/src/models/user.ts").is_file());
    assert!(project.path("out/src/shared/index.ts").is_file());
}

#[test]
fn test_base_url_resolves_bare_specifiers() {
    let project = TestProject::with_files(&[
        (
            "tsconfig.json",
            r#"{ "compilerOptions": { "baseUrl": "src" } }"#,
        ),
        (
            "src/app/a.ts",
            "import { Id } from \"lib/id\";\n/** @schema */\nexport type A = { id: Id };",
        ),
        ("src/lib/id.ts", "export type Id = string;"),
    ]);

    extract(&project.options()).unwrap();
    let a = project.read("out/src/app/a.ts");
    assert!(a.contains("import { IdSchema as IdSchema } from \"../lib/id\";"), "{a}");
}

#[test]
fn test_extends_inherits_paths() {
    let project = TestProject::with_files(&[
        (
            "tsconfig.base.json",
            r#"{ "compilerOptions": { "baseUrl": ".", "paths": { "~/*": ["src/*"] } } }"#,
        ),
        ("tsconfig.json", r#"{ "extends": "./tsconfig.base.json", "include": ["src"] }"#),
        (
            "src/a.ts",
            "import { B } from \"~/b\";\n/** @schema */\nexport type A = { b: B };",
        ),
        ("src/b.ts", "export type B = boolean;"),
    ]);

    extract(&project.options()).unwrap();
    assert!(project.path("out/src/b.ts").is_file());
}

#[test]
fn test_missing_tsconfig_is_fatal() {
    let project = TestProject::with_files(&[("a.ts", "export type A = string;")]);
    let mut options = project.options();
    options.tsconfig = Some(project.path("nope/tsconfig.json"));
    assert!(extract(&options).is_err());
}

#[test]
fn test_no_matching_files_is_fatal() {
    let project = TestProject::with_files(&[
        ("tsconfig.json", "{}"),
        ("src/a.ts", "/** @schema */\nexport type A = string;"),
    ]);
    let mut options = project.options();
    options.pattern = Some("^lib/".to_string());
    assert!(matches!(extract(&options), Err(ExtractError::NoInputFiles { .. })));
}
