//! Generated schema files.

use crate::helpers::project_fixture::TestProject;
use crate::helpers::source_fixtures::*;
use zodify::{ExtractError, NameStyle, extract};

#[test]
fn test_order_example_output() {
    let project = TestProject::with_files(&[
        ("tsconfig.json", "{}"),
        ("a.ts", ORDER_A),
        ("b.ts", CODE_B),
    ]);
    let warnings = extract(&project.options()).unwrap();
    assert!(warnings.is_empty(), "{warnings}");

    assert_eq!(
        project.read("out/b.ts"),
        [
            "import { z } from \"zod\";",
            "import { Code } from \"../b\";",
            "export const CodeSchema = z.nativeEnum(Code);",
            "",
        ]
        .join("\n")
    );
    assert_eq!(
        project.read("out/a.ts"),
        [
            "import { z } from \"zod\";",
            "import { CodeSchema as CodeSchema } from \"./b\";",
            "export const StatusSchema = z.object({ code: CodeSchema, note: z.string().optional() });",
            "export const OrderSchema = z.object({ id: z.string(), status: StatusSchema });",
            "",
        ]
        .join("\n")
    );
}

#[test]
fn test_reexport_chain_is_generated() {
    let project = TestProject::with_files(&[
        ("tsconfig.json", "{}"),
        ("entry.ts", WILDCARD_CONSUMER),
        ("index.ts", WILDCARD_INDEX),
        ("first.ts", "export type Foo = string;"),
        ("second.ts", "export type Foo = number;"),
    ]);
    extract(&project.options()).unwrap();

    assert_eq!(
        project.read("out/index.ts"),
        "import { z } from \"zod\";\nexport * from \"./second\";\n"
    );
    assert!(project.read("out/entry.ts").contains("export const EntrySchema = z.object({ foo: FooSchema });"));
    assert!(!project.path("out/first.ts").exists());
}

#[test]
fn test_warnings_are_collected() {
    let project = TestProject::with_files(&[
        ("tsconfig.json", "{}"),
        (
            "a.ts",
            r#"
enum Local { A, B }
/** @schema */
export type Handler = { run: (input: string) => void; kind: Local };
"#,
        ),
    ]);
    let warnings = extract(&project.options()).unwrap();

    let unknown: Vec<String> = warnings.unknown.iter().map(|w| w.name.to_string()).collect();
    let should_export: Vec<String> = warnings.should_export.iter().map(|w| w.name.to_string()).collect();
    assert_eq!(unknown, vec!["Handler"]);
    assert_eq!(should_export, vec!["Local"]);

    let output = project.read("out/a.ts");
    assert!(output.contains("run: z.unknown()"), "{output}");
}

#[test]
fn test_fatal_error_writes_nothing() {
    let project = TestProject::with_files(&[
        ("tsconfig.json", "{}"),
        ("ok.ts", "/** @schema */\nexport type Ok = string;"),
        ("z_cycle.ts", SAME_FILE_CYCLE),
    ]);
    let err = extract(&project.options()).unwrap_err();

    assert!(matches!(err, ExtractError::CircularReference { .. }));
    assert!(!project.path("out").exists());
}

#[test]
fn test_custom_tag() {
    let project = TestProject::with_files(&[
        ("tsconfig.json", "{}"),
        ("a.ts", "/** @zod */\nexport type A = string;\n/** @schema */\nexport type B = number;"),
    ]);
    let mut options = project.options();
    options.tag = "zod".to_string();
    extract(&options).unwrap();

    let output = project.read("out/a.ts");
    assert!(output.contains("ASchema"));
    assert!(!output.contains("BSchema"));
}

#[test]
fn test_name_style_is_applied_across_files() {
    let project = TestProject::with_files(&[
        ("tsconfig.json", "{}"),
        ("a.ts", "import { Code } from './b';\n/** @schema */\nexport type Order = { code: Code };"),
        ("b.ts", "export type Code = string;"),
    ]);
    let mut options = project.options();
    options.name_style = NameStyle::Camel;
    extract(&options).unwrap();

    assert_eq!(
        project.read("out/a.ts"),
        [
            "import { z } from \"zod\";",
            "import { codeSchema as codeSchema } from \"./b\";",
            "export const orderSchema = z.object({ code: codeSchema });",
            "",
        ]
        .join("\n")
    );
    assert!(project.read("out/b.ts").contains("export const codeSchema = z.string();"));
}
