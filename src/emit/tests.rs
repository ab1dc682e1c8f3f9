use std::path::Path;
use std::rc::Rc;

use super::*;
use crate::base::{FilePath, Position};
use crate::hir::{Declaration, DeclarationKind};
use crate::parser::parse;
use tempfile::TempDir;

fn path(p: &str) -> FilePath {
    Rc::from(Path::new(p))
}

fn module(file: &str, source: &str) -> Module {
    let declarations = parse(source)
        .source_file()
        .declarations()
        .map(|decl| {
            Rc::new(Declaration {
                name: decl.name().and_then(|n| n.text()).unwrap(),
                exported: decl.is_exported(),
                exported_as_default: decl.is_exported_as_default(),
                is_entry: true,
                position: Position::default(),
                kind: DeclarationKind::from(decl),
            })
        })
        .collect();
    Module {
        file_path: path(file),
        declarations,
        imports: Vec::new(),
        reexports: Vec::new(),
    }
}

fn generator() -> Generator {
    Generator::new("/p", "/p/out")
}

#[test]
fn test_output_path_mirrors_project_layout() {
    assert_eq!(
        generator().output_path(Path::new("/p/src/models/user.ts")),
        Path::new("/p/out/src/models/user.ts")
    );
}

#[test]
fn test_specifier_is_relative_and_keeps_ext() {
    let from = Path::new("/p/out/src/a.ts");
    assert_eq!(specifier(from, Path::new("/p/out/src/b.ts"), None), "./b");
    assert_eq!(specifier(from, Path::new("/p/out/lib/c.ts"), Some(".js")), "../lib/c.js");
    assert_eq!(specifier(from, Path::new("/p/src/a.ts"), None), "../../src/a");
}

#[test]
fn test_render_declarations_and_bindings() {
    let mut module = module(
        "/p/src/user.ts",
        "export enum Role { Admin }\nenum Hidden { A }\nexport default interface User { id: UserId; role: Role; meta?: Meta }",
    );
    module.imports = vec![
        ImportBinding::new("Id", "UserId", path("/p/src/id.ts")).with_ext(Some(".js".into())),
        ImportBinding::new("default", "Meta", path("/p/lib/meta.ts")),
        ImportBinding::new("Role", "Role", path("/p/src/user.ts")).from_source(),
    ];

    let mut warnings = Warnings::default();
    let output = generator().render(&module, &mut warnings);

    let expected = [
        "import { z } from \"zod\";",
        "import { Role } from \"../../src/user\";",
        "import { Hidden } from \"../../src/user\";",
        "import { IdSchema as UserIdSchema } from \"./id.js\";",
        "import MetaSchema from \"../lib/meta\";",
        "export const RoleSchema = z.nativeEnum(Role);",
        "export const HiddenSchema = z.nativeEnum(Hidden);",
        "export const UserSchema = z.object({ id: UserIdSchema, role: RoleSchema, meta: MetaSchema.optional() });",
        "export default UserSchema;",
        "",
    ]
    .join("\n");
    assert_eq!(output, expected);
    assert_eq!(
        warnings.should_export,
        vec![WarningEntry {
            name: "Hidden".into(),
            path: "/p/src/user.ts".into(),
        }]
    );
    assert!(warnings.unknown.is_empty());
}

#[test]
fn test_render_reexports() {
    let mut module = Module::empty(path("/p/src/index.ts"));
    module.reexports = vec![
        ImportBinding::new("*", "*", path("/p/src/a.ts")),
        ImportBinding::new("*", "models", path("/p/src/models/index.ts")),
        ImportBinding::new("User", "Account", path("/p/src/user.ts")),
        ImportBinding::new("default", "Meta", path("/p/src/meta.ts")),
    ];

    let output = generator().render(&module, &mut Warnings::default());
    let lines: Vec<&str> = output.lines().skip(1).collect();
    assert_eq!(
        lines,
        vec![
            "export * from \"./a\";",
            "export * as models from \"./models/index\";",
            "export { UserSchema as AccountSchema } from \"./user\";",
            "export { default as MetaSchema } from \"./meta\";",
        ]
    );
}

#[test]
fn test_unknown_constructs_are_reported() {
    let module = module("/p/src/a.ts", "export type Fn = () => void;\nexport type Ok = string;");
    let mut warnings = Warnings::default();
    let output = generator().render(&module, &mut warnings);

    assert!(output.contains("export const FnSchema = z.unknown();"));
    assert_eq!(warnings.unknown.len(), 1);
    assert_eq!(warnings.unknown[0].to_string(), "Fn in /p/src/a.ts");
    assert_eq!(
        warnings.to_string(),
        "Some types can not be transformed to zod schemas. Check them in:\n  Fn in /p/src/a.ts\n"
    );
}

#[test]
fn test_generate_writes_every_module() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let out = root.join("generated");
    let generator = Generator::new(root, &out);

    let a = module(root.join("src/a.ts").to_str().unwrap(), "export type A = string;");
    let b = module(root.join("b.ts").to_str().unwrap(), "export type B = number;");
    let warnings = generator.generate(&[a, b]).unwrap();

    assert!(warnings.is_empty());
    let a_out = std::fs::read_to_string(out.join("src/a.ts")).unwrap();
    assert!(a_out.ends_with("export const ASchema = z.string();\n"));
    assert!(out.join("b.ts").is_file());
}
