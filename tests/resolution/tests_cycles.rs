//! Circular references are fatal.

use crate::helpers::project_fixture::TestProject;
use crate::helpers::source_fixtures::*;
use zodify::ExtractError;

#[test]
fn test_same_file_cycle_is_rejected() {
    let project = TestProject::with_files(&[("a.ts", SAME_FILE_CYCLE)]);
    let (_, result) = project.extract(&["a.ts"]);

    match result {
        Err(ExtractError::CircularReference { stack }) => {
            let names: Vec<&str> = stack.iter().map(|(_, name)| name.as_str()).collect();
            assert_eq!(names, vec!["A", "B", "A"]);
        }
        other => panic!("expected a circular reference, got {other:?}"),
    }
}

#[test]
fn test_cross_file_cycle_is_rejected() {
    let project = TestProject::with_files(&[
        ("a.ts", CROSS_FILE_CYCLE_A),
        ("b.ts", CROSS_FILE_CYCLE_B),
    ]);
    let (_, result) = project.extract(&["a.ts"]);

    let err = result.unwrap_err();
    assert!(matches!(err, ExtractError::CircularReference { .. }));
    let message = err.to_string();
    assert!(message.contains("a.ts"), "{message}");
    assert!(message.contains("b.ts"), "{message}");
}

#[test]
fn test_self_reference_is_rejected() {
    let project = TestProject::with_files(&[(
        "tree.ts",
        "/** @schema */\nexport interface Node { children: Node[] }",
    )]);
    let (_, result) = project.extract(&["tree.ts"]);
    assert!(matches!(result, Err(ExtractError::CircularReference { .. })));
}

#[test]
fn test_diamond_is_not_a_cycle() {
    let project = TestProject::with_files(&[(
        "a.ts",
        r#"
/** @schema */
export type Top = { left: Left; right: Right };
type Left = { leaf: Leaf };
type Right = { leaf: Leaf };
type Leaf = string;
"#,
    )]);
    let (_, result) = project.extract(&["a.ts"]);
    let modules = result.unwrap().modules;
    assert_eq!(modules[0].declaration_names().len(), 4);
}
