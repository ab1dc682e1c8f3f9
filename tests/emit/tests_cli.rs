//! The `zodify` binary.

use std::process::Command;

use crate::helpers::project_fixture::TestProject;

fn zodify(project: &TestProject, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_zodify"))
        .args(args)
        .current_dir(project.root())
        .output()
        .expect("Failed to run zodify")
}

#[test]
fn test_success_message() {
    let project = TestProject::with_files(&[
        ("tsconfig.json", "{}"),
        ("src/a.ts", "/** @schema */\nexport type A = { n: number };"),
    ]);
    let output = zodify(&project, &["--out-dir", "generated"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("generated successfully in generated"), "{stdout}");
    assert!(project.path("generated/src/a.ts").is_file());
}

#[test]
fn test_warnings_are_printed() {
    let project = TestProject::with_files(&[
        ("tsconfig.json", "{}"),
        ("a.ts", "/** @schema */\nexport type F = () => void;"),
    ]);
    let output = zodify(&project, &["--out-dir", "out"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Some types can not be transformed to zod schemas"), "{stdout}");
    assert!(stdout.contains("F in "), "{stdout}");
}

#[test]
fn test_fatal_error_exits_with_failure() {
    let project = TestProject::with_files(&[
        ("tsconfig.json", "{}"),
        ("a.ts", "export type A = string;"),
    ]);
    let output = zodify(&project, &["--out-dir", "out", "--tag", "zod"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no declarations tagged with @zod were found"), "{stderr}");
    assert!(!project.path("out").exists());
}

#[test]
fn test_out_dir_is_required() {
    let project = TestProject::new();
    let output = zodify(&project, &[]);
    assert!(!output.status.success());
}

#[test]
fn test_name_style_option() {
    let project = TestProject::with_files(&[
        ("tsconfig.json", "{}"),
        ("a.ts", "/** @schema */\nexport type user = { n: number };"),
    ]);
    let output = zodify(&project, &["--out-dir", "out", "--name-style", "pascal"]);

    assert!(output.status.success());
    assert!(project.read("out/a.ts").contains("export const UserSchema = "));

    let rejected = zodify(&project, &["--out-dir", "out", "--name-style", "snake"]);
    assert!(!rejected.status.success());
}
