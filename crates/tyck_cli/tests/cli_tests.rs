//! End-to-end tests for the `tyck` binary.

use std::fs;
use std::process::{Command, Output};

use tempfile::TempDir;

fn scratch(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    for (name, text) in files {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }
    dir
}

fn tyck(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tyck"))
        .current_dir(dir.path())
        .env_remove("TYCK_LOG")
        .args(args)
        .output()
        .unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_clean_file_exits_zero() {
    let dir = scratch(&[("a.ts", "const x: number = 1;")]);
    let output = tyck(&dir, &["a.ts"]);
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(!stderr(&output).contains("Found"));
}

#[test]
fn test_type_error_exits_two_with_location() {
    let dir = scratch(&[("a.ts", "let ok = 1;\nlet bad: number = 'x';")]);
    let output = tyck(&dir, &["a.ts"]);
    assert_eq!(output.status.code(), Some(2));
    let text = stderr(&output);
    assert!(text.contains("a.ts(2,5): error TS2322:"), "{text}");
    assert!(text.contains("Found 1 error."), "{text}");
}

#[test]
fn test_missing_file_exits_one() {
    let dir = scratch(&[]);
    let output = tyck(&dir, &["nope.ts"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_unknown_flag_exits_one() {
    let dir = scratch(&[]);
    let output = tyck(&dir, &["--noSuchFlag"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_no_inputs_exits_one() {
    let dir = scratch(&[]);
    let output = tyck(&dir, &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("no input files"));
}

#[test]
fn test_project_file_and_list_files() {
    let dir = scratch(&[
        ("tyck.json", r#"{ "include": ["src"] }"#),
        ("src/a.ts", "export const a = 1;"),
        ("src/b.ts", "import { a } from './a';\nconst b: number = a;"),
    ]);
    let output = tyck(&dir, &["-p", "tyck.json", "--listFiles"]);
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    let listed = String::from_utf8_lossy(&output.stdout);
    let names: Vec<&str> = listed.lines().collect();
    assert_eq!(names.len(), 2);
    assert!(names[0].ends_with("src/a.ts"));
    assert!(names[1].ends_with("src/b.ts"));
}

#[test]
fn test_default_project_file_is_found() {
    let dir = scratch(&[("tyck.json", r#"{ "files": ["m.ts"] }"#), ("m.ts", "let s: string = 1;")]);
    let output = tyck(&dir, &[]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_cli_flag_overrides_project_options() {
    let source = "function f(x) { return x; }";
    let dir = scratch(&[
        ("tyck.json", r#"{ "compilerOptions": { "noImplicitAny": false }, "files": ["a.ts"] }"#),
        ("a.ts", source),
    ]);
    assert_eq!(tyck(&dir, &[]).status.code(), Some(0));
    let output = tyck(&dir, &["--noImplicitAny"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("TS7006"));
}

#[test]
fn test_pretty_output_names_the_code() {
    let dir = scratch(&[("a.ts", "let n: number = 'x';")]);
    let output = tyck(&dir, &["--pretty", "a.ts"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("TS2322"));
}

#[test]
fn test_threads_flag() {
    let dir = scratch(&[("a.ts", "const x = 1;"), ("b.ts", "const y = 2;")]);
    let output = tyck(&dir, &["--threads", "2", "a.ts", "b.ts"]);
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
}
