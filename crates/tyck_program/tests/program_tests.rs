//! Program integration tests.
//!
//! End-to-end runs over real directories: project file, discovery, parallel
//! parse, import resolution, check.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use tyck_options::CheckerOptions;
use tyck_program::{Program, ProgramError};

/// Helper: a fresh temporary directory populated with `files`, removed on drop.
fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    for (name, text) in files {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }
    dir
}

fn file_names(program: &Program, root: &Path) -> Vec<String> {
    let prefix = root.to_string_lossy().replace('\\', "/");
    program
        .file_names()
        .map(|name| name.trim_start_matches(prefix.as_str()).trim_start_matches('/').to_string())
        .collect()
}

#[test]
fn test_include_globs_relative_to_config() {
    let root = project(&[
        ("tyck.json", r#"{ "include": ["src/**/*.ts"] }"#),
        ("src/a.ts", "export const a = 1;"),
        ("src/nested/b.ts", "export const b = 2;"),
        ("src/c.js", "var c;"),
        ("other/d.ts", "export const d = 3;"),
        ("src/node_modules/e.ts", "export const e = 4;"),
    ]);
    let program = Program::from_config(root.path().join("tyck.json")).unwrap();
    assert_eq!(file_names(&program, root.path()), vec!["src/a.ts", "src/nested/b.ts"]);
}

#[test]
fn test_exclude_removes_matches() {
    let root = project(&[
        ("tyck.json", r#"{ "include": ["src"], "exclude": ["src/gen"] }"#),
        ("src/a.ts", "export const a = 1;"),
        ("src/gen/b.ts", "export const b = 2;"),
    ]);
    let program = Program::from_config(root.path().join("tyck.json")).unwrap();
    assert_eq!(file_names(&program, root.path()), vec!["src/a.ts"]);
}

#[test]
fn test_files_list_and_options() {
    let root = project(&[
        (
            "tyck.json",
            r#"{ "compilerOptions": { "strict": true }, "files": ["main.ts", "lib.ts"] }"#,
        ),
        ("lib.ts", "export function id(x: number) { return x; }"),
        ("main.ts", "import { id } from './lib';\nlet s: string = id(1);"),
        ("unused.ts", "let u: number = 'u';"),
    ]);
    let program = Program::from_config(root.path().join("tyck.json")).unwrap();
    assert!(program.options().strict_null_checks());
    assert_eq!(file_names(&program, root.path()), vec!["main.ts", "lib.ts"]);
    let report = program.check().unwrap();
    let codes: Vec<u32> = report.diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![2322]);
    assert!(report.diagnostics()[0].file.as_deref().unwrap().ends_with("main.ts"));
}

#[test]
fn test_index_file_resolution_on_disk() {
    let root = project(&[
        ("tyck.json", "{}"),
        ("util/index.ts", "export const name: string = 'u';"),
        ("app.ts", "import { name } from './util';\nlet n: number = name;"),
    ]);
    let report = Program::from_config(root.path().join("tyck.json")).unwrap().check().unwrap();
    let codes: Vec<u32> = report.diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![2322]);
}

#[test]
fn test_empty_project_is_config_error() {
    let root = project(&[("tyck.json", r#"{ "include": ["src"] }"#), ("README", "")]);
    let result = Program::from_config(root.path().join("tyck.json"));
    assert!(matches!(result, Err(ProgramError::Config(_))));
}

#[test]
fn test_malformed_project_file() {
    let root = project(&[("tyck.json", "{ \"files\": [")]);
    let result = Program::from_config(root.path().join("tyck.json"));
    assert!(matches!(result, Err(ProgramError::Json(_))));
}

#[test]
fn test_project_directory_removed_on_drop() {
    let root = project(&[("tyck.json", "{}"), ("src/a.ts", "export const a = 1;")]);
    let path = root.path().to_path_buf();
    assert!(path.join("src/a.ts").exists());
    drop(root);
    assert!(!path.exists());
}

#[test]
fn test_missing_project_file() {
    let result = Program::from_config("/no/such/dir/tyck.json");
    assert!(matches!(result, Err(ProgramError::Io { .. })));
}

#[test]
fn test_many_files_check_deterministically() {
    let mut program = Program::new(CheckerOptions::strict());
    program.add_source("base.ts", "export interface P { x: number }");
    for index in 0..16 {
        program.add_source(
            format!("f{index:02}.ts"),
            "import { P } from './base';\nconst p: P = { x: 'no' };",
        );
    }
    let first = program.check().unwrap();
    assert_eq!(first.error_count(), 16);
    let second = program.check().unwrap();
    assert_eq!(first.diagnostics(), second.diagnostics());
}
