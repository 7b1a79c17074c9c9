//! CLI behavior tests: exit codes, output formats, fix, init and check.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn tenor_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tenor"));
    cmd.env_remove("TENOR_LOG").env("NO_COLOR", "1");
    cmd
}

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    dir
}

fn file(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

const CLEAN: &str = "it('returns the total', () => {});\n";
const DIRTY: &str = "it('return the total', () => {});\nit('when empty', () => {});\n";

#[test]
fn no_args_returns_error_not_panic() {
    tenor_cmd()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("path").or(predicate::str::contains("PATH")));
}

#[test]
fn clean_file_exits_0() {
    let dir = project(&[("cart.test.ts", CLEAN)]);
    tenor_cmd()
        .arg(file(&dir, "cart.test.ts"))
        .assert()
        .success()
        .stdout(predicate::str::contains("All descriptions follow the convention"));
}

#[test]
fn warnings_exit_0_unless_strict() {
    let dir = project(&[("cart.test.ts", DIRTY)]);
    tenor_cmd()
        .arg(file(&dir, "cart.test.ts"))
        .assert()
        .success()
        .stdout(predicate::str::contains("[wrong-grammar-add-s]"))
        .stdout(predicate::str::contains("'returns the total'"));

    tenor_cmd()
        .arg(file(&dir, "cart.test.ts"))
        .arg("--strict")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn error_severity_exits_1() {
    let dir = project(&[
        (".tenorrc.json", r#"{ "rules": { "invalid-start-of-description": "error" } }"#),
        ("cart.test.ts", DIRTY),
    ]);
    tenor_cmd().arg(dir.path()).assert().failure().code(1);
}

#[test]
fn json_output_valid() {
    let dir = project(&[("cart.test.ts", DIRTY)]);
    let output = tenor_cmd()
        .arg(file(&dir, "cart.test.ts"))
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(parsed["descriptionsChecked"], 2);
    assert_eq!(parsed["issues"][0]["kind"], "wrong-grammar-add-s");
}

#[test]
fn json_output_for_directory_has_summary() {
    let dir = project(&[("a.test.ts", CLEAN), ("nested/b.spec.ts", DIRTY)]);
    let output = tenor_cmd().arg(dir.path()).arg("--json").output().unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["summary"]["filesAnalyzed"], 2);
    assert_eq!(parsed["summary"]["totalIssues"], 2);
}

#[test]
fn sarif_output_valid() {
    let dir = project(&[("cart.test.ts", DIRTY)]);
    let output = tenor_cmd()
        .arg(file(&dir, "cart.test.ts"))
        .arg("--sarif")
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["version"], "2.1.0");
    assert_eq!(parsed["runs"][0]["results"].as_array().unwrap().len(), 2);
}

#[test]
fn file_not_found_exit_2() {
    tenor_cmd()
        .arg("nonexistent.test.ts")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("nonexistent"));
}

#[test]
fn directory_without_tests_exit_2() {
    let dir = project(&[("util.ts", "export const x = 1;")]);
    tenor_cmd()
        .arg(dir.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("No test files found"));
}

#[test]
fn ignore_globs_skip_files() {
    let dir = project(&[
        (".tenorrc.json", r#"{ "ignore": ["**/legacy/**"] }"#),
        ("legacy/old.test.ts", DIRTY),
        ("new.test.ts", CLEAN),
    ]);
    tenor_cmd()
        .arg(dir.path())
        .arg("--strict")
        .assert()
        .success();
}

#[test]
fn fix_rewrites_file_and_relints() {
    let dir = project(&[(
        "cart.test.ts",
        "it('should not be empty', () => {});\nit('Make it', () => {});\n",
    )]);
    tenor_cmd()
        .arg(file(&dir, "cart.test.ts"))
        .arg("--fix")
        .arg("--no-vague-verbs")
        .arg("--strict")
        .assert()
        .success()
        .stderr(predicate::str::contains("Fixed 2 description(s)"));

    let content = fs::read_to_string(file(&dir, "cart.test.ts")).unwrap();
    assert_eq!(
        content,
        "it('is not empty', () => {});\nit('makes it', () => {});\n"
    );
}

#[test]
fn quiet_mode_one_line_per_file() {
    let dir = project(&[("cart.test.ts", DIRTY)]);
    tenor_cmd()
        .arg(file(&dir, "cart.test.ts"))
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 issues (1 fixable)"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();
    tenor_cmd().arg("init").arg("--dir").arg(dir.path()).assert().success();

    let content = fs::read_to_string(dir.path().join(".tenorrc.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed["noVagueVerbs"], true);
    assert_eq!(parsed["testFunctions"][0], "it");
}

#[test]
fn init_does_not_overwrite() {
    let dir = project(&[(".tenorrc.json", "{}")]);
    tenor_cmd()
        .arg("init")
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(fs::read_to_string(dir.path().join(".tenorrc.json")).unwrap(), "{}");
}

#[test]
fn check_valid_description() {
    tenor_cmd().arg("check").arg("returns nothing").assert().success();
}

#[test]
fn check_prints_fix_and_fixed_point() {
    let dir = TempDir::new().unwrap();
    tenor_cmd()
        .current_dir(dir.path())
        .arg("check")
        .arg("should not be called")
        .arg("--no-vague-verbs")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("[vague-start]"))
        .stdout(predicate::str::contains("\"not be called\""))
        .stdout(predicate::str::contains("\"is not called\" (2 fixes, valid)"));
}

#[test]
fn check_json() {
    let dir = TempDir::new().unwrap();
    let output = tenor_cmd()
        .current_dir(dir.path())
        .args(["check", "it when clicked", "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["kind"], "duplicated-it");
    assert_eq!(parsed["fix"], "when clicked");
    assert_eq!(parsed["fixed"], "when clicked");
    assert_eq!(parsed["converged"], true);
}
