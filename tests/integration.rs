//! Integration tests: lint, fix and re-lint whole test files

use std::fs;
use std::path::Path;
use tenor::analyzer::LintEngine;
use tenor::config::load_config;
use tenor::fixer::{apply_fixes, apply_fixes_to_source, collect_fixes, FixLevel};
use tenor::{DescriptionOptions, FileReport, Severity, ViolationKind};
use tempfile::TempDir;

fn lint(source: &str) -> FileReport {
    lint_with(source, DescriptionOptions::default())
}

fn lint_with(source: &str, options: DescriptionOptions) -> FileReport {
    LintEngine::new()
        .with_options(options)
        .lint_source(source, Path::new("fixture.test.ts"), None)
        .unwrap_or_else(|e| panic!("lint failed: {}", e))
}

/// Output after one fix step, the way an editor applies a single quick fix
fn fix_once(source: &str, options: DescriptionOptions) -> String {
    let report = lint_with(source, options);
    apply_fixes_to_source(source, &collect_fixes(&report), FixLevel::SinglePass).content
}

const NO_VAGUE: DescriptionOptions = DescriptionOptions {
    no_vague_verbs: true,
    prefer_when_to_if: false,
};

#[test]
fn conjugated_descriptions_are_valid() {
    for source in [
        r#"it("does nothing", () => {})"#,
        r#"it("returns nothing", () => {})"#,
        r#"it("should do nothing", () => {})"#,
    ] {
        let report = lint(source);
        assert_eq!(report.descriptions_checked, 1);
        assert!(report.issues.is_empty(), "{} reported {:?}", source, report.issues);
    }
}

#[test]
fn single_step_fixes() {
    let cases: &[(&str, ViolationKind, &str, DescriptionOptions)] = &[
        (
            r#"it("", () => {})"#,
            ViolationKind::RequiredDescription,
            r#"it("", () => {})"#,
            DescriptionOptions::default(),
        ),
        (
            r#"it("Does something", () => {})"#,
            ViolationKind::NoCapitalization,
            r#"it("does something", () => {})"#,
            DescriptionOptions::default(),
        ),
        (
            r#"it("do something", () => {})"#,
            ViolationKind::WrongGrammar,
            r#"it("does something", () => {})"#,
            DescriptionOptions::default(),
        ),
        (
            r#"it("don't do anything", () => {})"#,
            ViolationKind::WrongGrammar,
            r#"it("doesn't do anything", () => {})"#,
            DescriptionOptions::default(),
        ),
        (
            r#"it("make bread", () => {})"#,
            ViolationKind::WrongGrammarAddS,
            r#"it("makes bread", () => {})"#,
            DescriptionOptions::default(),
        ),
        (
            r#"it("should do something", () => {})"#,
            ViolationKind::VagueStart,
            r#"it("do something", () => {})"#,
            NO_VAGUE,
        ),
        (
            r#"it("it does something", () => {})"#,
            ViolationKind::DuplicatedIt,
            r#"it("does something", () => {})"#,
            DescriptionOptions::default(),
        ),
        (
            r#"it("not return anything", () => {})"#,
            ViolationKind::InvalidStartOfDescription,
            r#"it("does not return anything", () => {})"#,
            DescriptionOptions::default(),
        ),
        (
            r#"it("not be called", () => {})"#,
            ViolationKind::InvalidStartOfDescription,
            r#"it("is not called", () => {})"#,
            DescriptionOptions::default(),
        ),
    ];

    for (source, kind, expected, options) in cases {
        let report = lint_with(source, *options);
        assert_eq!(report.issues.len(), 1, "{}", source);
        assert_eq!(report.issues[0].kind, *kind, "{}", source);
        assert_eq!(fix_once(source, *options), *expected, "{}", source);
    }
}

#[test]
fn fixed_point_fix_of_a_whole_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cart.test.ts");
    fs::write(
        &path,
        r#"describe('cart', () => {
  it('should add an item', () => {});
  it("it return the total", () => {});
  it('should not be empty', () => {});
  it('Throws if the cart is closed', () => {});
  it('when empty', () => {});
});
"#,
    )
    .unwrap();

    let engine = LintEngine::new().with_options(DescriptionOptions {
        no_vague_verbs: true,
        prefer_when_to_if: true,
    });
    let report = engine.lint(&path, None).unwrap();
    assert_eq!(report.descriptions_checked, 5);
    assert_eq!(report.issues.len(), 5);
    assert_eq!(report.fixable(), 4);

    let written = apply_fixes(&path, &collect_fixes(&report), FixLevel::FixedPoint).unwrap();
    assert_eq!(written, 4);

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("it('adds an item'"));
    assert!(content.contains("it(\"returns the total\""));
    assert!(content.contains("it('is not empty'"));
    assert!(content.contains("it('throws when the cart is closed'"));

    let after = engine.lint(&path, None).unwrap();
    assert_eq!(after.issues.len(), 1);
    assert_eq!(after.issues[0].kind, ViolationKind::InvalidStartOfDescription);
    assert!(after.issues[0].fix.is_none());
}

#[test]
fn config_drives_the_engine() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".tenorrc.json"),
        r#"{
            "noVagueVerbs": true,
            "testFunctions": ["it", "test"],
            "rules": { "vague-start": "error", "no-capitalization": "off" },
            "lexicon": { "regularVerbs": ["fetch"] }
        }"#,
    )
    .unwrap();
    let path = dir.path().join("api.spec.ts");
    fs::write(
        &path,
        "test('should fetch users', () => {});\nit('Fetches users', () => {});\nit('fetch users', () => {});\n",
    )
    .unwrap();

    let report = tenor::lint_file(&path, dir.path(), None).unwrap();
    assert_eq!(report.descriptions_checked, 3);

    let kinds: Vec<(ViolationKind, Severity)> =
        report.issues.iter().map(|i| (i.kind, i.severity)).collect();
    assert_eq!(
        kinds,
        vec![
            (ViolationKind::VagueStart, Severity::Error),
            (ViolationKind::WrongGrammarAddS, Severity::Warning),
        ]
    );
    assert_eq!(
        report.issues[0].fix.as_ref().unwrap().final_replacement,
        "'fetches users'"
    );
}

#[test]
fn config_is_loaded_for_nested_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".tenorrc.json"), r#"{ "emoji": true }"#).unwrap();
    let nested = dir.path().join("src").join("deep");
    fs::create_dir_all(&nested).unwrap();

    let config = load_config(&nested, None).unwrap();
    let report = LintEngine::from_config(&config)
        .lint_source("it('Make it', () => {});", &nested.join("a.test.ts"), Some(&config))
        .unwrap();
    assert!(report.issues[0].message.starts_with("🔡"));
}

#[test]
fn descriptions_in_jsx_files() {
    let source = r#"
it('render the button', () => {
  render(<Button label="ok" />);
});
"#;
    let report = LintEngine::new()
        .lint_source(source, Path::new("button.test.tsx"), None)
        .unwrap();
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].kind, ViolationKind::WrongGrammarAddS);
    assert_eq!(report.issues[0].location.line, 2);
}
