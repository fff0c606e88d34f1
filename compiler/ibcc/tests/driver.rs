//! Driver tests: single-file pipeline, parallel project checks, CLI options.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use ibc_diagnostic::{Diagnostic, ErrorCode};
use ibc_ir::{FileSymbols, SymbolMetadata};
use ibc_symbols::{normalize_file_path, DependencyMap, ProjectLayout};
use ibcc::commands::{CheckOptions, FormatOptions};
use ibcc::{check_project, compile_source, DriverConfig, DriverError, SourceFile};
use pretty_assertions::assert_eq;
use std::path::Path;

const BALL: &str = "\
class Ball:
    var radius: 半径
    func __init__(radius: 初始半径):
        保存 $self.radius$
    func bounce:
        反弹
";

const MAIN: &str = "\
module src.ball
module pygame
func main:
    var ball: $ball.Ball$
    调用 $ball.Ball.bounce$
    绘制 $pygame.draw$
    调用 $ball.Ball.boune$
";

const LAYOUT: &str = r#"{
    "src": { "ball.ibc": "弹跳的小球", "main.ibc": "入口" },
    "ExternalLibraryDependencies": ["pygame"]
}"#;

fn no_tables(_: &str) -> Option<FileSymbols> {
    None
}

fn codes(diagnostics: &[Diagnostic]) -> Vec<ErrorCode> {
    diagnostics.iter().map(|d| d.code).collect()
}

fn project() -> (Vec<SourceFile>, DependencyMap) {
    let files = vec![
        SourceFile::new("src/main.ibc", MAIN),
        SourceFile::new("src/ball.ibc", BALL),
    ];
    let mut deps = DependencyMap::new();
    deps.insert("src/main.ibc", vec!["src/ball.ibc".to_string()]);
    (files, deps)
}

fn ball_symbols() -> FileSymbols {
    let report = compile_source(
        "src/ball.ibc",
        BALL,
        &no_tables,
        &[],
        None,
        &DriverConfig::default(),
    )
    .unwrap();
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    report.symbols
}

#[test]
fn test_compile_source_with_closure_loader() {
    let ball = ball_symbols();
    let loader = |path: &str| (normalize_file_path(path) == "src/ball").then(|| ball.clone());
    let layout = ProjectLayout::from_json(LAYOUT).unwrap();

    let report = compile_source(
        "src/main.ibc",
        MAIN,
        &loader,
        &["src/ball.ibc".to_string()],
        Some(&layout),
        &DriverConfig::default(),
    )
    .unwrap();

    assert_eq!(codes(&report.diagnostics), vec![ErrorCode::E2005]);
    assert_eq!(report.diagnostics[0].line_num, 7);
    assert_eq!(report.diagnostics[0].suggestions[0].candidate, "ball.Ball.bounce");
}

#[test]
fn test_external_libraries_come_from_layout() {
    let ball = ball_symbols();
    let loader = |path: &str| (normalize_file_path(path) == "src/ball").then(|| ball.clone());

    let report = compile_source(
        "src/main.ibc",
        MAIN,
        &loader,
        &["src/ball.ibc".to_string()],
        None,
        &DriverConfig::default(),
    )
    .unwrap();

    // without the layout, `pygame` is an ordinary unresolved module
    assert_eq!(
        codes(&report.diagnostics),
        vec![ErrorCode::E2005, ErrorCode::E2005]
    );
    assert_eq!(
        report.diagnostics.iter().map(|d| d.line_num).collect::<Vec<_>>(),
        vec![6, 7]
    );
}

#[test]
fn test_fatal_lex_error_stops_the_file() {
    let err = compile_source(
        "bad.ibc",
        "func main:\n\t缩进",
        &no_tables,
        &[],
        None,
        &DriverConfig::default(),
    )
    .unwrap_err();

    assert!(matches!(err, DriverError::Lex { .. }));
    assert_eq!(err.path(), "bad.ibc");
    let diagnostic = err.to_diagnostic();
    assert_eq!(diagnostic.code, ErrorCode::E0001);
    assert_eq!(diagnostic.line_num, 2);
}

#[test]
fn test_lex_warnings_are_reported_without_failing() {
    let report = compile_source(
        "warn.ibc",
        "func main:\n    调用 $ $ 东西",
        &no_tables,
        &[],
        None,
        &DriverConfig::default(),
    )
    .unwrap();

    assert_eq!(codes(&report.diagnostics), vec![ErrorCode::E0007]);
    assert!(report.diagnostics[0].is_warning());
    assert!(!report.has_errors());
}

#[test]
fn test_parser_diagnostics_are_kept() {
    let report = compile_source(
        "late.ibc",
        "var x\nmodule late",
        &no_tables,
        &[],
        None,
        &DriverConfig::default(),
    )
    .unwrap();

    assert!(report.has_errors());
    assert_eq!(codes(&report.diagnostics), vec![ErrorCode::E1002]);
    assert_eq!(report.diagnostics[0].line_num, 2);
    // the dropped import leaves the variable in place
    assert!(report.symbols.metadata.contains_key("x"));
}

#[test]
fn test_check_project_resolves_across_files() {
    let (files, deps) = project();
    let layout = ProjectLayout::from_json(LAYOUT).unwrap();
    let report = check_project(&files, &deps, Some(&layout), &DriverConfig::default());

    assert!(report.failures.is_empty());
    assert_eq!(report.files.len(), 2);
    assert_eq!(report.files[0].path, "src/main.ibc");
    assert_eq!(report.files[1].path, "src/ball.ibc");

    let main = report.get("src/main").unwrap();
    assert_eq!(codes(&main.diagnostics), vec![ErrorCode::E2005]);
    assert!(report.get("./src/ball.ibc").unwrap().diagnostics.is_empty());
    assert_eq!(report.error_count(), 1);
}

#[test]
fn test_check_project_records_constructor_parameters() {
    let (files, deps) = project();
    let report = check_project(&files, &deps, None, &DriverConfig::default());

    let ball = report.get("src/ball.ibc").unwrap();
    let SymbolMetadata::Class(class) = &ball.symbols.metadata["Ball"] else {
        panic!("expected class metadata");
    };
    assert_eq!(
        class.init_parameters.keys().collect::<Vec<_>>(),
        vec!["radius"]
    );
}

#[test]
fn test_check_project_skips_failed_dependency() {
    let files = vec![
        SourceFile::new("main.ibc", "module broken\nfunc main:\n    调用 $broken.run$"),
        SourceFile::new("broken.ibc", "func run:\n\t坏"),
    ];
    let deps: DependencyMap = [("main.ibc".to_string(), vec!["broken.ibc".to_string()])]
        .into_iter()
        .collect();

    let report = check_project(&files, &deps, None, &DriverConfig::default());

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path(), "broken.ibc");
    assert!(report.get("broken").is_none());

    let main = report.get("main").unwrap();
    assert_eq!(codes(&main.diagnostics), vec![ErrorCode::E2005]);
    assert!(report.has_errors());
}

#[test]
fn test_check_options() {
    let args: Vec<String> = ["main.ibc", "--dep", "a.ibc", "--dep", "b.ibc", "--all"]
        .iter()
        .map(ToString::to_string)
        .collect();
    let options = CheckOptions::parse(&args).unwrap();
    assert_eq!(
        options,
        CheckOptions {
            file: "main.ibc".into(),
            deps: vec!["a.ibc".into(), "b.ibc".into()],
            root: None,
            layout: None,
            all: true,
        }
    );

    assert!(CheckOptions::parse(&[]).is_err());
    assert!(CheckOptions::parse(&["main.ibc".into(), "--dep".into()]).is_err());
    assert!(CheckOptions::parse(&["a.ibc".into(), "b.ibc".into()]).is_err());
    assert!(CheckOptions::parse(&["a.ibc".into(), "--root".into()]).is_err());
}

#[test]
fn test_dependency_paths_are_project_relative() {
    let cwd = Path::new("/home/u/proj");
    let options = CheckOptions::parse(&["src/main.ibc".into()]).unwrap();

    assert_eq!(
        options.project_path("/home/u/proj/src/ball.ibc", cwd),
        "src/ball.ibc"
    );
    assert_eq!(options.project_path("./src/ball.ibc", cwd), "src/ball.ibc");
    assert_eq!(options.project_path("/elsewhere/x.ibc", cwd), "/elsewhere/x.ibc");

    let rooted =
        CheckOptions::parse(&["main.ibc".into(), "--root".into(), "/home/u/proj/src".into()])
            .unwrap();
    assert_eq!(rooted.root.as_deref(), Some("/home/u/proj/src"));
    assert_eq!(rooted.project_path("src/shapes/ball.ibc", cwd), "shapes/ball.ibc");
}

#[test]
fn test_absolute_dependency_resolves_after_relativizing() {
    let cwd = Path::new("/home/u/proj");
    let options = CheckOptions::parse(&[
        "/home/u/proj/src/main.ibc".into(),
        "--dep".into(),
        "/home/u/proj/src/ball.ibc".into(),
    ])
    .unwrap();
    let main = options.project_path(&options.file, cwd);
    let ball = options.project_path(&options.deps[0], cwd);

    let files = vec![SourceFile::new(&main, MAIN), SourceFile::new(&ball, BALL)];
    let mut deps = DependencyMap::new();
    deps.insert(&main, vec![ball]);
    let report = check_project(&files, &deps, None, &DriverConfig::default());

    // only the misspelled member and the unimported `pygame` remain
    let main = report.get("src/main.ibc").unwrap();
    assert_eq!(
        main.diagnostics.iter().map(|d| d.line_num).collect::<Vec<_>>(),
        vec![6, 7]
    );
}

#[test]
fn test_format_options() {
    let options = FormatOptions::parse(&["--check".into(), "a.ibc".into(), "b.ibc".into()]).unwrap();
    assert!(options.check);
    assert_eq!(options.paths, vec!["a.ibc", "b.ibc"]);
    assert!(FormatOptions::parse(&["--check".into()]).is_err());
    assert!(FormatOptions::parse(&["--write".into(), "a.ibc".into()]).is_err());
}
