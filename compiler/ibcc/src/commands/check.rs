//! The `check` command: run the full front end on one file.

use std::path::{Component, Path};

use ibc_diagnostic::IssueConfig;
use ibc_symbols::{DependencyMap, ProjectLayout};

use super::{emit_diagnostics, read_file};
use crate::{check_project, DriverConfig, SourceFile};

const USAGE: &str = "Usage: ibc check <file.ibc> [--dep <file.ibc>]... [--root <dir>] [--layout <project.json>] [--all]";

/// Arguments of `ibc check <file> [--dep <file>]... [--root <dir>] [--layout <file>]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckOptions {
    pub file: String,
    /// Dependency source files; their symbols are built in memory.
    pub deps: Vec<String>,
    /// Project root; symbol paths are taken relative to it. Defaults to the
    /// current directory.
    pub root: Option<String>,
    /// Project layout JSON supplying descriptions and external libraries.
    pub layout: Option<String>,
    /// Keep every issue instead of the terminal-friendly limit.
    pub all: bool,
}

impl CheckOptions {
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let mut file = None;
        let mut deps = Vec::new();
        let mut root = None;
        let mut layout = None;
        let mut all = false;

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--dep" => match iter.next() {
                    Some(dep) => deps.push(dep.clone()),
                    None => return Err("--dep needs a file path".to_string()),
                },
                "--root" => match iter.next() {
                    Some(dir) => root = Some(dir.clone()),
                    None => return Err("--root needs a directory".to_string()),
                },
                "--layout" => match iter.next() {
                    Some(path) => layout = Some(path.clone()),
                    None => return Err("--layout needs a file path".to_string()),
                },
                "--all" => all = true,
                flag if flag.starts_with('-') => return Err(format!("unknown option '{flag}'")),
                path if file.is_none() => file = Some(path.to_string()),
                extra => return Err(format!("unexpected argument '{extra}'")),
            }
        }

        let file = file.ok_or_else(|| "missing file path".to_string())?;
        Ok(CheckOptions {
            file,
            deps,
            root,
            layout,
            all,
        })
    }

    /// `path` as a project path: relative to the root, `/`-separated.
    ///
    /// Relative inputs are taken from `cwd`. A path outside the root is
    /// returned as given.
    pub fn project_path(&self, path: &str, cwd: &Path) -> String {
        let root = cwd.join(self.root.as_deref().unwrap_or("."));
        let full = cwd.join(path);
        let Ok(relative) = full.strip_prefix(&root) else {
            return path.to_string();
        };
        let parts: Vec<_> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect();
        if parts.is_empty() {
            return path.to_string();
        }
        parts.join("/")
    }

    fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            issues: if self.all {
                IssueConfig::default()
            } else {
                IssueConfig::compact()
            },
            ..DriverConfig::default()
        }
    }
}

/// Check a file against its dependencies and report every issue.
pub fn check_file(args: &[String]) {
    let options = match CheckOptions::parse(args) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("error: {msg}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    let layout = options.layout.as_deref().map(|path| {
        match ProjectLayout::from_json(&read_file(path)) {
            Ok(layout) => layout,
            Err(e) => {
                eprintln!("{path}: invalid project layout: {e}");
                std::process::exit(1);
            }
        }
    });

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("error: cannot read the current directory: {e}");
            std::process::exit(1);
        }
    };
    let main_path = options.project_path(&options.file, &cwd);
    let dep_paths: Vec<String> = options
        .deps
        .iter()
        .map(|dep| options.project_path(dep, &cwd))
        .collect();
    tracing::debug!(main = %main_path, deps = ?dep_paths, "project paths");

    let mut files = vec![SourceFile::new(&main_path, read_file(&options.file))];
    files.extend(
        options
            .deps
            .iter()
            .zip(&dep_paths)
            .map(|(dep, path)| SourceFile::new(path, read_file(dep))),
    );
    let mut dependencies = DependencyMap::new();
    dependencies.insert(&main_path, dep_paths.clone());

    let report = check_project(
        &files,
        &dependencies,
        layout.as_ref(),
        &options.driver_config(),
    );

    for failure in &report.failures {
        emit_diagnostics(failure.path(), &[failure.to_diagnostic()]);
    }
    let Some(main) = report.get(&main_path) else {
        std::process::exit(1);
    };
    emit_diagnostics(&main.path, &main.diagnostics);

    if !report.failures.is_empty() || main.has_errors() {
        std::process::exit(1);
    }
    println!(
        "OK: {} ({} symbols, {} dependencies)",
        main.path,
        main.symbols.metadata.len(),
        dep_paths.len()
    );
}
