//! Parallel multi-file checking.

use ibc_diagnostic::IssueQueue;
use ibc_ir::{AstTable, FileSymbols};
use ibc_symbols::{normalize_file_path, DependencyMap, MemorySymbolLoader, ProjectLayout};
use rayon::prelude::*;

use crate::pipeline::{build_symbols, parse_source, Session};
use crate::{DriverConfig, DriverError, FileReport};

/// One input file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        SourceFile {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Result of checking a set of files.
#[derive(Clone, Debug, Default)]
pub struct ProjectReport {
    /// Files that made it through parsing, in input order.
    pub files: Vec<FileReport>,
    /// Files stopped by a fatal lexer or parser error.
    pub failures: Vec<DriverError>,
}

impl ProjectReport {
    /// Report for `path`, compared after normalization.
    pub fn get(&self, path: &str) -> Option<&FileReport> {
        let wanted = normalize_file_path(path);
        self.files
            .iter()
            .find(|report| normalize_file_path(&report.path) == wanted)
    }

    pub fn has_errors(&self) -> bool {
        !self.failures.is_empty() || self.files.iter().any(FileReport::has_errors)
    }

    pub fn error_count(&self) -> usize {
        self.failures.len() + self.files.iter().map(FileReport::error_count).sum::<usize>()
    }
}

struct Parsed<'f> {
    file: &'f SourceFile,
    ast: AstTable,
    symbols: FileSymbols,
    queue: IssueQueue,
}

fn parse_file<'f>(file: &'f SourceFile, config: &DriverConfig) -> Result<Parsed<'f>, DriverError> {
    let mut queue = IssueQueue::with_config(config.issues.clone());
    let ast = parse_source(&file.path, &file.text, &mut queue)?;
    let symbols = build_symbols(&ast, &config.resolve, &mut queue);
    Ok(Parsed {
        file,
        ast,
        symbols,
        queue,
    })
}

/// Check every file of a project.
///
/// All files are parsed and their symbol tables built in parallel. Each
/// table is then registered in an in-memory loader and every file resolved
/// in parallel against its declared dependencies. A dependency that failed
/// to parse is skipped by its dependents.
#[tracing::instrument(level = "debug", skip_all, fields(files = files.len()))]
pub fn check_project(
    files: &[SourceFile],
    dependencies: &DependencyMap,
    layout: Option<&ProjectLayout>,
    config: &DriverConfig,
) -> ProjectReport {
    let parsed: Vec<Result<Parsed<'_>, DriverError>> = files
        .par_iter()
        .map(|file| parse_file(file, config))
        .collect();

    let mut ready = Vec::with_capacity(parsed.len());
    let mut failures = Vec::new();
    for result in parsed {
        match result {
            Ok(file) => ready.push(file),
            Err(error) => {
                tracing::debug!(%error, "file failed before symbol building");
                failures.push(error);
            }
        }
    }

    let loader: MemorySymbolLoader = ready
        .iter()
        .map(|p| (p.file.path.clone(), p.symbols.clone()))
        .collect();
    let session = Session {
        loader: &loader,
        layout,
        config,
    };

    let reports: Vec<FileReport> = ready
        .into_par_iter()
        .map(|mut p| {
            let deps = dependencies.dependencies_of(&p.file.path);
            session.analyze(&p.file.path, &p.ast, &p.symbols, deps, &mut p.queue);
            FileReport {
                path: p.file.path.clone(),
                ast: p.ast,
                symbols: p.symbols,
                diagnostics: p.queue.flush(),
            }
        })
        .collect();

    ProjectReport {
        files: reports,
        failures,
    }
}
