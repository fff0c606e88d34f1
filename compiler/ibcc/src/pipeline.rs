//! Single-file pipeline.

use ibc_diagnostic::{Diagnostic, IssueConfig, IssueQueue, IssueSink};
use ibc_ir::{AstTable, FileSymbols};
use ibc_resolve::{resolve, validate_constructors, ModuleImports, ResolveConfig, ResolveScope};
use ibc_symbols::{build_symbol_tree, ProjectLayout, SymbolTableLoader, VisibleSymbolBuilder};

use crate::DriverError;

/// Settings for every phase the driver runs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DriverConfig {
    pub issues: IssueConfig,
    pub resolve: ResolveConfig,
}

/// Everything the front end produced for one file.
#[derive(Clone, Debug)]
pub struct FileReport {
    pub path: String,
    pub ast: AstTable,
    /// The file's own symbols, as its dependents load them.
    pub symbols: FileSymbols,
    /// Lexer warnings, parser diagnostics and semantic issues, by line.
    pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }
}

/// Lex and parse `source`.
///
/// Lexer warnings and parser diagnostics go to `sink`; only a fatal lexer or
/// parser error stops the file.
#[tracing::instrument(level = "debug", skip_all, fields(path = path))]
pub fn parse_source(
    path: &str,
    source: &str,
    sink: &mut impl IssueSink,
) -> Result<AstTable, DriverError> {
    let lexed = ibc_lexer::tokenize(source).map_err(|source| DriverError::Lex {
        path: path.to_string(),
        source,
    })?;
    for warning in &lexed.warnings {
        sink.record(warning.to_diagnostic());
    }

    let parsed = ibc_parse::parse(&lexed.tokens).map_err(|source| DriverError::Parse {
        path: path.to_string(),
        source,
    })?;
    for diagnostic in parsed.diagnostics {
        sink.record(diagnostic);
    }

    Ok(parsed.ast)
}

/// Build the file's symbol table and fold constructor parameters into it.
pub(crate) fn build_symbols(
    ast: &AstTable,
    config: &ResolveConfig,
    sink: &mut impl IssueSink,
) -> FileSymbols {
    let mut symbols = build_symbol_tree(ast);
    validate_constructors(ast, &mut symbols.metadata, config, sink);
    symbols
}

/// What stays fixed while files are resolved.
pub(crate) struct Session<'a, L: ?Sized> {
    pub loader: &'a L,
    pub layout: Option<&'a ProjectLayout>,
    pub config: &'a DriverConfig,
}

impl<L: SymbolTableLoader + ?Sized> Session<'_, L> {
    /// Resolve every reference of one file against its visible symbols.
    pub fn analyze(
        &self,
        path: &str,
        ast: &AstTable,
        symbols: &FileSymbols,
        dependencies: &[String],
        sink: &mut impl IssueSink,
    ) {
        let mut builder = VisibleSymbolBuilder::new(self.loader);
        if let Some(layout) = self.layout {
            builder = builder.with_layout(layout);
        }
        let visible = builder.build(path, dependencies, &symbols.tree, &symbols.metadata);

        let imports = ModuleImports::collect(ast);
        let external = self
            .layout
            .map(ProjectLayout::external_libraries)
            .unwrap_or_default();
        let scope = ResolveScope {
            visible: &visible,
            imports: &imports,
            external_libs: &external,
            related_files: dependencies,
        };
        resolve(ast, &scope, &self.config.resolve, sink);
    }
}

/// Run the whole front end on one file.
///
/// Dependency tables come from `loader`; a dependency it cannot load is
/// skipped. External libraries and file descriptions come from `layout`.
pub fn compile_source<L: SymbolTableLoader + ?Sized>(
    path: &str,
    source: &str,
    loader: &L,
    dependencies: &[String],
    layout: Option<&ProjectLayout>,
    config: &DriverConfig,
) -> Result<FileReport, DriverError> {
    let mut queue = IssueQueue::with_config(config.issues.clone());
    let ast = parse_source(path, source, &mut queue)?;
    let symbols = build_symbols(&ast, &config.resolve, &mut queue);

    let session = Session {
        loader,
        layout,
        config,
    };
    session.analyze(path, &ast, &symbols, dependencies, &mut queue);

    Ok(FileReport {
        path: path.to_string(),
        ast,
        symbols,
        diagnostics: queue.flush(),
    })
}
