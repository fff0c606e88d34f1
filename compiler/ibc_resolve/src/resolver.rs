//! `$`-reference resolution.
//!
//! References are visited in uid order, one check per reference site, so
//! the same unresolved reference used twice yields two issues.

use ibc_diagnostic::suggest::rank_similar;
use ibc_diagnostic::{Diagnostic, ErrorCode, IssueSink, Suggestion};
use ibc_fmt::node_line;
use ibc_ir::{join_path, AstNode, AstTable, NodeKind, PATH_SEPARATOR};
use ibc_symbols::{path_segments, symbol_path, VisibleSymbols};

use crate::config::ResolveConfig;
use crate::imports::ModuleImports;

/// What a file's references may resolve against.
#[derive(Clone, Copy, Debug)]
pub struct ResolveScope<'a> {
    /// Merged dependency and local symbols.
    pub visible: &'a VisibleSymbols,
    pub imports: &'a ModuleImports,
    /// Top-level packages whose references are never checked.
    pub external_libs: &'a [String],
    /// Files related by dependency; their names feed "unknown module"
    /// suggestions.
    pub related_files: &'a [String],
}

/// Dotted segments of a reference, ignoring any call or index suffix.
///
/// ```
/// # use ibc_resolve::reference_segments;
/// assert_eq!(reference_segments("numpy.array(x, y)"), ["numpy", "array"]);
/// ```
pub fn reference_segments(raw: &str) -> Vec<&str> {
    let raw = raw.trim();
    let end = raw.find(['(', '[']).unwrap_or(raw.len());
    raw[..end].split(PATH_SEPARATOR).map(str::trim).collect()
}

/// Check every reference in `ast` and record one issue per unresolved site.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = ast.len()))]
pub fn resolve(
    ast: &AstTable,
    scope: &ResolveScope<'_>,
    config: &ResolveConfig,
    sink: &mut impl IssueSink,
) {
    let resolver = Resolver { ast, scope, config };
    let mut checked = 0usize;
    let mut unresolved = 0usize;

    for node in ast.iter() {
        for raw in node_references(node) {
            checked += 1;
            if let Some(issue) = resolver.check(node, raw) {
                unresolved += 1;
                sink.record(issue);
            }
        }
    }

    tracing::debug!(checked, unresolved, "resolved references");
}

fn node_references(node: &AstNode) -> Vec<&str> {
    match &node.kind {
        NodeKind::Variable(var) => var.type_ref.iter().map(String::as_str).collect(),
        NodeKind::Function(func) => func.param_type_refs.values().map(String::as_str).collect(),
        NodeKind::BehaviorStep(step) => step.symbol_refs.iter().map(String::as_str).collect(),
        NodeKind::Root | NodeKind::Module(_) | NodeKind::Class(_) => Vec::new(),
    }
}

struct Resolver<'a> {
    ast: &'a AstTable,
    scope: &'a ResolveScope<'a>,
    config: &'a ResolveConfig,
}

impl Resolver<'_> {
    fn check(&self, node: &AstNode, raw: &str) -> Option<Diagnostic> {
        let segments = reference_segments(raw);
        match segments.as_slice() {
            ["self", rest @ ..] => self.check_self(node, raw, rest),
            [] | [_] => Some(self.issue(
                ErrorCode::E2001,
                node,
                format!("reference `${raw}$` has no scope; write it as `scope.symbol`"),
            )),
            [first, rest @ ..] => self.check_scoped(node, raw, first, rest),
        }
    }

    fn check_self(&self, node: &AstNode, raw: &str, rest: &[&str]) -> Option<Diagnostic> {
        let Some(class) = self.ast.enclosing_class(node.uid) else {
            return Some(self.issue(
                ErrorCode::E2002,
                node,
                format!("`${raw}$` uses `self` outside of a class"),
            ));
        };
        let member = rest.first()?;
        let class_path = symbol_path(self.ast, class.uid)?;
        let member_path = format!("{class_path}{PATH_SEPARATOR}{member}");
        if self.scope.visible.metadata.contains_key(&member_path) {
            return None;
        }

        let class_segments: Vec<&str> = class_path.split(PATH_SEPARATOR).collect();
        let members = self
            .scope
            .visible
            .tree
            .get_path(&class_segments)
            .into_iter()
            .flat_map(|tree| tree.names());
        let suggestions = self
            .rank(member, members)
            .into_iter()
            .map(|name| {
                Suggestion::new(format!("self.{name}"))
                    .with_description(self.describe(&format!("{class_path}{PATH_SEPARATOR}{name}")))
            })
            .collect();

        Some(
            self.issue(
                ErrorCode::E2003,
                node,
                format!("class `{class_path}` has no member `{member}` (in `${raw}$`)"),
            )
            .with_suggestions(suggestions),
        )
    }

    fn check_scoped(
        &self,
        node: &AstNode,
        raw: &str,
        first: &str,
        rest: &[&str],
    ) -> Option<Diagnostic> {
        let metadata = &self.scope.visible.metadata;

        if let Some(import) = self.scope.imports.get(first) {
            if self.is_external(import.top_level_package()) {
                return None;
            }
            let relative = join_path(rest);
            let full = format!("{}{PATH_SEPARATOR}{relative}", import.path);
            if metadata.contains_key(&full) {
                return None;
            }

            let prefix = format!("{}{PATH_SEPARATOR}", import.path);
            let members = metadata.keys().filter_map(|path| path.strip_prefix(&prefix));
            let suggestions = self
                .rank(&relative, members)
                .into_iter()
                .map(|name| {
                    Suggestion::new(format!("{first}{PATH_SEPARATOR}{name}"))
                        .with_description(self.describe(&format!("{prefix}{name}")))
                })
                .collect();

            return Some(
                self.issue(
                    ErrorCode::E2005,
                    node,
                    format!(
                        "`{relative}` not found in module `{}` (in `${raw}$`)",
                        import.path
                    ),
                )
                .with_suggestions(suggestions),
            );
        }

        if self.is_external(first) {
            return None;
        }

        // A scope that is not an import alias may still name a symbol
        // directly, e.g. a local class or a fully qualified dependency path.
        let mut full = first.to_string();
        for segment in rest {
            full.push(PATH_SEPARATOR);
            full.push_str(segment);
        }
        if metadata.contains_key(&full) {
            return None;
        }

        // TODO: a typo of a local symbol is indistinguishable from a typo of
        // a module alias here; both fall through to module suggestions.
        let candidates = self.module_candidates();
        let suggestions = self
            .rank(first, candidates.iter().map(|(name, _)| name.as_str()))
            .into_iter()
            .map(|name| {
                let description = candidates
                    .iter()
                    .find(|(candidate, _)| candidate == name)
                    .and_then(|(_, desc)| desc.clone());
                Suggestion::new(name).with_description(description)
            })
            .collect();

        Some(
            self.issue(
                ErrorCode::E2004,
                node,
                format!("unknown module `{first}` in `${raw}$`"),
            )
            .with_note("the scope is not an imported module or a visible symbol")
            .with_suggestions(suggestions),
        )
    }

    /// Import aliases, external libraries and related file names, each with
    /// a description when one is known.
    fn module_candidates(&self) -> Vec<(String, Option<String>)> {
        let mut candidates: Vec<(String, Option<String>)> = Vec::new();

        for alias in self.scope.imports.aliases() {
            let description = self
                .scope
                .imports
                .get(alias)
                .map(|import| import.description.clone())
                .filter(|d| !d.is_empty());
            candidates.push((alias.to_string(), description));
        }
        for lib in self.scope.external_libs {
            candidates.push((lib.clone(), None));
        }
        for file in self.scope.related_files {
            let segments = path_segments(file);
            if let Some(name) = segments.last() {
                candidates.push((name.clone(), self.describe(&join_path(&segments))));
            }
        }
        candidates
    }

    fn rank<'c>(&self, name: &str, candidates: impl IntoIterator<Item = &'c str>) -> Vec<&'c str> {
        rank_similar(
            name,
            candidates,
            self.config.min_similarity,
            self.config.max_suggestions,
        )
    }

    fn describe(&self, path: &str) -> Option<String> {
        self.scope
            .visible
            .metadata
            .get(path)?
            .description()
            .map(str::to_string)
    }

    fn is_external(&self, package: &str) -> bool {
        self.scope.external_libs.iter().any(|lib| lib == package)
    }

    fn issue(&self, code: ErrorCode, node: &AstNode, message: String) -> Diagnostic {
        Diagnostic::error(code)
            .with_message(message)
            .at_line(
                node.line_number,
                node_line(self.ast, node.uid).unwrap_or_default(),
            )
    }
}
