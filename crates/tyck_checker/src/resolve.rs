//! Name, alias and module-export resolution.

use rustc_hash::FxHashSet;
use tyck_ast::types::{FileId, NodeId, SymbolFlags, SymbolId};
use tyck_ast::{NodeData, SyntaxKind};
use tyck_core::intern::InternedString;
use tyck_diagnostics::messages;

use crate::checker::Checker;
use crate::session::ModuleTarget;

/// Where the members of a namespace-like name live.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Namespace {
    Symbol(SymbolId),
    /// `import * as ns` of a source file.
    File(FileId),
}

impl<'s> Checker<'s> {
    /// Resolve `name` from `location` with one of the `meaning` flags,
    /// falling back to the globals. Aliases are returned unresolved.
    pub(crate) fn resolve_name(
        &mut self,
        file: FileId,
        location: NodeId,
        name: InternedString,
        meaning: SymbolFlags,
    ) -> Option<SymbolId> {
        let linked = &self.session.linked;
        let wanted = meaning | SymbolFlags::ALIAS;
        let found = self.bound(file).resolve_name(linked, location, name, wanted).or_else(|| {
            linked
                .globals
                .get(name)
                .map(|symbol| linked.resolve(symbol))
                .filter(|&symbol| self.symbol(symbol).flags.intersects(wanted))
        })?;
        let symbol = self.resolve_merged(found);
        if self.symbol(symbol).flags.contains(SymbolFlags::ALIAS) && !meaning.contains(SymbolFlags::ALIAS) {
            if let Some(target) = self.resolve_alias(symbol) {
                if !self.symbol(target).flags.intersects(meaning) {
                    return None;
                }
            }
        }
        Some(symbol)
    }

    pub(crate) fn resolve_alias_or_self(&mut self, symbol: SymbolId) -> SymbolId {
        if self.symbol(symbol).flags.contains(SymbolFlags::ALIAS) {
            self.resolve_alias(symbol).unwrap_or(symbol)
        } else {
            symbol
        }
    }

    /// The symbol an import or export alias finally denotes.
    pub(crate) fn resolve_alias(&mut self, alias: SymbolId) -> Option<SymbolId> {
        if let Some(target) = self.session.caches.alias_targets.get(&alias) {
            return *target;
        }
        let mut seen = FxHashSet::default();
        let target = self.follow_alias(alias, &mut seen);
        *self.session.caches.alias_targets.entry(alias).or_insert(target)
    }

    fn follow_alias(&mut self, alias: SymbolId, seen: &mut FxHashSet<SymbolId>) -> Option<SymbolId> {
        if !seen.insert(alias) {
            return None;
        }
        let declaration = self.symbol(alias).first_declaration()?;
        let target = self.alias_declaration_target(declaration.file, declaration.node)?;
        let target = self.resolve_merged(target);
        if self.symbol(target).flags.contains(SymbolFlags::ALIAS) {
            self.follow_alias(target, seen)
        } else {
            Some(target)
        }
    }

    fn alias_declaration_target(&mut self, file: FileId, node: NodeId) -> Option<SymbolId> {
        let tree = self.tree(file);
        match (tree.kind(node), self.data(file, node)) {
            (SyntaxKind::ImportSpecifier, NodeData::Specifier { property_name, name }) => {
                let export_name = tree.name_of(property_name.unwrap_or(*name))?;
                let specifier = self.import_module_specifier(file, node)?;
                self.module_export(file, specifier, export_name)
            }
            (SyntaxKind::ImportClause, _) => {
                let specifier = self.import_module_specifier(file, node)?;
                self.module_export(file, specifier, self.session.names.default_export)
            }
            (SyntaxKind::NamespaceImport, _) => {
                let specifier = self.import_module_specifier(file, node)?;
                match self.session.module_target(file, specifier) {
                    ModuleTarget::Ambient(symbol) => Some(symbol),
                    _ => None,
                }
            }
            (SyntaxKind::ExportSpecifier, NodeData::Specifier { property_name, name }) => {
                let local_name = property_name.unwrap_or(*name);
                let export_name = tree.name_of(local_name)?;
                let export = tree.ancestors(node).find(|&a| tree.kind(a) == SyntaxKind::ExportDeclaration)?;
                match self.data(file, export) {
                    NodeData::Export {
                        module_specifier: Some(specifier),
                        ..
                    } => self.module_export(file, *specifier, export_name),
                    _ => self.resolve_name(
                        file,
                        local_name,
                        export_name,
                        SymbolFlags::VALUE | SymbolFlags::TYPE | SymbolFlags::NAMESPACE,
                    ),
                }
            }
            (SyntaxKind::ExportAssignment, NodeData::Expr { expression }) => {
                let name = tree.name_of(*expression).filter(|_| tree.kind(*expression) == SyntaxKind::Identifier)?;
                self.resolve_name(
                    file,
                    *expression,
                    name,
                    SymbolFlags::VALUE | SymbolFlags::TYPE | SymbolFlags::NAMESPACE,
                )
            }
            _ => None,
        }
    }

    /// Module specifier of the import declaration containing `node`.
    pub(crate) fn import_module_specifier(&self, file: FileId, node: NodeId) -> Option<NodeId> {
        let tree = self.tree(file);
        let import = std::iter::once(node)
            .chain(tree.ancestors(node))
            .find(|&a| tree.kind(a) == SyntaxKind::ImportDeclaration)?;
        match self.data(file, import) {
            NodeData::Import { module_specifier, .. } => Some(*module_specifier),
            _ => None,
        }
    }

    pub(crate) fn module_export(&mut self, file: FileId, specifier: NodeId, name: InternedString) -> Option<SymbolId> {
        match self.session.module_target(file, specifier) {
            ModuleTarget::File(target) => self.file_export(target, name, &mut FxHashSet::default()),
            ModuleTarget::Ambient(symbol) => self
                .symbol(symbol)
                .exports
                .as_ref()
                .and_then(|exports| exports.get(name))
                .map(|s| self.resolve_merged(s)),
            ModuleTarget::Missing => None,
        }
    }

    /// An export of a source file, following `export * from` chains.
    pub(crate) fn file_export(
        &mut self,
        file: FileId,
        name: InternedString,
        visited: &mut FxHashSet<FileId>,
    ) -> Option<SymbolId> {
        if !visited.insert(file) {
            return None;
        }
        let bound = self.bound(file);
        if let Some(symbol) = bound.exports.get(name) {
            return Some(self.resolve_merged(symbol));
        }
        if name == self.session.names.default_export {
            return None;
        }
        for &star in &bound.export_stars {
            let NodeData::Export {
                module_specifier: Some(specifier),
                ..
            } = self.data(file, star)
            else {
                continue;
            };
            let found = match self.session.module_target(file, *specifier) {
                ModuleTarget::File(target) => self.file_export(target, name, visited),
                ModuleTarget::Ambient(symbol) => self
                    .symbol(symbol)
                    .exports
                    .as_ref()
                    .and_then(|exports| exports.get(name))
                    .map(|s| self.resolve_merged(s)),
                ModuleTarget::Missing => None,
            };
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// The file a `import * as ns` alias stands for.
    pub(crate) fn namespace_import_file(&self, symbol: SymbolId) -> Option<FileId> {
        let declaration = self.symbol(symbol).first_declaration()?;
        if self.kind(declaration.file, declaration.node) != SyntaxKind::NamespaceImport {
            return None;
        }
        let specifier = self.import_module_specifier(declaration.file, declaration.node)?;
        match self.session.module_target(declaration.file, specifier) {
            ModuleTarget::File(target) => Some(target),
            _ => None,
        }
    }

    pub(crate) fn namespace_of(&mut self, symbol: SymbolId) -> Namespace {
        if let Some(file) = self.namespace_import_file(symbol) {
            return Namespace::File(file);
        }
        Namespace::Symbol(self.resolve_alias_or_self(symbol))
    }

    /// A member of a namespace with one of the `meaning` flags.
    pub(crate) fn namespace_member(
        &mut self,
        namespace: Namespace,
        name: InternedString,
        meaning: SymbolFlags,
    ) -> Option<SymbolId> {
        let member = match namespace {
            Namespace::File(file) => self.file_export(file, name, &mut FxHashSet::default())?,
            Namespace::Symbol(symbol) => {
                let member = self.symbol(symbol).exports.as_ref()?.get(name)?;
                self.resolve_merged(member)
            }
        };
        let resolved = self.resolve_alias_or_self(member);
        self.symbol(resolved).flags.intersects(meaning).then_some(resolved)
    }

    /// Resolve an identifier, qualified name or property-access chain used
    /// as an entity name. Reports 2304/2503/2694 when `report` is set.
    pub(crate) fn resolve_entity_name(
        &mut self,
        file: FileId,
        node: NodeId,
        meaning: SymbolFlags,
        report: bool,
    ) -> Option<SymbolId> {
        let tree = self.tree(file);
        let (left, right) = match (tree.kind(node), self.data(file, node)) {
            (SyntaxKind::Identifier, NodeData::Identifier { name }) => {
                let Some(symbol) = self.resolve_name(file, node, *name, meaning) else {
                    if report {
                        let text = self.text(*name);
                        let message = if meaning == SymbolFlags::NAMESPACE {
                            &messages::CANNOT_FIND_NAMESPACE_0
                        } else {
                            &messages::CANNOT_FIND_NAME_0
                        };
                        self.error(file, node, message, &[text]);
                    }
                    return None;
                };
                return Some(self.resolve_alias_or_self(symbol));
            }
            (SyntaxKind::QualifiedName, NodeData::QualifiedName { left, right }) => (*left, *right),
            (SyntaxKind::PropertyAccessExpression, NodeData::Access { expression, name }) => (*expression, *name),
            (SyntaxKind::ParenthesizedExpression, NodeData::Expr { expression }) => {
                return self.resolve_entity_name(file, *expression, meaning, report);
            }
            _ => return None,
        };
        let container_meaning = if meaning.intersects(SymbolFlags::VALUE) {
            SymbolFlags::NAMESPACE | SymbolFlags::VALUE_MODULE | SymbolFlags::ENUM | SymbolFlags::CLASS
        } else {
            SymbolFlags::NAMESPACE
        };
        let container = self.resolve_entity_name(file, left, container_meaning, report)?;
        let name = tree.name_of(right)?;
        let namespace = self.namespace_of(container);
        match self.namespace_member(namespace, name, meaning) {
            Some(member) => Some(member),
            None => {
                if report {
                    let left_text = tree.source_text(left).to_string();
                    let right_text = self.text(name);
                    self.error(
                        file,
                        right,
                        &messages::NAMESPACE_0_HAS_NO_EXPORTED_MEMBER_1,
                        &[&left_text, right_text],
                    );
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tyck_ast::types::SymbolFlags;
    use tyck_options::CheckerOptions;

    use crate::session::Session;

    #[test]
    fn test_import_alias_follows_reexports() {
        let session = Session::from_sources(
            &[
                ("a.ts", "export interface Point { x: number }"),
                ("b.ts", "export * from './a';"),
                ("c.ts", "import { Point } from './b'; let p: Point;"),
            ],
            CheckerOptions::default(),
        );
        let c = session.file_id("c.ts").unwrap();
        let mut checker = session.checker();
        let tree = checker.tree(c);
        let statement = tree.statements()[0];
        let clause = match &tree.node(statement).data {
            tyck_ast::NodeData::Import { import_clause, .. } => import_clause.unwrap(),
            _ => unreachable!(),
        };
        let named = match &tree.node(clause).data {
            tyck_ast::NodeData::ImportClause { named_bindings, .. } => named_bindings.unwrap(),
            _ => unreachable!(),
        };
        let specifier = tree.list(named)[0];
        let alias = checker.node_symbol(c, specifier).unwrap();
        let target = checker.resolve_alias(alias).unwrap();
        assert!(checker.symbol(target).flags.contains(SymbolFlags::INTERFACE));
        assert_eq!(checker.symbol_name(target), "Point");
    }
}
