//! Per-thread checker state over a shared [`Session`].
//!
//! A `Checker` owns nothing the session needs after it is dropped: every
//! context-independent result it computes goes into the session caches, and
//! everything that depends on where it was asked from (in-progress markers,
//! speculative overlays, the diagnostics of the current statement) stays
//! here.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;
use tyck_ast::types::{FileId, NodeId, SymbolFlags, SymbolId};
use tyck_ast::{NodeData, SyntaxKind, SyntaxTree};
use tyck_binder::{BoundFile, Declaration, Symbol, SymbolLookup};
use tyck_core::intern::InternedString;
use tyck_diagnostics::{Diagnostic, DiagnosticMessage};
use tyck_options::CheckerOptions;

use crate::error::CheckerError;
use crate::interner::TypeInterner;
use crate::relation::RelationState;
use crate::session::Session;
use crate::types::{NodeRef, SignatureId, TypeId};

/// A computation that can be re-entered through a cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Resolving {
    DeclaredType(SymbolId),
    SymbolType(SymbolId),
    BaseTypes(SymbolId),
    ReturnType(SignatureId),
}

/// Where reported diagnostics go.
#[derive(Debug)]
pub(crate) enum Frame {
    Collect(Vec<Diagnostic>),
    Discard,
}

/// Results that depend on a speculative contextual type. They shadow the
/// session caches until the speculation ends.
#[derive(Debug, Default)]
pub(crate) struct Overlay {
    pub symbol_types: FxHashMap<SymbolId, TypeId>,
    pub return_types: FxHashMap<SignatureId, TypeId>,
    pub resolved_signatures: FxHashMap<NodeRef, Option<SignatureId>>,
    pub contextual: FxHashMap<NodeRef, TypeId>,
}

pub struct Checker<'s> {
    pub(crate) session: &'s Session,
    pub(crate) frames: Vec<Frame>,
    pub(crate) resolving: Vec<Resolving>,
    pub(crate) circular: FxHashSet<Resolving>,
    pub(crate) overlays: Vec<Overlay>,
    pub(crate) relation: RelationState,
    pub(crate) resolved_signatures: FxHashMap<NodeRef, Option<SignatureId>>,
    pub(crate) resolving_calls: FxHashSet<NodeRef>,
    pub(crate) members_pending: FxHashSet<TypeId>,
    pub(crate) variance_pending: FxHashSet<TypeId>,
    pub(crate) constraint_pending: FxHashSet<TypeId>,
    pub(crate) generic_types: FxHashMap<TypeId, bool>,
    pub(crate) instantiation_depth: u32,
    pub(crate) instantiation_count: u32,
    pub(crate) reported_deep_instantiation: bool,
    /// The first internal invariant violation hit by this checker.
    pub(crate) fatal: Option<CheckerError>,
    pub(crate) flow_loops: Vec<crate::flow::LoopFrame>,
    pub(crate) display_depth: u32,
    /// Diagnostics of resolved calls, replayed when the call is checked.
    pub(crate) call_diagnostics: FxHashMap<NodeRef, Vec<Diagnostic>>,
    /// The statement being checked; anchors errors with no better node.
    pub(crate) current_site: Option<NodeRef>,
}

impl<'s> Checker<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self {
            session,
            frames: Vec::new(),
            resolving: Vec::new(),
            circular: FxHashSet::default(),
            overlays: Vec::new(),
            relation: RelationState::default(),
            resolved_signatures: FxHashMap::default(),
            resolving_calls: FxHashSet::default(),
            members_pending: FxHashSet::default(),
            variance_pending: FxHashSet::default(),
            constraint_pending: FxHashSet::default(),
            generic_types: FxHashMap::default(),
            instantiation_depth: 0,
            instantiation_count: 0,
            reported_deep_instantiation: false,
            fatal: None,
            flow_loops: Vec::new(),
            display_depth: 0,
            call_diagnostics: FxHashMap::default(),
            current_site: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub(crate) fn tree(&self, file: FileId) -> &'s SyntaxTree {
        let session: &'s Session = self.session;
        &session.files[file.index()].tree
    }

    #[inline]
    pub(crate) fn bound(&self, file: FileId) -> &'s BoundFile {
        let session: &'s Session = self.session;
        &session.files[file.index()]
    }

    #[inline]
    pub(crate) fn symbol(&self, id: SymbolId) -> &'s Symbol {
        let session: &'s Session = self.session;
        session.linked.symbol(id)
    }

    #[inline]
    pub(crate) fn resolve_merged(&self, id: SymbolId) -> SymbolId {
        self.session.linked.resolve(id)
    }

    #[inline]
    pub(crate) fn types(&self) -> &'s TypeInterner {
        let session: &'s Session = self.session;
        &session.types
    }

    #[inline]
    pub(crate) fn options(&self) -> &'s CheckerOptions {
        let session: &'s Session = self.session;
        &session.options
    }

    #[inline]
    pub(crate) fn strict_null_checks(&self) -> bool {
        self.session.options.strict_null_checks()
    }

    #[inline]
    pub(crate) fn text(&self, name: InternedString) -> &'s str {
        let session: &'s Session = self.session;
        session.interner.resolve(name)
    }

    #[inline]
    pub(crate) fn intern(&self, text: &str) -> InternedString {
        self.session.interner.intern(text)
    }

    #[inline]
    pub(crate) fn kind(&self, file: FileId, node: NodeId) -> SyntaxKind {
        self.tree(file).kind(node)
    }

    #[inline]
    pub(crate) fn data(&self, file: FileId, node: NodeId) -> &'s NodeData {
        &self.tree(file).node(node).data
    }

    #[inline]
    pub(crate) fn parent(&self, file: FileId, node: NodeId) -> Option<NodeId> {
        self.tree(file).parent(node)
    }

    pub(crate) fn node_symbol(&self, file: FileId, node: NodeId) -> Option<SymbolId> {
        self.bound(file).symbol_of(node).map(|s| self.resolve_merged(s))
    }

    pub(crate) fn symbol_text(&self, symbol: SymbolId) -> &'s str {
        self.text(self.symbol(symbol).name)
    }

    /// Display name of a symbol, with quotes stripped from ambient modules.
    pub fn symbol_name(&self, symbol: SymbolId) -> String {
        let name = self.symbol_text(symbol);
        name.trim_matches('"').to_string()
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.session.is_cancelled()
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    pub(crate) fn diagnostic(&self, file: FileId, node: NodeId, message: &DiagnosticMessage, args: &[&str]) -> Diagnostic {
        let tree = self.tree(file);
        Diagnostic::with_location(tree.file_name(), tree.range(node), message, args)
    }

    /// Report into the current frame.
    pub(crate) fn error(&mut self, file: FileId, node: NodeId, message: &DiagnosticMessage, args: &[&str]) {
        if let Some(Frame::Collect(_)) = self.frames.last() {
            let diagnostic = self.diagnostic(file, node, message, args);
            self.push_diagnostic(diagnostic);
        }
    }

    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        if let Some(Frame::Collect(diagnostics)) = self.frames.last_mut() {
            diagnostics.push(diagnostic);
        }
    }

    pub(crate) fn is_reporting(&self) -> bool {
        matches!(self.frames.last(), Some(Frame::Collect(_)))
    }

    /// Attach a diagnostic to its file directly. Used for results cached in
    /// the session, whose first computation may happen anywhere.
    pub(crate) fn publish(&self, file: FileId, node: NodeId, message: &DiagnosticMessage, args: &[&str]) {
        if self.overlays.is_empty() {
            self.session.publish(vec![self.diagnostic(file, node, message, args)]);
        }
    }

    /// Run `f` collecting its diagnostics.
    pub(crate) fn collecting<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> (R, Vec<Diagnostic>) {
        self.frames.push(Frame::Collect(Vec::new()));
        let result = f(self);
        let diagnostics = match self.frames.pop() {
            Some(Frame::Collect(diagnostics)) => diagnostics,
            _ => Vec::new(),
        };
        (result, diagnostics)
    }

    pub(crate) fn discarding<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.frames.push(Frame::Discard);
        let result = f(self);
        self.frames.pop();
        result
    }

    // ========================================================================
    // Speculation
    // ========================================================================

    pub(crate) fn is_speculating(&self) -> bool {
        !self.overlays.is_empty()
    }

    /// Run `f` with contextual types overridden and context-dependent
    /// results kept out of the session. Diagnostics are discarded.
    ///
    /// Computations in progress outside do not count as cycles inside: a
    /// parameter whose type is being resolved through its call is typed
    /// afresh from the overlay. Re-entry is bounded by `resolving_calls`.
    pub(crate) fn speculate<R>(
        &mut self,
        contextual: FxHashMap<NodeRef, TypeId>,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        self.overlays.push(Overlay {
            contextual,
            ..Overlay::default()
        });
        let outer = std::mem::take(&mut self.resolving);
        let result = self.discarding(f);
        self.resolving = outer;
        self.overlays.pop();
        result
    }

    /// Whether a result for the declaration at `node` may depend on a
    /// contextual type that is not final yet.
    fn is_provisional(&self, file: FileId, node: NodeId) -> bool {
        (self.is_speculating() || !self.resolving_calls.is_empty()) && self.is_context_dependent(file, node)
    }

    pub(crate) fn overlay_contextual(&self, node: NodeRef) -> Option<TypeId> {
        self.overlays.iter().rev().find_map(|o| o.contextual.get(&node).copied())
    }

    /// Whether `node` is, or sits inside, a function whose parameters may be
    /// typed by context.
    pub(crate) fn is_context_dependent(&self, file: FileId, node: NodeId) -> bool {
        let tree = self.tree(file);
        std::iter::once(node)
            .chain(tree.ancestors(node))
            .any(|n| self.is_contextually_typed_function(file, n))
    }

    pub(crate) fn is_contextually_typed_function(&self, file: FileId, node: NodeId) -> bool {
        match self.kind(file, node) {
            SyntaxKind::FunctionExpression | SyntaxKind::ArrowFunction => true,
            SyntaxKind::MethodDeclaration => self
                .parent(file, node)
                .is_some_and(|p| self.kind(file, p) == SyntaxKind::ObjectLiteralExpression),
            _ => false,
        }
    }

    pub(crate) fn cached_symbol_type(&self, symbol: SymbolId) -> Option<TypeId> {
        self.overlays
            .iter()
            .rev()
            .find_map(|o| o.symbol_types.get(&symbol).copied())
            .or_else(|| self.session.caches.symbol_types.get(&symbol).map(|t| *t))
    }

    /// Store a symbol type; returns whether this call published it.
    pub(crate) fn store_symbol_type(&mut self, symbol: SymbolId, ty: TypeId) -> (TypeId, bool) {
        let dependent = self
            .symbol(symbol)
            .first_declaration()
            .is_some_and(|d| self.is_provisional(d.file, d.node));
        if dependent {
            if let Some(overlay) = self.overlays.last_mut() {
                overlay.symbol_types.insert(symbol, ty);
            }
            return (ty, false);
        }
        let mut inserted = false;
        let stored = *self.session.caches.symbol_types.entry(symbol).or_insert_with(|| {
            inserted = true;
            ty
        });
        (stored, inserted)
    }

    pub(crate) fn cached_return_type(&self, signature: SignatureId) -> Option<TypeId> {
        self.overlays
            .iter()
            .rev()
            .find_map(|o| o.return_types.get(&signature).copied())
            .or_else(|| self.session.caches.return_types.get(&signature).map(|t| *t))
    }

    pub(crate) fn store_return_type(&mut self, signature: SignatureId, ty: TypeId) -> TypeId {
        let dependent = self
            .session
            .signature(signature)
            .declaration
            .is_some_and(|d| self.is_provisional(d.file, d.node));
        if dependent {
            if let Some(overlay) = self.overlays.last_mut() {
                overlay.return_types.insert(signature, ty);
            }
            return ty;
        }
        *self.session.caches.return_types.entry(signature).or_insert(ty)
    }

    pub(crate) fn cached_resolved_signature(&self, call: NodeRef) -> Option<Option<SignatureId>> {
        self.overlays
            .iter()
            .rev()
            .find_map(|o| o.resolved_signatures.get(&call).copied())
            .or_else(|| self.resolved_signatures.get(&call).copied())
    }

    pub(crate) fn store_resolved_signature(&mut self, call: NodeRef, signature: Option<SignatureId>) {
        match self.overlays.last_mut() {
            Some(overlay) => {
                overlay.resolved_signatures.insert(call, signature);
            }
            None => {
                self.resolved_signatures.insert(call, signature);
            }
        }
    }

    // ========================================================================
    // Cycles
    // ========================================================================

    /// Enter `key`. On re-entry, every computation from the first
    /// occurrence up is marked circular and `false` is returned.
    pub(crate) fn push_resolving(&mut self, key: Resolving) -> bool {
        if let Some(position) = self.resolving.iter().position(|&r| r == key) {
            debug!(?key, depth = self.resolving.len() - position, "circular resolution");
            for &entry in &self.resolving[position..] {
                self.circular.insert(entry);
            }
            return false;
        }
        self.resolving.push(key);
        true
    }

    /// Leave the innermost computation; returns whether it was circular.
    pub(crate) fn pop_resolving(&mut self) -> bool {
        match self.resolving.pop() {
            Some(key) => self.circular.remove(&key),
            None => false,
        }
    }

    // ========================================================================
    // Point queries
    // ========================================================================

    /// The symbol a node refers to or declares.
    pub fn get_symbol_at_location(&mut self, file: FileId, node: NodeId) -> Option<SymbolId> {
        if file.index() >= self.session.files.len() || node.index() >= self.tree(file).len() {
            return None;
        }
        let tree = self.tree(file);
        match tree.kind(node) {
            SyntaxKind::Identifier => self.symbol_of_identifier(file, node),
            SyntaxKind::PropertyAccessExpression => match self.data(file, node) {
                NodeData::Access { name, .. } => self.symbol_of_identifier(file, *name),
                _ => None,
            },
            SyntaxKind::ThisKeyword => self
                .this_container_class(file, node)
                .and_then(|class| self.node_symbol(file, class)),
            _ => self.node_symbol(file, node),
        }
    }

    fn symbol_of_identifier(&mut self, file: FileId, node: NodeId) -> Option<SymbolId> {
        let tree = self.tree(file);
        let name = tree.name_of(node)?;
        let parent = tree.parent(node)?;
        if tree.declaration_name(parent) == Some(node) {
            if let Some(symbol) = self.node_symbol(file, parent) {
                return Some(symbol);
            }
        }
        // Parameter properties are declared through their name.
        if let Some(symbol) = self.node_symbol(file, node) {
            return Some(symbol);
        }
        match (tree.kind(parent), self.data(file, parent)) {
            (SyntaxKind::PropertyAccessExpression, NodeData::Access { expression, name: member })
                if *member == node =>
            {
                let object = self.get_type_at_location(file, *expression);
                self.property_of_type(object, name).and_then(|p| p.symbol)
            }
            (SyntaxKind::QualifiedName, NodeData::QualifiedName { right, .. }) if *right == node => {
                let meaning = if self.is_in_type_position(file, parent) {
                    SymbolFlags::TYPE | SymbolFlags::NAMESPACE
                } else {
                    SymbolFlags::VALUE | SymbolFlags::NAMESPACE
                };
                self.resolve_entity_name(file, parent, meaning, false)
            }
            (SyntaxKind::PropertyAssignment | SyntaxKind::ShorthandPropertyAssignment, _) => {
                self.node_symbol(file, parent)
            }
            _ => {
                let meaning = if self.is_in_type_position(file, node) {
                    SymbolFlags::TYPE | SymbolFlags::NAMESPACE
                } else {
                    SymbolFlags::VALUE | SymbolFlags::NAMESPACE
                };
                let symbol = self.resolve_name(file, node, name, meaning)?;
                Some(self.resolve_alias_or_self(symbol))
            }
        }
    }

    /// The type of a node: the narrowed type of an expression, the type a
    /// type node denotes, or the declared type of a declaration name.
    pub fn get_type_at_location(&mut self, file: FileId, node: NodeId) -> TypeId {
        if file.index() >= self.session.files.len() || node.index() >= self.tree(file).len() {
            return TypeId::ERROR;
        }
        self.discarding(|checker| checker.type_at_location(file, node))
    }

    fn type_at_location(&mut self, file: FileId, node: NodeId) -> TypeId {
        let tree = self.tree(file);
        let kind = tree.kind(node);
        let heritage_type = kind == SyntaxKind::ExpressionWithTypeArguments && self.is_in_type_position(file, node);
        if kind.is_type_node() || heritage_type {
            return self.type_from_type_node(file, node);
        }
        if kind == SyntaxKind::Identifier {
            if let Some(parent) = tree.parent(node) {
                if tree.declaration_name(parent) == Some(node) {
                    return self.type_of_declaration_node(file, parent);
                }
                if self.is_in_type_position(file, node) {
                    if let Some(reference) = self.enclosing_type_reference(file, node) {
                        return self.type_from_type_node(file, reference);
                    }
                }
                if let NodeData::Access { name, .. } = self.data(file, parent) {
                    if *name == node && tree.kind(parent) == SyntaxKind::PropertyAccessExpression {
                        return self.check_expression(file, parent);
                    }
                }
            }
        }
        if kind.is_declaration() || matches!(kind, SyntaxKind::Parameter | SyntaxKind::TypeParameter) {
            return self.type_of_declaration_node(file, node);
        }
        if self.is_expression_node(file, node) {
            return self.check_expression(file, node);
        }
        TypeId::ERROR
    }

    fn type_of_declaration_node(&mut self, file: FileId, declaration: NodeId) -> TypeId {
        let Some(symbol) = self.node_symbol(file, declaration) else {
            return match self.kind(file, declaration) {
                SyntaxKind::FunctionExpression | SyntaxKind::ArrowFunction => self.check_expression(file, declaration),
                _ => TypeId::ERROR,
            };
        };
        let flags = self.symbol(symbol).flags;
        if flags.intersects(SymbolFlags::VALUE) || flags.contains(SymbolFlags::ALIAS) {
            self.symbol_type(symbol)
        } else {
            self.declared_type(symbol)
        }
    }

    /// The flow type of `symbol` at `node`.
    pub fn get_flow_type(&mut self, file: FileId, node: NodeId, symbol: SymbolId) -> TypeId {
        if file.index() >= self.session.files.len() || node.index() >= self.tree(file).len() {
            return TypeId::ERROR;
        }
        let symbol = self.resolve_merged(symbol);
        self.discarding(|checker| {
            let declared = checker.symbol_type(symbol);
            let Some(flow) = checker.flow_position(file, node) else {
                return declared;
            };
            let key = crate::flow::ReferenceKey::symbol(symbol);
            checker.flow_type_of_reference(file, node, &key, declared, declared, flow)
        })
    }

    // ========================================================================
    // Syntax helpers
    // ========================================================================

    pub(crate) fn is_expression_node(&self, file: FileId, node: NodeId) -> bool {
        use SyntaxKind::*;
        let kind = self.kind(file, node);
        match kind {
            NumericLiteral | BigIntLiteral | StringLiteral | NoSubstitutionTemplateLiteral | TrueKeyword
            | FalseKeyword | NullKeyword | ThisKeyword | SuperKeyword | ArrayLiteralExpression
            | ObjectLiteralExpression | PropertyAccessExpression | ElementAccessExpression | CallExpression
            | NewExpression | ParenthesizedExpression | FunctionExpression | ArrowFunction | DeleteExpression
            | TypeOfExpression | VoidExpression | PrefixUnaryExpression | PostfixUnaryExpression
            | BinaryExpression | ConditionalExpression | TemplateExpression | SpreadElement | OmittedExpression
            | AsExpression | SatisfiesExpression | NonNullExpression => true,
            Identifier => !self.is_in_type_position(file, node),
            _ => false,
        }
    }

    /// Whether `node` sits in a type annotation rather than an expression.
    pub(crate) fn is_in_type_position(&self, file: FileId, node: NodeId) -> bool {
        let tree = self.tree(file);
        match tree.kind(node) {
            kind if kind.is_type_node() => return true,
            SyntaxKind::ExpressionWithTypeArguments => return self.is_type_heritage(file, node),
            _ => {}
        }
        for ancestor in tree.ancestors(node) {
            match tree.kind(ancestor) {
                SyntaxKind::TypeQuery => return false,
                SyntaxKind::QualifiedName | SyntaxKind::PropertyAccessExpression => continue,
                SyntaxKind::ExpressionWithTypeArguments => return self.is_type_heritage(file, ancestor),
                kind => return kind.is_type_node(),
            }
        }
        false
    }

    /// Interface `extends` and class `implements` name types. Class
    /// `extends` names a value.
    fn is_type_heritage(&self, file: FileId, expression: NodeId) -> bool {
        self.heritage_token(file, expression) != Some(SyntaxKind::ExtendsKeyword)
            || self.is_interface_heritage(file, expression)
    }

    fn heritage_token(&self, file: FileId, expression: NodeId) -> Option<SyntaxKind> {
        let clause = self.parent(file, expression)?;
        match self.data(file, clause) {
            NodeData::HeritageClause { token, .. } => Some(*token),
            _ => None,
        }
    }

    fn is_interface_heritage(&self, file: FileId, expression: NodeId) -> bool {
        self.parent(file, expression)
            .and_then(|clause| self.parent(file, clause))
            .is_some_and(|decl| self.kind(file, decl) == SyntaxKind::InterfaceDeclaration)
    }

    fn enclosing_type_reference(&self, file: FileId, node: NodeId) -> Option<NodeId> {
        let tree = self.tree(file);
        tree.ancestors(node).find(|&a| {
            matches!(
                tree.kind(a),
                SyntaxKind::TypeReference | SyntaxKind::ExpressionWithTypeArguments | SyntaxKind::TypeQuery
            )
        })
    }

    /// The class whose instance `this` denotes at `node`, if any.
    pub(crate) fn this_container_class(&self, file: FileId, node: NodeId) -> Option<NodeId> {
        let tree = self.tree(file);
        for ancestor in tree.ancestors(node) {
            match tree.kind(ancestor) {
                SyntaxKind::ArrowFunction => continue,
                SyntaxKind::ClassDeclaration => return Some(ancestor),
                SyntaxKind::FunctionDeclaration | SyntaxKind::FunctionExpression => return None,
                SyntaxKind::MethodDeclaration
                | SyntaxKind::Constructor
                | SyntaxKind::GetAccessor
                | SyntaxKind::SetAccessor
                | SyntaxKind::PropertyDeclaration => {
                    let parent = tree.parent(ancestor)?;
                    return (tree.kind(parent) == SyntaxKind::ClassDeclaration).then_some(parent);
                }
                _ => {}
            }
        }
        None
    }

    /// Whether the member containing `node` is static.
    pub(crate) fn is_in_static_member(&self, file: FileId, node: NodeId) -> bool {
        let tree = self.tree(file);
        tree.ancestors(node)
            .find(|&a| {
                matches!(
                    tree.kind(a),
                    SyntaxKind::MethodDeclaration
                        | SyntaxKind::PropertyDeclaration
                        | SyntaxKind::GetAccessor
                        | SyntaxKind::SetAccessor
                        | SyntaxKind::Constructor
                ) && tree.parent(a).is_some_and(|p| tree.kind(p) == SyntaxKind::ClassDeclaration)
            })
            .is_some_and(|member| tree.node(member).modifiers.contains(tyck_ast::types::ModifierFlags::STATIC))
    }

    /// The innermost function-like node containing `node`.
    pub(crate) fn containing_function(&self, file: FileId, node: NodeId) -> Option<NodeId> {
        let tree = self.tree(file);
        tree.ancestors(node).find(|&a| tree.kind(a).is_function_like_with_body())
    }

    pub(crate) fn declaration(file: FileId, node: NodeId) -> Declaration {
        Declaration { file, node }
    }
}

#[cfg(test)]
mod tests {
    use tyck_options::CheckerOptions;

    use crate::session::Session;
    use crate::types::TypeId;

    #[test]
    fn test_point_queries_are_total() {
        let session = Session::from_sources(&[("a.ts", "let x = 1;")], CheckerOptions::default());
        let mut checker = session.checker();
        let file = session.file_id("a.ts").unwrap();
        assert_eq!(
            checker.get_type_at_location(file, tyck_ast::types::NodeId(10_000)),
            TypeId::ERROR
        );
        assert_eq!(checker.get_symbol_at_location(file, tyck_ast::types::NodeId(10_000)), None);
    }

    #[test]
    fn test_resolving_marks_the_cycle() {
        let session = Session::from_sources(&[("a.ts", "")], CheckerOptions::default());
        let mut checker = session.checker();
        let a = super::Resolving::SymbolType(tyck_ast::types::SymbolId(1));
        let b = super::Resolving::SymbolType(tyck_ast::types::SymbolId(2));
        assert!(checker.push_resolving(a));
        assert!(checker.push_resolving(b));
        assert!(!checker.push_resolving(a));
        assert!(checker.pop_resolving());
        assert!(checker.pop_resolving());
        assert!(checker.resolving.is_empty());
    }
}
