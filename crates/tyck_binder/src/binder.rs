//! The binder walks a file once, in source order. It declares symbols,
//! merges declarations that share a name and meaning, opens scopes, and
//! builds the control-flow graph the checker narrows with.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};
use tracing::{debug_span, trace};
use tyck_ast::{FileId, ModifierFlags, NodeData, NodeFlags, NodeId, SymbolFlags, SymbolId, SyntaxKind, SyntaxTree};
use tyck_core::intern::{InternedString, StringInterner};
use tyck_diagnostics::{messages, Diagnostic, DiagnosticMessage};

use crate::flow::{FlowGraph, FlowId, FlowKind};
use crate::names;
use crate::scope::{Scope, ScopeId, ScopeKind};
use crate::symbol::{Declaration, Symbol, SymbolTable};

/// The binder's output for one file.
#[derive(Debug)]
pub struct BoundFile {
    pub file_id: FileId,
    pub tree: Arc<SyntaxTree>,
    pub root_scope: ScopeId,
    pub scopes: Vec<Scope>,
    /// Symbols declared by this file. Emptied when the file is linked into a
    /// session-wide arena; ids then start at `symbol_base`.
    pub symbols: Vec<Symbol>,
    pub symbol_base: u32,
    pub symbol_count: u32,
    /// Declaration nodes (and anonymous type/object/function nodes) to their
    /// symbols.
    pub node_symbols: FxHashMap<NodeId, SymbolId>,
    pub node_scopes: FxHashMap<NodeId, ScopeId>,
    pub flow: FlowGraph,
    /// Flow position of references, statements and function expressions.
    pub node_flow: FxHashMap<NodeId, FlowId>,
    /// Flow at the closing brace of each function body.
    pub function_end_flow: FxHashMap<NodeId, FlowId>,
    pub is_module: bool,
    pub exports: SymbolTable,
    /// `export * from` declarations.
    pub export_stars: Vec<NodeId>,
    /// Module specifier nodes of imports and re-exports, in source order.
    pub imports: Vec<NodeId>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Read access to symbols by id, implemented by a bound file and by the
/// linked session arena.
pub trait SymbolLookup {
    fn symbol(&self, id: SymbolId) -> &Symbol;
}

impl SymbolLookup for BoundFile {
    fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[(id.0 - self.symbol_base) as usize]
    }
}

impl BoundFile {
    #[inline]
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    #[inline]
    pub fn symbol_of(&self, node: NodeId) -> Option<SymbolId> {
        self.node_symbols.get(&node).copied()
    }

    #[inline]
    pub fn flow_of(&self, node: NodeId) -> Option<FlowId> {
        self.node_flow.get(&node).copied()
    }

    /// The innermost scope whose node is a proper ancestor of `node`.
    pub fn enclosing_scope(&self, node: NodeId) -> ScopeId {
        self.tree
            .ancestors(node)
            .find_map(|ancestor| self.node_scopes.get(&ancestor).copied())
            .unwrap_or(self.root_scope)
    }

    /// Resolve `name` with one of the `meaning` flags from `location`,
    /// walking scopes outwards. Namespace scopes also see their symbol's
    /// exports, which may come from other declarations of the namespace.
    pub fn resolve_name(
        &self,
        symbols: &impl SymbolLookup,
        location: NodeId,
        name: InternedString,
        meaning: SymbolFlags,
    ) -> Option<SymbolId> {
        let mut current = Some(self.enclosing_scope(location));
        while let Some(id) = current {
            let scope = self.scope(id);
            if let Some(symbol) = scope.locals.get(name) {
                if symbols.symbol(symbol).flags.intersects(meaning) {
                    return Some(symbol);
                }
            }
            if let Some(container) = scope.container {
                let exported = symbols.symbol(container).exports.as_ref().and_then(|e| e.get(name));
                if let Some(symbol) = exported {
                    if symbols.symbol(symbol).flags.intersects(meaning) {
                        return Some(symbol);
                    }
                }
            }
            current = scope.parent;
        }
        None
    }

    /// Add `offset` to every symbol id recorded for this file.
    pub fn rebase(&mut self, offset: u32) {
        if offset == 0 {
            return;
        }
        self.symbol_base += offset;
        for symbol in &mut self.symbols {
            symbol.rebase(offset);
        }
        for id in self.node_symbols.values_mut() {
            id.0 += offset;
        }
        for scope in &mut self.scopes {
            scope.locals.rebase(offset);
            if let Some(container) = &mut scope.container {
                container.0 += offset;
            }
        }
        self.exports.rebase(offset);
    }

    /// Move the symbols out, leaving ids valid against the receiving arena.
    pub fn take_symbols(&mut self) -> Vec<Symbol> {
        std::mem::take(&mut self.symbols)
    }
}

/// Bind one parsed file.
pub fn bind_file(file_id: FileId, tree: Arc<SyntaxTree>) -> BoundFile {
    let _span = debug_span!("bind", file = tree.file_name()).entered();
    let mut binder = Binder::new(file_id, &tree);
    binder.bind_source_file();
    let bound = BoundFile {
        file_id,
        tree: Arc::clone(&tree),
        root_scope: ScopeId(0),
        symbol_count: binder.symbols.len() as u32,
        scopes: binder.scopes,
        symbols: binder.symbols,
        symbol_base: 0,
        node_symbols: binder.node_symbols,
        node_scopes: binder.node_scopes,
        flow: binder.flow,
        node_flow: binder.node_flow,
        function_end_flow: binder.function_end_flow,
        is_module: binder.is_module,
        exports: binder.exports,
        export_stars: binder.export_stars,
        imports: binder.imports,
        diagnostics: binder.diagnostics,
    };
    trace!(
        symbols = bound.symbol_count,
        scopes = bound.scopes.len(),
        flow_nodes = bound.flow.len(),
        "bound file"
    );
    bound
}

/// Where a declaration lands.
#[derive(Debug, Clone, Copy)]
enum Table {
    Locals(ScopeId),
    Members(SymbolId),
    Exports(SymbolId),
    FileExports,
}

#[derive(Debug)]
struct ActiveLabel {
    name: InternedString,
    break_target: FlowId,
    continue_target: Option<FlowId>,
}

/// Interned special names.
struct Names {
    constructor: InternedString,
    call: InternedString,
    new: InternedString,
    index: InternedString,
    type_literal: InternedString,
    object_literal: InternedString,
    function: InternedString,
    default_export: InternedString,
    export_equals: InternedString,
    this: InternedString,
}

impl Names {
    fn new(interner: &StringInterner) -> Self {
        Self {
            constructor: interner.intern_static(names::CONSTRUCTOR),
            call: interner.intern_static(names::CALL),
            new: interner.intern_static(names::NEW),
            index: interner.intern_static(names::INDEX),
            type_literal: interner.intern_static(names::TYPE_LITERAL),
            object_literal: interner.intern_static(names::OBJECT_LITERAL),
            function: interner.intern_static(names::FUNCTION),
            default_export: interner.intern_static(names::DEFAULT_EXPORT),
            export_equals: interner.intern_static(names::EXPORT_EQUALS),
            this: interner.intern_static("this"),
        }
    }
}

struct Binder<'a> {
    file_id: FileId,
    tree: &'a SyntaxTree,
    interner: StringInterner,
    names: Names,

    symbols: Vec<Symbol>,
    scopes: Vec<Scope>,
    current_scope: ScopeId,
    node_symbols: FxHashMap<NodeId, SymbolId>,
    node_scopes: FxHashMap<NodeId, ScopeId>,

    flow: FlowGraph,
    current_flow: FlowId,
    node_flow: FxHashMap<NodeId, FlowId>,
    function_end_flow: FxHashMap<NodeId, FlowId>,
    break_target: Option<FlowId>,
    continue_target: Option<FlowId>,
    true_target: Option<FlowId>,
    false_target: Option<FlowId>,
    labels: Vec<ActiveLabel>,

    /// Scope receiving `infer` type parameters while binding the extends
    /// clause of a conditional type.
    infer_scope: Option<ScopeId>,
    in_type: bool,

    is_module: bool,
    exports: SymbolTable,
    export_stars: Vec<NodeId>,
    imports: Vec<NodeId>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Binder<'a> {
    fn new(file_id: FileId, tree: &'a SyntaxTree) -> Self {
        let interner = tree.interner().clone();
        let names = Names::new(&interner);
        Self {
            file_id,
            tree,
            interner,
            names,
            symbols: Vec::new(),
            scopes: Vec::new(),
            current_scope: ScopeId(0),
            node_symbols: FxHashMap::default(),
            node_scopes: FxHashMap::default(),
            flow: FlowGraph::new(),
            current_flow: FlowGraph::UNREACHABLE,
            node_flow: FxHashMap::default(),
            function_end_flow: FxHashMap::default(),
            break_target: None,
            continue_target: None,
            true_target: None,
            false_target: None,
            labels: Vec::new(),
            infer_scope: None,
            in_type: false,
            is_module: false,
            exports: SymbolTable::new(),
            export_stars: Vec::new(),
            imports: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    // ========================================================================
    // Source file binding
    // ========================================================================

    fn bind_source_file(&mut self) {
        let tree = self.tree;
        self.is_module = tree.statements().iter().any(|&stmt| {
            matches!(
                tree.kind(stmt),
                SyntaxKind::ImportDeclaration | SyntaxKind::ExportDeclaration | SyntaxKind::ExportAssignment
            ) || tree.node(stmt).modifiers.contains(ModifierFlags::EXPORT)
        });
        let kind = if self.is_module { ScopeKind::Module } else { ScopeKind::Global };
        self.scopes.push(Scope::new(kind, None, SyntaxTree::ROOT));
        self.node_scopes.insert(SyntaxTree::ROOT, ScopeId(0));
        self.current_flow = self.flow.add(FlowKind::Start, SmallVec::new(), None);
        for &stmt in tree.statements() {
            self.bind(stmt);
        }
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    fn bind(&mut self, node: NodeId) {
        let tree = self.tree;
        let kind = tree.kind(node);
        if kind.is_statement() {
            self.node_flow.insert(node, self.current_flow);
        }
        match kind {
            // Declarations
            SyntaxKind::VariableStatement => self.bind_children(node),
            SyntaxKind::VariableDeclarationList => self.bind_children(node),
            SyntaxKind::VariableDeclaration => self.bind_variable_declaration(node),
            SyntaxKind::FunctionDeclaration => self.bind_function_declaration(node),
            SyntaxKind::ClassDeclaration => self.bind_class_declaration(node),
            SyntaxKind::InterfaceDeclaration => self.bind_interface_declaration(node),
            SyntaxKind::TypeAliasDeclaration => self.bind_type_alias(node),
            SyntaxKind::EnumDeclaration => self.bind_enum_declaration(node),
            SyntaxKind::ModuleDeclaration => self.bind_module_declaration(node),
            SyntaxKind::ImportDeclaration => self.bind_import_declaration(node),
            SyntaxKind::ExportDeclaration => self.bind_export_declaration(node),
            SyntaxKind::ExportAssignment => self.bind_export_assignment(node),

            // Control flow
            SyntaxKind::Block => self.bind_block(node),
            SyntaxKind::ExpressionStatement => self.bind_expression_statement(node),
            SyntaxKind::IfStatement => self.bind_if_statement(node),
            SyntaxKind::WhileStatement => self.bind_while_statement(node),
            SyntaxKind::DoStatement => self.bind_do_statement(node),
            SyntaxKind::ForStatement => self.bind_for_statement(node),
            SyntaxKind::ForInStatement | SyntaxKind::ForOfStatement => self.bind_for_in_or_of_statement(node),
            SyntaxKind::ReturnStatement | SyntaxKind::ThrowStatement => {
                self.bind_children(node);
                self.current_flow = FlowGraph::UNREACHABLE;
            }
            SyntaxKind::BreakStatement | SyntaxKind::ContinueStatement => self.bind_break_or_continue(node),
            SyntaxKind::SwitchStatement => self.bind_switch_statement(node),
            SyntaxKind::LabeledStatement => self.bind_labeled_statement(node),
            SyntaxKind::TryStatement => self.bind_try_statement(node),

            // Expressions
            SyntaxKind::Identifier | SyntaxKind::ThisKeyword | SyntaxKind::SuperKeyword => {
                if !self.in_type || tree.parent(node).is_some_and(|p| tree.kind(p) == SyntaxKind::TypeQuery) {
                    self.node_flow.insert(node, self.current_flow);
                }
            }
            SyntaxKind::PropertyAccessExpression => {
                if let NodeData::Access { expression, .. } = tree.node(node).data {
                    self.bind(expression);
                }
                self.node_flow.insert(node, self.current_flow);
            }
            SyntaxKind::ElementAccessExpression => {
                self.bind_children(node);
                self.node_flow.insert(node, self.current_flow);
            }
            SyntaxKind::BinaryExpression => self.bind_binary_expression(node),
            SyntaxKind::PrefixUnaryExpression => self.bind_prefix_unary_expression(node),
            SyntaxKind::PostfixUnaryExpression => {
                if let NodeData::Unary { operand, .. } = tree.node(node).data {
                    self.bind(operand);
                    self.bind_assignment_target_flow(operand);
                }
            }
            SyntaxKind::ConditionalExpression => self.bind_conditional_expression(node),
            SyntaxKind::FunctionExpression | SyntaxKind::ArrowFunction => self.bind_function_expression(node),
            SyntaxKind::ObjectLiteralExpression => self.bind_object_literal(node),

            // Types
            SyntaxKind::TypeLiteral => self.in_type_context(|b| b.bind_type_literal(node)),
            SyntaxKind::FunctionType | SyntaxKind::ConstructorType => {
                self.in_type_context(|b| b.bind_signature_declaration(node))
            }
            SyntaxKind::MappedType => self.in_type_context(|b| b.bind_mapped_type(node)),
            SyntaxKind::ConditionalType => self.in_type_context(|b| b.bind_conditional_type(node)),
            SyntaxKind::InferType => self.in_type_context(|b| b.bind_infer_type(node)),
            kind if kind.is_type_node() => self.in_type_context(|b| b.bind_children(node)),

            _ => self.bind_children(node),
        }
    }

    fn bind_children(&mut self, node: NodeId) {
        self.tree.for_each_child(node, |child| self.bind(child));
    }

    fn bind_opt(&mut self, node: Option<NodeId>) {
        if let Some(node) = node {
            self.bind(node);
        }
    }

    fn bind_type(&mut self, node: Option<NodeId>) {
        if let Some(node) = node {
            self.in_type_context(|b| b.bind(node));
        }
    }

    fn in_type_context(&mut self, f: impl FnOnce(&mut Self)) {
        let saved = std::mem::replace(&mut self.in_type, true);
        f(self);
        self.in_type = saved;
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn bind_variable_declaration(&mut self, node: NodeId) {
        let tree = self.tree;
        let NodeData::Variable {
            name,
            type_annotation,
            initializer,
        } = tree.node(node).data
        else {
            return;
        };
        let list = tree.parent(node);
        let list_flags = list.map_or(NodeFlags::NONE, |l| tree.node(l).flags);
        if let Some(name_text) = tree.name_of(name) {
            if list_flags.intersects(NodeFlags::BLOCK_SCOPED) {
                self.declare_scoped(
                    node,
                    name_text,
                    SymbolFlags::BLOCK_SCOPED_VARIABLE,
                    SymbolFlags::BLOCK_SCOPED_VARIABLE_EXCLUDES,
                    self.current_scope,
                );
            } else {
                let scope = self.function_scope();
                self.declare_scoped(
                    node,
                    name_text,
                    SymbolFlags::FUNCTION_SCOPED_VARIABLE,
                    SymbolFlags::FUNCTION_SCOPED_VARIABLE_EXCLUDES,
                    scope,
                );
            }
        }
        self.bind_type(type_annotation);
        self.bind_opt(initializer);
        let in_for_head = list
            .and_then(|l| tree.parent(l))
            .is_some_and(|s| matches!(tree.kind(s), SyntaxKind::ForInStatement | SyntaxKind::ForOfStatement));
        if initializer.is_some() || in_for_head {
            self.current_flow = self.create_flow_assignment(self.current_flow, node);
        }
    }

    fn bind_function_declaration(&mut self, node: NodeId) {
        let tree = self.tree;
        let name = tree.signature(node).and_then(|s| s.name).and_then(|n| tree.name_of(n));
        let scope = self.function_scope();
        match name {
            Some(name) => {
                self.declare_scoped(node, name, SymbolFlags::FUNCTION, SymbolFlags::FUNCTION_EXCLUDES, scope);
            }
            None => {
                // `export default function () {}`
                let symbol = self.new_symbol(self.names.default_export, SymbolFlags::FUNCTION, node);
                self.add_default_export(symbol);
            }
        }
        self.bind_signature_declaration(node);
    }

    fn bind_class_declaration(&mut self, node: NodeId) {
        let tree = self.tree;
        let NodeData::ClassLike {
            name,
            ref type_parameters,
            ref heritage_clauses,
            ref members,
        } = tree.node(node).data
        else {
            return;
        };
        let symbol = match name.and_then(|n| tree.name_of(n)) {
            Some(text) => {
                self.check_reserved_type_name(name, &messages::CLASS_NAME_CANNOT_BE_0);
                self.declare_scoped(node, text, SymbolFlags::CLASS, SymbolFlags::CLASS_EXCLUDES, self.current_scope)
            }
            None => {
                let symbol = self.new_symbol(self.names.default_export, SymbolFlags::CLASS, node);
                if tree.node(node).modifiers.contains(ModifierFlags::DEFAULT) {
                    self.add_default_export(symbol);
                }
                symbol
            }
        };

        self.push_scope(ScopeKind::TypeParameters, node);
        for &tp in type_parameters {
            self.bind_type_parameter(tp);
        }
        for &clause in heritage_clauses {
            self.bind_children(clause);
        }
        for &member in members {
            self.bind_class_member(symbol, member);
        }
        self.pop_scope();
    }

    fn bind_class_member(&mut self, class: SymbolId, member: NodeId) {
        let tree = self.tree;
        let node = tree.node(member);
        let is_static = node.modifiers.contains(ModifierFlags::STATIC);
        let table = if is_static { Table::Exports(class) } else { Table::Members(class) };
        let modifier_flags = Self::member_modifier_flags(node.modifiers, node.flags);
        match node.kind {
            SyntaxKind::PropertyDeclaration => {
                let NodeData::Variable {
                    name,
                    type_annotation,
                    initializer,
                } = node.data
                else {
                    return;
                };
                if let Some(text) = names::property_name(tree, name, &self.interner) {
                    self.declare(
                        table,
                        text,
                        member,
                        SymbolFlags::PROPERTY | modifier_flags,
                        SymbolFlags::PROPERTY_EXCLUDES,
                    );
                }
                self.bind_property_name(name);
                self.bind_type(type_annotation);
                if let Some(initializer) = initializer {
                    // Initializers run in their own flow container.
                    let saved_flow = self.current_flow;
                    self.current_flow = self.flow.add(FlowKind::Start, SmallVec::new(), Some(member));
                    self.bind(initializer);
                    self.current_flow = saved_flow;
                }
            }
            SyntaxKind::MethodDeclaration => {
                self.declare_member_signature(table, member, SymbolFlags::METHOD | modifier_flags, SymbolFlags::METHOD_EXCLUDES);
                self.bind_signature_declaration(member);
            }
            SyntaxKind::GetAccessor | SyntaxKind::SetAccessor => {
                self.declare_member_signature(
                    table,
                    member,
                    SymbolFlags::PROPERTY | modifier_flags,
                    SymbolFlags::PROPERTY_EXCLUDES,
                );
                self.bind_signature_declaration(member);
            }
            SyntaxKind::Constructor => {
                self.declare(
                    Table::Members(class),
                    self.names.constructor,
                    member,
                    SymbolFlags::CONSTRUCTOR,
                    SymbolFlags::NONE,
                );
                self.bind_signature_declaration(member);
                // Parameter properties become instance members.
                let parameters = tree.signature(member).map(|s| s.parameters.clone()).unwrap_or_default();
                for parameter in parameters {
                    let param = tree.node(parameter);
                    if !param.modifiers.intersects(ModifierFlags::PARAMETER_PROPERTY) {
                        continue;
                    }
                    if let Some(text) = tree.declaration_name(parameter).and_then(|n| tree.name_of(n)) {
                        let flags = SymbolFlags::PROPERTY | Self::member_modifier_flags(param.modifiers, param.flags);
                        // Declared through the name node; the parameter node keeps its local symbol.
                        let name = tree.declaration_name(parameter).unwrap_or(parameter);
                        self.declare(Table::Members(class), text, name, flags, SymbolFlags::PROPERTY_EXCLUDES);
                    }
                }
            }
            SyntaxKind::IndexSignature => {
                self.declare(table, self.names.index, member, SymbolFlags::SIGNATURE, SymbolFlags::NONE);
                self.bind_signature_declaration(member);
            }
            _ => self.bind(member),
        }
    }

    fn bind_interface_declaration(&mut self, node: NodeId) {
        let tree = self.tree;
        let NodeData::ClassLike {
            name,
            ref type_parameters,
            ref heritage_clauses,
            ref members,
        } = tree.node(node).data
        else {
            return;
        };
        let Some(text) = name.and_then(|n| tree.name_of(n)) else {
            return;
        };
        self.check_reserved_type_name(name, &messages::INTERFACE_NAME_CANNOT_BE_0);
        let symbol = self.declare_scoped(
            node,
            text,
            SymbolFlags::INTERFACE,
            SymbolFlags::INTERFACE_EXCLUDES,
            self.current_scope,
        );
        self.push_scope(ScopeKind::TypeParameters, node);
        for &tp in type_parameters {
            self.bind_type_parameter(tp);
        }
        self.in_type_context(|b| {
            for &clause in heritage_clauses {
                b.bind_children(clause);
            }
            for &member in members {
                b.bind_type_member(symbol, member);
            }
        });
        self.pop_scope();
    }

    fn bind_type_literal(&mut self, node: NodeId) {
        let tree = self.tree;
        let symbol = self.new_symbol(self.names.type_literal, SymbolFlags::TYPE_LITERAL, node);
        for &member in tree.list(node) {
            self.bind_type_member(symbol, member);
        }
    }

    /// Members of interfaces and type literals.
    fn bind_type_member(&mut self, container: SymbolId, member: NodeId) {
        let tree = self.tree;
        let node = tree.node(member);
        let modifier_flags = Self::member_modifier_flags(node.modifiers, node.flags);
        let table = Table::Members(container);
        match node.kind {
            SyntaxKind::PropertySignature => {
                let NodeData::Variable {
                    name,
                    type_annotation,
                    ..
                } = node.data
                else {
                    return;
                };
                if let Some(text) = names::property_name(tree, name, &self.interner) {
                    self.declare(table, text, member, SymbolFlags::PROPERTY | modifier_flags, SymbolFlags::PROPERTY_EXCLUDES);
                }
                self.bind_property_name(name);
                self.bind_type(type_annotation);
            }
            SyntaxKind::MethodSignature => {
                self.declare_member_signature(table, member, SymbolFlags::METHOD | modifier_flags, SymbolFlags::METHOD_EXCLUDES);
                self.bind_signature_declaration(member);
            }
            SyntaxKind::CallSignature => {
                self.declare(table, self.names.call, member, SymbolFlags::SIGNATURE, SymbolFlags::NONE);
                self.bind_signature_declaration(member);
            }
            SyntaxKind::ConstructSignature => {
                self.declare(table, self.names.new, member, SymbolFlags::SIGNATURE, SymbolFlags::NONE);
                self.bind_signature_declaration(member);
            }
            SyntaxKind::IndexSignature => {
                self.declare(table, self.names.index, member, SymbolFlags::SIGNATURE, SymbolFlags::NONE);
                self.bind_signature_declaration(member);
            }
            _ => self.bind(member),
        }
    }

    fn declare_member_signature(&mut self, table: Table, member: NodeId, includes: SymbolFlags, excludes: SymbolFlags) {
        let tree = self.tree;
        let name = tree.signature(member).and_then(|s| s.name);
        if let Some(text) = name.and_then(|n| names::property_name(tree, n, &self.interner)) {
            self.declare(table, text, member, includes, excludes);
        }
    }

    fn member_modifier_flags(modifiers: ModifierFlags, node_flags: NodeFlags) -> SymbolFlags {
        let mut flags = SymbolFlags::NONE;
        if node_flags.contains(NodeFlags::OPTIONAL) {
            flags |= SymbolFlags::OPTIONAL;
        }
        if modifiers.contains(ModifierFlags::READONLY) {
            flags |= SymbolFlags::READONLY;
        }
        if modifiers.contains(ModifierFlags::STATIC) {
            flags |= SymbolFlags::STATIC;
        }
        if modifiers.contains(ModifierFlags::PRIVATE) {
            flags |= SymbolFlags::PRIVATE;
        }
        if modifiers.contains(ModifierFlags::PROTECTED) {
            flags |= SymbolFlags::PROTECTED;
        }
        flags
    }

    /// Computed property names hold expressions.
    fn bind_property_name(&mut self, name: NodeId) {
        if self.tree.kind(name) == SyntaxKind::ComputedPropertyName {
            let saved = std::mem::replace(&mut self.in_type, false);
            self.bind_children(name);
            self.in_type = saved;
        }
    }

    fn bind_type_alias(&mut self, node: NodeId) {
        let tree = self.tree;
        let NodeData::TypeAlias {
            name,
            ref type_parameters,
            type_node,
        } = tree.node(node).data
        else {
            return;
        };
        if let Some(text) = tree.name_of(name) {
            self.check_reserved_type_name(Some(name), &messages::TYPE_ALIAS_NAME_CANNOT_BE_0);
            self.declare_scoped(node, text, SymbolFlags::TYPE_ALIAS, SymbolFlags::TYPE_ALIAS_EXCLUDES, self.current_scope);
        }
        self.push_scope(ScopeKind::TypeParameters, node);
        for &tp in type_parameters {
            self.bind_type_parameter(tp);
        }
        self.bind_type(Some(type_node));
        self.pop_scope();
    }

    fn bind_enum_declaration(&mut self, node: NodeId) {
        let tree = self.tree;
        let NodeData::Enum { name, ref members } = tree.node(node).data else {
            return;
        };
        let is_const = tree.node(node).modifiers.contains(ModifierFlags::CONST);
        let (includes, excludes) = if is_const {
            (SymbolFlags::CONST_ENUM, SymbolFlags::CONST_ENUM_EXCLUDES)
        } else {
            (SymbolFlags::REGULAR_ENUM, SymbolFlags::REGULAR_ENUM_EXCLUDES)
        };
        let Some(text) = tree.name_of(name) else {
            return;
        };
        self.check_reserved_type_name(Some(name), &messages::ENUM_NAME_CANNOT_BE_0);
        let symbol = self.declare_scoped(node, text, includes, excludes, self.current_scope);
        for &member in members {
            let NodeData::Variable { name, initializer, .. } = tree.node(member).data else {
                continue;
            };
            if let Some(text) = names::property_name(tree, name, &self.interner) {
                self.declare(
                    Table::Exports(symbol),
                    text,
                    member,
                    SymbolFlags::ENUM_MEMBER,
                    SymbolFlags::ENUM_MEMBER_EXCLUDES,
                );
            }
            self.bind_opt(initializer);
        }
    }

    fn bind_module_declaration(&mut self, node: NodeId) {
        let tree = self.tree;
        let NodeData::Module { name, body } = tree.node(node).data else {
            return;
        };
        let text = match &tree.node(name).data {
            NodeData::Identifier { name } => *name,
            // `declare module "x"` is keyed by its quoted name.
            NodeData::StringLiteral { value } => {
                let quoted = format!("\"{}\"", self.interner.resolve(*value));
                self.interner.intern(&quoted)
            }
            _ => return,
        };
        let (includes, excludes) = if self.is_instantiated_module(node) {
            (SymbolFlags::VALUE_MODULE, SymbolFlags::VALUE_MODULE_EXCLUDES)
        } else {
            (SymbolFlags::NAMESPACE_MODULE, SymbolFlags::NAMESPACE_MODULE_EXCLUDES)
        };
        let symbol = self.declare_scoped(node, text, includes, excludes, self.current_scope);
        let scope = self.push_scope(ScopeKind::Namespace, node);
        self.scopes[scope.index()].container = Some(symbol);
        if let Some(body) = body {
            match tree.kind(body) {
                SyntaxKind::ModuleBlock => {
                    for &stmt in tree.list(body) {
                        self.bind(stmt);
                    }
                }
                _ => self.bind(body),
            }
        }
        self.pop_scope();
    }

    /// A namespace is instantiated unless it only declares types.
    fn is_instantiated_module(&self, node: NodeId) -> bool {
        let tree = self.tree;
        let NodeData::Module { body, .. } = tree.node(node).data else {
            return false;
        };
        let Some(body) = body else {
            return false;
        };
        if tree.kind(body) == SyntaxKind::ModuleDeclaration {
            return self.is_instantiated_module(body);
        }
        tree.list(body).iter().any(|&stmt| match tree.kind(stmt) {
            SyntaxKind::InterfaceDeclaration
            | SyntaxKind::TypeAliasDeclaration
            | SyntaxKind::ImportDeclaration
            | SyntaxKind::ExportDeclaration
            | SyntaxKind::EmptyStatement => false,
            SyntaxKind::ModuleDeclaration => self.is_instantiated_module(stmt),
            _ => true,
        })
    }

    fn bind_import_declaration(&mut self, node: NodeId) {
        let tree = self.tree;
        let NodeData::Import {
            import_clause,
            module_specifier,
        } = tree.node(node).data
        else {
            return;
        };
        self.imports.push(module_specifier);
        let Some(clause) = import_clause else {
            return;
        };
        let NodeData::ImportClause { name, named_bindings } = tree.node(clause).data else {
            return;
        };
        if let Some(text) = name.and_then(|n| tree.name_of(n)) {
            self.declare(Table::Locals(self.current_scope), text, clause, SymbolFlags::ALIAS, SymbolFlags::ALIAS_EXCLUDES);
        }
        let Some(bindings) = named_bindings else {
            return;
        };
        match tree.kind(bindings) {
            SyntaxKind::NamespaceImport => {
                if let Some(text) = tree.declaration_name(bindings).and_then(|n| tree.name_of(n)) {
                    self.declare(
                        Table::Locals(self.current_scope),
                        text,
                        bindings,
                        SymbolFlags::ALIAS,
                        SymbolFlags::ALIAS_EXCLUDES,
                    );
                }
            }
            _ => {
                for &specifier in tree.list(bindings) {
                    if let Some(text) = tree.declaration_name(specifier).and_then(|n| tree.name_of(n)) {
                        self.declare(
                            Table::Locals(self.current_scope),
                            text,
                            specifier,
                            SymbolFlags::ALIAS,
                            SymbolFlags::ALIAS_EXCLUDES,
                        );
                    }
                }
            }
        }
    }

    fn bind_export_declaration(&mut self, node: NodeId) {
        let tree = self.tree;
        let NodeData::Export {
            export_clause,
            module_specifier,
        } = tree.node(node).data
        else {
            return;
        };
        if let Some(specifier) = module_specifier {
            self.imports.push(specifier);
        }
        let Some(clause) = export_clause else {
            self.export_stars.push(node);
            return;
        };
        for &specifier in tree.list(clause) {
            if let Some(text) = tree.declaration_name(specifier).and_then(|n| tree.name_of(n)) {
                self.declare(Table::FileExports, text, specifier, SymbolFlags::ALIAS, SymbolFlags::ALIAS_EXCLUDES);
            }
            // Local names in `export { a }` are references.
            if module_specifier.is_none() {
                if let NodeData::Specifier { property_name, name } = tree.node(specifier).data {
                    self.node_flow.insert(property_name.unwrap_or(name), self.current_flow);
                }
            }
        }
    }

    fn bind_export_assignment(&mut self, node: NodeId) {
        let tree = self.tree;
        let name = if tree.node(node).modifiers.contains(ModifierFlags::DEFAULT) {
            self.names.default_export
        } else {
            self.names.export_equals
        };
        self.declare(Table::FileExports, name, node, SymbolFlags::ALIAS, SymbolFlags::NONE);
        self.bind_children(node);
    }

    fn add_default_export(&mut self, symbol: SymbolId) {
        if self.exports.get(self.names.default_export).is_none() {
            self.exports.insert(self.names.default_export, symbol);
        }
    }

    // ========================================================================
    // Functions and signatures
    // ========================================================================

    fn bind_function_expression(&mut self, node: NodeId) {
        // Captured references continue from where the function is created.
        self.node_flow.insert(node, self.current_flow);
        let named = self.tree.signature(node).is_some_and(|s| s.name.is_some());
        if !named {
            self.new_symbol(self.names.function, SymbolFlags::FUNCTION_EXPRESSION, node);
        }
        self.bind_signature_declaration(node);
    }

    /// Parameters, type parameters, return type and body of any
    /// function-like node. Bodies get a fresh flow graph.
    fn bind_signature_declaration(&mut self, node: NodeId) {
        let tree = self.tree;
        let Some(sig) = tree.signature(node) else {
            return;
        };
        let kind = tree.kind(node);
        self.push_scope(ScopeKind::Function, node);

        // A named function expression sees its own name.
        if kind == SyntaxKind::FunctionExpression {
            if let Some(text) = sig.name.and_then(|n| tree.name_of(n)) {
                self.declare(
                    Table::Locals(self.current_scope),
                    text,
                    node,
                    SymbolFlags::FUNCTION_EXPRESSION,
                    SymbolFlags::NONE,
                );
            }
        }

        let has_flow = kind.is_function_like_with_body();
        let saved_flow = self.current_flow;
        let saved_break = self.break_target.take();
        let saved_continue = self.continue_target.take();
        let saved_true = self.true_target.take();
        let saved_false = self.false_target.take();
        let saved_labels = std::mem::take(&mut self.labels);
        let saved_in_type = self.in_type;
        if has_flow {
            self.current_flow = self.flow.add(FlowKind::Start, SmallVec::new(), Some(node));
        }

        for &tp in &sig.type_parameters {
            self.bind_type_parameter(tp);
        }
        for &parameter in &sig.parameters {
            self.bind_parameter(parameter);
        }
        self.bind_type(sig.return_type);

        if let Some(body) = sig.body {
            self.in_type = false;
            if tree.kind(body) == SyntaxKind::Block {
                self.node_flow.insert(body, self.current_flow);
                for &stmt in tree.list(body) {
                    self.bind(stmt);
                }
            } else {
                self.bind(body);
            }
            self.function_end_flow.insert(node, self.current_flow);
        }

        self.in_type = saved_in_type;
        self.current_flow = saved_flow;
        self.break_target = saved_break;
        self.continue_target = saved_continue;
        self.true_target = saved_true;
        self.false_target = saved_false;
        self.labels = saved_labels;
        self.pop_scope();
    }

    fn bind_parameter(&mut self, node: NodeId) {
        let tree = self.tree;
        let NodeData::Variable {
            name,
            type_annotation,
            initializer,
        } = tree.node(node).data
        else {
            return;
        };
        if let Some(text) = tree.name_of(name) {
            if text != self.names.this {
                self.declare(
                    Table::Locals(self.current_scope),
                    text,
                    node,
                    SymbolFlags::FUNCTION_SCOPED_VARIABLE,
                    SymbolFlags::PARAMETER_EXCLUDES,
                );
            }
        }
        self.bind_type(type_annotation);
        if let Some(initializer) = initializer {
            let saved = std::mem::replace(&mut self.in_type, false);
            self.bind(initializer);
            self.in_type = saved;
        }
    }

    fn bind_type_parameter(&mut self, node: NodeId) {
        self.declare_type_parameter(node, self.current_scope);
    }

    fn declare_type_parameter(&mut self, node: NodeId, scope: ScopeId) {
        let tree = self.tree;
        let NodeData::TypeParameter {
            name,
            constraint,
            default,
        } = tree.node(node).data
        else {
            return;
        };
        if let Some(text) = tree.name_of(name) {
            self.declare(
                Table::Locals(scope),
                text,
                node,
                SymbolFlags::TYPE_PARAMETER,
                SymbolFlags::TYPE_PARAMETER_EXCLUDES,
            );
        }
        self.bind_type(constraint);
        self.bind_type(default);
    }

    fn bind_mapped_type(&mut self, node: NodeId) {
        let NodeData::MappedType {
            type_parameter,
            name_type,
            type_node,
            ..
        } = self.tree.node(node).data
        else {
            return;
        };
        self.push_scope(ScopeKind::Type, node);
        self.bind_type_parameter(type_parameter);
        self.bind_type(name_type);
        self.bind_type(type_node);
        self.pop_scope();
    }

    fn bind_conditional_type(&mut self, node: NodeId) {
        let NodeData::ConditionalType {
            check_type,
            extends_type,
            true_type,
            false_type,
        } = self.tree.node(node).data
        else {
            return;
        };

        // `infer` parameters are visible in the extends clause and the true
        // branch only.
        self.bind_type(Some(check_type));
        let scope = self.push_scope(ScopeKind::Type, extends_type);
        let saved = self.infer_scope.replace(scope);
        self.bind_type(Some(extends_type));
        self.infer_scope = saved;
        self.node_scopes.insert(true_type, scope);
        self.bind_type(Some(true_type));
        self.pop_scope();
        self.bind_type(Some(false_type));
    }

    fn bind_infer_type(&mut self, node: NodeId) {
        let NodeData::InferType { type_parameter } = self.tree.node(node).data else {
            return;
        };
        let scope = self.infer_scope.unwrap_or(self.current_scope);
        self.declare_type_parameter(type_parameter, scope);
    }

    fn bind_object_literal(&mut self, node: NodeId) {
        let tree = self.tree;
        let symbol = self.new_symbol(self.names.object_literal, SymbolFlags::OBJECT_LITERAL, node);
        for &element in tree.list(node) {
            let element_node = tree.node(element);
            match element_node.kind {
                SyntaxKind::PropertyAssignment | SyntaxKind::ShorthandPropertyAssignment => {
                    let NodeData::Variable { name, initializer, .. } = element_node.data else {
                        continue;
                    };
                    if let Some(text) = names::property_name(tree, name, &self.interner) {
                        self.declare(
                            Table::Members(symbol),
                            text,
                            element,
                            SymbolFlags::PROPERTY,
                            SymbolFlags::PROPERTY_EXCLUDES,
                        );
                    }
                    self.bind_property_name(name);
                    if element_node.kind == SyntaxKind::ShorthandPropertyAssignment {
                        // The name doubles as a reference to the variable.
                        self.node_flow.insert(name, self.current_flow);
                    }
                    self.bind_opt(initializer);
                }
                SyntaxKind::MethodDeclaration => {
                    self.declare_member_signature(
                        Table::Members(symbol),
                        element,
                        SymbolFlags::METHOD,
                        SymbolFlags::PROPERTY_EXCLUDES,
                    );
                    if let Some(name) = tree.signature(element).and_then(|s| s.name) {
                        self.bind_property_name(name);
                    }
                    self.node_flow.insert(element, self.current_flow);
                    self.bind_signature_declaration(element);
                }
                SyntaxKind::GetAccessor | SyntaxKind::SetAccessor => {
                    self.declare_member_signature(
                        Table::Members(symbol),
                        element,
                        SymbolFlags::PROPERTY,
                        SymbolFlags::PROPERTY_EXCLUDES,
                    );
                    self.bind_signature_declaration(element);
                }
                _ => self.bind(element),
            }
        }
    }

    // ========================================================================
    // Control flow statements
    // ========================================================================

    fn bind_block(&mut self, node: NodeId) {
        let tree = self.tree;
        self.push_scope(ScopeKind::Block, node);
        for &stmt in tree.list(node) {
            self.bind(stmt);
        }
        self.pop_scope();
    }

    fn bind_expression_statement(&mut self, node: NodeId) {
        let NodeData::Expr { expression } = self.tree.node(node).data else {
            return;
        };
        self.bind(expression);
        let call = skip_parentheses(self.tree, expression);
        if self.tree.kind(call) == SyntaxKind::CallExpression && self.current_flow != FlowGraph::UNREACHABLE {
            self.current_flow = self.flow.add(FlowKind::Call, smallvec![self.current_flow], Some(call));
        }
    }

    fn bind_if_statement(&mut self, node: NodeId) {
        let NodeData::If {
            condition,
            then_statement,
            else_statement,
        } = self.tree.node(node).data
        else {
            return;
        };
        let then_label = self.create_branch_label();
        let else_label = self.create_branch_label();
        let post_if_label = self.create_branch_label();
        self.bind_condition(Some(condition), then_label, else_label);
        self.current_flow = self.finish_flow_label(then_label);
        self.bind(then_statement);
        self.add_antecedent(post_if_label, self.current_flow);
        self.current_flow = self.finish_flow_label(else_label);
        self.bind_opt(else_statement);
        self.add_antecedent(post_if_label, self.current_flow);
        self.current_flow = self.finish_flow_label(post_if_label);
    }

    fn bind_while_statement(&mut self, node: NodeId) {
        let NodeData::Loop { condition, statement, .. } = self.tree.node(node).data else {
            return;
        };
        let pre_while_label = self.create_loop_label();
        self.set_continue_target(node, pre_while_label);
        let pre_body_label = self.create_branch_label();
        let post_while_label = self.create_branch_label();
        self.add_antecedent(pre_while_label, self.current_flow);
        self.current_flow = pre_while_label;
        self.bind_condition(condition, pre_body_label, post_while_label);
        self.current_flow = self.finish_flow_label(pre_body_label);
        self.bind_iterative_statement(statement, post_while_label, pre_while_label);
        self.add_antecedent(pre_while_label, self.current_flow);
        self.current_flow = self.finish_flow_label(post_while_label);
    }

    fn bind_do_statement(&mut self, node: NodeId) {
        let NodeData::Loop { condition, statement, .. } = self.tree.node(node).data else {
            return;
        };
        let pre_do_label = self.create_loop_label();
        let pre_condition_label = self.create_branch_label();
        self.set_continue_target(node, pre_condition_label);
        let post_do_label = self.create_branch_label();
        self.add_antecedent(pre_do_label, self.current_flow);
        self.current_flow = pre_do_label;
        self.bind_iterative_statement(statement, post_do_label, pre_condition_label);
        self.add_antecedent(pre_condition_label, self.current_flow);
        self.current_flow = self.finish_flow_label(pre_condition_label);
        self.bind_condition(condition, pre_do_label, post_do_label);
        self.current_flow = self.finish_flow_label(post_do_label);
    }

    fn bind_for_statement(&mut self, node: NodeId) {
        let NodeData::Loop {
            initializer,
            condition,
            incrementor,
            statement,
        } = self.tree.node(node).data
        else {
            return;
        };
        self.push_scope(ScopeKind::Block, node);
        let pre_loop_label = self.create_loop_label();
        self.set_continue_target(node, pre_loop_label);
        let pre_body_label = self.create_branch_label();
        let pre_incrementor_label = self.create_branch_label();
        let post_loop_label = self.create_branch_label();
        self.bind_opt(initializer);
        self.add_antecedent(pre_loop_label, self.current_flow);
        self.current_flow = pre_loop_label;
        self.bind_condition(condition, pre_body_label, post_loop_label);
        self.current_flow = self.finish_flow_label(pre_body_label);
        self.bind_iterative_statement(statement, post_loop_label, pre_incrementor_label);
        self.add_antecedent(pre_incrementor_label, self.current_flow);
        self.current_flow = self.finish_flow_label(pre_incrementor_label);
        self.bind_opt(incrementor);
        self.add_antecedent(pre_loop_label, self.current_flow);
        self.current_flow = self.finish_flow_label(post_loop_label);
        self.pop_scope();
    }

    fn bind_for_in_or_of_statement(&mut self, node: NodeId) {
        let NodeData::Loop {
            initializer,
            condition,
            statement,
            ..
        } = self.tree.node(node).data
        else {
            return;
        };
        self.push_scope(ScopeKind::Block, node);
        let pre_loop_label = self.create_loop_label();
        self.set_continue_target(node, pre_loop_label);
        let post_loop_label = self.create_branch_label();
        self.bind_opt(condition);
        self.add_antecedent(pre_loop_label, self.current_flow);
        self.current_flow = pre_loop_label;
        self.add_antecedent(post_loop_label, self.current_flow);
        if let Some(initializer) = initializer {
            self.bind(initializer);
            if self.tree.kind(initializer) != SyntaxKind::VariableDeclarationList {
                self.bind_assignment_target_flow(initializer);
            }
        }
        self.bind_iterative_statement(statement, post_loop_label, pre_loop_label);
        self.add_antecedent(pre_loop_label, self.current_flow);
        self.current_flow = self.finish_flow_label(post_loop_label);
        self.pop_scope();
    }

    fn bind_iterative_statement(&mut self, node: NodeId, break_target: FlowId, continue_target: FlowId) {
        let saved_break = self.break_target.replace(break_target);
        let saved_continue = self.continue_target.replace(continue_target);
        self.bind(node);
        self.break_target = saved_break;
        self.continue_target = saved_continue;
    }

    /// Labels directly enclosing a loop continue at the loop's target.
    fn set_continue_target(&mut self, node: NodeId, target: FlowId) {
        let tree = self.tree;
        let mut current = node;
        let mut index = self.labels.len();
        while index > 0 {
            match tree.parent(current) {
                Some(parent) if tree.kind(parent) == SyntaxKind::LabeledStatement => {
                    index -= 1;
                    self.labels[index].continue_target = Some(target);
                    current = parent;
                }
                _ => break,
            }
        }
    }

    fn bind_break_or_continue(&mut self, node: NodeId) {
        let tree = self.tree;
        let is_break = tree.kind(node) == SyntaxKind::BreakStatement;
        let NodeData::Jump { label } = tree.node(node).data else {
            return;
        };
        match label {
            Some(label) => {
                let name = tree.name_of(label);
                let active = self.labels.iter().rev().find(|l| Some(l.name) == name);
                let target = active.and_then(|l| if is_break { Some(l.break_target) } else { l.continue_target });
                match target {
                    Some(target) => self.add_antecedent(target, self.current_flow),
                    None if is_break => {
                        self.error(label, &messages::A_BREAK_STATEMENT_CAN_ONLY_JUMP_TO_A_LABEL_OF_AN_ENCLOSING_STATEMENT, &[])
                    }
                    None => self.error(
                        label,
                        &messages::A_CONTINUE_STATEMENT_CAN_ONLY_JUMP_TO_A_LABEL_OF_AN_ENCLOSING_ITERATION_STATEMENT,
                        &[],
                    ),
                }
            }
            None => {
                let target = if is_break { self.break_target } else { self.continue_target };
                match target {
                    Some(target) => self.add_antecedent(target, self.current_flow),
                    None if is_break => self.error(
                        node,
                        &messages::A_BREAK_STATEMENT_CAN_ONLY_BE_USED_WITHIN_AN_ENCLOSING_ITERATION_OR_SWITCH_STATEMENT,
                        &[],
                    ),
                    None => self.error(
                        node,
                        &messages::A_CONTINUE_STATEMENT_CAN_ONLY_BE_USED_WITHIN_AN_ENCLOSING_ITERATION_STATEMENT,
                        &[],
                    ),
                }
            }
        }
        self.current_flow = FlowGraph::UNREACHABLE;
    }

    fn bind_switch_statement(&mut self, node: NodeId) {
        let tree = self.tree;
        let NodeData::Switch { expression, case_block } = tree.node(node).data else {
            return;
        };
        self.bind(expression);
        let post_switch_label = self.create_branch_label();
        let saved_break = self.break_target.replace(post_switch_label);
        let pre_switch_case_flow = self.current_flow;
        let is_narrowing = is_narrowing_expression(tree, expression);

        self.push_scope(ScopeKind::Block, case_block);
        let clauses = tree.list(case_block);
        let mut fallthrough = FlowGraph::UNREACHABLE;
        let mut i = 0;
        while i < clauses.len() {
            let clause_start = i;
            // Empty clauses fall into the next one: `case 1: case 2: ...`.
            while clause_statements(tree, clauses[i]).is_empty() && i + 1 < clauses.len() {
                if fallthrough == FlowGraph::UNREACHABLE {
                    self.current_flow = pre_switch_case_flow;
                }
                self.bind_clause_expression(clauses[i]);
                i += 1;
            }
            let pre_case_label = self.create_branch_label();
            let entry = if is_narrowing {
                self.create_flow_switch_clause(pre_switch_case_flow, node, clause_start as u32, (i + 1) as u32)
            } else {
                pre_switch_case_flow
            };
            self.add_antecedent(pre_case_label, entry);
            self.add_antecedent(pre_case_label, fallthrough);
            self.current_flow = self.finish_flow_label(pre_case_label);
            let clause = clauses[i];
            self.node_flow.insert(clause, self.current_flow);
            self.bind_clause_expression(clause);
            for &stmt in clause_statements(tree, clause) {
                self.bind(stmt);
            }
            fallthrough = self.current_flow;
            i += 1;
        }
        self.pop_scope();

        self.add_antecedent(post_switch_label, self.current_flow);
        let has_default = clauses.iter().any(|&c| tree.kind(c) == SyntaxKind::DefaultClause);
        if !has_default {
            let no_match = if is_narrowing {
                self.create_flow_switch_clause(pre_switch_case_flow, node, 0, 0)
            } else {
                pre_switch_case_flow
            };
            self.add_antecedent(post_switch_label, no_match);
        }
        self.break_target = saved_break;
        self.current_flow = self.finish_flow_label(post_switch_label);
    }

    fn bind_clause_expression(&mut self, clause: NodeId) {
        if let NodeData::CaseClause { expression, .. } = self.tree.node(clause).data {
            self.bind_opt(expression);
        }
    }

    fn bind_labeled_statement(&mut self, node: NodeId) {
        let tree = self.tree;
        let NodeData::Labeled { label, statement } = tree.node(node).data else {
            return;
        };
        let post_statement_label = self.create_branch_label();
        if let Some(name) = tree.name_of(label) {
            if self.labels.iter().any(|l| l.name == name) {
                let text = tree.identifier_text(label).to_string();
                self.error(label, &messages::DUPLICATE_LABEL_0, &[&text]);
            }
            self.labels.push(ActiveLabel {
                name,
                break_target: post_statement_label,
                continue_target: None,
            });
            self.bind(statement);
            self.labels.pop();
        } else {
            self.bind(statement);
        }
        self.add_antecedent(post_statement_label, self.current_flow);
        self.current_flow = self.finish_flow_label(post_statement_label);
    }

    /// `catch` and `finally` may start anywhere in the `try` block, so they
    /// are entered from the pre-try flow as well as the end of the block.
    fn bind_try_statement(&mut self, node: NodeId) {
        let tree = self.tree;
        let NodeData::Try {
            try_block,
            catch_clause,
            finally_block,
        } = tree.node(node).data
        else {
            return;
        };
        let pre_try_flow = self.current_flow;
        self.bind(try_block);
        let mut normal_exits: SmallVec<[FlowId; 2]> = smallvec![self.current_flow];

        if let Some(catch_clause) = catch_clause {
            let catch_label = self.create_branch_label();
            self.add_antecedent(catch_label, pre_try_flow);
            self.add_antecedent(catch_label, self.current_flow);
            self.current_flow = self.finish_flow_label(catch_label);
            self.bind_catch_clause(catch_clause);
            normal_exits.push(self.current_flow);
        }

        if let Some(finally_block) = finally_block {
            let finally_label = self.create_branch_label();
            self.add_antecedent(finally_label, pre_try_flow);
            for &exit in &normal_exits {
                self.add_antecedent(finally_label, exit);
            }
            self.current_flow = self.finish_flow_label(finally_label);
            self.bind(finally_block);
            if normal_exits.iter().all(|&exit| exit == FlowGraph::UNREACHABLE) {
                self.current_flow = FlowGraph::UNREACHABLE;
            }
        } else {
            let post_try_label = self.create_branch_label();
            for &exit in &normal_exits {
                self.add_antecedent(post_try_label, exit);
            }
            self.current_flow = self.finish_flow_label(post_try_label);
        }
    }

    fn bind_catch_clause(&mut self, node: NodeId) {
        let tree = self.tree;
        let NodeData::CatchClause { variable, block } = tree.node(node).data else {
            return;
        };
        self.push_scope(ScopeKind::Block, node);
        if let Some(variable) = variable {
            if let Some(text) = tree.declaration_name(variable).and_then(|n| tree.name_of(n)) {
                self.declare(
                    Table::Locals(self.current_scope),
                    text,
                    variable,
                    SymbolFlags::FUNCTION_SCOPED_VARIABLE,
                    SymbolFlags::PARAMETER_EXCLUDES,
                );
            }
            if let NodeData::Variable { type_annotation, .. } = tree.node(variable).data {
                self.bind_type(type_annotation);
            }
        }
        self.bind(block);
        self.pop_scope();
    }

    // ========================================================================
    // Expression flow
    // ========================================================================

    fn bind_binary_expression(&mut self, node: NodeId) {
        let tree = self.tree;
        let NodeData::Binary { left, operator, right } = tree.node(node).data else {
            return;
        };
        match operator {
            SyntaxKind::AmpersandAmpersandToken | SyntaxKind::BarBarToken | SyntaxKind::QuestionQuestionToken => {
                match (self.true_target, self.false_target) {
                    (Some(true_target), Some(false_target)) if !is_top_level_logical_expression(tree, node) => {
                        self.bind_logical_expression(left, operator, right, true_target, false_target);
                    }
                    _ => {
                        let post_expression_label = self.create_branch_label();
                        self.bind_logical_expression(left, operator, right, post_expression_label, post_expression_label);
                        self.current_flow = self.finish_flow_label(post_expression_label);
                    }
                }
            }
            op if op.is_assignment_operator() => {
                self.bind(left);
                self.bind(right);
                self.bind_assignment_target_flow(left);
            }
            _ => {
                self.bind(left);
                self.bind(right);
            }
        }
    }

    fn bind_logical_expression(
        &mut self,
        left: NodeId,
        operator: SyntaxKind,
        right: NodeId,
        true_target: FlowId,
        false_target: FlowId,
    ) {
        let pre_right_label = self.create_branch_label();
        if operator == SyntaxKind::AmpersandAmpersandToken {
            self.bind_condition(Some(left), pre_right_label, false_target);
        } else {
            self.bind_condition(Some(left), true_target, pre_right_label);
        }
        self.current_flow = self.finish_flow_label(pre_right_label);
        self.bind_condition(Some(right), true_target, false_target);
    }

    fn bind_prefix_unary_expression(&mut self, node: NodeId) {
        let NodeData::Unary { operator, operand } = self.tree.node(node).data else {
            return;
        };
        match operator {
            SyntaxKind::ExclamationToken => {
                std::mem::swap(&mut self.true_target, &mut self.false_target);
                self.bind(operand);
                std::mem::swap(&mut self.true_target, &mut self.false_target);
            }
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken => {
                self.bind(operand);
                self.bind_assignment_target_flow(operand);
            }
            _ => self.bind(operand),
        }
    }

    fn bind_conditional_expression(&mut self, node: NodeId) {
        let NodeData::Conditional {
            condition,
            when_true,
            when_false,
        } = self.tree.node(node).data
        else {
            return;
        };
        let true_label = self.create_branch_label();
        let false_label = self.create_branch_label();
        let post_expression_label = self.create_branch_label();
        self.bind_condition(Some(condition), true_label, false_label);
        self.current_flow = self.finish_flow_label(true_label);
        self.bind(when_true);
        self.add_antecedent(post_expression_label, self.current_flow);
        self.current_flow = self.finish_flow_label(false_label);
        self.bind(when_false);
        self.add_antecedent(post_expression_label, self.current_flow);
        self.current_flow = self.finish_flow_label(post_expression_label);
    }

    /// Bind `node` as a branch condition, routing its true and false
    /// outcomes to the two labels.
    fn bind_condition(&mut self, node: Option<NodeId>, true_target: FlowId, false_target: FlowId) {
        let saved_true = self.true_target.replace(true_target);
        let saved_false = self.false_target.replace(false_target);
        self.bind_opt(node);
        self.true_target = saved_true;
        self.false_target = saved_false;
        if node.map_or(true, |n| !is_logical_expression(self.tree, n)) {
            let when_true = self.create_flow_condition(FlowKind::TrueCondition, self.current_flow, node);
            self.add_antecedent(true_target, when_true);
            let when_false = self.create_flow_condition(FlowKind::FalseCondition, self.current_flow, node);
            self.add_antecedent(false_target, when_false);
        }
    }

    fn bind_assignment_target_flow(&mut self, target: NodeId) {
        let tree = self.tree;
        match tree.kind(target) {
            SyntaxKind::ParenthesizedExpression => {
                if let NodeData::Expr { expression } = tree.node(target).data {
                    self.bind_assignment_target_flow(expression);
                }
            }
            SyntaxKind::ArrayLiteralExpression => {
                for &element in tree.list(target) {
                    let element = match tree.node(element).data {
                        NodeData::Expr { expression } if tree.kind(element) == SyntaxKind::SpreadElement => expression,
                        _ => element,
                    };
                    self.bind_assignment_target_flow(element);
                }
            }
            _ if is_narrowable_reference(tree, target) => {
                self.current_flow = self.create_flow_assignment(self.current_flow, target);
            }
            _ => {}
        }
    }

    // ========================================================================
    // Flow nodes
    // ========================================================================

    fn create_branch_label(&mut self) -> FlowId {
        self.flow.add(FlowKind::BranchLabel, SmallVec::new(), None)
    }

    fn create_loop_label(&mut self) -> FlowId {
        self.flow.add(FlowKind::LoopLabel, SmallVec::new(), None)
    }

    fn add_antecedent(&mut self, label: FlowId, antecedent: FlowId) {
        if antecedent == FlowGraph::UNREACHABLE {
            return;
        }
        let antecedents = &mut self.flow.node_mut(label).antecedents;
        if !antecedents.contains(&antecedent) {
            antecedents.push(antecedent);
        }
    }

    /// A branch label with no way in is unreachable; one with a single
    /// antecedent is replaced by it.
    fn finish_flow_label(&self, label: FlowId) -> FlowId {
        let node = self.flow.node(label);
        match node.antecedents.len() {
            0 => FlowGraph::UNREACHABLE,
            1 if node.kind == FlowKind::BranchLabel => node.antecedents[0],
            _ => label,
        }
    }

    fn create_flow_condition(&mut self, kind: FlowKind, antecedent: FlowId, expression: Option<NodeId>) -> FlowId {
        if antecedent == FlowGraph::UNREACHABLE {
            return antecedent;
        }
        let Some(expression) = expression else {
            return if kind == FlowKind::TrueCondition {
                antecedent
            } else {
                FlowGraph::UNREACHABLE
            };
        };
        let constant = skip_parentheses(self.tree, expression);
        match (self.tree.kind(constant), kind) {
            (SyntaxKind::TrueKeyword, FlowKind::FalseCondition) | (SyntaxKind::FalseKeyword, FlowKind::TrueCondition) => {
                return FlowGraph::UNREACHABLE;
            }
            _ => {}
        }
        if !is_narrowing_expression(self.tree, expression) {
            return antecedent;
        }
        self.flow.add(kind, smallvec![antecedent], Some(expression))
    }

    fn create_flow_switch_clause(&mut self, antecedent: FlowId, switch: NodeId, clause_start: u32, clause_end: u32) -> FlowId {
        if antecedent == FlowGraph::UNREACHABLE {
            return antecedent;
        }
        self.flow.add(
            FlowKind::SwitchClause {
                clause_start,
                clause_end,
            },
            smallvec![antecedent],
            Some(switch),
        )
    }

    fn create_flow_assignment(&mut self, antecedent: FlowId, node: NodeId) -> FlowId {
        if antecedent == FlowGraph::UNREACHABLE {
            return antecedent;
        }
        self.flow.add(FlowKind::Assignment, smallvec![antecedent], Some(node))
    }

    // ========================================================================
    // Symbol and scope management
    // ========================================================================

    fn push_scope(&mut self, kind: ScopeKind, node: NodeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(kind, Some(self.current_scope), node));
        self.node_scopes.insert(node, id);
        self.current_scope = id;
        id
    }

    fn pop_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current_scope.index()].parent {
            self.current_scope = parent;
        }
    }

    /// The scope `var` and function declarations are hoisted to.
    fn function_scope(&self) -> ScopeId {
        let mut id = self.current_scope;
        loop {
            let scope = &self.scopes[id.index()];
            match scope.parent {
                Some(parent) if !scope.is_function_boundary() => id = parent,
                _ => return id,
            }
        }
    }

    /// The namespace or module scope enclosing `scope`, when declarations in
    /// it can be exported.
    fn export_container(&self, scope: ScopeId) -> Option<Table> {
        let scope_data = &self.scopes[scope.index()];
        match scope_data.kind {
            ScopeKind::Module => Some(Table::FileExports),
            ScopeKind::Namespace => scope_data.container.map(Table::Exports),
            _ => None,
        }
    }

    /// Declare a statement-level declaration in `scope`, also exporting it
    /// when it carries `export` (or sits in an ambient namespace).
    fn declare_scoped(
        &mut self,
        node: NodeId,
        name: InternedString,
        includes: SymbolFlags,
        excludes: SymbolFlags,
        scope: ScopeId,
    ) -> SymbolId {
        let statement = self.declaration_statement(node);
        let modifiers = self.tree.node(statement).modifiers;
        let exported = modifiers.contains(ModifierFlags::EXPORT) || self.in_ambient_namespace(scope);
        let export_table = if exported { self.export_container(scope) } else { None };
        match export_table {
            Some(table) => {
                let symbol = self.declare(table, name, node, includes, excludes);
                let locals = &mut self.scopes[scope.index()].locals;
                if !locals.contains(name) {
                    locals.insert(name, symbol);
                }
                if modifiers.contains(ModifierFlags::DEFAULT) && matches!(table, Table::FileExports) {
                    self.add_default_export(symbol);
                }
                symbol
            }
            None => self.declare(Table::Locals(scope), name, node, includes, excludes),
        }
    }

    /// The statement carrying modifiers for a declaration node; variable
    /// declarations take them from their variable statement.
    fn declaration_statement(&self, node: NodeId) -> NodeId {
        let tree = self.tree;
        if tree.kind(node) != SyntaxKind::VariableDeclaration {
            return node;
        }
        tree.parent(node)
            .and_then(|list| tree.parent(list))
            .filter(|&stmt| tree.kind(stmt) == SyntaxKind::VariableStatement)
            .unwrap_or(node)
    }

    fn in_ambient_namespace(&self, scope: ScopeId) -> bool {
        let scope = &self.scopes[scope.index()];
        scope.kind == ScopeKind::Namespace && self.tree.node(scope.node).flags.contains(NodeFlags::AMBIENT)
    }

    fn table_mut(&mut self, table: Table) -> &mut SymbolTable {
        match table {
            Table::Locals(scope) => &mut self.scopes[scope.index()].locals,
            Table::Members(symbol) => self.symbols[symbol.index()].members_mut(),
            Table::Exports(symbol) => self.symbols[symbol.index()].exports_mut(),
            Table::FileExports => &mut self.exports,
        }
    }

    /// Declare `name` in `table`, merging with an existing symbol unless its
    /// flags intersect `excludes`. A conflicting declaration is reported on
    /// every declaration involved and gets a fresh symbol outside the table.
    fn declare(
        &mut self,
        table: Table,
        name: InternedString,
        node: NodeId,
        includes: SymbolFlags,
        excludes: SymbolFlags,
    ) -> SymbolId {
        let existing = self.table_mut(table).get(name);
        let symbol = match existing {
            Some(existing) if self.symbols[existing.index()].flags.intersects(excludes) => {
                self.report_duplicate(existing, node, includes);
                self.alloc_symbol(name)
            }
            Some(existing) => existing,
            None => {
                let symbol = self.alloc_symbol(name);
                self.table_mut(table).insert(name, symbol);
                symbol
            }
        };
        let parent = match table {
            Table::Members(parent) | Table::Exports(parent) => Some(parent),
            _ => None,
        };
        let declaration = Declaration {
            file: self.file_id,
            node,
        };
        let data = &mut self.symbols[symbol.index()];
        data.add_declaration(declaration, includes);
        if data.parent.is_none() {
            data.parent = parent;
        }
        self.node_symbols.insert(node, symbol);
        symbol
    }

    /// A symbol that lives in no table: type literals, object literals,
    /// function expressions and anonymous default exports.
    fn new_symbol(&mut self, name: InternedString, flags: SymbolFlags, node: NodeId) -> SymbolId {
        let symbol = self.alloc_symbol(name);
        self.symbols[symbol.index()].add_declaration(
            Declaration {
                file: self.file_id,
                node,
            },
            flags,
        );
        self.node_symbols.insert(node, symbol);
        symbol
    }

    fn alloc_symbol(&mut self, name: InternedString) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol::new(name, SymbolFlags::NONE));
        id
    }

    fn report_duplicate(&mut self, existing: SymbolId, node: NodeId, includes: SymbolFlags) {
        let existing_symbol = &self.symbols[existing.index()];
        let block_scoped = (existing_symbol.flags | includes).contains(SymbolFlags::BLOCK_SCOPED_VARIABLE);
        let message = if block_scoped {
            &messages::CANNOT_REDECLARE_BLOCK_SCOPED_VARIABLE_0
        } else {
            &messages::DUPLICATE_IDENTIFIER_0
        };
        let text = self.interner.resolve(existing_symbol.name).to_string();
        trace!(name = %text, "conflicting declaration");
        let mut nodes: Vec<NodeId> = existing_symbol
            .declarations
            .iter()
            .filter(|d| d.file == self.file_id)
            .map(|d| d.node)
            .collect();
        nodes.push(node);
        for node in nodes {
            let anchor = self.tree.declaration_name(node).unwrap_or(node);
            self.error(anchor, message, &[&text]);
        }
    }

    fn check_reserved_type_name(&mut self, name: Option<NodeId>, message: &DiagnosticMessage) {
        let Some(name) = name else {
            return;
        };
        let text = self.tree.identifier_text(name);
        if names::RESERVED_TYPE_NAMES.contains(&text) {
            let text = text.to_string();
            self.error(name, message, &[&text]);
        }
    }

    fn error(&mut self, node: NodeId, message: &DiagnosticMessage, args: &[&str]) {
        self.diagnostics.push(Diagnostic::with_location(
            self.tree.file_name(),
            self.tree.range(node),
            message,
            args,
        ));
    }
}

// ============================================================================
// Syntactic predicates
// ============================================================================

fn clause_statements(tree: &SyntaxTree, clause: NodeId) -> &[NodeId] {
    match &tree.node(clause).data {
        NodeData::CaseClause { statements, .. } => statements,
        _ => &[],
    }
}

/// Strip parentheses around an expression.
pub fn skip_parentheses(tree: &SyntaxTree, mut node: NodeId) -> NodeId {
    while tree.kind(node) == SyntaxKind::ParenthesizedExpression {
        match tree.node(node).data {
            NodeData::Expr { expression } => node = expression,
            _ => break,
        }
    }
    node
}

/// Identifiers, `this`, and property or literal element accesses rooted at
/// one of those.
pub fn is_narrowable_reference(tree: &SyntaxTree, node: NodeId) -> bool {
    match (tree.kind(node), &tree.node(node).data) {
        (SyntaxKind::Identifier | SyntaxKind::ThisKeyword | SyntaxKind::SuperKeyword, _) => true,
        (SyntaxKind::PropertyAccessExpression, NodeData::Access { expression, .. }) => {
            is_narrowable_reference(tree, *expression)
        }
        (SyntaxKind::ElementAccessExpression, NodeData::Access { expression, name }) => {
            matches!(tree.kind(*name), SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral)
                && is_narrowable_reference(tree, *expression)
        }
        (SyntaxKind::ParenthesizedExpression | SyntaxKind::NonNullExpression, NodeData::Expr { expression }) => {
            is_narrowable_reference(tree, *expression)
        }
        _ => false,
    }
}

/// Whether a condition can narrow anything; other conditions get no flow
/// node.
pub fn is_narrowing_expression(tree: &SyntaxTree, node: NodeId) -> bool {
    let data = &tree.node(node).data;
    match tree.kind(node) {
        SyntaxKind::Identifier
        | SyntaxKind::ThisKeyword
        | SyntaxKind::SuperKeyword
        | SyntaxKind::PropertyAccessExpression
        | SyntaxKind::ElementAccessExpression => is_narrowable_reference(tree, node),
        SyntaxKind::CallExpression => true,
        SyntaxKind::ParenthesizedExpression | SyntaxKind::NonNullExpression | SyntaxKind::TypeOfExpression => {
            matches!(data, NodeData::Expr { expression } if is_narrowing_expression(tree, *expression))
        }
        SyntaxKind::PrefixUnaryExpression => matches!(
            data,
            NodeData::Unary { operator: SyntaxKind::ExclamationToken, operand } if is_narrowing_expression(tree, *operand)
        ),
        SyntaxKind::BinaryExpression => {
            let NodeData::Binary { left, operator, right } = *data else {
                return false;
            };
            match operator {
                SyntaxKind::EqualsToken
                | SyntaxKind::BarBarEqualsToken
                | SyntaxKind::AmpersandAmpersandEqualsToken
                | SyntaxKind::QuestionQuestionEqualsToken => is_narrowable_reference(tree, left),
                SyntaxKind::EqualsEqualsToken
                | SyntaxKind::ExclamationEqualsToken
                | SyntaxKind::EqualsEqualsEqualsToken
                | SyntaxKind::ExclamationEqualsEqualsToken => {
                    is_narrowing_expression(tree, left) || is_narrowing_expression(tree, right)
                }
                SyntaxKind::InstanceOfKeyword => is_narrowing_expression(tree, left),
                SyntaxKind::InKeyword => is_narrowing_expression(tree, right),
                SyntaxKind::CommaToken => is_narrowing_expression(tree, right),
                SyntaxKind::AmpersandAmpersandToken | SyntaxKind::BarBarToken | SyntaxKind::QuestionQuestionToken => {
                    is_narrowing_expression(tree, left) || is_narrowing_expression(tree, right)
                }
                _ => false,
            }
        }
        _ => false,
    }
}

/// `&&`, `||` or `??`, possibly under parentheses and `!`.
fn is_logical_expression(tree: &SyntaxTree, mut node: NodeId) -> bool {
    loop {
        match (tree.kind(node), &tree.node(node).data) {
            (SyntaxKind::ParenthesizedExpression, NodeData::Expr { expression }) => node = *expression,
            (
                SyntaxKind::PrefixUnaryExpression,
                NodeData::Unary {
                    operator: SyntaxKind::ExclamationToken,
                    operand,
                },
            ) => node = *operand,
            _ => return is_logical_binary(tree, node),
        }
    }
}

fn is_logical_binary(tree: &SyntaxTree, node: NodeId) -> bool {
    matches!(
        tree.node(node).data,
        NodeData::Binary {
            operator: SyntaxKind::AmpersandAmpersandToken | SyntaxKind::BarBarToken | SyntaxKind::QuestionQuestionToken,
            ..
        }
    )
}

/// A logical expression that is not itself the operand of another logical
/// expression or a statement condition joins its branches itself.
fn is_top_level_logical_expression(tree: &SyntaxTree, mut node: NodeId) -> bool {
    while let Some(parent) = tree.parent(node) {
        let wraps = match (tree.kind(parent), &tree.node(parent).data) {
            (SyntaxKind::ParenthesizedExpression, _) => true,
            (
                SyntaxKind::PrefixUnaryExpression,
                NodeData::Unary {
                    operator: SyntaxKind::ExclamationToken,
                    ..
                },
            ) => true,
            _ => false,
        };
        if !wraps {
            break;
        }
        node = parent;
    }
    let Some(parent) = tree.parent(node) else {
        return true;
    };
    !is_statement_condition(tree, node, parent) && !is_logical_binary(tree, parent)
}

fn is_statement_condition(tree: &SyntaxTree, node: NodeId, parent: NodeId) -> bool {
    match (tree.kind(parent), &tree.node(parent).data) {
        (SyntaxKind::IfStatement, NodeData::If { condition, .. }) => *condition == node,
        (
            SyntaxKind::WhileStatement | SyntaxKind::DoStatement | SyntaxKind::ForStatement,
            NodeData::Loop { condition, .. },
        ) => *condition == Some(node),
        (SyntaxKind::ConditionalExpression, NodeData::Conditional { condition, .. }) => *condition == node,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny(text: &str) -> BoundFile {
        let interner = StringInterner::new();
        let tree = tyck_parser::parse_source("test.ts", text, &interner);
        bind_file(FileId(0), tree)
    }

    #[test]
    fn test_if_without_else_joins_at_a_label() {
        let bound = tiny("let x = 1; if (x) { x; } x;");
        let after = bound.tree.statements()[2];
        let flow = bound.flow_of(after).unwrap();
        assert_eq!(bound.flow.kind(flow), FlowKind::BranchLabel);
        assert_eq!(bound.flow.node(flow).antecedents.len(), 2);
        assert!(bound.diagnostics.is_empty());
    }

    #[test]
    fn test_statement_after_return_is_unreachable() {
        let bound = tiny("function f() { return; f(); }");
        let tree = &bound.tree;
        let function = tree.statements()[0];
        let body = tree.signature(function).and_then(|s| s.body).unwrap();
        let call = tree.list(body)[1];
        assert_eq!(bound.flow_of(call), Some(FlowGraph::UNREACHABLE));
    }
}
