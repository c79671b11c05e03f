//! Control-flow typing of references.
//!
//! The binder leaves a graph of flow nodes behind; here a reference is
//! walked backwards from its position through assignments, conditions and
//! labels until its declaration (or a function start) is reached. Branch
//! labels union their antecedents; loop labels iterate to a fixed point.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::trace;
use tyck_ast::types::{FileId, NodeId, SymbolFlags, SymbolId};
use tyck_ast::{NodeData, SyntaxKind, SyntaxTree};
use tyck_binder::{names, skip_parentheses, FlowId, FlowKind};
use tyck_core::intern::InternedString;

use crate::checker::Checker;
use crate::types::{PredicateTarget, TypeFlags, TypeId};

/// Upper bound on fixed-point rounds over one loop label.
const MAX_LOOP_ROUNDS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceRoot {
    Symbol(SymbolId),
    /// `this` inside the given container.
    This(FileId, NodeId),
}

/// A narrowable reference: a variable, parameter or `this`, followed by
/// property names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceKey {
    pub root: ReferenceRoot,
    pub path: SmallVec<[InternedString; 2]>,
}

impl ReferenceKey {
    pub fn symbol(symbol: SymbolId) -> Self {
        Self {
            root: ReferenceRoot::Symbol(symbol),
            path: SmallVec::new(),
        }
    }

    pub fn child(&self, name: InternedString) -> Self {
        let mut path = self.path.clone();
        path.push(name);
        Self {
            root: self.root.clone(),
            path,
        }
    }

    /// Whether `self` names `other` or an object `other` is reached through.
    pub fn is_prefix_of(&self, other: &ReferenceKey) -> bool {
        self.root == other.root && other.path.starts_with(&self.path)
    }

    pub fn root_symbol(&self) -> Option<SymbolId> {
        match self.root {
            ReferenceRoot::Symbol(symbol) => Some(symbol),
            ReferenceRoot::This(..) => None,
        }
    }
}

/// A loop label whose type is being computed for one reference.
#[derive(Debug, Clone)]
pub(crate) struct LoopFrame {
    pub file: FileId,
    pub flow: FlowId,
    pub key: ReferenceKey,
    pub declared: TypeId,
    pub types: Vec<TypeId>,
}

/// State of one reference query.
struct FlowQuery<'k> {
    file: FileId,
    key: &'k ReferenceKey,
    declared: TypeId,
    initial: TypeId,
    /// Label results, valid until a loop frame grows.
    memo: FxHashMap<FlowId, TypeId>,
}

impl<'s> Checker<'s> {
    /// The key of a narrowable reference expression.
    pub(crate) fn reference_key(&mut self, file: FileId, node: NodeId) -> Option<ReferenceKey> {
        let tree = self.tree(file);
        let node = skip_parentheses(tree, node);
        match (tree.kind(node), self.data(file, node)) {
            (SyntaxKind::Identifier, NodeData::Identifier { name }) => {
                let symbol = self.resolve_name(file, node, *name, SymbolFlags::VALUE)?;
                Some(ReferenceKey::symbol(symbol))
            }
            (SyntaxKind::ThisKeyword, _) => Some(ReferenceKey {
                root: ReferenceRoot::This(file, self.this_container(file, node)),
                path: SmallVec::new(),
            }),
            (SyntaxKind::NonNullExpression, NodeData::Expr { expression }) => self.reference_key(file, *expression),
            (SyntaxKind::PropertyAccessExpression, NodeData::Access { expression, name }) => {
                let name = tree.name_of(*name)?;
                Some(self.reference_key(file, *expression)?.child(name))
            }
            (SyntaxKind::ElementAccessExpression, NodeData::Access { expression, name }) => {
                let member = self.literal_member_name(file, *name)?;
                Some(self.reference_key(file, *expression)?.child(member))
            }
            _ => None,
        }
    }

    /// The property name a literal element-access argument stands for.
    pub(crate) fn literal_member_name(&self, file: FileId, argument: NodeId) -> Option<InternedString> {
        match self.data(file, argument) {
            NodeData::StringLiteral { value } => Some(*value),
            NodeData::NumericLiteral { value } => Some(self.intern(&names::number_to_string(*value))),
            _ => None,
        }
    }

    /// The node `this` is bound by: the nearest non-arrow function, class
    /// member or the file.
    pub(crate) fn this_container(&self, file: FileId, node: NodeId) -> NodeId {
        let tree = self.tree(file);
        tree.ancestors(node)
            .find(|&a| {
                let kind = tree.kind(a);
                (kind.is_function_like_with_body() && kind != SyntaxKind::ArrowFunction)
                    || kind == SyntaxKind::PropertyDeclaration
            })
            .unwrap_or(SyntaxTree::ROOT)
    }

    /// The flow node in effect at `node`.
    pub(crate) fn flow_position(&self, file: FileId, node: NodeId) -> Option<FlowId> {
        let tree = self.tree(file);
        let bound = self.bound(file);
        std::iter::once(node)
            .chain(tree.ancestors(node))
            .find_map(|n| bound.flow_of(n))
    }

    /// The type of the reference `key` at `flow`, starting from `initial`
    /// where the walk reaches the reference's declaration.
    pub(crate) fn flow_type_of_reference(
        &mut self,
        file: FileId,
        _reference: NodeId,
        key: &ReferenceKey,
        declared: TypeId,
        initial: TypeId,
        flow: FlowId,
    ) -> TypeId {
        let cacheable = !self.is_speculating() && self.flow_loops.is_empty() && initial == declared;
        let cache_key = (file, flow, key.clone(), declared);
        if cacheable {
            if let Some(cached) = self.session.caches.flow_types.get(&cache_key) {
                return *cached;
            }
        }
        let mut query = FlowQuery {
            file,
            key,
            declared,
            initial,
            memo: FxHashMap::default(),
        };
        let ty = self.flow_type_at(&mut query, flow);
        if cacheable {
            return *self.session.caches.flow_types.entry(cache_key).or_insert(ty);
        }
        ty
    }

    fn flow_type_at(&mut self, query: &mut FlowQuery<'_>, mut flow: FlowId) -> TypeId {
        loop {
            if self.is_cancelled() {
                return query.declared;
            }
            let graph = &self.bound(query.file).flow;
            let node = graph.node(flow);
            match node.kind {
                FlowKind::Unreachable => return TypeId::NEVER,
                FlowKind::Start => {
                    let Some(function) = node.node else {
                        return query.initial;
                    };
                    if self.is_captured_reference(query.file, query.key, function) {
                        if let Some(outer) = self.bound(query.file).flow_of(function) {
                            flow = outer;
                            continue;
                        }
                    }
                    return query.initial;
                }
                FlowKind::Assignment => {
                    let Some(target) = node.node else {
                        return query.declared;
                    };
                    let antecedent = node.antecedents.first().copied();
                    if let Some(ty) = self.assignment_effect(query, target) {
                        return ty;
                    }
                    match antecedent {
                        Some(next) => flow = next,
                        None => return query.initial,
                    }
                }
                FlowKind::TrueCondition | FlowKind::FalseCondition => {
                    let assume_true = node.kind == FlowKind::TrueCondition;
                    let (Some(condition), Some(&antecedent)) = (node.node, node.antecedents.first()) else {
                        return query.declared;
                    };
                    let ty = self.flow_type_at(query, antecedent);
                    if ty == TypeId::NEVER {
                        return ty;
                    }
                    let (file, key) = (query.file, query.key);
                    return self.discarding(|c| c.narrow_type(file, key, ty, condition, assume_true));
                }
                FlowKind::SwitchClause { clause_start, clause_end } => {
                    let (Some(switch), Some(&antecedent)) = (node.node, node.antecedents.first()) else {
                        return query.declared;
                    };
                    let ty = self.flow_type_at(query, antecedent);
                    let (file, key) = (query.file, query.key);
                    return self.discarding(|c| {
                        c.narrow_by_switch(file, key, ty, switch, clause_start as usize, clause_end as usize)
                    });
                }
                FlowKind::Call => {
                    let (Some(call), Some(&antecedent)) = (node.node, node.antecedents.first()) else {
                        return query.declared;
                    };
                    if let Some(narrowed) = self.assertion_effect(query, call, antecedent) {
                        return narrowed;
                    }
                    flow = antecedent;
                }
                FlowKind::BranchLabel => {
                    if let Some(&done) = query.memo.get(&flow) {
                        return done;
                    }
                    let antecedents: SmallVec<[FlowId; 4]> = node.antecedents.iter().copied().collect();
                    let mut types: SmallVec<[TypeId; 4]> = SmallVec::new();
                    for antecedent in antecedents {
                        let ty = self.flow_type_at(query, antecedent);
                        if !types.contains(&ty) {
                            types.push(ty);
                        }
                    }
                    let ty = self.types().union(&types);
                    query.memo.insert(flow, ty);
                    return ty;
                }
                FlowKind::LoopLabel => return self.loop_label_type(query, flow),
            }
        }
    }

    fn loop_label_type(&mut self, query: &mut FlowQuery<'_>, flow: FlowId) -> TypeId {
        let file = query.file;
        if let Some(frame) = self
            .flow_loops
            .iter()
            .find(|f| f.file == file && f.flow == flow && f.declared == query.declared && f.key == *query.key)
        {
            return self.types().union(&frame.types);
        }
        let antecedents: SmallVec<[FlowId; 4]> = self.bound(file).flow.node(flow).antecedents.iter().copied().collect();
        let Some((&entry, back_edges)) = antecedents.split_first() else {
            return query.declared;
        };
        let entry_type = self.flow_type_at(query, entry);
        self.flow_loops.push(LoopFrame {
            file,
            flow,
            key: query.key.clone(),
            declared: query.declared,
            types: vec![entry_type],
        });
        let frame_index = self.flow_loops.len() - 1;
        for round in 0..MAX_LOOP_ROUNDS {
            query.memo.clear();
            let before = self.flow_loops[frame_index].types.len();
            for &back in back_edges {
                let ty = self.flow_type_at(query, back);
                let frame = &mut self.flow_loops[frame_index];
                if !frame.types.contains(&ty) {
                    frame.types.push(ty);
                }
            }
            if self.flow_loops[frame_index].types.len() == before {
                break;
            }
            if round + 1 == MAX_LOOP_ROUNDS {
                trace!(flow = flow.0, "loop label did not settle");
                self.flow_loops[frame_index].types.push(query.declared);
            }
        }
        query.memo.clear();
        let frame = self.flow_loops.pop();
        let types = frame.map(|f| f.types).unwrap_or_default();
        self.types().union(&types)
    }

    /// The type an assignment flow node gives the reference, or `None` when
    /// it does not touch it.
    fn assignment_effect(&mut self, query: &FlowQuery<'_>, target: NodeId) -> Option<TypeId> {
        let file = query.file;
        let tree = self.tree(file);
        if tree.kind(target) == SyntaxKind::VariableDeclaration {
            let symbol = self.node_symbol(file, target)?;
            if query.key.root_symbol() != Some(symbol) {
                return None;
            }
            if !query.key.path.is_empty() {
                return Some(query.declared);
            }
            return Some(self.declaration_assigned_type(file, target, query.declared));
        }
        let target_key = self.reference_key(file, target)?;
        if target_key == *query.key {
            return Some(self.expression_assigned_type(file, target, query.declared));
        }
        if target_key.is_prefix_of(query.key) {
            return Some(query.declared);
        }
        None
    }

    fn declaration_assigned_type(&mut self, file: FileId, declaration: NodeId, declared: TypeId) -> TypeId {
        let NodeData::Variable {
            initializer: Some(initializer),
            ..
        } = self.data(file, declaration)
        else {
            return declared;
        };
        let initializer = *initializer;
        if self.is_for_in_or_of_head(file, declaration) {
            return declared;
        }
        let assigned = self.discarding(|c| c.check_expression(file, initializer));
        self.assignment_reduced_type(declared, assigned)
    }

    fn expression_assigned_type(&mut self, file: FileId, target: NodeId, declared: TypeId) -> TypeId {
        let tree = self.tree(file);
        let mut child = target;
        let mut parent = tree.parent(target);
        while let Some(p) = parent {
            if tree.kind(p) != SyntaxKind::ParenthesizedExpression {
                break;
            }
            child = p;
            parent = tree.parent(p);
        }
        match parent.map(|p| (p, self.data(file, p))) {
            Some((
                _,
                NodeData::Binary {
                    left,
                    operator: SyntaxKind::EqualsToken,
                    right,
                },
            )) if *left == child => {
                let right = *right;
                let assigned = self.discarding(|c| c.check_expression(file, right));
                self.assignment_reduced_type(declared, assigned)
            }
            Some((p, _))
                if matches!(
                    tree.kind(p),
                    SyntaxKind::PrefixUnaryExpression | SyntaxKind::PostfixUnaryExpression
                ) =>
            {
                if self.types().is(declared, TypeFlags::BIGINT_LIKE) {
                    TypeId::BIGINT
                } else if self.types().is(declared, TypeFlags::ANY_OR_UNKNOWN) {
                    declared
                } else {
                    TypeId::NUMBER
                }
            }
            _ => declared,
        }
    }

    /// The constituents of `declared` an assigned value could belong to.
    pub(crate) fn assignment_reduced_type(&mut self, declared: TypeId, assigned: TypeId) -> TypeId {
        let assigned = self.types().regular_type_of(assigned);
        if declared == assigned || assigned == TypeId::NEVER {
            return declared;
        }
        if !self.types().is(declared, TypeFlags::UNION) {
            return declared;
        }
        let constituents: Vec<TypeId> = self.types().get(declared).display_constituents().to_vec();
        let assigned_parts: Vec<TypeId> = if self.types().is(assigned, TypeFlags::UNION) {
            self.types().get(assigned).constituents().to_vec()
        } else {
            vec![assigned]
        };
        let kept: Vec<TypeId> = constituents
            .into_iter()
            .filter(|&c| assigned_parts.iter().any(|&a| self.is_type_assignable_to(a, c)))
            .collect();
        if kept.is_empty() {
            return declared;
        }
        self.types().union(&kept)
    }

    fn is_for_in_or_of_head(&self, file: FileId, declaration: NodeId) -> bool {
        let tree = self.tree(file);
        tree.parent(declaration)
            .and_then(|list| tree.parent(list))
            .is_some_and(|p| matches!(tree.kind(p), SyntaxKind::ForInStatement | SyntaxKind::ForOfStatement))
    }

    /// Narrowing by an `asserts` predicate of a call in statement position.
    fn assertion_effect(&mut self, query: &mut FlowQuery<'_>, call: NodeId, antecedent: FlowId) -> Option<TypeId> {
        let file = query.file;
        let signature = self.discarding(|c| c.resolved_signature(file, call))?;
        let predicate = self.session.signature(signature).type_predicate?;
        if !predicate.asserts {
            return None;
        }
        let NodeData::Call {
            expression, arguments, ..
        } = self.data(file, call)
        else {
            return None;
        };
        let subject = match predicate.target {
            PredicateTarget::Parameter(index) => *arguments.get(index as usize)?,
            PredicateTarget::This => match self.data(file, *expression) {
                NodeData::Access { expression, .. } => *expression,
                _ => return None,
            },
        };
        let subject_key = self.reference_key(file, subject)?;
        if subject_key != *query.key {
            return None;
        }
        let ty = self.flow_type_at(query, antecedent);
        Some(match predicate.ty {
            Some(asserted) => self.narrow_to_predicate_type(ty, asserted, true),
            None => self.narrow_by_truthiness(ty, true),
        })
    }

    /// Whether a reference inside `function` may keep the narrowing in
    /// effect where the function was created.
    fn is_captured_reference(&mut self, file: FileId, key: &ReferenceKey, function: NodeId) -> bool {
        if !matches!(
            self.kind(file, function),
            SyntaxKind::FunctionExpression | SyntaxKind::ArrowFunction
        ) {
            return false;
        }
        let Some(symbol) = key.root_symbol() else {
            return false;
        };
        let Some(declaration) = self.symbol(symbol).value_declaration else {
            return false;
        };
        if declaration.file != file {
            return false;
        }
        let tree = self.tree(file);
        if tree.ancestors(declaration.node).any(|a| a == function) {
            return false;
        }
        let is_const = tree.kind(declaration.node) == SyntaxKind::VariableDeclaration
            && tree
                .parent(declaration.node)
                .is_some_and(|list| tree.node(list).flags.contains(tyck_ast::types::NodeFlags::CONST));
        let is_parameter_or_let = matches!(
            tree.kind(declaration.node),
            SyntaxKind::Parameter | SyntaxKind::VariableDeclaration
        );
        is_const || (is_parameter_or_let && !self.assigned_symbols(file).contains(&symbol))
    }

    /// Symbols assigned anywhere in `file` after their declaration.
    fn assigned_symbols(&mut self, file: FileId) -> Arc<FxHashSet<SymbolId>> {
        let key = (file, SyntaxTree::ROOT);
        if let Some(done) = self.session.caches.assigned_symbols.get(&key) {
            return Arc::clone(&done);
        }
        let tree = self.tree(file);
        let mut targets = Vec::new();
        for index in 0..tree.len() {
            let node = NodeId(index as u32);
            match (tree.kind(node), self.data(file, node)) {
                (SyntaxKind::BinaryExpression, NodeData::Binary { left, operator, .. })
                    if operator.is_assignment_operator() =>
                {
                    targets.push(skip_parentheses(tree, *left));
                }
                (
                    SyntaxKind::PrefixUnaryExpression | SyntaxKind::PostfixUnaryExpression,
                    NodeData::Unary { operator, operand },
                ) if matches!(operator, SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken) => {
                    targets.push(skip_parentheses(tree, *operand));
                }
                (
                    SyntaxKind::ForInStatement | SyntaxKind::ForOfStatement,
                    NodeData::Loop {
                        initializer: Some(initializer),
                        ..
                    },
                ) if tree.kind(*initializer) == SyntaxKind::Identifier => targets.push(*initializer),
                _ => {}
            }
        }
        let mut assigned = FxHashSet::default();
        for target in targets {
            if let Some(name) = tree.name_of(target).filter(|_| tree.kind(target) == SyntaxKind::Identifier) {
                if let Some(symbol) = self.resolve_name(file, target, name, SymbolFlags::VALUE) {
                    assigned.insert(symbol);
                }
            }
        }
        let assigned = Arc::new(assigned);
        Arc::clone(&self.session.caches.assigned_symbols.entry(key).or_insert(assigned))
    }
}

#[cfg(test)]
mod tests {
    use tyck_options::CheckerOptions;

    use crate::session::Session;

    fn flow_type_at_marker(source: &str, marker: &str, name: &str) -> String {
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let file = session.file_id("a.ts").unwrap();
        let mut checker = session.checker();
        let tree = checker.tree(file);
        let offset = source.find(marker).unwrap() as u32;
        let node = tree.node_at_offset(offset).unwrap();
        let symbol = checker.get_symbol_at_location(file, node).unwrap();
        assert_eq!(checker.symbol_name(symbol), name);
        let ty = checker.get_flow_type(file, node, symbol);
        checker.type_to_string(ty)
    }

    #[test]
    fn test_branch_label_unions_both_arms() {
        let source = "declare const c: boolean;\nlet x: string | number | boolean = 1;\nif (c) { x = 'a'; } else { x = true; }\nx;";
        let at = source.rfind("x;").unwrap();
        let ty = flow_type_at_marker(source, &source[at..at + 2], "x");
        assert_eq!(ty, "string | true");
    }

    #[test]
    fn test_loop_reaches_fixed_point() {
        let source = "declare const c: boolean;\nlet x: string | number = 1;\nwhile (c) { x = 'a'; }\nx;";
        let at = source.rfind("x;").unwrap();
        let ty = flow_type_at_marker(source, &source[at..at + 2], "x");
        assert_eq!(ty, "string | number");
    }

    #[test]
    fn test_const_narrowing_survives_into_arrow() {
        let source = "declare const v: string | undefined;\nif (v) { const f = () => v; }";
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let file = session.file_id("a.ts").unwrap();
        let mut checker = session.checker();
        let tree = checker.tree(file);
        let offset = source.rfind("v;").unwrap() as u32;
        let node = tree.node_at_offset(offset).unwrap();
        let ty = checker.get_type_at_location(file, node);
        assert_eq!(checker.type_to_string(ty), "string");
    }
}
