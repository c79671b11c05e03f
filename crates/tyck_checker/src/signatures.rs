//! Signatures of function-like declarations, inferred return types and
//! contextual typing.
//!
//! A function or arrow expression whose parameters are not all annotated
//! takes their types from its contextual signature. Its signature is keyed
//! by those parameter types, so the same expression checked against two
//! candidate overloads yields two signatures.

use tyck_ast::types::{FileId, ModifierFlags, NodeFlags, NodeId, SymbolFlags};
use tyck_ast::{NodeData, SyntaxKind};
use tyck_binder::names::property_name;
use tyck_core::intern::InternedString;
use tyck_diagnostics::messages;

use crate::checker::{Checker, Resolving};
use crate::types::{
    ElementFlags, ObjectFlags, ObjectKey, Parameter, PredicateTarget, PropertyFlags, Signature, SignatureFlags,
    SignatureId, SignatureKind, TypeFlags, TypeId, TypeKey, TypePredicate,
};

impl<'s> Checker<'s> {
    // ========================================================================
    // Declarations
    // ========================================================================

    pub(crate) fn signature_of_declaration(&mut self, file: FileId, node: NodeId) -> SignatureId {
        let declaration = Self::declaration(file, node);
        if let Some(done) = self.session.caches.declaration_signatures.get(&declaration) {
            return *done;
        }
        let contextual = self.is_contextually_typed_function(file, node) && self.has_unannotated_parameter(file, node);
        let parameter_types = self.parameter_types_of(file, node);
        if contextual {
            let key = (declaration, parameter_types.clone().into_boxed_slice());
            if let Some(done) = self.session.caches.expression_signatures.get(&key) {
                return *done;
            }
            let signature = self.create_signature(file, node, &parameter_types);
            let id = self.session.add_signature(signature);
            return *self.session.caches.expression_signatures.entry(key).or_insert(id);
        }
        let signature = self.create_signature(file, node, &parameter_types);
        let id = self.session.add_signature(signature);
        *self.session.caches.declaration_signatures.entry(declaration).or_insert(id)
    }

    /// Whether a function-like node has a parameter, other than `this`,
    /// without a type annotation.
    pub(crate) fn has_unannotated_parameter(&self, file: FileId, node: NodeId) -> bool {
        let tree = self.tree(file);
        let Some(signature) = tree.signature(node) else {
            return false;
        };
        signature.parameters.iter().any(|&parameter| {
            !self.is_this_parameter(file, parameter)
                && matches!(
                    self.data(file, parameter),
                    NodeData::Variable {
                        type_annotation: None,
                        ..
                    }
                )
        })
    }

    pub(crate) fn is_this_parameter(&self, file: FileId, parameter: NodeId) -> bool {
        match self.data(file, parameter) {
            NodeData::Variable { name, .. } => self.tree(file).name_of(*name) == Some(self.session.names.this),
            _ => false,
        }
    }

    /// Types of the parameters of a function-like node, `this` excluded.
    fn parameter_types_of(&mut self, file: FileId, node: NodeId) -> Vec<TypeId> {
        let parameters = match self.tree(file).signature(node) {
            Some(signature) => signature.parameters.clone(),
            None => return Vec::new(),
        };
        let mut types = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            if self.is_this_parameter(file, parameter) {
                continue;
            }
            let ty = match self.node_symbol(file, parameter) {
                Some(symbol) if self.symbol(symbol).flags.intersects(SymbolFlags::VARIABLE) => self.symbol_type(symbol),
                _ => self.discarding(|c| c.parameter_type(file, parameter)),
            };
            types.push(ty);
        }
        types
    }

    fn create_signature(&mut self, file: FileId, node: NodeId, parameter_types: &[TypeId]) -> Signature {
        let tree = self.tree(file);
        let kind = tree.kind(node);
        let modifiers = tree.node(node).modifiers;
        let signature_kind = match kind {
            SyntaxKind::Constructor | SyntaxKind::ConstructSignature | SyntaxKind::ConstructorType => {
                SignatureKind::Construct
            }
            _ => SignatureKind::Call,
        };
        let mut flags = SignatureFlags::empty();
        if matches!(kind, SyntaxKind::MethodDeclaration | SyntaxKind::MethodSignature) {
            flags |= SignatureFlags::METHOD;
        }
        if modifiers.contains(ModifierFlags::ABSTRACT) {
            flags |= SignatureFlags::ABSTRACT;
        }
        let Some(data) = tree.signature(node) else {
            return Signature {
                declaration: Some(Self::declaration(file, node)),
                type_parameters: Box::new([]),
                parameters: Box::new([]),
                this_type: None,
                return_type: Some(TypeId::ERROR),
                type_predicate: None,
                min_argument_count: 0,
                has_rest: false,
                kind: signature_kind,
                flags,
                target: None,
            };
        };

        let class = (kind == SyntaxKind::Constructor)
            .then(|| tree.parent(node))
            .flatten()
            .and_then(|class| self.node_symbol(file, class));
        let type_parameters: Box<[TypeId]> = match class {
            Some(class) => self.local_type_parameters(class).iter().copied().collect(),
            None => data
                .type_parameters
                .iter()
                .map(|&tp| self.type_parameter_of_node(file, tp))
                .collect(),
        };

        let mut this_type = None;
        let mut parameters = Vec::with_capacity(data.parameters.len());
        let mut min_argument_count = 0;
        let mut has_rest = false;
        let mut types = parameter_types.iter().copied();
        for &parameter in &data.parameters {
            let NodeData::Variable {
                name,
                type_annotation,
                initializer,
            } = self.data(file, parameter)
            else {
                continue;
            };
            if self.is_this_parameter(file, parameter) {
                this_type = type_annotation.map(|annotation| self.type_from_type_node(file, annotation));
                continue;
            }
            let node_flags = tree.node(parameter).flags;
            let rest = node_flags.contains(NodeFlags::REST);
            let optional = node_flags.contains(NodeFlags::OPTIONAL) || initializer.is_some();
            if !optional && !rest {
                min_argument_count = parameters.len() + 1;
            }
            has_rest |= rest;
            parameters.push(Parameter {
                name: tree.name_of(*name).unwrap_or_else(|| self.intern("")),
                ty: types.next().unwrap_or(TypeId::ANY),
                optional,
                rest,
                symbol: self.node_symbol(file, parameter),
            });
        }
        // Only a trailing rest parameter counts as one.
        if has_rest && !parameters.last().is_some_and(|p| p.rest) {
            has_rest = false;
        }

        let mut type_predicate = None;
        let return_type = match data.return_type {
            Some(annotation) if tree.kind(annotation) == SyntaxKind::TypePredicate => {
                let asserts = tree.node(annotation).flags.contains(NodeFlags::ASSERTS);
                if let NodeData::TypePredicate {
                    parameter_name,
                    type_node,
                } = self.data(file, annotation)
                {
                    let target = match tree.kind(*parameter_name) {
                        SyntaxKind::ThisType | SyntaxKind::ThisKeyword => Some(PredicateTarget::This),
                        _ => {
                            let name = tree.name_of(*parameter_name);
                            parameters
                                .iter()
                                .position(|p| Some(p.name) == name)
                                .map(|i| PredicateTarget::Parameter(i as u32))
                        }
                    };
                    let ty = type_node.map(|t| self.type_from_type_node(file, t));
                    type_predicate = target.map(|target| TypePredicate { target, asserts, ty });
                }
                Some(if asserts { TypeId::VOID } else { TypeId::BOOLEAN })
            }
            Some(annotation) => Some(self.type_from_type_node(file, annotation)),
            None => match kind {
                SyntaxKind::Constructor => Some(class.map_or(TypeId::ERROR, |class| self.declared_type(class))),
                SyntaxKind::SetAccessor => Some(TypeId::VOID),
                _ if data.body.is_some() => None,
                _ => Some(TypeId::ANY),
            },
        };
        if return_type.is_none() {
            flags |= SignatureFlags::INFERRED_RETURN;
        }

        Signature {
            declaration: Some(Self::declaration(file, node)),
            type_parameters,
            parameters: parameters.into(),
            this_type,
            return_type,
            type_predicate,
            min_argument_count,
            has_rest,
            kind: signature_kind,
            flags,
            target: None,
        }
    }

    /// The type an argument at `index` is checked against.
    pub(crate) fn parameter_type_at(&self, signature: &Signature, index: usize) -> Option<TypeId> {
        let fixed = signature.fixed_parameters();
        if let Some(parameter) = fixed.get(index) {
            return Some(parameter.ty);
        }
        let rest = signature.rest_parameter()?;
        self.rest_element_type(rest.ty, index - fixed.len())
    }

    /// Element `offset` of a rest parameter's array or tuple type.
    pub(crate) fn rest_element_type(&self, ty: TypeId, offset: usize) -> Option<TypeId> {
        if let Some(element) = self.types().array_element(ty) {
            return Some(element);
        }
        let data = self.types().get(ty);
        match &data.key {
            TypeKey::Object(ObjectKey::Tuple { elements, flags, .. }) => {
                if let Some(&element) = elements.get(offset) {
                    return Some(element);
                }
                match (elements.last(), flags.last()) {
                    (Some(&last), Some(flag)) if flag.contains(ElementFlags::REST) => Some(last),
                    _ => None,
                }
            }
            _ if data.is(TypeFlags::ANY | TypeFlags::ERROR) => Some(ty),
            _ => None,
        }
    }

    // ========================================================================
    // Return types
    // ========================================================================

    pub(crate) fn return_type_of_signature(&mut self, id: SignatureId) -> TypeId {
        let signature = self.session.signature(id);
        if let Some(ty) = signature.return_type {
            return ty;
        }
        if let Some(ty) = self.cached_return_type(id) {
            return ty;
        }
        if let Some((target, mapper)) = &signature.target {
            let base = self.return_type_of_signature(*target);
            let ty = self.instantiate(base, mapper);
            return self.store_return_type(id, ty);
        }
        let Some(declaration) = signature.declaration else {
            return TypeId::ANY;
        };
        if !self.push_resolving(Resolving::ReturnType(id)) {
            return TypeId::ANY;
        }
        let ty = self.discarding(|c| c.infer_return_type(declaration.file, declaration.node));
        if self.pop_resolving() {
            let first = self.session.caches.return_types.get(&id).is_none();
            if first && self.options().no_implicit_any() {
                let tree = self.tree(declaration.file);
                let name_node = tree.declaration_name(declaration.node);
                let name = name_node.map_or("(Anonymous function)", |n| tree.identifier_text(n));
                self.publish(
                    declaration.file,
                    name_node.unwrap_or(declaration.node),
                    &messages::_0_IMPLICITLY_HAS_RETURN_TYPE_ANY,
                    &[name],
                );
            }
            return self.store_return_type(id, TypeId::ANY);
        }
        self.store_return_type(id, ty)
    }

    /// The union of what a body returns, widened unless the context asks
    /// for literals.
    fn infer_return_type(&mut self, file: FileId, function: NodeId) -> TypeId {
        let Some(body) = self.tree(file).signature(function).and_then(|s| s.body) else {
            return TypeId::ANY;
        };
        let ty = if self.kind(file, body) != SyntaxKind::Block {
            self.check_expression(file, body)
        } else {
            let mut returns = Vec::new();
            self.collect_returns(file, body, &mut returns);
            let mut types = Vec::with_capacity(returns.len() + 1);
            let mut bare_return = false;
            for expression in returns {
                match expression {
                    Some(expression) => types.push(self.check_expression(file, expression)),
                    None => bare_return = true,
                }
            }
            let end_reachable = self.is_function_end_reachable(file, function);
            if types.is_empty() {
                return if end_reachable || bare_return { TypeId::VOID } else { TypeId::NEVER };
            }
            if (end_reachable || bare_return) && self.strict_null_checks() {
                types.push(TypeId::UNDEFINED);
            }
            self.types().union(&types)
        };
        let contextual = self.contextual_return_type(file, function);
        let ty = match contextual {
            Some(contextual) if self.keeps_literals(contextual, ty) => ty,
            _ => self.widen_literal_type(ty),
        };
        self.widen_object_literal(ty)
    }

    /// Expressions of the `return` statements of a body, skipping nested
    /// functions and classes. A bare `return` contributes `None`.
    pub(crate) fn collect_returns(&self, file: FileId, node: NodeId, out: &mut Vec<Option<NodeId>>) {
        let tree = self.tree(file);
        tree.for_each_child(node, |child| {
            let kind = tree.kind(child);
            if kind.is_function_like() || kind == SyntaxKind::ClassDeclaration {
                return;
            }
            if kind == SyntaxKind::ReturnStatement {
                if let NodeData::Return { expression } = &tree.node(child).data {
                    out.push(*expression);
                }
                return;
            }
            if kind.is_statement() || matches!(kind, SyntaxKind::CaseClause | SyntaxKind::DefaultClause | SyntaxKind::CaseBlock | SyntaxKind::CatchClause) {
                self.collect_returns(file, child, out);
            }
        });
    }

    pub(crate) fn is_function_end_reachable(&self, file: FileId, function: NodeId) -> bool {
        let bound = self.bound(file);
        match bound.function_end_flow.get(&function) {
            Some(&flow) => bound.flow.is_reachable(flow),
            None => false,
        }
    }

    // ========================================================================
    // Contextual types
    // ========================================================================

    /// The type the surrounding syntax expects `node` to have.
    pub(crate) fn contextual_type(&mut self, file: FileId, node: NodeId) -> Option<TypeId> {
        if let Some(ty) = self.overlay_contextual((file, node)) {
            return Some(ty);
        }
        let tree = self.tree(file);
        let parent = tree.parent(node)?;
        match (tree.kind(parent), self.data(file, parent)) {
            (SyntaxKind::ParenthesizedExpression, _) => self.contextual_type(file, parent),
            (
                SyntaxKind::VariableDeclaration | SyntaxKind::PropertyDeclaration | SyntaxKind::Parameter,
                NodeData::Variable {
                    type_annotation: Some(annotation),
                    initializer: Some(initializer),
                    ..
                },
            ) if *initializer == node => {
                let annotation = *annotation;
                Some(self.type_from_type_node(file, annotation))
            }
            (SyntaxKind::AsExpression | SyntaxKind::SatisfiesExpression, NodeData::Assertion { expression, type_node })
                if *expression == node =>
            {
                if tree.node(parent).flags.contains(NodeFlags::CONST_ASSERTION) {
                    return None;
                }
                let type_node = *type_node;
                Some(self.type_from_type_node(file, type_node))
            }
            (SyntaxKind::ReturnStatement, _) => {
                let function = self.containing_function(file, parent)?;
                self.contextual_return_type(file, function)
            }
            (SyntaxKind::ArrowFunction, NodeData::Signature(data)) if data.body == Some(node) => {
                self.contextual_return_type(file, parent)
            }
            (SyntaxKind::CallExpression | SyntaxKind::NewExpression, NodeData::Call { arguments, .. }) => {
                let index = arguments.iter().position(|&a| a == node)?;
                self.contextual_argument_type(file, parent, index)
            }
            (
                SyntaxKind::BinaryExpression,
                NodeData::Binary {
                    left,
                    operator,
                    right,
                },
            ) => {
                let (left, operator, right) = (*left, *operator, *right);
                match operator {
                    SyntaxKind::EqualsToken if right == node => Some(self.discarding(|c| c.check_expression(file, left))),
                    SyntaxKind::BarBarToken | SyntaxKind::QuestionQuestionToken => self.contextual_type(file, parent),
                    SyntaxKind::AmpersandAmpersandToken | SyntaxKind::CommaToken if right == node => {
                        self.contextual_type(file, parent)
                    }
                    _ => None,
                }
            }
            (SyntaxKind::ConditionalExpression, NodeData::Conditional { condition, .. }) if *condition != node => {
                self.contextual_type(file, parent)
            }
            (SyntaxKind::ArrayLiteralExpression, NodeData::List { elements }) => {
                let index = elements.iter().position(|&e| e == node)?;
                let array = self.contextual_type(file, parent)?;
                self.contextual_element_type(array, index)
            }
            (
                SyntaxKind::PropertyAssignment,
                NodeData::Variable {
                    name,
                    initializer: Some(initializer),
                    ..
                },
            ) if *initializer == node => {
                let name = property_name(tree, *name, &self.session.interner)?;
                let object = tree.parent(parent)?;
                let object_type = self.contextual_type(file, object)?;
                self.contextual_property_type(object_type, name)
            }
            (SyntaxKind::ObjectLiteralExpression, _)
                if matches!(
                    tree.kind(node),
                    SyntaxKind::MethodDeclaration | SyntaxKind::GetAccessor | SyntaxKind::SetAccessor
                ) =>
            {
                let name = tree.declaration_name(node)?;
                let name = property_name(tree, name, &self.session.interner)?;
                let object_type = self.contextual_type(file, parent)?;
                self.contextual_property_type(object_type, name)
            }
            _ => None,
        }
    }

    /// The parameter type a call argument is checked against, once the call
    /// has been resolved.
    fn contextual_argument_type(&mut self, file: FileId, call: NodeId, index: usize) -> Option<TypeId> {
        if self.resolving_calls.contains(&(file, call)) {
            return None;
        }
        let signature = self.resolved_signature(file, call)?;
        let signature = self.session.signature(signature);
        self.parameter_type_at(&signature, index)
    }

    /// What a property of an object literal is expected to hold.
    pub(crate) fn contextual_property_type(&mut self, object: TypeId, name: InternedString) -> Option<TypeId> {
        let mut found = Vec::new();
        for part in self.constituents_of(object) {
            let part = self.contextual_apparent_type(part);
            if !self.types().is(part, TypeFlags::OBJECT | TypeFlags::INTERSECTION) {
                continue;
            }
            if let Some(property) = self.property_of_type(part, name) {
                found.push(self.declared_type_of_property(&property));
            } else if let Some(info) = self.applicable_index_info(part, name) {
                found.push(info.value_type);
            }
        }
        (!found.is_empty()).then(|| self.types().union(&found))
    }

    /// What element `index` of an array literal is expected to hold.
    pub(crate) fn contextual_element_type(&mut self, array: TypeId, index: usize) -> Option<TypeId> {
        let mut found = Vec::new();
        for part in self.constituents_of(array) {
            let part = self.contextual_apparent_type(part);
            if self.types().get(part).object_flags.contains(ObjectFlags::TUPLE) {
                if let Some(element) = self.rest_element_type(part, index) {
                    found.push(element);
                }
                continue;
            }
            if let Some(element) = self.types().array_element(part) {
                found.push(element);
                continue;
            }
            let name = self.intern(&index.to_string());
            if let Some(info) = self.applicable_index_info(part, name) {
                found.push(info.value_type);
            }
        }
        (!found.is_empty()).then(|| self.types().union(&found))
    }

    fn contextual_apparent_type(&mut self, ty: TypeId) -> TypeId {
        if self.types().is(ty, TypeFlags::INSTANTIABLE) {
            self.apparent_type(ty)
        } else {
            ty
        }
    }

    pub(crate) fn constituents_of(&self, ty: TypeId) -> Vec<TypeId> {
        let data = self.types().get(ty);
        if data.is(TypeFlags::UNION) {
            data.constituents().to_vec()
        } else {
            vec![ty]
        }
    }

    /// The single call signature of a function expression's contextual
    /// type. Overloaded or absent contexts give none.
    pub(crate) fn contextual_signature(&mut self, file: FileId, function: NodeId) -> Option<SignatureId> {
        let contextual = self.contextual_type(file, function)?;
        let mut found: Option<SignatureId> = None;
        for part in self.constituents_of(contextual) {
            if self.types().is(part, TypeFlags::NULLABLE | TypeFlags::PRIMITIVE) {
                continue;
            }
            let part = self.contextual_apparent_type(part);
            let signatures = self.signatures_of_type(part, SignatureKind::Call);
            match (signatures.as_slice(), found) {
                ([], _) => {}
                ([single], None) => found = Some(*single),
                ([single], Some(existing)) if *single == existing => {}
                _ => return None,
            }
        }
        found
    }

    pub(crate) fn contextual_parameter_type(&mut self, file: FileId, parameter: NodeId) -> Option<TypeId> {
        let function = self.parent(file, parameter)?;
        if !self.is_contextually_typed_function(file, function) {
            return None;
        }
        let parameters = self.tree(file).signature(function)?.parameters.clone();
        let index = parameters
            .iter()
            .filter(|&&p| !self.is_this_parameter(file, p))
            .position(|&p| p == parameter)?;
        let signature = self.contextual_signature(file, function)?;
        let signature = self.session.signature(signature);
        if !self.tree(file).node(parameter).flags.contains(NodeFlags::REST) {
            return self.parameter_type_at(&signature, index);
        }
        if let Some(rest) = signature.rest_parameter() {
            if index >= signature.fixed_parameters().len() {
                return Some(rest.ty);
            }
        }
        let mut elements = Vec::new();
        let mut flags = Vec::new();
        for (i, p) in signature.parameters.iter().enumerate().skip(index) {
            if p.rest {
                elements.push(self.rest_element_type(p.ty, 0).unwrap_or(TypeId::ANY));
                flags.push(ElementFlags::REST);
                break;
            }
            elements.push(self.parameter_type_at(&signature, i).unwrap_or(TypeId::ANY));
            flags.push(if p.optional { ElementFlags::OPTIONAL } else { ElementFlags::REQUIRED });
        }
        Some(self.types().tuple(elements, flags, false))
    }

    /// The return type a function body is checked against: its annotation,
    /// else what its contextual signature returns.
    pub(crate) fn contextual_return_type(&mut self, file: FileId, function: NodeId) -> Option<TypeId> {
        let annotation = self.tree(file).signature(function)?.return_type;
        if let Some(annotation) = annotation {
            if self.kind(file, annotation) == SyntaxKind::TypePredicate {
                return Some(TypeId::BOOLEAN);
            }
            return Some(self.type_from_type_node(file, annotation));
        }
        if !self.is_contextually_typed_function(file, function) {
            return None;
        }
        let signature = self.contextual_signature(file, function)?;
        Some(self.return_type_of_signature(signature))
    }

    // ========================================================================
    // Widening
    // ========================================================================

    /// Whether `contextual` asks for the literal types in `ty` to be kept:
    /// some constituent is a literal of the same primitive, or a type
    /// variable constrained to that primitive.
    pub(crate) fn keeps_literals(&mut self, contextual: TypeId, ty: TypeId) -> bool {
        let literal_flags = self
            .constituents_of(ty)
            .into_iter()
            .fold(TypeFlags::empty(), |acc, t| acc | self.types().flags(t))
            & (TypeFlags::LITERAL | TypeFlags::ENUM_LITERAL);
        if literal_flags.is_empty() {
            return false;
        }
        for part in self.constituents_of(contextual) {
            let flags = self.types().flags(part);
            if flags.intersects(TypeFlags::TYPE_VARIABLE) {
                let constraint = self.base_constraint(part);
                let constraint_flags = self
                    .constituents_of(constraint)
                    .into_iter()
                    .fold(TypeFlags::empty(), |acc, t| acc | self.types().flags(t));
                if Self::literal_kind_matches(literal_flags, constraint_flags, true) {
                    return true;
                }
                continue;
            }
            if Self::literal_kind_matches(literal_flags, flags, false) {
                return true;
            }
        }
        false
    }

    fn literal_kind_matches(literal: TypeFlags, contextual: TypeFlags, primitive_ok: bool) -> bool {
        let pairs = [
            (TypeFlags::STRING_LITERAL, TypeFlags::STRING_LITERAL, TypeFlags::STRING),
            (TypeFlags::NUMBER_LITERAL, TypeFlags::NUMBER_LITERAL | TypeFlags::ENUM_LITERAL, TypeFlags::NUMBER),
            (TypeFlags::BIGINT_LITERAL, TypeFlags::BIGINT_LITERAL, TypeFlags::BIGINT),
            (TypeFlags::BOOLEAN_LITERAL, TypeFlags::BOOLEAN_LITERAL, TypeFlags::BOOLEAN),
            (TypeFlags::ENUM_LITERAL, TypeFlags::ENUM_LITERAL, TypeFlags::ENUM),
        ];
        pairs.iter().any(|&(kind, same, primitive)| {
            literal.intersects(kind) && (contextual.intersects(same) || (primitive_ok && contextual.intersects(primitive)))
        })
    }

    /// Literal types replaced by their primitive.
    pub(crate) fn widen_literal_type(&mut self, ty: TypeId) -> TypeId {
        let flags = self.types().flags(ty);
        if flags.intersects(TypeFlags::UNION) {
            return self.map_type(ty, |c, t| c.widen_literal_type(t));
        }
        if flags.intersects(TypeFlags::ENUM_LITERAL) {
            if let TypeKey::EnumLiteral { enum_symbol, .. } = &self.types().get(ty).key {
                let enum_symbol = *enum_symbol;
                return self.declared_type(enum_symbol);
            }
        }
        if flags.intersects(TypeFlags::STRING_LITERAL) {
            TypeId::STRING
        } else if flags.intersects(TypeFlags::NUMBER_LITERAL) {
            TypeId::NUMBER
        } else if flags.intersects(TypeFlags::BIGINT_LITERAL) {
            TypeId::BIGINT
        } else if flags.intersects(TypeFlags::BOOLEAN_LITERAL) {
            TypeId::BOOLEAN
        } else {
            ty
        }
    }

    /// The regular twin of an object literal type, with the literal types
    /// of its mutable properties widened.
    pub(crate) fn widen_object_literal(&mut self, ty: TypeId) -> TypeId {
        let data = self.types().get(ty);
        match &data.key {
            TypeKey::Object(ObjectKey::Literal { properties, .. }) => {
                let properties: Vec<_> = properties.to_vec();
                let widened = properties
                    .into_iter()
                    .map(|mut p| {
                        if !p.flags.contains(PropertyFlags::READONLY) {
                            let widened = self.widen_literal_type(p.ty);
                            p.ty = self.widen_nullable(widened);
                        }
                        p.ty = self.widen_object_literal(p.ty);
                        p
                    })
                    .collect();
                self.types().object_literal(widened, false)
            }
            TypeKey::Union(_) => self.map_type(ty, |c, t| c.widen_object_literal(t)),
            _ => ty,
        }
    }

    /// Without `strictNullChecks` a declaration initialised with `null` or
    /// `undefined` is `any`.
    fn widen_nullable(&mut self, ty: TypeId) -> TypeId {
        if !self.strict_null_checks() && self.types().is(ty, TypeFlags::NULLABLE) && !self.types().is(ty, TypeFlags::UNION) {
            return TypeId::ANY;
        }
        ty
    }

    /// The type a declaration gets from its initializer.
    pub(crate) fn widened_declaration_type(&mut self, ty: TypeId, keep_literals: bool) -> TypeId {
        let ty = if keep_literals { ty } else { self.widen_literal_type(ty) };
        let ty = self.widen_object_literal(ty);
        self.widen_nullable(ty)
    }

    /// The `this` type inside `node`.
    pub(crate) fn this_type_at(&mut self, file: FileId, node: NodeId) -> Option<TypeId> {
        let container = self.this_container(file, node);
        if container != tyck_ast::SyntaxTree::ROOT && self.kind(file, container).is_function_like() {
            let explicit = self.tree(file).signature(container).and_then(|s| {
                s.parameters
                    .iter()
                    .copied()
                    .find(|&p| self.is_this_parameter(file, p))
            });
            if let Some(parameter) = explicit {
                if let NodeData::Variable {
                    type_annotation: Some(annotation),
                    ..
                } = self.data(file, parameter)
                {
                    let annotation = *annotation;
                    return Some(self.type_from_type_node(file, annotation));
                }
            }
        }
        let class = self.this_container_class(file, node)?;
        let symbol = self.node_symbol(file, class)?;
        if self.is_in_static_member(file, node) {
            return Some(self.symbol_type(symbol));
        }
        Some(self.declared_type(symbol))
    }
}

#[cfg(test)]
mod tests {
    use tyck_options::CheckerOptions;

    use crate::session::Session;

    /// Helper: the displayed type of the last occurrence of `name`.
    fn type_of_last(source: &str, name: &str) -> String {
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let file = session.file_id("a.ts").unwrap();
        let mut checker = session.checker();
        let offset = source.rfind(name).unwrap() as u32;
        let node = checker.tree(file).node_at_offset(offset).unwrap();
        let ty = checker.get_type_at_location(file, node);
        checker.type_to_string(ty)
    }

    #[test]
    fn test_return_type_is_inferred_and_widened() {
        assert_eq!(type_of_last("function f() { return 1; }\nf;", "f"), "() => number");
    }

    #[test]
    fn test_return_type_unions_all_returns() {
        let source = "function f(b: boolean) { if (b) { return 'a'; } return 2; }\nf;";
        assert_eq!(type_of_last(source, "f"), "(b: boolean) => string | number");
    }

    #[test]
    fn test_missing_return_adds_undefined() {
        let source = "function f(b: boolean) { if (b) { return 1; } }\nf;";
        assert_eq!(type_of_last(source, "f"), "(b: boolean) => number | undefined");
    }

    #[test]
    fn test_no_return_is_void() {
        assert_eq!(type_of_last("function f() { }\nf;", "f"), "() => void");
    }

    #[test]
    fn test_contextual_parameter_from_annotation() {
        let source = "const f: (n: number) => void = (x) => { x; };";
        assert_eq!(type_of_last(source, "x"), "number");
    }

    #[test]
    fn test_contextual_return_keeps_literals() {
        let source = "const f: () => 'a' | 'b' = () => 'a';\nf;";
        assert_eq!(type_of_last(source, "f"), "() => \"a\" | \"b\"");
    }

    #[test]
    fn test_optional_and_rest_parameters() {
        let source = "function f(a: string, b?: number, ...c: boolean[]) {}\nf;";
        assert_eq!(
            type_of_last(source, "f"),
            "(a: string, b?: number, ...c: boolean[]) => void"
        );
    }

    #[test]
    fn test_let_widens_const_keeps_literal() {
        assert_eq!(type_of_last("let a = 'x';\na;", "a"), "string");
        assert_eq!(type_of_last("const a = 'x';\na;", "a"), "\"x\"");
        assert_eq!(type_of_last("const o = { k: 'x' };\no;", "o"), "{ k: string; }");
    }
}
