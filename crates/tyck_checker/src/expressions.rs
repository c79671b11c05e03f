//! Expression checking.
//!
//! `check_expression` is the single entry point. Outside of speculation its
//! results go into the session's node cache; in reporting mode the node is
//! re-walked so its diagnostics land in the current frame.

use tyck_ast::types::{FileId, NodeFlags, NodeId, SymbolFlags, SymbolId};
use tyck_ast::{NodeData, SyntaxKind};
use tyck_binder::{names, skip_parentheses};
use tyck_core::intern::InternedString;
use tyck_diagnostics::{messages, DiagnosticMessage};

use crate::checker::Checker;
use crate::flow::ReferenceKey;
use crate::types::{
    ElementFlags, LiteralProperty, ObjectFlags, ObjectKey, PropertyFlags, PropertyInfo, RelationKind, TypeFlags,
    TypeId, TypeKey,
};

impl<'s> Checker<'s> {
    /// The type of an expression node.
    pub(crate) fn check_expression(&mut self, file: FileId, node: NodeId) -> TypeId {
        let key = (file, node);
        if !self.is_reporting() && !self.is_speculating() {
            if let Some(ty) = self.session.caches.node_types.get(&key) {
                return *ty;
            }
        }
        if self.is_cancelled() {
            return TypeId::ERROR;
        }
        let ty = self.compute_expression_type(file, node);
        if self.is_speculating()
            || !self.resolving_calls.is_empty()
            || !self.circular.is_empty()
            || !self.flow_loops.is_empty()
        {
            return ty;
        }
        let stored = *self.session.caches.node_types.entry(key).or_insert(ty);
        stored
    }

    fn compute_expression_type(&mut self, file: FileId, node: NodeId) -> TypeId {
        let kind = self.kind(file, node);
        match (kind, self.data(file, node)) {
            (SyntaxKind::Identifier, NodeData::Identifier { name }) => self.check_identifier(file, node, *name),
            (SyntaxKind::NumericLiteral, NodeData::NumericLiteral { value }) => self.types().literal_number(*value),
            (SyntaxKind::StringLiteral | SyntaxKind::NoSubstitutionTemplateLiteral, NodeData::StringLiteral { value }) => {
                self.types().literal_string(*value)
            }
            (SyntaxKind::BigIntLiteral, NodeData::BigIntLiteral { text }) => self.types().literal_bigint(*text),
            (SyntaxKind::TrueKeyword, _) => TypeId::TRUE,
            (SyntaxKind::FalseKeyword, _) => TypeId::FALSE,
            (SyntaxKind::NullKeyword, _) => TypeId::NULL,
            (SyntaxKind::ThisKeyword, _) => self.check_this(file, node),
            (SyntaxKind::SuperKeyword, _) => self.check_super(file, node),
            (SyntaxKind::OmittedExpression, _) => TypeId::UNDEFINED,
            (SyntaxKind::TemplateExpression, NodeData::Template { spans, .. }) => {
                for &span in spans {
                    if let NodeData::TemplateSpan { expression, .. } = self.data(file, span) {
                        self.check_expression(file, *expression);
                    }
                }
                TypeId::STRING
            }
            (SyntaxKind::ParenthesizedExpression, NodeData::Expr { expression }) => {
                self.check_expression(file, *expression)
            }
            (SyntaxKind::TypeOfExpression, NodeData::Expr { expression }) => {
                self.check_expression(file, *expression);
                TypeId::STRING
            }
            (SyntaxKind::VoidExpression, NodeData::Expr { expression }) => {
                self.check_expression(file, *expression);
                TypeId::UNDEFINED
            }
            (SyntaxKind::DeleteExpression, NodeData::Expr { expression }) => {
                self.check_expression(file, *expression);
                TypeId::BOOLEAN
            }
            (SyntaxKind::NonNullExpression, NodeData::Expr { expression }) => {
                let ty = self.check_expression(file, *expression);
                self.non_nullable_type(ty)
            }
            (SyntaxKind::SpreadElement, NodeData::Expr { expression }) => {
                let ty = self.check_expression(file, *expression);
                self.check_iterable(file, *expression, ty)
            }
            (SyntaxKind::ExpressionWithTypeArguments, NodeData::Call { expression, .. }) => {
                self.check_expression(file, *expression)
            }
            (SyntaxKind::ArrayLiteralExpression, NodeData::List { elements }) => {
                self.check_array_literal(file, node, elements)
            }
            (SyntaxKind::ObjectLiteralExpression, NodeData::List { elements }) => {
                self.check_object_literal(file, node, elements)
            }
            (SyntaxKind::PropertyAccessExpression, NodeData::Access { expression, name }) => {
                self.check_property_access(file, node, *expression, *name)
            }
            (SyntaxKind::ElementAccessExpression, NodeData::Access { expression, name }) => {
                self.check_element_access(file, node, *expression, *name)
            }
            (SyntaxKind::CallExpression | SyntaxKind::NewExpression, NodeData::Call { .. }) => {
                self.check_call_expression(file, node)
            }
            (
                SyntaxKind::FunctionExpression
                | SyntaxKind::ArrowFunction
                | SyntaxKind::FunctionDeclaration
                | SyntaxKind::MethodDeclaration
                | SyntaxKind::GetAccessor
                | SyntaxKind::SetAccessor,
                NodeData::Signature(_),
            ) => self.check_function_expression(file, node),
            (SyntaxKind::PrefixUnaryExpression, NodeData::Unary { operator, operand }) => {
                self.check_prefix_unary(file, *operator, *operand)
            }
            (SyntaxKind::PostfixUnaryExpression, NodeData::Unary { operand, .. }) => self.check_increment(file, *operand),
            (SyntaxKind::BinaryExpression, NodeData::Binary { left, operator, right }) => {
                self.check_binary(file, node, *left, *operator, *right)
            }
            (
                SyntaxKind::ConditionalExpression,
                NodeData::Conditional {
                    condition,
                    when_true,
                    when_false,
                },
            ) => {
                let condition_type = self.check_expression(file, *condition);
                self.check_truthiness(file, *condition, condition_type);
                let when_true = self.check_expression(file, *when_true);
                let when_false = self.check_expression(file, *when_false);
                self.types().union(&[when_true, when_false])
            }
            (SyntaxKind::AsExpression, NodeData::Assertion { expression, type_node }) => {
                self.check_as_expression(file, node, *expression, *type_node)
            }
            (SyntaxKind::SatisfiesExpression, NodeData::Assertion { expression, type_node }) => {
                self.check_satisfies_expression(file, *expression, *type_node)
            }
            _ => TypeId::ERROR,
        }
    }

    // ========================================================================
    // Names
    // ========================================================================

    fn check_identifier(&mut self, file: FileId, node: NodeId, name: InternedString) -> TypeId {
        let Some(symbol) = self.resolve_name(file, node, name, SymbolFlags::VALUE) else {
            return self.check_unresolved_identifier(file, node, name);
        };
        let declared = self.discarding(|c| c.symbol_type(symbol));
        let target = self.resolve_alias_or_self(symbol);
        if declared == TypeId::ERROR
            || !self.symbol(target).flags.intersects(SymbolFlags::VARIABLE)
            || self.is_assignment_target(file, node)
        {
            return declared;
        }
        let Some(flow) = self.flow_position(file, node) else {
            return declared;
        };
        let key = ReferenceKey::symbol(symbol);
        self.flow_type_of_reference(file, node, &key, declared, declared, flow)
    }

    fn check_unresolved_identifier(&mut self, file: FileId, node: NodeId, name: InternedString) -> TypeId {
        let names = &self.session.names;
        if name == names.undefined {
            return TypeId::UNDEFINED;
        }
        if name == names.arguments && self.arguments_container(file, node).is_some() {
            let iarguments = names.iarguments;
            return self.global_type(iarguments);
        }
        let text = self.text(name);
        if self.resolve_name(file, node, name, SymbolFlags::TYPE).is_some() {
            self.error(file, node, &messages::_0_ONLY_REFERS_TO_A_TYPE_BUT_IS_BEING_USED_AS_A_VALUE_HERE, &[text]);
        } else {
            self.error(file, node, &messages::CANNOT_FIND_NAME_0, &[text]);
        }
        TypeId::ERROR
    }

    /// The nearest non-arrow function, which owns `arguments`.
    fn arguments_container(&self, file: FileId, node: NodeId) -> Option<NodeId> {
        let tree = self.tree(file);
        for ancestor in tree.ancestors(node) {
            let kind = tree.kind(ancestor);
            if kind == SyntaxKind::ArrowFunction {
                continue;
            }
            if kind.is_function_like_with_body() {
                return Some(ancestor);
            }
            if kind == SyntaxKind::ClassDeclaration {
                return None;
            }
        }
        None
    }

    /// The left side of a plain `=`, through parentheses.
    pub(crate) fn is_assignment_target(&self, file: FileId, node: NodeId) -> bool {
        let tree = self.tree(file);
        let mut current = node;
        while let Some(parent) = tree.parent(current) {
            match (tree.kind(parent), &tree.node(parent).data) {
                (SyntaxKind::ParenthesizedExpression, _) => current = parent,
                (
                    SyntaxKind::BinaryExpression,
                    NodeData::Binary {
                        left,
                        operator: SyntaxKind::EqualsToken,
                        ..
                    },
                ) => return *left == current,
                _ => return false,
            }
        }
        false
    }

    fn check_this(&mut self, file: FileId, node: NodeId) -> TypeId {
        if let Some(ty) = self.this_type_at(file, node) {
            return ty;
        }
        let container = self.this_container(file, node);
        if container != tyck_ast::SyntaxTree::ROOT
            && matches!(
                self.kind(file, container),
                SyntaxKind::MethodDeclaration | SyntaxKind::GetAccessor | SyntaxKind::SetAccessor
            )
        {
            if let Some(literal) = self
                .parent(file, container)
                .filter(|&p| self.kind(file, p) == SyntaxKind::ObjectLiteralExpression)
            {
                return self.discarding(|c| c.check_expression(file, literal));
            }
        }
        if self.options().no_implicit_any()
            && container != tyck_ast::SyntaxTree::ROOT
            && matches!(
                self.kind(file, container),
                SyntaxKind::FunctionDeclaration | SyntaxKind::FunctionExpression
            )
        {
            self.error(file, node, &messages::THIS_IMPLICITLY_HAS_TYPE_ANY, &[]);
        }
        TypeId::ANY
    }

    fn check_super(&mut self, file: FileId, node: NodeId) -> TypeId {
        let Some(heritage) = self
            .this_container_class(file, node)
            .and_then(|class| self.extends_clause_type(file, class))
        else {
            self.error(file, node, &messages::SUPER_CAN_ONLY_BE_REFERENCED_IN_A_DERIVED_CLASS, &[]);
            return TypeId::ERROR;
        };
        if self.is_in_static_member(file, node) {
            return match self.data(file, heritage) {
                NodeData::Call { expression, .. } => {
                    let expression = *expression;
                    self.discarding(|c| c.check_expression(file, expression))
                }
                _ => TypeId::ERROR,
            };
        }
        self.class_base_type(file, heritage)
    }

    // ========================================================================
    // Literals
    // ========================================================================

    /// An expression whose literal type widens unless a contextual type or a
    /// const context asks for it.
    fn check_expression_for_mutable_location(&mut self, file: FileId, node: NodeId, const_context: bool) -> TypeId {
        let ty = self.check_expression(file, node);
        if const_context || !self.has_literal_constituent(ty) {
            return ty;
        }
        match self.contextual_type(file, node) {
            Some(contextual) if self.keeps_literals(contextual, ty) => ty,
            _ => self.widen_literal_type(ty),
        }
    }

    fn has_literal_constituent(&self, ty: TypeId) -> bool {
        self.constituents_of(ty)
            .into_iter()
            .any(|t| self.types().is(t, TypeFlags::LITERAL | TypeFlags::ENUM_LITERAL))
    }

    /// Inside an `as const`, through parentheses and literal elements.
    pub(crate) fn is_const_context(&self, file: FileId, node: NodeId) -> bool {
        let tree = self.tree(file);
        let mut current = node;
        while let Some(parent) = tree.parent(current) {
            match tree.kind(parent) {
                SyntaxKind::AsExpression => return tree.node(parent).flags.contains(NodeFlags::CONST_ASSERTION),
                SyntaxKind::ParenthesizedExpression
                | SyntaxKind::ArrayLiteralExpression
                | SyntaxKind::ObjectLiteralExpression
                | SyntaxKind::SpreadElement
                | SyntaxKind::PropertyAssignment
                | SyntaxKind::ShorthandPropertyAssignment => current = parent,
                _ => return false,
            }
        }
        false
    }

    fn is_tuple_context(&mut self, contextual: TypeId) -> bool {
        self.constituents_of(contextual).into_iter().any(|t| {
            let apparent = self.base_constraint(t);
            self.types().object_flags(apparent).contains(ObjectFlags::TUPLE)
        })
    }

    fn check_array_literal(&mut self, file: FileId, node: NodeId, elements: &[NodeId]) -> TypeId {
        let const_context = self.is_const_context(file, node);
        let tuple_context = const_context
            || match self.contextual_type(file, node) {
                Some(contextual) => self.is_tuple_context(contextual),
                None => false,
            };
        let mut types = Vec::with_capacity(elements.len());
        let mut flags = Vec::with_capacity(elements.len());
        for &element in elements {
            if let (SyntaxKind::SpreadElement, NodeData::Expr { expression }) =
                (self.kind(file, element), self.data(file, element))
            {
                let spread = self.check_expression(file, *expression);
                if tuple_context {
                    if let TypeKey::Object(ObjectKey::Tuple {
                        elements: inner,
                        flags: inner_flags,
                        ..
                    }) = &self.types().get(spread).key
                    {
                        types.extend(inner.iter().copied());
                        flags.extend(inner_flags.iter().copied());
                        continue;
                    }
                }
                types.push(self.check_iterable(file, *expression, spread));
                flags.push(ElementFlags::REST);
                continue;
            }
            types.push(self.check_expression_for_mutable_location(file, element, const_context));
            flags.push(ElementFlags::REQUIRED);
        }
        if tuple_context {
            return self.types().tuple(types, flags, const_context);
        }
        if types.is_empty() {
            let element = match self.contextual_type(file, node) {
                Some(_) if self.strict_null_checks() => TypeId::NEVER,
                _ => TypeId::ANY,
            };
            return self.types().array(element);
        }
        let element = self.types().union(&types);
        self.types().array(element)
    }

    fn check_object_literal(&mut self, file: FileId, node: NodeId, elements: &[NodeId]) -> TypeId {
        let const_context = self.is_const_context(file, node);
        let readonly = if const_context { PropertyFlags::READONLY } else { PropertyFlags::empty() };
        let mut properties: Vec<LiteralProperty> = Vec::with_capacity(elements.len());
        let mut spread_any = false;
        for &element in elements {
            match (self.kind(file, element), self.data(file, element)) {
                (
                    SyntaxKind::PropertyAssignment,
                    NodeData::Variable {
                        name,
                        initializer: Some(initializer),
                        ..
                    },
                ) => {
                    let name = self.member_name(file, *name);
                    let ty = self.check_expression_for_mutable_location(file, *initializer, const_context);
                    if let Some(name) = name {
                        push_property(&mut properties, LiteralProperty { name, ty, flags: readonly });
                    }
                }
                (SyntaxKind::ShorthandPropertyAssignment, NodeData::Variable { name, .. }) => {
                    let ty = self.check_expression_for_mutable_location(file, *name, const_context);
                    if let Some(name) = self.tree(file).name_of(*name) {
                        push_property(&mut properties, LiteralProperty { name, ty, flags: readonly });
                    }
                }
                (SyntaxKind::SpreadAssignment, NodeData::Expr { expression }) => {
                    let ty = self.check_expression(file, *expression);
                    if self.types().is(ty, TypeFlags::ANY | TypeFlags::ERROR) {
                        spread_any = true;
                        continue;
                    }
                    let apparent = self.apparent_type(ty);
                    let members = self.resolve_members(apparent);
                    for property in members.properties.values() {
                        let ty = self.declared_type_of_property(property);
                        let flags = property.flags & PropertyFlags::OPTIONAL;
                        push_property(&mut properties, LiteralProperty { name: property.name, ty, flags });
                    }
                }
                (SyntaxKind::MethodDeclaration, NodeData::Signature(data)) => {
                    let name = data.name.and_then(|n| self.member_name(file, n));
                    let ty = self.check_expression(file, element);
                    if let Some(name) = name {
                        let flags = readonly | PropertyFlags::METHOD;
                        push_property(&mut properties, LiteralProperty { name, ty, flags });
                    }
                }
                (SyntaxKind::GetAccessor, NodeData::Signature(data)) => {
                    let name = data.name.and_then(|n| self.member_name(file, n));
                    self.check_expression(file, element);
                    let signature = self.signature_of_declaration(file, element);
                    let ty = self.return_type_of_signature(signature);
                    if let Some(name) = name {
                        push_property(&mut properties, LiteralProperty { name, ty, flags: readonly });
                    }
                }
                (SyntaxKind::SetAccessor, NodeData::Signature(data)) => {
                    let name = data.name.and_then(|n| self.member_name(file, n));
                    self.check_expression(file, element);
                    let Some(name) = name else { continue };
                    if properties.iter().any(|p| p.name == name) {
                        continue;
                    }
                    let parameter = data.parameters.iter().copied().find(|&p| !self.is_this_parameter(file, p));
                    let ty = parameter.map_or(TypeId::ANY, |p| self.parameter_type(file, p));
                    push_property(&mut properties, LiteralProperty { name, ty, flags: readonly });
                }
                _ => {}
            }
        }
        if spread_any {
            return TypeId::ANY;
        }
        self.types().object_literal(properties, true)
    }

    /// The property name of an object literal member. Computed names are
    /// checked and kept only when they evaluate to a literal.
    fn member_name(&mut self, file: FileId, name: NodeId) -> Option<InternedString> {
        if let (SyntaxKind::ComputedPropertyName, NodeData::Expr { expression }) =
            (self.kind(file, name), self.data(file, name))
        {
            let ty = self.check_expression(file, *expression);
            if let Some(literal) = self.literal_property_name(ty) {
                return Some(literal);
            }
        }
        names::property_name(self.tree(file), name, &self.session.interner)
    }

    // ========================================================================
    // Member access
    // ========================================================================

    fn is_optional_chain(&self, file: FileId, node: NodeId) -> bool {
        let tree = self.tree(file);
        if tree.node(node).flags.contains(NodeFlags::OPTIONAL_CHAIN) {
            return true;
        }
        match &tree.node(node).data {
            NodeData::Access { expression, .. } | NodeData::Call { expression, .. } => {
                matches!(
                    tree.kind(*expression),
                    SyntaxKind::PropertyAccessExpression
                        | SyntaxKind::ElementAccessExpression
                        | SyntaxKind::CallExpression
                ) && self.is_optional_chain(file, *expression)
            }
            _ => false,
        }
    }

    /// The object of a member access with `null` and `undefined` reported
    /// and removed. `unknown` is an error.
    fn check_non_null_object(&mut self, file: FileId, expression: NodeId, ty: TypeId, optional: bool) -> TypeId {
        let flags = self
            .constituents_of(ty)
            .into_iter()
            .fold(TypeFlags::empty(), |acc, t| acc | self.types().flags(t));
        if ty == TypeId::UNKNOWN || (flags.contains(TypeFlags::UNKNOWN) && !flags.contains(TypeFlags::ANY)) {
            match self.entity_name_text(file, expression) {
                Some(text) => self.error(file, expression, &messages::_0_IS_OF_TYPE_UNKNOWN, &[text]),
                None => self.error(file, expression, &messages::OBJECT_IS_OF_TYPE_UNKNOWN, &[]),
            }
            return TypeId::ERROR;
        }
        if !self.strict_null_checks() || !flags.intersects(TypeFlags::NULLABLE) {
            return ty;
        }
        if !optional {
            self.report_possibly_nullable(file, expression, flags);
        }
        let stripped = self.non_nullable_type(ty);
        if stripped == TypeId::NEVER {
            TypeId::ERROR
        } else {
            stripped
        }
    }

    fn report_possibly_nullable(&mut self, file: FileId, expression: NodeId, flags: TypeFlags) {
        let (null, undefined) = (flags.contains(TypeFlags::NULL), flags.contains(TypeFlags::UNDEFINED));
        match self.entity_name_text(file, expression) {
            Some(text) => {
                let message = match (null, undefined) {
                    (true, true) => &messages::_0_IS_POSSIBLY_NULL_OR_UNDEFINED,
                    (true, false) => &messages::_0_IS_POSSIBLY_NULL,
                    _ => &messages::_0_IS_POSSIBLY_UNDEFINED,
                };
                self.error(file, expression, message, &[text]);
            }
            None => {
                let message = match (null, undefined) {
                    (true, true) => &messages::OBJECT_IS_POSSIBLY_NULL_OR_UNDEFINED,
                    (true, false) => &messages::OBJECT_IS_POSSIBLY_NULL,
                    _ => &messages::OBJECT_IS_POSSIBLY_UNDEFINED,
                };
                self.error(file, expression, message, &[]);
            }
        }
    }

    /// Source text of `a`, `this.a` or `a.b.c`; `None` for anything else.
    fn entity_name_text(&self, file: FileId, expression: NodeId) -> Option<&'s str> {
        let tree = self.tree(file);
        let mut current = expression;
        loop {
            match (tree.kind(current), &tree.node(current).data) {
                (SyntaxKind::Identifier | SyntaxKind::ThisKeyword, _) => return Some(tree.source_text(expression)),
                (SyntaxKind::PropertyAccessExpression, NodeData::Access { expression, .. }) => current = *expression,
                _ => return None,
            }
        }
    }

    fn check_property_access(&mut self, file: FileId, node: NodeId, expression: NodeId, name_node: NodeId) -> TypeId {
        let object = self.check_expression(file, expression);
        let Some(name) = self.tree(file).name_of(name_node) else {
            return TypeId::ERROR;
        };
        let optional = self.is_optional_chain(file, node);
        let object = self.check_non_null_object(file, expression, object, optional);
        if self.types().is(object, TypeFlags::ANY | TypeFlags::ERROR) {
            return object;
        }
        let (ty, narrowable) = match self.property_of_type(object, name) {
            Some(property) => {
                self.check_property_accessibility(file, name_node, &property);
                let ty = self.discarding(|c| c.type_of_property(&property));
                (ty, !property.flags.contains(PropertyFlags::METHOD))
            }
            None => match self.applicable_index_info(object, name) {
                Some(info) => (info.value_type, true),
                None => {
                    if self.is_reporting() {
                        let object_text = self.type_to_string(object);
                        let text = self.text(name);
                        self.error(file, name_node, &messages::PROPERTY_0_DOES_NOT_EXIST_ON_TYPE_1, &[text, &object_text]);
                    }
                    return TypeId::ERROR;
                }
            },
        };
        let ty = if narrowable { self.narrow_access(file, node, ty) } else { ty };
        if optional {
            self.types().union(&[ty, TypeId::UNDEFINED])
        } else {
            ty
        }
    }

    fn narrow_access(&mut self, file: FileId, node: NodeId, declared: TypeId) -> TypeId {
        if declared == TypeId::ERROR || self.is_assignment_target(file, node) {
            return declared;
        }
        let Some(key) = self.reference_key(file, node) else {
            return declared;
        };
        let Some(flow) = self.flow_position(file, node) else {
            return declared;
        };
        self.flow_type_of_reference(file, node, &key, declared, declared, flow)
    }

    /// Private members are visible inside their class; protected ones also
    /// inside derived classes.
    fn check_property_accessibility(&mut self, file: FileId, name_node: NodeId, property: &PropertyInfo) {
        if !self.is_reporting() || !property.flags.intersects(PropertyFlags::PRIVATE | PropertyFlags::PROTECTED) {
            return;
        }
        let Some(declaring) = property.symbol.and_then(|symbol| self.declaring_class(symbol)) else {
            return;
        };
        let tree = self.tree(file);
        let enclosing: Vec<SymbolId> = tree
            .ancestors(name_node)
            .filter(|&n| tree.kind(n) == SyntaxKind::ClassDeclaration)
            .filter_map(|n| self.node_symbol(file, n))
            .map(|s| self.resolve_merged(s))
            .collect();
        let private = property.flags.contains(PropertyFlags::PRIVATE);
        let allowed = if private {
            enclosing.contains(&declaring)
        } else {
            enclosing.iter().any(|&class| self.class_derives_from(class, declaring, 0))
        };
        if allowed {
            return;
        }
        let name = self.text(property.name);
        let class_name = self.symbol_name(declaring);
        let message = if private {
            &messages::PROPERTY_0_IS_PRIVATE_AND_ONLY_ACCESSIBLE_WITHIN_CLASS_1
        } else {
            &messages::PROPERTY_0_IS_PROTECTED_AND_ONLY_ACCESSIBLE_WITHIN_CLASS_1_AND_ITS_SUBCLASSES
        };
        self.error(file, name_node, message, &[name, &class_name]);
    }

    fn declaring_class(&self, member: SymbolId) -> Option<SymbolId> {
        let declaration = self.symbol(member).first_declaration()?;
        let tree = self.tree(declaration.file);
        let class = tree
            .ancestors(declaration.node)
            .find(|&n| tree.kind(n) == SyntaxKind::ClassDeclaration)?;
        self.node_symbol(declaration.file, class).map(|s| self.resolve_merged(s))
    }

    fn class_derives_from(&mut self, class: SymbolId, base: SymbolId, depth: u32) -> bool {
        if class == base {
            return true;
        }
        if depth > 32 {
            return false;
        }
        let bases = self.base_types(class);
        bases.iter().any(|&ty| match self.class_or_interface_symbol(ty) {
            Some(symbol) => {
                let symbol = self.resolve_merged(symbol);
                self.class_derives_from(symbol, base, depth + 1)
            }
            None => false,
        })
    }

    fn check_element_access(&mut self, file: FileId, node: NodeId, expression: NodeId, argument: NodeId) -> TypeId {
        let object = self.check_expression(file, expression);
        let index = self.check_expression(file, argument);
        let optional = self.is_optional_chain(file, node);
        let object = self.check_non_null_object(file, expression, object, optional);
        if self.types().is(object, TypeFlags::ANY | TypeFlags::ERROR) {
            return object;
        }
        if index == TypeId::ERROR {
            return TypeId::ERROR;
        }
        let ty = self.element_access_type(file, argument, object, index);
        let ty = if self.literal_member_name(file, argument).is_some() {
            self.narrow_access(file, node, ty)
        } else {
            ty
        };
        if optional {
            self.types().union(&[ty, TypeId::UNDEFINED])
        } else {
            ty
        }
    }

    fn element_access_type(&mut self, file: FileId, argument: NodeId, object: TypeId, index: TypeId) -> TypeId {
        if self.is_generic_index_or_object(object) || self.is_generic_index_or_object(index) {
            return self.indexed_access_type(object, index, Some((file, argument)));
        }
        if let Some(name) = self.literal_property_name(index) {
            if let Some(property) = self.property_of_type(object, name) {
                self.check_property_accessibility(file, argument, &property);
                return self.discarding(|c| c.type_of_property(&property));
            }
            if let Some(info) = self.applicable_index_info(object, name) {
                return info.value_type;
            }
            return self.report_implicit_index(file, argument, object, index);
        }
        let index_flags = self.types().flags(index);
        if index_flags.intersects(TypeFlags::ANY | TypeFlags::STRING | TypeFlags::NUMBER | TypeFlags::ENUM) {
            let apparent = self.apparent_type(object);
            let members = self.resolve_members(apparent);
            let info = if index_flags.intersects(TypeFlags::NUMBER | TypeFlags::ENUM) {
                members.index_info(TypeId::NUMBER).or_else(|| members.index_info(TypeId::STRING)).copied()
            } else {
                members.index_info(TypeId::STRING).copied()
            };
            return match info {
                Some(info) => info.value_type,
                None => self.report_implicit_index(file, argument, object, index),
            };
        }
        self.indexed_access_type(object, index, Some((file, argument)))
    }

    fn report_implicit_index(&mut self, file: FileId, argument: NodeId, object: TypeId, index: TypeId) -> TypeId {
        if self.is_reporting() && self.options().no_implicit_any() {
            let index_text = self.type_to_string(index);
            let object_text = self.type_to_string(object);
            self.error(
                file,
                argument,
                &messages::ELEMENT_IMPLICITLY_HAS_AN_ANY_TYPE_BECAUSE_EXPRESSION_OF_TYPE_0_CANT_BE_USED_TO_INDEX_TYPE_1,
                &[&index_text, &object_text],
            );
        }
        TypeId::ANY
    }

    // ========================================================================
    // Calls and functions
    // ========================================================================

    fn check_call_expression(&mut self, file: FileId, node: NodeId) -> TypeId {
        let NodeData::Call {
            expression, arguments, ..
        } = self.data(file, node)
        else {
            return TypeId::ERROR;
        };
        let callee = *expression;
        let is_super = self.kind(file, callee) == SyntaxKind::SuperKeyword;
        let signature = self.resolved_signature(file, node);
        if self.is_reporting() {
            self.replay_call_diagnostics(file, node);
            if !is_super {
                self.check_expression(file, callee);
            }
            for &argument in arguments {
                self.check_expression(file, argument);
            }
        }
        if is_super {
            return TypeId::VOID;
        }
        let ty = match signature {
            Some(signature) => self.return_type_of_signature(signature),
            None if self.resolving_calls.contains(&(file, node)) => TypeId::ANY,
            None => {
                let callee_type = self.discarding(|c| c.check_expression(file, callee));
                if self.types().is(callee_type, TypeFlags::ANY) || self.kind(file, node) == SyntaxKind::NewExpression {
                    TypeId::ANY
                } else {
                    TypeId::ERROR
                }
            }
        };
        if self.is_optional_chain(file, node) && ty != TypeId::ERROR {
            self.types().union(&[ty, TypeId::UNDEFINED])
        } else {
            ty
        }
    }

    fn check_function_expression(&mut self, file: FileId, node: NodeId) -> TypeId {
        let signature = self.signature_of_declaration(file, node);
        let ty = self.types().get_or_create(TypeKey::Object(ObjectKey::Function {
            decl: Self::declaration(file, node),
            signature,
        }));
        if self.is_reporting() {
            self.check_function_like(file, node);
        }
        ty
    }

    // ========================================================================
    // Operators
    // ========================================================================

    /// Void cannot be tested for truthiness.
    pub(crate) fn check_truthiness(&mut self, file: FileId, node: NodeId, ty: TypeId) {
        if ty == TypeId::VOID {
            self.error(file, node, &messages::AN_EXPRESSION_OF_TYPE_VOID_CANNOT_BE_TESTED_FOR_TRUTHINESS, &[]);
        }
    }

    fn is_of_kind(&self, ty: TypeId, kind: TypeFlags) -> bool {
        self.constituents_of(ty)
            .into_iter()
            .all(|t| self.types().is(t, kind))
    }

    fn is_arithmetic_operand(&mut self, ty: TypeId) -> bool {
        let ty = if self.types().is(ty, TypeFlags::TYPE_VARIABLE) { self.base_constraint(ty) } else { ty };
        let mut allowed = TypeFlags::ANY | TypeFlags::ERROR | TypeFlags::NEVER | TypeFlags::NUMBER_LIKE
            | TypeFlags::ENUM_LITERAL | TypeFlags::BIGINT_LIKE;
        if !self.strict_null_checks() {
            allowed |= TypeFlags::NULLABLE;
        }
        self.is_of_kind(ty, allowed)
    }

    /// `++`/`--` and unary `-` produce `bigint` for bigint operands.
    fn numeric_result(&self, ty: TypeId) -> TypeId {
        if self.is_of_kind(ty, TypeFlags::BIGINT_LIKE) {
            TypeId::BIGINT
        } else {
            TypeId::NUMBER
        }
    }

    fn check_prefix_unary(&mut self, file: FileId, operator: SyntaxKind, operand: NodeId) -> TypeId {
        match operator {
            SyntaxKind::ExclamationToken => {
                let ty = self.check_expression(file, operand);
                self.check_truthiness(file, operand, ty);
                TypeId::BOOLEAN
            }
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken => self.check_increment(file, operand),
            SyntaxKind::MinusToken => {
                let ty = self.check_expression(file, operand);
                if let NodeData::NumericLiteral { value } = self.data(file, operand) {
                    return self.types().literal_number(-*value);
                }
                self.numeric_result(ty)
            }
            SyntaxKind::TildeToken => {
                let ty = self.check_expression(file, operand);
                self.numeric_result(ty)
            }
            _ => {
                self.check_expression(file, operand);
                TypeId::NUMBER
            }
        }
    }

    fn check_increment(&mut self, file: FileId, operand: NodeId) -> TypeId {
        let ty = self.check_expression(file, operand);
        if !self.is_arithmetic_operand(ty) {
            self.error(
                file,
                operand,
                &messages::AN_ARITHMETIC_OPERAND_MUST_BE_OF_TYPE_ANY_NUMBER_BIGINT_OR_AN_ENUM_TYPE,
                &[],
            );
        }
        if self.check_reference_expression(
            file,
            operand,
            &messages::THE_OPERAND_OF_AN_INCREMENT_OR_DECREMENT_OPERATOR_MUST_BE_A_VARIABLE_OR_A_PROPERTY_ACCESS,
        ) {
            self.check_writable(file, skip_parentheses(self.tree(file), operand));
        }
        self.numeric_result(ty)
    }

    /// Report `message` unless `node` is an identifier or a member access.
    fn check_reference_expression(&mut self, file: FileId, node: NodeId, message: &DiagnosticMessage) -> bool {
        let target = skip_parentheses(self.tree(file), node);
        let valid = match self.kind(file, target) {
            SyntaxKind::Identifier | SyntaxKind::PropertyAccessExpression | SyntaxKind::ElementAccessExpression => {
                !self.is_optional_chain(file, target)
            }
            SyntaxKind::NonNullExpression => true,
            _ => false,
        };
        if !valid {
            self.error(file, node, message, &[]);
        }
        valid
    }

    /// Constants and readonly members cannot be assigned. False when the
    /// target was reported.
    fn check_writable(&mut self, file: FileId, target: NodeId) -> bool {
        match (self.kind(file, target), self.data(file, target)) {
            (SyntaxKind::Identifier, NodeData::Identifier { name }) => {
                let Some(symbol) = self.resolve_name(file, target, *name, SymbolFlags::VALUE) else {
                    return true;
                };
                if !self.is_const_variable(symbol) {
                    return true;
                }
                let text = self.text(*name);
                self.error(file, target, &messages::CANNOT_ASSIGN_TO_0_BECAUSE_IT_IS_A_CONSTANT, &[text]);
                false
            }
            (SyntaxKind::PropertyAccessExpression, NodeData::Access { expression, name }) => {
                let Some(property_name) = self.tree(file).name_of(*name) else {
                    return true;
                };
                self.check_writable_member(file, target, *expression, *name, property_name)
            }
            (SyntaxKind::ElementAccessExpression, NodeData::Access { expression, name: argument }) => {
                let (expression, argument) = (*expression, *argument);
                if let Some(property_name) = self.literal_member_name(file, argument) {
                    return self.check_writable_member(file, target, expression, argument, property_name);
                }
                let object = self.discarding(|c| c.check_expression(file, expression));
                let object = self.non_nullable_type(object);
                if self.types().is(object, TypeFlags::ANY | TypeFlags::ERROR) {
                    return true;
                }
                let apparent = self.apparent_type(object);
                let members = self.resolve_members(apparent);
                let readonly = members
                    .index_info(TypeId::NUMBER)
                    .or_else(|| members.index_info(TypeId::STRING))
                    .is_some_and(|info| info.readonly);
                if readonly && self.is_reporting() {
                    let object_text = self.type_to_string(object);
                    self.error(file, target, &messages::INDEX_SIGNATURE_IN_TYPE_0_ONLY_PERMITS_READING, &[&object_text]);
                }
                !readonly
            }
            _ => true,
        }
    }

    fn check_writable_member(
        &mut self,
        file: FileId,
        target: NodeId,
        expression: NodeId,
        name_node: NodeId,
        name: InternedString,
    ) -> bool {
        let object = self.discarding(|c| c.check_expression(file, expression));
        let object = self.non_nullable_type(object);
        if self.types().is(object, TypeFlags::ANY | TypeFlags::ERROR) {
            return true;
        }
        if let Some(property) = self.property_of_type(object, name) {
            let readonly = property.is_readonly() || property.symbol.is_some_and(|s| self.is_readonly_symbol(s));
            if readonly && !self.is_constructor_assignment(file, target, expression) {
                let text = self.text(name);
                self.error(file, name_node, &messages::CANNOT_ASSIGN_TO_0_BECAUSE_IT_IS_A_READ_ONLY_PROPERTY, &[text]);
                return false;
            }
            return true;
        }
        match self.applicable_index_info(object, name) {
            Some(info) if info.readonly => {
                if self.is_reporting() {
                    let object_text = self.type_to_string(object);
                    self.error(file, target, &messages::INDEX_SIGNATURE_IN_TYPE_0_ONLY_PERMITS_READING, &[&object_text]);
                }
                false
            }
            _ => true,
        }
    }

    /// `this.x = ...` directly inside a constructor.
    fn is_constructor_assignment(&self, file: FileId, target: NodeId, expression: NodeId) -> bool {
        self.kind(file, skip_parentheses(self.tree(file), expression)) == SyntaxKind::ThisKeyword
            && self.containing_function(file, target).is_some_and(|f| self.kind(file, f) == SyntaxKind::Constructor)
    }

    fn check_binary(&mut self, file: FileId, node: NodeId, left: NodeId, operator: SyntaxKind, right: NodeId) -> TypeId {
        if operator.is_assignment_operator() {
            return self.check_assignment(file, node, left, operator, right);
        }
        let left_type = self.check_expression(file, left);
        if matches!(operator, SyntaxKind::AmpersandAmpersandToken | SyntaxKind::BarBarToken) {
            self.check_truthiness(file, left, left_type);
        }
        let right_type = self.check_expression(file, right);
        self.binary_operator_type(file, node, left, operator, right, left_type, right_type)
    }

    #[allow(clippy::too_many_arguments)]
    fn binary_operator_type(
        &mut self,
        file: FileId,
        node: NodeId,
        left: NodeId,
        operator: SyntaxKind,
        right: NodeId,
        left_type: TypeId,
        right_type: TypeId,
    ) -> TypeId {
        match operator {
            SyntaxKind::PlusToken => self.check_plus(file, node, left, right, left_type, right_type),
            SyntaxKind::MinusToken
            | SyntaxKind::AsteriskToken
            | SyntaxKind::AsteriskAsteriskToken
            | SyntaxKind::SlashToken
            | SyntaxKind::PercentToken
            | SyntaxKind::LessThanLessThanToken
            | SyntaxKind::GreaterThanGreaterThanToken
            | SyntaxKind::GreaterThanGreaterThanGreaterThanToken
            | SyntaxKind::AmpersandToken
            | SyntaxKind::BarToken
            | SyntaxKind::CaretToken => self.check_arithmetic(file, node, left, operator, right, left_type, right_type),
            SyntaxKind::LessThanToken
            | SyntaxKind::GreaterThanToken
            | SyntaxKind::LessThanEqualsToken
            | SyntaxKind::GreaterThanEqualsToken => {
                self.check_relational(file, node, left, operator, right, left_type, right_type)
            }
            SyntaxKind::EqualsEqualsToken
            | SyntaxKind::ExclamationEqualsToken
            | SyntaxKind::EqualsEqualsEqualsToken
            | SyntaxKind::ExclamationEqualsEqualsToken => {
                self.check_equality(file, node, left_type, right_type);
                TypeId::BOOLEAN
            }
            SyntaxKind::AmpersandAmpersandToken => {
                if self.narrow_by_truthiness(left_type, true) == TypeId::NEVER {
                    return left_type;
                }
                let falsy = self.narrow_by_truthiness(left_type, false);
                self.types().union(&[falsy, right_type])
            }
            SyntaxKind::BarBarToken => {
                if self.narrow_by_truthiness(left_type, false) == TypeId::NEVER {
                    return left_type;
                }
                let truthy = self.narrow_by_truthiness(left_type, true);
                self.types().union(&[truthy, right_type])
            }
            SyntaxKind::QuestionQuestionToken => {
                let nullable = self
                    .constituents_of(left_type)
                    .into_iter()
                    .any(|t| self.types().is(t, TypeFlags::NULLABLE | TypeFlags::ANY_OR_UNKNOWN));
                if !nullable {
                    return left_type;
                }
                let defined = self.non_nullable_type(left_type);
                self.types().union(&[defined, right_type])
            }
            SyntaxKind::InstanceOfKeyword => {
                self.check_instanceof(file, left, right, left_type, right_type);
                TypeId::BOOLEAN
            }
            SyntaxKind::InKeyword => {
                self.check_in(file, left, right, left_type, right_type);
                TypeId::BOOLEAN
            }
            SyntaxKind::CommaToken => right_type,
            _ => TypeId::ERROR,
        }
    }

    /// Operands of arithmetic and comparison operators lose `null` and
    /// `undefined`, with an error.
    fn check_non_null_operand(&mut self, file: FileId, node: NodeId, ty: TypeId) -> TypeId {
        if !self.strict_null_checks() {
            return ty;
        }
        let flags = self
            .constituents_of(ty)
            .into_iter()
            .fold(TypeFlags::empty(), |acc, t| acc | self.types().flags(t));
        if !flags.intersects(TypeFlags::NULLABLE) {
            return ty;
        }
        self.report_possibly_nullable(file, node, flags);
        let stripped = self.non_nullable_type(ty);
        if stripped == TypeId::NEVER {
            TypeId::ERROR
        } else {
            stripped
        }
    }

    fn report_operator_error(&mut self, file: FileId, node: NodeId, operator: SyntaxKind, left: TypeId, right: TypeId) {
        if !self.is_reporting() {
            return;
        }
        let left_text = self.type_to_string(left);
        let right_text = self.type_to_string(right);
        self.error(
            file,
            node,
            &messages::OPERATOR_0_CANNOT_BE_APPLIED_TO_TYPES_1_AND_2,
            &[operator.text(), &left_text, &right_text],
        );
    }

    fn check_plus(
        &mut self,
        file: FileId,
        node: NodeId,
        left: NodeId,
        right: NodeId,
        left_type: TypeId,
        right_type: TypeId,
    ) -> TypeId {
        if left_type == TypeId::ERROR || right_type == TypeId::ERROR {
            return TypeId::ERROR;
        }
        let (mut left_type, mut right_type) = (left_type, right_type);
        if !self.is_of_kind(left_type, TypeFlags::STRING_LIKE) && !self.is_of_kind(right_type, TypeFlags::STRING_LIKE) {
            left_type = self.check_non_null_operand(file, left, left_type);
            right_type = self.check_non_null_operand(file, right, right_type);
        }
        let numeric = TypeFlags::NUMBER_LIKE | TypeFlags::ENUM_LITERAL;
        if self.is_of_kind(left_type, numeric) && self.is_of_kind(right_type, numeric) {
            return TypeId::NUMBER;
        }
        if self.is_of_kind(left_type, TypeFlags::BIGINT_LIKE) && self.is_of_kind(right_type, TypeFlags::BIGINT_LIKE) {
            return TypeId::BIGINT;
        }
        if self.is_of_kind(left_type, TypeFlags::STRING_LIKE) || self.is_of_kind(right_type, TypeFlags::STRING_LIKE) {
            return TypeId::STRING;
        }
        if self.types().is(left_type, TypeFlags::ANY) || self.types().is(right_type, TypeFlags::ANY) {
            return TypeId::ANY;
        }
        if left_type == TypeId::ERROR || right_type == TypeId::ERROR {
            return TypeId::ERROR;
        }
        self.report_operator_error(file, node, SyntaxKind::PlusToken, left_type, right_type);
        TypeId::ERROR
    }

    #[allow(clippy::too_many_arguments)]
    fn check_arithmetic(
        &mut self,
        file: FileId,
        node: NodeId,
        left: NodeId,
        operator: SyntaxKind,
        right: NodeId,
        left_type: TypeId,
        right_type: TypeId,
    ) -> TypeId {
        let left_type = self.check_non_null_operand(file, left, left_type);
        let right_type = self.check_non_null_operand(file, right, right_type);
        let left_ok = self.is_arithmetic_operand(left_type);
        let right_ok = self.is_arithmetic_operand(right_type);
        if !left_ok {
            self.error(
                file,
                left,
                &messages::THE_LEFT_HAND_SIDE_OF_AN_ARITHMETIC_OPERATION_MUST_BE_OF_TYPE_ANY_NUMBER_BIGINT_OR_AN_ENUM_TYPE,
                &[],
            );
        }
        if !right_ok {
            self.error(
                file,
                right,
                &messages::THE_RIGHT_HAND_SIDE_OF_AN_ARITHMETIC_OPERATION_MUST_BE_OF_TYPE_ANY_NUMBER_BIGINT_OR_AN_ENUM_TYPE,
                &[],
            );
        }
        if !left_ok || !right_ok {
            return TypeId::NUMBER;
        }
        let any = TypeFlags::ANY | TypeFlags::ERROR;
        if self.types().is(left_type, any) || self.types().is(right_type, any) {
            return TypeId::NUMBER;
        }
        let left_bigint = self.is_of_kind(left_type, TypeFlags::BIGINT_LIKE);
        let right_bigint = self.is_of_kind(right_type, TypeFlags::BIGINT_LIKE);
        match (left_bigint, right_bigint) {
            (true, true) => TypeId::BIGINT,
            (false, false) => TypeId::NUMBER,
            _ => {
                self.report_operator_error(file, node, operator, left_type, right_type);
                TypeId::NUMBER
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn check_relational(
        &mut self,
        file: FileId,
        node: NodeId,
        left: NodeId,
        operator: SyntaxKind,
        right: NodeId,
        left_type: TypeId,
        right_type: TypeId,
    ) -> TypeId {
        let left_type = self.check_non_null_operand(file, left, left_type);
        let right_type = self.check_non_null_operand(file, right, right_type);
        let any = TypeFlags::ANY | TypeFlags::ERROR;
        if self.types().is(left_type, any) || self.types().is(right_type, any) {
            return TypeId::BOOLEAN;
        }
        let numeric = TypeFlags::NUMBER_LIKE | TypeFlags::ENUM_LITERAL | TypeFlags::BIGINT_LIKE;
        let both_numeric = self.is_of_kind(left_type, numeric) && self.is_of_kind(right_type, numeric);
        let both_string =
            self.is_of_kind(left_type, TypeFlags::STRING_LIKE) && self.is_of_kind(right_type, TypeFlags::STRING_LIKE);
        if both_numeric || both_string {
            return TypeId::BOOLEAN;
        }
        let left_wide = self.widen_literal_type(left_type);
        let right_wide = self.widen_literal_type(right_type);
        if !self.is_type_comparable_to(left_wide, right_wide) && !self.is_type_comparable_to(right_wide, left_wide) {
            self.report_operator_error(file, node, operator, left_type, right_type);
        }
        TypeId::BOOLEAN
    }

    fn check_equality(&mut self, file: FileId, node: NodeId, left_type: TypeId, right_type: TypeId) {
        if !self.is_reporting() {
            return;
        }
        let skip = TypeFlags::ANY_OR_UNKNOWN | TypeFlags::ERROR;
        if self.types().is(left_type, skip) || self.types().is(right_type, skip) {
            return;
        }
        if self.is_of_kind(left_type, TypeFlags::NULLABLE) || self.is_of_kind(right_type, TypeFlags::NULLABLE) {
            return;
        }
        let left_regular = self.types().regular_type_of(left_type);
        let right_regular = self.types().regular_type_of(right_type);
        if self.is_type_comparable_to(left_regular, right_regular)
            || self.is_type_comparable_to(right_regular, left_regular)
        {
            return;
        }
        let left_text = self.type_to_string(left_type);
        let right_text = self.type_to_string(right_type);
        self.error(
            file,
            node,
            &messages::THIS_COMPARISON_APPEARS_TO_BE_UNINTENTIONAL_BECAUSE_THE_TYPES_0_AND_1_HAVE_NO_OVERLAP,
            &[&left_text, &right_text],
        );
    }

    fn is_all_primitive(&self, ty: TypeId) -> bool {
        !self.types().is(ty, TypeFlags::ANY_OR_UNKNOWN | TypeFlags::ERROR) && self.is_of_kind(ty, TypeFlags::PRIMITIVE)
    }

    fn check_instanceof(&mut self, file: FileId, left: NodeId, right: NodeId, left_type: TypeId, right_type: TypeId) {
        if self.is_all_primitive(left_type) {
            self.error(
                file,
                left,
                &messages::THE_LEFT_HAND_SIDE_OF_AN_INSTANCEOF_EXPRESSION_MUST_BE_OF_TYPE_ANY_AN_OBJECT_TYPE_OR_A_TYPE_PARAMETER,
                &[],
            );
        }
        if self.types().is(right_type, TypeFlags::ANY | TypeFlags::ERROR) {
            return;
        }
        let callable = !self.signatures_of_type(right_type, crate::types::SignatureKind::Construct).is_empty()
            || !self.signatures_of_type(right_type, crate::types::SignatureKind::Call).is_empty();
        if !callable {
            let function = self.global_function_type();
            if !self.is_type_assignable_to(right_type, function) {
                self.error(
                    file,
                    right,
                    &messages::THE_RIGHT_HAND_SIDE_OF_AN_INSTANCEOF_EXPRESSION_MUST_BE_CALLABLE,
                    &[],
                );
            }
        }
    }

    fn check_in(&mut self, file: FileId, left: NodeId, right: NodeId, left_type: TypeId, right_type: TypeId) {
        let key_kinds = TypeFlags::ANY
            | TypeFlags::ERROR
            | TypeFlags::STRING_LIKE
            | TypeFlags::NUMBER_LIKE
            | TypeFlags::ENUM_LITERAL
            | TypeFlags::ES_SYMBOL
            | TypeFlags::TYPE_PARAMETER;
        if !self.is_of_kind(left_type, key_kinds) {
            self.error(
                file,
                left,
                &messages::THE_LEFT_HAND_SIDE_OF_AN_IN_EXPRESSION_MUST_BE_OF_TYPE_ANY_STRING_NUMBER_OR_SYMBOL,
                &[],
            );
        }
        let right_type = self.check_non_null_operand(file, right, right_type);
        let has_primitive = self
            .constituents_of(right_type)
            .into_iter()
            .any(|t| self.types().is(t, TypeFlags::PRIMITIVE));
        if has_primitive {
            self.error(file, right, &messages::THE_RIGHT_HAND_SIDE_OF_AN_IN_EXPRESSION_MUST_NOT_BE_A_PRIMITIVE, &[]);
        }
    }

    fn check_assignment(
        &mut self,
        file: FileId,
        node: NodeId,
        left: NodeId,
        operator: SyntaxKind,
        right: NodeId,
    ) -> TypeId {
        let target = skip_parentheses(self.tree(file), left);
        if operator == SyntaxKind::EqualsToken
            && matches!(
                self.kind(file, target),
                SyntaxKind::ArrayLiteralExpression | SyntaxKind::ObjectLiteralExpression
            )
        {
            return self.check_expression(file, right);
        }
        let valid = self.check_reference_expression(
            file,
            left,
            &messages::THE_LEFT_HAND_SIDE_OF_AN_ASSIGNMENT_EXPRESSION_MUST_BE_A_VARIABLE_OR_A_PROPERTY_ACCESS,
        );
        let left_type = self.check_expression(file, left);
        let valid = valid && self.check_writable(file, target);
        let value_type = match operator.compound_operator() {
            None => self.check_expression(file, right),
            Some(binary) => {
                if matches!(binary, SyntaxKind::AmpersandAmpersandToken | SyntaxKind::BarBarToken) {
                    self.check_truthiness(file, left, left_type);
                }
                let right_type = self.check_expression(file, right);
                self.binary_operator_type(file, node, left, binary, right, left_type, right_type)
            }
        };
        let declared = if operator == SyntaxKind::EqualsToken {
            left_type
        } else {
            self.discarding(|c| c.declared_reference_type(file, target))
        };
        if valid && declared != TypeId::ERROR && value_type != TypeId::ERROR {
            let expression = (operator == SyntaxKind::EqualsToken).then_some(right);
            self.check_type_assignable_to(value_type, declared, (file, left), None, expression);
        }
        value_type
    }

    /// The declared (unnarrowed) type of an assignment target.
    fn declared_reference_type(&mut self, file: FileId, target: NodeId) -> TypeId {
        match self.data(file, target) {
            NodeData::Identifier { name } => match self.resolve_name(file, target, *name, SymbolFlags::VALUE) {
                Some(symbol) => self.symbol_type(symbol),
                None => TypeId::ERROR,
            },
            NodeData::Access { expression, name } => {
                let (expression, name) = (*expression, *name);
                let object = self.check_expression(file, expression);
                let object = self.non_nullable_type(object);
                if self.types().is(object, TypeFlags::ANY | TypeFlags::ERROR) {
                    return object;
                }
                let member = if self.kind(file, target) == SyntaxKind::PropertyAccessExpression {
                    self.tree(file).name_of(name)
                } else {
                    self.literal_member_name(file, name)
                };
                match member {
                    Some(member) => match self.property_of_type(object, member) {
                        Some(property) => self.type_of_property(&property),
                        None => self
                            .applicable_index_info(object, member)
                            .map_or(TypeId::ERROR, |info| info.value_type),
                    },
                    None => {
                        let index = self.check_expression(file, name);
                        self.element_access_type(file, name, object, index)
                    }
                }
            }
            _ => self.check_expression(file, target),
        }
    }

    // ========================================================================
    // Assertions
    // ========================================================================

    fn check_as_expression(&mut self, file: FileId, node: NodeId, expression: NodeId, type_node: NodeId) -> TypeId {
        if self.tree(file).node(node).flags.contains(NodeFlags::CONST_ASSERTION) {
            let ty = self.check_expression(file, expression);
            if !self.is_valid_const_assertion_argument(file, expression, ty) {
                self.error(file, expression, &messages::A_CONST_ASSERTION_CAN_ONLY_BE_APPLIED_TO_LITERALS, &[]);
            }
            return ty;
        }
        let source = self.check_expression(file, expression);
        let target = self.type_from_type_node(file, type_node);
        if !self.is_reporting() || source == TypeId::ERROR || target == TypeId::ERROR {
            return target;
        }
        let widened = self.widen_literal_type(source);
        let widened = self.types().regular_type_of(widened);
        if !self.is_type_comparable_to(target, widened) && !self.is_type_comparable_to(source, target) {
            let source_text = self.type_to_string(widened);
            let target_text = self.type_to_string(target);
            self.error(
                file,
                node,
                &messages::CONVERSION_OF_TYPE_0_TO_TYPE_1_MAY_BE_A_MISTAKE,
                &[&source_text, &target_text],
            );
        }
        target
    }

    fn is_valid_const_assertion_argument(&self, file: FileId, expression: NodeId, ty: TypeId) -> bool {
        match (self.kind(file, expression), self.data(file, expression)) {
            (
                SyntaxKind::StringLiteral
                | SyntaxKind::NoSubstitutionTemplateLiteral
                | SyntaxKind::NumericLiteral
                | SyntaxKind::BigIntLiteral
                | SyntaxKind::TrueKeyword
                | SyntaxKind::FalseKeyword
                | SyntaxKind::ArrayLiteralExpression
                | SyntaxKind::ObjectLiteralExpression
                | SyntaxKind::TemplateExpression,
                _,
            ) => true,
            (SyntaxKind::ParenthesizedExpression, NodeData::Expr { expression }) => {
                self.is_valid_const_assertion_argument(file, *expression, ty)
            }
            (
                SyntaxKind::PrefixUnaryExpression,
                NodeData::Unary {
                    operator: SyntaxKind::MinusToken,
                    operand,
                },
            ) => matches!(
                self.kind(file, *operand),
                SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral
            ),
            (SyntaxKind::PropertyAccessExpression | SyntaxKind::ElementAccessExpression, _) => {
                self.types().is(ty, TypeFlags::ENUM_LITERAL)
            }
            _ => false,
        }
    }

    fn check_satisfies_expression(&mut self, file: FileId, expression: NodeId, type_node: NodeId) -> TypeId {
        let source = self.check_expression(file, expression);
        let target = self.type_from_type_node(file, type_node);
        if self.is_reporting() && source != TypeId::ERROR && target != TypeId::ERROR {
            self.check_type_related_to(
                source,
                target,
                RelationKind::Assignable,
                (file, expression),
                Some(&messages::TYPE_0_DOES_NOT_SATISFY_THE_EXPECTED_TYPE_1),
                Some(expression),
            );
        }
        source
    }

    // ========================================================================
    // Type helpers
    // ========================================================================

    /// `ty` without `null` and `undefined` under strict null checks.
    pub(crate) fn non_nullable_type(&mut self, ty: TypeId) -> TypeId {
        if !self.strict_null_checks() {
            return ty;
        }
        self.filter_type(ty, |c, t| !c.types().is(t, TypeFlags::NULLABLE))
    }

    /// The element type produced by iterating `ty`, if it is iterable.
    pub(crate) fn iterated_element_type(&mut self, ty: TypeId) -> Option<TypeId> {
        self.iterated_element_type_at(ty, 0)
    }

    fn iterated_element_type_at(&mut self, ty: TypeId, depth: u32) -> Option<TypeId> {
        if depth > 16 {
            return None;
        }
        let flags = self.types().flags(ty);
        if flags.intersects(TypeFlags::ANY | TypeFlags::ERROR) {
            return Some(ty);
        }
        if flags.intersects(TypeFlags::STRING_LIKE) {
            return Some(TypeId::STRING);
        }
        if flags.contains(TypeFlags::UNION) {
            let mut elements = Vec::new();
            for part in self.constituents_of(ty) {
                elements.push(self.iterated_element_type_at(part, depth + 1)?);
            }
            return Some(self.types().union(&elements));
        }
        if let Some(element) = self.types().array_element(ty) {
            return Some(element);
        }
        if let TypeKey::Object(ObjectKey::Tuple { elements, .. }) = &self.types().get(ty).key {
            let elements: Vec<TypeId> = elements.to_vec();
            return Some(self.types().union(&elements));
        }
        if flags.intersects(TypeFlags::TYPE_VARIABLE) {
            let constraint = self.base_constraint(ty);
            if constraint != ty {
                return self.iterated_element_type_at(constraint, depth + 1);
            }
        }
        None
    }

    /// The element type of a spread or `for-of` source; 2488 when `ty` is
    /// not iterable.
    pub(crate) fn check_iterable(&mut self, file: FileId, node: NodeId, ty: TypeId) -> TypeId {
        match self.iterated_element_type(ty) {
            Some(element) => element,
            None => {
                if self.is_reporting() {
                    let text = self.type_to_string(ty);
                    self.error(file, node, &messages::TYPE_0_MUST_HAVE_A_SYMBOL_ITERATOR_METHOD, &[&text]);
                }
                TypeId::ERROR
            }
        }
    }
}

/// Later members of an object literal replace earlier ones of the same name.
fn push_property(properties: &mut Vec<LiteralProperty>, property: LiteralProperty) {
    match properties.iter_mut().find(|p| p.name == property.name) {
        Some(existing) => *existing = property,
        None => properties.push(property),
    }
}

#[cfg(test)]
mod tests {
    use tyck_options::CheckerOptions;

    use crate::session::Session;

    /// Helper: diagnostic codes of a single strict file.
    fn codes(source: &str) -> Vec<u32> {
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let file = session.file_id("a.ts").unwrap();
        session.check_file(file).unwrap().iter().map(|d| d.code).collect()
    }

    /// Helper: the type of the last occurrence of `name` in `source`.
    fn type_of_last(source: &str, name: &str) -> String {
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let file = session.file_id("a.ts").unwrap();
        let mut checker = session.checker();
        let tree = checker.tree(file);
        let offset = tree.text().rfind(name).unwrap() as u32;
        let node = tree.node_at_offset(offset).unwrap();
        let ty = checker.get_type_at_location(file, node);
        checker.type_to_string(ty)
    }

    // ========================================================================
    // Literals
    // ========================================================================

    #[test]
    fn test_array_literal_widens_elements() {
        assert_eq!(type_of_last("let a = [1, 2];\na;", "a"), "number[]");
        assert_eq!(type_of_last("let a = ['x', 'y'];\na;", "a"), "string[]");
    }

    #[test]
    fn test_const_assertion_keeps_literals() {
        assert_eq!(type_of_last("const t = [1, 'a'] as const;\nt;", "t"), "readonly [1, \"a\"]");
        assert_eq!(codes("let x = 1;\nconst y = (x + 1) as const;"), vec![1355]);
    }

    #[test]
    fn test_object_literal_method_member() {
        assert_eq!(type_of_last("const o = { f() { return 1; } };\no.f;", "f"), "() => number");
    }

    #[test]
    fn test_object_spread_copies_properties() {
        assert_eq!(
            type_of_last("const a = { x: 1 };\nconst b = { ...a, y: true };\nb;", "b"),
            "{ x: number; y: boolean; }"
        );
    }

    // ========================================================================
    // Names and members
    // ========================================================================

    #[test]
    fn test_unknown_name_and_type_used_as_value() {
        assert_eq!(codes("missing;"), vec![2304]);
        assert_eq!(codes("interface I {}\nI;"), vec![2693]);
        assert!(codes("undefined;").is_empty());
    }

    #[test]
    fn test_missing_property() {
        assert_eq!(codes("const o = { a: 1 };\no.b;"), vec![2339]);
    }

    #[test]
    fn test_possibly_undefined_receiver() {
        assert_eq!(codes("declare const o: { a: number } | undefined;\no.a;"), vec![18048]);
        assert!(codes("declare const o: { a: number } | undefined;\no?.a;").is_empty());
        assert_eq!(
            type_of_last("declare const o: { a: number } | undefined;\nconst v = o?.a;\nv;", "v"),
            "number | undefined"
        );
    }

    #[test]
    fn test_private_member_access() {
        let source = "class A { private x = 1; read() { return this.x; } }\nnew A().x;";
        assert_eq!(codes(source), vec![2341]);
    }

    #[test]
    fn test_protected_member_visible_in_subclass() {
        let source = "class A { protected x = 1; }\nclass B extends A { read() { return this.x; } }";
        assert!(codes(source).is_empty());
    }

    // ========================================================================
    // Operators
    // ========================================================================

    #[test]
    fn test_plus_operator_results() {
        assert_eq!(type_of_last("const a = 1 + 2;\nlet b = a;\nb;", "b"), "number");
        assert_eq!(type_of_last("let s = 'a' + 1;\ns;", "s"), "string");
        assert_eq!(codes("const x = true + 1;"), vec![2365]);
    }

    #[test]
    fn test_arithmetic_operand_errors() {
        assert_eq!(codes("const x = 'a' - 1;"), vec![2362]);
        assert_eq!(codes("const x = 1 * 'a';"), vec![2363]);
    }

    #[test]
    fn test_comparison_without_overlap() {
        assert_eq!(codes("declare const a: string;\nif (a === 1) {}"), vec![2367]);
        assert!(codes("declare const a: string | number;\nif (a === 1) {}").is_empty());
    }

    #[test]
    fn test_logical_operators() {
        assert_eq!(
            type_of_last("declare const a: string | undefined;\nconst b = a ?? 0;\nb;", "b"),
            "string | 0"
        );
        assert_eq!(
            type_of_last("declare const a: number | null;\nconst b = a || 'x';\nb;", "b"),
            "number | \"x\""
        );
    }

    #[test]
    fn test_assignment_checks() {
        assert_eq!(codes("const a = 1;\na = 2;"), vec![2588]);
        assert_eq!(codes("let a = 1;\na = 'x';"), vec![2322]);
        assert_eq!(codes("declare const o: { readonly a: number };\no.a = 1;"), vec![2540]);
        assert_eq!(codes("1 = 2;"), vec![2364]);
    }

    #[test]
    fn test_increment_requires_reference() {
        assert_eq!(codes("let a = 1;\n(a + 1)++;"), vec![2357]);
        assert_eq!(codes("let s = 'a';\ns++;"), vec![2356]);
    }

    // ========================================================================
    // Assertions
    // ========================================================================

    #[test]
    fn test_as_requires_comparable_types() {
        assert_eq!(codes("const a = 'x' as number;"), vec![2352]);
        assert!(codes("declare const a: string | number;\nconst b = a as string;").is_empty());
    }

    #[test]
    fn test_satisfies_keeps_expression_type() {
        assert_eq!(
            type_of_last("const v = { a: 1 } satisfies { a: number };\nv;", "v"),
            "{ a: number; }"
        );
        assert_eq!(codes("const v = { a: 'x' } satisfies { a: number };"), vec![1360]);
    }

    #[test]
    fn test_spread_of_non_iterable() {
        assert_eq!(codes("const n = 1;\nconst a = [...n];"), vec![2488]);
    }
}
