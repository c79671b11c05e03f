//! Declared types of symbols.
//!
//! `declared_type` is what a name means in a type position: the instance
//! type of a class or interface, the target of an alias, an enum. The value
//! side lives in `symbol_type`: variables, parameters and properties get
//! their annotation or their widened initializer, and functions, classes,
//! enums and namespaces get an anonymous object type keyed by the symbol.

use std::sync::Arc;

use tyck_ast::types::{FileId, ModifierFlags, NodeFlags, NodeId, SymbolFlags, SymbolId};
use tyck_ast::{NodeData, SyntaxKind};
use tyck_binder::Declaration;
use tyck_diagnostics::messages;

use crate::checker::{Checker, Resolving};
use crate::session::{global_interface, EnumValue};
use crate::types::{DeclRef, ObjectKey, TypeFlags, TypeId, TypeKey, TypeParamKey};

/// Nesting limit when chasing constraints of constraints.
const MAX_CONSTRAINT_DEPTH: u32 = 50;

impl<'s> Checker<'s> {
    // ========================================================================
    // Type side
    // ========================================================================

    /// The type a symbol denotes in a type position.
    pub(crate) fn declared_type(&mut self, symbol: SymbolId) -> TypeId {
        let symbol = self.resolve_merged(symbol);
        if let Some(ty) = self.session.caches.declared_types.get(&symbol) {
            return *ty;
        }
        let flags = self.symbol(symbol).flags;
        let ty = if flags.intersects(SymbolFlags::CLASS | SymbolFlags::INTERFACE) {
            self.types().declared_object(symbol, flags.contains(SymbolFlags::CLASS))
        } else if flags.contains(SymbolFlags::TYPE_ALIAS) {
            return self.declared_type_alias(symbol);
        } else if flags.intersects(SymbolFlags::ENUM) {
            self.declared_enum_type(symbol)
        } else if flags.contains(SymbolFlags::ENUM_MEMBER) {
            self.enum_member_type(symbol)
        } else if flags.contains(SymbolFlags::TYPE_PARAMETER) {
            match self.symbol(symbol).first_declaration() {
                Some(declaration) => self.type_parameter_of_node(declaration.file, declaration.node),
                None => TypeId::ERROR,
            }
        } else if flags.contains(SymbolFlags::ALIAS) {
            match self.resolve_alias(symbol) {
                Some(target) if self.symbol(target).flags.intersects(SymbolFlags::TYPE) => {
                    return self.declared_type(target);
                }
                _ => TypeId::ERROR,
            }
        } else {
            TypeId::ERROR
        };
        *self.session.caches.declared_types.entry(symbol).or_insert(ty)
    }

    fn declared_type_alias(&mut self, symbol: SymbolId) -> TypeId {
        let Some(declaration) = self.symbol(symbol).first_declaration() else {
            return TypeId::ERROR;
        };
        let NodeData::TypeAlias { name, type_node, .. } = self.data(declaration.file, declaration.node) else {
            return TypeId::ERROR;
        };
        let (name, type_node) = (*name, *type_node);
        if !self.push_resolving(Resolving::DeclaredType(symbol)) {
            return TypeId::ERROR;
        }
        let ty = self.type_from_type_node(declaration.file, type_node);
        let circular = self.pop_resolving();
        let ty = if circular { TypeId::ERROR } else { ty };
        let mut inserted = false;
        let stored = *self.session.caches.declared_types.entry(symbol).or_insert_with(|| {
            inserted = true;
            ty
        });
        if circular && inserted {
            let text = self.symbol_text(symbol);
            self.publish(
                declaration.file,
                name,
                &messages::TYPE_ALIAS_0_CIRCULARLY_REFERENCES_ITSELF,
                &[text],
            );
        }
        stored
    }

    /// `Array<T>`-style reference to a class or interface; the declared type
    /// itself when the arguments are its own type parameters.
    pub(crate) fn create_reference(&mut self, symbol: SymbolId, args: Vec<TypeId>) -> TypeId {
        let target = self.declared_type(symbol);
        let parameters = self.type_parameters_of(symbol);
        if parameters.is_empty() || parameters[..] == args[..] {
            return target;
        }
        self.types().reference(target, args)
    }

    /// The instance type of a global interface such as `String`, or `{}`
    /// when the built-in declarations lack it.
    pub(crate) fn global_type(&mut self, name: tyck_core::intern::InternedString) -> TypeId {
        match global_interface(&self.session.linked, name) {
            Some(symbol) => self.declared_type(symbol),
            None => TypeId::EMPTY_OBJECT,
        }
    }

    pub(crate) fn global_function_type(&mut self) -> TypeId {
        self.global_type(self.session.names.function)
    }

    pub(crate) fn global_object_type(&mut self) -> TypeId {
        self.global_type(self.session.names.object)
    }

    // ========================================================================
    // Enums
    // ========================================================================

    fn declared_enum_type(&mut self, symbol: SymbolId) -> TypeId {
        let members = self.enum_members(symbol);
        if members.is_empty() {
            return TypeId::NUMBER;
        }
        let literals: Vec<TypeId> = members.iter().map(|&m| self.enum_member_type(m)).collect();
        let ty = self.types().union(&literals);
        if self.types().is(ty, TypeFlags::UNION) {
            self.session.caches.enum_unions.entry(ty).or_insert(symbol);
        }
        ty
    }

    /// Members of an enum across all of its declarations, in source order.
    pub(crate) fn enum_members(&self, symbol: SymbolId) -> Vec<SymbolId> {
        let mut members = Vec::new();
        for declaration in &self.symbol(symbol).declarations {
            let NodeData::Enum { members: nodes, .. } = self.data(declaration.file, declaration.node) else {
                continue;
            };
            for &node in nodes {
                if let Some(member) = self.node_symbol(declaration.file, node) {
                    if !members.contains(&member) {
                        members.push(member);
                    }
                }
            }
        }
        members
    }

    fn enum_of_member(&self, member: SymbolId) -> Option<SymbolId> {
        if let Some(parent) = self.symbol(member).parent {
            return Some(self.resolve_merged(parent));
        }
        let declaration = self.symbol(member).first_declaration()?;
        let parent = self.parent(declaration.file, declaration.node)?;
        self.node_symbol(declaration.file, parent)
    }

    fn enum_member_type(&mut self, member: SymbolId) -> TypeId {
        let Some(enum_symbol) = self.enum_of_member(member) else {
            return TypeId::ERROR;
        };
        let literal = match self.enum_member_value(member) {
            EnumValue::Number(value) => self.types().literal_number(value),
            EnumValue::String(value) => self.types().literal_string(value),
            EnumValue::Computed => TypeId::NUMBER,
        };
        self.types().enum_literal(enum_symbol, member, literal)
    }

    /// The constant value of an enum member. Members without an
    /// initializer continue from the previous numeric member.
    pub(crate) fn enum_member_value(&mut self, member: SymbolId) -> EnumValue {
        if let Some(value) = self.session.caches.enum_values.get(&member) {
            return *value;
        }
        let Some(declaration) = self.symbol(member).first_declaration() else {
            return EnumValue::Computed;
        };
        let Some(enum_symbol) = self.enum_of_member(member) else {
            return EnumValue::Computed;
        };
        if !self.push_resolving(Resolving::DeclaredType(enum_symbol)) {
            return EnumValue::Computed;
        }
        let Some(enum_node) = self.parent(declaration.file, declaration.node) else {
            self.pop_resolving();
            return EnumValue::Computed;
        };
        let nodes: Vec<NodeId> = match self.data(declaration.file, enum_node) {
            NodeData::Enum { members, .. } => members.clone(),
            _ => Vec::new(),
        };
        let mut previous: Option<EnumValue> = None;
        for node in nodes {
            let initializer = match self.data(declaration.file, node) {
                NodeData::Variable { initializer, .. } => *initializer,
                _ => None,
            };
            let value = match initializer {
                Some(initializer) => self
                    .evaluate_enum_initializer(declaration.file, initializer, enum_symbol)
                    .unwrap_or(EnumValue::Computed),
                None => match previous {
                    None => EnumValue::Number(0.0),
                    Some(EnumValue::Number(n)) => EnumValue::Number(n + 1.0),
                    Some(_) => EnumValue::Computed,
                },
            };
            previous = Some(value);
            if let Some(symbol) = self.node_symbol(declaration.file, node) {
                self.session.caches.enum_values.entry(symbol).or_insert(value);
            }
        }
        self.pop_resolving();
        self.session
            .caches
            .enum_values
            .get(&member)
            .map(|v| *v)
            .unwrap_or(EnumValue::Computed)
    }

    fn evaluate_enum_initializer(&mut self, file: FileId, node: NodeId, enum_symbol: SymbolId) -> Option<EnumValue> {
        let tree = self.tree(file);
        match (tree.kind(node), self.data(file, node)) {
            (SyntaxKind::NumericLiteral, NodeData::NumericLiteral { value }) => Some(EnumValue::Number(*value)),
            (SyntaxKind::StringLiteral | SyntaxKind::NoSubstitutionTemplateLiteral, NodeData::StringLiteral { value }) => {
                Some(EnumValue::String(*value))
            }
            (SyntaxKind::ParenthesizedExpression, NodeData::Expr { expression }) => {
                self.evaluate_enum_initializer(file, *expression, enum_symbol)
            }
            (SyntaxKind::PrefixUnaryExpression, NodeData::Unary { operator, operand }) => {
                let EnumValue::Number(value) = self.evaluate_enum_initializer(file, *operand, enum_symbol)? else {
                    return None;
                };
                match operator {
                    SyntaxKind::MinusToken => Some(EnumValue::Number(-value)),
                    SyntaxKind::PlusToken => Some(EnumValue::Number(value)),
                    SyntaxKind::TildeToken => Some(EnumValue::Number(!(value as i32) as f64)),
                    _ => None,
                }
            }
            (SyntaxKind::BinaryExpression, NodeData::Binary { left, operator, right }) => {
                let left = self.evaluate_enum_initializer(file, *left, enum_symbol)?;
                let right = self.evaluate_enum_initializer(file, *right, enum_symbol)?;
                match (left, right) {
                    (EnumValue::Number(a), EnumValue::Number(b)) => {
                        let (ia, ib) = (a as i32, b as i32);
                        let value = match operator {
                            SyntaxKind::PlusToken => a + b,
                            SyntaxKind::MinusToken => a - b,
                            SyntaxKind::AsteriskToken => a * b,
                            SyntaxKind::SlashToken => a / b,
                            SyntaxKind::PercentToken => a % b,
                            SyntaxKind::AsteriskAsteriskToken => a.powf(b),
                            SyntaxKind::BarToken => (ia | ib) as f64,
                            SyntaxKind::AmpersandToken => (ia & ib) as f64,
                            SyntaxKind::CaretToken => (ia ^ ib) as f64,
                            SyntaxKind::LessThanLessThanToken => ia.wrapping_shl(ib as u32 & 31) as f64,
                            SyntaxKind::GreaterThanGreaterThanToken => ia.wrapping_shr(ib as u32 & 31) as f64,
                            SyntaxKind::GreaterThanGreaterThanGreaterThanToken => {
                                (ia as u32).wrapping_shr(ib as u32 & 31) as f64
                            }
                            _ => return None,
                        };
                        Some(EnumValue::Number(value))
                    }
                    (EnumValue::String(a), EnumValue::String(b)) if *operator == SyntaxKind::PlusToken => {
                        let joined = format!("{}{}", self.text(a), self.text(b));
                        Some(EnumValue::String(self.intern(&joined)))
                    }
                    _ => None,
                }
            }
            (SyntaxKind::Identifier, NodeData::Identifier { name }) => {
                let member = self.symbol(enum_symbol).exports.as_ref()?.get(*name)?;
                let member = self.resolve_merged(member);
                self.session.caches.enum_values.get(&member).map(|v| *v)
            }
            (SyntaxKind::PropertyAccessExpression | SyntaxKind::ElementAccessExpression, _) => {
                let member = self.resolve_entity_name(file, node, SymbolFlags::ENUM_MEMBER, false)?;
                if !self.symbol(member).flags.contains(SymbolFlags::ENUM_MEMBER) {
                    return None;
                }
                match self.enum_member_value(member) {
                    EnumValue::Computed => None,
                    value => Some(value),
                }
            }
            _ => None,
        }
    }

    // ========================================================================
    // Type parameters
    // ========================================================================

    /// The type parameter a `TypeParameter` node declares. Parameters of the
    /// later declarations of a merged interface or class stand for the ones
    /// of the first declaration.
    pub(crate) fn type_parameter_of_node(&mut self, file: FileId, node: NodeId) -> TypeId {
        let declaration = self.canonical_type_parameter(file, node);
        let symbol = self.node_symbol(declaration.file, declaration.node);
        self.types().type_parameter(TypeParamKey::Declared(declaration), symbol)
    }

    fn canonical_type_parameter(&self, file: FileId, node: NodeId) -> Declaration {
        let own = Declaration { file, node };
        let Some(parent) = self.parent(file, node) else {
            return own;
        };
        if !matches!(
            self.kind(file, parent),
            SyntaxKind::InterfaceDeclaration | SyntaxKind::ClassDeclaration
        ) {
            return own;
        }
        let Some(symbol) = self.node_symbol(file, parent) else {
            return own;
        };
        let NodeData::ClassLike { type_parameters, .. } = self.data(file, parent) else {
            return own;
        };
        let Some(index) = type_parameters.iter().position(|&tp| tp == node) else {
            return own;
        };
        for declaration in &self.symbol(symbol).declarations {
            if let NodeData::ClassLike { type_parameters, .. } = self.data(declaration.file, declaration.node) {
                if let Some(&first) = type_parameters.get(index) {
                    return Declaration {
                        file: declaration.file,
                        node: first,
                    };
                }
            }
        }
        own
    }

    /// Own type parameters of a class, interface or type alias.
    pub(crate) fn local_type_parameters(&mut self, symbol: SymbolId) -> Arc<[TypeId]> {
        if let Some(done) = self.session.caches.local_type_parameters.get(&symbol) {
            return Arc::clone(&done);
        }
        let mut nodes: Option<(FileId, Vec<NodeId>)> = None;
        for declaration in &self.symbol(symbol).declarations {
            let list = match self.data(declaration.file, declaration.node) {
                NodeData::ClassLike { type_parameters, .. } | NodeData::TypeAlias { type_parameters, .. } => {
                    type_parameters
                }
                _ => continue,
            };
            if nodes.is_none() || !list.is_empty() && nodes.as_ref().is_some_and(|(_, n)| n.is_empty()) {
                nodes = Some((declaration.file, list.clone()));
            }
        }
        let parameters: Arc<[TypeId]> = match nodes {
            Some((file, list)) => list.into_iter().map(|tp| self.type_parameter_of_node(file, tp)).collect(),
            None => Arc::from(Vec::new()),
        };
        Arc::clone(&self.session.caches.local_type_parameters.entry(symbol).or_insert(parameters))
    }

    /// Type parameters in scope at a class, interface or alias, outermost
    /// first, followed by its own.
    pub(crate) fn type_parameters_of(&mut self, symbol: SymbolId) -> Arc<[TypeId]> {
        if let Some(done) = self.session.caches.type_parameters.get(&symbol) {
            return Arc::clone(&done);
        }
        let outer = match self.symbol(symbol).first_declaration() {
            Some(declaration) => self.outer_type_parameters(declaration.file, declaration.node),
            None => Arc::from(Vec::new()),
        };
        let local = self.local_type_parameters(symbol);
        let all: Arc<[TypeId]> = outer.iter().chain(local.iter()).copied().collect();
        Arc::clone(&self.session.caches.type_parameters.entry(symbol).or_insert(all))
    }

    /// Type parameters of the declarations enclosing `node`, outermost
    /// first. `infer` parameters are in scope in the true branch of their
    /// conditional type.
    pub(crate) fn outer_type_parameters(&mut self, file: FileId, node: NodeId) -> Arc<[TypeId]> {
        let key = (file, node);
        if let Some(done) = self.session.caches.outer_type_parameters.get(&key) {
            return Arc::clone(&done);
        }
        let tree = self.tree(file);
        let mut groups: Vec<Vec<NodeId>> = Vec::new();
        let mut child = node;
        for ancestor in tree.ancestors(node) {
            let mut group = Vec::new();
            match self.data(file, ancestor) {
                NodeData::Signature(sig) => group.extend(sig.type_parameters.iter().copied()),
                NodeData::ClassLike { type_parameters, .. } | NodeData::TypeAlias { type_parameters, .. } => {
                    group.extend(type_parameters.iter().copied())
                }
                NodeData::ConditionalType {
                    extends_type, true_type, ..
                } if *true_type == child => self.collect_infer_parameters(file, *extends_type, &mut group),
                NodeData::MappedType { type_parameter, .. } if *type_parameter != child => group.push(*type_parameter),
                _ => {}
            }
            if !group.is_empty() {
                groups.push(group);
            }
            child = ancestor;
        }
        let mut parameters = Vec::new();
        for group in groups.into_iter().rev() {
            for tp in group {
                let ty = self.type_parameter_of_node(file, tp);
                if !parameters.contains(&ty) {
                    parameters.push(ty);
                }
            }
        }
        let parameters: Arc<[TypeId]> = parameters.into();
        Arc::clone(&self.session.caches.outer_type_parameters.entry(key).or_insert(parameters))
    }

    /// `infer X` declarations in the extends clause of a conditional type,
    /// not counting those of nested conditional types.
    pub(crate) fn collect_infer_parameters(&self, file: FileId, node: NodeId, out: &mut Vec<NodeId>) {
        let tree = self.tree(file);
        match self.data(file, node) {
            NodeData::InferType { type_parameter } => {
                out.push(*type_parameter);
                return;
            }
            NodeData::ConditionalType {
                check_type,
                true_type,
                false_type,
                ..
            } => {
                for n in [*check_type, *true_type, *false_type] {
                    self.collect_infer_parameters(file, n, out);
                }
                return;
            }
            _ => {}
        }
        for child in tree.children(node) {
            self.collect_infer_parameters(file, child, out);
        }
    }

    pub(crate) fn type_parameter_declaration(&self, ty: TypeId) -> Option<Declaration> {
        match self.types().get(ty).key {
            TypeKey::TypeParameter(TypeParamKey::Declared(declaration)) => Some(declaration),
            _ => None,
        }
    }

    pub(crate) fn constraint_of_type_parameter(&mut self, ty: TypeId) -> Option<TypeId> {
        if let Some(done) = self.session.caches.constraints.get(&ty) {
            return *done;
        }
        let declaration = self.type_parameter_declaration(ty)?;
        let NodeData::TypeParameter { constraint, .. } = self.data(declaration.file, declaration.node) else {
            return None;
        };
        let constraint_node = (*constraint)?;
        if !self.constraint_pending.insert(ty) {
            return None;
        }
        let constraint = self.type_from_type_node(declaration.file, constraint_node);
        self.constraint_pending.remove(&ty);
        let constraint = (constraint != ty && constraint != TypeId::ERROR).then_some(constraint);
        *self.session.caches.constraints.entry(ty).or_insert(constraint)
    }

    pub(crate) fn default_of_type_parameter(&mut self, ty: TypeId) -> Option<TypeId> {
        if let Some(done) = self.session.caches.defaults.get(&ty) {
            return *done;
        }
        let declaration = self.type_parameter_declaration(ty)?;
        let NodeData::TypeParameter { default, .. } = self.data(declaration.file, declaration.node) else {
            return None;
        };
        let default = default.map(|node| self.type_from_type_node(declaration.file, node));
        *self.session.caches.defaults.entry(ty).or_insert(default)
    }

    /// The most specific non-generic type an instantiable type is known to
    /// be assignable to; `unknown` when nothing is known.
    pub(crate) fn base_constraint(&mut self, ty: TypeId) -> TypeId {
        self.base_constraint_at(ty, 0)
    }

    fn base_constraint_at(&mut self, ty: TypeId, depth: u32) -> TypeId {
        if depth > MAX_CONSTRAINT_DEPTH {
            return TypeId::UNKNOWN;
        }
        let key = self.types().get(ty).key.clone();
        match key {
            TypeKey::TypeParameter(_) => match self.constraint_of_type_parameter(ty) {
                Some(constraint) => self.base_constraint_at(constraint, depth + 1),
                None => TypeId::UNKNOWN,
            },
            TypeKey::Index(_) => self.types().union(&[TypeId::STRING, TypeId::NUMBER, TypeId::SYMBOL]),
            TypeKey::IndexedAccess { object, index } => {
                let object = self.base_constraint_at(object, depth + 1);
                let index = self.base_constraint_at(index, depth + 1);
                if self.is_generic(object) || self.is_generic(index) {
                    return TypeId::UNKNOWN;
                }
                self.discarding(|c| c.indexed_access_type(object, index, None))
            }
            TypeKey::Conditional { decl, args } => {
                let (when_true, when_false) = self.conditional_branches(decl, &args);
                let both = self.types().union(&[when_true, when_false]);
                self.base_constraint_at(both, depth + 1)
            }
            TypeKey::Substitution { base, constraint } => {
                let base = self.base_constraint_at(base, depth + 1);
                self.types().intersection(&[base, constraint]).unwrap_or(TypeId::ERROR)
            }
            TypeKey::Union(types) => {
                let mapped: Vec<TypeId> = types.iter().map(|&t| self.base_constraint_at(t, depth + 1)).collect();
                self.types().union(&mapped)
            }
            TypeKey::Intersection(types) => {
                let mapped: Vec<TypeId> = types.iter().map(|&t| self.base_constraint_at(t, depth + 1)).collect();
                self.types().intersection(&mapped).unwrap_or(TypeId::ERROR)
            }
            _ => ty,
        }
    }

    // ========================================================================
    // Base types
    // ========================================================================

    /// Instantiated base types of a class or interface, in heritage order.
    /// A class whose hierarchy loops back to itself gets none.
    pub(crate) fn base_types(&mut self, symbol: SymbolId) -> Arc<[TypeId]> {
        let symbol = self.resolve_merged(symbol);
        if let Some(done) = self.session.caches.base_types.get(&symbol) {
            return Arc::clone(&done);
        }
        if !self.push_resolving(Resolving::BaseTypes(symbol)) {
            return Arc::from(Vec::new());
        }
        let direct = self.discarding(|c| c.direct_base_types(symbol));
        for &base in &direct {
            if let Some(base_symbol) = self.types().get(base).symbol {
                if self.symbol(base_symbol).flags.intersects(SymbolFlags::CLASS | SymbolFlags::INTERFACE) {
                    self.base_types(base_symbol);
                }
            }
        }
        let circular = self.pop_resolving();
        let bases: Arc<[TypeId]> = if circular { Arc::from(Vec::new()) } else { direct.into() };
        let mut inserted = false;
        let stored = Arc::clone(&self.session.caches.base_types.entry(symbol).or_insert_with(|| {
            inserted = true;
            bases
        }));
        if circular && inserted {
            if let Some(declaration) = self.symbol(symbol).first_declaration() {
                let name = self.tree(declaration.file).declaration_name(declaration.node).unwrap_or(declaration.node);
                let ty = self.declared_type(symbol);
                let text = self.type_to_string(ty);
                let message = if self.symbol(symbol).flags.contains(SymbolFlags::CLASS) {
                    &messages::_0_IS_REFERENCED_DIRECTLY_OR_INDIRECTLY_IN_ITS_OWN_BASE_EXPRESSION
                } else {
                    &messages::TYPE_0_RECURSIVELY_REFERENCES_ITSELF_AS_A_BASE_TYPE
                };
                self.publish(declaration.file, name, message, &[&text]);
            }
        }
        stored
    }

    fn direct_base_types(&mut self, symbol: SymbolId) -> Vec<TypeId> {
        let mut bases = Vec::new();
        let is_class = self.symbol(symbol).flags.contains(SymbolFlags::CLASS);
        let declarations = self.symbol(symbol).declarations.clone();
        for declaration in declarations {
            let NodeData::ClassLike { heritage_clauses, .. } = self.data(declaration.file, declaration.node) else {
                continue;
            };
            let declaration_is_class = self.kind(declaration.file, declaration.node) == SyntaxKind::ClassDeclaration;
            for &clause in heritage_clauses {
                let NodeData::HeritageClause { token, types } = self.data(declaration.file, clause) else {
                    continue;
                };
                if *token != SyntaxKind::ExtendsKeyword {
                    continue;
                }
                for &expression in types {
                    let base = if declaration_is_class {
                        self.class_base_type(declaration.file, expression)
                    } else {
                        self.type_from_type_node(declaration.file, expression)
                    };
                    let base_flags = self.types().flags(base);
                    if base_flags.intersects(TypeFlags::OBJECT | TypeFlags::INTERSECTION) && !bases.contains(&base) {
                        bases.push(base);
                    }
                    if declaration_is_class && is_class {
                        break;
                    }
                }
            }
        }
        bases
    }

    /// The instance type of the class named by a class `extends` clause.
    pub(crate) fn class_base_type(&mut self, file: FileId, heritage: NodeId) -> TypeId {
        let NodeData::Call {
            expression,
            type_arguments,
            ..
        } = self.data(file, heritage)
        else {
            return TypeId::ERROR;
        };
        let expression = *expression;
        let type_arguments = type_arguments.clone();
        if let Some(symbol) = self.resolve_entity_name(file, expression, SymbolFlags::VALUE, false) {
            if self.symbol(symbol).flags.contains(SymbolFlags::CLASS) {
                return self.type_from_symbol_reference(file, heritage, symbol, &type_arguments);
            }
        }
        let constructor = self.check_expression(file, expression);
        let signatures = self.signatures_of_type(constructor, crate::types::SignatureKind::Construct);
        match signatures.first() {
            Some(&signature) => self.return_type_of_signature(signature),
            None => TypeId::ERROR,
        }
    }

    /// The class or interface symbol behind an instance type.
    pub(crate) fn class_or_interface_symbol(&self, ty: TypeId) -> Option<SymbolId> {
        let ty = self.types().get(ty);
        match &ty.key {
            TypeKey::Object(ObjectKey::Declared(symbol)) => Some(*symbol),
            TypeKey::Object(ObjectKey::Reference { target, .. }) => self.types().get(*target).symbol,
            _ => None,
        }
    }

    // ========================================================================
    // Value side
    // ========================================================================

    /// The type of a symbol used as a value.
    pub(crate) fn symbol_type(&mut self, symbol: SymbolId) -> TypeId {
        let symbol = self.resolve_merged(symbol);
        if let Some(ty) = self.cached_symbol_type(symbol) {
            return ty;
        }
        let flags = self.symbol(symbol).flags;
        if flags.contains(SymbolFlags::ALIAS) {
            let ty = self.alias_value_type(symbol);
            return self.store_symbol_type(symbol, ty).0;
        }
        if flags.contains(SymbolFlags::ENUM_MEMBER) {
            return self.declared_type(symbol);
        }
        let declaration = self.symbol(symbol).value_declaration.or_else(|| self.symbol(symbol).first_declaration());
        if let Some(declaration) = declaration {
            if self.is_contextually_typed_function(declaration.file, declaration.node) {
                return self.check_expression(declaration.file, declaration.node);
            }
        }
        if flags.intersects(
            SymbolFlags::FUNCTION
                | SymbolFlags::METHOD
                | SymbolFlags::CLASS
                | SymbolFlags::ENUM
                | SymbolFlags::VALUE_MODULE,
        ) && !flags.intersects(SymbolFlags::VARIABLE | SymbolFlags::PROPERTY)
        {
            let ty = self.anonymous_symbol_type(symbol);
            return self.store_symbol_type(symbol, ty).0;
        }
        if flags.contains(SymbolFlags::FUNCTION_EXPRESSION) {
            return match declaration {
                Some(declaration) => self.check_expression(declaration.file, declaration.node),
                None => TypeId::ERROR,
            };
        }
        if flags.intersects(SymbolFlags::VARIABLE | SymbolFlags::PROPERTY) {
            return self.variable_like_type(symbol);
        }
        TypeId::ERROR
    }

    pub(crate) fn anonymous_symbol_type(&mut self, symbol: SymbolId) -> TypeId {
        let args: Box<[TypeId]> = match self.symbol(symbol).first_declaration() {
            Some(declaration) => self.outer_type_parameters(declaration.file, declaration.node).iter().copied().collect(),
            None => Box::new([]),
        };
        self.types().get_or_create(TypeKey::Object(ObjectKey::Anonymous {
            decl: DeclRef::Symbol(symbol),
            args,
        }))
    }

    fn alias_value_type(&mut self, alias: SymbolId) -> TypeId {
        if self.namespace_import_file(alias).is_some() {
            return self.types().get_or_create(TypeKey::Object(ObjectKey::Anonymous {
                decl: DeclRef::Symbol(alias),
                args: Box::new([]),
            }));
        }
        match self.resolve_alias(alias) {
            Some(target) if self.symbol(target).flags.intersects(SymbolFlags::VALUE) => self.symbol_type(target),
            _ => TypeId::ERROR,
        }
    }

    fn variable_like_type(&mut self, symbol: SymbolId) -> TypeId {
        if !self.push_resolving(Resolving::SymbolType(symbol)) {
            return TypeId::ERROR;
        }
        let ty = self.discarding(|c| c.compute_variable_like_type(symbol));
        let circular = self.pop_resolving();
        let ty = if circular { TypeId::ERROR } else { ty };
        let (stored, inserted) = self.store_symbol_type(symbol, ty);
        if circular && inserted {
            self.report_circular_symbol(symbol);
        }
        stored
    }

    fn report_circular_symbol(&mut self, symbol: SymbolId) {
        let Some(declaration) = self.symbol(symbol).value_declaration.or_else(|| self.symbol(symbol).first_declaration())
        else {
            return;
        };
        let tree = self.tree(declaration.file);
        let name = tree.declaration_name(declaration.node).unwrap_or(declaration.node);
        let annotated = matches!(
            self.data(declaration.file, declaration.node),
            NodeData::Variable {
                type_annotation: Some(_),
                ..
            }
        );
        let message = if annotated {
            &messages::_0_IS_REFERENCED_DIRECTLY_OR_INDIRECTLY_IN_ITS_OWN_TYPE_ANNOTATION
        } else {
            &messages::_0_IMPLICITLY_HAS_TYPE_ANY_BECAUSE_IT_IS_REFERENCED_IN_ITS_OWN_INITIALIZER
        };
        let text = self.symbol_text(symbol);
        self.publish(declaration.file, name, message, &[text]);
    }

    fn compute_variable_like_type(&mut self, symbol: SymbolId) -> TypeId {
        let Some(declaration) = self.symbol(symbol).value_declaration.or_else(|| self.symbol(symbol).first_declaration())
        else {
            return TypeId::ANY;
        };
        let (file, node) = (declaration.file, declaration.node);
        match self.kind(file, node) {
            SyntaxKind::Parameter => self.parameter_type(file, node),
            SyntaxKind::Identifier => match self.parent(file, node) {
                Some(parameter) if self.kind(file, parameter) == SyntaxKind::Parameter => {
                    self.parameter_type(file, parameter)
                }
                _ => TypeId::ANY,
            },
            SyntaxKind::VariableDeclaration => self.variable_declaration_type(file, node),
            SyntaxKind::PropertyDeclaration | SyntaxKind::PropertySignature => self.property_declaration_type(file, node),
            SyntaxKind::PropertyAssignment => match self.data(file, node) {
                NodeData::Variable {
                    initializer: Some(initializer),
                    ..
                } => {
                    let ty = self.check_expression(file, *initializer);
                    self.widened_declaration_type(ty, false)
                }
                _ => TypeId::ANY,
            },
            SyntaxKind::ShorthandPropertyAssignment => match self.data(file, node) {
                NodeData::Variable { name, .. } => {
                    let ty = self.check_expression(file, *name);
                    self.widened_declaration_type(ty, false)
                }
                _ => TypeId::ANY,
            },
            SyntaxKind::GetAccessor | SyntaxKind::SetAccessor => self.accessor_type(symbol),
            _ => TypeId::ANY,
        }
    }

    /// The type of a parameter inside its function.
    pub(crate) fn parameter_type(&mut self, file: FileId, parameter: NodeId) -> TypeId {
        let NodeData::Variable {
            type_annotation,
            initializer,
            ..
        } = self.data(file, parameter)
        else {
            return TypeId::ANY;
        };
        let (type_annotation, initializer) = (*type_annotation, *initializer);
        let flags = self.tree(file).node(parameter).flags;
        if let Some(annotation) = type_annotation {
            let ty = self.type_from_type_node(file, annotation);
            if flags.contains(NodeFlags::OPTIONAL) && self.strict_null_checks() {
                return self.types().union(&[ty, TypeId::UNDEFINED]);
            }
            return ty;
        }
        if let Some(contextual) = self.contextual_parameter_type(file, parameter) {
            return contextual;
        }
        if let Some(initializer) = initializer {
            let ty = self.check_expression(file, initializer);
            return self.widened_declaration_type(ty, false);
        }
        if flags.contains(NodeFlags::REST) {
            return self.types().array(TypeId::ANY);
        }
        TypeId::ANY
    }

    fn variable_declaration_type(&mut self, file: FileId, declaration: NodeId) -> TypeId {
        let NodeData::Variable {
            type_annotation,
            initializer,
            ..
        } = self.data(file, declaration)
        else {
            return TypeId::ANY;
        };
        let (type_annotation, initializer) = (*type_annotation, *initializer);
        if let Some(annotation) = type_annotation {
            return self.type_from_type_node(file, annotation);
        }
        let tree = self.tree(file);
        let list = tree.parent(declaration);
        let is_const = list.is_some_and(|l| tree.node(l).flags.contains(NodeFlags::CONST));
        match list.map(|l| (l, tree.kind(l))) {
            Some((_, SyntaxKind::CatchClause)) => {
                return if self.options().strict.unwrap_or(false) { TypeId::UNKNOWN } else { TypeId::ANY };
            }
            Some((list, _)) => {
                if let Some(statement) = tree.parent(list) {
                    match (tree.kind(statement), self.data(file, statement)) {
                        (
                            SyntaxKind::ForOfStatement,
                            NodeData::Loop {
                                condition: Some(iterated),
                                ..
                            },
                        ) => {
                            let iterated = self.check_expression(file, *iterated);
                            return self.iterated_element_type(iterated).unwrap_or(TypeId::ANY);
                        }
                        (SyntaxKind::ForInStatement, _) => return TypeId::STRING,
                        _ => {}
                    }
                }
            }
            None => {}
        }
        match initializer {
            Some(initializer) => {
                let ty = self.check_expression(file, initializer);
                self.widened_declaration_type(ty, is_const)
            }
            None => TypeId::ANY,
        }
    }

    fn property_declaration_type(&mut self, file: FileId, declaration: NodeId) -> TypeId {
        let NodeData::Variable {
            type_annotation,
            initializer,
            ..
        } = self.data(file, declaration)
        else {
            return TypeId::ANY;
        };
        let (type_annotation, initializer) = (*type_annotation, *initializer);
        if let Some(annotation) = type_annotation {
            return self.type_from_type_node(file, annotation);
        }
        match initializer {
            Some(initializer) => {
                let ty = self.check_expression(file, initializer);
                let readonly = self.tree(file).node(declaration).modifiers.contains(ModifierFlags::READONLY);
                self.widened_declaration_type(ty, readonly)
            }
            None => TypeId::ANY,
        }
    }

    /// The type of a property declared through `get` and/or `set`.
    fn accessor_type(&mut self, symbol: SymbolId) -> TypeId {
        let declarations = self.symbol(symbol).declarations.clone();
        let getter = declarations
            .iter()
            .find(|d| self.kind(d.file, d.node) == SyntaxKind::GetAccessor)
            .copied();
        if let Some(getter) = getter {
            let signature = self.signature_of_declaration(getter.file, getter.node);
            return self.return_type_of_signature(signature);
        }
        let setter = declarations
            .iter()
            .find(|d| self.kind(d.file, d.node) == SyntaxKind::SetAccessor)
            .copied();
        if let Some(setter) = setter {
            let parameter = self.tree(setter.file).signature(setter.node).and_then(|s| s.parameters.first().copied());
            if let Some(parameter) = parameter {
                return self.parameter_type(setter.file, parameter);
            }
        }
        TypeId::ANY
    }

    /// Whether a property symbol can be written: not `readonly`, and not a
    /// getter without a setter.
    pub(crate) fn is_readonly_symbol(&self, symbol: SymbolId) -> bool {
        let data = self.symbol(symbol);
        if data.flags.contains(SymbolFlags::READONLY) {
            return true;
        }
        let has_getter = data
            .declarations
            .iter()
            .any(|d| self.kind(d.file, d.node) == SyntaxKind::GetAccessor);
        let has_setter = data
            .declarations
            .iter()
            .any(|d| self.kind(d.file, d.node) == SyntaxKind::SetAccessor);
        has_getter && !has_setter
    }

    /// Whether `symbol` is declared by a `const` variable declaration.
    pub(crate) fn is_const_variable(&self, symbol: SymbolId) -> bool {
        let Some(declaration) = self.symbol(symbol).value_declaration else {
            return false;
        };
        let tree = self.tree(declaration.file);
        tree.kind(declaration.node) == SyntaxKind::VariableDeclaration
            && tree
                .parent(declaration.node)
                .is_some_and(|list| tree.node(list).flags.contains(NodeFlags::CONST))
    }
}

#[cfg(test)]
mod tests {
    use tyck_options::CheckerOptions;

    use crate::session::Session;

    /// Helper: check `source` and return the diagnostic messages.
    fn messages(source: &str) -> Vec<String> {
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let file = session.file_id("a.ts").unwrap();
        session
            .check_file(file)
            .unwrap()
            .iter()
            .map(|d| d.message_text.clone())
            .collect()
    }

    #[test]
    fn test_enum_members_auto_increment() {
        let session = Session::from_sources(&[("a.ts", "enum E { A = 3, B, C = 'x' }")], CheckerOptions::default());
        let file = session.file_id("a.ts").unwrap();
        let mut checker = session.checker();
        let tree = checker.tree(file);
        let offset = "enum E { A = 3, ".len() as u32;
        let b = tree.node_at_offset(offset).unwrap();
        let symbol = checker.get_symbol_at_location(file, b).unwrap();
        assert_eq!(
            checker.enum_member_value(symbol),
            crate::session::EnumValue::Number(4.0)
        );
    }

    #[test]
    fn test_circular_alias_reported_once_per_alias() {
        let found = messages("type A = B;\ntype B = A;");
        let circular: Vec<_> = found.iter().filter(|m| m.contains("circularly references itself")).collect();
        assert_eq!(circular.len(), 2, "{found:?}");
    }

    #[test]
    fn test_self_referencing_initializer() {
        let found = messages("let x = x;");
        assert!(
            found.iter().any(|m| m.contains("implicitly has type 'any' because it does not have a type annotation")),
            "{found:?}"
        );
    }

    #[test]
    fn test_merged_interface_shares_type_parameters() {
        let session = Session::from_sources(
            &[("a.ts", "interface Box<T> { a: T }\ninterface Box<T> { b: T }\nlet b: Box<number>;")],
            CheckerOptions::default(),
        );
        let file = session.file_id("a.ts").unwrap();
        let mut checker = session.checker();
        let source = session.tree(file).unwrap().text().to_string();
        let offset = source.rfind("Box<number>").unwrap() as u32;
        let node = checker.tree(file).node_at_offset(offset + 1).unwrap();
        let ty = checker.get_type_at_location(file, node);
        assert_eq!(checker.type_to_string(ty), "Box<number>");
    }
}
