//! Types denoted by type nodes, and the type operators they build:
//! `keyof`, indexed access, conditional and mapped types.

use tyck_ast::types::{FileId, NodeFlags, NodeId, SymbolFlags, SymbolId};
use tyck_ast::{NodeData, SyntaxKind};
use tyck_binder::Declaration;
use tyck_diagnostics::messages;

use crate::checker::Checker;
use crate::inference::{InferenceContext, InferenceFlags};
use crate::types::{
    DeclRef, ElementFlags, InferencePriority, NodeRef, ObjectKey, TypeFlags, TypeId, TypeKey, TypeMapper,
};

impl<'s> Checker<'s> {
    /// The type a type node denotes. Never reports; reference errors are
    /// found by the statement walk.
    pub(crate) fn type_from_type_node(&mut self, file: FileId, node: NodeId) -> TypeId {
        let key = (file, node);
        if let Some(done) = self.session.caches.type_nodes.get(&key) {
            return *done;
        }
        let ty = self.discarding(|c| c.compute_type_from_type_node(file, node));
        // Results computed inside a cycle may be partial.
        if !self.circular.is_empty() || self.reported_deep_instantiation {
            return ty;
        }
        *self.session.caches.type_nodes.entry(key).or_insert(ty)
    }

    fn compute_type_from_type_node(&mut self, file: FileId, node: NodeId) -> TypeId {
        use SyntaxKind::*;
        let kind = self.kind(file, node);
        match kind {
            AnyKeyword => TypeId::ANY,
            UnknownKeyword => TypeId::UNKNOWN,
            NeverKeyword => TypeId::NEVER,
            VoidKeyword => TypeId::VOID,
            UndefinedKeyword => TypeId::UNDEFINED,
            NullKeyword => TypeId::NULL,
            StringKeyword => TypeId::STRING,
            NumberKeyword => TypeId::NUMBER,
            BigIntKeyword => TypeId::BIGINT,
            BooleanKeyword => TypeId::BOOLEAN,
            SymbolKeyword => TypeId::SYMBOL,
            ObjectKeyword => TypeId::OBJECT,
            TypeReference | ExpressionWithTypeArguments => self.type_from_reference_node(file, node),
            TypeLiteral | FunctionType | ConstructorType => {
                let args = self.outer_type_parameters(file, node).to_vec();
                self.types().get_or_create(TypeKey::Object(ObjectKey::Anonymous {
                    decl: DeclRef::Node(Checker::declaration(file, node)),
                    args: args.into(),
                }))
            }
            ArrayType => match self.data(file, node) {
                NodeData::Expr { expression } => {
                    let element = self.type_from_type_node(file, *expression);
                    self.types().array(element)
                }
                _ => TypeId::ERROR,
            },
            TupleType => self.tuple_from_node(file, node, false),
            OptionalType | RestType | ParenthesizedType => match self.data(file, node) {
                NodeData::Expr { expression } => self.type_from_type_node(file, *expression),
                _ => TypeId::ERROR,
            },
            NamedTupleMember => match self.data(file, node) {
                NodeData::Variable {
                    type_annotation: Some(annotation),
                    ..
                } => self.type_from_type_node(file, *annotation),
                _ => TypeId::ERROR,
            },
            UnionType => {
                let elements = self.tree(file).list(node).to_vec();
                let types: Vec<TypeId> = elements.iter().map(|&e| self.type_from_type_node(file, e)).collect();
                self.types().union(&types)
            }
            IntersectionType => {
                let elements = self.tree(file).list(node).to_vec();
                let types: Vec<TypeId> = elements.iter().map(|&e| self.type_from_type_node(file, e)).collect();
                self.intersection_or_error(&types)
            }
            LiteralType => match self.data(file, node) {
                NodeData::Expr { expression } => self.literal_type_from_node(file, *expression),
                _ => TypeId::ERROR,
            },
            TypeOperator => self.type_from_type_operator(file, node),
            IndexedAccessType => match self.data(file, node) {
                NodeData::Access { expression, name } => {
                    let (object, index) = (*expression, *name);
                    let object = self.type_from_type_node(file, object);
                    let index = self.type_from_type_node(file, index);
                    self.indexed_access_type(object, index, None)
                }
                _ => TypeId::ERROR,
            },
            TypeQuery => match self.data(file, node) {
                NodeData::Call { expression, .. } => {
                    let expression = *expression;
                    match self.resolve_entity_name(file, expression, SymbolFlags::VALUE, false) {
                        Some(symbol) => self.symbol_type(symbol),
                        None => TypeId::ERROR,
                    }
                }
                _ => TypeId::ERROR,
            },
            ConditionalType => {
                let args = self.outer_type_parameters(file, node).to_vec();
                self.conditional_type(Checker::declaration(file, node), &args)
            }
            MappedType => {
                let args = self.outer_type_parameters(file, node).to_vec();
                self.mapped_type(Checker::declaration(file, node), &args)
            }
            ThisType => self.this_type_of_node(file, node),
            TypePredicate => TypeId::BOOLEAN,
            InferType => match self.data(file, node) {
                NodeData::InferType { type_parameter } => self.type_parameter_of_node(file, *type_parameter),
                _ => TypeId::ERROR,
            },
            _ => TypeId::ERROR,
        }
    }

    fn type_from_reference_node(&mut self, file: FileId, node: NodeId) -> TypeId {
        let NodeData::Call {
            expression,
            type_arguments,
            ..
        } = self.data(file, node)
        else {
            return TypeId::ERROR;
        };
        let meaning = if self.kind(file, node) == SyntaxKind::ExpressionWithTypeArguments
            && !self.is_in_type_position(file, node)
        {
            SymbolFlags::CLASS
        } else {
            SymbolFlags::TYPE
        };
        match self.resolve_entity_name(file, *expression, meaning, false) {
            Some(symbol) => self.type_from_symbol_reference(file, node, symbol, type_arguments),
            None => TypeId::ERROR,
        }
    }

    /// The type a reference to `symbol` with the given type argument nodes
    /// denotes. Missing arguments are filled from defaults, then
    /// constraints, then `unknown`.
    pub(crate) fn type_from_symbol_reference(
        &mut self,
        file: FileId,
        node: NodeId,
        symbol: SymbolId,
        type_arguments: &[NodeId],
    ) -> TypeId {
        let symbol = self.resolve_merged(symbol);
        let flags = self.symbol(symbol).flags;
        if flags.intersects(SymbolFlags::CLASS | SymbolFlags::INTERFACE) {
            let local = self.local_type_parameters(symbol);
            if local.is_empty() {
                return self.declared_type(symbol);
            }
            let all = self.type_parameters_of(symbol);
            let outer_count = all.len() - local.len();
            let written: Vec<TypeId> = type_arguments.iter().map(|&a| self.type_from_type_node(file, a)).collect();
            let filled = self.fill_type_arguments(&local, &written);
            let args: Vec<TypeId> = all[..outer_count].iter().copied().chain(filled).collect();
            return self.create_reference(symbol, args);
        }
        if flags.contains(SymbolFlags::TYPE_ALIAS) {
            let declared = self.declared_type(symbol);
            let local = self.local_type_parameters(symbol);
            if local.is_empty() {
                return declared;
            }
            let written: Vec<TypeId> = type_arguments.iter().map(|&a| self.type_from_type_node(file, a)).collect();
            let filled = self.fill_type_arguments(&local, &written);
            let mapper = TypeMapper::new(local.to_vec(), filled);
            return self.instantiate(declared, &mapper);
        }
        if flags.intersects(SymbolFlags::TYPE_PARAMETER | SymbolFlags::ENUM | SymbolFlags::ENUM_MEMBER) {
            return self.declared_type(symbol);
        }
        if flags.contains(SymbolFlags::ALIAS) {
            return match self.resolve_alias(symbol) {
                Some(target) if target != symbol => self.type_from_symbol_reference(file, node, target, type_arguments),
                _ => TypeId::ERROR,
            };
        }
        TypeId::ERROR
    }

    /// Complete a written type argument list. A default may refer to
    /// earlier parameters.
    pub(crate) fn fill_type_arguments(&mut self, parameters: &[TypeId], written: &[TypeId]) -> Vec<TypeId> {
        let mut args: Vec<TypeId> = written.iter().copied().take(parameters.len()).collect();
        while args.len() < parameters.len() {
            let parameter = parameters[args.len()];
            let fallback = match self.default_of_type_parameter(parameter) {
                Some(default) => default,
                None => self.constraint_of_type_parameter(parameter).unwrap_or(TypeId::UNKNOWN),
            };
            let mapper = TypeMapper::new(parameters[..args.len()].to_vec(), args.clone());
            let value = self.instantiate(fallback, &mapper);
            args.push(value);
        }
        args
    }

    /// Number of type parameters without a default.
    pub(crate) fn min_type_argument_count(&mut self, parameters: &[TypeId]) -> usize {
        let mut count = 0;
        for (i, &parameter) in parameters.iter().enumerate() {
            if self.default_of_type_parameter(parameter).is_none() {
                count = i + 1;
            }
        }
        count
    }

    /// Report arity and constraint errors for a written type reference.
    pub(crate) fn check_type_arguments(&mut self, file: FileId, node: NodeId, symbol: SymbolId) {
        let NodeData::Call {
            expression,
            type_arguments,
            ..
        } = self.data(file, node)
        else {
            return;
        };
        let (expression, type_arguments) = (*expression, type_arguments.clone());
        let symbol = self.resolve_merged(symbol);
        let flags = self.symbol(symbol).flags;
        if !flags.intersects(SymbolFlags::CLASS | SymbolFlags::INTERFACE | SymbolFlags::TYPE_ALIAS) {
            if !type_arguments.is_empty() {
                let text = self.tree(file).source_text(expression).to_string();
                self.error(file, node, &messages::TYPE_0_IS_NOT_GENERIC, &[&text]);
            }
            return;
        }
        let parameters = self.local_type_parameters(symbol);
        if parameters.is_empty() {
            if !type_arguments.is_empty() {
                let text = self.symbol_name(symbol);
                self.error(file, node, &messages::TYPE_0_IS_NOT_GENERIC, &[&text]);
            }
            return;
        }
        if type_arguments.is_empty() {
            return;
        }
        let min = self.min_type_argument_count(&parameters);
        let max = parameters.len();
        if type_arguments.len() < min || type_arguments.len() > max {
            let display = self.generic_display_name(symbol, &parameters);
            if min == max {
                self.error(
                    file,
                    node,
                    &messages::GENERIC_TYPE_0_REQUIRES_1_TYPE_ARGUMENTS,
                    &[&display, &max.to_string()],
                );
            } else {
                self.error(
                    file,
                    node,
                    &messages::GENERIC_TYPE_0_REQUIRES_BETWEEN_1_AND_2_TYPE_ARGUMENTS,
                    &[&display, &min.to_string(), &max.to_string()],
                );
            }
            return;
        }
        let written: Vec<TypeId> = type_arguments.iter().map(|&a| self.type_from_type_node(file, a)).collect();
        let filled = self.fill_type_arguments(&parameters, &written);
        let mapper = TypeMapper::new(parameters.to_vec(), filled.clone());
        for (i, &argument) in type_arguments.iter().enumerate() {
            let Some(constraint) = self.constraint_of_type_parameter(parameters[i]) else {
                continue;
            };
            let constraint = self.instantiate(constraint, &mapper);
            if self.is_generic(filled[i]) || self.is_type_assignable_to(filled[i], constraint) {
                continue;
            }
            let source = self.type_to_string(filled[i]);
            let target = self.type_to_string(constraint);
            self.error(
                file,
                argument,
                &messages::TYPE_0_DOES_NOT_SATISFY_THE_CONSTRAINT_1,
                &[&source, &target],
            );
        }
    }

    /// `Name<T, U>`
    fn generic_display_name(&mut self, symbol: SymbolId, parameters: &[TypeId]) -> String {
        let names: Vec<String> = parameters.iter().map(|&p| self.type_to_string(p)).collect();
        format!("{}<{}>", self.symbol_name(symbol), names.join(", "))
    }

    fn tuple_from_node(&mut self, file: FileId, node: NodeId, readonly: bool) -> TypeId {
        let elements = self.tree(file).list(node).to_vec();
        let mut types = Vec::with_capacity(elements.len());
        let mut flags = Vec::with_capacity(elements.len());
        for element in elements {
            let node_flags = self.tree(file).node(element).flags;
            let flag = match self.kind(file, element) {
                SyntaxKind::OptionalType => ElementFlags::OPTIONAL,
                SyntaxKind::RestType => ElementFlags::REST,
                SyntaxKind::NamedTupleMember if node_flags.contains(NodeFlags::REST) => ElementFlags::REST,
                SyntaxKind::NamedTupleMember if node_flags.contains(NodeFlags::OPTIONAL) => ElementFlags::OPTIONAL,
                _ => ElementFlags::REQUIRED,
            };
            let mut ty = self.type_from_type_node(file, element);
            // `...T[]` stores the element type.
            if flag == ElementFlags::REST {
                ty = self.types().array_element(ty).unwrap_or(ty);
            }
            types.push(ty);
            flags.push(flag);
        }
        self.types().tuple(types, flags, readonly)
    }

    fn literal_type_from_node(&mut self, file: FileId, literal: NodeId) -> TypeId {
        match (self.kind(file, literal), self.data(file, literal)) {
            (SyntaxKind::StringLiteral | SyntaxKind::NoSubstitutionTemplateLiteral, NodeData::StringLiteral { value }) => {
                self.types().literal_string(*value)
            }
            (SyntaxKind::NumericLiteral, NodeData::NumericLiteral { value }) => self.types().literal_number(*value),
            (SyntaxKind::BigIntLiteral, NodeData::BigIntLiteral { text }) => self.types().literal_bigint(*text),
            (SyntaxKind::TrueKeyword, _) => TypeId::TRUE,
            (SyntaxKind::FalseKeyword, _) => TypeId::FALSE,
            (SyntaxKind::NullKeyword, _) => TypeId::NULL,
            (
                SyntaxKind::PrefixUnaryExpression,
                NodeData::Unary {
                    operator: SyntaxKind::MinusToken,
                    operand,
                },
            ) => match self.data(file, *operand) {
                NodeData::NumericLiteral { value } => self.types().literal_number(-*value),
                NodeData::BigIntLiteral { text } => {
                    let negated = format!("-{}", self.text(*text));
                    let negated = self.intern(&negated);
                    self.types().literal_bigint(negated)
                }
                _ => TypeId::ERROR,
            },
            _ => TypeId::ERROR,
        }
    }

    fn type_from_type_operator(&mut self, file: FileId, node: NodeId) -> TypeId {
        let NodeData::Unary { operator, operand } = self.data(file, node) else {
            return TypeId::ERROR;
        };
        let (operator, operand) = (*operator, *operand);
        match operator {
            SyntaxKind::KeyOfKeyword => {
                let target = self.type_from_type_node(file, operand);
                self.index_type(target)
            }
            SyntaxKind::UniqueKeyword => TypeId::SYMBOL,
            SyntaxKind::ReadonlyKeyword => match (self.kind(file, operand), self.data(file, operand)) {
                (SyntaxKind::ArrayType, NodeData::Expr { expression }) => {
                    let element = self.type_from_type_node(file, *expression);
                    self.types().readonly_array(element)
                }
                (SyntaxKind::TupleType, _) => self.tuple_from_node(file, operand, true),
                _ => self.type_from_type_node(file, operand),
            },
            _ => TypeId::ERROR,
        }
    }

    /// `this` in a class or interface body stands for its instance type.
    fn this_type_of_node(&mut self, file: FileId, node: NodeId) -> TypeId {
        let tree = self.tree(file);
        let container = tree.ancestors(node).find(|&a| {
            matches!(
                tree.kind(a),
                SyntaxKind::ClassDeclaration | SyntaxKind::InterfaceDeclaration
            )
        });
        match container.and_then(|c| self.node_symbol(file, c)) {
            Some(symbol) => self.declared_type(symbol),
            None => TypeId::ERROR,
        }
    }

    // ========================================================================
    // Genericity
    // ========================================================================

    /// Whether `ty` mentions a type variable, so operations on it must be
    /// deferred until it is instantiated.
    pub(crate) fn is_generic(&mut self, ty: TypeId) -> bool {
        if let Some(&known) = self.generic_types.get(&ty) {
            return known;
        }
        // Provisional answer for self-referential types.
        self.generic_types.insert(ty, false);
        let data = self.types().get(ty);
        let generic = match &data.key {
            TypeKey::TypeParameter(_)
            | TypeKey::Index(_)
            | TypeKey::IndexedAccess { .. }
            | TypeKey::Conditional { .. }
            | TypeKey::Substitution { .. } => true,
            TypeKey::Union(types) | TypeKey::Intersection(types) => types.iter().any(|&t| self.is_generic(t)),
            TypeKey::Object(ObjectKey::Reference { args, .. })
            | TypeKey::Object(ObjectKey::Anonymous { args, .. })
            | TypeKey::Object(ObjectKey::Mapped { args, .. }) => args.iter().any(|&t| self.is_generic(t)),
            TypeKey::Object(ObjectKey::Tuple { elements, .. }) => elements.iter().any(|&t| self.is_generic(t)),
            TypeKey::Object(ObjectKey::Declared(symbol)) => !self.type_parameters_of(*symbol).is_empty(),
            TypeKey::Object(ObjectKey::Literal { properties, .. }) => properties.iter().any(|p| self.is_generic(p.ty)),
            TypeKey::Object(ObjectKey::Function { signature, .. }) => {
                let signature = self.session.signature(*signature);
                signature.parameters.iter().any(|p| self.is_generic(p.ty))
                    || signature.return_type.is_some_and(|r| self.is_generic(r))
            }
            _ => false,
        };
        self.generic_types.insert(ty, generic);
        generic
    }

    /// Whether `ty` is a type variable or an operation over one, ignoring
    /// type variables nested inside object types.
    pub(crate) fn is_generic_index_or_object(&mut self, ty: TypeId) -> bool {
        let data = self.types().get(ty);
        if data.is(TypeFlags::INSTANTIABLE) {
            return true;
        }
        if data.is(TypeFlags::UNION_OR_INTERSECTION) {
            let parts = data.constituents().to_vec();
            return parts.into_iter().any(|t| self.is_generic_index_or_object(t));
        }
        matches!(data.key, TypeKey::Object(ObjectKey::Mapped { .. })) && self.is_generic(ty)
    }

    // ========================================================================
    // keyof and indexed access
    // ========================================================================

    /// `keyof ty`
    pub(crate) fn index_type(&mut self, ty: TypeId) -> TypeId {
        if self.is_generic_index_or_object(ty) {
            return self.types().get_or_create(TypeKey::Index(ty));
        }
        let data = self.types().get(ty);
        if data.is(TypeFlags::ANY | TypeFlags::NEVER) {
            return self.types().union(&[TypeId::STRING, TypeId::NUMBER, TypeId::SYMBOL]);
        }
        if data.is(TypeFlags::UNKNOWN) {
            return TypeId::NEVER;
        }
        match &data.key {
            TypeKey::Union(parts) => {
                let keys: Vec<TypeId> = parts.iter().map(|&t| self.index_type(t)).collect();
                self.intersection_or_error(&keys)
            }
            TypeKey::Intersection(parts) => {
                let keys: Vec<TypeId> = parts.iter().map(|&t| self.index_type(t)).collect();
                self.types().union(&keys)
            }
            _ => {
                let apparent = self.apparent_type(ty);
                let members = self.resolve_members(apparent);
                let mut keys = Vec::with_capacity(members.properties.len() + 2);
                for info in &members.index_infos {
                    if info.key_type == TypeId::STRING {
                        keys.push(TypeId::STRING);
                        keys.push(TypeId::NUMBER);
                    } else {
                        keys.push(info.key_type);
                    }
                }
                for name in members.properties.keys() {
                    keys.push(self.types().literal_string(*name));
                }
                self.types().union(&keys)
            }
        }
    }

    /// `object[index]`. Errors are reported at `site` when given.
    pub(crate) fn indexed_access_type(&mut self, object: TypeId, index: TypeId, site: Option<NodeRef>) -> TypeId {
        if self.is_generic_index_or_object(index) || self.is_generic_index_or_object(object) {
            return self.types().get_or_create(TypeKey::IndexedAccess { object, index });
        }
        if self.types().is(object, TypeFlags::ANY) {
            return object;
        }
        if self.types().is(index, TypeFlags::UNION) {
            let parts = self.types().get(index).constituents().to_vec();
            let mut results = Vec::with_capacity(parts.len());
            for part in parts {
                let result = self.indexed_access_type(object, part, site);
                if result == TypeId::ERROR {
                    return TypeId::ERROR;
                }
                results.push(result);
            }
            return self.types().union(&results);
        }
        let apparent = self.apparent_type(object);
        let name = self.literal_property_name(index);
        if let Some(name) = name {
            if let Some(property) = self.property_of_type(apparent, name) {
                return self.type_of_property(&property);
            }
            if let Some(info) = self.applicable_index_info(apparent, name) {
                return info.value_type;
            }
            if let Some((file, node)) = site {
                let object_text = self.type_to_string(object);
                let name_text = self.text(name);
                self.error(file, node, &messages::PROPERTY_0_DOES_NOT_EXIST_ON_TYPE_1, &[name_text, &object_text]);
            }
            return TypeId::ERROR;
        }
        let index_flags = self.types().flags(index);
        if index_flags.intersects(TypeFlags::STRING | TypeFlags::NUMBER_LIKE | TypeFlags::ES_SYMBOL) {
            let members = self.resolve_members(apparent);
            let info = if index_flags.intersects(TypeFlags::NUMBER_LIKE) {
                members.index_info(TypeId::NUMBER).or_else(|| members.index_info(TypeId::STRING))
            } else if index_flags.contains(TypeFlags::STRING) {
                members.index_info(TypeId::STRING)
            } else {
                None
            };
            if let Some(info) = info {
                return info.value_type;
            }
            if let Some((file, node)) = site {
                let index_text = self.type_to_string(index);
                let object_text = self.type_to_string(object);
                self.error(
                    file,
                    node,
                    &messages::TYPE_0_CANNOT_BE_USED_TO_INDEX_TYPE_1,
                    &[&index_text, &object_text],
                );
            }
            return TypeId::ERROR;
        }
        if let Some((file, node)) = site {
            let index_text = self.type_to_string(index);
            self.error(file, node, &messages::TYPE_0_CANNOT_BE_USED_AS_AN_INDEX_TYPE, &[&index_text]);
        }
        TypeId::ERROR
    }

    /// The property name a string, number or enum literal type stands for.
    pub(crate) fn literal_property_name(&self, ty: TypeId) -> Option<tyck_core::intern::InternedString> {
        match self.types().get(ty).key {
            TypeKey::StringLiteral(value) => Some(value),
            TypeKey::NumberLiteral(value) => Some(self.intern(&tyck_binder::names::number_to_string(value.0))),
            TypeKey::EnumLiteral { literal, .. } => self.literal_property_name(literal),
            _ => None,
        }
    }

    // ========================================================================
    // Conditional types
    // ========================================================================

    fn conditional_mapper(&mut self, decl: Declaration, args: &[TypeId]) -> TypeMapper {
        let parameters = self.outer_type_parameters(decl.file, decl.node);
        TypeMapper::new(parameters.to_vec(), args.to_vec())
    }

    /// Check, extends, true and false types of a conditional type
    /// declaration under `args`.
    pub(crate) fn conditional_parts(
        &mut self,
        decl: Declaration,
        args: &[TypeId],
    ) -> Option<(TypeId, TypeId, TypeId, TypeId)> {
        let NodeData::ConditionalType {
            check_type,
            extends_type,
            true_type,
            false_type,
        } = self.data(decl.file, decl.node)
        else {
            return None;
        };
        let nodes = [*check_type, *extends_type, *true_type, *false_type];
        let mapper = self.conditional_mapper(decl, args);
        let [check, extends, when_true, when_false] = nodes.map(|n| {
            let ty = self.type_from_type_node(decl.file, n);
            self.instantiate(ty, &mapper)
        });
        Some((check, extends, when_true, when_false))
    }

    /// Both branches, for constraint computation.
    pub(crate) fn conditional_branches(&mut self, decl: Declaration, args: &[TypeId]) -> (TypeId, TypeId) {
        match self.conditional_parts(decl, args) {
            Some((_, _, when_true, when_false)) => (when_true, when_false),
            None => (TypeId::ERROR, TypeId::ERROR),
        }
    }

    /// Resolve `Check extends Extends ? True : False` under `args`, or defer
    /// it while the check or extends type is generic.
    pub(crate) fn conditional_type(&mut self, decl: Declaration, args: &[TypeId]) -> TypeId {
        let NodeData::ConditionalType {
            check_type,
            extends_type,
            true_type,
            false_type,
        } = self.data(decl.file, decl.node)
        else {
            return TypeId::ERROR;
        };
        let (check_node, extends_node, true_node, false_node) = (*check_type, *extends_type, *true_type, *false_type);
        let parameters = self.outer_type_parameters(decl.file, decl.node);
        let mapper = TypeMapper::new(parameters.to_vec(), args.to_vec());
        let raw_check = self.type_from_type_node(decl.file, check_node);
        let check = self.instantiate(raw_check, &mapper);

        // A naked type parameter distributes over a union.
        if let Some(position) = parameters.iter().position(|&p| p == raw_check) {
            if self.types().is(check, TypeFlags::UNION) {
                let parts = self.types().get(check).display_constituents().to_vec();
                let mut results = Vec::with_capacity(parts.len());
                for part in parts {
                    let mut distributed = args.to_vec();
                    distributed[position] = part;
                    results.push(self.conditional_type(decl, &distributed));
                }
                return self.types().union(&results);
            }
            if check == TypeId::NEVER {
                return TypeId::NEVER;
            }
        }

        let raw_extends = self.type_from_type_node(decl.file, extends_node);
        let extends = self.instantiate(raw_extends, &mapper);
        if self.is_generic(check) || self.is_generic_index_or_object(extends) {
            return self.types().get_or_create(TypeKey::Conditional {
                decl,
                args: args.to_vec().into(),
            });
        }

        let mut infer_nodes = Vec::new();
        self.collect_infer_parameters(decl.file, extends_node, &mut infer_nodes);
        let infer_parameters: Vec<TypeId> = infer_nodes
            .iter()
            .map(|&n| self.type_parameter_of_node(decl.file, n))
            .collect();
        let mut branch_mapper = mapper.clone();
        let mut extends = extends;
        if !infer_parameters.is_empty() {
            let mut context = InferenceContext::new(&infer_parameters, None, InferenceFlags::NO_WIDENING);
            self.infer_types(&mut context, check, extends, InferencePriority::NONE);
            let inferred = self.inferred_types(&mut context);
            let infer_mapper = TypeMapper::new(infer_parameters.clone(), inferred.clone());
            extends = self.instantiate(extends, &infer_mapper);
            let mut sources = branch_mapper.sources.to_vec();
            let mut targets = branch_mapper.targets.to_vec();
            sources.extend(infer_parameters);
            targets.extend(inferred);
            branch_mapper = TypeMapper::new(sources, targets);
        }

        let branch = |c: &mut Self, node: NodeId, mapper: &TypeMapper| {
            let ty = c.type_from_type_node(decl.file, node);
            c.instantiate(ty, mapper)
        };
        if self.types().is(check, TypeFlags::ANY) && !self.types().is(extends, TypeFlags::ANY_OR_UNKNOWN) {
            let when_true = branch(self, true_node, &branch_mapper);
            let when_false = branch(self, false_node, &mapper);
            return self.types().union(&[when_true, when_false]);
        }
        if self.is_type_assignable_to(check, extends) {
            branch(self, true_node, &branch_mapper)
        } else {
            branch(self, false_node, &mapper)
        }
    }

    // ========================================================================
    // Mapped types
    // ========================================================================

    /// The type parameter, constraint and template of a mapped type under
    /// `args`.
    pub(crate) fn mapped_parts(&mut self, decl: Declaration, args: &[TypeId]) -> Option<(TypeId, TypeId, TypeId)> {
        let NodeData::MappedType {
            type_parameter,
            type_node,
            ..
        } = self.data(decl.file, decl.node)
        else {
            return None;
        };
        let (type_parameter, type_node) = (*type_parameter, *type_node);
        let NodeData::TypeParameter { constraint, .. } = self.data(decl.file, type_parameter) else {
            return None;
        };
        let constraint = *constraint;
        let parameter = self.type_parameter_of_node(decl.file, type_parameter);
        let parameters = self.outer_type_parameters(decl.file, decl.node);
        let mapper = TypeMapper::new(parameters.to_vec(), args.to_vec());
        let constraint = match constraint {
            Some(node) => {
                let ty = self.type_from_type_node(decl.file, node);
                self.instantiate(ty, &mapper)
            }
            None => TypeId::UNKNOWN,
        };
        let template = match type_node {
            Some(node) => {
                let ty = self.type_from_type_node(decl.file, node);
                self.instantiate(ty, &mapper)
            }
            None => TypeId::ANY,
        };
        Some((parameter, constraint, template))
    }

    /// `T` of a homomorphic `{ [P in keyof T]: X }`, under `args`.
    pub(crate) fn homomorphic_source(&mut self, decl: Declaration, args: &[TypeId]) -> Option<TypeId> {
        let NodeData::MappedType { type_parameter, .. } = self.data(decl.file, decl.node) else {
            return None;
        };
        let NodeData::TypeParameter {
            constraint: Some(constraint),
            ..
        } = self.data(decl.file, *type_parameter)
        else {
            return None;
        };
        let NodeData::Unary {
            operator: SyntaxKind::KeyOfKeyword,
            operand,
        } = self.data(decl.file, *constraint)
        else {
            return None;
        };
        let source = self.type_from_type_node(decl.file, *operand);
        let parameters = self.outer_type_parameters(decl.file, decl.node);
        let mapper = TypeMapper::new(parameters.to_vec(), args.to_vec());
        Some(self.instantiate(source, &mapper))
    }

    /// A mapped type under `args`. Homomorphic mapped types over arrays and
    /// tuples stay arrays and tuples, and distribute over unions.
    pub(crate) fn mapped_type(&mut self, decl: Declaration, args: &[TypeId]) -> TypeId {
        if let Some(source) = self.homomorphic_source(decl, args) {
            if !self.is_generic(source) {
                let data = self.types().get(source);
                if data.is(TypeFlags::UNION) {
                    let parts = data.display_constituents().to_vec();
                    let mapped: Vec<TypeId> = parts.into_iter().map(|p| self.mapped_type_over(decl, args, p)).collect();
                    return self.types().union(&mapped);
                }
                if data.is(TypeFlags::PRIMITIVE) {
                    return source;
                }
                if let Some(mapped) = self.mapped_array_like(decl, args, source) {
                    return mapped;
                }
            }
        }
        self.types().get_or_create(TypeKey::Object(ObjectKey::Mapped {
            decl,
            args: args.to_vec().into(),
        }))
    }

    /// The mapped type with its homomorphic source replaced by `source`.
    fn mapped_type_over(&mut self, decl: Declaration, args: &[TypeId], source: TypeId) -> TypeId {
        let Some(original) = self.homomorphic_source_parameter(decl) else {
            return self.types().get_or_create(TypeKey::Object(ObjectKey::Mapped {
                decl,
                args: args.to_vec().into(),
            }));
        };
        let parameters = self.outer_type_parameters(decl.file, decl.node);
        let Some(position) = parameters.iter().position(|&p| p == original) else {
            return source;
        };
        let mut replaced = args.to_vec();
        replaced[position] = source;
        self.mapped_type(decl, &replaced)
    }

    /// The outer type parameter `T` when the constraint is `keyof T`.
    fn homomorphic_source_parameter(&mut self, decl: Declaration) -> Option<TypeId> {
        let parameters = self.outer_type_parameters(decl.file, decl.node);
        let identity = parameters.to_vec();
        let source = self.homomorphic_source(decl, &identity)?;
        parameters.contains(&source).then_some(source)
    }

    fn mapped_array_like(&mut self, decl: Declaration, args: &[TypeId], source: TypeId) -> Option<TypeId> {
        let (parameter, _, template) = self.mapped_parts(decl, args)?;
        let readonly_token = match self.data(decl.file, decl.node) {
            NodeData::MappedType { readonly_token, .. } => *readonly_token,
            _ => None,
        };
        if self.types().array_element(source).is_some() {
            let mapper = TypeMapper::single(parameter, TypeId::NUMBER);
            let mapped = self.instantiate(template, &mapper);
            let source_readonly = self
                .types()
                .get(source)
                .object_key()
                .is_some_and(|k| matches!(k, ObjectKey::Reference { target, .. } if Some(*target) == self.types().readonly_array_target()));
            let readonly = match readonly_token {
                Some(SyntaxKind::MinusToken) => false,
                Some(_) => true,
                None => source_readonly,
            };
            return Some(if readonly {
                self.types().readonly_array(mapped)
            } else {
                self.types().array(mapped)
            });
        }
        if let Some(ObjectKey::Tuple {
            elements,
            flags,
            readonly,
        }) = self.types().get(source).object_key().cloned()
        {
            let mut mapped = Vec::with_capacity(elements.len());
            for i in 0..elements.len() {
                let key = self.types().literal_string(self.intern(&i.to_string()));
                let mapper = TypeMapper::single(parameter, key);
                mapped.push(self.instantiate(template, &mapper));
            }
            let readonly = match readonly_token {
                Some(SyntaxKind::MinusToken) => false,
                Some(_) => true,
                None => readonly,
            };
            return Some(self.types().tuple(mapped, flags.to_vec(), readonly));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use tyck_options::CheckerOptions;

    use crate::session::Session;

    /// Helper: display the type of the alias named `name` declared last.
    fn alias_type(source: &str, name: &str) -> String {
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let file = session.file_id("a.ts").unwrap();
        let mut checker = session.checker();
        let offset = source.rfind(&format!("type {name}")).unwrap() + 5;
        let node = checker.tree(file).node_at_offset(offset as u32).unwrap();
        let symbol = checker.get_symbol_at_location(file, node).unwrap();
        let ty = checker.declared_type(symbol);
        checker.type_to_string(ty)
    }

    #[test]
    fn test_keyof_object_type() {
        assert_eq!(
            alias_type("interface P { x: number; y: string }\ntype K = keyof P;", "K"),
            "\"x\" | \"y\""
        );
    }

    #[test]
    fn test_indexed_access_over_union_index() {
        assert_eq!(
            alias_type("interface P { x: number; y: string }\ntype V = P['x' | 'y'];", "V"),
            "number | string"
        );
    }

    #[test]
    fn test_conditional_type_distributes() {
        let source = "type NonNull<T> = T extends null | undefined ? never : T;\ntype R = NonNull<string | null>;";
        assert_eq!(alias_type(source, "R"), "string");
    }

    #[test]
    fn test_conditional_type_infers() {
        let source = "type Elem<T> = T extends (infer U)[] ? U : never;\ntype R = Elem<boolean[]>;";
        assert_eq!(alias_type(source, "R"), "boolean");
    }

    #[test]
    fn test_mapped_type_applies_modifiers() {
        let source = "interface P { x: number; readonly y?: string }\n\
                      type M<T> = { -readonly [K in keyof T]-?: T[K] };\n\
                      type R = M<P>;";
        assert_eq!(alias_type(source, "R"), "{ x: number; y: string; }");
    }

    #[test]
    fn test_readonly_tuple_and_literals() {
        assert_eq!(
            alias_type("type T = readonly [1, 'a', ...boolean[]];", "T"),
            "readonly [1, \"a\", ...boolean[]]"
        );
    }
}
