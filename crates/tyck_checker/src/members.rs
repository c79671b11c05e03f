//! Resolving the members of object types.
//!
//! Declaration-backed types resolve to lazy properties: the property keeps
//! its symbol and the mapper of the instantiation, and its type is computed
//! the first time someone asks. Unions, intersections, tuples and mapped
//! types resolve eagerly.

use std::sync::Arc;

use tyck_ast::types::{FileId, ModifierFlags, NodeId, SymbolFlags, SymbolId};
use tyck_ast::{NodeData, SyntaxKind};
use tyck_binder::Declaration;
use tyck_core::intern::InternedString;

use crate::checker::Checker;
use crate::types::{
    DeclRef, ElementFlags, IndexInfo, ObjectKey, Parameter, PropertyFlags, PropertyInfo, PropertyType, Signature,
    SignatureFlags, SignatureId, SignatureKind, StructuredMembers, TypeFlags, TypeId, TypeKey, TypeMapper,
};

impl<'s> Checker<'s> {
    /// The members of `ty`. Re-entering while `ty` is being resolved yields
    /// no members.
    pub(crate) fn resolve_members(&mut self, ty: TypeId) -> Arc<StructuredMembers> {
        if let Some(done) = self.session.caches.members.get(&ty) {
            return Arc::clone(&done);
        }
        if !self.members_pending.insert(ty) {
            return Arc::new(StructuredMembers::default());
        }
        let members = Arc::new(self.compute_members(ty));
        self.members_pending.remove(&ty);
        Arc::clone(self.session.caches.members.entry(ty).or_insert(members).value())
    }

    fn compute_members(&mut self, ty: TypeId) -> StructuredMembers {
        let data = self.types().get(ty);
        match &data.key {
            TypeKey::Object(ObjectKey::Declared(symbol)) => self.declared_members(*symbol, None),
            TypeKey::Object(ObjectKey::Reference { target, args }) => {
                let Some(symbol) = self.types().get(*target).symbol else {
                    return StructuredMembers::default();
                };
                let parameters = self.type_parameters_of(symbol);
                let mapper = TypeMapper::new(parameters.to_vec(), args.to_vec());
                self.declared_members(symbol, Some(Arc::new(mapper)))
            }
            TypeKey::Object(ObjectKey::Tuple {
                elements,
                flags,
                readonly,
            }) => self.tuple_members(elements, flags, *readonly),
            TypeKey::Object(ObjectKey::Anonymous {
                decl: DeclRef::Symbol(symbol),
                args,
            }) => {
                let mapper = match self.symbol(*symbol).first_declaration() {
                    Some(declaration) => {
                        let outer = self.outer_type_parameters(declaration.file, declaration.node);
                        Self::mapper_for(&outer, args)
                    }
                    None => None,
                };
                self.symbol_members(*symbol, mapper)
            }
            TypeKey::Object(ObjectKey::Anonymous {
                decl: DeclRef::Node(declaration),
                args,
            }) => {
                let outer = self.outer_type_parameters(declaration.file, declaration.node);
                let mapper = Self::mapper_for(&outer, args);
                self.node_members(*declaration, mapper)
            }
            TypeKey::Object(ObjectKey::Mapped { decl, args }) => self.mapped_members(*decl, args),
            TypeKey::Object(ObjectKey::Function { signature, .. }) => {
                let mut members = StructuredMembers::default();
                match self.session.signature(*signature).kind {
                    SignatureKind::Call => members.call_signatures.push(*signature),
                    SignatureKind::Construct => members.construct_signatures.push(*signature),
                }
                members
            }
            TypeKey::Object(ObjectKey::Literal { properties, .. }) => {
                let mut members = StructuredMembers::default();
                for property in properties.iter() {
                    members
                        .properties
                        .insert(property.name, PropertyInfo::resolved(property.name, property.ty, property.flags));
                }
                members
            }
            TypeKey::Union(parts) => self.union_members(parts),
            TypeKey::Intersection(parts) => self.intersection_members(parts),
            _ => StructuredMembers::default(),
        }
    }

    fn mapper_for(parameters: &[TypeId], args: &[TypeId]) -> Option<Arc<TypeMapper>> {
        if parameters.is_empty() || parameters.len() != args.len() || parameters == args {
            return None;
        }
        Some(Arc::new(TypeMapper::new(parameters.to_vec(), args.to_vec())))
    }

    // ========================================================================
    // Declaration-backed members
    // ========================================================================

    /// Instance members of a class or interface, own members first, then
    /// the members inherited from its bases.
    fn declared_members(&mut self, symbol: SymbolId, mapper: Option<Arc<TypeMapper>>) -> StructuredMembers {
        let mut members = StructuredMembers::default();
        self.add_table_members(symbol, mapper.as_ref(), &mut members);
        let bases = self.base_types(symbol);
        for &base in bases.iter() {
            let base = match &mapper {
                Some(mapper) => self.instantiate(base, mapper),
                None => base,
            };
            let inherited = self.resolve_members(base);
            Self::inherit_members(&mut members, &inherited);
        }
        members
    }

    fn inherit_members(members: &mut StructuredMembers, inherited: &StructuredMembers) {
        for (name, property) in &inherited.properties {
            members.properties.entry(*name).or_insert_with(|| property.clone());
        }
        if members.call_signatures.is_empty() {
            members.call_signatures.extend_from_slice(&inherited.call_signatures);
        }
        if members.construct_signatures.is_empty() {
            members.construct_signatures.extend_from_slice(&inherited.construct_signatures);
        }
        for info in &inherited.index_infos {
            if members.index_info(info.key_type).is_none() {
                members.index_infos.push(*info);
            }
        }
    }

    /// Properties, signatures and index signatures of a member table.
    fn add_table_members(&mut self, owner: SymbolId, mapper: Option<&Arc<TypeMapper>>, members: &mut StructuredMembers) {
        let owner = self.resolve_merged(owner);
        let Some(table) = self.symbol(owner).members.as_ref() else {
            return;
        };
        let (ctor, call, new, index) = {
            let names = &self.session.names;
            (names.ctor, names.call, names.new, names.index)
        };
        for (name, member) in table.iter() {
            if name == ctor {
                continue;
            }
            let declarations = self.symbol(member).declarations.to_vec();
            if name == call || name == new {
                let signatures = self.declaration_signatures(&declarations, mapper);
                if name == call {
                    members.call_signatures.extend(signatures);
                } else {
                    members.construct_signatures.extend(signatures);
                }
                continue;
            }
            if name == index {
                for declaration in declarations {
                    if let Some(info) = self.index_info_of_declaration(declaration.file, declaration.node, mapper) {
                        if members.index_info(info.key_type).is_none() {
                            members.index_infos.push(info);
                        }
                    }
                }
                continue;
            }
            let property = self.lazy_property(name, member, mapper);
            members.properties.insert(name, property);
        }
    }

    fn lazy_property(&self, name: InternedString, symbol: SymbolId, mapper: Option<&Arc<TypeMapper>>) -> PropertyInfo {
        PropertyInfo {
            name,
            flags: self.property_flags(symbol),
            symbol: Some(symbol),
            declared: PropertyType::Lazy {
                symbol,
                mapper: mapper.cloned(),
            },
        }
    }

    fn property_flags(&self, symbol: SymbolId) -> PropertyFlags {
        let flags = self.symbol(symbol).flags;
        let mut result = PropertyFlags::empty();
        if flags.contains(SymbolFlags::OPTIONAL) {
            result |= PropertyFlags::OPTIONAL;
        }
        if flags.contains(SymbolFlags::METHOD) {
            result |= PropertyFlags::METHOD;
        }
        if flags.contains(SymbolFlags::PRIVATE) {
            result |= PropertyFlags::PRIVATE;
        }
        if flags.contains(SymbolFlags::PROTECTED) {
            result |= PropertyFlags::PROTECTED;
        }
        if self.is_readonly_symbol(symbol) {
            result |= PropertyFlags::READONLY;
        }
        result
    }

    /// Signatures of function-like declarations. An implementation is
    /// hidden behind its overloads.
    pub(crate) fn declaration_signatures(
        &mut self,
        declarations: &[Declaration],
        mapper: Option<&Arc<TypeMapper>>,
    ) -> Vec<SignatureId> {
        let bodies = |c: &Self, d: &Declaration| c.tree(d.file).signature(d.node).map(|s| s.body.is_some());
        let has_overloads = declarations.iter().any(|d| bodies(self, d) == Some(false))
            && declarations.iter().any(|d| bodies(self, d) == Some(true));
        let mut signatures = Vec::with_capacity(declarations.len());
        for declaration in declarations {
            match bodies(self, declaration) {
                None => continue,
                Some(true) if has_overloads => continue,
                Some(_) => {}
            }
            let signature = self.signature_of_declaration(declaration.file, declaration.node);
            signatures.push(match mapper {
                Some(mapper) => self.instantiate_signature(signature, Arc::clone(mapper)),
                None => signature,
            });
        }
        signatures
    }

    fn index_info_of_declaration(
        &mut self,
        file: FileId,
        node: NodeId,
        mapper: Option<&Arc<TypeMapper>>,
    ) -> Option<IndexInfo> {
        let tree = self.tree(file);
        let signature = tree.signature(node)?;
        let parameter = *signature.parameters.first()?;
        let NodeData::Variable {
            type_annotation: Some(key_node),
            ..
        } = tree.node(parameter).data
        else {
            return None;
        };
        let key = self.type_from_type_node(file, key_node);
        let key_type = if self.types().is(key, TypeFlags::NUMBER_LIKE) {
            TypeId::NUMBER
        } else if self.types().is(key, TypeFlags::ES_SYMBOL) {
            TypeId::SYMBOL
        } else {
            TypeId::STRING
        };
        let value_type = match signature.return_type {
            Some(annotation) => self.type_from_type_node(file, annotation),
            None => TypeId::ANY,
        };
        let value_type = match mapper {
            Some(mapper) => self.instantiate(value_type, mapper),
            None => value_type,
        };
        Some(IndexInfo {
            key_type,
            value_type,
            readonly: tree.node(node).modifiers.contains(ModifierFlags::READONLY),
            declaration: Some(Checker::declaration(file, node)),
        })
    }

    /// Members of the type of a function, class, enum or namespace symbol.
    fn symbol_members(&mut self, symbol: SymbolId, mapper: Option<Arc<TypeMapper>>) -> StructuredMembers {
        let mut members = StructuredMembers::default();
        let flags = self.symbol(symbol).flags;
        if flags.contains(SymbolFlags::ALIAS) {
            if let Some(file) = self.namespace_import_file(symbol) {
                let exports = &self.bound(file).exports;
                for (name, export) in exports.iter() {
                    let target = self.resolve_alias_or_self(export);
                    if self.symbol(target).flags.intersects(SymbolFlags::VALUE) {
                        let property = self.lazy_property(name, target, None);
                        members.properties.insert(name, property);
                    }
                }
            }
            return members;
        }
        if flags.contains(SymbolFlags::CLASS) {
            self.class_static_members(symbol, mapper.as_ref(), &mut members);
        } else if flags.intersects(SymbolFlags::FUNCTION | SymbolFlags::METHOD) {
            let declarations = self.symbol(symbol).declarations.to_vec();
            members.call_signatures = self.declaration_signatures(&declarations, mapper.as_ref());
        } else if flags.intersects(SymbolFlags::ENUM) {
            for member in self.enum_members(symbol) {
                let name = self.symbol(member).name;
                let ty = self.declared_type(member);
                members.properties.insert(
                    name,
                    PropertyInfo {
                        name,
                        flags: PropertyFlags::READONLY,
                        symbol: Some(member),
                        declared: PropertyType::Resolved(ty),
                    },
                );
            }
        }
        if flags.contains(SymbolFlags::VALUE_MODULE) || flags.contains(SymbolFlags::CLASS) {
            self.add_value_exports(symbol, &mut members);
        }
        members
    }

    fn add_value_exports(&mut self, symbol: SymbolId, members: &mut StructuredMembers) {
        let Some(exports) = self.symbol(symbol).exports.as_ref() else {
            return;
        };
        for (name, export) in exports.iter() {
            if members.properties.contains_key(&name) {
                continue;
            }
            let target = self.resolve_alias_or_self(export);
            if !self.symbol(target).flags.intersects(SymbolFlags::VALUE) {
                continue;
            }
            let property = self.lazy_property(name, target, None);
            members.properties.insert(name, property);
        }
    }

    /// The constructor type of a class: its construct signatures and the
    /// statics of the class and its base class.
    fn class_static_members(&mut self, class: SymbolId, mapper: Option<&Arc<TypeMapper>>, members: &mut StructuredMembers) {
        let constructor = self
            .symbol(class)
            .members
            .as_ref()
            .and_then(|table| table.get(self.session.names.ctor));
        let declared = self.declared_type(class);
        let abstract_class = self
            .symbol(class)
            .declarations
            .iter()
            .any(|d| self.kind(d.file, d.node) != SyntaxKind::InterfaceDeclaration
                && self.tree(d.file).node(d.node).modifiers.contains(ModifierFlags::ABSTRACT));
        let base_class = self
            .base_types(class)
            .first()
            .copied()
            .filter(|&base| self.class_or_interface_symbol(base).is_some_and(|s| self.symbol(s).flags.contains(SymbolFlags::CLASS)));
        members.construct_signatures = match constructor {
            Some(constructor) => {
                let declarations = self.symbol(constructor).declarations.to_vec();
                self.declaration_signatures(&declarations, mapper)
            }
            None => {
                let parameters = self.local_type_parameters(class);
                let inherited = match base_class {
                    Some(base) => self.inherited_construct_signatures(base),
                    None => Vec::new(),
                };
                let mut synthesized = Vec::with_capacity(inherited.len().max(1));
                let template = |declaration: Option<Declaration>, params: Box<[Parameter]>, min: usize, rest: bool| Signature {
                    declaration,
                    type_parameters: parameters.iter().copied().collect(),
                    parameters: params,
                    this_type: None,
                    return_type: Some(declared),
                    type_predicate: None,
                    min_argument_count: min,
                    has_rest: rest,
                    kind: SignatureKind::Construct,
                    flags: if abstract_class {
                        SignatureFlags::ABSTRACT
                    } else {
                        SignatureFlags::empty()
                    },
                    target: None,
                };
                if inherited.is_empty() {
                    synthesized.push(self.session.add_signature(template(None, Box::new([]), 0, false)));
                } else {
                    for signature in inherited {
                        let base = self.session.signature(signature);
                        let signature = template(
                            base.declaration,
                            base.parameters.clone(),
                            base.min_argument_count,
                            base.has_rest,
                        );
                        synthesized.push(self.session.add_signature(signature));
                    }
                }
                match mapper {
                    Some(mapper) => synthesized
                        .into_iter()
                        .map(|s| self.instantiate_signature(s, Arc::clone(mapper)))
                        .collect(),
                    None => synthesized,
                }
            }
        };
        if let Some(base) = base_class {
            if let Some(base_symbol) = self.class_or_interface_symbol(base) {
                let base_static = self.symbol_type(base_symbol);
                let inherited = self.resolve_members(base_static);
                for (name, property) in &inherited.properties {
                    if self.symbol(class).exports.as_ref().is_some_and(|e| e.contains(*name)) {
                        continue;
                    }
                    members.properties.insert(*name, property.clone());
                }
            }
        }
    }

    /// Construct signatures of a base class instantiated for the type
    /// arguments the heritage clause supplies.
    fn inherited_construct_signatures(&mut self, base: TypeId) -> Vec<SignatureId> {
        let Some(symbol) = self.class_or_interface_symbol(base) else {
            return Vec::new();
        };
        let constructor_type = self.symbol_type(symbol);
        let signatures = self.signatures_of_type(constructor_type, SignatureKind::Construct);
        let parameters = self.type_parameters_of(symbol);
        let args = self.types().get(base).type_arguments().to_vec();
        match Self::mapper_for(&parameters, &args) {
            Some(mapper) => signatures
                .into_iter()
                .map(|s| self.instantiate_signature(s, Arc::clone(&mapper)))
                .collect(),
            None => signatures,
        }
    }

    /// Members of a type literal, function type or constructor type.
    fn node_members(&mut self, declaration: Declaration, mapper: Option<Arc<TypeMapper>>) -> StructuredMembers {
        let mut members = StructuredMembers::default();
        match self.kind(declaration.file, declaration.node) {
            SyntaxKind::TypeLiteral => {
                if let Some(symbol) = self.node_symbol(declaration.file, declaration.node) {
                    self.add_table_members(symbol, mapper.as_ref(), &mut members);
                }
            }
            SyntaxKind::FunctionType | SyntaxKind::ConstructorType => {
                let signature = self.signature_of_declaration(declaration.file, declaration.node);
                let signature = match &mapper {
                    Some(mapper) => self.instantiate_signature(signature, Arc::clone(mapper)),
                    None => signature,
                };
                match self.session.signature(signature).kind {
                    SignatureKind::Call => members.call_signatures.push(signature),
                    SignatureKind::Construct => members.construct_signatures.push(signature),
                }
            }
            _ => {}
        }
        members
    }

    // ========================================================================
    // Structural members
    // ========================================================================

    fn tuple_members(&mut self, elements: &[TypeId], flags: &[ElementFlags], readonly: bool) -> StructuredMembers {
        let mut members = StructuredMembers::default();
        let element_flags = if readonly {
            PropertyFlags::READONLY
        } else {
            PropertyFlags::empty()
        };
        let mut element_types = Vec::with_capacity(elements.len());
        let mut fixed = true;
        for (i, (&element, &flag)) in elements.iter().zip(flags).enumerate() {
            element_types.push(element);
            if flag.contains(ElementFlags::REST) {
                fixed = false;
                continue;
            }
            let mut property_flags = element_flags;
            if flag.contains(ElementFlags::OPTIONAL) {
                property_flags |= PropertyFlags::OPTIONAL;
                fixed = false;
            }
            let name = self.intern(&i.to_string());
            members
                .properties
                .insert(name, PropertyInfo::resolved(name, element, property_flags));
        }
        let length = if fixed {
            self.types().literal_number(elements.len() as f64)
        } else {
            TypeId::NUMBER
        };
        let length_name = self.session.names.length;
        members.properties.insert(
            length_name,
            PropertyInfo::resolved(length_name, length, PropertyFlags::READONLY),
        );
        let element = self.types().union(&element_types);
        let array = if readonly {
            self.types().readonly_array(element)
        } else {
            self.types().array(element)
        };
        let inherited = self.resolve_members(array);
        Self::inherit_members(&mut members, &inherited);
        members
    }

    /// Properties common to every constituent; the rest are kept as
    /// partial. Signatures survive when every constituent agrees.
    fn union_members(&mut self, parts: &[TypeId]) -> StructuredMembers {
        let mut resolved = Vec::with_capacity(parts.len());
        for &part in parts {
            let apparent = self.apparent_type(part);
            resolved.push(self.resolve_members(apparent));
        }
        let mut members = StructuredMembers::default();
        let mut names: Vec<InternedString> = Vec::new();
        for part in &resolved {
            for name in part.properties.keys() {
                if !names.contains(name) {
                    names.push(*name);
                }
            }
        }
        for name in names {
            let mut types = Vec::with_capacity(resolved.len());
            let mut flags = PropertyFlags::SYNTHETIC;
            let mut symbol = None;
            let mut same_symbol = true;
            for part in &resolved {
                match part.properties.get(&name) {
                    Some(property) => {
                        types.push(self.declared_type_of_property(property));
                        flags |= property.flags & (PropertyFlags::OPTIONAL | PropertyFlags::READONLY);
                        match symbol {
                            None => symbol = property.symbol,
                            Some(s) => same_symbol &= property.symbol == Some(s),
                        }
                    }
                    None => match Self::index_for_name(part, self.text(name)) {
                        Some(info) => types.push(info.value_type),
                        None => flags |= PropertyFlags::PARTIAL,
                    },
                }
            }
            let ty = self.types().union(&types);
            members.properties.insert(
                name,
                PropertyInfo {
                    name,
                    flags,
                    symbol: if same_symbol { symbol } else { None },
                    declared: PropertyType::Resolved(ty),
                },
            );
        }
        for kind in [SignatureKind::Call, SignatureKind::Construct] {
            let lists: Vec<Vec<SignatureId>> = resolved.iter().map(|m| m.signatures(kind).to_vec()).collect();
            let signatures = self.union_signatures(&lists, kind);
            match kind {
                SignatureKind::Call => members.call_signatures = signatures,
                SignatureKind::Construct => members.construct_signatures = signatures,
            }
        }
        if let Some(first) = resolved.first() {
            for info in &first.index_infos {
                let mut values = vec![info.value_type];
                let mut readonly = info.readonly;
                let mut everywhere = true;
                for other in &resolved[1..] {
                    match other.index_info(info.key_type) {
                        Some(found) => {
                            values.push(found.value_type);
                            readonly |= found.readonly;
                        }
                        None => everywhere = false,
                    }
                }
                if everywhere {
                    members.index_infos.push(IndexInfo {
                        key_type: info.key_type,
                        value_type: self.types().union(&values),
                        readonly,
                        declaration: None,
                    });
                }
            }
        }
        members
    }

    /// One signature list per constituent: identical lists are kept, and
    /// single non-generic signatures combine into one taking the
    /// intersection of each parameter and returning the union.
    fn union_signatures(&mut self, lists: &[Vec<SignatureId>], kind: SignatureKind) -> Vec<SignatureId> {
        let Some(first) = lists.first() else {
            return Vec::new();
        };
        if lists.iter().any(Vec::is_empty) {
            return Vec::new();
        }
        if lists.iter().all(|l| l == first) {
            return first.clone();
        }
        if lists.iter().any(|l| l.len() != 1) {
            return Vec::new();
        }
        let signatures: Vec<Arc<Signature>> = lists.iter().map(|l| self.session.signature(l[0])).collect();
        if signatures.iter().any(|s| !s.type_parameters.is_empty()) {
            return Vec::new();
        }
        let Some(longest) = signatures.iter().max_by_key(|s| s.parameter_count()).cloned() else {
            return Vec::new();
        };
        let mut parameters = Vec::with_capacity(longest.parameter_count());
        for (i, parameter) in longest.parameters.iter().enumerate() {
            let mut types = Vec::with_capacity(signatures.len());
            for signature in &signatures {
                if let Some(ty) = self.parameter_type_at(signature, i) {
                    types.push(ty);
                }
            }
            let ty = if parameter.rest {
                let elements: Vec<TypeId> = types
                    .iter()
                    .map(|&t| self.types().array_element(t).unwrap_or(t))
                    .collect();
                let element = self.intersection_or_error(&elements);
                self.types().array(element)
            } else {
                self.intersection_or_error(&types)
            };
            parameters.push(Parameter { ty, ..parameter.clone() });
        }
        let mut returns = Vec::with_capacity(signatures.len());
        for id in lists.iter().map(|l| l[0]) {
            returns.push(self.return_type_of_signature(id));
        }
        let return_type = self.types().union(&returns);
        let combined = Signature {
            declaration: longest.declaration,
            type_parameters: Box::new([]),
            parameters: parameters.into(),
            this_type: None,
            return_type: Some(return_type),
            type_predicate: None,
            min_argument_count: signatures.iter().map(|s| s.min_argument_count).max().unwrap_or(0),
            has_rest: longest.has_rest,
            kind,
            flags: SignatureFlags::UNION,
            target: None,
        };
        vec![self.session.add_signature(combined)]
    }

    fn intersection_members(&mut self, parts: &[TypeId]) -> StructuredMembers {
        let mut members = StructuredMembers::default();
        for &part in parts {
            let apparent = self.apparent_type(part);
            let resolved = self.resolve_members(apparent);
            for (name, property) in &resolved.properties {
                match members.properties.get(name).cloned() {
                    None => {
                        members.properties.insert(*name, property.clone());
                    }
                    Some(existing) => {
                        let left = self.declared_type_of_property(&existing);
                        let right = self.declared_type_of_property(property);
                        let ty = self.intersection_or_error(&[left, right]);
                        let kept = PropertyFlags::OPTIONAL | PropertyFlags::READONLY;
                        let flags = (existing.flags & property.flags & kept)
                            | ((existing.flags | property.flags) & !kept)
                            | PropertyFlags::SYNTHETIC;
                        members.properties.insert(
                            *name,
                            PropertyInfo {
                                name: *name,
                                flags,
                                symbol: existing.symbol,
                                declared: PropertyType::Resolved(ty),
                            },
                        );
                    }
                }
            }
            members.call_signatures.extend_from_slice(&resolved.call_signatures);
            members.construct_signatures.extend_from_slice(&resolved.construct_signatures);
            for info in &resolved.index_infos {
                match members.index_infos.iter().position(|i| i.key_type == info.key_type) {
                    Some(at) => {
                        let existing = members.index_infos[at];
                        let value_type = self.intersection_or_error(&[existing.value_type, info.value_type]);
                        members.index_infos[at] = IndexInfo {
                            value_type,
                            readonly: existing.readonly && info.readonly,
                            ..existing
                        };
                    }
                    None => members.index_infos.push(*info),
                }
            }
        }
        members
    }

    /// Members of a mapped type whose keys are known.
    fn mapped_members(&mut self, decl: Declaration, args: &[TypeId]) -> StructuredMembers {
        let mut members = StructuredMembers::default();
        let Some((parameter, constraint, template)) = self.mapped_parts(decl, args) else {
            return members;
        };
        let NodeData::MappedType {
            name_type,
            readonly_token,
            question_token,
            ..
        } = self.data(decl.file, decl.node)
        else {
            return members;
        };
        let (name_type, readonly_token, question_token) = (*name_type, *readonly_token, *question_token);
        let source = match self.homomorphic_source(decl, args) {
            Some(source) if !self.is_generic(source) => {
                let apparent = self.apparent_type(source);
                Some(self.resolve_members(apparent))
            }
            _ => None,
        };
        let keys: Vec<TypeId> = match &source {
            Some(source) => {
                let mut keys: Vec<TypeId> = source.properties.keys().map(|&n| self.types().literal_string(n)).collect();
                keys.extend(source.index_infos.iter().map(|i| i.key_type));
                keys
            }
            None => {
                if self.is_generic(constraint) {
                    return members;
                }
                self.types().get(constraint).constituents().to_vec()
            }
        };
        let outer = self.outer_type_parameters(decl.file, decl.node);
        let name_template = name_type.map(|node| self.type_from_type_node(decl.file, node));
        for key in keys {
            let mapper = TypeMapper::single(parameter, key);
            let name_key = match name_template {
                Some(template) => {
                    let mut sources = outer.to_vec();
                    let mut targets = args.to_vec();
                    sources.push(parameter);
                    targets.push(key);
                    self.instantiate(template, &TypeMapper::new(sources, targets))
                }
                None => key,
            };
            if name_key == TypeId::NEVER {
                continue;
            }
            let mut ty = self.instantiate(template, &mapper);
            if let Some(name) = self.literal_property_name(name_key) {
                let original_name = self.literal_property_name(key);
                let original = match (&source, original_name) {
                    (Some(source), Some(n)) => source.properties.get(&n).cloned(),
                    _ => None,
                };
                let optional = match question_token {
                    Some(SyntaxKind::MinusToken) => false,
                    Some(_) => true,
                    None => original.as_ref().is_some_and(PropertyInfo::is_optional),
                };
                let readonly = match readonly_token {
                    Some(SyntaxKind::MinusToken) => false,
                    Some(_) => true,
                    None => original.as_ref().is_some_and(PropertyInfo::is_readonly),
                };
                if question_token == Some(SyntaxKind::MinusToken) {
                    ty = self.remove_undefined(ty);
                }
                let mut flags = PropertyFlags::empty();
                if optional {
                    flags |= PropertyFlags::OPTIONAL;
                }
                if readonly {
                    flags |= PropertyFlags::READONLY;
                }
                members.properties.insert(
                    name,
                    PropertyInfo {
                        name,
                        flags,
                        symbol: original.and_then(|p| p.symbol),
                        declared: PropertyType::Resolved(ty),
                    },
                );
                continue;
            }
            let key_flags = self.types().flags(name_key);
            let key_type = if key_flags.intersects(TypeFlags::STRING | TypeFlags::ANY) {
                TypeId::STRING
            } else if key_flags.contains(TypeFlags::NUMBER) {
                TypeId::NUMBER
            } else if key_flags.contains(TypeFlags::ES_SYMBOL) {
                TypeId::SYMBOL
            } else {
                continue;
            };
            let source_readonly = source
                .as_ref()
                .and_then(|s| s.index_info(key_type))
                .is_some_and(|i| i.readonly);
            let readonly = match readonly_token {
                Some(SyntaxKind::MinusToken) => false,
                Some(_) => true,
                None => source_readonly,
            };
            if members.index_info(key_type).is_none() {
                members.index_infos.push(IndexInfo {
                    key_type,
                    value_type: ty,
                    readonly,
                    declaration: None,
                });
            }
        }
        members
    }

    // ========================================================================
    // Property lookup
    // ========================================================================

    /// The type whose members a value of type `ty` offers: primitives map
    /// to their global interfaces and type variables to their constraints.
    pub(crate) fn apparent_type(&mut self, ty: TypeId) -> TypeId {
        let flags = self.types().flags(ty);
        if flags.intersects(TypeFlags::TYPE_VARIABLE | TypeFlags::CONDITIONAL | TypeFlags::SUBSTITUTION) {
            let constraint = self.base_constraint(ty);
            if constraint == ty || constraint == TypeId::UNKNOWN || constraint == TypeId::ERROR {
                return TypeId::EMPTY_OBJECT;
            }
            return self.apparent_type(constraint);
        }
        if flags.intersects(TypeFlags::INDEX) {
            let keys = self.types().union(&[TypeId::STRING, TypeId::NUMBER, TypeId::SYMBOL]);
            return self.apparent_type(keys);
        }
        if flags.intersects(TypeFlags::STRING_LIKE) {
            return self.global_type(self.session.names.string);
        }
        if flags.intersects(TypeFlags::NUMBER_LIKE) {
            return self.global_type(self.session.names.number);
        }
        if flags.intersects(TypeFlags::BOOLEAN_LIKE) {
            return self.global_type(self.session.names.boolean);
        }
        if flags.intersects(TypeFlags::BIGINT_LIKE) {
            return self.global_type(self.session.names.bigint);
        }
        if flags.intersects(TypeFlags::ES_SYMBOL) {
            return self.global_type(self.session.names.symbol);
        }
        if flags.intersects(TypeFlags::NON_PRIMITIVE) {
            return TypeId::EMPTY_OBJECT;
        }
        if flags.intersects(TypeFlags::UNION) {
            let parts = self.types().get(ty).constituents().to_vec();
            if parts.iter().any(|&p| self.types().is(p, TypeFlags::INSTANTIABLE)) {
                let mapped: Vec<TypeId> = parts.into_iter().map(|p| self.apparent_type(p)).collect();
                return self.types().union(&mapped);
            }
        }
        ty
    }

    /// A readable property of `ty`, falling back to the members of the
    /// global `Function` and `Object` interfaces.
    pub(crate) fn property_of_type(&mut self, ty: TypeId, name: InternedString) -> Option<PropertyInfo> {
        let apparent = self.apparent_type(ty);
        let members = self.resolve_members(apparent);
        if let Some(property) = members.properties.get(&name) {
            if !property.flags.contains(PropertyFlags::PARTIAL) {
                return Some(property.clone());
            }
            return None;
        }
        if !self
            .types()
            .is(apparent, TypeFlags::OBJECT | TypeFlags::UNION | TypeFlags::INTERSECTION)
        {
            return None;
        }
        if !members.call_signatures.is_empty() || !members.construct_signatures.is_empty() {
            let function = self.global_function_type();
            if function != apparent {
                if let Some(property) = self.resolve_members(function).properties.get(&name) {
                    return Some(property.clone());
                }
            }
        }
        let object = self.global_object_type();
        if object == apparent {
            return None;
        }
        self.resolve_members(object).properties.get(&name).cloned()
    }

    /// The declared type of a property, without the `undefined` an
    /// optional property adds when read.
    pub(crate) fn declared_type_of_property(&mut self, property: &PropertyInfo) -> TypeId {
        match &property.declared {
            PropertyType::Resolved(ty) => *ty,
            PropertyType::Lazy { symbol, mapper } => {
                let ty = self.symbol_type(*symbol);
                match mapper {
                    Some(mapper) => self.instantiate(ty, mapper),
                    None => ty,
                }
            }
        }
    }

    /// The type read from a property.
    pub(crate) fn type_of_property(&mut self, property: &PropertyInfo) -> TypeId {
        let ty = self.declared_type_of_property(property);
        if property.is_optional() && self.strict_null_checks() {
            return self.types().union(&[ty, TypeId::UNDEFINED]);
        }
        ty
    }

    /// Call or construct signatures of the apparent type of `ty`.
    pub fn signatures_of_type(&mut self, ty: TypeId, kind: SignatureKind) -> Vec<SignatureId> {
        let apparent = self.apparent_type(ty);
        self.resolve_members(apparent).signatures(kind).to_vec()
    }

    /// The index signature an access by `name` falls back to: the number
    /// index for numeric names, else the string index.
    pub(crate) fn applicable_index_info(&mut self, ty: TypeId, name: InternedString) -> Option<IndexInfo> {
        let apparent = self.apparent_type(ty);
        let members = self.resolve_members(apparent);
        Self::index_for_name(&members, self.text(name))
    }

    fn index_for_name(members: &StructuredMembers, name: &str) -> Option<IndexInfo> {
        if is_numeric_name(name) {
            if let Some(info) = members.index_info(TypeId::NUMBER) {
                return Some(*info);
            }
        }
        members.index_info(TypeId::STRING).copied()
    }
}

/// Whether a property name is the canonical text of a number.
pub(crate) fn is_numeric_name(name: &str) -> bool {
    name.parse::<f64>()
        .is_ok_and(|value| tyck_binder::names::number_to_string(value) == name)
}

#[cfg(test)]
mod tests {
    use tyck_options::CheckerOptions;

    use super::is_numeric_name;
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
    fn test_inherited_members_are_instantiated() {
        let source = "interface Base<T> { value: T }\n\
                      interface Box<U> extends Base<U[]> { label: string }\n\
                      type R = Box<number>['value'];";
        assert_eq!(alias_type(source, "R"), "number[]");
    }

    #[test]
    fn test_union_property_unions_constituents() {
        let source = "type U = { a: string; b: number } | { a: number };\ntype R = U['a'];";
        assert_eq!(alias_type(source, "R"), "string | number");
    }

    #[test]
    fn test_tuple_length_is_literal_when_fixed() {
        assert_eq!(alias_type("type T = [string, number];\ntype L = T['length'];", "L"), "2");
        assert_eq!(alias_type("type T = [string, number?];\ntype L = T['length'];", "L"), "number");
    }

    #[test]
    fn test_mapped_type_adds_optional_modifier() {
        let source = "type P<T> = { [K in keyof T]?: T[K] };\ninterface A { x: number }\ntype R = P<A>;";
        assert_eq!(alias_type(source, "R"), "{ x?: number; }");
    }

    #[test]
    fn test_numeric_names() {
        assert!(is_numeric_name("0"));
        assert!(is_numeric_name("1.5"));
        assert!(!is_numeric_name("01"));
        assert!(!is_numeric_name("x"));
    }
}
