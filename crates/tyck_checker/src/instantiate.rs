//! Substituting type parameters.
//!
//! Instantiation is structural for unions, intersections, tuples, object
//! literals and type operators, and deferred for declaration-backed object
//! types: those just get new `args`, and their members are instantiated on
//! demand when resolved.

use std::sync::Arc;

use tracing::trace;
use tyck_diagnostics::messages;

use crate::checker::Checker;
use crate::error::CheckerError;
use crate::types::{
    LiteralProperty, ObjectKey, Parameter, Signature, SignatureId, TypeFlags, TypeId, TypeKey, TypeMapper,
    TypePredicate,
};

/// Nesting limit of one instantiation.
pub(crate) const MAX_INSTANTIATION_DEPTH: u32 = 100;
/// Instantiations one checker may perform before giving up on the session.
pub(crate) const MAX_INSTANTIATION_COUNT: u32 = 5_000_000;

impl<'s> Checker<'s> {
    pub(crate) fn instantiate(&mut self, ty: TypeId, mapper: &TypeMapper) -> TypeId {
        if mapper.is_empty() || mapper.is_identity() || !self.could_be_instantiated(ty) {
            return ty;
        }
        let key = (ty, mapper.clone());
        if let Some(done) = self.session.caches.instantiations.get(&key) {
            return *done;
        }
        if self.instantiation_depth >= MAX_INSTANTIATION_DEPTH {
            self.report_deep_instantiation();
            return TypeId::ERROR;
        }
        self.instantiation_count += 1;
        if self.instantiation_count > MAX_INSTANTIATION_COUNT {
            if self.fatal.is_none() {
                self.fatal = Some(CheckerError::InstantiationDepthExceeded);
            }
            return TypeId::ERROR;
        }
        self.instantiation_depth += 1;
        let result = self.instantiate_worker(ty, mapper);
        self.instantiation_depth -= 1;
        if result == TypeId::ERROR && self.reported_deep_instantiation {
            return result;
        }
        *self.session.caches.instantiations.entry(key).or_insert(result)
    }

    fn report_deep_instantiation(&mut self) {
        if self.reported_deep_instantiation {
            return;
        }
        self.reported_deep_instantiation = true;
        trace!(depth = self.instantiation_depth, "instantiation too deep");
        if let Some((file, node)) = self.current_site {
            self.publish(
                file,
                node,
                &messages::TYPE_INSTANTIATION_IS_EXCESSIVELY_DEEP_AND_POSSIBLY_INFINITE,
                &[],
            );
        }
    }

    /// Cheap pre-check: intrinsics and literals never change.
    fn could_be_instantiated(&self, ty: TypeId) -> bool {
        !self.types().is(ty, TypeFlags::PRIMITIVE | TypeFlags::ANY_OR_UNKNOWN | TypeFlags::NEVER | TypeFlags::ERROR | TypeFlags::NON_PRIMITIVE)
    }

    fn instantiate_worker(&mut self, ty: TypeId, mapper: &TypeMapper) -> TypeId {
        let data = self.types().get(ty);
        match &data.key {
            TypeKey::TypeParameter(_) => mapper.map(ty).unwrap_or(ty),
            TypeKey::Union(_) => {
                let parts: Vec<TypeId> = data.display_constituents().to_vec();
                let mapped = self.instantiate_list(&parts, mapper);
                if mapped == parts {
                    return ty;
                }
                self.types().union(&mapped)
            }
            TypeKey::Intersection(parts) => {
                let parts = parts.to_vec();
                let mapped = self.instantiate_list(&parts, mapper);
                if mapped == parts {
                    return ty;
                }
                self.intersection_or_error(&mapped)
            }
            TypeKey::Index(target) => {
                let target = self.instantiate(*target, mapper);
                self.index_type(target)
            }
            TypeKey::IndexedAccess { object, index } => {
                let (object, index) = (*object, *index);
                let object = self.instantiate(object, mapper);
                let index = self.instantiate(index, mapper);
                self.discarding(|c| c.indexed_access_type(object, index, None))
            }
            TypeKey::Conditional { decl, args } => {
                let decl = *decl;
                let args = self.instantiate_list(args, mapper);
                self.conditional_type(decl, &args)
            }
            TypeKey::Substitution { base, constraint } => {
                let (base, constraint) = (*base, *constraint);
                let base = self.instantiate(base, mapper);
                if self.types().is(base, TypeFlags::TYPE_VARIABLE) {
                    let constraint = self.instantiate(constraint, mapper);
                    self.types().get_or_create(TypeKey::Substitution { base, constraint })
                } else {
                    base
                }
            }
            TypeKey::Object(key) => self.instantiate_object(ty, key, mapper),
            _ => ty,
        }
    }

    fn instantiate_object(&mut self, ty: TypeId, key: &ObjectKey, mapper: &TypeMapper) -> TypeId {
        match key {
            ObjectKey::Declared(symbol) => {
                let parameters = self.type_parameters_of(*symbol);
                if parameters.is_empty() {
                    return ty;
                }
                let args = self.instantiate_list(&parameters, mapper);
                if args[..] == parameters[..] {
                    return ty;
                }
                self.types().reference(ty, args)
            }
            ObjectKey::Reference { target, args } => {
                let target = *target;
                let mapped = self.instantiate_list(args, mapper);
                if mapped[..] == args[..] {
                    return ty;
                }
                self.types().reference(target, mapped)
            }
            ObjectKey::Tuple {
                elements,
                flags,
                readonly,
            } => {
                let mapped = self.instantiate_list(elements, mapper);
                if mapped[..] == elements[..] {
                    return ty;
                }
                self.types().tuple(mapped, flags.to_vec(), *readonly)
            }
            ObjectKey::Anonymous { decl, args } => {
                if args.is_empty() {
                    return ty;
                }
                let mapped = self.instantiate_list(args, mapper);
                if mapped[..] == args[..] {
                    return ty;
                }
                let symbol = self.types().get(ty).symbol;
                self.types().get_or_create_with_symbol(
                    TypeKey::Object(ObjectKey::Anonymous {
                        decl: *decl,
                        args: mapped.into(),
                    }),
                    symbol,
                )
            }
            ObjectKey::Mapped { decl, args } => {
                let mapped = self.instantiate_list(args, mapper);
                if mapped[..] == args[..] {
                    return ty;
                }
                self.mapped_type(*decl, &mapped)
            }
            ObjectKey::Function { decl, signature } => {
                let instantiated = self.instantiate_signature(*signature, Arc::new(mapper.clone()));
                if instantiated == *signature {
                    return ty;
                }
                self.types().get_or_create(TypeKey::Object(ObjectKey::Function {
                    decl: *decl,
                    signature: instantiated,
                }))
            }
            ObjectKey::Literal { properties, fresh } => {
                let fresh = *fresh;
                let properties: Vec<LiteralProperty> = properties
                    .iter()
                    .map(|p| LiteralProperty {
                        name: p.name,
                        ty: self.instantiate(p.ty, mapper),
                        flags: p.flags,
                    })
                    .collect();
                self.types().object_literal(properties, fresh)
            }
        }
    }

    pub(crate) fn instantiate_list(&mut self, types: &[TypeId], mapper: &TypeMapper) -> Vec<TypeId> {
        types.iter().map(|&t| self.instantiate(t, mapper)).collect()
    }

    pub(crate) fn intersection_or_error(&mut self, types: &[TypeId]) -> TypeId {
        match self.types().intersection(types) {
            Ok(ty) => ty,
            Err(_) => {
                if let Some((file, node)) = self.current_site {
                    self.error(
                        file,
                        node,
                        &messages::EXPRESSION_PRODUCES_A_UNION_TYPE_THAT_IS_TOO_COMPLEX_TO_REPRESENT,
                        &[],
                    );
                }
                TypeId::ERROR
            }
        }
    }

    /// Instantiate a signature. Type parameters the mapper assigns are
    /// dropped from the result; an inferred return type stays lazy and is
    /// instantiated when asked for.
    pub(crate) fn instantiate_signature(&mut self, signature: SignatureId, mapper: Arc<TypeMapper>) -> SignatureId {
        if mapper.is_empty() || mapper.is_identity() {
            return signature;
        }
        let key = (signature, (*mapper).clone());
        if let Some(done) = self.session.caches.signature_instantiations.get(&key) {
            return *done;
        }
        let data = self.session.signature(signature);
        let type_parameters: Box<[TypeId]> = data
            .type_parameters
            .iter()
            .copied()
            .filter(|&tp| mapper.map(tp).is_none())
            .collect();
        let parameters: Box<[Parameter]> = data
            .parameters
            .iter()
            .map(|p| Parameter {
                ty: self.instantiate(p.ty, &mapper),
                ..p.clone()
            })
            .collect();
        let this_type = data.this_type.map(|t| self.instantiate(t, &mapper));
        let return_type = data.return_type.map(|t| self.instantiate(t, &mapper));
        let type_predicate = data.type_predicate.map(|p| TypePredicate {
            ty: p.ty.map(|t| self.instantiate(t, &mapper)),
            ..p
        });
        let instantiated = Signature {
            declaration: data.declaration,
            type_parameters,
            parameters,
            this_type,
            return_type,
            type_predicate,
            min_argument_count: data.min_argument_count,
            has_rest: data.has_rest,
            kind: data.kind,
            flags: data.flags,
            target: Some((signature, Arc::clone(&mapper))),
        };
        let id = self.session.add_signature(instantiated);
        *self.session.caches.signature_instantiations.entry(key).or_insert(id)
    }
}

#[cfg(test)]
mod tests {
    use tyck_options::CheckerOptions;

    use crate::session::Session;
    use crate::types::{TypeId, TypeMapper};

    #[test]
    fn test_instantiating_a_union_maps_each_member() {
        let source = "type Pair<T> = T | T[];\ntype P = Pair<string>;";
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let file = session.file_id("a.ts").unwrap();
        let mut checker = session.checker();
        let tree = checker.tree(file);
        let node = tree.node_at_offset(source.rfind("Pair").unwrap() as u32).unwrap();
        let ty = checker.get_type_at_location(file, node);
        assert_eq!(checker.type_to_string(ty), "string | string[]");
    }

    #[test]
    fn test_identity_mapper_is_a_no_op() {
        let session = Session::from_sources(&[("a.ts", "")], CheckerOptions::strict());
        let mut checker = session.checker();
        let mapper = TypeMapper::single(TypeId::MARKER_SUB, TypeId::MARKER_SUB);
        assert_eq!(checker.instantiate(TypeId::MARKER_SUB, &mapper), TypeId::MARKER_SUB);
        let mapper = TypeMapper::single(TypeId::MARKER_SUB, TypeId::STRING);
        let array = checker.types().array(TypeId::MARKER_SUB);
        let mapped = checker.instantiate(array, &mapper);
        assert_eq!(checker.type_to_string(mapped), "string[]");
    }
}
