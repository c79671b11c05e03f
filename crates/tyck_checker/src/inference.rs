//! Type argument inference.
//!
//! Candidates are collected per type parameter by walking a source type
//! against a target type that mentions the parameters. A candidate found
//! at a lower priority value replaces everything found at higher values;
//! equal priorities accumulate.

use std::sync::Arc;

use bitflags::bitflags;
use rustc_hash::FxHashSet;
use tracing::trace;
use tyck_ast::types::ModifierFlags;

use crate::checker::Checker;
use crate::types::{
    ElementFlags, InferencePriority, ObjectKey, SignatureId, SignatureKind, TypeFlags, TypeId, TypeKey, TypeMapper,
    Variance,
};

/// Nesting of object types the inference walk descends into.
const MAX_INFERENCE_DEPTH: u32 = 10;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InferenceFlags: u8 {
        const NONE         = 0;
        /// Parameters without candidates become `unknown` rather than their
        /// default or constraint.
        const NO_DEFAULT   = 1 << 0;
        /// Keep literal candidates as they are.
        const NO_WIDENING  = 1 << 1;
    }
}

#[derive(Debug, Clone)]
pub struct InferenceInfo {
    pub type_parameter: TypeId,
    pub candidates: Vec<TypeId>,
    pub contra_candidates: Vec<TypeId>,
    /// Priority of the current candidates; `None` before the first one.
    pub priority: Option<InferencePriority>,
    /// Every candidate was inferred directly against the naked parameter.
    pub top_level: bool,
    pub is_fixed: bool,
    pub inferred: Option<TypeId>,
}

impl InferenceInfo {
    fn new(type_parameter: TypeId) -> Self {
        Self {
            type_parameter,
            candidates: Vec::new(),
            contra_candidates: Vec::new(),
            priority: None,
            top_level: true,
            is_fixed: false,
            inferred: None,
        }
    }

    fn has_candidates(&self) -> bool {
        !self.candidates.is_empty() || !self.contra_candidates.is_empty()
    }
}

/// A parameter whose inferred type failed its constraint.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub index: usize,
    pub inferred: TypeId,
    pub constraint: TypeId,
}

#[derive(Debug, Clone)]
pub struct InferenceContext {
    pub type_parameters: Box<[TypeId]>,
    pub inferences: Vec<InferenceInfo>,
    pub signature: Option<SignatureId>,
    pub flags: InferenceFlags,
    /// The contextual return type wants literal types kept.
    pub literal_return_context: bool,
    pub violations: Vec<ConstraintViolation>,
}

impl InferenceContext {
    pub fn new(type_parameters: &[TypeId], signature: Option<SignatureId>, flags: InferenceFlags) -> Self {
        Self {
            type_parameters: type_parameters.into(),
            inferences: type_parameters.iter().map(|&tp| InferenceInfo::new(tp)).collect(),
            signature,
            flags,
            literal_return_context: false,
            violations: Vec::new(),
        }
    }

    fn index_of(&self, ty: TypeId) -> Option<usize> {
        self.type_parameters.iter().position(|&tp| tp == ty)
    }

    /// Total number of candidates, used to detect a fixed point.
    pub fn candidate_count(&self) -> usize {
        self.inferences
            .iter()
            .map(|info| info.candidates.len() + info.contra_candidates.len())
            .sum()
    }

    /// Stop accepting candidates for every parameter inferred from the
    /// arguments so far. Inferences from the return context stay open.
    pub fn fix_inferred(&mut self) {
        for info in &mut self.inferences {
            let from_return = info.priority.is_some_and(|p| p.contains(InferencePriority::RETURN_TYPE));
            if info.has_candidates() && !from_return {
                info.is_fixed = true;
            }
        }
    }
}

/// Position of the walk within the target.
#[derive(Debug, Default)]
struct InferenceWalk {
    priority: InferencePriority,
    contravariant: bool,
    nested: bool,
    depth: u32,
    visited: FxHashSet<(TypeId, TypeId, bool)>,
}

impl<'s> Checker<'s> {
    // ========================================================================
    // Public entry
    // ========================================================================

    /// Type arguments for the generic `signature` called with `args`, with
    /// an optional contextual type for the call's result. Empty for a
    /// signature that is not generic or not known.
    pub fn infer_type_arguments(
        &mut self,
        signature: SignatureId,
        args: &[TypeId],
        contextual: Option<TypeId>,
    ) -> Vec<TypeId> {
        let Some(data) = self.session.try_signature(signature) else {
            return Vec::new();
        };
        let len = self.types().len();
        if data.type_parameters.is_empty() || args.iter().chain(contextual.iter()).any(|t| t.index() >= len) {
            return Vec::new();
        }
        self.discarding(|c| {
            let mut context = InferenceContext::new(&data.type_parameters, Some(signature), InferenceFlags::NONE);
            if let Some(contextual) = contextual {
                c.infer_from_return_context(&mut context, signature, contextual);
            }
            for (i, &arg) in args.iter().enumerate() {
                if let Some(parameter) = c.parameter_type_at(&data, i) {
                    c.infer_types(&mut context, arg, parameter, InferencePriority::NONE);
                }
            }
            c.inferred_types(&mut context)
        })
    }

    /// Lowest-priority candidates from the type a call's result flows into.
    pub(crate) fn infer_from_return_context(
        &mut self,
        context: &mut InferenceContext,
        signature: SignatureId,
        contextual: TypeId,
    ) {
        let return_type = self.return_type_of_signature(signature);
        self.infer_types(context, contextual, return_type, InferencePriority::RETURN_TYPE);
        let literals = self
            .constituents_of(contextual)
            .into_iter()
            .any(|t| self.types().is(t, TypeFlags::LITERAL | TypeFlags::ENUM_LITERAL));
        context.literal_return_context = literals;
    }

    /// `source` with its type parameters inferred from the parameters and
    /// return type of `target`.
    pub(crate) fn instantiate_signature_in_context_of(&mut self, source: SignatureId, target: SignatureId) -> SignatureId {
        let source_signature = self.session.signature(source);
        let target_signature = self.session.signature(target);
        let mut context = InferenceContext::new(&source_signature.type_parameters, Some(source), InferenceFlags::NO_DEFAULT);
        let count = source_signature.parameter_count().max(target_signature.parameter_count());
        for i in 0..count {
            if let (Some(source_type), Some(target_type)) = (
                self.parameter_type_at(&source_signature, i),
                self.parameter_type_at(&target_signature, i),
            ) {
                self.infer_types(&mut context, target_type, source_type, InferencePriority::NONE);
            }
        }
        if target_signature.return_type.is_some() {
            let target_return = self.return_type_of_signature(target);
            let source_return = self.return_type_of_signature(source);
            self.infer_types(&mut context, target_return, source_return, InferencePriority::RETURN_TYPE);
        }
        let inferred = self.inferred_types(&mut context);
        let mapper = TypeMapper::new(source_signature.type_parameters.clone(), inferred);
        self.instantiate_signature(source, Arc::new(mapper))
    }

    // ========================================================================
    // Candidate collection
    // ========================================================================

    pub(crate) fn infer_types(
        &mut self,
        context: &mut InferenceContext,
        source: TypeId,
        target: TypeId,
        priority: InferencePriority,
    ) {
        let mut walk = InferenceWalk {
            priority,
            ..InferenceWalk::default()
        };
        self.infer_from_types(context, &mut walk, source, target);
    }

    fn infer_from_types(&mut self, context: &mut InferenceContext, walk: &mut InferenceWalk, source: TypeId, target: TypeId) {
        if !self.is_generic(target) {
            return;
        }
        let target_data = self.types().get(target);
        let source_data = self.types().get(source);

        if target_data.is(TypeFlags::TYPE_PARAMETER) {
            self.add_candidate(context, walk, source, target);
            return;
        }
        if source_data.is(TypeFlags::ANY) {
            self.infer_any_into(context, walk, source, target);
            return;
        }
        if target_data.is(TypeFlags::UNION) {
            self.infer_to_union(context, walk, source, target);
            return;
        }
        if target_data.is(TypeFlags::INTERSECTION) {
            for part in target_data.constituents().to_vec() {
                self.infer_from_types(context, walk, source, part);
            }
            return;
        }
        if source_data.is(TypeFlags::UNION) {
            for part in source_data.constituents().to_vec() {
                self.infer_from_types(context, walk, part, target);
            }
            return;
        }

        match (&source_data.key, &target_data.key) {
            (TypeKey::Index(source_object), TypeKey::Index(target_object)) => {
                let (source_object, target_object) = (*source_object, *target_object);
                self.infer_contravariant(context, walk, source_object, target_object);
            }
            (
                TypeKey::IndexedAccess {
                    object: source_object,
                    index: source_index,
                },
                TypeKey::IndexedAccess { object, index },
            ) => {
                let (source_object, source_index, object, index) = (*source_object, *source_index, *object, *index);
                self.infer_from_types(context, walk, source_object, object);
                self.infer_from_types(context, walk, source_index, index);
            }
            (_, TypeKey::Conditional { decl, args }) => {
                let (when_true, when_false) = self.conditional_branches(*decl, args);
                self.infer_from_types(context, walk, source, when_true);
                self.infer_from_types(context, walk, source, when_false);
            }
            (_, TypeKey::Substitution { base, .. }) => {
                let base = *base;
                self.infer_from_types(context, walk, source, base);
            }
            (_, TypeKey::Object(_)) => {
                let source = if source_data.is(TypeFlags::PRIMITIVE) {
                    self.apparent_type(source)
                } else {
                    source
                };
                if self.types().is(source, TypeFlags::OBJECT | TypeFlags::INTERSECTION) {
                    self.infer_from_objects(context, walk, source, target);
                }
            }
            _ => {}
        }
    }

    fn add_candidate(&mut self, context: &mut InferenceContext, walk: &InferenceWalk, source: TypeId, target: TypeId) {
        let Some(index) = context.index_of(target) else {
            return;
        };
        if source == TypeId::MARKER_SUPER || source == TypeId::MARKER_SUB {
            return;
        }
        let info = &mut context.inferences[index];
        if info.is_fixed {
            return;
        }
        let priority = walk.priority;
        if info.priority.map_or(true, |current| priority < current) {
            info.candidates.clear();
            info.contra_candidates.clear();
            info.top_level = true;
            info.priority = Some(priority);
        }
        if info.priority != Some(priority) {
            return;
        }
        let list = if walk.contravariant {
            &mut info.contra_candidates
        } else {
            &mut info.candidates
        };
        if !list.contains(&source) {
            list.push(source);
            info.inferred = None;
        }
        if walk.nested {
            info.top_level = false;
        }
        trace!(?source, parameter = ?target, ?priority, "inference candidate");
    }

    /// `any` flows into every parameter reachable through unions and
    /// type arguments.
    fn infer_any_into(&mut self, context: &mut InferenceContext, walk: &mut InferenceWalk, source: TypeId, target: TypeId) {
        let data = self.types().get(target);
        match &data.key {
            TypeKey::TypeParameter(_) => self.add_candidate(context, walk, source, target),
            TypeKey::Union(parts) | TypeKey::Intersection(parts) => {
                for part in parts.to_vec() {
                    self.infer_any_into(context, walk, source, part);
                }
            }
            TypeKey::Object(ObjectKey::Reference { args, .. }) => {
                for arg in args.to_vec() {
                    self.infer_any_into(context, walk, source, arg);
                }
            }
            TypeKey::Object(ObjectKey::Tuple { elements, .. }) => {
                for element in elements.to_vec() {
                    self.infer_any_into(context, walk, source, element);
                }
            }
            _ => {}
        }
    }

    fn infer_contravariant(&mut self, context: &mut InferenceContext, walk: &mut InferenceWalk, source: TypeId, target: TypeId) {
        walk.contravariant = !walk.contravariant;
        self.infer_from_types(context, walk, source, target);
        walk.contravariant = !walk.contravariant;
    }

    fn infer_nested(&mut self, context: &mut InferenceContext, walk: &mut InferenceWalk, source: TypeId, target: TypeId) {
        let nested = std::mem::replace(&mut walk.nested, true);
        self.infer_from_types(context, walk, source, target);
        walk.nested = nested;
    }

    fn infer_to_union(&mut self, context: &mut InferenceContext, walk: &mut InferenceWalk, source: TypeId, target: TypeId) {
        let mut sources = self.constituents_of(source);
        let mut targets = self.types().get(target).constituents().to_vec();
        // Identical constituents match each other and drop out.
        sources.retain(|s| {
            if let Some(i) = targets.iter().position(|t| t == s) {
                targets.remove(i);
                false
            } else {
                true
            }
        });
        if sources.is_empty() {
            return;
        }
        let (naked, structured): (Vec<TypeId>, Vec<TypeId>) =
            targets.into_iter().partition(|&t| context.index_of(t).is_some());
        for &part in &structured {
            for &s in &sources {
                self.infer_nested(context, walk, s, part);
            }
        }
        if let [parameter] = naked[..] {
            let remaining: Vec<TypeId> = sources
                .into_iter()
                .filter(|&s| !structured.iter().any(|&t| self.is_type_assignable_to(s, t)))
                .collect();
            if remaining.is_empty() {
                return;
            }
            let rest = self.types().union(&remaining);
            let priority = if structured.is_empty() {
                walk.priority
            } else {
                walk.priority | InferencePriority::NAKED_TYPE_VARIABLE
            };
            let outer = std::mem::replace(&mut walk.priority, priority);
            self.add_candidate(context, walk, rest, parameter);
            walk.priority = outer;
        }
    }

    fn infer_from_objects(&mut self, context: &mut InferenceContext, walk: &mut InferenceWalk, source: TypeId, target: TypeId) {
        let key = (source, target, walk.contravariant);
        if walk.depth >= MAX_INFERENCE_DEPTH || !walk.visited.insert(key) {
            return;
        }
        walk.depth += 1;
        let nested = std::mem::replace(&mut walk.nested, true);
        self.infer_from_object_members(context, walk, source, target);
        walk.nested = nested;
        walk.depth -= 1;
    }

    fn infer_from_object_members(
        &mut self,
        context: &mut InferenceContext,
        walk: &mut InferenceWalk,
        source: TypeId,
        target: TypeId,
    ) {
        let source_data = self.types().get(source);
        let target_data = self.types().get(target);

        if let (Some(ObjectKey::Reference { target: s, args: source_args }), Some(ObjectKey::Reference { target: t, args })) =
            (source_data.object_key(), target_data.object_key())
        {
            if s == t && source_args.len() == args.len() {
                let variances = self.variances_of(*t);
                for (i, (&source_arg, &target_arg)) in source_args.iter().zip(args.iter()).enumerate() {
                    match variances.get(i) {
                        Some(Variance::Contravariant) => self.infer_contravariant(context, walk, source_arg, target_arg),
                        _ => self.infer_from_types(context, walk, source_arg, target_arg),
                    }
                }
                return;
            }
        }

        if let Some(ObjectKey::Tuple { elements, flags, .. }) = target_data.object_key() {
            match source_data.object_key() {
                Some(ObjectKey::Tuple {
                    elements: source_elements,
                    flags: source_flags,
                    ..
                }) => {
                    for (i, &element) in source_elements.iter().enumerate() {
                        let source_rest = source_flags[i].contains(ElementFlags::REST);
                        let target_element = if source_rest || i >= elements.len() {
                            flags
                                .last()
                                .filter(|f| f.contains(ElementFlags::REST))
                                .and(elements.last().copied())
                        } else {
                            Some(elements[i])
                        };
                        if let Some(target_element) = target_element {
                            self.infer_from_types(context, walk, element, target_element);
                        }
                    }
                }
                _ => {
                    if let Some(element) = self.types().array_element(source) {
                        for &target_element in elements.iter() {
                            self.infer_from_types(context, walk, element, target_element);
                        }
                    }
                }
            }
            return;
        }

        if let Some(ObjectKey::Mapped { decl, args }) = target_data.object_key() {
            if self.infer_to_mapped_type(context, walk, source, *decl, args) {
                return;
            }
        }

        if let (Some(ObjectKey::Tuple { elements, .. }), Some(target_element)) =
            (source_data.object_key(), self.array_like_element_of(target))
        {
            for &element in elements.iter() {
                self.infer_from_types(context, walk, element, target_element);
            }
            return;
        }

        let target_members = self.resolve_members(target);
        for (&name, target_property) in target_members.properties.iter() {
            let Some(source_property) = self.property_of_type(source, name) else {
                continue;
            };
            let source_type = self.type_of_property(&source_property);
            let target_type = self.type_of_property(target_property);
            self.infer_from_types(context, walk, source_type, target_type);
        }
        for kind in [SignatureKind::Call, SignatureKind::Construct] {
            let source_signatures = self.signatures_of_type(source, kind);
            let target_signatures = target_members.signatures(kind).to_vec();
            // Pair the last signatures of each side.
            let count = source_signatures.len().min(target_signatures.len());
            for i in 0..count {
                let s = source_signatures[source_signatures.len() - count + i];
                let t = target_signatures[target_signatures.len() - count + i];
                self.infer_from_signatures(context, walk, s, t);
            }
        }
        if !target_members.index_infos.is_empty() {
            let apparent = self.apparent_type(source);
            let source_members = self.resolve_members(apparent);
            for target_info in target_members.index_infos.iter() {
                if let Some(source_info) = source_members.index_info(target_info.key_type) {
                    self.infer_from_types(context, walk, source_info.value_type, target_info.value_type);
                    continue;
                }
                let property_types: Vec<TypeId> = source_members
                    .properties
                    .values()
                    .map(|p| self.type_of_property(p))
                    .collect();
                if !property_types.is_empty() {
                    let union = self.types().union(&property_types);
                    self.infer_from_types(context, walk, union, target_info.value_type);
                }
            }
        }
    }

    fn array_like_element_of(&self, ty: TypeId) -> Option<TypeId> {
        match self.types().get(ty).object_key()? {
            ObjectKey::Reference { target, args }
                if Some(*target) == self.types().array_target()
                    || Some(*target) == self.types().readonly_array_target() =>
            {
                args.first().copied()
            }
            _ => None,
        }
    }

    /// `{ [K in keyof T]: X }` infers the source itself for `T`; a mapped
    /// type over a naked `K` infers the source's keys for `K`. Property types
    /// flow into the template either way.
    fn infer_to_mapped_type(
        &mut self,
        context: &mut InferenceContext,
        walk: &mut InferenceWalk,
        source: TypeId,
        decl: tyck_binder::Declaration,
        args: &[TypeId],
    ) -> bool {
        let Some((_, constraint, template)) = self.mapped_parts(decl, args) else {
            return false;
        };
        let source_members = self.resolve_members(source);
        let property_types: Vec<TypeId> = source_members
            .properties
            .values()
            .map(|p| self.type_of_property(p))
            .collect();
        let infer_template = |c: &mut Self, context: &mut InferenceContext, walk: &mut InferenceWalk| {
            if !property_types.is_empty() {
                let union = c.types().union(&property_types);
                c.infer_from_types(context, walk, union, template);
            }
        };
        match &self.types().get(constraint).key {
            TypeKey::Index(object) if context.index_of(*object).is_some() => {
                let object = *object;
                let homomorphic = walk.priority | InferencePriority::HOMOMORPHIC_MAPPED_TYPE;
                let outer = std::mem::replace(&mut walk.priority, homomorphic);
                self.add_candidate(context, walk, source, object);
                walk.priority = outer;
                true
            }
            TypeKey::TypeParameter(_) if context.index_of(constraint).is_some() => {
                let keys = self.index_type(source);
                self.add_candidate(context, walk, keys, constraint);
                infer_template(self, context, walk);
                true
            }
            _ => false,
        }
    }

    fn infer_from_signatures(&mut self, context: &mut InferenceContext, walk: &mut InferenceWalk, source: SignatureId, target: SignatureId) {
        let source_signature = self.session.signature(source);
        let target_signature = self.session.signature(target);
        let count = source_signature.parameter_count().max(target_signature.parameter_count());
        for i in 0..count {
            if let (Some(source_type), Some(target_type)) = (
                self.parameter_type_at(&source_signature, i),
                self.parameter_type_at(&target_signature, i),
            ) {
                self.infer_contravariant(context, walk, source_type, target_type);
            }
        }
        if let (Some(source_this), Some(target_this)) = (source_signature.this_type, target_signature.this_type) {
            self.infer_contravariant(context, walk, source_this, target_this);
        }
        let target_return = self.return_type_of_signature(target);
        if self.is_generic(target_return) {
            let source_return = self.return_type_of_signature(source);
            self.infer_from_types(context, walk, source_return, target_return);
        }
    }

    // ========================================================================
    // Results
    // ========================================================================

    /// The inferred type of every parameter, in order.
    pub(crate) fn inferred_types(&mut self, context: &mut InferenceContext) -> Vec<TypeId> {
        (0..context.inferences.len())
            .map(|i| self.inferred_type(context, i))
            .collect()
    }

    /// Current inferences, with parameters that have none mapped to
    /// `unknown`. Nothing is fixed.
    pub(crate) fn inference_mapper(&mut self, context: &mut InferenceContext) -> Arc<TypeMapper> {
        let targets: Vec<TypeId> = (0..context.inferences.len())
            .map(|i| {
                if context.inferences[i].has_candidates() {
                    self.inferred_type(context, i)
                } else {
                    TypeId::UNKNOWN
                }
            })
            .collect();
        Arc::new(TypeMapper::new(context.type_parameters.clone(), targets))
    }

    fn inferred_type(&mut self, context: &mut InferenceContext, index: usize) -> TypeId {
        if let Some(done) = context.inferences[index].inferred {
            return done;
        }
        let parameter = context.inferences[index].type_parameter;
        let info = context.inferences[index].clone();
        let raw = if !info.candidates.is_empty() {
            self.covariant_inference(context, &info)
        } else if !info.contra_candidates.is_empty() {
            self.intersection_or_error(&info.contra_candidates)
        } else if context.flags.contains(InferenceFlags::NO_DEFAULT) {
            TypeId::UNKNOWN
        } else {
            // Placeholder while the default or constraint refers to other
            // parameters.
            context.inferences[index].inferred = Some(TypeId::UNKNOWN);
            let fallback = self
                .default_of_type_parameter(parameter)
                .or_else(|| self.constraint_of_type_parameter(parameter));
            match fallback {
                Some(fallback) => {
                    let mapper = self.current_mapper(context);
                    self.instantiate(fallback, &mapper)
                }
                None => TypeId::UNKNOWN,
            }
        };
        context.inferences[index].inferred = Some(raw);

        let mut inferred = raw;
        if let Some(constraint) = self.constraint_of_type_parameter(parameter) {
            let mapper = self.current_mapper(context);
            let constraint = self.instantiate(constraint, &mapper);
            if !self.is_type_assignable_to(raw, constraint) {
                context.violations.push(ConstraintViolation {
                    index,
                    inferred: raw,
                    constraint,
                });
                inferred = constraint;
            }
        }
        trace!(?parameter, ?inferred, "inferred type argument");
        context.inferences[index].inferred = Some(inferred);
        inferred
    }

    /// Parameters mapped to their inferences so far, computing any that are
    /// still missing.
    fn current_mapper(&mut self, context: &mut InferenceContext) -> TypeMapper {
        let targets: Vec<TypeId> = (0..context.inferences.len())
            .map(|i| match context.inferences[i].inferred {
                Some(done) => done,
                None => self.inferred_type(context, i),
            })
            .collect();
        TypeMapper::new(context.type_parameters.clone(), targets)
    }

    fn covariant_inference(&mut self, context: &InferenceContext, info: &InferenceInfo) -> TypeId {
        let keep_literals = context.flags.contains(InferenceFlags::NO_WIDENING)
            || self.is_const_type_parameter(info.type_parameter)
            || self.has_primitive_constraint(info.type_parameter)
            || (info.top_level && context.literal_return_context);
        let candidates: Vec<TypeId> = if keep_literals {
            info.candidates.clone()
        } else {
            info.candidates
                .iter()
                .map(|&c| {
                    let widened = self.widen_literal_type(c);
                    self.widen_object_literal(widened)
                })
                .collect()
        };
        self.types().union(&candidates)
    }

    fn is_const_type_parameter(&self, parameter: TypeId) -> bool {
        self.type_parameter_declaration(parameter).is_some_and(|declaration| {
            self.tree(declaration.file)
                .node(declaration.node)
                .modifiers
                .contains(ModifierFlags::CONST)
        })
    }

    fn has_primitive_constraint(&mut self, parameter: TypeId) -> bool {
        let Some(constraint) = self.constraint_of_type_parameter(parameter) else {
            return false;
        };
        let constraint = self.base_constraint(constraint);
        self.constituents_of(constraint)
            .into_iter()
            .any(|t| self.types().is(t, TypeFlags::PRIMITIVE | TypeFlags::INDEX) && !self.types().is(t, TypeFlags::NULLABLE))
    }
}

#[cfg(test)]
mod tests {
    use tyck_options::CheckerOptions;

    use super::{InferenceContext, InferenceFlags};
    use crate::session::Session;
    use crate::types::{InferencePriority, TypeId};

    /// Helper: a session over `source` and the type at the first `needle`.
    fn type_at(session: &Session, needle: &str) -> TypeId {
        let file = session.file_id("a.ts").unwrap();
        let mut checker = session.checker();
        let tree = checker.tree(file);
        let offset = tree.text().find(needle).unwrap() as u32;
        let node = tree.node_at_offset(offset).unwrap();
        checker.get_type_at_location(file, node)
    }

    #[test]
    fn test_priority_replaces_weaker_candidates() {
        let session = Session::from_sources(&[("a.ts", "function f<T>(x: T) {}")], CheckerOptions::strict());
        let t = type_at(&session, "T>");
        let mut checker = session.checker();
        let mut context = InferenceContext::new(&[t], None, InferenceFlags::NONE);
        checker.infer_types(&mut context, TypeId::STRING, t, InferencePriority::RETURN_TYPE);
        checker.infer_types(&mut context, TypeId::NUMBER, t, InferencePriority::NONE);
        assert_eq!(context.inferences[0].candidates, vec![TypeId::NUMBER]);
        checker.infer_types(&mut context, TypeId::BOOLEAN, t, InferencePriority::NONE);
        assert_eq!(checker.inferred_types(&mut context), vec![session.types().union(&[TypeId::NUMBER, TypeId::BOOLEAN])]);
    }

    #[test]
    fn test_literal_candidates_widen() {
        let session = Session::from_sources(&[("a.ts", "function f<T>(x: T) {}")], CheckerOptions::strict());
        let t = type_at(&session, "T>");
        let mut checker = session.checker();
        let mut context = InferenceContext::new(&[t], None, InferenceFlags::NONE);
        let five = session.types().literal_number(5.0);
        checker.infer_types(&mut context, five, t, InferencePriority::NONE);
        assert_eq!(checker.inferred_types(&mut context), vec![TypeId::NUMBER]);

        let mut context = InferenceContext::new(&[t], None, InferenceFlags::NO_WIDENING);
        checker.infer_types(&mut context, five, t, InferencePriority::NONE);
        assert_eq!(checker.inferred_types(&mut context), vec![five]);
    }

    #[test]
    fn test_infers_through_arrays_and_functions() {
        let source = "function f<T, U>(xs: T[], g: (x: T) => U) {}";
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let t = type_at(&session, "T,");
        let u = type_at(&session, "U>");
        let mut checker = session.checker();
        let mut context = InferenceContext::new(&[t, u], None, InferenceFlags::NONE);
        let array_t = session.types().array(t);
        let array_string = session.types().array(TypeId::STRING);
        checker.infer_types(&mut context, array_string, array_t, InferencePriority::NONE);
        assert_eq!(checker.inferred_types(&mut context)[0], TypeId::STRING);
        // Nothing for `U`: it falls back to `unknown`.
        assert_eq!(checker.inferred_types(&mut context)[1], TypeId::UNKNOWN);
    }

    #[test]
    fn test_constraint_violation_falls_back_to_constraint() {
        let source = "function f<T extends string>(x: T) {}";
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let t = type_at(&session, "T extends");
        let mut checker = session.checker();
        let mut context = InferenceContext::new(&[t], None, InferenceFlags::NONE);
        checker.infer_types(&mut context, TypeId::NUMBER, t, InferencePriority::NONE);
        assert_eq!(checker.inferred_types(&mut context), vec![TypeId::STRING]);
        assert_eq!(context.violations.len(), 1);
        assert_eq!(context.violations[0].inferred, TypeId::NUMBER);
    }
}
