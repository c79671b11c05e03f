//! Identity, subtype, assignability and comparability.
//!
//! `is_related_to` is the recursive core. It answers with a [`Ternary`]:
//! re-entering a comparison that is already on the stack yields `Maybe`,
//! and the keys assumed that way are only cached once the outermost
//! comparison that depended on them succeeds.
//!
//! A failing comparison can be re-run in reporting mode. It then records
//! one line per level on the way out, following the first failing member
//! only, and the caller turns those lines into a diagnostic chain.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::trace;
use tyck_ast::types::{FileId, NodeId, SymbolFlags};
use tyck_ast::SyntaxKind;
use tyck_binder::names::property_name;
use tyck_binder::skip_parentheses;
use tyck_binder::Declaration;
use tyck_core::intern::InternedString;
use tyck_diagnostics::{messages, ChainEntry, Diagnostic, DiagnosticMessage};

use crate::checker::Checker;
use crate::members::is_numeric_name;
use crate::types::{
    DeclRef, ElementFlags, IndexInfo, ObjectKey, PropertyFlags, RelationKind, Signature, SignatureFlags, SignatureId,
    SignatureKind, Ternary, TypeFlags, TypeId, TypeKey, TypeMapper, Variance,
};

type RelationKey = (TypeId, TypeId, RelationKind);

/// Nesting of the same generic declaration past which a comparison is
/// assumed to hold.
const MAX_EXPANDING_DEPTH: usize = 3;

/// One line of an elaboration, recorded innermost first.
#[derive(Debug, Clone)]
struct Elaboration {
    message: &'static DiagnosticMessage,
    args: Vec<String>,
    /// The plain "not assignable" line rather than a specific reason.
    generic: bool,
}

/// State of one top-level comparison.
#[derive(Debug)]
pub(crate) struct RelationState {
    kind: RelationKind,
    maybe_keys: Vec<RelationKey>,
    maybe_set: FxHashSet<RelationKey>,
    source_stack: Vec<TypeId>,
    target_stack: Vec<TypeId>,
    depth: u32,
    overflowed: bool,
    elaboration: Vec<Elaboration>,
    /// Set by a line that stands on its own; the enclosing level then adds
    /// no generic line.
    suppress_generic: bool,
    excess_property: Option<InternedString>,
}

impl Default for RelationState {
    fn default() -> Self {
        Self::new(RelationKind::Assignable)
    }
}

impl RelationState {
    fn new(kind: RelationKind) -> Self {
        Self {
            kind,
            maybe_keys: Vec::new(),
            maybe_set: FxHashSet::default(),
            source_stack: Vec::new(),
            target_stack: Vec::new(),
            depth: 0,
            overflowed: false,
            elaboration: Vec::new(),
            suppress_generic: false,
            excess_property: None,
        }
    }
}

/// What makes two object types instantiations of the same declaration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum RecursionIdentity {
    Target(TypeId),
    Decl(DeclRef),
    Mapped(Declaration),
}

impl<'s> Checker<'s> {
    // ========================================================================
    // Entry points
    // ========================================================================

    /// Whether `source` relates to `target` under `kind`. Ids the session
    /// does not know relate to nothing.
    pub fn relate(&mut self, source: TypeId, target: TypeId, kind: RelationKind) -> bool {
        let len = self.types().len();
        if source.index() >= len || target.index() >= len {
            return false;
        }
        self.discarding(|c| c.is_type_related_to(source, target, kind))
    }

    pub(crate) fn is_type_related_to(&mut self, source: TypeId, target: TypeId, kind: RelationKind) -> bool {
        if source == target {
            return true;
        }
        let outer = std::mem::replace(&mut self.relation, RelationState::new(kind));
        let result = self.is_related_to(source, target, false);
        self.relation = outer;
        result.is_true()
    }

    pub(crate) fn is_type_assignable_to(&mut self, source: TypeId, target: TypeId) -> bool {
        self.is_type_related_to(source, target, RelationKind::Assignable)
    }

    pub(crate) fn is_type_comparable_to(&mut self, source: TypeId, target: TypeId) -> bool {
        self.is_type_related_to(source, target, RelationKind::Comparable)
    }

    pub(crate) fn is_type_subtype_of(&mut self, source: TypeId, target: TypeId) -> bool {
        self.is_type_related_to(source, target, RelationKind::Subtype)
    }

    pub(crate) fn is_type_identical_to(&mut self, source: TypeId, target: TypeId) -> bool {
        self.is_type_related_to(source, target, RelationKind::Identity)
    }

    /// Relate and, on failure, report at `node`. `head` replaces the plain
    /// "not assignable" message; `expression` is the source expression, used
    /// to anchor excess property errors.
    pub(crate) fn check_type_related_to(
        &mut self,
        source: TypeId,
        target: TypeId,
        kind: RelationKind,
        site: (FileId, NodeId),
        head: Option<&'static DiagnosticMessage>,
        expression: Option<NodeId>,
    ) -> bool {
        if self.is_type_related_to(source, target, kind) {
            return true;
        }
        if !self.is_reporting() {
            return false;
        }
        let outer = std::mem::replace(&mut self.relation, RelationState::new(kind));
        self.is_related_to(source, target, true);
        let state = std::mem::replace(&mut self.relation, outer);
        let diagnostic = self.relation_diagnostic(source, target, kind, site, head, expression, state);
        self.push_diagnostic(diagnostic);
        false
    }

    pub(crate) fn check_type_assignable_to(
        &mut self,
        source: TypeId,
        target: TypeId,
        site: (FileId, NodeId),
        head: Option<&'static DiagnosticMessage>,
        expression: Option<NodeId>,
    ) -> bool {
        self.check_type_related_to(source, target, RelationKind::Assignable, site, head, expression)
    }

    #[allow(clippy::too_many_arguments)]
    fn relation_diagnostic(
        &mut self,
        source: TypeId,
        target: TypeId,
        kind: RelationKind,
        (file, node): (FileId, NodeId),
        head: Option<&'static DiagnosticMessage>,
        expression: Option<NodeId>,
        state: RelationState,
    ) -> Diagnostic {
        let mut lines = state.elaboration;
        lines.reverse();
        let mut anchor = node;
        if let (Some(name), Some(expression)) = (state.excess_property, expression) {
            if let Some(property) = self.object_literal_property_name_node(file, expression, name) {
                anchor = property;
            }
        }
        let first = lines.first().map(|line| (line.message.code, line.generic));
        let excess = messages::OBJECT_LITERAL_MAY_ONLY_SPECIFY_KNOWN_PROPERTIES_AND_0_DOES_NOT_EXIST_IN_TYPE_1.code;
        let (message, args) = match (head, first) {
            (_, Some((code, _))) if code == excess => {
                let first = lines.remove(0);
                (first.message, first.args)
            }
            (None, Some(_)) => {
                let first = lines.remove(0);
                (first.message, first.args)
            }
            (None, None) => (
                Self::generic_message(kind),
                vec![self.type_to_string(source), self.type_to_string(target)],
            ),
            (Some(head), first) => {
                if first.is_some_and(|(_, generic)| generic) {
                    lines.remove(0);
                }
                (head, vec![self.type_to_string(source), self.type_to_string(target)])
            }
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let chain = lines
            .iter()
            .map(|line| {
                let args: Vec<&str> = line.args.iter().map(String::as_str).collect();
                ChainEntry::new(line.message, &args)
            })
            .collect();
        self.diagnostic(file, anchor, message, &args).with_chain(chain)
    }

    fn generic_message(kind: RelationKind) -> &'static DiagnosticMessage {
        match kind {
            RelationKind::Comparable => &messages::TYPE_0_IS_NOT_COMPARABLE_TO_TYPE_1,
            _ => &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1,
        }
    }

    /// The name node of the property called `name` in an object literal.
    fn object_literal_property_name_node(&self, file: FileId, expression: NodeId, name: InternedString) -> Option<NodeId> {
        let tree = self.tree(file);
        let expression = skip_parentheses(tree, expression);
        if tree.kind(expression) != SyntaxKind::ObjectLiteralExpression {
            return None;
        }
        tree.list(expression).iter().find_map(|&element| {
            let name_node = tree.declaration_name(element)?;
            (property_name(tree, name_node, &self.session.interner) == Some(name)).then_some(name_node)
        })
    }

    // ========================================================================
    // Elaboration
    // ========================================================================

    fn elaborate(&mut self, message: &'static DiagnosticMessage, args: Vec<String>) {
        self.relation.elaboration.push(Elaboration {
            message,
            args,
            generic: false,
        });
    }

    /// A line that stands on its own in place of the enclosing generic line.
    fn elaborate_alone(&mut self, message: &'static DiagnosticMessage, args: Vec<String>) {
        self.elaborate(message, args);
        self.relation.suppress_generic = true;
    }

    fn report_generic(&mut self, source: TypeId, target: TypeId) {
        if std::mem::take(&mut self.relation.suppress_generic) {
            return;
        }
        let message = Self::generic_message(self.relation.kind);
        let args = vec![self.type_to_string(source), self.type_to_string(target)];
        self.relation.elaboration.push(Elaboration {
            message,
            args,
            generic: true,
        });
    }

    // ========================================================================
    // Core
    // ========================================================================

    fn is_related_to(&mut self, source: TypeId, target: TypeId, report: bool) -> Ternary {
        if source == target {
            return Ternary::True;
        }
        if self.relation.kind == RelationKind::Identity {
            let result = self.is_identical_to(source, target, report);
            if !result.is_true() && report {
                self.report_generic(source, target);
            }
            return result;
        }
        let mut source = source;
        let source_flags = self.types().flags(source);
        let target_flags = self.types().flags(target);
        if self.is_simple_related(source, target, source_flags, target_flags) {
            return Ternary::True;
        }
        if self.types().is_fresh_literal(source) {
            if target_flags.intersects(TypeFlags::STRUCTURED) && self.has_excess_properties(source, target, report) {
                return Ternary::False;
            }
            source = self.types().regular_type_of(source);
            if source == target {
                return Ternary::True;
            }
        }
        if self.relation.kind != RelationKind::Comparable
            && source_flags.intersects(TypeFlags::PRIMITIVE | TypeFlags::OBJECT | TypeFlags::INTERSECTION)
            && !source_flags.intersects(TypeFlags::NULLABLE | TypeFlags::VOID)
            && target_flags.intersects(TypeFlags::OBJECT | TypeFlags::INTERSECTION)
            && self.is_weak_type(target)
            && self.has_properties_or_signatures(source)
            && !self.has_common_properties(source, target)
        {
            if report {
                let args = vec![self.type_to_string(source), self.type_to_string(target)];
                self.elaborate_alone(&messages::TYPE_0_HAS_NO_PROPERTIES_IN_COMMON_WITH_TYPE_1, args);
            }
            return Ternary::False;
        }
        let result = self.union_or_structured_related(source, target, report);
        if !result.is_true() && report {
            self.report_generic(source, target);
        }
        result
    }

    fn is_simple_related(&mut self, source: TypeId, target: TypeId, s: TypeFlags, t: TypeFlags) -> bool {
        let kind = self.relation.kind;
        let assignable = matches!(kind, RelationKind::Assignable | RelationKind::Comparable);
        if t.intersects(TypeFlags::ANY | TypeFlags::UNKNOWN) || s.contains(TypeFlags::NEVER) {
            return true;
        }
        if s.contains(TypeFlags::ERROR) {
            return true;
        }
        if s.contains(TypeFlags::ANY) {
            return match kind {
                RelationKind::Comparable => true,
                RelationKind::Assignable => !t.contains(TypeFlags::NEVER),
                _ => false,
            };
        }
        if t.contains(TypeFlags::NEVER) {
            return false;
        }
        if source == TypeId::MARKER_SUB && target == TypeId::MARKER_SUPER {
            return true;
        }
        if s.intersects(TypeFlags::STRING_LITERAL) && t.contains(TypeFlags::STRING) {
            return true;
        }
        if s.intersects(TypeFlags::NUMBER_LIKE) && t == TypeFlags::NUMBER {
            return true;
        }
        if s.intersects(TypeFlags::BIGINT_LITERAL) && t.contains(TypeFlags::BIGINT) {
            return true;
        }
        if s.intersects(TypeFlags::BOOLEAN_LITERAL) && t.contains(TypeFlags::BOOLEAN) {
            return true;
        }
        if s.contains(TypeFlags::ENUM_LITERAL) && t.contains(TypeFlags::NUMBER_LITERAL) && !t.contains(TypeFlags::ENUM_LITERAL) {
            if let TypeKey::EnumLiteral { literal, .. } = &self.types().get(source).key {
                if *literal == target {
                    return true;
                }
            }
        }
        if assignable
            && s.intersects(TypeFlags::NUMBER | TypeFlags::NUMBER_LITERAL)
            && !s.contains(TypeFlags::ENUM_LITERAL)
            && t.contains(TypeFlags::ENUM_LITERAL | TypeFlags::NUMBER_LITERAL)
        {
            return true;
        }
        if s.contains(TypeFlags::UNDEFINED) && t.contains(TypeFlags::VOID) {
            return true;
        }
        if s.intersects(TypeFlags::NULLABLE) && !self.strict_null_checks() {
            return true;
        }
        if s.intersects(TypeFlags::OBJECT | TypeFlags::NON_PRIMITIVE) && t.contains(TypeFlags::NON_PRIMITIVE) {
            return true;
        }
        false
    }

    fn union_or_structured_related(&mut self, source: TypeId, target: TypeId, report: bool) -> Ternary {
        let source_flags = self.types().flags(source);
        let target_flags = self.types().flags(target);
        if source_flags.contains(TypeFlags::UNION) {
            let parts = self.types().get(source).display_constituents().to_vec();
            if self.relation.kind == RelationKind::Comparable {
                for &part in &parts {
                    let result = self.is_related_to(part, target, false);
                    if result.is_true() {
                        return result;
                    }
                }
                return Ternary::False;
            }
            let mut result = Ternary::True;
            for part in parts {
                let related = self.is_related_to(part, target, report);
                if !related.is_true() {
                    return Ternary::False;
                }
                result = result.and(related);
            }
            return result;
        }
        if target_flags.contains(TypeFlags::UNION) {
            return self.type_related_to_some(source, target, report);
        }
        if target_flags.contains(TypeFlags::INTERSECTION) {
            let parts = self.types().get(target).constituents().to_vec();
            let mut result = Ternary::True;
            for part in parts {
                let related = self.is_related_to(source, part, report);
                if !related.is_true() {
                    return Ternary::False;
                }
                result = result.and(related);
            }
            return result;
        }
        if source_flags.contains(TypeFlags::INTERSECTION) {
            let parts = self.types().get(source).constituents().to_vec();
            for part in parts {
                let related = self.is_related_to(part, target, false);
                if related.is_true() {
                    return related;
                }
            }
            if !target_flags.intersects(TypeFlags::OBJECT) {
                return Ternary::False;
            }
        }
        self.recursive_related(source, target, report)
    }

    /// Source against a union target: some constituent must accept it.
    fn type_related_to_some(&mut self, source: TypeId, target: TypeId, report: bool) -> Ternary {
        let parts = self.types().get(target).display_constituents().to_vec();
        if parts.contains(&source) {
            return Ternary::True;
        }
        let parts: Vec<TypeId> = if self.types().is(source, TypeFlags::NULLABLE) {
            parts
        } else {
            parts
                .into_iter()
                .filter(|&p| !self.types().is(p, TypeFlags::NULLABLE))
                .collect()
        };
        for &part in &parts {
            let related = self.is_related_to(source, part, false);
            if related.is_true() {
                return related;
            }
        }
        if report {
            let objects: Vec<TypeId> = parts
                .iter()
                .copied()
                .filter(|&p| self.types().is(p, TypeFlags::OBJECT | TypeFlags::INTERSECTION))
                .collect();
            if let [single] = objects[..] {
                if self.types().is(source, TypeFlags::OBJECT | TypeFlags::INTERSECTION) {
                    self.is_related_to(source, single, true);
                }
            }
        }
        Ternary::False
    }

    /// Structured comparison behind the recursion guard and the cache.
    fn recursive_related(&mut self, source: TypeId, target: TypeId, report: bool) -> Ternary {
        let key = (source, target, self.relation.kind);
        if let Some(cached) = self.session.caches.relations.get(&key).map(|r| *r) {
            if cached || !report {
                trace!(?source, ?target, cached, "relation cache hit");
                return Ternary::from_bool(cached);
            }
        }
        if self.relation.maybe_set.contains(&key) {
            trace!(?source, ?target, "relation assumed while in progress");
            return Ternary::Maybe;
        }
        if self.relation.depth >= self.options().max_relation_depth() {
            if !self.relation.overflowed {
                self.relation.overflowed = true;
                if let Some((file, node)) = self.current_site {
                    let args = [self.type_to_string(source), self.type_to_string(target)];
                    self.error(
                        file,
                        node,
                        &messages::EXCESSIVE_STACK_DEPTH_COMPARING_TYPES_0_AND_1,
                        &[&args[0], &args[1]],
                    );
                }
            }
            return Ternary::False;
        }
        let source_nested = self.is_deeply_nested(&self.relation.source_stack.clone(), source);
        let target_nested = self.is_deeply_nested(&self.relation.target_stack.clone(), target);
        if source_nested && target_nested {
            trace!(?source, ?target, "relation assumed for deeply nested instantiations");
            return Ternary::Maybe;
        }

        trace!(?source, ?target, kind = ?self.relation.kind, "relation cache miss");
        let maybe_start = self.relation.maybe_keys.len();
        self.relation.maybe_keys.push(key);
        self.relation.maybe_set.insert(key);
        self.relation.source_stack.push(source);
        self.relation.target_stack.push(target);
        self.relation.depth += 1;
        let result = self.structured_related(source, target, report);
        self.relation.depth -= 1;
        self.relation.source_stack.pop();
        self.relation.target_stack.pop();

        let cacheable = !self.is_speculating();
        match result {
            Ternary::True => self.settle_maybe_keys(maybe_start, cacheable),
            Ternary::Maybe if self.relation.depth == 0 => self.settle_maybe_keys(maybe_start, cacheable),
            Ternary::Maybe | Ternary::Unknown => {}
            Ternary::False => {
                for key in self.relation.maybe_keys.drain(maybe_start..) {
                    self.relation.maybe_set.remove(&key);
                }
                if cacheable {
                    self.session.caches.relations.entry(key).or_insert(false);
                }
            }
        }
        result
    }

    /// Cache every key assumed since `start` as related.
    fn settle_maybe_keys(&mut self, start: usize, cacheable: bool) {
        let settled: Vec<RelationKey> = self.relation.maybe_keys.drain(start..).collect();
        for key in settled {
            self.relation.maybe_set.remove(&key);
            if cacheable {
                self.session.caches.relations.entry(key).or_insert(true);
            }
        }
    }

    fn recursion_identity(&self, ty: TypeId) -> Option<RecursionIdentity> {
        match self.types().get(ty).object_key()? {
            ObjectKey::Reference { target, .. } => Some(RecursionIdentity::Target(*target)),
            ObjectKey::Anonymous { decl, args } if !args.is_empty() => Some(RecursionIdentity::Decl(*decl)),
            ObjectKey::Mapped { decl, .. } => Some(RecursionIdentity::Mapped(*decl)),
            _ => None,
        }
    }

    fn is_deeply_nested(&self, stack: &[TypeId], ty: TypeId) -> bool {
        let Some(identity) = self.recursion_identity(ty) else {
            return false;
        };
        stack
            .iter()
            .filter(|&&t| self.recursion_identity(t) == Some(identity))
            .count()
            >= MAX_EXPANDING_DEPTH
    }

    // ========================================================================
    // Structured types
    // ========================================================================

    fn structured_related(&mut self, source: TypeId, target: TypeId, report: bool) -> Ternary {
        if self.relation.kind == RelationKind::Identity {
            return self.structured_identical(source, target);
        }
        let source_data = self.types().get(source);
        let target_data = self.types().get(target);

        match &target_data.key {
            TypeKey::Index(object) => {
                let object = *object;
                if self.is_generic(object) {
                    let constraint = self.base_constraint(object);
                    if !self.types().is(constraint, TypeFlags::ANY_OR_UNKNOWN) {
                        let keys = self.index_type(constraint);
                        let related = self.is_related_to(source, keys, false);
                        if related.is_true() {
                            return related;
                        }
                    }
                }
            }
            TypeKey::Substitution { base, .. } => return self.is_related_to(source, *base, report),
            TypeKey::Conditional { decl, args } => {
                let (when_true, when_false) = self.conditional_branches(*decl, args);
                let first = self.is_related_to(source, when_true, false);
                if first.is_true() {
                    let second = self.is_related_to(source, when_false, false);
                    if second.is_true() {
                        return first.and(second);
                    }
                }
            }
            _ => {}
        }

        match &source_data.key {
            TypeKey::TypeParameter(_) | TypeKey::IndexedAccess { .. } => {
                let constraint = if source_data.is(TypeFlags::TYPE_PARAMETER) {
                    self.constraint_of_type_parameter(source)
                } else {
                    Some(self.base_constraint(source))
                };
                return match constraint {
                    Some(constraint) if constraint != source && constraint != TypeId::UNKNOWN => {
                        self.is_related_to(constraint, target, report)
                    }
                    _ => Ternary::False,
                };
            }
            TypeKey::Index(_) => {
                let keys = self.types().union(&[TypeId::STRING, TypeId::NUMBER, TypeId::SYMBOL]);
                return self.is_related_to(keys, target, report);
            }
            TypeKey::Conditional { decl, args } => {
                let (when_true, when_false) = self.conditional_branches(*decl, args);
                let first = self.is_related_to(when_true, target, report);
                if !first.is_true() {
                    return Ternary::False;
                }
                let second = self.is_related_to(when_false, target, report);
                return first.and(second);
            }
            TypeKey::Substitution { base, .. } => return self.is_related_to(*base, target, report),
            _ => {}
        }

        if !target_data.is(TypeFlags::OBJECT) {
            return Ternary::False;
        }
        let source = if source_data.is(
            TypeFlags::STRING_LIKE | TypeFlags::NUMBER_LIKE | TypeFlags::BIGINT_LIKE | TypeFlags::BOOLEAN_LIKE | TypeFlags::ES_SYMBOL,
        ) {
            self.apparent_type(source)
        } else if source_data.is(TypeFlags::NON_PRIMITIVE) {
            TypeId::EMPTY_OBJECT
        } else {
            source
        };
        if !self.types().is(source, TypeFlags::OBJECT | TypeFlags::INTERSECTION) {
            return Ternary::False;
        }

        if let (Some((source_target, source_args)), Some((target_target, target_args))) =
            (self.reference_parts(source), self.reference_parts(target))
        {
            if source_target == target_target {
                let variances = self.variances_of(target_target);
                if variances.len() == target_args.len() && source_args.len() == target_args.len() {
                    let mark = self.relation.elaboration.len();
                    let (result, reliable) = self.type_arguments_related(&source_args, &target_args, &variances, report);
                    if result.is_true() || reliable {
                        return result;
                    }
                    self.relation.elaboration.truncate(mark);
                    self.relation.suppress_generic = false;
                }
            }
        }

        if let Some(result) = self.array_like_related(source, target, report) {
            return result;
        }

        let mut result = self.properties_related(source, target, report);
        if !result.is_true() {
            return Ternary::False;
        }
        for kind in [SignatureKind::Call, SignatureKind::Construct] {
            let related = self.signatures_related(source, target, kind, report);
            if !related.is_true() {
                return Ternary::False;
            }
            result = result.and(related);
        }
        let related = self.index_infos_related(source, target, report);
        if !related.is_true() {
            return Ternary::False;
        }
        result.and(related)
    }

    /// The generic target and type arguments of a class or interface type.
    fn reference_parts(&mut self, ty: TypeId) -> Option<(TypeId, Box<[TypeId]>)> {
        let data = self.types().get(ty);
        match data.object_key()? {
            ObjectKey::Reference { target, args } => Some((*target, args.clone())),
            ObjectKey::Declared(symbol) => {
                let parameters = self.type_parameters_of(*symbol);
                (!parameters.is_empty()).then(|| (ty, parameters.iter().copied().collect()))
            }
            _ => None,
        }
    }

    /// Compare type arguments by variance. The flag says whether a failure
    /// is conclusive.
    fn type_arguments_related(
        &mut self,
        sources: &[TypeId],
        targets: &[TypeId],
        variances: &[Variance],
        report: bool,
    ) -> (Ternary, bool) {
        let mut result = Ternary::True;
        for (i, variance) in variances.iter().enumerate() {
            let (s, t) = (sources[i], targets[i]);
            let related = match variance {
                Variance::Independent => Ternary::True,
                Variance::Covariant => self.is_related_to(s, t, report),
                Variance::Contravariant => self.is_related_to(t, s, report),
                Variance::Bivariant => {
                    let contra = self.is_related_to(t, s, false);
                    if contra.is_true() {
                        contra
                    } else {
                        self.is_related_to(s, t, report)
                    }
                }
                Variance::Invariant => {
                    let forward = self.is_related_to(s, t, report);
                    if forward.is_true() {
                        forward.and(self.is_related_to(t, s, report))
                    } else {
                        forward
                    }
                }
            };
            if !related.is_true() {
                return (Ternary::False, variance.is_reliable());
            }
            result = result.and(related);
        }
        (result, true)
    }

    fn tuple_parts(&self, ty: TypeId) -> Option<(Box<[TypeId]>, Box<[ElementFlags]>, bool)> {
        match self.types().get(ty).object_key()? {
            ObjectKey::Tuple {
                elements,
                flags,
                readonly,
            } => Some((elements.clone(), flags.clone(), *readonly)),
            _ => None,
        }
    }

    /// The element type of `Array<T>` or `ReadonlyArray<T>`, with whether
    /// it is the readonly one.
    fn array_like_element(&self, ty: TypeId) -> Option<(TypeId, bool)> {
        let data = self.types().get(ty);
        match data.object_key()? {
            ObjectKey::Reference { target, args } => {
                let readonly = Some(*target) == self.types().readonly_array_target();
                if readonly || Some(*target) == self.types().array_target() {
                    args.first().map(|&element| (element, readonly))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Tuples and arrays against tuples and arrays. `None` when neither side
    /// is one.
    fn array_like_related(&mut self, source: TypeId, target: TypeId, report: bool) -> Option<Ternary> {
        let source_tuple = self.tuple_parts(source);
        let source_array = self.array_like_element(source);
        if source_tuple.is_none() && source_array.is_none() {
            return None;
        }
        let source_readonly = source_tuple.as_ref().map_or_else(|| source_array.is_some_and(|a| a.1), |t| t.2);

        if let Some((elements, flags, readonly)) = self.tuple_parts(target) {
            if source_readonly && !readonly {
                self.report_readonly(source, target, report);
                return Some(Ternary::False);
            }
            let Some((source_elements, source_flags, _)) = source_tuple else {
                let only_rest = flags.len() == 1 && flags[0].contains(ElementFlags::REST);
                return Some(match (only_rest, source_array) {
                    (true, Some((element, _))) => self.is_related_to(element, elements[0], report),
                    _ => Ternary::False,
                });
            };
            return Some(self.tuple_related(&source_elements, &source_flags, &elements, &flags, report));
        }

        let (target_element, target_readonly) = self.array_like_element(target)?;
        if source_readonly && !target_readonly {
            self.report_readonly(source, target, report);
            return Some(Ternary::False);
        }
        match source_tuple {
            Some((elements, _, _)) => {
                let mut result = Ternary::True;
                for element in elements.iter().copied() {
                    let related = self.is_related_to(element, target_element, report);
                    if !related.is_true() {
                        return Some(Ternary::False);
                    }
                    result = result.and(related);
                }
                Some(result)
            }
            None => {
                let (element, _) = source_array?;
                Some(self.is_related_to(element, target_element, report))
            }
        }
    }

    fn report_readonly(&mut self, source: TypeId, target: TypeId, report: bool) {
        if report {
            let args = vec![self.type_to_string(source), self.type_to_string(target)];
            self.elaborate_alone(&messages::THE_TYPE_0_IS_READONLY_AND_CANNOT_BE_ASSIGNED_TO_THE_MUTABLE_TYPE_1, args);
        }
    }

    fn tuple_related(
        &mut self,
        source: &[TypeId],
        source_flags: &[ElementFlags],
        target: &[TypeId],
        target_flags: &[ElementFlags],
        report: bool,
    ) -> Ternary {
        let source_rest = source_flags.last().is_some_and(|f| f.contains(ElementFlags::REST));
        let target_rest = target_flags.last().is_some_and(|f| f.contains(ElementFlags::REST));
        let target_required = target_flags.iter().filter(|f| f.contains(ElementFlags::REQUIRED)).count();
        let source_required = source_flags.iter().filter(|f| f.contains(ElementFlags::REQUIRED)).count();
        let source_fixed = source.len() - usize::from(source_rest);
        let target_fixed = target.len() - usize::from(target_rest);

        if (source_rest && !target_rest) || (!target_rest && source_fixed > target_fixed) {
            if report {
                self.elaborate_alone(
                    &messages::TARGET_ALLOWS_ONLY_0_ELEMENTS_BUT_SOURCE_MAY_HAVE_MORE,
                    vec![target_fixed.to_string()],
                );
            }
            return Ternary::False;
        }
        if source_required < target_required {
            if report {
                self.elaborate_alone(
                    &messages::SOURCE_HAS_0_ELEMENTS_BUT_TARGET_REQUIRES_1,
                    vec![source_required.to_string(), target_required.to_string()],
                );
            }
            return Ternary::False;
        }
        let mut result = Ternary::True;
        for (i, &element) in source.iter().enumerate() {
            let is_rest = source_flags[i].contains(ElementFlags::REST);
            let target_element = if is_rest || i >= target_fixed {
                match target.last() {
                    Some(&last) if target_rest => last,
                    _ => return Ternary::False,
                }
            } else {
                target[i]
            };
            let related = self.is_related_to(element, target_element, report);
            if !related.is_true() {
                return Ternary::False;
            }
            result = result.and(related);
        }
        result
    }

    // ========================================================================
    // Members
    // ========================================================================

    fn properties_related(&mut self, source: TypeId, target: TypeId, report: bool) -> Ternary {
        let target_members = self.resolve_members(target);
        let mut missing = Vec::new();
        let mut present = Vec::new();
        for (&name, target_property) in target_members.properties.iter() {
            match self.property_of_type(source, name) {
                Some(source_property) => present.push((name, source_property, target_property.clone())),
                None if !target_property.is_optional() => missing.push(name),
                None => {}
            }
        }
        if !missing.is_empty() && self.relation.kind != RelationKind::Comparable {
            if report {
                let source_text = self.type_to_string(source);
                let target_text = self.type_to_string(target);
                if let [name] = missing[..] {
                    let name = self.text(name).to_string();
                    self.elaborate_alone(
                        &messages::PROPERTY_0_IS_MISSING_IN_TYPE_1_BUT_REQUIRED_IN_TYPE_2,
                        vec![name, source_text, target_text],
                    );
                } else {
                    let shown = if self.options().no_error_truncation() { missing.len() } else { 4 };
                    let mut names: Vec<String> = missing.iter().take(shown).map(|&n| self.text(n).to_string()).collect();
                    if missing.len() > shown {
                        names.push(format!("and {} more.", missing.len() - shown));
                    }
                    let list = names.join(", ");
                    self.elaborate_alone(
                        &messages::TYPE_0_IS_MISSING_THE_FOLLOWING_PROPERTIES_FROM_TYPE_1_COLON_2,
                        vec![source_text, target_text, list],
                    );
                }
            }
            return Ternary::False;
        }

        let mut result = Ternary::True;
        for (name, source_property, target_property) in present {
            let hidden = PropertyFlags::PRIVATE | PropertyFlags::PROTECTED;
            if (source_property.flags.intersects(hidden) || target_property.flags.intersects(hidden))
                && source_property.symbol != target_property.symbol
            {
                return Ternary::False;
            }
            if source_property.is_optional()
                && !target_property.is_optional()
                && self.relation.kind != RelationKind::Comparable
            {
                if report {
                    let args = vec![
                        self.text(name).to_string(),
                        self.type_to_string(source),
                        self.type_to_string(target),
                    ];
                    self.elaborate_alone(&messages::PROPERTY_0_IS_OPTIONAL_IN_TYPE_1_BUT_REQUIRED_IN_TYPE_2, args);
                }
                return Ternary::False;
            }
            let source_type = self.type_of_property(&source_property);
            let target_type = self.type_of_property(&target_property);
            let related = self.is_related_to(source_type, target_type, report);
            if !related.is_true() {
                if report {
                    let name = self.text(name).to_string();
                    self.elaborate(&messages::TYPES_OF_PROPERTY_0_ARE_INCOMPATIBLE, vec![name]);
                }
                return Ternary::False;
            }
            result = result.and(related);
        }
        result
    }

    fn signatures_related(&mut self, source: TypeId, target: TypeId, kind: SignatureKind, report: bool) -> Ternary {
        let targets = self.signatures_of_type(target, kind);
        if targets.is_empty() {
            return Ternary::True;
        }
        let sources = self.signatures_of_type(source, kind);
        if sources.is_empty() {
            if report {
                let args = vec![self.type_to_string(source), self.signature_to_string(targets[0])];
                self.elaborate(&messages::TYPE_0_PROVIDES_NO_MATCH_FOR_THE_SIGNATURE_1, args);
            }
            return Ternary::False;
        }
        if let ([source_signature], [target_signature]) = (&sources[..], &targets[..]) {
            return self.signature_related(*source_signature, *target_signature, report);
        }
        let mut result = Ternary::True;
        'targets: for &target_signature in &targets {
            for &source_signature in &sources {
                let related = self.signature_related(source_signature, target_signature, false);
                if related.is_true() {
                    result = result.and(related);
                    continue 'targets;
                }
            }
            if report {
                let args = vec![self.type_to_string(source), self.signature_to_string(target_signature)];
                self.elaborate(&messages::TYPE_0_PROVIDES_NO_MATCH_FOR_THE_SIGNATURE_1, args);
            }
            return Ternary::False;
        }
        result
    }

    /// A generic source signature in the frame of the target: unified with
    /// the target's own type parameters, or inferred from its parameters.
    fn comparable_source_signature(&mut self, source: SignatureId, target: SignatureId) -> SignatureId {
        let source_signature = self.session.signature(source);
        let target_signature = self.session.signature(target);
        if source_signature.type_parameters.is_empty() {
            return source;
        }
        if source_signature.type_parameters.len() == target_signature.type_parameters.len() {
            let mapper = TypeMapper::new(
                source_signature.type_parameters.clone(),
                target_signature.type_parameters.clone(),
            );
            return self.instantiate_signature(source, Arc::new(mapper));
        }
        if target_signature.type_parameters.is_empty() {
            return self.instantiate_signature_in_context_of(source, target);
        }
        source
    }

    fn signature_related(&mut self, source: SignatureId, target: SignatureId, report: bool) -> Ternary {
        let source = self.comparable_source_signature(source, target);
        let source_signature = self.session.signature(source);
        let target_signature = self.session.signature(target);
        let target_count = target_signature.parameter_count();
        if !target_signature.has_rest && source_signature.min_argument_count > target_count {
            if report {
                self.elaborate(
                    &messages::TARGET_SIGNATURE_PROVIDES_TOO_FEW_ARGUMENTS_EXPECTED_0_OR_MORE_BUT_GOT_1,
                    vec![source_signature.min_argument_count.to_string(), target_count.to_string()],
                );
            }
            return Ternary::False;
        }

        let mut result = Ternary::True;
        if let (Some(source_this), Some(target_this)) = (source_signature.this_type, target_signature.this_type) {
            let related = self.is_related_to(target_this, source_this, false);
            let related = if related.is_true() {
                related
            } else {
                self.is_related_to(source_this, target_this, report)
            };
            if !related.is_true() {
                return Ternary::False;
            }
            result = result.and(related);
        }

        let strict = self.options().strict_function_types()
            && target_signature.kind == SignatureKind::Call
            && !target_signature.flags.contains(SignatureFlags::METHOD)
            && !source_signature.flags.contains(SignatureFlags::METHOD);
        let count = source_signature.parameter_count().max(target_count);
        for i in 0..count {
            let (Some(source_type), Some(target_type)) = (
                self.parameter_type_at(&source_signature, i),
                self.parameter_type_at(&target_signature, i),
            ) else {
                continue;
            };
            let mut related = self.is_related_to(target_type, source_type, false);
            if !related.is_true() && !strict {
                related = self.is_related_to(source_type, target_type, false);
            }
            if !related.is_true() {
                if report {
                    self.is_related_to(target_type, source_type, true);
                    let names = vec![
                        self.parameter_name_at(&source_signature, i),
                        self.parameter_name_at(&target_signature, i),
                    ];
                    self.elaborate(&messages::TYPES_OF_PARAMETERS_0_AND_1_ARE_INCOMPATIBLE, names);
                }
                return Ternary::False;
            }
            result = result.and(related);
        }

        let target_return = self.return_type_of_signature(target);
        if target_return == TypeId::VOID {
            return result;
        }
        let source_return = self.return_type_of_signature(source);
        let related = self.is_related_to(source_return, target_return, report);
        if !related.is_true() {
            return Ternary::False;
        }
        result.and(related)
    }

    fn parameter_name_at(&self, signature: &Signature, index: usize) -> String {
        let parameter = signature
            .parameters
            .get(index)
            .or_else(|| signature.rest_parameter());
        parameter.map_or_else(|| format!("arg{index}"), |p| self.text(p.name).to_string())
    }

    fn index_infos_related(&mut self, source: TypeId, target: TypeId, report: bool) -> Ternary {
        let target_members = self.resolve_members(target);
        let mut result = Ternary::True;
        for info in target_members.index_infos.iter() {
            let related = self.index_info_related(source, info, report);
            if !related.is_true() {
                return Ternary::False;
            }
            result = result.and(related);
        }
        result
    }

    fn index_info_related(&mut self, source: TypeId, target_info: &IndexInfo, report: bool) -> Ternary {
        let apparent = self.apparent_type(source);
        let source_members = self.resolve_members(apparent);
        let source_info = source_members.index_info(target_info.key_type).copied().or_else(|| {
            (target_info.key_type == TypeId::NUMBER)
                .then(|| source_members.index_info(TypeId::STRING).copied())
                .flatten()
        });
        let key_text = self.type_to_string(target_info.key_type);
        if let Some(source_info) = source_info {
            let related = self.is_related_to(source_info.value_type, target_info.value_type, report);
            if !related.is_true() && report {
                self.elaborate(&messages::_0_INDEX_SIGNATURES_ARE_INCOMPATIBLE, vec![key_text]);
            }
            return related;
        }
        if self.has_inferable_index(source) {
            let mut result = Ternary::True;
            for (&name, property) in source_members.properties.iter() {
                if target_info.key_type == TypeId::NUMBER && !is_numeric_name(self.text(name)) {
                    continue;
                }
                let ty = self.type_of_property(property);
                let related = self.is_related_to(ty, target_info.value_type, report);
                if !related.is_true() {
                    if report {
                        let name = self.text(name).to_string();
                        self.elaborate(&messages::TYPES_OF_PROPERTY_0_ARE_INCOMPATIBLE, vec![name]);
                    }
                    return Ternary::False;
                }
                result = result.and(related);
            }
            return result;
        }
        if report {
            let source_text = self.type_to_string(source);
            self.elaborate(&messages::INDEX_SIGNATURE_FOR_TYPE_0_IS_MISSING_IN_TYPE_1, vec![key_text, source_text]);
        }
        Ternary::False
    }

    /// Object literals, type literals, enums and namespaces: their known
    /// properties stand in for an index signature.
    fn has_inferable_index(&mut self, ty: TypeId) -> bool {
        let data = self.types().get(ty);
        match &data.key {
            TypeKey::Object(ObjectKey::Literal { .. }) => true,
            TypeKey::Object(ObjectKey::Anonymous { decl: DeclRef::Node(_), .. }) => true,
            TypeKey::Object(ObjectKey::Anonymous { decl: DeclRef::Symbol(symbol), .. }) => !self
                .symbol(*symbol)
                .flags
                .intersects(SymbolFlags::CLASS),
            TypeKey::Object(ObjectKey::Mapped { .. }) => true,
            TypeKey::Intersection(parts) => parts.to_vec().into_iter().all(|p| self.has_inferable_index(p)),
            _ => false,
        }
    }

    // ========================================================================
    // Object literal checks
    // ========================================================================

    /// Whether a target takes part in excess property checking.
    fn is_excess_property_check_target(&mut self, target: TypeId) -> bool {
        let data = self.types().get(target);
        if data.is(TypeFlags::UNION) {
            let parts = data.constituents().to_vec();
            return parts.into_iter().any(|p| self.is_excess_property_check_target(p));
        }
        if data.is(TypeFlags::INTERSECTION) {
            let parts = data.constituents().to_vec();
            return parts.into_iter().all(|p| self.is_excess_property_check_target(p));
        }
        if !data.is(TypeFlags::OBJECT) || target == TypeId::EMPTY_OBJECT || target == self.global_object_type() {
            return false;
        }
        let members = self.resolve_members(target);
        !members.is_empty() && members.index_info(TypeId::STRING).is_none()
    }

    fn is_known_property(&mut self, target: TypeId, name: InternedString) -> bool {
        let data = self.types().get(target);
        if data.is(TypeFlags::UNION_OR_INTERSECTION) {
            let parts = data.constituents().to_vec();
            return parts
                .into_iter()
                .any(|p| self.is_excess_property_check_target(p) && self.is_known_property(p, name));
        }
        if !data.is(TypeFlags::OBJECT) {
            return false;
        }
        let members = self.resolve_members(target);
        members.properties.contains_key(&name)
            || members.index_info(TypeId::STRING).is_some()
            || (members.index_info(TypeId::NUMBER).is_some() && is_numeric_name(self.text(name)))
    }

    fn has_excess_properties(&mut self, source: TypeId, target: TypeId, report: bool) -> bool {
        if !self.is_excess_property_check_target(target) {
            return false;
        }
        let names: Vec<InternedString> = match &self.types().get(source).key {
            TypeKey::Object(ObjectKey::Literal { properties, .. }) => properties.iter().map(|p| p.name).collect(),
            _ => return false,
        };
        for name in names {
            if self.is_known_property(target, name) {
                continue;
            }
            if report {
                self.relation.excess_property = Some(name);
                let args = vec![self.text(name).to_string(), self.type_to_string(target)];
                self.elaborate_alone(
                    &messages::OBJECT_LITERAL_MAY_ONLY_SPECIFY_KNOWN_PROPERTIES_AND_0_DOES_NOT_EXIST_IN_TYPE_1,
                    args,
                );
            }
            return true;
        }
        false
    }

    /// An object type whose properties are all optional, with at least one
    /// property and no signatures or index signatures.
    fn is_weak_type(&mut self, ty: TypeId) -> bool {
        let data = self.types().get(ty);
        if data.is(TypeFlags::INTERSECTION) {
            let parts = data.constituents().to_vec();
            return parts.into_iter().all(|p| self.is_weak_type(p));
        }
        if !data.is(TypeFlags::OBJECT) {
            return false;
        }
        let members = self.resolve_members(ty);
        !members.properties.is_empty()
            && members.call_signatures.is_empty()
            && members.construct_signatures.is_empty()
            && members.index_infos.is_empty()
            && members.properties.values().all(|p| p.is_optional())
    }

    fn has_properties_or_signatures(&mut self, ty: TypeId) -> bool {
        let apparent = self.apparent_type(ty);
        let members = self.resolve_members(apparent);
        !members.properties.is_empty() || !members.call_signatures.is_empty() || !members.construct_signatures.is_empty()
    }

    fn has_common_properties(&mut self, source: TypeId, target: TypeId) -> bool {
        let target_members = self.resolve_members(target);
        target_members
            .properties
            .keys()
            .any(|&name| self.property_of_type(source, name).is_some())
    }

    // ========================================================================
    // Identity
    // ========================================================================

    fn is_identical_to(&mut self, source: TypeId, target: TypeId, report: bool) -> Ternary {
        let source = self.types().regular_type_of(source);
        let target = self.types().regular_type_of(target);
        if source == target {
            return Ternary::True;
        }
        let source_data = self.types().get(source);
        let target_data = self.types().get(target);
        if source_data.flags != target_data.flags {
            return Ternary::False;
        }
        if source_data.is(TypeFlags::UNION_OR_INTERSECTION) {
            let sources = source_data.constituents().to_vec();
            let targets = target_data.constituents().to_vec();
            if sources.len() != targets.len() {
                return Ternary::False;
            }
            let mut result = Ternary::True;
            for s in sources {
                let mut found = Ternary::False;
                for &t in &targets {
                    let related = self.is_related_to(s, t, false);
                    if related.is_true() {
                        found = related;
                        break;
                    }
                }
                if !found.is_true() {
                    return Ternary::False;
                }
                result = result.and(found);
            }
            return result;
        }
        if source_data.is(TypeFlags::OBJECT) {
            return self.recursive_related(source, target, report);
        }
        Ternary::False
    }

    fn structured_identical(&mut self, source: TypeId, target: TypeId) -> Ternary {
        let source_members = self.resolve_members(source);
        let target_members = self.resolve_members(target);
        if source_members.properties.len() != target_members.properties.len()
            || source_members.index_infos.len() != target_members.index_infos.len()
        {
            return Ternary::False;
        }
        let mut result = Ternary::True;
        for (name, source_property) in source_members.properties.iter() {
            let Some(target_property) = target_members.properties.get(name) else {
                return Ternary::False;
            };
            if source_property.flags != target_property.flags {
                return Ternary::False;
            }
            let s = self.type_of_property(source_property);
            let t = self.type_of_property(target_property);
            let related = self.is_related_to(s, t, false);
            if !related.is_true() {
                return Ternary::False;
            }
            result = result.and(related);
        }
        for kind in [SignatureKind::Call, SignatureKind::Construct] {
            let sources = source_members.signatures(kind);
            let targets = target_members.signatures(kind);
            if sources.len() != targets.len() {
                return Ternary::False;
            }
            for (&s, &t) in sources.iter().zip(targets.iter()) {
                let related = self.signature_identical(s, t);
                if !related.is_true() {
                    return Ternary::False;
                }
                result = result.and(related);
            }
        }
        for source_info in &source_members.index_infos {
            let Some(target_info) = target_members.index_info(source_info.key_type).copied() else {
                return Ternary::False;
            };
            if source_info.readonly != target_info.readonly {
                return Ternary::False;
            }
            let related = self.is_related_to(source_info.value_type, target_info.value_type, false);
            if !related.is_true() {
                return Ternary::False;
            }
            result = result.and(related);
        }
        result
    }

    fn signature_identical(&mut self, source: SignatureId, target: SignatureId) -> Ternary {
        let source_signature = self.session.signature(source);
        let target_signature = self.session.signature(target);
        if source_signature.parameter_count() != target_signature.parameter_count()
            || source_signature.min_argument_count != target_signature.min_argument_count
            || source_signature.has_rest != target_signature.has_rest
            || source_signature.type_parameters.len() != target_signature.type_parameters.len()
        {
            return Ternary::False;
        }
        let source = self.comparable_source_signature(source, target);
        let source_signature = self.session.signature(source);
        let mut result = Ternary::True;
        for (s, t) in source_signature.parameters.iter().zip(target_signature.parameters.iter()) {
            let related = self.is_related_to(s.ty, t.ty, false);
            if !related.is_true() {
                return Ternary::False;
            }
            result = result.and(related);
        }
        let s = self.return_type_of_signature(source);
        let t = self.return_type_of_signature(target);
        result.and(self.is_related_to(s, t, false))
    }
}

#[cfg(test)]
mod tests {
    use tyck_options::CheckerOptions;

    use crate::session::Session;
    use crate::types::{RelationKind, TypeId};

    /// Helper: the declared type of the alias `name` in `source`.
    fn alias(session: &Session, name: &str) -> TypeId {
        let file = session.file_id("a.ts").unwrap();
        let mut checker = session.checker();
        let tree = checker.tree(file);
        let offset = tree.text().find(&format!("type {name} ")).unwrap() as u32 + 5;
        let node = tree.node_at_offset(offset).unwrap();
        checker.get_type_at_location(file, node)
    }

    #[test]
    fn test_primitive_rules() {
        let session = Session::from_sources(&[("a.ts", "")], CheckerOptions::strict());
        let mut checker = session.checker();
        let one = session.types().literal_number(1.0);
        assert!(checker.relate(one, TypeId::NUMBER, RelationKind::Assignable));
        assert!(!checker.relate(TypeId::NUMBER, one, RelationKind::Assignable));
        assert!(checker.relate(TypeId::NEVER, TypeId::STRING, RelationKind::Assignable));
        assert!(checker.relate(TypeId::ANY, TypeId::STRING, RelationKind::Assignable));
        assert!(!checker.relate(TypeId::ANY, TypeId::NEVER, RelationKind::Assignable));
        assert!(!checker.relate(TypeId::UNKNOWN, TypeId::STRING, RelationKind::Assignable));
        assert!(checker.relate(TypeId::UNDEFINED, TypeId::VOID, RelationKind::Assignable));
        assert!(!checker.relate(TypeId::NULL, TypeId::STRING, RelationKind::Assignable));
    }

    #[test]
    fn test_null_relates_to_everything_without_strict_null_checks() {
        let session = Session::from_sources(&[("a.ts", "")], CheckerOptions::default());
        let mut checker = session.checker();
        assert!(checker.relate(TypeId::NULL, TypeId::STRING, RelationKind::Assignable));
    }

    #[test]
    fn test_union_quantification() {
        let session = Session::from_sources(&[("a.ts", "")], CheckerOptions::strict());
        let mut checker = session.checker();
        let union = session.types().union(&[TypeId::STRING, TypeId::NUMBER]);
        assert!(checker.relate(TypeId::STRING, union, RelationKind::Assignable));
        assert!(!checker.relate(union, TypeId::STRING, RelationKind::Assignable));
        let wider = session.types().union(&[TypeId::STRING, TypeId::NUMBER, TypeId::BOOLEAN]);
        assert!(checker.relate(union, wider, RelationKind::Assignable));
    }

    #[test]
    fn test_structural_objects() {
        let source = "type A = { a: number; b: string };\ntype B = { a: number };\ntype C = { a: string };";
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let (a, b, c) = (alias(&session, "A"), alias(&session, "B"), alias(&session, "C"));
        let mut checker = session.checker();
        assert!(checker.relate(a, b, RelationKind::Assignable));
        assert!(!checker.relate(b, a, RelationKind::Assignable));
        assert!(!checker.relate(a, c, RelationKind::Assignable));
    }

    #[test]
    fn test_identical_type_literals_keep_distinct_ids() {
        let source = "type A = { x: number; y?: string };\ntype B = { x: number; y?: string };";
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let (a, b) = (alias(&session, "A"), alias(&session, "B"));
        assert_ne!(a, b);
        let mut checker = session.checker();
        for kind in [RelationKind::Identity, RelationKind::Subtype, RelationKind::Assignable] {
            assert!(checker.relate(a, b, kind), "{kind:?}");
            assert!(checker.relate(b, a, kind), "{kind:?}");
        }
    }

    #[test]
    fn test_self_referential_identity() {
        let source = "type List = { value: number; next: List | null };\ntype Other = { value: number; next: Other | null };";
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let (list, other) = (alias(&session, "List"), alias(&session, "Other"));
        let mut checker = session.checker();
        assert!(checker.relate(list, list, RelationKind::Identity));
        assert!(checker.relate(list, other, RelationKind::Identity));
        assert!(checker.relate(other, list, RelationKind::Assignable));
    }

    #[test]
    fn test_function_parameters_are_contravariant() {
        let source = "type F = (x: string | number) => void;\ntype G = (x: string) => void;";
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let (f, g) = (alias(&session, "F"), alias(&session, "G"));
        let mut checker = session.checker();
        assert!(checker.relate(f, g, RelationKind::Assignable));
        assert!(!checker.relate(g, f, RelationKind::Assignable));
    }

    #[test]
    fn test_generic_interfaces_compare_by_variance() {
        let source = "interface Box<T> { value: T }\ntype A = Box<string>;\ntype B = Box<string | number>;";
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let (a, b) = (alias(&session, "A"), alias(&session, "B"));
        let mut checker = session.checker();
        assert!(checker.relate(a, b, RelationKind::Assignable));
        assert!(!checker.relate(b, a, RelationKind::Assignable));
    }
}
