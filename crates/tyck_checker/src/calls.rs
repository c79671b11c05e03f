//! Call and `new` resolution: candidate signatures, arity, type argument
//! inference and overload selection.
//!
//! Resolution runs once per call per checker. Its own diagnostics (arity,
//! argument and overload errors) are kept aside and replayed when the
//! statement walk reaches the call, so resolving a call early, for example
//! from flow analysis, never loses or duplicates them.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::trace;
use tyck_ast::types::{FileId, ModifierFlags, NodeFlags, NodeId, SymbolFlags};
use tyck_ast::{NodeData, SyntaxKind};
use tyck_diagnostics::{messages, ChainEntry};

use crate::checker::Checker;
use crate::inference::{ConstraintViolation, InferenceContext, InferenceFlags};
use crate::types::{InferencePriority, Signature, SignatureId, SignatureKind, TypeFlags, TypeId, TypeMapper};

/// What a call's callee offers.
enum Callee {
    /// `any` or an error: the call is untyped.
    Untyped,
    Signatures(Vec<SignatureId>),
    /// Reported already.
    Invalid,
}

/// An argument that failed its parameter.
#[derive(Debug, Copy, Clone)]
struct ArgumentError {
    argument: NodeId,
    target: TypeId,
}

impl<'s> Checker<'s> {
    /// The signature a call or `new` expression resolves to. `None` for an
    /// untyped or invalid call, and while the call is being resolved.
    pub(crate) fn resolved_signature(&mut self, file: FileId, call: NodeId) -> Option<SignatureId> {
        let key = (file, call);
        if let Some(done) = self.cached_resolved_signature(key) {
            return done;
        }
        if !self.resolving_calls.insert(key) {
            return None;
        }
        let (signature, diagnostics) = self.collecting(|c| c.resolve_call(file, call));
        self.resolving_calls.remove(&key);
        if !self.is_speculating() {
            self.call_diagnostics.insert(key, diagnostics);
        }
        self.store_resolved_signature(key, signature);
        signature
    }

    /// Report the diagnostics found while resolving `call`.
    pub(crate) fn replay_call_diagnostics(&mut self, file: FileId, call: NodeId) {
        if !self.is_reporting() {
            return;
        }
        if let Some(diagnostics) = self.call_diagnostics.remove(&(file, call)) {
            for diagnostic in diagnostics {
                self.push_diagnostic(diagnostic);
            }
        }
    }

    fn resolve_call(&mut self, file: FileId, call: NodeId) -> Option<SignatureId> {
        let NodeData::Call {
            expression,
            type_arguments,
            arguments,
        } = self.data(file, call)
        else {
            return None;
        };
        let (callee, type_argument_nodes, arguments) = (*expression, type_arguments.as_slice(), arguments.as_slice());
        let is_new = self.kind(file, call) == SyntaxKind::NewExpression;
        let kind = if is_new { SignatureKind::Construct } else { SignatureKind::Call };

        let (signatures, explicit) = match self.callee_signatures(file, call, callee, kind) {
            (Callee::Signatures(signatures), explicit) => (signatures, explicit),
            (Callee::Untyped, _) => {
                self.check_untyped_arguments(file, arguments);
                return None;
            }
            (Callee::Invalid, _) => return None,
        };
        let type_arguments: Vec<TypeId> = if type_argument_nodes.is_empty() {
            explicit
        } else {
            type_argument_nodes
                .iter()
                .map(|&node| self.type_from_type_node(file, node))
                .collect()
        };
        let type_argument_count = type_arguments.len();

        // Arity filtering.
        let spread = arguments.iter().position(|&a| self.kind(file, a) == SyntaxKind::SpreadElement);
        let mut candidates = Vec::new();
        for &signature in &signatures {
            let data = self.session.signature(signature);
            if !Self::has_correct_arity(&data, arguments.len(), spread) {
                continue;
            }
            if type_argument_count > 0 {
                let min = self.min_type_argument_count(&data.type_parameters);
                if type_argument_count < min || type_argument_count > data.type_parameters.len() {
                    continue;
                }
            }
            candidates.push(signature);
        }
        if candidates.is_empty() {
            return self.report_candidate_failure(file, call, &signatures, arguments, spread, &type_arguments);
        }

        let mut last = None;
        let mut last_error = None;
        for &candidate in &candidates {
            let (instantiated, violations) = self.instantiate_candidate(file, call, candidate, arguments, &type_arguments);
            match self.first_argument_error(file, instantiated, arguments) {
                None => {
                    trace!(?candidate, ?instantiated, "call resolved");
                    self.check_spread_arguments(file, instantiated, arguments);
                    self.report_constraint_violations(file, call, candidate, arguments, &violations);
                    return Some(instantiated);
                }
                Some(error) => {
                    last = Some(instantiated);
                    last_error = Some(error);
                }
            }
        }

        if let Some(error) = last_error {
            if candidates.len() == 1 {
                let diagnostics = self.with_argument_type(file, error.argument, Some(error.target), |c, source| {
                    c.collecting(|c| {
                        c.check_type_assignable_to(
                            source,
                            error.target,
                            (file, error.argument),
                            Some(&messages::ARGUMENT_OF_TYPE_0_IS_NOT_ASSIGNABLE_TO_PARAMETER_OF_TYPE_1),
                            Some(error.argument),
                        )
                    })
                    .1
                });
                for diagnostic in diagnostics {
                    self.push_diagnostic(diagnostic);
                }
            } else {
                let source =
                    self.with_argument_type(file, error.argument, Some(error.target), |c, source| c.type_to_string(source));
                let target = self.type_to_string(error.target);
                let chain = vec![ChainEntry::new(
                    &messages::ARGUMENT_OF_TYPE_0_IS_NOT_ASSIGNABLE_TO_PARAMETER_OF_TYPE_1,
                    &[&source, &target],
                )];
                if self.is_reporting() {
                    let diagnostic = self
                        .diagnostic(file, call, &messages::NO_OVERLOAD_MATCHES_THIS_CALL, &[])
                        .with_chain(chain);
                    self.push_diagnostic(diagnostic);
                }
            }
        }
        last
    }

    /// Signatures of the callee, with the type arguments written in an
    /// `extends` clause for `super(...)` calls.
    fn callee_signatures(&mut self, file: FileId, call: NodeId, callee: NodeId, kind: SignatureKind) -> (Callee, Vec<TypeId>) {
        if self.kind(file, callee) == SyntaxKind::SuperKeyword {
            return self.super_call_signatures(file, call);
        }
        let callee_type = self.discarding(|c| c.check_expression(file, callee));
        let callee_type = if self.types().is(callee_type, TypeFlags::UNION) && self.strict_null_checks() {
            self.check_invocable_nullable(file, call, callee, callee_type)
        } else {
            callee_type
        };
        if self.types().is(callee_type, TypeFlags::ANY | TypeFlags::ERROR) {
            return (Callee::Untyped, Vec::new());
        }
        let apparent = self.apparent_type(callee_type);
        let signatures = self.signatures_of_type(apparent, kind);
        if !signatures.is_empty() {
            if kind == SignatureKind::Construct && self.is_abstract_class_reference(file, callee) {
                self.error(file, call, &messages::CANNOT_CREATE_AN_INSTANCE_OF_AN_ABSTRACT_CLASS, &[]);
            }
            return (Callee::Signatures(signatures), Vec::new());
        }
        match kind {
            SignatureKind::Call => {
                if !self.signatures_of_type(apparent, SignatureKind::Construct).is_empty() {
                    let text = self.type_to_string(callee_type);
                    self.error(
                        file,
                        callee,
                        &messages::VALUE_OF_TYPE_0_IS_NOT_CALLABLE_DID_YOU_MEAN_TO_INCLUDE_NEW,
                        &[&text],
                    );
                } else {
                    self.error(file, callee, &messages::THIS_EXPRESSION_IS_NOT_CALLABLE, &[]);
                }
            }
            SignatureKind::Construct => {
                // A plain function called with `new` is untyped.
                if !self.signatures_of_type(apparent, SignatureKind::Call).is_empty() {
                    return (Callee::Untyped, Vec::new());
                }
                self.error(file, callee, &messages::THIS_EXPRESSION_IS_NOT_CONSTRUCTABLE, &[]);
            }
        }
        (Callee::Invalid, Vec::new())
    }

    /// A callee whose type includes `null` or `undefined` is reported and
    /// called with those removed. Optional calls are exempt.
    fn check_invocable_nullable(&mut self, file: FileId, call: NodeId, callee: NodeId, ty: TypeId) -> TypeId {
        let flags = self
            .constituents_of(ty)
            .into_iter()
            .fold(TypeFlags::empty(), |acc, t| acc | self.types().flags(t));
        if !flags.intersects(TypeFlags::NULLABLE) {
            return ty;
        }
        let optional = self.tree(file).node(call).flags.contains(NodeFlags::OPTIONAL_CHAIN);
        if !optional {
            let message = match (flags.contains(TypeFlags::NULL), flags.contains(TypeFlags::UNDEFINED)) {
                (true, true) => &messages::CANNOT_INVOKE_AN_OBJECT_WHICH_IS_POSSIBLY_NULL_OR_UNDEFINED,
                (true, false) => &messages::CANNOT_INVOKE_AN_OBJECT_WHICH_IS_POSSIBLY_NULL,
                _ => &messages::CANNOT_INVOKE_AN_OBJECT_WHICH_IS_POSSIBLY_UNDEFINED,
            };
            self.error(file, callee, message, &[]);
        }
        self.non_nullable_type(ty)
    }

    fn is_abstract_class_reference(&mut self, file: FileId, callee: NodeId) -> bool {
        let Some(symbol) = self.get_symbol_at_location(file, callee) else {
            return false;
        };
        let symbol = self.resolve_alias_or_self(symbol);
        if !self.symbol(symbol).flags.contains(SymbolFlags::CLASS) {
            return false;
        }
        self.symbol(symbol).declarations.iter().any(|d| {
            self.tree(d.file).node(d.node).modifiers.contains(ModifierFlags::ABSTRACT)
        })
    }

    fn super_call_signatures(&mut self, file: FileId, call: NodeId) -> (Callee, Vec<TypeId>) {
        let Some(heritage) = self.this_container_class(file, call).and_then(|class| self.extends_clause_type(file, class))
        else {
            self.error(file, call, &messages::SUPER_CAN_ONLY_BE_REFERENCED_IN_A_DERIVED_CLASS, &[]);
            return (Callee::Invalid, Vec::new());
        };
        let NodeData::Call {
            expression,
            type_arguments,
            ..
        } = self.data(file, heritage)
        else {
            return (Callee::Untyped, Vec::new());
        };
        let (expression, type_arguments) = (*expression, type_arguments.clone());
        let base = self.discarding(|c| c.check_expression(file, expression));
        if self.types().is(base, TypeFlags::ANY | TypeFlags::ERROR) {
            return (Callee::Untyped, Vec::new());
        }
        let explicit = type_arguments
            .iter()
            .map(|&node| self.type_from_type_node(file, node))
            .collect();
        let signatures = self.signatures_of_type(base, SignatureKind::Construct);
        if signatures.is_empty() {
            return (Callee::Untyped, Vec::new());
        }
        (Callee::Signatures(signatures), explicit)
    }

    /// The type node of a class's `extends` clause.
    pub(crate) fn extends_clause_type(&self, file: FileId, class: NodeId) -> Option<NodeId> {
        let NodeData::ClassLike { heritage_clauses, .. } = self.data(file, class) else {
            return None;
        };
        heritage_clauses.iter().find_map(|&clause| match self.data(file, clause) {
            NodeData::HeritageClause {
                token: SyntaxKind::ExtendsKeyword,
                types,
            } => types.first().copied(),
            _ => None,
        })
    }

    fn check_untyped_arguments(&mut self, file: FileId, arguments: &[NodeId]) {
        for &argument in arguments {
            self.discarding(|c| c.check_expression(file, argument));
        }
    }

    fn has_correct_arity(signature: &Signature, argument_count: usize, spread: Option<usize>) -> bool {
        if let Some(spread) = spread {
            return spread >= signature.min_argument_count || signature.has_rest;
        }
        argument_count >= signature.min_argument_count
            && (signature.has_rest || argument_count <= signature.parameter_count())
    }

    /// No candidate has the right arity or type argument count. Returns a
    /// best-effort signature so the call still has a type.
    fn report_candidate_failure(
        &mut self,
        file: FileId,
        call: NodeId,
        signatures: &[SignatureId],
        arguments: &[NodeId],
        spread: Option<usize>,
        type_arguments: &[TypeId],
    ) -> Option<SignatureId> {
        let data: Vec<Arc<Signature>> = signatures.iter().map(|&s| self.session.signature(s)).collect();
        let argument_count = arguments.len();
        if !type_arguments.is_empty()
            && !data.iter().any(|d| type_arguments.len() <= d.type_parameters.len())
        {
            let expected = data.iter().map(|d| d.type_parameters.len()).max().unwrap_or(0);
            self.error(
                file,
                call,
                &messages::EXPECTED_0_TYPE_ARGUMENTS_BUT_GOT_1,
                &[&expected.to_string(), &type_arguments.len().to_string()],
            );
            return None;
        }
        if !data.iter().any(|d| Self::has_correct_arity(d, argument_count, spread)) {
            let min = data.iter().map(|d| d.min_argument_count).min().unwrap_or(0);
            let has_rest = data.iter().any(|d| d.has_rest);
            let max = data.iter().map(|d| d.parameter_count()).max().unwrap_or(0);
            let got = argument_count.to_string();
            if let Some(spread) = spread {
                self.error(
                    file,
                    arguments[spread],
                    &messages::A_SPREAD_ARGUMENT_MUST_EITHER_HAVE_A_TUPLE_TYPE_OR_BE_PASSED_TO_A_REST_PARAMETER,
                    &[],
                );
            } else if has_rest && argument_count < min {
                self.error(file, call, &messages::EXPECTED_AT_LEAST_0_ARGUMENTS_BUT_GOT_1, &[&min.to_string(), &got]);
            } else {
                let expected = if min == max { min.to_string() } else { format!("{min}-{max}") };
                let anchor = if argument_count > max { arguments[max] } else { call };
                self.error(file, anchor, &messages::EXPECTED_0_ARGUMENTS_BUT_GOT_1, &[&expected, &got]);
            }
        } else {
            // Type argument count out of range for the candidates that fit.
            let d = &data[0];
            let min = self.min_type_argument_count(&d.type_parameters);
            let expected = if min == d.type_parameters.len() {
                min.to_string()
            } else {
                format!("{min}-{}", d.type_parameters.len())
            };
            self.error(
                file,
                call,
                &messages::EXPECTED_0_TYPE_ARGUMENTS_BUT_GOT_1,
                &[&expected, &type_arguments.len().to_string()],
            );
            return None;
        }
        // Keep the call typed by the first signature, with what can be
        // inferred from the arguments given.
        let first = *signatures.first()?;
        let (instantiated, _) = self.discarding(|c| c.instantiate_candidate(file, call, first, arguments, &[]));
        Some(instantiated)
    }

    // ========================================================================
    // Candidates
    // ========================================================================

    /// The candidate with its type parameters replaced by the explicit type
    /// arguments, or by inferred ones.
    fn instantiate_candidate(
        &mut self,
        file: FileId,
        call: NodeId,
        candidate: SignatureId,
        arguments: &[NodeId],
        type_arguments: &[TypeId],
    ) -> (SignatureId, Vec<ConstraintViolation>) {
        let data = self.session.signature(candidate);
        if data.type_parameters.is_empty() {
            return (candidate, Vec::new());
        }
        if !type_arguments.is_empty() {
            let filled = self.fill_type_arguments(&data.type_parameters, type_arguments);
            let mapper = TypeMapper::new(data.type_parameters.clone(), filled.clone());
            let mut violations = Vec::new();
            for (index, (&parameter, &argument)) in data.type_parameters.iter().zip(filled.iter()).enumerate() {
                if let Some(constraint) = self.constraint_of_type_parameter(parameter) {
                    let constraint = self.instantiate(constraint, &mapper);
                    if !self.is_type_assignable_to(argument, constraint) {
                        violations.push(ConstraintViolation {
                            index,
                            inferred: argument,
                            constraint,
                        });
                    }
                }
            }
            return (self.instantiate_signature(candidate, Arc::new(mapper)), violations);
        }
        self.infer_call_signature(file, call, candidate, &data, arguments)
    }

    /// Infer the type arguments of `candidate` from the arguments. Context
    /// sensitive arguments wait for a first round of inference and are then
    /// typed against the partially inferred parameters, until no new
    /// candidates show up.
    fn infer_call_signature(
        &mut self,
        file: FileId,
        call: NodeId,
        candidate: SignatureId,
        data: &Signature,
        arguments: &[NodeId],
    ) -> (SignatureId, Vec<ConstraintViolation>) {
        let mut context = InferenceContext::new(&data.type_parameters, Some(candidate), InferenceFlags::NONE);
        if let Some(contextual) = self.contextual_type(file, call) {
            self.infer_from_return_context(&mut context, candidate, contextual);
        }
        let sensitive: Vec<bool> = arguments.iter().map(|&a| self.is_context_sensitive(file, a)).collect();
        for (i, &argument) in arguments.iter().enumerate() {
            if sensitive[i] {
                continue;
            }
            let Some(parameter) = self.parameter_type_at(data, i) else {
                continue;
            };
            self.with_argument_type(file, argument, None, |c, ty| {
                c.infer_types(&mut context, ty, parameter, InferencePriority::NONE);
            });
        }

        if sensitive.iter().any(|&s| s) {
            context.fix_inferred();
            let mut previous = None;
            for round in 0..=arguments.len() {
                let count = context.candidate_count();
                if previous == Some(count) {
                    break;
                }
                previous = Some(count);
                trace!(?candidate, round, count, "inference round");
                let mapper = self.inference_mapper(&mut context);
                for (i, &argument) in arguments.iter().enumerate() {
                    if !sensitive[i] {
                        continue;
                    }
                    let Some(parameter) = self.parameter_type_at(data, i) else {
                        continue;
                    };
                    let contextual = self.instantiate(parameter, &mapper);
                    self.with_argument_type(file, argument, Some(contextual), |c, ty| {
                        c.infer_types(&mut context, ty, parameter, InferencePriority::NONE);
                    });
                }
            }
        }

        let inferred = self.inferred_types(&mut context);
        let mapper = TypeMapper::new(data.type_parameters.clone(), inferred);
        let instantiated = self.instantiate_signature(candidate, Arc::new(mapper));
        (instantiated, context.violations)
    }

    /// Type an argument, against `contextual` when given, and pass the
    /// type to `use_type`. A context sensitive argument is checked
    /// speculatively and `use_type` runs inside the same speculation:
    /// whatever is derived from the argument's parameters and return type
    /// is dropped together with it.
    fn with_argument_type<R>(
        &mut self,
        file: FileId,
        argument: NodeId,
        contextual: Option<TypeId>,
        use_type: impl FnOnce(&mut Self, TypeId) -> R,
    ) -> R {
        let (expression, spread) = match (self.kind(file, argument), self.data(file, argument)) {
            (SyntaxKind::SpreadElement, NodeData::Expr { expression }) => (*expression, true),
            _ => (argument, false),
        };
        match contextual {
            Some(contextual) if !spread && self.is_context_sensitive(file, expression) => {
                let mut overlay = FxHashMap::default();
                overlay.insert((file, expression), contextual);
                self.speculate(overlay, |c| {
                    let ty = c.check_expression(file, expression);
                    use_type(c, ty)
                })
            }
            _ => {
                let ty = self.discarding(|c| c.check_expression(file, expression));
                let ty = if spread {
                    self.iterated_element_type(ty).unwrap_or(TypeId::ANY)
                } else {
                    ty
                };
                use_type(self, ty)
            }
        }
    }

    /// The first argument not assignable to its parameter.
    fn first_argument_error(&mut self, file: FileId, signature: SignatureId, arguments: &[NodeId]) -> Option<ArgumentError> {
        let data = self.session.signature(signature);
        for (i, &argument) in arguments.iter().enumerate() {
            let Some(parameter) = self.parameter_type_at(&data, i) else {
                continue;
            };
            let assignable =
                self.with_argument_type(file, argument, Some(parameter), |c, source| c.is_type_assignable_to(source, parameter));
            if !assignable {
                return Some(ArgumentError {
                    argument,
                    target: parameter,
                });
            }
        }
        None
    }

    /// A spread argument of an array type needs a rest parameter to land in.
    fn check_spread_arguments(&mut self, file: FileId, signature: SignatureId, arguments: &[NodeId]) {
        let data = self.session.signature(signature);
        if data.has_rest {
            return;
        }
        for (i, &argument) in arguments.iter().enumerate() {
            if self.kind(file, argument) != SyntaxKind::SpreadElement || i >= data.parameter_count() {
                continue;
            }
            let NodeData::Expr { expression } = self.data(file, argument) else {
                continue;
            };
            let expression = *expression;
            let ty = self.discarding(|c| c.check_expression(file, expression));
            if !self.types().get(ty).object_flags.contains(crate::types::ObjectFlags::TUPLE) {
                self.error(
                    file,
                    argument,
                    &messages::A_SPREAD_ARGUMENT_MUST_EITHER_HAVE_A_TUPLE_TYPE_OR_BE_PASSED_TO_A_REST_PARAMETER,
                    &[],
                );
                return;
            }
        }
    }

    /// Each violation is reported at the first argument whose parameter
    /// mentions the type parameter, or at the call.
    fn report_constraint_violations(
        &mut self,
        file: FileId,
        call: NodeId,
        candidate: SignatureId,
        arguments: &[NodeId],
        violations: &[ConstraintViolation],
    ) {
        if violations.is_empty() {
            return;
        }
        let data = self.session.signature(candidate);
        for violation in violations {
            let parameter = data.type_parameters[violation.index];
            let marker = TypeMapper::single(parameter, TypeId::MARKER_OTHER);
            let anchor = arguments
                .iter()
                .enumerate()
                .find(|&(i, _)| {
                    self.parameter_type_at(&data, i)
                        .is_some_and(|ty| self.instantiate(ty, &marker) != ty)
                })
                .map_or(call, |(_, &argument)| argument);
            let inferred = self.type_to_string(violation.inferred);
            let constraint = self.type_to_string(violation.constraint);
            self.error(
                file,
                anchor,
                &messages::TYPE_0_DOES_NOT_SATISFY_THE_CONSTRAINT_1,
                &[&inferred, &constraint],
            );
        }
    }

    // ========================================================================
    // Context sensitivity
    // ========================================================================

    /// Whether typing `node` depends on its contextual type: a function
    /// expression with an unannotated parameter, or a literal containing one.
    pub(crate) fn is_context_sensitive(&self, file: FileId, node: NodeId) -> bool {
        let tree = self.tree(file);
        match (tree.kind(node), self.data(file, node)) {
            (SyntaxKind::FunctionExpression | SyntaxKind::ArrowFunction, _) => self.has_unannotated_parameter(file, node),
            (SyntaxKind::MethodDeclaration, _) => self.has_unannotated_parameter(file, node),
            (SyntaxKind::ParenthesizedExpression, NodeData::Expr { expression }) => {
                self.is_context_sensitive(file, *expression)
            }
            (SyntaxKind::ObjectLiteralExpression | SyntaxKind::ArrayLiteralExpression, NodeData::List { elements }) => {
                elements.iter().any(|&e| self.is_context_sensitive(file, e))
            }
            (SyntaxKind::PropertyAssignment, NodeData::Variable { initializer, .. }) => {
                initializer.is_some_and(|i| self.is_context_sensitive(file, i))
            }
            (SyntaxKind::ConditionalExpression, NodeData::Conditional { when_true, when_false, .. }) => {
                self.is_context_sensitive(file, *when_true) || self.is_context_sensitive(file, *when_false)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use tyck_options::CheckerOptions;

    use crate::session::Session;

    /// Helper: codes of the diagnostics for `source`.
    fn codes(source: &str) -> Vec<u32> {
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let file = session.file_id("a.ts").unwrap();
        session.check_file(file).unwrap().iter().map(|d| d.code).collect()
    }

    /// Helper: display of the type at the last `needle`.
    fn type_at_last(source: &str, needle: &str) -> String {
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let file = session.file_id("a.ts").unwrap();
        let mut checker = session.checker();
        let tree = checker.tree(file);
        let offset = tree.text().rfind(needle).unwrap() as u32;
        let node = tree.node_at_offset(offset).unwrap();
        let ty = checker.get_type_at_location(file, node);
        checker.type_to_string(ty)
    }

    #[test]
    fn test_generic_identity_widens_literal() {
        let source = "function identity<T>(x: T): T { return x; }\nconst r = identity(5);";
        assert_eq!(type_at_last(source, "r ="), "number");
    }

    #[test]
    fn test_context_sensitive_argument_inference() {
        let source = "function map<T, U>(xs: T[], f: (x: T) => U): U[] { return []; }\nconst r = map([\"a\"], x => x.length);";
        assert_eq!(type_at_last(source, "r ="), "number[]");
        assert_eq!(type_at_last(source, "x.length"), "string");
    }

    #[test]
    fn test_arity_errors() {
        assert_eq!(codes("function f(a: number) {}\nf();"), vec![2554]);
        assert_eq!(codes("function f(a: number) {}\nf(1, 2);"), vec![2554]);
        assert_eq!(codes("function f(a: number, ...rest: number[]) {}\nf();"), vec![2555]);
    }

    #[test]
    fn test_argument_mismatch() {
        assert_eq!(codes("function f(a: number) {}\nf(\"x\");"), vec![2345]);
    }

    #[test]
    fn test_overloads() {
        let source = "function f(a: string): string;\nfunction f(a: number): number;\nfunction f(a: any): any { return a; }\nconst r = f(1);\nf(true);";
        assert_eq!(type_at_last(source, "r ="), "number");
        assert_eq!(codes(source), vec![2769]);
    }

    #[test]
    fn test_not_callable() {
        assert_eq!(codes("const x = 1;\nx();"), vec![2349]);
    }

    #[test]
    fn test_explicit_type_arguments() {
        assert_eq!(codes("function f<T>(x: T) {}\nf<string>(1);"), vec![2345]);
        assert_eq!(codes("function f<T>(x: T) {}\nf<string, number>(\"a\");"), vec![2558]);
    }

    #[test]
    fn test_inferred_constraint_violation() {
        assert_eq!(codes("function f<T extends string>(x: T) {}\nf(1);"), vec![2345]);
    }
}
