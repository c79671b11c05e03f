//! Statement and declaration checking.
//!
//! `check_source_file` walks every statement of a file in reporting mode.
//! Types themselves are computed lazily elsewhere; this pass forces the ones
//! a statement depends on and reports what is wrong with them.

use tracing::trace;
use tyck_ast::types::{FileId, ModifierFlags, NodeFlags, NodeId, SymbolFlags, SymbolId};
use tyck_ast::{NodeData, SyntaxKind};
use tyck_binder::Declaration;
use tyck_diagnostics::{messages, Diagnostic};

use crate::checker::Checker;
use crate::session::ModuleTarget;
use crate::types::{RelationKind, TypeFlags, TypeId};

impl<'s> Checker<'s> {
    /// All statement-level diagnostics of `file`.
    pub(crate) fn check_source_file(&mut self, file: FileId) -> Vec<Diagnostic> {
        let statements = self.tree(file).statements();
        let ((), diagnostics) = self.collecting(|c| c.check_statement_list(file, statements));
        trace!(count = diagnostics.len(), "statement diagnostics");
        diagnostics
    }

    fn check_statement_list(&mut self, file: FileId, statements: &[NodeId]) {
        let mut reported_run = false;
        for &statement in statements {
            if self.is_cancelled() || self.fatal.is_some() {
                return;
            }
            if self.is_unreachable(file, statement) {
                if !reported_run
                    && !self.options().allow_unreachable_code()
                    && !is_exempt_from_unreachable(self.kind(file, statement))
                    && !self.in_unreachable_statement(file, statement)
                {
                    self.error(file, statement, &messages::UNREACHABLE_CODE_DETECTED, &[]);
                    reported_run = true;
                }
            } else {
                reported_run = false;
            }
            self.check_statement(file, statement);
        }
    }

    fn is_unreachable(&self, file: FileId, node: NodeId) -> bool {
        let bound = self.bound(file);
        bound.flow_of(node).map_or(false, |flow| !bound.flow.is_reachable(flow))
    }

    /// Whether an enclosing statement of the same function already counts
    /// as dead code.
    fn in_unreachable_statement(&self, file: FileId, node: NodeId) -> bool {
        let tree = self.tree(file);
        for ancestor in tree.ancestors(node) {
            let kind = tree.kind(ancestor);
            if kind.is_function_like() || kind == SyntaxKind::ClassDeclaration {
                return false;
            }
            if kind.is_statement() && self.is_unreachable(file, ancestor) {
                return true;
            }
        }
        false
    }

    fn check_statement(&mut self, file: FileId, node: NodeId) {
        let saved = self.current_site.replace((file, node));
        self.check_statement_worker(file, node);
        self.current_site = saved;
    }

    fn check_statement_worker(&mut self, file: FileId, node: NodeId) {
        let kind = self.kind(file, node);
        match (kind, self.data(file, node)) {
            (SyntaxKind::VariableStatement, NodeData::List { elements }) => {
                for &list in elements {
                    self.check_variable_declaration_list(file, list);
                }
            }
            (SyntaxKind::ExpressionStatement | SyntaxKind::ThrowStatement, NodeData::Expr { expression }) => {
                self.check_expression(file, *expression);
            }
            (SyntaxKind::Block | SyntaxKind::ModuleBlock, NodeData::List { elements }) => {
                self.check_statement_list(file, elements);
            }
            (
                SyntaxKind::IfStatement,
                NodeData::If {
                    condition,
                    then_statement,
                    else_statement,
                },
            ) => {
                let ty = self.check_expression(file, *condition);
                self.check_truthiness(file, *condition, ty);
                self.check_statement(file, *then_statement);
                if let Some(otherwise) = else_statement {
                    self.check_statement(file, *otherwise);
                }
            }
            (SyntaxKind::DoStatement | SyntaxKind::WhileStatement, NodeData::Loop { condition, statement, .. }) => {
                if let Some(condition) = condition {
                    let ty = self.check_expression(file, *condition);
                    self.check_truthiness(file, *condition, ty);
                }
                self.check_statement(file, *statement);
            }
            (
                SyntaxKind::ForStatement,
                NodeData::Loop {
                    initializer,
                    condition,
                    incrementor,
                    statement,
                },
            ) => {
                if let Some(initializer) = initializer {
                    self.check_for_initializer(file, *initializer);
                }
                if let Some(condition) = condition {
                    let ty = self.check_expression(file, *condition);
                    self.check_truthiness(file, *condition, ty);
                }
                if let Some(incrementor) = incrementor {
                    self.check_expression(file, *incrementor);
                }
                self.check_statement(file, *statement);
            }
            (
                SyntaxKind::ForOfStatement,
                NodeData::Loop {
                    initializer,
                    condition,
                    statement,
                    ..
                },
            ) => {
                if let Some(initializer) = initializer {
                    self.check_for_initializer(file, *initializer);
                }
                if let Some(iterated) = condition {
                    let ty = self.check_expression(file, *iterated);
                    self.check_iterable(file, *iterated, ty);
                }
                self.check_statement(file, *statement);
            }
            (
                SyntaxKind::ForInStatement,
                NodeData::Loop {
                    initializer,
                    condition,
                    statement,
                    ..
                },
            ) => {
                if let Some(initializer) = initializer {
                    self.check_for_initializer(file, *initializer);
                }
                if let Some(object) = condition {
                    self.check_for_in_object(file, *object);
                }
                self.check_statement(file, *statement);
            }
            (SyntaxKind::ReturnStatement, NodeData::Return { expression }) => {
                self.check_return_statement(file, node, *expression);
            }
            (SyntaxKind::SwitchStatement, NodeData::Switch { expression, case_block }) => {
                self.check_switch_statement(file, *expression, *case_block);
            }
            (SyntaxKind::LabeledStatement, NodeData::Labeled { statement, .. }) => {
                self.check_statement(file, *statement);
            }
            (
                SyntaxKind::TryStatement,
                NodeData::Try {
                    try_block,
                    catch_clause,
                    finally_block,
                },
            ) => {
                self.check_statement(file, *try_block);
                if let Some(clause) = catch_clause {
                    if let NodeData::CatchClause { variable, block } = self.data(file, *clause) {
                        if let Some(variable) = variable {
                            self.check_variable_declaration(file, *variable);
                        }
                        self.check_statement(file, *block);
                    }
                }
                if let Some(finally) = finally_block {
                    self.check_statement(file, *finally);
                }
            }
            (SyntaxKind::FunctionDeclaration, _) => self.check_function_declaration(file, node),
            (SyntaxKind::ClassDeclaration, _) => self.check_class_declaration(file, node),
            (SyntaxKind::InterfaceDeclaration, _) => self.check_interface_declaration(file, node),
            (SyntaxKind::TypeAliasDeclaration, NodeData::TypeAlias { type_parameters, type_node, .. }) => {
                self.check_type_parameters(file, type_parameters);
                self.check_type_node(file, *type_node);
                if let Some(symbol) = self.node_symbol(file, node) {
                    self.declared_type(symbol);
                }
            }
            (SyntaxKind::EnumDeclaration, NodeData::Enum { members, .. }) => {
                if let Some(symbol) = self.node_symbol(file, node) {
                    self.declared_type(symbol);
                }
                for &member in members {
                    if let NodeData::Variable {
                        initializer: Some(initializer),
                        ..
                    } = self.data(file, member)
                    {
                        self.check_expression(file, *initializer);
                    }
                    if let Some(symbol) = self.node_symbol(file, member) {
                        self.enum_member_value(symbol);
                    }
                }
            }
            (SyntaxKind::ModuleDeclaration, NodeData::Module { body, .. }) => {
                if let Some(body) = body {
                    self.check_statement(file, *body);
                }
            }
            (SyntaxKind::ImportDeclaration, _) => self.check_import_declaration(file, node),
            (SyntaxKind::ExportDeclaration, _) => self.check_export_declaration(file, node),
            (SyntaxKind::ExportAssignment, NodeData::Expr { expression }) => {
                self.check_expression(file, *expression);
            }
            _ => {}
        }
    }

    // ========================================================================
    // Variables
    // ========================================================================

    fn check_variable_declaration_list(&mut self, file: FileId, list: NodeId) {
        for &declaration in self.tree(file).list(list) {
            self.check_variable_declaration(file, declaration);
        }
    }

    fn check_for_initializer(&mut self, file: FileId, initializer: NodeId) {
        if self.kind(file, initializer) == SyntaxKind::VariableDeclarationList {
            self.check_variable_declaration_list(file, initializer);
        } else {
            self.check_expression(file, initializer);
        }
    }

    fn check_variable_declaration(&mut self, file: FileId, node: NodeId) {
        let NodeData::Variable {
            name,
            type_annotation,
            initializer,
        } = self.data(file, node)
        else {
            return;
        };
        let (name, type_annotation, initializer) = (*name, *type_annotation, *initializer);
        if let Some(annotation) = type_annotation {
            self.check_type_node(file, annotation);
        }
        if self.kind(file, name) == SyntaxKind::ComputedPropertyName {
            self.check_expression(file, name);
        }
        let symbol = self.node_symbol(file, node);
        if let Some(symbol) = symbol {
            self.discarding(|c| c.symbol_type(symbol));
        }
        if let Some(initializer) = initializer {
            let value = self.check_expression(file, initializer);
            if let Some(annotation) = type_annotation {
                let declared = self.type_from_type_node(file, annotation);
                self.check_type_assignable_to(value, declared, (file, name), None, Some(initializer));
            }
        }
        if let Some(symbol) = symbol {
            self.check_redeclared_variable(file, node, name, symbol);
        }
    }

    /// 2403 for a `var` whose later declaration disagrees with the first.
    fn check_redeclared_variable(&mut self, file: FileId, node: NodeId, name: NodeId, symbol: SymbolId) {
        let symbol = self.resolve_merged(symbol);
        let record = self.symbol(symbol);
        if !record.flags.contains(SymbolFlags::FUNCTION_SCOPED_VARIABLE) || record.declarations.len() < 2 {
            return;
        }
        let Some(first) = record.declarations.first().copied() else {
            return;
        };
        if first.file == file && first.node == node {
            return;
        }
        let first_type = self.symbol_type(symbol);
        let this_type = self.declaration_variable_type(file, node);
        if self.types().is(first_type, TypeFlags::ERROR) || self.types().is(this_type, TypeFlags::ERROR) {
            return;
        }
        if !self.is_type_identical_to(first_type, this_type) {
            let text = self.tree(file).source_text(name).to_string();
            let first_text = self.type_to_string(first_type);
            let this_text = self.type_to_string(this_type);
            self.error(
                file,
                name,
                &messages::SUBSEQUENT_VARIABLE_DECLARATIONS_MUST_HAVE_THE_SAME_TYPE,
                &[&text, &first_text, &this_text],
            );
        }
    }

    fn declaration_variable_type(&mut self, file: FileId, node: NodeId) -> TypeId {
        let NodeData::Variable {
            type_annotation,
            initializer,
            ..
        } = self.data(file, node)
        else {
            return TypeId::ERROR;
        };
        match (*type_annotation, *initializer) {
            (Some(annotation), _) => self.type_from_type_node(file, annotation),
            (None, Some(initializer)) => {
                let ty = self.check_expression(file, initializer);
                self.widened_declaration_type(ty, false)
            }
            (None, None) => TypeId::ANY,
        }
    }

    // ========================================================================
    // Control flow statements
    // ========================================================================

    fn check_for_in_object(&mut self, file: FileId, object: NodeId) {
        let ty = self.check_expression(file, object);
        if self.types().is(ty, TypeFlags::ANY | TypeFlags::ERROR) {
            return;
        }
        let invalid = self
            .constituents_of(ty)
            .into_iter()
            .any(|t| self.types().is(t, TypeFlags::PRIMITIVE | TypeFlags::UNKNOWN));
        if invalid {
            let text = self.type_to_string(ty);
            self.error(
                file,
                object,
                &messages::THE_RIGHT_HAND_SIDE_OF_A_FOR_IN_STATEMENT_MUST_BE_OF_TYPE_ANY_AN_OBJECT_TYPE_OR_A_TYPE_PARAMETER,
                &[&text],
            );
        }
    }

    fn check_return_statement(&mut self, file: FileId, node: NodeId, expression: Option<NodeId>) {
        let Some(expression) = expression else {
            return;
        };
        let value = self.check_expression(file, expression);
        let Some(function) = self.containing_function(file, node) else {
            return;
        };
        if let Some(expected) = self.annotated_return_type(file, function) {
            self.check_type_assignable_to(value, expected, (file, expression), None, Some(expression));
        }
    }

    /// The written return type of a function whose returns are checked
    /// against it. Constructors, setters and async bodies have none.
    fn annotated_return_type(&mut self, file: FileId, function: NodeId) -> Option<TypeId> {
        if matches!(self.kind(file, function), SyntaxKind::Constructor | SyntaxKind::SetAccessor) {
            return None;
        }
        if self.tree(file).node(function).modifiers.contains(ModifierFlags::ASYNC) {
            return None;
        }
        self.tree(file).signature(function)?.return_type?;
        let signature = self.signature_of_declaration(file, function);
        Some(self.return_type_of_signature(signature))
    }

    fn check_switch_statement(&mut self, file: FileId, expression: NodeId, case_block: NodeId) {
        let switched = self.check_expression(file, expression);
        let clauses = self.tree(file).list(case_block);
        for &clause in clauses {
            let NodeData::CaseClause { expression, statements } = self.data(file, clause) else {
                continue;
            };
            if let Some(case) = expression {
                let case_type = self.check_expression(file, *case);
                let skip = self.types().is(case_type, TypeFlags::ANY | TypeFlags::ERROR)
                    || self.types().is(switched, TypeFlags::ANY | TypeFlags::ERROR);
                if !skip && !self.is_type_comparable_to(switched, case_type) {
                    self.check_type_related_to(case_type, switched, RelationKind::Comparable, (file, *case), None, None);
                }
            }
            self.check_statement_list(file, statements);
        }
    }

    // ========================================================================
    // Functions
    // ========================================================================

    fn check_function_declaration(&mut self, file: FileId, node: NodeId) {
        self.check_function_like(file, node);
        let Some(symbol) = self.node_symbol(file, node) else {
            return;
        };
        let symbol = self.resolve_merged(symbol);
        let declarations: Vec<Declaration> = self
            .symbol(symbol)
            .declarations
            .iter()
            .filter(|d| self.kind(d.file, d.node) == SyntaxKind::FunctionDeclaration)
            .copied()
            .collect();
        let this = Self::declaration(file, node);
        if !self.has_body(this) {
            if self.tree(file).node(node).flags.contains(NodeFlags::AMBIENT) {
                return;
            }
            let implemented = declarations.iter().any(|&d| self.has_body(d));
            let last = declarations.last().map_or(false, |d| d.file == file && d.node == node);
            if !implemented && last {
                let name = self.tree(file).declaration_name(node).unwrap_or(node);
                self.error(
                    file,
                    name,
                    &messages::FUNCTION_IMPLEMENTATION_IS_MISSING_OR_NOT_IMMEDIATELY_FOLLOWING_THE_DECLARATION,
                    &[],
                );
            }
            return;
        }
        let overloads: Vec<Declaration> = declarations.into_iter().filter(|&d| !self.has_body(d)).collect();
        for overload in overloads {
            if !self.is_implementation_compatible(this, overload) {
                let name = self.tree(overload.file).declaration_name(overload.node).unwrap_or(overload.node);
                self.error(
                    overload.file,
                    name,
                    &messages::THIS_OVERLOAD_SIGNATURE_IS_NOT_COMPATIBLE_WITH_ITS_IMPLEMENTATION_SIGNATURE,
                    &[],
                );
            }
        }
    }

    fn has_body(&self, declaration: Declaration) -> bool {
        self.tree(declaration.file)
            .signature(declaration.node)
            .map_or(false, |s| s.body.is_some())
    }

    /// Returns must relate in either direction, and each overload parameter
    /// must relate to the implementation's parameter at the same position.
    fn is_implementation_compatible(&mut self, implementation: Declaration, overload: Declaration) -> bool {
        let implementation = self.signature_of_declaration(implementation.file, implementation.node);
        let overload = self.signature_of_declaration(overload.file, overload.node);
        let implementation_return = self.return_type_of_signature(implementation);
        let overload_return = self.return_type_of_signature(overload);
        let returns = self.types().is(implementation_return, TypeFlags::ANY | TypeFlags::VOID)
            || self.is_type_assignable_to(overload_return, implementation_return)
            || self.is_type_assignable_to(implementation_return, overload_return);
        if !returns {
            return false;
        }
        let implementation = self.session.signature(implementation);
        let overload = self.session.signature(overload);
        if overload.min_argument_count < implementation.min_argument_count {
            return false;
        }
        for index in 0..overload.parameter_count() {
            let Some(target) = self.parameter_type_at(&implementation, index) else {
                return false;
            };
            let Some(source) = self.parameter_type_at(&overload, index) else {
                continue;
            };
            if !self.is_type_assignable_to(source, target) && !self.is_type_assignable_to(target, source) {
                return false;
            }
        }
        true
    }

    /// Parameters, return annotation and body of any function-like node.
    pub(crate) fn check_function_like(&mut self, file: FileId, node: NodeId) {
        let Some(signature) = self.tree(file).signature(node) else {
            return;
        };
        self.check_type_parameters(file, &signature.type_parameters);
        for &parameter in &signature.parameters {
            self.check_parameter(file, node, parameter);
        }
        if let Some(return_type) = signature.return_type {
            self.check_type_node(file, return_type);
        }
        let Some(body) = signature.body else {
            return;
        };
        if self.kind(file, body) == SyntaxKind::Block {
            self.check_statement_list(file, self.tree(file).list(body));
            self.check_function_end(file, node, body);
        } else {
            let value = self.check_expression(file, body);
            if let Some(expected) = self.annotated_return_type(file, node) {
                self.check_type_assignable_to(value, expected, (file, body), None, Some(body));
            }
        }
    }

    fn check_parameter(&mut self, file: FileId, function: NodeId, parameter: NodeId) {
        let NodeData::Variable {
            name,
            type_annotation,
            initializer,
        } = self.data(file, parameter)
        else {
            return;
        };
        let (name, type_annotation, initializer) = (*name, *type_annotation, *initializer);
        if let Some(annotation) = type_annotation {
            self.check_type_node(file, annotation);
        }
        if self.is_this_parameter(file, parameter) {
            return;
        }
        if let Some(initializer) = initializer {
            let value = self.check_expression(file, initializer);
            if let Some(annotation) = type_annotation {
                let declared = self.type_from_type_node(file, annotation);
                self.check_type_assignable_to(value, declared, (file, initializer), None, Some(initializer));
            }
            return;
        }
        if type_annotation.is_some()
            || !self.options().no_implicit_any()
            || self.kind(file, function) == SyntaxKind::SetAccessor
            || self.kind(file, name) != SyntaxKind::Identifier
        {
            return;
        }
        if self.discarding(|c| c.contextual_parameter_type(file, parameter)).is_some() {
            return;
        }
        let text = self.tree(file).identifier_text(name).to_string();
        let implied = if self.tree(file).node(parameter).flags.contains(NodeFlags::REST) {
            "any[]"
        } else {
            "any"
        };
        self.error(file, name, &messages::PARAMETER_0_IMPLICITLY_HAS_AN_1_TYPE, &[&text, implied]);
    }

    /// 2366/2355 against a written return type, 7030 without one.
    fn check_function_end(&mut self, file: FileId, function: NodeId, body: NodeId) {
        if !self.is_function_end_reachable(file, function) {
            return;
        }
        let mut returns = Vec::new();
        self.collect_returns(file, body, &mut returns);
        let return_node = self.tree(file).signature(function).and_then(|s| s.return_type);
        match (return_node, self.annotated_return_type(file, function)) {
            (Some(return_node), Some(declared)) => {
                let allows_missing = self.constituents_of(declared).into_iter().any(|t| {
                    self.types()
                        .is(t, TypeFlags::ANY | TypeFlags::UNKNOWN | TypeFlags::VOID | TypeFlags::UNDEFINED | TypeFlags::ERROR)
                });
                if allows_missing || self.types().is(declared, TypeFlags::NEVER) {
                    return;
                }
                if self.is_asserts_predicate(file, return_node) {
                    return;
                }
                let message = if returns.iter().any(Option::is_some) {
                    &messages::FUNCTION_LACKS_ENDING_RETURN_STATEMENT
                } else {
                    &messages::A_FUNCTION_WHOSE_DECLARED_TYPE_IS_NEITHER_UNDEFINED_VOID_NOR_ANY_MUST_RETURN_A_VALUE
                };
                self.error(file, return_node, message, &[]);
            }
            (None, _) => {
                if self.options().no_implicit_returns() && returns.iter().any(Option::is_some) {
                    let site = self.tree(file).declaration_name(function).unwrap_or(function);
                    self.error(file, site, &messages::NOT_ALL_CODE_PATHS_RETURN_A_VALUE, &[]);
                }
            }
            (Some(_), None) => {}
        }
    }

    fn is_asserts_predicate(&self, file: FileId, return_node: NodeId) -> bool {
        self.kind(file, return_node) == SyntaxKind::TypePredicate
            && self.tree(file).node(return_node).flags.contains(NodeFlags::ASSERTS)
    }

    // ========================================================================
    // Classes and interfaces
    // ========================================================================

    fn check_class_declaration(&mut self, file: FileId, node: NodeId) {
        let NodeData::ClassLike {
            name,
            type_parameters,
            heritage_clauses,
            members,
        } = self.data(file, node)
        else {
            return;
        };
        let site = name.unwrap_or(node);
        self.check_type_parameters(file, type_parameters);
        let Some(symbol) = self.node_symbol(file, node) else {
            return;
        };
        let symbol = self.resolve_merged(symbol);
        self.base_types(symbol);
        let instance = self.declared_type(symbol);
        for &clause in heritage_clauses {
            let NodeData::HeritageClause { token, types } = self.data(file, clause) else {
                continue;
            };
            for (index, &heritage) in types.iter().enumerate() {
                if *token == SyntaxKind::ExtendsKeyword {
                    if let NodeData::Call {
                        expression,
                        type_arguments,
                        ..
                    } = self.data(file, heritage)
                    {
                        self.check_expression(file, *expression);
                        for &argument in type_arguments {
                            self.check_type_node(file, argument);
                        }
                    }
                    if index > 0 {
                        continue;
                    }
                    let base = self.class_base_type(file, heritage);
                    if self.types().is(base, TypeFlags::OBJECT | TypeFlags::INTERSECTION) {
                        self.check_type_related_to(
                            instance,
                            base,
                            RelationKind::Assignable,
                            (file, site),
                            Some(&messages::CLASS_0_INCORRECTLY_EXTENDS_BASE_CLASS_1),
                            None,
                        );
                    }
                } else {
                    self.check_type_node(file, heritage);
                    let interface = self.type_from_type_node(file, heritage);
                    if self.types().is(interface, TypeFlags::OBJECT | TypeFlags::INTERSECTION) {
                        self.check_type_related_to(
                            instance,
                            interface,
                            RelationKind::Assignable,
                            (file, site),
                            Some(&messages::CLASS_0_INCORRECTLY_IMPLEMENTS_INTERFACE_1),
                            None,
                        );
                    }
                }
            }
        }
        for &member in members {
            self.check_class_member(file, member);
        }
    }

    fn check_class_member(&mut self, file: FileId, member: NodeId) {
        match (self.kind(file, member), self.data(file, member)) {
            (
                SyntaxKind::PropertyDeclaration,
                NodeData::Variable {
                    name,
                    type_annotation,
                    initializer,
                },
            ) => {
                let (name, type_annotation, initializer) = (*name, *type_annotation, *initializer);
                if self.kind(file, name) == SyntaxKind::ComputedPropertyName {
                    self.check_expression(file, name);
                }
                if let Some(annotation) = type_annotation {
                    self.check_type_node(file, annotation);
                }
                let Some(initializer) = initializer else {
                    return;
                };
                let value = self.check_expression(file, initializer);
                if let Some(annotation) = type_annotation {
                    let mut declared = self.type_from_type_node(file, annotation);
                    if self.tree(file).node(member).flags.contains(NodeFlags::OPTIONAL) && self.strict_null_checks() {
                        declared = self.types().union(&[declared, TypeId::UNDEFINED]);
                    }
                    self.check_type_assignable_to(value, declared, (file, name), None, Some(initializer));
                }
            }
            (
                SyntaxKind::MethodDeclaration
                | SyntaxKind::Constructor
                | SyntaxKind::GetAccessor
                | SyntaxKind::SetAccessor,
                _,
            ) => self.check_function_like(file, member),
            (SyntaxKind::IndexSignature, _) => self.check_type_node(file, member),
            _ => {}
        }
    }

    fn check_interface_declaration(&mut self, file: FileId, node: NodeId) {
        let NodeData::ClassLike {
            name,
            type_parameters,
            heritage_clauses,
            members,
        } = self.data(file, node)
        else {
            return;
        };
        let site = name.unwrap_or(node);
        self.check_type_parameters(file, type_parameters);
        let Some(symbol) = self.node_symbol(file, node) else {
            return;
        };
        let symbol = self.resolve_merged(symbol);
        self.base_types(symbol);
        let declared = self.declared_type(symbol);
        for &clause in heritage_clauses {
            let NodeData::HeritageClause { types, .. } = self.data(file, clause) else {
                continue;
            };
            for &heritage in types {
                self.check_type_node(file, heritage);
                let base = self.type_from_type_node(file, heritage);
                if self.types().is(base, TypeFlags::OBJECT | TypeFlags::INTERSECTION) {
                    self.check_type_related_to(
                        declared,
                        base,
                        RelationKind::Assignable,
                        (file, site),
                        Some(&messages::INTERFACE_0_INCORRECTLY_EXTENDS_INTERFACE_1),
                        None,
                    );
                }
            }
        }
        for &member in members {
            self.check_type_node(file, member);
            if self.kind(file, member) == SyntaxKind::PropertySignature {
                self.check_merged_property(file, member);
            }
        }
    }

    /// 2717 when a property repeated across merged interface declarations
    /// changes type.
    fn check_merged_property(&mut self, file: FileId, member: NodeId) {
        let Some(symbol) = self.node_symbol(file, member) else {
            return;
        };
        let declarations = self.symbol(symbol).declarations.clone();
        let Some(&first) = declarations.first() else {
            return;
        };
        if declarations.len() < 2 || (first.file == file && first.node == member) {
            return;
        }
        let first_type = self.property_annotation_type(first.file, first.node);
        let this_type = self.property_annotation_type(file, member);
        if self.types().is(first_type, TypeFlags::ERROR) || self.types().is(this_type, TypeFlags::ERROR) {
            return;
        }
        if !self.is_type_identical_to(first_type, this_type) {
            let name = self.tree(file).declaration_name(member).unwrap_or(member);
            let text = self.tree(file).source_text(name).to_string();
            let first_text = self.type_to_string(first_type);
            let this_text = self.type_to_string(this_type);
            self.error(
                file,
                name,
                &messages::SUBSEQUENT_PROPERTY_DECLARATIONS_MUST_HAVE_THE_SAME_TYPE,
                &[&text, &first_text, &this_text],
            );
        }
    }

    fn property_annotation_type(&mut self, file: FileId, node: NodeId) -> TypeId {
        match self.data(file, node) {
            NodeData::Variable {
                type_annotation: Some(annotation),
                ..
            } => self.type_from_type_node(file, *annotation),
            _ => TypeId::ANY,
        }
    }

    // ========================================================================
    // Type nodes
    // ========================================================================

    fn check_type_parameters(&mut self, file: FileId, parameters: &[NodeId]) {
        for &parameter in parameters {
            if let NodeData::TypeParameter { constraint, default, .. } = self.data(file, parameter) {
                if let Some(constraint) = constraint {
                    self.check_type_node(file, *constraint);
                }
                if let Some(default) = default {
                    self.check_type_node(file, *default);
                }
            }
        }
    }

    /// Report unresolved names and bad type arguments anywhere under a type
    /// node. Computing the type itself never reports.
    pub(crate) fn check_type_node(&mut self, file: FileId, node: NodeId) {
        match (self.kind(file, node), self.data(file, node)) {
            (
                SyntaxKind::TypeReference | SyntaxKind::ExpressionWithTypeArguments,
                NodeData::Call {
                    expression,
                    type_arguments,
                    ..
                },
            ) => {
                if let Some(symbol) = self.resolve_entity_name(file, *expression, SymbolFlags::TYPE, true) {
                    self.check_type_arguments(file, node, symbol);
                }
                for &argument in type_arguments {
                    self.check_type_node(file, argument);
                }
                return;
            }
            (SyntaxKind::TypeQuery, NodeData::Expr { expression }) => {
                self.resolve_entity_name(file, *expression, SymbolFlags::VALUE, true);
                return;
            }
            (SyntaxKind::ComputedPropertyName, _) => return,
            _ => {}
        }
        for child in self.tree(file).children(node) {
            self.check_type_node(file, child);
        }
    }

    // ========================================================================
    // Modules
    // ========================================================================

    fn check_import_declaration(&mut self, file: FileId, node: NodeId) {
        let NodeData::Import {
            import_clause,
            module_specifier,
        } = self.data(file, node)
        else {
            return;
        };
        let (import_clause, module_specifier) = (*import_clause, *module_specifier);
        if !self.check_module_specifier(file, module_specifier) {
            return;
        }
        let Some(clause) = import_clause else {
            return;
        };
        let NodeData::ImportClause {
            named_bindings: Some(bindings),
            ..
        } = self.data(file, clause)
        else {
            return;
        };
        if self.kind(file, *bindings) == SyntaxKind::NamedImports {
            self.check_specifiers_exported(file, module_specifier, *bindings);
        }
    }

    fn check_export_declaration(&mut self, file: FileId, node: NodeId) {
        let NodeData::Export {
            export_clause,
            module_specifier,
        } = self.data(file, node)
        else {
            return;
        };
        let (export_clause, module_specifier) = (*export_clause, *module_specifier);
        let Some(clause) = export_clause.filter(|&c| self.kind(file, c) == SyntaxKind::NamedExports) else {
            if let Some(specifier) = module_specifier {
                self.check_module_specifier(file, specifier);
            }
            return;
        };
        match module_specifier {
            Some(specifier) => {
                if self.check_module_specifier(file, specifier) {
                    self.check_specifiers_exported(file, specifier, clause);
                }
            }
            None => {
                for &element in self.tree(file).list(clause) {
                    let NodeData::Specifier { property_name, name } = self.data(file, element) else {
                        continue;
                    };
                    let local = property_name.unwrap_or(*name);
                    let Some(text) = self.tree(file).name_of(local) else {
                        continue;
                    };
                    let meaning = SymbolFlags::VALUE | SymbolFlags::TYPE | SymbolFlags::NAMESPACE | SymbolFlags::ALIAS;
                    if self.resolve_name(file, local, text, meaning).is_none() {
                        let text = self.text(text);
                        self.error(file, local, &messages::CANNOT_FIND_NAME_0, &[text]);
                    }
                }
            }
        }
    }

    /// 2307 for a module that resolves nowhere. Returns whether it resolved.
    fn check_module_specifier(&mut self, file: FileId, specifier: NodeId) -> bool {
        if self.session.module_target(file, specifier) != ModuleTarget::Missing {
            return true;
        }
        let text = self.tree(file).identifier_text(specifier).to_string();
        self.error(
            file,
            specifier,
            &messages::CANNOT_FIND_MODULE_0_OR_ITS_CORRESPONDING_TYPE_DECLARATIONS,
            &[&text],
        );
        false
    }

    fn check_specifiers_exported(&mut self, file: FileId, module_specifier: NodeId, list: NodeId) {
        let module_text = format!("\"{}\"", self.tree(file).identifier_text(module_specifier));
        for &element in self.tree(file).list(list) {
            let NodeData::Specifier { property_name, name } = self.data(file, element) else {
                continue;
            };
            let imported = property_name.unwrap_or(*name);
            let Some(text) = self.tree(file).name_of(imported) else {
                continue;
            };
            if self.module_export(file, module_specifier, text).is_none() {
                let text = self.text(text);
                self.error(file, imported, &messages::MODULE_0_HAS_NO_EXPORTED_MEMBER_1, &[&module_text, text]);
            }
        }
    }
}

fn is_exempt_from_unreachable(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::FunctionDeclaration
            | SyntaxKind::InterfaceDeclaration
            | SyntaxKind::TypeAliasDeclaration
            | SyntaxKind::EmptyStatement
    )
}

#[cfg(test)]
mod tests {
    use tyck_options::CheckerOptions;

    use crate::session::Session;

    /// Helper: diagnostic codes of a single strict file.
    fn codes(source: &str) -> Vec<u32> {
        codes_with(source, CheckerOptions::strict())
    }

    fn codes_with(source: &str, options: CheckerOptions) -> Vec<u32> {
        let session = Session::from_sources(&[("a.ts", source)], options);
        let file = session.file_id("a.ts").unwrap();
        session.check_file(file).unwrap().iter().map(|d| d.code).collect()
    }

    // ========================================================================
    // Variables
    // ========================================================================

    #[test]
    fn test_initializer_against_annotation() {
        assert_eq!(codes("let x: number = 'a';"), vec![2322]);
        assert!(codes("let x: number | string = 'a';").is_empty());
    }

    #[test]
    fn test_unknown_type_name() {
        assert_eq!(codes("let x: Missing;"), vec![2304]);
        assert_eq!(codes("let x: Array<Missing>;"), vec![2304]);
    }

    #[test]
    fn test_redeclared_var_must_agree() {
        assert_eq!(codes("var x: string;\nvar x: number;"), vec![2403]);
        assert!(codes("var x: string;\nvar x: string;").is_empty());
    }

    // ========================================================================
    // Statements
    // ========================================================================

    #[test]
    fn test_unreachable_code_reported_once_per_run() {
        let source = "function f() {\n  return 1;\n  let a = 1;\n  let b = 2;\n}";
        assert_eq!(codes(source), vec![7027]);
    }

    #[test]
    fn test_unreachable_function_declaration_is_exempt() {
        let source = "function f() {\n  return g();\n  function g() { return 1; }\n}";
        assert!(codes(source).is_empty());
    }

    #[test]
    fn test_return_against_declared_type() {
        assert_eq!(codes("function f(): string { return 1; }"), vec![2322]);
        assert!(codes("function f(): string | number { return 1; }").is_empty());
    }

    #[test]
    fn test_missing_return_paths() {
        assert_eq!(codes("function f(x: boolean): number {\n  if (x) { return 1; }\n}"), vec![2366]);
        assert_eq!(codes("function f(): number {\n}"), vec![2355]);
        assert!(codes("function f(): void {\n}").is_empty());
    }

    #[test]
    fn test_no_implicit_returns() {
        let mut options = CheckerOptions::strict();
        options.no_implicit_returns = Some(true);
        assert_eq!(codes_with("function f(x: boolean) {\n  if (x) { return 1; }\n}", options), vec![7030]);
    }

    #[test]
    fn test_for_of_requires_iterable() {
        assert_eq!(codes("for (const x of 1) {}"), vec![2488]);
        assert!(codes("for (const x of [1, 2]) { x; }").is_empty());
    }

    #[test]
    fn test_for_in_requires_object() {
        assert_eq!(codes("for (const k in 1) {}"), vec![2407]);
        assert!(codes("let o = { a: 1 };\nfor (const k in o) { k; }").is_empty());
    }

    #[test]
    fn test_switch_case_comparable() {
        assert_eq!(codes("function f(s: 'a' | 'b') {\n  switch (s) { case 'c': break; }\n}"), vec![2678]);
        assert!(codes("function f(s: 'a' | 'b') {\n  switch (s) { case 'a': break; }\n}").is_empty());
    }

    // ========================================================================
    // Functions
    // ========================================================================

    #[test]
    fn test_implicit_any_parameter() {
        assert_eq!(codes("function f(x) { return x; }"), vec![7006]);
        assert!(codes("const f: (x: number) => number = (x) => x;").is_empty());
        assert!(codes("function f(x = 1) { return x; }").is_empty());
    }

    #[test]
    fn test_overload_without_implementation() {
        assert_eq!(codes("function f(x: string): void;"), vec![2391]);
        assert!(codes("declare function f(x: string): void;").is_empty());
    }

    #[test]
    fn test_overload_incompatible_with_implementation() {
        let source = "function f(x: string): string;\nfunction f(x: number): number { return x; }";
        assert_eq!(codes(source), vec![2394]);
        let source = "function f(x: string): string;\nfunction f(x: string | number): string | number { return x; }";
        assert!(codes(source).is_empty());
    }

    // ========================================================================
    // Classes and interfaces
    // ========================================================================

    #[test]
    fn test_class_incorrectly_extends_base() {
        let source = "class A { x: number = 1; }\nclass B extends A { x: string = 'b'; }";
        assert_eq!(codes(source), vec![2415]);
    }

    #[test]
    fn test_class_incorrectly_implements_interface() {
        assert_eq!(codes("interface I { x: number }\nclass C implements I {}"), vec![2420]);
        assert!(codes("interface I { x: number }\nclass C implements I { x = 1; }").is_empty());
    }

    #[test]
    fn test_interface_incorrectly_extends_interface() {
        assert_eq!(codes("interface A { x: number }\ninterface B extends A { x: string }"), vec![2430]);
    }

    #[test]
    fn test_merged_property_must_agree() {
        assert_eq!(codes("interface A { x: number }\ninterface A { x: string }"), vec![2717]);
    }

    #[test]
    fn test_property_initializer_against_annotation() {
        assert_eq!(codes("class C { x: number = 'a'; }"), vec![2322]);
    }

    // ========================================================================
    // Modules
    // ========================================================================

    #[test]
    fn test_missing_module_and_export() {
        let session = Session::from_sources(
            &[
                ("m.ts", "export const a = 1;"),
                ("a.ts", "import { a, b } from './m';\nimport { c } from './nowhere';"),
            ],
            CheckerOptions::strict(),
        );
        let file = session.file_id("a.ts").unwrap();
        let diagnostics = session.check_file(file).unwrap();
        let codes: Vec<u32> = diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![2305, 2307]);
        assert!(diagnostics[0].message_text.contains("'b'"));
    }
}
