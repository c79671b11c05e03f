//! The parser.
//!
//! A recursive descent parser over the scanner's token stream. Nodes are
//! appended to a [`NodeArena`]; speculative parses (arrow functions, generic
//! call arguments, function types) rewind both the scanner and the arena.

use std::sync::Arc;

use tyck_ast::node::{NodeArena, NodeData, SignatureData, SyntaxTree};
use tyck_ast::syntax_kind::SyntaxKind;
use tyck_ast::types::*;
use tyck_core::intern::StringInterner;
use tyck_core::text::TextRange;
use tyck_diagnostics::{messages, Diagnostic, DiagnosticMessage};
use tyck_scanner::{Scanner, ScannerState};

use crate::precedence::{get_binary_operator_precedence, OperatorPrecedence};

/// Maximum nesting before the parser gives up on a construct.
const MAX_RECURSION_DEPTH: u32 = 200;

/// Everything needed to rewind a speculative parse.
struct ParserState {
    scanner: ScannerState,
    arena_len: usize,
    diagnostics_len: usize,
    last_end: u32,
}

pub struct Parser {
    scanner: Scanner,
    arena: NodeArena,
    interner: StringInterner,
    file_name: String,
    text: Arc<str>,
    diagnostics: Vec<Diagnostic>,
    /// Flags stamped onto every node created, e.g. `AMBIENT` inside `declare`.
    context_flags: NodeFlags,
    /// End of the last consumed token.
    last_end: u32,
    /// `false` while parsing a `for` initializer, where `in` ends the expression.
    allow_in: bool,
    recursion_depth: u32,
    last_error_pos: Option<u32>,
}

impl Parser {
    pub fn new(file_name: &str, text: Arc<str>, interner: StringInterner) -> Self {
        let context_flags = if file_name.ends_with(".d.ts") {
            NodeFlags::AMBIENT
        } else {
            NodeFlags::NONE
        };
        Self {
            scanner: Scanner::new(file_name, text.clone()),
            arena: NodeArena::new(),
            interner,
            file_name: file_name.to_string(),
            text,
            diagnostics: Vec::new(),
            context_flags,
            last_end: 0,
            allow_in: true,
            recursion_depth: 0,
            last_error_pos: None,
        }
    }

    /// Parse the whole file.
    pub fn parse_source_file(mut self) -> SyntaxTree {
        self.scanner.skip_shebang();
        self.next_token();

        let mut statements = Vec::new();
        while self.current_token() != SyntaxKind::EndOfFileToken {
            let start = self.scanner.token_start();
            statements.push(self.parse_statement());
            if self.scanner.token_start() == start && self.current_token() != SyntaxKind::EndOfFileToken {
                self.error(&messages::DECLARATION_OR_STATEMENT_EXPECTED, &[]);
                self.skip_to_next_statement();
            }
        }

        let root = self.arena.get_mut(SyntaxTree::ROOT);
        root.range = TextRange::new(0, self.text.len() as u32);
        root.flags = self.context_flags;
        root.data = NodeData::List { elements: statements };

        let mut diagnostics = self.scanner.take_diagnostics();
        diagnostics.append(&mut self.diagnostics);
        tyck_diagnostics::sort_diagnostics(&mut diagnostics);
        SyntaxTree::new(self.file_name, self.text, self.arena.into_nodes(), self.interner, diagnostics)
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    fn current_token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    #[inline]
    fn next_token(&mut self) -> SyntaxKind {
        self.last_end = self.scanner.token_end() as u32;
        self.scanner.scan()
    }

    #[inline]
    fn token_pos(&self) -> u32 {
        self.scanner.token_start() as u32
    }

    #[inline]
    fn token_value(&self) -> &str {
        self.scanner.token_value()
    }

    #[inline]
    fn at(&self, kind: SyntaxKind) -> bool {
        self.current_token() == kind
    }

    fn optional(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.optional(kind) {
            return true;
        }
        self.error(&messages::_0_EXPECTED, &[kind.text()]);
        false
    }

    fn parse_expected_semicolon(&mut self) {
        if self.optional(SyntaxKind::SemicolonToken) {
            return;
        }
        if self.can_insert_semicolon() {
            return;
        }
        self.error(&messages::_0_EXPECTED, &[";"]);
    }

    fn can_insert_semicolon(&self) -> bool {
        matches!(
            self.current_token(),
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.scanner.has_preceding_line_break()
    }

    fn error(&mut self, message: &DiagnosticMessage, args: &[&str]) {
        let range = self.scanner.token_range();
        self.error_at(range, message, args);
    }

    /// Report an error unless one was already reported at the same position.
    fn error_at(&mut self, range: TextRange, message: &DiagnosticMessage, args: &[&str]) {
        if self.last_error_pos == Some(range.pos) {
            return;
        }
        self.last_error_pos = Some(range.pos);
        self.diagnostics
            .push(Diagnostic::with_location(self.file_name.clone(), range, message, args));
    }

    fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let state = self.save_state();
        let result = f(self);
        self.restore_state(state);
        result
    }

    /// Run a speculative parse; rewind if it returns `None` or reported errors.
    fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let state = self.save_state();
        let last_error_pos = self.last_error_pos;
        match f(self) {
            Some(result) if self.diagnostics.len() == state.diagnostics_len => Some(result),
            _ => {
                self.restore_state(state);
                self.last_error_pos = last_error_pos;
                None
            }
        }
    }

    fn save_state(&self) -> ParserState {
        ParserState {
            scanner: self.scanner.save_state(),
            arena_len: self.arena.len(),
            diagnostics_len: self.diagnostics.len(),
            last_end: self.last_end,
        }
    }

    fn restore_state(&mut self, state: ParserState) {
        self.scanner.restore_state(state.scanner);
        self.arena.truncate(state.arena_len);
        self.diagnostics.truncate(state.diagnostics_len);
        self.last_end = state.last_end;
    }

    fn next_token_is(&mut self, kind: SyntaxKind) -> bool {
        self.look_ahead(|p| p.next_token() == kind)
    }

    fn next_token_is_on_same_line(&mut self, pred: impl FnOnce(SyntaxKind) -> bool) -> bool {
        self.look_ahead(|p| {
            let kind = p.next_token();
            !p.scanner.has_preceding_line_break() && pred(kind)
        })
    }

    // ========================================================================
    // Node construction
    // ========================================================================

    /// Allocate a node spanning from `pos` to the end of the last token.
    fn finish(&mut self, kind: SyntaxKind, pos: u32, data: NodeData) -> NodeId {
        let end = self.last_end.max(pos);
        let id = self.arena.alloc(kind, TextRange::new(pos, end), data);
        self.arena.get_mut(id).flags |= self.context_flags;
        id
    }

    fn finish_with(&mut self, kind: SyntaxKind, pos: u32, data: NodeData, flags: NodeFlags, modifiers: ModifierFlags) -> NodeId {
        let id = self.finish(kind, pos, data);
        let node = self.arena.get_mut(id);
        node.flags |= flags;
        node.modifiers |= modifiers;
        id
    }

    /// A zero-width identifier standing in for something that failed to parse.
    fn missing_identifier(&mut self) -> NodeId {
        let pos = self.token_pos();
        let name = self.interner.intern("");
        let id = self.arena.alloc(SyntaxKind::Identifier, TextRange::empty(pos), NodeData::Identifier { name });
        self.arena.get_mut(id).flags |= NodeFlags::MISSING;
        id
    }

    fn enter(&mut self) -> bool {
        if self.recursion_depth >= MAX_RECURSION_DEPTH {
            self.error(&messages::EXPRESSION_EXPECTED, &[]);
            return false;
        }
        self.recursion_depth += 1;
        true
    }

    fn leave(&mut self) {
        self.recursion_depth -= 1;
    }

    // ========================================================================
    // Identifiers and names
    // ========================================================================

    /// Identifiers plus contextual keywords, which are valid identifiers.
    fn is_identifier(&self) -> bool {
        let token = self.current_token();
        token == SyntaxKind::Identifier || (token.is_keyword() && !token.is_reserved_word())
    }

    fn parse_identifier(&mut self) -> NodeId {
        if self.is_identifier() {
            return self.parse_identifier_name();
        }
        if self.current_token().is_reserved_word() {
            self.error(&messages::IDENTIFIER_EXPECTED, &[]);
            return self.parse_identifier_name();
        }
        self.error(&messages::IDENTIFIER_EXPECTED, &[]);
        self.missing_identifier()
    }

    /// Any identifier or keyword, e.g. after `.`.
    fn parse_identifier_name(&mut self) -> NodeId {
        let token = self.current_token();
        if token != SyntaxKind::Identifier && !token.is_keyword() {
            self.error(&messages::IDENTIFIER_EXPECTED, &[]);
            return self.missing_identifier();
        }
        let pos = self.token_pos();
        let name = self.interner.intern(self.token_value());
        self.next_token();
        self.finish(SyntaxKind::Identifier, pos, NodeData::Identifier { name })
    }

    fn is_property_name_start(&self) -> bool {
        let token = self.current_token();
        token == SyntaxKind::Identifier
            || token.is_keyword()
            || matches!(
                token,
                SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral | SyntaxKind::OpenBracketToken
            )
    }

    /// Identifier, string, number or computed property name.
    fn parse_property_name(&mut self) -> NodeId {
        match self.current_token() {
            SyntaxKind::StringLiteral => self.parse_string_literal(),
            SyntaxKind::NumericLiteral => self.parse_numeric_literal(),
            SyntaxKind::OpenBracketToken => {
                let pos = self.token_pos();
                self.next_token();
                let expression = self.parse_assignment_expression();
                self.expect(SyntaxKind::CloseBracketToken);
                self.finish(SyntaxKind::ComputedPropertyName, pos, NodeData::Expr { expression })
            }
            _ => self.parse_identifier_name(),
        }
    }

    fn parse_string_literal(&mut self) -> NodeId {
        let pos = self.token_pos();
        let kind = self.current_token();
        let value = self.interner.intern(self.token_value());
        self.next_token();
        self.finish(kind, pos, NodeData::StringLiteral { value })
    }

    fn parse_numeric_literal(&mut self) -> NodeId {
        let pos = self.token_pos();
        let value = parse_numeric_text(self.token_value(), self.scanner.token_flags());
        self.next_token();
        self.finish(SyntaxKind::NumericLiteral, pos, NodeData::NumericLiteral { value })
    }

    /// `A` or `A.B.C` in a type position.
    fn parse_entity_name(&mut self) -> NodeId {
        let pos = self.token_pos();
        let mut entity = self.parse_identifier();
        while self.at(SyntaxKind::DotToken) {
            self.next_token();
            let right = self.parse_identifier_name();
            entity = self.finish(SyntaxKind::QualifiedName, pos, NodeData::QualifiedName { left: entity, right });
        }
        entity
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn skip_to_next_statement(&mut self) {
        loop {
            match self.current_token() {
                SyntaxKind::EndOfFileToken
                | SyntaxKind::VarKeyword
                | SyntaxKind::LetKeyword
                | SyntaxKind::ConstKeyword
                | SyntaxKind::FunctionKeyword
                | SyntaxKind::ClassKeyword
                | SyntaxKind::InterfaceKeyword
                | SyntaxKind::EnumKeyword
                | SyntaxKind::IfKeyword
                | SyntaxKind::ForKeyword
                | SyntaxKind::WhileKeyword
                | SyntaxKind::DoKeyword
                | SyntaxKind::SwitchKeyword
                | SyntaxKind::ReturnKeyword
                | SyntaxKind::ThrowKeyword
                | SyntaxKind::TryKeyword
                | SyntaxKind::BreakKeyword
                | SyntaxKind::ContinueKeyword
                | SyntaxKind::ExportKeyword
                | SyntaxKind::ImportKeyword => return,
                SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken => {
                    self.next_token();
                    return;
                }
                _ => {
                    self.next_token();
                }
            }
        }
    }

    /// Statements up to a closing `}` (not consumed) or end of file.
    fn parse_statement_list(&mut self) -> Vec<NodeId> {
        let mut statements = Vec::new();
        while !matches!(
            self.current_token(),
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) {
            let start = self.scanner.token_start();
            statements.push(self.parse_statement());
            if self.scanner.token_start() == start {
                self.error(&messages::DECLARATION_OR_STATEMENT_EXPECTED, &[]);
                self.next_token();
            }
        }
        statements
    }

    fn parse_statement(&mut self) -> NodeId {
        if !self.enter() {
            let pos = self.token_pos();
            self.skip_to_next_statement();
            return self.finish(SyntaxKind::EmptyStatement, pos, NodeData::None);
        }
        let statement = self.parse_statement_worker();
        self.leave();
        statement
    }

    fn parse_statement_worker(&mut self) -> NodeId {
        let pos = self.token_pos();
        match self.current_token() {
            SyntaxKind::SemicolonToken => {
                self.next_token();
                self.finish(SyntaxKind::EmptyStatement, pos, NodeData::None)
            }
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::ContinueKeyword | SyntaxKind::BreakKeyword => self.parse_break_or_continue(),
            SyntaxKind::ReturnKeyword => self.parse_return_statement(),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::ThrowKeyword => self.parse_throw_statement(),
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::DebuggerKeyword => {
                self.next_token();
                self.parse_expected_semicolon();
                self.finish(SyntaxKind::DebuggerStatement, pos, NodeData::None)
            }
            SyntaxKind::ImportKeyword if !self.next_token_is(SyntaxKind::OpenParenToken) && !self.next_token_is(SyntaxKind::DotToken) => {
                self.parse_import_declaration()
            }
            SyntaxKind::ExportKeyword => self.parse_export(),
            _ if self.is_start_of_declaration() => {
                let modifiers = self.parse_modifiers();
                self.parse_declaration(pos, modifiers)
            }
            _ if self.is_identifier() && self.next_token_is(SyntaxKind::ColonToken) => self.parse_labeled_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    /// Whether the current token starts a declaration, modifiers included.
    fn is_start_of_declaration(&mut self) -> bool {
        self.look_ahead(|p| {
            loop {
                match p.current_token() {
                    SyntaxKind::VarKeyword
                    | SyntaxKind::FunctionKeyword
                    | SyntaxKind::ClassKeyword
                    | SyntaxKind::EnumKeyword => return true,
                    SyntaxKind::LetKeyword => {
                        return p.next_token_is_on_same_line(|k| {
                            k == SyntaxKind::Identifier || k.is_keyword() && !k.is_reserved_word()
                        }) || p.next_token_is(SyntaxKind::Identifier)
                    }
                    SyntaxKind::ConstKeyword => return true,
                    SyntaxKind::InterfaceKeyword | SyntaxKind::TypeKeyword => {
                        return p.next_token_is_on_same_line(|k| {
                            k == SyntaxKind::Identifier || k.is_keyword() && !k.is_reserved_word()
                        })
                    }
                    SyntaxKind::ModuleKeyword | SyntaxKind::NamespaceKeyword => {
                        return p.next_token_is_on_same_line(|k| {
                            k == SyntaxKind::Identifier
                                || k == SyntaxKind::StringLiteral
                                || k.is_keyword() && !k.is_reserved_word()
                        })
                    }
                    SyntaxKind::AbstractKeyword
                    | SyntaxKind::AsyncKeyword
                    | SyntaxKind::DeclareKeyword
                    | SyntaxKind::PublicKeyword
                    | SyntaxKind::PrivateKeyword
                    | SyntaxKind::ProtectedKeyword
                    | SyntaxKind::ReadonlyKeyword => {
                        p.next_token();
                        if p.scanner.has_preceding_line_break() {
                            return false;
                        }
                    }
                    _ => return false,
                }
            }
        })
    }

    fn parse_modifiers(&mut self) -> ModifierFlags {
        let mut flags = ModifierFlags::NONE;
        loop {
            let flag = match self.current_token() {
                SyntaxKind::ExportKeyword => ModifierFlags::EXPORT,
                SyntaxKind::DefaultKeyword if flags.contains(ModifierFlags::EXPORT) => ModifierFlags::DEFAULT,
                SyntaxKind::DeclareKeyword => ModifierFlags::AMBIENT,
                SyntaxKind::AbstractKeyword => ModifierFlags::ABSTRACT,
                SyntaxKind::AsyncKeyword => ModifierFlags::ASYNC,
                SyntaxKind::PublicKeyword => ModifierFlags::PUBLIC,
                SyntaxKind::PrivateKeyword => ModifierFlags::PRIVATE,
                SyntaxKind::ProtectedKeyword => ModifierFlags::PROTECTED,
                SyntaxKind::StaticKeyword => ModifierFlags::STATIC,
                SyntaxKind::ReadonlyKeyword => ModifierFlags::READONLY,
                SyntaxKind::ConstKeyword if self.next_token_is(SyntaxKind::EnumKeyword) => ModifierFlags::CONST,
                _ => return flags,
            };
            if !self.next_token_can_follow_modifier() {
                return flags;
            }
            flags |= flag;
            self.next_token();
        }
    }

    /// A modifier keyword is only a modifier when a name or declaration
    /// follows on the same line.
    fn next_token_can_follow_modifier(&mut self) -> bool {
        let current = self.current_token();
        self.look_ahead(|p| {
            let next = p.next_token();
            if current == SyntaxKind::ExportKeyword || current == SyntaxKind::DefaultKeyword {
                return !matches!(next, SyntaxKind::EqualsToken | SyntaxKind::EndOfFileToken);
            }
            if p.scanner.has_preceding_line_break() {
                return false;
            }
            next == SyntaxKind::Identifier
                || next.is_keyword()
                || matches!(
                    next,
                    SyntaxKind::OpenBracketToken
                        | SyntaxKind::OpenBraceToken
                        | SyntaxKind::StringLiteral
                        | SyntaxKind::NumericLiteral
                        | SyntaxKind::DotDotDotToken
                )
        })
    }

    fn parse_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeId {
        let saved_context = self.context_flags;
        if modifiers.contains(ModifierFlags::AMBIENT) {
            self.context_flags |= NodeFlags::AMBIENT;
        }
        let declaration = match self.current_token() {
            SyntaxKind::VarKeyword | SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword => {
                self.parse_variable_statement(pos, modifiers)
            }
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(pos, modifiers),
            SyntaxKind::ClassKeyword => self.parse_class_declaration(pos, modifiers),
            SyntaxKind::InterfaceKeyword => self.parse_interface_declaration(pos, modifiers),
            SyntaxKind::TypeKeyword => self.parse_type_alias_declaration(pos, modifiers),
            SyntaxKind::EnumKeyword => self.parse_enum_declaration(pos, modifiers),
            SyntaxKind::ModuleKeyword | SyntaxKind::NamespaceKeyword => self.parse_module_declaration(pos, modifiers),
            _ => {
                self.error(&messages::DECLARATION_OR_STATEMENT_EXPECTED, &[]);
                self.finish(SyntaxKind::EmptyStatement, pos, NodeData::None)
            }
        };
        self.context_flags = saved_context;
        declaration
    }

    fn parse_block(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.expect(SyntaxKind::OpenBraceToken);
        let elements = self.parse_statement_list();
        self.expect(SyntaxKind::CloseBraceToken);
        self.finish(SyntaxKind::Block, pos, NodeData::List { elements })
    }

    fn parse_variable_statement(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeId {
        let list = self.parse_variable_declaration_list();
        self.parse_expected_semicolon();
        let id = self.finish(SyntaxKind::VariableStatement, pos, NodeData::List { elements: vec![list] });
        self.arena.get_mut(id).modifiers = modifiers;
        id
    }

    fn parse_variable_declaration_list(&mut self) -> NodeId {
        let pos = self.token_pos();
        let flags = match self.current_token() {
            SyntaxKind::LetKeyword => NodeFlags::LET,
            SyntaxKind::ConstKeyword => NodeFlags::CONST,
            _ => NodeFlags::NONE,
        };
        self.next_token();
        let mut elements = Vec::new();
        loop {
            elements.push(self.parse_variable_declaration());
            if !self.optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.finish_with(
            SyntaxKind::VariableDeclarationList,
            pos,
            NodeData::List { elements },
            flags,
            ModifierFlags::NONE,
        )
    }

    fn parse_variable_declaration(&mut self) -> NodeId {
        let pos = self.token_pos();
        let name = self.parse_identifier();
        let mut flags = NodeFlags::NONE;
        if self.at(SyntaxKind::ExclamationToken) && !self.scanner.has_preceding_line_break() {
            self.next_token();
            flags |= NodeFlags::DEFINITE;
        }
        let type_annotation = self.parse_type_annotation();
        let initializer = self.parse_initializer();
        self.finish_with(
            SyntaxKind::VariableDeclaration,
            pos,
            NodeData::Variable {
                name,
                type_annotation,
                initializer,
            },
            flags,
            ModifierFlags::NONE,
        )
    }

    fn parse_type_annotation(&mut self) -> Option<NodeId> {
        if self.optional(SyntaxKind::ColonToken) {
            Some(self.parse_type())
        } else {
            None
        }
    }

    fn parse_initializer(&mut self) -> Option<NodeId> {
        if self.optional(SyntaxKind::EqualsToken) {
            Some(self.parse_assignment_expression())
        } else {
            None
        }
    }

    fn parse_expression_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        let expression = self.parse_expression();
        self.parse_expected_semicolon();
        self.finish(SyntaxKind::ExpressionStatement, pos, NodeData::Expr { expression })
    }

    fn parse_labeled_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        let label = self.parse_identifier();
        self.expect(SyntaxKind::ColonToken);
        let statement = self.parse_statement();
        self.finish(SyntaxKind::LabeledStatement, pos, NodeData::Labeled { label, statement })
    }

    fn parse_parenthesized_condition(&mut self) -> NodeId {
        self.expect(SyntaxKind::OpenParenToken);
        let condition = self.parse_expression();
        self.expect(SyntaxKind::CloseParenToken);
        condition
    }

    fn parse_if_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.next_token();
        let condition = self.parse_parenthesized_condition();
        let then_statement = self.parse_statement();
        let else_statement = if self.optional(SyntaxKind::ElseKeyword) {
            Some(self.parse_statement())
        } else {
            None
        };
        self.finish(
            SyntaxKind::IfStatement,
            pos,
            NodeData::If {
                condition,
                then_statement,
                else_statement,
            },
        )
    }

    fn parse_do_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.next_token();
        let statement = self.parse_statement();
        self.expect(SyntaxKind::WhileKeyword);
        let condition = self.parse_parenthesized_condition();
        // A semicolon after `do ... while (x)` is always optional.
        self.optional(SyntaxKind::SemicolonToken);
        self.finish(
            SyntaxKind::DoStatement,
            pos,
            NodeData::Loop {
                initializer: None,
                condition: Some(condition),
                incrementor: None,
                statement,
            },
        )
    }

    fn parse_while_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.next_token();
        let condition = self.parse_parenthesized_condition();
        let statement = self.parse_statement();
        self.finish(
            SyntaxKind::WhileStatement,
            pos,
            NodeData::Loop {
                initializer: None,
                condition: Some(condition),
                incrementor: None,
                statement,
            },
        )
    }

    fn parse_for_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.next_token();
        self.expect(SyntaxKind::OpenParenToken);

        let initializer = if self.at(SyntaxKind::SemicolonToken) {
            None
        } else {
            let saved_allow_in = std::mem::replace(&mut self.allow_in, false);
            let init = if matches!(
                self.current_token(),
                SyntaxKind::VarKeyword | SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword
            ) {
                self.parse_variable_declaration_list()
            } else {
                self.parse_expression()
            };
            self.allow_in = saved_allow_in;
            Some(init)
        };

        let (kind, condition, incrementor) = if initializer.is_some() && self.optional(SyntaxKind::OfKeyword) {
            let expression = self.parse_assignment_expression();
            (SyntaxKind::ForOfStatement, Some(expression), None)
        } else if initializer.is_some() && self.optional(SyntaxKind::InKeyword) {
            let expression = self.parse_expression();
            (SyntaxKind::ForInStatement, Some(expression), None)
        } else {
            self.expect(SyntaxKind::SemicolonToken);
            let condition = if self.at(SyntaxKind::SemicolonToken) {
                None
            } else {
                Some(self.parse_expression())
            };
            self.expect(SyntaxKind::SemicolonToken);
            let incrementor = if self.at(SyntaxKind::CloseParenToken) {
                None
            } else {
                Some(self.parse_expression())
            };
            (SyntaxKind::ForStatement, condition, incrementor)
        };
        self.expect(SyntaxKind::CloseParenToken);
        let statement = self.parse_statement();
        self.finish(
            kind,
            pos,
            NodeData::Loop {
                initializer,
                condition,
                incrementor,
                statement,
            },
        )
    }

    fn parse_break_or_continue(&mut self) -> NodeId {
        let pos = self.token_pos();
        let kind = if self.at(SyntaxKind::BreakKeyword) {
            SyntaxKind::BreakStatement
        } else {
            SyntaxKind::ContinueStatement
        };
        self.next_token();
        let label = if !self.can_insert_semicolon() && self.is_identifier() {
            Some(self.parse_identifier())
        } else {
            None
        };
        self.parse_expected_semicolon();
        self.finish(kind, pos, NodeData::Jump { label })
    }

    fn parse_return_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.next_token();
        let expression = if self.at(SyntaxKind::SemicolonToken) || self.can_insert_semicolon() {
            None
        } else {
            Some(self.parse_expression())
        };
        self.parse_expected_semicolon();
        self.finish(SyntaxKind::ReturnStatement, pos, NodeData::Return { expression })
    }

    fn parse_throw_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.next_token();
        let expression = self.parse_expression();
        self.parse_expected_semicolon();
        self.finish(SyntaxKind::ThrowStatement, pos, NodeData::Expr { expression })
    }

    fn parse_switch_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.next_token();
        let expression = self.parse_parenthesized_condition();
        let block_pos = self.token_pos();
        self.expect(SyntaxKind::OpenBraceToken);
        let mut clauses = Vec::new();
        let mut seen_default = false;
        while !matches!(
            self.current_token(),
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) {
            let clause_pos = self.token_pos();
            let (kind, expression) = if self.optional(SyntaxKind::CaseKeyword) {
                (SyntaxKind::CaseClause, Some(self.parse_expression()))
            } else if self.at(SyntaxKind::DefaultKeyword) {
                if seen_default {
                    self.error(&messages::A_DEFAULT_CLAUSE_CANNOT_APPEAR_MORE_THAN_ONCE_IN_A_SWITCH_STATEMENT, &[]);
                }
                seen_default = true;
                self.next_token();
                (SyntaxKind::DefaultClause, None)
            } else {
                self.error(&messages::_0_EXPECTED, &["case"]);
                self.skip_to_next_statement();
                continue;
            };
            self.expect(SyntaxKind::ColonToken);
            let mut statements = Vec::new();
            while !matches!(
                self.current_token(),
                SyntaxKind::CaseKeyword
                    | SyntaxKind::DefaultKeyword
                    | SyntaxKind::CloseBraceToken
                    | SyntaxKind::EndOfFileToken
            ) {
                let start = self.scanner.token_start();
                statements.push(self.parse_statement());
                if self.scanner.token_start() == start {
                    self.next_token();
                }
            }
            clauses.push(self.finish(kind, clause_pos, NodeData::CaseClause { expression, statements }));
        }
        self.expect(SyntaxKind::CloseBraceToken);
        let case_block = self.finish(SyntaxKind::CaseBlock, block_pos, NodeData::List { elements: clauses });
        self.finish(SyntaxKind::SwitchStatement, pos, NodeData::Switch { expression, case_block })
    }

    fn parse_try_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.next_token();
        let try_block = self.parse_block();
        let catch_clause = if self.at(SyntaxKind::CatchKeyword) {
            let catch_pos = self.token_pos();
            self.next_token();
            let variable = if self.optional(SyntaxKind::OpenParenToken) {
                let decl_pos = self.token_pos();
                let name = self.parse_identifier();
                let type_annotation = self.parse_type_annotation();
                self.expect(SyntaxKind::CloseParenToken);
                Some(self.finish(
                    SyntaxKind::VariableDeclaration,
                    decl_pos,
                    NodeData::Variable {
                        name,
                        type_annotation,
                        initializer: None,
                    },
                ))
            } else {
                None
            };
            let block = self.parse_block();
            Some(self.finish(SyntaxKind::CatchClause, catch_pos, NodeData::CatchClause { variable, block }))
        } else {
            None
        };
        let finally_block = if self.optional(SyntaxKind::FinallyKeyword) {
            Some(self.parse_block())
        } else {
            None
        };
        if catch_clause.is_none() && finally_block.is_none() {
            self.error(&messages::_0_EXPECTED, &["catch"]);
        }
        self.finish(
            SyntaxKind::TryStatement,
            pos,
            NodeData::Try {
                try_block,
                catch_clause,
                finally_block,
            },
        )
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn parse_function_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeId {
        self.expect(SyntaxKind::FunctionKeyword);
        let name = if self.is_identifier() {
            Some(self.parse_identifier())
        } else {
            if !modifiers.contains(ModifierFlags::DEFAULT) {
                self.error(&messages::IDENTIFIER_EXPECTED, &[]);
            }
            None
        };
        let mut sig = self.parse_signature_parts(SyntaxKind::ColonToken);
        sig.name = name;
        sig.body = self.parse_function_body_or_semicolon();
        self.finish_with(
            SyntaxKind::FunctionDeclaration,
            pos,
            NodeData::Signature(Box::new(sig)),
            NodeFlags::NONE,
            modifiers,
        )
    }

    fn parse_function_body_or_semicolon(&mut self) -> Option<NodeId> {
        if self.at(SyntaxKind::OpenBraceToken) {
            Some(self.parse_block())
        } else {
            self.parse_expected_semicolon();
            None
        }
    }

    /// Type parameters, parameter list and return annotation.
    fn parse_signature_parts(&mut self, return_token: SyntaxKind) -> SignatureData {
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameter_list();
        let return_type = if self.optional(return_token) {
            Some(self.parse_return_type())
        } else {
            None
        };
        SignatureData {
            name: None,
            type_parameters,
            parameters,
            return_type,
            body: None,
        }
    }

    fn parse_type_parameters(&mut self) -> Vec<NodeId> {
        let mut params = Vec::new();
        if !self.optional(SyntaxKind::LessThanToken) {
            return params;
        }
        loop {
            if self.at(SyntaxKind::GreaterThanToken) {
                self.error(&messages::TYPE_PARAMETER_DECLARATION_EXPECTED, &[]);
                break;
            }
            params.push(self.parse_type_parameter());
            if !self.optional(SyntaxKind::CommaToken) || self.at(SyntaxKind::GreaterThanToken) {
                break;
            }
        }
        self.expect(SyntaxKind::GreaterThanToken);
        params
    }

    fn parse_type_parameter(&mut self) -> NodeId {
        let pos = self.token_pos();
        let mut modifiers = ModifierFlags::NONE;
        loop {
            let flag = match self.current_token() {
                SyntaxKind::ConstKeyword => ModifierFlags::CONST,
                SyntaxKind::InKeyword => ModifierFlags::IN,
                SyntaxKind::OutKeyword => ModifierFlags::OUT,
                _ => break,
            };
            // `out` alone is a legal type parameter name.
            let is_modifier = self.look_ahead(|p| {
                let next = p.next_token();
                next == SyntaxKind::Identifier || next.is_keyword() && !next.is_reserved_word()
            });
            if !is_modifier {
                break;
            }
            modifiers |= flag;
            self.next_token();
        }
        let name = self.parse_identifier();
        let constraint = if self.optional(SyntaxKind::ExtendsKeyword) {
            Some(self.parse_type())
        } else {
            None
        };
        let default = if self.optional(SyntaxKind::EqualsToken) {
            Some(self.parse_type())
        } else {
            None
        };
        self.finish_with(
            SyntaxKind::TypeParameter,
            pos,
            NodeData::TypeParameter {
                name,
                constraint,
                default,
            },
            NodeFlags::NONE,
            modifiers,
        )
    }

    fn parse_parameter_list(&mut self) -> Vec<NodeId> {
        let mut params = Vec::new();
        if !self.expect(SyntaxKind::OpenParenToken) {
            return params;
        }
        while !matches!(
            self.current_token(),
            SyntaxKind::CloseParenToken | SyntaxKind::EndOfFileToken
        ) {
            let param = self.parse_parameter();
            if let Some(&previous) = params.last() {
                if self.arena.get(previous).flags.contains(NodeFlags::REST) {
                    let range = self.arena.get(previous).range;
                    self.error_at(range, &messages::A_REST_PARAMETER_MUST_BE_LAST, &[]);
                }
            }
            params.push(param);
            if !self.optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseParenToken);
        params
    }

    fn parse_parameter(&mut self) -> NodeId {
        let pos = self.token_pos();
        let mut modifiers = ModifierFlags::NONE;
        loop {
            let flag = match self.current_token() {
                SyntaxKind::PublicKeyword => ModifierFlags::PUBLIC,
                SyntaxKind::PrivateKeyword => ModifierFlags::PRIVATE,
                SyntaxKind::ProtectedKeyword => ModifierFlags::PROTECTED,
                SyntaxKind::ReadonlyKeyword => ModifierFlags::READONLY,
                _ => break,
            };
            if !self.next_token_can_follow_modifier() {
                break;
            }
            modifiers |= flag;
            self.next_token();
        }
        let mut flags = NodeFlags::NONE;
        if self.optional(SyntaxKind::DotDotDotToken) {
            flags |= NodeFlags::REST;
        }
        let name = if self.at(SyntaxKind::ThisKeyword) {
            self.parse_identifier_name()
        } else {
            self.parse_identifier()
        };
        if self.optional(SyntaxKind::QuestionToken) {
            flags |= NodeFlags::OPTIONAL;
        }
        let type_annotation = self.parse_type_annotation();
        let initializer = self.parse_initializer();
        self.finish_with(
            SyntaxKind::Parameter,
            pos,
            NodeData::Variable {
                name,
                type_annotation,
                initializer,
            },
            flags,
            modifiers,
        )
    }

    fn parse_heritage_clauses(&mut self) -> Vec<NodeId> {
        let mut clauses = Vec::new();
        while matches!(
            self.current_token(),
            SyntaxKind::ExtendsKeyword | SyntaxKind::ImplementsKeyword
        ) {
            let pos = self.token_pos();
            let token = self.current_token();
            self.next_token();
            let mut types = Vec::new();
            loop {
                let type_pos = self.token_pos();
                let expression = self.parse_entity_name_expression();
                let type_arguments = if self.at(SyntaxKind::LessThanToken) {
                    self.parse_type_argument_list()
                } else {
                    Vec::new()
                };
                types.push(self.finish(
                    SyntaxKind::ExpressionWithTypeArguments,
                    type_pos,
                    NodeData::Call {
                        expression,
                        type_arguments,
                        arguments: Vec::new(),
                    },
                ));
                if !self.optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            clauses.push(self.finish(SyntaxKind::HeritageClause, pos, NodeData::HeritageClause { token, types }));
        }
        clauses
    }

    /// `a.b.c` as an expression, for heritage clauses.
    fn parse_entity_name_expression(&mut self) -> NodeId {
        let pos = self.token_pos();
        let mut expression = self.parse_identifier();
        while self.optional(SyntaxKind::DotToken) {
            let name = self.parse_identifier_name();
            expression = self.finish(SyntaxKind::PropertyAccessExpression, pos, NodeData::Access { expression, name });
        }
        expression
    }

    fn parse_class_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeId {
        self.expect(SyntaxKind::ClassKeyword);
        let name = if self.is_identifier() && !self.at(SyntaxKind::ImplementsKeyword) {
            Some(self.parse_identifier())
        } else {
            if !modifiers.contains(ModifierFlags::DEFAULT) {
                self.error(&messages::IDENTIFIER_EXPECTED, &[]);
            }
            None
        };
        let type_parameters = self.parse_type_parameters();
        let heritage_clauses = self.parse_heritage_clauses();
        self.expect(SyntaxKind::OpenBraceToken);
        let mut members = Vec::new();
        while !matches!(
            self.current_token(),
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) {
            if self.optional(SyntaxKind::SemicolonToken) {
                continue;
            }
            let start = self.scanner.token_start();
            members.push(self.parse_class_member());
            if self.scanner.token_start() == start {
                self.error(&messages::DECLARATION_OR_STATEMENT_EXPECTED, &[]);
                self.next_token();
            }
        }
        self.expect(SyntaxKind::CloseBraceToken);
        self.finish_with(
            SyntaxKind::ClassDeclaration,
            pos,
            NodeData::ClassLike {
                name,
                type_parameters,
                heritage_clauses,
                members,
            },
            NodeFlags::NONE,
            modifiers,
        )
    }

    fn parse_member_modifiers(&mut self) -> ModifierFlags {
        let mut flags = ModifierFlags::NONE;
        loop {
            let flag = match self.current_token() {
                SyntaxKind::PublicKeyword => ModifierFlags::PUBLIC,
                SyntaxKind::PrivateKeyword => ModifierFlags::PRIVATE,
                SyntaxKind::ProtectedKeyword => ModifierFlags::PROTECTED,
                SyntaxKind::StaticKeyword => ModifierFlags::STATIC,
                SyntaxKind::ReadonlyKeyword => ModifierFlags::READONLY,
                SyntaxKind::AbstractKeyword => ModifierFlags::ABSTRACT,
                SyntaxKind::DeclareKeyword => ModifierFlags::AMBIENT,
                SyntaxKind::AsyncKeyword => ModifierFlags::ASYNC,
                _ => return flags,
            };
            if !self.next_token_can_follow_modifier() {
                return flags;
            }
            flags |= flag;
            self.next_token();
        }
    }

    fn parse_class_member(&mut self) -> NodeId {
        let pos = self.token_pos();
        let modifiers = self.parse_member_modifiers();

        if self.at(SyntaxKind::ConstructorKeyword) && self.next_token_is(SyntaxKind::OpenParenToken) {
            self.next_token();
            let mut sig = self.parse_signature_parts(SyntaxKind::ColonToken);
            sig.body = self.parse_function_body_or_semicolon();
            return self.finish_with(
                SyntaxKind::Constructor,
                pos,
                NodeData::Signature(Box::new(sig)),
                NodeFlags::NONE,
                modifiers,
            );
        }

        if let Some(accessor) = self.try_parse_accessor(pos, modifiers) {
            return accessor;
        }

        if self.at(SyntaxKind::OpenBracketToken) && self.is_index_signature() {
            return self.parse_index_signature(pos, modifiers);
        }

        let name = self.parse_property_name();
        let mut flags = NodeFlags::NONE;
        if self.optional(SyntaxKind::QuestionToken) {
            flags |= NodeFlags::OPTIONAL;
        } else if self.at(SyntaxKind::ExclamationToken) {
            self.next_token();
            flags |= NodeFlags::DEFINITE;
        }

        if matches!(
            self.current_token(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
        ) {
            let mut sig = self.parse_signature_parts(SyntaxKind::ColonToken);
            sig.name = Some(name);
            sig.body = self.parse_function_body_or_semicolon();
            return self.finish_with(
                SyntaxKind::MethodDeclaration,
                pos,
                NodeData::Signature(Box::new(sig)),
                flags,
                modifiers,
            );
        }

        let type_annotation = self.parse_type_annotation();
        let initializer = self.parse_initializer();
        self.parse_expected_semicolon();
        self.finish_with(
            SyntaxKind::PropertyDeclaration,
            pos,
            NodeData::Variable {
                name,
                type_annotation,
                initializer,
            },
            flags,
            modifiers,
        )
    }

    /// `get x() {}` / `set x(v) {}` in classes and object literals.
    fn try_parse_accessor(&mut self, pos: u32, modifiers: ModifierFlags) -> Option<NodeId> {
        let kind = match self.current_token() {
            SyntaxKind::GetKeyword => SyntaxKind::GetAccessor,
            SyntaxKind::SetKeyword => SyntaxKind::SetAccessor,
            _ => return None,
        };
        let is_accessor = self.look_ahead(|p| {
            p.next_token();
            !p.scanner.has_preceding_line_break() && p.is_property_name_start()
        });
        if !is_accessor {
            return None;
        }
        self.next_token();
        let name = self.parse_property_name();
        let mut sig = self.parse_signature_parts(SyntaxKind::ColonToken);
        sig.name = Some(name);
        sig.body = self.parse_function_body_or_semicolon();
        Some(self.finish_with(kind, pos, NodeData::Signature(Box::new(sig)), NodeFlags::NONE, modifiers))
    }

    /// `[` followed by `name :` starts an index signature.
    fn is_index_signature(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            if !p.is_identifier() {
                return false;
            }
            p.next_token() == SyntaxKind::ColonToken
        })
    }

    fn parse_index_signature(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeId {
        self.expect(SyntaxKind::OpenBracketToken);
        let param_pos = self.token_pos();
        let name = self.parse_identifier();
        let type_annotation = self.parse_type_annotation();
        let parameter = self.finish(
            SyntaxKind::Parameter,
            param_pos,
            NodeData::Variable {
                name,
                type_annotation,
                initializer: None,
            },
        );
        self.expect(SyntaxKind::CloseBracketToken);
        let return_type = self.parse_type_annotation();
        if return_type.is_none() {
            self.error(&messages::_0_EXPECTED, &[":"]);
        }
        self.parse_type_member_separator();
        let sig = SignatureData {
            parameters: vec![parameter],
            return_type,
            ..SignatureData::default()
        };
        self.finish_with(
            SyntaxKind::IndexSignature,
            pos,
            NodeData::Signature(Box::new(sig)),
            NodeFlags::NONE,
            modifiers,
        )
    }

    fn parse_interface_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeId {
        self.expect(SyntaxKind::InterfaceKeyword);
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        let heritage_clauses = self.parse_heritage_clauses();
        let members = self.parse_type_members();
        self.finish_with(
            SyntaxKind::InterfaceDeclaration,
            pos,
            NodeData::ClassLike {
                name: Some(name),
                type_parameters,
                heritage_clauses,
                members,
            },
            NodeFlags::NONE,
            modifiers,
        )
    }

    /// `{ member; member }` of an interface or type literal.
    fn parse_type_members(&mut self) -> Vec<NodeId> {
        let mut members = Vec::new();
        if !self.expect(SyntaxKind::OpenBraceToken) {
            return members;
        }
        while !matches!(
            self.current_token(),
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) {
            let start = self.scanner.token_start();
            members.push(self.parse_type_member());
            if self.scanner.token_start() == start {
                self.error(&messages::PROPERTY_ASSIGNMENT_EXPECTED, &[]);
                self.next_token();
            }
        }
        self.expect(SyntaxKind::CloseBraceToken);
        members
    }

    fn parse_type_member_separator(&mut self) {
        if !self.optional(SyntaxKind::SemicolonToken) && !self.optional(SyntaxKind::CommaToken) {
            self.parse_expected_semicolon();
        }
    }

    fn parse_type_member(&mut self) -> NodeId {
        let pos = self.token_pos();
        if matches!(
            self.current_token(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
        ) {
            let sig = self.parse_signature_parts(SyntaxKind::ColonToken);
            self.parse_type_member_separator();
            return self.finish(SyntaxKind::CallSignature, pos, NodeData::Signature(Box::new(sig)));
        }
        if self.at(SyntaxKind::NewKeyword)
            && self.look_ahead(|p| {
                matches!(
                    p.next_token(),
                    SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
                )
            })
        {
            self.next_token();
            let sig = self.parse_signature_parts(SyntaxKind::ColonToken);
            self.parse_type_member_separator();
            return self.finish(SyntaxKind::ConstructSignature, pos, NodeData::Signature(Box::new(sig)));
        }

        let mut modifiers = ModifierFlags::NONE;
        if self.at(SyntaxKind::ReadonlyKeyword) && self.next_token_can_follow_modifier() {
            self.next_token();
            modifiers |= ModifierFlags::READONLY;
        }
        if self.at(SyntaxKind::OpenBracketToken) && self.is_index_signature() {
            return self.parse_index_signature(pos, modifiers);
        }

        let name = self.parse_property_name();
        let flags = if self.optional(SyntaxKind::QuestionToken) {
            NodeFlags::OPTIONAL
        } else {
            NodeFlags::NONE
        };
        if matches!(
            self.current_token(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
        ) {
            let mut sig = self.parse_signature_parts(SyntaxKind::ColonToken);
            sig.name = Some(name);
            self.parse_type_member_separator();
            return self.finish_with(
                SyntaxKind::MethodSignature,
                pos,
                NodeData::Signature(Box::new(sig)),
                flags,
                modifiers,
            );
        }
        let type_annotation = self.parse_type_annotation();
        self.parse_type_member_separator();
        self.finish_with(
            SyntaxKind::PropertySignature,
            pos,
            NodeData::Variable {
                name,
                type_annotation,
                initializer: None,
            },
            flags,
            modifiers,
        )
    }

    fn parse_type_alias_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeId {
        self.expect(SyntaxKind::TypeKeyword);
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        self.expect(SyntaxKind::EqualsToken);
        let type_node = self.parse_type();
        self.parse_expected_semicolon();
        self.finish_with(
            SyntaxKind::TypeAliasDeclaration,
            pos,
            NodeData::TypeAlias {
                name,
                type_parameters,
                type_node,
            },
            NodeFlags::NONE,
            modifiers,
        )
    }

    fn parse_enum_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeId {
        self.expect(SyntaxKind::EnumKeyword);
        let name = self.parse_identifier();
        let mut members = Vec::new();
        if self.expect(SyntaxKind::OpenBraceToken) {
            while !matches!(
                self.current_token(),
                SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
            ) {
                let member_pos = self.token_pos();
                let member_name = self.parse_property_name();
                let initializer = self.parse_initializer();
                members.push(self.finish(
                    SyntaxKind::EnumMember,
                    member_pos,
                    NodeData::Variable {
                        name: member_name,
                        type_annotation: None,
                        initializer,
                    },
                ));
                if !self.optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            self.expect(SyntaxKind::CloseBraceToken);
        }
        self.finish_with(
            SyntaxKind::EnumDeclaration,
            pos,
            NodeData::Enum { name, members },
            NodeFlags::NONE,
            modifiers,
        )
    }

    fn parse_module_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeId {
        let flags = if self.at(SyntaxKind::NamespaceKeyword) {
            NodeFlags::NAMESPACE
        } else {
            NodeFlags::NONE
        };
        self.next_token();
        if self.at(SyntaxKind::StringLiteral) {
            let name = self.parse_string_literal();
            let body = if self.at(SyntaxKind::OpenBraceToken) {
                Some(self.parse_module_block())
            } else {
                self.parse_expected_semicolon();
                None
            };
            return self.finish_with(
                SyntaxKind::ModuleDeclaration,
                pos,
                NodeData::Module { name, body },
                flags,
                modifiers,
            );
        }
        self.parse_module_body_after_keyword(pos, flags, modifiers)
    }

    /// `A.B.C { ... }` nests one module declaration per dotted segment.
    fn parse_module_body_after_keyword(&mut self, pos: u32, flags: NodeFlags, modifiers: ModifierFlags) -> NodeId {
        let name = self.parse_identifier();
        let body = if self.at(SyntaxKind::DotToken) {
            self.next_token();
            let inner_pos = self.token_pos();
            Some(self.parse_module_body_after_keyword(inner_pos, flags, ModifierFlags::EXPORT))
        } else {
            Some(self.parse_module_block())
        };
        self.finish_with(SyntaxKind::ModuleDeclaration, pos, NodeData::Module { name, body }, flags, modifiers)
    }

    fn parse_module_block(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.expect(SyntaxKind::OpenBraceToken);
        let elements = self.parse_statement_list();
        self.expect(SyntaxKind::CloseBraceToken);
        self.finish(SyntaxKind::ModuleBlock, pos, NodeData::List { elements })
    }

    fn parse_module_specifier(&mut self) -> NodeId {
        if self.at(SyntaxKind::StringLiteral) {
            self.parse_string_literal()
        } else {
            self.error(&messages::_0_EXPECTED, &["string literal"]);
            self.missing_identifier()
        }
    }

    fn parse_import_declaration(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.expect(SyntaxKind::ImportKeyword);
        if self.at(SyntaxKind::StringLiteral) {
            let module_specifier = self.parse_string_literal();
            self.parse_expected_semicolon();
            return self.finish(
                SyntaxKind::ImportDeclaration,
                pos,
                NodeData::Import {
                    import_clause: None,
                    module_specifier,
                },
            );
        }

        let clause_pos = self.token_pos();
        let mut clause_flags = NodeFlags::NONE;
        if self.at(SyntaxKind::TypeKeyword)
            && self.look_ahead(|p| {
                let next = p.next_token();
                next == SyntaxKind::OpenBraceToken
                    || next == SyntaxKind::AsteriskToken
                    || next == SyntaxKind::Identifier && p.next_token() != SyntaxKind::CommaToken
            })
        {
            self.next_token();
            clause_flags |= NodeFlags::TYPE_ONLY;
        }
        let name = if self.is_identifier() && !self.at(SyntaxKind::FromKeyword) {
            Some(self.parse_identifier())
        } else {
            None
        };
        let named_bindings = if name.is_none() || self.optional(SyntaxKind::CommaToken) {
            match self.current_token() {
                SyntaxKind::AsteriskToken => {
                    let ns_pos = self.token_pos();
                    self.next_token();
                    self.expect(SyntaxKind::AsKeyword);
                    let local = self.parse_identifier();
                    Some(self.finish(SyntaxKind::NamespaceImport, ns_pos, NodeData::Expr { expression: local }))
                }
                SyntaxKind::OpenBraceToken => {
                    Some(self.parse_named_specifiers(SyntaxKind::NamedImports, SyntaxKind::ImportSpecifier))
                }
                _ => {
                    self.error(&messages::_0_EXPECTED, &["{"]);
                    None
                }
            }
        } else {
            None
        };
        let import_clause = self.finish_with(
            SyntaxKind::ImportClause,
            clause_pos,
            NodeData::ImportClause { name, named_bindings },
            clause_flags,
            ModifierFlags::NONE,
        );
        self.expect(SyntaxKind::FromKeyword);
        let module_specifier = self.parse_module_specifier();
        self.parse_expected_semicolon();
        self.finish(
            SyntaxKind::ImportDeclaration,
            pos,
            NodeData::Import {
                import_clause: Some(import_clause),
                module_specifier,
            },
        )
    }

    /// `{ a, b as c }` for imports and exports.
    fn parse_named_specifiers(&mut self, list_kind: SyntaxKind, specifier_kind: SyntaxKind) -> NodeId {
        let pos = self.token_pos();
        self.expect(SyntaxKind::OpenBraceToken);
        let mut elements = Vec::new();
        while !matches!(
            self.current_token(),
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) {
            let spec_pos = self.token_pos();
            let mut flags = NodeFlags::NONE;
            if self.at(SyntaxKind::TypeKeyword)
                && self.look_ahead(|p| {
                    let next = p.next_token();
                    next == SyntaxKind::Identifier || next.is_keyword() && next != SyntaxKind::AsKeyword
                })
            {
                self.next_token();
                flags |= NodeFlags::TYPE_ONLY;
            }
            let first = self.parse_identifier_name();
            let (property_name, name) = if self.optional(SyntaxKind::AsKeyword) {
                (Some(first), self.parse_identifier_name())
            } else {
                (None, first)
            };
            elements.push(self.finish_with(
                specifier_kind,
                spec_pos,
                NodeData::Specifier { property_name, name },
                flags,
                ModifierFlags::NONE,
            ));
            if !self.optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseBraceToken);
        self.finish(list_kind, pos, NodeData::List { elements })
    }

    fn parse_export(&mut self) -> NodeId {
        let pos = self.token_pos();
        let is_export_declaration = self.look_ahead(|p| {
            let next = p.next_token();
            matches!(
                next,
                SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken | SyntaxKind::EqualsToken
            ) || next == SyntaxKind::TypeKeyword && p.next_token() == SyntaxKind::OpenBraceToken
        });
        if is_export_declaration {
            self.next_token();
            if self.optional(SyntaxKind::EqualsToken) {
                let expression = self.parse_assignment_expression();
                self.parse_expected_semicolon();
                return self.finish(SyntaxKind::ExportAssignment, pos, NodeData::Expr { expression });
            }
            let mut flags = NodeFlags::NONE;
            if self.optional(SyntaxKind::TypeKeyword) {
                flags |= NodeFlags::TYPE_ONLY;
            }
            let export_clause = if self.optional(SyntaxKind::AsteriskToken) {
                None
            } else {
                Some(self.parse_named_specifiers(SyntaxKind::NamedExports, SyntaxKind::ExportSpecifier))
            };
            let module_specifier = if self.optional(SyntaxKind::FromKeyword) {
                Some(self.parse_module_specifier())
            } else {
                if export_clause.is_none() {
                    self.error(&messages::_0_EXPECTED, &["from"]);
                }
                None
            };
            self.parse_expected_semicolon();
            return self.finish_with(
                SyntaxKind::ExportDeclaration,
                pos,
                NodeData::Export {
                    export_clause,
                    module_specifier,
                },
                flags,
                ModifierFlags::NONE,
            );
        }

        let modifiers = self.parse_modifiers();
        if modifiers.contains(ModifierFlags::DEFAULT)
            && !matches!(
                self.current_token(),
                SyntaxKind::FunctionKeyword | SyntaxKind::ClassKeyword | SyntaxKind::InterfaceKeyword
            )
            && !(self.at(SyntaxKind::AbstractKeyword) && self.next_token_is(SyntaxKind::ClassKeyword))
        {
            let expression = self.parse_assignment_expression();
            self.parse_expected_semicolon();
            return self.finish_with(
                SyntaxKind::ExportAssignment,
                pos,
                NodeData::Expr { expression },
                NodeFlags::NONE,
                ModifierFlags::DEFAULT,
            );
        }
        self.parse_declaration(pos, modifiers)
    }

    // ========================================================================
    // Types
    // ========================================================================

    pub(crate) fn parse_type(&mut self) -> NodeId {
        if !self.enter() {
            return self.missing_identifier();
        }
        let ty = self.parse_type_worker(false);
        self.leave();
        ty
    }

    fn parse_type_worker(&mut self, no_conditional: bool) -> NodeId {
        if let Some(function_type) = self.try_parse_function_type() {
            return function_type;
        }
        let pos = self.token_pos();
        let check_type = self.parse_union_type();
        if !no_conditional && self.at(SyntaxKind::ExtendsKeyword) && !self.scanner.has_preceding_line_break() {
            self.next_token();
            let extends_type = self.parse_type_worker(true);
            self.expect(SyntaxKind::QuestionToken);
            let true_type = self.parse_type_worker(false);
            self.expect(SyntaxKind::ColonToken);
            let false_type = self.parse_type_worker(false);
            return self.finish(
                SyntaxKind::ConditionalType,
                pos,
                NodeData::ConditionalType {
                    check_type,
                    extends_type,
                    true_type,
                    false_type,
                },
            );
        }
        check_type
    }

    /// `(a: T) => R`, `<T>(x: T) => T` and `new (...) => T`.
    fn try_parse_function_type(&mut self) -> Option<NodeId> {
        let is_constructor = self.at(SyntaxKind::NewKeyword);
        let starts = if is_constructor {
            true
        } else {
            matches!(
                self.current_token(),
                SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
            )
        };
        if !starts {
            return None;
        }
        self.try_parse(|p| {
            let pos = p.token_pos();
            if is_constructor {
                p.next_token();
            }
            if !matches!(
                p.current_token(),
                SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
            ) {
                return None;
            }
            let type_parameters = p.parse_type_parameters();
            let parameters = p.parse_parameter_list();
            if !p.optional(SyntaxKind::EqualsGreaterThanToken) {
                return None;
            }
            let return_type = Some(p.parse_return_type());
            let kind = if is_constructor {
                SyntaxKind::ConstructorType
            } else {
                SyntaxKind::FunctionType
            };
            let sig = SignatureData {
                name: None,
                type_parameters,
                parameters,
                return_type,
                body: None,
            };
            Some(p.finish(kind, pos, NodeData::Signature(Box::new(sig))))
        })
    }

    /// Return annotation, which may be a type predicate.
    fn parse_return_type(&mut self) -> NodeId {
        let pos = self.token_pos();
        if self.at(SyntaxKind::AssertsKeyword)
            && self.next_token_is_on_same_line(|k| {
                k == SyntaxKind::Identifier || k == SyntaxKind::ThisKeyword || k.is_keyword() && !k.is_reserved_word()
            })
        {
            self.next_token();
            let parameter_name = self.parse_identifier_name();
            let type_node = if self.optional(SyntaxKind::IsKeyword) {
                Some(self.parse_type())
            } else {
                None
            };
            return self.finish_with(
                SyntaxKind::TypePredicate,
                pos,
                NodeData::TypePredicate {
                    parameter_name,
                    type_node,
                },
                NodeFlags::ASSERTS,
                ModifierFlags::NONE,
            );
        }
        if (self.is_identifier() || self.at(SyntaxKind::ThisKeyword))
            && self.next_token_is_on_same_line(|k| k == SyntaxKind::IsKeyword)
        {
            let parameter_name = self.parse_identifier_name();
            self.expect(SyntaxKind::IsKeyword);
            let type_node = Some(self.parse_type());
            return self.finish(
                SyntaxKind::TypePredicate,
                pos,
                NodeData::TypePredicate {
                    parameter_name,
                    type_node,
                },
            );
        }
        self.parse_type()
    }

    fn parse_union_type(&mut self) -> NodeId {
        self.parse_union_or_intersection(SyntaxKind::BarToken, SyntaxKind::UnionType, Self::parse_intersection_type)
    }

    fn parse_intersection_type(&mut self) -> NodeId {
        self.parse_union_or_intersection(
            SyntaxKind::AmpersandToken,
            SyntaxKind::IntersectionType,
            Self::parse_type_operator,
        )
    }

    fn parse_union_or_intersection(
        &mut self,
        operator: SyntaxKind,
        kind: SyntaxKind,
        parse_constituent: fn(&mut Self) -> NodeId,
    ) -> NodeId {
        let pos = self.token_pos();
        let leading = self.optional(operator);
        let first = parse_constituent(self);
        if !self.at(operator) {
            if leading {
                return self.finish(kind, pos, NodeData::List { elements: vec![first] });
            }
            return first;
        }
        let mut elements = vec![first];
        while self.optional(operator) {
            elements.push(parse_constituent(self));
        }
        self.finish(kind, pos, NodeData::List { elements })
    }

    fn parse_type_operator(&mut self) -> NodeId {
        let pos = self.token_pos();
        match self.current_token() {
            SyntaxKind::KeyOfKeyword | SyntaxKind::UniqueKeyword | SyntaxKind::ReadonlyKeyword => {
                let operator = self.current_token();
                self.next_token();
                let operand = self.parse_type_operator();
                self.finish(SyntaxKind::TypeOperator, pos, NodeData::Unary { operator, operand })
            }
            SyntaxKind::InferKeyword => {
                self.next_token();
                let param_pos = self.token_pos();
                let name = self.parse_identifier();
                let constraint = self.try_parse(|p| {
                    if !p.optional(SyntaxKind::ExtendsKeyword) {
                        return None;
                    }
                    let constraint = p.parse_type_worker(true);
                    // `infer U extends X ? ...` is a conditional, not a constraint.
                    (!p.at(SyntaxKind::QuestionToken)).then_some(constraint)
                });
                let type_parameter = self.finish(
                    SyntaxKind::TypeParameter,
                    param_pos,
                    NodeData::TypeParameter {
                        name,
                        constraint,
                        default: None,
                    },
                );
                self.finish(SyntaxKind::InferType, pos, NodeData::InferType { type_parameter })
            }
            _ => self.parse_postfix_type(),
        }
    }

    fn parse_postfix_type(&mut self) -> NodeId {
        let pos = self.token_pos();
        let mut ty = self.parse_non_array_type();
        while self.at(SyntaxKind::OpenBracketToken) && !self.scanner.has_preceding_line_break() {
            self.next_token();
            if self.optional(SyntaxKind::CloseBracketToken) {
                ty = self.finish(SyntaxKind::ArrayType, pos, NodeData::Expr { expression: ty });
            } else {
                let index = self.parse_type();
                self.expect(SyntaxKind::CloseBracketToken);
                ty = self.finish(
                    SyntaxKind::IndexedAccessType,
                    pos,
                    NodeData::Access {
                        expression: ty,
                        name: index,
                    },
                );
            }
        }
        ty
    }

    fn parse_non_array_type(&mut self) -> NodeId {
        let pos = self.token_pos();
        let token = self.current_token();
        match token {
            _ if token.is_type_keyword() && !self.next_token_is(SyntaxKind::DotToken) => {
                self.next_token();
                self.finish(token, pos, NodeData::None)
            }
            SyntaxKind::ThisKeyword => {
                self.next_token();
                self.finish(SyntaxKind::ThisType, pos, NodeData::None)
            }
            SyntaxKind::StringLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword => {
                let literal = self.parse_literal_expression();
                self.finish(SyntaxKind::LiteralType, pos, NodeData::Expr { expression: literal })
            }
            SyntaxKind::MinusToken
                if self.look_ahead(|p| {
                    matches!(
                        p.next_token(),
                        SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral
                    )
                }) =>
            {
                self.next_token();
                let operand = self.parse_literal_expression();
                let literal = self.finish(
                    SyntaxKind::PrefixUnaryExpression,
                    pos,
                    NodeData::Unary {
                        operator: SyntaxKind::MinusToken,
                        operand,
                    },
                );
                self.finish(SyntaxKind::LiteralType, pos, NodeData::Expr { expression: literal })
            }
            SyntaxKind::TypeOfKeyword => {
                self.next_token();
                let expression = self.parse_entity_name();
                let type_arguments = if self.at(SyntaxKind::LessThanToken) && !self.scanner.has_preceding_line_break() {
                    self.parse_type_argument_list()
                } else {
                    Vec::new()
                };
                self.finish(
                    SyntaxKind::TypeQuery,
                    pos,
                    NodeData::Call {
                        expression,
                        type_arguments,
                        arguments: Vec::new(),
                    },
                )
            }
            SyntaxKind::OpenBraceToken => {
                if self.is_mapped_type_start() {
                    self.parse_mapped_type()
                } else {
                    let elements = self.parse_type_members();
                    self.finish(SyntaxKind::TypeLiteral, pos, NodeData::List { elements })
                }
            }
            SyntaxKind::OpenBracketToken => self.parse_tuple_type(),
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let expression = self.parse_type();
                self.expect(SyntaxKind::CloseParenToken);
                self.finish(SyntaxKind::ParenthesizedType, pos, NodeData::Expr { expression })
            }
            _ if self.is_identifier() || token.is_type_keyword() => {
                let expression = self.parse_entity_name();
                let type_arguments = if self.at(SyntaxKind::LessThanToken) && !self.scanner.has_preceding_line_break() {
                    self.parse_type_argument_list()
                } else {
                    Vec::new()
                };
                self.finish(
                    SyntaxKind::TypeReference,
                    pos,
                    NodeData::Call {
                        expression,
                        type_arguments,
                        arguments: Vec::new(),
                    },
                )
            }
            _ => {
                self.error(&messages::TYPE_EXPECTED, &[]);
                self.missing_identifier()
            }
        }
    }

    fn parse_type_argument_list(&mut self) -> Vec<NodeId> {
        let mut args = Vec::new();
        self.expect(SyntaxKind::LessThanToken);
        loop {
            args.push(self.parse_type());
            if !self.optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::GreaterThanToken);
        args
    }

    fn parse_tuple_type(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.expect(SyntaxKind::OpenBracketToken);
        let mut elements = Vec::new();
        while !matches!(
            self.current_token(),
            SyntaxKind::CloseBracketToken | SyntaxKind::EndOfFileToken
        ) {
            elements.push(self.parse_tuple_element());
            if !self.optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseBracketToken);
        self.finish(SyntaxKind::TupleType, pos, NodeData::List { elements })
    }

    fn parse_tuple_element(&mut self) -> NodeId {
        let pos = self.token_pos();
        let is_named = self.look_ahead(|p| {
            p.optional(SyntaxKind::DotDotDotToken);
            if !p.is_identifier() {
                return false;
            }
            p.next_token();
            p.optional(SyntaxKind::QuestionToken);
            p.at(SyntaxKind::ColonToken)
        });
        if is_named {
            let mut flags = NodeFlags::NONE;
            if self.optional(SyntaxKind::DotDotDotToken) {
                flags |= NodeFlags::REST;
            }
            let name = self.parse_identifier();
            if self.optional(SyntaxKind::QuestionToken) {
                flags |= NodeFlags::OPTIONAL;
            }
            self.expect(SyntaxKind::ColonToken);
            let type_annotation = Some(self.parse_type());
            return self.finish_with(
                SyntaxKind::NamedTupleMember,
                pos,
                NodeData::Variable {
                    name,
                    type_annotation,
                    initializer: None,
                },
                flags,
                ModifierFlags::NONE,
            );
        }
        if self.optional(SyntaxKind::DotDotDotToken) {
            let expression = self.parse_type();
            return self.finish(SyntaxKind::RestType, pos, NodeData::Expr { expression });
        }
        let ty = self.parse_type();
        if self.optional(SyntaxKind::QuestionToken) {
            return self.finish(SyntaxKind::OptionalType, pos, NodeData::Expr { expression: ty });
        }
        ty
    }

    fn is_mapped_type_start(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            if matches!(p.current_token(), SyntaxKind::PlusToken | SyntaxKind::MinusToken) {
                return p.next_token() == SyntaxKind::ReadonlyKeyword;
            }
            if p.at(SyntaxKind::ReadonlyKeyword) {
                p.next_token();
            }
            if !p.at(SyntaxKind::OpenBracketToken) {
                return false;
            }
            p.next_token();
            if !p.is_identifier() {
                return false;
            }
            p.next_token() == SyntaxKind::InKeyword
        })
    }

    fn parse_mapped_type(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.expect(SyntaxKind::OpenBraceToken);
        let readonly_token = match self.current_token() {
            SyntaxKind::PlusToken | SyntaxKind::MinusToken => {
                let token = self.current_token();
                self.next_token();
                self.expect(SyntaxKind::ReadonlyKeyword);
                Some(token)
            }
            SyntaxKind::ReadonlyKeyword => {
                self.next_token();
                Some(SyntaxKind::ReadonlyKeyword)
            }
            _ => None,
        };
        self.expect(SyntaxKind::OpenBracketToken);
        let param_pos = self.token_pos();
        let name = self.parse_identifier();
        self.expect(SyntaxKind::InKeyword);
        let constraint = Some(self.parse_type());
        let type_parameter = self.finish(
            SyntaxKind::TypeParameter,
            param_pos,
            NodeData::TypeParameter {
                name,
                constraint,
                default: None,
            },
        );
        let name_type = if self.optional(SyntaxKind::AsKeyword) {
            Some(self.parse_type())
        } else {
            None
        };
        self.expect(SyntaxKind::CloseBracketToken);
        let question_token = match self.current_token() {
            SyntaxKind::PlusToken | SyntaxKind::MinusToken => {
                let token = self.current_token();
                self.next_token();
                self.expect(SyntaxKind::QuestionToken);
                Some(token)
            }
            SyntaxKind::QuestionToken => {
                self.next_token();
                Some(SyntaxKind::QuestionToken)
            }
            _ => None,
        };
        let type_node = self.parse_type_annotation();
        self.optional(SyntaxKind::SemicolonToken);
        self.expect(SyntaxKind::CloseBraceToken);
        self.finish(
            SyntaxKind::MappedType,
            pos,
            NodeData::MappedType {
                type_parameter,
                name_type,
                type_node,
                readonly_token,
                question_token,
            },
        )
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn parse_expression(&mut self) -> NodeId {
        let pos = self.token_pos();
        let mut expr = self.parse_assignment_expression();
        while self.optional(SyntaxKind::CommaToken) {
            let right = self.parse_assignment_expression();
            expr = self.finish(
                SyntaxKind::BinaryExpression,
                pos,
                NodeData::Binary {
                    left: expr,
                    operator: SyntaxKind::CommaToken,
                    right,
                },
            );
        }
        expr
    }

    fn parse_assignment_expression(&mut self) -> NodeId {
        if !self.enter() {
            return self.missing_identifier();
        }
        let expr = self.parse_assignment_expression_worker();
        self.leave();
        expr
    }

    fn parse_assignment_expression_worker(&mut self) -> NodeId {
        if let Some(arrow) = self.try_parse_arrow_function() {
            return arrow;
        }
        let pos = self.token_pos();
        let expr = self.parse_binary_expression(OperatorPrecedence::Lowest);
        if self.at(SyntaxKind::GreaterThanToken) {
            self.scanner.rescan_greater_than_token();
        }
        let operator = self.current_token();
        if operator.is_assignment_operator() {
            self.next_token();
            let right = self.parse_assignment_expression();
            return self.finish(
                SyntaxKind::BinaryExpression,
                pos,
                NodeData::Binary {
                    left: expr,
                    operator,
                    right,
                },
            );
        }
        if self.at(SyntaxKind::QuestionToken) {
            self.next_token();
            let saved_allow_in = std::mem::replace(&mut self.allow_in, true);
            let when_true = self.parse_assignment_expression();
            self.allow_in = saved_allow_in;
            self.expect(SyntaxKind::ColonToken);
            let when_false = self.parse_assignment_expression();
            return self.finish(
                SyntaxKind::ConditionalExpression,
                pos,
                NodeData::Conditional {
                    condition: expr,
                    when_true,
                    when_false,
                },
            );
        }
        expr
    }

    fn try_parse_arrow_function(&mut self) -> Option<NodeId> {
        let pos = self.token_pos();
        match self.current_token() {
            SyntaxKind::AsyncKeyword
                if self.next_token_is_on_same_line(|k| {
                    k == SyntaxKind::OpenParenToken || k == SyntaxKind::Identifier || k == SyntaxKind::LessThanToken
                }) =>
            {
                self.try_parse(|p| {
                    p.next_token();
                    let arrow = p.try_parse_arrow_function()?;
                    p.arena.get_mut(arrow).modifiers |= ModifierFlags::ASYNC;
                    p.arena.get_mut(arrow).range.pos = pos;
                    Some(arrow)
                })
            }
            _ if self.is_identifier() && self.next_token_is_on_same_line(|k| k == SyntaxKind::EqualsGreaterThanToken) => {
                let name = self.parse_identifier();
                let parameter = self.finish(
                    SyntaxKind::Parameter,
                    pos,
                    NodeData::Variable {
                        name,
                        type_annotation: None,
                        initializer: None,
                    },
                );
                self.expect(SyntaxKind::EqualsGreaterThanToken);
                let body = self.parse_arrow_body();
                let sig = SignatureData {
                    parameters: vec![parameter],
                    body: Some(body),
                    ..SignatureData::default()
                };
                Some(self.finish(SyntaxKind::ArrowFunction, pos, NodeData::Signature(Box::new(sig))))
            }
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken => self.try_parse(|p| {
                let type_parameters = p.parse_type_parameters();
                if !p.at(SyntaxKind::OpenParenToken) {
                    return None;
                }
                let parameters = p.parse_parameter_list();
                let return_type = if p.optional(SyntaxKind::ColonToken) {
                    Some(p.parse_return_type())
                } else {
                    None
                };
                if !p.at(SyntaxKind::EqualsGreaterThanToken) || p.scanner.has_preceding_line_break() {
                    return None;
                }
                p.next_token();
                let body = p.parse_arrow_body();
                let sig = SignatureData {
                    name: None,
                    type_parameters,
                    parameters,
                    return_type,
                    body: Some(body),
                };
                Some(p.finish(SyntaxKind::ArrowFunction, pos, NodeData::Signature(Box::new(sig))))
            }),
            _ => None,
        }
    }

    fn parse_arrow_body(&mut self) -> NodeId {
        if self.at(SyntaxKind::OpenBraceToken) {
            self.parse_block()
        } else {
            self.parse_assignment_expression()
        }
    }

    fn parse_binary_expression(&mut self, min_precedence: OperatorPrecedence) -> NodeId {
        let pos = self.token_pos();
        let mut left = self.parse_unary_expression();
        loop {
            if self.at(SyntaxKind::GreaterThanToken) {
                self.scanner.rescan_greater_than_token();
            }
            let operator = self.current_token();
            let precedence = get_binary_operator_precedence(operator, self.allow_in);
            if precedence == OperatorPrecedence::Invalid {
                break;
            }
            // `**` is right associative; everything else is left associative.
            let binds = if operator == SyntaxKind::AsteriskAsteriskToken {
                precedence >= min_precedence
            } else {
                precedence > min_precedence
            };
            if !binds {
                break;
            }
            if matches!(operator, SyntaxKind::AsKeyword | SyntaxKind::SatisfiesKeyword) {
                if self.scanner.has_preceding_line_break() {
                    break;
                }
                self.next_token();
                left = self.parse_assertion_rest(pos, left, operator);
                continue;
            }
            self.next_token();
            let right = self.parse_binary_expression(precedence);
            left = self.finish(SyntaxKind::BinaryExpression, pos, NodeData::Binary { left, operator, right });
        }
        left
    }

    fn parse_assertion_rest(&mut self, pos: u32, expression: NodeId, operator: SyntaxKind) -> NodeId {
        if operator == SyntaxKind::AsKeyword && self.at(SyntaxKind::ConstKeyword) {
            let const_pos = self.token_pos();
            self.next_token();
            let type_node = self.finish(SyntaxKind::ConstKeyword, const_pos, NodeData::None);
            return self.finish_with(
                SyntaxKind::AsExpression,
                pos,
                NodeData::Assertion { expression, type_node },
                NodeFlags::CONST_ASSERTION,
                ModifierFlags::NONE,
            );
        }
        let type_node = self.parse_type();
        let kind = if operator == SyntaxKind::AsKeyword {
            SyntaxKind::AsExpression
        } else {
            SyntaxKind::SatisfiesExpression
        };
        self.finish(kind, pos, NodeData::Assertion { expression, type_node })
    }

    fn parse_unary_expression(&mut self) -> NodeId {
        if !self.enter() {
            return self.missing_identifier();
        }
        let expr = self.parse_unary_expression_worker();
        self.leave();
        expr
    }

    fn parse_unary_expression_worker(&mut self) -> NodeId {
        let pos = self.token_pos();
        let operator = self.current_token();
        match operator {
            SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken => {
                self.next_token();
                let operand = self.parse_unary_expression();
                self.finish(SyntaxKind::PrefixUnaryExpression, pos, NodeData::Unary { operator, operand })
            }
            SyntaxKind::TypeOfKeyword | SyntaxKind::VoidKeyword | SyntaxKind::DeleteKeyword => {
                let kind = match operator {
                    SyntaxKind::TypeOfKeyword => SyntaxKind::TypeOfExpression,
                    SyntaxKind::VoidKeyword => SyntaxKind::VoidExpression,
                    _ => SyntaxKind::DeleteExpression,
                };
                self.next_token();
                let expression = self.parse_unary_expression();
                self.finish(kind, pos, NodeData::Expr { expression })
            }
            SyntaxKind::LessThanToken => {
                // Old-style `<T>expr` assertions are not supported.
                self.error(&messages::EXPRESSION_EXPECTED, &[]);
                self.next_token();
                self.missing_identifier()
            }
            _ => self.parse_postfix_expression(),
        }
    }

    fn parse_postfix_expression(&mut self) -> NodeId {
        let pos = self.token_pos();
        let expr = self.parse_left_hand_side_expression();
        let operator = self.current_token();
        if matches!(operator, SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken)
            && !self.scanner.has_preceding_line_break()
        {
            self.next_token();
            return self.finish(
                SyntaxKind::PostfixUnaryExpression,
                pos,
                NodeData::Unary { operator, operand: expr },
            );
        }
        expr
    }

    fn parse_left_hand_side_expression(&mut self) -> NodeId {
        let pos = self.token_pos();
        let mut expr = if self.at(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        loop {
            match self.current_token() {
                SyntaxKind::DotToken => {
                    self.next_token();
                    let name = self.parse_identifier_name();
                    expr = self.finish(SyntaxKind::PropertyAccessExpression, pos, NodeData::Access { expression: expr, name });
                }
                SyntaxKind::QuestionDotToken => {
                    self.next_token();
                    expr = match self.current_token() {
                        SyntaxKind::OpenBracketToken => self.parse_element_access_rest(pos, expr),
                        SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken => self.parse_call_rest(pos, expr, Vec::new()),
                        _ => {
                            let name = self.parse_identifier_name();
                            self.finish(SyntaxKind::PropertyAccessExpression, pos, NodeData::Access { expression: expr, name })
                        }
                    };
                    self.arena.get_mut(expr).flags |= NodeFlags::OPTIONAL_CHAIN;
                }
                SyntaxKind::OpenBracketToken => {
                    expr = self.parse_element_access_rest(pos, expr);
                }
                SyntaxKind::ExclamationToken if !self.scanner.has_preceding_line_break() => {
                    self.next_token();
                    expr = self.finish(SyntaxKind::NonNullExpression, pos, NodeData::Expr { expression: expr });
                }
                SyntaxKind::OpenParenToken => {
                    expr = self.parse_call_rest(pos, expr, Vec::new());
                }
                SyntaxKind::LessThanToken => match self.try_parse_type_arguments_in_expression() {
                    Some(type_arguments) => expr = self.parse_call_rest(pos, expr, type_arguments),
                    None => break,
                },
                _ => break,
            }
        }
        expr
    }

    fn parse_element_access_rest(&mut self, pos: u32, expression: NodeId) -> NodeId {
        self.expect(SyntaxKind::OpenBracketToken);
        let saved_allow_in = std::mem::replace(&mut self.allow_in, true);
        let argument = self.parse_expression();
        self.allow_in = saved_allow_in;
        self.expect(SyntaxKind::CloseBracketToken);
        self.finish(
            SyntaxKind::ElementAccessExpression,
            pos,
            NodeData::Access {
                expression,
                name: argument,
            },
        )
    }

    fn parse_call_rest(&mut self, pos: u32, expression: NodeId, mut type_arguments: Vec<NodeId>) -> NodeId {
        if type_arguments.is_empty() && self.at(SyntaxKind::LessThanToken) {
            type_arguments = self.try_parse_type_arguments_in_expression().unwrap_or_default();
        }
        let arguments = self.parse_argument_list();
        self.finish(
            SyntaxKind::CallExpression,
            pos,
            NodeData::Call {
                expression,
                type_arguments,
                arguments,
            },
        )
    }

    /// `<T, U>` followed by `(`; anything else means `<` was a comparison.
    fn try_parse_type_arguments_in_expression(&mut self) -> Option<Vec<NodeId>> {
        self.try_parse(|p| {
            if !p.optional(SyntaxKind::LessThanToken) {
                return None;
            }
            let mut args = Vec::new();
            loop {
                args.push(p.parse_type());
                if !p.optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            if !p.optional(SyntaxKind::GreaterThanToken) {
                return None;
            }
            p.at(SyntaxKind::OpenParenToken).then_some(args)
        })
    }

    fn parse_argument_list(&mut self) -> Vec<NodeId> {
        let mut args = Vec::new();
        if !self.expect(SyntaxKind::OpenParenToken) {
            return args;
        }
        let saved_allow_in = std::mem::replace(&mut self.allow_in, true);
        while !matches!(
            self.current_token(),
            SyntaxKind::CloseParenToken | SyntaxKind::EndOfFileToken
        ) {
            args.push(self.parse_argument_or_element());
            if !self.optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.allow_in = saved_allow_in;
        self.expect(SyntaxKind::CloseParenToken);
        args
    }

    fn parse_argument_or_element(&mut self) -> NodeId {
        if self.at(SyntaxKind::DotDotDotToken) {
            let pos = self.token_pos();
            self.next_token();
            let expression = self.parse_assignment_expression();
            return self.finish(SyntaxKind::SpreadElement, pos, NodeData::Expr { expression });
        }
        self.parse_assignment_expression()
    }

    fn parse_new_expression(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.expect(SyntaxKind::NewKeyword);
        let callee_pos = self.token_pos();
        let mut expression = if self.at(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        while self.optional(SyntaxKind::DotToken) {
            let name = self.parse_identifier_name();
            expression = self.finish(SyntaxKind::PropertyAccessExpression, callee_pos, NodeData::Access { expression, name });
        }
        let type_arguments = if self.at(SyntaxKind::LessThanToken) {
            self.try_parse_type_arguments_in_expression().unwrap_or_default()
        } else {
            Vec::new()
        };
        let arguments = if self.at(SyntaxKind::OpenParenToken) {
            self.parse_argument_list()
        } else {
            Vec::new()
        };
        self.finish(
            SyntaxKind::NewExpression,
            pos,
            NodeData::Call {
                expression,
                type_arguments,
                arguments,
            },
        )
    }

    fn parse_literal_expression(&mut self) -> NodeId {
        let pos = self.token_pos();
        match self.current_token() {
            SyntaxKind::NumericLiteral => self.parse_numeric_literal(),
            SyntaxKind::BigIntLiteral => {
                let text = self.interner.intern(self.token_value());
                self.next_token();
                self.finish(SyntaxKind::BigIntLiteral, pos, NodeData::BigIntLiteral { text })
            }
            SyntaxKind::StringLiteral | SyntaxKind::NoSubstitutionTemplateLiteral => self.parse_string_literal(),
            kind => {
                self.next_token();
                self.finish(kind, pos, NodeData::None)
            }
        }
    }

    fn parse_primary_expression(&mut self) -> NodeId {
        let pos = self.token_pos();
        match self.current_token() {
            SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::ThisKeyword
            | SyntaxKind::SuperKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword => self.parse_literal_expression(),
            SyntaxKind::TemplateHead => self.parse_template_expression(),
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let saved_allow_in = std::mem::replace(&mut self.allow_in, true);
                let expression = self.parse_expression();
                self.allow_in = saved_allow_in;
                self.expect(SyntaxKind::CloseParenToken);
                self.finish(SyntaxKind::ParenthesizedExpression, pos, NodeData::Expr { expression })
            }
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::FunctionKeyword => self.parse_function_expression(),
            _ if self.is_identifier() => self.parse_identifier(),
            _ => {
                self.error(&messages::EXPRESSION_EXPECTED, &[]);
                self.missing_identifier()
            }
        }
    }

    fn parse_template_expression(&mut self) -> NodeId {
        let pos = self.token_pos();
        let head = self.parse_string_literal();
        let mut spans = Vec::new();
        loop {
            let span_pos = self.token_pos();
            let expression = self.parse_expression();
            let literal_pos = self.token_pos();
            let literal_kind = if self.at(SyntaxKind::CloseBraceToken) {
                self.scanner.rescan_template_token()
            } else {
                self.error(&messages::_0_EXPECTED, &["}"]);
                SyntaxKind::TemplateTail
            };
            let value = self.interner.intern(self.token_value());
            self.next_token();
            let literal = self.finish(literal_kind, literal_pos, NodeData::StringLiteral { value });
            spans.push(self.finish(SyntaxKind::TemplateSpan, span_pos, NodeData::TemplateSpan { expression, literal }));
            if literal_kind != SyntaxKind::TemplateMiddle {
                break;
            }
        }
        self.finish(SyntaxKind::TemplateExpression, pos, NodeData::Template { head, spans })
    }

    fn parse_array_literal(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.expect(SyntaxKind::OpenBracketToken);
        let saved_allow_in = std::mem::replace(&mut self.allow_in, true);
        let mut elements = Vec::new();
        while !matches!(
            self.current_token(),
            SyntaxKind::CloseBracketToken | SyntaxKind::EndOfFileToken
        ) {
            if self.at(SyntaxKind::CommaToken) {
                let hole = self.token_pos();
                elements.push(self.finish(SyntaxKind::OmittedExpression, hole, NodeData::None));
                self.next_token();
                continue;
            }
            elements.push(self.parse_argument_or_element());
            if !self.optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.allow_in = saved_allow_in;
        self.expect(SyntaxKind::CloseBracketToken);
        self.finish(SyntaxKind::ArrayLiteralExpression, pos, NodeData::List { elements })
    }

    fn parse_object_literal(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.expect(SyntaxKind::OpenBraceToken);
        let saved_allow_in = std::mem::replace(&mut self.allow_in, true);
        let mut elements = Vec::new();
        while !matches!(
            self.current_token(),
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) {
            elements.push(self.parse_object_literal_element());
            if !self.optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.allow_in = saved_allow_in;
        self.expect(SyntaxKind::CloseBraceToken);
        self.finish(SyntaxKind::ObjectLiteralExpression, pos, NodeData::List { elements })
    }

    fn parse_object_literal_element(&mut self) -> NodeId {
        let pos = self.token_pos();
        if self.optional(SyntaxKind::DotDotDotToken) {
            let expression = self.parse_assignment_expression();
            return self.finish(SyntaxKind::SpreadAssignment, pos, NodeData::Expr { expression });
        }
        let modifiers = if self.at(SyntaxKind::AsyncKeyword) && self.next_token_can_follow_modifier() {
            self.next_token();
            ModifierFlags::ASYNC
        } else {
            ModifierFlags::NONE
        };
        if let Some(accessor) = self.try_parse_accessor(pos, modifiers) {
            return accessor;
        }
        if !self.is_property_name_start() {
            self.error(&messages::PROPERTY_ASSIGNMENT_EXPECTED, &[]);
            return self.missing_identifier();
        }
        let is_shorthand = self.is_identifier()
            && self.look_ahead(|p| {
                matches!(
                    p.next_token(),
                    SyntaxKind::CommaToken | SyntaxKind::CloseBraceToken | SyntaxKind::EqualsToken
                )
            });
        let name = self.parse_property_name();
        if is_shorthand {
            let initializer = self.parse_initializer();
            return self.finish(
                SyntaxKind::ShorthandPropertyAssignment,
                pos,
                NodeData::Variable {
                    name,
                    type_annotation: None,
                    initializer,
                },
            );
        }
        if matches!(
            self.current_token(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
        ) {
            let mut sig = self.parse_signature_parts(SyntaxKind::ColonToken);
            sig.name = Some(name);
            sig.body = Some(self.parse_block());
            return self.finish_with(
                SyntaxKind::MethodDeclaration,
                pos,
                NodeData::Signature(Box::new(sig)),
                NodeFlags::NONE,
                modifiers,
            );
        }
        self.expect(SyntaxKind::ColonToken);
        let initializer = Some(self.parse_assignment_expression());
        self.finish(
            SyntaxKind::PropertyAssignment,
            pos,
            NodeData::Variable {
                name,
                type_annotation: None,
                initializer,
            },
        )
    }

    fn parse_function_expression(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.expect(SyntaxKind::FunctionKeyword);
        let name = if self.is_identifier() {
            Some(self.parse_identifier())
        } else {
            None
        };
        let mut sig = self.parse_signature_parts(SyntaxKind::ColonToken);
        sig.name = name;
        sig.body = Some(self.parse_block());
        self.finish(SyntaxKind::FunctionExpression, pos, NodeData::Signature(Box::new(sig)))
    }
}

/// Numeric value of a numeric literal's source text.
fn parse_numeric_text(text: &str, flags: TokenFlags) -> f64 {
    let radix = if flags.contains(TokenFlags::HEX_SPECIFIER) {
        16
    } else if flags.contains(TokenFlags::BINARY_SPECIFIER) {
        2
    } else if flags.contains(TokenFlags::OCTAL_SPECIFIER) {
        8
    } else {
        return text.parse::<f64>().unwrap_or(f64::NAN);
    };
    let digits = text.get(2..).unwrap_or("");
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * radix as f64 + d as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> SyntaxTree {
        Parser::new("test.ts", Arc::from(text), StringInterner::new()).parse_source_file()
    }

    #[test]
    fn test_numeric_text() {
        assert_eq!(parse_numeric_text("0xff", TokenFlags::HEX_SPECIFIER), 255.0);
        assert_eq!(parse_numeric_text("0b101", TokenFlags::BINARY_SPECIFIER), 5.0);
        assert_eq!(parse_numeric_text("1.5e2", TokenFlags::SCIENTIFIC), 150.0);
        assert_eq!(parse_numeric_text(".5", TokenFlags::NONE), 0.5);
    }

    #[test]
    fn test_speculative_arrow_rewinds_arena() {
        let tree = parse("(a + b) * c;");
        assert!(tree.parse_diagnostics().is_empty());
        let stmt = tree.statements()[0];
        let NodeData::Expr { expression } = tree.node(stmt).data else {
            panic!("expected expression statement");
        };
        assert_eq!(tree.kind(expression), SyntaxKind::BinaryExpression);
        // Every node reachable from the root must be linked to its parent.
        for index in 1..tree.len() {
            assert!(tree.parent(NodeId(index as u32)).is_some(), "orphan node {index}");
        }
    }

    #[test]
    fn test_generic_call_versus_comparison() {
        let tree = parse("f<number>(1); a < b;");
        let first = tree.statements()[0];
        let NodeData::Expr { expression } = tree.node(first).data else {
            panic!("expected expression statement");
        };
        assert_eq!(tree.kind(expression), SyntaxKind::CallExpression);
        let second = tree.statements()[1];
        let NodeData::Expr { expression } = tree.node(second).data else {
            panic!("expected expression statement");
        };
        assert_eq!(tree.kind(expression), SyntaxKind::BinaryExpression);
    }
}
