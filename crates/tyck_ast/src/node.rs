//! The syntax tree: a flat arena of nodes addressed by [`NodeId`].
//!
//! Node 0 is always the `SourceFile`. Children are referenced by id and the
//! parent links are filled in once parsing finishes, so the tree is immutable
//! and freely shared across threads once built.

use std::sync::Arc;

use tyck_core::intern::{InternedString, StringInterner};
use tyck_core::text::{LineMap, TextRange};
use tyck_diagnostics::Diagnostic;

use crate::syntax_kind::SyntaxKind;
use crate::types::{ModifierFlags, NodeFlags, NodeId};

/// One node of a [`SyntaxTree`].
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: SyntaxKind,
    /// Byte offsets into the file text, leading trivia excluded.
    pub range: TextRange,
    /// `NodeId::INVALID` for the source file.
    pub parent: NodeId,
    pub flags: NodeFlags,
    pub modifiers: ModifierFlags,
    pub data: NodeData,
}

/// The kind-specific payload of a node.
///
/// Several kinds share a payload shape; the comment on each variant lists the
/// kinds that use it.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    /// Tokens, keyword types and keyword expressions, `EmptyStatement`,
    /// `DebuggerStatement`, `OmittedExpression`, `ThisType`.
    None,
    Identifier {
        name: InternedString,
    },
    /// `StringLiteral`, `NoSubstitutionTemplateLiteral` and template parts.
    StringLiteral {
        value: InternedString,
    },
    NumericLiteral {
        value: f64,
    },
    BigIntLiteral {
        text: InternedString,
    },
    QualifiedName {
        left: NodeId,
        right: NodeId,
    },
    TypeParameter {
        name: NodeId,
        constraint: Option<NodeId>,
        default: Option<NodeId>,
    },
    /// Every function-like kind: declarations, expressions, arrows, methods,
    /// constructors, accessors, call/construct/index signatures and
    /// function/constructor types.
    Signature(Box<SignatureData>),
    /// `VariableDeclaration`, `Parameter`, `PropertySignature`,
    /// `PropertyDeclaration`, `PropertyAssignment`,
    /// `ShorthandPropertyAssignment`, `EnumMember`, `NamedTupleMember`.
    Variable {
        name: NodeId,
        type_annotation: Option<NodeId>,
        initializer: Option<NodeId>,
    },
    /// `SourceFile`, `Block`, `ModuleBlock`, `CaseBlock`,
    /// `VariableDeclarationList`, `VariableStatement` (one element: the list),
    /// array and object literals, `TypeLiteral`, `TupleType`, union and
    /// intersection types, `NamedImports`, `NamedExports`.
    List {
        elements: Vec<NodeId>,
    },
    /// `PrefixUnaryExpression`, `PostfixUnaryExpression` and `TypeOperator`.
    Unary {
        operator: SyntaxKind,
        operand: NodeId,
    },
    Binary {
        left: NodeId,
        operator: SyntaxKind,
        right: NodeId,
    },
    /// `ConditionalExpression`.
    Conditional {
        condition: NodeId,
        when_true: NodeId,
        when_false: NodeId,
    },
    ConditionalType {
        check_type: NodeId,
        extends_type: NodeId,
        true_type: NodeId,
        false_type: NodeId,
    },
    /// Wrappers around a single child: parenthesized expressions and types,
    /// spread elements and assignments, `typeof`/`void`/`delete`, `!`,
    /// expression and throw statements, array/optional/rest types,
    /// computed property names, literal types, `export =`, namespace imports.
    Expr {
        expression: NodeId,
    },
    Return {
        expression: Option<NodeId>,
    },
    /// `PropertyAccessExpression` (`name` is an identifier),
    /// `ElementAccessExpression` and `IndexedAccessType`.
    Access {
        expression: NodeId,
        name: NodeId,
    },
    /// `CallExpression`, `NewExpression`, `TypeReference`,
    /// `ExpressionWithTypeArguments` and `TypeQuery`.
    Call {
        expression: NodeId,
        type_arguments: Vec<NodeId>,
        arguments: Vec<NodeId>,
    },
    /// `AsExpression` and `SatisfiesExpression`.
    Assertion {
        expression: NodeId,
        type_node: NodeId,
    },
    If {
        condition: NodeId,
        then_statement: NodeId,
        else_statement: Option<NodeId>,
    },
    /// `for`, `for-in`, `for-of`, `while` and `do`. For `for-in`/`for-of`
    /// the iterated expression sits in `condition`.
    Loop {
        initializer: Option<NodeId>,
        condition: Option<NodeId>,
        incrementor: Option<NodeId>,
        statement: NodeId,
    },
    /// `break` and `continue`.
    Jump {
        label: Option<NodeId>,
    },
    Switch {
        expression: NodeId,
        case_block: NodeId,
    },
    /// `CaseClause` and `DefaultClause`.
    CaseClause {
        expression: Option<NodeId>,
        statements: Vec<NodeId>,
    },
    Labeled {
        label: NodeId,
        statement: NodeId,
    },
    Try {
        try_block: NodeId,
        catch_clause: Option<NodeId>,
        finally_block: Option<NodeId>,
    },
    CatchClause {
        variable: Option<NodeId>,
        block: NodeId,
    },
    /// `ClassDeclaration` and `InterfaceDeclaration`.
    ClassLike {
        name: Option<NodeId>,
        type_parameters: Vec<NodeId>,
        heritage_clauses: Vec<NodeId>,
        members: Vec<NodeId>,
    },
    TypeAlias {
        name: NodeId,
        type_parameters: Vec<NodeId>,
        type_node: NodeId,
    },
    Enum {
        name: NodeId,
        members: Vec<NodeId>,
    },
    Module {
        name: NodeId,
        body: Option<NodeId>,
    },
    Import {
        import_clause: Option<NodeId>,
        module_specifier: NodeId,
    },
    ImportClause {
        name: Option<NodeId>,
        named_bindings: Option<NodeId>,
    },
    /// `ImportSpecifier` and `ExportSpecifier`.
    Specifier {
        property_name: Option<NodeId>,
        name: NodeId,
    },
    Export {
        export_clause: Option<NodeId>,
        module_specifier: Option<NodeId>,
    },
    HeritageClause {
        token: SyntaxKind,
        types: Vec<NodeId>,
    },
    TypePredicate {
        parameter_name: NodeId,
        type_node: Option<NodeId>,
    },
    MappedType {
        type_parameter: NodeId,
        name_type: Option<NodeId>,
        type_node: Option<NodeId>,
        /// `ReadonlyKeyword`, `PlusToken` or `MinusToken`.
        readonly_token: Option<SyntaxKind>,
        /// `QuestionToken`, `PlusToken` or `MinusToken`.
        question_token: Option<SyntaxKind>,
    },
    InferType {
        type_parameter: NodeId,
    },
    Template {
        head: NodeId,
        spans: Vec<NodeId>,
    },
    TemplateSpan {
        expression: NodeId,
        literal: NodeId,
    },
}

/// Shared payload of function-like nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureData {
    pub name: Option<NodeId>,
    pub type_parameters: Vec<NodeId>,
    pub parameters: Vec<NodeId>,
    pub return_type: Option<NodeId>,
    pub body: Option<NodeId>,
}

/// A parsed file.
#[derive(Debug)]
pub struct SyntaxTree {
    file_name: String,
    text: Arc<str>,
    nodes: Vec<Node>,
    interner: StringInterner,
    line_map: LineMap,
    parse_diagnostics: Vec<Diagnostic>,
}

impl SyntaxTree {
    /// Assemble a tree from parsed nodes and link every child to its parent.
    pub fn new(
        file_name: String,
        text: Arc<str>,
        nodes: Vec<Node>,
        interner: StringInterner,
        parse_diagnostics: Vec<Diagnostic>,
    ) -> Self {
        let line_map = LineMap::new(&text);
        let mut tree = SyntaxTree {
            file_name,
            text,
            nodes,
            interner,
            line_map,
            parse_diagnostics,
        };
        tree.link_parents();
        tree
    }

    fn link_parents(&mut self) {
        let mut links = Vec::with_capacity(self.nodes.len());
        for index in 0..self.nodes.len() {
            let parent = NodeId(index as u32);
            self.for_each_child(parent, |child| links.push((child, parent)));
        }
        for (child, parent) in links {
            if let Some(node) = self.nodes.get_mut(child.index()) {
                node.parent = parent;
            }
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn line_map(&self) -> &LineMap {
        &self.line_map
    }

    /// Syntax errors reported while parsing this file.
    pub fn parse_diagnostics(&self) -> &[Diagnostic] {
        &self.parse_diagnostics
    }

    /// Whether this is a declaration file (`.d.ts`).
    pub fn is_declaration_file(&self) -> bool {
        self.file_name.ends_with(".d.ts")
    }

    pub const ROOT: NodeId = NodeId(0);

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.node(id).kind
    }

    #[inline]
    pub fn range(&self, id: NodeId) -> TextRange {
        self.node(id).range
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(id).parent;
        parent.is_valid().then_some(parent)
    }

    /// Parents of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// The source text spanned by a node.
    pub fn source_text(&self, id: NodeId) -> &str {
        let range = self.range(id);
        self.text.get(range.to_range()).unwrap_or("")
    }

    /// Top-level statements of the file.
    pub fn statements(&self) -> &[NodeId] {
        self.list(Self::ROOT)
    }

    /// Interned name of an identifier node.
    pub fn name_of(&self, id: NodeId) -> Option<InternedString> {
        match &self.node(id).data {
            NodeData::Identifier { name } => Some(*name),
            NodeData::StringLiteral { value } => Some(*value),
            _ => None,
        }
    }

    /// Text of an identifier or string literal node.
    pub fn identifier_text(&self, id: NodeId) -> &str {
        self.name_of(id).map(|n| self.interner.resolve(n)).unwrap_or("")
    }

    /// Declared name of a declaration node, if it has one.
    pub fn declaration_name(&self, id: NodeId) -> Option<NodeId> {
        match &self.node(id).data {
            NodeData::Variable { name, .. }
            | NodeData::TypeParameter { name, .. }
            | NodeData::TypeAlias { name, .. }
            | NodeData::Enum { name, .. }
            | NodeData::Module { name, .. }
            | NodeData::Specifier { name, .. } => Some(*name),
            NodeData::ClassLike { name, .. } => *name,
            NodeData::Signature(sig) => sig.name,
            NodeData::ImportClause { name, .. } => *name,
            NodeData::Expr { expression } if self.kind(id) == SyntaxKind::NamespaceImport => Some(*expression),
            _ => None,
        }
    }

    /// Elements of a list-shaped node; empty for any other shape.
    pub fn list(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).data {
            NodeData::List { elements } => elements,
            NodeData::CaseClause { statements, .. } => statements,
            _ => &[],
        }
    }

    pub fn signature(&self, id: NodeId) -> Option<&SignatureData> {
        match &self.node(id).data {
            NodeData::Signature(sig) => Some(sig),
            _ => None,
        }
    }

    /// Innermost node whose range contains `pos`.
    pub fn node_at_offset(&self, pos: u32) -> Option<NodeId> {
        let mut current = Self::ROOT;
        if !self.range(current).contains_inclusive(pos) {
            return None;
        }
        loop {
            let mut next = None;
            self.for_each_child(current, |child| {
                if next.is_none() && self.range(child).contains(pos) {
                    next = Some(child);
                }
            });
            match next {
                Some(child) => current = child,
                None => return Some(current),
            }
        }
    }

    /// Visit the direct children of a node in source order.
    pub fn for_each_child(&self, id: NodeId, mut f: impl FnMut(NodeId)) {
        fn opt(n: &Option<NodeId>, f: &mut dyn FnMut(NodeId)) {
            if let Some(n) = n {
                f(*n);
            }
        }
        let f: &mut dyn FnMut(NodeId) = &mut f;
        match &self.node(id).data {
            NodeData::None
            | NodeData::Identifier { .. }
            | NodeData::StringLiteral { .. }
            | NodeData::NumericLiteral { .. }
            | NodeData::BigIntLiteral { .. } => {}
            NodeData::QualifiedName { left, right } => {
                f(*left);
                f(*right);
            }
            NodeData::TypeParameter {
                name,
                constraint,
                default,
            } => {
                f(*name);
                opt(constraint, f);
                opt(default, f);
            }
            NodeData::Signature(sig) => {
                opt(&sig.name, f);
                sig.type_parameters.iter().for_each(|&n| f(n));
                sig.parameters.iter().for_each(|&n| f(n));
                opt(&sig.return_type, f);
                opt(&sig.body, f);
            }
            NodeData::Variable {
                name,
                type_annotation,
                initializer,
            } => {
                f(*name);
                opt(type_annotation, f);
                opt(initializer, f);
            }
            NodeData::List { elements } => elements.iter().for_each(|&n| f(n)),
            NodeData::Unary { operand, .. } => f(*operand),
            NodeData::Binary { left, right, .. } => {
                f(*left);
                f(*right);
            }
            NodeData::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                f(*condition);
                f(*when_true);
                f(*when_false);
            }
            NodeData::ConditionalType {
                check_type,
                extends_type,
                true_type,
                false_type,
            } => {
                f(*check_type);
                f(*extends_type);
                f(*true_type);
                f(*false_type);
            }
            NodeData::Expr { expression } => f(*expression),
            NodeData::Return { expression } => opt(expression, f),
            NodeData::Access { expression, name } => {
                f(*expression);
                f(*name);
            }
            NodeData::Call {
                expression,
                type_arguments,
                arguments,
            } => {
                f(*expression);
                type_arguments.iter().for_each(|&n| f(n));
                arguments.iter().for_each(|&n| f(n));
            }
            NodeData::Assertion {
                expression,
                type_node,
            } => {
                f(*expression);
                f(*type_node);
            }
            NodeData::If {
                condition,
                then_statement,
                else_statement,
            } => {
                f(*condition);
                f(*then_statement);
                opt(else_statement, f);
            }
            NodeData::Loop {
                initializer,
                condition,
                incrementor,
                statement,
            } => {
                // `do` bodies precede their condition in the source.
                if self.kind(id) == SyntaxKind::DoStatement {
                    f(*statement);
                    opt(condition, f);
                } else {
                    opt(initializer, f);
                    opt(condition, f);
                    opt(incrementor, f);
                    f(*statement);
                }
            }
            NodeData::Jump { label } => opt(label, f),
            NodeData::Switch {
                expression,
                case_block,
            } => {
                f(*expression);
                f(*case_block);
            }
            NodeData::CaseClause {
                expression,
                statements,
            } => {
                opt(expression, f);
                statements.iter().for_each(|&n| f(n));
            }
            NodeData::Labeled { label, statement } => {
                f(*label);
                f(*statement);
            }
            NodeData::Try {
                try_block,
                catch_clause,
                finally_block,
            } => {
                f(*try_block);
                opt(catch_clause, f);
                opt(finally_block, f);
            }
            NodeData::CatchClause { variable, block } => {
                opt(variable, f);
                f(*block);
            }
            NodeData::ClassLike {
                name,
                type_parameters,
                heritage_clauses,
                members,
            } => {
                opt(name, f);
                type_parameters.iter().for_each(|&n| f(n));
                heritage_clauses.iter().for_each(|&n| f(n));
                members.iter().for_each(|&n| f(n));
            }
            NodeData::TypeAlias {
                name,
                type_parameters,
                type_node,
            } => {
                f(*name);
                type_parameters.iter().for_each(|&n| f(n));
                f(*type_node);
            }
            NodeData::Enum { name, members } => {
                f(*name);
                members.iter().for_each(|&n| f(n));
            }
            NodeData::Module { name, body } => {
                f(*name);
                opt(body, f);
            }
            NodeData::Import {
                import_clause,
                module_specifier,
            } => {
                opt(import_clause, f);
                f(*module_specifier);
            }
            NodeData::ImportClause {
                name,
                named_bindings,
            } => {
                opt(name, f);
                opt(named_bindings, f);
            }
            NodeData::Specifier {
                property_name,
                name,
            } => {
                opt(property_name, f);
                f(*name);
            }
            NodeData::Export {
                export_clause,
                module_specifier,
            } => {
                opt(export_clause, f);
                opt(module_specifier, f);
            }
            NodeData::HeritageClause { types, .. } => types.iter().for_each(|&n| f(n)),
            NodeData::TypePredicate {
                parameter_name,
                type_node,
            } => {
                f(*parameter_name);
                opt(type_node, f);
            }
            NodeData::MappedType {
                type_parameter,
                name_type,
                type_node,
                ..
            } => {
                f(*type_parameter);
                opt(name_type, f);
                opt(type_node, f);
            }
            NodeData::InferType { type_parameter } => f(*type_parameter),
            NodeData::Template { head, spans } => {
                f(*head);
                spans.iter().for_each(|&n| f(n));
            }
            NodeData::TemplateSpan {
                expression,
                literal,
            } => {
                f(*expression);
                f(*literal);
            }
        }
    }

    /// Collect the direct children of a node.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.for_each_child(id, |c| out.push(c));
        out
    }
}

/// Incrementally builds the node arena during parsing.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    /// Create an arena with slot 0 reserved for the source file.
    pub fn new() -> Self {
        let mut arena = NodeArena { nodes: Vec::new() };
        arena.alloc(SyntaxKind::SourceFile, TextRange::empty(0), NodeData::List { elements: Vec::new() });
        arena
    }

    pub fn alloc(&mut self, kind: SyntaxKind, range: TextRange, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            range,
            parent: NodeId::INVALID,
            flags: NodeFlags::NONE,
            modifiers: ModifierFlags::NONE,
            data,
        });
        id
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node allocated after the arena had `len` nodes. Used to
    /// rewind speculative parses.
    pub fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len.max(1));
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_tree() -> SyntaxTree {
        // `x;`
        let interner = StringInterner::new();
        let mut arena = NodeArena::new();
        let ident = arena.alloc(
            SyntaxKind::Identifier,
            TextRange::new(0, 1),
            NodeData::Identifier { name: interner.intern("x") },
        );
        let stmt = arena.alloc(
            SyntaxKind::ExpressionStatement,
            TextRange::new(0, 2),
            NodeData::Expr { expression: ident },
        );
        let root = arena.get_mut(NodeId(0));
        root.range = TextRange::new(0, 2);
        root.data = NodeData::List { elements: vec![stmt] };
        SyntaxTree::new("a.ts".into(), Arc::from("x;"), arena.into_nodes(), interner, Vec::new())
    }

    #[test]
    fn test_parents_are_linked() {
        let tree = tiny_tree();
        assert_eq!(tree.parent(NodeId(1)), Some(NodeId(2)));
        assert_eq!(tree.parent(NodeId(2)), Some(SyntaxTree::ROOT));
        assert_eq!(tree.parent(SyntaxTree::ROOT), None);
        assert_eq!(tree.ancestors(NodeId(1)).collect::<Vec<_>>(), vec![NodeId(2), NodeId(0)]);
    }

    #[test]
    fn test_node_at_offset_finds_innermost() {
        let tree = tiny_tree();
        assert_eq!(tree.node_at_offset(0), Some(NodeId(1)));
        assert_eq!(tree.kind(NodeId(1)), SyntaxKind::Identifier);
        assert_eq!(tree.identifier_text(NodeId(1)), "x");
        assert_eq!(tree.source_text(NodeId(2)), "x;");
        assert_eq!(tree.statements(), &[NodeId(2)]);
    }
}
