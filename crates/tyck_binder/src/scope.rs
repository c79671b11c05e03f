//! Lexical scopes.

use tyck_ast::types::{NodeId, SymbolId};

use crate::symbol::SymbolTable;

/// Index of a scope within its file's scope arena.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ScopeId(pub u32);

impl ScopeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ScopeKind {
    /// A script file: its locals are program globals.
    Global,
    /// A module file.
    Module,
    /// `namespace` / `module` body.
    Namespace,
    /// Function-likes: parameters, type parameters and body declarations.
    Function,
    /// Blocks, `for` heads, `catch` clauses and `switch` blocks.
    Block,
    /// Type parameters of classes, interfaces and type aliases.
    TypeParameters,
    /// Mapped type key parameter and conditional type `infer` parameters.
    Type,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    /// The enclosing scope; `None` for the file scope.
    pub parent: Option<ScopeId>,
    /// The node that opened the scope.
    pub node: NodeId,
    /// The symbol the scope belongs to, for namespaces.
    pub container: Option<SymbolId>,
    pub locals: SymbolTable,
}

impl Scope {
    pub fn new(kind: ScopeKind, parent: Option<ScopeId>, node: NodeId) -> Self {
        Self {
            kind,
            parent,
            node,
            container: None,
            locals: SymbolTable::new(),
        }
    }

    /// Whether `var` and function declarations stop at this scope.
    pub fn is_function_boundary(&self) -> bool {
        matches!(
            self.kind,
            ScopeKind::Global | ScopeKind::Module | ScopeKind::Namespace | ScopeKind::Function
        )
    }
}
