//! tyck_ast: syntax tree definitions shared by the parser, binder and checker.
//!
//! Trees are flat arenas of [`Node`]s addressed by [`NodeId`], which keeps
//! them `Send + Sync` and lets the checker hold node handles without
//! lifetimes.

pub mod node;
pub mod syntax_kind;
pub mod types;

pub use node::{Node, NodeArena, NodeData, SignatureData, SyntaxTree};
pub use syntax_kind::SyntaxKind;
pub use types::*;
