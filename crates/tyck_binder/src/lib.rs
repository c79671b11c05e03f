//! tyck_binder: symbol tables, scopes and control flow graphs.
//!
//! The binder walks each file once, declaring symbols and merging
//! declarations that may share a name, and records the flow position of
//! every reference for narrowing. Files bind independently; [`link_files`]
//! then moves their symbols into one arena and merges script globals.

mod binder;
mod flow;
mod merge;
pub mod names;
mod scope;
mod symbol;

pub use binder::{bind_file, is_narrowable_reference, is_narrowing_expression, skip_parentheses, BoundFile, SymbolLookup};
pub use flow::{FlowGraph, FlowId, FlowKind, FlowNode};
pub use merge::{link_files, LinkedSymbols};
pub use scope::{Scope, ScopeId, ScopeKind};
pub use symbol::{Declaration, Symbol, SymbolTable};
