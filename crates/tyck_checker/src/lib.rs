//! tyck_checker: types, relations, inference and narrowing.
//!
//! A [`Session`] owns every bound file of a program together with the
//! memoized results shared between threads: the type interner, declared
//! types, resolved signatures and per-file diagnostics. A [`Checker`] is a
//! cheap per-thread view that answers point queries and runs the statement
//! checks, publishing what it computes back into the session.

mod builtins;
mod calls;
mod checker;
mod declared;
mod display;
mod error;
mod expressions;
mod flow;
mod inference;
mod instantiate;
mod interner;
mod members;
mod narrowing;
mod relation;
mod resolve;
mod session;
mod signatures;
mod statements;
mod type_nodes;
pub mod types;
mod variance;

pub use builtins::parse_lib;
pub use checker::Checker;
pub use error::CheckerError;
pub use interner::{IntersectionTooComplex, TypeInterner};
pub use session::{import_specifiers, Session, SourceInput};
pub use types::{NodeRef, RelationKind, Signature, SignatureId, SignatureKind, TypeFlags, TypeId, TypeKey};
