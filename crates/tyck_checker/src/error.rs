//! Internal invariant violations. User-facing problems are diagnostics;
//! these abort the session.

use tyck_ast::types::FileId;

use crate::types::TypeId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckerError {
    #[error("type id space exhausted")]
    InternerOverflow,
    #[error("no type with id {}", .0 .0)]
    UnknownType(TypeId),
    #[error("{0} is not part of this session")]
    UnboundFile(FileId),
    #[error("type instantiation did not stabilise")]
    InstantiationDepthExceeded,
    #[error("check cancelled")]
    Cancelled,
}
