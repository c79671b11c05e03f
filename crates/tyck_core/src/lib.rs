//! tyck_core: Core utilities shared by every tyck crate.
//!
//! Provides string interning, source positions and the cooperative
//! cancellation token used by long-running checks.

pub mod cancel;
pub mod intern;
pub mod text;

pub use cancel::CancellationToken;
pub use intern::{InternedString, StringInterner};
pub use text::{LineMap, TextPos, TextRange};
