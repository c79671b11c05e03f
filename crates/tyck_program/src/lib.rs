//! tyck_program: the driver that turns files on disk into a checked program.
//!
//! A [`Program`] collects sources, from memory, from paths or from a project
//! file, then [`Program::check`] parses them in parallel, wires relative
//! imports between them and runs one checking session over the lot.

mod discover;
mod error;
mod program;
mod resolve;

pub use discover::discover_source_files;
pub use error::ProgramError;
pub use program::{CheckReport, Program};
pub use resolve::ModuleResolver;
