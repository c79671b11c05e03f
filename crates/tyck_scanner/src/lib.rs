//! tyck_scanner: converts source text into tokens for the parser.

pub mod char_codes;
pub mod scanner;

pub use scanner::{Scanner, ScannerState};
