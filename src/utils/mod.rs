//! Generic utility primitives with zero domain knowledge.
//!
//! - `command` - External process execution with captured output
//! - `io` - File I/O with consistent error handling
//! - `parser` - Literal and regex text replacement
//! - `validation` - Input validation helpers

pub mod command;
pub mod io;
pub mod parser;
pub mod validation;
