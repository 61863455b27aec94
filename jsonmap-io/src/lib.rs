//! jsonmap I/O - Type registry and whole-document APIs
//!
//! This crate provides the entry points applications call:
//!
//! - `TypeMapper`, the registry of root descriptors keyed by record type
//! - Whole-document unmarshal from bytes or parsed values
//! - Compact, indented and array marshalling

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod registry;

// Re-export commonly used types
pub use jsonmap_codec::{MappedField, StructMap, TypeMap};
pub use jsonmap_format::{Context, Error, MultiValidationError, Result, SchemaError};
pub use registry::TypeMapper;

/// Indentation options for [`TypeMapper::marshal_indent_with`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentOptions {
    /// Written at the start of every line after the first
    pub prefix: String,
    /// Written once per nesting level
    pub indent: String,
}

impl Default for IndentOptions {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            indent: "    ".to_string(),
        }
    }
}

impl IndentOptions {
    /// Options with the given prefix and indent
    pub fn new(prefix: impl Into<String>, indent: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            indent: indent.into(),
        }
    }
}
