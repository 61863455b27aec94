//! jsonmap Format - Core primitives for schema-driven JSON mapping
//!
//! This crate provides the building blocks shared by the codec, the
//! registry and the parameter mapper, with no I/O dependencies:
//!
//! - Error types and the two-tier error model
//! - JSON Pointer paths and token escaping
//! - Aggregated validation errors
//! - Leaf validators
//! - The caller-supplied call context

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod pointer;
pub mod validation;
pub mod validator;

// Re-export commonly used types
pub use context::Context;
pub use error::{Error, Result, SchemaError};
pub use pointer::{escape_pointer_token, unescape_pointer_token, JsonPointer};
pub use validation::{MultiValidationError, ValidationError};
pub use validator::{BoxError, Validator};
