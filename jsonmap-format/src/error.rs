//! Error types for jsonmap

use crate::validation::MultiValidationError;
use thiserror::Error;

/// Errors returned by whole-call entry points
///
/// Data validation failures are always collected into [`Error::Validation`].
/// Schema faults ([`Error::Schema`]) indicate a bug in a schema declaration
/// or call site and are never merged with validation output.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more fields failed validation.
    #[error("{0}")]
    Validation(MultiValidationError),
    /// The top-level document is not a JSON object.
    #[error("json: cannot unmarshal, not an object")]
    NotAnObject,
    /// JSON text could not be parsed, or a value could not be serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// A field renderer failed to render its template.
    #[error("template error: {0}")]
    Template(String),
    /// The schema declaration or call site is wrong.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// A parameter mapper was handed a destination of the wrong type.
    #[error("attempting to decode into mismatched struct: expected {expected} but got {actual}")]
    Mismatch {
        /// Record type the mapper was declared for
        expected: &'static str,
        /// Record type that was supplied
        actual: String,
    },
    /// A parameter could not be encoded.
    #[error("error in encoding struct: {name}: {reason}")]
    Param {
        /// Wire name of the parameter
        name: String,
        /// Converter failure message
        reason: String,
    },
}

impl Error {
    /// Returns true if this error reports bad input rather than a schema fault.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Returns the aggregated validation errors, if any.
    pub fn validation_errors(&self) -> Option<&MultiValidationError> {
        match self {
            Error::Validation(errs) => Some(errs),
            _ => None,
        }
    }
}

impl From<MultiValidationError> for Error {
    fn from(errs: MultiValidationError) -> Self {
        Error::Validation(errs)
    }
}

/// Programmer or schema faults
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// No root descriptor is registered for the record type.
    #[error("type is not registered: {type_name}")]
    Unregistered {
        /// Rust type name of the record
        type_name: &'static str,
    },
    /// A binding refers to a record field the schema does not declare.
    #[error("no such underlying field: {field}")]
    NoSuchField {
        /// Record-field identifier that could not be resolved
        field: String,
    },
    /// Encoding met a discriminator value with no matching branch.
    #[error("variable type serialization error: invalid type identifier: '{identifier}'")]
    InvalidTypeIdentifier {
        /// Discriminator value found on the record
        identifier: String,
    },
    /// A descriptor was used in a direction it does not support.
    #[error("unsupported operation: {what}")]
    Unsupported {
        /// Description of the unsupported use
        what: String,
    },
    /// A parameter name cannot be used as an HTTP header name.
    #[error("invalid header name: {name}")]
    InvalidParameterName {
        /// Offending parameter name
        name: String,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
