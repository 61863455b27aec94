//! Converter failures

use thiserror::Error;

/// Failure converting one parameter to or from its wire strings
///
/// The `Display` text becomes the message recorded against the parameter
/// name when a whole record is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// A scalar parameter was given more than one value.
    #[error("too many values")]
    TooManyValues,
    /// A named predicate rejected the value.
    #[error("a validation test failed: {name}")]
    PredicateFailed {
        /// Name the predicate was built with
        name: String,
    },
    /// The value is not a valid integer of the target width.
    #[error("param could not be converted to integer: {0}")]
    Integer(String),
    /// The value is not an RFC 3339 timestamp.
    #[error("param could not be marshalled to time: {0}")]
    Time(String),
    /// The value is not a recognised boolean spelling.
    #[error("could not parse into bool: '{0}'")]
    Bool(String),
    /// One element of a sequence failed to decode.
    #[error("decoding a slice element failed: {0}")]
    Element(Box<ParamError>),
    /// A sequence element did not encode to exactly one string.
    #[error("error in encoding slice internals: element produced {0} values")]
    ElementArity(usize),
}
