//! Aggregated validation errors

use crate::pointer::JsonPointer;
use std::fmt;

/// A single validation failure at a document location
///
/// For JSON documents the path is a JSON Pointer; for parameter sets it is
/// the parameter name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    path: String,
    message: String,
}

impl ValidationError {
    /// Create a validation error
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Location of the failure
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Human-readable description
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Ordered collection of validation failures
///
/// Errors are kept in discovery order. Rendering produces a header line
/// followed by one `<path>: <message>` line per error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiValidationError {
    errors: Vec<ValidationError>,
}

impl MultiValidationError {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure at a JSON Pointer location
    pub fn push(&mut self, path: &JsonPointer, message: impl Into<String>) {
        self.errors.push(ValidationError::new(path.as_str(), message));
    }

    /// Record an already-built failure
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Append every failure from another collector, keeping order
    pub fn extend(&mut self, other: MultiValidationError) {
        self.errors.extend(other.errors);
    }

    /// Number of failures
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Check whether no failure was recorded
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Failures in discovery order
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Find the first failure recorded at a path
    pub fn get(&self, path: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.path == path)
    }

    /// `Ok(())` if empty, otherwise the collector itself
    pub fn into_result(self) -> Result<(), MultiValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for MultiValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validation Errors: \n")?;
        for error in &self.errors {
            writeln!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for MultiValidationError {}

impl IntoIterator for MultiValidationError {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_header_and_lines_in_order() {
        let mut errs = MultiValidationError::new();
        let root = JsonPointer::root();
        errs.push(&root.child("an_int"), "too large, may not be larger than 10");
        errs.push(&root.child("a_bool"), "not a boolean");

        assert_eq!(
            errs.to_string(),
            "Validation Errors: \n/an_int: too large, may not be larger than 10\n/a_bool: not a boolean\n"
        );
    }

    #[test]
    fn empty_collector_is_ok() {
        assert!(MultiValidationError::new().into_result().is_ok());
    }

    #[test]
    fn extend_keeps_discovery_order() {
        let mut first = MultiValidationError::new();
        first.add_error(ValidationError::new("count", "a validation test failed: range"));
        let mut second = MultiValidationError::new();
        second.add_error(ValidationError::new("uuid", "too many values"));
        first.extend(second);

        let paths: Vec<&str> = first.errors().iter().map(|e| e.path()).collect();
        assert_eq!(paths, vec!["count", "uuid"]);
        assert_eq!(first.get("uuid").map(|e| e.message()), Some("too many values"));
    }
}
