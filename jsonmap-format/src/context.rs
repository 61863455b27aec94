//! Caller-supplied context threaded through a decode or encode call

use serde::Serialize;
use serde_json::Value;

/// Opaque value handed unchanged to validators and field renderers
///
/// The engine never inspects the context. It exists so that dynamic
/// validators and template renderers can see request-scoped data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    value: Value,
}

impl Context {
    /// The empty context (`null`)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a context from any serializable value
    pub fn new<S: Serialize + ?Sized>(value: &S) -> serde_json::Result<Self> {
        Ok(Self {
            value: serde_json::to_value(value)?,
        })
    }

    /// Wrap an already-built JSON value
    pub fn from_value(value: Value) -> Self {
        Self { value }
    }

    /// The context as a JSON value
    pub fn as_value(&self) -> &Value {
        &self.value
    }
}

impl From<Value> for Context {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}
