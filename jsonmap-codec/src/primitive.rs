//! Bare values checked by a single validator

use crate::typemap::TypeMap;
use jsonmap_format::validator::{interface, Interface};
use jsonmap_format::{Context, JsonPointer, MultiValidationError, Result, SchemaError, Validator};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Descriptor running a validator directly on a value
///
/// No container shape is expected; this is the element descriptor for
/// lists and maps of scalars, and a payload descriptor for scalar
/// variable-type branches.
#[derive(Debug, Clone)]
pub struct Primitive<V> {
    validator: V,
}

impl<V: Validator> Primitive<V> {
    /// Wrap `validator` as a descriptor
    pub fn new(validator: V) -> Self {
        Self { validator }
    }
}

impl<X, V> TypeMap<X> for Primitive<V>
where
    V: Validator,
    X: Serialize + DeserializeOwned,
{
    fn decode(
        &self,
        ctx: &Context,
        path: &JsonPointer,
        data: &Value,
        dst: &mut X,
        errs: &mut MultiValidationError,
    ) -> std::result::Result<(), SchemaError> {
        let converted = match self.validator.validate(ctx, data) {
            Ok(converted) => converted,
            Err(e) => {
                errs.push(path, e.to_string());
                return Ok(());
            }
        };
        match serde_json::from_value(converted) {
            Ok(value) => *dst = value,
            Err(e) => errs.push(path, e.to_string()),
        }
        Ok(())
    }

    fn encode(&self, _ctx: &Context, src: &X) -> Result<Value> {
        Ok(serde_json::to_value(src)?)
    }
}

/// Descriptor accepting any value unchanged
pub fn passthrough() -> Primitive<Interface> {
    Primitive::new(interface())
}
