//! String-keyed map descriptors

use crate::typemap::TypeMap;
use jsonmap_format::{Context, JsonPointer, MultiValidationError, Result, SchemaError};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Descriptor for a JSON object with arbitrary keys and uniform values
///
/// Maps to `BTreeMap<String, X>` or `HashMap<String, X>`. Entry errors
/// are reported under `path/<escaped key>` in document order.
#[derive(Debug, Clone)]
pub struct MapOf<D> {
    element: D,
}

impl<D> MapOf<D> {
    /// Map whose values are described by `element`
    pub fn new(element: D) -> Self {
        Self { element }
    }

    fn decode_entries<X, M>(
        &self,
        ctx: &Context,
        path: &JsonPointer,
        data: &Value,
        errs: &mut MultiValidationError,
    ) -> std::result::Result<Option<M>, SchemaError>
    where
        D: TypeMap<X>,
        X: Default,
        M: FromIterator<(String, X)>,
    {
        let object = match data.as_object() {
            Some(object) => object,
            None => {
                errs.push(path, "expected a map");
                return Ok(None);
            }
        };

        let mut entries = Vec::with_capacity(object.len());
        for (key, value) in object {
            let mut element = X::default();
            self.element
                .decode(ctx, &path.child(key), value, &mut element, errs)?;
            entries.push((key.clone(), element));
        }
        Ok(Some(entries.into_iter().collect()))
    }

    fn encode_entries<'a, X: 'a>(
        &self,
        ctx: &Context,
        entries: impl Iterator<Item = (&'a String, &'a X)>,
    ) -> Result<Value>
    where
        D: TypeMap<X>,
    {
        let mut object = Map::new();
        for (key, value) in entries {
            object.insert(key.clone(), self.element.encode(ctx, value)?);
        }
        Ok(Value::Object(object))
    }
}

impl<X, D> TypeMap<BTreeMap<String, X>> for MapOf<D>
where
    D: TypeMap<X>,
    X: Default,
{
    fn decode(
        &self,
        ctx: &Context,
        path: &JsonPointer,
        data: &Value,
        dst: &mut BTreeMap<String, X>,
        errs: &mut MultiValidationError,
    ) -> std::result::Result<(), SchemaError> {
        let decoded = self.decode_entries::<X, BTreeMap<String, X>>(ctx, path, data, errs)?;
        if let Some(decoded) = decoded {
            *dst = decoded;
        }
        Ok(())
    }

    fn encode(&self, ctx: &Context, src: &BTreeMap<String, X>) -> Result<Value> {
        self.encode_entries(ctx, src.iter())
    }
}

impl<X, D, S> TypeMap<HashMap<String, X, S>> for MapOf<D>
where
    D: TypeMap<X>,
    X: Default,
    S: BuildHasher + Default,
{
    fn decode(
        &self,
        ctx: &Context,
        path: &JsonPointer,
        data: &Value,
        dst: &mut HashMap<String, X, S>,
        errs: &mut MultiValidationError,
    ) -> std::result::Result<(), SchemaError> {
        let decoded = self.decode_entries::<X, HashMap<String, X, S>>(ctx, path, data, errs)?;
        if let Some(decoded) = decoded {
            *dst = decoded;
        }
        Ok(())
    }

    fn encode(&self, ctx: &Context, src: &HashMap<String, X, S>) -> Result<Value> {
        self.encode_entries(ctx, src.iter())
    }
}
