//! Type registry resolving record types to their root descriptors

use crate::IndentOptions;
use ahash::AHashMap;
use jsonmap_codec::{StructMap, TypeMap};
use jsonmap_format::{Context, Error, JsonPointer, MultiValidationError, Result, SchemaError};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::any::{type_name, Any, TypeId};
use std::sync::Arc;
use tracing::{debug, trace};

struct Entry {
    type_name: &'static str,
    /// Always an `Arc<StructMap<T>>` for the keyed `T`
    map: Box<dyn Any + Send + Sync>,
}

/// Registry of root descriptors keyed by record type
///
/// Built once at startup and shared by reference; every operation takes
/// `&self`, so one registry serves concurrent callers without locking.
///
/// ```rust,ignore
/// let mapper = TypeMapper::new()
///     .register(inner_thing_map())
///     .register(outer_thing_map());
///
/// let mut v = OuterThing::default();
/// mapper.unmarshal(&Context::empty(), br#"{"inner_thing": {}}"#, &mut v)?;
/// ```
#[derive(Default)]
pub struct TypeMapper {
    entries: AHashMap<TypeId, Entry>,
}

impl TypeMapper {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the root descriptor for `T`, replacing any earlier one
    pub fn register<T: 'static>(mut self, map: Arc<StructMap<T>>) -> Self {
        let type_name = type_name::<T>();
        self.entries.insert(
            TypeId::of::<T>(),
            Entry {
                type_name,
                map: Box::new(map),
            },
        );
        debug!(type_name, registered = self.entries.len(), "registered record type");
        self
    }

    /// Whether `T` has a root descriptor
    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered record types
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Root descriptor for `T`
    pub fn lookup<T: 'static>(&self) -> Result<&Arc<StructMap<T>>> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.map.downcast_ref::<Arc<StructMap<T>>>())
            .ok_or_else(|| {
                Error::Schema(SchemaError::Unregistered {
                    type_name: type_name::<T>(),
                })
            })
    }

    /// Parse `data` and decode it into `dst`
    ///
    /// Returns [`Error::Json`] if `data` is not JSON, [`Error::NotAnObject`]
    /// if the document is not an object, and [`Error::Validation`] listing
    /// every violation otherwise.
    pub fn unmarshal<T: 'static>(&self, ctx: &Context, data: &[u8], dst: &mut T) -> Result<()> {
        self.lookup::<T>()?;
        let value: Value = serde_json::from_slice(data)?;
        self.unmarshal_value(ctx, &value, dst)
    }

    /// Decode an already-parsed document into `dst`
    pub fn unmarshal_value<T: 'static>(&self, ctx: &Context, data: &Value, dst: &mut T) -> Result<()> {
        let map = self.lookup::<T>()?;
        trace!(type_name = type_name::<T>(), "unmarshal");
        if !data.is_object() {
            return Err(Error::NotAnObject);
        }

        let mut errs = MultiValidationError::new();
        map.decode(ctx, &JsonPointer::root(), data, dst, &mut errs)?;
        if !errs.is_empty() {
            debug!(
                type_name = type_name::<T>(),
                errors = errs.len(),
                "document rejected"
            );
            return Err(Error::Validation(errs));
        }
        Ok(())
    }

    /// Encode `src` to a JSON value
    pub fn marshal_value<T: 'static>(&self, ctx: &Context, src: &T) -> Result<Value> {
        let map = self.lookup::<T>()?;
        trace!(type_name = type_name::<T>(), "marshal");
        map.encode(ctx, src)
    }

    /// Encode `src` to compact JSON
    pub fn marshal<T: 'static>(&self, ctx: &Context, src: &T) -> Result<Vec<u8>> {
        let value = self.marshal_value(ctx, src)?;
        Ok(serde_json::to_vec(&value)?)
    }

    /// Encode a sequence of records as a JSON array
    pub fn marshal_all<'a, T, I>(&self, ctx: &Context, items: I) -> Result<Vec<u8>>
    where
        T: 'static,
        I: IntoIterator<Item = &'a T>,
    {
        let map = self.lookup::<T>()?;
        let values = items
            .into_iter()
            .map(|item| map.encode(ctx, item))
            .collect::<Result<Vec<_>>>()?;
        Ok(serde_json::to_vec(&values)?)
    }

    /// Encode `src` with one `indent` per nesting level
    ///
    /// Every line after the first starts with `prefix`.
    pub fn marshal_indent<T: 'static>(
        &self,
        ctx: &Context,
        src: &T,
        prefix: &str,
        indent: &str,
    ) -> Result<Vec<u8>> {
        let value = self.marshal_value(ctx, src)?;
        to_vec_indent(&value, prefix, indent)
    }

    /// [`TypeMapper::marshal_indent`] with options
    pub fn marshal_indent_with<T: 'static>(
        &self,
        ctx: &Context,
        src: &T,
        opts: &IndentOptions,
    ) -> Result<Vec<u8>> {
        self.marshal_indent(ctx, src, &opts.prefix, &opts.indent)
    }
}

impl std::fmt::Debug for TypeMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.entries.values().map(|e| e.type_name).collect();
        names.sort_unstable();
        f.debug_struct("TypeMapper").field("types", &names).finish()
    }
}

fn to_vec_indent<S: Serialize>(value: &S, prefix: &str, indent: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(128);
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;

    if prefix.is_empty() {
        return Ok(out);
    }
    // Raw newlines only appear between tokens; strings escape theirs.
    let mut prefixed = Vec::with_capacity(out.len());
    for byte in out {
        prefixed.push(byte);
        if byte == b'\n' {
            prefixed.extend_from_slice(prefix.as_bytes());
        }
    }
    Ok(prefixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonmap_codec::MappedField;
    use jsonmap_format::validator::string;
    use serde_json::json;

    #[derive(Debug, Default)]
    struct Named {
        name: String,
    }

    #[derive(Debug, Default)]
    struct Unregistered;

    fn mapper() -> TypeMapper {
        TypeMapper::new().register(Arc::new(StructMap::new(vec![MappedField::new(
            "name",
            "name",
            |t: &Named| &t.name,
            |t| &mut t.name,
        )
        .validator(string(1, 8))])))
    }

    #[test]
    fn test_lookup() {
        let mapper = mapper();
        assert!(mapper.contains::<Named>());
        assert!(!mapper.contains::<Unregistered>());
        assert_eq!(mapper.len(), 1);
    }

    #[test]
    fn test_unregistered_is_schema_error() {
        let mut dst = Unregistered;
        let err = mapper()
            .unmarshal(&Context::empty(), b"{}", &mut dst)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::Unregistered { .. })
        ));
        assert!(err.to_string().starts_with("type is not registered: "));
    }

    #[test]
    fn test_not_an_object() {
        let mut dst = Named::default();
        let err = mapper()
            .unmarshal(&Context::empty(), b"[1, 2, 3]", &mut dst)
            .unwrap_err();
        assert_eq!(err.to_string(), "json: cannot unmarshal, not an object");
    }

    #[test]
    fn test_indent_prefix() {
        let out = to_vec_indent(&json!({"a": [1]}), ">", "  ").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\n>  \"a\": [\n>    1\n>  ]\n>}"
        );
    }

    #[test]
    fn test_indent_keeps_escaped_newlines() {
        let out = to_vec_indent(&json!({"a": "x\ny"}), ">", "  ").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n>  \"a\": \"x\\ny\"\n>}");
    }
}
