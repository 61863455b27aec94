//! jsonmap Codec - Descriptor tree and recursive decode/encode
//!
//! This crate provides the schema representation and the engine that walks
//! it alongside JSON values:
//!
//! - The `TypeMap` descriptor trait and wrapper descriptors
//! - Record descriptors built from ordered field bindings
//! - Sequence, map, primitive and time descriptors
//! - Discriminated-union ("variable type") dispatch
//! - Template-rendered string fields

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod map;
pub mod primitive;
pub mod renderer;
pub mod slice;
pub mod struct_map;
pub mod time;
pub mod typemap;
pub mod variable;

// Re-export commonly used types
pub use jsonmap_format::{Context, Error, JsonPointer, MultiValidationError, Result, SchemaError};

// Re-export our own types
pub use map::MapOf;
pub use primitive::{passthrough, Primitive};
pub use renderer::StringRenderer;
pub use slice::SliceOf;
pub use struct_map::{FieldBuilder, MappedField, StructMap};
pub use time::Time;
pub use typemap::{nullable, Boxed, Lazy, Nullable, TypeMap};
pub use variable::VariableType;

use serde_json::Value;

/// Decode `data` into `dst` from the document root
///
/// Validation failures are returned together as [`Error::Validation`].
pub fn decode_value<T, D>(map: &D, ctx: &Context, data: &Value, dst: &mut T) -> Result<()>
where
    D: TypeMap<T> + ?Sized,
{
    let mut errs = MultiValidationError::new();
    map.decode(ctx, &JsonPointer::root(), data, dst, &mut errs)?;
    errs.into_result().map_err(Error::Validation)
}

/// Encode `src` with `map`
pub fn encode_value<T, D>(map: &D, ctx: &Context, src: &T) -> Result<Value>
where
    D: TypeMap<T> + ?Sized,
{
    map.encode(ctx, src)
}
