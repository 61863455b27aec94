//! Discriminated unions selected by a sibling field

use crate::typemap::TypeMap;
use ahash::AHashMap;
use jsonmap_format::{Context, JsonPointer, MultiValidationError, Result, SchemaError};
use serde_json::Value;
use tracing::trace;

/// One payload shape of a variable type
trait Branch<F>: Send + Sync {
    /// Decode a fresh payload; `None` if the payload failed validation
    fn decode(
        &self,
        ctx: &Context,
        path: &JsonPointer,
        data: &Value,
        errs: &mut MultiValidationError,
    ) -> std::result::Result<Option<F>, SchemaError>;

    fn encode(&self, ctx: &Context, src: &F) -> Result<Value>;
}

struct VariantBranch<F, X, D> {
    map: D,
    wrap: fn(X) -> F,
    project: fn(&F) -> Option<&X>,
}

impl<F, X, D> Branch<F> for VariantBranch<F, X, D>
where
    D: TypeMap<X>,
    X: Default,
{
    fn decode(
        &self,
        ctx: &Context,
        path: &JsonPointer,
        data: &Value,
        errs: &mut MultiValidationError,
    ) -> std::result::Result<Option<F>, SchemaError> {
        let before = errs.len();
        let mut payload = X::default();
        self.map.decode(ctx, path, data, &mut payload, errs)?;
        Ok((errs.len() == before).then(|| (self.wrap)(payload)))
    }

    fn encode(&self, ctx: &Context, src: &F) -> Result<Value> {
        match (self.project)(src) {
            Some(payload) => self.map.encode(ctx, payload),
            None => Ok(Value::Null),
        }
    }
}

/// Descriptor for a field whose shape depends on a discriminator
///
/// The discriminator is another field of the same record, named by its
/// record-field identifier, and must be declared before the variable field.
/// Each branch maps one discriminator value to a descriptor plus a
/// constructor into, and a projection out of, the caller's sum type `F`.
///
/// ```rust,ignore
/// VariableType::new("inner_type")
///     .branch("foo", inner_thing_map(), Inner::Foo, |v| match v {
///         Inner::Foo(x) => Some(x),
///         _ => None,
///     })
/// ```
pub struct VariableType<F> {
    discriminator: &'static str,
    conceal: bool,
    branches: AHashMap<String, Box<dyn Branch<F>>>,
}

impl<F: 'static> VariableType<F> {
    /// Dispatch on the record field identified by `discriminator`
    pub fn new(discriminator: &'static str) -> Self {
        Self {
            discriminator,
            conceal: false,
            branches: AHashMap::new(),
        }
    }

    /// Map a discriminator value to a payload shape
    pub fn branch<X, D>(
        mut self,
        identifier: impl Into<String>,
        map: D,
        wrap: fn(X) -> F,
        project: fn(&F) -> Option<&X>,
    ) -> Self
    where
        D: TypeMap<X> + 'static,
        X: Default + 'static,
    {
        self.branches.insert(
            identifier.into(),
            Box::new(VariantBranch { map, wrap, project }),
        );
        self
    }
}

impl<F> VariableType<F> {
    /// Report unknown identifiers without naming the discriminator or its value
    ///
    /// Use when the discriminator is not part of the wire representation.
    /// The pending-error check on the discriminator is skipped as well.
    pub fn conceal_identifier(mut self) -> Self {
        self.conceal = true;
        self
    }

    /// Record-field identifier of the discriminator
    pub fn discriminator(&self) -> &'static str {
        self.discriminator
    }

    /// Whether identifiers are left out of error messages
    pub fn conceals_identifier(&self) -> bool {
        self.conceal
    }

    /// Known discriminator values
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.branches.keys().map(String::as_str)
    }

    pub(crate) fn decode_variant(
        &self,
        ctx: &Context,
        path: &JsonPointer,
        identifier: &str,
        data: &Value,
        dst: &mut F,
        errs: &mut MultiValidationError,
    ) -> std::result::Result<(), SchemaError> {
        trace!(identifier, path = %path, "variable type dispatch");
        match self.branches.get(identifier) {
            Some(branch) => {
                if let Some(payload) = branch.decode(ctx, path, data, errs)? {
                    *dst = payload;
                }
            }
            None if self.conceal => errs.push(path, "invalid type identifier"),
            None => errs.push(path, format!("invalid type identifier: '{identifier}'")),
        }
        Ok(())
    }

    pub(crate) fn encode_variant(&self, ctx: &Context, identifier: &str, src: &F) -> Result<Value> {
        let branch = self
            .branches
            .get(identifier)
            .ok_or_else(|| SchemaError::InvalidTypeIdentifier {
                identifier: identifier.to_string(),
            })?;
        branch.encode(ctx, src)
    }
}
