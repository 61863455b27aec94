//! The descriptor trait and its wrapper descriptors

use jsonmap_format::{Context, JsonPointer, MultiValidationError, Result, SchemaError};
use serde_json::Value;
use std::sync::{Arc, OnceLock};

/// Describes how a JSON subtree maps to and from a value of type `T`
///
/// Descriptors compose into a tree mirroring the record shape. Decoding
/// walks the tree together with a JSON value and writes into an existing
/// destination; encoding walks it together with a source value and builds
/// a JSON value.
///
/// Data errors are pushed onto `errs` at their path and never stop
/// processing of siblings. A returned [`SchemaError`] is a fault in the
/// schema itself and aborts the call.
pub trait TypeMap<T>: Send + Sync {
    /// Decode `data` into `dst`, recording validation failures under `path`
    fn decode(
        &self,
        ctx: &Context,
        path: &JsonPointer,
        data: &Value,
        dst: &mut T,
        errs: &mut MultiValidationError,
    ) -> std::result::Result<(), SchemaError>;

    /// Encode `src` into a JSON value
    fn encode(&self, ctx: &Context, src: &T) -> Result<Value>;
}

impl<T, D> TypeMap<T> for Arc<D>
where
    D: TypeMap<T> + ?Sized,
{
    fn decode(
        &self,
        ctx: &Context,
        path: &JsonPointer,
        data: &Value,
        dst: &mut T,
        errs: &mut MultiValidationError,
    ) -> std::result::Result<(), SchemaError> {
        (**self).decode(ctx, path, data, dst, errs)
    }

    fn encode(&self, ctx: &Context, src: &T) -> Result<Value> {
        (**self).encode(ctx, src)
    }
}

/// Lifts a descriptor for `X` to `Option<X>`
///
/// `null` decodes to `None` and `None` encodes to `null`.
#[derive(Debug, Clone)]
pub struct Nullable<D>(pub D);

impl<X, D> TypeMap<Option<X>> for Nullable<D>
where
    D: TypeMap<X>,
    X: Default,
{
    fn decode(
        &self,
        ctx: &Context,
        path: &JsonPointer,
        data: &Value,
        dst: &mut Option<X>,
        errs: &mut MultiValidationError,
    ) -> std::result::Result<(), SchemaError> {
        if data.is_null() {
            *dst = None;
            return Ok(());
        }
        let mut inner = dst.take().unwrap_or_default();
        self.0.decode(ctx, path, data, &mut inner, errs)?;
        *dst = Some(inner);
        Ok(())
    }

    fn encode(&self, ctx: &Context, src: &Option<X>) -> Result<Value> {
        match src {
            Some(inner) => self.0.encode(ctx, inner),
            None => Ok(Value::Null),
        }
    }
}

/// Wrap a descriptor so it maps `Option<X>`
pub fn nullable<D>(map: D) -> Nullable<D> {
    Nullable(map)
}

/// Lifts a descriptor for `X` to `Box<X>`
#[derive(Debug, Clone)]
pub struct Boxed<D>(pub D);

impl<X, D> TypeMap<Box<X>> for Boxed<D>
where
    D: TypeMap<X>,
{
    fn decode(
        &self,
        ctx: &Context,
        path: &JsonPointer,
        data: &Value,
        dst: &mut Box<X>,
        errs: &mut MultiValidationError,
    ) -> std::result::Result<(), SchemaError> {
        self.0.decode(ctx, path, data, dst.as_mut(), errs)
    }

    fn encode(&self, ctx: &Context, src: &Box<X>) -> Result<Value> {
        self.0.encode(ctx, src.as_ref())
    }
}

/// Descriptor resolved on first use
///
/// Lets a record shape refer to itself: the schema function may embed a
/// `Lazy` pointing back at itself without recursing at construction.
///
/// `init` must hand out one shared instance (e.g. a clone from a
/// `static OnceLock<Arc<_>>`). A fresh descriptor per call would itself
/// hold a fresh unresolved `Lazy`, so every nesting level decoded would
/// build and keep another copy of the schema.
///
/// ```rust,ignore
/// static NODE: OnceLock<Arc<StructMap<Node>>> = OnceLock::new();
///
/// fn node_map() -> Arc<StructMap<Node>> {
///     NODE.get_or_init(|| Arc::new(StructMap::new(vec![
///         MappedField::new("children", "children", |n: &Node| &n.children, |n| &mut n.children)
///             .contains(SliceOf::new(Lazy::new(|| node_map() as Arc<dyn TypeMap<Node>>))),
///     ])))
///     .clone()
/// }
/// ```
pub struct Lazy<T: 'static> {
    init: fn() -> Arc<dyn TypeMap<T>>,
    cell: OnceLock<Arc<dyn TypeMap<T>>>,
}

impl<T: 'static> Lazy<T> {
    /// Defer to the descriptor returned by `init`
    pub fn new(init: fn() -> Arc<dyn TypeMap<T>>) -> Self {
        Self {
            init,
            cell: OnceLock::new(),
        }
    }

    fn get(&self) -> &Arc<dyn TypeMap<T>> {
        self.cell.get_or_init(self.init)
    }
}

impl<T: 'static> TypeMap<T> for Lazy<T> {
    fn decode(
        &self,
        ctx: &Context,
        path: &JsonPointer,
        data: &Value,
        dst: &mut T,
        errs: &mut MultiValidationError,
    ) -> std::result::Result<(), SchemaError> {
        self.get().decode(ctx, path, data, dst, errs)
    }

    fn encode(&self, ctx: &Context, src: &T) -> Result<Value> {
        self.get().encode(ctx, src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Chain of nested `Option<Box<Link>>` values
    #[derive(Debug, Default)]
    struct Link {
        depth: usize,
        next: Option<Box<Link>>,
    }

    struct LinkMap {
        next: Nullable<Boxed<Lazy<Link>>>,
    }

    impl TypeMap<Link> for LinkMap {
        fn decode(
            &self,
            ctx: &Context,
            path: &JsonPointer,
            data: &Value,
            dst: &mut Link,
            errs: &mut MultiValidationError,
        ) -> std::result::Result<(), SchemaError> {
            let next = data.get("next").unwrap_or(&Value::Null);
            if !next.is_null() && dst.next.is_none() {
                dst.next = Some(Box::new(Link {
                    depth: dst.depth + 1,
                    next: None,
                }));
            }
            self.next.decode(ctx, &path.child("next"), next, &mut dst.next, errs)
        }

        fn encode(&self, ctx: &Context, src: &Link) -> Result<Value> {
            Ok(serde_json::json!({ "next": self.next.encode(ctx, &src.next)? }))
        }
    }

    static BUILDS: AtomicUsize = AtomicUsize::new(0);
    static LINK_MAP: OnceLock<Arc<LinkMap>> = OnceLock::new();

    fn link_map() -> Arc<dyn TypeMap<Link>> {
        LINK_MAP
            .get_or_init(|| {
                BUILDS.fetch_add(1, Ordering::SeqCst);
                Arc::new(LinkMap {
                    next: Nullable(Boxed(Lazy::new(link_map))),
                })
            })
            .clone()
    }

    fn chain(depth: usize) -> Value {
        (0..depth).fold(Value::Null, |next, _| serde_json::json!({ "next": next }))
    }

    #[test]
    fn test_lazy_resolves_to_shared_instance() {
        let map = link_map();
        let mut dst = Link::default();
        let mut errs = MultiValidationError::new();
        map.decode(&Context::empty(), &JsonPointer::root(), &chain(200), &mut dst, &mut errs)
            .unwrap();
        assert!(errs.is_empty());
        assert_eq!(BUILDS.load(Ordering::SeqCst), 1);

        let mut deepest = &dst;
        while let Some(next) = &deepest.next {
            deepest = next;
        }
        assert_eq!(deepest.depth, 199);
        assert_eq!(map.encode(&Context::empty(), &dst).unwrap(), chain(200));
    }
}
