//! Sequence descriptors with element-count bounds

use crate::typemap::TypeMap;
use jsonmap_format::{Context, JsonPointer, MultiValidationError, Result, SchemaError};
use serde_json::Value;

/// Descriptor for a JSON array mapped to `Vec<X>`
///
/// The element count is checked before any element is decoded. A count
/// outside the bounds reports a single error for the whole list and the
/// elements are not visited.
#[derive(Debug, Clone)]
pub struct SliceOf<D> {
    element: D,
    min: usize,
    max: Option<usize>,
}

impl<D> SliceOf<D> {
    /// Unbounded list of `element`
    pub fn new(element: D) -> Self {
        Self {
            element,
            min: 0,
            max: None,
        }
    }

    /// At most `max` elements
    pub fn max(element: D, max: usize) -> Self {
        Self {
            element,
            min: 0,
            max: Some(max),
        }
    }

    /// At least `min` elements
    pub fn min(element: D, min: usize) -> Self {
        Self {
            element,
            min,
            max: None,
        }
    }

    /// Between `min` and `max` elements, inclusive
    pub fn range(element: D, min: usize, max: usize) -> Self {
        Self {
            element,
            min,
            max: Some(max),
        }
    }

    fn size_error(&self, len: usize) -> Option<String> {
        match self.max {
            None if len < self.min => Some(format!("must have at least {} elements", self.min)),
            Some(max) if self.min == 0 && len > max => {
                Some(format!("must have at most {max} elements"))
            }
            Some(max) if len < self.min || len > max => Some(format!(
                "must have between {} and {} elements",
                self.min, max
            )),
            _ => None,
        }
    }
}

impl<X, D> TypeMap<Vec<X>> for SliceOf<D>
where
    D: TypeMap<X>,
    X: Default,
{
    fn decode(
        &self,
        ctx: &Context,
        path: &JsonPointer,
        data: &Value,
        dst: &mut Vec<X>,
        errs: &mut MultiValidationError,
    ) -> std::result::Result<(), SchemaError> {
        let items = match data.as_array() {
            Some(items) => items,
            None => {
                errs.push(path, "expected a list");
                return Ok(());
            }
        };

        if let Some(message) = self.size_error(items.len()) {
            errs.push(path, message);
            return Ok(());
        }

        let mut decoded = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let mut element = X::default();
            self.element
                .decode(ctx, &path.index(idx), item, &mut element, errs)?;
            decoded.push(element);
        }
        *dst = decoded;
        Ok(())
    }

    fn encode(&self, ctx: &Context, src: &Vec<X>) -> Result<Value> {
        src.iter()
            .map(|element| self.element.encode(ctx, element))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::Primitive;
    use jsonmap_format::validator::string;
    use serde_json::json;

    fn decode_strings<D: TypeMap<String>>(
        map: &SliceOf<D>,
        data: Value,
    ) -> (Vec<String>, MultiValidationError) {
        let mut dst = Vec::new();
        let mut errs = MultiValidationError::new();
        map.decode(&Context::empty(), &JsonPointer::root(), &data, &mut dst, &mut errs)
            .unwrap();
        (dst, errs)
    }

    #[test]
    fn test_size_messages() {
        let element = || Primitive::new(string(1, 3));
        let (_, errs) = decode_strings(&SliceOf::max(element(), 2), json!(["a", "b", "c"]));
        assert_eq!(errs.errors()[0].message(), "must have at most 2 elements");

        let (_, errs) = decode_strings(&SliceOf::min(element(), 2), json!(["a"]));
        assert_eq!(errs.errors()[0].message(), "must have at least 2 elements");

        let (_, errs) = decode_strings(&SliceOf::range(element(), 1, 2), json!([]));
        assert_eq!(errs.errors()[0].message(), "must have between 1 and 2 elements");
    }

    #[test]
    fn test_size_error_skips_elements() {
        let map = SliceOf::max(Primitive::new(string(1, 3)), 1);
        let (dst, errs) = decode_strings(&map, json!(["toolong", "alsotoolong"]));
        assert_eq!(errs.len(), 1);
        assert!(dst.is_empty());
    }

    #[test]
    fn test_element_paths() {
        let map = SliceOf::new(Primitive::new(string(1, 3)));
        let (_, errs) = decode_strings(&map, json!(["ok", "toolong", "no", "nope"]));
        let paths: Vec<_> = errs.errors().iter().map(|e| e.path()).collect();
        assert_eq!(paths, vec!["/1", "/3"]);
    }

    #[test]
    fn test_not_a_list() {
        let map = SliceOf::new(Primitive::new(string(1, 3)));
        let (_, errs) = decode_strings(&map, json!({"a": 1}));
        assert_eq!(errs.errors()[0].message(), "expected a list");
        assert_eq!(errs.errors()[0].path(), "");
    }

    #[test]
    fn test_encode_in_order() {
        let map = SliceOf::new(Primitive::new(string(1, 3)));
        let out = map
            .encode(&Context::empty(), &vec!["a".to_string(), "b".to_string()])
            .unwrap();
        assert_eq!(out, json!(["a", "b"]));
    }
}
