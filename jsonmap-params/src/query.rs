//! Records mapped to and from flat multi-valued parameter sets

use crate::converter::Converter;
use crate::error::ParamError;
use jsonmap_format::validation::ValidationError;
use jsonmap_format::{Error, MultiValidationError, Result};
use std::any::{type_name, Any};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Parameter name to its values, in the shape of a parsed query string
pub type Values = BTreeMap<String, Vec<String>>;

/// Type-erased converter bound to one record field
trait ParamCodec<T>: Send + Sync {
    fn decode(&self, src: &[String], dst: &mut T) -> std::result::Result<(), ParamError>;

    /// `None` when the field holds its default and may be omitted
    fn encode(
        &self,
        src: &T,
        omit_empty: bool,
    ) -> std::result::Result<Option<Vec<String>>, ParamError>;
}

struct BoundParam<T, C: Converter> {
    get: fn(&T) -> &C::Value,
    get_mut: fn(&mut T) -> &mut C::Value,
    converter: C,
}

impl<T, C> ParamCodec<T> for BoundParam<T, C>
where
    C: Converter,
    C::Value: Default + PartialEq,
{
    fn decode(&self, src: &[String], dst: &mut T) -> std::result::Result<(), ParamError> {
        *(self.get_mut)(dst) = self.converter.decode(src)?;
        Ok(())
    }

    fn encode(
        &self,
        src: &T,
        omit_empty: bool,
    ) -> std::result::Result<Option<Vec<String>>, ParamError> {
        let value = (self.get)(src);
        if omit_empty && *value == C::Value::default() {
            return Ok(None);
        }
        self.converter.encode(value).map(Some)
    }
}

/// One record field bound to a parameter name
pub struct MappedParameter<T> {
    field_name: &'static str,
    name: String,
    omit_empty: bool,
    codec: Box<dyn ParamCodec<T>>,
}

impl<T: 'static> MappedParameter<T> {
    /// Bind the field reached through `get` / `get_mut` to the parameter `name`
    pub fn new<C>(
        field_name: &'static str,
        name: impl Into<String>,
        get: fn(&T) -> &C::Value,
        get_mut: fn(&mut T) -> &mut C::Value,
        converter: C,
    ) -> Self
    where
        C: Converter + 'static,
        C::Value: Default + PartialEq + 'static,
    {
        Self {
            field_name,
            name: name.into(),
            omit_empty: false,
            codec: Box::new(BoundParam {
                get,
                get_mut,
                converter,
            }),
        }
    }
}

impl<T> MappedParameter<T> {
    /// Leave the parameter out on encode when the field holds its default
    pub fn omit_empty(mut self) -> Self {
        self.omit_empty = true;
        self
    }

    /// Record-field identifier
    pub fn field_name(&self) -> &'static str {
        self.field_name
    }

    /// Wire parameter name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether default values are left out on encode
    pub fn omits_empty(&self) -> bool {
        self.omit_empty
    }

    pub(crate) fn decode_into(
        &self,
        key: &str,
        src: &[String],
        dst: &mut T,
        errs: &mut MultiValidationError,
    ) {
        if let Err(e) = self.codec.decode(src, dst) {
            errs.add_error(ValidationError::new(key, e.to_string()));
        }
    }

    /// Wire strings for this parameter, `None` when omitted
    pub(crate) fn encode_from(&self, src: &T) -> Result<Option<Vec<String>>> {
        self.codec
            .encode(src, self.omit_empty)
            .map_err(|e| Error::Param {
                name: self.name.clone(),
                reason: e.to_string(),
            })
    }
}

/// Schema mapping a record type to a flat parameter set
///
/// Parameters are processed in declaration order. Decode errors are
/// collected per parameter and reported together, keyed by parameter name.
///
/// ```rust,ignore
/// let map = QueryMap::new(vec![
///     MappedParameter::new("age", "age", |d: &Dog| &d.age, |d| &mut d.age,
///         IntConverter::<i64>::new().predicate(int_range(0, 100))),
///     MappedParameter::new("name", "name", |d: &Dog| &d.name, |d| &mut d.name,
///         StringConverter::new()).omit_empty(),
/// ]);
///
/// let mut dog = Dog::default();
/// map.decode_query("age=10&name=Spot", &mut dog)?;
/// ```
pub struct QueryMap<T> {
    params: Vec<MappedParameter<T>>,
}

impl<T: 'static> QueryMap<T> {
    /// Build a schema from ordered parameter bindings
    pub fn new(params: Vec<MappedParameter<T>>) -> Self {
        Self { params }
    }

    /// Parameter bindings in declaration order
    pub fn params(&self) -> &[MappedParameter<T>] {
        &self.params
    }

    /// Decode `values` into `dst`
    ///
    /// Every parameter is attempted; failures are returned together as
    /// [`Error::Validation`].
    pub fn decode(&self, values: &Values, dst: &mut T) -> Result<()> {
        trace!(type_name = type_name::<T>(), params = values.len(), "decode parameters");
        let mut errs = MultiValidationError::new();
        for param in &self.params {
            let src = values.get(&param.name).map(Vec::as_slice).unwrap_or_default();
            param.decode_into(&param.name, src, dst, &mut errs);
        }
        finish::<T>(errs)
    }

    /// [`QueryMap::decode`] into a destination whose type is only known at runtime
    ///
    /// Fails with [`Error::Mismatch`] before touching any parameter if `dst`
    /// is not a `T`.
    pub fn decode_dyn(&self, values: &Values, dst: &mut dyn Any) -> Result<()> {
        let dst = downcast::<T>(dst)?;
        self.decode(values, dst)
    }

    /// Encode `src` into `values`, replacing any existing entries
    ///
    /// A parameter whose converter yields no strings is removed.
    pub fn encode(&self, src: &T, values: &mut Values) -> Result<()> {
        for param in &self.params {
            match param.encode_from(src)? {
                None => {}
                Some(strings) if strings.is_empty() => {
                    values.remove(&param.name);
                }
                Some(strings) => {
                    values.insert(param.name.clone(), strings);
                }
            }
        }
        Ok(())
    }

    /// Decode an `application/x-www-form-urlencoded` query string
    ///
    /// Invalid percent-encoded UTF-8 is replaced with U+FFFD, which the
    /// `valid_utf8` predicate rejects.
    pub fn decode_query(&self, query: &str, dst: &mut T) -> Result<()> {
        self.decode(&parse_query(query), dst)
    }

    /// Encode `src` as an `application/x-www-form-urlencoded` query string
    ///
    /// Keys are sorted; repeated values keep their order.
    pub fn encode_query(&self, src: &T) -> Result<String> {
        let mut values = Values::new();
        self.encode(src, &mut values)?;
        Ok(format_query(&values))
    }
}

pub(crate) fn downcast<T: 'static>(dst: &mut dyn Any) -> Result<&mut T> {
    let actual = Any::type_id(&*dst);
    dst.downcast_mut::<T>().ok_or_else(|| Error::Mismatch {
        expected: type_name::<T>(),
        actual: format!("{actual:?}"),
    })
}

pub(crate) fn finish<T>(errs: MultiValidationError) -> Result<()> {
    if errs.is_empty() {
        return Ok(());
    }
    debug!(
        type_name = type_name::<T>(),
        errors = errs.len(),
        "parameters rejected"
    );
    Err(Error::Validation(errs))
}

/// Parse a query string into [`Values`]
pub fn parse_query(query: &str) -> Values {
    let mut values = Values::new();
    for (key, value) in url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
        values
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    values
}

/// Render [`Values`] as a query string
pub fn format_query(values: &Values) -> String {
    let mut out = url::form_urlencoded::Serializer::new(String::new());
    for (key, list) in values {
        for value in list {
            out.append_pair(key, value);
        }
    }
    out.finish()
}
