//! Converters between parameter wire strings and typed values
//!
//! A parameter arrives as zero or more strings (the shape of a query
//! string or a repeated header). Scalar converters accept at most one
//! string and return their type's default when the parameter is absent;
//! sequence converters accept any number.

use crate::error::ParamError;
use crate::predicate::{first_failure, Predicate};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use std::fmt::Display;
use std::marker::PhantomData;
use std::num::ParseIntError;
use std::str::FromStr;

/// Two-way conversion between wire strings and one field type
pub trait Converter: Send + Sync {
    /// Field type produced and consumed
    type Value;

    /// Convert the parameter's strings into a value
    fn decode(&self, src: &[String]) -> Result<Self::Value, ParamError>;

    /// Convert a value into the parameter's strings
    fn encode(&self, value: &Self::Value) -> Result<Vec<String>, ParamError>;
}

/// The single string of a scalar parameter, if present
fn single(src: &[String]) -> Result<Option<&str>, ParamError> {
    match src {
        [] => Ok(None),
        [one] => Ok(Some(one.as_str())),
        _ => Err(ParamError::TooManyValues),
    }
}

fn check<V: ?Sized>(predicates: &[Predicate<V>], value: &V) -> Result<(), ParamError> {
    match first_failure(predicates, value) {
        Some(failed) => Err(ParamError::PredicateFailed {
            name: failed.name().to_string(),
        }),
        None => Ok(()),
    }
}

/// Plain string parameter
#[derive(Debug, Default)]
pub struct StringConverter {
    predicates: Vec<Predicate<str>>,
}

impl StringConverter {
    /// Converter with no predicates
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate; predicates run in the order added
    pub fn predicate(mut self, predicate: Predicate<str>) -> Self {
        self.predicates.push(predicate);
        self
    }
}

impl Converter for StringConverter {
    type Value = String;

    fn decode(&self, src: &[String]) -> Result<String, ParamError> {
        let Some(s) = single(src)? else {
            return Ok(String::new());
        };
        check(&self.predicates, s)?;
        Ok(s.to_string())
    }

    fn encode(&self, value: &String) -> Result<Vec<String>, ParamError> {
        Ok(vec![value.clone()])
    }
}

/// Boolean parameter
///
/// Accepts `1 t T TRUE true True 0 f F FALSE false False`. An absent or
/// empty parameter decodes to the configured default.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolConverter {
    empty_true: bool,
}

impl BoolConverter {
    /// Absent or empty input decodes to `false`
    pub fn new() -> Self {
        Self::default()
    }

    /// Absent or empty input decodes to `true`
    pub fn empty_true() -> Self {
        Self { empty_true: true }
    }
}

impl Converter for BoolConverter {
    type Value = bool;

    fn decode(&self, src: &[String]) -> Result<bool, ParamError> {
        match single(src)? {
            None | Some("") => Ok(self.empty_true),
            Some("1" | "t" | "T" | "TRUE" | "true" | "True") => Ok(true),
            Some("0" | "f" | "F" | "FALSE" | "false" | "False") => Ok(false),
            Some(other) => Err(ParamError::Bool(other.to_string())),
        }
    }

    fn encode(&self, value: &bool) -> Result<Vec<String>, ParamError> {
        Ok(vec![value.to_string()])
    }
}

/// Signed integer parameter; the width of `I` bounds accepted input
///
/// Predicates see the value widened to `i64`.
pub struct IntConverter<I> {
    predicates: Vec<Predicate<i64>>,
    _width: PhantomData<fn() -> I>,
}

impl<I> IntConverter<I> {
    /// Converter with no predicates
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
            _width: PhantomData,
        }
    }

    /// Add a predicate; predicates run in the order added
    pub fn predicate(mut self, predicate: Predicate<i64>) -> Self {
        self.predicates.push(predicate);
        self
    }
}

impl<I> Default for IntConverter<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> Converter for IntConverter<I>
where
    I: FromStr<Err = ParseIntError> + Into<i64> + Copy + Default + Display,
{
    type Value = I;

    fn decode(&self, src: &[String]) -> Result<I, ParamError> {
        let Some(s) = single(src)? else {
            return Ok(I::default());
        };
        let n: I = s.parse().map_err(|e: ParseIntError| ParamError::Integer(e.to_string()))?;
        check(&self.predicates, &n.into())?;
        Ok(n)
    }

    fn encode(&self, value: &I) -> Result<Vec<String>, ParamError> {
        Ok(vec![value.to_string()])
    }
}

/// Unsigned integer parameter; the width of `U` bounds accepted input
///
/// Predicates see the value widened to `u64`.
pub struct UintConverter<U> {
    predicates: Vec<Predicate<u64>>,
    _width: PhantomData<fn() -> U>,
}

impl<U> UintConverter<U> {
    /// Converter with no predicates
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
            _width: PhantomData,
        }
    }

    /// Add a predicate; predicates run in the order added
    pub fn predicate(mut self, predicate: Predicate<u64>) -> Self {
        self.predicates.push(predicate);
        self
    }
}

impl<U> Default for UintConverter<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> Converter for UintConverter<U>
where
    U: FromStr<Err = ParseIntError> + Into<u64> + Copy + Default + Display,
{
    type Value = U;

    fn decode(&self, src: &[String]) -> Result<U, ParamError> {
        let Some(s) = single(src)? else {
            return Ok(U::default());
        };
        let n: U = s.parse().map_err(|e: ParseIntError| ParamError::Integer(e.to_string()))?;
        check(&self.predicates, &n.into())?;
        Ok(n)
    }

    fn encode(&self, value: &U) -> Result<Vec<String>, ParamError> {
        Ok(vec![value.to_string()])
    }
}

/// RFC 3339 timestamp parameter
///
/// The offset given on the wire is kept, so a decoded value encodes back
/// to the same text.
#[derive(Debug, Default)]
pub struct TimeConverter {
    predicates: Vec<Predicate<DateTime<FixedOffset>>>,
}

impl TimeConverter {
    /// Converter with no predicates
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate; predicates run in the order added
    pub fn predicate(mut self, predicate: Predicate<DateTime<FixedOffset>>) -> Self {
        self.predicates.push(predicate);
        self
    }
}

impl Converter for TimeConverter {
    type Value = DateTime<FixedOffset>;

    fn decode(&self, src: &[String]) -> Result<DateTime<FixedOffset>, ParamError> {
        let Some(s) = single(src)? else {
            return Ok(DateTime::default());
        };
        let t = DateTime::parse_from_rfc3339(s).map_err(|e| ParamError::Time(e.to_string()))?;
        check(&self.predicates, &t)?;
        Ok(t)
    }

    fn encode(&self, value: &DateTime<FixedOffset>) -> Result<Vec<String>, ParamError> {
        Ok(vec![value.to_rfc3339_opts(SecondsFormat::AutoSi, true)])
    }
}

/// Repeated parameter decoded element by element
///
/// Sequence predicates run on the raw strings before any element is
/// converted.
pub struct StrSliceConverter<C> {
    predicates: Vec<Predicate<[String]>>,
    element: C,
}

impl<C> StrSliceConverter<C> {
    /// Sequence whose elements use `element`
    pub fn new(element: C) -> Self {
        Self {
            predicates: Vec::new(),
            element,
        }
    }

    /// Add a sequence predicate; predicates run in the order added
    pub fn predicate(mut self, predicate: Predicate<[String]>) -> Self {
        self.predicates.push(predicate);
        self
    }
}

impl<C: Converter> Converter for StrSliceConverter<C> {
    type Value = Vec<C::Value>;

    fn decode(&self, src: &[String]) -> Result<Vec<C::Value>, ParamError> {
        check(&self.predicates, src)?;
        src.iter()
            .map(|s| {
                self.element
                    .decode(std::slice::from_ref(s))
                    .map_err(|e| ParamError::Element(Box::new(e)))
            })
            .collect()
    }

    fn encode(&self, value: &Vec<C::Value>) -> Result<Vec<String>, ParamError> {
        let mut out = Vec::with_capacity(value.len());
        for element in value {
            let mut strings = self.element.encode(element)?;
            if strings.len() != 1 {
                return Err(ParamError::ElementArity(strings.len()));
            }
            out.append(&mut strings);
        }
        Ok(out)
    }
}

/// Optional scalar; an absent parameter decodes to `None`
pub struct OptionConverter<C> {
    inner: C,
}

impl<C> OptionConverter<C> {
    /// Wrap a scalar converter
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C: Converter> Converter for OptionConverter<C> {
    type Value = Option<C::Value>;

    fn decode(&self, src: &[String]) -> Result<Option<C::Value>, ParamError> {
        if single(src)?.is_none() {
            return Ok(None);
        }
        self.inner.decode(src).map(Some)
    }

    fn encode(&self, value: &Option<C::Value>) -> Result<Vec<String>, ParamError> {
        match value {
            Some(v) => self.inner.encode(v),
            None => Ok(Vec::new()),
        }
    }
}
