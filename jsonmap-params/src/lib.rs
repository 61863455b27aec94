//! jsonmap params - Typed records to and from flat parameter sets
//!
//! A [`QueryMap`] binds record fields to parameter names through
//! [`Converter`]s and maps records to and from:
//!
//! - parsed query strings ([`Values`]) and raw query text
//! - HTTP header maps, with canonicalised header names
//!
//! Decode failures are aggregated into the same
//! [`MultiValidationError`] the JSON engine uses, keyed by parameter name.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod converter;
pub mod error;
pub mod header;
pub mod predicate;
pub mod query;

pub use converter::{
    BoolConverter, Converter, IntConverter, OptionConverter, StrSliceConverter, StringConverter,
    TimeConverter, UintConverter,
};
pub use error::ParamError;
pub use header::canonical_header_key;
pub use jsonmap_format::{Error, MultiValidationError, Result};
pub use predicate::{
    int_range, len_range, not_after, string_length, string_regex, uint_range, valid_utf8,
    Predicate,
};
pub use query::{format_query, parse_query, MappedParameter, QueryMap, Values};
