//! Named boolean tests applied to decoded parameter values

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use std::fmt;

/// A named test over a decoded value
///
/// When the test returns `false` the parameter is rejected with
/// `a validation test failed: <name>`.
pub struct Predicate<V: ?Sized> {
    name: String,
    test: Box<dyn Fn(&V) -> bool + Send + Sync>,
}

impl<V: ?Sized> Predicate<V> {
    /// Wrap `test` under `name`
    pub fn new(name: impl Into<String>, test: impl Fn(&V) -> bool + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            test: Box::new(test),
        }
    }

    /// Name reported on failure
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the test
    pub fn check(&self, value: &V) -> bool {
        (self.test)(value)
    }
}

impl<V: ?Sized> fmt::Debug for Predicate<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.name).finish()
    }
}

/// First predicate in `predicates` that rejects `value`
pub(crate) fn first_failure<'a, V: ?Sized>(
    predicates: &'a [Predicate<V>],
    value: &V,
) -> Option<&'a Predicate<V>> {
    predicates.iter().find(|p| !p.check(value))
}

/// String with a character count in `min..=max`
pub fn string_length(min: usize, max: usize) -> Predicate<str> {
    Predicate::new(format!("string_length({min}, {max})"), move |s: &str| {
        (min..=max).contains(&s.chars().count())
    })
}

/// String containing a match for `re`
pub fn string_regex(re: Regex) -> Predicate<str> {
    Predicate::new(format!("string_regex({})", re.as_str()), move |s: &str| {
        re.is_match(s)
    })
}

/// String that decoded from valid UTF-8
///
/// Query and header text is decoded lossily, so invalid input shows up as
/// U+FFFD replacement characters.
pub fn valid_utf8() -> Predicate<str> {
    Predicate::new("valid_utf8", |s: &str| !s.contains(char::REPLACEMENT_CHARACTER))
}

/// Signed integer in `min..=max`
pub fn int_range(min: i64, max: i64) -> Predicate<i64> {
    Predicate::new(format!("int_range({min}, {max})"), move |n: &i64| {
        (min..=max).contains(n)
    })
}

/// Unsigned integer in `min..=max`
pub fn uint_range(min: u64, max: u64) -> Predicate<u64> {
    Predicate::new(format!("uint_range({min}, {max})"), move |n: &u64| {
        (min..=max).contains(n)
    })
}

/// Sequence with `min..=max` elements
pub fn len_range(min: usize, max: usize) -> Predicate<[String]> {
    Predicate::new(format!("len_range({min}, {max})"), move |s: &[String]| {
        (min..=max).contains(&s.len())
    })
}

/// Timestamp no later than `limit`
pub fn not_after(limit: DateTime<FixedOffset>) -> Predicate<DateTime<FixedOffset>> {
    Predicate::new(format!("not_after({})", limit.to_rfc3339()), move |t: &DateTime<FixedOffset>| {
        *t <= limit
    })
}
