//! Leaf validators over single decoded JSON values
//!
//! A validator checks one JSON value and returns the value to store in the
//! record, possibly converted (e.g. `12.0` becomes the integer `12`).
//! Validators are stateless; combined checks are written as new validators.

use crate::context::Context;
use serde_json::Value;
use thiserror::Error;

/// Boxed error returned by validators
///
/// Any error type may be returned; its `Display` text becomes the message
/// recorded for the field.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Check and convert a single JSON value
pub trait Validator: Send + Sync {
    /// Validate `value`, returning the converted value on success
    fn validate(&self, ctx: &Context, value: &Value) -> Result<Value, BoxError>;
}

impl<F> Validator for F
where
    F: Fn(&Context, &Value) -> Result<Value, BoxError> + Send + Sync,
{
    fn validate(&self, ctx: &Context, value: &Value) -> Result<Value, BoxError> {
        self(ctx, value)
    }
}

/// Failure reported by the built-in validators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvalidValue(pub String);

fn invalid(message: impl Into<String>) -> BoxError {
    Box::new(InvalidValue(message.into()))
}

/// JSON string with a character count in `min..=max`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringValidator {
    min: usize,
    max: usize,
}

impl Validator for StringValidator {
    fn validate(&self, _ctx: &Context, value: &Value) -> Result<Value, BoxError> {
        let s = value.as_str().ok_or_else(|| invalid("not a string"))?;
        let len = s.chars().count();
        if len < self.min {
            return Err(invalid(format!(
                "too short, must be at least {} characters",
                self.min
            )));
        }
        if len > self.max {
            return Err(invalid(format!(
                "too long, may not be more than {} characters",
                self.max
            )));
        }
        Ok(Value::String(s.to_string()))
    }
}

/// Build a string validator
pub fn string(min: usize, max: usize) -> StringValidator {
    StringValidator { min, max }
}

/// JSON number with no fractional part, within `min..=max`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerValidator {
    min: i64,
    max: i64,
}

impl IntegerValidator {
    fn too_small(&self) -> BoxError {
        invalid(format!("too small, must be at least {}", self.min))
    }

    fn too_large(&self) -> BoxError {
        invalid(format!("too large, may not be larger than {}", self.max))
    }
}

impl Validator for IntegerValidator {
    fn validate(&self, _ctx: &Context, value: &Value) -> Result<Value, BoxError> {
        let number = match value {
            Value::Number(n) => n,
            _ => return Err(invalid("not an integer")),
        };

        let n = if let Some(n) = number.as_i64() {
            n
        } else if number.as_u64().is_some() {
            // Only reached above i64::MAX
            return Err(self.too_large());
        } else {
            let f = number.as_f64().ok_or_else(|| invalid("not an integer"))?;
            if !f.is_finite() || f.fract() != 0.0 {
                return Err(invalid("not an integer"));
            }
            // i64 spans [-2^63, 2^63); both ends are exact in f64
            if f < i64::MIN as f64 {
                return Err(self.too_small());
            }
            if f >= -(i64::MIN as f64) {
                return Err(self.too_large());
            }
            f as i64
        };

        if n < self.min {
            return Err(self.too_small());
        }
        if n > self.max {
            return Err(self.too_large());
        }
        Ok(Value::from(n))
    }
}

/// Build an integer validator
pub fn integer(min: i64, max: i64) -> IntegerValidator {
    IntegerValidator { min, max }
}

/// JSON boolean
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BooleanValidator;

impl Validator for BooleanValidator {
    fn validate(&self, _ctx: &Context, value: &Value) -> Result<Value, BoxError> {
        match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            _ => Err(invalid("not a boolean")),
        }
    }
}

/// Build a boolean validator
pub fn boolean() -> BooleanValidator {
    BooleanValidator
}

/// Value equal to one of a fixed set
#[derive(Debug, Clone, PartialEq)]
pub struct OneOf {
    allowed: Vec<Value>,
}

impl OneOf {
    /// JSON kind shared by every allowed value, if there is one
    fn kind(&self) -> Option<&'static str> {
        let first = kind_of(self.allowed.first()?);
        self.allowed
            .iter()
            .all(|v| kind_of(v) == first)
            .then_some(first)
    }

    fn find(&self, value: &Value) -> Option<&Value> {
        self.allowed.iter().find(|allowed| match (allowed, value) {
            (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
            _ => *allowed == value,
        })
    }
}

impl Validator for OneOf {
    fn validate(&self, _ctx: &Context, value: &Value) -> Result<Value, BoxError> {
        if let Some(kind) = self.kind() {
            if kind_of(value) != kind {
                return Err(invalid(format!("not {kind}")));
            }
        }
        if let Some(allowed) = self.find(value) {
            return Ok(allowed.clone());
        }
        let allowed = serde_json::to_string(&self.allowed)?;
        Err(invalid(format!("Value must be one of: {allowed}")))
    }
}

/// Build a validator accepting only the listed values
pub fn one_of<I, V>(allowed: I) -> OneOf
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    OneOf {
        allowed: allowed.into_iter().map(Into::into).collect(),
    }
}

/// Accepts any value unchanged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interface;

impl Validator for Interface {
    fn validate(&self, _ctx: &Context, value: &Value) -> Result<Value, BoxError> {
        Ok(value.clone())
    }
}

/// Build a pass-through validator
pub fn interface() -> Interface {
    Interface
}

/// Article-prefixed JSON kind, as used in "not a ..." messages
fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "a null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(v: &dyn Validator, value: Value) -> Result<Value, String> {
        v.validate(&Context::empty(), &value)
            .map_err(|e| e.to_string())
    }

    #[test]
    fn integer_bounds_are_inclusive() {
        let v = integer(0, 10);
        assert_eq!(check(&v, json!(0)), Ok(json!(0)));
        assert_eq!(check(&v, json!(10)), Ok(json!(10)));
        assert_eq!(
            check(&v, json!(-1)),
            Err("too small, must be at least 0".to_string())
        );
        assert_eq!(
            check(&v, json!(11)),
            Err("too large, may not be larger than 10".to_string())
        );
    }

    #[test]
    fn integer_accepts_whole_floats_only() {
        let v = integer(0, 100);
        assert_eq!(check(&v, json!(12.0)), Ok(json!(12)));
        assert_eq!(check(&v, json!(12.1)), Err("not an integer".to_string()));
        assert_eq!(check(&v, json!(false)), Err("not an integer".to_string()));
        assert_eq!(
            check(&v, json!(2048.0)),
            Err("too large, may not be larger than 100".to_string())
        );
        assert_eq!(
            check(&v, json!(u64::MAX)),
            Err("too large, may not be larger than 100".to_string())
        );
    }

    #[test]
    fn integer_rejects_floats_outside_i64() {
        let v = integer(i64::MIN, i64::MAX);
        assert_eq!(
            check(&v, json!(9223372036854775808.0)),
            Err(format!("too large, may not be larger than {}", i64::MAX))
        );
        assert_eq!(
            check(&v, json!(1e19)),
            Err(format!("too large, may not be larger than {}", i64::MAX))
        );
        assert_eq!(
            check(&v, json!(-1e19)),
            Err(format!("too small, must be at least {}", i64::MIN))
        );
        assert_eq!(check(&v, json!(-9223372036854775808.0)), Ok(json!(i64::MIN)));
        assert_eq!(check(&v, json!(4611686018427387904.0)), Ok(json!(1i64 << 62)));
    }

    #[test]
    fn string_counts_characters() {
        let v = string(1, 3);
        assert_eq!(check(&v, json!("héé")), Ok(json!("héé")));
        assert_eq!(
            check(&v, json!("")),
            Err("too short, must be at least 1 characters".to_string())
        );
        assert_eq!(
            check(&v, json!("four")),
            Err("too long, may not be more than 3 characters".to_string())
        );
        assert_eq!(check(&v, json!(12.0)), Err("not a string".to_string()));
    }

    #[test]
    fn boolean_rejects_numbers() {
        assert_eq!(check(&boolean(), json!(true)), Ok(json!(true)));
        assert_eq!(check(&boolean(), json!(1)), Err("not a boolean".to_string()));
    }

    #[test]
    fn one_of_reports_allowed_values() {
        let v = one_of(["foo", "bar"]);
        assert_eq!(check(&v, json!("foo")), Ok(json!("foo")));
        assert_eq!(
            check(&v, json!("baz")),
            Err(r#"Value must be one of: ["foo","bar"]"#.to_string())
        );
        assert_eq!(check(&v, json!(12)), Err("not a string".to_string()));
    }

    #[test]
    fn one_of_compares_numbers_numerically() {
        let v = one_of([1, 2, 3]);
        assert_eq!(check(&v, json!(2.0)), Ok(json!(2)));
        assert_eq!(check(&v, json!(2)), Ok(json!(2)));
        assert_eq!(
            check(&v, json!(4)),
            Err("Value must be one of: [1,2,3]".to_string())
        );
    }

    #[test]
    fn closures_are_validators() {
        let even = |_: &Context, value: &Value| -> Result<Value, BoxError> {
            match value.as_i64() {
                Some(n) if n % 2 == 0 => Ok(value.clone()),
                _ => Err("must be even".into()),
            }
        };
        assert_eq!(check(&even, json!(4)), Ok(json!(4)));
        assert_eq!(check(&even, json!(3)), Err("must be even".to_string()));
    }

    #[test]
    fn interface_passes_everything() {
        let value = json!({"nested": [1, null, "x"]});
        assert_eq!(check(&interface(), value.clone()), Ok(value));
    }
}
