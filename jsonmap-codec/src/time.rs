//! RFC 3339 timestamps

use crate::typemap::TypeMap;
use chrono::{DateTime, SecondsFormat, Utc};
use jsonmap_format::{Context, JsonPointer, MultiValidationError, Result, SchemaError};
use serde_json::Value;

const INVALID_TIME: &str = "not a valid RFC 3339 time value";

/// Descriptor for an RFC 3339 string mapped to `DateTime<Utc>`
///
/// Offsets are normalised to UTC. Encoding uses the `Z` suffix and only
/// as many fractional digits as the value needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Time;

impl TypeMap<DateTime<Utc>> for Time {
    fn decode(
        &self,
        _ctx: &Context,
        path: &JsonPointer,
        data: &Value,
        dst: &mut DateTime<Utc>,
        errs: &mut MultiValidationError,
    ) -> std::result::Result<(), SchemaError> {
        match data.as_str().map(DateTime::parse_from_rfc3339) {
            Some(Ok(parsed)) => *dst = parsed.with_timezone(&Utc),
            _ => errs.push(path, INVALID_TIME),
        }
        Ok(())
    }

    fn encode(&self, _ctx: &Context, src: &DateTime<Utc>) -> Result<Value> {
        Ok(Value::String(
            src.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        ))
    }
}
