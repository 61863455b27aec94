//! HTTP header variants of the parameter mapper

use crate::query::{downcast, finish, QueryMap};
use http::header::{HeaderMap, HeaderName, HeaderValue};
use jsonmap_format::{Error, MultiValidationError, Result, SchemaError};
use std::any::{type_name, Any};
use tracing::trace;

/// Canonical form of a header name
///
/// The first letter and every letter after a `-` are upper-cased, all
/// other letters lower-cased. A key containing a space or a character
/// outside the HTTP token set is returned unchanged.
pub fn canonical_header_key(key: &str) -> String {
    if !key.bytes().all(is_token_byte) {
        return key.to_string();
    }

    let mut out = String::with_capacity(key.len());
    let mut upper = true;
    for c in key.chars() {
        out.push(if upper {
            c.to_ascii_uppercase()
        } else {
            c.to_ascii_lowercase()
        });
        upper = c == '-';
    }
    out
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
        Error::Schema(SchemaError::InvalidParameterName {
            name: name.to_string(),
        })
    })
}

impl<T: 'static> QueryMap<T> {
    /// Decode request headers into `dst`
    ///
    /// Header names are matched case-insensitively; errors are keyed by the
    /// canonical header name. Values that are not valid UTF-8 are decoded
    /// lossily.
    pub fn decode_header(&self, headers: &HeaderMap, dst: &mut T) -> Result<()> {
        trace!(type_name = type_name::<T>(), headers = headers.len(), "decode headers");
        let mut errs = MultiValidationError::new();
        for param in self.params() {
            let name = header_name(param.name())?;
            let src: Vec<String> = headers
                .get_all(&name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect();
            param.decode_into(&canonical_header_key(param.name()), &src, dst, &mut errs);
        }
        finish::<T>(errs)
    }

    /// [`QueryMap::decode_header`] into a destination whose type is only known at runtime
    pub fn decode_header_dyn(&self, headers: &HeaderMap, dst: &mut dyn Any) -> Result<()> {
        let dst = downcast::<T>(dst)?;
        self.decode_header(headers, dst)
    }

    /// Encode `src` into `headers`, replacing existing values of each header
    ///
    /// A parameter whose converter yields no strings removes the header.
    pub fn encode_header(&self, src: &T, headers: &mut HeaderMap) -> Result<()> {
        for param in self.params() {
            let Some(strings) = param.encode_from(src)? else {
                continue;
            };
            let name = header_name(param.name())?;
            let values = strings
                .iter()
                .map(|s| HeaderValue::from_str(s))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| Error::Param {
                    name: canonical_header_key(param.name()),
                    reason: e.to_string(),
                })?;

            headers.remove(&name);
            for value in values {
                headers.append(name.clone(), value);
            }
        }
        Ok(())
    }
}
