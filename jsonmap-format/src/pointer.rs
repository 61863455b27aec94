//! RFC 6901 JSON Pointer paths used to locate validation errors

use std::fmt;

/// Escape a string for use as a JSON Pointer token
///
/// - '~' → '~0'
/// - '/' → '~1'
pub fn escape_pointer_token(token: &str) -> String {
    // Must escape ~ before / to avoid double-escaping the inserted '1'
    token.replace('~', "~0").replace('/', "~1")
}

/// Unescape a JSON Pointer token according to RFC 6901
pub fn unescape_pointer_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// A location inside a JSON document
///
/// Paths are built while the descriptor tree is walked: object members
/// through [`JsonPointer::child`] and array elements through
/// [`JsonPointer::index`]. The root renders as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPointer {
    rendered: String,
}

impl JsonPointer {
    /// The document root
    pub fn root() -> Self {
        Self::default()
    }

    /// Path to an object member; the name is escaped
    pub fn child(&self, name: &str) -> Self {
        let escaped = escape_pointer_token(name);
        let mut rendered = String::with_capacity(self.rendered.len() + escaped.len() + 1);
        rendered.push_str(&self.rendered);
        rendered.push('/');
        rendered.push_str(&escaped);
        Self { rendered }
    }

    /// Path to an array element
    pub fn index(&self, idx: usize) -> Self {
        Self {
            rendered: format!("{}/{}", self.rendered, idx),
        }
    }

    /// Check whether this is the document root
    pub fn is_root(&self) -> bool {
        self.rendered.is_empty()
    }

    /// Rendered pointer text
    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    /// Unescaped reference tokens, outermost first
    pub fn tokens(&self) -> Vec<String> {
        if self.rendered.is_empty() {
            return Vec::new();
        }
        self.rendered
            .split('/')
            .skip(1)
            .map(unescape_pointer_token)
            .collect()
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

impl From<JsonPointer> for String {
    fn from(pointer: JsonPointer) -> Self {
        pointer.rendered
    }
}
