//! Property-based tests for jsonmap format primitives

use jsonmap_format::validator::{integer, string};
use jsonmap_format::{escape_pointer_token, unescape_pointer_token, Context, JsonPointer, Validator};
use proptest::prelude::*;
use serde_json::json;

proptest! {
    #[test]
    fn pointer_token_escape_roundtrip(token in ".*") {
        let escaped = escape_pointer_token(&token);
        prop_assert!(!escaped.contains('/'));
        prop_assert_eq!(unescape_pointer_token(&escaped), token);
    }

    #[test]
    fn pointer_tokens_survive_nesting(names in prop::collection::vec("[a-z~/]{0,6}", 0..8)) {
        let mut path = JsonPointer::root();
        for name in &names {
            path = path.child(name);
        }
        prop_assert_eq!(path.tokens(), names);
    }

    #[test]
    fn integer_validator_matches_range(min in -1000i64..0, max in 0i64..1000, n in -2000i64..2000) {
        let result = integer(min, max).validate(&Context::empty(), &json!(n));
        if n < min {
            prop_assert_eq!(result.unwrap_err().to_string(), format!("too small, must be at least {}", min));
        } else if n > max {
            prop_assert_eq!(result.unwrap_err().to_string(), format!("too large, may not be larger than {}", max));
        } else {
            prop_assert_eq!(result.unwrap(), json!(n));
        }
    }

    #[test]
    fn string_validator_accepts_in_range(s in "[a-z]{1,12}") {
        let result = string(1, 12).validate(&Context::empty(), &json!(s.clone()));
        prop_assert_eq!(result.unwrap(), json!(s));
    }
}
