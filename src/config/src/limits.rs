//! Layered nesting-depth limits
//!
//! A limit expression is a comma separated list of integers, one per nesting
//! layer. `*` means "unlimited at this layer" and decodes to [`UNLIMITED`].

use crate::error::{ConfigError, Result};

/// Sentinel for an unlimited layer
pub const UNLIMITED: i32 = -1;

/// Parse a limit expression
///
/// With `required_len == 0` the result has one entry per listed layer.
/// Otherwise the result is exactly `required_len` long: missing layers are
/// zero and surplus layers are dropped. An absent expression behaves like an
/// empty list.
pub fn parse_layered_limits(
    key: &str,
    expression: Option<&str>,
    required_len: usize,
) -> Result<Vec<i32>> {
    let tokens: Vec<&str> = match expression {
        Some(expr) => expr.split(',').collect(),
        None => Vec::new(),
    };

    let len = if required_len == 0 {
        tokens.len()
    } else {
        required_len
    };

    let mut limits = vec![0; len];
    for (slot, token) in limits.iter_mut().zip(tokens.iter()) {
        *slot = parse_layer(key, token)?;
    }
    Ok(limits)
}

fn parse_layer(key: &str, token: &str) -> Result<i32> {
    let token = token.trim();
    if token == "*" {
        return Ok(UNLIMITED);
    }
    token
        .parse::<i32>()
        .map_err(|_| ConfigError::invalid(key, token, "integer or '*'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_truncates_to_required_length() {
        assert_eq!(parse_layered_limits("k", Some("1,2,3,4"), 2).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_zero_fills_to_required_length() {
        assert_eq!(parse_layered_limits("k", Some("1,2"), 4).unwrap(), vec![1, 2, 0, 0]);
    }

    #[test]
    fn test_wildcard_is_unlimited() {
        assert_eq!(parse_layered_limits("k", Some("1,*,3"), 0).unwrap(), vec![1, -1, 3]);
    }

    #[test]
    fn test_absent_expression() {
        assert!(parse_layered_limits("k", None, 0).unwrap().is_empty());
        assert_eq!(parse_layered_limits("k", None, 3).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_non_numeric_layer_fails() {
        let err = parse_layered_limits("k", Some("1,two"), 0).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref value, .. } if value == "two"));
    }

    #[test]
    fn test_discarded_layers_are_not_parsed() {
        // Layers beyond the required length never reach the parser
        assert_eq!(parse_layered_limits("k", Some("5,oops"), 1).unwrap(), vec![5]);
    }

    proptest! {
        #[test]
        fn prop_length_matches_request(
            layers in proptest::collection::vec(-1i32..500, 1..8),
            required in 1usize..10,
        ) {
            let expr = layers.iter().map(|l| l.to_string()).collect::<Vec<_>>().join(",");
            let limits = parse_layered_limits("k", Some(&expr), required).unwrap();
            prop_assert_eq!(limits.len(), required);
            for (i, limit) in limits.iter().enumerate() {
                let expected = layers.get(i).copied().unwrap_or(0);
                prop_assert_eq!(*limit, expected);
            }
        }
    }
}
