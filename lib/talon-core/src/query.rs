//! Query string encoding.
//!
//! Encodes an ordered sequence of key/value pairs, preserving input order
//! and duplicate keys. Spaces encode as `%20`, never `+`.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything but RFC 3986 unreserved characters is percent-encoded.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Encode an ordered sequence of query parameters.
///
/// Returns the empty string for an empty sequence, otherwise
/// `?k1=v1&k2=v2...` with percent-encoded keys and values.
#[must_use]
pub fn encode_query(pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return String::new();
    }

    let mut out = String::from("?");
    for (i, (key, value)) in pairs.iter().enumerate() {
        if i > 0 {
            out.push('&');
        }
        out.extend(utf8_percent_encode(key, QUERY_COMPONENT));
        out.push('=');
        out.extend(utf8_percent_encode(value, QUERY_COMPONENT));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(values: &[(&str, &str)]) -> Vec<(String, String)> {
        values
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn empty_sequence_encodes_to_empty_string() {
        assert_eq!(encode_query(&[]), "");
    }

    #[test]
    fn encodes_pairs_in_order_without_trailing_ampersand() {
        let query = encode_query(&pairs(&[("a", "1"), ("b", "2"), ("c", "3")]));
        assert_eq!(query, "?a=1&b=2&c=3");
    }

    #[test]
    fn duplicate_keys_are_preserved() {
        let query = encode_query(&pairs(&[("tag", "x"), ("tag", "y")]));
        assert_eq!(query, "?tag=x&tag=y");
    }

    #[test]
    fn space_encodes_as_percent_twenty() {
        let query = encode_query(&pairs(&[("q", "hello world")]));
        assert_eq!(query, "?q=hello%20world");
    }

    #[test]
    fn reserved_characters_are_encoded() {
        let query = encode_query(&pairs(&[("redirect", "https://example.org/a?b=c&d=e")]));
        assert_eq!(
            query,
            "?redirect=https%3A%2F%2Fexample.org%2Fa%3Fb%3Dc%26d%3De"
        );
    }

    #[test]
    fn unreserved_characters_pass_through() {
        let query = encode_query(&pairs(&[("k-1_2.3~", "v-1_2.3~")]));
        assert_eq!(query, "?k-1_2.3~=v-1_2.3~");
    }
}
