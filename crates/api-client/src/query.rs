//! Query-string construction

use std::collections::BTreeMap;
use std::fmt::Write;

/// Serializes `params` into a query string.
///
/// Keys come out in sorted order and `None` values are dropped. Keys and
/// values are percent-encoded. Returns `""` when nothing remains, otherwise
/// the string starts with `?`.
///
/// # Example
/// ```
/// use std::collections::BTreeMap;
/// use spaces_api_client::parse_query;
///
/// let mut params = BTreeMap::new();
/// params.insert("radius", Some("500".to_string()));
/// params.insert("location", Some("13.405,52.52".to_string()));
/// params.insert("count", None);
///
/// assert_eq!(parse_query(&params), "?location=13.405%2C52.52&radius=500");
/// ```
pub fn parse_query<K, V>(params: &BTreeMap<K, Option<V>>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut out = String::new();
    for (key, value) in params {
        let Some(value) = value else { continue };
        out.push(if out.is_empty() { '?' } else { '&' });
        encode_component(key.as_ref(), &mut out);
        out.push('=');
        encode_component(value.as_ref(), &mut out);
    }
    out
}

/// Builder over [`parse_query`] that accepts anything displayable.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    params: BTreeMap<String, Option<String>>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.insert(key.to_string(), Some(value.to_string()));
        self
    }

    /// Adds the parameter only when `value` is `Some`.
    #[must_use]
    pub fn maybe(mut self, key: &str, value: Option<impl ToString>) -> Self {
        self.params
            .insert(key.to_string(), value.map(|v| v.to_string()));
        self
    }

    pub fn build(&self) -> String {
        parse_query(&self.params)
    }
}

/// Encodes a single path segment or query component.
pub fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    encode_component(segment, &mut out);
    out
}

// Unreserved set matches encodeURIComponent
fn encode_component(input: &str, out: &mut String) {
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mapping_is_empty_string() {
        let params: BTreeMap<&str, Option<&str>> = BTreeMap::new();
        assert_eq!(parse_query(&params), "");
    }

    #[test]
    fn test_all_none_is_empty_string() {
        let mut params: BTreeMap<&str, Option<&str>> = BTreeMap::new();
        params.insert("count", None);
        params.insert("offset", None);
        assert_eq!(parse_query(&params), "");
    }

    #[test]
    fn test_keys_sorted_and_joined() {
        let mut params = BTreeMap::new();
        params.insert("sort", Some("recent"));
        params.insert("offset", Some("0"));
        params.insert("count", Some("10"));
        assert_eq!(parse_query(&params), "?count=10&offset=0&sort=recent");
    }

    #[test]
    fn test_percent_encoding() {
        let mut params = BTreeMap::new();
        params.insert("q", Some("a b&c=d/é"));
        assert_eq!(parse_query(&params), "?q=a%20b%26c%3Dd%2F%C3%A9");

        assert_eq!(encode_path_segment("it's (ok)!"), "it's%20(ok)!");
    }

    #[test]
    fn test_builder_skips_missing() {
        let query = QueryParams::new()
            .param("radius", 500)
            .maybe("count", None::<u32>)
            .maybe("messages_offset", Some(20))
            .build();
        assert_eq!(query, "?messages_offset=20&radius=500");
    }
}
