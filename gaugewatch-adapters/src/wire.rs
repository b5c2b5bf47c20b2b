//! Serde helpers shared by the upstream wire formats.

use serde::{Deserialize, Deserializer};

/// Identifiers arrive as strings from one schema and integers from the other.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
}

/// Deserialize a string-or-integer id into a `String`.
pub(crate) fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Integer(n) => n.to_string(),
    })
}

/// `enabled` defaults to true when the backend omits it.
#[cfg_attr(not(feature = "http"), allow(dead_code))]
pub(crate) fn enabled_default() -> bool {
    true
}

/// Escape an identifier for use as a URL path segment.
#[cfg_attr(not(feature = "http"), allow(dead_code))]
pub(crate) fn path_segment(s: &str) -> String {
    // Dot segments would be collapsed by URL normalization.
    if s == "." || s == ".." {
        return s.replace('.', "%2E");
    }
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '/' => out.push_str("%2F"),
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct IdField {
        #[serde(deserialize_with = "id")]
        id: String,
    }

    #[test]
    fn test_id_accepts_strings_and_integers() {
        let p: IdField = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(p.id, "42");

        let p: IdField = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert_eq!(p.id, "abc");

        assert!(serde_json::from_str::<IdField>(r#"{"id": 1.5}"#).is_err());
    }

    #[test]
    fn test_path_segment() {
        assert_eq!(path_segment("simple"), "simple");
        assert_eq!(path_segment("a/b"), "a%2Fb");
        assert_eq!(path_segment("50% load"), "50%25%20load");
    }

    #[test]
    fn test_path_segment_dot_segments() {
        assert_eq!(path_segment("."), "%2E");
        assert_eq!(path_segment(".."), "%2E%2E");
        assert_eq!(path_segment("..."), "...");
        assert_eq!(path_segment("cpu.load"), "cpu.load");
        assert_eq!(path_segment("../admin"), "..%2Fadmin");
    }
}
