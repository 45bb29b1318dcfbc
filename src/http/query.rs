//! Query-string parameter extraction
//!
//! Deliberately simple: no arrays, no repeated keys beyond "first one wins".

use url::form_urlencoded;

/// Find `key` in a raw query string.
///
/// The query is split on `&`, each pair on `=` with trailing empty pieces
/// dropped, and only pairs left with exactly two pieces take part: `a=b=c`,
/// a bare `flag` and `name=` are all skipped. Keys compare case-insensitively
/// and the first matching pair wins. The value is form-url-decoded.
///
/// # Examples
/// ```
/// use simple_http_server::http::query::query_param;
/// assert_eq!(query_param(Some("NAME=Zoe"), "name").as_deref(), Some("Zoe"));
/// assert_eq!(query_param(Some("name=a=b"), "name"), None);
/// assert_eq!(query_param(None, "name"), None);
/// ```
pub fn query_param(query: Option<&str>, key: &str) -> Option<String> {
    query?.split('&').find_map(|pair| {
        let mut pieces: Vec<&str> = pair.split('=').collect();
        while pieces.last().is_some_and(|piece| piece.is_empty()) {
            pieces.pop();
        }
        match pieces.as_slice() {
            [name, value] if name.eq_ignore_ascii_case(key) => Some(decode_component(value)),
            _ => None,
        }
    })
}

/// Decode one form-url-encoded component (`%XX` escapes, `+` as space).
/// Invalid escapes are kept literally.
fn decode_component(raw: &str) -> String {
    // A component holds no `&` or `=`, so it parses as a single bare name.
    form_urlencoded::parse(raw.as_bytes())
        .next()
        .map(|(decoded, _)| decoded.into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_lookup() {
        let q = Some("name=Alice&age=30");
        assert_eq!(query_param(q, "name").as_deref(), Some("Alice"));
        assert_eq!(query_param(q, "age").as_deref(), Some("30"));
        assert_eq!(query_param(q, "city"), None);
    }

    #[test]
    fn test_case_insensitive_key() {
        assert_eq!(query_param(Some("NAME=Zoe"), "name").as_deref(), Some("Zoe"));
        assert_eq!(query_param(Some("Age=7"), "AGE").as_deref(), Some("7"));
    }

    #[test]
    fn test_first_match_wins() {
        let q = Some("name=first&NAME=second&name=third");
        assert_eq!(query_param(q, "name").as_deref(), Some("first"));
    }

    #[test]
    fn test_malformed_pairs_skipped() {
        let q = Some("flag&name=a=b&&=x&age=41");
        assert_eq!(query_param(q, "name"), None);
        assert_eq!(query_param(q, "flag"), None);
        assert_eq!(query_param(q, "age").as_deref(), Some("41"));
        // A later well-formed pair still matches after a malformed one
        let q = Some("name=a=b&name=Bob");
        assert_eq!(query_param(q, "name").as_deref(), Some("Bob"));
    }

    #[test]
    fn test_empty_value_is_absent() {
        assert_eq!(query_param(Some("name="), "name"), None);
        assert_eq!(query_param(Some("name=="), "name"), None);
        // Trailing `=` is dropped before counting pieces
        assert_eq!(query_param(Some("name=Ann="), "name").as_deref(), Some("Ann"));
    }

    #[test]
    fn test_percent_decoding() {
        let q = Some("name=J%C3%BCrgen%20M&city=New+York");
        assert_eq!(query_param(q, "name").as_deref(), Some("Jürgen M"));
        assert_eq!(query_param(q, "city").as_deref(), Some("New York"));
        assert_eq!(query_param(Some("v=100%"), "v").as_deref(), Some("100%"));
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(query_param(Some(""), "name"), None);
        assert_eq!(query_param(None, "name"), None);
    }
}
