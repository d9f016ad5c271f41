//! Authenticated request URL construction.
//!
//! Parameter structs describe their query keys declaratively through serde
//! attributes; [`encode_query`] flattens them into ordered key/value pairs and
//! [`build_url`] appends the API key.

use serde::Serialize;
use serde_json::Value;
use shodan_core::{Result, ShodanError};
use url::Url;

/// Query parameter carrying the API key
pub const KEY_PARAM: &str = "key";

/// Build `base + path` with the encoded `params` and the API key as its query.
///
/// Any query already present on `base + path` is replaced. Pass `&()` when an
/// endpoint takes no parameters.
pub fn build_url<P>(base: &str, path: &str, params: &P, api_key: &str) -> Result<Url>
where
    P: Serialize + ?Sized,
{
    let raw = format!("{base}{path}");
    let mut url = Url::parse(&raw).map_err(|e| ShodanError::InvalidUrl(format!("{raw}: {e}")))?;
    let pairs = encode_query(params)?;

    url.set_query(None);
    url.query_pairs_mut()
        .extend_pairs(&pairs)
        .append_pair(KEY_PARAM, api_key);

    Ok(url)
}

/// Flatten a serializable parameter object into query pairs.
///
/// The value must serialize to a map (or to nothing). `None`/null fields are
/// skipped, scalars become one pair, and sequences of scalars become one pair
/// per element under the same key. Anything nested deeper is rejected.
pub fn encode_query<P>(params: &P) -> Result<Vec<(String, String)>>
where
    P: Serialize + ?Sized,
{
    let value =
        serde_json::to_value(params).map_err(|e| ShodanError::QueryEncode(e.to_string()))?;

    let fields = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Object(fields) => fields,
        other => {
            return Err(ShodanError::QueryEncode(format!(
                "parameters must be a struct or map, got {}",
                kind(&other)
            )))
        }
    };

    let mut pairs = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    let item = scalar(&key, item)?;
                    pairs.push((key.clone(), item));
                }
            }
            other => {
                let value = scalar(&key, other)?;
                pairs.push((key, value));
            }
        }
    }

    Ok(pairs)
}

/// Encode parameters as an `application/x-www-form-urlencoded` body
pub fn encode_form<P>(params: &P) -> Result<String>
where
    P: Serialize + ?Sized,
{
    let pairs = encode_query(params)?;
    Ok(url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(&pairs)
        .finish())
}

fn scalar(key: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(ShodanError::QueryEncode(format!(
            "field `{key}` holds {}, only scalars and lists of scalars are supported",
            kind(&other)
        ))),
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
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
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct SearchParams<'a> {
        query: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        page: Option<u32>,
        minify: Option<bool>,
    }

    fn pairs_of(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn test_key_is_always_present() {
        let url = build_url("https://api.shodan.io", "/api-info", &(), "secret").unwrap();
        assert_eq!(url.as_str(), "https://api.shodan.io/api-info?key=secret");
    }

    #[test]
    fn test_params_are_encoded() {
        let params = SearchParams {
            query: "apache country:\"US\"",
            page: Some(2),
            minify: None,
        };
        let url = build_url("https://api.shodan.io", "/shodan/host/search", &params, "k").unwrap();
        let pairs = pairs_of(&url);

        assert_eq!(pairs["query"], "apache country:\"US\"");
        assert_eq!(pairs["page"], "2");
        assert_eq!(pairs["key"], "k");
        assert!(!pairs.contains_key("minify"));
        assert_eq!(url.path(), "/shodan/host/search");
    }

    #[test]
    fn test_output_is_deterministic() {
        let params = SearchParams {
            query: "nginx",
            page: None,
            minify: Some(true),
        };
        let a = build_url("https://api.shodan.io", "/x", &params, "k").unwrap();
        let b = build_url("https://api.shodan.io", "/x", &params, "k").unwrap();
        assert_eq!(a, b);
        assert_eq!(pairs_of(&a)["minify"], "true");
    }

    #[test]
    fn test_existing_query_is_replaced() {
        let url = build_url("https://api.shodan.io", "/x?stale=1", &(), "k").unwrap();
        assert_eq!(url.query(), Some("key=k"));
    }

    #[test]
    fn test_key_is_escaped() {
        let url = build_url("https://api.shodan.io", "/x", &(), "a&b=c").unwrap();
        assert_eq!(pairs_of(&url)["key"], "a&b=c");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = build_url("not a url", "/x", &(), "k").unwrap_err();
        assert!(matches!(err, ShodanError::InvalidUrl(_)));
    }

    #[test]
    fn test_list_becomes_repeated_pairs() {
        let pairs = encode_query(&serde_json::json!({"ips": ["1.1.1.1", "8.8.8.8"]})).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("ips".to_string(), "1.1.1.1".to_string()),
                ("ips".to_string(), "8.8.8.8".to_string()),
            ]
        );
    }

    #[test]
    fn test_nested_object_is_rejected() {
        let err = encode_query(&serde_json::json!({"filter": {"port": 22}})).unwrap_err();
        assert!(matches!(err, ShodanError::QueryEncode(_)));

        let err = encode_query(&serde_json::json!({"grid": [[1, 2]]})).unwrap_err();
        assert!(matches!(err, ShodanError::QueryEncode(_)));
    }

    #[test]
    fn test_non_struct_params_are_rejected() {
        let err = encode_query("just a string").unwrap_err();
        assert!(matches!(err, ShodanError::QueryEncode(_)));
    }

    #[test]
    fn test_form_body() {
        let body = encode_form(&serde_json::json!({"ips": "1.1.1.1,8.8.8.8"})).unwrap();
        assert_eq!(body, "ips=1.1.1.1%2C8.8.8.8");
    }
}
