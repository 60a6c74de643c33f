//! Tolerant JSON extraction from completion text
//!
//! Models are asked for JSON but often wrap it in prose or a fenced block.
//! Order of attempts: the whole text, then every fenced block in order.

use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

lazy_static! {
    static ref FENCED_BLOCK: Regex = Regex::new(r"(?is)```(?:json)?[ \t]*\r?\n?(.*?)```")
        .expect("fenced block pattern is valid");
}

/// Returns the JSON value carried by `raw`, or `None` when neither the text
/// itself nor any fenced block parses
pub fn extract_json(raw: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(raw.trim()) {
        return Some(value);
    }

    FENCED_BLOCK
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .find_map(|inner| serde_json::from_str::<Value>(inner.as_str().trim()).ok())
}

/// Typed variant of [`extract_json`]
pub fn parse_json<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let value = extract_json(raw)?;
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!("JSON found but does not match the expected shape: {}", e);
            None
        }
    }
}

/// Parses `raw` into `T`, substituting `fallback` when nothing usable is found
pub fn parse_or<T: DeserializeOwned>(raw: &str, fallback: impl FnOnce() -> T) -> T {
    parse_json(raw).unwrap_or_else(|| {
        warn!(chars = raw.len(), "Unparseable completion, using fallback");
        fallback()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pair {
        a: i32,
        b: String,
    }

    #[test]
    fn plain_json_is_returned_unchanged() {
        let value = json!({"steps": [{"step": 1, "title": "Arrays"}], "nested": {"x": null}});
        let raw = serde_json::to_string(&value).unwrap();
        assert_eq!(extract_json(&raw), Some(value));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(extract_json("\n  [1, 2, 3]\n"), Some(json!([1, 2, 3])));
    }

    #[test]
    fn fenced_json_block_is_extracted() {
        let raw = "Sure! Here is your plan:\n```json\n{\"a\": 1, \"b\": \"x\"}\n```\nGood luck.";
        assert_eq!(extract_json(raw), Some(json!({"a": 1, "b": "x"})));
    }

    #[test]
    fn fence_without_language_tag_is_extracted() {
        let raw = "```\n{\"a\": 2, \"b\": \"y\"}\n```";
        let parsed: Pair = parse_json(raw).unwrap();
        assert_eq!(parsed, Pair { a: 2, b: "y".to_string() });
    }

    #[test]
    fn uppercase_tag_and_inline_fence() {
        let raw = "```JSON {\"a\": 3, \"b\": \"z\"}```";
        assert_eq!(extract_json(raw), Some(json!({"a": 3, "b": "z"})));
    }

    #[test]
    fn first_parseable_block_wins() {
        let raw = "```\nnot json\n```\nthen\n```json\n{\"a\": 4, \"b\": \"w\"}\n```";
        assert_eq!(extract_json(raw), Some(json!({"a": 4, "b": "w"})));
    }

    #[test]
    fn garbage_yields_none() {
        assert_eq!(extract_json("I could not produce a plan, sorry."), None);
        assert_eq!(extract_json("```json\n{broken\n```"), None);
        assert_eq!(extract_json(""), None);
    }

    #[test]
    fn wrong_shape_counts_as_unparseable() {
        assert_eq!(parse_json::<Pair>("{\"a\": \"nope\"}"), None);
    }

    #[test]
    fn parse_or_substitutes_fallback() {
        let parsed = parse_or("no json here", || Pair { a: 0, b: "fallback".to_string() });
        assert_eq!(parsed.b, "fallback");

        let parsed = parse_or("{\"a\": 9, \"b\": \"real\"}", || Pair { a: 0, b: "fallback".to_string() });
        assert_eq!(parsed, Pair { a: 9, b: "real".to_string() });
    }
}
