//! Tests for the truncation-tolerant reader

use super::parse_partial;
use serde_json::json;

#[test]
fn test_complete_object() {
    let value = parse_partial(r#"{"answer":"Use less butter.","tools_used":["lookup"]}"#);
    assert_eq!(
        value,
        Some(json!({"answer": "Use less butter.", "tools_used": ["lookup"]}))
    );
}

#[test]
fn test_empty_input_yields_nothing() {
    assert_eq!(parse_partial(""), None);
    assert_eq!(parse_partial("   "), None);
}

#[test]
fn test_bare_open_brace() {
    assert_eq!(parse_partial("{"), Some(json!({})));
}

#[test]
fn test_truncated_key_is_dropped() {
    assert_eq!(parse_partial(r#"{"ans"#), Some(json!({})));
}

#[test]
fn test_key_without_value_is_dropped() {
    assert_eq!(parse_partial(r#"{"answer""#), Some(json!({})));
    assert_eq!(parse_partial(r#"{"answer":"#), Some(json!({})));
}

#[test]
fn test_truncated_string_value_keeps_content() {
    assert_eq!(
        parse_partial(r#"{"answer":"Use le"#),
        Some(json!({"answer": "Use le"}))
    );
}

#[test]
fn test_truncated_escape_is_dropped() {
    // Lone backslash at the truncation point
    assert_eq!(parse_partial("{\"a\":\"x\\"), Some(json!({"a": "x"})));
    // Partial \uXXXX
    assert_eq!(parse_partial("{\"a\":\"x\\u26"), Some(json!({"a": "x"})));
}

#[test]
fn test_complete_escapes_decode() {
    assert_eq!(
        parse_partial(r#"{"a":"line\nbreak A"}"#),
        Some(json!({"a": "line\nbreak A"}))
    );
}

#[test]
fn test_surrogate_pair_decodes() {
    assert_eq!(
        parse_partial(r#"{"a":"😀"}"#),
        Some(json!({"a": "😀"}))
    );
}

#[test]
fn test_truncated_surrogate_pair_is_dropped() {
    assert_eq!(parse_partial(r#"{"a":"x\uD83D"#), Some(json!({"a": "x"})));
    assert_eq!(parse_partial(r#"{"a":"x\uD83D\uDE"#), Some(json!({"a": "x"})));
}

#[test]
fn test_truncated_number_is_dropped() {
    // The next chunk could extend 12 into 123; it cannot be trusted yet.
    assert_eq!(parse_partial(r#"{"a":12"#), Some(json!({})));
}

#[test]
fn test_delimited_number_is_kept() {
    assert_eq!(parse_partial(r#"{"a":12,"b"#), Some(json!({"a": 12})));
    assert_eq!(parse_partial(r#"{"a":12}"#), Some(json!({"a": 12})));
}

#[test]
fn test_truncated_literal_is_dropped() {
    assert_eq!(parse_partial(r#"{"ok":tru"#), Some(json!({})));
    assert_eq!(parse_partial("tru"), None);
}

#[test]
fn test_exactly_terminated_literal_is_kept() {
    // Keywords cannot be extended, so a full match at the truncation point
    // is already complete.
    assert_eq!(parse_partial(r#"{"ok":true"#), Some(json!({"ok": true})));
    assert_eq!(parse_partial(r#"{"x":null"#), Some(json!({"x": null})));
}

#[test]
fn test_truncated_array() {
    assert_eq!(parse_partial(r#"["a","b"#), Some(json!(["a", "b"])));
    assert_eq!(parse_partial(r#"["a","#), Some(json!(["a"])));
    assert_eq!(parse_partial("[tru"), Some(json!([])));
}

#[test]
fn test_nested_truncation() {
    assert_eq!(
        parse_partial(r#"{"a":{"b":[1,2"#),
        Some(json!({"a": {"b": [1]}}))
    );
    assert_eq!(
        parse_partial(r#"{"a":{"b":[1,2]"#),
        Some(json!({"a": {"b": [1, 2]}}))
    );
}

#[test]
fn test_top_level_string() {
    assert_eq!(parse_partial(r#""abc"#), Some(json!("abc")));
    assert_eq!(parse_partial(r#""abc""#), Some(json!("abc")));
}

#[test]
fn test_whitespace_tolerated() {
    assert_eq!(
        parse_partial(" {\n  \"a\" : 1 ,\n  \"b\" : \"x"),
        Some(json!({"a": 1, "b": "x"}))
    );
}

#[test]
fn test_malformed_input_yields_nothing() {
    assert_eq!(parse_partial("{a:1}"), None);
    assert_eq!(parse_partial(r#"{"a" 1}"#), None);
    assert_eq!(parse_partial("<html>"), None);
}

#[test]
fn test_trailing_text_after_complete_value_is_ignored() {
    assert_eq!(parse_partial(r#"{"a":1} garbage"#), Some(json!({"a": 1})));
}
