//! Turns the model's free-form reply into a validated `BookSummary`.
//!
//! The reply is untrusted text. It is expected to hold one JSON object, possibly
//! wrapped in a ```json fence. Nothing downstream sees the raw JSON value.
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;

use crate::book::{new_id, BookSummary};
use crate::error::SearchError;

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\s*|\s*```").expect("fence pattern is valid"));

/// Remove every ```json opener and ``` closer, plus surrounding whitespace.
pub fn strip_fences(text: &str) -> String {
    FENCE.replace_all(text.trim(), "").trim().to_string()
}

/// Parse and validate a model reply, assigning a fresh id.
pub fn parse_reply(raw: &str) -> Result<BookSummary, SearchError> {
    let cleaned = strip_fences(raw);

    let value: Value = serde_json::from_str(&cleaned).map_err(|e| {
        warn!(error = %e, reply = %cleaned, "model reply is not valid JSON");
        SearchError::Malformed(Some(e))
    })?;

    let Value::Object(fields) = value else {
        warn!(reply = %cleaned, "model reply is JSON but not an object");
        return Err(SearchError::Malformed(None));
    };

    let title = required(&fields, "title")?;
    let author = required(&fields, "author")?;
    let summary = required(&fields, "summary")?;

    Ok(BookSummary {
        title,
        author,
        published_year: fields.get("published_year").and_then(coerce_year),
        summary,
        main_content: text(fields.get("main_content")).unwrap_or_default(),
        insights: text(fields.get("insights")).unwrap_or_default(),
        quotes: quotes(fields.get("quotes")),
        id: new_id(),
    })
}

fn required(fields: &Map<String, Value>, key: &'static str) -> Result<String, SearchError> {
    text(fields.get(key)).ok_or_else(|| {
        warn!(field = key, "model reply is missing a required field");
        SearchError::MissingField(key)
    })
}

/// Non-blank strings and non-zero numbers; zero counts as absent.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Best-effort integer year. Anything that does not yield an in-range integer is `None`.
pub fn coerce_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return i32::try_from(i).ok();
            }
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(f64::trunc)
                .filter(|f| *f >= i32::MIN as f64 && *f <= i32::MAX as f64)
                .map(|f| f as i32)
        }
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    }
}

/// Leading-integer parse: optional whitespace, optional sign, then digits.
/// Trailing text is ignored, so `"2008年"` reads as 2008.
fn parse_int_prefix(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let len = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if len == 0 {
        return None;
    }
    let magnitude = rest[..len].parse::<i64>().ok()?;
    i32::try_from(if negative { -magnitude } else { magnitude }).ok()
}

fn quotes(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const THREE_BODY: &str = r#"{"title":"三体","author":"刘慈欣","published_year":"2008","summary":"...", "main_content":"...", "insights":"...", "quotes":["地球是一个小数点"]}"#;

    #[test]
    fn parses_documented_example() {
        let book = parse_reply(THREE_BODY).unwrap();
        assert_eq!(book.title, "三体");
        assert_eq!(book.author, "刘慈欣");
        assert_eq!(book.published_year, Some(2008));
        assert_eq!(book.quotes, vec!["地球是一个小数点".to_string()]);
        assert!(!book.id.is_empty());
    }

    #[test]
    fn fenced_and_bare_replies_parse_identically() {
        let fenced = format!("```json\n{THREE_BODY}\n```");
        let a = parse_reply(THREE_BODY).unwrap();
        let b = parse_reply(&fenced).unwrap();
        assert_eq!(
            BookSummary { id: String::new(), ..a },
            BookSummary { id: String::new(), ..b }
        );
    }

    #[test]
    fn strip_fences_is_idempotent() {
        for raw in [
            format!("```json\n{THREE_BODY}\n```"),
            format!("  ```json {THREE_BODY}```  "),
            format!("```\n{THREE_BODY}\n```"),
            THREE_BODY.to_string(),
        ] {
            let once = strip_fences(&raw);
            assert_eq!(once, THREE_BODY);
            assert_eq!(strip_fences(&once), once);
        }
    }

    #[test]
    fn non_json_is_malformed() {
        let err = parse_reply("抱歉，我无法找到这本书。").unwrap_err();
        assert!(matches!(err, SearchError::Malformed(Some(_))));
        assert_eq!(err.to_string(), "AI 返回格式错误");
    }

    #[test]
    fn json_array_is_malformed() {
        let err = parse_reply(r#"[{"title":"三体"}]"#).unwrap_err();
        assert!(matches!(err, SearchError::Malformed(None)));
    }

    #[test]
    fn missing_or_blank_required_fields_are_rejected() {
        let err = parse_reply(r#"{"title":"三体","summary":"..."}"#).unwrap_err();
        assert!(matches!(err, SearchError::MissingField("author")));

        let err = parse_reply(r#"{"title":"三体","author":"刘慈欣","summary":"  "}"#).unwrap_err();
        assert!(matches!(err, SearchError::MissingField("summary")));

        let err = parse_reply(r#"{"title":null,"author":"刘慈欣","summary":"x"}"#).unwrap_err();
        assert!(matches!(err, SearchError::MissingField("title")));
    }

    #[test]
    fn numeric_title_is_accepted() {
        let book = parse_reply(r#"{"title":1984,"author":"George Orwell","summary":"x"}"#).unwrap();
        assert_eq!(book.title, "1984");
    }

    #[test]
    fn zero_required_field_is_missing() {
        let err = parse_reply(r#"{"title":"t","author":0,"summary":"s"}"#).unwrap_err();
        assert!(matches!(err, SearchError::MissingField("author")));

        let err = parse_reply(r#"{"title":"t","author":"a","summary":0.0}"#).unwrap_err();
        assert!(matches!(err, SearchError::MissingField("summary")));
    }

    #[test]
    fn uppercase_fence_tag_is_not_stripped() {
        let err = parse_reply(&format!("```JSON\n{THREE_BODY}\n```")).unwrap_err();
        assert!(matches!(err, SearchError::Malformed(Some(_))));
    }

    #[test]
    fn quotes_default_to_empty() {
        for quotes in ["", r#","quotes":"一句话""#, r#","quotes":{"a":"b"}"#, r#","quotes":null"#] {
            let raw = format!(r#"{{"title":"t","author":"a","summary":"s"{quotes}}}"#);
            assert!(parse_reply(&raw).unwrap().quotes.is_empty(), "quotes: {quotes}");
        }
    }

    #[test]
    fn quote_elements_keep_text_and_numbers() {
        let quotes = super::quotes(Some(&json!(["a", 42, null, {"x": 1}, "b"])));
        assert_eq!(quotes, vec!["a", "42", "b"]);
    }

    #[test]
    fn optional_text_fields_default_to_empty() {
        let book = parse_reply(r#"{"title":"t","author":"a","summary":"s","insights":[]}"#).unwrap();
        assert_eq!(book.main_content, "");
        assert_eq!(book.insights, "");
        assert_eq!(book.published_year, None);
    }

    #[test]
    fn year_coercion() {
        assert_eq!(coerce_year(&json!(2008)), Some(2008));
        assert_eq!(coerce_year(&json!("2008")), Some(2008));
        assert_eq!(coerce_year(&json!(" 2008年")), Some(2008));
        assert_eq!(coerce_year(&json!(1605.9)), Some(1605));
        assert_eq!(coerce_year(&json!("-500")), Some(-500));
        assert_eq!(coerce_year(&json!("约1605年")), None);
        assert_eq!(coerce_year(&json!("")), None);
        assert_eq!(coerce_year(&json!(null)), None);
        assert_eq!(coerce_year(&json!(true)), None);
        assert_eq!(coerce_year(&json!(99_999_999_999_i64)), None);
        assert_eq!(coerce_year(&json!("99999999999")), None);
    }

    #[test]
    fn uncoercible_year_is_dropped_not_fatal() {
        let book =
            parse_reply(r#"{"title":"t","author":"a","summary":"s","published_year":"未知"}"#).unwrap();
        assert_eq!(book.published_year, None);
    }
}
