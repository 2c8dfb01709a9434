use axum::http::{HeaderMap, StatusCode};
use serde_json::Value;

pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(actual, expected, "{context}: unexpected status");
}

/// Assert the gateway error envelope with the given HTTP code.
pub fn assert_error_envelope(body: &Value, code: u16) {
    assert_eq!(body["status"], "error", "envelope status: {body}");
    assert_eq!(body["code"], code, "envelope code: {body}");
    assert!(body["error"].is_string(), "envelope error message: {body}");
    assert!(body.get("results").is_none(), "error envelope carries no results: {body}");
}

/// Records of a success envelope, as JSON values.
pub fn results(body: &Value) -> &Vec<Value> {
    assert_eq!(body["status"], "success", "envelope status: {body}");
    body["results"]
        .as_array()
        .unwrap_or_else(|| panic!("results must be an array: {body}"))
}

pub fn titles_and_prices(body: &Value) -> Vec<(String, i64)> {
    results(body)
        .iter()
        .map(|r| {
            (
                r["title"].as_str().unwrap_or_default().to_string(),
                r["price"].as_i64().unwrap_or_default(),
            )
        })
        .collect()
}

pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
