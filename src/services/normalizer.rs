//! Defensive decoding of backend responses
//!
//! The backend may be a stub, a proxied AI vendor or a half-finished handler,
//! so nothing about its answer is trusted: every field is coerced on its own
//! and every failure becomes a skipped result instead of an error.

use serde_json::{Map, Value};

use crate::models::NormalizedResult;

/// Longest slice of a raw error body carried into `error`
pub const MAX_ERROR_BODY_CHARS: usize = 300;

pub struct ResponseNormalizer;

impl ResponseNormalizer {
    /// Decode `(status, body)` into a [`NormalizedResult`]; never fails
    ///
    /// `fallback_timestamp` is used whenever the body does not carry a usable
    /// timestamp of its own.
    pub fn normalize(status: u16, raw_body: &str, fallback_timestamp: f64) -> NormalizedResult {
        let body = Self::parse_object(raw_body);

        if !(200..300).contains(&status) {
            let error = Self::text_field(&body, "error")
                .or_else(|| Self::text_field(&body, "message"))
                .or_else(|| {
                    let trimmed = raw_body.trim();
                    (!trimmed.is_empty())
                        .then(|| trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect())
                })
                .unwrap_or_else(|| format!("HTTP {status}"));

            return NormalizedResult {
                commentary: None,
                raw_action: None,
                timestamp: fallback_timestamp,
                skipped: true,
                error: Some(error),
            };
        }

        NormalizedResult {
            commentary: Self::text_field(&body, "commentary"),
            raw_action: Self::text_field(&body, "rawAction"),
            timestamp: Self::number_field(&body, "timestamp").unwrap_or(fallback_timestamp),
            skipped: body.get("skipped").is_some_and(Self::truthy),
            error: Self::text_field(&body, "error"),
        }
    }

    /// Parse failure and non-object JSON both decode as an empty object
    fn parse_object(raw_body: &str) -> Map<String, Value> {
        match serde_json::from_str::<Value>(raw_body) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Textual and non-blank after trimming, stored trimmed
    fn text_field(body: &Map<String, Value>, key: &str) -> Option<String> {
        match body.get(key) {
            Some(Value::String(text)) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            _ => None,
        }
    }

    /// Finite number, or a string that parses as one
    fn number_field(body: &Map<String, Value>, key: &str) -> Option<f64> {
        let value = match body.get(key)? {
            Value::Number(number) => number.as_f64()?,
            Value::String(text) => text.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    fn truthy(value: &Value) -> bool {
        match value {
            Value::Null => false,
            Value::Bool(flag) => *flag,
            Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
            Value::String(text) => !text.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}
