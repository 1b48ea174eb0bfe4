use serde::{Deserialize, Serialize};

use crate::errors::CommentaryError;

/// Generic error text used when a failure carries no message
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// One accepted piece of commentary
///
/// Fields are private so an item can only be built through [`CommentaryItem::new`],
/// which guarantees non-empty text and a finite, non-negative timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentaryItem {
    text: String,
    timestamp: f64,
    raw_action: Option<String>,
}

impl CommentaryItem {
    /// Returns `None` when `text` is blank
    pub fn new<S: Into<String>>(text: S, timestamp: f64, raw_action: Option<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }

        let timestamp = if timestamp.is_finite() && timestamp > 0.0 {
            timestamp
        } else {
            0.0
        };

        Some(Self {
            text,
            timestamp,
            raw_action,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Playback position (seconds) the commentary is attributed to
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn raw_action(&self) -> Option<&str> {
        self.raw_action.as_deref()
    }
}

/// Request body for `POST /live-commentary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveCommentaryRequest {
    pub video_id: String,
    pub timestamp: f64,
    pub window_size: f64,
}

/// Typed, defensively decoded backend answer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResult {
    pub commentary: Option<String>,
    pub raw_action: Option<String>,
    pub timestamp: f64,
    pub skipped: bool,
    pub error: Option<String>,
}

impl NormalizedResult {
    /// Skipped result carrying an error message
    ///
    /// A blank message is replaced with [`UNKNOWN_ERROR`].
    pub fn from_failure<S: AsRef<str>>(message: S, fallback_timestamp: f64) -> Self {
        let message = message.as_ref().trim();
        let error = if message.is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message.to_string()
        };

        Self {
            commentary: None,
            raw_action: None,
            timestamp: fallback_timestamp,
            skipped: true,
            error: Some(error),
        }
    }

    pub fn from_error(error: &CommentaryError, fallback_timestamp: f64) -> Self {
        let message = match error {
            CommentaryError::Transport { message } | CommentaryError::Decode { message } => {
                message.clone()
            }
            other => other.to_string(),
        };
        Self::from_failure(message, fallback_timestamp)
    }

    /// Commentary text, if the backend produced any
    pub fn commentary_text(&self) -> Option<&str> {
        self.commentary
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_item_rejects_blank_text() {
        assert!(CommentaryItem::new("", 1.0, None).is_none());
        assert!(CommentaryItem::new("   \n", 1.0, None).is_none());
        assert!(CommentaryItem::new("Team presses high", 1.0, None).is_some());
    }

    #[test]
    fn test_item_clamps_invalid_timestamps() {
        assert_eq!(CommentaryItem::new("x", -3.0, None).unwrap().timestamp(), 0.0);
        assert_eq!(CommentaryItem::new("x", f64::NAN, None).unwrap().timestamp(), 0.0);
        assert_eq!(CommentaryItem::new("x", 12.3, None).unwrap().timestamp(), 12.3);
    }

    #[test]
    fn test_request_uses_camel_case_on_the_wire() {
        let request = LiveCommentaryRequest {
            video_id: "abc".to_string(),
            timestamp: 12.5,
            window_size: 5.0,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"videoId": "abc", "timestamp": 12.5, "windowSize": 5.0})
        );
    }

    #[test]
    fn test_failure_without_message_uses_generic_text() {
        let result = NormalizedResult::from_failure("  ", 4.0);
        assert!(result.skipped);
        assert_eq!(result.error.as_deref(), Some(UNKNOWN_ERROR));
        assert_eq!(result.timestamp, 4.0);
        assert!(result.commentary.is_none());
    }

    #[test]
    fn test_from_error_keeps_transport_message_verbatim() {
        let result =
            NormalizedResult::from_error(&CommentaryError::transport("connection refused"), 0.0);
        assert_eq!(result.error.as_deref(), Some("connection refused"));

        let timeout = CommentaryError::Timeout {
            after: Duration::from_secs(2),
        };
        let result = NormalizedResult::from_error(&timeout, 0.0);
        assert_eq!(result.error.as_deref(), Some("request timed out after 2s"));
    }
}
