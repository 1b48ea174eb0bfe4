//! Recognizer trait definitions

use crate::models::SubjectKind;

/// One link of the resolver chain
///
/// Implementations must be pure: no network access and no interior state that
/// changes the answer between calls. `matches` is a cheap pre-check; a
/// recognizer that matches but cannot extract an id is treated as a non-match
/// by [`SubjectResolver`](super::SubjectResolver).
pub trait SubjectRecognizer: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Kind assigned to subjects this recognizer produces
    fn kind(&self) -> SubjectKind;

    /// Whether this recognizer handles the (trimmed) URL
    fn matches(&self, url: &str) -> bool;

    /// Extract the canonical subject id from the (trimmed) URL
    fn extract_id(&self, url: &str) -> Option<String>;
}
