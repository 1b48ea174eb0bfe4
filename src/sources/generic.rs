use super::traits::SubjectRecognizer;
use crate::models::SubjectKind;
use crate::utils::url::UrlUtils;

/// Terminal catch-all: any valid http(s) URL is its own subject id
///
/// Must be registered last; anything registered after it never sees an http(s) URL.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericUrlRecognizer;

impl SubjectRecognizer for GenericUrlRecognizer {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn kind(&self) -> SubjectKind {
        SubjectKind::GenericUrl
    }

    fn matches(&self, url: &str) -> bool {
        UrlUtils::is_http_url(url)
    }

    fn extract_id(&self, url: &str) -> Option<String> {
        self.matches(url).then(|| url.trim().to_string())
    }
}
