//! Ordered recognizer chain producing [`Subject`]s

use tracing::debug;

use super::generic::GenericUrlRecognizer;
use super::traits::SubjectRecognizer;
use super::vimeo::VimeoRecognizer;
use super::youtube::YouTubeRecognizer;
use crate::models::Subject;

/// Resolves raw URLs to subjects by trying recognizers in registration order
///
/// The first recognizer that both matches and yields an id wins. Order is
/// significant: provider-specific recognizers must come before the generic
/// catch-all or they are never consulted for http(s) URLs.
pub struct SubjectResolver {
    recognizers: Vec<Box<dyn SubjectRecognizer>>,
}

impl SubjectResolver {
    /// Empty chain; resolves nothing until recognizers are registered
    pub fn new() -> Self {
        Self {
            recognizers: Vec::new(),
        }
    }

    /// YouTube, Vimeo, then the generic http(s) catch-all
    pub fn with_default_recognizers() -> Self {
        let mut resolver = Self::new();
        resolver.register(YouTubeRecognizer);
        resolver.register(VimeoRecognizer);
        resolver.register(GenericUrlRecognizer);
        resolver
    }

    /// Append a recognizer to the end of the chain
    pub fn register<R: SubjectRecognizer + 'static>(&mut self, recognizer: R) {
        self.recognizers.push(Box::new(recognizer));
    }

    /// Names of the registered recognizers, in resolution order
    pub fn recognizer_names(&self) -> Vec<&'static str> {
        self.recognizers.iter().map(|r| r.name()).collect()
    }

    pub fn resolve(&self, raw_url: &str) -> Option<Subject> {
        let url = raw_url.trim();
        if url.is_empty() {
            return None;
        }

        for recognizer in &self.recognizers {
            if !recognizer.matches(url) {
                continue;
            }
            match recognizer.extract_id(url) {
                Some(id) if !id.trim().is_empty() => {
                    debug!("Resolved '{}' via {} recognizer to id '{}'", url, recognizer.name(), id);
                    return Some(Subject::new(id, recognizer.kind(), url));
                }
                _ => {
                    debug!(
                        "{} recognizer matched '{}' but extracted no id, falling through",
                        recognizer.name(),
                        url
                    );
                }
            }
        }

        None
    }

    pub fn is_valid_url(&self, raw_url: &str) -> bool {
        self.resolve(raw_url).is_some()
    }
}

impl Default for SubjectResolver {
    fn default() -> Self {
        Self::with_default_recognizers()
    }
}
