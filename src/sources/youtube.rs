use regex::Regex;
use std::sync::OnceLock;

use super::traits::SubjectRecognizer;
use crate::models::{SubjectKind, VideoProvider};

fn host_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(https?://)?(www\.)?(youtube\.com|youtu\.be|m\.youtube\.com)(?:[/:?#]|$)")
            .expect("YouTube host pattern is valid")
    })
}

fn id_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/|youtube\.com/shorts/)([^&\n?#/]+)",
            r"youtube\.com/watch\?.*&v=([^&\n?#]+)",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("YouTube id pattern is valid"))
        .collect()
    })
}

/// Recognizes youtube.com, m.youtube.com and youtu.be links
#[derive(Debug, Default, Clone, Copy)]
pub struct YouTubeRecognizer;

impl SubjectRecognizer for YouTubeRecognizer {
    fn name(&self) -> &'static str {
        "youtube"
    }

    fn kind(&self) -> SubjectKind {
        SubjectKind::RecognizedProvider(VideoProvider::YouTube)
    }

    fn matches(&self, url: &str) -> bool {
        !url.is_empty() && host_pattern().is_match(url)
    }

    fn extract_id(&self, url: &str) -> Option<String> {
        if !self.matches(url) {
            return None;
        }

        id_patterns()
            .iter()
            .filter_map(|pattern| pattern.captures(url))
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .find(|id| !id.is_empty())
    }
}
