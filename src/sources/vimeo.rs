use regex::Regex;
use std::sync::OnceLock;

use super::traits::SubjectRecognizer;
use crate::models::{SubjectKind, VideoProvider};

fn host_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(https?://)?(www\.|player\.)?vimeo\.com/")
            .expect("Vimeo host pattern is valid")
    })
}

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"vimeo\.com/(?:video/)?(\d+)(?:[/?#]|$)").expect("Vimeo id pattern is valid")
    })
}

/// Recognizes vimeo.com and player.vimeo.com links with a numeric video id
#[derive(Debug, Default, Clone, Copy)]
pub struct VimeoRecognizer;

impl SubjectRecognizer for VimeoRecognizer {
    fn name(&self) -> &'static str {
        "vimeo"
    }

    fn kind(&self) -> SubjectKind {
        SubjectKind::RecognizedProvider(VideoProvider::Vimeo)
    }

    fn matches(&self, url: &str) -> bool {
        host_pattern().is_match(url)
    }

    fn extract_id(&self, url: &str) -> Option<String> {
        if !self.matches(url) {
            return None;
        }
        id_pattern()
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}
