use serde::{Deserialize, Serialize};
use std::fmt;

/// Video providers with a dedicated recognizer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VideoProvider {
    YouTube,
    Vimeo,
}

impl fmt::Display for VideoProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoProvider::YouTube => write!(f, "youtube"),
            VideoProvider::Vimeo => write!(f, "vimeo"),
        }
    }
}

/// How a subject was recognised
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", tag = "type", content = "provider")]
pub enum SubjectKind {
    RecognizedProvider(VideoProvider),
    GenericUrl,
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectKind::RecognizedProvider(provider) => write!(f, "{provider}"),
            SubjectKind::GenericUrl => write!(f, "generic"),
        }
    }
}

/// The video currently being analysed
///
/// Only `id` takes part in identity: two subjects with the same id are the
/// same subject even if they were resolved from different URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub kind: SubjectKind,
    /// Trimmed URL the subject was resolved from
    pub url: String,
}

impl Subject {
    pub fn new<I: Into<String>, U: Into<String>>(id: I, kind: SubjectKind, url: U) -> Self {
        Self {
            id: id.into(),
            kind,
            url: url.into(),
        }
    }

    /// Subject known only by its identifier, e.g. supplied directly by a player
    pub fn from_id<I: Into<String>>(id: I) -> Self {
        let id = id.into();
        Self {
            url: id.clone(),
            id,
            kind: SubjectKind::GenericUrl,
        }
    }

    pub fn same_as(&self, other: &Subject) -> bool {
        self.id == other.id
    }
}

impl PartialEq for Subject {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for Subject {}
