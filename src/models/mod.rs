//! Domain models shared by the resolver, the backend client and the engine

pub mod commentary;
pub mod subject;

pub use commentary::{CommentaryItem, LiveCommentaryRequest, NormalizedResult};
pub use subject::{Subject, SubjectKind, VideoProvider};
