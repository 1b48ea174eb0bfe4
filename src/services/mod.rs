//! Services talking to the outside world

pub mod commentary_client;
pub mod normalizer;

pub use commentary_client::{CommentaryBackend, HttpCommentaryBackend};
pub use normalizer::ResponseNormalizer;
