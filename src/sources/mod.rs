//! Subject resolution
//!
//! Turns a raw video URL into a [`Subject`](crate::models::Subject) through an
//! ordered chain of recognizers. Adding a provider means appending a
//! recognizer before the generic catch-all; existing recognizers are never
//! reordered.

pub mod generic;
pub mod resolver;
pub mod traits;
pub mod vimeo;
pub mod youtube;

pub use generic::GenericUrlRecognizer;
pub use resolver::SubjectResolver;
pub use traits::SubjectRecognizer;
pub use vimeo::VimeoRecognizer;
pub use youtube::YouTubeRecognizer;
