//! Utility modules shared across the crate

pub mod time;
pub mod url;

pub use self::time::format_timestamp;
pub use self::url::UrlUtils;
