//! URL utilities for consistent URL handling
//!
//! Validation of user-supplied video URLs, backend endpoint construction and
//! credential masking for log output.

use url::Url;

/// URL utilities for consistent URL handling
pub struct UrlUtils;

impl UrlUtils {
    /// Whether the trimmed input parses as an absolute `http` or `https` URL
    ///
    /// # Examples
    ///
    /// ```rust
    /// use live_commentary::utils::url::UrlUtils;
    ///
    /// assert!(UrlUtils::is_http_url("https://example.com/video.mp4"));
    /// assert!(!UrlUtils::is_http_url("example.com/video.mp4"));
    /// assert!(!UrlUtils::is_http_url("ftp://example.com/video.mp4"));
    /// ```
    pub fn is_http_url(url: &str) -> bool {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return false;
        }
        Url::parse(trimmed)
            .map(|parsed| matches!(parsed.scheme(), "http" | "https"))
            .unwrap_or(false)
    }

    /// Append an endpoint path to a base URL, keeping any path the base already has
    ///
    /// Unlike a plain [`Url::join`], `http://host/api` + `live-commentary`
    /// yields `http://host/api/live-commentary` rather than replacing `api`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use live_commentary::utils::url::UrlUtils;
    ///
    /// let url = UrlUtils::endpoint("http://localhost:3001/api", "live-commentary").unwrap();
    /// assert_eq!(url.as_str(), "http://localhost:3001/api/live-commentary");
    /// ```
    pub fn endpoint(base: &str, path: &str) -> Result<Url, url::ParseError> {
        let mut base = base.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base)?.join(path.trim_start_matches('/'))
    }

    /// Mask credentials in a URL before it is logged
    ///
    /// Userinfo is replaced and so are the values of query parameters whose
    /// name looks like a secret (matched case-insensitively). Input that does
    /// not parse as a URL keeps only what precedes its query string.
    pub fn obfuscate_credentials(url: &str) -> String {
        let Ok(mut parsed) = Url::parse(url.trim()) else {
            return match url.split_once('?') {
                Some((head, _)) => format!("{head}?{MASK}"),
                None => url.to_string(),
            };
        };

        if !parsed.username().is_empty() || parsed.password().is_some() {
            // Only cannot-be-a-base URLs reject userinfo, and those never carry any
            let _ = parsed.set_username(MASK);
            let _ = parsed.set_password(Some(MASK));
        }

        if parsed.query_pairs().any(|(name, _)| is_secret_param(&name)) {
            let masked: Vec<(String, String)> = parsed
                .query_pairs()
                .map(|(name, value)| {
                    let value = if is_secret_param(&name) {
                        MASK.to_string()
                    } else {
                        value.into_owned()
                    };
                    (name.into_owned(), value)
                })
                .collect();
            parsed.query_pairs_mut().clear().extend_pairs(masked);
        }

        parsed.to_string()
    }
}

const MASK: &str = "****";

const SECRET_PARAMS: [&str; 6] = ["key", "api_key", "apikey", "token", "access_token", "password"];

fn is_secret_param(name: &str) -> bool {
    SECRET_PARAMS.iter().any(|secret| name.eq_ignore_ascii_case(secret))
}
