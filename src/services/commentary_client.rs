//! Boundary to the commentary backend
//!
//! [`CommentaryBackend`] is the seam the engine talks through; the production
//! implementation is [`HttpCommentaryBackend`], which POSTs to
//! `{base_url}/live-commentary`. Transport failures are returned as
//! [`CommentaryError`]s, while every HTTP answer (including non-2xx) is
//! decoded by [`ResponseNormalizer`] into a [`NormalizedResult`]. Non-2xx
//! answers are additionally logged as [`CommentaryError::Protocol`].

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::normalizer::ResponseNormalizer;
use crate::config::BackendConfig;
use crate::errors::{AppError, AppResult, CommentaryError, CommentaryResult};
use crate::models::{LiveCommentaryRequest, NormalizedResult};
use crate::utils::url::UrlUtils;

/// Source of commentary for a `(subject, timestamp, window)` triple
#[async_trait]
pub trait CommentaryBackend: Send + Sync {
    /// Ask for commentary about the window around `request.timestamp`
    ///
    /// `Err` is reserved for transport-level failures; protocol problems are
    /// reported as skipped results.
    async fn live_commentary(
        &self,
        request: &LiveCommentaryRequest,
    ) -> CommentaryResult<NormalizedResult>;
}

/// reqwest-backed implementation of [`CommentaryBackend`]
#[derive(Debug, Clone)]
pub struct HttpCommentaryBackend {
    client: Client,
    endpoint: Url,
}

impl HttpCommentaryBackend {
    /// Create a backend client with a connection timeout only
    ///
    /// The total request time is bounded by the engine, not by the client.
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        let endpoint = UrlUtils::endpoint(&config.base_url, &config.endpoint).map_err(|e| {
            AppError::configuration(format!(
                "Invalid backend URL '{}': {e}",
                UrlUtils::obfuscate_credentials(&config.base_url)
            ))
        })?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl CommentaryBackend for HttpCommentaryBackend {
    async fn live_commentary(
        &self,
        request: &LiveCommentaryRequest,
    ) -> CommentaryResult<NormalizedResult> {
        debug!(
            "POST {} (video {}, t={:.1}s, window {:.1}s)",
            UrlUtils::obfuscate_credentials(self.endpoint.as_str()),
            request.video_id,
            request.timestamp,
            request.window_size
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let error = CommentaryError::from(e);
                warn!("Commentary request failed ({}): {}", error.kind(), error);
                error
            })?;

        let status = response.status();
        let body = response.text().await.map_err(CommentaryError::from)?;
        debug!("Commentary backend answered HTTP {} with {} bytes", status.as_u16(), body.len());

        let result = ResponseNormalizer::normalize(status.as_u16(), &body, request.timestamp);
        if !status.is_success() {
            let error = CommentaryError::Protocol {
                status: status.as_u16(),
                message: result.error.clone().unwrap_or_default(),
            };
            warn!("Commentary backend rejected request ({}): {}", error.kind(), error);
        }

        Ok(result)
    }
}
