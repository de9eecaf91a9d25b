// src/loader/source.rs
// =============================================================================
// Where records come from.
//
// AssetSource is the "fetch one asset" step of the loader. The real
// implementation, CoinCapSource, does one GET request per asset against the
// CoinCap REST API. Tests plug in scripted sources instead, so the retry logic
// can be exercised without touching the network.
//
// Every failure here is a FetchError, and the loader treats every FetchError
// as "missing, try again next cycle".
// =============================================================================

use crate::catalog::{AssetId, AssetRecord};
use crate::error::{FetchError, TrackerError};
use crate::loader::LoaderConfig;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Fetches a single asset.
///
/// The returned future must be `Send` so loads can run on spawned tasks.
pub trait AssetSource {
    fn fetch(&self, id: &AssetId) -> impl Future<Output = Result<AssetRecord, FetchError>> + Send;
}

/// CoinCap REST API client.
#[derive(Debug, Clone)]
pub struct CoinCapSource {
    client: Client,
    base_url: Url,
    rate_limit_pause: Duration,
}

impl CoinCapSource {
    pub fn new(base_url: &str, config: &LoaderConfig) -> Result<Self, TrackerError> {
        let base_url = Url::parse(base_url).map_err(|e| TrackerError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(TrackerError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "expected an http(s) URL".to_string(),
            });
        }

        // One client for every request (connection pooling)
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(CoinCapSource {
            client,
            base_url,
            rate_limit_pause: config.rate_limit_pause,
        })
    }

    /// `{base}/assets/{id}`, with the id percent-encoded as a path segment.
    fn asset_url(&self, id: &AssetId) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base() was ruled out in new()
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("assets").push(id.as_str());
        }
        url
    }
}

impl AssetSource for CoinCapSource {
    async fn fetch(&self, id: &AssetId) -> Result<AssetRecord, FetchError> {
        let url = self.asset_url(id);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Error fetching {}: {}", id, e);
                return Err(FetchError::Transport(e));
            }
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            debug!("Rate limited on {}, backing off {:?}", id, self.rate_limit_pause);
            tokio::time::sleep(self.rate_limit_pause).await;
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            warn!("Failed to fetch {}: HTTP {}", id, status.as_u16());
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        AssetRecord::from_json(&body).map_err(|e| {
            warn!("Bad payload for {}: {}", id, e);
            e
        })
    }
}
