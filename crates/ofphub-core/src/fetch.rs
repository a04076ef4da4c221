//! HTTP GET boundary.
//!
//! Everything that talks to the network goes through [`FetchClient`], so the
//! directory and the coordinator can be driven by a scripted client in tests.
//! There is no retry policy at this layer.

use std::time::Duration;

use log::debug;

use crate::error::{HubError, Result};

/// Timeout applied to every upstream request unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent with every request.
const USER_AGENT: &str = concat!("ofphub/", env!("CARGO_PKG_VERSION"));

/// Synchronous HTTP GET.
///
/// Implementations are called from background tasks only, never from the
/// polling thread, so blocking for up to `timeout` is acceptable.
pub trait FetchClient: Send + Sync {
    /// Performs a GET request and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns `HubError::Transport` on connection failures, timeouts and
    /// non-2xx responses.
    fn get(&self, url: &str, timeout: Duration) -> Result<Vec<u8>>;
}

/// [`FetchClient`] backed by reqwest's blocking client.
///
/// A client is built per request so each call can carry its own timeout and
/// nothing holding an internal runtime outlives the blocking task that used
/// it.
#[derive(Debug, Clone, Default)]
pub struct ReqwestFetcher;

impl ReqwestFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl FetchClient for ReqwestFetcher {
    fn get(&self, url: &str, timeout: Duration) -> Result<Vec<u8>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                HubError::transport(url).with_message(format!("Failed to create HTTP client: {e}"))
            })?;

        let response = client
            .get(url)
            .send()
            .map_err(|e| HubError::transport(url).with_message(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(HubError::transport(url).with_message(format!("HTTP {}", response.status())));
        }

        let body = response.bytes().map_err(|e| {
            HubError::transport(url).with_message(format!("Failed to read response: {e}"))
        })?;
        debug!("Got {} bytes from '{url}'", body.len());
        Ok(body.to_vec())
    }
}
