//! Scripted fetch client for driving a [`Hub`](crate::Hub) without a network.
//!
//! Hosts and this crate's own tests plug it in with
//! [`HubBuilder::with_fetcher`](crate::HubBuilder::with_fetcher) to replay
//! fixed upstream answers and count how often each URL was requested.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
    thread,
    time::Duration,
};

use crate::{
    error::{HubError, Result},
    fetch::FetchClient,
};

/// Answers GET requests from a fixed table and counts calls per URL.
///
/// URLs missing from the table fail like an HTTP 404.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    responses: Mutex<HashMap<String, Option<Vec<u8>>>>,
    calls: Mutex<HashMap<String, usize>>,
    delay: Option<Duration>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.set_body(url, body);
        self
    }

    pub fn with_failure(self, url: &str) -> Self {
        self.set_failure(url);
        self
    }

    /// Makes every request sleep for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replaces the response for `url` after construction.
    pub fn set_body(&self, url: &str, body: impl Into<Vec<u8>>) {
        locked(&self.responses).insert(url.to_string(), Some(body.into()));
    }

    /// Makes `url` fail like a refused connection.
    pub fn set_failure(&self, url: &str) {
        locked(&self.responses).insert(url.to_string(), None);
    }

    pub fn calls(&self, url: &str) -> usize {
        locked(&self.calls).get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        locked(&self.calls).values().sum()
    }
}

impl FetchClient for ScriptedFetcher {
    fn get(&self, url: &str, _timeout: Duration) -> Result<Vec<u8>> {
        *locked(&self.calls).entry(url.to_string()).or_default() += 1;
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }

        match locked(&self.responses).get(url) {
            Some(Some(body)) => Ok(body.clone()),
            Some(None) => Err(HubError::transport(url).with_message("Connection refused")),
            None => Err(HubError::transport(url).with_message("HTTP 404 Not Found")),
        }
    }
}
