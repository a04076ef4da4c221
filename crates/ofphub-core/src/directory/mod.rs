//! CDM server directory.
//!
//! The directory knows which CDM servers exist and which airports each of
//! them serves. Rosters are loaded lazily, the first time a resolution needs
//! them, and kept for the lifetime of the directory.
//!
//! # Resolution
//!
//! ```text
//!   resolve("EDDF")
//!        │
//!        ├─ memo hit? ──────────────▶ cached answer
//!        │
//!        └─ for server in configuration order:
//!              dead?            ──▶ skip, no network
//!              roster missing?  ──▶ load; on failure retries_left -= 1, skip
//!              roster has EDDF? ──▶ memoise, return FeedLocation
//! ```
//!
//! A server that fails [`MAX_RETRIES`] roster loads is dead for good. The
//! memo holds a single airport: asking for another one replaces it.

use std::{collections::HashMap, time::Duration};

use log::{debug, info, warn};

use crate::{
    config::{ConfigSources, ServerEntry},
    error::{HubError, Result},
    fetch::FetchClient,
    models::{CdmProtocol, FeedLocation},
    parser::parse_roster,
};

/// Failed roster loads after which a server is never contacted again.
pub const MAX_RETRIES: i32 = 3;

/// One configured CDM server.
#[derive(Debug, Clone)]
pub struct CdmServer {
    name: String,
    url: String,
    protocol: CdmProtocol,
    roster: Option<HashMap<String, String>>,
    retries_left: i32,
}

impl CdmServer {
    pub fn new(name: impl Into<String>, url: impl Into<String>, protocol: CdmProtocol) -> Self {
        let url: String = url.into();
        Self {
            name: name.into(),
            url: url.trim_end_matches('/').to_string(),
            protocol,
            roster: None,
            retries_left: MAX_RETRIES,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn protocol(&self) -> CdmProtocol {
        self.protocol
    }

    pub fn retries_left(&self) -> i32 {
        self.retries_left
    }

    /// Number of airports in the roster, `None` until it has loaded.
    pub fn airport_count(&self) -> Option<usize> {
        self.roster.as_ref().map(HashMap::len)
    }

    pub fn is_dead(&self) -> bool {
        self.retries_left <= 0
    }

    fn roster_url(&self) -> String {
        format!("{}{}", self.url, self.protocol.roster_path())
    }

    /// Fetches and parses the roster. A failure costs one retry.
    fn load_roster(&mut self, fetcher: &dyn FetchClient, timeout: Duration) -> Result<()> {
        let url = self.roster_url();
        let loaded = fetcher
            .get(&url, timeout)
            .and_then(|payload| parse_roster(&payload, self.protocol, &self.url));

        match loaded {
            Ok(roster) => {
                info!(
                    "Loaded roster of CDM server '{}': {} airports",
                    self.name,
                    roster.len()
                );
                self.roster = Some(roster);
                Ok(())
            }
            Err(e) => {
                self.retries_left -= 1;
                warn!(
                    "Failed to load roster of CDM server '{}' ({e}), {} retries left",
                    self.name,
                    self.retries_left.max(0)
                );
                Err(e)
            }
        }
    }

    fn lookup(&self, icao: &str) -> Option<FeedLocation> {
        self.roster
            .as_ref()
            .and_then(|roster| roster.get(icao))
            .map(|url| FeedLocation {
                url: url.clone(),
                protocol: self.protocol,
            })
    }
}

/// Ordered set of CDM servers plus the resolution memo.
#[derive(Debug, Default)]
pub struct ServerDirectory {
    servers: Vec<CdmServer>,
    memo: Option<(String, Option<FeedLocation>)>,
}

impl ServerDirectory {
    /// Builds a directory from configuration entries.
    ///
    /// Disabled entries are skipped unchecked. An enabled entry with an
    /// unknown protocol fails the whole list, so nothing is registered from a
    /// broken file.
    ///
    /// # Errors
    ///
    /// Returns `HubError::Configuration` for an unsupported protocol tag.
    pub fn init(entries: Vec<ServerEntry>) -> Result<Self> {
        let mut servers = Vec::with_capacity(entries.len());

        for entry in entries {
            if !entry.enabled {
                info!("CDM server '{}' is disabled, skipping", entry.name);
                continue;
            }

            let protocol: CdmProtocol = entry
                .protocol
                .parse()
                .map_err(|e: String| HubError::config(format!("Server '{}': {e}", entry.name)))?;

            debug!(
                "Registered CDM server '{}' ({protocol}) at {}",
                entry.name, entry.url
            );
            servers.push(CdmServer::new(entry.name, entry.url, protocol));
        }

        Ok(Self {
            servers,
            memo: None,
        })
    }

    /// Builds a directory from the first configuration source that yields a
    /// valid server list.
    ///
    /// # Errors
    ///
    /// Returns `HubError::Configuration` when no source works.
    pub fn from_sources(sources: &ConfigSources) -> Result<Self> {
        sources.load_with(Self::init)
    }

    /// Registered servers in configuration order.
    pub fn servers(&self) -> &[CdmServer] {
        &self.servers
    }

    /// Finds the server and feed that serve `icao`.
    ///
    /// # Errors
    ///
    /// Returns `HubError::NotFound` when no live server lists the airport,
    /// including when some rosters could not be loaded.
    pub fn resolve(
        &mut self,
        icao: &str,
        fetcher: &dyn FetchClient,
        timeout: Duration,
    ) -> Result<FeedLocation> {
        if let Some((code, cached)) = &self.memo {
            if code == icao {
                debug!("Resolution of '{icao}' served from memo");
                return cached.clone().ok_or_else(|| not_found(icao));
            }
        }

        let mut consulted_all = true;
        for server in &mut self.servers {
            if server.is_dead() {
                debug!("CDM server '{}' is dead, skipping", server.name);
                continue;
            }

            if server.roster.is_none() && server.load_roster(fetcher, timeout).is_err() {
                consulted_all = false;
                continue;
            }

            if let Some(location) = server.lookup(icao) {
                info!("Airport '{icao}' served by '{}' at {}", server.name, location.url);
                self.memo = Some((icao.to_string(), Some(location.clone())));
                return Ok(location);
            }
        }

        self.memo = consulted_all.then(|| (icao.to_string(), None));
        Err(not_found(icao))
    }
}

fn not_found(icao: &str) -> HubError {
    info!("No CDM feed for airport '{icao}'");
    HubError::NotFound {
        icao: icao.to_string(),
    }
}

#[cfg(test)]
mod tests;
