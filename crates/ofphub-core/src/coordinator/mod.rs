//! Download coordination between a polling host and background fetches.
//!
//! The [`Hub`] is the single context object a host drives. It never blocks on
//! the network: requests start a background job on the runtime's blocking
//! pool, and each tick of the host's loop calls [`Hub::poll`] to collect
//! finished jobs and publish their records into the cache.
//!
//! ```text
//!  host tick ──▶ request_ofp() ──▶ SingleFlight ──spawn_blocking──▶ fetch + parse
//!      │                                                               │
//!      └──────▶ poll() ◀──────────── oneshot ◀─────────────────────────┘
//!                 │
//!                 └──▶ post-process ──▶ FlightDataCache ──▶ readers
//! ```
//!
//! Each kind of data has its own slot, so an OFP and a CDM download can run
//! side by side, but a second request of the same kind is refused while the
//! first is in flight.
//!
//! - [`builder`]: configuration and construction of a [`Hub`]
//! - [`single_flight`]: the one-job-at-a-time slot
//! - [`jobs`]: what runs in the background

use std::{
    sync::{Arc, Mutex, TryLockError},
    thread,
    time::Duration,
};

use log::{debug, info, warn};
use tokio::runtime::Handle;

use crate::{
    cache::FlightDataCache,
    directory::{CdmServer, ServerDirectory},
    error::HubError,
    fetch::FetchClient,
    models::{CdmInfo, OfpInfo},
    parser::Schema,
};

pub mod builder;
pub mod jobs;
pub mod single_flight;

pub use builder::{HubBuilder, DEFAULT_OFP_BASE_URL};
pub use jobs::{CDM_FETCH_FAILED, DOWNLOAD_ABORTED, FEED_NOT_FOUND, NETWORK_ERROR};
pub use single_flight::{PollResult, SingleFlight};

/// Output format requested from the flight planning service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OfpFormat {
    #[default]
    Json,
    /// Legacy XML output
    Xml,
}

impl std::str::FromStr for OfpFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OfpFormat::Json),
            "xml" => Ok(OfpFormat::Xml),
            _ => Err(format!("Invalid OFP format '{s}', expected 'json' or 'xml'")),
        }
    }
}

impl OfpFormat {
    /// Schema of the payload the service returns in this format.
    pub fn schema(self) -> Schema {
        match self {
            OfpFormat::Json => Schema::OfpJson,
            OfpFormat::Xml => Schema::OfpXml,
        }
    }
}

/// Flight data hub: owns the cache, the server directory and one download
/// slot per kind of data.
pub struct Hub {
    handle: Handle,
    fetcher: Arc<dyn FetchClient>,
    timeout: Duration,
    pilot_id: Option<String>,
    ofp_format: OfpFormat,
    ofp_base_url: String,
    directory: Option<Arc<Mutex<ServerDirectory>>>,
    /// Server states as of the last completed CDM download
    server_snapshot: Vec<CdmServer>,
    cdm_config_error: Option<HubError>,
    cache: FlightDataCache,
    ofp_slot: SingleFlight<OfpInfo>,
    cdm_slot: SingleFlight<CdmInfo>,
}

impl std::fmt::Debug for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub")
            .field("pilot_id", &self.pilot_id)
            .field("ofp_format", &self.ofp_format)
            .field("ofp_base_url", &self.ofp_base_url)
            .field("timeout", &self.timeout)
            .field("cdm_enabled", &self.directory.is_some())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl Hub {
    pub fn builder() -> HubBuilder {
        HubBuilder::new()
    }

    /// Read access to the published records.
    pub fn cache(&self) -> &FlightDataCache {
        &self.cache
    }

    pub fn pilot_id(&self) -> Option<&str> {
        self.pilot_id.as_deref()
    }

    /// Changes the pilot id used by later OFP requests. Blank ids unset it.
    pub fn set_pilot_id(&mut self, pilot_id: Option<String>) {
        self.pilot_id = pilot_id.filter(|id| !id.trim().is_empty());
    }

    pub fn cdm_enabled(&self) -> bool {
        self.directory.is_some()
    }

    /// Why CDM was disabled at build time, if no server list could be
    /// loaded.
    pub fn cdm_config_error(&self) -> Option<&HubError> {
        self.cdm_config_error.as_ref()
    }

    /// The configured CDM servers, empty when CDM is disabled.
    ///
    /// Never waits: while a CDM download holds the directory, the state as
    /// of the last completed download is returned.
    pub fn servers(&self) -> Vec<CdmServer> {
        let Some(directory) = &self.directory else {
            return Vec::new();
        };

        match directory.try_lock() {
            Ok(directory) => directory.servers().to_vec(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().servers().to_vec(),
            Err(TryLockError::WouldBlock) => {
                debug!("CDM directory busy, serving server snapshot");
                self.server_snapshot.clone()
            }
        }
    }

    /// Download URL for a pilot's latest flight plan.
    pub fn ofp_url(&self, pilot_id: &str) -> String {
        let mut url = format!("{}?userid={}", self.ofp_base_url, pilot_id);
        if self.ofp_format == OfpFormat::Json {
            url.push_str("&json=1");
        }
        url
    }

    /// Starts downloading the pilot's latest flight plan.
    ///
    /// Returns `false` when no pilot id is configured or a download is
    /// already in flight.
    pub fn request_ofp(&mut self) -> bool {
        let Some(pilot_id) = self.pilot_id.as_deref() else {
            warn!("Pilot ID is not configured, not fetching OFP");
            return false;
        };

        let url = self.ofp_url(pilot_id);
        let fetcher = Arc::clone(&self.fetcher);
        let format = self.ofp_format;
        let timeout = self.timeout;
        self.ofp_slot.try_start(&self.handle, move || {
            jobs::download_ofp(fetcher.as_ref(), &url, format, timeout)
        })
    }

    /// Starts downloading CDM data for `callsign` departing `airport`.
    ///
    /// Returns `false` when CDM is disabled or a download is already in
    /// flight.
    pub fn request_cdm(&mut self, airport: &str, callsign: &str) -> bool {
        let Some(directory) = &self.directory else {
            debug!("CDM is disabled, not fetching CDM data");
            return false;
        };

        let directory = Arc::clone(directory);
        let fetcher = Arc::clone(&self.fetcher);
        let airport = airport.trim().to_uppercase();
        let callsign = callsign.trim().to_string();
        let timeout = self.timeout;
        self.cdm_slot.try_start(&self.handle, move || {
            jobs::download_cdm(&directory, fetcher.as_ref(), &airport, &callsign, timeout)
        })
    }

    /// Collects a finished OFP download and publishes it.
    ///
    /// Returns the published record when a download completed on this call.
    pub fn poll_ofp(&mut self) -> Option<Arc<OfpInfo>> {
        let fetched = match self.ofp_slot.poll() {
            PollResult::Idle | PollResult::Running => return None,
            PollResult::Ready(ofp) => ofp,
            PollResult::Lost => {
                warn!("OFP download ended without a result");
                OfpInfo::with_status(DOWNLOAD_ABORTED)
            }
        };
        Some(self.cache.publish_ofp(fetched))
    }

    /// Collects a finished CDM download and publishes it if it changed.
    ///
    /// Returns the current CDM record when a download completed on this call;
    /// its `seqno` tells whether the content changed.
    pub fn poll_cdm(&mut self) -> Option<Arc<CdmInfo>> {
        let fetched = match self.cdm_slot.poll() {
            PollResult::Idle | PollResult::Running => return None,
            PollResult::Ready(cdm) => cdm,
            PollResult::Lost => {
                warn!("CDM download ended without a result");
                CdmInfo::with_status(DOWNLOAD_ABORTED)
            }
        };
        self.cache.publish_cdm(fetched);
        self.server_snapshot = self.servers();
        self.cache.cdm()
    }

    /// Per-tick entry point. Returns `true` while any download is in flight.
    pub fn poll(&mut self) -> bool {
        self.poll_ofp();
        self.poll_cdm();
        self.is_busy()
    }

    pub fn is_busy(&self) -> bool {
        self.ofp_slot.is_in_flight() || self.cdm_slot.is_in_flight()
    }

    /// Blocks until every download has finished, polling every `interval`.
    ///
    /// Results that arrive meanwhile are published as usual.
    pub fn shutdown(&mut self, interval: Duration) {
        if self.is_busy() {
            info!("Waiting for downloads to finish");
        }
        while self.poll() {
            thread::sleep(interval);
        }
        debug!("All downloads finished");
    }
}
