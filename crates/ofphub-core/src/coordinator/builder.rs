//! Builder for creating and configuring Hub instances.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};

use log::{error, info};
use tokio::runtime::Handle;

use super::{single_flight::SingleFlight, Hub, OfpFormat};
use crate::{
    cache::FlightDataCache,
    config::ConfigSources,
    directory::ServerDirectory,
    fetch::{FetchClient, ReqwestFetcher, DEFAULT_TIMEOUT},
};

/// Flight planning service endpoint for the latest OFP of a pilot.
pub const DEFAULT_OFP_BASE_URL: &str = "https://www.simbrief.com/api/xml.fetcher.php";

/// Builder for creating and configuring Hub instances.
#[derive(Clone)]
pub struct HubBuilder {
    pilot_id: Option<String>,
    ofp_format: OfpFormat,
    ofp_base_url: String,
    timeout: Duration,
    fetcher: Option<Arc<dyn FetchClient>>,
    cdm_config: Option<PathBuf>,
    default_cdm_config: Option<PathBuf>,
    cdm_enabled: bool,
}

impl HubBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            pilot_id: None,
            ofp_format: OfpFormat::default(),
            ofp_base_url: DEFAULT_OFP_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            fetcher: None,
            cdm_config: None,
            default_cdm_config: None,
            cdm_enabled: true,
        }
    }

    /// Sets the pilot id whose flight plans are fetched. Blank ids are
    /// ignored.
    pub fn with_pilot_id<S: Into<String>>(mut self, pilot_id: Option<S>) -> Self {
        self.pilot_id = pilot_id
            .map(Into::into)
            .filter(|id: &String| !id.trim().is_empty());
        self
    }

    pub fn with_ofp_format(mut self, format: OfpFormat) -> Self {
        self.ofp_format = format;
        self
    }

    /// Points OFP downloads at a different endpoint, e.g. a mirror.
    pub fn with_ofp_base_url(mut self, url: impl Into<String>) -> Self {
        self.ofp_base_url = url.into();
        self
    }

    /// Timeout for every upstream request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the HTTP client. Defaults to [`ReqwestFetcher`].
    pub fn with_fetcher(mut self, fetcher: Arc<dyn FetchClient>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Sets the user override of the CDM server list.
    ///
    /// If not specified, `$XDG_CONFIG_HOME/ofphub/cdm_cfg.json` is used when
    /// it exists.
    pub fn with_cdm_config<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.cdm_config = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the fallback CDM server list.
    ///
    /// If not specified, the list compiled into the library is used.
    pub fn with_default_cdm_config<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.default_cdm_config = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Turns CDM off entirely; no server list is loaded.
    pub fn with_cdm_disabled(mut self, disabled: bool) -> Self {
        self.cdm_enabled = !disabled;
        self
    }

    /// Builds the configured hub. Downloads run on `handle`'s blocking pool.
    ///
    /// A CDM server list that cannot be loaded from any source disables CDM
    /// only; the reason is kept in [`Hub::cdm_config_error`] and OFP
    /// downloads work as usual.
    pub fn build(self, handle: Handle) -> Hub {
        let mut cdm_config_error = None;
        let directory = if self.cdm_enabled {
            let sources = ConfigSources::new()
                .with_override(self.cdm_config.as_deref())
                .with_default(self.default_cdm_config.as_deref());
            match ServerDirectory::from_sources(&sources) {
                Ok(directory) => {
                    info!("{} CDM servers configured", directory.servers().len());
                    Some(directory)
                }
                Err(e) => {
                    error!("CDM disabled, no usable server list: {e}");
                    cdm_config_error = Some(e);
                    None
                }
            }
        } else {
            info!("CDM disabled");
            None
        };
        let server_snapshot = directory
            .as_ref()
            .map_or_else(Vec::new, |directory| directory.servers().to_vec());

        let fetcher = self
            .fetcher
            .unwrap_or_else(|| Arc::new(ReqwestFetcher::new()) as Arc<dyn FetchClient>);

        Hub {
            handle,
            fetcher,
            timeout: self.timeout,
            pilot_id: self.pilot_id,
            ofp_format: self.ofp_format,
            ofp_base_url: self.ofp_base_url,
            directory: directory.map(|directory| Arc::new(Mutex::new(directory))),
            server_snapshot,
            cdm_config_error,
            cache: FlightDataCache::new(),
            ofp_slot: SingleFlight::new("OFP"),
            cdm_slot: SingleFlight::new("CDM"),
        }
    }
}

impl Default for HubBuilder {
    fn default() -> Self {
        Self::new()
    }
}
