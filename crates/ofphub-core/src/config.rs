//! CDM server list configuration.
//!
//! A configuration file is free-form documentation followed by a magic marker
//! line and a JSON document:
//!
//! ```text
//! Anything here is ignored.
//! #&*!
//! {"servers": [{"name": "...", "protocol": "vacdm_v1", "url": "...", "enabled": true}]}
//! ```
//!
//! Two sources exist: a user-editable override and the default shipped with
//! the software. The override wins when it loads; a source that is missing or
//! broken is logged and the next one is tried.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{info, warn};
use serde::Deserialize;

use crate::error::{HubError, Result, ResultExt};

/// Separates the documentation preamble from the JSON body.
pub const MAGIC_MARKER: &str = "#&*!";

/// File name of the user override inside the XDG config directory.
pub const OVERRIDE_FILE_NAME: &str = "cdm_cfg.json";

/// Default server list compiled into the library.
pub const BUNDLED_DEFAULT: &str = include_str!("../resources/cdm_cfg.default.json");

/// One server as written in the configuration file.
///
/// The protocol stays a plain string here; it is validated when the
/// directory is built so an unknown tag rejects the whole list.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerEntry {
    pub name: String,
    pub protocol: String,
    pub url: String,
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
struct ServerListFile {
    servers: Vec<ServerEntry>,
}

/// Parses the text of a configuration file.
///
/// # Errors
///
/// Returns `HubError::Configuration` when the marker is missing, and
/// `HubError::Serialization` when the body is not the expected JSON.
pub fn parse_server_config(content: &str) -> Result<Vec<ServerEntry>> {
    let pos = content
        .find(MAGIC_MARKER)
        .ok_or_else(|| HubError::config(format!("Magic marker '{MAGIC_MARKER}' not found")))?;

    let file: ServerListFile = serde_json::from_str(&content[pos + MAGIC_MARKER.len()..])?;
    Ok(file.servers)
}

/// Reads and parses one configuration file.
///
/// # Errors
///
/// Returns `HubError::FileSystem` when the file cannot be read, otherwise
/// whatever [`parse_server_config`] returns.
pub fn read_server_config(path: &Path) -> Result<Vec<ServerEntry>> {
    let content = fs::read_to_string(path).map_err(|e| HubError::FileSystem {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_server_config(&content)
        .with_context_lazy(|| format!("Invalid server configuration '{}'", path.display()))
}

/// A place a server list can come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// The copy compiled into the library
    Bundled,
}

impl ConfigSource {
    /// Loads the server list from this source.
    ///
    /// # Errors
    ///
    /// See [`read_server_config`] and [`parse_server_config`].
    pub fn load(&self) -> Result<Vec<ServerEntry>> {
        match self {
            ConfigSource::File(path) => read_server_config(path),
            ConfigSource::Bundled => parse_server_config(BUNDLED_DEFAULT),
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Bundled => write!(f, "<bundled default>"),
        }
    }
}

/// Ordered list of configuration sources, highest priority first.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    override_path: Option<PathBuf>,
    default_path: Option<PathBuf>,
}

impl ConfigSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `path` instead of the XDG location for the user override.
    pub fn with_override<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.override_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses `path` instead of the bundled default.
    pub fn with_default<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.default_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Resolves the sources in priority order.
    ///
    /// Without an explicit override the XDG config directory is searched for
    /// [`OVERRIDE_FILE_NAME`]; without an explicit default the bundled copy is
    /// used.
    pub fn resolve(&self) -> Vec<ConfigSource> {
        let mut sources = Vec::with_capacity(2);

        match &self.override_path {
            Some(path) => sources.push(ConfigSource::File(path.clone())),
            None => {
                if let Some(path) = Self::xdg_override_path() {
                    sources.push(ConfigSource::File(path));
                }
            }
        }

        sources.push(match &self.default_path {
            Some(path) => ConfigSource::File(path.clone()),
            None => ConfigSource::Bundled,
        });
        sources
    }

    /// Tries each source in turn with `build`, returning the first success.
    ///
    /// `build` receives the parsed server list and may reject it, e.g. for an
    /// unknown protocol; a rejected source falls through to the next one.
    ///
    /// # Errors
    ///
    /// Returns `HubError::Configuration` when no source yields a result.
    pub fn load_with<T, F>(&self, mut build: F) -> Result<T>
    where
        F: FnMut(Vec<ServerEntry>) -> Result<T>,
    {
        for source in self.resolve() {
            match source.load().and_then(&mut build) {
                Ok(value) => {
                    info!("Using CDM server configuration from {source}");
                    return Ok(value);
                }
                Err(e) => warn!("Skipping CDM server configuration {source}: {e}"),
            }
        }

        Err(HubError::config("No usable CDM server configuration found"))
    }

    fn xdg_override_path() -> Option<PathBuf> {
        xdg::BaseDirectories::with_prefix("ofphub").find_config_file(OVERRIDE_FILE_NAME)
    }
}
