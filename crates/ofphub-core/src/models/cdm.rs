//! CDM ground-movement record and server protocol tags.

use std::{fmt, str::FromStr};

use super::STATUS_SUCCESS;

/// Wire protocol spoken by a CDM server.
///
/// Unknown tags are rejected when parsing, which makes a configuration with
/// an unsupported server fail as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CdmProtocol {
    /// Airport feed list plus one JSON document per airport
    Rpuig,

    /// vACDM REST API, one document per pilot
    VacdmV1,
}

impl FromStr for CdmProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rpuig" => Ok(CdmProtocol::Rpuig),
            "vacdm_v1" => Ok(CdmProtocol::VacdmV1),
            _ => Err(format!(
                "Unsupported CDM protocol '{s}', only 'rpuig' or 'vacdm_v1' are supported"
            )),
        }
    }
}

impl fmt::Display for CdmProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl CdmProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            CdmProtocol::Rpuig => "rpuig",
            CdmProtocol::VacdmV1 => "vacdm_v1",
        }
    }

    /// Path below the server base URL that lists the served airports.
    pub fn roster_path(&self) -> &'static str {
        match self {
            CdmProtocol::Rpuig => "/CDM_feeds.json",
            CdmProtocol::VacdmV1 => "/api/v1/airports",
        }
    }
}

/// Where the CDM data for one airport lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedLocation {
    pub url: String,
    pub protocol: CdmProtocol,
}

impl FeedLocation {
    /// URL of the document holding the flight's CDM data.
    ///
    /// rpuig serves a whole airport per document, vACDM one pilot per
    /// document.
    pub fn data_url(&self, callsign: &str) -> String {
        match self.protocol {
            CdmProtocol::Rpuig => self.url.clone(),
            CdmProtocol::VacdmV1 => format!("{}/api/v1/pilots/{}", self.url, callsign),
        }
    }
}

/// CDM timings for one flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CdmInfo {
    /// Feed URL the data was retrieved from
    pub url: String,
    pub status: String,
    /// Target off-block time, HHMM
    pub tobt: String,
    /// Target start-up approval time, HHMM
    pub tsat: String,
    pub runway: String,
    pub sid: String,

    /// Bumped each time the published content changes
    pub seqno: u32,
}

impl CdmInfo {
    /// A record carrying only a status, used for failed fetches.
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Compares the fields a consumer acts on, ignoring `url` and `seqno`.
    pub fn same_content(&self, other: &CdmInfo) -> bool {
        self.status == other.status
            && self.tobt == other.tobt
            && self.tsat == other.tsat
            && self.runway == other.runway
            && self.sid == other.sid
    }
}
