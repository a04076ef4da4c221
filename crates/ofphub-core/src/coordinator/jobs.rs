//! The work done on the blocking pool.
//!
//! Each job fetches, parses and always returns a record. Failures are folded
//! into the record's status so nothing but data crosses back to the polling
//! thread.

use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};

use log::{info, warn};

use super::OfpFormat;
use crate::{
    directory::ServerDirectory,
    error::{HubError, Result},
    fetch::FetchClient,
    models::{CdmInfo, OfpInfo, Record},
    parser::{parse, Schema, FLIGHT_NOT_FOUND},
};

pub const NETWORK_ERROR: &str = "Network error";
pub const FEED_NOT_FOUND: &str = "Feed for airport not found";
pub const CDM_FETCH_FAILED: &str = "Failed to retrieve CDM data";
pub const DOWNLOAD_ABORTED: &str = "Download aborted";

/// Downloads and parses one flight plan.
pub(crate) fn download_ofp(
    fetcher: &dyn FetchClient,
    url: &str,
    format: OfpFormat,
    timeout: Duration,
) -> OfpInfo {
    let payload = match fetcher.get(url, timeout) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("OFP download failed: {e}");
            return OfpInfo::with_status(NETWORK_ERROR);
        }
    };

    match parse_as(&payload, &format.schema(), Record::into_ofp) {
        Ok(ofp) => {
            info!("OFP download status: {}", ofp.status);
            ofp
        }
        Err(e) => {
            warn!("OFP payload rejected: {e}");
            OfpInfo::with_status(e.to_string())
        }
    }
}

/// Resolves the airport's feed, then downloads and parses the flight's CDM
/// data.
///
/// The directory stays locked for the whole resolution, which may include
/// roster downloads.
pub(crate) fn download_cdm(
    directory: &Mutex<ServerDirectory>,
    fetcher: &dyn FetchClient,
    airport: &str,
    callsign: &str,
    timeout: Duration,
) -> CdmInfo {
    let resolved = directory
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .resolve(airport, fetcher, timeout);

    let Ok(location) = resolved else {
        return CdmInfo::with_status(FEED_NOT_FOUND);
    };

    let url = location.data_url(callsign);
    let with_url = |mut cdm: CdmInfo| {
        cdm.url.clone_from(&url);
        cdm
    };

    let payload = match fetcher.get(&url, timeout) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("CDM download failed: {e}");
            return with_url(CdmInfo::with_status(CDM_FETCH_FAILED));
        }
    };

    let schema = Schema::for_feed(location.protocol, callsign);
    match parse_as(&payload, &schema, Record::into_cdm) {
        Ok(cdm) => {
            info!("CDM data for '{callsign}' from '{url}': {}", cdm.status);
            with_url(cdm)
        }
        Err(e @ HubError::SchemaViolation { .. }) => {
            info!("No CDM data for '{callsign}' at '{url}': {e}");
            with_url(CdmInfo::with_status(FLIGHT_NOT_FOUND))
        }
        Err(e) => with_url(CdmInfo::with_status(e.to_string())),
    }
}

/// Parses `payload` and takes the record of the expected kind out of it.
fn parse_as<T>(payload: &[u8], schema: &Schema, take: fn(Record) -> Option<T>) -> Result<T> {
    parse(payload, schema).and_then(|record| take(record).ok_or_else(|| HubError::schema("$")))
}
