//! Payload parsers for the upstream services.
//!
//! All functions here are pure: raw bytes in, record or error out. Two
//! failure contracts coexist:
//!
//! - The JSON schemas are strict. Every mandatory key is looked up by its
//!   dotted path and a missing or mistyped key fails the whole parse with
//!   [`HubError::SchemaViolation`] naming that path.
//! - The legacy pseudo-XML OFP is best-effort. A missing tag leaves the field
//!   empty and there is no error channel at all.
//!
//! A non-success upstream status is not an error in either contract: the
//! parser returns a record carrying that status and nothing else.
//!
//! [`HubError::SchemaViolation`]: crate::error::HubError::SchemaViolation

use log::debug;
use serde_json::Value;

use crate::{
    error::{HubError, Result},
    models::{CdmProtocol, Record},
};

pub mod cdm;
pub mod legacy;
pub mod ofp;
pub mod roster;

pub use cdm::{extract_hhmm, parse_rpuig, parse_vacdm, FLIGHT_NOT_FOUND};
pub use legacy::parse_ofp_xml;
pub use ofp::parse_ofp_json;
pub use roster::parse_roster;

/// Which upstream schema a payload follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    /// Flight planning service, JSON output
    OfpJson,
    /// Flight planning service, legacy XML output
    OfpXml,
    /// rpuig airport feed; the flight is picked by callsign
    CdmRpuig { callsign: String },
    /// vACDM per-pilot document
    CdmVacdm,
}

impl Schema {
    /// Schema of the CDM data a server of `protocol` serves for `callsign`.
    pub fn for_feed(protocol: CdmProtocol, callsign: &str) -> Self {
        match protocol {
            CdmProtocol::Rpuig => Schema::CdmRpuig {
                callsign: callsign.to_string(),
            },
            CdmProtocol::VacdmV1 => Schema::CdmVacdm,
        }
    }
}

/// Parses a raw payload according to `schema`.
///
/// # Errors
///
/// Returns `HubError::SchemaViolation` when a strict schema is violated.
/// [`Schema::OfpXml`] never fails.
pub fn parse(payload: &[u8], schema: &Schema) -> Result<Record> {
    match schema {
        Schema::OfpJson => parse_ofp_json(payload).map(Record::Ofp),
        Schema::OfpXml => Ok(Record::Ofp(parse_ofp_xml(&String::from_utf8_lossy(
            payload,
        )))),
        Schema::CdmRpuig { callsign } => parse_rpuig(payload, callsign).map(Record::Cdm),
        Schema::CdmVacdm => parse_vacdm(payload).map(Record::Cdm),
    }
}

/// Parses a JSON document, reporting malformed input at the root path `$`.
pub(crate) fn parse_document(payload: &[u8]) -> Result<Value> {
    serde_json::from_slice(payload).map_err(|e| {
        debug!("Invalid JSON payload: {e}");
        HubError::schema("$")
    })
}

/// Walks a dotted key path through nested objects.
pub(crate) fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |node, key| node.get(key))
}

/// Fetches a mandatory string at `path`.
pub(crate) fn require_str(root: &Value, path: &str) -> Result<String> {
    lookup(root, path)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| HubError::schema(path))
}
