//! Parsers for the two CDM data protocols.

use serde_json::Value;

use super::{lookup, parse_document, require_str};
use crate::{
    error::{HubError, Result},
    models::{CdmInfo, STATUS_SUCCESS},
};

/// Status reported when the feed does not list the flight.
pub const FLIGHT_NOT_FOUND: &str = "Flight not found";

/// vACDM's placeholder for "no time assigned".
const EPOCH_SENTINEL: &str = "1969-12-31T23:59:59.999Z";

/// Reduces an ISO-8601 timestamp such as `2025-07-28T09:45:06.694Z` to `0945`.
///
/// The sentinel value, anything shorter than `YYYY-MM-DDTHH:MM`, or input
/// whose hour/minute positions are not digits yields an empty string.
pub fn extract_hhmm(time: &str) -> String {
    if time == EPOCH_SENTINEL || time.len() < 16 {
        return String::new();
    }

    match (time.get(11..13), time.get(14..16)) {
        (Some(hh), Some(mm)) if is_digits(hh) && is_digits(mm) => format!("{hh}{mm}"),
        _ => String::new(),
    }
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Picks one flight out of an rpuig airport feed.
///
/// A feed without the callsign is a normal outcome and yields a record with
/// status [`FLIGHT_NOT_FOUND`].
///
/// # Errors
///
/// Returns `HubError::SchemaViolation` when `flights` is not an array or the
/// matching entry lacks one of its timing fields.
pub fn parse_rpuig(payload: &[u8], callsign: &str) -> Result<CdmInfo> {
    let doc = parse_document(payload)?;
    let flights = lookup(&doc, "flights")
        .and_then(Value::as_array)
        .ok_or_else(|| HubError::schema("flights"))?;

    for (i, flight) in flights.iter().enumerate() {
        if require_str(flight, "callsign").map_err(|_| indexed(i, "callsign"))? != callsign {
            continue;
        }

        let field = |name: &str| require_str(flight, name).map_err(|_| indexed(i, name));
        return Ok(CdmInfo {
            status: STATUS_SUCCESS.to_string(),
            tobt: field("tobt")?,
            tsat: field("tsat")?,
            runway: field("runway")?,
            sid: field("sid")?,
            ..Default::default()
        });
    }

    Ok(CdmInfo::with_status(FLIGHT_NOT_FOUND))
}

/// Parses a vACDM pilot document.
///
/// # Errors
///
/// Returns `HubError::SchemaViolation` when any of the timing or clearance
/// keys is missing, which is also how vACDM answers for unknown pilots.
pub fn parse_vacdm(payload: &[u8]) -> Result<CdmInfo> {
    let doc = parse_document(payload)?;

    Ok(CdmInfo {
        status: STATUS_SUCCESS.to_string(),
        tobt: extract_hhmm(&require_str(&doc, "vacdm.tobt")?),
        tsat: extract_hhmm(&require_str(&doc, "vacdm.tsat")?),
        runway: require_str(&doc, "clearance.dep_rwy")?,
        sid: require_str(&doc, "clearance.sid")?,
        ..Default::default()
    })
}

fn indexed(i: usize, key: &str) -> HubError {
    HubError::schema(format!("flights[{i}].{key}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RPUIG_FEED: &[u8] = br#"{
        "flights": [
            {"callsign": "VLG12", "tobt": "0930", "tsat": "0935", "runway": "24R", "sid": "OKABI2R"},
            {"callsign": "DLH4AB", "tobt": "0945", "tsat": "0950", "runway": "24L", "sid": "SLL2J"}
        ]
    }"#;

    #[test]
    fn test_extract_hhmm() {
        assert_eq!(extract_hhmm("2025-07-28T09:45:06.694Z"), "0945");
        assert_eq!(extract_hhmm("2025-07-28T23:59"), "2359");
    }

    #[test]
    fn test_extract_hhmm_sentinel_and_short() {
        assert_eq!(extract_hhmm("1969-12-31T23:59:59.999Z"), "");
        assert_eq!(extract_hhmm("2025-07-28T09:4"), "");
        assert_eq!(extract_hhmm(""), "");
    }

    #[test]
    fn test_extract_hhmm_non_ascii_does_not_panic() {
        assert_eq!(extract_hhmm("2025-07-28Tä9:45:06Z"), "");
    }

    #[test]
    fn test_rpuig_picks_callsign() {
        let cdm = parse_rpuig(RPUIG_FEED, "DLH4AB").unwrap();
        assert_eq!(cdm.status, "Success");
        assert_eq!(cdm.tobt, "0945");
        assert_eq!(cdm.tsat, "0950");
        assert_eq!(cdm.runway, "24L");
        assert_eq!(cdm.sid, "SLL2J");
    }

    #[test]
    fn test_rpuig_unknown_callsign() {
        let cdm = parse_rpuig(RPUIG_FEED, "EWG74A").unwrap();
        assert_eq!(cdm.status, FLIGHT_NOT_FOUND);
        assert_eq!(cdm.tobt, "");
    }

    #[test]
    fn test_rpuig_missing_field_in_match() {
        let feed = br#"{"flights": [{"callsign": "DLH4AB", "tobt": "0945", "tsat": "0950", "sid": "SLL2J"}]}"#;
        let err = parse_rpuig(feed, "DLH4AB").unwrap_err();
        assert!(matches!(err, HubError::SchemaViolation { path } if path == "flights[0].runway"));
    }

    #[test]
    fn test_rpuig_without_flights() {
        let err = parse_rpuig(br#"{"airport": "LEBL"}"#, "DLH4AB").unwrap_err();
        assert!(matches!(err, HubError::SchemaViolation { path } if path == "flights"));
    }

    #[test]
    fn test_vacdm_unknown_pilot() {
        let err = parse_vacdm(br#"{"message": "pilot not found"}"#).unwrap_err();
        assert!(matches!(err, HubError::SchemaViolation { path } if path == "vacdm.tobt"));
    }

    #[test]
    fn test_vacdm_unassigned_tsat() {
        let doc = br#"{"vacdm": {"tobt": "2025-07-28T09:45:06.694Z", "tsat": "1969-12-31T23:59:59.999Z"},
                       "clearance": {"dep_rwy": "25C", "sid": "MARUN7F"}}"#;
        let cdm = parse_vacdm(doc).unwrap();
        assert_eq!(cdm.tobt, "0945");
        assert_eq!(cdm.tsat, "");
        assert_eq!(cdm.runway, "25C");
        assert_eq!(cdm.sid, "MARUN7F");
    }
}
