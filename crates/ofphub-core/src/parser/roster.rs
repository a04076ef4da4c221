//! Parsers for the airport rosters CDM servers publish.

use std::collections::HashMap;

use log::debug;
use serde_json::Value;

use super::{lookup, parse_document, require_str};
use crate::{
    error::{HubError, Result},
    models::CdmProtocol,
};

/// Parses a roster into an ICAO code → feed URL map.
///
/// rpuig lists one or more feed URLs per airport and the first one wins;
/// airports with an empty list are skipped. vACDM lists airport descriptors
/// and serves all of them from the server's own `base_url`.
///
/// # Errors
///
/// Returns `HubError::SchemaViolation` when the document does not have the
/// shape the protocol prescribes.
pub fn parse_roster(
    payload: &[u8],
    protocol: CdmProtocol,
    base_url: &str,
) -> Result<HashMap<String, String>> {
    let doc = parse_document(payload)?;

    match protocol {
        CdmProtocol::Rpuig => {
            let airports = lookup(&doc, "airports")
                .and_then(Value::as_object)
                .ok_or_else(|| HubError::schema("airports"))?;

            let mut roster = HashMap::with_capacity(airports.len());
            for (icao, urls) in airports {
                let urls = urls
                    .as_array()
                    .ok_or_else(|| HubError::schema(format!("airports.{icao}")))?;
                match urls.first().map(Value::as_str) {
                    Some(Some(url)) => {
                        roster.insert(icao.clone(), url.to_string());
                    }
                    Some(None) => return Err(HubError::schema(format!("airports.{icao}[0]"))),
                    None => debug!("Airport '{icao}' lists no feed, skipping"),
                }
            }
            Ok(roster)
        }

        CdmProtocol::VacdmV1 => {
            let airports = doc.as_array().ok_or_else(|| HubError::schema("$"))?;
            airports
                .iter()
                .enumerate()
                .map(|(i, airport)| {
                    require_str(airport, "icao")
                        .map(|icao| (icao, base_url.to_string()))
                        .map_err(|_| HubError::schema(format!("[{i}].icao")))
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpuig_roster_first_url() {
        let doc = br#"{"airports": {
            "LEBL": ["https://feeds.example.net/LEBL.json", "https://mirror.example.net/LEBL.json"],
            "LEMD": ["https://feeds.example.net/LEMD.json"],
            "LEPA": []
        }}"#;
        let roster = parse_roster(doc, CdmProtocol::Rpuig, "https://feeds.example.net").unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster["LEBL"], "https://feeds.example.net/LEBL.json");
        assert_eq!(roster["LEMD"], "https://feeds.example.net/LEMD.json");
        assert!(!roster.contains_key("LEPA"));
    }

    #[test]
    fn test_rpuig_roster_wrong_shape() {
        let err = parse_roster(br#"{"airports": ["LEBL"]}"#, CdmProtocol::Rpuig, "x").unwrap_err();
        assert!(matches!(err, HubError::SchemaViolation { path } if path == "airports"));
    }

    #[test]
    fn test_vacdm_roster_uses_base_url() {
        let doc = br#"[{"icao": "EDDF", "name": "Frankfurt"}, {"icao": "EDDM"}]"#;
        let roster = parse_roster(doc, CdmProtocol::VacdmV1, "https://vacdm.example.net").unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster["EDDF"], "https://vacdm.example.net");
        assert_eq!(roster["EDDM"], "https://vacdm.example.net");
    }

    #[test]
    fn test_vacdm_roster_missing_icao() {
        let doc = br#"[{"icao": "EDDF"}, {"name": "Munich"}]"#;
        let err = parse_roster(doc, CdmProtocol::VacdmV1, "https://vacdm.example.net").unwrap_err();
        assert!(matches!(err, HubError::SchemaViolation { path } if path == "[1].icao"));
    }
}
