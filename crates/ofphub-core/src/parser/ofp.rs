//! Strict parser for the flight planning service's JSON output.

use serde_json::Value;

use super::{lookup, parse_document, require_str};
use crate::{
    error::{HubError, Result},
    models::{OfpInfo, STATUS_SUCCESS},
};

const REMARKS_PATH: &str = "general.dx_rmk";

/// Parses an OFP JSON document.
///
/// A non-success `fetch.status` short-circuits into a status-only record.
///
/// # Errors
///
/// Returns `HubError::SchemaViolation` naming the first mandatory key that is
/// missing or not a string, or `$` when the payload is not JSON.
pub fn parse_ofp_json(payload: &[u8]) -> Result<OfpInfo> {
    let doc = parse_document(payload)?;

    let status = require_str(&doc, "fetch.status")?;
    if status != STATUS_SUCCESS {
        return Ok(OfpInfo::with_status(status));
    }

    // Document order: the first missing key is the one reported.
    Ok(OfpInfo {
        status,
        units: require_str(&doc, "params.units")?,
        time_generated: require_str(&doc, "params.time_generated")?,
        aircraft_icao: require_str(&doc, "aircraft.icaocode")?,
        max_passengers: require_str(&doc, "aircraft.max_passengers")?,
        fuel_plan_ramp: require_str(&doc, "fuel.plan_ramp")?,
        fuel_taxi: require_str(&doc, "fuel.taxi")?,
        origin: require_str(&doc, "origin.icao_code")?,
        origin_rwy: require_str(&doc, "origin.plan_rwy")?,
        destination: require_str(&doc, "destination.icao_code")?,
        destination_rwy: require_str(&doc, "destination.plan_rwy")?,
        icao_airline: require_str(&doc, "general.icao_airline")?,
        flight_number: require_str(&doc, "general.flight_number")?,
        ci: require_str(&doc, "general.costindex")?,
        altitude: require_str(&doc, "general.initial_altitude")?,
        tropopause: require_str(&doc, "general.avg_tropopause")?,
        wind_component: require_str(&doc, "general.avg_wind_comp")?,
        isa_dev: require_str(&doc, "general.avg_temp_dev")?,
        route: require_str(&doc, "general.route")?,
        remarks: remarks(&doc)?,
        alternate: require_str(&doc, "alternate.icao_code")?,
        alt_route: require_str(&doc, "alternate.route")?,
        oew: require_str(&doc, "weights.oew")?,
        pax_count: require_str(&doc, "weights.pax_count")?,
        freight: require_str(&doc, "weights.freight_added")?,
        payload: require_str(&doc, "weights.payload")?,
        max_zfw: require_str(&doc, "weights.max_zfw")?,
        max_tow: require_str(&doc, "weights.max_tow")?,
        est_time_enroute: require_str(&doc, "times.est_time_enroute")?,
        est_out: require_str(&doc, "times.est_out")?,
        est_off: require_str(&doc, "times.est_off")?,
        est_on: require_str(&doc, "times.est_on")?,
        est_in: require_str(&doc, "times.est_in")?,
        seqno: 0,
        stale: false,
    })
}

/// Normalizes the optional remark field.
///
/// The service sends a single remark as a string and several as an array.
fn remarks(doc: &Value) -> Result<String> {
    match lookup(doc, REMARKS_PATH) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().ok_or_else(|| HubError::schema(REMARKS_PATH)))
            .collect::<Result<Vec<_>>>()
            .map(|parts| parts.join(" ")),
        Some(_) => Err(HubError::schema(REMARKS_PATH)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn sample() -> Value {
        json!({
            "fetch": {"userid": "123456", "static_id": {}, "status": "Success", "time": "0.0311"},
            "params": {"time_generated": "1753695600", "units": "kgs"},
            "general": {
                "icao_airline": "DLH", "flight_number": "4AB", "costindex": "30",
                "initial_altitude": "36000", "avg_tropopause": "36512",
                "avg_wind_comp": "-12", "avg_temp_dev": "4",
                "route": "MARUN Y163 NATOR",
                "dx_rmk": ["RMK A", "RMK B"]
            },
            "origin": {"icao_code": "EDDF", "plan_rwy": "25C"},
            "destination": {"icao_code": "LEBL", "plan_rwy": "24L"},
            "alternate": {"icao_code": "LEGE", "route": "SLL2J SLL"},
            "aircraft": {"icaocode": "A20N", "max_passengers": "180"},
            "fuel": {"plan_ramp": "9800", "taxi": "200"},
            "weights": {
                "oew": "42600", "pax_count": "168", "freight_added": "1200",
                "payload": "17160", "max_zfw": "64300", "max_tow": "79000"
            },
            "times": {
                "est_time_enroute": "7020", "est_out": "1753700400",
                "est_off": "1753701000", "est_on": "1753708020", "est_in": "1753708500"
            }
        })
    }

    fn bytes(v: &Value) -> Vec<u8> {
        serde_json::to_vec(v).unwrap()
    }

    #[test]
    fn test_parse_known_good_payload() {
        let ofp = parse_ofp_json(&bytes(&sample())).unwrap();

        let expected = OfpInfo {
            units: "kgs".to_string(),
            status: "Success".to_string(),
            icao_airline: "DLH".to_string(),
            flight_number: "4AB".to_string(),
            aircraft_icao: "A20N".to_string(),
            max_passengers: "180".to_string(),
            fuel_plan_ramp: "9800".to_string(),
            fuel_taxi: "200".to_string(),
            origin: "EDDF".to_string(),
            origin_rwy: "25C".to_string(),
            destination: "LEBL".to_string(),
            destination_rwy: "24L".to_string(),
            alternate: "LEGE".to_string(),
            alt_route: "SLL2J SLL".to_string(),
            ci: "30".to_string(),
            altitude: "36000".to_string(),
            tropopause: "36512".to_string(),
            isa_dev: "4".to_string(),
            wind_component: "-12".to_string(),
            oew: "42600".to_string(),
            pax_count: "168".to_string(),
            freight: "1200".to_string(),
            payload: "17160".to_string(),
            max_zfw: "64300".to_string(),
            max_tow: "79000".to_string(),
            route: "MARUN Y163 NATOR".to_string(),
            remarks: "RMK A RMK B".to_string(),
            time_generated: "1753695600".to_string(),
            est_time_enroute: "7020".to_string(),
            est_out: "1753700400".to_string(),
            est_off: "1753701000".to_string(),
            est_on: "1753708020".to_string(),
            est_in: "1753708500".to_string(),
            seqno: 0,
            stale: false,
        };
        assert_eq!(ofp, expected);
    }

    #[test]
    fn test_remark_as_string_and_absent() {
        let mut doc = sample();
        doc["general"]["dx_rmk"] = json!("SINGLE REMARK");
        assert_eq!(parse_ofp_json(&bytes(&doc)).unwrap().remarks, "SINGLE REMARK");

        doc["general"].as_object_mut().unwrap().remove("dx_rmk");
        assert_eq!(parse_ofp_json(&bytes(&doc)).unwrap().remarks, "");
    }

    #[test]
    fn test_remark_array_with_number_is_violation() {
        let mut doc = sample();
        doc["general"]["dx_rmk"] = json!(["RMK A", 7]);
        let err = parse_ofp_json(&bytes(&doc)).unwrap_err();
        assert!(matches!(err, HubError::SchemaViolation { path } if path == "general.dx_rmk"));
    }

    #[test]
    fn test_upstream_error_status_is_not_an_error() {
        let doc = json!({"fetch": {"status": "Error: Unknown UserID"}});
        let ofp = parse_ofp_json(&bytes(&doc)).unwrap();
        assert_eq!(ofp.status, "Error: Unknown UserID");
        assert_eq!(ofp.route, "");
        assert_eq!(ofp.origin, "");
    }

    #[test]
    fn test_missing_mandatory_key() {
        let mut doc = sample();
        doc["times"].as_object_mut().unwrap().remove("est_on");
        let err = parse_ofp_json(&bytes(&doc)).unwrap_err();
        assert!(matches!(err, HubError::SchemaViolation { path } if path == "times.est_on"));
    }

    #[test]
    fn test_missing_section() {
        let mut doc = sample();
        doc.as_object_mut().unwrap().remove("weights");
        let err = parse_ofp_json(&bytes(&doc)).unwrap_err();
        assert!(matches!(err, HubError::SchemaViolation { path } if path == "weights.oew"));
    }

    #[test]
    fn test_missing_fetch_status() {
        let mut doc = sample();
        doc.as_object_mut().unwrap().remove("fetch");
        let err = parse_ofp_json(&bytes(&doc)).unwrap_err();
        assert!(matches!(err, HubError::SchemaViolation { path } if path == "fetch.status"));
    }

    #[test]
    fn test_not_json() {
        let err = parse_ofp_json(b"<OFP><fetch>").unwrap_err();
        assert!(matches!(err, HubError::SchemaViolation { path } if path == "$"));
    }
}
