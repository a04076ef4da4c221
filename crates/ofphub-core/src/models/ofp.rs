//! Operational flight plan record.

use super::STATUS_SUCCESS;

/// Flight plan data as delivered by the planning service.
///
/// `seqno` and `stale` are owned by the coordinator. A parser always returns
/// them zeroed; only publication into the cache assigns them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfpInfo {
    pub units: String,
    /// Upstream fetch status, `"Success"` for a usable plan
    pub status: String,
    pub icao_airline: String,
    pub flight_number: String,
    pub aircraft_icao: String,
    pub max_passengers: String,
    pub fuel_plan_ramp: String,
    pub fuel_taxi: String,
    pub origin: String,
    pub origin_rwy: String,
    pub destination: String,
    pub destination_rwy: String,
    pub alternate: String,
    pub alt_route: String,
    /// Cost index
    pub ci: String,
    /// Initial cruise altitude; a flight level once published
    pub altitude: String,
    pub tropopause: String,
    pub isa_dev: String,
    pub wind_component: String,
    /// Operating empty weight
    pub oew: String,
    pub pax_count: String,
    pub freight: String,
    pub payload: String,
    pub max_zfw: String,
    pub max_tow: String,
    pub route: String,
    /// Dispatch remarks, joined with single spaces
    pub remarks: String,
    /// Seconds since the Unix epoch, as a decimal string
    pub time_generated: String,
    /// Enroute time in seconds
    pub est_time_enroute: String,
    pub est_out: String,
    pub est_off: String,
    pub est_on: String,
    pub est_in: String,

    /// Number of successful fetches so far; 0 means never fetched
    pub seqno: u32,
    /// True when the last fetch attempt failed
    pub stale: bool,
}

impl OfpInfo {
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

    /// Callsign as filed, airline code followed by flight number.
    pub fn callsign(&self) -> String {
        format!("{}{}", self.icao_airline, self.flight_number)
    }

    /// Cruise altitude in feet converted to a flight level.
    ///
    /// Returns `None` when the altitude is not a plain integer.
    pub fn flight_level(&self) -> Option<String> {
        self.altitude
            .trim()
            .parse::<i64>()
            .ok()
            .map(|feet| (feet / 100).to_string())
    }
}
