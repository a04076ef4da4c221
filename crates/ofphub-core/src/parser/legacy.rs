//! Best-effort extractor for the legacy XML flight plan.
//!
//! This is not an XML parser. The document is scanned for `<tag>...</tag>`
//! pairs: an outer tag (`<general>`, `<weights>`, ...) bounds the window in
//! which its inner tags are searched, so `icao_code` inside `<origin>` is
//! never confused with the one inside `<destination>`. Missing tags leave the
//! corresponding field empty.

use std::ops::Range;

use crate::models::OfpInfo;

/// A window of the document delimited by one element's text.
struct Section<'a> {
    doc: &'a str,
    window: Range<usize>,
}

impl<'a> Section<'a> {
    fn whole(doc: &'a str) -> Self {
        Self {
            doc,
            window: 0..doc.len(),
        }
    }

    /// Narrows to the text of the first `<tag>` element inside this window.
    fn child(&self, tag: &str) -> Option<Section<'a>> {
        element_text(self.doc, self.window.clone(), tag).map(|window| Section {
            doc: self.doc,
            window,
        })
    }

    /// Copies the text of `<tag>` into `field`, leaving it untouched on a miss.
    fn extract(&self, tag: &str, field: &mut String) {
        if let Some(range) = element_text(self.doc, self.window.clone(), tag) {
            *field = self.doc[range].to_string();
        }
    }
}

/// Byte range of the text between `<tag>` and `</tag>`, both inside `window`.
fn element_text(doc: &str, window: Range<usize>, tag: &str) -> Option<Range<usize>> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let scope = doc.get(window.clone())?;

    let start = scope.find(&open)? + open.len();
    let end = start + scope[start..].find(&close)?;
    Some(window.start + start..window.start + end)
}

/// Extracts an [`OfpInfo`] from the legacy XML output.
///
/// Never fails. A document without a `<fetch>` section yields a record with an
/// empty status, which the coordinator treats as unsuccessful.
pub fn parse_ofp_xml(doc: &str) -> OfpInfo {
    let mut ofp = OfpInfo::default();
    let root = Section::whole(doc);

    if let Some(fetch) = root.child("fetch") {
        fetch.extract("status", &mut ofp.status);
        if !ofp.is_success() {
            return ofp;
        }
    }

    if let Some(params) = root.child("params") {
        params.extract("time_generated", &mut ofp.time_generated);
        params.extract("units", &mut ofp.units);
    }

    if let Some(aircraft) = root.child("aircraft") {
        aircraft.extract("icaocode", &mut ofp.aircraft_icao);
        aircraft.extract("max_passengers", &mut ofp.max_passengers);
    }

    if let Some(fuel) = root.child("fuel") {
        fuel.extract("plan_ramp", &mut ofp.fuel_plan_ramp);
        fuel.extract("taxi", &mut ofp.fuel_taxi);
    }

    if let Some(origin) = root.child("origin") {
        origin.extract("icao_code", &mut ofp.origin);
        origin.extract("plan_rwy", &mut ofp.origin_rwy);
    }

    if let Some(destination) = root.child("destination") {
        destination.extract("icao_code", &mut ofp.destination);
        destination.extract("plan_rwy", &mut ofp.destination_rwy);
    }

    if let Some(general) = root.child("general") {
        general.extract("icao_airline", &mut ofp.icao_airline);
        general.extract("flight_number", &mut ofp.flight_number);
        general.extract("costindex", &mut ofp.ci);
        general.extract("initial_altitude", &mut ofp.altitude);
        general.extract("avg_tropopause", &mut ofp.tropopause);
        general.extract("avg_wind_comp", &mut ofp.wind_component);
        general.extract("avg_temp_dev", &mut ofp.isa_dev);
        general.extract("route", &mut ofp.route);
        general.extract("dx_rmk", &mut ofp.remarks);
    }

    if let Some(alternate) = root.child("alternate") {
        alternate.extract("icao_code", &mut ofp.alternate);
        alternate.extract("route", &mut ofp.alt_route);
    }

    if let Some(weights) = root.child("weights") {
        weights.extract("oew", &mut ofp.oew);
        weights.extract("pax_count", &mut ofp.pax_count);
        weights.extract("freight_added", &mut ofp.freight);
        weights.extract("payload", &mut ofp.payload);
        weights.extract("max_zfw", &mut ofp.max_zfw);
        weights.extract("max_tow", &mut ofp.max_tow);
    }

    if let Some(times) = root.child("times") {
        times.extract("est_time_enroute", &mut ofp.est_time_enroute);
        times.extract("est_out", &mut ofp.est_out);
        times.extract("est_off", &mut ofp.est_off);
        times.extract("est_on", &mut ofp.est_on);
        times.extract("est_in", &mut ofp.est_in);
    }

    ofp
}
