//! Display implementations for flight data records.
//!
//! Output is markdown, laid out like a dispatch briefing: headline with the
//! callsign and generation time, then loads, times, route and cruise data.

use std::fmt;

use super::datetime::{HoursMinutes, UtcClock, UtcDateTime};
use crate::models::{CdmInfo, OfpInfo};

/// Width at which routes are broken onto continuation lines.
pub const ROUTE_WIDTH: usize = 50;

/// Breaks a route into lines of at most `width` characters at blanks.
///
/// A single token longer than `width` is kept whole on its own line.
pub fn wrap_route(route: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for token in route.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + token.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(token);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Signed value as `P010` / `M005`, the notation used on flight plans.
pub struct Signed<'a>(pub &'a str);

impl<'a> fmt::Display for Signed<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.trim().parse::<i64>() {
            Ok(v) if v < 0 => write!(f, "M{:03}", v.unsigned_abs()),
            Ok(v) => write!(f, "P{v:03}"),
            Err(_) => write!(f, "{}", self.0),
        }
    }
}

/// Tropopause height rounded to the nearest thousand feet.
struct Tropopause<'a>(&'a str);

impl<'a> fmt::Display for Tropopause<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.trim().parse::<i64>() {
            Ok(feet) => write!(f, "{}", feet.saturating_add(500) / 1000 * 1000),
            Err(_) => write!(f, "{}", self.0),
        }
    }
}

/// One-line summary, e.g. `DLH4AB A20N / OFP generated at 2025-07-28 09:40:00 UTC`.
///
/// A failed download shows its status instead.
pub struct OfpHeadline<'a>(pub &'a OfpInfo);

impl<'a> fmt::Display for OfpHeadline<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ofp = self.0;
        if !ofp.is_success() {
            return write!(f, "{}", ofp.status);
        }
        write!(
            f,
            "{} {} / OFP generated at {}",
            ofp.callsign(),
            ofp.aircraft_icao,
            UtcDateTime(&ofp.time_generated)
        )
    }
}

fn write_route(f: &mut fmt::Formatter<'_>, label: &str, route: &str) -> fmt::Result {
    let lines = wrap_route(route, ROUTE_WIDTH);
    match lines.split_first() {
        Some((first, rest)) => {
            writeln!(f, "- {label}: {first}")?;
            for line in rest {
                writeln!(f, "  {line}")?;
            }
            Ok(())
        }
        None => writeln!(f, "- {label}:"),
    }
}

impl fmt::Display for OfpInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.seqno == 0 {
            return writeln!(f, "No flight plan: {}", self.status);
        }

        writeln!(f, "# {}", OfpHeadline(self))?;
        if self.stale {
            writeln!(f)?;
            writeln!(f, "> Stale, last download: {}", self.status)?;
        }
        writeln!(f)?;

        writeln!(f, "- Pax: {}", self.pax_count)?;
        writeln!(f, "- Cargo: {}", self.freight)?;
        writeln!(f, "- Fuel: {} {}", self.fuel_plan_ramp, self.units)?;
        writeln!(
            f,
            "- Out: {}  Off: {}",
            UtcClock(&self.est_out),
            UtcClock(&self.est_off)
        )?;
        writeln!(f)?;

        writeln!(f, "- Departure: {}/{}", self.origin, self.origin_rwy)?;
        writeln!(f, "- Destination: {}/{}", self.destination, self.destination_rwy)?;
        write_route(f, "Route", &self.route)?;
        writeln!(f, "- Trip time: {}", HoursMinutes(&self.est_time_enroute))?;
        writeln!(f, "- CI: {}  TROPO: {}", self.ci, Tropopause(&self.tropopause))?;
        writeln!(f, "- CRZ FL: {}  ISA: {}", self.altitude, Signed(&self.isa_dev))?;
        writeln!(f, "- WC: {}", Signed(&self.wind_component))?;
        writeln!(f)?;

        writeln!(f, "- Alternate: {}", self.alternate)?;
        write_route(f, "Alt Route", &self.alt_route)?;

        if !self.remarks.is_empty() {
            writeln!(f, "\n{}", self.remarks)?;
        }
        Ok(())
    }
}

impl fmt::Display for CdmInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_success() {
            return writeln!(f, "CDM: {}", self.status);
        }
        writeln!(
            f,
            "CDM: TOBT {} TSAT {} RWY {} SID {}",
            self.tobt, self.tsat, self.runway, self.sid
        )?;
        writeln!(f, "- Source: {}", self.url)
    }
}
