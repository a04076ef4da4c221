//! Named read surface over the cache.
//!
//! Every exported string field has a stable name such as `sbh/origin` and is
//! read with a two-phase protocol: ask for the length with no buffer, then
//! copy into a buffer of that size. Strings are offered with a trailing NUL.
//! Nothing is readable before the first successful download.

use std::{fmt, str::FromStr};

use crate::{
    cache::FlightDataCache,
    models::{CdmInfo, OfpInfo},
};

macro_rules! field_table {
    (
        $(#[$meta:meta])*
        $name:ident for $record:ty, prefix $prefix:literal {
            $($variant:ident => $field:ident,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Every field in export order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Exported name of the field.
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => concat!($prefix, stringify!($field)),)+
                }
            }

            /// Reads the field from a record.
            pub fn get(self, record: &$record) -> &str {
                match self {
                    $($name::$variant => &record.$field,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            /// Accepts the exported name or the bare field name.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let bare = s.strip_prefix($prefix).unwrap_or(s);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|f| &f.name()[$prefix.len()..] == bare)
                    .ok_or_else(|| format!("Unknown field '{s}'"))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.name())
            }
        }
    };
}

field_table! {
    /// String fields of the flight plan.
    OfpField for OfpInfo, prefix "sbh/" {
        Units => units,
        Status => status,
        IcaoAirline => icao_airline,
        FlightNumber => flight_number,
        AircraftIcao => aircraft_icao,
        MaxPassengers => max_passengers,
        FuelPlanRamp => fuel_plan_ramp,
        FuelTaxi => fuel_taxi,
        Origin => origin,
        OriginRwy => origin_rwy,
        Destination => destination,
        DestinationRwy => destination_rwy,
        Alternate => alternate,
        AltRoute => alt_route,
        Ci => ci,
        Altitude => altitude,
        Tropopause => tropopause,
        IsaDev => isa_dev,
        WindComponent => wind_component,
        Oew => oew,
        PaxCount => pax_count,
        Freight => freight,
        Payload => payload,
        MaxZfw => max_zfw,
        MaxTow => max_tow,
        Route => route,
        Remarks => remarks,
        TimeGenerated => time_generated,
        EstTimeEnroute => est_time_enroute,
        EstOut => est_out,
        EstOff => est_off,
        EstOn => est_on,
        EstIn => est_in,
    }
}

field_table! {
    /// String fields of the CDM record.
    CdmField for CdmInfo, prefix "sbh/cdm/" {
        Url => url,
        Status => status,
        Tobt => tobt,
        Tsat => tsat,
        Runway => runway,
        Sid => sid,
    }
}

/// Names of the integer values, in the same style as the string fields.
pub const OFP_SEQNO_NAME: &str = "sbh/seqno";
pub const OFP_STALE_NAME: &str = "sbh/stale";
pub const CDM_SEQNO_NAME: &str = "sbh/cdm/seqno";

/// Copies `data` plus a trailing NUL into `buf`, starting at byte `offset`.
///
/// Without a buffer the full length including the NUL is returned. With one,
/// the number of bytes written; `0` when `offset` lies past the end.
pub fn copy_field(data: &str, buf: Option<&mut [u8]>, offset: usize) -> usize {
    let len = data.len() + 1;
    let Some(buf) = buf else {
        return len;
    };
    if buf.is_empty() || offset >= len {
        return 0;
    }

    let n = buf.len().min(len - offset);
    for (dst, src) in buf[..n]
        .iter_mut()
        .zip(data.bytes().chain(std::iter::once(0)).skip(offset))
    {
        *dst = src;
    }
    n
}

impl FlightDataCache {
    /// Reads a flight plan field with the two-phase protocol of
    /// [`copy_field`]. Returns `0` until a plan has been fetched successfully.
    pub fn read_ofp_field(&self, field: OfpField, buf: Option<&mut [u8]>, offset: usize) -> usize {
        match self.ofp() {
            Some(ofp) if ofp.seqno > 0 => copy_field(field.get(&ofp), buf, offset),
            _ => 0,
        }
    }

    /// Reads a CDM field with the two-phase protocol of [`copy_field`].
    pub fn read_cdm_field(&self, field: CdmField, buf: Option<&mut [u8]>, offset: usize) -> usize {
        match self.cdm() {
            Some(cdm) if cdm.seqno > 0 => copy_field(field.get(&cdm), buf, offset),
            _ => 0,
        }
    }

    /// Flight plan sequence number, `0` before the first success.
    pub fn ofp_seqno(&self) -> u32 {
        self.ofp().map_or(0, |ofp| ofp.seqno)
    }

    /// Whether the last flight plan download failed.
    pub fn ofp_stale(&self) -> bool {
        self.ofp().is_some_and(|ofp| ofp.stale)
    }

    pub fn cdm_seqno(&self) -> u32 {
        self.cdm().map_or(0, |cdm| cdm.seqno)
    }
}
