//! Data models for flight plans and CDM ground timings.
//!
//! These are the records that flow through the pipeline: the parsers produce
//! them inside background tasks, the coordinator post-processes them, and the
//! cache hands out shared snapshots. Display implementations live in
//! [`crate::display`] to keep presentation separate from the data.
//!
//! Every field is kept as an opaque string exactly as the upstream service
//! delivered it. Numeric interpretation (flight levels, epoch timestamps) is a
//! presentation concern.

pub mod cdm;
pub mod ofp;

pub use cdm::{CdmInfo, CdmProtocol, FeedLocation};
pub use ofp::OfpInfo;

/// Status string the upstream services use for a usable payload.
pub const STATUS_SUCCESS: &str = "Success";

/// A parsed record of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Ofp(OfpInfo),
    Cdm(CdmInfo),
}

impl Record {
    /// The flight plan, if this is one.
    pub fn into_ofp(self) -> Option<OfpInfo> {
        match self {
            Record::Ofp(ofp) => Some(ofp),
            Record::Cdm(_) => None,
        }
    }

    /// The CDM record, if this is one.
    pub fn into_cdm(self) -> Option<CdmInfo> {
        match self {
            Record::Cdm(cdm) => Some(cdm),
            Record::Ofp(_) => None,
        }
    }
}
