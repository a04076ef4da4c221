//! Human-readable rendering of flight data.
//!
//! Domain records implement [`std::fmt::Display`] here rather than next to
//! their definitions, so the models stay plain data. Small wrapper types
//! format the opaque upstream strings (epoch seconds, signed deviations)
//! without changing what the records store.
//!
//! - [`datetime`]: epoch timestamps and durations
//! - [`records`]: `OfpInfo` / `CdmInfo` summaries and route wrapping

pub mod datetime;
pub mod records;

pub use datetime::{HoursMinutes, UtcClock, UtcDateTime};
pub use records::{wrap_route, OfpHeadline, Signed, ROUTE_WIDTH};
