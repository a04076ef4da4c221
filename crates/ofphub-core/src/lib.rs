//! Core library for the ofphub flight data hub.
//!
//! This crate fetches operational flight plans (OFP) from a flight planning
//! service and CDM ground-movement timings from CDM servers, parses them into
//! fixed records, and caches the latest copy for a host that polls it. The
//! host never waits on the network: downloads run on a tokio runtime's
//! blocking pool and are collected by a non-blocking poll.
//!
//! # Pipeline
//!
//! - [`parser`]: payload bytes to records, strict for JSON, best-effort for
//!   the legacy XML
//! - [`fetch`]: the HTTP GET boundary
//! - [`directory`] and [`config`]: which CDM server serves which airport
//! - [`coordinator`]: the [`Hub`], single-flight downloads and
//!   post-processing
//! - [`cache`] and [`accessor`]: published records and their named fields
//! - [`display`]: human-readable summaries
//! - [`testing`]: a scripted fetch client for hosts' tests
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use ofphub_core::HubBuilder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let runtime = tokio::runtime::Runtime::new()?;
//! let mut hub = HubBuilder::new()
//!     .with_pilot_id(Some("123456"))
//!     .build(runtime.handle().clone());
//!
//! hub.request_ofp();
//! hub.request_cdm("EDDF", "DLH4AB");
//!
//! // The host's loop: one poll per tick.
//! while hub.poll() {
//!     std::thread::sleep(Duration::from_millis(100));
//! }
//!
//! if let Some(ofp) = hub.cache().ofp() {
//!     println!("{ofp}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod accessor;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod directory;
pub mod display;
pub mod error;
pub mod fetch;
pub mod models;
pub mod parser;
pub mod testing;

// Re-export commonly used types
pub use accessor::{CdmField, OfpField};
pub use cache::FlightDataCache;
pub use config::{ConfigSource, ConfigSources, ServerEntry};
pub use coordinator::{Hub, HubBuilder, OfpFormat};
pub use directory::{CdmServer, ServerDirectory};
pub use error::{HubError, Result};
pub use fetch::{FetchClient, ReqwestFetcher};
pub use models::{CdmInfo, CdmProtocol, FeedLocation, OfpInfo, Record};
pub use parser::Schema;
