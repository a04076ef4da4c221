//! Last known-good flight data.
//!
//! Records are held behind [`Arc`] and swapped whole, so a reader that took a
//! snapshot keeps a consistent view no matter what is published afterwards.
//! Only the coordinator publishes.

use std::sync::Arc;

use log::{debug, info};

use crate::models::{CdmInfo, OfpInfo};

#[derive(Debug, Default)]
pub struct FlightDataCache {
    ofp: Option<Arc<OfpInfo>>,
    cdm: Option<Arc<CdmInfo>>,
}

impl FlightDataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current flight plan, `None` until a download has completed.
    pub fn ofp(&self) -> Option<Arc<OfpInfo>> {
        self.ofp.clone()
    }

    /// Current CDM record, `None` until a download has completed.
    pub fn cdm(&self) -> Option<Arc<CdmInfo>> {
        self.cdm.clone()
    }

    /// Merges a freshly downloaded flight plan.
    ///
    /// A successful plan replaces the cached one with the next sequence
    /// number. A failed download keeps every data field of the previous plan
    /// and only records the failure status and staleness.
    pub(crate) fn publish_ofp(&mut self, mut fetched: OfpInfo) -> Arc<OfpInfo> {
        if fetched.is_success() {
            fetched.seqno = self
                .ofp
                .as_ref()
                .map_or(0, |prev| prev.seqno)
                .wrapping_add(1);
            fetched.stale = false;
            if let Some(level) = fetched.flight_level() {
                fetched.altitude = level;
            }
            info!(
                "OFP {} {}-{} published, seqno {}",
                fetched.callsign(),
                fetched.origin,
                fetched.destination,
                fetched.seqno
            );

            let record = Arc::new(fetched);
            self.ofp = Some(Arc::clone(&record));
            return record;
        }

        info!("OFP download failed: {}", fetched.status);
        if let Some(prev) = self.ofp.as_mut() {
            let current = Arc::make_mut(prev);
            current.status = fetched.status;
            current.stale = true;
            return Arc::clone(prev);
        }

        let record = Arc::new(OfpInfo {
            seqno: 0,
            stale: true,
            ..OfpInfo::with_status(fetched.status)
        });
        self.ofp = Some(Arc::clone(&record));
        record
    }

    /// Merges a freshly downloaded CDM record.
    ///
    /// Returns `true` when the content changed and was published with the
    /// next sequence number.
    pub(crate) fn publish_cdm(&mut self, mut fetched: CdmInfo) -> bool {
        let prev_seqno = match &self.cdm {
            Some(prev) if prev.same_content(&fetched) => {
                debug!("CDM data unchanged, seqno stays {}", prev.seqno);
                return false;
            }
            Some(prev) => prev.seqno,
            None => 0,
        };

        fetched.seqno = prev_seqno.wrapping_add(1);
        info!(
            "CDM {} TOBT {} TSAT {} RWY {} SID {} published, seqno {}",
            fetched.status, fetched.tobt, fetched.tsat, fetched.runway, fetched.sid, fetched.seqno
        );
        self.cdm = Some(Arc::new(fetched));
        true
    }
}
