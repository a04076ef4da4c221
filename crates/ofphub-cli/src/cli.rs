//! Command handlers.
//!
//! The CLI plays the host: it owns the [`Hub`] and drives it with a fixed
//! tick on the main thread, the way a simulator's flight loop would.

use std::{
    thread,
    time::{Duration, Instant},
};

use anyhow::{bail, Result};
use log::debug;
use ofphub_core::{
    accessor::{CDM_SEQNO_NAME, OFP_SEQNO_NAME, OFP_STALE_NAME},
    display::OfpHeadline,
    CdmField, Hub, OfpField,
};

use crate::{
    args::{CdmArgs, WatchArgs},
    renderer::TerminalRenderer,
};

/// Interval between two polls of the hub.
pub const TICK: Duration = Duration::from_millis(100);

pub struct Cli {
    hub: Hub,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(hub: Hub, renderer: TerminalRenderer) -> Self {
        Self { hub, renderer }
    }

    fn cdm_disabled(&self) -> String {
        match self.hub.cdm_config_error() {
            Some(e) => format!("CDM is disabled: {e}"),
            None => "CDM is disabled".to_string(),
        }
    }

    /// Fetches the configured pilot's flight plan once and prints it.
    pub fn fetch_ofp(mut self) -> Result<()> {
        if !self.hub.request_ofp() {
            bail!("Pilot ID is not configured");
        }
        self.hub.shutdown(TICK);

        let Some(ofp) = self.hub.cache().ofp() else {
            bail!("OFP download produced no result");
        };
        self.renderer.render(&ofp.to_string());
        if ofp.stale {
            bail!("OFP download failed: {}", ofp.status);
        }
        Ok(())
    }

    /// Fetches CDM data for one flight and prints it.
    pub fn fetch_cdm(mut self, args: &CdmArgs) -> Result<()> {
        if !self.hub.request_cdm(&args.airport, &args.callsign) {
            bail!("{}", self.cdm_disabled());
        }
        self.hub.shutdown(TICK);

        match self.hub.cache().cdm() {
            Some(cdm) => self.renderer.render(&cdm.to_string()),
            None => bail!("CDM download produced no result"),
        }
        Ok(())
    }

    /// Re-requests every `interval` and prints whenever a sequence number
    /// moves.
    pub fn watch(mut self, args: &WatchArgs) -> Result<()> {
        let cdm_target = args.airport.as_deref().zip(args.callsign.as_deref());
        if self.hub.pilot_id().is_none() && cdm_target.is_none() {
            bail!("Nothing to watch, give --pilot-id or --airport with --callsign");
        }

        let interval = Duration::from_secs(args.interval);
        let mut ofp_seen = (0, false);
        let mut cdm_seen = 0;

        for cycle in 1..=args.cycles {
            debug!("Watch cycle {cycle} of {}", args.cycles);
            if self.hub.pilot_id().is_some() {
                self.hub.request_ofp();
            }
            if let Some((airport, callsign)) = cdm_target {
                self.hub.request_cdm(airport, callsign);
            }

            let next = Instant::now() + interval;
            loop {
                self.hub.poll();
                self.report(&mut ofp_seen, &mut cdm_seen);

                let last_cycle_done = cycle == args.cycles && !self.hub.is_busy();
                if last_cycle_done || Instant::now() >= next {
                    break;
                }
                thread::sleep(TICK);
            }
        }

        self.hub.shutdown(TICK);
        self.report(&mut ofp_seen, &mut cdm_seen);
        Ok(())
    }

    fn report(&self, ofp_seen: &mut (u32, bool), cdm_seen: &mut u32) {
        let cache = self.hub.cache();

        if let Some(ofp) = cache.ofp() {
            if (ofp.seqno, ofp.stale) != *ofp_seen {
                *ofp_seen = (ofp.seqno, ofp.stale);
                println!("[OFP {}] {}", ofp.seqno, OfpHeadline(&ofp));
            }
        }

        if let Some(cdm) = cache.cdm() {
            if cdm.seqno != *cdm_seen {
                *cdm_seen = cdm.seqno;
                self.renderer.render(&format!("[CDM {}] {cdm}", cdm.seqno));
            }
        }
    }

    /// Lists the CDM servers in resolution order.
    pub fn list_servers(&self) {
        if !self.hub.cdm_enabled() {
            println!("{}.", self.cdm_disabled());
            return;
        }

        let servers = self.hub.servers();
        if servers.is_empty() {
            println!("No CDM servers configured.");
            return;
        }
        for server in &servers {
            println!("- {} ({}) {}", server.name(), server.protocol(), server.url());
        }
    }
}

/// Prints every exported field name.
pub fn list_fields() {
    for field in OfpField::ALL {
        println!("{field}");
    }
    println!("{OFP_SEQNO_NAME}");
    println!("{OFP_STALE_NAME}");
    for field in CdmField::ALL {
        println!("{field}");
    }
    println!("{CDM_SEQNO_NAME}");
}
