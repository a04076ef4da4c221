#![allow(dead_code)]

use std::{
    io::Write,
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

pub use ofphub_core::testing::ScriptedFetcher;
use ofphub_core::{Hub, HubBuilder};
use tempfile::NamedTempFile;

pub const OFP_BASE: &str = "https://planner.example.net/api/xml.fetcher.php";

/// Known-good OFP in the service's JSON output.
pub const OFP_JSON: &str = include_str!("ofp.json");

/// Writes a server configuration with a documentation preamble.
///
/// Each server is `(name, protocol, url, enabled)`.
pub fn write_config(servers: &[(&str, &str, &str, bool)]) -> NamedTempFile {
    let entries: Vec<String> = servers
        .iter()
        .map(|(name, protocol, url, enabled)| {
            format!(
                r#"{{"name": "{name}", "protocol": "{protocol}", "url": "{url}", "enabled": {enabled}}}"#
            )
        })
        .collect();

    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    write!(
        file,
        "CDM servers for tests.\n#&*!\n{{\"servers\": [{}]}}\n",
        entries.join(", ")
    )
    .expect("Failed to write config");
    file
}

/// Builder preconfigured with the scripted fetcher and config file.
pub fn hub_builder(fetcher: Arc<ScriptedFetcher>, config: &NamedTempFile) -> HubBuilder {
    HubBuilder::new()
        .with_pilot_id(Some("123456"))
        .with_ofp_base_url(OFP_BASE)
        .with_fetcher(fetcher)
        .with_cdm_config(Some(config.path()))
        .with_default_cdm_config(Some(config.path()))
}

/// Polls until nothing is in flight, failing the test after five seconds.
pub fn drain(hub: &mut Hub) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while hub.poll() {
        assert!(Instant::now() < deadline, "downloads did not finish");
        thread::sleep(Duration::from_millis(5));
    }
}
