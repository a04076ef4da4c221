use std::time::Duration;

use super::*;
use crate::testing::ScriptedFetcher;

const TIMEOUT: Duration = Duration::from_secs(1);

const RPUIG_ROSTER: &str = "https://rpuig.example.net/CDM_feeds.json";
const VACDM_ROSTER: &str = "https://vacdm.example.net/api/v1/airports";

fn entry(name: &str, protocol: &str, url: &str, enabled: bool) -> ServerEntry {
    ServerEntry {
        name: name.to_string(),
        protocol: protocol.to_string(),
        url: url.to_string(),
        enabled,
    }
}

fn two_servers() -> ServerDirectory {
    ServerDirectory::init(vec![
        entry("Server1", "rpuig", "https://rpuig.example.net", true),
        entry("Server2", "vacdm_v1", "https://vacdm.example.net/", true),
    ])
    .unwrap()
}

fn healthy_fetcher() -> ScriptedFetcher {
    ScriptedFetcher::new()
        .with_body(
            RPUIG_ROSTER,
            r#"{"airports": {"LEBL": ["https://rpuig.example.net/LEBL.json"],
                             "EDDF": ["https://rpuig.example.net/EDDF.json"]}}"#,
        )
        .with_body(VACDM_ROSTER, r#"[{"icao": "EDDF"}, {"icao": "EDDM"}]"#)
}

#[test]
fn test_init_skips_disabled() {
    let dir = ServerDirectory::init(vec![
        entry("a", "rpuig", "https://a.example.net", false),
        entry("b", "vacdm_v1", "https://b.example.net", true),
    ])
    .unwrap();
    assert_eq!(dir.servers().len(), 1);
    assert_eq!(dir.servers()[0].name(), "b");
    assert_eq!(dir.servers()[0].retries_left(), MAX_RETRIES);
    assert_eq!(dir.servers()[0].airport_count(), None);
}

#[test]
fn test_init_rejects_unknown_protocol() {
    let err = ServerDirectory::init(vec![
        entry("a", "rpuig", "https://a.example.net", true),
        entry("b", "cdm_v9", "https://b.example.net", true),
    ])
    .unwrap_err();
    match err {
        HubError::Configuration { message } => assert!(message.contains("cdm_v9")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_init_ignores_protocol_of_disabled_entry() {
    let dir = ServerDirectory::init(vec![entry("old", "cdm_v9", "https://x", false)]).unwrap();
    assert!(dir.servers().is_empty());
}

#[test]
fn test_trailing_slash_is_trimmed() {
    let dir = two_servers();
    assert_eq!(dir.servers()[1].url(), "https://vacdm.example.net");
}

#[test]
fn test_first_server_in_order_wins() {
    let mut dir = two_servers();
    let fetcher = healthy_fetcher();

    let location = dir.resolve("EDDF", &fetcher, TIMEOUT).unwrap();
    assert_eq!(location.protocol, CdmProtocol::Rpuig);
    assert_eq!(location.url, "https://rpuig.example.net/EDDF.json");
    // Server2's roster was never needed.
    assert_eq!(fetcher.calls(VACDM_ROSTER), 0);
}

#[test]
fn test_falls_through_to_second_server() {
    let mut dir = two_servers();
    let fetcher = healthy_fetcher();

    let location = dir.resolve("EDDM", &fetcher, TIMEOUT).unwrap();
    assert_eq!(location.protocol, CdmProtocol::VacdmV1);
    assert_eq!(location.url, "https://vacdm.example.net");
    assert_eq!(dir.servers()[0].airport_count(), Some(2));
    assert_eq!(dir.servers()[1].airport_count(), Some(2));
}

#[test]
fn test_memo_avoids_refetch() {
    let mut dir = two_servers();
    let fetcher = healthy_fetcher();

    dir.resolve("EDDM", &fetcher, TIMEOUT).unwrap();
    dir.resolve("EDDM", &fetcher, TIMEOUT).unwrap();
    assert_eq!(fetcher.calls(RPUIG_ROSTER), 1);
    assert_eq!(fetcher.calls(VACDM_ROSTER), 1);
}

#[test]
fn test_rosters_load_once_across_codes() {
    let mut dir = two_servers();
    let fetcher = healthy_fetcher();

    dir.resolve("EDDM", &fetcher, TIMEOUT).unwrap();
    dir.resolve("LEBL", &fetcher, TIMEOUT).unwrap();
    dir.resolve("EDDM", &fetcher, TIMEOUT).unwrap();
    assert_eq!(fetcher.total_calls(), 2);
}

#[test]
fn test_complete_miss_is_memoised() {
    let mut dir = two_servers();
    let fetcher = healthy_fetcher();

    for _ in 0..2 {
        let err = dir.resolve("KJFK", &fetcher, TIMEOUT).unwrap_err();
        assert!(matches!(err, HubError::NotFound { icao } if icao == "KJFK"));
    }
    assert_eq!(fetcher.total_calls(), 2);
    assert_eq!(dir.memo, Some(("KJFK".to_string(), None)));
}

#[test]
fn test_different_code_evicts_memo() {
    let mut dir = two_servers();
    let fetcher = healthy_fetcher();

    dir.resolve("LEBL", &fetcher, TIMEOUT).unwrap();
    dir.resolve("EDDM", &fetcher, TIMEOUT).unwrap();
    assert_eq!(dir.memo.as_ref().map(|(code, _)| code.as_str()), Some("EDDM"));
}

#[test]
fn test_server_dies_after_max_retries() {
    let mut dir = ServerDirectory::init(vec![entry(
        "flaky",
        "rpuig",
        "https://rpuig.example.net",
        true,
    )])
    .unwrap();
    let fetcher = ScriptedFetcher::new().with_failure(RPUIG_ROSTER);

    for _ in 0..5 {
        assert!(dir.resolve("LEBL", &fetcher, TIMEOUT).is_err());
    }
    assert!(dir.servers()[0].is_dead());
    assert_eq!(fetcher.calls(RPUIG_ROSTER), MAX_RETRIES as usize);
}

#[test]
fn test_failed_roster_does_not_pin_miss() {
    let mut dir = ServerDirectory::init(vec![entry(
        "late",
        "rpuig",
        "https://rpuig.example.net",
        true,
    )])
    .unwrap();
    let fetcher = ScriptedFetcher::new().with_failure(RPUIG_ROSTER);

    assert!(dir.resolve("LEBL", &fetcher, TIMEOUT).is_err());
    assert_eq!(dir.memo, None);

    fetcher.set_body(
        RPUIG_ROSTER,
        r#"{"airports": {"LEBL": ["https://rpuig.example.net/LEBL.json"]}}"#,
    );
    let location = dir.resolve("LEBL", &fetcher, TIMEOUT).unwrap();
    assert_eq!(location.url, "https://rpuig.example.net/LEBL.json");
    assert_eq!(dir.servers()[0].retries_left(), MAX_RETRIES - 1);
}

#[test]
fn test_invalid_roster_costs_a_retry() {
    let mut dir = two_servers();
    let fetcher = healthy_fetcher().with_body(RPUIG_ROSTER, "<html>maintenance</html>");

    let location = dir.resolve("EDDM", &fetcher, TIMEOUT).unwrap();
    assert_eq!(location.protocol, CdmProtocol::VacdmV1);
    assert_eq!(dir.servers()[0].retries_left(), MAX_RETRIES - 1);
    assert_eq!(dir.servers()[0].airport_count(), None);
}

#[test]
fn test_failing_first_server_healthy_second() {
    let mut dir = two_servers();
    let fetcher = ScriptedFetcher::new()
        .with_failure(RPUIG_ROSTER)
        .with_body(VACDM_ROSTER, r#"[{"icao": "EDDM"}]"#);

    let location = dir.resolve("EDDM", &fetcher, TIMEOUT).unwrap();
    assert_eq!(location.url, "https://vacdm.example.net");
    assert_eq!(location.data_url("DLH4AB"), "https://vacdm.example.net/api/v1/pilots/DLH4AB");
}

#[test]
fn test_empty_directory_resolves_nothing() {
    let mut dir = ServerDirectory::init(Vec::new()).unwrap();
    let fetcher = ScriptedFetcher::new();
    assert!(matches!(
        dir.resolve("EDDF", &fetcher, TIMEOUT),
        Err(HubError::NotFound { .. })
    ));
    assert_eq!(fetcher.total_calls(), 0);
}
