use crate::net::{DataRate, ParseDataRateError};
use crate::sim::SimTime;

#[test]
fn parses_common_rate_notations() {
    let cases = [
        ("100Mbps", 100_000_000),
        ("1Mb/s", 1_000_000),
        ("10kbps", 10_000),
        ("10Kbps", 10_000),
        ("1Gb/s", 1_000_000_000),
        ("2.5Mbps", 2_500_000),
        ("500B/s", 4_000),
        ("1MBps", 8_000_000),
        ("64000", 64_000),
        (" 50Mbps ", 50_000_000),
    ];
    for (raw, bps) in cases {
        let r: DataRate = raw.parse().unwrap_or_else(|e| panic!("{raw}: {e}"));
        assert_eq!(r.bps(), bps, "{raw}");
    }
}

#[test]
fn rejects_malformed_rates() {
    for raw in ["", "fast", "10Xbps", "Mbps", "1.2.3Mbps"] {
        let err = raw.parse::<DataRate>().expect_err(raw);
        assert_eq!(err, ParseDataRateError(raw.to_string()));
    }
}

#[test]
fn display_uses_largest_exact_unit() {
    assert_eq!(DataRate::from_mbps(100).to_string(), "100Mbps");
    assert_eq!(DataRate(1_000_000_000).to_string(), "1Gbps");
    assert_eq!(DataRate(10_000).to_string(), "10kbps");
    assert_eq!(DataRate(1_500).to_string(), "1500bps");
}

#[test]
fn serde_uses_string_form() {
    let json = serde_json::to_string(&DataRate::from_mbps(10)).expect("serialize");
    assert_eq!(json, "\"10Mbps\"");
    let back: DataRate = serde_json::from_str("\"1Mb/s\"").expect("deserialize");
    assert_eq!(back, DataRate::from_mbps(1));
    assert!(serde_json::from_str::<DataRate>("\"lots\"").is_err());
}

#[test]
fn tx_time_rounds_up_to_whole_nanoseconds() {
    // 512 B @ 1 Mb/s = 4.096 ms
    assert_eq!(DataRate::from_mbps(1).tx_time(512), SimTime(4_096_000));
    // 542 B @ 10 Mb/s = 433.6 us
    assert_eq!(DataRate::from_mbps(10).tx_time(542), SimTime(433_600));
    // 1 B @ 3 b/s = 2.666.. s -> ceil
    assert_eq!(DataRate(3).tx_time(1), SimTime(2_666_666_667));
    assert_eq!(DataRate::from_mbps(1).tx_time(0), SimTime::ZERO);
}
