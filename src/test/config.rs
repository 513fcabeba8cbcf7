use std::net::Ipv4Addr;

use crate::error::ScenarioError;
use crate::net::DataRate;
use crate::scenario::ScenarioConfig;
use crate::sim::SimTime;
use crate::topo::NodeRef;
use crate::topo::two_tier::{AGGREGATION, BOT, CORE};

#[test]
fn default_config_is_the_two_tier_experiment() {
    let cfg = ScenarioConfig::default();
    let counts: Vec<(&str, usize)> = cfg.tiers.iter().map(|t| (t.name.as_str(), t.count)).collect();
    assert_eq!(counts, vec![(CORE, 2), (AGGREGATION, 6), (BOT, 100), ("extra", 4)]);
    assert_eq!(cfg.addressing.base, Ipv4Addr::new(10, 1, 1, 0));
    assert_eq!(cfg.addressing.prefix_len, 24);
    assert_eq!(cfg.traffic.victim, NodeRef::new(AGGREGATION, 3));
    assert_eq!(cfg.traffic.attack.rate, DataRate::from_mbps(1));
    assert_eq!(cfg.traffic.legit.max_bytes, 100_000);
    assert_eq!(cfg.horizon(), SimTime::from_secs(10));
    assert_eq!(cfg.queue_bytes(), None);
    assert!(cfg.validate().is_ok());
}

#[test]
fn partial_json_fills_in_defaults() {
    let cfg = ScenarioConfig::from_json_str(
        r#"{
            "horizon_ms": 2000,
            "queue_pkts": 50,
            "traffic": { "attack": { "rate": "2Mb/s" }, "legit": { "max_bytes": 4096 } }
        }"#,
    )
    .expect("parse");
    assert_eq!(cfg.horizon(), SimTime::from_secs(2));
    assert_eq!(cfg.queue_bytes(), Some(50 * 1_500));
    assert_eq!(cfg.traffic.attack.rate, DataRate::from_mbps(2));
    assert_eq!(cfg.traffic.attack.port, 9001);
    assert_eq!(cfg.traffic.legit.max_bytes, 4_096);
    assert_eq!(cfg.traffic.legit.port, 9000);
    assert_eq!(cfg.tiers, ScenarioConfig::default().tiers);
}

#[test]
fn custom_tier_table_from_json() {
    let cfg = ScenarioConfig::from_json_str(
        r#"{
            "tiers": [
                { "name": "spine", "count": 1, "link": { "rate": "1Gbps", "delay_us": 10 },
                  "wiring": { "rule": "isolated" } },
                { "name": "leaf", "count": 3, "link": { "rate": "100Mbps", "delay_us": 50 },
                  "wiring": { "rule": "star", "hub_tier": "spine", "hub_index": 0 } }
            ],
            "traffic": {
                "victim": { "tier": "leaf", "index": 0 },
                "attack": { "tier": "leaf" },
                "legit": { "source": { "tier": "spine", "index": 0 } }
            }
        }"#,
    )
    .expect("parse");
    assert_eq!(cfg.tiers.len(), 2);
    assert_eq!(cfg.tiers[0].link.rate, DataRate(1_000_000_000));
    // victim 也在攻击层里
    let err = crate::scenario::Scenario::build(&cfg).err().expect("victim is an attacker");
    assert!(matches!(err, ScenarioError::SourceIsVictim(_)));
}

#[test]
fn malformed_config_is_a_json_error() {
    for raw in [
        r#"{ "traffic": { "attack": { "rate": "very fast" } } }"#,
        r#"{ "horizon_ms": -1 }"#,
        r#"{ "tiers": [ { "name": "x" } ] }"#,
        "not json",
    ] {
        let err = ScenarioConfig::from_json_str(raw).expect_err(raw);
        assert!(matches!(err, ScenarioError::Json(_)), "{raw}: {err}");
    }
}

#[test]
fn missing_config_file_is_an_io_error() {
    let err = ScenarioConfig::from_path("/definitely/not/here.json").expect_err("missing");
    assert!(matches!(err, ScenarioError::Io(_)));
}

#[test]
fn validate_rejects_non_positive_settings() {
    let mut cfg = ScenarioConfig::default();
    cfg.queue_pkts = Some(0);
    assert!(matches!(cfg.validate(), Err(ScenarioError::NonPositive("queue_pkts"))));

    let mut cfg = ScenarioConfig::default();
    cfg.traffic.legit.send_bytes = 0;
    assert!(matches!(cfg.validate(), Err(ScenarioError::NonPositive("legit.send_bytes"))));
}

#[test]
fn tier_counts_can_be_overridden() {
    let mut cfg = ScenarioConfig::default();
    assert!(cfg.set_tier_count(BOT, 7));
    assert!(!cfg.set_tier_count("satellite", 1));
    assert_eq!(cfg.tiers.iter().find(|t| t.name == BOT).map(|t| t.count), Some(7));
}

#[test]
fn attack_must_run_for_the_whole_horizon() {
    let mut cfg = ScenarioConfig::default();
    cfg.horizon_ms = 100;
    cfg.traffic.attack.on_time_ms = 10;
    cfg.traffic.attack.off_time_ms = 5;
    assert!(matches!(
        cfg.validate(),
        Err(ScenarioError::AttackNotContinuous {
            on_time_ms: 10,
            off_time_ms: 5,
            horizon_ms: 100
        })
    ));
    assert!(crate::scenario::Scenario::build(&cfg).is_err());

    let mut cfg = ScenarioConfig::default();
    cfg.traffic.attack.off_time_ms = 1;
    assert!(matches!(cfg.validate(), Err(ScenarioError::AttackNotContinuous { .. })));

    // 默认 30 s 的"开"时长短于 60 s 的仿真
    let mut cfg = ScenarioConfig::default();
    cfg.horizon_ms = 60_000;
    assert!(matches!(cfg.validate(), Err(ScenarioError::AttackNotContinuous { .. })));
}

#[test]
fn longer_horizon_stretches_the_attack_on_time() {
    let mut cfg = ScenarioConfig::default();
    cfg.set_horizon_ms(60_000);
    assert_eq!(cfg.horizon(), SimTime::from_secs(60));
    assert_eq!(cfg.traffic.attack.on_time_ms, 60_000);
    assert!(cfg.validate().is_ok());

    cfg.set_horizon_ms(1_000);
    assert_eq!(cfg.traffic.attack.on_time_ms, 60_000);
    assert!(cfg.validate().is_ok());
}
