use crate::error::ScenarioError;
use crate::net::{DataRate, Network, NodeId};
use crate::sim::SimTime;
use crate::topo::two_tier::{AGGREGATION, BOT, CORE, EXTRA, TwoTierCounts, two_tier_tiers};
use crate::topo::{LinkProfile, NodeRef, Orientation, TierSpec, TopologyBuilder, WiringRule};

fn tier(name: &str, count: usize, wiring: WiringRule) -> TierSpec {
    TierSpec {
        name: name.into(),
        count,
        link: LinkProfile::new(DataRate::from_mbps(10), 500),
        wiring,
    }
}

fn star(hub: &str, index: usize) -> WiringRule {
    WiringRule::Star {
        hub_tier: hub.into(),
        hub_index: index,
        orientation: Orientation::HubFirst,
    }
}

#[test]
fn default_two_tier_topology_has_expected_shape() {
    let tiers = two_tier_tiers(TwoTierCounts::default());
    let mut net = Network::default();
    let topo = TopologyBuilder::new(&tiers).build(&mut net).expect("build");

    assert_eq!(topo.node_count(), 112);
    assert_eq!(net.nodes().len(), 112);
    assert_eq!(topo.links.len(), 1 + 6 + 100 + 4);
    assert_eq!(net.links().len(), 111);

    let per_tier: Vec<(&str, usize, usize)> = topo
        .tiers
        .iter()
        .map(|t| (t.name.as_str(), t.nodes.len(), t.links.len()))
        .collect();
    assert_eq!(
        per_tier,
        vec![(CORE, 2, 1), (AGGREGATION, 6, 6), (BOT, 100, 100), (EXTRA, 4, 4)]
    );

    // 节点全部先于链路创建，按层级声明顺序编号
    let core1 = topo.resolve(&NodeRef::new(CORE, 1)).expect("core1");
    let agg2 = topo.resolve(&NodeRef::new(AGGREGATION, 2)).expect("agg2");
    assert_eq!(core1, NodeId(1));
    assert_eq!(agg2, NodeId(4));
    let node = net.node(agg2).expect("agg2");
    assert_eq!((node.tier(), node.index(), node.name()), (AGGREGATION, 2, "aggregation2"));
    assert_eq!(topo.resolve(&NodeRef::new(BOT, 0)), Some(NodeId(8)));
    assert_eq!(topo.resolve(&NodeRef::new(BOT, 100)), None);
    assert_eq!(topo.resolve(&NodeRef::new("nope", 0)), None);
}

#[test]
fn links_carry_their_tier_profile_and_orientation() {
    let tiers = two_tier_tiers(TwoTierCounts::default());
    let mut net = Network::default();
    let topo = TopologyBuilder::new(&tiers).build(&mut net).expect("build");
    let core = &topo.tier(CORE).expect("core").nodes;
    let agg = &topo.tier(AGGREGATION).expect("agg").nodes;

    let core_link = &net.links()[topo.tier(CORE).unwrap().links[0].0];
    assert_eq!((core_link.a, core_link.b), (core[0], core[1]));
    assert_eq!(core_link.rate, DataRate::from_mbps(100));
    assert_eq!(core_link.delay, SimTime::from_millis(1));

    for (i, id) in topo.tier(AGGREGATION).unwrap().links.iter().enumerate() {
        let l = &net.links()[id.0];
        assert_eq!((l.a, l.b), (core[1], agg[i]), "aggregation links are hub-first");
        assert_eq!(l.rate, DataRate::from_mbps(10));
        assert_eq!(l.profile, AGGREGATION);
    }

    let bots = &topo.tier(BOT).unwrap().nodes;
    for (i, id) in topo.tier(BOT).unwrap().links.iter().enumerate() {
        let l = &net.links()[id.0];
        assert_eq!((l.a, l.b), (bots[i], core[0]), "bot links are member-first");
        assert_eq!(l.rate, DataRate::from_mbps(50));
        assert_eq!(l.delay, SimTime::from_millis(2));
    }

    for id in &topo.tier(EXTRA).unwrap().links {
        let l = &net.links()[id.0];
        assert_eq!(l.a, agg[2], "extra nodes all hang off aggregation2");
        assert_eq!(l.rate, DataRate::from_mbps(10));
    }

    // core0 的链路端：先是 core 互联，然后按 bot 序号
    let core0 = net.node(core[0]).expect("core0");
    assert_eq!(core0.link_ends().len(), 101);
    assert_eq!(core0.link_ends()[0], core_link.id);
}

#[test]
fn zero_count_tiers_create_nothing() {
    let counts = TwoTierCounts {
        bots: 0,
        extra: 0,
        ..TwoTierCounts::default()
    };
    let tiers = two_tier_tiers(counts);
    let mut net = Network::default();
    let topo = TopologyBuilder::new(&tiers).build(&mut net).expect("build");

    assert_eq!(topo.node_count(), 8);
    assert_eq!(topo.links.len(), 7);
    assert!(topo.tier(BOT).expect("bot tier still listed").nodes.is_empty());
}

#[test]
fn empty_hub_tier_with_members_is_rejected() {
    let counts = TwoTierCounts {
        aggregation: 0,
        ..TwoTierCounts::default()
    };
    let tiers = two_tier_tiers(counts);
    let err = TopologyBuilder::new(&tiers).validate().expect_err("extra needs aggregation2");
    assert!(matches!(
        err,
        ScenarioError::NodeOutOfRange { ref tier, ref target, index: 2, count: 0 }
            if tier == EXTRA && target == AGGREGATION
    ));
}

#[test]
fn isolated_tier_only_adds_nodes() {
    let tiers = vec![
        tier("hub", 1, WiringRule::Isolated),
        tier("leaf", 3, star("hub", 0)),
        tier("idle", 2, WiringRule::Isolated),
    ];
    let mut net = Network::default();
    let topo = TopologyBuilder::new(&tiers).build(&mut net).expect("build");
    assert_eq!(topo.node_count(), 6);
    assert_eq!(topo.links.len(), 3);
    assert!(topo.tier("idle").unwrap().links.is_empty());
    assert_eq!(net.links()[0].delay, SimTime::from_micros(500));
}

fn build_err(tiers: Vec<TierSpec>) -> ScenarioError {
    let mut net = Network::default();
    let err = TopologyBuilder::new(&tiers)
        .build(&mut net)
        .expect_err("config error");
    assert!(net.nodes().is_empty(), "nothing is built on error: {err}");
    err
}

#[test]
fn configuration_errors_are_reported_before_building() {
    let err = build_err(vec![
        tier("a", 2, WiringRule::Isolated),
        tier("a", 1, WiringRule::Isolated),
    ]);
    assert!(matches!(err, ScenarioError::DuplicateTier(ref t) if t == "a"));

    let err = build_err(vec![tier("a", 2, star("ghost", 0))]);
    assert!(matches!(err, ScenarioError::UnknownTier { ref target, .. } if target == "ghost"));

    // 空层也不能引用不存在的层级
    let err = build_err(vec![tier("a", 0, star("ghost", 0))]);
    assert!(matches!(err, ScenarioError::UnknownTier { .. }));

    let err = build_err(vec![tier("a", 2, WiringRule::Pair { a: 1, b: 1 })]);
    assert!(matches!(err, ScenarioError::SelfLink { index: 1, .. }));

    let err = build_err(vec![tier("a", 2, WiringRule::Pair { a: 0, b: 2 })]);
    assert!(matches!(err, ScenarioError::NodeOutOfRange { index: 2, count: 2, .. }));

    let err = build_err(vec![tier("a", 2, star("a", 0))]);
    assert!(matches!(err, ScenarioError::SelfLink { .. }));

    let err = build_err(vec![
        tier("hub", 1, WiringRule::Isolated),
        tier("b", 2, star("hub", 1)),
    ]);
    assert!(matches!(err, ScenarioError::NodeOutOfRange { index: 1, count: 1, .. }));

    let err = build_err(vec![
        tier("hub", 1, WiringRule::Isolated),
        TierSpec {
            link: LinkProfile::new(DataRate(0), 0),
            ..tier("b", 1, star("hub", 0))
        },
    ]);
    assert!(matches!(err, ScenarioError::ZeroLinkRate(ref t) if t == "b"));
}

#[test]
fn tier_table_round_trips_through_json() {
    let tiers = two_tier_tiers(TwoTierCounts::default());
    let json = serde_json::to_value(&tiers).expect("serialize");
    assert_eq!(json[2]["wiring"]["rule"], "star");
    assert_eq!(json[2]["wiring"]["orientation"], "member_first");
    assert_eq!(json[0]["link"]["rate"], "100Mbps");
    let back: Vec<TierSpec> = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, tiers);
}
