//! 两层 DDoS 实验
//!
//! 100 个 bot 以恒定码率打向 aggregation3，同时 core0 向它做一次有字节预算的批量传输。

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ddos_sim_rs::error::Result;
use ddos_sim_rs::net::DataRate;
use ddos_sim_rs::scenario::{Scenario, ScenarioConfig, ScenarioReport};
use ddos_sim_rs::topo::two_tier::{AGGREGATION, BOT, CORE, EXTRA};
use ddos_sim_rs::traffic::FlowClass;

#[derive(Debug, Parser)]
#[command(name = "two_tier_ddos", about = "两层拓扑 DDoS 仿真：bot 洪泛 + 合法批量传输")]
struct Args {
    /// 场景配置（JSON）；不指定则使用默认实验
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    core: Option<usize>,
    #[arg(long)]
    aggregation: Option<usize>,
    #[arg(long)]
    bots: Option<usize>,
    #[arg(long)]
    extra: Option<usize>,
    /// 每个 bot 的攻击码率，如 1Mbps、500kb/s
    #[arg(long)]
    ddos_rate: Option<DataRate>,
    /// 合法流的字节预算
    #[arg(long)]
    max_bulk_bytes: Option<u64>,
    /// 仿真时长（秒）
    #[arg(long)]
    horizon_s: Option<f64>,
    /// 出口队列容量（包）；默认不限
    #[arg(long)]
    queue_pkts: Option<u64>,
    /// 把完整报告写成 JSON
    #[arg(long)]
    report_json: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<ScenarioConfig> {
    let mut cfg = match &args.config {
        Some(path) => ScenarioConfig::from_path(path)?,
        None => ScenarioConfig::default(),
    };
    for (tier, count) in [
        (CORE, args.core),
        (AGGREGATION, args.aggregation),
        (BOT, args.bots),
        (EXTRA, args.extra),
    ] {
        if let Some(count) = count {
            if !cfg.set_tier_count(tier, count) {
                tracing::warn!(tier, "配置中没有这个层级，忽略节点数覆盖");
            }
        }
    }
    if let Some(rate) = args.ddos_rate {
        cfg.traffic.attack.rate = rate;
    }
    if let Some(bytes) = args.max_bulk_bytes {
        cfg.traffic.legit.max_bytes = bytes;
    }
    if let Some(secs) = args.horizon_s {
        cfg.set_horizon_ms((secs.max(0.0) * 1000.0).round() as u64);
    }
    if args.queue_pkts.is_some() {
        cfg.queue_pkts = args.queue_pkts;
    }
    Ok(cfg)
}

fn print_summary(report: &ScenarioReport) {
    println!("horizon={} events={}", report.horizon, report.events);
    for t in &report.tiers {
        println!("tier {} nodes={} links={}", t.name, t.nodes, t.links);
    }
    println!("address_blocks={}", report.blocks.len());

    let attack = report.stats_of(FlowClass::Attack).count();
    let (attack_tx, attack_rx) = report.totals(FlowClass::Attack);
    println!("attack flows={attack} tx_bytes={attack_tx} rx_bytes={attack_rx}");

    if let Some(legit) = report.legit() {
        println!(
            "legit tx_bytes={} rx_bytes={} lost_pkts={} stop={} throughput_bps={:.0}",
            legit.tx_bytes,
            legit.rx_bytes,
            legit.lost_packets,
            legit.stop,
            legit.rx_throughput_bps()
        );
    }
    println!(
        "sink accepted_bytes={} distinct_sources={}",
        report.sink.accepted_bytes, report.sink.distinct_sources
    );
    if let Some(link) = report.busiest_link() {
        println!(
            "busiest link={} profile={} utilization={:.3} dropped_pkts={}",
            link.link.0,
            link.profile,
            link.peak_utilization(),
            link.dropped_pkts()
        );
    }
}

fn run(args: &Args) -> Result<()> {
    let cfg = load_config(args)?;
    let report = Scenario::build(&cfg)?.run();
    print_summary(&report);

    if let Some(path) = &args.report_json {
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        eprintln!("wrote report to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("two_tier_ddos: {e}");
            ExitCode::FAILURE
        }
    }
}
