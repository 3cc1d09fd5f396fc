//! Leaf-spine 负载均衡仿真
//!
//! 构建 leaf-spine 拓扑，在 DRILL 或 ECMP 下运行 flow 并打印汇总。
//! 命令行参数覆盖场景文件中的字段。

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use drill_sim::drill::DrillConfig;
use drill_sim::net::LoadBalancer;
use drill_sim::scenario::ScenarioSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BalancerArg {
    Drill,
    Ecmp,
}

#[derive(Debug, Parser)]
#[command(name = "leaf_spine_drill", about = "Leaf-spine 拓扑仿真：DRILL 逐包负载均衡")]
struct Args {
    /// 场景 JSON 文件；下面的参数会覆盖其中的字段
    #[arg(long)]
    scenario: Option<PathBuf>,
    #[arg(long)]
    leaves: Option<usize>,
    #[arg(long)]
    spines: Option<usize>,
    #[arg(long)]
    hosts_per_leaf: Option<usize>,
    #[arg(long, value_enum)]
    balancer: Option<BalancerArg>,
    /// DRILL 每次决策的随机抽样数
    #[arg(long)]
    d: Option<usize>,
    /// DRILL 记住的下一跳个数
    #[arg(long)]
    memory: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    /// 出口队列容量（包数）
    #[arg(long)]
    queue_pkts: Option<usize>,
    #[arg(long)]
    link_mbps: Option<u64>,
    /// 链路单向传播时延（微秒）
    #[arg(long)]
    link_latency_us: Option<u64>,
    /// 自动生成的每条 flow 的包数
    #[arg(long)]
    pkts: Option<u64>,
    /// 自动生成 flow 的发包间隔（微秒）
    #[arg(long)]
    gap_us: Option<u64>,
    #[arg(long)]
    until_ms: Option<u64>,
    /// 把运行报告以 JSON 写到该路径
    #[arg(long)]
    report_json: Option<PathBuf>,
}

impl Args {
    fn apply(&self, spec: &mut ScenarioSpec) {
        let t = &mut spec.topology;
        if let Some(v) = self.leaves {
            t.leaves = v;
        }
        if let Some(v) = self.spines {
            t.spines = v;
        }
        if let Some(v) = self.hosts_per_leaf {
            t.hosts_per_leaf = v;
        }
        if let Some(v) = self.queue_pkts {
            t.queue_pkts = v;
        }
        if let Some(v) = self.link_mbps {
            t.link_bps = v.saturating_mul(1_000_000);
        }
        if let Some(v) = self.link_latency_us {
            t.link_latency_us = v;
        }

        let mut drill = match spec.balancer {
            LoadBalancer::Drill(cfg) => cfg,
            LoadBalancer::Ecmp => DrillConfig::default(),
        };
        if let Some(d) = self.d {
            drill.d = d;
        }
        if let Some(m) = self.memory {
            drill.memory = m;
        }
        spec.balancer = match (self.balancer, spec.balancer) {
            (Some(BalancerArg::Ecmp), _) | (None, LoadBalancer::Ecmp) => LoadBalancer::Ecmp,
            (Some(BalancerArg::Drill), _) | (None, LoadBalancer::Drill(_)) => {
                LoadBalancer::Drill(drill)
            }
        };

        if let Some(v) = self.seed {
            spec.seed = v;
        }
        if let Some(v) = self.pkts {
            spec.traffic.pkts = v;
        }
        if let Some(v) = self.gap_us {
            spec.traffic.gap_us = v;
        }
        if let Some(v) = self.until_ms {
            spec.until_ms = v;
        }
    }
}

fn main() -> ExitCode {
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

    let mut spec = match &args.scenario {
        Some(path) => match ScenarioSpec::from_path(path) {
            Ok(spec) => spec,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => ScenarioSpec::default(),
    };
    args.apply(&mut spec);

    let report = match spec.run() {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!(
        "done @ {:?}, balancer={}, delivered_pkts={}, dropped_pkts={}, unroutable_pkts={}, max_queue_len={}, max_queue_bytes={}, mean_delay_us={:.1}",
        report.sim_time_ns,
        report.balancer.name(),
        report.stats.delivered_pkts,
        report.stats.dropped_pkts,
        report.stats.unroutable_pkts,
        report.stats.max_queue_len,
        report.stats.max_queue_bytes,
        report.mean_delay_us,
    );
    for up in &report.uplinks {
        println!("uplink {} -> {}: tx_pkts={}", up.leaf, up.spine, up.tx_pkts);
    }

    if let Some(path) = &args.report_json {
        let json = match serde_json::to_string_pretty(&report) {
            Ok(json) => json,
            Err(err) => {
                eprintln!("error: failed to serialize report: {err}");
                return ExitCode::FAILURE;
            }
        };
        if let Err(err) = fs::write(path, json) {
            eprintln!("error: failed to write {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
