use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pcapgraph::capture::Source;
use pcapgraph::cli::{Cli, Command, CommonFlags};
use pcapgraph::config::GraphEndpointConfig;
use pcapgraph::graph::{Executor, InMemoryGraph};
use pcapgraph::oui::StaticOuiLookup;
use pcapgraph::pipeline::{self, PipelineConfig};
use pcapgraph::telemetry::Telemetry;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        ctrlc::set_handler(move || {
            tracing::warn!("received interrupt, finishing the current packet then stopping");
            cancel.store(true, Ordering::SeqCst);
        })?;
    }

    let (source, flags) = match cli.command {
        Command::File { path, flags } => (Source::File(path), flags),
        Command::Live { interface, flags } => (Source::Live(interface), flags),
    };

    let endpoint_config = GraphEndpointConfig::load().unwrap_or_default();
    let pipeline_config = pipeline_config_from(&flags, &endpoint_config);

    let oui = StaticOuiLookup;
    let mut executor = Executor::new(InMemoryGraph::new());

    let (telemetry, graph) = tokio::task::spawn_blocking(move || {
        let telemetry = pipeline::run(source, &oui, &mut executor, &pipeline_config, &cancel)?;
        Ok::<_, pcapgraph::PipelineError>((telemetry, executor.into_client()))
    })
    .await??;

    report(telemetry, &graph, &flags);
    Ok(())
}

fn pipeline_config_from(flags: &CommonFlags, endpoint_config: &GraphEndpointConfig) -> PipelineConfig {
    PipelineConfig {
        reduce: flags.reduce,
        no_count: flags.no_count,
        debug_at: flags.debug_at,
        cache_capacity: endpoint_config.cache_capacity,
    }
}

fn report(telemetry: Telemetry, graph: &InMemoryGraph, flags: &CommonFlags) {
    tracing::info!(
        packets = telemetry.packets_seen,
        total = ?telemetry.total,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "projection complete"
    );
    if flags.debug_time {
        println!(
            "wall: {:?}  executor: {:?}  ({:.1}% of wall time)",
            telemetry.total_elapsed,
            telemetry.executor_elapsed,
            telemetry.executor_fraction() * 100.0
        );
    }
    if flags.debug_cache {
        for (kind, stats) in &telemetry.cache_stats {
            println!(
                "{kind:?}: {} hits, {} misses, {}/{} resident",
                stats.hits, stats.misses, stats.size, stats.capacity
            );
        }
    }
}
