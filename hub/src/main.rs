//! Hub entry point

use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use cache::{CacheEngine, CannedGenerator, ModelRouter, ResponseService, seed_default_prewarm};
use hub::{Hub, RealPeerRegistry};
use shared::CacheConfig;
use shared::logging::{Component, init_tracing, log_error, log_shutdown, log_startup, log_success};

#[derive(Parser, Debug)]
#[command(name = "hub")]
#[command(about = "AppConnect relay and response cache")]
struct Args {
    /// Port for WebSocket and HTTP connections
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Simulated generation latency on cache misses
    #[arg(long, default_value = "800")]
    generator_latency_ms: u64,

    /// Start with an empty prewarm registry
    #[arg(long)]
    no_prewarm: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(Component::Hub, args.log_level.as_deref());

    let address = SocketAddr::from(([0, 0, 0, 0], args.port));
    log_startup(Component::Hub, &format!("port {}", args.port));

    let engine = Arc::new(CacheEngine::new(CacheConfig::default()));
    if !args.no_prewarm {
        let seeded = seed_default_prewarm(&engine);
        log_success(Component::Hub, &format!("Prewarmed {seeded} responses"));
    }

    let generator = Arc::new(CannedGenerator::new(Duration::from_millis(args.generator_latency_ms)));
    let responses = ResponseService::new(engine, Arc::new(ModelRouter::default()), generator);
    let hub = Hub::new(Arc::new(RealPeerRegistry::new()), responses);

    if let Err(e) = hub.run(address).await {
        log_error(Component::Hub, "Hub stopped", &e);
        return Err(e).context("running hub");
    }

    log_shutdown(Component::Hub, "shutdown signal");
    Ok(())
}
