//! Lookout - fleet monitoring backend for node hosts
//!
//! Minimal interactive console around the aggregation layer: type a host
//! URL to register it, `clear` to drop everything, `show` to print the
//! current fleets and bind liveness samplers for the displayed instances.

use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lookout::{
    fleet::{Aggregator, FleetStore, HttpFleetLoader},
    hosts::HostRegistry,
    liveness::{spawn_sampler, HealthEndpointProbe, SamplerSet},
    node::{display_balance, truncate_middle, NodeApiClient},
    profile::AddressingProfile,
    Args,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("lookout={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration
    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let request_timeout = Duration::from_millis(args.request_timeout_ms);
    let sample_interval = Duration::from_millis(args.sample_interval_ms);

    // Print startup banner
    info!("======================================");
    info!("  Lookout - fleet monitoring backend");
    info!("======================================");
    info!(
        "Version: {} ({}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_COMMIT_SHORT"),
        env!("BUILD_TIMESTAMP")
    );
    info!("Request timeout: {:?}", request_timeout);
    info!("Sample interval: {:?}", sample_interval);
    info!("Initial hosts: {}", args.hosts.len());
    info!("======================================");

    // Wire the aggregation layer: registry changes trigger fleet reloads
    // that merge into the store.
    let registry = Arc::new(HostRegistry::new());
    let store = Arc::new(FleetStore::new());
    let loader = Arc::new(HttpFleetLoader::new(request_timeout));

    let aggregator = Aggregator::new(Arc::clone(&registry), Arc::clone(&store), loader);
    let _aggregation_task = aggregator.spawn();

    for host in &args.hosts {
        registry.register(host, &args.access_token).await;
    }

    // Liveness samplers live with the console: they exist only for
    // instances currently displayed and are released on clear.
    let mut samplers = SamplerSet::new();
    let probe_client = NodeApiClient::new(request_timeout);

    println!("Commands: <host-url> registers, 'show' prints fleets, 'clear' empties, 'quit' exits");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => {}
            "quit" | "exit" => break,
            "clear" => {
                samplers.clear();
                registry.clear().await;
            }
            "show" => {
                show_fleets(
                    &registry,
                    &store,
                    &probe_client,
                    sample_interval,
                    &mut samplers,
                )
                .await;
            }
            raw => {
                registry.register(raw, &args.access_token).await;
            }
        }
    }

    info!("Shutting down");
    Ok(())
}

/// Print the current fleets and (re)bind a liveness sampler for every
/// displayed instance.
async fn show_fleets(
    registry: &HostRegistry,
    store: &FleetStore,
    probe_client: &NodeApiClient,
    sample_interval: Duration,
    samplers: &mut SamplerSet,
) {
    let hosts = registry.list().await;
    if hosts.is_empty() {
        println!("(no hosts registered)");
        return;
    }

    for host in hosts {
        let fleet = match store.get(&host.identifier) {
            Some(fleet) => fleet,
            None => {
                println!("{}: not yet loaded", host.identifier);
                continue;
            }
        };

        println!("{} [{}]", host.identifier, host.environment);

        let profile = AddressingProfile::classify(&host.environment);
        let plan = profile.resolve(&host.url, &host.access_token);

        for snapshot in &fleet {
            let hopr = display_balance(&snapshot.balance.hopr).unwrap_or(0.0);
            let native = display_balance(&snapshot.balance.native).unwrap_or(0.0);

            let liveness = match samplers.get(&host.identifier, snapshot.instance_index) {
                Some(handle) => match handle.window().lock().await.latest() {
                    Some(sample) => format!("{:.1}", sample),
                    None => "-".to_string(),
                },
                None => "-".to_string(),
            };

            println!(
                "  #{} {} | {} | {} HOPR, {} native | v{} | liveness {}",
                snapshot.instance_index + 1,
                truncate_middle(&snapshot.identity.hopr_address, 10),
                truncate_middle(&snapshot.identity.native_address, 10),
                hopr,
                native,
                snapshot.version,
                liveness,
            );

            // Bind a sampler for each displayed instance; rebinding replaces
            // (and aborts) any previous timer for the same slot.
            if samplers.get(&host.identifier, snapshot.instance_index).is_none() {
                if let Some(endpoints) = plan.instances.get(snapshot.instance_index) {
                    let probe = Arc::new(HealthEndpointProbe::new(
                        probe_client.clone(),
                        endpoints.health.clone(),
                    ));
                    samplers.bind(
                        &host.identifier,
                        snapshot.instance_index,
                        spawn_sampler(Some(probe), sample_interval),
                    );
                }
            }
        }
    }
}
