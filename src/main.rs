use axum::{
    Router,
    extract::Extension,
    routing::{delete, get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use shelfrank::audit::handlers::handle_audit_log;
use shelfrank::audit::sink::{AuditSink, MemoryAuditSink};
use shelfrank::broadcast::handlers::handle_subscribe;
use shelfrank::broadcast::hub::BroadcastHub;
use shelfrank::catalog::generator::{TrafficGenerator, seed_catalog};
use shelfrank::catalog::handlers::{
    handle_get_item, handle_metrics, handle_record_event, handle_upsert_item,
};
use shelfrank::catalog::store::CatalogStore;
use shelfrank::ranking::cache::RankCache;
use shelfrank::ranking::handlers::{handle_item_rank, handle_rankings, handle_simulate_price};
use shelfrank::rules::handlers::{
    handle_boost_category, handle_create_rule, handle_delete_rule, handle_list_rules,
    handle_pin_item,
};
use shelfrank::rules::store::RuleStore;
use shelfrank::scheduler::handlers::{handle_health, handle_request_recompute};
use shelfrank::scheduler::service::Scheduler;
use shelfrank::scheduler::types::SchedulerConfig;
use shelfrank::scoring::remote::RemoteScorer;
use shelfrank::scoring::weighted::WeightedScorer;
use shelfrank::scoring::Scorer;

const AUDIT_CAPACITY: usize = 1000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut bind_addr: SocketAddr = "127.0.0.1:7200".parse()?;
    let mut interval_secs: u64 = 30;
    let mut scorer_timeout_ms: u64 = 5000;
    let mut scorer_url: Option<String> = None;
    let mut seed_count: usize = 0;
    let mut demo = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                bind_addr = args[i + 1].parse()?;
                i += 2;
            }
            "--interval-secs" => {
                interval_secs = args[i + 1].parse()?;
                i += 2;
            }
            "--scorer-timeout-ms" => {
                scorer_timeout_ms = args[i + 1].parse()?;
                i += 2;
            }
            "--scorer-url" => {
                scorer_url = Some(args[i + 1].clone());
                i += 2;
            }
            "--seed" => {
                seed_count = args[i + 1].parse()?;
                i += 2;
            }
            "--demo" => {
                demo = true;
                i += 1;
            }
            "--help" => {
                eprintln!(
                    "Usage: {} [--bind <addr:port>] [--interval-secs <n>] \
                     [--scorer-timeout-ms <n>] [--scorer-url <url>] [--seed <n>] [--demo]",
                    args[0]
                );
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    tracing::info!("Starting shelfrank on {}", bind_addr);

    // 1. Stores and collaborators:
    let catalog = Arc::new(CatalogStore::new());
    let rules = Arc::new(RuleStore::new());
    let cache = Arc::new(RankCache::new());
    let hub = Arc::new(BroadcastHub::new());
    let audit = Arc::new(MemoryAuditSink::new(AUDIT_CAPACITY));
    let audit_sink: Arc<dyn AuditSink> = audit.clone();

    let scorer: Arc<dyn Scorer> = match &scorer_url {
        Some(url) => {
            tracing::info!("Using remote scorer at {}", url);
            Arc::new(RemoteScorer::new(url))
        }
        None => Arc::new(WeightedScorer::default()),
    };

    if seed_count > 0 {
        seed_catalog(&catalog, seed_count);
    }

    // 2. Scheduler (the single recompute writer):
    let scheduler = Scheduler::new(
        catalog.clone(),
        rules.clone(),
        scorer.clone(),
        cache.clone(),
        hub.clone(),
        audit_sink.clone(),
        SchedulerConfig {
            interval: Duration::from_secs(interval_secs),
            scorer_timeout: Duration::from_millis(scorer_timeout_ms),
        },
    );
    scheduler.clone().start();

    // 3. Demo traffic, only when asked for:
    if demo {
        TrafficGenerator::new(catalog.clone(), scheduler.clone(), audit_sink.clone()).start();
    }

    // 4. HTTP router:
    let app = Router::new()
        .route("/", get(handle_health))
        .route("/health", get(handle_health))
        .route("/metrics", get(handle_metrics))
        .route("/rankings", get(handle_rankings))
        .route("/rankings/:item_id", get(handle_item_rank))
        .route("/items", post(handle_upsert_item))
        .route("/items/:item_id", get(handle_get_item))
        .route("/events", post(handle_record_event))
        .route("/simulate/price", post(handle_simulate_price))
        .route("/rules", get(handle_list_rules).post(handle_create_rule))
        .route("/rules/pin", post(handle_pin_item))
        .route("/rules/boost-category", post(handle_boost_category))
        .route("/rules/:rule_id", delete(handle_delete_rule))
        .route("/recompute", post(handle_request_recompute))
        .route("/audit", get(handle_audit_log))
        .route("/ws", get(handle_subscribe))
        .layer(Extension(catalog))
        .layer(Extension(rules))
        .layer(Extension(cache))
        .layer(Extension(hub))
        .layer(Extension(audit))
        .layer(Extension(audit_sink))
        .layer(Extension(scorer))
        .layer(Extension(scheduler));

    // 5. Serve:
    tracing::info!("HTTP server listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
