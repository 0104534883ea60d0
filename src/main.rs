//! login-guard - A rate-limited credential registration and authentication service
//!
//! This is the main entry point for the login-guard application.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use login_guard::auth::{AuthService, PasswordHasher};
use login_guard::config::{Config, LoggingConfig};
use login_guard::ratelimit::{BucketConfig, RateLimitGate};
use login_guard::server::{AppState, Server};
use login_guard::store::MemoryStore;

/// How often idle rate limit buckets are swept, and how long a bucket may
/// sit unused before it is evicted
const BUCKET_SWEEP_INTERVAL: Duration = Duration::from_secs(300);
const BUCKET_IDLE_TTL: Duration = Duration::from_secs(3600);

/// login-guard - A rate-limited credential registration and authentication service
#[derive(Parser, Debug)]
#[command(name = "login-guard")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "LOGIN_GUARD_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = load_config(&args)?;
    config.validate()?;

    init_tracing(&config.logging);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting login-guard"
    );

    // A misconfigured or broken hashing environment aborts here instead of
    // failing every request later
    let hasher = PasswordHasher::new(config.auth.hash_work_factor)?;
    info!(
        work_factor = config.auth.hash_work_factor,
        "Password hasher initialized"
    );

    let store = Arc::new(MemoryStore::new());
    let auth = Arc::new(AuthService::new(Arc::clone(&store), hasher)?);

    let bucket_config = BucketConfig {
        capacity: config.rate_limit.capacity,
        refill_rate: config.rate_limit.refill_rate,
        refill_period: config.rate_limit.period(),
    };
    let gate = Arc::new(RateLimitGate::new(bucket_config));
    info!(
        capacity = config.rate_limit.capacity,
        refill_rate = config.rate_limit.refill_rate,
        refill_period = config.rate_limit.refill_period,
        refill_unit = ?config.rate_limit.refill_unit,
        "Rate limit configured"
    );

    // Sweep idle buckets so the registry does not grow without bound
    let sweep_registry = Arc::clone(gate.registry());
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(BUCKET_SWEEP_INTERVAL);
        interval.tick().await; // first tick fires immediately
        loop {
            interval.tick().await;
            sweep_registry.cleanup(BUCKET_IDLE_TTL);
        }
    });

    let state = AppState { auth, gate };
    let server = Server::new(config.server.clone(), state);

    info!(
        host = %config.server.host,
        port = %config.server.port,
        "Starting HTTP server"
    );

    server.run(shutdown_signal()).await?;

    info!("login-guard shutdown complete");
    Ok(())
}

/// Load configuration from file or environment
fn load_config(args: &Args) -> anyhow::Result<Config> {
    match &args.config {
        Some(path) => {
            // Use eprintln! since tracing is not yet initialized
            eprintln!("Loading configuration from file: {}", path);
            Config::from_file(path).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
        }
        None => {
            eprintln!("Loading configuration from environment variables");
            Config::from_env().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
        }
    }
}

/// Initialize the tracing subscriber from the logging configuration
fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Create a future that resolves when a shutdown signal is received
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
