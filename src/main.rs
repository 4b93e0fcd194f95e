//! hash-router CLI
//!
//! Loads a route table file and exercises the router against an in-memory
//! navigator: list the table, resolve a fragment, build a URL, or replay a
//! sequence of navigations through the popstate loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use hash_router::config::{load_config, RouterConfig};
use hash_router::observability::logging;
use hash_router::routing::fragment;
use hash_router::{ActiveRoute, MemoryNavigator, Navigator, RouteParams, RouteTable, Router, Shutdown};

#[derive(Parser)]
#[command(name = "hash-router")]
#[command(about = "Inspect and exercise a hash route table", long_about = None)]
struct Cli {
    /// Route table file (TOML).
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the route table in match order
    Routes,
    /// Resolve a fragment such as "#/users/42?tab=profile"
    Resolve { fragment: String },
    /// Build the URL of a named route
    Url {
        name: String,
        /// Params as key=value
        params: Vec<String>,
    },
    /// Navigate through fragments in order and print every route change
    Replay {
        fragments: Vec<String>,
        /// How long to wait for each navigation to settle, in milliseconds
        #[arg(long, default_value_t = 200)]
        settle_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    logging::init(&config.observability)?;
    tracing::debug!(path = %cli.config.display(), routes = config.routes.len(), "Configuration loaded");

    match cli.command {
        Commands::Routes => {
            let table = RouteTable::from_config(&config.routes)?;
            let routes: Vec<Value> = table
                .iter()
                .map(|route| {
                    json!({
                        "name": route.name(),
                        "path": route.path(),
                        "screen": route.screen(),
                        "params": route.params(),
                    })
                })
                .collect();
            print_json(&Value::Array(routes))?;
        }
        Commands::Resolve { fragment } => {
            let (router, navigator) = build_router(&config, &fragment)?;
            let resolution = router.resolve().await;
            print_json(&json!({
                "resolution": resolution,
                "current": describe(&router.current()),
                "href": navigator.href(),
            }))?;
        }
        Commands::Url { name, params } => {
            let table = RouteTable::from_config(&config.routes)?;
            let params = parse_params(&params)?;
            println!("{}", table.url(&name, &params)?);
        }
        Commands::Replay { fragments, settle_ms } => {
            replay(&config, fragments, Duration::from_millis(settle_ms)).await?;
        }
    }

    Ok(())
}

fn build_router(
    config: &RouterConfig,
    hash: &str,
) -> Result<(Arc<Router>, Arc<MemoryNavigator>), Box<dyn std::error::Error>> {
    let navigator = Arc::new(MemoryNavigator::new(&config.base_url)?);
    if hash.starts_with('#') {
        navigator.replace(hash)?;
    } else if !hash.is_empty() {
        navigator.replace(&fragment::to_fragment(hash))?;
    }
    let table = RouteTable::from_config(&config.routes)?;
    let router = Router::with_settings(table, navigator.clone(), &config.router)?;
    Ok((Arc::new(router), navigator))
}

async fn replay(
    config: &RouterConfig,
    fragments: Vec<String>,
    settle: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let (router, navigator) = build_router(config, "")?;

    router.on_route_changed(|new, old| async move {
        let line = json!({ "from": describe(&old), "to": describe(&new) });
        println!("{line}");
    });

    let shutdown = Shutdown::new();
    let mut watcher = router.subscribe();
    let task = tokio::spawn(router.clone().run(shutdown.subscribe()));
    let _ = tokio::time::timeout(settle, watcher.changed()).await;

    for target in fragments {
        tracing::info!(to = %target, "Replaying navigation");
        if let Ok(steps) = target.parse::<i32>() {
            router.go_by(steps);
        } else {
            router.go(&target, false)?;
        }
        let _ = tokio::time::timeout(settle, watcher.changed()).await;
    }

    shutdown.trigger();
    task.await?;
    tracing::info!(href = %navigator.href(), "Replay complete");
    Ok(())
}

fn describe(active: &ActiveRoute) -> Value {
    json!({
        "screen": active.screen(),
        "name": active.name(),
        "params": active.params,
    })
}

fn parse_params(pairs: &[String]) -> Result<RouteParams, String> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| format!("expected key=value, got {pair:?}"))
        })
        .collect()
}

fn print_json(value: &Value) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
