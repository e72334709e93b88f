//! Puno Routes - Axum server and command-line client

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use puno_routes::config::{RouterConfig, DEFAULT_OVERPASS_URL};
use puno_routes::landmarks::{LandmarkRegistry, DEFAULT_TOLERANCE_M};
use puno_routes::overpass::OverpassProvider;
use puno_routes::places::{puno_landmarks, DEFAULT_RADIUS_M};
use puno_routes::{api, console, RoutePlanner};

#[derive(Parser, Debug)]
#[command(author, version, about = "Shortest drivable routes between places in Puno")]
struct Cli {
    /// Address the HTTP API listens on.
    #[arg(long, env = "PUNO_ROUTES_BIND", default_value = "0.0.0.0:7860", global = true)]
    bind: SocketAddr,

    #[command(flatten)]
    options: RouterOptions,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args, Debug)]
struct RouterOptions {
    /// Road-network radius around the center, in meters.
    #[arg(long, env = "PUNO_ROUTES_RADIUS", default_value_t = DEFAULT_RADIUS_M, global = true)]
    radius: f64,

    /// How long a downloaded road network stays cached, in hours.
    #[arg(long, env = "PUNO_ROUTES_TTL_HOURS", default_value_t = 24, global = true)]
    ttl_hours: u64,

    /// Distance within which a route passes a landmark, in meters.
    #[arg(long, env = "PUNO_ROUTES_TOLERANCE", default_value_t = DEFAULT_TOLERANCE_M, global = true)]
    tolerance: f64,

    /// Overpass interpreter endpoint.
    #[arg(long, env = "PUNO_ROUTES_OVERPASS_URL", default_value = DEFAULT_OVERPASS_URL, global = true)]
    overpass_url: String,

    /// JSON file of `{"Name": [lat, lon], ...}` replacing the built-in places.
    #[arg(long, env = "PUNO_ROUTES_LANDMARKS", global = true)]
    landmarks: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default).
    Serve,
    /// Compute a route between two landmark names and print it.
    Route {
        /// Origin landmark name.
        #[arg(long = "from")]
        from: String,
        /// Destination landmark name.
        #[arg(long = "to")]
        to: String,
    },
    /// List the landmark registry.
    Landmarks,
}

impl RouterOptions {
    fn to_config(&self) -> RouterConfig {
        RouterConfig {
            radius_m: self.radius,
            cache_ttl: Duration::from_secs(self.ttl_hours * 3600),
            tolerance_m: self.tolerance,
            overpass_url: self.overpass_url.clone(),
            ..RouterConfig::default()
        }
    }

    fn load_landmarks(&self) -> Result<LandmarkRegistry> {
        match &self.landmarks {
            Some(path) => LandmarkRegistry::load(path)
                .with_context(|| format!("failed to load landmarks from {}", path.display())),
            None => Ok(puno_landmarks()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&cli.options, cli.bind).await,
        Command::Route { from, to } => route(&cli.options, &from, &to).await,
        Command::Landmarks => list_landmarks(&cli.options),
    }
}

fn build_planner(options: &RouterOptions) -> Result<RoutePlanner> {
    let config = options.to_config();
    let landmarks = options.load_landmarks()?;
    let provider =
        OverpassProvider::new(&config).context("failed to create the Overpass client")?;
    Ok(RoutePlanner::new(Arc::new(provider), landmarks, config))
}

async fn serve(options: &RouterOptions, bind: SocketAddr) -> Result<()> {
    console::print_banner();
    let planner = build_planner(options)?;
    info!(
        "Loaded {} landmarks, road network radius {} m",
        planner.landmarks().len(),
        planner.config().radius_m
    );

    let app = api::create_router(planner);
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;
    println!("Server listening on http://{}", bind);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

async fn route(options: &RouterOptions, from: &str, to: &str) -> Result<()> {
    let planner = build_planner(options)?;
    let config = planner.config();
    planner
        .resolve_trip(from, to)
        .with_context(|| format!("cannot route from {} to {}", from, to))?;

    let start = Instant::now();
    let graph = planner
        .store()
        .get_graph(config.center, config.radius_m)
        .await
        .context("failed to load the road network")?;
    console::print_graph_loaded(graph.node_count(), graph.edge_count(), start.elapsed());

    let trip = planner
        .plan_trip(from, to)
        .await
        .with_context(|| format!("failed to route from {} to {}", from, to))?;
    console::print_trip(&trip, planner.landmarks());
    Ok(())
}

fn list_landmarks(options: &RouterOptions) -> Result<()> {
    let registry = options.load_landmarks()?;
    for landmark in registry.iter() {
        println!(
            "{} {} {}",
            landmark.category.emoji(),
            landmark.name,
            landmark.position
        );
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("puno_routes=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
