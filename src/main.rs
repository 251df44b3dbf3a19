//! Demo host for the route-dispatch library.
//!
//! Loads configuration, registers a handful of routes (literal, parameter,
//! wildcard, a guarded chain and a mounted sub-router) and serves them until
//! SIGINT or SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::StatusCode;
use clap::Parser;
use tokio::net::TcpListener;

use route_dispatch::config::validation::validate_config;
use route_dispatch::config::{load_config, ConfigError, ServerConfig};
use route_dispatch::http::middleware::{BearerAuth, RequestLogger};
use route_dispatch::lifecycle::signals;
use route_dispatch::observability::{logging, metrics};
use route_dispatch::{
    Dispatcher, Flow, HandlerChain, HttpServer, Next, Request, Response, RouteError, Router,
    Shutdown,
};

const DEFAULT_ADMIN_TOKEN: &str = "CHANGE_ME_IN_PRODUCTION";

#[derive(Parser)]
#[command(name = "route-dispatch")]
#[command(about = "Demo server for the route-dispatch router", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init(&config.observability.log_level, config.observability.log_format);
    tracing::info!("route-dispatch v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let dispatcher = build_dispatcher(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(dispatcher, &config);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    signals::forward_signals(&shutdown).await;
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn build_dispatcher(config: &ServerConfig) -> Result<Dispatcher, RouteError> {
    let admin_token = match config.properties.get_str("admin_token") {
        Some(token) => token.to_string(),
        None => {
            tracing::warn!("No admin_token property configured, using the placeholder token");
            DEFAULT_ADMIN_TOKEN.to_string()
        }
    };

    let mut api = Router::new();
    api.get("/ping", ping)?.post("/echo", echo)?;

    let mut router = Router::new();
    router
        .get("/", index)?
        .get("/health", health)?
        .get("/users/:id", show_user)?
        .get("/files/*path", show_file)?
        .route(
            axum::http::Method::GET,
            "/admin",
            HandlerChain::new(BearerAuth::new(admin_token)).then(admin_dashboard),
        )?;
    router.mount("/api", api);

    Ok(Dispatcher::builder(router)
        .middleware(RequestLogger)
        .properties(config.properties.clone())
        .build())
}

fn index(res: &mut Response, req: &mut Request, next: Next) -> Flow {
    let name = req.properties().get_str("app_name").unwrap_or("route-dispatch");
    res.send(format!("Hello from {name}"));
    next.run()
}

fn health(res: &mut Response, _req: &mut Request, next: Next) -> Flow {
    res.send("ok");
    next.run()
}

fn show_user(res: &mut Response, req: &mut Request, next: Next) -> Flow {
    let id = req.param("id").unwrap_or_default();
    res.send(format!("user {id}"));
    next.run()
}

fn show_file(res: &mut Response, req: &mut Request, next: Next) -> Flow {
    let path = req.param("path").unwrap_or_default();
    res.send(format!("file {path}"));
    next.run()
}

fn admin_dashboard(res: &mut Response, _req: &mut Request, next: Next) -> Flow {
    res.send("admin dashboard");
    next.run()
}

fn ping(res: &mut Response, _req: &mut Request, next: Next) -> Flow {
    res.send("pong");
    next.run()
}

fn echo(res: &mut Response, req: &mut Request, next: Next) -> Flow {
    if req.body().is_empty() {
        res.status(StatusCode::BAD_REQUEST).send("empty body");
        return next.halt();
    }
    let body = req.body().clone();
    res.write(body);
    next.run()
}
