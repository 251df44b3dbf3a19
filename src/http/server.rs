//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router that feeds every request to the Dispatcher
//! - Wire up middleware (tracing, request ID, panic recovery, timeout)
//! - Buffer request bodies up to the configured limit
//! - Translate the response sink into an HTTP response
//! - Serve with graceful shutdown and an optional drain deadline

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    extract::{Request as HttpRequest, State},
    http::StatusCode,
    response::{IntoResponse, Response as HttpResponse},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::dispatch::Dispatcher;
use crate::http::{Request, Response};
use crate::observability::metrics;

/// State injected into the fallback handler.
#[derive(Clone)]
struct ServerState {
    dispatcher: Arc<Dispatcher>,
    max_body_bytes: usize,
}

/// HTTP transport hosting a [`Dispatcher`].
pub struct HttpServer {
    router: Router,
    drain: Option<Duration>,
}

impl HttpServer {
    pub fn new(dispatcher: Dispatcher, config: &ServerConfig) -> Self {
        let state = ServerState {
            dispatcher: Arc::new(dispatcher),
            max_body_bytes: config.limits.max_body_bytes,
        };
        let drain = match config.timeouts.drain_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Self {
            router: Self::build_router(config, state),
            drain,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: ServerState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(CatchPanicLayer::new())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The fully layered Axum router, for embedding in another server.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve on `listener` until `shutdown` fires.
    ///
    /// After the signal the listener stops accepting and `run` waits for
    /// in-flight requests. With a drain deadline configured, `run` returns
    /// once it elapses and stops waiting; requests still in flight keep
    /// running on their own connection tasks.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut drain_rx = shutdown.resubscribe();
        let drain = self.drain;

        let serve = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Stopping the server");
            })
            .into_future();

        let deadline = async move {
            let _ = drain_rx.recv().await;
            match drain {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            result = serve => result?,
            () = deadline => {
                tracing::warn!(drain = ?drain, "Drain deadline elapsed, no longer waiting for in-flight requests");
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Fallback handler: every request goes through the Dispatcher.
async fn dispatch_handler(State(state): State<ServerState>, request: HttpRequest) -> HttpResponse {
    let (parts, body) = request.into_parts();

    let body = match to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %parts.uri.path(), error = %e, "Request body rejected");
            metrics::record_rejected("body");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let mut req = Request::new(parts.method, parts.uri.path())
        .with_query(parts.uri.query())
        .with_headers(parts.headers)
        .with_extensions(parts.extensions)
        .with_body(body);

    // Handlers are synchronous and may block.
    let dispatcher = Arc::clone(&state.dispatcher);
    let joined = tokio::task::spawn_blocking(move || {
        let mut res = Response::new();
        let result = dispatcher.dispatch(&mut req, &mut res);
        (result, res)
    })
    .await;

    let res = match joined {
        Ok((Ok(_), res)) => res,
        Ok((Err(e), _)) => {
            tracing::error!(error = %e, "Dispatch failed");
            return internal_error();
        }
        Err(e) if e.is_panic() => {
            tracing::error!("Handler panicked");
            return internal_error();
        }
        Err(e) => {
            tracing::error!(error = %e, "Dispatch task failed");
            return internal_error();
        }
    };

    let (status, headers, body) = res.into_parts();
    let mut response = HttpResponse::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

fn internal_error() -> HttpResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
