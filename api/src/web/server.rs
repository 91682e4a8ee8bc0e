use axum::{
    Router,
    middleware,
    response::{IntoResponse, Response},
};
use snafu::ResultExt;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, error, info};

use crate::Result;
use crate::config::Config;
use crate::error::{ErrorInfo, ErrorResponse, ServerBindSnafu, ServerSnafu};
use crate::state::{AppState, create_app_state};
use crate::web::routes::all_routes;

#[cfg(test)]
use axum_test::TestServer;

// Largest write view fits well within this
const MAX_BODY_SIZE: usize = 64 * 1024;

pub async fn run_web_server(config: &Config) -> Result<()> {
    let state = create_app_state(config).await?;
    let routes_all = create_router(state);

    // Setup the server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("HTTP server running on {}", addr);

    let listener = TcpListener::bind(addr).await.context(ServerBindSnafu)?;
    axum::serve(listener, routes_all.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context(ServerSnafu)?;

    info!("HTTP server stopped");

    Ok(())
}

fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(all_routes(state))
        .layer(middleware::map_response(response_mapper))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(
            ServiceBuilder::new().layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            ),
        )
}

async fn response_mapper(res: Response) -> Response {
    let error = res.extensions().get::<ErrorInfo>();
    if let Some(e) = error {
        if e.status_code.is_server_error() {
            error!("{}", e.message);
            if let Some(bt) = &e.backtrace {
                error!("{}", bt);
            }
        }

        return ErrorResponse::new(e.status_code, e.message.as_str()).into_response();
    }
    res
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Unable to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Unable to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
