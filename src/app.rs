use std::net::SocketAddr;

use axum::{extract::State, http::StatusCode, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, recipes};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest("/api/auth", auth::router())
        .merge(recipes::router())
        .route("/logout", get(auth::handlers::logout))
        .route("/account", get(auth::handlers::account))
        .route("/dbtest", get(dbtest))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

/// Connectivity probe against the user store.
async fn dbtest(State(state): State<AppState>) -> Result<&'static str, (StatusCode, String)> {
    state.users.ping().await.map_err(|e| {
        tracing::error!(error = %e, "database unreachable");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Database unreachable".to_string(),
        )
    })?;
    Ok("connected")
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
