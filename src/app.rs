use std::net::SocketAddr;

use axum::{response::Response, routing::get, Router};
use axum_extra::extract::cookie::CookieJar;
use tower_http::trace::TraceLayer;
use tracing::instrument;

use crate::auth::extractors::CurrentUser;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::state::AppState;
use crate::{admin, auth, records, templates};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .merge(auth::router())
        .merge(records::router())
        .merge(admin::router())
        .with_state(state)
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

#[instrument(skip_all)]
async fn home(user: Option<CurrentUser>, jar: CookieJar) -> Result<Response, AppError> {
    templates::render_page("index.html", user.as_ref().map(|u| &u.0), jar)
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
