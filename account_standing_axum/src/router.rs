//! Combined router for the account endpoints

use axum::Router;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

fn routes() -> Router {
    Router::new()
        .merge(super::pages::router())
        .nest("/admin", super::admin::router())
}

/// Router for login, logout and the staff standing pages.
///
/// Mount it under `ACCT_ROUTE_PREFIX`. The endpoints are:
/// - `{ACCT_ROUTE_PREFIX}/login` and `/logout`
/// - `{ACCT_ROUTE_PREFIX}/admin/disable_account` (staff page)
/// - `{ACCT_ROUTE_PREFIX}/admin/disable_account_ajax` (staff JSON toggle)
///
/// Layer [`require_good_standing`](crate::require_good_standing) over the whole
/// application to keep disabled accounts out.
pub fn account_standing_router() -> Router {
    routes().layer(
        TraceLayer::new_for_http()
            .make_span_with(
                DefaultMakeSpan::new()
                    .level(Level::INFO)
                    .include_headers(true),
            )
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`account_standing_router`] without the HTTP tracing layer
pub fn account_standing_router_no_trace() -> Router {
    routes()
}
