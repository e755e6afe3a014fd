mod handlers;
mod server;

use axum::{Router, middleware::from_fn, routing::get};
use dotenvy::dotenv;

use account_standing_axum::{
    ACCT_ROUTE_PREFIX, CoordinationError, account_standing_router, create_user_account,
    is_authenticated_user_redirect, require_good_standing,
};

use handlers::{dashboard, index};
use server::{init_tracing, spawn_http_server};

/// Create the staff account named by `ADMIN_USERNAME` and `ADMIN_PASSWORD` if it is missing
async fn bootstrap_admin() -> Result<(), Box<dyn std::error::Error>> {
    let (Ok(username), Ok(password)) = (
        std::env::var("ADMIN_USERNAME"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        tracing::info!("ADMIN_USERNAME/ADMIN_PASSWORD not set, skipping staff bootstrap");
        return Ok(());
    };

    match create_user_account(&username, &password, true).await {
        Ok(user) => tracing::info!("Created staff account {}", user.username),
        Err(CoordinationError::Conflict(_)) => {
            tracing::info!("Staff account {} already exists", username)
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_tracing(env!("CARGO_PKG_NAME"));

    account_standing_axum::init().await?;
    bootstrap_admin().await?;

    let app = Router::new()
        .route("/dashboard", get(dashboard))
        .route_layer(from_fn(is_authenticated_user_redirect))
        .route("/", get(index))
        .nest(ACCT_ROUTE_PREFIX.as_str(), account_standing_router())
        .layer(from_fn(require_good_standing));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    spawn_http_server(port, app).await??;
    Ok(())
}
