mod login;
mod logout;

use axum::{Router, routing::get};

pub(crate) fn router() -> Router<()> {
    Router::new()
        .route("/login", get(login::login_page).post(login::login_submit))
        .route("/logout", get(logout::logout))
}
