use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{expand_handler, home_handler, redirect_handler, shorten_handler};
use crate::state::AppState;

pub struct App {}

impl App {
    /// Builds the router. Static routes win over the `/{short_code}`
    /// catch-all, so codes like `expand` or `shorten` are only reachable
    /// through `/expand/{short_code}`.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", get(home_handler))
            .route("/shorten", post(shorten_handler))
            .route("/expand/{short_code}", get(expand_handler))
            .route("/{short_code}", get(redirect_handler))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }
}
