use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

pub fn app(router: Router) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(router)
        .layer(CorsLayer::permissive())
}
