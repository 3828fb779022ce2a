use axum::{
    Router,
    routing::{get, post, put},
};

use crate::handlers::{self, DbConn};

pub fn scenario_routes() -> Router<DbConn> {
    Router::new()
        .route("/api/scenarios", get(handlers::list_scenarios))
        .route("/api/scenarios", post(handlers::create_scenario))
        .route("/api/scenarios/{id}", get(handlers::get_scenario))
        .route("/api/scenarios/{id}", put(handlers::update_scenario))
        .route(
            "/api/scenarios/{id}",
            axum::routing::delete(handlers::delete_scenario),
        )
        .route("/api/scenarios/{id}/run", post(handlers::run_scenario))
}
