mod conversion;
mod db;
mod error;
mod handlers;
mod models;
mod repository;
mod routes;
mod validation;

use axum::{Router, routing::get};
use handlers::DbConn;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let conn = Connection::open("wealth.db").expect("Failed to open database");
    db::init_db(&conn).expect("Failed to initialize database");
    let db_conn: DbConn = Arc::new(Mutex::new(conn));

    let app = Router::new()
        .route("/", get(|| async { "Wealth projection API server" }))
        .merge(routes::scenario_routes())
        .with_state(db_conn)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3001")
        .await
        .expect("Failed to bind to port 3001");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
