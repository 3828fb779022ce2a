pub mod scenario_handlers;

pub use scenario_handlers::*;

pub type DbConn = std::sync::Arc<std::sync::Mutex<rusqlite::Connection>>;
