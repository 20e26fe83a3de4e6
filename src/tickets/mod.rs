pub mod error;
pub mod handlers;
pub mod storage;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::shared::state::AppState;

pub use error::TicketsError;
pub use types::{PredictRequest, PredictResponse, StatsView, TicketView};

pub fn configure_tickets_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api", get(handlers::list_tickets))
        .route("/api/v1/predict", post(handlers::predict))
        .route("/api/v1/tickets/:id", get(handlers::get_ticket))
        .route("/api/v1/stats", get(handlers::get_stats))
}
