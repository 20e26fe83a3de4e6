use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use log::{debug, info};
use std::sync::Arc;

use crate::shared::state::AppState;
use crate::tickets::error::TicketsError;
use crate::tickets::storage::{self, NewTicket};
use crate::tickets::types::{PredictRequest, PredictResponse, StatsView, TicketView};

/// Accepts a classified message and records it as an open ticket. A body that
/// does not decode into the expected fields is rejected before the store is
/// ever contacted.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, TicketsError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("rejected predict payload: {}", rejection);
        TicketsError::InvalidJson
    })?;

    let mut conn = state.db.acquire().await?;
    let ticket_id = storage::create_ticket(&mut conn, NewTicket::from_request(request))?;
    info!("ticket {} created", ticket_id);

    Ok(Json(PredictResponse {
        status: "success".to_string(),
        ticket_id,
    }))
}

pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TicketView>>, TicketsError> {
    let mut conn = state.db.acquire().await?;
    let views = storage::list_tickets(&mut conn, state.config.tickets.list_limit)?;
    Ok(Json(views))
}

pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    Path(ticket_id): Path<i32>,
) -> Result<Json<TicketView>, TicketsError> {
    let mut conn = state.db.acquire().await?;
    let ticket = storage::find_ticket(&mut conn, ticket_id)?
        .ok_or_else(|| TicketsError::NotFound("Ticket".to_string()))?;
    Ok(Json(ticket))
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsView>, TicketsError> {
    let mut conn = state.db.acquire().await?;
    let stats = storage::ticket_stats(&mut conn)?;
    Ok(Json(stats))
}
