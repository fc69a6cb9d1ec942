//! Liveness endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use domain::SocialEvent;
use event_store::EventStore;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub recorded_events: usize,
}

/// GET /health
///
/// Also reads the event log so a poisoned store shows up as a 500.
pub async fn check<S: EventStore<Event = SocialEvent> + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<HealthResponse>, ApiError> {
    let recorded_events = state.feed.store().event_count()?;
    Ok(Json(HealthResponse {
        status: "ok",
        recorded_events,
    }))
}
