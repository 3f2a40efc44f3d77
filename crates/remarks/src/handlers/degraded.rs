//! Runtime switch for degraded mode.
//!
//! While enabled, top-level listings skip the reply preview fan-out.

use axum::{extract::State, Json};

use crate::{models::DegradedMode, state::AppState};

/// GET /api/degraded
pub async fn get_degraded(State(state): State<AppState>) -> Json<DegradedMode> {
    Json(DegradedMode {
        enabled: state.comments.is_degraded(),
    })
}

/// PUT /api/degraded
pub async fn set_degraded(
    State(state): State<AppState>,
    Json(mode): Json<DegradedMode>,
) -> Json<DegradedMode> {
    state.comments.set_degraded(mode.enabled);

    Json(mode)
}
