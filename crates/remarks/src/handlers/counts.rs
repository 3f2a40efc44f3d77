use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    handlers::AppError,
    models::{CountQuery, CountResponse},
    state::AppState,
};

/// Comment count of one object (GET /api/counts).
pub async fn get_count(
    State(state): State<AppState>,
    Query(query): Query<CountQuery>,
) -> Result<Json<CountResponse>, AppError> {
    let count = state.comments.count(query.biz, query.biz_id).await?;

    Ok(Json(CountResponse {
        biz: query.biz,
        biz_id: query.biz_id,
        count,
    }))
}
