use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use remarks_core::comment::{Comment, CommentThread, NewComment};

use crate::{
    handlers::AppError,
    models::{DeleteCommentQuery, ListCommentsQuery, ListRepliesQuery},
    state::AppState,
};

/// Create a comment or reply (POST /api/comments).
pub async fn create_comment(
    State(state): State<AppState>,
    Json(payload): Json<NewComment>,
) -> Result<impl IntoResponse, AppError> {
    let comment = state.comments.create(payload).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// List top-level comments with reply previews (GET /api/comments).
pub async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<ListCommentsQuery>,
) -> Result<Json<Vec<CommentThread>>, AppError> {
    let threads = state
        .comments
        .list_top_level(query.biz, query.biz_id, query.cursor, query.limit)
        .await?;

    Ok(Json(threads))
}

/// Get a single comment by ID (GET /api/comments/{id}).
pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Comment>, AppError> {
    Ok(Json(state.comments.get(id).await?))
}

/// Delete a comment on behalf of its author (DELETE /api/comments/{id}?uid=).
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<DeleteCommentQuery>,
) -> Result<StatusCode, AppError> {
    state.comments.delete(id, query.uid).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List every reply of a thread, oldest first (GET /api/comments/{id}/replies).
pub async fn list_replies(
    State(state): State<AppState>,
    Path(root_id): Path<i64>,
    Query(query): Query<ListRepliesQuery>,
) -> Result<Json<Vec<Comment>>, AppError> {
    let replies = state
        .comments
        .list_replies(root_id, query.cursor, query.limit)
        .await?;

    Ok(Json(replies))
}
