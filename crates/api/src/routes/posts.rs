//! Global post feed endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use domain::SocialEvent;
use event_store::EventStore;
use projections::FeedPost;

use super::PostResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/posts — every post, in creation order.
#[tracing::instrument(skip(state))]
pub async fn list<S: EventStore<Event = SocialEvent> + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = state.queries.list_posts()?;
    Ok(Json(posts.iter().map(|p| PostResponse::from(&p.post)).collect()))
}

/// GET /api/posts/{id} — a single post.
#[tracing::instrument(skip(state))]
pub async fn get<S: EventStore<Event = SocialEvent> + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let post_id: u64 = id
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid post id '{id}': {e}")))?;

    let post = state
        .queries
        .list_posts()?
        .into_iter()
        .find(|p: &FeedPost| p.post_id.as_u64() == post_id)
        .ok_or_else(|| ApiError::NotFound(format!("Post {id} not found")))?;

    Ok(Json(PostResponse::from(&post.post)))
}
