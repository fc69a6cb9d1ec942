//! User, wall, timeline, posting and follow endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use common::UserId;
use domain::{CreateUser, Follow, SendPost, SocialEvent, Unfollow};
use event_store::EventStore;
use projections::UserSummary;
use serde::{Deserialize, Serialize};

use super::PostResponse;
use crate::error::ApiError;
use crate::state::AppState;

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct PostRequest {
    pub text: String,
}

// -- Response types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub name: String,
    pub created: DateTime<Utc>,
    pub followed_count: u64,
    pub follower_count: u64,
    pub post_count: u64,
}

impl From<UserSummary> for UserResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            name: summary.name.name().to_string(),
            created: summary.created_at,
            followed_count: summary.followed_count,
            follower_count: summary.follower_count,
            post_count: summary.post_count,
        }
    }
}

// -- Handlers --

/// GET /api/users — every user, ordered by name.
#[tracing::instrument(skip(state))]
pub async fn list<S: EventStore<Event = SocialEvent> + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.queries.list_users()?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/users/{name} — a single user's profile.
#[tracing::instrument(skip(state))]
pub async fn get<S: EventStore<Event = SocialEvent> + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(name): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .queries
        .get_user(&UserId::new(name.as_str()))?
        .ok_or_else(|| ApiError::NotFound(format!("User {name} not found")))?;

    Ok(Json(user.into()))
}

/// PUT /api/users/{name} — create a user.
#[tracing::instrument(skip(state))]
pub async fn create<S: EventStore<Event = SocialEvent> + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(name): Path<String>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user_id = UserId::new(name.as_str());
    state.feed.create_user(CreateUser::new(user_id.clone()))?;

    let user = state
        .queries
        .get_user(&user_id)?
        .ok_or_else(|| ApiError::Internal(format!("User {name} missing after creation")))?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/users/{name}/wall — posts the user sent, newest first.
#[tracing::instrument(skip(state))]
pub async fn wall<S: EventStore<Event = SocialEvent> + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = state.queries.wall(&UserId::new(name))?;
    Ok(Json(posts.iter().map(PostResponse::from).collect()))
}

/// GET /api/users/{name}/timeline — posts from followed users, newest first.
#[tracing::instrument(skip(state))]
pub async fn timeline<S: EventStore<Event = SocialEvent> + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = state.queries.timeline(&UserId::new(name))?;
    Ok(Json(posts.iter().map(PostResponse::from).collect()))
}

/// POST /api/users/{name}/posts — publish a post.
#[tracing::instrument(skip(state, req))]
pub async fn create_post<S: EventStore<Event = SocialEvent> + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(name): Path<String>,
    Json(req): Json<PostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::debug!(text = %req.text, "adding post");
    let post_id = state
        .feed
        .post(SendPost::new(name, req.text))
        .map_err(|e| match e {
            e if e.is_validation() => ApiError::BadRequest("Text too long".to_string()),
            e => ApiError::Domain(e),
        })?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/posts/{post_id}"))],
    ))
}

/// PUT /api/users/{name}/followed/{other} — start following `other`.
#[tracing::instrument(skip(state))]
pub async fn follow<S: EventStore<Event = SocialEvent> + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((name, other)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.feed.follow(Follow::new(name, other))?;
    Ok(StatusCode::OK)
}

/// DELETE /api/users/{name}/followed/{other} — stop following `other`.
#[tracing::instrument(skip(state))]
pub async fn unfollow<S: EventStore<Event = SocialEvent> + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((name, other)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.feed.unfollow(Unfollow::new(name, other))?;
    Ok(StatusCode::OK)
}
