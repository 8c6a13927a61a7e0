use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::intel::analysis::build_post;
use crate::intel::playbook::GeneratePlaybookResponse;
use crate::intel::signal_scorer::ScoredSignal;
use crate::intel::wedge::WedgeDetection;
use crate::models::playbook::Playbook;
use crate::models::prospect::{NewPost, Post};
use crate::models::signal::{NewSignal, Signal};
use crate::state::AppState;

const DEFAULT_TOP_SIGNALS: usize = 5;

#[derive(Deserialize)]
pub struct TopSignalsQuery {
    pub n: Option<usize>,
}

async fn require_contact(state: &AppState, contact_id: Uuid) -> Result<(), AppError> {
    state
        .stores
        .contacts
        .get_contact(contact_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("Contact {contact_id} not found")))
}

/// POST /api/v1/contacts/:id/signals
pub async fn handle_record_signal(
    State(state): State<AppState>,
    Path(contact_id): Path<Uuid>,
    Json(req): Json<NewSignal>,
) -> Result<(StatusCode, Json<Signal>), AppError> {
    req.validate().map_err(AppError::Validation)?;
    require_contact(&state, contact_id).await?;

    let signal = state
        .stores
        .signals
        .insert(req.into_signal(contact_id))
        .await?;
    info!(
        "Recorded {} signal {} for contact {}",
        signal.source_type, signal.id, contact_id
    );
    Ok((StatusCode::CREATED, Json(signal)))
}

/// GET /api/v1/contacts/:id/signals/scored
pub async fn handle_scored_signals(
    State(state): State<AppState>,
    Path(contact_id): Path<Uuid>,
) -> Result<Json<Vec<ScoredSignal>>, AppError> {
    let ranked = state.scorer().score_and_prioritize(contact_id).await?;
    Ok(Json(ranked))
}

/// GET /api/v1/contacts/:id/signals/top?n=
pub async fn handle_top_signals(
    State(state): State<AppState>,
    Path(contact_id): Path<Uuid>,
    Query(params): Query<TopSignalsQuery>,
) -> Result<Json<Vec<ScoredSignal>>, AppError> {
    let n = params.n.unwrap_or(DEFAULT_TOP_SIGNALS);
    let top = state.scorer().get_top_signals(contact_id, n).await?;
    Ok(Json(top))
}

/// POST /api/v1/contacts/:id/posts
pub async fn handle_record_post(
    State(state): State<AppState>,
    Path(contact_id): Path<Uuid>,
    Json(req): Json<NewPost>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    if req.content.trim().is_empty() {
        return Err(AppError::Validation("Post content cannot be empty".to_string()));
    }
    if req.engagement_count < 0 {
        return Err(AppError::Validation(
            "engagement_count cannot be negative".to_string(),
        ));
    }
    require_contact(&state, contact_id).await?;

    let post = state
        .stores
        .profiles
        .insert_post(build_post(contact_id, req))
        .await?;
    info!(
        "Stored post {} for contact {} (pain: {}, buying: {})",
        post.id, contact_id, post.mentions_pain_points, post.mentions_buying_signals
    );
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/v1/contacts/:id/wedges
pub async fn handle_detect_wedges(
    State(state): State<AppState>,
    Path(contact_id): Path<Uuid>,
) -> Result<Json<WedgeDetection>, AppError> {
    let detection = state.detector().detect_wedges(contact_id).await?;
    Ok(Json(detection))
}

/// POST /api/v1/contacts/:id/playbook
pub async fn handle_generate_playbook(
    State(state): State<AppState>,
    Path(contact_id): Path<Uuid>,
) -> Result<(StatusCode, Json<GeneratePlaybookResponse>), AppError> {
    let playbook = state
        .playbook_generator()
        .generate_playbook(contact_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(GeneratePlaybookResponse {
            success: true,
            playbook,
        }),
    ))
}

/// GET /api/v1/contacts/:id/playbook
pub async fn handle_latest_playbook(
    State(state): State<AppState>,
    Path(contact_id): Path<Uuid>,
) -> Result<Json<Playbook>, AppError> {
    let playbook = state
        .stores
        .playbooks
        .get_latest(contact_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No playbook generated for contact {contact_id}"))
        })?;
    Ok(Json(playbook))
}
