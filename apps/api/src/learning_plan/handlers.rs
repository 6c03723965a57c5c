//! Axum route handlers for the Learning Plan API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::learning_plan::models::{PlanStatus, ProgressUpdate};
use crate::learning_plan::regeneration::{regenerate_plan, request_for_user, PlanOverrides};
use crate::models::learning_plan::LearningPlanRow;
use crate::state::AppState;
use crate::users::queries::get_user;

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct RegenerateRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub overrides: PlanOverrides,
}

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub user_id: Uuid,
    pub progress: i64,
    pub status: Option<PlanStatus>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPlanResponse {
    pub learning_plan: LearningPlanRow,
}

/// GET /api/v1/learning-plans/current?user_id=
pub async fn handle_get_current(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<LearningPlanResponse>, AppError> {
    let learning_plan = state
        .plans
        .find_by_owner(params.user_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No learning plan for user {}", params.user_id))
        })?;

    Ok(Json(LearningPlanResponse { learning_plan }))
}

/// POST /api/v1/learning-plans/regenerate
///
/// Replaces the user's plan with a freshly generated one and resets progress.
/// Always succeeds for a known user: generation failures fall back.
pub async fn handle_regenerate(
    State(state): State<AppState>,
    Json(request): Json<RegenerateRequest>,
) -> Result<Json<LearningPlanResponse>, AppError> {
    let user = get_user(&state.db, request.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", request.user_id)))?;

    let plan_request = request_for_user(&user, request.overrides);
    let learning_plan =
        regenerate_plan(state.plans.as_ref(), &state.generator, &user, &plan_request).await?;

    Ok(Json(LearningPlanResponse { learning_plan }))
}

/// PATCH /api/v1/learning-plans/progress
///
/// Progress is clamped to [0, 100]. Without an explicit status, the status
/// follows the progress value.
pub async fn handle_update_progress(
    State(state): State<AppState>,
    Json(request): Json<ProgressRequest>,
) -> Result<Json<LearningPlanResponse>, AppError> {
    let update = ProgressUpdate::new(request.progress, request.status);

    let learning_plan = state
        .plans
        .update_progress(request.user_id, update)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No learning plan for user {}", request.user_id))
        })?;

    info!(
        "Plan progress for user {} set to {}% ({})",
        request.user_id,
        learning_plan.progress,
        learning_plan.plan_status()
    );
    Ok(Json(LearningPlanResponse { learning_plan }))
}
