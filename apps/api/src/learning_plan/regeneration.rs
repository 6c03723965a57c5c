//! Plan (re)generation for a stored user: request defaults come from the user
//! record, explicit overrides win, and the result replaces any existing plan.

use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::learning_plan::generator::PlanGenerator;
use crate::learning_plan::models::LearningPlanRequest;
use crate::learning_plan::store::PlanStore;
use crate::models::learning_plan::LearningPlanRow;
use crate::models::user::User;

/// Per-call overrides. Blank strings are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanOverrides {
    pub career_goal: Option<String>,
    pub resume_text: Option<String>,
    pub current_role: Option<String>,
    pub target_role: Option<String>,
}

/// Merges the user's stored profile with the overrides.
pub fn request_for_user(user: &User, overrides: PlanOverrides) -> LearningPlanRequest {
    LearningPlanRequest {
        career_goal: present(overrides.career_goal).unwrap_or_else(|| user.career_goal.clone()),
        resume_text: present(overrides.resume_text).or_else(|| user.resume_text.clone()),
        current_role: present(overrides.current_role).or_else(|| user.current_role.clone()),
        target_role: present(overrides.target_role).or_else(|| user.target_role.clone()),
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Generates a plan for `user` and stores it as their only plan.
pub async fn regenerate_plan(
    store: &dyn PlanStore,
    generator: &PlanGenerator,
    user: &User,
    request: &LearningPlanRequest,
) -> Result<LearningPlanRow, AppError> {
    let structure = generator.generate_plan(request).await;
    let row = store.replace_for_owner(user.id, &structure).await?;

    info!(
        "Stored learning plan {} for user {} ({} modules, resume on file: {})",
        row.id,
        user.id,
        structure.modules.len(),
        user.has_resume()
    );
    Ok(row)
}
