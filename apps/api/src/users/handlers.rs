//! Axum route handlers for the Users API.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::learning_plan::models::LearningPlanRequest;
use crate::models::learning_plan::LearningPlanRow;
use crate::models::user::User;
use crate::state::AppState;
use crate::users::queries::{
    create_user_with_plan, email_registered, get_user, set_resume, NewUser,
};
use crate::users::resume::{extract_resume_text, upload_resume, MAX_RESUME_BYTES};

const RESUME_FIELD: &str = "resume";

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub career_goal: String,
    pub current_role: Option<String>,
    pub target_role: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub user: User,
    pub learning_plan: LearningPlanRow,
}

#[derive(Debug, Serialize)]
pub struct ResumeUploadResponse {
    pub user_id: Uuid,
    pub resume_s3_key: String,
    pub extracted_chars: usize,
}

impl CreateUserRequest {
    fn validate(&self) -> Result<(), AppError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(AppError::Validation("email cannot be empty".to_string()));
        }
        if !email.contains('@') {
            return Err(AppError::Validation(format!(
                "'{email}' is not a valid email address"
            )));
        }
        if self.career_goal.trim().is_empty() {
            return Err(AppError::Validation(
                "career_goal cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Generation input for the first plan. A new user has no resume yet.
    fn plan_request(&self) -> LearningPlanRequest {
        LearningPlanRequest {
            career_goal: self.career_goal.trim().to_string(),
            resume_text: None,
            current_role: trimmed(&self.current_role).map(str::to_string),
            target_role: trimmed(&self.target_role).map(str::to_string),
        }
    }
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// POST /api/v1/users
///
/// Creates the user and their initial learning plan.
///
/// The plan is generated before anything is written, then the user row and the
/// plan row are inserted in one transaction. A failed write leaves neither.
pub async fn handle_create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), AppError> {
    request.validate()?;

    let email = request.email.trim().to_lowercase();
    // Cheap early answer for a taken email; the unique index still decides.
    if email_registered(&state.db, &email).await? {
        return Err(AppError::Conflict(format!(
            "Email {email} is already registered"
        )));
    }

    let structure = state.generator.generate_plan(&request.plan_request()).await;

    let new_user = NewUser {
        email: &email,
        career_goal: request.career_goal.trim(),
        current_role: trimmed(&request.current_role),
        target_role: trimmed(&request.target_role),
    };
    let (user, learning_plan) = create_user_with_plan(&state.db, &new_user, &structure).await?;
    info!(
        "Created user {} with learning plan {} ({} modules)",
        user.id,
        learning_plan.id,
        structure.modules.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            user,
            learning_plan,
        }),
    ))
}

/// GET /api/v1/users/:id
pub async fn handle_get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = get_user(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
    Ok(Json(user))
}

/// POST /api/v1/users/:id/resume
///
/// Multipart upload with a single `resume` PDF field. The extracted text feeds
/// later plan regenerations; the plan itself is not regenerated here.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    if get_user(&state.db, user_id).await?.is_none() {
        return Err(AppError::NotFound(format!("User {user_id} not found")));
    }

    let mut pdf = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some(RESUME_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read resume upload: {e}")))?;
            pdf = Some(bytes);
            break;
        }
    }

    let pdf = pdf.ok_or_else(|| {
        AppError::Validation(format!("Missing multipart field '{RESUME_FIELD}'"))
    })?;
    if pdf.is_empty() || pdf.len() > MAX_RESUME_BYTES {
        return Err(AppError::Validation(format!(
            "Resume must be between 1 byte and {MAX_RESUME_BYTES} bytes"
        )));
    }

    let resume_text = extract_resume_text(pdf.clone()).await?;
    let key = upload_resume(&state.s3, &state.config.s3_bucket, user_id, pdf).await?;

    set_resume(&state.db, user_id, &resume_text, &key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;

    Ok(Json(ResumeUploadResponse {
        user_id,
        resume_s3_key: key,
        extracted_chars: resume_text.chars().count(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, goal: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.into(),
            career_goal: goal.into(),
            current_role: None,
            target_role: None,
        }
    }

    #[test]
    fn test_validate_accepts_minimal_request() {
        assert!(request("ada@example.com", "Compiler engineer")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_or_malformed_email() {
        assert!(matches!(
            request("  ", "Goal").validate(),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            request("not-an-email", "Goal").validate(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_blank_goal() {
        assert!(matches!(
            request("ada@example.com", "\t").validate(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_plan_request_uses_trimmed_profile() {
        let request = CreateUserRequest {
            email: "ada@example.com".into(),
            career_goal: "  Compiler engineer ".into(),
            current_role: Some(" Backend dev ".into()),
            target_role: Some("   ".into()),
        };
        let plan_request = request.plan_request();
        assert_eq!(plan_request.career_goal, "Compiler engineer");
        assert_eq!(plan_request.current_role.as_deref(), Some("Backend dev"));
        assert_eq!(plan_request.target_role, None);
        assert_eq!(plan_request.resume_text, None);
    }

    #[test]
    fn test_trimmed_drops_blank_roles() {
        assert_eq!(trimmed(&Some("  Analyst ".into())), Some("Analyst"));
        assert_eq!(trimmed(&Some("   ".into())), None);
        assert_eq!(trimmed(&None), None);
    }
}
