use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub career_goal: String,
    #[sqlx(rename = "present_role")]
    pub current_role: Option<String>,
    #[sqlx(rename = "desired_role")]
    pub target_role: Option<String>,
    /// Extracted resume text; large, so never echoed back to clients.
    #[serde(skip_serializing)]
    pub resume_text: Option<String>,
    pub resume_s3_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn has_resume(&self) -> bool {
        self.resume_text
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }
}
