use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::learning_plan::models::PlanStatus;

/// One row per user: regeneration overwrites it in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LearningPlanRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub structure: Value,
    pub progress: i16,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LearningPlanRow {
    /// Unknown values read as `NotStarted`; the column check constraint keeps them out.
    pub fn plan_status(&self) -> PlanStatus {
        self.status.parse().unwrap_or_default()
    }
}
