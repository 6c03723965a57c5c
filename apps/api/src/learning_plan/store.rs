//! Plan persistence. At most one plan per user; writes are single statements,
//! so concurrent regenerations for the same user are last-write-wins.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::learning_plan::models::{PlanStatus, PlanStructure, ProgressUpdate};
use crate::models::learning_plan::LearningPlanRow;

#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn find_by_owner(&self, user_id: Uuid) -> Result<Option<LearningPlanRow>, AppError>;

    /// Inserts the user's plan, or fully replaces the existing one.
    /// Either way progress is 0 and status is `not-started` afterwards.
    async fn replace_for_owner(
        &self,
        user_id: Uuid,
        structure: &PlanStructure,
    ) -> Result<LearningPlanRow, AppError>;

    /// Returns `None` when the user has no plan.
    async fn update_progress(
        &self,
        user_id: Uuid,
        update: ProgressUpdate,
    ) -> Result<Option<LearningPlanRow>, AppError>;
}

pub struct PgPlanStore {
    pool: PgPool,
}

impl PgPlanStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanStore for PgPlanStore {
    async fn find_by_owner(&self, user_id: Uuid) -> Result<Option<LearningPlanRow>, AppError> {
        Ok(
            sqlx::query_as::<_, LearningPlanRow>("SELECT * FROM learning_plans WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn replace_for_owner(
        &self,
        user_id: Uuid,
        structure: &PlanStructure,
    ) -> Result<LearningPlanRow, AppError> {
        upsert_plan(&self.pool, user_id, structure).await
    }

    async fn update_progress(
        &self,
        user_id: Uuid,
        update: ProgressUpdate,
    ) -> Result<Option<LearningPlanRow>, AppError> {
        Ok(sqlx::query_as::<_, LearningPlanRow>(
            r#"
            UPDATE learning_plans
            SET progress = $1, status = $2, updated_at = NOW()
            WHERE user_id = $3
            RETURNING *
            "#,
        )
        .bind(update.progress)
        .bind(update.status.as_str())
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }
}

/// Insert-or-replace for one user's plan, resetting progress and status.
/// Takes any executor so user creation can run it inside its transaction.
pub async fn upsert_plan<'e, E>(
    executor: E,
    user_id: Uuid,
    structure: &PlanStructure,
) -> Result<LearningPlanRow, AppError>
where
    E: PgExecutor<'e>,
{
    Ok(sqlx::query_as::<_, LearningPlanRow>(
        r#"
        INSERT INTO learning_plans (id, user_id, structure, progress, status)
        VALUES ($1, $2, $3, 0, $4)
        ON CONFLICT (user_id) DO UPDATE
        SET structure = EXCLUDED.structure,
            progress = 0,
            status = EXCLUDED.status,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(Json(structure))
    .bind(PlanStatus::NotStarted.as_str())
    .fetch_one(executor)
    .await?)
}

#[cfg(test)]
pub mod memory {
    //! In-process store for tests. `replace_for_owner` mirrors the
    //! `ON CONFLICT (user_id)` branch of `upsert_plan`: same row id, progress
    //! back to 0, status back to `not-started`. Keep the two in step.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;

    #[derive(Default)]
    pub struct InMemoryPlanStore {
        plans: Mutex<HashMap<Uuid, LearningPlanRow>>,
    }

    impl InMemoryPlanStore {
        pub fn len(&self) -> usize {
            self.plans.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PlanStore for InMemoryPlanStore {
        async fn find_by_owner(&self, user_id: Uuid) -> Result<Option<LearningPlanRow>, AppError> {
            Ok(self.plans.lock().unwrap().get(&user_id).cloned())
        }

        async fn replace_for_owner(
            &self,
            user_id: Uuid,
            structure: &PlanStructure,
        ) -> Result<LearningPlanRow, AppError> {
            let structure = serde_json::to_value(structure)
                .map_err(|e| AppError::Internal(anyhow::anyhow!("serialize plan: {e}")))?;
            let now = Utc::now();
            let mut plans = self.plans.lock().unwrap();
            let row = plans
                .entry(user_id)
                .and_modify(|row| {
                    row.structure = structure.clone();
                    row.progress = 0;
                    row.status = PlanStatus::NotStarted.as_str().to_string();
                    row.updated_at = now;
                })
                .or_insert_with(|| LearningPlanRow {
                    id: Uuid::new_v4(),
                    user_id,
                    structure: structure.clone(),
                    progress: 0,
                    status: PlanStatus::NotStarted.as_str().to_string(),
                    created_at: now,
                    updated_at: now,
                });
            Ok(row.clone())
        }

        async fn update_progress(
            &self,
            user_id: Uuid,
            update: ProgressUpdate,
        ) -> Result<Option<LearningPlanRow>, AppError> {
            let mut plans = self.plans.lock().unwrap();
            Ok(plans.get_mut(&user_id).map(|row| {
                row.progress = update.progress;
                row.status = update.status.as_str().to_string();
                row.updated_at = Utc::now();
                row.clone()
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::InMemoryPlanStore;
    use super::*;
    use crate::learning_plan::fallback::fallback_plan;

    #[tokio::test]
    async fn test_replace_inserts_then_overwrites_in_place() {
        let store = InMemoryPlanStore::default();
        let user_id = Uuid::new_v4();

        let first = store
            .replace_for_owner(user_id, &fallback_plan("Tester"))
            .await
            .unwrap();
        store
            .update_progress(user_id, ProgressUpdate::new(70, None))
            .await
            .unwrap();

        let second = store
            .replace_for_owner(user_id, &fallback_plan("Architect"))
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(first.id, second.id);
        assert_eq!(second.progress, 0);
        assert_eq!(second.plan_status(), PlanStatus::NotStarted);
        assert_eq!(
            second.structure["title"],
            "Personalized Learning Plan for Architect"
        );
    }

    async fn insert_user(pool: &PgPool) -> Uuid {
        let user_id = Uuid::new_v4();
        sqlx::query("INSERT INTO users (id, email, career_goal) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(format!("{user_id}@example.com"))
            .bind("Tester")
            .execute(pool)
            .await
            .unwrap();
        user_id
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at a Postgres server"]
    async fn test_pg_replace_resets_progress_in_place(pool: PgPool) {
        let user_id = insert_user(&pool).await;
        let store = PgPlanStore::new(pool.clone());

        let first = store
            .replace_for_owner(user_id, &fallback_plan("Tester"))
            .await
            .unwrap();
        let progressed = store
            .update_progress(user_id, ProgressUpdate::new(70, None))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(progressed.plan_status(), PlanStatus::InProgress);

        let second = store
            .replace_for_owner(user_id, &fallback_plan("Architect"))
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.progress, 0);
        assert_eq!(second.plan_status(), PlanStatus::NotStarted);
        assert_eq!(
            second.structure["title"],
            "Personalized Learning Plan for Architect"
        );

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM learning_plans WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at a Postgres server"]
    async fn test_pg_update_progress_without_plan_is_none(pool: PgPool) {
        let user_id = insert_user(&pool).await;
        let store = PgPlanStore::new(pool);
        let result = store
            .update_progress(user_id, ProgressUpdate::new(10, None))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_progress_without_plan_is_none() {
        let store = InMemoryPlanStore::default();
        let result = store
            .update_progress(Uuid::new_v4(), ProgressUpdate::new(10, None))
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
