use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::learning_plan::models::PlanStructure;
use crate::learning_plan::store::upsert_plan;
use crate::models::learning_plan::LearningPlanRow;
use crate::models::user::User;

/// Fields accepted when a user is created.
pub struct NewUser<'a> {
    pub email: &'a str,
    pub career_goal: &'a str,
    pub current_role: Option<&'a str>,
    pub target_role: Option<&'a str>,
}

/// Inserts a user. A duplicate email maps to `AppError::Conflict`.
pub async fn create_user<'e, E>(executor: E, new_user: &NewUser<'_>) -> Result<User, AppError>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, career_goal, present_role, desired_role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_user.email)
    .bind(new_user.career_goal)
    .bind(new_user.current_role)
    .bind(new_user.target_role)
    .fetch_one(executor)
    .await;

    match result {
        Ok(user) => Ok(user),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict(
            format!("Email {} is already registered", new_user.email),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Inserts the user and their first plan in one transaction: either both
/// rows exist afterwards or neither does.
pub async fn create_user_with_plan(
    pool: &PgPool,
    new_user: &NewUser<'_>,
    structure: &PlanStructure,
) -> Result<(User, LearningPlanRow), AppError> {
    let mut tx = pool.begin().await?;
    let user = create_user(&mut *tx, new_user).await?;
    let plan = upsert_plan(&mut *tx, user.id, structure).await?;
    tx.commit().await?;
    Ok((user, plan))
}

pub async fn email_registered(pool: &PgPool, email: &str) -> Result<bool, AppError> {
    Ok(
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?,
    )
}

pub async fn get_user(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, AppError> {
    Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?)
}

/// Records the extracted resume text and where the original PDF lives.
pub async fn set_resume(
    pool: &PgPool,
    user_id: Uuid,
    resume_text: &str,
    s3_key: &str,
) -> Result<Option<User>, AppError> {
    Ok(sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET resume_text = $1, resume_s3_key = $2
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(resume_text)
    .bind(s3_key)
    .bind(user_id)
    .fetch_optional(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning_plan::fallback::fallback_plan;

    fn new_user(email: &str) -> NewUser<'_> {
        NewUser {
            email,
            career_goal: "Data Engineer",
            current_role: Some("Analyst"),
            target_role: None,
        }
    }

    async fn count(pool: &PgPool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at a Postgres server"]
    async fn test_user_and_plan_are_created_together(pool: PgPool) {
        let (user, plan) =
            create_user_with_plan(&pool, &new_user("ada@example.com"), &fallback_plan("Data Engineer"))
                .await
                .unwrap();

        assert_eq!(plan.user_id, user.id);
        assert_eq!(plan.progress, 0);
        assert_eq!(user.current_role.as_deref(), Some("Analyst"));
        assert!(email_registered(&pool, "ada@example.com").await.unwrap());
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at a Postgres server"]
    async fn test_failed_plan_write_leaves_no_user_behind(pool: PgPool) {
        sqlx::query("DROP TABLE learning_plans")
            .execute(&pool)
            .await
            .unwrap();

        let result =
            create_user_with_plan(&pool, &new_user("ada@example.com"), &fallback_plan("Data Engineer"))
                .await;

        assert!(matches!(result, Err(AppError::Database(_))));
        assert_eq!(count(&pool, "users").await, 0);
        assert!(!email_registered(&pool, "ada@example.com").await.unwrap());
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at a Postgres server"]
    async fn test_duplicate_email_is_conflict_and_keeps_one_plan(pool: PgPool) {
        let plan = fallback_plan("Data Engineer");
        create_user_with_plan(&pool, &new_user("ada@example.com"), &plan)
            .await
            .unwrap();

        let err = create_user_with_plan(&pool, &new_user("ada@example.com"), &plan)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(count(&pool, "users").await, 1);
        assert_eq!(count(&pool, "learning_plans").await, 1);
    }
}
