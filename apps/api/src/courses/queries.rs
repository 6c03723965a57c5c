use sqlx::PgPool;
use uuid::Uuid;

use crate::courses::models::CourseFilter;
use crate::errors::AppError;
use crate::models::course::{Course, Lesson, LessonSummary};

/// Shared WHERE clause for listing and counting. `$1..$3` are the optional
/// category, difficulty and search text; NULL disables a filter.
const COURSE_FILTER: &str = r#"
    is_published
    AND ($1::text IS NULL OR category = $1)
    AND ($2::text IS NULL OR difficulty = $2)
    AND ($3::text IS NULL OR
         to_tsvector('english', title || ' ' || description || ' ' || array_to_string(tags, ' '))
         @@ plainto_tsquery('english', $3))
"#;

/// One page of published courses, newest first, plus the total match count.
pub async fn list_courses(
    pool: &PgPool,
    filter: &CourseFilter,
) -> Result<(Vec<Course>, i64), AppError> {
    let difficulty = filter.difficulty.map(|d| d.as_str());

    let courses = sqlx::query_as::<_, Course>(&format!(
        "SELECT * FROM courses WHERE {COURSE_FILTER} ORDER BY created_at DESC, id LIMIT $4 OFFSET $5"
    ))
    .bind(filter.category.as_deref())
    .bind(difficulty)
    .bind(filter.search.as_deref())
    .bind(filter.limit)
    .bind(filter.offset())
    .fetch_all(pool)
    .await?;

    let total: i64 =
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM courses WHERE {COURSE_FILTER}"))
            .bind(filter.category.as_deref())
            .bind(difficulty)
            .bind(filter.search.as_deref())
            .fetch_one(pool)
            .await?;

    Ok((courses, total))
}

/// Published lessons of the given courses, in course order.
pub async fn lessons_for_courses(
    pool: &PgPool,
    course_ids: &[Uuid],
) -> Result<Vec<LessonSummary>, AppError> {
    if course_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(sqlx::query_as::<_, LessonSummary>(
        r#"
        SELECT id, course_id, slug, title, position, duration
        FROM lessons
        WHERE course_id = ANY($1) AND is_published
        ORDER BY course_id, position
        "#,
    )
    .bind(course_ids)
    .fetch_all(pool)
    .await?)
}

pub async fn find_course(pool: &PgPool, slug: &str) -> Result<Option<Course>, AppError> {
    Ok(
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE slug = $1 AND is_published")
            .bind(slug)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn find_course_by_id(pool: &PgPool, course_id: Uuid) -> Result<Option<Course>, AppError> {
    Ok(
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1 AND is_published")
            .bind(course_id)
            .fetch_optional(pool)
            .await?,
    )
}

/// A published lesson. Lessons of unpublished courses are not served.
pub async fn find_lesson(pool: &PgPool, slug: &str) -> Result<Option<Lesson>, AppError> {
    Ok(sqlx::query_as::<_, Lesson>(
        r#"
        SELECT l.*
        FROM lessons l
        JOIN courses c ON c.id = l.course_id
        WHERE l.slug = $1 AND l.is_published AND c.is_published
        "#,
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?)
}
