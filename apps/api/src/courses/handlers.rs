//! Axum route handlers for the course catalog.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::courses::models::{
    attach_lessons, normalize_slug, total_pages, CourseFilter, CourseListQuery, CourseWithLessons,
    LessonNavigation,
};
use crate::courses::queries::{
    find_course, find_course_by_id, find_lesson, lessons_for_courses, list_courses,
};
use crate::errors::AppError;
use crate::models::course::Lesson;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseListResponse {
    pub courses: Vec<CourseWithLessons>,
    pub total_pages: i64,
    pub current_page: i64,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub course: CourseWithLessons,
}

#[derive(Debug, Serialize)]
pub struct CourseRef {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct LessonResponse {
    pub lesson: Lesson,
    pub course: CourseRef,
    pub navigation: LessonNavigation,
}

/// GET /api/v1/courses?category=&difficulty=&search=&page=&limit=
pub async fn handle_list_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseListQuery>,
) -> Result<Json<CourseListResponse>, AppError> {
    let filter = CourseFilter::try_from(query)?;

    let (courses, total) = list_courses(&state.db, &filter).await?;
    let ids: Vec<Uuid> = courses.iter().map(|c| c.id).collect();
    let lessons = lessons_for_courses(&state.db, &ids).await?;

    Ok(Json(CourseListResponse {
        courses: attach_lessons(courses, lessons),
        total_pages: total_pages(total, filter.limit),
        current_page: filter.page,
        total,
    }))
}

/// GET /api/v1/courses/:slug
pub async fn handle_get_course(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CourseResponse>, AppError> {
    let slug = normalize_slug(&slug);
    let course = find_course(&state.db, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Course '{slug}' not found")))?;
    let lessons = lessons_for_courses(&state.db, &[course.id]).await?;

    let course = attach_lessons(vec![course], lessons).pop().ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("course '{slug}' lost while grouping lessons"))
    })?;
    Ok(Json(CourseResponse { course }))
}

/// GET /api/v1/lessons/:slug
///
/// Navigation covers the published lessons of the lesson's course.
pub async fn handle_get_lesson(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<LessonResponse>, AppError> {
    let slug = normalize_slug(&slug);
    let not_found = || AppError::NotFound(format!("Lesson '{slug}' not found"));

    let lesson = find_lesson(&state.db, &slug).await?.ok_or_else(not_found)?;
    let course = find_course_by_id(&state.db, lesson.course_id)
        .await?
        .ok_or_else(not_found)?;
    let siblings = lessons_for_courses(&state.db, &[course.id]).await?;
    let navigation = LessonNavigation::locate(&siblings, lesson.id).ok_or_else(not_found)?;

    Ok(Json(LessonResponse {
        lesson,
        course: CourseRef {
            id: course.id,
            slug: course.slug,
            title: course.title,
        },
        navigation,
    }))
}
