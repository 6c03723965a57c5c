use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Catalog course. Only published rows are ever read.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub category: String,
    pub tags: Vec<String>,
    pub estimated_duration: i32,
    pub featured: bool,
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lesson listing entry; enough to render a course outline.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct LessonSummary {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub course_id: Uuid,
    pub slug: String,
    pub title: String,
    pub position: i32,
    pub duration: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Lesson {
    pub id: Uuid,
    pub course_id: Uuid,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub lesson_type: String,
    pub position: i32,
    pub duration: i32,
    pub difficulty: String,
    pub tags: Vec<String>,
    /// `[{language, code, description?}]`
    pub code_examples: Value,
    /// `[{title, url, type}]`
    pub resources: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
