use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::course::{Course, LessonSummary};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl FromStr for Difficulty {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(AppError::Validation(format!(
                "difficulty must be beginner, intermediate or advanced, got '{other}'"
            ))),
        }
    }
}

/// Raw `GET /api/v1/courses` query string. Empty values mean "no filter".
#[derive(Debug, Default, Deserialize)]
pub struct CourseListQuery {
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Validated listing filter with page numbers starting at 1.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseFilter {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub search: Option<String>,
    pub page: i64,
    pub limit: i64,
}

impl CourseFilter {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl TryFrom<CourseListQuery> for CourseFilter {
    type Error = AppError;

    fn try_from(query: CourseListQuery) -> Result<Self, Self::Error> {
        let difficulty = non_blank(query.difficulty)
            .map(|d| d.parse::<Difficulty>())
            .transpose()?;

        Ok(Self {
            category: non_blank(query.category),
            difficulty,
            search: non_blank(query.search),
            page: query.page.unwrap_or(1).max(1),
            limit: query
                .limit
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

/// Lowercases and trims a path slug; stored slugs are lowercase.
pub fn normalize_slug(slug: &str) -> String {
    slug.trim().to_lowercase()
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseWithLessons {
    #[serde(flatten)]
    pub course: Course,
    pub lessons: Vec<LessonSummary>,
}

/// Pairs each course with its lessons. Lessons keep their incoming order.
pub fn attach_lessons(courses: Vec<Course>, lessons: Vec<LessonSummary>) -> Vec<CourseWithLessons> {
    let mut by_course: HashMap<Uuid, Vec<LessonSummary>> = HashMap::new();
    for lesson in lessons {
        by_course.entry(lesson.course_id).or_default().push(lesson);
    }

    courses
        .into_iter()
        .map(|course| CourseWithLessons {
            lessons: by_course.remove(&course.id).unwrap_or_default(),
            course,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonLink {
    pub slug: String,
    pub title: String,
}

impl From<&LessonSummary> for LessonLink {
    fn from(lesson: &LessonSummary) -> Self {
        Self {
            slug: lesson.slug.clone(),
            title: lesson.title.clone(),
        }
    }
}

/// Where a lesson sits among its course's published lessons.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonNavigation {
    pub next: Option<LessonLink>,
    pub prev: Option<LessonLink>,
    /// 1-based.
    pub current_index: usize,
    pub total_lessons: usize,
}

impl LessonNavigation {
    /// `siblings` must be in course order. `None` if the lesson is not among them.
    pub fn locate(siblings: &[LessonSummary], lesson_id: Uuid) -> Option<Self> {
        let index = siblings.iter().position(|l| l.id == lesson_id)?;
        Some(Self {
            next: siblings.get(index + 1).map(LessonLink::from),
            prev: index
                .checked_sub(1)
                .and_then(|i| siblings.get(i))
                .map(LessonLink::from),
            current_index: index + 1,
            total_lessons: siblings.len(),
        })
    }
}
