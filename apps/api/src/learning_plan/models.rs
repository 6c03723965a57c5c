use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ────────────────────────────────────────────────────────────────────────────
// Generation input
// ────────────────────────────────────────────────────────────────────────────

/// Input to a single plan generation. Built per call, never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LearningPlanRequest {
    pub career_goal: String,
    pub resume_text: Option<String>,
    pub current_role: Option<String>,
    pub target_role: Option<String>,
}

#[cfg(test)]
impl LearningPlanRequest {
    pub fn new(career_goal: impl Into<String>) -> Self {
        Self {
            career_goal: career_goal.into(),
            ..Self::default()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Plan structure
// ────────────────────────────────────────────────────────────────────────────

/// The curriculum stored in `learning_plans.structure`.
///
/// Field names are camelCase on the wire. Providers sometimes answer with
/// `overview` instead of `summary`, or with both; `summary` wins when it is
/// non-blank. Optional text and list fields accept `null` as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawPlanStructure")]
pub struct PlanStructure {
    pub title: String,
    pub summary: String,
    pub modules: Vec<PlanModule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,
    pub prerequisites: Vec<String>,
    pub learning_outcomes: Vec<String>,
}

/// Provider-facing shape of `PlanStructure`, before `summary`/`overview` merge.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlanStructure {
    title: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    modules: Vec<PlanModule>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    estimated_duration: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    prerequisites: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    learning_outcomes: Vec<String>,
}

impl From<RawPlanStructure> for PlanStructure {
    fn from(raw: RawPlanStructure) -> Self {
        let summary = raw
            .summary
            .filter(|s| !s.trim().is_empty())
            .or(raw.overview)
            .unwrap_or_default();

        Self {
            title: raw.title,
            summary,
            modules: raw.modules,
            estimated_duration: raw.estimated_duration,
            prerequisites: raw.prerequisites,
            learning_outcomes: raw.learning_outcomes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanModule {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Minutes, or a free-form estimate. Numbers are normalized to strings.
    #[serde(default, deserialize_with = "string_or_number")]
    pub duration: String,
    /// Expected to be beginner/intermediate/advanced; not enforced.
    #[serde(default, deserialize_with = "null_as_default")]
    pub difficulty: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resources: Vec<String>,
}

impl PlanStructure {
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }
}

/// `null` reads as the type's default, same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_string_or_number(deserializer)?.unwrap_or_default())
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Null => Ok(None),
        other => Err(de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Progress tracking
// ────────────────────────────────────────────────────────────────────────────

pub const MIN_PROGRESS: i16 = 0;
pub const MAX_PROGRESS: i16 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::NotStarted => "not-started",
            PlanStatus::InProgress => "in-progress",
            PlanStatus::Completed => "completed",
        }
    }

    /// Status implied by a progress value when the caller does not set one.
    pub fn from_progress(progress: i16) -> Self {
        match progress {
            p if p <= MIN_PROGRESS => PlanStatus::NotStarted,
            p if p >= MAX_PROGRESS => PlanStatus::Completed,
            _ => PlanStatus::InProgress,
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not-started" => Ok(PlanStatus::NotStarted),
            "in-progress" => Ok(PlanStatus::InProgress),
            "completed" => Ok(PlanStatus::Completed),
            other => Err(format!("unknown plan status '{other}'")),
        }
    }
}

/// Clamps any requested progress into [0, 100].
pub fn clamp_progress(value: i64) -> i16 {
    value.clamp(MIN_PROGRESS as i64, MAX_PROGRESS as i64) as i16
}

/// A validated progress change: progress is always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub progress: i16,
    pub status: PlanStatus,
}

impl ProgressUpdate {
    pub fn new(progress: i64, status: Option<PlanStatus>) -> Self {
        let progress = clamp_progress(progress);
        Self {
            progress,
            status: status.unwrap_or_else(|| PlanStatus::from_progress(progress)),
        }
    }
}
