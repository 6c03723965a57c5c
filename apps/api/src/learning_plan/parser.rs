//! Response parser: pulls one plan object out of free-form provider text.
//!
//! Extraction is a greedy brace match: the slice from the first `{` to the last
//! `}` is parsed as JSON. Prose or code fences around the object are ignored;
//! two separate objects in one reply do not parse and count as a failure.
//!
//! The parsed object is then checked against `PlanStructure`. A reply that is
//! valid JSON but not a usable plan is rejected the same way as garbage, so the
//! caller falls back instead of storing it.

use serde_json::Value;
use thiserror::Error;

use crate::learning_plan::models::PlanStructure;

#[derive(Debug, Error)]
pub enum PlanParseError {
    #[error("no JSON object found in response")]
    NoJsonObject,

    #[error("invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("JSON does not match the plan structure: {0}")]
    Shape(#[source] serde_json::Error),

    #[error("plan title is empty")]
    MissingTitle,

    #[error("plan has no modules")]
    NoModules,

    #[error("module {index} ('{title}') has no lessons")]
    EmptyModule { index: usize, title: String },
}

/// Parses the brace-delimited region of `text` as JSON.
pub fn extract_json_object(text: &str) -> Result<Value, PlanParseError> {
    let start = text.find('{').ok_or(PlanParseError::NoJsonObject)?;
    let end = text.rfind('}').ok_or(PlanParseError::NoJsonObject)?;
    if end < start {
        return Err(PlanParseError::NoJsonObject);
    }

    serde_json::from_str(&text[start..=end]).map_err(PlanParseError::InvalidJson)
}

/// Extracts and validates a plan from raw provider output.
pub fn parse_plan(text: &str) -> Result<PlanStructure, PlanParseError> {
    let value = extract_json_object(text)?;
    let plan: PlanStructure = serde_json::from_value(value).map_err(PlanParseError::Shape)?;
    validate_plan(&plan)?;
    Ok(plan)
}

fn validate_plan(plan: &PlanStructure) -> Result<(), PlanParseError> {
    if plan.title.trim().is_empty() {
        return Err(PlanParseError::MissingTitle);
    }
    if plan.modules.is_empty() {
        return Err(PlanParseError::NoModules);
    }
    if let Some((index, module)) = plan
        .modules
        .iter()
        .enumerate()
        .find(|(_, m)| m.lessons.is_empty())
    {
        return Err(PlanParseError::EmptyModule {
            index,
            title: module.title.clone(),
        });
    }
    Ok(())
}
