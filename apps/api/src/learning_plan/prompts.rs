// Prompt text for learning plan generation.
// The JSON shape below is what learning_plan::parser validates against.

use crate::learning_plan::models::LearningPlanRequest;

pub const NO_RESUME_PLACEHOLDER: &str = "No resume provided";
pub const NO_ROLE_PLACEHOLDER: &str = "Not specified";

const PLAN_SCHEMA: &str = r#"{
  "title": "Personalized Learning Plan for [Career Goal]",
  "summary": "Brief overview of the learning journey",
  "modules": [
    {
      "title": "Module Title",
      "description": "What this module covers",
      "lessons": [
        {
          "title": "Lesson Title",
          "description": "What this lesson teaches",
          "duration": "estimated time in minutes",
          "difficulty": "beginner/intermediate/advanced",
          "resources": ["resource type 1", "resource type 2"]
        }
      ]
    }
  ],
  "estimatedDuration": "total estimated time",
  "prerequisites": ["any prerequisites"],
  "learningOutcomes": ["what the user will learn"]
}"#;

/// Renders the generation prompt. Same request in, same bytes out.
pub fn build_plan_prompt(request: &LearningPlanRequest) -> String {
    let resume = or_placeholder(request.resume_text.as_deref(), NO_RESUME_PLACEHOLDER);
    let current_role = or_placeholder(request.current_role.as_deref(), NO_ROLE_PLACEHOLDER);
    let target_role = or_placeholder(request.target_role.as_deref(), NO_ROLE_PLACEHOLDER);
    let career_goal = request.career_goal.trim();

    format!(
        "You are an expert career counselor and learning path designer. \
Based on the following resume and career goal, create a personalized learning plan.

RESUME:
{resume}

CURRENT ROLE:
{current_role}

TARGET ROLE:
{target_role}

CAREER GOAL:
{career_goal}

Please create a comprehensive learning plan with the following structure (respond in valid JSON format only):

{PLAN_SCHEMA}

Rules:
- Include at least one module, and at least one lesson in every module.
- \"duration\" is the estimated time in minutes.
- \"difficulty\" is exactly one of: beginner, intermediate, advanced.

Focus on practical, actionable learning steps that will help achieve the career goal. \
Include a mix of theoretical knowledge and hands-on projects."
    )
}

fn or_placeholder<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => placeholder,
    }
}
